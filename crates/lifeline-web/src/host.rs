//! Browser host - the page services of [`Host`] on top of `web-sys`

use std::future::Future;

use js_sys::Promise;
use lifeline_ui::{Host, UiError, UiResult};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, Window};

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The current window and document.
pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn dom_error(op: &'static str) -> impl FnOnce(JsValue) -> UiError {
    move |value| UiError::dom(op, describe(&value))
}

impl Host for BrowserHost {
    type Node = Element;

    // ========== Lookup ==========

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!(selector, error = %describe(&err), "invalid selector");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    // ========== Class State ==========

    fn add_class(&self, node: &Element, class: &str) -> UiResult<()> {
        node.class_list().add_1(class).map_err(dom_error("add_class"))
    }

    fn remove_class(&self, node: &Element, class: &str) -> UiResult<()> {
        node.class_list()
            .remove_1(class)
            .map_err(dom_error("remove_class"))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    // ========== Content ==========

    fn set_text(&self, node: &Element, text: &str) -> UiResult<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_inner_html(&self, node: &Element, html: &str) -> UiResult<()> {
        node.set_inner_html(html);
        Ok(())
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> UiResult<()> {
        let element = node
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| UiError::dom("set_style", "element has no inline style"))?;
        let style = element.style();
        if value.is_empty() {
            style
                .remove_property(property)
                .map(|_| ())
                .map_err(dom_error("set_style"))
        } else {
            style
                .set_property(property, value)
                .map_err(dom_error("set_style"))
        }
    }

    // ========== Attributes ==========

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> UiResult<()> {
        node.set_attribute(name, value)
            .map_err(dom_error("set_attribute"))
    }

    fn remove_attribute(&self, node: &Element, name: &str) -> UiResult<()> {
        node.remove_attribute(name)
            .map_err(dom_error("remove_attribute"))
    }

    // ========== Structure ==========

    fn append_element(&self, parent: &Element, tag: &str, class: &str) -> UiResult<Element> {
        let element = self
            .document
            .create_element(tag)
            .map_err(dom_error("create_element"))?;
        element.set_class_name(class);
        parent
            .append_child(&element)
            .map_err(dom_error("append_child"))?;
        Ok(element)
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    // ========== Window ==========

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn current_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn navigate(&self, url: &str) -> UiResult<()> {
        self.window
            .location()
            .set_href(url)
            .map_err(|value| UiError::Navigation {
                url: url.to_string(),
                reason: describe(&value),
            })
    }

    fn now(&self) -> f64 {
        window_now(&self.window)
    }

    // ========== Scheduling ==========

    fn sleep(&self, ms: u32) -> impl Future<Output = ()> {
        let window = self.window.clone();
        let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Err(err) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
            {
                warn!(error = %describe(&err), "setTimeout failed, resolving immediately");
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        async move {
            let _ = JsFuture::from(promise).await;
        }
    }

    fn next_frame(&self) -> impl Future<Output = f64> {
        let window = self.window.clone();
        let promise = Promise::new(&mut |resolve, _reject| {
            if let Err(err) = window.request_animation_frame(&resolve) {
                warn!(error = %describe(&err), "requestAnimationFrame failed");
                let _ = resolve.call1(&JsValue::NULL, &JsValue::from_f64(window_now(&window)));
            }
        });
        let fallback = window_now(&self.window);
        async move {
            JsFuture::from(promise)
                .await
                .ok()
                .and_then(|timestamp| timestamp.as_f64())
                .unwrap_or(fallback)
        }
    }
}

fn window_now(window: &Window) -> f64 {
    window
        .performance()
        .map(|performance| performance.now())
        .unwrap_or_else(js_sys::Date::now)
}
