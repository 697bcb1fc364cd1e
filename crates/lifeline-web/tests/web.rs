//! Browser tests for the web bindings
//!
//! Run with `wasm-pack test --headless --chrome crates/lifeline-web`.

#![cfg(target_arch = "wasm32")]

use lifeline_ui::{Host, NotificationConfig, NotificationKind, Notifier};
use lifeline_web::config;
use lifeline_web::events::Listener;
use lifeline_web::BrowserHost;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, EventTarget};

wasm_bindgen_test_configure!(run_in_browser);

fn fixture(host: &BrowserHost, id: &str) -> Element {
    let document = host.document();
    if let Some(existing) = document.get_element_by_id(id) {
        existing.remove();
    }
    let element = document.create_element("div").unwrap();
    element.set_id(id);
    document.body().unwrap().append_child(&element).unwrap();
    element
}

#[wasm_bindgen_test]
fn class_and_text_round_trip() {
    let host = BrowserHost::new().unwrap();
    let node = fixture(&host, "host-classes");

    host.add_class(&node, "active").unwrap();
    assert!(host.has_class(&node, "active"));
    host.remove_class(&node, "active").unwrap();
    assert!(!host.has_class(&node, "active"));

    host.set_text(&node, "2,847").unwrap();
    assert_eq!(host.text(&node), "2,847");
    assert_eq!(host.element_by_id("host-classes"), Some(node.clone()));
    node.remove();
}

#[wasm_bindgen_test]
fn body_overflow_style_clears() {
    let host = BrowserHost::new().unwrap();
    let body = host.body().unwrap();

    let style = body.unchecked_ref::<web_sys::HtmlElement>().style();

    host.set_style(&body, "overflow", "hidden").unwrap();
    assert_eq!(style.get_property_value("overflow").unwrap(), "hidden");
    host.set_style(&body, "overflow", "").unwrap();
    assert_eq!(style.get_property_value("overflow").unwrap(), "");
}

#[wasm_bindgen_test]
async fn sleep_advances_clock() {
    let host = BrowserHost::new().unwrap();
    let before = host.now();
    host.sleep(20).await;
    assert!(host.now() - before >= 15.0);
}

#[wasm_bindgen_test]
async fn toast_mounts_in_container() {
    let host = Rc::new(BrowserHost::new().unwrap());
    let container = fixture(&host, "notification-container");
    let config = NotificationConfig {
        enter_delay_ms: 0,
        display_ms: 0,
        fade_ms: 0,
    };
    let notifier = Notifier::new(host.clone(), config);

    let emitted = notifier.emit("Dashboard updated", NotificationKind::Success).await;

    assert!(emitted.is_ok());
    assert_eq!(container.child_element_count(), 0);
    container.remove();
}

#[wasm_bindgen_test]
fn listener_detaches_on_drop() {
    let host = BrowserHost::new().unwrap();
    let node = fixture(&host, "listener-target");
    let target: EventTarget = node.clone().unchecked_into();
    let hits = Rc::new(Cell::new(0));

    let counter = hits.clone();
    let listener = Listener::attach(&target, "click", move |_| counter.set(counter.get() + 1)).unwrap();
    let html: web_sys::HtmlElement = node.clone().unchecked_into();
    html.click();
    assert_eq!(hits.get(), 1);

    drop(listener);
    html.click();
    assert_eq!(hits.get(), 1);
    node.remove();
}

#[wasm_bindgen_test]
fn missing_config_block_gives_defaults() {
    let host = BrowserHost::new().unwrap();
    let loaded = config::load(host.document()).unwrap();
    assert_eq!(loaded, config::PageConfig::default());
}
