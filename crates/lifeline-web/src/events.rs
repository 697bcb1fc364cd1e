//! DOM event wiring
//!
//! Every listener the portal registers is held as a [`Listener`]; dropping
//! it unregisters the callback and frees the closure. Handlers hold the app
//! through `Rc` and spawn async work with `spawn_local`.

use std::rc::Rc;

use lifeline_ui::dom::{ids, selectors};
use lifeline_ui::{InterceptDecision, LinkInfo, SubmitDecision, UiResult};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Element, Event, EventTarget, HtmlFormElement, HtmlInputElement, KeyboardEvent, MouseEvent,
    PageTransitionEvent,
};

use crate::WebApp;

const SUBMIT_CONTROL: &str = "button[type=submit], input[type=submit], button:not([type])";

/// A registered event listener, removed on drop
pub struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach<F>(target: &EventTarget, kind: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let removed = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
        if removed.is_err() {
            warn!(kind = self.kind, "could not remove event listener");
        }
    }
}

fn report(context: &'static str, result: UiResult<()>) {
    if let Err(err) = result {
        warn!(context, error = %err, "handler failed");
    }
}

fn closest(element: &Element, selector: &str) -> Option<Element> {
    element.closest(selector).ok().flatten()
}

/// Register every portal listener on the document and window.
pub fn install(app: &Rc<WebApp>) -> Result<Vec<Listener>, JsValue> {
    let window: EventTarget = app.host().window().clone().into();
    let document: EventTarget = app.host().document().clone().into();

    let mut listeners = Vec::with_capacity(6);

    let handler = app.clone();
    listeners.push(Listener::attach(&document, "click", move |event| {
        on_click(&handler, &event)
    })?);

    let handler = app.clone();
    listeners.push(Listener::attach(&document, "submit", move |event| {
        on_submit(&handler, &event)
    })?);

    let handler = app.clone();
    listeners.push(Listener::attach(&document, "keydown", move |event| {
        let escape = event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape");
        if escape {
            report("escape", handler.sidebar().on_escape());
        }
    })?);

    let handler = app.clone();
    listeners.push(Listener::attach(&window, "resize", move |_event| {
        report("resize", handler.sidebar().on_resize());
    })?);

    let handler = app.clone();
    listeners.push(Listener::attach(&window, "pageshow", move |event| {
        let persisted = event
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        if persisted {
            let app = handler.clone();
            spawn_local(async move {
                report("pageshow", app.on_page_show(true).await);
            });
        }
    })?);

    let handler = app.clone();
    listeners.push(Listener::attach(&document, "visibilitychange", move |_event| {
        let visible = !handler.host().document().hidden();
        report("visibilitychange", handler.on_visibility_change(visible));
    })?);

    debug!(count = listeners.len(), "event listeners installed");
    Ok(listeners)
}

// ========== Click ==========

fn on_click(app: &Rc<WebApp>, event: &Event) {
    let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return;
    };

    if closest(&target, &format!("#{}", ids::MENU_TOGGLE)).is_some() {
        report("menu toggle", app.sidebar().toggle());
        return;
    }
    if closest(&target, &format!("#{}", ids::SIDEBAR_CLOSE)).is_some() {
        report("sidebar close", app.sidebar().close());
        return;
    }
    if closest(&target, &format!("#{}", ids::SIDEBAR_OVERLAY)).is_some() {
        report("overlay", app.sidebar().on_overlay_click());
        return;
    }
    if closest(&target, selectors::NOTIFICATION_CLOSE).is_some() {
        if let Some(toast) = closest(&target, selectors::NOTIFICATION) {
            app.notifier().dismiss(&toast);
        }
        return;
    }
    if closest(&target, &format!("#{}", ids::REFRESH_DASHBOARD)).is_some() {
        event.prevent_default();
        let app = app.clone();
        spawn_local(async move {
            report("refresh", app.dashboard().refresh().await);
        });
        return;
    }

    let link = closest(&target, "a").map(|anchor| LinkInfo {
        href: anchor.get_attribute("href"),
        target: anchor.get_attribute("target"),
        modified: is_modified_click(event),
    });
    let decision = app.transitions().intercept(link.as_ref());
    if decision.prevents_default() {
        event.prevent_default();
    }
    if let InterceptDecision::Intercept(url) = decision {
        let app = app.clone();
        spawn_local(async move {
            app.transitions().transition_to_page(&url).await;
        });
    }
}

/// Modifier keys or a non-primary button ask for a new tab or window.
fn is_modified_click(event: &Event) -> bool {
    event.dyn_ref::<MouseEvent>().is_some_and(|mouse| {
        mouse.ctrl_key() || mouse.meta_key() || mouse.shift_key() || mouse.alt_key() || mouse.button() != 0
    })
}

// ========== Submit ==========

fn on_submit(app: &Rc<WebApp>, event: &Event) {
    let Some(form) = event
        .target()
        .and_then(|t| t.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };

    if form.id() == ids::RECOVERY_FORM {
        event.prevent_default();
        if app.transitions().is_transitioning() {
            debug!("recovery submission suppressed during transition");
            return;
        }
        let email = app
            .host()
            .document()
            .get_element_by_id(ids::RECOVERY_EMAIL)
            .and_then(|input| input.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default();
        let app = app.clone();
        spawn_local(async move {
            let outcome = app.recovery().submit(&email).await;
            report("password recovery", outcome.map(|outcome| debug!(?outcome, "recovery finished")));
        });
        return;
    }

    let button = form.query_selector(SUBMIT_CONTROL).ok().flatten();
    match app.transitions().begin_form_submit(button) {
        SubmitDecision::Suppress => event.prevent_default(),
        SubmitDecision::Proceed(Some(busy)) => {
            let app = app.clone();
            spawn_local(async move {
                app.transitions().restore_after_timeout(busy).await;
            });
        }
        SubmitDecision::Proceed(None) => {}
    }
}
