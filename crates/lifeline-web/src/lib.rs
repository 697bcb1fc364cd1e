//! Lifeline portal UI for the browser
//!
//! Binds the `lifeline-ui` core to the real page:
//! - [`BrowserHost`]: the core's [`Host`](lifeline_ui::Host) on top of `web-sys`
//! - [`events`]: click, submit, key, resize and lifecycle listeners
//! - [`config`]: optional JSON configuration block in the page
//! - [`logging`]: `tracing` output to the browser console
//!
//! JavaScript calls [`mount`] once the document is parsed and keeps the
//! returned [`Lifeline`] handle; [`Lifeline::dispose`] removes every listener.
//!
//! ```js
//! import init, { mount } from "./pkg/lifeline_web.js";
//! await init();
//! const lifeline = mount();
//! ```

pub mod config;
pub mod events;
pub mod host;
pub mod logging;

use std::rc::Rc;

use lifeline_ui::{MockDataService, NotificationKind, PortalApp};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

pub use host::BrowserHost;

use config::PageConfig;
use events::Listener;

/// The portal as wired in the browser
pub type WebApp = PortalApp<BrowserHost, MockDataService<BrowserHost>>;

/// Handle to a mounted portal
#[wasm_bindgen]
pub struct Lifeline {
    app: Rc<WebApp>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl Lifeline {
    /// Whether a page transition is running
    #[wasm_bindgen(js_name = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.app.transitions().is_transitioning()
    }

    /// Whether the sidebar is open
    #[wasm_bindgen(js_name = isSidebarOpen)]
    pub fn is_sidebar_open(&self) -> bool {
        self.app.sidebar().is_open()
    }

    #[wasm_bindgen(js_name = toggleSidebar)]
    pub fn toggle_sidebar(&self) -> Result<(), JsValue> {
        self.app
            .sidebar()
            .toggle()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Show a toast. `kind` is one of success, error, warning, info.
    pub fn notify(&self, message: String, kind: &str) {
        let kind = parse_kind(kind);
        let app = self.app.clone();
        spawn_local(async move {
            if let Err(err) = app.notifier().emit(&message, kind).await {
                warn!(error = %err, "notification failed");
            }
        });
    }

    /// Navigate with the exit animation, as a link click would.
    #[wasm_bindgen(js_name = transitionTo)]
    pub fn transition_to(&self, url: String) {
        let app = self.app.clone();
        spawn_local(async move {
            app.transitions().transition_to_page(&url).await;
        });
    }

    /// Remove every listener. The handle is inert afterwards.
    pub fn dispose(&mut self) {
        let count = self.listeners.len();
        for listener in self.listeners.drain(..) {
            debug!(kind = listener.kind(), "removing listener");
        }
        info!(count, "lifeline disposed");
    }
}

fn parse_kind(kind: &str) -> NotificationKind {
    match kind {
        "success" => NotificationKind::Success,
        "error" => NotificationKind::Error,
        "warning" => NotificationKind::Warning,
        _ => NotificationKind::Info,
    }
}

/// Set up the portal on the current page.
#[wasm_bindgen]
pub fn mount() -> Result<Lifeline, JsValue> {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    let host = Rc::new(BrowserHost::new()?);
    let loaded = config::load(host.document());
    let page = loaded.clone().unwrap_or_else(|_| PageConfig::default());
    logging::init(page.log_level.into());
    if let Err(err) = loaded {
        warn!(error = %err, "ignoring page configuration, using defaults");
    }

    let service = Rc::new(MockDataService::new(host.clone()));
    let app = Rc::new(PortalApp::new(host, service, page.ui));
    let listeners = events::install(&app)?;

    let ready = app.clone();
    spawn_local(async move {
        if let Err(err) = ready.on_ready().await {
            warn!(error = %err, "page setup incomplete");
        }
    });

    info!(listeners = listeners.len(), "lifeline mounted");
    Ok(Lifeline { app, listeners })
}
