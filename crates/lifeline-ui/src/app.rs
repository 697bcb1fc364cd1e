//! Portal application
//!
//! Owns one instance of every UI component for the current page and maps
//! page lifecycle events onto them. Components are shared through `Rc` so
//! event handlers can hold them without a global.

use std::rc::Rc;

use tracing::{info, warn};

use crate::config::UiConfig;
use crate::dashboard::Dashboard;
use crate::error::UiResult;
use crate::host::Host;
use crate::notify::Notifier;
use crate::recovery::PasswordRecovery;
use crate::service::DataService;
use crate::sidebar::SidebarController;
use crate::transition::PageTransitions;

pub struct PortalApp<H: Host, S: DataService> {
    host: Rc<H>,
    config: UiConfig,
    transitions: Rc<PageTransitions<H>>,
    sidebar: Rc<SidebarController<H>>,
    notifier: Rc<Notifier<H>>,
    dashboard: Rc<Dashboard<H, S>>,
    recovery: Rc<PasswordRecovery<H, S>>,
}

impl<H: Host, S: DataService> PortalApp<H, S> {
    pub fn new(host: Rc<H>, service: Rc<S>, config: UiConfig) -> Self {
        let transitions = Rc::new(PageTransitions::new(
            host.clone(),
            config.transition.clone(),
        ));
        let sidebar = Rc::new(SidebarController::new(
            host.clone(),
            config.sidebar.clone(),
        ));
        let notifier = Rc::new(Notifier::new(
            host.clone(),
            config.notifications.clone(),
        ));
        let dashboard = Rc::new(Dashboard::new(
            host.clone(),
            service.clone(),
            notifier.clone(),
            config.counters.clone(),
        ));
        let recovery = Rc::new(PasswordRecovery::new(
            host.clone(),
            service,
            notifier.clone(),
            config.transition.busy_label.clone(),
        ));
        Self {
            host,
            config,
            transitions,
            sidebar,
            notifier,
            dashboard,
            recovery,
        }
    }

    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn transitions(&self) -> &Rc<PageTransitions<H>> {
        &self.transitions
    }

    pub fn sidebar(&self) -> &Rc<SidebarController<H>> {
        &self.sidebar
    }

    pub fn notifier(&self) -> &Rc<Notifier<H>> {
        &self.notifier
    }

    pub fn dashboard(&self) -> &Rc<Dashboard<H, S>> {
        &self.dashboard
    }

    pub fn recovery(&self) -> &Rc<PasswordRecovery<H, S>> {
        &self.recovery
    }

    // ========== Page Lifecycle ==========

    /// Document ready: lay out the sidebar, reveal the page and, on the
    /// dashboard, load its data alongside the entrance cascade.
    pub async fn on_ready(&self) -> UiResult<()> {
        info!(path = %self.host.current_path(), "portal ready");
        self.sidebar.apply()?;
        self.dashboard.mark_active_nav()?;

        if self.dashboard.is_present() {
            let (revealed, loaded) =
                futures::join!(self.transitions.animate_page_in(), self.dashboard.load());
            if let Err(err) = &loaded {
                warn!(error = %err, "dashboard load failed");
            }
            revealed?;
            loaded
        } else {
            self.transitions.animate_page_in().await
        }
    }

    /// `pageshow`: a page restored from the history cache is reset and revealed.
    pub async fn on_page_show(&self, persisted: bool) -> UiResult<()> {
        if persisted {
            self.transitions.restore().await
        } else {
            Ok(())
        }
    }

    /// `visibilitychange`
    pub fn on_visibility_change(&self, visible: bool) -> UiResult<()> {
        if visible {
            self.transitions.on_visible()
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;
    use crate::service::MockDataService;
    use futures::executor::block_on;

    fn app(host: &Rc<MemoryHost>) -> PortalApp<MemoryHost, MockDataService<MemoryHost>> {
        let service = Rc::new(MockDataService::new(host.clone()));
        PortalApp::new(host.clone(), service, UiConfig::default())
    }

    #[test]
    fn test_ready_reveals_plain_page() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body_ref();
        let header = host.create_element(&body, "header", None, &["page-transition"]);
        let main = host.create_element(&body, "main", None, &["page-transition"]);

        block_on(app(&host).on_ready()).unwrap();

        assert!(host.has_class(&header, "loaded"));
        assert!(host.has_class(&main, "loaded"));
    }

    #[test]
    fn test_ready_loads_dashboard() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body_ref();
        let root = host.create_element(&body, "section", Some("dashboard"), &["page-transition"]);
        let donors = host.create_element(&root, "span", Some("total-donors"), &[]);

        block_on(app(&host).on_ready()).unwrap();

        assert!(host.has_class(&root, "loaded"));
        assert_eq!(host.text(&donors), "2,847");
    }

    #[test]
    fn test_page_show_only_restores_persisted_pages() {
        let host = Rc::new(MemoryHost::new());
        let loader = host.create_element(&host.body_ref(), "div", Some("page-loader"), &["active"]);
        let app = app(&host);

        block_on(app.on_page_show(false)).unwrap();
        assert!(host.has_class(&loader, "active"));

        block_on(app.on_page_show(true)).unwrap();
        assert!(!host.has_class(&loader, "active"));
    }

    #[test]
    fn test_visibility_hides_stale_overlay() {
        let host = Rc::new(MemoryHost::new());
        let loader = host.create_element(&host.body_ref(), "div", Some("page-loader"), &["active"]);
        let app = app(&host);

        app.on_visibility_change(false).unwrap();
        assert!(host.has_class(&loader, "active"));

        app.on_visibility_change(true).unwrap();
        assert!(!host.has_class(&loader, "active"));
    }
}
