//! Responsive sidebar controller
//!
//! The sidebar has one piece of state, `open`. How an open sidebar looks
//! depends on the viewport: below the breakpoint it overlays the page with a
//! dimming layer and locks scrolling; at or above it the main content shifts
//! aside instead. Resizing re-derives the look without touching `open`.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::config::SidebarConfig;
use crate::dom::{classes, ids};
use crate::error::UiResult;
use crate::host::Host;

/// Sidebar state owned by the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SidebarState {
    pub open: bool,
}

/// How the sidebar is presented
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SidebarMode {
    Closed,
    /// Narrow viewport: overlay visible, page scroll locked
    Overlay,
    /// Wide viewport: main content shifted, no overlay
    Shifted,
}

impl SidebarMode {
    /// Derive the presentation for a state at a viewport width.
    pub fn derive(open: bool, viewport_width: f64, breakpoint_px: f64) -> Self {
        match (open, viewport_width >= breakpoint_px) {
            (false, _) => SidebarMode::Closed,
            (true, false) => SidebarMode::Overlay,
            (true, true) => SidebarMode::Shifted,
        }
    }
}

/// Sidebar open/closed state machine bound to the page.
pub struct SidebarController<H: Host> {
    host: Rc<H>,
    config: SidebarConfig,
    state: Cell<SidebarState>,
}

impl<H: Host> SidebarController<H> {
    pub fn new(host: Rc<H>, config: SidebarConfig) -> Self {
        Self {
            host,
            config,
            state: Cell::new(SidebarState::default()),
        }
    }

    pub fn state(&self) -> SidebarState {
        self.state.get()
    }

    pub fn is_open(&self) -> bool {
        self.state.get().open
    }

    /// Presentation for the current state and viewport.
    pub fn mode(&self) -> SidebarMode {
        SidebarMode::derive(
            self.is_open(),
            self.host.viewport_width(),
            self.config.breakpoint_px,
        )
    }

    // ========== Triggers ==========

    /// Menu button.
    pub fn toggle(&self) -> UiResult<()> {
        self.set_open(!self.is_open())
    }

    pub fn open(&self) -> UiResult<()> {
        self.set_open(true)
    }

    /// Close button.
    pub fn close(&self) -> UiResult<()> {
        self.set_open(false)
    }

    /// Click on the dimming overlay.
    pub fn on_overlay_click(&self) -> UiResult<()> {
        self.close()
    }

    // ========== Reconciliation ==========

    /// Escape closes an open sidebar and does nothing otherwise.
    pub fn on_escape(&self) -> UiResult<()> {
        if self.is_open() {
            self.close()
        } else {
            Ok(())
        }
    }

    /// Viewport resized: re-apply the presentation, keep the state.
    pub fn on_resize(&self) -> UiResult<()> {
        self.apply()
    }

    fn set_open(&self, open: bool) -> UiResult<()> {
        self.state.set(SidebarState { open });
        debug!(open, "sidebar state changed");
        self.apply()
    }

    /// Push the current presentation to the page. Missing elements are skipped.
    pub fn apply(&self) -> UiResult<()> {
        let mode = self.mode();
        let host = &*self.host;

        if let Some(sidebar) = host.element_by_id(ids::SIDEBAR) {
            toggle_class(host, &sidebar, classes::OPEN, mode != SidebarMode::Closed)?;
        }
        if let Some(overlay) = host.element_by_id(ids::SIDEBAR_OVERLAY) {
            let visible = mode == SidebarMode::Overlay;
            toggle_class(host, &overlay, classes::ACTIVE, visible)?;
            toggle_class(host, &overlay, classes::HIDDEN, !visible)?;
        }
        if let Some(main) = host.element_by_id(ids::MAIN_CONTENT) {
            toggle_class(host, &main, classes::SIDEBAR_OPEN, mode == SidebarMode::Shifted)?;
        }
        if let Some(body) = host.body() {
            let overflow = if mode == SidebarMode::Overlay { "hidden" } else { "" };
            host.set_style(&body, "overflow", overflow)?;
        }
        Ok(())
    }
}

fn toggle_class<H: Host>(host: &H, node: &H::Node, class: &str, on: bool) -> UiResult<()> {
    if on {
        host.add_class(node, class)
    } else {
        host.remove_class(node, class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_mode_derivation() {
        assert_eq!(SidebarMode::derive(false, 500.0, 768.0), SidebarMode::Closed);
        assert_eq!(SidebarMode::derive(false, 900.0, 768.0), SidebarMode::Closed);
        assert_eq!(SidebarMode::derive(true, 500.0, 768.0), SidebarMode::Overlay);
        assert_eq!(SidebarMode::derive(true, 768.0, 768.0), SidebarMode::Shifted);
        assert_eq!(SidebarMode::derive(true, 900.0, 768.0), SidebarMode::Shifted);
    }

    #[test]
    fn test_toggle_without_markup_is_silent() {
        let host = Rc::new(MemoryHost::new());
        let sidebar = SidebarController::new(host, SidebarConfig::default());
        sidebar.toggle().unwrap();
        assert!(sidebar.is_open());
        sidebar.toggle().unwrap();
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_escape_only_closes() {
        let host = Rc::new(MemoryHost::new());
        let sidebar = SidebarController::new(host, SidebarConfig::default());
        sidebar.on_escape().unwrap();
        assert!(!sidebar.is_open());

        sidebar.open().unwrap();
        sidebar.on_escape().unwrap();
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_close_and_overlay_click_release_narrow_viewport() {
        let host = Rc::new(MemoryHost::new());
        let body = host.body_ref();
        let panel = host.create_element(&body, "nav", Some("sidebar"), &[]);
        let overlay = host.create_element(&body, "div", Some("sidebar-overlay"), &["hidden"]);
        host.set_viewport_width(500.0);
        let sidebar = SidebarController::new(host.clone(), SidebarConfig::default());

        let triggers: [fn(&SidebarController<MemoryHost>) -> UiResult<()>; 2] = [
            SidebarController::<MemoryHost>::close,
            SidebarController::<MemoryHost>::on_overlay_click,
        ];
        for dismiss in triggers {
            sidebar.open().unwrap();
            assert!(host.has_class(&overlay, "active"));
            assert_eq!(host.style(&body, "overflow").as_deref(), Some("hidden"));

            dismiss(&sidebar).unwrap();
            assert!(!sidebar.is_open());
            assert!(!host.has_class(&panel, "open"));
            assert!(!host.has_class(&overlay, "active"));
            assert!(host.has_class(&overlay, "hidden"));
            assert_eq!(host.style(&body, "overflow"), None);
        }
    }
}
