//! Toast notifications
//!
//! Each call to [`Notifier::emit`] owns one toast from creation to removal.
//! Toasts share nothing, so any number can be on screen at once; each one is
//! its own future and the caller decides how to drive it.

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::NotificationConfig;
use crate::dom::{classes, ids};
use crate::error::UiResult;
use crate::host::Host;

/// Toast flavor
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
        }
    }
}

/// A toast as it was emitted
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    /// Host clock at creation (ms)
    pub created_at: f64,
}

/// Creates toasts and runs their lifecycle.
pub struct Notifier<H: Host> {
    host: Rc<H>,
    config: NotificationConfig,
}

impl<H: Host> Notifier<H> {
    pub fn new(host: Rc<H>, config: NotificationConfig) -> Self {
        Self { host, config }
    }

    /// Show a toast and run it to completion.
    ///
    /// The element is mounted hidden, slides in after `enter_delay_ms`, stays
    /// for `display_ms`, slides out for `fade_ms` and is removed. The future
    /// resolves once the element is gone.
    pub async fn emit(&self, message: &str, kind: NotificationKind) -> UiResult<Notification> {
        let notification = Notification {
            kind,
            message: message.to_string(),
            created_at: self.host.now(),
        };
        info!(kind = kind.as_str(), message, "notification");

        let Some(node) = self.mount(&notification)? else {
            return Ok(notification);
        };

        self.host.sleep(self.config.enter_delay_ms).await;
        self.host.add_class(&node, classes::SHOW)?;

        self.host.sleep(self.config.display_ms).await;
        self.host.remove_class(&node, classes::SHOW)?;

        self.host.sleep(self.config.fade_ms).await;
        self.host.remove(&node);
        debug!(message, "notification removed");
        Ok(notification)
    }

    /// Remove a toast before its lifecycle ends (close button).
    pub fn dismiss(&self, node: &H::Node) {
        self.host.remove(node);
    }

    fn mount(&self, notification: &Notification) -> UiResult<Option<H::Node>> {
        let container = self
            .host
            .element_by_id(ids::NOTIFICATION_CONTAINER)
            .or_else(|| self.host.body());
        let Some(container) = container else {
            return Ok(None);
        };

        let class = format!("notification notification-{}", notification.kind.as_str());
        let node = self.host.append_element(&container, "div", &class)?;
        let message = self.host.append_element(&node, "span", "notification-message")?;
        self.host.set_text(&message, &notification.message)?;
        let close = self.host.append_element(&node, "button", "notification-close")?;
        self.host.set_attribute(&close, "type", "button")?;
        self.host.set_attribute(&close, "aria-label", "Dismiss")?;
        self.host.set_text(&close, "\u{00d7}")?;
        Ok(Some(node))
    }
}
