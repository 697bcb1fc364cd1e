//! Submit button busy state

use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;

use crate::dom::classes;
use crate::error::UiResult;
use crate::host::Host;

/// A submit control switched into its busy state.
///
/// Holds the original label so [`BusyButton::restore`] can put it back.
/// Restoring twice is a no-op.
pub struct BusyButton<H: Host> {
    host: Rc<H>,
    node: H::Node,
    original_label: String,
    restored: Cell<bool>,
}

impl<H: Host> BusyButton<H> {
    /// Disable `node` and swap its label for `busy_label`.
    ///
    /// If any step fails the control is put back the way it was before the
    /// error is returned.
    pub fn engage(host: Rc<H>, node: H::Node, busy_label: &str) -> UiResult<Self> {
        let busy = Self {
            original_label: host.text(&node),
            host,
            node,
            restored: Cell::new(false),
        };
        if let Err(err) = busy.apply(busy_label) {
            if let Err(rollback) = busy.restore() {
                warn!(error = %rollback, "could not roll back submit button");
            }
            return Err(err);
        }
        Ok(busy)
    }

    fn apply(&self, busy_label: &str) -> UiResult<()> {
        self.host.set_attribute(&self.node, "disabled", "")?;
        self.host.add_class(&self.node, classes::LOADING)?;
        self.host.set_text(&self.node, busy_label)
    }

    /// Re-enable the control and restore its label.
    ///
    /// Every step is attempted; the first error is returned.
    pub fn restore(&self) -> UiResult<()> {
        if self.restored.replace(true) {
            return Ok(());
        }
        let label = self.host.set_text(&self.node, &self.original_label);
        let class = self.host.remove_class(&self.node, classes::LOADING);
        let enabled = self.host.remove_attribute(&self.node, "disabled");
        label.and(class).and(enabled)
    }

    pub fn original_label(&self) -> &str {
        &self.original_label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn test_engage_and_restore() {
        let host = Rc::new(MemoryHost::new());
        let button = host.create_element(&host.body_ref(), "button", Some("reset-button"), &[]);
        host.set_text(&button, "Send Reset Link").unwrap();

        let busy = BusyButton::engage(host.clone(), button, "Processing...").unwrap();
        assert_eq!(host.text(&button), "Processing...");
        assert_eq!(host.attribute(&button, "disabled"), Some(String::new()));
        assert!(host.has_class(&button, "loading"));
        assert_eq!(busy.original_label(), "Send Reset Link");

        busy.restore().unwrap();
        busy.restore().unwrap();
        assert_eq!(host.text(&button), "Send Reset Link");
        assert_eq!(host.attribute(&button, "disabled"), None);
        assert!(!host.has_class(&button, "loading"));
    }

    #[test]
    fn test_failed_engage_leaves_button_usable() {
        let host = Rc::new(MemoryHost::new());
        let button = host.create_element(&host.body_ref(), "button", None, &[]);
        host.set_text(&button, "Save").unwrap();
        host.poison_op(&button, "set_text");

        assert!(BusyButton::engage(host.clone(), button, "Processing...").is_err());
        assert_eq!(host.attribute(&button, "disabled"), None);
        assert!(!host.has_class(&button, "loading"));
        assert_eq!(host.text(&button), "Save");
    }
}
