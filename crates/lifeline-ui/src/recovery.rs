//! Password recovery form
//!
//! Validates the address locally, then asks the [`DataService`] to send
//! reset instructions. The submit button stays busy exactly as long as the
//! request is outstanding.

use std::rc::Rc;

use tracing::{info, warn};

use crate::dom::{classes, ids};
use crate::error::{ServiceError, UiResult, ValidationError};
use crate::host::Host;
use crate::notify::{NotificationKind, Notifier};
use crate::service::{DataService, ResetConfirmation};
use crate::transition::BusyButton;

/// Check an address the way the form does before submitting it.
///
/// Accepts `local@domain.tld` with no whitespace and a single `@`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Empty);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::Malformed);
    }
    let (local, domain) = email.split_once('@').ok_or(ValidationError::Malformed)?;
    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::Malformed);
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) if !name.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(ValidationError::Malformed),
    }
}

/// How a recovery submission ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// Refused before reaching the service
    Invalid(ValidationError),
    /// The service refused; message shown to the user
    Rejected(String),
    /// Instructions sent
    Sent(ResetConfirmation),
}

pub struct PasswordRecovery<H: Host, S: DataService> {
    host: Rc<H>,
    service: Rc<S>,
    notifier: Rc<Notifier<H>>,
    busy_label: String,
}

impl<H: Host, S: DataService> PasswordRecovery<H, S> {
    pub fn new(
        host: Rc<H>,
        service: Rc<S>,
        notifier: Rc<Notifier<H>>,
        busy_label: impl Into<String>,
    ) -> Self {
        Self {
            host,
            service,
            notifier,
            busy_label: busy_label.into(),
        }
    }

    /// Run one submission for `email`.
    pub async fn submit(&self, email: &str) -> UiResult<RecoveryOutcome> {
        let email = email.trim();
        self.clear_messages()?;

        if let Err(invalid) = validate_email(email) {
            self.show_error(&invalid.to_string())?;
            return Ok(RecoveryOutcome::Invalid(invalid));
        }

        let busy = match self.host.element_by_id(ids::RECOVERY_SUBMIT) {
            Some(button) => Some(BusyButton::engage(
                self.host.clone(),
                button,
                &self.busy_label,
            )?),
            None => None,
        };
        let response = self.service.reset_password(email).await;
        if let Some(busy) = &busy {
            busy.restore()?;
        }

        match response {
            Ok(confirmation) => {
                info!(email, "password reset instructions sent");
                self.show_success(&confirmation.message)?;
                self.notifier
                    .emit("Reset link sent", NotificationKind::Success)
                    .await?;
                Ok(RecoveryOutcome::Sent(confirmation))
            }
            Err(err) => {
                if err == ServiceError::Unavailable {
                    warn!(email, "password reset service unavailable");
                } else {
                    info!(email, error = %err, "password reset rejected");
                }
                let message = err.to_string();
                self.show_error(&message)?;
                Ok(RecoveryOutcome::Rejected(message))
            }
        }
    }

    // ========== Message Surfaces ==========

    fn clear_messages(&self) -> UiResult<()> {
        for id in [ids::ERROR_MESSAGE, ids::SUCCESS_MESSAGE] {
            if let Some(surface) = self.host.element_by_id(id) {
                self.host.add_class(&surface, classes::HIDDEN)?;
            }
        }
        Ok(())
    }

    fn show_error(&self, message: &str) -> UiResult<()> {
        if let Some(surface) = self.host.element_by_id(ids::ERROR_MESSAGE) {
            self.host.set_text(&surface, message)?;
            self.host.remove_class(&surface, classes::HIDDEN)?;
        }
        Ok(())
    }

    fn show_success(&self, message: &str) -> UiResult<()> {
        if let Some(form) = self.host.element_by_id(ids::RECOVERY_FORM) {
            self.host.add_class(&form, classes::HIDDEN)?;
        }
        if let Some(surface) = self.host.element_by_id(ids::SUCCESS_MESSAGE) {
            self.host.set_text(&surface, message)?;
            self.host.remove_class(&surface, classes::HIDDEN)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::memory::{HostEvent, MemoryHost, NodeRef};
    use crate::service::MockDataService;
    use futures::executor::block_on;

    struct Page {
        host: Rc<MemoryHost>,
        form: NodeRef,
        button: NodeRef,
        error: NodeRef,
        success: NodeRef,
        recovery: PasswordRecovery<MemoryHost, MockDataService<MemoryHost>>,
    }

    fn page() -> Page {
        let host = Rc::new(MemoryHost::new());
        let body = host.body_ref();
        let form = host.create_element(&body, "form", Some("forgot-password-form"), &[]);
        host.create_element(&form, "input", Some("email"), &[]);
        let button = host.create_element(&form, "button", Some("reset-button"), &[]);
        host.set_text(&button, "Send Reset Link").unwrap();
        let error = host.create_element(&body, "div", Some("error-message"), &["hidden"]);
        let success = host.create_element(&body, "div", Some("success-message"), &["hidden"]);

        let service = Rc::new(MockDataService::new(host.clone()));
        let notifier = Rc::new(Notifier::new(host.clone(), NotificationConfig::default()));
        let recovery = PasswordRecovery::new(host.clone(), service, notifier, "Sending...");
        Page {
            host,
            form,
            button,
            error,
            success,
            recovery,
        }
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(""), Err(ValidationError::Empty));
        assert_eq!(validate_email("   "), Err(ValidationError::Empty));
        for bad in ["user", "user@", "@example.com", "user@example", "a b@c.d", "a@b@c.d", "u@.com", "u@x."] {
            assert_eq!(validate_email(bad), Err(ValidationError::Malformed), "{}", bad);
        }
        assert_eq!(validate_email("user@example.com"), Ok(()));
        assert_eq!(validate_email(" user@mail.example.org "), Ok(()));
    }

    #[test]
    fn test_empty_address_never_reaches_service() {
        let page = page();
        let outcome = block_on(page.recovery.submit("")).unwrap();

        assert_eq!(outcome, RecoveryOutcome::Invalid(ValidationError::Empty));
        assert_eq!(page.host.text(&page.error), "Please enter your email address.");
        assert!(!page.host.has_class(&page.error, "hidden"));
        // No service latency was waited out
        assert!(!page
            .host
            .journal()
            .iter()
            .any(|e| matches!(e, HostEvent::Slept(_))));
    }

    #[test]
    fn test_unknown_address_is_rejected() {
        let page = page();
        let outcome = block_on(page.recovery.submit("test@invalid.com")).unwrap();

        assert_eq!(
            outcome,
            RecoveryOutcome::Rejected("Email address not found in our system.".to_string())
        );
        assert_eq!(
            page.host.text(&page.error),
            "Email address not found in our system."
        );
        assert!(!page.host.has_class(&page.form, "hidden"));
        assert_eq!(page.host.text(&page.button), "Send Reset Link");
        assert_eq!(page.host.attribute(&page.button, "disabled"), None);
    }

    #[test]
    fn test_known_address_succeeds() {
        let page = page();
        let outcome = block_on(page.recovery.submit("user@example.com")).unwrap();

        assert!(matches!(outcome, RecoveryOutcome::Sent(ref c) if c.email == "user@example.com"));
        assert!(page.host.has_class(&page.form, "hidden"));
        assert!(!page.host.has_class(&page.success, "hidden"));
        assert!(page.host.text(&page.success).contains("user@example.com"));
        assert!(page.host.has_class(&page.error, "hidden"));
        assert!(!page.host.has_class(&page.button, "loading"));
    }

    #[test]
    fn test_busy_state_failure_keeps_form_editable() {
        let page = page();
        page.host.poison_op(&page.button, "set_text");

        assert!(block_on(page.recovery.submit("user@example.com")).is_err());
        assert_eq!(page.host.attribute(&page.button, "disabled"), None);
        assert!(!page.host.has_class(&page.button, "loading"));
        assert!(!page.host.has_class(&page.form, "hidden"));
    }
}
