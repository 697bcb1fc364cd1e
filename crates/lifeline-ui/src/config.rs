//! UI configuration
//!
//! Every timing, breakpoint and label used by the core lives here. All fields
//! have defaults so a partial JSON document (or none at all) is valid input.

use serde::{Deserialize, Serialize};

use crate::error::{UiError, UiResult};
use crate::transition::Easing;

/// Default page exit animation duration in milliseconds
pub const TRANSITION_DURATION_MS: u32 = 300;

/// Default per-element stagger for the entrance cascade in milliseconds
pub const STAGGER_MS: u32 = 100;

/// Default viewport width (px) at which the sidebar stops overlaying content
pub const SIDEBAR_BREAKPOINT_PX: f64 = 768.0;

/// Top-level configuration for the portal UI
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub transition: TransitionConfig,
    pub sidebar: SidebarConfig,
    pub notifications: NotificationConfig,
    pub counters: CounterConfig,
}

impl UiConfig {
    /// Parse a configuration document and validate it.
    pub fn from_json(json: &str) -> UiResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| UiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the UI cannot work with.
    pub fn validate(&self) -> UiResult<()> {
        if !self.sidebar.breakpoint_px.is_finite() || self.sidebar.breakpoint_px <= 0.0 {
            return Err(UiError::Config(
                "sidebar.breakpoint_px must be positive".to_string(),
            ));
        }
        if self.counters.duration_ms == 0 {
            return Err(UiError::Config(
                "counters.duration_ms must be non-zero".to_string(),
            ));
        }
        if self.transition.busy_label.trim().is_empty() {
            return Err(UiError::Config(
                "transition.busy_label must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Page transition timings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Exit animation wait before navigating
    pub duration_ms: u32,
    /// Delay between consecutive elements of the entrance cascade
    pub stagger_ms: u32,
    /// Fallback restore delay for native form posts
    pub form_restore_ms: u32,
    /// Submit button label while a submission is in flight
    pub busy_label: String,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: TRANSITION_DURATION_MS,
            stagger_ms: STAGGER_MS,
            form_restore_ms: 2000,
            busy_label: "Processing...".to_string(),
        }
    }
}

/// Sidebar layout settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarConfig {
    pub breakpoint_px: f64,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: SIDEBAR_BREAKPOINT_PX,
        }
    }
}

/// Toast lifecycle timings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Delay between mounting and sliding in
    pub enter_delay_ms: u32,
    /// Time fully visible
    pub display_ms: u32,
    /// Slide-out time before removal
    pub fade_ms: u32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enter_delay_ms: 100,
            display_ms: 4000,
            fade_ms: 300,
        }
    }
}

/// Metric counter animation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            easing: Easing::Linear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UiConfig::default();
        assert_eq!(config.transition.duration_ms, 300);
        assert_eq!(config.transition.stagger_ms, 100);
        assert_eq!(config.transition.busy_label, "Processing...");
        assert_eq!(config.sidebar.breakpoint_px, 768.0);
        assert_eq!(config.notifications.display_ms, 4000);
        assert_eq!(config.notifications.fade_ms, 300);
        assert_eq!(config.counters.duration_ms, 2000);
        assert_eq!(config.counters.easing, Easing::Linear);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = UiConfig::from_json(
            r#"{"transition": {"duration_ms": 450}, "counters": {"easing": "ease_out_cubic"}}"#,
        )
        .unwrap();
        assert_eq!(config.transition.duration_ms, 450);
        assert_eq!(config.transition.stagger_ms, 100);
        assert_eq!(config.counters.easing, Easing::EaseOutCubic);
        assert_eq!(config.sidebar, SidebarConfig::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(UiConfig::from_json("{}").unwrap(), UiConfig::default());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = UiConfig::from_json(r#"{"sidebar": {"breakpoint_px": 0}}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));

        let err = UiConfig::from_json(r#"{"counters": {"duration_ms": 0}}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));

        let err = UiConfig::from_json(r#"{"transition": {"busy_label": "  "}}"#).unwrap_err();
        assert!(matches!(err, UiError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = UiConfig::from_json("{transition").unwrap_err();
        assert!(matches!(err, UiError::Config(_)));
    }
}
