//! Page configuration
//!
//! Read from an optional JSON block in the page:
//!
//! ```html
//! <script type="application/json" id="lifeline-config">
//!   { "log_level": "debug", "transition": { "duration_ms": 200 } }
//! </script>
//! ```

use lifeline_ui::dom::ids;
use lifeline_ui::{UiConfig, UiError, UiResult};
use serde::Deserialize;
use tracing::Level;
use web_sys::Document;

/// Console log verbosity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// UI settings plus the web-only knobs
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub log_level: LogLevel,
    #[serde(flatten)]
    pub ui: UiConfig,
}

impl PageConfig {
    pub fn from_json(json: &str) -> UiResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| UiError::Config(e.to_string()))?;
        config.ui.validate()?;
        Ok(config)
    }
}

/// Load the page configuration. A page without a config block gets defaults.
pub fn load(document: &Document) -> UiResult<PageConfig> {
    match document.get_element_by_id(ids::CONFIG) {
        Some(element) => PageConfig::from_json(&element.text_content().unwrap_or_default()),
        None => Ok(PageConfig::default()),
    }
}
