//! Settings for trackway.
//!
//! [`Settings`] holds the handful of knobs the router tooling needs: where the
//! route table lives and how to log. Settings are plain values passed to
//! whoever needs them; there is no process-wide instance.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The complete set of runtime settings.
///
/// # Examples
///
/// ```
/// use trackway_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.routes_file.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Controls the log format.
    pub debug: bool,
    /// The log level or `EnvFilter` directive.
    pub log_level: String,
    /// Path to the routes file (TOML or JSON) describing the route table.
    pub routes_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            routes_file: None,
        }
    }
}

impl Settings {
    /// Returns the routes file path, if one is configured.
    pub fn routes_file(&self) -> Option<&std::path::Path> {
        self.routes_file.as_deref()
    }
}
