//! Settings loading from configuration files.
//!
//! This module provides functions to load [`Settings`] from TOML files, JSON
//! files, and to apply environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `TRACKWAY_DEBUG` | `debug` |
//! | `TRACKWAY_LOG_LEVEL` | `log_level` |
//! | `TRACKWAY_ROUTES_FILE` | `routes_file` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use trackway_core::settings_loader;
//!
//! // Load from TOML
//! let settings = settings_loader::from_toml_file("config/trackway.toml").unwrap();
//!
//! // Pick the format from the file extension, then apply the environment
//! let settings = settings_loader::load_file_with_env("config/trackway.json").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::TrackwayError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, TrackwayError> {
    // Go through serde_json::Value so that missing keys fall back to defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    merge_over_defaults(json_value, "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, TrackwayError> {
    let content = read_config(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, TrackwayError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, TrackwayError> {
    let content = read_config(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a file, choosing the format from its extension
/// (`.json` is JSON, anything else is TOML), then applies environment
/// variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file_with_env(path: impl AsRef<Path>) -> Result<Settings, TrackwayError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut settings = if is_json {
        from_json_file(path)?
    } else {
        from_toml_file(path)?
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// - `TRACKWAY_DEBUG` -> `debug` (values: "true"/"1"/"yes" => true, anything else => false)
/// - `TRACKWAY_LOG_LEVEL` -> `log_level`
/// - `TRACKWAY_ROUTES_FILE` -> `routes_file` (empty value clears it)
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("TRACKWAY_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Ok(val) = std::env::var("TRACKWAY_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("TRACKWAY_ROUTES_FILE") {
        settings.routes_file = if val.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(val))
        };
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, format: &str) -> Result<String, TrackwayError> {
    std::fs::read_to_string(path).map_err(|e| {
        TrackwayError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, TrackwayError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        TrackwayError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        TrackwayError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            debug = false
            log_level = "trackway_routing=trace"
            routes_file = "config/routes.toml"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "trackway_routing=trace");
        assert_eq!(
            settings.routes_file.as_deref(),
            Some(Path::new("config/routes.toml"))
        );
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert_eq!(settings.log_level, "info");
        assert!(settings.routes_file.is_none());
    }

    #[test]
    fn test_from_toml_str_ignores_unknown_keys() {
        let toml = r#"
            routes_file = "routes.toml"

            [extra]
            site_name = "blog"
        "#;
        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.routes_file(), Some(Path::new("routes.toml")));
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            serde_json::json!({ "debug": true, "log_level": "info", "routes_file": "routes.toml" })
        );
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("debug = [unclosed");
        assert!(matches!(result, Err(TrackwayError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("debug = \"sometimes\"");
        assert!(result.is_err());
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let settings = from_json_str(r#"{"debug": false, "routes_file": "routes.json"}"#).unwrap();
        assert!(!settings.debug);
        assert_eq!(settings.routes_file.as_deref(), Some(Path::new("routes.json")));
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackway.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_load_file_picks_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trackway.json");
        std::fs::write(&path, r#"{"log_level": "warn"}"#).unwrap();

        let settings = load_file_with_env(&path).unwrap();
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_missing_file() {
        let result = from_toml_file("/nonexistent/trackway.toml");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to read TOML file"));
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"a": {"x": 1, "y": 2}, "b": 3});
        let over = serde_json::json!({"a": {"y": 5}});
        let merged = merge_json(base, over);
        assert_eq!(merged, serde_json::json!({"a": {"x": 1, "y": 5}, "b": 3}));
    }

    #[test]
    fn test_toml_to_json_array() {
        let value: toml::Value = toml::from_str("list = [1, 2]").unwrap();
        let json = toml_to_json(value);
        assert_eq!(json, serde_json::json!({"list": [1, 2]}));
    }
}
