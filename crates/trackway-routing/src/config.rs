//! Loading a route table from a routes file.
//!
//! Routes are declared in order, one `[[routes]]` entry each:
//!
//! ```toml
//! [[routes]]
//! name = "archive"
//! pattern = "blog/$year/$month/$day"
//! optional = ["month", "day"]
//!
//! [routes.defaults]
//! controller = "blog"
//! action = "archive"
//!
//! [routes.requirements]
//! year = '(19|20)\d\d'
//!
//! [[routes]]
//! pattern = "$controller/$action/$id"
//! optional = ["id"]
//! defaults = { action = "index" }
//! ```
//!
//! TOML has no null, so `optional` lists the placeholders whose default is
//! [`ParamValue::Null`]. JSON files may write `null` defaults directly and
//! may use `optional` as well. Every loader returns a sealed [`RouteSet`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use trackway_core::{TrackwayError, TrackwayResult};

use crate::params::{ParamValue, Params, Requirements};
use crate::route_set::RouteSet;

/// One route declaration in a routes file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDecl {
    /// Name the route can be generated by.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The route pattern.
    pub pattern: String,
    /// Placeholders that default to `Null`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub optional: Vec<String>,
    /// Default values, including route-level fixed parameters.
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub defaults: Params,
    /// Requirement regexes by placeholder name.
    #[serde(default, skip_serializing_if = "Requirements::is_empty")]
    pub requirements: Requirements,
}

impl RouteDecl {
    /// Folds `optional` into the defaults map.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ConfigurationError`] if a key is listed as
    /// optional and also given a non-null default.
    pub fn resolved_defaults(&self) -> TrackwayResult<Params> {
        let mut defaults = self.defaults.clone();
        for key in &self.optional {
            match defaults.get(key) {
                Some(value) if !value.is_null() => {
                    return Err(TrackwayError::ConfigurationError(format!(
                        "'{key}' is listed as optional but also has the default {value:?}"
                    )));
                }
                _ => {
                    defaults.insert(key.clone(), ParamValue::Null);
                }
            }
        }
        Ok(defaults)
    }
}

/// The top-level layout of a routes file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesFile {
    /// Declarations in precedence order.
    #[serde(default)]
    pub routes: Vec<RouteDecl>,
}

impl RoutesFile {
    /// Connects every declaration, in order, and seals the result.
    ///
    /// # Errors
    ///
    /// Returns the first failing declaration's error, prefixed with its
    /// 1-based position and pattern.
    pub fn into_route_set(self) -> TrackwayResult<RouteSet> {
        let mut routes = RouteSet::new();
        for (position, decl) in self.routes.iter().enumerate() {
            connect_decl(&mut routes, decl).map_err(|e| locate(position + 1, &decl.pattern, e))?;
        }
        routes.seal();
        Ok(routes)
    }
}

fn connect_decl(routes: &mut RouteSet, decl: &RouteDecl) -> TrackwayResult<()> {
    let defaults = decl.resolved_defaults()?;
    match &decl.name {
        Some(name) => routes.connect_named(name, &decl.pattern, defaults, &decl.requirements)?,
        None => routes.connect(&decl.pattern, defaults, &decl.requirements)?,
    };
    Ok(())
}

/// Keeps the error kind and adds where in the file it came from.
fn locate(position: usize, pattern: &str, error: TrackwayError) -> TrackwayError {
    let context = format!("route #{position} ('{pattern}')");
    match error {
        TrackwayError::ImproperlyConfigured(msg) => {
            TrackwayError::ImproperlyConfigured(format!("{context}: {msg}"))
        }
        other => TrackwayError::ConfigurationError(format!("{context}: {other}")),
    }
}

/// Loads a route table from a TOML string.
///
/// # Errors
///
/// Returns [`TrackwayError::ConfigurationError`] if the TOML is malformed, and
/// the error of the first route that fails to connect otherwise.
pub fn from_toml_str(toml_str: &str) -> TrackwayResult<RouteSet> {
    let file: RoutesFile = toml::from_str(toml_str)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to parse routes TOML: {e}")))?;
    file.into_route_set()
}

/// Loads a route table from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are invalid.
pub fn from_toml_file(path: impl AsRef<Path>) -> TrackwayResult<RouteSet> {
    let path = path.as_ref();
    let routes = from_toml_str(&read_routes(path, "TOML")?)?;
    info!(path = %path.display(), routes = routes.len(), "Loaded routes file");
    Ok(routes)
}

/// Loads a route table from a JSON string.
///
/// # Errors
///
/// Returns [`TrackwayError::ConfigurationError`] if the JSON is malformed, and
/// the error of the first route that fails to connect otherwise.
pub fn from_json_str(json_str: &str) -> TrackwayResult<RouteSet> {
    let file: RoutesFile = serde_json::from_str(json_str)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to parse routes JSON: {e}")))?;
    file.into_route_set()
}

/// Loads a route table from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are invalid.
pub fn from_json_file(path: impl AsRef<Path>) -> TrackwayResult<RouteSet> {
    let path = path.as_ref();
    let routes = from_json_str(&read_routes(path, "JSON")?)?;
    info!(path = %path.display(), routes = routes.len(), "Loaded routes file");
    Ok(routes)
}

/// Loads a route table, choosing JSON for `.json` files and TOML otherwise.
///
/// # Errors
///
/// Returns an error if the file cannot be read or its contents are invalid.
pub fn load_file(path: impl AsRef<Path>) -> TrackwayResult<RouteSet> {
    let path = path.as_ref();
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        from_json_file(path)
    } else {
        from_toml_file(path)
    }
}

fn read_routes(path: &Path, format: &str) -> TrackwayResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        TrackwayError::ConfigurationError(format!(
            "Failed to read {format} routes file '{}': {e}",
            path.display()
        ))
    })
}
