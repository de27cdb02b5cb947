//! The ordered route table.
//!
//! A [`RouteSet`] is filled during application bootstrap with
//! [`connect`](RouteSet::connect) and then shared read-only. Both directions
//! scan routes in registration order and the first route that applies
//! wins. A route that does not apply is skipped silently; only running out
//! of routes is an error.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use trackway_core::logging::routing_span;
use trackway_core::{TrackwayError, TrackwayResult};

use crate::params::{Params, Requirements};
use crate::route::Route;

/// The result of recognizing a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Parameters extracted from the path, with defaults filled in.
    pub params: Params,
    /// Position of the matched route in the table.
    pub index: usize,
    /// The matched route's name, if it was connected with one.
    pub name: Option<&'a str>,
    /// The matched route's pattern.
    pub pattern: &'a str,
}

/// An ordered collection of routes, optionally named.
///
/// # Examples
///
/// ```
/// use trackway_routing::{params, requirements, ParamValue, RouteSet};
///
/// let mut routes = RouteSet::new();
/// routes
///     .connect_named(
///         "archive",
///         "blog/$year/$month/$day",
///         params! {
///             "controller" => "blog",
///             "action" => "archive",
///             "month" => ParamValue::Null,
///             "day" => ParamValue::Null,
///         },
///         &requirements! { "year" => r"(19|20)\d\d" },
///     )
///     .unwrap();
/// routes
///     .connect(
///         "$controller/$action/$id",
///         params! { "action" => "index", "id" => ParamValue::Null },
///         &requirements! {},
///     )
///     .unwrap();
/// routes.seal();
///
/// let found = routes.recognize("blog/2004").unwrap();
/// assert_eq!(found.name, Some("archive"));
/// assert_eq!(found.params["year"], ParamValue::Int(2004));
///
/// let url = routes
///     .url_for(&found.params, &params! { "month" => 12 }, &params! {})
///     .unwrap();
/// assert_eq!(url, "blog/2004/12");
/// ```
#[derive(Debug, Default)]
pub struct RouteSet {
    routes: Vec<Route>,
    names: Vec<Option<String>>,
    by_name: HashMap<String, usize>,
    sealed: bool,
}

impl RouteSet {
    /// Creates an empty, unsealed route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and appends an unnamed route.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ImproperlyConfigured`] if the pattern does not
    /// compile or the table is sealed.
    pub fn connect(
        &mut self,
        pattern: &str,
        defaults: Params,
        requirements: &Requirements,
    ) -> TrackwayResult<&Route> {
        self.push(None, pattern, defaults, requirements)
    }

    /// Compiles and appends a route that can also be addressed by `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ImproperlyConfigured`] if the pattern does not
    /// compile, the name is already taken or the table is sealed.
    pub fn connect_named(
        &mut self,
        name: &str,
        pattern: &str,
        defaults: Params,
        requirements: &Requirements,
    ) -> TrackwayResult<&Route> {
        if self.by_name.contains_key(name) {
            return Err(TrackwayError::ImproperlyConfigured(format!(
                "Route name '{name}' is already in use"
            )));
        }
        self.push(Some(name), pattern, defaults, requirements)
    }

    fn push(
        &mut self,
        name: Option<&str>,
        pattern: &str,
        defaults: Params,
        requirements: &Requirements,
    ) -> TrackwayResult<&Route> {
        if self.sealed {
            return Err(TrackwayError::ImproperlyConfigured(format!(
                "Cannot connect route '{pattern}': the route table is sealed"
            )));
        }

        let route = Route::new(pattern, defaults, requirements)?;
        let index = self.routes.len();
        debug!(index, name, pattern, "Connected route");

        if let Some(name) = name {
            self.by_name.insert(name.to_string(), index);
        }
        self.names.push(name.map(String::from));
        self.routes.push(route);
        Ok(&self.routes[index])
    }

    /// Forbids further [`connect`](Self::connect) calls.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Returns `true` once [`seal`](Self::seal) has been called.
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Returns the route connected under `name`.
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&index| &self.routes[index])
    }

    /// Returns the name of the route at `index`, if it has one.
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(Option::as_deref)
    }

    /// Returns all routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Iterates over `(name, route)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &Route)> {
        self.names.iter().map(Option::as_deref).zip(&self.routes)
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are connected.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route that matches `path`.
    pub fn recognize(&self, path: &str) -> Option<RouteMatch<'_>> {
        let span = routing_span("recognize", path);
        let _guard = span.enter();

        for (index, (name, route)) in self.iter().enumerate() {
            if let Some(params) = route.parse_url(path) {
                debug!(index, pattern = route.pattern(), "Path recognized");
                return Some(RouteMatch {
                    params,
                    index,
                    name,
                    pattern: route.pattern(),
                });
            }
            trace!(index, pattern = route.pattern(), "Route does not match");
        }

        debug!(routes = self.len(), "No route matches");
        None
    }

    /// Parses `path` into parameters using the first matching route.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::NotFound`] if no route matches.
    pub fn parse(&self, path: &str) -> TrackwayResult<Params> {
        self.recognize(path)
            .map(|found| found.params)
            .ok_or_else(|| TrackwayError::NotFound(format!("No route matches '{path}'")))
    }

    /// Generates a path with the first route that can express the merged
    /// parameters. See [`Route::generate_url`] for how `current`, `new` and
    /// `force` combine.
    pub fn generate(&self, current: &Params, new: &Params, force: &Params) -> Option<String> {
        for (index, route) in self.routes.iter().enumerate() {
            if let Some(url) = route.generate_url(current, new, force) {
                debug!(index, pattern = route.pattern(), url = %url, "Generated URL");
                return Some(url);
            }
            trace!(index, pattern = route.pattern(), "Route cannot generate");
        }
        None
    }

    /// Like [`generate`](Self::generate), but reports exhaustion as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::NoReverseMatch`] if no route can generate a
    /// path for these parameters.
    pub fn url_for(&self, current: &Params, new: &Params, force: &Params) -> TrackwayResult<String> {
        let target = describe(new);
        let span = routing_span("generate", &target);
        let _guard = span.enter();

        self.generate(current, new, force).ok_or_else(|| {
            debug!(routes = self.len(), "No route can generate");
            TrackwayError::NoReverseMatch(format!("No route can generate a URL for {target}"))
        })
    }

    /// Generates a path with the route connected under `name` only.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::NoReverseMatch`] if the name is unknown or the
    /// route cannot express the parameters.
    pub fn url_for_named(
        &self,
        name: &str,
        current: &Params,
        new: &Params,
        force: &Params,
    ) -> TrackwayResult<String> {
        let span = routing_span("generate", name);
        let _guard = span.enter();

        let route = self.get(name).ok_or_else(|| {
            TrackwayError::NoReverseMatch(format!("No route named '{name}'"))
        })?;
        route.generate_url(current, new, force).ok_or_else(|| {
            TrackwayError::NoReverseMatch(format!(
                "Route '{name}' ({}) cannot generate a URL for {}",
                route.pattern(),
                describe(new)
            ))
        })
    }
}

impl fmt::Display for RouteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (name, route)) in self.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            match name {
                Some(name) => write!(f, "{index:>3}  {route}  [{name}]")?,
                None => write!(f, "{index:>3}  {route}")?,
            }
        }
        Ok(())
    }
}

/// Renders a parameter map as `{key: value, ...}` for messages.
fn describe(params: &Params) -> String {
    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| format!("{key}: {value:?}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}
