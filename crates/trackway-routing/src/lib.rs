//! # trackway-routing
//!
//! Bidirectional URL routing for trackway. A [`RouteSet`] holds an ordered
//! list of [`Route`]s declared with patterns like `"blog/$year/$month/$day"`
//! and turns paths into parameters and parameters back into paths.
//!
//! ## Modules
//!
//! - [`params`] - Parameter values and the `params!` / `requirements!` macros
//! - [`route`] - Compiling one pattern, matching and generating with it
//! - [`route_set`] - The ordered route table
//! - [`config`] - Loading a route table from TOML or JSON
//! - [`checks`] - System checks over a route table
//! - [`encoding`] - Percent-encoding of segments and query strings

pub mod checks;
pub mod config;
pub mod encoding;
pub mod params;
pub mod route;
pub mod route_set;

pub use params::{ParamValue, Params, Requirements};
pub use route::{Route, Segment};
pub use route_set::{RouteMatch, RouteSet};
