//! # trackway
//!
//! A declarative, bidirectional URL router.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `trackway` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use trackway::prelude::*;
//!
//! let mut routes = RouteSet::new();
//! routes
//!     .connect(
//!         "$controller/$action/$id",
//!         params! { "action" => "index", "id" => ParamValue::Null },
//!         &requirements! {},
//!     )
//!     .unwrap();
//!
//! let params = routes.parse("/post/show/7").unwrap();
//! assert_eq!(params["id"], ParamValue::Int(7));
//! assert_eq!(
//!     routes.url_for(&params, &params! { "action" => "edit" }, &params! {}).unwrap(),
//!     "post/edit"
//! );
//! ```

/// Error types, settings, logging, and the system check framework.
pub use trackway_core as core;

/// Routes, route tables, parameters, and routes-file loading.
pub use trackway_routing as routing;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use trackway_cli as cli;

pub use trackway_routing::{params, requirements};

/// The types most applications need.
pub mod prelude {
    pub use trackway_core::{Settings, TrackwayError, TrackwayResult};
    pub use trackway_routing::{
        params, requirements, ParamValue, Params, Requirements, Route, RouteMatch, RouteSet,
    };
}
