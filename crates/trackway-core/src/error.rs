//! Core error types for trackway.
//!
//! [`TrackwayError`] separates the two failure classes of a route table:
//! configuration mistakes that must stop startup, and exhausted lookups
//! (no route recognizes a path, no route can generate a URL) that a
//! dispatcher turns into a 404-style response.
//!
//! A single route declining a path or a parameter set is *not* an error.
//! That outcome is an `Option::None` inside the router and never surfaces
//! as a [`TrackwayError`].

use thiserror::Error;

/// The primary error type for trackway.
///
/// Each variant maps to an HTTP status code via [`TrackwayError::status_code`],
/// so a dispatcher can forward router failures without inspecting them.
#[derive(Error, Debug)]
pub enum TrackwayError {
    // ── Configuration ────────────────────────────────────────────────

    /// A route declaration is malformed (bad pattern, bad requirement,
    /// duplicate name, connect after seal).
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A settings or routes file is missing, unreadable or unparsable.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Lookup ───────────────────────────────────────────────────────

    /// No route in the table recognizes the path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// No route in the table can generate a URL for the parameters.
    #[error("No reverse match: {0}")]
    NoReverseMatch(String),

    /// A parameter supplied from outside (e.g. the command line) is malformed.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl TrackwayError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `NotFound` -> 404
    /// - `InvalidParameter` -> 400
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidParameter(_) => 400,
            Self::ImproperlyConfigured(_)
            | Self::ConfigurationError(_)
            | Self::NoReverseMatch(_) => 500,
        }
    }

    /// Returns `true` for errors caused by the route table or settings
    /// rather than by the request being handled.
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ImproperlyConfigured(_) | Self::ConfigurationError(_)
        )
    }
}

/// A convenience type alias for `Result<T, TrackwayError>`.
pub type TrackwayResult<T> = Result<T, TrackwayError>;
