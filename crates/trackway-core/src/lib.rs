//! # trackway-core
//!
//! Core types shared by every trackway crate. This crate has no routing logic
//! of its own and provides the foundation the router and the CLI build on.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Runtime settings
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`checks`] - System check framework
//! - [`logging`] - Tracing-based logging integration

pub mod checks;
pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{TrackwayError, TrackwayResult};
pub use settings::Settings;
