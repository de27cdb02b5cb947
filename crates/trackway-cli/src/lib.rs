//! # trackway-cli
//!
//! Management commands for working with a trackway route table from the
//! command line.
//!
//! - **Command framework** - [`ManagementCommand`], [`CommandRegistry`] and
//!   [`CommandContext`]
//! - **Built-in commands** - `check`, `routes`, `recognize` and `generate`
//!
//! ## Quick Start
//!
//! ```rust
//! use trackway_cli::CommandRegistry;
//!
//! let registry = CommandRegistry::with_builtin_commands();
//! let matches = registry
//!     .build_cli()
//!     .try_get_matches_from(["trackway", "recognize", "blog/2004"])
//!     .unwrap();
//! assert_eq!(matches.subcommand_name(), Some("recognize"));
//! ```

// These clippy lints are intentionally allowed:
// - result_large_err: TrackwayError is the workspace-wide error type
// - doc_markdown: backtick requirements for documentation items are too strict
// - unused_async: command handlers keep a uniform async signature
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;

pub use command::{CommandContext, CommandRegistry, ManagementCommand};
