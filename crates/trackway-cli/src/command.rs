//! Command dispatch for the `trackway` binary.
//!
//! A [`CommandRegistry`] maps subcommand names to [`ManagementCommand`]s and
//! owns everything a command needs before it runs: the global `--settings`
//! option, settings resolution, logging setup, and a [`CommandContext`]
//! that loads the configured route table on demand.
//!
//! ## Adding a command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use trackway_cli::command::{CommandContext, ManagementCommand};
//! use trackway_core::TrackwayResult;
//!
//! struct CountCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for CountCommand {
//!     fn name(&self) -> &'static str { "count" }
//!     fn help(&self) -> &'static str { "Print the number of routes" }
//!
//!     async fn handle(&self, _matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
//!         println!("{}", ctx.routes()?.len());
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use trackway_core::logging::setup_logging;
use trackway_core::{settings_loader, Settings, TrackwayError, TrackwayResult};
use trackway_routing::{config, RouteSet};

use crate::commands::{CheckCommand, GenerateCommand, RecognizeCommand, RoutesCommand};

const SETTINGS_ARG: &str = "settings";

/// What a command runs against: the resolved settings and, through them,
/// the route table.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    settings: Settings,
}

impl CommandContext {
    /// Wraps already resolved settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// The settings this invocation runs with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Loads the sealed route table named by `routes_file`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ConfigurationError`] if no routes file is
    /// configured, and the loader's error if it cannot be loaded.
    pub fn routes(&self) -> TrackwayResult<RouteSet> {
        let path = self.settings.routes_file().ok_or_else(|| {
            TrackwayError::ConfigurationError(
                "No routes file configured; set routes_file or TRACKWAY_ROUTES_FILE".to_string(),
            )
        })?;
        config::load_file(path)
    }
}

/// A subcommand of the `trackway` binary.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// The subcommand name.
    fn name(&self) -> &'static str;

    /// One line of help text.
    fn help(&self) -> &'static str;

    /// Adds this command's arguments. The default adds none.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Runs the command with its own argument matches.
    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()>;
}

/// The subcommands of the `trackway` binary, keyed by name.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    /// Creates a registry with no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `check`, `routes`, `recognize` and
    /// `generate`.
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CheckCommand));
        registry.register(Box::new(RoutesCommand));
        registry.register(Box::new(RecognizeCommand));
        registry.register(Box::new(GenerateCommand));
        registry
    }

    /// Registers a command, replacing one with the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name(), command);
    }

    /// Looks up a command by name.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Builds the `trackway` clap command with one subcommand per entry and
    /// the global `--settings <FILE>` option.
    pub fn build_cli(&self) -> clap::Command {
        let app = clap::Command::new("trackway")
            .about("trackway route table utility")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg(
                clap::Arg::new(SETTINGS_ARG)
                    .long("settings")
                    .value_name("FILE")
                    .value_parser(clap::value_parser!(PathBuf))
                    .global(true)
                    .help("Settings file (TOML or JSON)"),
            );

        self.commands.values().fold(app, |app, cmd| {
            app.subcommand(cmd.add_arguments(clap::Command::new(cmd.name()).about(cmd.help())))
        })
    }

    /// Resolves settings for one invocation: the `--settings` file with
    /// environment overrides on top, or the environment alone.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the settings file cannot be read or
    /// parsed.
    pub fn resolve_settings(matches: &clap::ArgMatches) -> TrackwayResult<Settings> {
        match matches.get_one::<PathBuf>(SETTINGS_ARG) {
            Some(path) => settings_loader::load_file_with_env(path),
            None => Ok(settings_loader::from_env()),
        }
    }

    /// Runs the matched subcommand against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ConfigurationError`] for a missing or unknown
    /// subcommand, and otherwise whatever the command returns.
    pub async fn dispatch(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            TrackwayError::ConfigurationError("No subcommand specified".to_string())
        })?;
        let cmd = self.get(name).ok_or_else(|| {
            TrackwayError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(
            command = name,
            routes_file = ?ctx.settings().routes_file(),
            "Running management command"
        );
        cmd.handle(sub_matches, ctx).await
    }

    /// Resolves settings, installs logging and dispatches.
    ///
    /// # Errors
    ///
    /// Returns a settings error before anything runs, or the command's
    /// error.
    pub async fn run(&self, matches: &clap::ArgMatches) -> TrackwayResult<()> {
        let settings = Self::resolve_settings(matches)?;
        setup_logging(&settings);
        self.dispatch(matches, &CommandContext::new(settings)).await
    }
}
