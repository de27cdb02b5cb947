//! The `generate` management command.

use async_trait::async_trait;
use trackway_core::{TrackwayError, TrackwayResult};
use trackway_routing::{Params, RouteSet};

use crate::command::{CommandContext, ManagementCommand};

use super::parse_params;

/// Generates a URL from parameters.
///
/// ```text
/// trackway generate year=2004 --current controller=blog --current month=4
/// trackway generate --name archive year=2004
/// ```
pub struct GenerateCommand;

/// The parsed inputs of one `generate` invocation.
#[derive(Debug, Default)]
pub struct GenerateRequest {
    /// Generate with this named route only.
    pub name: Option<String>,
    /// Parameters of the request being rendered.
    pub current: Params,
    /// Requested parameters.
    pub new: Params,
    /// Parameters that override both.
    pub force: Params,
}

impl GenerateRequest {
    /// Reads the request from the subcommand's arguments.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::InvalidParameter`] for a malformed
    /// `key=value` argument.
    pub fn from_matches(matches: &clap::ArgMatches) -> TrackwayResult<Self> {
        let list = |id: &str| {
            matches
                .get_many::<String>(id)
                .map(|values| values.collect::<Vec<_>>())
                .unwrap_or_default()
        };
        Ok(Self {
            name: matches.get_one::<String>("name").cloned(),
            current: parse_params(list("current"))?,
            new: parse_params(list("params"))?,
            force: parse_params(list("force"))?,
        })
    }

    /// Runs the request against a route table.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::NoReverseMatch`] if no route can generate a
    /// URL.
    pub fn generate(&self, routes: &RouteSet) -> TrackwayResult<String> {
        match &self.name {
            Some(name) => routes.url_for_named(name, &self.current, &self.new, &self.force),
            None => routes.url_for(&self.current, &self.new, &self.force),
        }
    }
}

#[async_trait]
impl ManagementCommand for GenerateCommand {
    fn name(&self) -> &'static str {
        "generate"
    }

    fn help(&self) -> &'static str {
        "Generate a URL from key=value parameters"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("params")
                .value_name("KEY=VALUE")
                .num_args(0..)
                .help("Requested parameters"),
        )
        .arg(
            clap::Arg::new("name")
                .long("name")
                .short('n')
                .value_name("NAME")
                .help("Generate with this named route only"),
        )
        .arg(
            clap::Arg::new("current")
                .long("current")
                .short('c')
                .value_name("KEY=VALUE")
                .action(clap::ArgAction::Append)
                .help("A parameter of the current request"),
        )
        .arg(
            clap::Arg::new("force")
                .long("force")
                .short('f')
                .value_name("KEY=VALUE")
                .action(clap::ArgAction::Append)
                .help("A parameter that overrides everything else"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
        let request = GenerateRequest::from_matches(matches)?;
        let routes = ctx.routes()?;
        println!("{}", request.generate(&routes)?);
        Ok(())
    }
}
