//! The `check` management command.
//!
//! Loads the route table and runs the route system checks against it.

use async_trait::async_trait;
use trackway_core::checks::{CheckLevel, CheckMessage};
use trackway_core::{TrackwayError, TrackwayResult};
use trackway_routing::checks::run_route_checks;

use crate::command::{CommandContext, ManagementCommand};

/// Runs system checks over the configured route table.
///
/// Loading the table already rejects malformed routes; the checks then
/// report tables that load but are probably wrong. Warnings fail the
/// command unless `--allow-warnings` is given.
pub struct CheckCommand;

/// Formats check messages followed by a one-line summary.
pub fn render_report(messages: &[CheckMessage]) -> String {
    if messages.is_empty() {
        return "System check identified no issues.".to_string();
    }

    let mut out = String::from("System check identified some issues:\n");
    for msg in messages {
        out.push('\n');
        out.push_str(&msg.to_string());
        out.push('\n');
    }

    let silenced = messages.iter().filter(|m| !m.is_serious()).count();
    out.push_str(&format!(
        "\nSystem check identified {} issue(s) ({silenced} silenced).",
        messages.len()
    ));
    out
}

/// Decides whether a report fails the command.
fn verdict(messages: &[CheckMessage], allow_warnings: bool) -> Result<(), TrackwayError> {
    let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
    let warnings = messages
        .iter()
        .filter(|m| m.level == CheckLevel::Warning)
        .count();

    if errors > 0 {
        return Err(TrackwayError::ImproperlyConfigured(format!(
            "System check found {errors} error(s)"
        )));
    }
    if warnings > 0 && !allow_warnings {
        return Err(TrackwayError::ImproperlyConfigured(format!(
            "System check found {warnings} warning(s)"
        )));
    }
    Ok(())
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Load the route table and run system checks"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("allow-warnings")
                .long("allow-warnings")
                .action(clap::ArgAction::SetTrue)
                .help("Succeed even if warnings are reported"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
        let routes = ctx.routes()?;
        let messages = run_route_checks(&routes);

        tracing::info!(
            routes = routes.len(),
            issues = messages.len(),
            "Ran route checks"
        );
        println!("{}", render_report(&messages));

        verdict(&messages, matches.get_flag("allow-warnings"))
    }
}
