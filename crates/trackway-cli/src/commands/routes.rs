//! The `routes` management command.

use async_trait::async_trait;
use trackway_core::{TrackwayError, TrackwayResult};
use trackway_routing::RouteSet;

use crate::command::{CommandContext, ManagementCommand};

/// Lists the route table in precedence order.
pub struct RoutesCommand;

/// Renders the table as text, or as a JSON array with `--json`.
pub fn render_routes(routes: &RouteSet, json: bool) -> Result<String, TrackwayError> {
    if !json {
        return Ok(if routes.is_empty() {
            "No routes.".to_string()
        } else {
            routes.to_string()
        });
    }

    let entries: Vec<serde_json::Value> = routes
        .iter()
        .enumerate()
        .map(|(index, (name, route))| {
            serde_json::json!({
                "index": index,
                "name": name,
                "pattern": route.pattern(),
                "defaults": route.defaults(),
                "requirements": route.requirements(),
            })
        })
        .collect();
    serde_json::to_string_pretty(&entries)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to render routes: {e}")))
}

#[async_trait]
impl ManagementCommand for RoutesCommand {
    fn name(&self) -> &'static str {
        "routes"
    }

    fn help(&self) -> &'static str {
        "List the route table in precedence order"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the table as JSON"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
        let routes = ctx.routes()?;
        println!("{}", render_routes(&routes, matches.get_flag("json"))?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackway_routing::{params, requirements, ParamValue};

    fn table() -> RouteSet {
        let mut routes = RouteSet::new();
        routes
            .connect_named(
                "archive",
                "blog/$year",
                params! { "controller" => "blog" },
                &requirements! { "year" => r"\d{4}" },
            )
            .unwrap();
        routes
            .connect("$controller/$id", params! { "id" => ParamValue::Null }, &requirements! {})
            .unwrap();
        routes
    }

    #[test]
    fn test_render_text() {
        let text = render_routes(&table(), false).unwrap();
        assert_eq!(text, "  0  blog/$year  [archive]\n  1  $controller/$id");
        assert_eq!(render_routes(&RouteSet::new(), false).unwrap(), "No routes.");
    }

    #[test]
    fn test_render_json() {
        let text = render_routes(&table(), true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["name"], "archive");
        assert_eq!(value[0]["requirements"]["year"], r"\d{4}");
        assert_eq!(value[1]["name"], serde_json::Value::Null);
        assert_eq!(value[1]["defaults"]["id"], serde_json::Value::Null);
    }
}
