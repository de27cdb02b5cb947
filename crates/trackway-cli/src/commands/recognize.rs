//! The `recognize` management command.

use async_trait::async_trait;
use trackway_core::{TrackwayError, TrackwayResult};
use trackway_routing::RouteSet;

use crate::command::{CommandContext, ManagementCommand};

/// Matches a path against the route table and prints the parameters.
pub struct RecognizeCommand;

/// Recognizes `path` and renders the match as pretty JSON.
///
/// # Errors
///
/// Returns [`TrackwayError::NotFound`] if no route matches.
pub fn recognize_json(routes: &RouteSet, path: &str) -> Result<String, TrackwayError> {
    let found = routes
        .recognize(path)
        .ok_or_else(|| TrackwayError::NotFound(format!("No route matches '{path}'")))?;

    let value = serde_json::json!({
        "route": found.index,
        "name": found.name,
        "pattern": found.pattern,
        "params": found.params,
    });
    serde_json::to_string_pretty(&value)
        .map_err(|e| TrackwayError::ConfigurationError(format!("Failed to render match: {e}")))
}

#[async_trait]
impl ManagementCommand for RecognizeCommand {
    fn name(&self) -> &'static str {
        "recognize"
    }

    fn help(&self) -> &'static str {
        "Match a path against the route table"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("path")
                .required(true)
                .value_name("PATH")
                .help("The path to match, e.g. blog/2004/12/25"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, ctx: &CommandContext) -> TrackwayResult<()> {
        let path = matches
            .get_one::<String>("path")
            .map_or("", String::as_str);
        let routes = ctx.routes()?;
        println!("{}", recognize_json(&routes, path)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackway_routing::{params, requirements};

    #[test]
    fn test_recognize_json() {
        let mut routes = RouteSet::new();
        routes
            .connect_named(
                "article",
                "article/$id/*rest",
                params! { "controller" => "article" },
                &requirements! {},
            )
            .unwrap();

        let text = recognize_json(&routes, "/article/7/a/b").unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["route"], 0);
        assert_eq!(value["name"], "article");
        assert_eq!(value["pattern"], "article/$id/*rest");
        assert_eq!(
            value["params"],
            serde_json::json!({"id": 7, "rest": ["a", "b"], "controller": "article"})
        );
    }

    #[test]
    fn test_recognize_json_not_found() {
        let err = recognize_json(&RouteSet::new(), "nowhere").unwrap_err();
        assert!(matches!(err, TrackwayError::NotFound(_)));
    }
}
