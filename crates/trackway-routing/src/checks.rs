//! System checks for route tables.
//!
//! These catch tables that compile but do not behave the way they read:
//! routes that can never be reached, defaults that never apply, names that
//! are awkward to refer to.

use trackway_core::checks::{CheckMessage, CheckRegistry};

use crate::route::{Route, Segment};
use crate::route_set::RouteSet;

/// Returns a registry holding every route check, tagged `"urls"`.
pub fn default_route_checks() -> CheckRegistry<RouteSet> {
    let mut registry = CheckRegistry::new();
    registry.register(check_empty_table, &["urls"]);
    registry.register(check_shadowed_routes, &["urls"]);
    registry.register(check_ineffective_defaults, &["urls"]);
    registry.register(check_route_names, &["urls"]);
    registry
}

/// Runs every route check against `routes`.
pub fn run_route_checks(routes: &RouteSet) -> Vec<CheckMessage> {
    default_route_checks().run_checks(None, routes)
}

fn describe(index: usize, route: &Route) -> String {
    format!("route #{index} '{}'", route.pattern())
}

/// urls.I001
fn check_empty_table(routes: &RouteSet) -> Vec<CheckMessage> {
    if routes.is_empty() {
        vec![CheckMessage::info(
            "The route table is empty; no path can be recognized",
            Some("Add [[routes]] entries to the routes file."),
            None,
            Some("urls.I001"),
        )]
    } else {
        Vec::new()
    }
}

/// urls.W001
fn check_shadowed_routes(routes: &RouteSet) -> Vec<CheckMessage> {
    let all = routes.routes();
    all.iter()
        .enumerate()
        .filter_map(|(index, route)| {
            let earlier = all[..index]
                .iter()
                .position(|other| other.same_definition(route))?;
            Some(CheckMessage::warning(
                format!("Route is identical to route #{earlier} and is never used for matching"),
                Some("Remove the duplicate or change its pattern."),
                Some(&describe(index, route)),
                Some("urls.W001"),
            ))
        })
        .collect()
}

/// urls.W002
fn check_ineffective_defaults(routes: &RouteSet) -> Vec<CheckMessage> {
    let mut messages = Vec::new();
    for (index, route) in routes.routes().iter().enumerate() {
        let segments = route.segments();
        for (position, segment) in segments.iter().enumerate() {
            let Segment::Placeholder { name, .. } = segment else {
                continue;
            };
            if !route.defaults().contains_key(name) {
                continue;
            }
            let literal_follows = segments[position + 1..].iter().any(Segment::is_literal);
            if literal_follows {
                messages.push(CheckMessage::warning(
                    format!("The default for '${name}' is never used when matching because a literal segment follows it"),
                    Some("Move the placeholder after the literal segments or drop its default."),
                    Some(&describe(index, route)),
                    Some("urls.W002"),
                ));
            }
        }
    }
    messages
}

/// urls.W003
fn check_route_names(routes: &RouteSet) -> Vec<CheckMessage> {
    routes
        .iter()
        .enumerate()
        .filter_map(|(index, (name, route))| {
            let name = name?;
            name.chars().any(char::is_whitespace).then(|| {
                CheckMessage::warning(
                    format!("Route name '{name}' contains whitespace"),
                    Some("Use a name without spaces, such as 'blog_archive'."),
                    Some(&describe(index, route)),
                    Some("urls.W003"),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;
    use crate::{params, requirements};
    use trackway_core::checks::CheckLevel;

    fn ids(messages: &[CheckMessage]) -> Vec<&str> {
        messages.iter().filter_map(|m| m.id.as_deref()).collect()
    }

    #[test]
    fn test_registry_has_all_checks() {
        assert_eq!(default_route_checks().len(), 4);
        let routes = RouteSet::new();
        assert_eq!(
            default_route_checks().run_checks(Some(&["templates"]), &routes).len(),
            0
        );
    }

    #[test]
    fn test_empty_table() {
        let messages = run_route_checks(&RouteSet::new());
        assert_eq!(ids(&messages), vec!["urls.I001"]);
        assert_eq!(messages[0].level, CheckLevel::Info);
        assert!(!messages[0].is_serious());
    }

    #[test]
    fn test_clean_table() {
        let mut routes = RouteSet::new();
        routes
            .connect_named(
                "archive",
                "blog/$year/$month",
                params! { "month" => ParamValue::Null },
                &requirements! {},
            )
            .unwrap();
        assert!(run_route_checks(&routes).is_empty());
    }

    #[test]
    fn test_shadowed_route() {
        let mut routes = RouteSet::new();
        routes.connect("blog/$year", params! {}, &requirements! {}).unwrap();
        routes.connect("other", params! {}, &requirements! {}).unwrap();
        routes.connect("/blog/$year/", params! {}, &requirements! {}).unwrap();

        let messages = run_route_checks(&routes);
        assert_eq!(ids(&messages), vec!["urls.W001"]);
        assert!(messages[0].msg.contains("route #0"));
        assert_eq!(messages[0].obj.as_deref(), Some("route #2 '/blog/$year/'"));
    }

    #[test]
    fn test_different_defaults_not_shadowed() {
        let mut routes = RouteSet::new();
        routes
            .connect("$a", params! { "controller" => "x" }, &requirements! {})
            .unwrap();
        routes
            .connect("$a", params! { "controller" => "y" }, &requirements! {})
            .unwrap();
        assert!(run_route_checks(&routes).is_empty());
    }

    #[test]
    fn test_ineffective_default() {
        let mut routes = RouteSet::new();
        routes
            .connect(
                "$controller/$action/edit",
                params! { "action" => "show" },
                &requirements! {},
            )
            .unwrap();
        let messages = run_route_checks(&routes);
        assert_eq!(ids(&messages), vec!["urls.W002"]);
        assert!(messages[0].msg.contains("'$action'"));
        assert!(messages[0].is_serious());
    }

    #[test]
    fn test_name_with_whitespace() {
        let mut routes = RouteSet::new();
        routes
            .connect_named("blog archive", "blog/$year", params! {}, &requirements! {})
            .unwrap();
        let messages = run_route_checks(&routes);
        assert_eq!(ids(&messages), vec!["urls.W003"]);
        assert!(messages[0].msg.contains("'blog archive'"));
    }
}
