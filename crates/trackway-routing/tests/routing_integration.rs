//! Integration tests for the router.
//!
//! Builds the route table a small blog application would use and drives it
//! in both directions: path -> parameters -> path.

use std::sync::Arc;

use trackway_core::TrackwayError;
use trackway_routing::checks::run_route_checks;
use trackway_routing::{config, params, requirements, ParamValue, Params, RouteSet};

fn blog_table() -> RouteSet {
    let mut routes = RouteSet::new();
    routes
        .connect_named(
            "archive",
            "blog/$year/$month/$day",
            params! {
                "controller" => "blog",
                "action" => "archive",
                "month" => ParamValue::Null,
                "day" => ParamValue::Null,
            },
            &requirements! {
                "year" => r"^(19|20)\d\d$",
                "month" => r"^[01]?\d$",
                "day" => r"^[0-3]?\d$",
            },
        )
        .unwrap();
    routes
        .connect_named(
            "article",
            "article/$id/*params",
            params! { "controller" => "article", "action" => "show" },
            &requirements! { "id" => r"\d+" },
        )
        .unwrap();
    routes
        .connect(
            "$controller/$action/$id",
            params! { "action" => "index", "id" => ParamValue::Null },
            &requirements! {},
        )
        .unwrap();
    routes.seal();
    routes
}

// ── Recognition ─────────────────────────────────────────────────────

#[test]
fn test_generic_route_fills_defaults() {
    let routes = blog_table();
    assert_eq!(
        routes.parse("test").unwrap(),
        params! { "controller" => "test", "action" => "index" }
    );
    assert_eq!(
        routes.parse("test/this/url").unwrap(),
        params! { "controller" => "test", "action" => "this", "id" => "url" }
    );
    assert!(matches!(
        routes.parse("url/is/too/long"),
        Err(TrackwayError::NotFound(_))
    ));
    assert!(routes.parse("").is_err());
}

#[test]
fn test_outer_slashes_are_ignored() {
    let routes = blog_table();
    assert_eq!(
        routes.parse("/test/this/").unwrap(),
        routes.parse("test/this").unwrap()
    );
}

#[test]
fn test_dated_route_captures_integers() {
    let routes = blog_table();
    let found = routes.recognize("blog/2004/12/25").unwrap();
    assert_eq!(found.name, Some("archive"));
    assert_eq!(found.params["year"], ParamValue::Int(2004));
    assert_eq!(found.params["month"], ParamValue::Int(12));
    assert_eq!(found.params["day"], ParamValue::Int(25));
}

#[test]
fn test_dated_route_requirement_failures() {
    let routes = blog_table();
    // Neither matches the archive route; the three-segment one falls back to
    // the generic route, the four-segment one matches nothing.
    assert_eq!(routes.recognize("blog/2104/12").unwrap().index, 2);
    assert!(routes.recognize("blog/2004/12/41").is_none());
}

#[test]
fn test_wildcard_capture() {
    let routes = blog_table();
    assert_eq!(
        routes.parse("article/1/1/2/3").unwrap(),
        params! {
            "id" => 1,
            "params" => vec!["1", "2", "3"],
            "controller" => "article",
            "action" => "show",
        }
    );
    let params = routes.parse("article/1/").unwrap();
    assert_eq!(params["params"], ParamValue::List(Vec::new()));
}

#[test]
fn test_first_match_wins() {
    let mut routes = RouteSet::new();
    routes
        .connect("$page", params! { "controller" => "pages" }, &requirements! {})
        .unwrap();
    routes
        .connect("$page", params! { "controller" => "never" }, &requirements! {})
        .unwrap();
    let found = routes.recognize("about").unwrap();
    assert_eq!(found.index, 0);
    assert_eq!(found.params["controller"], ParamValue::from("pages"));
}

// ── Generation ──────────────────────────────────────────────────────

#[test]
fn test_generation_trims_trailing_defaults() {
    let routes = blog_table();
    let current = params! {
        "controller" => "blog",
        "action" => "archive",
        "year" => 2005,
        "month" => 4,
        "day" => 15,
    };
    assert_eq!(
        routes.url_for(&current, &params! { "day" => 25 }, &params! {}).unwrap(),
        "blog/2005/4/25"
    );
    assert_eq!(
        routes.url_for(&current, &params! { "year" => 2004 }, &params! {}).unwrap(),
        "blog/2004"
    );
}

#[test]
fn test_generation_requirement_failure() {
    let mut routes = RouteSet::new();
    routes
        .connect(
            "blog/$year/$month/$day",
            params! { "month" => ParamValue::Null, "day" => ParamValue::Null },
            &requirements! { "year" => r"^(19|20)\d\d$" },
        )
        .unwrap();
    let err = routes
        .url_for(&params! {}, &params! { "year" => 2100 }, &params! {})
        .unwrap_err();
    assert!(matches!(err, TrackwayError::NoReverseMatch(_)));
}

#[test]
fn test_generation_switches_controller() {
    let routes = blog_table();
    let current = params! { "controller" => "blog", "action" => "archive", "year" => 2005 };
    assert_eq!(
        routes
            .url_for(
                &current,
                &params! { "controller" => "comments", "action" => "list", "page" => 2 },
                &params! {},
            )
            .unwrap(),
        "comments/list?year=2005&page=2"
    );
}

#[test]
fn test_generation_wildcard_and_named() {
    let routes = blog_table();
    assert_eq!(
        routes
            .url_for_named(
                "article",
                &params! {},
                &params! { "id" => 7, "params" => vec!["edit", "draft"] },
                &params! {},
            )
            .unwrap(),
        "article/7/edit/draft"
    );
    assert!(routes
        .url_for_named("article", &params! {}, &params! { "id" => "x" }, &params! {})
        .is_err());
}

#[test]
fn test_round_trip() {
    let routes = blog_table();
    for path in [
        "blog/2004",
        "blog/2004/12/25",
        "article/3/a/b",
        "post/show/9",
        "post",
    ] {
        let found = routes.recognize(path).unwrap();
        let route = &routes.routes()[found.index];
        let url = route
            .generate_url(&found.params, &Params::new(), &Params::new())
            .unwrap();
        assert_eq!(url, path, "round trip through '{}'", found.pattern);
        assert_eq!(routes.parse(&url).unwrap(), found.params);
    }
}

// ── Routes file, checks, sharing ────────────────────────────────────

#[test]
fn test_routes_file_matches_programmatic_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("routes.toml");
    std::fs::write(
        &path,
        r#"
[[routes]]
name = "archive"
pattern = "blog/$year/$month/$day"
optional = ["month", "day"]
defaults = { controller = "blog", action = "archive" }
requirements = { year = '^(19|20)\d\d$', month = '^[01]?\d$', day = '^[0-3]?\d$' }

[[routes]]
name = "article"
pattern = "article/$id/*params"
defaults = { controller = "article", action = "show" }
requirements = { id = '\d+' }

[[routes]]
pattern = "$controller/$action/$id"
optional = ["id"]
defaults = { action = "index" }
"#,
    )
    .unwrap();

    let loaded = config::load_file(&path).unwrap();
    let built = blog_table();
    assert_eq!(loaded.len(), built.len());
    for ((name_a, a), (name_b, b)) in loaded.iter().zip(built.iter()) {
        assert_eq!(name_a, name_b);
        assert!(a.same_definition(b), "{a} differs from {b}");
    }
    assert!(run_route_checks(&loaded).is_empty());
}

#[test]
fn test_shared_table_across_threads() {
    let routes = Arc::new(blog_table());
    let handles: Vec<_> = ["blog/1999", "article/5", "home"]
        .into_iter()
        .map(|path| {
            let routes = Arc::clone(&routes);
            std::thread::spawn(move || {
                let params = routes.parse(path).unwrap();
                routes.url_for(&params, &Params::new(), &Params::new()).unwrap()
            })
        })
        .collect();

    let urls: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(urls, vec!["blog/1999", "article/5", "home"]);
}
