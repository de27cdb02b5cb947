//! Built-in management commands.
//!
//! Every command works on the route table named by `routes_file` in the
//! settings, loaded through
//! [`CommandContext::routes`](crate::command::CommandContext::routes).

pub mod check;
pub mod generate;
pub mod recognize;
pub mod routes;

pub use check::CheckCommand;
pub use generate::GenerateCommand;
pub use recognize::RecognizeCommand;
pub use routes::RoutesCommand;

use trackway_core::{TrackwayError, TrackwayResult};
use trackway_routing::{ParamValue, Params};

/// Parses one `key=value` command-line parameter.
///
/// An empty value is `Null`, a value containing `/` is a list of segments,
/// anything else is typed like a path segment.
///
/// # Errors
///
/// Returns [`TrackwayError::InvalidParameter`] if there is no `=` or the key
/// is empty.
pub fn parse_param(arg: &str) -> TrackwayResult<(String, ParamValue)> {
    let (key, value) = arg
        .split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| {
            TrackwayError::InvalidParameter(format!("Expected key=value, got '{arg}'"))
        })?;

    let value = if value.is_empty() {
        ParamValue::Null
    } else if value.contains('/') {
        ParamValue::List(ParamValue::from(value).to_segments())
    } else {
        ParamValue::from_segment(value)
    };
    Ok((key.to_string(), value))
}

/// Parses a sequence of `key=value` parameters, later keys winning.
///
/// # Errors
///
/// Returns the first malformed parameter's error.
pub fn parse_params<'a, I>(args: I) -> TrackwayResult<Params>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut params = Params::new();
    for arg in args {
        let (key, value) = parse_param(arg)?;
        params.insert(key, value);
    }
    Ok(params)
}
