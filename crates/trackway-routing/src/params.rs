//! Parameter values and parameter mappings.
//!
//! A recognized path turns into [`Params`], an insertion-ordered map from
//! parameter name to [`ParamValue`]. The same type carries defaults, the
//! current request's parameters and requested overrides into URL generation.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An insertion-ordered mapping of parameter names to values.
///
/// Equality ignores insertion order; iteration (and therefore query string
/// output) follows it.
pub type Params = IndexMap<String, ParamValue>;

/// A mapping of placeholder names to requirement regexes.
pub type Requirements = IndexMap<String, String>;

/// A single parameter value.
///
/// # Examples
///
/// ```
/// use trackway_routing::ParamValue;
///
/// assert_eq!(ParamValue::from_segment("2004"), ParamValue::Int(2004));
/// assert_eq!(ParamValue::from_segment("04"), ParamValue::Str("04".into()));
/// assert!(ParamValue::Int(4).loosely_eq(&ParamValue::from("4")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// No value. As a default it marks a placeholder optional without
    /// supplying anything; as an override it means "use the default".
    Null,
    /// An integer value.
    Int(i64),
    /// A string value.
    Str(String),
    /// The segments captured by a wildcard.
    List(Vec<String>),
}

impl ParamValue {
    /// Types a raw path segment: canonical decimal integers become
    /// [`ParamValue::Int`], everything else stays a string.
    ///
    /// Canonical means ASCII digits only, no leading zero (except `"0"`
    /// itself) and within `i64` range, so the segment renders back to the
    /// exact same text.
    pub fn from_segment(raw: &str) -> Self {
        let canonical = !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && (raw == "0" || !raw.starts_with('0'));
        if canonical {
            if let Ok(n) = raw.parse::<i64>() {
                return Self::Int(n);
            }
        }
        Self::Str(raw.to_string())
    }

    /// Returns `true` for [`ParamValue::Null`].
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `true` for values that render to nothing: `Null` and an
    /// empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::List(items) => items.is_empty(),
            Self::Int(_) | Self::Str(_) => false,
        }
    }

    /// Returns the string value, if this is a [`ParamValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer value, if this is a [`ParamValue::Int`].
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the captured segments, if this is a [`ParamValue::List`].
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Compares two values the way a route compares a supplied value with a
    /// default: integers and their decimal rendering are equal, `Null` only
    /// equals `Null`.
    pub fn loosely_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Null, _) | (_, Self::Null) => false,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }

    /// Splits the value into wildcard segments.
    ///
    /// Lists are taken as-is, strings are split on `/`, a blank value yields
    /// no segments.
    pub fn to_segments(&self) -> Vec<String> {
        match self {
            Self::Null => Vec::new(),
            Self::List(items) => items.clone(),
            Self::Int(n) => vec![n.to_string()],
            Self::Str(s) => s
                .split('/')
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(items) => write!(f, "{}", items.join("/")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Builds a [`Params`] map from `key => value` pairs.
///
/// Values go through [`ParamValue::from`], so strings, integers, string
/// vectors and `Option`s (`None` is [`ParamValue::Null`]) all work.
///
/// ```
/// use trackway_routing::{params, ParamValue};
///
/// let p = params! { "controller" => "blog", "year" => 2004, "day" => ParamValue::Null };
/// assert_eq!(p["year"], ParamValue::Int(2004));
/// assert_eq!(p.keys().next().map(String::as_str), Some("controller"));
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::Params::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut params = $crate::Params::new();
        $(
            params.insert(::std::string::String::from($key), $crate::ParamValue::from($value));
        )+
        params
    }};
}

/// Builds a [`Requirements`] map from `name => regex` pairs.
///
/// ```
/// use trackway_routing::requirements;
///
/// let r = requirements! { "year" => r"^(19|20)\d\d$" };
/// assert_eq!(r["year"], r"^(19|20)\d\d$");
/// ```
#[macro_export]
macro_rules! requirements {
    () => {
        $crate::Requirements::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut requirements = $crate::Requirements::new();
        $(
            requirements.insert(
                ::std::string::String::from($key),
                ::std::string::String::from($value),
            );
        )+
        requirements
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_segment_integers() {
        assert_eq!(ParamValue::from_segment("0"), ParamValue::Int(0));
        assert_eq!(ParamValue::from_segment("2004"), ParamValue::Int(2004));
        assert_eq!(ParamValue::from_segment("04"), ParamValue::Str("04".into()));
        assert_eq!(ParamValue::from_segment("-4"), ParamValue::Str("-4".into()));
        assert_eq!(ParamValue::from_segment("+4"), ParamValue::Str("+4".into()));
        assert_eq!(ParamValue::from_segment(""), ParamValue::Str(String::new()));
    }

    #[test]
    fn test_from_segment_overflow_stays_string() {
        let huge = "99999999999999999999";
        assert_eq!(ParamValue::from_segment(huge), ParamValue::Str(huge.into()));
    }

    #[test]
    fn test_loosely_eq() {
        assert!(ParamValue::Int(4).loosely_eq(&ParamValue::from("4")));
        assert!(ParamValue::from("4").loosely_eq(&ParamValue::Int(4)));
        assert!(!ParamValue::Int(4).loosely_eq(&ParamValue::from("04")));
        assert!(ParamValue::Null.loosely_eq(&ParamValue::Null));
        assert!(!ParamValue::Null.loosely_eq(&ParamValue::from("")));
        assert!(!ParamValue::from("").loosely_eq(&ParamValue::Null));
        assert!(ParamValue::from(vec!["a", "b"]).loosely_eq(&ParamValue::from(vec!["a", "b"])));
        assert!(!ParamValue::from(vec!["a/b"]).loosely_eq(&ParamValue::from(vec!["a", "b"])));
    }

    #[test]
    fn test_display() {
        assert_eq!(ParamValue::Null.to_string(), "");
        assert_eq!(ParamValue::Int(25).to_string(), "25");
        assert_eq!(ParamValue::from("index").to_string(), "index");
        assert_eq!(ParamValue::from(vec!["1", "2", "3"]).to_string(), "1/2/3");
    }

    #[test]
    fn test_blank_and_accessors() {
        assert!(ParamValue::Null.is_blank());
        assert!(ParamValue::List(Vec::new()).is_blank());
        assert!(!ParamValue::from("").is_blank());
        assert_eq!(ParamValue::from("x").as_str(), Some("x"));
        assert_eq!(ParamValue::Int(3).as_int(), Some(3));
        assert_eq!(ParamValue::Int(3).as_str(), None);
        assert_eq!(
            ParamValue::from(vec!["a"]).as_list(),
            Some(&["a".to_string()][..])
        );
    }

    #[test]
    fn test_to_segments() {
        assert!(ParamValue::Null.to_segments().is_empty());
        assert_eq!(ParamValue::from("a/b/").to_segments(), vec!["a", "b"]);
        assert_eq!(ParamValue::Int(7).to_segments(), vec!["7"]);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ParamValue::from(None::<&str>), ParamValue::Null);
        assert_eq!(ParamValue::from(Some(5)), ParamValue::Int(5));
    }

    #[test]
    fn test_params_macro_keeps_order() {
        let p = params! { "b" => 1, "a" => "x", "c" => ParamValue::Null };
        let keys: Vec<&str> = p.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert!(params! {}.is_empty());
    }

    #[test]
    fn test_params_equality_ignores_order() {
        assert_eq!(params! { "a" => 1, "b" => 2 }, params! { "b" => 2, "a" => 1 });
    }

    #[test]
    fn test_serde_untagged() {
        let p: Params =
            serde_json::from_str(r#"{"id": null, "year": 2004, "c": "blog", "rest": ["a", "b"]}"#)
                .unwrap();
        assert_eq!(p["id"], ParamValue::Null);
        assert_eq!(p["year"], ParamValue::Int(2004));
        assert_eq!(p["c"], ParamValue::from("blog"));
        assert_eq!(p["rest"], ParamValue::from(vec!["a", "b"]));

        let json = serde_json::to_string(&params! { "id" => ParamValue::Null, "n" => 1 }).unwrap();
        assert_eq!(json, r#"{"id":null,"n":1}"#);
    }
}
