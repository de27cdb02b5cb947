//! Route pattern compilation, matching and generation.
//!
//! A [`Route`] is built from a `/`-delimited pattern such as
//! `"blog/$year/$month/$day"` or `"article/$id/*params"`, a map of defaults
//! and a map of requirement regexes. Once built it is immutable and is used
//! in both directions:
//!
//! - [`Route::parse_url`] turns a path into [`Params`],
//! - [`Route::generate_url`] turns parameters back into the shortest path
//!   this route can express them with.
//!
//! Both return `None` when the route simply does not apply, so a
//! [`RouteSet`](crate::RouteSet) can move on to the next route.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

use trackway_core::{TrackwayError, TrackwayResult};

use crate::encoding::{decode_segment, encode_segment, urlencode};
use crate::params::{ParamValue, Params, Requirements};

/// One token of a compiled pattern.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Text that must appear verbatim.
    Literal(String),
    /// `$name`: captures exactly one path segment.
    Placeholder {
        /// The parameter name.
        name: String,
        /// The anchored requirement, if any.
        requirement: Option<Regex>,
    },
    /// `*name`: captures every remaining segment as a list.
    Wildcard {
        /// The parameter name.
        name: String,
        /// The anchored requirement, checked against the `/`-joined capture.
        requirement: Option<Regex>,
    },
}

impl Segment {
    /// Returns the parameter name for placeholders and wildcards.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Placeholder { name, .. } | Self::Wildcard { name, .. } => Some(name),
        }
    }

    /// Returns `true` for a literal segment.
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{text}"),
            Self::Placeholder { name, .. } => write!(f, "${name}"),
            Self::Wildcard { name, .. } => write!(f, "*{name}"),
        }
    }
}

/// A compiled routing rule.
///
/// # Examples
///
/// ```
/// use trackway_routing::{params, requirements, ParamValue, Route};
///
/// let route = Route::new(
///     "$controller/$action/$id",
///     params! { "action" => "index", "id" => ParamValue::Null },
///     &requirements! {},
/// )
/// .unwrap();
///
/// assert_eq!(
///     route.parse_url("test"),
///     Some(params! { "controller" => "test", "action" => "index" })
/// );
/// assert_eq!(route.parse_url("url/is/too/long"), None);
///
/// let url = route.generate_url(
///     &params! {},
///     &params! { "controller" => "post", "action" => "show", "id" => 7 },
///     &params! {},
/// );
/// assert_eq!(url.as_deref(), Some("post/show/7"));
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    /// The declared pattern, as written.
    pattern: String,
    /// Compiled tokens, in order.
    segments: Vec<Segment>,
    /// Defaults for placeholders and route-level fixed parameters.
    defaults: Params,
    /// Requirement sources, as declared.
    requirements: Requirements,
    /// Number of leading segments an incoming path must supply.
    required_segments: usize,
}

impl Route {
    /// Compiles a route.
    ///
    /// # Errors
    ///
    /// Returns [`TrackwayError::ImproperlyConfigured`] when the pattern has an
    /// empty segment or parameter name, a wildcard that is not last, duplicate
    /// parameter names, a defaulted placeholder directly followed by a
    /// required one, a requirement that does not compile or names no
    /// parameter, or a list default for anything but the wildcard.
    pub fn new(pattern: &str, defaults: Params, requirements: &Requirements) -> TrackwayResult<Self> {
        let trimmed = pattern.trim_matches('/');
        let tokens: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let mut segments = Vec::with_capacity(tokens.len());
        let mut seen: HashSet<&str> = HashSet::new();

        for (index, token) in tokens.iter().enumerate() {
            let segment = if let Some(name) = token.strip_prefix('$') {
                check_name(pattern, name, &mut seen)?;
                Segment::Placeholder {
                    name: name.to_string(),
                    requirement: compile_requirement(pattern, name, requirements)?,
                }
            } else if let Some(name) = token.strip_prefix('*') {
                if index + 1 != tokens.len() {
                    return Err(improperly_configured(
                        pattern,
                        &format!("wildcard '*{name}' must be the last segment"),
                    ));
                }
                check_name(pattern, name, &mut seen)?;
                Segment::Wildcard {
                    name: name.to_string(),
                    requirement: compile_requirement(pattern, name, requirements)?,
                }
            } else if token.is_empty() {
                return Err(improperly_configured(pattern, "empty segment"));
            } else {
                Segment::Literal((*token).to_string())
            };
            segments.push(segment);
        }

        if let Some(unknown) = requirements.keys().find(|name| !seen.contains(name.as_str())) {
            return Err(improperly_configured(
                pattern,
                &format!("requirement for '{unknown}' which is not a placeholder"),
            ));
        }

        let wildcard = segments.last().and_then(|segment| match segment {
            Segment::Wildcard { name, .. } => Some(name.as_str()),
            _ => None,
        });
        if let Some((key, _)) = defaults
            .iter()
            .find(|(key, value)| matches!(value, ParamValue::List(_)) && wildcard != Some(key.as_str()))
        {
            return Err(improperly_configured(
                pattern,
                &format!("list default for '{key}' which is not a wildcard"),
            ));
        }

        check_trailing_optionality(pattern, &segments, &defaults)?;
        let required_segments = count_required_segments(&segments, &defaults);

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            defaults,
            requirements: requirements.clone(),
            required_segments,
        })
    }

    /// Returns the pattern as declared.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the defaults map.
    pub const fn defaults(&self) -> &Params {
        &self.defaults
    }

    /// Returns the requirement sources as declared.
    pub const fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    /// Returns how many leading path segments a matching path must supply.
    pub const fn required_segments(&self) -> usize {
        self.required_segments
    }

    /// Returns the names of all placeholders and the wildcard, in order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::name)
    }

    /// Returns the wildcard's name, if the pattern ends in one.
    pub fn wildcard_name(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Wildcard { name, .. }) => Some(name),
            _ => None,
        }
    }

    /// Returns `true` if `name` is captured by a segment of this route.
    pub fn is_placeholder(&self, name: &str) -> bool {
        self.placeholder_names().any(|own| own == name)
    }

    /// Returns the route-level fixed parameters: defaults whose key is not
    /// captured by any segment.
    pub fn fixed_defaults(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.defaults
            .iter()
            .filter(|(key, _)| !self.is_placeholder(key))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Returns `true` if both routes were declared with the same segments,
    /// defaults and requirements.
    pub fn same_definition(&self, other: &Self) -> bool {
        self.pattern.trim_matches('/') == other.pattern.trim_matches('/')
            && self.defaults == other.defaults
            && self.requirements == other.requirements
    }

    /// Matches a path against this route.
    ///
    /// Leading and trailing slashes are ignored and every segment is
    /// percent-decoded before it is checked. Returns `None` if the path has
    /// too many or too few segments, a literal differs, or a captured value
    /// fails its requirement.
    pub fn parse_url(&self, path: &str) -> Option<Params> {
        let trimmed = path.trim_matches('/');
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        if self.wildcard_name().is_none() && parts.len() > self.segments.len() {
            return None;
        }
        if parts.len() < self.required_segments {
            return None;
        }

        let mut params = Params::new();
        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(text) => {
                    if parts.get(index).copied() != Some(text.as_str()) {
                        return None;
                    }
                }
                Segment::Placeholder { name, requirement } => match parts.get(index) {
                    Some(raw) => {
                        let value = decode_segment(raw);
                        if !value_matches(requirement.as_ref(), &value) {
                            return None;
                        }
                        params.insert(name.clone(), self.typed_value(name, value)?);
                    }
                    None => {
                        if let Some(default) = self.defaults.get(name).filter(|d| !d.is_null()) {
                            params.insert(name.clone(), default.clone());
                        }
                    }
                },
                Segment::Wildcard { name, requirement } => {
                    let rest: Vec<String> = parts
                        .iter()
                        .skip(index)
                        .map(|raw| decode_segment(raw))
                        .collect();
                    if rest.iter().any(String::is_empty) {
                        return None;
                    }
                    if let Some(re) = requirement {
                        if !re.is_match(&rest.join("/")) {
                            return None;
                        }
                    }
                    params.insert(name.clone(), ParamValue::List(rest));
                }
            }
        }

        for (key, value) in self.fixed_defaults() {
            if !value.is_null() {
                params.insert(key.to_string(), value.clone());
            }
        }

        Some(params)
    }

    /// Generates a path for the given parameters.
    ///
    /// `current` holds the parameters of the request being rendered, `new`
    /// the requested changes and `force` values that replace whatever the
    /// merge produced. Placeholder values are recalled from `current` in
    /// segment order until the first placeholder named in `new`; every later
    /// placeholder falls back to its default instead. `force` replaces a
    /// value in place without ending recall, and `Null` in either override
    /// map means "use the default".
    ///
    /// Trailing segments whose value equals their default are left out.
    /// Keys of the merged parameters that this route does not consume are
    /// appended as a query string.
    ///
    /// Returns `None` if a route-level fixed parameter conflicts, a kept
    /// placeholder has no value, or a value fails its requirement.
    pub fn generate_url(&self, current: &Params, new: &Params, force: &Params) -> Option<String> {
        for (key, default) in self.fixed_defaults() {
            let supplied = force
                .get(key)
                .or_else(|| new.get(key))
                .or_else(|| current.get(key));
            if let Some(value) = supplied {
                if !value.is_null() && !value.loosely_eq(default) {
                    return None;
                }
            }
        }

        let values = self.resolve_values(current, new, force);
        let cut = self.cut_point(&values);

        let mut parts: Vec<String> = Vec::with_capacity(cut);
        for (segment, value) in self.segments[..cut].iter().zip(&values) {
            match segment {
                Segment::Literal(text) => parts.push(text.clone()),
                Segment::Placeholder { requirement, .. } => {
                    let value = value.as_ref().filter(|v| !v.is_null())?;
                    if matches!(value, ParamValue::List(_)) {
                        return None;
                    }
                    let text = value.to_string();
                    if !value_matches(requirement.as_ref(), &text) {
                        return None;
                    }
                    parts.push(encode_segment(&text));
                }
                Segment::Wildcard { requirement, .. } => {
                    let items = value.as_ref().map(ParamValue::to_segments).unwrap_or_default();
                    if items.iter().any(String::is_empty) {
                        return None;
                    }
                    if let Some(re) = requirement {
                        if !re.is_match(&items.join("/")) {
                            return None;
                        }
                    }
                    parts.extend(items.iter().map(|item| encode_segment(item)));
                }
            }
        }

        let mut url = parts.join("/");
        let query = self.extra_query(current, new, force);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Some(url)
    }

    /// Types a captured segment after the default for its placeholder.
    fn typed_value(&self, name: &str, raw: String) -> Option<ParamValue> {
        match self.defaults.get(name) {
            Some(ParamValue::Int(_)) => match ParamValue::from_segment(&raw) {
                value @ ParamValue::Int(_) => Some(value),
                _ => None,
            },
            Some(ParamValue::Str(_)) => Some(ParamValue::Str(raw)),
            _ => Some(ParamValue::from_segment(&raw)),
        }
    }

    /// Merges the three parameter sources into one value per segment
    /// (`None` for literals).
    fn resolve_values(&self, current: &Params, new: &Params, force: &Params) -> Vec<Option<ParamValue>> {
        let mut recall = true;
        self.segments
            .iter()
            .map(|segment| {
                let name = segment.name()?;
                let mut value = if let Some(requested) = new.get(name) {
                    recall = false;
                    requested.clone()
                } else if recall {
                    current.get(name).cloned().unwrap_or(ParamValue::Null)
                } else {
                    ParamValue::Null
                };
                if let Some(forced) = force.get(name) {
                    value = forced.clone();
                }
                if value.is_null() {
                    if let Some(default) = self.defaults.get(name) {
                        value = default.clone();
                    }
                }
                Some(value)
            })
            .collect()
    }

    /// Index of the first trailing segment that can be left out.
    fn cut_point(&self, values: &[Option<ParamValue>]) -> usize {
        let mut cut = self.segments.len();
        for (index, segment) in self.segments.iter().enumerate().rev() {
            let value = values[index].as_ref();
            let trimmable = match segment {
                Segment::Literal(_) => false,
                Segment::Placeholder { name, .. } => match (self.defaults.get(name), value) {
                    (Some(default), Some(value)) => value.loosely_eq(default),
                    _ => false,
                },
                // An absent wildcard parses as "", so its requirement must accept that.
                Segment::Wildcard { name, requirement } => {
                    requirement.as_ref().map_or(true, |re| re.is_match(""))
                        && value.map_or(true, |value| {
                            value.is_blank()
                                || self
                                    .defaults
                                    .get(name)
                                    .is_some_and(|default| value.loosely_eq(default))
                        })
                }
            };
            if !trimmable {
                break;
            }
            cut = index;
        }
        cut
    }

    /// Builds the query string for keys this route does not consume.
    fn extra_query(&self, current: &Params, new: &Params, force: &Params) -> String {
        let mut extras: IndexMap<&str, &ParamValue> = IndexMap::new();
        for (key, value) in current.iter().chain(new.iter()).chain(force.iter()) {
            if self.defaults.contains_key(key) || self.is_placeholder(key) {
                continue;
            }
            extras.insert(key.as_str(), value);
        }

        let rendered: Vec<(&str, String)> = extras
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .flat_map(|(key, value)| match value {
                ParamValue::List(items) => items.iter().map(|item| (key, item.clone())).collect(),
                other => vec![(key, other.to_string())],
            })
            .collect();

        urlencode(rendered.iter().map(|(key, value)| (*key, value.as_str())))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Checks a captured or generated value against a requirement, or against
/// the default "non-empty" rule when there is none.
fn value_matches(requirement: Option<&Regex>, value: &str) -> bool {
    requirement.map_or(!value.is_empty(), |re| re.is_match(value))
}

fn improperly_configured(pattern: &str, reason: &str) -> TrackwayError {
    TrackwayError::ImproperlyConfigured(format!("Route '{pattern}': {reason}"))
}

fn check_name<'a>(pattern: &str, name: &'a str, seen: &mut HashSet<&'a str>) -> TrackwayResult<()> {
    if name.is_empty() {
        return Err(improperly_configured(pattern, "empty parameter name"));
    }
    if !seen.insert(name) {
        return Err(improperly_configured(
            pattern,
            &format!("duplicate parameter name '{name}'"),
        ));
    }
    Ok(())
}

/// Compiles the requirement for `name`, anchoring it to the whole value.
fn compile_requirement(
    pattern: &str,
    name: &str,
    requirements: &Requirements,
) -> TrackwayResult<Option<Regex>> {
    let Some(source) = requirements.get(name) else {
        return Ok(None);
    };

    let mut anchored = String::with_capacity(source.len() + 2);
    if !source.starts_with('^') {
        anchored.push('^');
    }
    anchored.push_str(source);
    if !source.ends_with('$') {
        anchored.push('$');
    }

    Regex::new(&anchored).map(Some).map_err(|e| {
        improperly_configured(pattern, &format!("invalid requirement for '{name}': {e}"))
    })
}

/// Rejects a defaulted placeholder that is followed by a required
/// placeholder with no literal in between.
fn check_trailing_optionality(pattern: &str, segments: &[Segment], defaults: &Params) -> TrackwayResult<()> {
    let mut pending_optional: Option<&str> = None;
    for segment in segments {
        match segment {
            Segment::Literal(_) => pending_optional = None,
            Segment::Placeholder { name, .. } if defaults.contains_key(name) => {
                pending_optional.get_or_insert(name);
            }
            Segment::Placeholder { name, .. } => {
                if let Some(optional) = pending_optional {
                    return Err(improperly_configured(
                        pattern,
                        &format!(
                            "optional placeholder '${optional}' is followed by required placeholder '${name}'"
                        ),
                    ));
                }
            }
            Segment::Wildcard { .. } => {}
        }
    }
    Ok(())
}

fn count_required_segments(segments: &[Segment], defaults: &Params) -> usize {
    let mut required = segments.len();
    for (index, segment) in segments.iter().enumerate().rev() {
        let optional = match segment {
            Segment::Literal(_) => false,
            Segment::Placeholder { name, .. } => defaults.contains_key(name),
            Segment::Wildcard { .. } => true,
        };
        if !optional {
            break;
        }
        required = index;
    }
    required
}
