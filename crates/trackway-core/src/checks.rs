//! System check framework for trackway.
//!
//! Checks inspect a configured object (a route table, settings) and report
//! problems that are legal but probably unintended. They run ahead of time,
//! from a management command or a test, never on the request path.
//!
//! ## Overview
//!
//! - [`CheckMessage`]: A diagnostic message from a check (with level, message, hint, etc.).
//! - [`CheckLevel`]: Severity level (Debug, Info, Warning, Error, Critical).
//! - [`CheckRegistry`]: Registry for check functions with tag-based filtering,
//!   generic over the type being checked.
//!
//! ## Examples
//!
//! ```
//! use trackway_core::checks::{CheckMessage, CheckRegistry};
//! use trackway_core::settings::Settings;
//!
//! let mut registry: CheckRegistry<Settings> = CheckRegistry::new();
//! registry.register(
//!     |settings| {
//!         if settings.routes_file.is_none() {
//!             vec![CheckMessage::warning(
//!                 "No routes file configured",
//!                 Some("Set routes_file in your settings."),
//!                 None,
//!                 Some("settings.W001"),
//!             )]
//!         } else {
//!             Vec::new()
//!         }
//!     },
//!     &["settings"],
//! );
//!
//! let messages = registry.run_checks(None, &Settings::default());
//! assert_eq!(messages.len(), 1);
//! ```

/// Severity level for a check message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// Debugging information.
    Debug = 0,
    /// Informational message.
    Info = 1,
    /// A potential problem.
    Warning = 2,
    /// A definite problem that should be fixed.
    Error = 3,
    /// A critical error that prevents the application from running.
    Critical = 4,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// A diagnostic message produced by a system check.
///
/// Each message has a severity level, a human-readable message, an optional hint,
/// the object that the issue relates to, and an optional identifier.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// The human-readable message describing the issue.
    pub msg: String,
    /// An optional hint on how to fix the issue.
    pub hint: Option<String>,
    /// The object (route, setting, etc.) that has the issue.
    pub obj: Option<String>,
    /// A unique identifier for this check message (e.g. "urls.W001").
    pub id: Option<String>,
}

impl CheckMessage {
    /// Creates a new `CheckMessage` with the given level and details.
    pub fn new(
        level: CheckLevel,
        msg: impl Into<String>,
        hint: Option<&str>,
        obj: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: hint.map(String::from),
            obj: obj.map(String::from),
            id: id.map(String::from),
        }
    }

    /// Creates an info-level message.
    pub fn info(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Info, msg, hint, obj, id)
    }

    /// Creates a warning-level message.
    pub fn warning(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Warning, msg, hint, obj, id)
    }

    /// Creates an error-level message.
    pub fn error(msg: impl Into<String>, hint: Option<&str>, obj: Option<&str>, id: Option<&str>) -> Self {
        Self::new(CheckLevel::Error, msg, hint, obj, id)
    }

    /// Returns `true` if this is a warning or higher severity.
    pub fn is_serious(&self) -> bool {
        self.level >= CheckLevel::Warning
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.id {
            write!(f, "({id}) ")?;
        }
        write!(f, "{}: {}", self.level, self.msg)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        if let Some(ref obj) = self.obj {
            write!(f, "\n\tObject: {obj}")?;
        }
        Ok(())
    }
}

/// A check function that inspects a `T` and returns diagnostic messages.
pub type CheckFn<T> = fn(&T) -> Vec<CheckMessage>;

struct RegisteredCheck<T> {
    func: CheckFn<T>,
    tags: Vec<String>,
}

/// Registry for check functions over targets of type `T`.
///
/// Check functions can be registered with tags, and then run all at once
/// or filtered by tag.
pub struct CheckRegistry<T> {
    checks: Vec<RegisteredCheck<T>>,
}

impl<T> CheckRegistry<T> {
    /// Creates a new empty check registry.
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Registers a check function with the given tags.
    pub fn register(&mut self, func: CheckFn<T>, tags: &[&str]) {
        self.checks.push(RegisteredCheck {
            func,
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        });
    }

    /// Runs all registered checks (or only those matching the given tags)
    /// and collects all resulting messages.
    ///
    /// If `tags` is `None`, all checks are run. If `Some(&["urls"])`,
    /// only checks tagged with "urls" are run.
    pub fn run_checks(&self, tags: Option<&[&str]>, target: &T) -> Vec<CheckMessage> {
        let mut messages = Vec::new();

        for check in &self.checks {
            let should_run = tags.map_or(true, |filter_tags| {
                filter_tags.iter().any(|t| check.tags.iter().any(|own| own == t))
            });

            if should_run {
                messages.extend((check.func)(target));
            }
        }

        messages
    }

    /// Returns the number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns `true` if no checks are registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl<T> Default for CheckRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
