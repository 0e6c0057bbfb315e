//! Turning collected failures into the caller's error type.
//!
//! A session owns one [`ErrorFormatter`]. When `check` finds problems it
//! hands the formatter a [`Failures`] map and returns whatever error the
//! formatter builds. Closures `Fn(Failures) -> E` are formatters, so
//! services can map straight into their own error enums.

use crate::failure::{Failures, ValidationFailure};
use serde::{Deserialize, Serialize};

/// First line of every pretty-printed report.
pub const DEFAULT_BANNER: &str = "One or more parameters failed validation.";

/// Builds an aggregate error from every failure found by one `check`.
pub trait ErrorFormatter<E> {
    /// Creates the error for `failures`, which is never empty.
    fn format(&self, failures: Failures) -> E;
}

impl<E, F> ErrorFormatter<E> for F
where
    F: Fn(Failures) -> E,
{
    fn format(&self, failures: Failures) -> E {
        self(failures)
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Layout of pretty-printed reports.
///
/// Deserializes from service configuration; missing fields fall back to the
/// defaults.
///
/// ```toml
/// [validation]
/// banner = "Invalid request."
/// separator = "\r\n"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    /// Line written before the per-parameter lines.
    pub banner: String,
    /// Written after the banner and after every parameter line.
    pub separator: String,
}

impl FormatterOptions {
    /// Replaces the banner.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Replaces the line separator.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl Default for FormatterOptions {
    fn default() -> Self {
        Self {
            banner: DEFAULT_BANNER.to_owned(),
            separator: "\n".to_owned(),
        }
    }
}

/// Renders the banner followed by one `name: message` line per failure.
pub(crate) fn render(options: &FormatterOptions, failures: &Failures) -> String {
    let mut out = String::with_capacity(128);
    out.push_str(&options.banner);
    out.push_str(&options.separator);
    for (name, message) in failures.messages() {
        out.push_str(name);
        out.push_str(": ");
        out.push_str(&message);
        out.push_str(&options.separator);
    }
    out
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Produces a [`ValidationFailure`] carrying every cause. The session default.
#[derive(Debug, Clone, Default)]
pub struct FailureFormatter {
    options: FormatterOptions,
}

impl FailureFormatter {
    /// Creates a formatter with custom report layout.
    #[must_use]
    pub fn new(options: FormatterOptions) -> Self {
        Self { options }
    }
}

impl ErrorFormatter<ValidationFailure> for FailureFormatter {
    fn format(&self, failures: Failures) -> ValidationFailure {
        ValidationFailure::with_options(&self.options, failures)
    }
}

/// Pretty-prints the report and passes the message to a constructor.
///
/// Use this when the caller's error type is built from a message alone:
///
/// ```rust,ignore
/// let session = ValidationSession::with_formatter(pretty(ApiError::BadRequest));
/// ```
#[derive(Debug, Clone)]
pub struct PrettyFormatter<F> {
    options: FormatterOptions,
    make: F,
}

impl<F> PrettyFormatter<F> {
    /// Wraps `make` with the default layout.
    pub fn new(make: F) -> Self {
        Self {
            options: FormatterOptions::default(),
            make,
        }
    }

    /// Replaces the report layout.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_options(mut self, options: FormatterOptions) -> Self {
        self.options = options;
        self
    }
}

impl<E, F> ErrorFormatter<E> for PrettyFormatter<F>
where
    F: Fn(String) -> E,
{
    fn format(&self, failures: Failures) -> E {
        (self.make)(render(&self.options, &failures))
    }
}

/// Shorthand for [`PrettyFormatter::new`].
pub fn pretty<E, F>(make: F) -> PrettyFormatter<F>
where
    F: Fn(String) -> E,
{
    PrettyFormatter::new(make)
}
