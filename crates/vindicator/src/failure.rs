//! Per-parameter failures and the default aggregate error.

use crate::convert::ConversionError;
use crate::format::{FormatterOptions, render};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// PARAMETER FAILURE
// ============================================================================

/// Why a single parameter was rejected.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum ParameterFailure {
    /// A required parameter did not appear in the input.
    #[error("the parameter is required but was missing")]
    Missing { name: String },

    /// A supplied value could not be converted.
    ///
    /// Displays the conversion error's message; it is not repeated as a
    /// `source()`.
    #[error("{error}")]
    Conversion { name: String, error: ConversionError },
}

impl ParameterFailure {
    /// Name of the rejected parameter.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Missing { name } | Self::Conversion { name, .. } => name,
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "PARAM_MISSING_VALUE",
            Self::Conversion { error, .. } => error.code(),
        }
    }

    /// The conversion error, if this is a conversion failure.
    #[must_use]
    pub fn conversion_error(&self) -> Option<&ConversionError> {
        match self {
            Self::Conversion { error, .. } => Some(error),
            Self::Missing { .. } => None,
        }
    }
}

// ============================================================================
// FAILURE MAP
// ============================================================================

/// Every failure found by one `check`, one entry per parameter, keyed by name.
///
/// Iteration is in name order.
#[derive(Debug, Clone, Default)]
pub struct Failures {
    entries: BTreeMap<String, ParameterFailure>,
}

impl Failures {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `failure`, replacing any earlier failure for the same name.
    pub(crate) fn insert(&mut self, failure: ParameterFailure) {
        self.entries.insert(failure.name().to_owned(), failure);
    }

    /// Number of failing parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The failure recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterFailure> {
        self.entries.get(name)
    }

    /// Iterates failures in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterFailure> {
        self.entries.values()
    }

    /// Iterates `(name, message)` pairs in name order.
    pub fn messages(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .map(|(name, failure)| (name.as_str(), failure.to_string()))
    }

    /// Collects the name to message mapping.
    #[must_use]
    pub fn to_message_map(&self) -> BTreeMap<String, String> {
        self.messages()
            .map(|(name, message)| (name.to_owned(), message))
            .collect()
    }

    /// Consumes the map, returning the failures in name order.
    #[must_use]
    pub fn into_causes(self) -> Vec<ParameterFailure> {
        self.entries.into_values().collect()
    }
}

impl IntoIterator for Failures {
    type Item = ParameterFailure;
    type IntoIter = std::collections::btree_map::IntoValues<String, ParameterFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

// ============================================================================
// VALIDATION FAILURE
// ============================================================================

/// The default aggregate error raised when a `check` finds problems.
///
/// `Display` shows the formatted summary; the individual
/// [`ParameterFailure`]s stay reachable through [`causes`](Self::causes).
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    message: String,
    causes: Vec<ParameterFailure>,
}

impl ValidationFailure {
    /// Creates an aggregate error with a preformatted `message`.
    pub fn new(message: impl Into<String>, failures: Failures) -> Self {
        Self {
            message: message.into(),
            causes: failures.into_causes(),
        }
    }

    /// Formats `failures` with `options` and wraps them.
    pub fn with_options(options: &FormatterOptions, failures: Failures) -> Self {
        let message = render(options, &failures);
        Self::new(message, failures)
    }

    /// The formatted summary.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Every per-parameter failure, in name order.
    #[must_use]
    pub fn causes(&self) -> &[ParameterFailure] {
        &self.causes
    }

    /// The failure recorded for `name`.
    #[must_use]
    pub fn cause(&self, name: &str) -> Option<&ParameterFailure> {
        self.causes.iter().find(|c| c.name() == name)
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        "PARAM_VALIDATION"
    }

    /// Renders the failure as a JSON document suitable for an API response.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        json!({
            "code": self.code(),
            "message": self.message,
            "parameters": self
                .causes
                .iter()
                .map(|cause| json!({
                    "name": cause.name(),
                    "code": cause.code(),
                    "message": cause.to_string(),
                }))
                .collect::<Vec<_>>(),
        })
    }
}

impl From<Failures> for ValidationFailure {
    fn from(failures: Failures) -> Self {
        Self::with_options(&FormatterOptions::default(), failures)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
