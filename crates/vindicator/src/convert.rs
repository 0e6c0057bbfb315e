//! Conversion from raw input strings to typed values.
//!
//! A [`Converter`] turns one raw string into a typed value or explains why it
//! could not. Any `Fn(&str) -> Result<T, E>` whose error implements
//! [`std::error::Error`] is a converter, so parsers from other crates can be
//! registered as they are:
//!
//! ```rust,ignore
//! use nebula_vindicator::prelude::*;
//!
//! let session = ValidationSession::new();
//! let id = session.add_required("id", uuid::Uuid::parse_str)?;
//! let limit = session.add_optional("limit", |s: &str| s.parse::<u32>())?;
//! ```
//!
//! The functions in this module cover the common request parameter types and
//! produce messages that name the target type and echo the rejected input.

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// CONVERSION ERROR
// ============================================================================

/// A raw value could not be converted to the parameter's target type.
///
/// The message always contains the offending input and a description of the
/// target type, so it can be placed into an aggregate report as is. The
/// underlying parser error, if any, is folded into the message and kept
/// available through [`parser_error`](Self::parser_error); it is not reported
/// again as the error's `source()`.
#[derive(Debug, Clone)]
pub struct ConversionError {
    value: String,
    target: Cow<'static, str>,
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl ConversionError {
    /// Creates an error for `value`, which is not a valid `target`.
    ///
    /// `target` reads as a noun phrase: `"a boolean"`, `"a UUID"`.
    pub fn new(value: impl Into<String>, target: impl Into<Cow<'static, str>>) -> Self {
        Self {
            value: value.into(),
            target: target.into(),
            source: None,
        }
    }

    /// Attaches the underlying parser error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Arc::new(source));
        self
    }

    /// The raw input that failed to convert.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Description of the type the input was converted to.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The parser error this one was built from.
    #[must_use]
    pub fn parser_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        "PARAM_CONVERSION"
    }

    /// Turns an arbitrary parser error into a `ConversionError`.
    ///
    /// A `ConversionError` passes through untouched; anything else is kept as
    /// the source and the target is named after `T`.
    pub(crate) fn from_parser<T, E>(raw: &str, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut slot = Some(error);
        if let Some(own) = (&mut slot as &mut dyn Any)
            .downcast_mut::<Option<Self>>()
            .and_then(Option::take)
        {
            return own;
        }

        let mut converted = Self::new(raw, type_name::<T>());
        converted.source = slot.map(|e| Arc::new(e) as Arc<dyn StdError + Send + Sync>);
        converted
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not parse `{}` as {}", self.value, self.target)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl StdError for ConversionError {}

// ============================================================================
// CONVERTER TRAIT
// ============================================================================

/// Converts one raw string into a `T`.
///
/// Converters are pure: the same input always yields the same result and
/// nothing outside the return value is touched.
pub trait Converter<T> {
    /// Converts `raw`, or reports why it is not a valid `T`.
    fn convert(&self, raw: &str) -> Result<T, ConversionError>;
}

impl<T, E, F> Converter<T> for F
where
    F: Fn(&str) -> Result<T, E>,
    E: StdError + Send + Sync + 'static,
{
    fn convert(&self, raw: &str) -> Result<T, ConversionError> {
        self(raw).map_err(|e| ConversionError::from_parser::<T, E>(raw, e))
    }
}

// ============================================================================
// STANDARD CONVERTERS
// ============================================================================

/// Accepts any input and returns it unchanged.
pub fn strings(raw: &str) -> Result<String, ConversionError> {
    Ok(raw.to_owned())
}

/// Accepts exactly `"true"` or `"false"`.
///
/// Matching is case-sensitive; `"True"`, `"1"` and `"yes"` are rejected.
pub fn booleans(raw: &str) -> Result<bool, ConversionError> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConversionError::new(raw, "a boolean")),
    }
}

/// Parses a UUID in any of the textual forms `uuid` understands.
#[cfg(feature = "uuid")]
pub fn uuids(raw: &str) -> Result<uuid::Uuid, ConversionError> {
    uuid::Uuid::parse_str(raw).map_err(|e| ConversionError::new(raw, "a UUID").with_source(e))
}

/// Parses an ISO-8601 date-time with a UTC offset.
///
/// Full RFC 3339 (`2024-05-01T12:00:00+02:00`) is tried first; the
/// minute-precision form without seconds (`2024-05-01T12:00+02:00`,
/// `2024-05-01T12:00Z`) is accepted as well.
#[cfg(feature = "temporal")]
pub fn timestamps(raw: &str) -> Result<chrono::DateTime<chrono::FixedOffset>, ConversionError> {
    chrono::DateTime::parse_from_rfc3339(raw).or_else(|error| {
        minute_precision(raw)
            .ok_or_else(|| ConversionError::new(raw, "an ISO-8601 timestamp").with_source(error))
    })
}

#[cfg(feature = "temporal")]
fn minute_precision(raw: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    if let Some(utc) = raw.strip_suffix(['Z', 'z']) {
        let naive = chrono::NaiveDateTime::parse_from_str(utc, "%Y-%m-%dT%H:%M").ok()?;
        return Some(naive.and_utc().fixed_offset());
    }
    chrono::DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%:z").ok()
}

/// Parses a decimal integer of any size, with an optional leading sign.
#[cfg(feature = "big-integer")]
pub fn big_integers(raw: &str) -> Result<num_bigint::BigInt, ConversionError> {
    // num-bigint tolerates `_` separators; request input should not.
    if raw.contains('_') {
        return Err(ConversionError::new(raw, "an integer"));
    }
    raw.parse::<num_bigint::BigInt>()
        .map_err(|e| ConversionError::new(raw, "an integer").with_source(e))
}

/// Parses a decimal `u32`.
pub fn unsigned_integers(raw: &str) -> Result<u32, ConversionError> {
    integers(raw)
}

/// Parses a decimal `u64`.
pub fn unsigned_longs(raw: &str) -> Result<u64, ConversionError> {
    integers(raw)
}

/// Parses a decimal `i32`.
pub fn signed_integers(raw: &str) -> Result<i32, ConversionError> {
    integers(raw)
}

/// Parses a decimal `i64`.
pub fn signed_longs(raw: &str) -> Result<i64, ConversionError> {
    integers(raw)
}

/// Parses an `f64`, including exponents, `inf` and `NaN`.
pub fn doubles(raw: &str) -> Result<f64, ConversionError> {
    raw.parse::<f64>()
        .map_err(|e| ConversionError::new(raw, "a floating point value").with_source(e))
}

/// Parses a decimal integer of any primitive width.
///
/// ```rust,ignore
/// let port = session.add_required("port", integers::<u16>)?;
/// ```
pub fn integers<T: PrimitiveInteger>(raw: &str) -> Result<T, ConversionError> {
    raw.parse::<T>()
        .map_err(|e| ConversionError::new(raw, T::DESCRIPTION).with_source(e))
}

/// Primitive integer types accepted by [`integers`].
pub trait PrimitiveInteger: FromStr<Err = ParseIntError> {
    /// Noun phrase used in conversion error messages.
    const DESCRIPTION: &'static str;
}

macro_rules! primitive_integer {
    ($($ty:ty => $desc:literal),* $(,)?) => {
        $(
            impl PrimitiveInteger for $ty {
                const DESCRIPTION: &'static str = $desc;
            }
        )*
    };
}

primitive_integer! {
    u8 => "an unsigned 8-bit integer",
    u16 => "an unsigned 16-bit integer",
    u32 => "an unsigned 32-bit integer",
    u64 => "an unsigned 64-bit integer",
    u128 => "an unsigned 128-bit integer",
    usize => "an unsigned integer",
    i8 => "a signed 8-bit integer",
    i16 => "a signed 16-bit integer",
    i32 => "a signed 32-bit integer",
    i64 => "a signed 64-bit integer",
    i128 => "a signed 128-bit integer",
    isize => "a signed integer",
}
