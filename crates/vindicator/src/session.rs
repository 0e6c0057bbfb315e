//! Registration and batched validation.
//!
//! A [`ValidationSession`] is created once per request. Parameters are
//! registered first, each registration returning a typed [`Parameter`]
//! handle. A single [`check`](ValidationSession::check) then validates the
//! whole input, populating every handle or returning one error that
//! describes every problem found.
//!
//! ```rust,ignore
//! use nebula_vindicator::prelude::*;
//!
//! let mut session = ValidationSession::new();
//! let id = session.add_required("id", uuids)?;
//! let limit = session.add_optional("limit", unsigned_integers)?;
//!
//! session.check(&query)?;
//!
//! let id = id.get()?;
//! let limit = limit.get()?.unwrap_or(50);
//! ```

use crate::convert::{ConversionError, Converter};
use crate::error::RegistrationError;
use crate::failure::{Failures, ParameterFailure, ValidationFailure};
use crate::format::{ErrorFormatter, FailureFormatter, FormatterOptions, PrettyFormatter};
use crate::handle::Parameter;
use crate::source::ParameterSource;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

type ConvertFn<T> = Box<dyn Fn(&str) -> Result<T, ConversionError> + Send + Sync>;

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Type-erased view of a registered parameter.
trait Evaluate: Send + Sync {
    fn is_required(&self) -> bool;

    /// Validates the raw values supplied for this parameter and settles its
    /// handle. `None` means the name was absent from the input.
    fn evaluate(&self, values: Option<&[&str]>) -> Result<(), ParameterFailure>;
}

struct Descriptor<T> {
    handle: Parameter<T>,
    convert: ConvertFn<T>,
    /// Value used when the name is absent; `None` makes the parameter required.
    absent: Option<fn() -> T>,
}

impl<T: Send + Sync> Evaluate for Descriptor<T> {
    fn is_required(&self) -> bool {
        self.absent.is_none()
    }

    fn evaluate(&self, values: Option<&[&str]>) -> Result<(), ParameterFailure> {
        let Some(values) = values.filter(|values| !values.is_empty()) else {
            return match self.absent {
                Some(absent) => {
                    self.handle.settle(Some(absent()));
                    Ok(())
                }
                None => {
                    self.handle.settle(None);
                    Err(ParameterFailure::Missing {
                        name: self.handle.name().to_owned(),
                    })
                }
            };
        };

        // Every value is converted; the last success is kept and the last
        // failure is reported.
        let mut converted = None;
        let mut failed = None;
        for &raw in values {
            match (self.convert)(raw) {
                Ok(value) => converted = Some(value),
                Err(error) => failed = Some(error),
            }
        }

        match failed {
            Some(error) => {
                self.handle.settle(None);
                Err(ParameterFailure::Conversion {
                    name: self.handle.name().to_owned(),
                    error,
                })
            }
            None => {
                self.handle.settle(converted);
                Ok(())
            }
        }
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Collects parameter declarations and validates raw input against them.
///
/// `E` is the aggregate error returned by [`check`](Self::check). The
/// default, [`ValidationFailure`], keeps every per-parameter cause.
pub struct ValidationSession<E = ValidationFailure> {
    parameters: IndexMap<Arc<str>, Box<dyn Evaluate>>,
    formatter: Box<dyn ErrorFormatter<E> + Send + Sync>,
}

impl ValidationSession<ValidationFailure> {
    /// Creates a session that reports failures as [`ValidationFailure`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_formatter(FailureFormatter::default())
    }

    /// Like [`new`](Self::new), with a custom report layout.
    #[must_use]
    pub fn with_options(options: FormatterOptions) -> Self {
        Self::with_formatter(FailureFormatter::new(options))
    }
}

impl Default for ValidationSession<ValidationFailure> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ValidationSession<E> {
    /// Creates a session that builds its errors with `formatter`.
    pub fn with_formatter<F>(formatter: F) -> Self
    where
        F: ErrorFormatter<E> + Send + Sync + 'static,
    {
        Self {
            parameters: IndexMap::new(),
            formatter: Box::new(formatter),
        }
    }

    /// Creates a session that pretty-prints failures and passes the message
    /// to `make`.
    pub fn with_messages<F>(make: F) -> Self
    where
        F: Fn(String) -> E + Send + Sync + 'static,
    {
        Self::with_formatter(PrettyFormatter::new(make))
    }

    /// Registers a parameter that must be present in the input.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::AlreadyRegistered`] if `name` is taken.
    pub fn add_required<T, C>(
        &mut self,
        name: impl Into<String>,
        converter: C,
    ) -> Result<Parameter<T>, RegistrationError>
    where
        T: Send + Sync + 'static,
        C: Converter<T> + Send + Sync + 'static,
    {
        self.register(name.into(), move |raw: &str| converter.convert(raw), None)
    }

    /// Registers a parameter that may be absent.
    ///
    /// After a successful check the handle holds `None` if the name was not
    /// supplied, `Some(value)` otherwise.
    ///
    /// # Errors
    ///
    /// [`RegistrationError::AlreadyRegistered`] if `name` is taken.
    pub fn add_optional<T, C>(
        &mut self,
        name: impl Into<String>,
        converter: C,
    ) -> Result<Parameter<Option<T>>, RegistrationError>
    where
        T: Send + Sync + 'static,
        C: Converter<T> + Send + Sync + 'static,
    {
        let absent: fn() -> Option<T> = || None;
        self.register(
            name.into(),
            move |raw: &str| converter.convert(raw).map(Some),
            Some(absent),
        )
    }

    fn register<T, F>(
        &mut self,
        name: String,
        convert: F,
        absent: Option<fn() -> T>,
    ) -> Result<Parameter<T>, RegistrationError>
    where
        T: Send + Sync + 'static,
        F: Fn(&str) -> Result<T, ConversionError> + Send + Sync + 'static,
    {
        if self.parameters.contains_key(name.as_str()) {
            return Err(RegistrationError::AlreadyRegistered { name });
        }

        let name: Arc<str> = name.into();
        let handle = Parameter::new(Arc::clone(&name));
        debug!(parameter = %name, required = absent.is_none(), "registered parameter");

        let descriptor = Descriptor {
            handle: handle.clone(),
            convert: Box::new(convert),
            absent,
        };
        self.parameters.insert(name, Box::new(descriptor));
        Ok(handle)
    }

    /// Validates `input` against every registered parameter.
    ///
    /// All parameters are evaluated; failures are collected and returned
    /// together as one error built by the session's formatter. Afterwards no
    /// handle is left unvalidated.
    ///
    /// Calling `check` again re-validates and overwrites every handle.
    ///
    /// # Errors
    ///
    /// The formatter's error if any parameter is missing or fails to convert.
    pub fn check<S>(&self, input: &S) -> Result<(), E>
    where
        S: ParameterSource + ?Sized,
    {
        let span = debug_span!("check", parameters = self.parameters.len());
        let _guard = span.enter();

        let mut failures = Failures::new();
        for (name, descriptor) in &self.parameters {
            let values = input.values_for(name).map(|values| {
                values
                    .iter()
                    .map(AsRef::<str>::as_ref)
                    .collect::<SmallVec<[&str; 4]>>()
            });

            match descriptor.evaluate(values.as_deref()) {
                Ok(()) => trace!(parameter = %name, "parameter accepted"),
                Err(failure) => {
                    trace!(
                        parameter = %name,
                        required = descriptor.is_required(),
                        code = failure.code(),
                        "parameter rejected"
                    );
                    failures.insert(failure);
                }
            }
        }

        if failures.is_empty() {
            return Ok(());
        }

        debug!(failed = failures.len(), "parameter validation failed");
        Err(self.formatter.format(failures))
    }

    /// Number of registered parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Whether a parameter named `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(|name| &**name)
    }
}

impl<E> fmt::Debug for ValidationSession<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationSession")
            .field("parameters", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{booleans, signed_integers, strings, unsigned_integers};
    use crate::error::StateError;
    use crate::handle::ParameterState;
    use crate::source::RawParameters;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn duplicate_names_fail_at_registration() {
        let mut session = ValidationSession::new();
        session.add_required("p0", strings).unwrap();

        let err = session.add_optional("p0", booleans).unwrap_err();
        assert_eq!(
            err,
            RegistrationError::AlreadyRegistered { name: "p0".into() }
        );
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn handles_start_unvalidated() {
        let mut session = ValidationSession::new();
        let p = session.add_required("p", strings).unwrap();
        assert_eq!(p.state(), ParameterState::Unvalidated);
        assert!(matches!(p.get(), Err(StateError::NotValidated { .. })));
    }

    #[test]
    fn last_value_wins() {
        let mut session = ValidationSession::new();
        let n = session.add_required("n", signed_integers).unwrap();

        let input = RawParameters::new().with("n", "1").with("n", "-2").with("n", "3");
        session.check(&input).unwrap();
        assert_eq!(n.get().unwrap(), 3);
    }

    #[test]
    fn any_bad_value_fails_the_parameter() {
        let mut session = ValidationSession::new();
        let n = session.add_required("n", unsigned_integers).unwrap();

        let input = RawParameters::new()
            .with("n", "bad")
            .with("n", "7")
            .with("n", "worse");
        let err = session.check(&input).unwrap_err();

        let cause = err.cause("n").unwrap();
        assert_eq!(cause.conversion_error().unwrap().value(), "worse");
        assert_eq!(n.state(), ParameterState::Invalid);
    }

    #[test]
    fn empty_value_list_counts_as_absent() {
        let mut session = ValidationSession::new();
        let opt = session.add_optional("opt", strings).unwrap();
        let req = session.add_required("req", strings).unwrap();

        let input: HashMap<&str, Vec<&str>> = HashMap::from([("opt", vec![]), ("req", vec![])]);
        let err = session.check(&input).unwrap_err();

        assert_eq!(opt.get().unwrap(), None);
        assert_eq!(req.state(), ParameterState::Invalid);
        assert!(matches!(
            err.cause("req"),
            Some(ParameterFailure::Missing { .. })
        ));
    }

    #[test]
    fn every_handle_is_settled_after_a_failed_check() {
        let mut session = ValidationSession::new();
        let good = session.add_required("good", booleans).unwrap();
        let bad = session.add_required("bad", booleans).unwrap();

        let input = HashMap::from([("good", ["true"]), ("bad", ["nope"])]);
        assert!(session.check(&input).is_err());

        assert!(good.get().unwrap());
        assert_eq!(bad.get(), Err(StateError::Invalid { name: "bad".into() }));
    }

    #[test]
    fn introspection() {
        let mut session = ValidationSession::new();
        assert!(session.is_empty());
        session.add_required("b", strings).unwrap();
        session.add_optional("a", strings).unwrap();

        assert!(session.contains("a"));
        assert!(!session.contains("c"));
        assert_eq!(session.names().collect::<Vec<_>>(), ["b", "a"]);
        assert!(format!("{session:?}").contains("\"b\""));
    }

    #[test]
    fn custom_formatter_receives_every_failure() {
        let mut session =
            ValidationSession::with_formatter(|failures: Failures| failures.to_message_map());
        session.add_required("x", strings).unwrap();
        session.add_required("y", booleans).unwrap();

        let input = HashMap::from([("y", vec!["maybe"])]);
        let map = session.check(&input).unwrap_err();

        assert_eq!(map.len(), 2);
        assert_eq!(map["x"], "the parameter is required but was missing");
        assert_eq!(map["y"], "could not parse `maybe` as a boolean");
    }
}
