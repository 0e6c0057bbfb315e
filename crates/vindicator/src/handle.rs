//! Typed parameter handles.
//!
//! Registering a parameter returns a [`Parameter<T>`] right away. The handle
//! holds no value until the owning session runs `check`; after that it holds
//! either the converted value or a marker that validation rejected it.
//!
//! ```text
//! Unvalidated ──check──▶ Valid(value)
//!             └─check──▶ Invalid
//! ```

use crate::error::StateError;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Value cell shared between a handle and its session descriptor.
#[derive(Debug)]
pub(crate) enum Slot<T> {
    Unvalidated,
    Valid(T),
    Invalid,
}

/// Observable lifecycle state of a [`Parameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterState {
    /// `check` has not run yet.
    Unvalidated,
    /// The last `check` converted a value.
    Valid,
    /// The last `check` rejected the parameter.
    Invalid,
}

/// Caller-side view of a registered parameter.
///
/// Cloning is cheap; every clone observes the same cell.
pub struct Parameter<T> {
    name: Arc<str>,
    slot: Arc<RwLock<Slot<T>>>,
}

impl<T> Parameter<T> {
    pub(crate) fn new(name: Arc<str>) -> Self {
        Self {
            name,
            slot: Arc::new(RwLock::new(Slot::Unvalidated)),
        }
    }

    pub(crate) fn settle(&self, value: Option<T>) {
        *self.slot.write() = match value {
            Some(value) => Slot::Valid(value),
            None => Slot::Invalid,
        };
    }

    /// The registered parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ParameterState {
        match *self.slot.read() {
            Slot::Unvalidated => ParameterState::Unvalidated,
            Slot::Valid(_) => ParameterState::Valid,
            Slot::Invalid => ParameterState::Invalid,
        }
    }

    /// Returns `true` once the owning session has run `check`.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.state() != ParameterState::Unvalidated
    }

    /// Runs `f` on the validated value.
    ///
    /// # Errors
    ///
    /// [`StateError::NotValidated`] before `check`, [`StateError::Invalid`]
    /// if `check` rejected this parameter.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, StateError> {
        match &*self.slot.read() {
            Slot::Valid(value) => Ok(f(value)),
            Slot::Unvalidated => Err(StateError::NotValidated {
                name: self.name.to_string(),
            }),
            Slot::Invalid => Err(StateError::Invalid {
                name: self.name.to_string(),
            }),
        }
    }

    /// Returns a copy of the validated value.
    ///
    /// # Errors
    ///
    /// Same as [`with`](Self::with).
    pub fn get(&self) -> Result<T, StateError>
    where
        T: Clone,
    {
        self.with(T::clone)
    }
}

impl<T> Clone for Parameter<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Parameter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parameter")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish()
    }
}
