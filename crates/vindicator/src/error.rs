//! Errors raised outside of the aggregate validation report.
//!
//! Missing and unconvertible parameters never surface here; they are
//! collected into [`Failures`](crate::failure::Failures) and reported once per
//! check. The errors below signal misuse of the API itself.

/// Registering a parameter failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RegistrationError {
    /// A parameter with the same name is already registered on the session.
    #[error("a parameter named `{name}` has already been registered")]
    AlreadyRegistered { name: String },
}

impl RegistrationError {
    /// Name of the parameter the registration was for.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::AlreadyRegistered { name } => name,
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered { .. } => "PARAM_ALREADY_REGISTERED",
        }
    }
}

/// A parameter handle was read in a state that has no value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StateError {
    /// The session has not run `check` yet.
    #[error("parameters have not yet been validated (reading `{name}`)")]
    NotValidated { name: String },

    /// The last `check` rejected this parameter.
    #[error("parameter `{name}` failed validation and has no value")]
    Invalid { name: String },
}

impl StateError {
    /// Name of the parameter that was read.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::NotValidated { name } | Self::Invalid { name } => name,
        }
    }

    /// Machine-readable error code for programmatic handling.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotValidated { .. } => "PARAM_NOT_VALIDATED",
            Self::Invalid { .. } => "PARAM_INVALID",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_messages() {
        let err = RegistrationError::AlreadyRegistered { name: "p0".into() };
        assert_eq!(
            err.to_string(),
            "a parameter named `p0` has already been registered"
        );

        let err = StateError::NotValidated { name: "p0".into() };
        assert_eq!(
            err.to_string(),
            "parameters have not yet been validated (reading `p0`)"
        );

        let err = StateError::Invalid { name: "p1".into() };
        assert_eq!(
            err.to_string(),
            "parameter `p1` failed validation and has no value"
        );
    }

    #[test]
    fn codes_and_names() {
        let errors = [
            StateError::NotValidated { name: "a".into() },
            StateError::Invalid { name: "b".into() },
        ];
        let codes: Vec<&str> = errors.iter().map(StateError::code).collect();
        assert_eq!(codes, ["PARAM_NOT_VALIDATED", "PARAM_INVALID"]);
        assert_eq!(errors[1].name(), "b");

        let err = RegistrationError::AlreadyRegistered { name: "dup".into() };
        assert_eq!(err.name(), "dup");
        assert_eq!(err.code(), "PARAM_ALREADY_REGISTERED");
    }
}
