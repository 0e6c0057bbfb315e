//! # nebula-vindicator
//!
//! Declarative validation of raw request parameters.
//!
//! Parameters are declared up front, each with a converter from the raw
//! string to a typed value. One call to
//! [`check`](session::ValidationSession::check) then validates a whole batch
//! of input and either fills every typed handle or returns a single error
//! listing every missing or malformed parameter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nebula_vindicator::prelude::*;
//!
//! let mut session = ValidationSession::new();
//! let id = session.add_required("id", uuids)?;
//! let verbose = session.add_optional("verbose", booleans)?;
//!
//! session.check(&query)?;
//!
//! println!("{} {:?}", id.get()?, verbose.get()?);
//! ```
//!
//! ## Lifecycle
//!
//! Registration returns handles immediately. Reading a handle before the
//! check is a [`StateError`](error::StateError). Registering the same name
//! twice fails on the spot with a
//! [`RegistrationError`](error::RegistrationError). Missing and malformed
//! values are never reported one by one; they are gathered into a
//! [`Failures`](failure::Failures) map and turned into one error by the
//! session's [`ErrorFormatter`](format::ErrorFormatter).
//!
//! ## Converters
//!
//! - **Text**: [`strings`](convert::strings), [`booleans`](convert::booleans)
//! - **Integers**: [`unsigned_integers`](convert::unsigned_integers),
//!   [`unsigned_longs`](convert::unsigned_longs),
//!   [`signed_integers`](convert::signed_integers),
//!   [`signed_longs`](convert::signed_longs), [`integers`](convert::integers),
//!   `big_integers` (feature `big-integer`)
//! - **Floating point**: [`doubles`](convert::doubles)
//! - **Identifiers and time**: `uuids` (feature `uuid`), `timestamps`
//!   (feature `temporal`)
//!
//! Any `Fn(&str) -> Result<T, E>` with `E: std::error::Error` works too.

pub mod convert;
pub mod error;
pub mod failure;
pub mod format;
pub mod handle;
pub mod prelude;
pub mod session;
pub mod source;
