//! Common imports for declaring and checking parameters.
//!
//! ```rust,ignore
//! use nebula_vindicator::prelude::*;
//! ```

pub use crate::convert::{
    ConversionError, Converter, PrimitiveInteger, booleans, doubles, integers, signed_integers,
    signed_longs, strings, unsigned_integers, unsigned_longs,
};
#[cfg(feature = "big-integer")]
pub use crate::convert::big_integers;
#[cfg(feature = "temporal")]
pub use crate::convert::timestamps;
#[cfg(feature = "uuid")]
pub use crate::convert::uuids;
pub use crate::error::{RegistrationError, StateError};
pub use crate::failure::{Failures, ParameterFailure, ValidationFailure};
pub use crate::format::{
    DEFAULT_BANNER, ErrorFormatter, FailureFormatter, FormatterOptions, PrettyFormatter, pretty,
};
pub use crate::handle::{Parameter, ParameterState};
pub use crate::session::ValidationSession;
pub use crate::source::{ParameterSource, RawParameters};
