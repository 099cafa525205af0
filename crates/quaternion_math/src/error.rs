//! Quaternion error types
//!
//! Construction and algebra failures. Text parsing has its own
//! [`ParseError`] which converts into [`QuaternionError::Parse`].

use std::fmt;

use crate::parse::ParseError;

/// Error type for quaternion construction and algebra
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuaternionError {
    /// A vector operand did not have exactly three components (holds the length found)
    WrongDimension(usize),
    /// The operation is undefined for a quaternion whose norm is exactly zero
    ZeroNorm,
    /// The text was not a well-formed quaternion
    Parse(ParseError),
}

impl fmt::Display for QuaternionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuaternionError::WrongDimension(len) => {
                write!(f, "Invalid argument: vector part must have 3 components, got {}", len)
            }
            QuaternionError::ZeroNorm => write!(f, "Invalid operation: quaternion has zero norm"),
            QuaternionError::Parse(err) => write!(f, "Quaternion parse error: {}", err),
        }
    }
}

impl std::error::Error for QuaternionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QuaternionError::Parse(err) => Some(err),
            QuaternionError::WrongDimension(_) => None,
            QuaternionError::ZeroNorm => None,
        }
    }
}

impl From<ParseError> for QuaternionError {
    fn from(err: ParseError) -> Self {
        QuaternionError::Parse(err)
    }
}
