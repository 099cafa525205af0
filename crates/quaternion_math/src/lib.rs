//! Quaternion Mathematics Library
//!
//! This crate provides an immutable quaternion value type with its algebra,
//! two equality contracts and a bracketed text form.
//!
//! ## Core Types
//!
//! - [`Quaternion`] - four component hypercomplex number `(q0, q1, q2, q3)`
//! - [`QuaternionError`] - construction and zero-norm failures
//! - [`ParseError`] - rejection reasons for the text form
//!
//! ## Text Form
//!
//! `Display` writes `[q0 q1 q2 q3]` and `FromStr` reads it back:
//!
//! ```
//! use quaternion_math::Quaternion;
//!
//! let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
//! assert_eq!(q.to_string(), "[1.0 2.0 3.0 4.0]");
//! assert_eq!("[1.0 2.0 3.0 4.0]".parse::<Quaternion>(), Ok(q));
//! ```

mod error;
mod format;
mod parse;
mod quaternion;

pub use error::QuaternionError;
pub use parse::ParseError;
pub use quaternion::Quaternion;
