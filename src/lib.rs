//! Quaternion - hypercomplex value type with configurable tolerances
//!
//! Re-exports the [`quaternion_math`] crate and adds [`config`], which loads
//! the tolerances used for approximate comparisons and the log filter.

pub mod config;

pub use quaternion_math::{ParseError, Quaternion, QuaternionError};
