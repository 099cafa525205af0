//! Canonical text form of a quaternion
//!
//! `[q0 q1 q2 q3]` with single spaces, each component written as the shortest
//! decimal that reads back to the same `f64`. The output is always accepted by
//! the parser in [`crate::parse`].

use std::fmt;

use crate::Quaternion;

pub(crate) const FORMAT_START: char = '[';
pub(crate) const FORMAT_END: char = ']';
const FORMAT_SEP: char = ' ';

/// Write one component: `1.0`, `-0.5`, `1e-5`, `Infinity`, `-Infinity` or `NaN`
fn write_component(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value.is_infinite() {
        f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        // Debug keeps the trailing ".0" on integral values
        write!(f, "{:?}", value)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", FORMAT_START)?;
        for (i, value) in self.to_array().into_iter().enumerate() {
            if i > 0 {
                write!(f, "{}", FORMAT_SEP)?;
            }
            write_component(f, value)?;
        }
        write!(f, "{}", FORMAT_END)
    }
}
