//! Parser for the `[q0 q1 q2 q3]` text form
//!
//! Grammar: `'[' WS? q0 WS q1 WS q2 WS q3 WS? ']'` where each component is a
//! floating point literal. Accepted literals are everything `f64::from_str`
//! takes (decimal, `e`/`E` exponent, `inf`, `Infinity`, `NaN`, ...) plus
//! hexadecimal floats such as `-0xa.cp0` and an optional `d`/`f` type suffix
//! on numeric literals (`1.5d`, `0x1p3f`).
//!
//! Parsing never recovers: any structural or numeric problem is a [`ParseError`].

use std::fmt;
use std::str::FromStr;

use crate::format::{FORMAT_END, FORMAT_START};
use crate::Quaternion;

/// Number of components in the text form
const COMPONENTS: usize = 4;

/// Binary exponents beyond this are saturated; the result is already 0 or infinite
const MAX_BINARY_EXPONENT: i64 = 100_000;

/// Reason a string was rejected as a quaternion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not start with `[`
    MissingOpeningBracket,
    /// The text does not end with `]`
    MissingClosingBracket,
    /// There were not exactly four tokens between the brackets
    WrongComponentCount { found: usize },
    /// A token is not a floating point literal
    InvalidComponent { index: usize, token: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingOpeningBracket => write!(f, "expected '{}' at start", FORMAT_START),
            ParseError::MissingClosingBracket => write!(f, "expected '{}' at end", FORMAT_END),
            ParseError::WrongComponentCount { found } => {
                write!(f, "expected {} components, found {}", COMPONENTS, found)
            }
            ParseError::InvalidComponent { index, token } => {
                write!(f, "component q{} is not a number: '{}'", index, token)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Quaternion {
    /// Parse the `[q0 q1 q2 q3]` form produced by `Display`
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        s.parse()
    }
}

impl FromStr for Quaternion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_quaternion(s).map_err(|err| {
            log::debug!("Rejected quaternion text {:?}: {}", s, err);
            err
        })
    }
}

fn parse_quaternion(s: &str) -> Result<Quaternion, ParseError> {
    let inner = s
        .strip_prefix(FORMAT_START)
        .ok_or(ParseError::MissingOpeningBracket)?;
    let inner = inner
        .strip_suffix(FORMAT_END)
        .ok_or(ParseError::MissingClosingBracket)?;

    let tokens: Vec<&str> = inner.split_whitespace().collect();
    if tokens.len() != COMPONENTS {
        return Err(ParseError::WrongComponentCount { found: tokens.len() });
    }

    let mut components = [0.0; COMPONENTS];
    for (index, token) in tokens.iter().enumerate() {
        components[index] = parse_component(token).ok_or_else(|| ParseError::InvalidComponent {
            index,
            token: token.to_string(),
        })?;
    }

    Ok(Quaternion::from_array(components))
}

/// Parse a single floating point literal
fn parse_component(token: &str) -> Option<f64> {
    let token = strip_type_suffix(token);

    let (negative, unsigned) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };

    if let Some(hex) = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
    {
        let value = parse_hex_float(hex)?;
        return Some(if negative { -value } else { value });
    }

    token.parse::<f64>().ok()
}

/// Drop a trailing `d`/`D`/`f`/`F` that follows a digit or decimal point
///
/// `inf` ends in `f` but is preceded by a letter, so it is left alone.
fn strip_type_suffix(token: &str) -> &str {
    let bytes = token.as_bytes();
    match bytes {
        [.., prev, b'd' | b'D' | b'f' | b'F'] if prev.is_ascii_digit() || *prev == b'.' => {
            &token[..token.len() - 1]
        }
        _ => token,
    }
}

/// Parse the part of a hex float after `0x`: `<hex>[.<hex>]p[+-]<dec>`
///
/// The binary exponent is mandatory. Up to 15 significant hex digits are kept
/// exactly; later non-zero digits are folded into a sticky bit so that the
/// final conversion rounds to nearest.
fn parse_hex_float(body: &str) -> Option<f64> {
    let p = body.find(&['p', 'P'][..])?;
    let (mantissa, exponent) = (&body[..p], &body[p + 1..]);

    let (int_digits, frac_digits) = match mantissa.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (mantissa, ""),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut bits: u64 = 0;
    let mut scale: i64 = 0;
    let mut sticky = false;

    for (digits, fractional) in [(int_digits, false), (frac_digits, true)] {
        for c in digits.chars() {
            let d = u64::from(c.to_digit(16)?);
            if bits >> 56 == 0 {
                bits = (bits << 4) | d;
                if fractional {
                    scale -= 4;
                }
            } else {
                sticky |= d != 0;
                if !fractional {
                    scale += 4;
                }
            }
        }
    }
    if sticky {
        bits |= 1;
    }

    let exponent = parse_binary_exponent(exponent)?;
    Some(scale_by_power_of_two(bits as f64, scale + exponent))
}

/// Signed decimal exponent, saturated to `±MAX_BINARY_EXPONENT`
fn parse_binary_exponent(s: &str) -> Option<i64> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return None;
    }

    let mut value: i64 = 0;
    for c in digits.chars() {
        let d = i64::from(c.to_digit(10)?);
        value = (value * 10 + d).min(MAX_BINARY_EXPONENT);
    }
    Some(if negative { -value } else { value })
}

/// `x * 2^exp` without overflowing the intermediate power of two
fn scale_by_power_of_two(mut x: f64, mut exp: i64) -> f64 {
    const MAX_EXP: i64 = 1023;
    const MIN_EXP: i64 = -1022;

    if x == 0.0 {
        return x;
    }
    while exp > MAX_EXP {
        x *= power_of_two(MAX_EXP);
        exp -= MAX_EXP;
        if x.is_infinite() {
            return x;
        }
    }
    while exp < MIN_EXP {
        x *= power_of_two(MIN_EXP);
        exp -= MIN_EXP;
        if x == 0.0 {
            return x;
        }
    }
    x * power_of_two(exp)
}

/// Exact `2^exp` for a normal exponent
fn power_of_two(exp: i64) -> f64 {
    f64::from_bits(((exp + 1023) as u64) << 52)
}
