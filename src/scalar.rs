//! Conversion of one raw form string into one primitive value.
//!
//! Every primitive implements [`FormScalar`] once; plain fields, pointers,
//! collections and [`Opt`](crate::Opt) fields all reuse the same two entry
//! points:
//!
//! - [`FormScalar::from_form`] for plain fields, where an empty string means
//!   the kind's zero value (`false`, `0`, `0.0`);
//! - [`FormScalar::from_form_present`] for values inside a present optional,
//!   where an empty string is never turned into a zero.

use std::num::{IntErrorKind, ParseIntError};

use crate::duration::Duration;
use crate::error::BindError;
use crate::kind::ScalarKind;

const INVALID_SYNTAX: &str = "invalid syntax";
const OUT_OF_RANGE: &str = "value out of range";

/// A primitive that can be parsed from a single form value.
pub trait FormScalar: Sized {
    const KIND: ScalarKind;

    /// Plain-field conversion. Empty strings default where the kind has a
    /// zero value.
    fn from_form(raw: &str) -> Result<Self, BindError>;

    /// Conversion for a value known to be present. No empty-string defaulting.
    fn from_form_present(raw: &str) -> Result<Self, BindError>;
}

/// Build a parse error; the walker fills in the field name.
pub(crate) fn parse_error(kind: ScalarKind, raw: &str, reason: impl Into<String>) -> BindError {
    BindError::Parse {
        field: String::new(),
        kind: kind.name(),
        value: raw.to_string(),
        reason: reason.into(),
    }
}

/// Lenient boolean parse: `1 t T TRUE true True 0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn int_reason(e: &ParseIntError) -> &'static str {
    match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => OUT_OF_RANGE,
        _ => INVALID_SYNTAX,
    }
}

impl FormScalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn from_form(raw: &str) -> Result<Self, BindError> {
        if raw.is_empty() {
            return Ok(false);
        }
        parse_bool(raw).ok_or_else(|| parse_error(Self::KIND, raw, INVALID_SYNTAX))
    }

    /// A present boolean with no text is a flag: `?debug` means `debug=true`.
    fn from_form_present(raw: &str) -> Result<Self, BindError> {
        if raw.is_empty() {
            return Ok(true);
        }
        parse_bool(raw).ok_or_else(|| parse_error(Self::KIND, raw, INVALID_SYNTAX))
    }
}

macro_rules! signed_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl FormScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_form(raw: &str) -> Result<Self, BindError> {
                if raw.is_empty() {
                    return Ok(0);
                }
                Self::from_form_present(raw)
            }

            fn from_form_present(raw: &str) -> Result<Self, BindError> {
                raw.parse::<$ty>()
                    .map_err(|e| parse_error(Self::KIND, raw, int_reason(&e)))
            }
        }
    )*};
}

signed_scalar!(i8 => I8, i16 => I16, i32 => I32, i64 => I64, isize => Isize);

macro_rules! unsigned_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl FormScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_form(raw: &str) -> Result<Self, BindError> {
                if raw.is_empty() {
                    return Ok(0);
                }
                Self::from_form_present(raw)
            }

            fn from_form_present(raw: &str) -> Result<Self, BindError> {
                // `str::parse` accepts a leading `+` for unsigned types.
                if raw.starts_with(&['+', '-'][..]) {
                    return Err(parse_error(Self::KIND, raw, INVALID_SYNTAX));
                }
                raw.parse::<$ty>()
                    .map_err(|e| parse_error(Self::KIND, raw, int_reason(&e)))
            }
        }
    )*};
}

unsigned_scalar!(u8 => U8, u16 => U16, u32 => U32, u64 => U64, usize => Usize);

fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

macro_rules! float_scalar {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl FormScalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn from_form(raw: &str) -> Result<Self, BindError> {
                if raw.is_empty() {
                    return Ok(0.0);
                }
                Self::from_form_present(raw)
            }

            fn from_form_present(raw: &str) -> Result<Self, BindError> {
                let v = raw
                    .parse::<$ty>()
                    .map_err(|_| parse_error(Self::KIND, raw, INVALID_SYNTAX))?;
                // Finite text that rounds to infinity does not fit the width.
                if v.is_infinite() && !is_infinity_literal(raw) {
                    return Err(parse_error(Self::KIND, raw, OUT_OF_RANGE));
                }
                Ok(v)
            }
        }
    )*};
}

float_scalar!(f32 => F32, f64 => F64);

impl FormScalar for String {
    const KIND: ScalarKind = ScalarKind::Str;

    fn from_form(raw: &str) -> Result<Self, BindError> {
        Ok(raw.to_string())
    }

    fn from_form_present(raw: &str) -> Result<Self, BindError> {
        Ok(raw.to_string())
    }
}

impl FormScalar for Duration {
    const KIND: ScalarKind = ScalarKind::Duration;

    /// Durations have no empty default: `""` is rejected like any other
    /// malformed text.
    fn from_form(raw: &str) -> Result<Self, BindError> {
        Duration::parse(raw).map_err(|e| parse_error(Self::KIND, raw, e.to_string()))
    }

    fn from_form_present(raw: &str) -> Result<Self, BindError> {
        Self::from_form(raw)
    }
}
