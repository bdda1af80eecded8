//! Signed nanosecond durations with the `"1h30m"` text grammar.
//!
//! Form values such as `timeout=1m30s` or `delay=-1.5h` are bound into
//! [`Duration`]. The grammar is a possibly signed sequence of decimal numbers,
//! each with an optional fraction and a mandatory unit suffix. Valid units are
//! `ns`, `us` (or `µs` / `μs`), `ms`, `s`, `m` and `h`. The bare string `"0"`
//! is also accepted.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

/// A signed span of time with nanosecond precision.
///
/// Unlike [`std::time::Duration`] this type can be negative, and it is the
/// distinguished 64-bit kind the form binder parses with the unit grammar
/// instead of as a plain integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);
    pub const MAX: Duration = Duration(i64::MAX);
    pub const MIN: Duration = Duration(i64::MIN);

    pub const fn from_nanos(nanos: i64) -> Self {
        Duration(nanos)
    }

    pub const fn from_millis(millis: i64) -> Self {
        Duration(millis.saturating_mul(MILLISECOND as i64))
    }

    pub const fn from_secs(secs: i64) -> Self {
        Duration(secs.saturating_mul(SECOND as i64))
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Convert to a [`std::time::Duration`]. Returns `None` for negative spans.
    pub fn to_std(self) -> Option<std::time::Duration> {
        u64::try_from(self.0)
            .ok()
            .map(std::time::Duration::from_nanos)
    }

    /// Parse the unit grammar described in the module docs.
    pub fn parse(s: &str) -> Result<Self, ParseDurationError> {
        parse_duration(s)
    }
}

impl TryFrom<std::time::Duration> for Duration {
    type Error = ParseDurationError;

    fn try_from(d: std::time::Duration) -> Result<Self, Self::Error> {
        i64::try_from(d.as_nanos())
            .map(Duration)
            .map_err(|_| ParseDurationError::new(ErrorKind::Overflow, &format!("{d:?}")))
    }
}

impl FromStr for Duration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s)
    }
}

/// Error returned by [`Duration::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDurationError {
    kind: ErrorKind,
    input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorKind {
    Invalid,
    MissingUnit,
    UnknownUnit(String),
    Overflow,
}

impl ParseDurationError {
    fn new(kind: ErrorKind, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

impl fmt::Display for ParseDurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Invalid => write!(f, "invalid duration {:?}", self.input),
            ErrorKind::MissingUnit => write!(f, "missing unit in duration {:?}", self.input),
            ErrorKind::UnknownUnit(u) => {
                write!(f, "unknown unit {:?} in duration {:?}", u, self.input)
            }
            ErrorKind::Overflow => write!(f, "duration out of range {:?}", self.input),
        }
    }
}

impl std::error::Error for ParseDurationError {}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Consume leading decimal digits. `None` on overflow past `i64::MAX`.
fn leading_int(s: &str) -> Option<(u64, &str)> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    for b in s[..end].bytes() {
        x = x.checked_mul(10)?.checked_add(u64::from(b - b'0'))?;
        if x > 1 << 63 {
            return None;
        }
    }
    Some((x, &s[end..]))
}

/// Consume leading fraction digits, dropping precision once it would overflow.
fn leading_fraction(s: &str) -> (u64, f64, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut x: u64 = 0;
    let mut scale = 1.0;
    let mut overflow = false;
    for b in s[..end].bytes() {
        if overflow {
            continue;
        }
        if x > (i64::MAX as u64) / 10 {
            overflow = true;
            continue;
        }
        let y = x * 10 + u64::from(b - b'0');
        if y > 1 << 63 {
            overflow = true;
            continue;
        }
        x = y;
        scale *= 10.0;
    }
    (x, scale, &s[end..])
}

fn parse_duration(orig: &str) -> Result<Duration, ParseDurationError> {
    let err = |kind| ParseDurationError::new(kind, orig);

    let mut s = orig;
    let mut neg = false;
    if let Some(rest) = s.strip_prefix('-') {
        neg = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.is_empty() {
        return Err(err(ErrorKind::Invalid));
    }

    let mut total: u64 = 0;
    while !s.is_empty() {
        if !s.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(err(ErrorKind::Invalid));
        }

        let before = s.len();
        let (whole, rest) = leading_int(s).ok_or_else(|| err(ErrorKind::Invalid))?;
        s = rest;
        let has_int = before != s.len();

        let mut frac = 0;
        let mut scale = 1.0;
        let mut has_frac = false;
        if let Some(rest) = s.strip_prefix('.') {
            let before = rest.len();
            let (f, sc, rest) = leading_fraction(rest);
            frac = f;
            scale = sc;
            has_frac = before != rest.len();
            s = rest;
        }
        if !has_int && !has_frac {
            return Err(err(ErrorKind::Invalid));
        }

        let unit_end = s
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(s.len());
        if unit_end == 0 {
            return Err(err(ErrorKind::MissingUnit));
        }
        let unit = &s[..unit_end];
        s = &s[unit_end..];
        let unit = unit_nanos(unit).ok_or_else(|| err(ErrorKind::UnknownUnit(unit.to_string())))?;

        if whole > (1 << 63) / unit {
            return Err(err(ErrorKind::Overflow));
        }
        let mut v = whole * unit;
        if frac > 0 {
            v += (frac as f64 * (unit as f64 / scale)) as u64;
            if v > 1 << 63 {
                return Err(err(ErrorKind::Overflow));
            }
        }
        total = total
            .checked_add(v)
            .filter(|t| *t <= 1 << 63)
            .ok_or_else(|| err(ErrorKind::Overflow))?;
    }

    if neg {
        // 1 << 63 negates to i64::MIN exactly.
        return Ok(Duration((total as i64).wrapping_neg()));
    }
    if total > i64::MAX as u64 {
        return Err(err(ErrorKind::Overflow));
    }
    Ok(Duration(total as i64))
}

/// Render `v`'s low `prec` decimal digits as a fraction with trailing zeros
/// removed. Returns the fraction text (`""` when all zero) and `v / 10^prec`.
fn fmt_frac(mut v: u64, prec: u32) -> (String, u64) {
    let mut digits = Vec::new();
    let mut print = false;
    for _ in 0..prec {
        let digit = v % 10;
        print = print || digit != 0;
        if print {
            digits.push(char::from(b'0' + digit as u8));
        }
        v /= 10;
    }
    if !print {
        return (String::new(), v);
    }
    digits.push('.');
    (digits.into_iter().rev().collect(), v)
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        let u = self.0.unsigned_abs();

        if u < SECOND {
            let (prec, unit) = if u < MICROSECOND {
                return write!(f, "{sign}{u}ns");
            } else if u < MILLISECOND {
                (3, "\u{b5}s")
            } else {
                (6, "ms")
            };
            let (frac, whole) = fmt_frac(u, prec);
            return write!(f, "{sign}{whole}{frac}{unit}");
        }

        let (frac, secs) = fmt_frac(u, 9);
        let mins = secs / 60;
        let hours = mins / 60;
        if hours > 0 {
            write!(f, "{sign}{hours}h{}m{}{frac}s", mins % 60, secs % 60)
        } else if mins > 0 {
            write!(f, "{sign}{mins}m{}{frac}s", secs % 60)
        } else {
            write!(f, "{sign}{secs}{frac}s")
        }
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct DurationVisitor;

impl<'de> Visitor<'de> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("integer nanoseconds or a duration string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Duration, E> {
        Ok(Duration(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Duration, E> {
        i64::try_from(v)
            .map(Duration)
            .map_err(|_| E::custom(format!("duration out of range: {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Duration, E> {
        parse_duration(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DurationVisitor)
    }
}
