//! [`Opt`] support for the [`validator`] crate.
//!
//! The rule engine is `validator`'s `#[derive(Validate)]`. This module adds
//! what it lacks for optional values:
//!
//! | Piece | Used as | Meaning |
//! |---|---|---|
//! | [`not_nil`] | `custom(function = "mox::not_nil")` | pointers and optional values must be set; zero values pass |
//! | [`present`] | `custom(function = "mox::present")` | an [`Opt`] must be present |
//! | `ValidateLength` / `ValidateRange` for `Opt<T>` | `length(..)`, `range(..)` | the rule sees the inner value; an absent value is skipped |
//!
//! ```
//! use mox::Opt;
//! use validator::Validate;
//!
//! #[derive(Validate)]
//! struct User {
//!     #[validate(custom(function = "mox::not_nil"), length(min = 1))]
//!     name: Opt<String>,
//! }
//!
//! assert!(User { name: Opt::some("1".into()) }.validate().is_ok());
//! assert!(User { name: Opt::some(String::new()) }.validate().is_err());
//! assert!(User { name: Opt::Absent }.validate().is_err());
//! ```
//!
//! Compare `not_nil` with `validator`'s own `required` (an `Option` must be
//! `Some`) and with plain `length` on an `Option` (checked only when set).

use std::collections::{BTreeMap, HashMap};

use validator::{ValidateLength, ValidateRange, ValidationError};

use crate::duration::Duration;
use crate::opt::Opt;

/// Error code reported by [`not_nil`].
pub const NOT_NIL: &str = "notnil";
/// Error code reported by [`present`].
pub const PRESENT: &str = "present";

/// Values that can be unset.
///
/// Only pointers and optional values are ever nil. Plain values, strings and
/// collections are not, whatever their content.
pub trait Nullable {
    fn is_nil(&self) -> bool;
}

impl<T> Nullable for Opt<T> {
    fn is_nil(&self) -> bool {
        self.is_absent()
    }
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for &T {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl Nullable for serde_json::Value {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

macro_rules! never_nil {
    ($($ty:ty $([$($gen:ident),*])?),* $(,)?) => {$(
        impl$(<$($gen),*>)? Nullable for $ty {
            fn is_nil(&self) -> bool {
                false
            }
        }
    )*};
}

never_nil!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, str, Duration,
    Vec<T> [T], [T] [T], HashMap<K, V> [K, V], BTreeMap<K, V> [K, V],
);

impl<T, const N: usize> Nullable for [T; N] {
    fn is_nil(&self) -> bool {
        false
    }
}

/// `notnil`: mandatory, allows zero values.
///
/// `Some("")` and `Opt::some(0)` pass; `None` and `Opt::Absent` fail.
pub fn not_nil<T: Nullable + ?Sized>(value: &T) -> Result<(), ValidationError> {
    if value.is_nil() {
        Err(ValidationError::new(NOT_NIL))
    } else {
        Ok(())
    }
}

/// `present`: the optional value must be present.
pub fn present<T>(value: &Opt<T>) -> Result<(), ValidationError> {
    if value.is_absent() {
        Err(ValidationError::new(PRESENT))
    } else {
        Ok(())
    }
}

impl<T: ValidateLength<u64>> ValidateLength<u64> for Opt<T> {
    fn length(&self) -> Option<u64> {
        self.get().and_then(|v| ValidateLength::<u64>::length(v))
    }
}

impl<T> ValidateRange<T> for Opt<T>
where
    T: PartialEq + PartialOrd,
{
    fn greater_than(&self, max: T) -> Option<bool> {
        self.get().map(|v| *v > max)
    }

    fn less_than(&self, min: T) -> Option<bool> {
        self.get().map(|v| *v < min)
    }
}
