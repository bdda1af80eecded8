//! # mox — optional values for form binding, validation and JSON
//!
//! [`Opt<T>`] is a value that is either absent or present. This crate teaches
//! three host concerns how to handle it:
//!
//! - **form binding**: [`coerce`] populates a struct from [`FormValues`]
//!   (query strings, form bodies, path parameters), including `Opt` fields;
//! - **validation**: [`validator`] integration: the [`not_nil`] and [`present`]
//!   custom rules, and `length` / `range` support that looks inside `Opt`;
//! - **JSON**: `Opt` serializes as the bare inner value, see [`json`].
//!
//! ## Quick Start
//!
//! ```rust
//! use mox::prelude::*;
//!
//! #[derive(Debug, Default, FormBind, Validate)]
//! struct Search {
//!     #[validate(length(min = 1))]
//!     q: String,
//!     #[form(rename = "p")]
//!     #[validate(custom(function = "mox::present"), range(min = 1))]
//!     page: Opt<u32>,
//!     tags: Vec<String>,
//! }
//!
//! let values: FormValues = [("q", "rust"), ("p", "2"), ("tags", "a"), ("tags", "b")]
//!     .into_iter()
//!     .collect();
//!
//! let mut search = Search::default();
//! mox::bind(&mut search, &values).unwrap();
//! assert_eq!(search.page, Opt::some(2));
//! assert_eq!(search.tags, ["a", "b"]);
//! ```
//!
//! `#[derive(Validate)]` is `validator`'s derive, so the crate using it must
//! depend on `validator` as well.

// Lets the derive macros refer to `::mox` from inside this crate too.
extern crate self as mox;

pub mod config;
pub mod duration;
pub mod error;
pub mod field;
pub mod form;
pub mod json;
pub mod kind;
pub mod opt;
pub mod scalar;
pub mod validate;

pub use config::BindConfig;
pub use duration::Duration;
pub use error::{BindError, Error};
pub use field::{FormElement, FormField, OptionValue};
pub use form::{coerce, FieldSlot, FormBind, FormValues};
pub use kind::{FieldKind, OptKind, ScalarKind};
pub use opt::Opt;
pub use scalar::FormScalar;
pub use validate::{not_nil, present, Nullable};
pub use validator::{self, Validate, ValidationErrors};

// Re-export the derive macro when the `derive` feature is enabled
#[cfg(feature = "derive")]
pub use mox_derive::FormBind;

/// Bind `values` onto `dest`, then validate it.
///
/// Validation only runs when binding succeeded.
pub fn bind<T>(dest: &mut T, values: &FormValues) -> Result<(), Error>
where
    T: FormBind + Validate + ?Sized,
{
    coerce(dest, values)?;
    dest.validate()?;
    Ok(())
}

/// Prelude: the types needed to declare and bind a destination struct.
pub mod prelude {
    pub use crate::error::{BindError, Error};
    pub use crate::{Duration, FormBind, FormValues, Opt, Validate, ValidationErrors};
}
