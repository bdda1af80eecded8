//! Field-level coercion: how each destination type consumes a list of raw
//! values.
//!
//! | Field type | Kind | Values used |
//! |---|---|---|
//! | scalar `T` | [`FieldKind::Plain`] | first |
//! | `Option<E>`, `Box<E>` | [`FieldKind::Pointer`] | first |
//! | `Vec<E>` | [`FieldKind::Slice`] | all, in order |
//! | `[E; N]` | [`FieldKind::Array`] | first `N` |
//! | `Opt<T>` | [`FieldKind::Optional`] | first (scalar) or all (`Opt<Vec<T>>`) |
//!
//! Collections are built completely before they are assigned, so a failing
//! element leaves the destination field as it was.

use std::collections::{BTreeMap, HashMap};

use crate::duration::Duration;
use crate::error::BindError;
use crate::kind::{FieldKind, OptKind, ScalarKind};
use crate::opt::Opt;
use crate::scalar::FormScalar;

/// A value produced from exactly one raw string: a scalar, or a pointer to
/// one. Elements of `Vec` and array fields are `FormElement`s.
pub trait FormElement: Sized {
    /// Innermost scalar kind.
    const KIND: ScalarKind;

    fn from_form_value(raw: &str) -> Result<Self, BindError>;
}

/// A struct field that can be populated from form values.
///
/// Object-safe so the struct walker can hold every field of a destination
/// as `&mut dyn FormField`.
pub trait FormField {
    fn kind(&self) -> FieldKind;

    /// Populate the field. `values` is never empty.
    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError>;
}

/// A type that may be wrapped by an [`Opt`] form field.
pub trait OptionValue: Sized {
    const KIND: OptKind;

    /// Build the present value. `values` is never empty.
    fn from_form_values(values: &[String]) -> Result<Self, BindError>;
}

fn unsupported_option(kind: &'static str) -> BindError {
    BindError::UnsupportedOptionKind {
        field: String::new(),
        kind,
    }
}

fn unsupported(kind: &'static str) -> BindError {
    BindError::UnsupportedKind {
        field: String::new(),
        kind,
    }
}

macro_rules! scalar_field {
    ($($ty:ty),* $(,)?) => {$(
        impl FormElement for $ty {
            const KIND: ScalarKind = <$ty as FormScalar>::KIND;

            fn from_form_value(raw: &str) -> Result<Self, BindError> {
                <$ty as FormScalar>::from_form(raw)
            }
        }

        impl FormField for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Plain(<$ty as FormScalar>::KIND)
            }

            fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
                *self = <$ty as FormScalar>::from_form(&values[0])?;
                Ok(())
            }
        }

        impl OptionValue for $ty {
            const KIND: OptKind = OptKind::Scalar(<$ty as FormScalar>::KIND);

            fn from_form_values(values: &[String]) -> Result<Self, BindError> {
                let raw = values[0].as_str();
                let kind = <$ty as FormScalar>::KIND;
                if raw.is_empty() && !kind.accepts_empty_when_present() {
                    return Err(BindError::EmptyStringNotAllowed {
                        field: String::new(),
                        kind: kind.name(),
                    });
                }
                <$ty as FormScalar>::from_form_present(raw)
            }
        }
    )*};
}

scalar_field!(
    bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, String, Duration,
);

// ---------------------------------------------------------------------------
// Pointers
// ---------------------------------------------------------------------------

impl<E: FormElement> FormElement for Option<E> {
    const KIND: ScalarKind = E::KIND;

    fn from_form_value(raw: &str) -> Result<Self, BindError> {
        E::from_form_value(raw).map(Some)
    }
}

impl<E: FormElement> FormField for Option<E> {
    fn kind(&self) -> FieldKind {
        FieldKind::Pointer(E::KIND)
    }

    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
        *self = Some(E::from_form_value(&values[0])?);
        Ok(())
    }
}

impl<E: FormElement> FormElement for Box<E> {
    const KIND: ScalarKind = E::KIND;

    fn from_form_value(raw: &str) -> Result<Self, BindError> {
        E::from_form_value(raw).map(Box::new)
    }
}

impl<E: FormElement> FormField for Box<E> {
    fn kind(&self) -> FieldKind {
        FieldKind::Pointer(E::KIND)
    }

    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
        **self = E::from_form_value(&values[0])?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

impl<E: FormElement> FormField for Vec<E> {
    fn kind(&self) -> FieldKind {
        FieldKind::Slice(E::KIND)
    }

    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
        let built = values
            .iter()
            .map(|raw| E::from_form_value(raw))
            .collect::<Result<Vec<E>, _>>()?;
        *self = built;
        Ok(())
    }
}

impl<E: FormElement + Default, const N: usize> FormField for [E; N] {
    fn kind(&self) -> FieldKind {
        FieldKind::Array {
            elem: E::KIND,
            len: N,
        }
    }

    /// Missing trailing values leave zero values; surplus values are ignored.
    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
        if values.len() > N {
            log::debug!(
                "ignoring {} value(s) beyond array length {}",
                values.len() - N,
                N
            );
        }
        let mut built: [E; N] = std::array::from_fn(|_| E::default());
        for (slot, raw) in built.iter_mut().zip(values) {
            *slot = E::from_form_value(raw)?;
        }
        *self = built;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Optional values
// ---------------------------------------------------------------------------

impl<T: FormScalar> OptionValue for Vec<T> {
    const KIND: OptKind = OptKind::Seq(T::KIND);

    fn from_form_values(values: &[String]) -> Result<Self, BindError> {
        values.iter().map(|raw| T::from_form_present(raw)).collect()
    }
}

impl<T: OptionValue> FormField for Opt<T> {
    fn kind(&self) -> FieldKind {
        FieldKind::Optional(T::KIND)
    }

    fn set_form_values(&mut self, values: &[String]) -> Result<(), BindError> {
        *self = Opt::Present(T::from_form_values(values)?);
        Ok(())
    }
}

impl<T, const N: usize> OptionValue for [T; N] {
    const KIND: OptKind = OptKind::Unsupported("array");

    fn from_form_values(_: &[String]) -> Result<Self, BindError> {
        Err(unsupported_option("array"))
    }
}

impl<T> OptionValue for Option<T> {
    const KIND: OptKind = OptKind::Unsupported("pointer");

    fn from_form_values(_: &[String]) -> Result<Self, BindError> {
        Err(unsupported_option("pointer"))
    }
}

impl<T> OptionValue for Box<T> {
    const KIND: OptKind = OptKind::Unsupported("pointer");

    fn from_form_values(_: &[String]) -> Result<Self, BindError> {
        Err(unsupported_option("pointer"))
    }
}

// ---------------------------------------------------------------------------
// Unsupported kinds
// ---------------------------------------------------------------------------

macro_rules! unsupported_field {
    ($kind:literal => $($ty:ty $([$($gen:ident),*])?),* $(,)?) => {$(
        impl$(<$($gen),*>)? FormField for $ty {
            fn kind(&self) -> FieldKind {
                FieldKind::Unsupported($kind)
            }

            fn set_form_values(&mut self, _: &[String]) -> Result<(), BindError> {
                Err(unsupported($kind))
            }
        }

        impl$(<$($gen),*>)? OptionValue for $ty {
            const KIND: OptKind = OptKind::Unsupported($kind);

            fn from_form_values(_: &[String]) -> Result<Self, BindError> {
                Err(unsupported_option($kind))
            }
        }
    )*};
}

unsupported_field!("map" => HashMap<K, V> [K, V], BTreeMap<K, V> [K, V]);
unsupported_field!("interface" => serde_json::Value);
unsupported_field!("tuple" => ());
