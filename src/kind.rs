//! Static classification of bindable field types.
//!
//! Every type that can appear as a field of a `#[derive(FormBind)]` struct
//! reports a [`FieldKind`]. The walker uses it for diagnostics; the actual
//! dispatch happens through the [`FormField`](crate::FormField) impl of the
//! field's type.

use std::fmt;

/// Primitive kinds a single raw string can be converted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    Str,
    Duration,
}

impl ScalarKind {
    /// Rust-facing name of the kind, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::Isize => "isize",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::Usize => "usize",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Str => "String",
            ScalarKind::Duration => "Duration",
        }
    }

    /// Whether an empty string has a defined meaning inside a present
    /// optional value.
    pub fn accepts_empty_when_present(self) -> bool {
        matches!(self, ScalarKind::Str | ScalarKind::Bool)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of the value wrapped by an [`Opt`](crate::Opt) field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptKind {
    /// `Opt<T>` for a scalar `T`.
    Scalar(ScalarKind),
    /// `Opt<Vec<T>>` for a scalar `T`.
    Seq(ScalarKind),
    /// Anything else; binding fails with `UnsupportedOptionKind`.
    Unsupported(&'static str),
}

/// Declared kind of a destination field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A bare scalar.
    Plain(ScalarKind),
    /// `Option<T>` or `Box<T>` around a scalar, allocated on first write.
    Pointer(ScalarKind),
    /// `[T; N]`.
    Array { elem: ScalarKind, len: usize },
    /// `Vec<T>`.
    Slice(ScalarKind),
    /// The optional-value wrapper.
    Optional(OptKind),
    /// Maps, nested structs, JSON values. Binding fails with `UnsupportedKind`.
    Unsupported(&'static str),
}

impl FieldKind {
    pub fn is_optional(&self) -> bool {
        matches!(self, FieldKind::Optional(_))
    }

    /// Whether the field accepts more than one raw value.
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            FieldKind::Array { .. } | FieldKind::Slice(_) | FieldKind::Optional(OptKind::Seq(_))
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Plain(k) => write!(f, "{k}"),
            FieldKind::Pointer(k) => write!(f, "Option<{k}>"),
            FieldKind::Array { elem, len } => write!(f, "[{elem}; {len}]"),
            FieldKind::Slice(k) => write!(f, "Vec<{k}>"),
            FieldKind::Optional(OptKind::Scalar(k)) => write!(f, "Opt<{k}>"),
            FieldKind::Optional(OptKind::Seq(k)) => write!(f, "Opt<Vec<{k}>>"),
            FieldKind::Optional(OptKind::Unsupported(k)) => write!(f, "Opt<{k}>"),
            FieldKind::Unsupported(k) => f.write_str(k),
        }
    }
}
