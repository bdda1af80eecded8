//! The struct walker: binds a [`FormValues`] set onto a destination struct.

use std::collections::{BTreeMap, HashMap};

use crate::duration::Duration;
use crate::error::BindError;
use crate::field::FormField;
use crate::kind::FieldKind;
use crate::opt::Opt;

/// Raw form input: external field name to the ordered list of values sent
/// for it.
///
/// URL query strings, urlencoded and multipart bodies and URI path
/// parameters are all normalised into this shape before binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<String, Vec<String>>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value for `key`, keeping earlier ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replace every value for `key`.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.values.insert(key.into(), values);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Append every value of `other` after the values already present.
    pub fn merge(&mut self, other: FormValues) {
        for (key, values) in other.values {
            self.values.entry(key).or_default().extend(values);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = FormValues::new();
        out.extend(iter);
        out
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormValues {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.append(k, v);
        }
    }
}

impl From<HashMap<String, Vec<String>>> for FormValues {
    fn from(values: HashMap<String, Vec<String>>) -> Self {
        Self { values }
    }
}

/// One bindable field of a destination struct.
pub struct FieldSlot<'a> {
    /// Name looked up in the [`FormValues`].
    pub name: &'static str,
    /// Rust field name, used in error messages.
    pub ident: &'static str,
    pub field: &'a mut dyn FormField,
}

impl<'a> FieldSlot<'a> {
    pub fn new<F: FormField>(name: &'static str, ident: &'static str, field: &'a mut F) -> Self {
        Self { name, ident, field }
    }

    pub fn kind(&self) -> FieldKind {
        self.field.kind()
    }
}

/// A destination that form values can be bound onto.
///
/// Implemented by `#[derive(FormBind)]` for structs with named fields, which
/// lists the fields in declaration order with skip-marked fields left out.
/// Everything else reports [`BindError::NotAStruct`].
pub trait FormBind {
    fn form_fields(&mut self) -> Result<Vec<FieldSlot<'_>>, BindError>;
}

impl<T: FormBind + ?Sized> FormBind for Box<T> {
    fn form_fields(&mut self) -> Result<Vec<FieldSlot<'_>>, BindError> {
        (**self).form_fields()
    }
}

impl<T: FormBind + ?Sized> FormBind for &mut T {
    fn form_fields(&mut self) -> Result<Vec<FieldSlot<'_>>, BindError> {
        (**self).form_fields()
    }
}

impl<T: FormBind> FormBind for Option<T> {
    fn form_fields(&mut self) -> Result<Vec<FieldSlot<'_>>, BindError> {
        match self {
            Some(inner) => inner.form_fields(),
            None => Err(BindError::NotAStruct { kind: "None" }),
        }
    }
}

macro_rules! not_a_struct {
    ($kind:literal => $($ty:ty $([$($gen:ident),*])?),* $(,)?) => {$(
        impl$(<$($gen),*>)? FormBind for $ty {
            fn form_fields(&mut self) -> Result<Vec<FieldSlot<'_>>, BindError> {
                Err(BindError::NotAStruct { kind: $kind })
            }
        }
    )*};
}

not_a_struct!("bool" => bool);
not_a_struct!("int" => i8, i16, i32, i64, isize);
not_a_struct!("uint" => u8, u16, u32, u64, usize);
not_a_struct!("float" => f32, f64);
not_a_struct!("string" => String, str);
not_a_struct!("duration" => Duration);
not_a_struct!("slice" => Vec<T> [T], [T] [T]);
not_a_struct!("map" => HashMap<K, V> [K, V], BTreeMap<K, V> [K, V]);
not_a_struct!("optional" => Opt<T> [T]);
not_a_struct!("interface" => serde_json::Value);

/// Bind `values` onto `dest`, field by field in declaration order.
///
/// Fields whose name has no values are left untouched. The first failing
/// field aborts the walk; fields bound before it keep their new values and
/// later fields are not visited.
///
/// ```
/// use mox::{FormBind, FormValues, Opt};
///
/// #[derive(Default, FormBind)]
/// struct Search {
///     q: String,
///     #[form(rename = "p")]
///     page: Opt<u32>,
/// }
///
/// let values: FormValues = [("q", "rust"), ("p", "2")].into_iter().collect();
/// let mut search = Search::default();
/// mox::coerce(&mut search, &values).unwrap();
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.page, Opt::some(2));
/// ```
pub fn coerce<T: FormBind + ?Sized>(dest: &mut T, values: &FormValues) -> Result<(), BindError> {
    for mut slot in dest.form_fields()? {
        let raw = match values.get(slot.name) {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                log::trace!("no values for `{}`, leaving field untouched", slot.name);
                continue;
            }
        };
        log::trace!(
            "binding `{}` ({}) from {} value(s)",
            slot.ident,
            slot.kind(),
            raw.len()
        );
        slot.field
            .set_form_values(raw)
            .map_err(|e| e.in_field(slot.ident))?;
    }
    Ok(())
}
