/// A value of type `T`, or nothing.
///
/// `Opt` is the field type the binder, the validator and the JSON bridge all
/// understand as "optional". It behaves like [`Option`], but it is a distinct
/// type so that a form field declared as `Opt<i32>` gets the stricter
/// present-value rules (an empty string is not silently turned into `0`), while
/// a field declared as `Option<i32>` keeps plain pointer semantics.
///
/// ```
/// use mox::Opt;
///
/// let name: Opt<String> = Opt::some("Bob".to_string());
/// assert!(name.is_present());
/// assert_eq!(name.or_empty(), "Bob");
///
/// let missing: Opt<String> = Opt::default();
/// assert!(missing.is_absent());
/// assert_eq!(missing.or_empty(), "");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Opt<T> {
    Absent,
    Present(T),
}

impl<T> Default for Opt<T> {
    fn default() -> Self {
        Opt::Absent
    }
}

impl<T> Opt<T> {
    pub const fn some(value: T) -> Self {
        Opt::Present(value)
    }

    pub const fn none() -> Self {
        Opt::Absent
    }

    pub const fn is_present(&self) -> bool {
        matches!(self, Opt::Present(_))
    }

    /// Also the `skip_serializing_if` predicate for absent fields.
    pub const fn is_absent(&self) -> bool {
        matches!(self, Opt::Absent)
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Opt::Present(v) => Some(v),
            Opt::Absent => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Opt::Present(v) => Some(v),
            Opt::Absent => None,
        }
    }

    pub fn as_ref(&self) -> Opt<&T> {
        match self {
            Opt::Present(v) => Opt::Present(v),
            Opt::Absent => Opt::Absent,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Opt<U> {
        match self {
            Opt::Present(v) => Opt::Present(f(v)),
            Opt::Absent => Opt::Absent,
        }
    }

    pub fn or_else<F: FnOnce() -> T>(self, f: F) -> T {
        match self {
            Opt::Present(v) => v,
            Opt::Absent => f(),
        }
    }

    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Opt::Present(v) => v,
            Opt::Absent => fallback,
        }
    }

    /// Replace the value, returning the previous state.
    pub fn replace(&mut self, value: T) -> Opt<T> {
        std::mem::replace(self, Opt::Present(value))
    }

    /// Take the value out, leaving `Absent` behind.
    pub fn take(&mut self) -> Opt<T> {
        std::mem::take(self)
    }

    pub fn into_option(self) -> Option<T> {
        self.into()
    }
}

impl<T: Default> Opt<T> {
    /// The value if present, otherwise `T::default()`.
    pub fn or_empty(self) -> T {
        match self {
            Opt::Present(v) => v,
            Opt::Absent => T::default(),
        }
    }
}

impl<T> From<Option<T>> for Opt<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Opt::Present(v),
            None => Opt::Absent,
        }
    }
}

impl<T> From<Opt<T>> for Option<T> {
    fn from(value: Opt<T>) -> Self {
        match value {
            Opt::Present(v) => Some(v),
            Opt::Absent => None,
        }
    }
}
