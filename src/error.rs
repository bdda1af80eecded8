use std::fmt;

use validator::ValidationErrors;

/// Error returned when form values cannot be bound onto a destination.
///
/// Binding is fail-fast: the first failing field aborts the walk and its
/// error is returned as-is. Fields bound before it keep their new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The destination is not a struct.
    NotAStruct {
        /// Kind of the value that was passed instead.
        kind: &'static str,
    },
    /// The field type cannot be populated from form values.
    UnsupportedKind {
        field: String,
        kind: &'static str,
    },
    /// The inner type of an [`Opt`](crate::Opt) field cannot be populated
    /// from form values.
    UnsupportedOptionKind {
        field: String,
        kind: &'static str,
    },
    /// A raw value could not be converted to the field's type.
    Parse {
        field: String,
        kind: &'static str,
        value: String,
        reason: String,
    },
    /// An optional field of a non-defaultable kind received an empty string.
    EmptyStringNotAllowed {
        field: String,
        kind: &'static str,
    },
}

impl BindError {
    /// Name of the field this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            BindError::NotAStruct { .. } => None,
            BindError::UnsupportedKind { field, .. }
            | BindError::UnsupportedOptionKind { field, .. }
            | BindError::Parse { field, .. }
            | BindError::EmptyStringNotAllowed { field, .. } => Some(field),
        }
    }

    /// Stable string key for this error. Useful for error mapping in
    /// HTTP responses.
    pub fn key(&self) -> &'static str {
        match self {
            BindError::NotAStruct { .. } => "not_a_struct",
            BindError::UnsupportedKind { .. } => "unsupported_kind",
            BindError::UnsupportedOptionKind { .. } => "unsupported_option_kind",
            BindError::Parse { .. } => "parse_error",
            BindError::EmptyStringNotAllowed { .. } => "empty_string_not_allowed",
        }
    }

    /// Fill in the field name when the error was raised below the walker.
    pub(crate) fn in_field(mut self, name: &str) -> Self {
        match &mut self {
            BindError::NotAStruct { .. } => {}
            BindError::UnsupportedKind { field, .. }
            | BindError::UnsupportedOptionKind { field, .. }
            | BindError::Parse { field, .. }
            | BindError::EmptyStringNotAllowed { field, .. } => {
                if field.is_empty() {
                    *field = name.to_string();
                }
            }
        }
        self
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::NotAStruct { kind } => {
                write!(f, "only structs can be bound: kind={kind}")
            }
            BindError::UnsupportedKind { field, kind } => {
                write!(f, "unsupported kind: {field} is {kind}")
            }
            BindError::UnsupportedOptionKind { field, kind } => {
                write!(f, "unsupported option value kind: {field} is {kind}")
            }
            BindError::Parse {
                field,
                kind,
                value,
                reason,
            } => write!(f, "cannot convert {field}={value:?} to {kind}: {reason}"),
            BindError::EmptyStringNotAllowed { field, kind } => {
                write!(f, "cannot use empty string for {field}: {kind}")
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Error returned by [`bind`](crate::bind): coercion or validation failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Bind(BindError),
    Validation(ValidationErrors),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Bind(e) => write!(f, "{e}"),
            Error::Validation(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Bind(e) => Some(e),
            Error::Validation(e) => Some(e),
        }
    }
}

impl From<BindError> for Error {
    fn from(e: BindError) -> Self {
        Error::Bind(e)
    }
}

impl From<ValidationErrors> for Error {
    fn from(e: ValidationErrors) -> Self {
        Error::Validation(e)
    }
}
