//! # mox-http-common — Shared HTTP helpers for `mox` web integrations
//!
//! Turns the raw parts of a request (query string, urlencoded body, path
//! parameters) into [`FormValues`], and builds the JSON bodies sent back when
//! binding or validation fails.
//!
//! **Not intended for direct use by end users** — import via the
//! framework-specific crate instead.

use mox::{BindError, FormValues, ValidationErrors};
use serde::Serialize;

/// Parse a URL query string into [`FormValues`].
///
/// Each `key=value` pair is URL-decoded. Repeated keys keep every value in
/// order; a key without `=` gets an empty value. Empty pairs are skipped.
pub fn parse_query_string(query: &str) -> FormValues {
    let mut values = FormValues::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        values.append(url_decode(key), url_decode(raw_value));
    }

    values
}

/// Parse an `application/x-www-form-urlencoded` body.
pub fn parse_urlencoded(body: &[u8]) -> Result<FormValues, std::str::Utf8Error> {
    std::str::from_utf8(body).map(parse_query_string)
}

/// Build [`FormValues`] from already-decoded path parameters, one value each.
pub fn path_params_to_values<I, K, V>(params: I) -> FormValues
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    params.into_iter().collect()
}

/// Percent-decode a URL component.
///
/// Handles `%XX` byte escapes (decoded as UTF-8, invalid sequences replaced)
/// and `+` → space conversion. A malformed escape is kept literally.
pub fn url_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => match (hex_digit(bytes.get(i + 1)), hex_digit(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi << 4 | lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: Option<&u8>) -> Option<u8> {
    b.and_then(|b| (*b as char).to_digit(16)).map(|d| d as u8)
}

// ---------------------------------------------------------------------------
// Error response bodies
// ---------------------------------------------------------------------------

/// Simple error body: `{ "error": "..." }`.
///
/// Used for generic HTTP errors such as "Invalid UTF-8" or "Payload too large".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error body with a message: `{ "error": "...", "message": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorWithMessage {
    pub error: String,
    pub message: String,
}

/// A single issue: `{ "path": "...", "message": "...", "code": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub path: String,
    pub message: String,
    pub code: String,
}

/// Issue list body: `{ "error": "...", "issues": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuesBody {
    pub error: String,
    pub issues: Vec<Issue>,
}

/// Body for a failed bind: one issue, coded with [`BindError::key`].
///
/// ```
/// let err = mox::BindError::NotAStruct { kind: "int" };
/// let body = mox_http_common::format_bind_error(&err);
/// assert_eq!(body.error, "Binding failed");
/// assert_eq!(body.issues[0].code, "not_a_struct");
/// ```
pub fn format_bind_error(err: &BindError) -> IssuesBody {
    IssuesBody {
        error: "Binding failed".into(),
        issues: vec![Issue {
            path: err.field().unwrap_or_default().to_string(),
            message: err.to_string(),
            code: err.key().to_string(),
        }],
    }
}

/// Body for failed validation: one issue per failed rule, coded with the
/// rule's error code. Issues are sorted by field name.
pub fn format_validation_errors(err: &ValidationErrors) -> IssuesBody {
    let mut fields: Vec<_> = err.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut issues = Vec::new();
    for (field, errors) in fields {
        for e in errors {
            let message = match &e.message {
                Some(message) => message.to_string(),
                None => format!("field validation for '{field}' failed on the '{}' rule", e.code),
            };
            issues.push(Issue {
                path: field.to_string(),
                message,
                code: e.code.to_string(),
            });
        }
    }
    IssuesBody {
        error: "Validation failed".into(),
        issues,
    }
}

/// Returns `{ "error": "Invalid form", "message": "..." }`.
pub fn format_form_error(message: &str) -> ErrorWithMessage {
    ErrorWithMessage {
        error: "Invalid form".into(),
        message: message.into(),
    }
}

/// Returns `{ "error": "Invalid UTF-8" }`.
pub fn format_utf8_error() -> ErrorBody {
    format_generic_error("Invalid UTF-8")
}

/// Returns `{ "error": "Payload too large" }`.
pub fn format_payload_too_large() -> ErrorBody {
    format_generic_error("Payload too large")
}

/// Returns `{ "error": "<error>" }`.
pub fn format_generic_error(error: &str) -> ErrorBody {
    ErrorBody {
        error: error.into(),
    }
}
