//! # mox-axum — Axum extractors for `mox` form binding
//!
//! Extractors that bind request data onto a `#[derive(FormBind, Validate)]`
//! struct, then validate it:
//!
//! | Extractor | Replaces | Source |
//! |---|---|---|
//! | [`OptionQuery<T>`] | `axum::extract::Query<T>` | URL query parameters |
//! | [`OptionForm<T>`] | `axum::extract::Form<T>` | urlencoded or multipart body, then the query |
//! | [`OptionPath<T>`] | `axum::extract::Path<T>` | URL path parameters |
//!
//! Binding failures return **400 Bad Request**, validation failures
//! **422 Unprocessable Entity**, oversized bodies **413 Payload Too Large**.
//!
//! Validation is the struct's own [`validator::Validate`] impl. A
//! [`BindConfig`] request extension controls the body limit and whether
//! validation runs.
//!
//! # Quick example
//!
//! ```ignore
//! use axum::{routing::get, Router};
//! use mox::prelude::*;
//! use mox_axum::OptionQuery;
//!
//! #[derive(Debug, Default, FormBind, Validate)]
//! struct Page {
//!     #[validate(custom(function = "mox::present"), range(min = 1))]
//!     page: Opt<u32>,
//!     q: Opt<String>,
//! }
//!
//! async fn list(OptionQuery(p): OptionQuery<Page>) -> String {
//!     format!("page {} q={:?}", p.page.or_empty(), p.q)
//! }
//!
//! let app: Router = Router::new().route("/items", get(list));
//! ```

use std::collections::HashMap;
use std::fmt;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::request::Parts;
use http::{Extensions, Method, StatusCode};
use mox::{BindConfig, BindError, FormBind, FormValues, Validate, ValidationErrors};
use mox_http_common::{
    format_bind_error, format_form_error, format_generic_error, format_payload_too_large,
    format_utf8_error, format_validation_errors, parse_query_string, parse_urlencoded,
    path_params_to_values,
};

// ============================= Rejection =====================================

/// Rejection returned by every extractor in this crate.
#[derive(Debug)]
pub enum BindRejection {
    /// The values could not be bound onto the target type.
    Bind(BindError),
    /// The bound value failed validation.
    Validation(ValidationErrors),
    /// The form body exceeded [`BindConfig::max_form_bytes`].
    PayloadTooLarge,
    InvalidUtf8,
    /// The body could not be read or the multipart stream was malformed.
    InvalidForm(String),
    /// Path parameters could not be extracted.
    InvalidPath(String),
}

impl BindRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            BindRejection::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BindRejection::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            BindRejection::Bind(_)
            | BindRejection::InvalidUtf8
            | BindRejection::InvalidForm(_)
            | BindRejection::InvalidPath(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for BindRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            BindRejection::Bind(e) => json_response(status, &format_bind_error(e)),
            BindRejection::Validation(e) => json_response(status, &format_validation_errors(e)),
            BindRejection::PayloadTooLarge => json_response(status, &format_payload_too_large()),
            BindRejection::InvalidUtf8 => json_response(status, &format_utf8_error()),
            BindRejection::InvalidForm(msg) => json_response(status, &format_form_error(msg)),
            BindRejection::InvalidPath(msg) => json_response(
                status,
                &format_generic_error(&format!("Path parameter error: {msg}")),
            ),
        }
    }
}

fn json_response<B: serde::Serialize>(status: StatusCode, body: &B) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => (
            status,
            [(http::header::CONTENT_TYPE, "application/json")],
            bytes,
        )
            .into_response(),
        Err(_) => status.into_response(),
    }
}

impl fmt::Display for BindRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindRejection::Bind(e) => write!(f, "Binding failed: {e}"),
            BindRejection::Validation(e) => write!(f, "Validation failed: {e}"),
            BindRejection::PayloadTooLarge => write!(f, "Payload too large"),
            BindRejection::InvalidUtf8 => write!(f, "Form body is not valid UTF-8"),
            BindRejection::InvalidForm(msg) => write!(f, "Invalid form: {msg}"),
            BindRejection::InvalidPath(msg) => write!(f, "Path parameter error: {msg}"),
        }
    }
}

impl std::error::Error for BindRejection {}

impl From<BindError> for BindRejection {
    fn from(e: BindError) -> Self {
        BindRejection::Bind(e)
    }
}

impl From<ValidationErrors> for BindRejection {
    fn from(e: ValidationErrors) -> Self {
        BindRejection::Validation(e)
    }
}

// ============================= Shared ========================================

/// Request-scoped settings, read before the body is consumed.
struct Settings {
    config: BindConfig,
}

impl Settings {
    fn from_extensions(ext: &Extensions) -> Self {
        Settings {
            config: ext.get::<BindConfig>().cloned().unwrap_or_default(),
        }
    }

    /// Bind `values` onto a fresh `T`, then validate it unless disabled.
    fn bind<T>(&self, values: &FormValues) -> Result<T, BindRejection>
    where
        T: FormBind + Validate + Default,
    {
        let mut dest = T::default();
        let result = mox::coerce(&mut dest, values)
            .map_err(BindRejection::from)
            .and_then(|()| {
                if !self.config.validate {
                    return Ok(());
                }
                dest.validate().map_err(BindRejection::from)
            });
        match result {
            Ok(()) => Ok(dest),
            Err(rejection) => {
                log::debug!("rejecting request: {rejection}");
                Err(rejection)
            }
        }
    }
}

// ============================= OptionQuery ===================================

/// Axum extractor that binds **URL query parameters**.
///
/// Repeated keys feed `Vec` and `Opt<Vec<_>>` fields; `?flag` with no value
/// sets an `Opt<bool>` field to `true`.
pub struct OptionQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for OptionQuery<T>
where
    S: Send + Sync,
    T: FormBind + Validate + Default,
{
    type Rejection = BindRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let settings = Settings::from_extensions(&parts.extensions);
        let values = parse_query_string(parts.uri.query().unwrap_or(""));
        settings.bind(&values).map(OptionQuery)
    }
}

// ============================= OptionPath ====================================

/// Axum extractor that binds **URL path parameters**.
///
/// # Example
///
/// ```ignore
/// // Route: /users/{id}/posts/{post_id}
/// #[derive(Default, FormBind, Validate)]
/// struct PostPath {
///     id: u64,
///     post_id: Opt<u64>,
/// }
///
/// async fn get_post(OptionPath(p): OptionPath<PostPath>) -> String {
///     format!("user {} post {:?}", p.id, p.post_id)
/// }
/// ```
pub struct OptionPath<T>(pub T);

impl<S, T> FromRequestParts<S> for OptionPath<T>
where
    S: Send + Sync,
    T: FormBind + Validate + Default,
{
    type Rejection = BindRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = Settings::from_extensions(&parts.extensions);
        let raw = axum::extract::Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| BindRejection::InvalidPath(e.to_string()))?;
        let values = path_params_to_values(raw.0);
        settings.bind(&values).map(OptionPath)
    }
}

// ============================= OptionForm ====================================

/// Axum extractor that binds **form bodies** and the URL query.
///
/// For `POST`, `PUT` and `PATCH` requests the body is read when it is
/// `application/x-www-form-urlencoded` or `multipart/form-data`; multipart
/// file parts are ignored but count towards [`BindConfig::max_form_bytes`],
/// which bounds the whole body. Query values are appended after body values, so a
/// scalar field prefers the body.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, FormBind, Validate)]
/// struct LoginForm {
///     #[validate(length(min = 3))]
///     username: String,
///     #[validate(custom(function = "mox::present"))]
///     remember: Opt<bool>,
/// }
///
/// async fn login(OptionForm(form): OptionForm<LoginForm>) -> String {
///     format!("Welcome, {}!", form.username)
/// }
/// ```
pub struct OptionForm<T>(pub T);

impl<S, T> FromRequest<S> for OptionForm<T>
where
    S: Send + Sync,
    T: FormBind + Validate + Default,
{
    type Rejection = BindRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let settings = Settings::from_extensions(req.extensions());
        let query = parse_query_string(req.uri().query().unwrap_or(""));

        let mut values = match body_kind(&req) {
            Some(BodyKind::UrlEncoded) => {
                read_urlencoded(req, settings.config.max_form_bytes).await?
            }
            Some(BodyKind::Multipart) => {
                read_multipart(req, settings.config.max_form_bytes).await?
            }
            None => FormValues::new(),
        };
        values.merge(query);

        settings.bind(&values).map(OptionForm)
    }
}

enum BodyKind {
    UrlEncoded,
    Multipart,
}

fn body_kind(req: &Request) -> Option<BodyKind> {
    let method = req.method();
    if method != Method::POST && method != Method::PUT && method != Method::PATCH {
        return None;
    }
    let content_type = req
        .headers()
        .get(http::header::CONTENT_TYPE)?
        .to_str()
        .ok()?
        .to_ascii_lowercase();
    if content_type.starts_with("application/x-www-form-urlencoded") {
        Some(BodyKind::UrlEncoded)
    } else if content_type.starts_with("multipart/form-data") {
        Some(BodyKind::Multipart)
    } else {
        None
    }
}

async fn read_urlencoded(req: Request, limit: usize) -> Result<FormValues, BindRejection> {
    let body: Bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| {
            let inner = e.into_inner();
            if inner.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                BindRejection::PayloadTooLarge
            } else {
                BindRejection::InvalidForm(inner.to_string())
            }
        })?;
    parse_urlencoded(&body).map_err(|_| BindRejection::InvalidUtf8)
}

/// Reads text parts with multer directly: axum's `Multipart` extractor caps
/// the body at its own 2 MB default, whatever `limit` says.
async fn read_multipart(req: Request, limit: usize) -> Result<FormValues, BindRejection> {
    let boundary = req
        .headers()
        .get(http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| BindRejection::InvalidForm("missing content type".to_string()))
        .and_then(|ct| multer::parse_boundary(ct).map_err(multipart_rejection))?;
    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(limit as u64));
    let mut multipart = multer::Multipart::with_constraints(
        req.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    let mut values = FormValues::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            log::trace!("skipping file part `{name}`");
            continue;
        }
        let text = field.text().await.map_err(multipart_rejection)?;
        values.append(name, text);
    }
    Ok(values)
}

fn multipart_rejection(e: multer::Error) -> BindRejection {
    match e {
        multer::Error::StreamSizeExceeded { .. } | multer::Error::FieldSizeExceeded { .. } => {
            BindRejection::PayloadTooLarge
        }
        other => BindRejection::InvalidForm(other.to_string()),
    }
}

/// Prelude — import everything you need.
pub mod prelude {
    pub use crate::{BindRejection, OptionForm, OptionPath, OptionQuery};
    pub use mox::prelude::*;
    pub use mox::BindConfig;
}
