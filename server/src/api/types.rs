//! Shared API types
//!
//! Error responses and pagination parameters at the HTTP boundary. The crate
//! mounts no router of its own; an embedding axum service returns `ApiError`
//! from its handlers and gets the `{ error, code, message }` JSON body from
//! the `IntoResponse` impl below.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::filter::{FilterError, SortError};

/// Validator function for page parameter
pub fn validate_page(page: u32) -> Result<(), ValidationError> {
    if page < 1 {
        return Err(ValidationError::new("page_min").with_message("Page must be >= 1".into()));
    }
    Ok(())
}

/// Validator function for page size parameter
pub fn validate_page_size(size: u32) -> Result<(), ValidationError> {
    if size == 0 {
        return Err(ValidationError::new("page_size_min")
            .with_message("Page size must be >= 1".into()));
    }
    Ok(())
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn from_sqlite(e: crate::data::SqliteError) -> Self {
        tracing::error!(error = %e, "SQLite error");
        Self::internal("Database operation failed")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::BadRequest { code, .. } => code,
            Self::Internal { .. } => "INTERNAL",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. } | Self::Internal { message } => message,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.status(), self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        let code = match &e {
            FilterError::TooLong { .. } => "FILTER_TOO_LONG",
            FilterError::ColumnNotAllowed { .. } => "INVALID_FILTER_COLUMN",
            FilterError::Tokenize(_) | FilterError::Parse(_) => "INVALID_FILTER",
        };
        tracing::debug!(error = %e, code, "Rejected filter");
        Self::bad_request(code, e.to_string())
    }
}

impl From<SortError> for ApiError {
    fn from(e: SortError) -> Self {
        tracing::debug!(error = %e, "Rejected sort order");
        Self::bad_request("INVALID_SORT", e.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::bad_request("VALIDATION_ERROR", format_validation_errors(&errors))
    }
}

fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: validation failed", field))
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, code, message) = match self {
            Self::BadRequest { code, message } => ("bad_request", code, message),
            Self::Internal { message } => ("internal_error", "INTERNAL".to_string(), message),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

pub fn default_page() -> u32 {
    DEFAULT_PAGE_NUMBER
}

pub fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Page request parameters
///
/// Page sizes above [`MAX_PAGE_SIZE`] are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct PageParams {
    #[serde(default = "default_page")]
    #[validate(custom(function = "validate_page"))]
    pub page_number: u32,

    #[serde(default = "default_page_size")]
    #[validate(custom(function = "validate_page_size"))]
    pub page_size: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    pub fn new(page_number: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page_number: page_number.unwrap_or(DEFAULT_PAGE_NUMBER),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    /// Clamp the page size to a lower deployment limit
    pub fn clamped(self, max_page_size: u32) -> Self {
        Self {
            page_size: self.page_size.min(max_page_size),
            ..self
        }
    }

    pub fn limit(&self) -> u32 {
        self.page_size.min(MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * u64::from(self.limit())
    }
}

/// Pagination metadata in response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page_number: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(page: &PageParams, total_items: u64) -> Self {
        let page_size = page.limit();
        Self {
            page_number: page.page_number,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(u64::from(page_size.max(1))),
        }
    }
}

/// Generic paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: &PageParams, total_items: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(page, total_items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::columns::{USER_FILTERABLE, USER_SORTABLE};
    use crate::filter::{
        CompilerOptions, FilterCompiler, ParseError, SortOrder, compile, validate_columns,
    };

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_parse_error_is_bad_request() {
        let err = compile("Age >= 18 &&").unwrap_err();
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert_eq!(body["code"], "INVALID_FILTER");
    }

    #[tokio::test]
    async fn test_too_long_code() {
        let compiler = FilterCompiler::new(CompilerOptions {
            max_length: 4,
            ..Default::default()
        });
        let err = compiler.compile("Age >= 18").unwrap_err();
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "FILTER_TOO_LONG");
    }

    #[tokio::test]
    async fn test_column_not_allowed_code() {
        let compiled = compile("PasswordHash == x").unwrap();
        let err = validate_columns(&compiled, USER_FILTERABLE).unwrap_err();
        let (_, body) = body_json(err.into()).await;
        assert_eq!(body["code"], "INVALID_FILTER_COLUMN");
        assert!(body["message"].as_str().unwrap().contains("PasswordHash"));
    }

    #[tokio::test]
    async fn test_sort_error_code() {
        let err = SortOrder::parse("PasswordHash", USER_SORTABLE).unwrap_err();
        let (status, body) = body_json(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_SORT");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let err = ApiError::from_sqlite(sqlx::Error::RowNotFound.into());
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["code"], "INTERNAL");
        assert_eq!(body["message"], "Database operation failed");
    }

    #[test]
    fn test_api_error_display() {
        let err: ApiError = FilterError::Parse(ParseError::UnexpectedEndOfInput).into();
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains("INVALID_FILTER"));
    }

    #[test]
    fn test_page_params_defaults() {
        let page: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(page, PageParams::default());
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_params_offset() {
        let page = PageParams::new(Some(3), Some(25));
        assert_eq!(page.limit(), 25);
        assert_eq!(page.offset(), 50);
    }

    #[test]
    fn test_page_size_clamped() {
        let page = PageParams::new(Some(1), Some(1_000_000));
        assert_eq!(page.limit(), MAX_PAGE_SIZE);
        assert_eq!(page.clamped(100).limit(), 100);
    }

    #[test]
    fn test_page_zero_rejected() {
        let page = PageParams::new(Some(0), None);
        let err: ApiError = page.validate().unwrap_err().into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message().contains("Page must be >= 1"));
    }

    #[test]
    fn test_page_size_zero_rejected() {
        let page = PageParams::new(None, Some(0));
        assert!(page.validate().is_err());
    }

    #[test]
    fn test_pagination_meta() {
        let page = PageParams::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&page, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page_number, 2);

        let empty = PaginationMeta::new(&page, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
