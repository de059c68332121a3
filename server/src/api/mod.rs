//! HTTP boundary types

pub mod types;

pub use types::{ApiError, PageParams, PaginatedResponse, PaginationMeta};
