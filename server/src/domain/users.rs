//! User listing
//!
//! Compiles the caller's filter and sort text, checks every referenced column
//! against the user allow-lists, then runs one page of the query.

use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::api::{ApiError, PageParams, PaginatedResponse};
use crate::data::UserRow;
use crate::data::sqlite::repositories;
use crate::filter::columns::{USER_FILTERABLE, USER_SORTABLE};
use crate::filter::{FilterCompiler, SortOrder, validate_columns};

/// User as returned to callers; the password hash never leaves the data layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub last_login_at: Option<String>,
    pub active: bool,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            last_login_at: row.last_login_at,
            active: row.active,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListUsersParams {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub page: PageParams,
}

pub async fn list_users(
    pool: &SqlitePool,
    compiler: &FilterCompiler,
    params: &ListUsersParams,
) -> Result<PaginatedResponse<UserDto>, ApiError> {
    params.page.validate()?;

    let compiled = compiler.compile(params.filter.as_deref().unwrap_or_default())?;
    validate_columns(&compiled, USER_FILTERABLE)?;
    let order = SortOrder::parse(params.sort.as_deref().unwrap_or_default(), USER_SORTABLE)?;

    let total = repositories::count_users(pool, &compiled)
        .await
        .map_err(ApiError::from_sqlite)?;
    let rows = repositories::list_users(
        pool,
        &compiled,
        &order,
        params.page.limit(),
        params.page.offset(),
    )
    .await
    .map_err(ApiError::from_sqlite)?;

    tracing::debug!(
        total,
        returned = rows.len(),
        page = params.page.page_number,
        "Listed users"
    );

    let users = rows.into_iter().map(UserDto::from).collect();
    Ok(PaginatedResponse::new(users, &params.page, total))
}
