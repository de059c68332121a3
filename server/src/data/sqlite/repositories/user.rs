//! User repository for SQLite operations
//!
//! Reads take a [`CompiledFilter`] whose SQL becomes the WHERE body. Its
//! parameters are bound in order; nothing from the filter input is spliced
//! into the statement text.

use sqlx::query::QueryAs;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;

use crate::data::sqlite::{SqliteError, to_sqlite_placeholders};
use crate::data::types::{NewUser, UserRow};
use crate::filter::{CompiledFilter, Literal, Parameter, SortOrder};

const USER_COLUMNS: &str = "Id, Username, Email, PasswordHash, LastLoginAt, Active";

/// Ordering used when the caller gives none, so pages stay stable
const DEFAULT_ORDER: &str = "Username ASC";

type UserTuple = (String, String, String, String, Option<String>, bool);

fn row_from_tuple(
    (id, username, email, password_hash, last_login_at, active): UserTuple,
) -> UserRow {
    UserRow {
        id,
        username,
        email,
        password_hash,
        last_login_at,
        active,
    }
}

/// Bind compiled filter parameters in placeholder order
fn bind_parameters<'q, O>(
    mut query_builder: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    parameters: &'q [Parameter],
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for parameter in parameters {
        query_builder = match &parameter.value {
            Literal::Str(text) | Literal::Raw(text) => query_builder.bind(text.as_str()),
            Literal::Bool(flag) => query_builder.bind(*flag),
            Literal::Int(number) => query_builder.bind(*number),
        };
    }
    query_builder
}

/// Create a new user with a generated CUID2 ID
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<UserRow, SqliteError> {
    let id = cuid2::create_id();

    sqlx::query(
        "INSERT INTO Users (Id, Username, Email, PasswordHash, LastLoginAt, Active) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.last_login_at)
    .bind(user.active)
    .execute(pool)
    .await?;

    tracing::debug!(%id, username = %user.username, "User created");

    Ok(UserRow {
        id,
        username: user.username.clone(),
        email: user.email.clone(),
        password_hash: user.password_hash.clone(),
        last_login_at: user.last_login_at.clone(),
        active: user.active,
    })
}

/// List one page of users matching a compiled filter
pub async fn list_users(
    pool: &SqlitePool,
    filter: &CompiledFilter,
    order: &SortOrder,
    limit: u32,
    offset: u64,
) -> Result<Vec<UserRow>, SqliteError> {
    let param_count = filter.parameters().len();
    let order_by = order.to_sql().unwrap_or_else(|| DEFAULT_ORDER.to_string());

    let query = format!(
        "SELECT {} FROM Users WHERE {} ORDER BY {} LIMIT ?{} OFFSET ?{}",
        USER_COLUMNS,
        to_sqlite_placeholders(filter.sql()),
        order_by,
        param_count + 1,
        param_count + 2,
    );
    tracing::trace!(%query, params = param_count, "Listing users");

    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let rows = bind_parameters(sqlx::query_as::<_, UserTuple>(&query), filter.parameters())
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(row_from_tuple).collect())
}

/// Count users matching a compiled filter
pub async fn count_users(pool: &SqlitePool, filter: &CompiledFilter) -> Result<u64, SqliteError> {
    let query = format!(
        "SELECT COUNT(*) FROM Users WHERE {}",
        to_sqlite_placeholders(filter.sql())
    );

    let (count,) = bind_parameters(sqlx::query_as::<_, (i64,)>(&query), filter.parameters())
        .fetch_one(pool)
        .await?;

    Ok(count.max(0) as u64)
}
