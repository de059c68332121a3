//! SQLite repositories
//!
//! Types (UserRow, NewUser) should be imported from `crate::data::types`.

pub mod user;

pub use user::{count_users, insert_user, list_users};
