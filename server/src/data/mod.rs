//! Data storage layer
//!
//! - `sqlite` - SQLite execution of compiled filters
//! - `types` - Row types shared with the domain layer

pub mod sqlite;
pub mod types;

pub use sqlite::{SqliteError, SqliteService};
pub use types::{NewUser, UserRow};
