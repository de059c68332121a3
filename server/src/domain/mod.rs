//! Domain logic
//!
//! - `users` - filtered, sorted, paged user listing

pub mod users;

pub use users::{ListUsersParams, UserDto, list_users};
