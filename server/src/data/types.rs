//! Shared data types

use serde::{Deserialize, Serialize};

/// User row from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`
    pub last_login_at: Option<String>,
    pub active: bool,
}

/// Fields for a user insert; the ID is generated
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub last_login_at: Option<String>,
    pub active: bool,
}
