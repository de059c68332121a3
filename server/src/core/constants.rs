// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "UserManagement";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "usermanagement";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".usermanagement";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "usermanagement.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "USERMANAGEMENT_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "USERMANAGEMENT_LOG";

// =============================================================================
// Filter Compiler
// =============================================================================

/// Environment variable for the LIKE collation
pub const ENV_FILTER_COLLATION: &str = "USERMANAGEMENT_FILTER_COLLATION";

/// Environment variable for the maximum filter length
pub const ENV_FILTER_MAX_LENGTH: &str = "USERMANAGEMENT_FILTER_MAX_LENGTH";

/// Case-insensitive collation appended to LIKE comparisons (SQLite)
pub const DEFAULT_FILTER_COLLATION: &str = "NOCASE";

/// Maximum filter length in bytes
pub const DEFAULT_FILTER_MAX_LENGTH: usize = 4096;

// =============================================================================
// Database
// =============================================================================

/// Environment variable for the SQLite connection URL
pub const ENV_DATABASE_URL: &str = "USERMANAGEMENT_DATABASE_URL";

/// Default SQLite connection URL
pub const DEFAULT_DATABASE_URL: &str = "sqlite://usermanagement.db";

/// Maximum SQLite pool connections
pub const SQLITE_MAX_CONNECTIONS: u32 = 5;

/// SQLite busy timeout in seconds
pub const SQLITE_BUSY_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Pagination
// =============================================================================

/// Default page number
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page sizes above this are clamped
pub const MAX_PAGE_SIZE: u32 = 50_000;
