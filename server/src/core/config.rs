use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filter::CompilerOptions;
use crate::utils::file::{expand_path, expand_sqlite_url};

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_DATABASE_URL, DEFAULT_FILTER_COLLATION,
    DEFAULT_FILTER_MAX_LENGTH, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Filter compiler configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FilterFileConfig {
    pub collation: Option<String>,
    pub max_length: Option<usize>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// SQLite connection URL (or use USERMANAGEMENT_DATABASE_URL env var)
    pub url: Option<String>,
}

/// Pagination configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationFileConfig {
    pub default_page_size: Option<u32>,
    pub max_page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub filter: Option<FilterFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub pagination: Option<PaginationFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(filter) = other.filter {
            let current = self.filter.get_or_insert_with(FilterFileConfig::default);
            if filter.collation.is_some() {
                tracing::trace!(collation = ?filter.collation, "Merging filter.collation");
                current.collation = filter.collation;
            }
            if filter.max_length.is_some() {
                tracing::trace!(max_length = ?filter.max_length, "Merging filter.max_length");
                current.max_length = filter.max_length;
            }
        }

        if let Some(database) = other.database {
            let current = self.database.get_or_insert_with(DatabaseFileConfig::default);
            if database.url.is_some() {
                tracing::trace!(url = "***", "Merging database.url");
                current.url = database.url;
            }
        }

        if let Some(pagination) = other.pagination {
            let current = self
                .pagination
                .get_or_insert_with(PaginationFileConfig::default);
            if pagination.default_page_size.is_some() {
                tracing::trace!(default_page_size = ?pagination.default_page_size, "Merging pagination.default_page_size");
                current.default_page_size = pagination.default_page_size;
            }
            if pagination.max_page_size.is_some() {
                tracing::trace!(max_page_size = ?pagination.max_page_size, "Merging pagination.max_page_size");
                current.max_page_size = pagination.max_page_size;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub collation: String,
    pub max_length: usize,
}

impl FilterConfig {
    pub fn compiler_options(&self) -> CompilerOptions {
        CompilerOptions {
            collation: self.collation.clone(),
            max_length: self.max_length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.usermanagement/usermanagement.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_with_profile(cli, get_profile_config_path().as_deref())
    }

    /// Load configuration with an explicit profile config path (`None` skips it)
    fn load_with_profile(cli: &CliConfig, profile_path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_filter = file_config.filter.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_pagination = file_config.pagination.unwrap_or_default();

        let collation = cli
            .collation
            .clone()
            .or(file_filter.collation)
            .unwrap_or_else(|| DEFAULT_FILTER_COLLATION.to_string());
        validate_collation(&collation)?;

        let max_length = cli
            .max_filter_length
            .or(file_filter.max_length)
            .unwrap_or(DEFAULT_FILTER_MAX_LENGTH);
        if max_length == 0 {
            anyhow::bail!("filter.max_length must be greater than 0");
        }

        let url = cli
            .database_url
            .clone()
            .or(file_database.url)
            .map(|url| expand_sqlite_url(&url))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_page_size = file_pagination.max_page_size.unwrap_or(MAX_PAGE_SIZE);
        let default_page_size = file_pagination
            .default_page_size
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if max_page_size == 0 || default_page_size == 0 {
            anyhow::bail!("pagination page sizes must be greater than 0");
        }
        if default_page_size > max_page_size {
            anyhow::bail!(
                "pagination.default_page_size ({}) exceeds pagination.max_page_size ({})",
                default_page_size,
                max_page_size
            );
        }

        let config = Self {
            filter: FilterConfig {
                collation,
                max_length,
            },
            database: DatabaseConfig { url },
            pagination: PaginationConfig {
                default_page_size,
                max_page_size,
            },
        };
        tracing::debug!(
            collation = %config.filter.collation,
            max_filter_length = config.filter.max_length,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// Collation names are written into SQL, so only plain identifiers are accepted
fn validate_collation(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        anyhow::bail!(
            "Invalid collation '{}': only letters, digits and '_' are allowed",
            name
        );
    }
    Ok(())
}

/// Get the profile config path (~/.usermanagement/usermanagement.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
