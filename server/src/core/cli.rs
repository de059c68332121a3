use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{
    ENV_CONFIG, ENV_DATABASE_URL, ENV_FILTER_COLLATION, ENV_FILTER_MAX_LENGTH,
};

#[derive(Parser)]
#[command(name = "usermanagement")]
#[command(version, about = "User management filter compiler and query tool", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Collation appended to LIKE comparisons (e.g. NOCASE, SQL_Latin1_General_CP1_CI_AI)
    #[arg(long, global = true, env = ENV_FILTER_COLLATION)]
    pub collation: Option<String>,

    /// Maximum filter length in bytes
    #[arg(long, global = true, env = ENV_FILTER_MAX_LENGTH)]
    pub max_filter_length: Option<usize>,

    /// SQLite connection URL
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Compile a filter expression and print the SQL predicate and parameters
    Compile {
        /// Filter expression, e.g. `Age >= 18 && Status == "active"`
        filter: String,

        /// Sort order to compile alongside, e.g. `Username desc, Email`
        #[arg(long)]
        sort: Option<String>,

        /// Check referenced columns against the user allow-list
        #[arg(long)]
        validate: bool,
    },
    /// User queries
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum UserCommands {
    /// List users matching a filter
    List {
        /// Filter expression
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Sort order
        #[arg(long, short = 's')]
        sort: Option<String>,

        /// Page number (1-based)
        #[arg(long)]
        page: Option<u32>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub collation: Option<String>,
    pub max_filter_length: Option<usize>,
    pub database_url: Option<String>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        collation: cli.collation,
        max_filter_length: cli.max_filter_length,
        database_url: cli.database_url,
    };
    (config, cli.command)
}
