//! Core application

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::PageParams;
use crate::core::cli::{self, CliConfig, Commands, UserCommands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, APP_NAME_LOWER, ENV_LOG};
use crate::data::SqliteService;
use crate::domain::users::{self, ListUsersParams};
use crate::filter::columns::{USER_FILTERABLE, USER_SORTABLE};
use crate::filter::{CompiledFilter, FilterCompiler, SortOrder, validate_columns};

pub struct CoreApp {
    pub config: AppConfig,
    pub compiler: FilterCompiler,
}

/// Output of the `compile` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOutput {
    pub filter: CompiledFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!(
            app = APP_NAME,
            version = env!("CARGO_PKG_VERSION"),
            "Application starting"
        );

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self::init(&cli_config)?;

        match command {
            Commands::Compile {
                filter,
                sort,
                validate,
            } => {
                let output = app.compile(&filter, sort.as_deref(), validate)?;
                print_json(&output)
            }
            Commands::Users {
                command:
                    UserCommands::List {
                        filter,
                        sort,
                        page,
                        page_size,
                    },
            } => {
                let page = PageParams::new(
                    page,
                    Some(page_size.unwrap_or(app.config.pagination.default_page_size)),
                )
                .clamped(app.config.pagination.max_page_size);
                let params = ListUsersParams { filter, sort, page };
                app.list_users(&params).await
            }
        }
    }

    fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let compiler = FilterCompiler::new(config.filter.compiler_options());
        Ok(Self { config, compiler })
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Compile a filter (and optional sort order) for inspection
    pub fn compile(
        &self,
        filter: &str,
        sort: Option<&str>,
        validate: bool,
    ) -> Result<CompileOutput> {
        let compiled = self
            .compiler
            .compile(filter)
            .context("Failed to compile filter")?;

        if validate {
            validate_columns(&compiled, USER_FILTERABLE)
                .context("Filter references a column that cannot be filtered")?;
        }

        // Sort columns are always checked; they are spliced into ORDER BY
        let order_by = match sort {
            Some(sort) => SortOrder::parse(sort, USER_SORTABLE)
                .context("Failed to parse sort order")?
                .to_sql(),
            None => None,
        };

        Ok(CompileOutput {
            filter: compiled,
            order_by,
        })
    }

    async fn list_users(&self, params: &ListUsersParams) -> Result<()> {
        let database = SqliteService::connect(&self.config.database.url)
            .await
            .with_context(|| format!("Failed to open database {}", self.config.database.url))?;

        let result = users::list_users(database.pool(), &self.compiler, params).await;
        database.close().await;

        print_json(&result?)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
