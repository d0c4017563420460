//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use tracing::debug;
use xsearch_config::Config;
use xsearch_query::{
    IdGenerator, SearchList, SequentialIds, TermFactory, UuidIds, parse_rsql_with,
};

use crate::cli::output::report_query_error;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
    /// Whether new ids are random UUIDs rather than `t1`, `g1`, ...
    random_ids: bool,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load(random_ids: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        debug!(
            root = ?config.config_root,
            fields = config.fields.len(),
            default_field = config.default_field(),
            "configuration loaded"
        );
        Ok(Self {
            cwd,
            config,
            random_ids,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only(random_ids: bool) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            random_ids,
        })
    }

    /// A term factory creating terms on the configured default field.
    ///
    /// Parse with [`TermFactory::ids`] of the same factory so parsed and added elements never
    /// share an id.
    pub fn term_factory(&self) -> TermFactory {
        let field = self.config.default_field();
        if self.random_ids {
            TermFactory::with_ids(field, UuidIds)
        } else {
            TermFactory::with_ids(field, SequentialIds::new())
        }
    }

    /// Parses an expression, printing the syntax error on failure.
    pub fn parse_or_failure(
        &self,
        rsql: &str,
        ids: &dyn IdGenerator,
    ) -> Result<SearchList, ExitCode> {
        parse_rsql_with(rsql, ids).map_err(|e| report_query_error(&e))
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
