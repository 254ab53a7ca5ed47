//! Runtime context for CLI commands

use anyhow::{Context, Result};
use dbd_core::{discover_scripts, ChangeScript, Config};
use dbd_db::DbError;
use dbd_engine::{DbmsFactory, DeployError, Deployer, SchemaVersionManager};
use dbd_sql::StatementSplitter;
use dbd_template::TemplateEnvironment;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Resolved configuration plus the dialect factory
pub(crate) struct DeployContext {
    /// Project directory all relative paths resolve against
    pub project_dir: PathBuf,

    /// Configuration with target and CLI overrides applied
    pub config: Config,

    /// Factory for the configured dbms
    pub factory: DbmsFactory,
}

impl DeployContext {
    /// Load configuration and validate the dbms
    pub(crate) fn load(global: &GlobalArgs) -> Result<Self> {
        let project_dir = PathBuf::from(&global.project_dir);
        let config = resolve_config(global, &project_dir)?;
        let factory = DbmsFactory::from_config(&config).context("Invalid dbms in configuration")?;
        log::debug!(
            "dbms={} changelog={} scripts_dir={}",
            factory.dbms(),
            config.changelog_table,
            config.scripts_dir
        );

        Ok(Self {
            project_dir,
            config,
            factory,
        })
    }

    /// Discover change scripts from the scripts directory
    pub(crate) fn discover(&self) -> Result<Vec<ChangeScript>> {
        let dir = self.config.scripts_dir_absolute(&self.project_dir);
        discover_scripts(&dir).context("Failed to discover change scripts")
    }

    /// Splitter for the configured delimiter
    pub(crate) fn splitter(&self) -> StatementSplitter {
        self.factory
            .create_splitter(&self.config.delimiter, self.config.delimiter_type)
    }

    /// Connect and build the version manager
    pub(crate) fn connect(&self) -> Result<SchemaVersionManager> {
        let executor = self
            .factory
            .create_executor(&self.config.connection)
            .context("Failed to connect to target database")?;
        Ok(self
            .factory
            .create_version_manager(executor, self.config.changelog_table.clone()))
    }

    /// Connect for commands whose changes must outlive the process
    pub(crate) fn connect_persistent(&self) -> Result<SchemaVersionManager> {
        if self.config.is_in_memory_connection() {
            anyhow::bail!(
                "No connection configured: set `connection` in dbdeploy.yml, --connection or \
                 DBDEPLOY_CONNECTION (an in-memory database is discarded on exit)"
            );
        }
        self.connect()
    }

    /// Connect when the dbms has an embedded driver; `None` otherwise
    pub(crate) fn try_connect(&self) -> Result<Option<SchemaVersionManager>> {
        match self.factory.create_executor(&self.config.connection) {
            Ok(executor) => Ok(Some(self.factory.create_version_manager(
                executor,
                self.config.changelog_table.clone(),
            ))),
            Err(DeployError::Connection(DbError::NotImplemented { backend, .. })) => {
                log::warn!("No embedded driver for {backend}; rendering offline");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to connect to target database"),
        }
    }

    /// Deployer with the configured policies; `None` means offline
    pub(crate) fn deployer(&self, manager: Option<SchemaVersionManager>) -> Deployer {
        let deployer = match manager {
            Some(manager) => Deployer::new(manager),
            None => Deployer::offline(),
        };
        deployer
            .with_allow_gaps(self.config.allow_gaps)
            .with_last_change_to_apply(self.config.last_change_to_apply)
    }

    /// Template environment honouring `template_dir`
    pub(crate) fn template_environment(&self) -> TemplateEnvironment {
        TemplateEnvironment::new(self.config.template_dir_absolute(&self.project_dir))
    }
}

fn resolve_config(global: &GlobalArgs, project_dir: &Path) -> Result<Config> {
    let config = if let Some(config_path) = &global.config {
        Config::load(Path::new(config_path)).context("Failed to load configuration file")?
    } else {
        Config::load_from_dir(project_dir).context("Failed to load project configuration")?
    };

    let mut config = config
        .with_target(global.target.as_deref())
        .context("Invalid target")?;
    if let Some(connection) = &global.connection {
        config.connection = connection.clone();
    }
    Ok(config)
}
