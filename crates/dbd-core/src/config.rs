//! Configuration types and parsing for dbdeploy.yml

use crate::delimiter::DelimiterType;
use crate::error::{CoreError, CoreResult};
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main deployment configuration from dbdeploy.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// DBMS dialect identifier (mssql, postgres, mysql, duckdb)
    #[serde(default = "default_dbms")]
    pub dbms: String,

    /// Connection descriptor (DuckDB path or `:memory:`)
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Changelog table name, optionally schema-qualified
    #[serde(default = "default_changelog_table")]
    pub changelog_table: TableName,

    /// Directory holding the numbered change scripts
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: String,

    /// Statement delimiter token
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Whether the delimiter terminates statements or stands on its own row
    #[serde(default)]
    pub delimiter_type: DelimiterType,

    /// Directory with `<dbms>_apply.sql.j2` overrides for rendered output
    #[serde(default)]
    pub template_dir: Option<String>,

    /// Default output file for `dbdeploy render`
    #[serde(default)]
    pub output_file: Option<String>,

    /// Tolerate gaps in script numbering within a folder
    #[serde(default = "default_true")]
    pub allow_gaps: bool,

    /// Highest script number to apply; later scripts are held back
    #[serde(default)]
    pub last_change_to_apply: Option<u64>,

    /// Principal recorded in the changelog `AppliedBy` column
    #[serde(default)]
    pub applied_by: Option<String>,

    /// External SQL tool used by `dbdeploy render --execute`
    #[serde(default)]
    pub sql_tool: Option<SqlToolConfig>,

    /// Named target configurations (e.g., dev, test, prod)
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Connection override
    #[serde(default)]
    pub connection: Option<String>,

    /// Changelog table override
    #[serde(default)]
    pub changelog_table: Option<TableName>,

    /// Applied-by override
    #[serde(default)]
    pub applied_by: Option<String>,
}

/// External SQL batch tool, fed the rendered script on stdin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlToolConfig {
    /// Program to run (e.g. `sqlcmd`, `psql`, `duckdb`)
    pub program: String,

    /// Arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_dbms() -> String {
    "duckdb".to_string()
}

const DEFAULT_CONNECTION: &str = ":memory:";

fn default_connection() -> String {
    DEFAULT_CONNECTION.to_string()
}

fn default_changelog_table() -> TableName {
    TableName::unqualified("ChangeLog")
}

fn default_scripts_dir() -> String {
    "Scripts".to_string()
}

fn default_delimiter() -> String {
    ";".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dbms: default_dbms(),
            connection: default_connection(),
            changelog_table: default_changelog_table(),
            scripts_dir: default_scripts_dir(),
            delimiter: default_delimiter(),
            delimiter_type: DelimiterType::default(),
            template_dir: None,
            output_file: None,
            allow_gaps: true,
            last_change_to_apply: None,
            applied_by: None,
            sql_tool: None,
            targets: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for dbdeploy.yml or dbdeploy.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("dbdeploy.yml");
        let yaml_path = dir.join("dbdeploy.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.dbms.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "dbms cannot be empty".to_string(),
            });
        }

        if self.delimiter.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "delimiter cannot be empty".to_string(),
            });
        }

        if let Some(tool) = &self.sql_tool {
            if tool.program.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "sql_tool.program cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Return a copy of this configuration with the named target's overrides applied.
    ///
    /// `None` returns the base configuration unchanged.
    pub fn with_target(&self, target: Option<&str>) -> CoreResult<Self> {
        let Some(name) = target else {
            return Ok(self.clone());
        };

        let overrides = self
            .targets
            .get(name)
            .ok_or_else(|| CoreError::UnknownTarget {
                name: name.to_string(),
                available: self.available_targets().join(", "),
            })?;

        let mut resolved = self.clone();
        if let Some(connection) = &overrides.connection {
            resolved.connection = connection.clone();
        }
        if let Some(table) = &overrides.changelog_table {
            resolved.changelog_table = table.clone();
        }
        if let Some(applied_by) = &overrides.applied_by {
            resolved.applied_by = Some(applied_by.clone());
        }
        Ok(resolved)
    }

    /// Get the list of available target names
    pub fn available_targets(&self) -> Vec<&str> {
        self.targets.keys().map(|s| s.as_str()).collect()
    }

    /// Whether the connection is a throwaway in-memory database
    pub fn is_in_memory_connection(&self) -> bool {
        let connection = self.connection.trim();
        connection.is_empty() || connection == DEFAULT_CONNECTION
    }

    /// Get absolute scripts directory relative to a project root
    pub fn scripts_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.scripts_dir)
    }

    /// Get absolute template directory relative to a project root
    pub fn template_dir_absolute(&self, root: &Path) -> Option<PathBuf> {
        self.template_dir.as_ref().map(|dir| root.join(dir))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
