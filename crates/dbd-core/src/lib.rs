//! dbd-core - Core library for dbdeploy
//!
//! This crate provides the shared data model (change scripts, changelog
//! entries, table names), configuration parsing for `dbdeploy.yml`, and
//! file-system discovery of numbered change scripts.

pub mod config;
pub mod delimiter;
pub mod discovery;
pub mod error;
pub mod script;
pub mod table_name;

pub use config::{Config, SqlToolConfig, TargetConfig};
pub use delimiter::DelimiterType;
pub use discovery::discover_scripts;
pub use error::{CoreError, CoreResult};
pub use script::{ChangeEntry, ChangeScript, ScriptStatus};
pub use table_name::TableName;
