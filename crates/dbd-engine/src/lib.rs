//! dbd-engine - Change-application engine for dbdeploy
//!
//! Determines which change scripts are pending by comparing the discovered
//! script set against the changelog table, then applies them exactly once
//! and in order, either directly against a live connection or by rendering
//! a fail-fast SQL artifact for an external tool.

pub mod applier;
pub mod change_set;
pub mod deployer;
pub mod error;
pub mod factory;
pub mod version_manager;

pub use applier::{Applier, DirectApplier, TemplateApplier, DEFAULT_APPLIED_BY};
pub use change_set::{ChangeScriptSet, PendingSet};
pub use deployer::{DeployReport, Deployer};
pub use error::{DeployError, DeployResult};
pub use factory::DbmsFactory;
pub use version_manager::SchemaVersionManager;
