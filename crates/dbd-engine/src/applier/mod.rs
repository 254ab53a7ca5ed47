//! Appliers: execute or render a pending set.
//!
//! Both variants honour one contract: scripts are handled in the given order,
//! each script's changelog insert shares the script's transaction, and the
//! first failure ends the run.

mod direct;
mod template;

pub use direct::{DirectApplier, DEFAULT_APPLIED_BY};
pub use template::TemplateApplier;

use dbd_core::ChangeScript;

use crate::error::DeployResult;

/// Applies a pending set, in order, with its changelog bookkeeping.
pub trait Applier {
    /// Apply `pending`; create the changelog table first when asked.
    fn apply(&mut self, pending: &[ChangeScript], create_changelog_table: bool)
        -> DeployResult<()>;

    /// Short label for logs and reports
    fn kind(&self) -> &'static str;
}
