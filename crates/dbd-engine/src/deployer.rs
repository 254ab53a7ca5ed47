//! Deployment orchestration

use dbd_core::{ChangeEntry, ChangeScript};

use crate::applier::Applier;
use crate::change_set::{ChangeScriptSet, PendingSet};
use crate::error::DeployResult;
use crate::version_manager::SchemaVersionManager;

/// Outcome of a status check or a run
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    /// Changelog rows found before the run
    pub applied: Vec<ChangeEntry>,

    /// Scripts that were pending (and, after `run`, applied or rendered)
    pub pending: Vec<ChangeScript>,

    /// Unapplied scripts above the last change to apply
    pub held_back: Vec<ChangeScript>,

    /// Whether the changelog was treated as empty without being read
    pub offline: bool,
}

impl DeployReport {
    fn new(applied: Vec<ChangeEntry>, pending: PendingSet, offline: bool) -> Self {
        Self {
            applied,
            pending: pending.scripts,
            held_back: pending.held_back,
            offline,
        }
    }

    /// Keys of the pending scripts
    pub fn pending_keys(&self) -> Vec<String> {
        self.pending.iter().map(ChangeScript::unique_key).collect()
    }
}

/// Computes the pending set and hands it to an applier.
pub struct Deployer {
    manager: Option<SchemaVersionManager>,
    allow_gaps: bool,
    last_change_to_apply: Option<u64>,
}

impl Deployer {
    /// Deployer reading applied changes through `manager`
    pub fn new(manager: SchemaVersionManager) -> Self {
        Self {
            manager: Some(manager),
            allow_gaps: true,
            last_change_to_apply: None,
        }
    }

    /// Deployer with no connection: every discovered script is pending
    pub fn offline() -> Self {
        Self {
            manager: None,
            allow_gaps: true,
            last_change_to_apply: None,
        }
    }

    /// Set the gap policy
    pub fn with_allow_gaps(mut self, allow_gaps: bool) -> Self {
        self.allow_gaps = allow_gaps;
        self
    }

    /// Hold back scripts numbered above `last`
    pub fn with_last_change_to_apply(mut self, last: Option<u64>) -> Self {
        self.last_change_to_apply = last;
        self
    }

    /// Version manager, absent when offline
    pub fn manager(&self) -> Option<&SchemaVersionManager> {
        self.manager.as_ref()
    }

    fn applied_changes(&self) -> DeployResult<Vec<ChangeEntry>> {
        match &self.manager {
            Some(manager) => manager.get_applied_changes(),
            None => {
                log::info!("Offline: treating the changelog as empty");
                Ok(Vec::new())
            }
        }
    }

    fn plan(&self, discovered: Vec<ChangeScript>) -> DeployResult<DeployReport> {
        let set = ChangeScriptSet::new(discovered, self.allow_gaps)?;
        let applied = self.applied_changes()?;
        let pending = set.pending(&applied, self.last_change_to_apply);
        log::debug!(
            "{} script(s) discovered, {} applied, {} pending",
            set.len(),
            applied.len(),
            pending.scripts.len()
        );
        Ok(DeployReport::new(applied, pending, self.manager.is_none()))
    }

    /// Report applied and pending scripts without changing anything
    pub fn status(&self, discovered: Vec<ChangeScript>) -> DeployResult<DeployReport> {
        self.plan(discovered)
    }

    /// Apply every pending script through `applier`.
    ///
    /// Validation and the changelog read happen before the applier is
    /// invoked, so those failures leave the target untouched.
    pub fn run(
        &self,
        discovered: Vec<ChangeScript>,
        applier: &mut dyn Applier,
        create_changelog_table: bool,
    ) -> DeployResult<DeployReport> {
        let report = self.plan(discovered)?;
        if report.pending.is_empty() {
            log::info!("No pending change scripts");
        }

        applier.apply(&report.pending, create_changelog_table)?;
        log::info!(
            "{} applier finished {} change script(s)",
            applier.kind(),
            report.pending.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "deployer_test.rs"]
mod tests;
