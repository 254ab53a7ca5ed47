//! Change Script Set: ordered, validated scripts and the pending set.

use std::collections::{BTreeMap, HashMap, HashSet};

use dbd_core::{ChangeEntry, ChangeScript};

use crate::error::{DeployError, DeployResult};

/// Discovered scripts in application order, free of duplicate identities.
#[derive(Debug, Clone, Default)]
pub struct ChangeScriptSet {
    scripts: Vec<ChangeScript>,
}

/// Scripts still to apply, in application order.
#[derive(Debug, Clone, Default)]
pub struct PendingSet {
    /// Scripts to apply now
    pub scripts: Vec<ChangeScript>,

    /// Unapplied scripts above `last_change_to_apply`
    pub held_back: Vec<ChangeScript>,
}

impl PendingSet {
    /// Whether nothing is left to apply
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Keys of the scripts to apply
    pub fn keys(&self) -> Vec<String> {
        self.scripts.iter().map(ChangeScript::unique_key).collect()
    }
}

impl ChangeScriptSet {
    /// Validate and order discovered scripts.
    ///
    /// Input order is irrelevant. Fails on duplicate `folder/number` keys, and
    /// on numbering gaps within a folder when `allow_gaps` is false.
    pub fn new(mut scripts: Vec<ChangeScript>, allow_gaps: bool) -> DeployResult<Self> {
        scripts.sort_by(|a, b| a.order_cmp(b));

        {
            let mut seen: HashMap<String, &ChangeScript> = HashMap::new();
            for script in &scripts {
                if let Some(first) = seen.insert(script.unique_key(), script) {
                    return Err(DeployError::DuplicateScriptNumber {
                        key: script.unique_key(),
                        first: first.name.clone(),
                        second: script.name.clone(),
                    });
                }
            }
        }

        if !allow_gaps {
            check_gaps(&scripts)?;
        }

        Ok(Self { scripts })
    }

    /// All scripts, in application order
    pub fn scripts(&self) -> &[ChangeScript] {
        &self.scripts
    }

    /// Number of scripts
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Scripts not recorded in `applied`.
    ///
    /// Any recorded row counts as applied, whatever its status. Scripts
    /// numbered above `last_change_to_apply` are held back.
    pub fn pending(
        &self,
        applied: &[ChangeEntry],
        last_change_to_apply: Option<u64>,
    ) -> PendingSet {
        let applied: HashSet<String> = applied.iter().map(ChangeEntry::unique_key).collect();
        let mut pending = PendingSet::default();

        for script in &self.scripts {
            if applied.contains(&script.unique_key()) {
                continue;
            }
            match last_change_to_apply {
                Some(last) if script.number > last => pending.held_back.push(script.clone()),
                _ => pending.scripts.push(script.clone()),
            }
        }

        if !pending.held_back.is_empty() {
            log::info!(
                "Holding back {} change script(s) above the last change to apply",
                pending.held_back.len()
            );
        }
        pending
    }
}

fn check_gaps(sorted: &[ChangeScript]) -> DeployResult<()> {
    let mut by_folder: BTreeMap<&str, Vec<u64>> = BTreeMap::new();
    for script in sorted {
        by_folder
            .entry(script.folder.as_str())
            .or_default()
            .push(script.number);
    }

    for (folder, numbers) in by_folder {
        for pair in numbers.windows(2) {
            if pair[1] > pair[0] + 1 {
                return Err(DeployError::ScriptNumberGap {
                    folder: folder.to_string(),
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "change_set_test.rs"]
mod tests;
