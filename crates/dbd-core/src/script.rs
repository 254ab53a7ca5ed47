//! Change scripts and changelog entries

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Build the unique changelog key for a script: `folder/scriptNumber`.
pub fn unique_key(folder: &str, number: u64) -> String {
    format!("{folder}/{number}")
}

/// A numbered unit of SQL waiting to be applied.
///
/// Identity is `(folder, number)`; two scripts with the same identity are
/// never valid in one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeScript {
    /// Logical folder the script belongs to (e.g. `Scripts`, `v2.0`)
    pub folder: String,

    /// Script number, unique within the folder
    pub number: u64,

    /// Display name, usually the file name
    pub name: String,

    /// Raw SQL body
    pub content: String,
}

impl ChangeScript {
    /// Create a new change script
    pub fn new(
        folder: impl Into<String>,
        number: u64,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            number,
            name: name.into(),
            content: content.into(),
        }
    }

    /// Changelog key, `folder/number`
    pub fn unique_key(&self) -> String {
        unique_key(&self.folder, self.number)
    }

    /// Application order: folder first, then script number.
    pub fn order_cmp(&self, other: &Self) -> Ordering {
        self.folder
            .cmp(&other.folder)
            .then(self.number.cmp(&other.number))
    }
}

impl fmt::Display for ChangeScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.unique_key(), self.name)
    }
}

/// Outcome code stored in the changelog `ScriptStatus` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    /// Script failed
    Failure,
    /// Script completed successfully
    Success,
    /// A failure was resolved by hand
    ProblemResolved,
    /// Script was started but never completed
    Started,
}

impl ScriptStatus {
    /// Integer code persisted in the changelog table
    pub fn code(&self) -> i32 {
        match self {
            ScriptStatus::Failure => 0,
            ScriptStatus::Success => 1,
            ScriptStatus::ProblemResolved => 2,
            ScriptStatus::Started => 3,
        }
    }

    /// Decode a persisted status code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ScriptStatus::Failure),
            1 => Some(ScriptStatus::Success),
            2 => Some(ScriptStatus::ProblemResolved),
            3 => Some(ScriptStatus::Started),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStatus::Failure => write!(f, "failure"),
            ScriptStatus::Success => write!(f, "success"),
            ScriptStatus::ProblemResolved => write!(f, "problem_resolved"),
            ScriptStatus::Started => write!(f, "started"),
        }
    }
}

/// A row of the changelog table: a script that has already been applied.
///
/// Entries are written once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Folder of the applied script
    pub folder: String,

    /// Script number of the applied script
    pub script_number: u64,

    /// When application started
    pub start_date: Option<NaiveDateTime>,

    /// When application completed
    pub complete_date: Option<NaiveDateTime>,

    /// Principal that applied the script
    pub applied_by: Option<String>,

    /// Script display name
    pub script_name: String,

    /// Recorded outcome
    pub status: ScriptStatus,

    /// Captured output
    pub output: String,
}

impl ChangeEntry {
    /// Build a successful entry for `script`.
    pub fn success(
        script: &ChangeScript,
        start_date: NaiveDateTime,
        complete_date: NaiveDateTime,
        applied_by: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            folder: script.folder.clone(),
            script_number: script.number,
            start_date: Some(start_date),
            complete_date: Some(complete_date),
            applied_by: Some(applied_by.into()),
            script_name: script.name.clone(),
            status: ScriptStatus::Success,
            output: output.into(),
        }
    }

    /// Changelog key, `folder/scriptNumber`
    pub fn unique_key(&self) -> String {
        unique_key(&self.folder, self.script_number)
    }
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
