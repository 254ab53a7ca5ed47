//! Statement delimiter styles

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the statement delimiter appears in a change script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DelimiterType {
    /// Delimiter terminates a statement, e.g. `INSERT INTO t VALUES (1);`
    #[default]
    Normal,
    /// Delimiter stands alone on its own row, e.g. a `GO` line
    Row,
}

impl DelimiterType {
    /// Text placed between rendered statements for this delimiter style.
    pub fn separator(&self, delimiter: &str) -> String {
        match self {
            DelimiterType::Normal => format!("{delimiter}\n"),
            DelimiterType::Row => format!("\n{delimiter}\n"),
        }
    }
}

impl fmt::Display for DelimiterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelimiterType::Normal => write!(f, "normal"),
            DelimiterType::Row => write!(f, "row"),
        }
    }
}
