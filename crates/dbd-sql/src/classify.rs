//! Classification of changelog query failures
//!
//! Whether a failed changelog query means "the table is not there yet" is
//! decided purely from the error text and the dialect's literal pattern list.

use crate::dialect::{DbmsSyntax, NotFoundPattern};

/// How a failed changelog query should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The changelog table does not exist
    TableNotFound,
    /// Anything else: permissions, connectivity, syntax
    Other,
}

/// Classify `message` using the patterns of `syntax`.
pub fn classify_error(message: &str, syntax: &dyn DbmsSyntax) -> ErrorClass {
    classify_with_patterns(message, syntax.table_not_found_messages())
}

/// Classify `message` against an explicit pattern list.
///
/// Empty patterns never match.
pub fn classify_with_patterns(message: &str, patterns: &[NotFoundPattern]) -> ErrorClass {
    let matches = |pattern: &NotFoundPattern| {
        !pattern.is_empty() && pattern.iter().all(|fragment| message.contains(fragment))
    };
    if patterns.iter().any(matches) {
        ErrorClass::TableNotFound
    } else {
        ErrorClass::Other
    }
}

#[cfg(test)]
#[path = "classify_test.rs"]
mod tests;
