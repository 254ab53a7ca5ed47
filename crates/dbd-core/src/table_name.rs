//! Strongly-typed changelog table name.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table name, optionally schema-qualified like `log.Installs`.
///
/// The name is validated on construction: at most one `.` separator, and
/// neither part may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName {
    schema: Option<String>,
    table: String,
}

impl TableName {
    /// Parse a table name in `table` or `schema.table` form.
    pub fn parse(name: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidTableName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(invalid("name is empty"));
        }

        let mut parts = trimmed.split('.');
        let first = parts.next().unwrap_or_default().trim();
        let second = parts.next().map(str::trim);
        if parts.next().is_some() {
            return Err(invalid("expected 'table' or 'schema.table'"));
        }

        match second {
            None => Ok(Self {
                schema: None,
                table: first.to_string(),
            }),
            Some(table) => {
                if first.is_empty() || table.is_empty() {
                    return Err(invalid("schema and table parts must be non-empty"));
                }
                Ok(Self {
                    schema: Some(first.to_string()),
                    table: table.to_string(),
                })
            }
        }
    }

    /// Build an unqualified name without parsing.
    pub fn unqualified(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    /// Schema part, if the name was qualified.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unqualified table part.
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => f.write_str(&self.table),
        }
    }
}

impl TryFrom<String> for TableName {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::parse(&value)
    }
}

impl From<TableName> for String {
    fn from(name: TableName) -> Self {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unqualified() {
        let name = TableName::parse("ChangeLog").unwrap();
        assert_eq!(name.schema(), None);
        assert_eq!(name.table(), "ChangeLog");
        assert_eq!(name.to_string(), "ChangeLog");
    }

    #[test]
    fn test_schema_qualified() {
        let name = TableName::parse("log.Installs").unwrap();
        assert_eq!(name.schema(), Some("log"));
        assert_eq!(name.table(), "Installs");
        assert_eq!(name.to_string(), "log.Installs");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(TableName::parse("").is_err());
        assert!(TableName::parse("a.b.c").is_err());
        assert!(TableName::parse(".Installs").is_err());
        assert!(TableName::parse("log.").is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let name: TableName = serde_yaml::from_str("log.Installs").unwrap();
        assert_eq!(name.schema(), Some("log"));
        assert!(serde_yaml::from_str::<TableName>("a.b.c").is_err());
    }
}
