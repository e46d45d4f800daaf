use std::fmt;

use thiserror::Error;

use crate::models::Table;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Record not found in {table} with ID: {id}")]
    NotFound { table: Table, id: String },

    #[error("Cannot find schema for table: {0}")]
    UnknownTable(Table),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn not_found(table: Table, id: impl Into<String>) -> Self {
        Self::NotFound {
            table,
            id: id.into(),
        }
    }
}

/// A single failed constraint, addressed by a dotted/indexed field path
/// such as `weightSets[2].rpe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    #[must_use]
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.push(path, message);
        err
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Whether any issue was reported at `path`.
    #[must_use]
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|i| i.path == path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            if issue.path.is_empty() {
                write!(f, "{sep}{}", issue.message)?;
            } else {
                write!(f, "{sep}{}: {}", issue.path, issue.message)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_every_issue() {
        let mut err = ValidationError::default();
        err.push("name", "must be at least 1 character");
        err.push("restTimer.defaultDurationSeconds", "must be at least 30");
        assert_eq!(
            err.to_string(),
            "validation failed: name: must be at least 1 character; \
             restTimer.defaultDurationSeconds: must be at least 30"
        );
    }

    #[test]
    fn test_not_found_message_names_table_and_id() {
        let err = Error::not_found(Table::Workouts, "wko-missing");
        assert_eq!(
            err.to_string(),
            "Record not found in workouts with ID: wko-missing"
        );
    }
}
