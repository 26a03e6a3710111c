use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    /// A unique field already holds the submitted value.
    #[error("Uniqueness violation: {0}")]
    Uniqueness(String),

    /// An attribute constraint was violated, e.g. dates out of order.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A reference points at a missing or unassociated entity.
    #[error("Referential violation: {0}")]
    Referential(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Messages attached to classified constraint violations of one write.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintMessages {
    pub unique: &'static str,
    pub foreign_key: &'static str,
    pub check: &'static str,
}

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(UNIQUE_VIOLATION)
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    }

    pub fn is_check_violation(&self) -> bool {
        self.sql_state().as_deref() == Some(CHECK_VIOLATION)
    }

    fn sql_state(&self) -> Option<String> {
        match self {
            StorageError::Database(sqlx::Error::Database(e)) => e.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    /// Turn a raw database failure into the domain taxonomy.
    pub fn classify(error: sqlx::Error, messages: ConstraintMessages) -> Self {
        let error = StorageError::from(error);

        if error.is_unique_violation() {
            StorageError::Uniqueness(messages.unique.to_string())
        } else if error.is_foreign_key_violation() {
            StorageError::Referential(messages.foreign_key.to_string())
        } else if error.is_check_violation() {
            StorageError::Validation(messages.check.to_string())
        } else {
            error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGES: ConstraintMessages = ConstraintMessages {
        unique: "dup",
        foreign_key: "missing",
        check: "bad",
    };

    #[test]
    fn test_classify_keeps_non_database_errors() {
        let error = StorageError::classify(sqlx::Error::RowNotFound, MESSAGES);
        assert!(matches!(error, StorageError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_domain_errors_have_no_sql_state() {
        let error = StorageError::Uniqueness("dup".to_string());
        assert!(!error.is_unique_violation());
        assert!(!error.is_foreign_key_violation());
        assert!(!error.is_check_violation());
    }

    #[test]
    fn test_display_includes_message() {
        let error = StorageError::Referential("Sport is not part of competition".to_string());
        assert_eq!(
            error.to_string(),
            "Referential violation: Sport is not part of competition"
        );
    }
}
