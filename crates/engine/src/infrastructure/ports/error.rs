//! Error types for port operations.

use geovision_domain::DomainError;

/// Failures reported by the document store gateway.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document, collection, graph or database absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Collection, graph, database or edge definition already present.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The graph has no edge definitions yet, so it cannot be traversed.
    #[error("Graph is empty: {0}")]
    GraphEmpty(String),

    /// A concurrent write touched the same object first.
    #[error("Write conflict: {0}")]
    Conflict(String),

    /// Any other error reported by the store.
    #[error("Store error {error_num} (HTTP {status}): {message}")]
    Store {
        status: u16,
        error_num: i64,
        message: String,
    },

    /// The request never produced a store response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The store answered with something we could not decode.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn decode(message: impl ToString) -> Self {
        Self::Decode(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists(_))
    }

    pub fn is_graph_empty(&self) -> bool {
        matches!(self, Self::GraphEmpty(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Caller input rejected before reaching the store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl ToString) -> Self {
        Self::InvalidInput(message.to_string())
    }

    /// Translate a gateway error, turning store-level absence into `NotFound`.
    pub fn from_store(
        operation: &'static str,
        entity_type: &'static str,
        id: impl ToString,
        error: StoreError,
    ) -> Self {
        match error {
            StoreError::NotFound(_) => Self::not_found(entity_type, id),
            StoreError::Decode(message) => Self::Serialization(message),
            other => Self::database(operation, other),
        }
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<DomainError> for RepoError {
    fn from(e: DomainError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_not_found_becomes_repo_not_found() {
        let err = RepoError::from_store(
            "read_document",
            "Person",
            "123",
            StoreError::NotFound("persons/123".into()),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Person not found: 123");
    }

    #[test]
    fn other_store_errors_become_database_errors() {
        let err = RepoError::from_store(
            "create_document",
            "Person",
            "",
            StoreError::Transport("connection refused".into()),
        );
        assert!(matches!(
            err,
            RepoError::Database {
                operation: "create_document",
                ..
            }
        ));
    }

    #[test]
    fn domain_errors_become_invalid_input() {
        let err: RepoError = DomainError::invalid_id("identifier is empty").into();
        assert!(matches!(err, RepoError::InvalidInput(_)));
    }
}
