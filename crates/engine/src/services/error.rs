//! Error taxonomy exposed to callers.

use geovision_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Message returned to callers for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal service error. Please try again later.";

/// The only error categories callers may rely on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// The cause is logged server-side and never returned.
    #[error("Internal service error. Please try again later.")]
    Internal,

    #[error("{0} is not implemented")]
    Unimplemented(&'static str),
}

impl ServiceError {
    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest(message.to_string())
    }

    /// Categorize a repository error, logging the cause of internal failures.
    pub fn from_repo(operation: &'static str, error: RepoError) -> Self {
        match error {
            RepoError::NotFound { .. } => Self::NotFound(error.to_string()),
            RepoError::InvalidInput(message) => Self::BadRequest(message),
            RepoError::Database { .. } | RepoError::Serialization(_) => {
                tracing::error!(error = %error, operation, "Repository error");
                Self::Internal
            }
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

/// Reject empty keys before any store call.
pub(crate) fn require_key(key: &str) -> Result<(), ServiceError> {
    if key.is_empty() {
        return Err(ServiceError::bad_request("key is required"));
    }
    Ok(())
}
