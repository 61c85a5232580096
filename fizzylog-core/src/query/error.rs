use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid status range '{token}'")]
    InvalidStatusRange { token: String },

    #[error("Invalid status code '{token}'")]
    InvalidStatusCode { token: String },

    #[error("rollup query failed: {0}")]
    Storage(#[from] StoreError),
}

impl QueryError {
    /// True when the caller sent bad input, as opposed to a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidStatusRange { .. } | QueryError::InvalidStatusCode { .. }
        )
    }

    /// The offending override token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            QueryError::InvalidStatusRange { token } | QueryError::InvalidStatusCode { token } => {
                Some(token)
            }
            QueryError::Storage(_) => None,
        }
    }
}
