//! Operation Context
//!
//! Identity of the caller resolved by the auth middleware, plus tracing metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context for an authenticated operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationContext {
    /// Acting identity, taken from a verified token
    pub user_id: Uuid,

    /// Correlation ID for request tracing (`x-request-id`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
}

impl OperationContext {
    /// Create a context for the given acting user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            correlation_id: None,
        }
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Whether the given owner reference is the acting user
    pub fn owns(&self, owner: Uuid) -> bool {
        self.user_id == owner
    }
}
