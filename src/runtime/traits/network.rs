// ABOUTME: Network operations trait for container runtimes.
// ABOUTME: Inspect and create user-defined networks.

use super::sealed::Sealed;
use super::shared_types::{CreatedNetwork, NetworkConfig, NetworkDetails};
use async_trait::async_trait;

#[async_trait]
pub trait NetworkOps: Sealed + Send + Sync {
    /// Look up a network by name or ID.
    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, NetworkError>;

    /// Create a network.
    async fn create_network(&self, config: &NetworkConfig) -> Result<CreatedNetwork, NetworkError>;
}

/// Errors from network operations.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("network not found: {0}")]
    NotFound(String),

    #[error("network already exists: {0}")]
    AlreadyExists(String),

    #[error("runtime unavailable: {0}")]
    Unavailable(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl NetworkError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, NetworkError::Unavailable(_))
    }
}
