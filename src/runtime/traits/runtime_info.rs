// ABOUTME: Daemon reachability and identity.
// ABOUTME: Ping gates every provisioning command; info is reported once after connecting.

use super::sealed::Sealed;
use super::shared_types::RuntimeMetadata;
use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Sealed + Send + Sync {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;

    /// Round-trip to the daemon without side effects.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    /// Nothing answered on the endpoint.
    #[error("daemon unreachable: {0}")]
    Unreachable(String),

    /// The daemon answered, but with an error.
    #[error("daemon returned {status}: {message}")]
    Rejected { status: u16, message: String },
}
