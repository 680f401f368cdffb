// ABOUTME: Runtime connection errors with the SNAFU pattern.
// ABOUTME: Unifies endpoint resolution and connection failures for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

/// Failure to establish the runtime connection. Nothing can be provisioned
/// until the caller resolves it; there is no reconnect logic.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime connection to {address} failed: {source}"))]
    Connection {
        address: String,
        source: RuntimeInfoError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No runtime endpoint could be found on the host.
    NoRuntimeFound,
    /// The configured or inherited address is malformed.
    InvalidAddress,
    /// The endpoint exists but the daemon did not answer.
    ConnectionFailed,
    /// The daemon answered with an error.
    RuntimeOperation,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
                DetectionError::InvalidAddress(_) => RuntimeErrorKind::InvalidAddress,
            },
            RuntimeError::Connection { source, .. } => match source {
                RuntimeInfoError::Unreachable(_) => RuntimeErrorKind::ConnectionFailed,
                RuntimeInfoError::Rejected { .. } => RuntimeErrorKind::RuntimeOperation,
            },
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}
