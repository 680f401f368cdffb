// ABOUTME: Step-tagged errors for provisioning operations.
// ABOUTME: Every variant names the step that failed so callers can decide what to do next.

use snafu::Snafu;

use super::spec::SpecError;
use crate::runtime::{ContainerError, ImageError, NetworkError};
use crate::types::ContainerId;

/// A provisioning step failed. Nothing is retried internally.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProvisionError {
    #[snafu(display("invalid container spec: {source}"))]
    SpecValidation { source: SpecError },

    #[snafu(display("failed to provision network {network}: {source}"))]
    NetworkProvision {
        network: String,
        source: NetworkError,
    },

    #[snafu(display("failed to pull image {image}: {source}"))]
    Pull { image: String, source: ImageError },

    #[snafu(display("failed to inspect container {name}: {source}"))]
    Inspect {
        name: String,
        source: ContainerError,
    },

    #[snafu(display("failed to create container {name}: {source}"))]
    Create {
        name: String,
        source: ContainerError,
    },

    /// The container exists in the "created" state; it was not rolled back.
    #[snafu(display("container {name} ({}) was created but failed to start: {source}", id.short()))]
    Start {
        name: String,
        id: ContainerId,
        source: ContainerError,
    },

    #[snafu(display("cancelled during {step}"))]
    Cancelled { step: &'static str },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The runtime could not be reached, whichever step was running.
    Connection,
    NetworkProvision,
    SpecValidation,
    Pull,
    Inspect,
    Create,
    /// Created but not running.
    Start,
    Cancelled,
}

impl ProvisionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProvisionError::SpecValidation { .. } => ErrorKind::SpecValidation,
            ProvisionError::NetworkProvision { source, .. } if source.is_unavailable() => {
                ErrorKind::Connection
            }
            ProvisionError::NetworkProvision { .. } => ErrorKind::NetworkProvision,
            ProvisionError::Pull { source, .. } if source.is_unavailable() => ErrorKind::Connection,
            ProvisionError::Pull { .. } => ErrorKind::Pull,
            ProvisionError::Inspect { source, .. } if source.is_unavailable() => {
                ErrorKind::Connection
            }
            ProvisionError::Inspect { .. } => ErrorKind::Inspect,
            ProvisionError::Create { source, .. } if source.is_unavailable() => {
                ErrorKind::Connection
            }
            ProvisionError::Create { .. } => ErrorKind::Create,
            ProvisionError::Start { source, .. } if source.is_unavailable() => {
                ErrorKind::Connection
            }
            ProvisionError::Start { .. } => ErrorKind::Start,
            ProvisionError::Cancelled { .. } => ErrorKind::Cancelled,
        }
    }

    /// The id of a container left behind by a failed step, if any.
    pub fn leftover_container(&self) -> Option<&ContainerId> {
        match self {
            ProvisionError::Start { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<SpecError> for ProvisionError {
    fn from(source: SpecError) -> Self {
        ProvisionError::SpecValidation { source }
    }
}
