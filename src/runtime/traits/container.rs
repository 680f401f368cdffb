// ABOUTME: Container operations trait for container runtimes.
// ABOUTME: Create, start, remove and list containers.

use super::sealed::Sealed;
use super::shared_types::{ContainerConfig, CreatedContainer};
use crate::types::ContainerId;
use async_trait::async_trait;

/// Container lifecycle operations.
#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Create a container; it is left in the "created" state.
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<CreatedContainer, ContainerError>;

    /// Start a created container.
    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError>;

    /// Remove a container. With `force`, a running container is killed first.
    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError>;

    /// List containers matching the given filters.
    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError>;
}

/// Filters for listing containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerFilters {
    /// Runtime-side name filter. The runtime treats it as a regular
    /// expression, so callers still match exactly on the results.
    pub name: Option<String>,
    /// Include stopped containers.
    pub all: bool,
}

impl ContainerFilters {
    pub fn running() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            all: true,
            ..Default::default()
        }
    }

    /// Narrow the listing to containers named exactly `name`.
    ///
    /// Docker matches the pattern against `/name`, Podman against `name`;
    /// the optional slash covers both.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(format!("^/?{name}$"));
        self
    }
}

/// Summary information about a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: ContainerId,
    /// Names as listed by the runtime, each with a leading `/`.
    pub names: Vec<String>,
}

/// Errors from container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("container not found: {0}")]
    NotFound(String),

    #[error("container already exists: {0}")]
    AlreadyExists(String),

    #[error("container already running: {0}")]
    AlreadyRunning(String),

    #[error("image not found: {0}")]
    ImageNotFound(String),

    #[error("runtime unavailable: {0}")]
    Unavailable(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl ContainerError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ContainerError::Unavailable(_))
    }
}
