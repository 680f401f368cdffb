// ABOUTME: Resolves a container name to its current state on the runtime.
// ABOUTME: Scans running containers first, then all containers, matching the first listed name.

use super::cancellable;
use super::error::{InspectSnafu, ProvisionError};
use crate::runtime::{ContainerFilters, ContainerOps, ContainerSummary};
use crate::types::{ContainerId, ContainerName};
use snafu::ResultExt;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Where a named container stands right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Absent,
    Stopped(ContainerId),
    Running(ContainerId),
}

impl ContainerState {
    pub fn id(&self) -> Option<&ContainerId> {
        match self {
            ContainerState::Absent => None,
            ContainerState::Stopped(id) | ContainerState::Running(id) => Some(id),
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self, ContainerState::Absent)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running(_))
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerState::Absent => f.write_str("absent"),
            ContainerState::Stopped(id) => write!(f, "stopped ({})", id.short()),
            ContainerState::Running(id) => write!(f, "running ({})", id.short()),
        }
    }
}

pub struct ContainerInspector<R> {
    runtime: Arc<R>,
    cancel: Option<CancellationToken>,
}

impl<R> Clone for ContainerInspector<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            cancel: self.cancel.clone(),
        }
    }
}

impl<R: ContainerOps> ContainerInspector<R> {
    pub fn new(runtime: Arc<R>) -> Self {
        Self {
            runtime,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Find `name`: running wins over stopped; two list calls when the
    /// container is not running.
    pub async fn find(&self, name: &ContainerName) -> Result<ContainerState, ProvisionError> {
        let running = self.list(name, ContainerFilters::running()).await?;
        if let Some(id) = first_name_match(&running, name) {
            tracing::debug!("Container {} is running as {}", name, id.short());
            return Ok(ContainerState::Running(id));
        }

        let all = self.list(name, ContainerFilters::all()).await?;
        let state = match first_name_match(&all, name) {
            Some(id) => ContainerState::Stopped(id),
            None => ContainerState::Absent,
        };
        tracing::debug!("Container {} is {}", name, state);
        Ok(state)
    }

    async fn list(
        &self,
        name: &ContainerName,
        filters: ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ProvisionError> {
        let filters = filters.named(name.as_str());
        cancellable(
            self.cancel.as_ref(),
            "inspect",
            self.runtime.list_containers(&filters),
        )
        .await?
        .context(InspectSnafu {
            name: name.to_string(),
        })
    }
}

/// Exact, case-sensitive match against each container's first name only.
/// The leading `/` is optional so either runtime's listing form matches.
fn first_name_match(containers: &[ContainerSummary], name: &ContainerName) -> Option<ContainerId> {
    containers
        .iter()
        .find(|c| {
            c.names
                .first()
                .is_some_and(|first| first.trim_start_matches('/') == name.as_str())
        })
        .map(|c| c.id.clone())
}
