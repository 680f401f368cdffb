// ABOUTME: Builds the full runtime request for a container and creates then starts it.
// ABOUTME: Wires ports, bind mounts, restart policy, the network endpoint and log shipping.

use super::cancellable;
use super::error::{CreateSnafu, ProvisionError, StartSnafu};
use super::image::{ImagePuller, PullPolicy};
use super::inspect::ContainerInspector;
use super::spec::{APP_WORKDIR, ContainerRole, ContainerSpec};
use crate::runtime::{ContainerConfig, ContainerOps, EndpointConfig, ImageOps, LogDriver};
use crate::types::{ContainerId, ContainerName};
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const LOG_DRIVER: &str = "fluentd";
pub const LOG_TAG: &str = "system-agent-log";
pub const FLUENTD_PORT: u16 = 24224;

/// A container that was created and started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedContainer {
    pub id: ContainerId,
    /// Warnings the runtime returned from create.
    pub warnings: Vec<String>,
}

/// Creates containers on the managed network.
///
/// Holds no container state between calls. Concurrent calls for the same
/// name are not serialized here; the runtime's name uniqueness decides.
pub struct ContainerLifecycleManager<R> {
    runtime: Arc<R>,
    network_id: String,
    collector_ip: Option<Ipv4Addr>,
    pull_policy: PullPolicy,
    cancel: Option<CancellationToken>,
}

impl<R> Clone for ContainerLifecycleManager<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            network_id: self.network_id.clone(),
            collector_ip: self.collector_ip,
            pull_policy: self.pull_policy,
            cancel: self.cancel.clone(),
        }
    }
}

impl<R: ImageOps + ContainerOps> ContainerLifecycleManager<R> {
    /// `network_id` is the managed network's name or id; containers use it
    /// as their network mode and endpoint key.
    pub fn new(runtime: Arc<R>, network_id: impl Into<String>) -> Self {
        Self {
            runtime,
            network_id: network_id.into(),
            collector_ip: None,
            pull_policy: PullPolicy::default(),
            cancel: None,
        }
    }

    /// Ship workload logs to the collector at `ip`. `None` keeps every
    /// container on the runtime's default log driver.
    pub fn with_log_collector(mut self, ip: Option<Ipv4Addr>) -> Self {
        self.collector_ip = ip;
        self
    }

    pub fn with_pull_policy(mut self, policy: PullPolicy) -> Self {
        self.pull_policy = policy;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    pub fn collector_ip(&self) -> Option<Ipv4Addr> {
        self.collector_ip
    }

    pub fn inspector(&self) -> ContainerInspector<R> {
        let inspector = ContainerInspector::new(Arc::clone(&self.runtime));
        match self.cancel {
            Some(ref token) => inspector.with_cancellation(token.clone()),
            None => inspector,
        }
    }

    fn puller(&self) -> ImagePuller<R> {
        let puller = ImagePuller::new(Arc::clone(&self.runtime));
        match self.cancel {
            Some(ref token) => puller.with_cancellation(token.clone()),
            None => puller,
        }
    }

    /// The log driver for `spec`: fluentd to the collector when log
    /// shipping is on, never for the collector itself.
    pub fn log_driver_for(&self, spec: &ContainerSpec) -> Option<LogDriver> {
        if spec.role == ContainerRole::LogCollector {
            return None;
        }
        let ip = self.collector_ip?;
        Some(LogDriver {
            driver: LOG_DRIVER.to_string(),
            options: BTreeMap::from([
                (
                    "fluentd-address".to_string(),
                    format!("tcp://{ip}:{FLUENTD_PORT}"),
                ),
                ("tag".to_string(), LOG_TAG.to_string()),
            ]),
        })
    }

    /// Assemble the runtime request for `spec` without touching the runtime.
    pub fn build_config(&self, spec: &ContainerSpec) -> ContainerConfig {
        ContainerConfig {
            name: spec.name.clone(),
            image: spec.image.clone(),
            user: spec.user.clone(),
            hostname: spec.name.to_string(),
            working_dir: APP_WORKDIR.to_string(),
            env: spec.env.clone(),
            command: spec.command.clone(),
            tty: false,
            attach_stdin: true,
            attach_stdout: true,
            ports: spec.ports.clone(),
            mounts: spec.volumes.clone(),
            restart_policy: spec.restart_policy,
            log_driver: self.log_driver_for(spec),
            network_mode: Some(self.network_id.clone()),
            endpoint: Some(EndpointConfig {
                network: self.network_id.clone(),
                aliases: vec![spec.name.to_string()],
                ipv4_address: Some(spec.ip_address),
            }),
        }
    }

    /// Pull, create, then start. A create failure means nothing was made;
    /// a start failure leaves the container in the "created" state and
    /// returns its id in [`ProvisionError::Start`].
    pub async fn create_and_start(
        &self,
        spec: &ContainerSpec,
    ) -> Result<StartedContainer, ProvisionError> {
        self.puller()
            .pull_with_policy(&spec.image, self.pull_policy)
            .await?;
        self.create_pulled(spec).await
    }

    /// Force-remove any existing container named like `spec`, then
    /// create and start a fresh one.
    pub async fn replace(&self, spec: &ContainerSpec) -> Result<StartedContainer, ProvisionError> {
        self.puller()
            .pull_with_policy(&spec.image, self.pull_policy)
            .await?;
        self.remove_existing(&spec.name).await?;
        self.create_pulled(spec).await
    }

    /// Force-remove `name` if it exists. Removal errors are logged and
    /// ignored; the following create reports a name conflict if it matters.
    pub async fn remove_existing(
        &self,
        name: &ContainerName,
    ) -> Result<Option<ContainerId>, ProvisionError> {
        let state = self.inspector().find(name).await?;
        let Some(id) = state.id().cloned() else {
            return Ok(None);
        };

        let removed = cancellable(
            self.cancel.as_ref(),
            "remove",
            self.runtime.remove_container(&id, true),
        )
        .await?;
        match removed {
            Ok(()) => tracing::info!(
                "Removed {} container {} ({})",
                if state.is_running() { "running" } else { "stopped" },
                name,
                id.short()
            ),
            Err(e) => {
                tracing::warn!("Failed to remove container {} ({}): {}", name, id.short(), e)
            }
        }
        Ok(Some(id))
    }

    async fn create_pulled(&self, spec: &ContainerSpec) -> Result<StartedContainer, ProvisionError> {
        let config = self.build_config(spec);
        let name = spec.name.to_string();

        let created = cancellable(
            self.cancel.as_ref(),
            "create",
            self.runtime.create_container(&config),
        )
        .await?
        .context(CreateSnafu { name: name.clone() })?;
        tracing::info!("Created container {} ({})", name, created.id.short());
        for warning in &created.warnings {
            tracing::warn!("Runtime warning creating {}: {}", name, warning);
        }

        cancellable(
            self.cancel.as_ref(),
            "start",
            self.runtime.start_container(&created.id),
        )
        .await?
        .context(StartSnafu {
            name: name.clone(),
            id: created.id.clone(),
        })?;
        tracing::info!("Started container {} at {}", name, spec.ip_address);

        Ok(StartedContainer {
            id: created.id,
            warnings: created.warnings,
        })
    }
}
