// ABOUTME: Bootstraps the log collector container other containers ship logs to.
// ABOUTME: Always replaces an existing instance so at most one collector runs.

use super::error::ProvisionError;
use super::lifecycle::{ContainerLifecycleManager, StartedContainer};
use super::spec::{ContainerRole, ContainerSpec, SpecError};
use crate::runtime::{ContainerOps, ImageOps};
use crate::types::{BindMount, ContainerName, ImageRef, RestartPolicy};
use std::net::Ipv4Addr;

pub const COLLECTOR_IMAGE: &str = "fluent/fluent-bit:2.1.8";
pub const COLLECTOR_USER: &str = "0:0";

pub struct LogSidecarBootstrapper<R> {
    manager: ContainerLifecycleManager<R>,
    config_path: String,
    collector_ip: Ipv4Addr,
}

impl<R: ImageOps + ContainerOps> LogSidecarBootstrapper<R> {
    /// `config_path` is a host file mounted into the collector at the same
    /// path and passed as its `-c` argument.
    pub fn new(
        manager: ContainerLifecycleManager<R>,
        config_path: impl Into<String>,
        collector_ip: Ipv4Addr,
    ) -> Self {
        Self {
            manager,
            config_path: config_path.into(),
            collector_ip,
        }
    }

    pub fn collector_spec(&self, name: &ContainerName) -> Result<ContainerSpec, SpecError> {
        let image = ImageRef::parse(COLLECTOR_IMAGE)?;
        Ok(ContainerSpec::new(name.clone(), image, self.collector_ip)
            .with_user(COLLECTOR_USER)
            .with_restart_policy(RestartPolicy::Always)
            .with_volumes(vec![BindMount::same_path(self.config_path.as_str())])
            .with_command(["-c", self.config_path.as_str()])
            .with_role(ContainerRole::LogCollector))
    }

    /// Pull the collector image, force-remove any existing `name`, then
    /// create and start a fresh collector.
    pub async fn ensure_log_collector(
        &self,
        name: &ContainerName,
    ) -> Result<StartedContainer, ProvisionError> {
        let spec = self.collector_spec(name)?;
        tracing::info!("Bootstrapping log collector {} at {}", name, self.collector_ip);
        self.manager.replace(&spec).await
    }
}
