// ABOUTME: Ensures the single managed bridge network exists.
// ABOUTME: Reuses a network found by inspection, otherwise creates it with IPAM settings.

use super::cancellable;
use super::error::{NetworkProvisionSnafu, ProvisionError};
use crate::runtime::{NetworkConfig, NetworkDetails, NetworkOps};
use crate::types::{NetworkId, Subnet};
use snafu::ResultExt;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const BRIDGE_DRIVER: &str = "bridge";

/// The managed network as the runtime knows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHandle {
    pub id: NetworkId,
    /// Warning the runtime attached to a fresh create, or how a reused
    /// network differs from the configured one.
    pub warning: Option<String>,
    /// Whether this call created the network.
    pub created: bool,
}

pub struct NetworkProvisioner<R> {
    runtime: Arc<R>,
    gateway: Ipv4Addr,
    cancel: Option<CancellationToken>,
}

impl<R: NetworkOps> NetworkProvisioner<R> {
    pub fn new(runtime: Arc<R>, gateway: Ipv4Addr) -> Self {
        Self {
            runtime,
            gateway,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Return the network named `id`, creating it when inspection fails.
    ///
    /// An existing network is reused as-is even if its driver or subnet
    /// differ; the difference is reported in the handle's warning. Any
    /// inspection error leads to a create attempt, so a
    /// transient runtime error may surface as a failed create.
    pub async fn ensure_network(
        &self,
        id: &str,
        subnet: &Subnet,
    ) -> Result<NetworkHandle, ProvisionError> {
        let inspected = cancellable(
            self.cancel.as_ref(),
            "network inspect",
            self.runtime.inspect_network(id),
        )
        .await?;

        match inspected {
            Ok(existing) => {
                tracing::debug!("Reusing network {} ({})", id, existing.id.short());
                let warning = drift(&existing, subnet);
                if let Some(ref warning) = warning {
                    tracing::warn!("Network {} reused as-is: {}", id, warning);
                }
                Ok(NetworkHandle {
                    id: existing.id,
                    warning,
                    created: false,
                })
            }
            Err(e) => {
                tracing::debug!("Network {} not inspectable ({}), creating it", id, e);
                self.create(id, subnet).await
            }
        }
    }

    async fn create(&self, id: &str, subnet: &Subnet) -> Result<NetworkHandle, ProvisionError> {
        let config = NetworkConfig {
            name: id.to_string(),
            driver: BRIDGE_DRIVER.to_string(),
            subnet: *subnet,
            gateway: self.gateway,
            options: HashMap::new(),
        };

        let created = cancellable(
            self.cancel.as_ref(),
            "network create",
            self.runtime.create_network(&config),
        )
        .await?
        .context(NetworkProvisionSnafu { network: id })?;

        tracing::info!("Created network {} ({}) on {}", id, created.id.short(), subnet);
        if let Some(ref warning) = created.warning {
            tracing::warn!("Runtime warning creating network {}: {}", id, warning);
        }

        Ok(NetworkHandle {
            id: created.id,
            warning: created.warning,
            created: true,
        })
    }
}

/// How an existing network departs from the configured bridge and subnet.
fn drift(existing: &NetworkDetails, subnet: &Subnet) -> Option<String> {
    let mut problems = Vec::new();
    if let Some(driver) = existing.driver.as_deref().filter(|d| *d != BRIDGE_DRIVER) {
        problems.push(format!("driver is {driver}, not {BRIDGE_DRIVER}"));
    }
    let wanted = subnet.to_string();
    if !existing.subnets.is_empty() && !existing.subnets.contains(&wanted) {
        problems.push(format!(
            "subnets are {}, configured subnet {wanted} is not applied",
            existing.subnets.join(", ")
        ));
    }
    (!problems.is_empty()).then(|| problems.join("; "))
}
