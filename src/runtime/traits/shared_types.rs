// ABOUTME: Request and response types shared by the runtime capability traits.
// ABOUTME: ContainerConfig, NetworkConfig, created-resource handles, listings.

use crate::types::{
    BindMount, ContainerId, ContainerName, ImageRef, NetworkId, PortSpec, RestartPolicy, Subnet,
};
use crate::runtime::types::RuntimeType;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::net::Ipv4Addr;

/// Everything the runtime needs to create one container.
///
/// Mirrors the runtime's split into container config, host config and
/// networking config, flattened into one value.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerConfig {
    pub name: ContainerName,
    pub image: ImageRef,
    /// `uid:gid` to run as; the image default when `None`.
    pub user: Option<String>,
    pub hostname: String,
    pub working_dir: String,
    /// `KEY=VALUE` entries, passed through in order.
    pub env: Vec<String>,
    /// Arguments replacing the image CMD; the image default when empty.
    pub command: Vec<String>,
    pub tty: bool,
    pub attach_stdin: bool,
    pub attach_stdout: bool,
    pub ports: Vec<PortSpec>,
    pub mounts: Vec<BindMount>,
    pub restart_policy: RestartPolicy,
    /// Log driver override; the runtime's default driver when `None`.
    pub log_driver: Option<LogDriver>,
    pub network_mode: Option<String>,
    pub endpoint: Option<EndpointConfig>,
}

/// A log driver and its options, e.g. `fluentd` with an address and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDriver {
    pub driver: String,
    pub options: BTreeMap<String, String>,
}

/// Attachment of a container to a user-defined network at create time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Network name or ID.
    pub network: String,
    pub aliases: Vec<String>,
    pub ipv4_address: Option<Ipv4Addr>,
}

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedContainer {
    pub id: ContainerId,
    pub warnings: Vec<String>,
}

/// Configuration for creating a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub name: String,
    pub driver: String,
    pub subnet: Subnet,
    pub gateway: Ipv4Addr,
    /// Driver options; left empty for the managed bridge.
    pub options: HashMap<String, String>,
}

/// Result of a successful network create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNetwork {
    pub id: NetworkId,
    pub warning: Option<String>,
}

/// What inspecting an existing network reports back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDetails {
    pub id: NetworkId,
    pub name: String,
    pub driver: Option<String>,
    pub subnets: Vec<String>,
}

/// What answered on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeMetadata {
    pub runtime_type: RuntimeType,
    /// Server version; empty when the daemon does not report one.
    pub version: String,
    pub os: String,
    pub arch: String,
}

impl fmt::Display for RuntimeMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.runtime_type)?;
        if !self.version.is_empty() {
            write!(f, " {}", self.version)?;
        }
        if !self.os.is_empty() {
            write!(f, " ({}/{})", self.os, self.arch)?;
        }
        Ok(())
    }
}
