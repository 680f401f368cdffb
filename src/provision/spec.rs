// ABOUTME: Validated description of a container to provision.
// ABOUTME: ContainerSpec is built from parsed value types; SpecError covers every rejection.

use crate::types::{
    BindMount, BindMountError, ContainerName, ContainerNameError, ImageRef, ImageRefError,
    PortSpec, PortSpecError, RestartPolicy,
};
use std::net::Ipv4Addr;
use thiserror::Error;

/// Working directory every managed container starts in.
pub const APP_WORKDIR: &str = "/app";

/// A container specification was rejected before any runtime call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("invalid container name: {0}")]
    Name(#[from] ContainerNameError),

    #[error("invalid image: {0}")]
    Image(#[from] ImageRefError),

    #[error("invalid port mapping {entry:?}: {source}")]
    Port {
        entry: String,
        source: PortSpecError,
    },

    #[error("invalid volume {entry:?}: {source}")]
    Volume {
        entry: String,
        source: BindMountError,
    },

    #[error("invalid IP address {input:?}: {reason}")]
    IpAddress { input: String, reason: String },

    #[error("invalid environment entry {0:?}: expected KEY=VALUE")]
    Env(String),

    #[error("invalid restart policy: {0}")]
    RestartPolicy(String),
}

/// What a container is for. The log collector must never ship its own
/// logs through itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContainerRole {
    #[default]
    Workload,
    LogCollector,
}

/// Everything needed to create one container on the managed network.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerSpec {
    pub name: ContainerName,
    pub image: ImageRef,
    /// `uid:gid`; the image's own user when `None`.
    pub user: Option<String>,
    pub restart_policy: RestartPolicy,
    pub ip_address: Ipv4Addr,
    pub ports: Vec<PortSpec>,
    pub volumes: Vec<BindMount>,
    pub env: Vec<String>,
    pub command: Vec<String>,
    pub role: ContainerRole,
}

impl ContainerSpec {
    pub fn new(name: ContainerName, image: ImageRef, ip_address: Ipv4Addr) -> Self {
        Self {
            name,
            image,
            user: None,
            restart_policy: RestartPolicy::default(),
            ip_address,
            ports: Vec::new(),
            volumes: Vec::new(),
            env: Vec::new(),
            command: Vec::new(),
            role: ContainerRole::Workload,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_restart_policy(mut self, policy: RestartPolicy) -> Self {
        self.restart_policy = policy;
        self
    }

    pub fn with_ports(mut self, ports: Vec<PortSpec>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_volumes(mut self, volumes: Vec<BindMount>) -> Self {
        self.volumes = volumes;
        self
    }

    /// Environment entries, checked for a non-empty key.
    pub fn with_env<I, S>(mut self, env: I) -> Result<Self, SpecError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env = env
            .into_iter()
            .map(|entry| {
                let entry = entry.into();
                match entry.split_once('=') {
                    Some((key, _)) if !key.is_empty() => Ok(entry),
                    _ => Err(SpecError::Env(entry)),
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_role(mut self, role: ContainerRole) -> Self {
        self.role = role;
        self
    }
}

/// Parse every `host:container` port entry, failing on the first bad one.
pub fn parse_ports<S: AsRef<str>>(entries: &[S]) -> Result<Vec<PortSpec>, SpecError> {
    entries
        .iter()
        .map(|entry| {
            let entry = entry.as_ref();
            PortSpec::parse(entry).map_err(|source| SpecError::Port {
                entry: entry.to_string(),
                source,
            })
        })
        .collect()
}

/// Parse every `host_path:container_path` volume entry.
pub fn parse_volumes<S: AsRef<str>>(entries: &[S]) -> Result<Vec<BindMount>, SpecError> {
    entries
        .iter()
        .map(|entry| {
            let entry = entry.as_ref();
            BindMount::parse(entry).map_err(|source| SpecError::Volume {
                entry: entry.to_string(),
                source,
            })
        })
        .collect()
}

pub fn parse_ip(input: &str) -> Result<Ipv4Addr, SpecError> {
    input.trim().parse().map_err(|e: std::net::AddrParseError| SpecError::IpAddress {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_keep_their_order() {
        let ports = parse_ports(&["8080:80", "5353:53/udp"]).unwrap();
        assert_eq!(ports[0].host_port(), 8080);
        assert_eq!(ports[1].container_port(), 53);
    }

    #[test]
    fn port_without_colon_is_rejected_with_the_entry() {
        let err = parse_ports(&["8080"]).unwrap_err();
        match err {
            SpecError::Port { entry, .. } => assert_eq!(entry, "8080"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn volume_with_three_components_is_rejected() {
        let err = parse_volumes(&["/a:/b:ro"]).unwrap_err();
        assert!(matches!(err, SpecError::Volume { .. }));
    }

    #[test]
    fn env_requires_a_key() {
        let spec = ContainerSpec::new(
            ContainerName::new("web").unwrap(),
            ImageRef::parse("nginx").unwrap(),
            Ipv4Addr::new(10, 10, 0, 5),
        );
        assert!(spec.clone().with_env(["A=1", "EMPTY="]).is_ok());
        assert_eq!(
            spec.with_env(["=value"]).unwrap_err(),
            SpecError::Env("=value".to_string())
        );
    }

    #[test]
    fn ip_must_be_ipv4() {
        assert_eq!(parse_ip("10.10.0.5").unwrap(), Ipv4Addr::new(10, 10, 0, 5));
        assert!(matches!(
            parse_ip("10.10.0"),
            Err(SpecError::IpAddress { .. })
        ));
    }

    #[test]
    fn new_spec_is_a_workload_with_no_restart() {
        let spec = ContainerSpec::new(
            ContainerName::new("web").unwrap(),
            ImageRef::parse("nginx").unwrap(),
            Ipv4Addr::new(10, 10, 0, 5),
        );
        assert_eq!(spec.role, ContainerRole::Workload);
        assert_eq!(spec.restart_policy, RestartPolicy::No);
    }
}
