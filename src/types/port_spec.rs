// ABOUTME: Host-to-container port publication parsed from "host:container[/proto]".
// ABOUTME: Rejects anything that does not split into exactly two non-empty ports.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortSpecError {
    #[error("{input:?} must have the form host:container, found {found} component(s)")]
    ComponentCount { input: String, found: usize },

    #[error("{0:?} has an empty port component")]
    EmptyComponent(String),

    #[error("{input:?}: {port:?} is not a valid port number")]
    InvalidPort { input: String, port: String },

    #[error("{input:?}: unknown protocol {protocol:?}")]
    UnknownProtocol { input: String, protocol: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => f.write_str("tcp"),
            Protocol::Udp => f.write_str("udp"),
        }
    }
}

/// A published port: traffic to `host_port` on the host reaches
/// `container_port` inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortSpec {
    host_port: u16,
    container_port: u16,
    protocol: Protocol,
}

impl PortSpec {
    pub fn new(host_port: u16, container_port: u16, protocol: Protocol) -> Self {
        Self {
            host_port,
            container_port,
            protocol,
        }
    }

    pub fn parse(input: &str) -> Result<Self, PortSpecError> {
        let (ports, protocol) = match input.split_once('/') {
            Some((ports, "tcp")) => (ports, Protocol::Tcp),
            Some((ports, "udp")) => (ports, Protocol::Udp),
            Some((_, other)) => {
                return Err(PortSpecError::UnknownProtocol {
                    input: input.to_string(),
                    protocol: other.to_string(),
                });
            }
            None => (input, Protocol::Tcp),
        };

        let parts: Vec<&str> = ports.split(':').collect();
        let [host, container] = parts.as_slice() else {
            return Err(PortSpecError::ComponentCount {
                input: input.to_string(),
                found: parts.len(),
            });
        };
        if host.is_empty() || container.is_empty() {
            return Err(PortSpecError::EmptyComponent(input.to_string()));
        }

        let port = |raw: &str| {
            raw.parse::<u16>()
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| PortSpecError::InvalidPort {
                    input: input.to_string(),
                    port: raw.to_string(),
                })
        };

        Ok(Self {
            host_port: port(host)?,
            container_port: port(container)?,
            protocol,
        })
    }

    pub fn host_port(&self) -> u16 {
        self.host_port
    }

    pub fn container_port(&self) -> u16 {
        self.container_port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    /// Key used by the runtime for exposed ports and bindings, e.g. `80/tcp`.
    pub fn exposed_key(&self) -> String {
        format!("{}/{}", self.container_port, self.protocol)
    }
}

impl FromStr for PortSpec {
    type Err = PortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host_port, self.container_port)?;
        if self.protocol != Protocol::Tcp {
            write!(f, "/{}", self.protocol)?;
        }
        Ok(())
    }
}
