// ABOUTME: Runtime connection settings and resolved endpoints.
// ABOUTME: Includes RuntimeType, RuntimeAddress, RuntimeEndpoint and RuntimeConfig.

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// The container runtime behind the Docker-compatible API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Where the runtime API listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeAddress {
    /// Path to a Unix socket.
    Unix(String),
    /// `tcp://` or `http://` URL.
    Tcp(String),
}

impl fmt::Display for RuntimeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeAddress::Unix(path) => write!(f, "unix://{path}"),
            RuntimeAddress::Tcp(url) => f.write_str(url),
        }
    }
}

/// A resolved runtime to connect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeEndpoint {
    pub runtime_type: RuntimeType,
    pub address: RuntimeAddress,
}

impl fmt::Display for RuntimeEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.runtime_type, self.address)
    }
}

/// Connection parameters from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Explicit socket path or URL; falls back to `DOCKER_HOST`, then to
    /// well-known local sockets.
    #[serde(default)]
    pub socket: Option<String>,

    /// Per-request timeout applied by the client transport.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            socket: None,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> Duration {
    Duration::from_secs(120)
}
