// ABOUTME: Resolves which runtime endpoint to connect to.
// ABOUTME: Explicit config first, then DOCKER_HOST, then well-known local sockets.

use super::types::{RuntimeAddress, RuntimeConfig, RuntimeEndpoint, RuntimeType};
use std::path::Path;

/// Error during runtime endpoint resolution.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked DOCKER_HOST, Docker and Podman sockets)")]
    NoRuntimeFound,

    #[error("unsupported runtime address {0:?}, expected a socket path, unix://, tcp:// or http:// URL")]
    InvalidAddress(String),
}

pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

const DOCKER_SOCKET: &str = "/var/run/docker.sock";
const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";

/// Pick the runtime endpoint for this host.
///
/// Resolution order:
/// 1. `socket` from the configuration
/// 2. the `DOCKER_HOST` environment variable
/// 3. Docker socket (`/var/run/docker.sock`)
/// 4. Rootful Podman socket (`/run/podman/podman.sock`)
/// 5. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
pub fn resolve_endpoint(config: &RuntimeConfig) -> Result<RuntimeEndpoint, DetectionError> {
    if let Some(socket) = config.socket.as_deref() {
        return parse_address(socket);
    }

    if let Ok(host) = std::env::var(DOCKER_HOST_ENV)
        && !host.trim().is_empty()
    {
        return parse_address(host.trim());
    }

    detect_local()
}

/// Interpret a socket path or URL.
pub fn parse_address(raw: &str) -> Result<RuntimeEndpoint, DetectionError> {
    let address = if let Some(path) = raw.strip_prefix("unix://") {
        RuntimeAddress::Unix(path.to_string())
    } else if raw.starts_with("tcp://") || raw.starts_with("http://") {
        RuntimeAddress::Tcp(raw.to_string())
    } else if raw.starts_with('/') {
        RuntimeAddress::Unix(raw.to_string())
    } else {
        return Err(DetectionError::InvalidAddress(raw.to_string()));
    };

    let runtime_type = if raw.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    };

    Ok(RuntimeEndpoint {
        runtime_type,
        address,
    })
}

/// Probe well-known local sockets.
pub fn detect_local() -> Result<RuntimeEndpoint, DetectionError> {
    let mut candidates = vec![
        (RuntimeType::Docker, DOCKER_SOCKET.to_string()),
        (RuntimeType::Podman, ROOTFUL_PODMAN.to_string()),
    ];
    if let Some(uid) = get_uid() {
        candidates.push((
            RuntimeType::Podman,
            format!("/run/user/{uid}/podman/podman.sock"),
        ));
    }

    candidates
        .into_iter()
        .find(|(_, path)| Path::new(path).exists())
        .map(|(runtime_type, path)| RuntimeEndpoint {
            runtime_type,
            address: RuntimeAddress::Unix(path),
        })
        .ok_or(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(str::to_string)
            })
    })
}
