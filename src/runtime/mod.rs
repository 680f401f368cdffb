// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Capability traits, the bollard adapter, and endpoint resolution.

mod bollard;
mod detection;
mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod traits;
mod types;

pub use self::bollard::BollardRuntime;
pub use detection::{DOCKER_HOST_ENV, DetectionError, detect_local, parse_address, resolve_endpoint};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::*;
pub use types::{RuntimeAddress, RuntimeConfig, RuntimeEndpoint, RuntimeType};

use snafu::ResultExt;

/// Resolve the endpoint from `config`, connect, and confirm the daemon
/// answers a ping. Fails fast: nothing is provisioned without a live runtime.
pub async fn connect(config: &RuntimeConfig) -> Result<BollardRuntime, RuntimeError> {
    let endpoint = resolve_endpoint(config)?;
    let address = endpoint.address.to_string();
    tracing::debug!(%endpoint, "connecting to container runtime");

    let runtime = BollardRuntime::connect(&endpoint, config.timeout).context(
        error::ConnectionSnafu {
            address: address.clone(),
        },
    )?;
    runtime
        .ping()
        .await
        .context(error::ConnectionSnafu { address })?;

    Ok(runtime)
}
