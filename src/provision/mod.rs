// ABOUTME: Container lifecycle and network provisioning on top of the runtime traits.
// ABOUTME: Network, image, inspection, create/start and log collector bootstrap.

mod error;
mod image;
mod inspect;
mod lifecycle;
mod network;
mod sidecar;
mod spec;

pub use error::{ErrorKind, ProvisionError};
pub use image::{ImagePuller, PullPolicy};
pub use inspect::{ContainerInspector, ContainerState};
pub use lifecycle::{
    ContainerLifecycleManager, FLUENTD_PORT, LOG_DRIVER, LOG_TAG, StartedContainer,
};
pub use network::{BRIDGE_DRIVER, NetworkHandle, NetworkProvisioner};
pub use sidecar::{COLLECTOR_IMAGE, COLLECTOR_USER, LogSidecarBootstrapper};
pub use spec::{
    APP_WORKDIR, ContainerRole, ContainerSpec, SpecError, parse_ip, parse_ports, parse_volumes,
};

use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Race one runtime round-trip against the caller's cancellation token.
/// Without a token the future runs to completion.
pub(crate) async fn cancellable<F: Future>(
    cancel: Option<&CancellationToken>,
    step: &'static str,
    fut: F,
) -> Result<F::Output, ProvisionError> {
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => error::CancelledSnafu { step }.fail(),
            output = fut => Ok(output),
        },
        None => Ok(fut.await),
    }
}
