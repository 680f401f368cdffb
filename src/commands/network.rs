// ABOUTME: Network command implementation.
// ABOUTME: Ensures the managed bridge network exists and reports its id.

use super::runtime_connection::connect_to_runtime;
use berth::config::Config;
use berth::diagnostics::{Diagnostics, Warning};
use berth::error::Result;
use berth::output::Output;
use berth::provision::{NetworkHandle, NetworkProvisioner};
use berth::runtime::NetworkOps;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn network(config: Config, output: Output, cancel: CancellationToken) -> Result<()> {
    let runtime = connect_to_runtime(&config, &output).await?;
    let mut diag = Diagnostics::default();

    let handle = ensure_network(runtime, &config, &cancel, &output, &mut diag).await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!("Network {} ready: {}", config.network.id, handle.id));
    Ok(())
}

/// Ensure the configured network, recording any runtime warning.
pub(super) async fn ensure_network<R: NetworkOps>(
    runtime: Arc<R>,
    config: &Config,
    cancel: &CancellationToken,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<NetworkHandle> {
    let settings = &config.network;
    output.progress(&format!(
        "Ensuring network {} ({})...",
        settings.id, settings.subnet
    ));

    let handle = NetworkProvisioner::new(runtime, settings.gateway)
        .with_cancellation(cancel.clone())
        .ensure_network(&settings.id, &settings.subnet)
        .await?;

    if let Some(ref warning) = handle.warning {
        let warning = if handle.created {
            Warning::network_create(&settings.id, warning)
        } else {
            Warning::network_reused(&settings.id, warning)
        };
        diag.warn(warning);
    }
    output.progress(&format!(
        "{} network {} ({})",
        if handle.created { "Created" } else { "Reusing" },
        settings.id,
        handle.id.short()
    ));

    Ok(handle)
}
