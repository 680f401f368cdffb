// ABOUTME: Up command implementation.
// ABOUTME: Network, then collector, then every configured container, stopping at the first failure.

use super::collector::bootstrap_collector;
use super::lifecycle_manager;
use super::network::ensure_network;
use super::runtime_connection::connect_to_runtime;
use berth::config::Config;
use berth::diagnostics::{Diagnostics, Warning};
use berth::error::Result;
use berth::output::Output;
use berth::provision::ProvisionError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn up(config: Config, output: Output, cancel: CancellationToken) -> Result<()> {
    // Reject bad entries before touching the runtime.
    let specs = config.container_specs().map_err(ProvisionError::from)?;

    let runtime = connect_to_runtime(&config, &output).await?;
    let mut diag = Diagnostics::default();

    ensure_network(Arc::clone(&runtime), &config, &cancel, &output, &mut diag).await?;

    if config.logging.enabled {
        bootstrap_collector(Arc::clone(&runtime), &config, &cancel, &output, &mut diag).await?;
    } else {
        output.progress("Log collection disabled, containers keep the default log driver");
    }

    let manager = lifecycle_manager(runtime, &config, &cancel);
    for spec in &specs {
        output.progress(&format!(
            "Replacing {} ({}) at {}...",
            spec.name, spec.image, spec.ip_address
        ));
        let started = match manager.replace(spec).await {
            Ok(started) => started,
            Err(e) => {
                if let Some(id) = e.leftover_container() {
                    output.warning(&format!(
                        "container {} ({}) was left in the created state",
                        spec.name,
                        id.short()
                    ));
                }
                return Err(e.into());
            }
        };
        for warning in &started.warnings {
            diag.warn(Warning::container_create(spec.name.as_str(), warning));
        }
        output.progress(&format!("Started {} ({})", spec.name, started.id.short()));
    }

    if diag.has_warnings() {
        output.progress(&format!("{} runtime warning(s)", diag.warnings().len()));
    }
    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!(
        "{} container(s) running on {}",
        specs.len(),
        config.network.id
    ));
    Ok(())
}
