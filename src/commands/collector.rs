// ABOUTME: Collector command implementation.
// ABOUTME: Replaces the log collector container with a freshly created one.

use super::lifecycle_manager;
use super::runtime_connection::connect_to_runtime;
use berth::config::Config;
use berth::diagnostics::{Diagnostics, Warning};
use berth::error::{Error, Result};
use berth::output::Output;
use berth::provision::{LogSidecarBootstrapper, ProvisionError, StartedContainer};
use berth::runtime::{ContainerOps, ImageOps};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub async fn collector(config: Config, output: Output, cancel: CancellationToken) -> Result<()> {
    if !config.logging.enabled {
        return Err(Error::LoggingDisabled);
    }

    let runtime = connect_to_runtime(&config, &output).await?;
    let mut diag = Diagnostics::default();

    let started = bootstrap_collector(runtime, &config, &cancel, &output, &mut diag).await?;

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }
    output.success(&format!(
        "Log collector {} running: {}",
        config.logging.hostname, started.id
    ));
    Ok(())
}

/// Bootstrap the collector named in `config.logging`.
pub(super) async fn bootstrap_collector<R: ImageOps + ContainerOps>(
    runtime: Arc<R>,
    config: &Config,
    cancel: &CancellationToken,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<StartedContainer> {
    let logging = &config.logging;
    let name = logging.collector_name().map_err(ProvisionError::from)?;
    output.progress(&format!(
        "Bootstrapping log collector {} at {}...",
        name, logging.ip
    ));

    let bootstrapper = LogSidecarBootstrapper::new(
        lifecycle_manager(runtime, config, cancel),
        logging.config_path.as_str(),
        logging.ip,
    );
    let started = bootstrapper.ensure_log_collector(&name).await?;

    for warning in &started.warnings {
        diag.warn(Warning::container_create(name.as_str(), warning));
    }
    Ok(started)
}
