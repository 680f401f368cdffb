// ABOUTME: Command module aggregator for the berth CLI.
// ABOUTME: Re-exports command handlers and builds provisioning components from config.

mod collector;
mod network;
mod runtime_connection;
mod status;
mod up;

pub use collector::collector;
pub use network::network;
pub use status::status;
pub use up::up;

use berth::config::Config;
use berth::provision::ContainerLifecycleManager;
use berth::runtime::{ContainerOps, ImageOps};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Lifecycle manager for the managed network, shipping logs when enabled.
fn lifecycle_manager<R: ImageOps + ContainerOps>(
    runtime: Arc<R>,
    config: &Config,
    cancel: &CancellationToken,
) -> ContainerLifecycleManager<R> {
    ContainerLifecycleManager::new(runtime, config.network.id.as_str())
        .with_log_collector(config.logging.collector_ip())
        .with_pull_policy(config.pull_policy)
        .with_cancellation(cancel.clone())
}
