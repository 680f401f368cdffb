// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Resolves the endpoint from configuration and reports progress.

use berth::config::Config;
use berth::error::Result;
use berth::output::Output;
use berth::runtime::{self, BollardRuntime, RuntimeInfo};
use std::sync::Arc;

/// Connect to the runtime named by `config.runtime`, failing fast when the
/// daemon does not answer.
pub async fn connect_to_runtime(config: &Config, output: &Output) -> Result<Arc<BollardRuntime>> {
    output.progress("Connecting to container runtime...");
    let runtime = runtime::connect(&config.runtime).await?;
    match runtime.info().await {
        Ok(meta) => output.progress(&format!("Connected to {meta}")),
        Err(e) => {
            tracing::debug!("runtime info unavailable: {e}");
            output.progress(&format!("Connected to {}", runtime.runtime_type()));
        }
    }
    Ok(Arc::new(runtime))
}
