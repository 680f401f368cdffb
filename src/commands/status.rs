// ABOUTME: Status command implementation.
// ABOUTME: Reports absent, stopped or running for named or configured containers.

use super::runtime_connection::connect_to_runtime;
use berth::config::Config;
use berth::error::Result;
use berth::output::Output;
use berth::provision::{ContainerInspector, ContainerState, SpecError};
use berth::types::ContainerName;
use tokio_util::sync::CancellationToken;

pub async fn status(
    config: Config,
    names: Vec<String>,
    output: Output,
    cancel: CancellationToken,
) -> Result<()> {
    let names = if names.is_empty() {
        let mut all: Vec<String> = config.containers.iter().map(|c| c.name.clone()).collect();
        if config.logging.enabled {
            all.insert(0, config.logging.hostname.clone());
        }
        all
    } else {
        names
    };
    let names = names
        .iter()
        .map(|n| ContainerName::new(n).map_err(SpecError::from))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let runtime = connect_to_runtime(&config, &output).await?;
    let inspector = ContainerInspector::new(runtime).with_cancellation(cancel);

    for name in &names {
        let state = inspector.find(name).await?;
        let label = match &state {
            ContainerState::Absent => "absent",
            ContainerState::Stopped(_) => "stopped",
            ContainerState::Running(_) => "running",
        };
        output.container_state(name.as_str(), label, state.id().map(|id| id.short()));
    }
    Ok(())
}
