// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup and access to a local container runtime.

use berth::runtime::{BollardRuntime, RuntimeConfig, RuntimeInfo, detect_local};
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("berth=debug".parse().unwrap())
            .add_directive("bollard=info".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A connected local runtime, or `None` when no daemon answers.
#[allow(dead_code)]
pub async fn local_runtime() -> Option<BollardRuntime> {
    let endpoint = detect_local().ok()?;
    let runtime = BollardRuntime::connect(&endpoint, RuntimeConfig::default().timeout).ok()?;
    runtime.ping().await.ok()?;
    Some(runtime)
}
