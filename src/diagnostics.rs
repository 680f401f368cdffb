// ABOUTME: Accumulator for non-fatal warnings raised while provisioning.
// ABOUTME: Runtime warnings are collected so the CLI can summarize them at the end.

/// Collects warnings that should not fail a run but must be shown.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, also logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The runtime attached a warning to a network create.
    pub fn network_create(network: &str, message: impl AsRef<str>) -> Self {
        Self {
            kind: WarningKind::NetworkCreate,
            message: format!("network {network}: {}", message.as_ref()),
        }
    }

    /// An existing network was reused despite differing from the configuration.
    pub fn network_reused(network: &str, message: impl AsRef<str>) -> Self {
        Self {
            kind: WarningKind::NetworkReused,
            message: format!("network {network} (existing): {}", message.as_ref()),
        }
    }

    /// The runtime attached a warning to a container create.
    pub fn container_create(container: &str, message: impl AsRef<str>) -> Self {
        Self {
            kind: WarningKind::ContainerCreate,
            message: format!("container {container}: {}", message.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    NetworkCreate,
    NetworkReused,
    ContainerCreate,
}
