// ABOUTME: In-memory runtime that records every call, for unit tests.
// ABOUTME: Keeps containers and networks in memory and can inject failures per operation.

use super::traits::sealed::Sealed;
use super::traits::{
    ContainerConfig, ContainerError, ContainerFilters, ContainerOps, ContainerSummary,
    CreatedContainer, CreatedNetwork, ImageError, ImageOps, NetworkConfig, NetworkDetails,
    NetworkError, NetworkOps, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
use super::types::RuntimeType;
use crate::types::{ContainerId, ImageRef, NetworkId};
use async_trait::async_trait;
use parking_lot::Mutex;

/// One call made against the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Pull(String),
    InspectNetwork(String),
    CreateNetwork(NetworkConfig),
    CreateContainer(ContainerConfig),
    Start(ContainerId),
    Remove { id: ContainerId, force: bool },
    List { all: bool },
}

#[derive(Debug, Clone)]
pub struct FakeContainer {
    pub id: ContainerId,
    pub name: String,
    pub running: bool,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    containers: Vec<FakeContainer>,
    networks: Vec<NetworkDetails>,
    next_id: u64,
}

/// Failures to inject. Each applies to every call of that operation.
#[derive(Debug, Default, Clone)]
pub struct Failures {
    pub pull: bool,
    pub hang_pull: bool,
    pub create: bool,
    pub start: bool,
    pub remove: bool,
    pub list: bool,
    pub network_create: bool,
    /// Every call fails as if the daemon went away.
    pub unavailable: bool,
    pub network_warning: Option<String>,
}

#[derive(Default)]
pub struct FakeRuntime {
    state: Mutex<State>,
    pub failures: Failures,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failures(failures: Failures) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    /// Seed an existing container.
    pub fn with_container(self, name: &str, running: bool) -> Self {
        {
            let mut state = self.state.lock();
            let id = next_id(&mut state);
            state.containers.push(FakeContainer {
                id,
                name: name.to_string(),
                running,
            });
        }
        self
    }

    /// Seed an existing network, addressable by `id` or `name`.
    pub fn with_network(self, id: &str, name: &str) -> Self {
        self.state.lock().networks.push(NetworkDetails {
            id: NetworkId::new(id),
            name: name.to_string(),
            driver: Some("bridge".to_string()),
            subnets: vec![],
        });
        self
    }

    /// Seed an existing network someone else created with other settings.
    pub fn with_foreign_network(self, name: &str, driver: &str, subnet: &str) -> Self {
        {
            let mut state = self.state.lock();
            let id = NetworkId::new(format!("ext{:061x}", state.networks.len() + 1));
            state.networks.push(NetworkDetails {
                id,
                name: name.to_string(),
                driver: Some(driver.to_string()),
                subnets: vec![subnet.to_string()],
            });
        }
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn containers(&self) -> Vec<FakeContainer> {
        self.state.lock().containers.clone()
    }

    pub fn container(&self, name: &str) -> Option<FakeContainer> {
        self.containers().into_iter().find(|c| c.name == name)
    }

    pub fn created_configs(&self) -> Vec<ContainerConfig> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateContainer(config) => Some(config),
                _ => None,
            })
            .collect()
    }

    pub fn network_creates(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::CreateNetwork(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.state.lock().calls.push(call);
    }
}

fn next_id(state: &mut State) -> ContainerId {
    state.next_id += 1;
    ContainerId::new(format!("{:064x}", state.next_id))
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl RuntimeInfo for FakeRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        if self.failures.unavailable {
            return Err(RuntimeInfoError::Unreachable("fake".to_string()));
        }
        Ok(RuntimeMetadata {
            runtime_type: RuntimeType::Docker,
            version: "0.0.0".to_string(),
            os: "linux".to_string(),
            arch: "x86_64".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        if self.failures.unavailable {
            return Err(RuntimeInfoError::Unreachable("fake".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        self.record(Call::Pull(reference.to_string()));
        if self.failures.hang_pull {
            std::future::pending::<()>().await;
        }
        if self.failures.unavailable {
            return Err(ImageError::Unavailable("connection refused".to_string()));
        }
        if self.failures.pull {
            return Err(ImageError::PullFailed(format!("{reference}: registry said no")));
        }
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<CreatedContainer, ContainerError> {
        self.record(Call::CreateContainer(config.clone()));
        if self.failures.unavailable {
            return Err(ContainerError::Unavailable("connection refused".to_string()));
        }
        if self.failures.create {
            return Err(ContainerError::Runtime("create rejected".to_string()));
        }

        let mut state = self.state.lock();
        let name = config.name.as_str();
        if state.containers.iter().any(|c| c.name == name) {
            return Err(ContainerError::AlreadyExists(name.to_string()));
        }
        let id = next_id(&mut state);
        state.containers.push(FakeContainer {
            id: id.clone(),
            name: name.to_string(),
            running: false,
        });
        Ok(CreatedContainer {
            id,
            warnings: vec![],
        })
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Start(id.clone()));
        if self.failures.unavailable {
            return Err(ContainerError::Unavailable("connection refused".to_string()));
        }
        if self.failures.start {
            return Err(ContainerError::Runtime("port is already allocated".to_string()));
        }

        let mut state = self.state.lock();
        let container = state
            .containers
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        container.running = true;
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        self.record(Call::Remove {
            id: id.clone(),
            force,
        });
        if self.failures.unavailable {
            return Err(ContainerError::Unavailable("connection refused".to_string()));
        }
        if self.failures.remove {
            return Err(ContainerError::Runtime("removal in progress".to_string()));
        }

        let mut state = self.state.lock();
        let position = state
            .containers
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| ContainerError::NotFound(id.to_string()))?;
        if state.containers[position].running && !force {
            return Err(ContainerError::Runtime(format!("{id} is running")));
        }
        state.containers.remove(position);
        Ok(())
    }

    /// The name filter is ignored, like a runtime whose filter is only a
    /// substring match; callers must match exactly themselves.
    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError> {
        self.record(Call::List { all: filters.all });
        if self.failures.unavailable {
            return Err(ContainerError::Unavailable("connection refused".to_string()));
        }
        if self.failures.list {
            return Err(ContainerError::Runtime("list failed".to_string()));
        }

        Ok(self
            .state
            .lock()
            .containers
            .iter()
            .filter(|c| filters.all || c.running)
            .map(|c| ContainerSummary {
                id: c.id.clone(),
                names: vec![format!("/{}", c.name)],
            })
            .collect())
    }
}

#[async_trait]
impl NetworkOps for FakeRuntime {
    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, NetworkError> {
        self.record(Call::InspectNetwork(id.to_string()));
        if self.failures.unavailable {
            return Err(NetworkError::Unavailable("connection refused".to_string()));
        }

        self.state
            .lock()
            .networks
            .iter()
            .find(|n| n.id.as_str() == id || n.name == id)
            .cloned()
            .ok_or_else(|| NetworkError::NotFound(id.to_string()))
    }

    async fn create_network(&self, config: &NetworkConfig) -> Result<CreatedNetwork, NetworkError> {
        self.record(Call::CreateNetwork(config.clone()));
        if self.failures.unavailable {
            return Err(NetworkError::Unavailable("connection refused".to_string()));
        }
        if self.failures.network_create {
            return Err(NetworkError::Runtime("pool overlaps with other one".to_string()));
        }

        let mut state = self.state.lock();
        if state.networks.iter().any(|n| n.name == config.name) {
            return Err(NetworkError::AlreadyExists(config.name.clone()));
        }
        let id = NetworkId::new(format!("net{:061x}", state.networks.len() + 1));
        state.networks.push(NetworkDetails {
            id: id.clone(),
            name: config.name.clone(),
            driver: Some(config.driver.clone()),
            subnets: vec![config.subnet.to_string()],
        });
        Ok(CreatedNetwork {
            id,
            warning: self.failures.network_warning.clone(),
        })
    }
}
