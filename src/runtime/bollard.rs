// ABOUTME: Bollard-based container runtime implementation.
// ABOUTME: Talks the Docker-compatible API to Docker or Podman over a socket or TCP.

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::traits::{
    ContainerConfig, ContainerError, ContainerFilters, ContainerOps, ContainerSummary,
    CreatedContainer, CreatedNetwork, ImageError, ImageOps, NetworkConfig, NetworkDetails,
    NetworkError, NetworkOps, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
use crate::runtime::types::{RuntimeAddress, RuntimeEndpoint, RuntimeType};
use crate::types::{ContainerId, ImageRef, NetworkId, RestartPolicy as RestartPolicySetting};
use async_trait::async_trait;
use bollard::Docker;
use bollard::errors::Error as BollardError;
use bollard::models::{
    ContainerCreateBody, EndpointIpamConfig, EndpointSettings, HostConfig, HostConfigLogConfig,
    Ipam, IpamConfig, Mount, MountTypeEnum, NetworkCreateRequest, NetworkingConfig, PortBinding,
    RestartPolicy, RestartPolicyNameEnum,
};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, InspectNetworkOptions, ListContainersOptions,
    RemoveContainerOptions, StartContainerOptions,
};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

/// The daemon never answered: socket gone, connection reset, timeout.
fn is_transport(e: &BollardError) -> bool {
    matches!(
        e,
        BollardError::IOError { .. }
            | BollardError::HyperResponseError { .. }
            | BollardError::RequestTimeoutError
            | BollardError::SocketNotFoundError(_)
    )
}

fn map_info_error(e: BollardError) -> RuntimeInfoError {
    match e {
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } => RuntimeInfoError::Rejected {
            status: status_code,
            message,
        },
        other => RuntimeInfoError::Unreachable(other.to_string()),
    }
}

fn map_image_pull_error(e: BollardError, image_name: &str) -> ImageError {
    match &e {
        _ if is_transport(&e) => ImageError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ImageError::NotFound(format!("{image_name}: {message}")),
        _ => ImageError::PullFailed(format!("{image_name}: {e}")),
    }
}

fn map_container_create_error(e: BollardError) -> ContainerError {
    match &e {
        _ if is_transport(&e) => ContainerError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::ImageNotFound(message.clone()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => ContainerError::AlreadyExists(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_start_error(e: BollardError) -> ContainerError {
    match &e {
        _ if is_transport(&e) => ContainerError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 304 => ContainerError::AlreadyRunning(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_container_not_found_error(e: BollardError) -> ContainerError {
    match &e {
        _ if is_transport(&e) => ContainerError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 404 => ContainerError::NotFound(message.clone()),
        _ => ContainerError::Runtime(e.to_string()),
    }
}

fn map_network_inspect_error(e: BollardError, id: &str) -> NetworkError {
    match &e {
        _ if is_transport(&e) => NetworkError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError { status_code, .. } if *status_code == 404 => {
            NetworkError::NotFound(id.to_string())
        }
        _ => NetworkError::Runtime(e.to_string()),
    }
}

fn map_network_create_error(e: BollardError) -> NetworkError {
    match &e {
        _ if is_transport(&e) => NetworkError::Unavailable(e.to_string()),
        BollardError::DockerResponseServerError {
            status_code,
            message,
        } if *status_code == 409 => NetworkError::AlreadyExists(message.clone()),
        _ => NetworkError::Runtime(e.to_string()),
    }
}

// =============================================================================
// Request Builders
// =============================================================================

/// Translate a [`ContainerConfig`] into the runtime's create body.
pub(crate) fn create_body(config: &ContainerConfig) -> ContainerCreateBody {
    let restart_name = match config.restart_policy {
        RestartPolicySetting::No => RestartPolicyNameEnum::NO,
        RestartPolicySetting::Always => RestartPolicyNameEnum::ALWAYS,
        RestartPolicySetting::OnFailure => RestartPolicyNameEnum::ON_FAILURE,
        RestartPolicySetting::UnlessStopped => RestartPolicyNameEnum::UNLESS_STOPPED,
    };

    let mut host_config = HostConfig {
        restart_policy: Some(RestartPolicy {
            name: Some(restart_name),
            maximum_retry_count: None,
        }),
        network_mode: config.network_mode.clone(),
        ..Default::default()
    };

    let mounts: Vec<Mount> = config
        .mounts
        .iter()
        .map(|m| Mount {
            source: Some(m.source().to_string()),
            target: Some(m.target().to_string()),
            typ: Some(MountTypeEnum::BIND),
            ..Default::default()
        })
        .collect();
    if !mounts.is_empty() {
        host_config.mounts = Some(mounts);
    }

    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    let mut exposed_ports: Vec<String> = Vec::new();
    for port in &config.ports {
        let key = port.exposed_key();
        if !exposed_ports.contains(&key) {
            exposed_ports.push(key.clone());
        }
        port_bindings
            .entry(key)
            .or_insert_with(|| Some(Vec::new()))
            .get_or_insert_with(Vec::new)
            .push(PortBinding {
                host_ip: None,
                host_port: Some(port.host_port().to_string()),
            });
    }
    if !port_bindings.is_empty() {
        host_config.port_bindings = Some(port_bindings);
    }

    if let Some(ref log_driver) = config.log_driver {
        host_config.log_config = Some(HostConfigLogConfig {
            typ: Some(log_driver.driver.clone()),
            config: Some(
                log_driver
                    .options
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
        });
    }

    let networking_config = config.endpoint.as_ref().map(|endpoint| {
        let settings = EndpointSettings {
            aliases: if endpoint.aliases.is_empty() {
                None
            } else {
                Some(endpoint.aliases.clone())
            },
            ipam_config: endpoint.ipv4_address.map(|ip| EndpointIpamConfig {
                ipv4_address: Some(ip.to_string()),
                ..Default::default()
            }),
            network_id: Some(endpoint.network.clone()),
            ..Default::default()
        };
        NetworkingConfig {
            endpoints_config: Some(HashMap::from([(endpoint.network.clone(), settings)])),
        }
    });

    ContainerCreateBody {
        image: Some(config.image.to_string()),
        hostname: Some(config.hostname.clone()),
        user: config.user.clone(),
        working_dir: Some(config.working_dir.clone()),
        env: if config.env.is_empty() {
            None
        } else {
            Some(config.env.clone())
        },
        cmd: if config.command.is_empty() {
            None
        } else {
            Some(config.command.clone())
        },
        tty: Some(config.tty),
        attach_stdin: Some(config.attach_stdin),
        attach_stdout: Some(config.attach_stdout),
        exposed_ports: if exposed_ports.is_empty() {
            None
        } else {
            Some(exposed_ports)
        },
        host_config: Some(host_config),
        networking_config,
        ..Default::default()
    }
}

/// Translate a [`NetworkConfig`] into the runtime's create request.
pub(crate) fn network_request(config: &NetworkConfig) -> NetworkCreateRequest {
    NetworkCreateRequest {
        name: config.name.clone(),
        driver: Some(config.driver.clone()),
        ipam: Some(Ipam {
            config: Some(vec![IpamConfig {
                subnet: Some(config.subnet.to_string()),
                gateway: Some(config.gateway.to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        options: Some(config.options.clone()),
        ..Default::default()
    }
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Container runtime implementation using bollard.
#[derive(Debug)]
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Build a client for a resolved endpoint. No request is made; call
    /// [`RuntimeInfo::ping`] to confirm the daemon answers.
    pub fn connect(endpoint: &RuntimeEndpoint, timeout: Duration) -> Result<Self, RuntimeInfoError> {
        let timeout_secs = timeout.as_secs().max(1);
        let client = match &endpoint.address {
            RuntimeAddress::Unix(path) => {
                Docker::connect_with_unix(path, timeout_secs, bollard::API_DEFAULT_VERSION)
            }
            RuntimeAddress::Tcp(url) => {
                Docker::connect_with_http(url, timeout_secs, bollard::API_DEFAULT_VERSION)
            }
        }
        .map_err(|e| RuntimeInfoError::Unreachable(e.to_string()))?;

        Ok(Self::new(client, endpoint.runtime_type))
    }

    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }
}

impl Sealed for BollardRuntime {}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self.client.info().await.map_err(map_info_error)?;

        Ok(RuntimeMetadata {
            runtime_type: self.runtime_type,
            version: info.server_version.unwrap_or_default(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client.ping().await.map_err(map_info_error)?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError> {
        let image_name = reference.to_string();

        let opts = CreateImageOptions {
            from_image: Some(reference.repository().to_string()),
            tag: Some(reference.pull_tag().to_string()),
            ..Default::default()
        };

        // The pull is reported as a stream of progress updates; it is only
        // done once the stream ends.
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            let progress = result.map_err(|e| map_image_pull_error(e, &image_name))?;
            if let Some(status) = progress.status {
                tracing::trace!(image = %image_name, %status, "pull progress");
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ContainerOps for BollardRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<CreatedContainer, ContainerError> {
        let opts = CreateContainerOptions {
            name: Some(config.name.to_string()),
            ..Default::default()
        };

        let response = self
            .client
            .create_container(Some(opts), create_body(config))
            .await
            .map_err(map_container_create_error)?;

        Ok(CreatedContainer {
            id: ContainerId::new(response.id),
            warnings: response.warnings,
        })
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.client
            .start_container(id.as_str(), None::<StartContainerOptions>)
            .await
            .map_err(map_container_start_error)
    }

    async fn remove_container(&self, id: &ContainerId, force: bool) -> Result<(), ContainerError> {
        let opts = RemoveContainerOptions {
            force,
            ..Default::default()
        };

        self.client
            .remove_container(id.as_str(), Some(opts))
            .await
            .map_err(map_container_not_found_error)
    }

    async fn list_containers(
        &self,
        filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError> {
        let mut filter_map: HashMap<String, Vec<String>> = HashMap::new();
        if let Some(ref name) = filters.name {
            filter_map.insert("name".to_string(), vec![name.clone()]);
        }

        let opts = ListContainersOptions {
            all: filters.all,
            filters: Some(filter_map),
            ..Default::default()
        };

        // Podman reports transient "stopping"/"stopped" states that bollard
        // fails to deserialize. Retry after a short delay.
        let mut attempt = 0;
        loop {
            match self.client.list_containers(Some(opts.clone())).await {
                Ok(containers) => {
                    return Ok(containers
                        .into_iter()
                        .map(|c| ContainerSummary {
                            id: ContainerId::new(c.id.unwrap_or_default()),
                            names: c.names.unwrap_or_default(),
                        })
                        .collect());
                }
                Err(e) if is_transport(&e) => {
                    return Err(ContainerError::Unavailable(e.to_string()));
                }
                Err(e) => {
                    let err_str = e.to_string();
                    if (err_str.contains("unknown variant `stopping`")
                        || err_str.contains("unknown variant `stopped`"))
                        && attempt < 2
                    {
                        attempt += 1;
                        tokio::time::sleep(Duration::from_millis(500)).await;
                        continue;
                    }
                    return Err(ContainerError::Runtime(err_str));
                }
            }
        }
    }
}

#[async_trait]
impl NetworkOps for BollardRuntime {
    async fn inspect_network(&self, id: &str) -> Result<NetworkDetails, NetworkError> {
        let network = self
            .client
            .inspect_network(id, None::<InspectNetworkOptions>)
            .await
            .map_err(|e| map_network_inspect_error(e, id))?;

        let subnets = network
            .ipam
            .and_then(|ipam| ipam.config)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.subnet)
            .collect();

        Ok(NetworkDetails {
            id: NetworkId::new(network.id.unwrap_or_default()),
            name: network.name.unwrap_or_default(),
            driver: network.driver,
            subnets,
        })
    }

    async fn create_network(&self, config: &NetworkConfig) -> Result<CreatedNetwork, NetworkError> {
        let response = self
            .client
            .create_network(network_request(config))
            .await
            .map_err(map_network_create_error)?;

        Ok(CreatedNetwork {
            id: NetworkId::new(response.id),
            warning: Some(response.warning).filter(|w| !w.is_empty()),
        })
    }
}
