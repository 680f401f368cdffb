// ABOUTME: One managed container as written in berth.yml.
// ABOUTME: Raw strings here; conversion to ContainerSpec validates every field.

use crate::provision::{ContainerSpec, SpecError, parse_ip, parse_ports, parse_volumes};
use crate::types::{ContainerName, ImageRef, RestartPolicy};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerEntry {
    pub name: String,
    pub image: String,
    /// Static address on the managed network.
    pub ip: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_restart")]
    pub restart: String,
    /// `host:container[/proto]`
    #[serde(default)]
    pub ports: Vec<String>,
    /// `host_path:container_path`
    #[serde(default)]
    pub volumes: Vec<String>,
    /// `KEY=VALUE`
    #[serde(default)]
    pub env: Vec<String>,
    #[serde(default)]
    pub command: Vec<String>,
}

fn default_restart() -> String {
    RestartPolicy::No.as_str().to_string()
}

impl TryFrom<&ContainerEntry> for ContainerSpec {
    type Error = SpecError;

    fn try_from(entry: &ContainerEntry) -> Result<Self, Self::Error> {
        let name = ContainerName::new(&entry.name)?;
        let image = ImageRef::parse(&entry.image)?;
        let ip = parse_ip(&entry.ip)?;
        let restart = entry
            .restart
            .parse::<RestartPolicy>()
            .map_err(SpecError::RestartPolicy)?;

        let mut spec = ContainerSpec::new(name, image, ip)
            .with_restart_policy(restart)
            .with_ports(parse_ports(&entry.ports)?)
            .with_volumes(parse_volumes(&entry.volumes)?)
            .with_env(entry.env.iter().cloned())?
            .with_command(entry.command.iter().cloned());
        if let Some(ref user) = entry.user {
            spec = spec.with_user(user.clone());
        }
        Ok(spec)
    }
}

impl TryFrom<ContainerEntry> for ContainerSpec {
    type Error = SpecError;

    fn try_from(entry: ContainerEntry) -> Result<Self, Self::Error> {
        ContainerSpec::try_from(&entry)
    }
}
