// ABOUTME: Configuration types and parsing for berth.yml.
// ABOUTME: Handles discovery, YAML parsing, cross-field validation and the init template.

mod container;

pub use container::ContainerEntry;

use crate::error::{Error, Result};
use crate::provision::{ContainerSpec, PullPolicy, SpecError};
use crate::runtime::RuntimeConfig;
use crate::types::{ContainerName, Subnet};
use serde::Deserialize;
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "berth.yml";
pub const CONFIG_FILENAME_ALT: &str = "berth.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".berth/config.yml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Gate for the whole provisioning core.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub runtime: RuntimeConfig,

    #[serde(default)]
    pub pull_policy: PullPolicy,

    pub network: NetworkSettings,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub containers: Vec<ContainerEntry>,
}

/// The single managed bridge network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkSettings {
    pub id: String,
    pub subnet: Subnet,
    pub gateway: Ipv4Addr,
}

/// Log shipping through the collector sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Collector container name.
    #[serde(default = "default_collector_hostname")]
    pub hostname: String,

    /// Collector configuration file on the host.
    #[serde(default = "default_collector_config_path")]
    pub config_path: String,

    #[serde(default = "default_collector_ip")]
    pub ip: Ipv4Addr,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hostname: default_collector_hostname(),
            config_path: default_collector_config_path(),
            ip: default_collector_ip(),
        }
    }
}

impl LoggingConfig {
    /// Collector address workloads ship to, when logging is on.
    pub fn collector_ip(&self) -> Option<Ipv4Addr> {
        self.enabled.then_some(self.ip)
    }

    pub fn collector_name(&self) -> std::result::Result<ContainerName, SpecError> {
        Ok(ContainerName::new(&self.hostname)?)
    }
}

fn default_enabled() -> bool {
    true
}

fn default_collector_hostname() -> String {
    "fluent-bit".to_string()
}

fn default_collector_config_path() -> String {
    "/etc/fluent-bit/fluent-bit.conf".to_string()
}

fn default_collector_ip() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Check cross-field constraints that parsing alone cannot.
    pub fn validate(&self) -> Result<()> {
        let network = &self.network;
        if network.id.trim().is_empty() {
            return Err(Error::InvalidConfig("network.id cannot be empty".to_string()));
        }
        if !network.subnet.contains(network.gateway) {
            return Err(Error::InvalidConfig(format!(
                "gateway {} is outside subnet {}",
                network.gateway, network.subnet
            )));
        }

        let mut names = HashSet::new();
        let mut addresses = HashSet::from([network.gateway]);

        if self.logging.enabled {
            let name = self.logging.collector_name()?;
            if !Path::new(&self.logging.config_path).is_absolute() {
                return Err(Error::InvalidConfig(format!(
                    "logging.config_path must be absolute: {}",
                    self.logging.config_path
                )));
            }
            self.check_address("logging.ip", self.logging.ip, &mut addresses)?;
            names.insert(name.to_string());
        }

        for spec in self.container_specs()? {
            if !names.insert(spec.name.to_string()) {
                return Err(Error::InvalidConfig(format!(
                    "container name {} is used more than once",
                    spec.name
                )));
            }
            self.check_address(
                &format!("containers.{}.ip", spec.name),
                spec.ip_address,
                &mut addresses,
            )?;
        }

        Ok(())
    }

    fn check_address(
        &self,
        field: &str,
        ip: Ipv4Addr,
        taken: &mut HashSet<Ipv4Addr>,
    ) -> Result<()> {
        if !self.network.subnet.contains(ip) {
            return Err(Error::InvalidConfig(format!(
                "{field} {ip} is outside subnet {}",
                self.network.subnet
            )));
        }
        if !taken.insert(ip) {
            return Err(Error::InvalidConfig(format!(
                "{field} {ip} is already assigned"
            )));
        }
        Ok(())
    }

    /// Validated specs for every configured container, in file order.
    pub fn container_specs(&self) -> std::result::Result<Vec<ContainerSpec>, SpecError> {
        self.containers.iter().map(ContainerSpec::try_from).collect()
    }
}

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, generate_template_yaml())?;

    Ok(())
}

fn generate_template_yaml() -> String {
    let logging = LoggingConfig::default();
    format!(
        r#"enabled: true
runtime:
  timeout: 2m
network:
  id: agents-net
  subnet: 10.10.0.0/24
  gateway: 10.10.0.1
logging:
  enabled: false
  hostname: {}
  config_path: {}
  ip: 10.10.0.2
containers:
  - name: web
    image: nginx:alpine
    ip: 10.10.0.5
    restart: unless-stopped
    ports:
      - "8080:80"
"#,
        logging.hostname, logging.config_path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
network:
  id: agents-net
  subnet: 10.10.0.0/24
  gateway: 10.10.0.1
"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_yaml(MINIMAL).unwrap();
        assert!(config.enabled);
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.collector_ip(), None);
        assert_eq!(config.pull_policy, PullPolicy::BestEffort);
        assert_eq!(config.runtime, RuntimeConfig::default());
        assert!(config.containers.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn template_parses_and_validates() {
        let config = Config::from_yaml(&generate_template_yaml()).unwrap();
        config.validate().unwrap();
        assert_eq!(config.container_specs().unwrap().len(), 1);
    }

    #[test]
    fn gateway_outside_subnet_is_rejected() {
        let yaml = MINIMAL.replace("gateway: 10.10.0.1", "gateway: 10.20.0.1");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("outside subnet"));
    }

    #[test]
    fn collector_ip_is_checked_only_when_logging_is_enabled() {
        let yaml = format!("{MINIMAL}logging:\n  enabled: false\n  ip: 192.168.1.1\n");
        Config::from_yaml(&yaml).unwrap().validate().unwrap();

        let yaml = format!("{MINIMAL}logging:\n  enabled: true\n  ip: 192.168.1.1\n");
        assert!(Config::from_yaml(&yaml).unwrap().validate().is_err());
    }

    #[test]
    fn duplicate_addresses_are_rejected() {
        let yaml = format!(
            "{MINIMAL}containers:\n  - name: web\n    image: nginx\n    ip: 10.10.0.5\n  - name: api\n    image: nginx\n    ip: 10.10.0.5\n"
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("already assigned"));
    }

    #[test]
    fn malformed_port_fails_validation() {
        let yaml = format!(
            "{MINIMAL}containers:\n  - name: web\n    image: nginx\n    ip: 10.10.0.5\n    ports: [\"8080\"]\n"
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::Spec(SpecError::Port { .. })));
    }
}
