// ABOUTME: Integration tests for configuration discovery, parsing and validation.
// ABOUTME: Uses temporary directories for the file-based paths.

use berth::config::{self, CONFIG_FILENAME, Config};
use berth::error::Error;
use berth::provision::{ContainerRole, PullPolicy, SpecError};
use berth::types::RestartPolicy;
use std::fs;
use std::net::Ipv4Addr;
use std::time::Duration;
use tempfile::TempDir;

const FULL: &str = r#"
runtime:
  socket: unix:///run/user/1000/podman/podman.sock
  timeout: 30s
pull_policy: required
network:
  id: agents-net
  subnet: 10.10.0.0/24
  gateway: 10.10.0.1
logging:
  enabled: true
  hostname: log-collector
  config_path: /etc/fluent-bit/fluent-bit.conf
  ip: 10.10.0.2
containers:
  - name: web
    image: nginx:alpine
    ip: 10.10.0.5
    restart: unless-stopped
    ports:
      - "8080:80"
    volumes:
      - /srv/www:/usr/share/nginx/html
    env:
      - MODE=production
  - name: worker
    image: ghcr.io/acme/worker:1.4
    ip: 10.10.0.6
    user: "1000:1000"
    command: ["run", "--once"]
"#;

fn with_containers(containers: &str) -> String {
    format!(
        "network:\n  id: agents-net\n  subnet: 10.10.0.0/24\n  gateway: 10.10.0.1\ncontainers:\n{containers}"
    )
}

mod parsing {
    use super::*;

    #[test]
    fn full_config() {
        let config = Config::from_yaml(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.runtime.socket.as_deref(),
            Some("unix:///run/user/1000/podman/podman.sock")
        );
        assert_eq!(config.runtime.timeout, Duration::from_secs(30));
        assert_eq!(config.pull_policy, PullPolicy::Required);
        assert_eq!(config.network.id, "agents-net");
        assert_eq!(config.network.gateway, Ipv4Addr::new(10, 10, 0, 1));
        assert_eq!(
            config.logging.collector_ip(),
            Some(Ipv4Addr::new(10, 10, 0, 2))
        );
        assert_eq!(config.logging.collector_name().unwrap().as_str(), "log-collector");
        assert_eq!(config.containers.len(), 2);
        assert_eq!(config.containers[1].name, "worker");
    }

    #[test]
    fn specs_carry_parsed_values() {
        let config = Config::from_yaml(FULL).unwrap();
        let specs = config.container_specs().unwrap();

        let web = &specs[0];
        assert_eq!(web.name.as_str(), "web");
        assert_eq!(web.image.to_string(), "nginx:alpine");
        assert_eq!(web.ip_address, Ipv4Addr::new(10, 10, 0, 5));
        assert_eq!(web.restart_policy, RestartPolicy::UnlessStopped);
        assert_eq!(web.ports.len(), 1);
        assert_eq!(web.ports[0].host_port(), 8080);
        assert_eq!(web.volumes[0].target(), "/usr/share/nginx/html");
        assert_eq!(web.env, vec!["MODE=production"]);
        assert_eq!(web.role, ContainerRole::Workload);

        let worker = &specs[1];
        assert_eq!(worker.user.as_deref(), Some("1000:1000"));
        assert_eq!(worker.restart_policy, RestartPolicy::No);
        assert_eq!(worker.command, vec!["run", "--once"]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let yaml = format!("{FULL}\nextra: true\n");
        assert!(matches!(Config::from_yaml(&yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn missing_network_is_rejected() {
        assert!(matches!(
            Config::from_yaml("enabled: true\n"),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn disabled_config_still_parses() {
        let yaml = format!("enabled: false\n{}", with_containers("  []\n"));
        let config = Config::from_yaml(&yaml).unwrap();
        assert!(!config.enabled);
    }
}

mod validation {
    use super::*;

    #[test]
    fn duplicate_names_are_rejected() {
        let yaml = with_containers(
            "  - name: web\n    image: nginx\n    ip: 10.10.0.5\n  - name: web\n    image: nginx\n    ip: 10.10.0.6\n",
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("used more than once"));
    }

    #[test]
    fn container_cannot_take_the_gateway_address() {
        let yaml = with_containers("  - name: web\n    image: nginx\n    ip: 10.10.0.1\n");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("already assigned"));
    }

    #[test]
    fn container_outside_subnet_is_rejected() {
        let yaml = with_containers("  - name: web\n    image: nginx\n    ip: 172.16.0.5\n");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn container_cannot_reuse_the_collector_name() {
        let yaml = FULL.replace("name: worker", "name: log-collector");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("used more than once"));
    }

    #[test]
    fn relative_collector_config_path_is_rejected() {
        let yaml = FULL.replace(
            "config_path: /etc/fluent-bit/fluent-bit.conf",
            "config_path: fluent-bit.conf",
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(err.to_string().contains("must be absolute"));
    }

    #[test]
    fn bad_volume_is_a_spec_error() {
        let yaml = with_containers(
            "  - name: web\n    image: nginx\n    ip: 10.10.0.5\n    volumes: [\"/data\"]\n",
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::Spec(SpecError::Volume { .. })));
    }

    #[test]
    fn bad_restart_policy_is_a_spec_error() {
        let yaml = with_containers(
            "  - name: web\n    image: nginx\n    ip: 10.10.0.5\n    restart: sometimes\n",
        );
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::Spec(SpecError::RestartPolicy(_))));
    }

    #[test]
    fn bad_container_name_is_a_spec_error() {
        let yaml = with_containers("  - name: -web\n    image: nginx\n    ip: 10.10.0.5\n");
        let err = Config::from_yaml(&yaml).unwrap().validate().unwrap_err();
        assert!(matches!(err, Error::Spec(SpecError::Name(_))));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_filename() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), FULL).unwrap();
        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.network.id, "agents-net");
    }

    #[test]
    fn finds_yaml_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("berth.yaml"), FULL).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn finds_dot_directory() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(".berth")).unwrap();
        fs::write(dir.path().join(".berth/config.yml"), FULL).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}

mod init {
    use super::*;

    #[test]
    fn writes_a_valid_template() {
        let dir = TempDir::new().unwrap();
        config::init_config(dir.path(), false).unwrap();

        let config = Config::load(&dir.path().join(CONFIG_FILENAME)).unwrap();
        config.validate().unwrap();
        assert!(config.enabled);
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "keep me").unwrap();

        assert!(matches!(
            config::init_config(dir.path(), false),
            Err(Error::AlreadyExists(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn force_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "replace me").unwrap();

        config::init_config(dir.path(), true).unwrap();
        assert!(Config::load(&path).is_ok());
    }
}
