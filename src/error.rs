// ABOUTME: Application-wide error types for berth.
// ABOUTME: Uses thiserror to wrap config, I/O, runtime and provisioning failures.

use crate::provision::{ProvisionError, SpecError};
use crate::runtime::RuntimeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("log collection is disabled in the configuration")]
    LoggingDisabled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),
}

pub type Result<T> = std::result::Result<T, Error>;
