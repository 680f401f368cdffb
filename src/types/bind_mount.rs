// ABOUTME: Host bind mount parsed from "hostPath:containerPath".
// ABOUTME: Bind mounts only; named volumes are not managed here.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindMountError {
    #[error("{input:?} must have the form hostPath:containerPath, found {found} component(s)")]
    ComponentCount { input: String, found: usize },

    #[error("{0:?} has an empty path component")]
    EmptyComponent(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindMount {
    source: String,
    target: String,
}

impl BindMount {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// A file or directory mounted at the same path inside the container.
    pub fn same_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(path.clone(), path)
    }

    pub fn parse(input: &str) -> Result<Self, BindMountError> {
        let parts: Vec<&str> = input.split(':').collect();
        match parts.as_slice() {
            [source, target] if !source.is_empty() && !target.is_empty() => {
                Ok(Self::new(*source, *target))
            }
            [_, _] => Err(BindMountError::EmptyComponent(input.to_string())),
            _ => Err(BindMountError::ComponentCount {
                input: input.to_string(),
                found: parts.len(),
            }),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl FromStr for BindMount {
    type Err = BindMountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BindMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}
