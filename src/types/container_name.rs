// ABOUTME: Validated container name, also used as hostname and network alias.
// ABOUTME: Follows the runtime's naming rule [a-zA-Z0-9][a-zA-Z0-9_.-]+.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContainerNameError {
    #[error("container name cannot be empty")]
    Empty,

    #[error("container name must be at least two characters: {0:?}")]
    TooShort(String),

    #[error("container name must start with a letter or digit: {0:?}")]
    InvalidStart(String),

    #[error("invalid character {0:?} in container name")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerName(String);

impl ContainerName {
    pub fn new(value: &str) -> Result<Self, ContainerNameError> {
        let mut chars = value.chars();
        let first = chars.next().ok_or(ContainerNameError::Empty)?;

        if !first.is_ascii_alphanumeric() {
            return Err(ContainerNameError::InvalidStart(value.to_string()));
        }
        if value.len() < 2 {
            return Err(ContainerNameError::TooShort(value.to_string()));
        }
        if let Some(c) = chars.find(|c| !(c.is_ascii_alphanumeric() || "_.-".contains(*c))) {
            return Err(ContainerNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
