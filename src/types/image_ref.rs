// ABOUTME: Image reference validation for pulls and container creation.
// ABOUTME: Splits repository from tag or digest, defaulting the tag to "latest".

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character {0:?} in image reference")]
    InvalidChar(char),

    #[error("image reference {0:?} has an empty repository")]
    MissingRepository(String),

    #[error("image reference {0:?} has an empty tag or digest")]
    EmptySuffix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || "/:.-_@".contains(*c)))
        {
            return Err(ImageRefError::InvalidChar(c));
        }

        let (rest, digest) = match input.split_once('@') {
            Some((rest, digest)) => (rest, Some(digest)),
            None => (input, None),
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (repository, tag) = match rest.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') => (repo, Some(tag)),
            _ => (rest, None),
        };

        if repository.is_empty() {
            return Err(ImageRefError::MissingRepository(input.to_string()));
        }
        if tag.is_some_and(str::is_empty) || digest.is_some_and(str::is_empty) {
            return Err(ImageRefError::EmptySuffix(input.to_string()));
        }

        let tag = match (tag, digest) {
            (None, None) => Some("latest"),
            (tag, _) => tag,
        };

        Ok(Self {
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
            digest: digest.map(str::to_string),
        })
    }

    /// Registry host and image path, e.g. `ghcr.io/org/app` or `nginx`.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The value the pull endpoint expects in its `tag` parameter.
    ///
    /// A digest pins the image more precisely than a tag, so it wins.
    pub fn pull_tag(&self) -> &str {
        self.digest
            .as_deref()
            .or(self.tag.as_deref())
            .unwrap_or("latest")
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}
