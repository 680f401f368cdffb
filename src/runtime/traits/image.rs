// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Pull images so containers can be created from them.

use super::sealed::Sealed;
use crate::types::ImageRef;
use async_trait::async_trait;

#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Pull an image, returning once the runtime reports the pull finished.
    async fn pull_image(&self, reference: &ImageRef) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("runtime unavailable: {0}")]
    Unavailable(String),
}

impl ImageError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ImageError::Unavailable(_))
    }
}
