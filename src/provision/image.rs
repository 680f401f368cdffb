// ABOUTME: Image acquisition before container creation.
// ABOUTME: Pulls are awaited; PullPolicy decides whether a failure stops provisioning.

use super::cancellable;
use super::error::{ProvisionError, PullSnafu};
use crate::runtime::ImageOps;
use crate::types::ImageRef;
use serde::Deserialize;
use snafu::ResultExt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What to do when a pull fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PullPolicy {
    /// Log the failure and carry on; a cached image may still be usable.
    #[default]
    BestEffort,
    /// Abort before creating anything.
    Required,
}

pub struct ImagePuller<R> {
    runtime: Arc<R>,
    cancel: Option<CancellationToken>,
}

impl<R> Clone for ImagePuller<R> {
    fn clone(&self) -> Self {
        Self {
            runtime: Arc::clone(&self.runtime),
            cancel: self.cancel.clone(),
        }
    }
}

impl<R: ImageOps> ImagePuller<R> {
    pub fn new(runtime: Arc<R>) -> Self {
        Self {
            runtime,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Pull `image` and wait for the runtime to finish.
    pub async fn pull(&self, image: &ImageRef) -> Result<(), ProvisionError> {
        tracing::debug!("Pulling image {}", image);
        cancellable(self.cancel.as_ref(), "pull", self.runtime.pull_image(image))
            .await?
            .context(PullSnafu {
                image: image.to_string(),
            })
    }

    /// Pull under `policy`. With [`PullPolicy::BestEffort`] only
    /// cancellation is returned as an error.
    pub async fn pull_with_policy(
        &self,
        image: &ImageRef,
        policy: PullPolicy,
    ) -> Result<(), ProvisionError> {
        match self.pull(image).await {
            Err(e @ ProvisionError::Pull { .. }) if policy == PullPolicy::BestEffort => {
                tracing::warn!("Ignoring failed pull, create may fail if the image is not cached: {}", e);
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::ErrorKind;
    use crate::runtime::fake::{Call, Failures, FakeRuntime};

    fn image() -> ImageRef {
        ImageRef::parse("nginx:alpine").unwrap()
    }

    #[tokio::test]
    async fn pull_is_recorded_with_full_reference() {
        let runtime = Arc::new(FakeRuntime::new());
        ImagePuller::new(Arc::clone(&runtime))
            .pull(&image())
            .await
            .unwrap();
        assert_eq!(runtime.calls(), vec![Call::Pull("nginx:alpine".to_string())]);
    }

    #[tokio::test]
    async fn best_effort_swallows_pull_failure() {
        let runtime = Arc::new(FakeRuntime::with_failures(Failures {
            pull: true,
            ..Default::default()
        }));
        let puller = ImagePuller::new(runtime);

        assert!(puller.pull_with_policy(&image(), PullPolicy::BestEffort).await.is_ok());
        let err = puller
            .pull_with_policy(&image(), PullPolicy::Required)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Pull);
    }

    #[tokio::test]
    async fn unreachable_runtime_reports_connection_kind() {
        let runtime = Arc::new(FakeRuntime::with_failures(Failures {
            unavailable: true,
            ..Default::default()
        }));
        let err = ImagePuller::new(runtime).pull(&image()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Connection);
    }

    #[tokio::test]
    async fn cancellation_aborts_a_hanging_pull() {
        let runtime = Arc::new(FakeRuntime::with_failures(Failures {
            hang_pull: true,
            ..Default::default()
        }));
        let token = CancellationToken::new();
        let puller = ImagePuller::new(runtime).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            token.cancel();
        });
        let err = puller
            .pull_with_policy(&image(), PullPolicy::BestEffort)
            .await
            .unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, ProvisionError::Cancelled { step: "pull" }));
    }
}
