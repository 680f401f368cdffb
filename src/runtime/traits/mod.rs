// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, NetworkOps, RuntimeInfo and FullRuntime.

mod container;
mod image;
mod network;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerFilters, ContainerOps, ContainerSummary};
pub use image::{ImageError, ImageOps};
pub use network::{NetworkError, NetworkOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Every capability the provisioning core uses, implemented automatically.
pub trait FullRuntime: ImageOps + ContainerOps + NetworkOps + RuntimeInfo {}

impl<T> FullRuntime for T where T: ImageOps + ContainerOps + NetworkOps + RuntimeInfo {}
