// ABOUTME: Type-safe identifiers and validated value types.
// ABOUTME: Everything here is parsed once at the boundary and trusted afterwards.

mod bind_mount;
mod container_name;
mod id;
mod image_ref;
mod port_spec;
mod restart_policy;
mod subnet;

pub use bind_mount::{BindMount, BindMountError};
pub use container_name::{ContainerName, ContainerNameError};
pub use id::{ContainerId, NetworkId};
pub use image_ref::{ImageRef, ImageRefError};
pub use port_spec::{PortSpec, PortSpecError, Protocol};
pub use restart_policy::RestartPolicy;
pub use subnet::{Subnet, SubnetError};
