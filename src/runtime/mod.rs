// ABOUTME: Boundary to the external container runtime.
// ABOUTME: Handle traits with a per-container locked batch read and the value types they expose.

mod error;
mod handle;
mod types;

pub use error::ContainerError;
pub use handle::{BatchOp, ContainerHandle, ContainerLookup, ContainerRuntime, LockedContainer};
pub use types::{
    ContainerConfig, ContainerStatus, ExitStatus, Mount, ParseStatusError, PortMapping,
};
