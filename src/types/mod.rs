// ABOUTME: Type-safe identifiers shared by the runtime boundary and query records.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;

pub use id::{ContainerId, Id, ImageId, PodId};
