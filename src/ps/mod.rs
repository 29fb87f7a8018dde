// ABOUTME: Container listing and inspection queries.
// ABOUTME: Filter compilation, port formatting, status derivation, and the batch query engine.

mod batch;
mod engine;
mod error;
mod filter;
mod info;
mod namespaces;
mod options;
mod output;
mod ports;
mod record;
mod sort;
mod status;

pub use engine::{PsOutput, list_containers, query};
pub use error::{FilterError, PsError, PsErrorKind};
pub use filter::{Filter, compile_filters, matches_all};
pub use info::{batch_container_info, container_info};
pub use namespaces::{Namespaces, read_namespaces};
pub use options::PsOptions;
pub use output::{Output, OutputMode};
pub use ports::{PortGroup, format_ports};
pub use record::{BatchContainerInfo, ContainerRecord, ContainerSize};
pub use sort::{ParseSortKeyError, SortKey, sort_records};
pub use status::{StatusInput, derive_status, human_duration, since};
