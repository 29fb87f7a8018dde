// ABOUTME: Library root for ctrscope - container listing queries and the attach stream protocol.
// ABOUTME: The container runtime itself is supplied by the caller through the runtime traits.

pub mod attach;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod ps;
pub mod runtime;
pub mod types;
