//! Shared vocabulary of the channel manager: the topology snapshots produced by a scan,
//! panel geometry, runtime configuration and the logging macros used across the workspace.

pub mod config;
pub mod geometry;
pub mod log;
pub mod topology;

#[doc(hidden)]
pub use tracing as __tracing;
