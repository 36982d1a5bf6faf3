// crates/sharplife_host/src/lib.rs
//! Bootstraps a CoreCLR runtime inside the engine process and hands control to managed code.

// Bootstrap stages, in the order the lifecycle runs them
pub mod config;
pub mod library;
pub mod locator;
pub mod negotiator;
pub mod domain;
pub mod entry_point;
pub mod lifecycle;

// Support
pub mod error;
pub mod log;
pub mod paths;
pub mod runtime_host;

#[cfg(test)]
mod test_support;

// Re-export the lifecycle so the wrapper and launcher crates can find it easily
pub use error::{BootstrapError, ConfigError};
pub use lifecycle::{LifecycleState, ManagedHost, EXIT_FAILURE};
