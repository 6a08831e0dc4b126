//! Shared data structures and rules for the configuration exporter
//!
//! This crate contains the configuration model, the wire types exchanged with
//! the collector and alert endpoints, the error taxonomy, and the status
//! classification rule used by the exporter service.

pub mod api;
pub mod config;
pub mod defaults;
pub mod error;
pub mod status;

// Re-export commonly used types for convenience
pub use api::{AlertContent, InventoryResponse, Resource};
pub use config::{ConfigStore, Settings};
pub use error::{ConfigError, ErrorBody, FetchError, PipelineError};
pub use status::classify;

#[cfg(test)]
mod tests;
