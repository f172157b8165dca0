//! Glance core crate - shared domain types, configuration, and errors.
//!
//! Everything the extraction, vision, and action crates agree on lives here:
//! the raw detection and extracted-fact types, the TOML configuration, the
//! workspace-wide error enum, and the tracing bootstrap.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod types;

pub use config::GlanceConfig;
pub use error::{GlanceError, Result};
pub use types::*;
