//! Action derivation for Glance.
//!
//! Turns the extracted facts of one image into a ranked list of
//! user-actionable suggestions ("Add to Calendar", "Call ...", "Open: ...")
//! by evaluating a fixed set of independent rules and sorting the collected
//! candidates by display priority.

pub mod catalog;
pub mod engine;
pub mod types;

pub use catalog::{ActionCatalog, CatalogEntry};
pub use engine::ActionEngine;
pub use types::{ActionCandidate, ActionConfig, ActionType};
