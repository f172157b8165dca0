//! Glance extraction crate - admission control, completion cache, entity
//! recognition, and the pipeline that ties one image's processing together.
//!
//! The pipeline control flow for each image: consult the completion cache,
//! acquire an admission permit (bounding concurrent work), run the OCR /
//! vision / entity collaborators, deduplicate detections, derive action
//! candidates, release the permit, and mark the input complete.

pub mod admission;
pub mod cache;
pub mod entity;
pub mod pipeline;

pub use admission::{AdmissionGate, AdmissionPermit, GateStatus};
pub use cache::{CacheStats, ResultCache};
pub use entity::{EntityBundle, EntityService, MockEntityService, RegexEntityService};
pub use pipeline::{ExtractionOutcome, ExtractionPipeline, ExtractionRecord};
