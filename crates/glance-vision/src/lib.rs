//! Glance vision crate - perception interfaces and detection cleanup.
//!
//! Provides the `OcrService` and `VisionService` traits that wrap external
//! OCR and object-detection engines, mock implementations for tests, and the
//! `DetectionDeduplicator` that collapses overlapping detector proposals
//! into a clean, confidence-ranked set.

pub mod dedup;
pub mod service;

pub use dedup::DetectionDeduplicator;
pub use service::{MockOcrService, MockVisionService, OcrOutput, OcrService, VisionService};
