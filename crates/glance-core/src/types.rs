use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Detections
// =============================================================================

/// Axis-aligned rectangle in normalized image coordinates.
///
/// All fields are expected to lie in [0, 1]; the origin corner is whatever
/// the upstream detector used, as long as it is consistent within one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the box. Negative extents count as zero.
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A raw object proposal from an upstream detector.
///
/// Immutable once created; deduplication drops proposals but never edits them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionProposal {
    pub label: String,
    /// Detector confidence in [0, 1].
    pub confidence: f32,
    pub bounding_box: BoundingBox,
    /// Optional detector-specific attributes (e.g. pose, dominant region).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

impl DetectionProposal {
    pub fn new(label: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bounding_box,
            attributes: HashMap::new(),
        }
    }
}

// =============================================================================
// Extracted facts
// =============================================================================

/// Calendar-event fields recognized in an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub name: Option<String>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Contact-card fields recognized in an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Everything extracted from one image.
///
/// Assembled by the extraction pipeline and handed read-only to the action
/// engine; the engine never mutates it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ExtractedFacts {
    /// Full OCR text. Empty when the image carried no legible text.
    pub full_text: String,
    /// BCP-47 language tag reported by the OCR engine, when known.
    pub language: Option<String>,
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub addresses: Vec<String>,
    #[serde(default)]
    pub event: EventDetails,
    #[serde(default)]
    pub contact: ContactDetails,
    /// Deduplicated object detections.
    pub detections: Vec<DetectionProposal>,
    pub scene_description: Option<String>,
}
