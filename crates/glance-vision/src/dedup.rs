//! Detection deduplication.
//!
//! Raw object detectors emit several overlapping proposals for the same
//! subject. The deduplicator keeps the highest-confidence proposal of each
//! subject and drops the rest, using a geometric overlap test combined with
//! a label-similarity test.

use std::cmp::Ordering;

use tracing::debug;

use glance_core::types::{BoundingBox, DetectionProposal};

/// Labels considered interchangeable when judging duplicate proposals.
const SYNONYM_GROUPS: &[&[&str]] = &[
    &["person", "human", "man", "woman", "people"],
    &["dog", "puppy", "canine"],
    &["cat", "kitten", "feline"],
    &["car", "vehicle", "automobile"],
    &["phone", "mobile", "smartphone", "cellphone"],
];

/// Merges overlapping raw detection proposals into a clean set.
pub struct DetectionDeduplicator {
    overlap_threshold: f32,
}

impl DetectionDeduplicator {
    /// Create a deduplicator with the default overlap threshold of 0.5.
    pub fn new() -> Self {
        Self::with_threshold(0.5)
    }

    /// Create a deduplicator with a custom overlap threshold.
    pub fn with_threshold(overlap_threshold: f32) -> Self {
        Self { overlap_threshold }
    }

    /// Collapse duplicate proposals, keeping the highest-confidence one of
    /// each subject.
    ///
    /// Proposals are walked in descending confidence order (ties keep their
    /// original relative order). A proposal is dropped when it overlaps an
    /// already-accepted proposal beyond the threshold and the two labels
    /// name the same kind of subject. The returned list preserves the
    /// confidence-descending order and never grows.
    pub fn dedupe(&self, proposals: Vec<DetectionProposal>) -> Vec<DetectionProposal> {
        if proposals.is_empty() {
            return proposals;
        }

        let mut sorted = proposals;
        sorted.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let mut accepted: Vec<DetectionProposal> = Vec::with_capacity(sorted.len());
        for candidate in sorted {
            let duplicate_of = accepted.iter().position(|kept| {
                enclosure_overlap(&kept.bounding_box, &candidate.bounding_box)
                    > self.overlap_threshold
                    && labels_similar(&kept.label, &candidate.label)
            });

            match duplicate_of {
                Some(idx) => {
                    debug!(
                        dropped = %candidate.label,
                        kept = %accepted[idx].label,
                        confidence = candidate.confidence,
                        "Dropped duplicate detection proposal"
                    );
                }
                None => accepted.push(candidate),
            }
        }

        accepted
    }
}

impl Default for DetectionDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

/// Overlap score of two boxes: intersection area over the area of the
/// minimal rectangle enclosing both.
///
/// The denominator is the enclosing rectangle, not the true union area
/// (`areaA + areaB - intersection`); downstream thresholds are calibrated
/// against this score. An empty intersection always scores 0.
pub fn enclosure_overlap(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let ix = (a.right().min(b.right()) - a.x.max(b.x)).max(0.0);
    let iy = (a.bottom().min(b.bottom()) - a.y.max(b.y)).max(0.0);
    let intersection = ix * iy;
    if intersection <= 0.0 {
        return 0.0;
    }

    let ex = a.right().max(b.right()) - a.x.min(b.x);
    let ey = a.bottom().max(b.bottom()) - a.y.min(b.y);
    let enclosure = ex * ey;
    if enclosure <= 0.0 {
        return 0.0;
    }

    intersection / enclosure
}

/// Whether two labels name the same kind of subject.
///
/// True on case-insensitive equality, substring containment, or shared
/// membership in a synonym group.
fn labels_similar(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();

    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.contains(&b) || b.contains(&a) {
        return true;
    }

    SYNONYM_GROUPS
        .iter()
        .any(|group| group.contains(&a.as_str()) && group.contains(&b.as_str()))
}
