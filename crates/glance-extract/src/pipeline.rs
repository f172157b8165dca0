//! The image extraction pipeline.
//!
//! Processes one image end to end: completion-cache check, admission,
//! perception and entity calls, detection deduplication, action derivation,
//! and completion marking. Collaborator failures propagate; the admission
//! permit is returned on every path.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use glance_action::{ActionCandidate, ActionEngine};
use glance_core::config::GlanceConfig;
use glance_core::error::Result;
use glance_core::types::{DetectionProposal, ExtractedFacts};
use glance_vision::{DetectionDeduplicator, OcrService, VisionService};

use crate::admission::AdmissionGate;
use crate::cache::ResultCache;
use crate::entity::EntityService;

/// Everything produced for one image, handed to persistence and display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub id: Uuid,
    /// Stable input identifier the caller supplied.
    pub key: String,
    /// Deduplicated detections, confidence-descending.
    pub detections: Vec<DetectionProposal>,
    /// Action candidates, ascending by display priority.
    pub actions: Vec<ActionCandidate>,
    pub created_at: DateTime<Utc>,
}

/// Result of one processing attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExtractionOutcome {
    /// The image was processed and a record produced.
    Completed { record: ExtractionRecord },
    /// The input already completed extraction within the cache window.
    AlreadyProcessed { key: String },
}

/// The main extraction pipeline.
///
/// Generic over its collaborator services so tests can run with mocks and
/// deployments can plug in platform engines.
pub struct ExtractionPipeline<O, V, E>
where
    O: OcrService,
    V: VisionService,
    E: EntityService,
{
    ocr: O,
    vision: V,
    entities: E,
    gate: AdmissionGate,
    cache: ResultCache,
    dedup: DetectionDeduplicator,
    engine: ActionEngine,
}

impl<O, V, E> ExtractionPipeline<O, V, E>
where
    O: OcrService,
    V: VisionService,
    E: EntityService,
{
    /// Build a pipeline from config, with a default action engine.
    pub fn new(ocr: O, vision: V, entities: E, config: &GlanceConfig) -> Self {
        Self::with_components(
            ocr,
            vision,
            entities,
            AdmissionGate::new(config.extraction.max_concurrent),
            ResultCache::new(
                config.extraction.cache_max_entries,
                Duration::from_secs(config.extraction.cache_ttl_hours * 60 * 60),
            ),
            DetectionDeduplicator::with_threshold(config.detection.overlap_threshold),
            ActionEngine::new(),
        )
    }

    /// Build a pipeline from explicitly constructed components.
    #[allow(clippy::too_many_arguments)]
    pub fn with_components(
        ocr: O,
        vision: V,
        entities: E,
        gate: AdmissionGate,
        cache: ResultCache,
        dedup: DetectionDeduplicator,
        engine: ActionEngine,
    ) -> Self {
        Self {
            ocr,
            vision,
            entities,
            gate,
            cache,
            dedup,
            engine,
        }
    }

    /// Process one image end to end.
    ///
    /// Inputs that completed recently are skipped without taking a slot.
    /// The key is marked complete only after every stage succeeded, so a
    /// failed attempt is retried on the next call.
    pub async fn process(&self, key: &str, image_data: &[u8]) -> Result<ExtractionOutcome> {
        if self.cache.is_cached(key) {
            debug!(key, "Skipping image; extraction already completed");
            return Ok(ExtractionOutcome::AlreadyProcessed {
                key: key.to_string(),
            });
        }

        let permit = self.gate.acquire().await;

        let ocr_out = self.ocr.extract_text(image_data).await?;
        let proposals = self.vision.detect_objects(image_data).await?;
        let scene_description = self.vision.describe_scene(image_data).await?;
        let bundle = self.entities.extract(&ocr_out.text).await?;

        let detections = self.dedup.dedupe(proposals);
        let facts = ExtractedFacts {
            full_text: ocr_out.text,
            language: ocr_out.language,
            urls: bundle.urls,
            emails: bundle.emails,
            phone_numbers: bundle.phone_numbers,
            addresses: bundle.addresses,
            event: bundle.event,
            contact: bundle.contact,
            detections: detections.clone(),
            scene_description,
        };
        let actions = self.engine.derive(&facts);

        permit.release();
        self.cache.mark_completed(key);

        let record = ExtractionRecord {
            id: Uuid::new_v4(),
            key: key.to_string(),
            detections,
            actions,
            created_at: Utc::now(),
        };
        info!(
            key,
            detections = record.detections.len(),
            actions = record.actions.len(),
            "Image extraction completed"
        );
        Ok(ExtractionOutcome::Completed { record })
    }

    /// The admission gate shared by all callers of this pipeline.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// The completion cache consulted before each attempt.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use glance_action::ActionType;
    use glance_core::error::GlanceError;
    use glance_core::types::BoundingBox;
    use glance_vision::service::OcrOutput;
    use glance_vision::{MockOcrService, MockVisionService};

    use crate::entity::RegexEntityService;

    fn config() -> GlanceConfig {
        GlanceConfig::default()
    }

    fn proposal(label: &str, confidence: f32) -> DetectionProposal {
        DetectionProposal::new(label, confidence, BoundingBox::new(0.1, 0.1, 0.4, 0.4))
    }

    fn pipeline_with_text(
        text: &str,
        proposals: Vec<DetectionProposal>,
    ) -> ExtractionPipeline<MockOcrService, MockVisionService, RegexEntityService> {
        ExtractionPipeline::new(
            MockOcrService::with_text(text),
            MockVisionService::with_proposals(proposals),
            RegexEntityService::new(),
            &config(),
        )
    }

    #[tokio::test]
    async fn test_process_produces_record() {
        let pipeline = pipeline_with_text(
            "Team dinner RSVP ada@example.com, menu at https://example.com/menu",
            vec![proposal("dog", 0.9), proposal("puppy", 0.7)],
        );

        let outcome = pipeline.process("img-1", &[1, 2, 3]).await.unwrap();
        let record = match outcome {
            ExtractionOutcome::Completed { record } => record,
            other => panic!("Expected completion, got {:?}", other),
        };

        // Overlapping dog/puppy proposals collapse to the stronger one.
        assert_eq!(record.detections.len(), 1);
        assert_eq!(record.detections[0].label, "dog");

        let types: Vec<ActionType> = record.actions.iter().map(|a| a.action_type).collect();
        assert!(types.contains(&ActionType::Email));
        assert!(types.contains(&ActionType::Link));
        assert!(types.contains(&ActionType::Copy));
        assert_eq!(*types.last().unwrap(), ActionType::Share);

        // Ranked ascending by priority.
        let priorities: Vec<u8> = record.actions.iter().map(|a| a.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
    }

    #[tokio::test]
    async fn test_completed_key_is_skipped_on_repeat() {
        let pipeline = pipeline_with_text("Some screen text worth caching", vec![]);

        let first = pipeline.process("img-1", &[1]).await.unwrap();
        assert!(matches!(first, ExtractionOutcome::Completed { .. }));
        assert!(pipeline.cache().is_cached("img-1"));

        let second = pipeline.process("img-1", &[1]).await.unwrap();
        match second {
            ExtractionOutcome::AlreadyProcessed { key } => assert_eq!(key, "img-1"),
            other => panic!("Expected cache hit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_attempt_is_not_cached_and_frees_slot() {
        let pipeline = pipeline_with_text("irrelevant", vec![]);

        // Empty image data makes the mock OCR fail.
        let result = pipeline.process("img-err", &[]).await;
        assert!(matches!(result, Err(GlanceError::Ocr(_))));

        assert!(!pipeline.cache().is_cached("img-err"));
        assert_eq!(pipeline.gate().status().active, 0);

        // The same key can be retried.
        let retry = pipeline.process("img-err", &[1]).await.unwrap();
        assert!(matches!(retry, ExtractionOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn test_empty_signals_degrade_to_share_only() {
        let pipeline = ExtractionPipeline::new(
            MockOcrService::empty(),
            MockVisionService::empty(),
            RegexEntityService::new(),
            &config(),
        );

        let outcome = pipeline.process("blank", &[1]).await.unwrap();
        let record = match outcome {
            ExtractionOutcome::Completed { record } => record,
            other => panic!("Expected completion, got {:?}", other),
        };

        assert!(record.detections.is_empty());
        assert_eq!(record.actions.len(), 1);
        assert_eq!(record.actions[0].action_type, ActionType::Share);
    }

    #[tokio::test]
    async fn test_scene_description_reaches_derivation_facts() {
        // Scene text flows into the facts; nothing in the rule set consumes
        // it yet, so the observable effect is just a completed record.
        let pipeline = ExtractionPipeline::new(
            MockOcrService::empty(),
            MockVisionService::empty().with_scene("a receipt on a table"),
            RegexEntityService::new(),
            &config(),
        );

        let outcome = pipeline.process("scene", &[1]).await.unwrap();
        assert!(matches!(outcome, ExtractionOutcome::Completed { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_processing_is_bounded() {
        struct SlowOcr;
        impl OcrService for SlowOcr {
            async fn extract_text(&self, _image_data: &[u8]) -> Result<OcrOutput> {
                tokio::time::sleep(Duration::from_millis(40)).await;
                Ok(OcrOutput {
                    text: "slow text".to_string(),
                    language: None,
                })
            }
        }

        let mut config = GlanceConfig::default();
        config.extraction.max_concurrent = 1;

        let pipeline = Arc::new(ExtractionPipeline::new(
            SlowOcr,
            MockVisionService::empty(),
            RegexEntityService::new(),
            &config,
        ));

        let a = Arc::clone(&pipeline);
        let first = tokio::spawn(async move { a.process("img-a", &[1]).await });
        let b = Arc::clone(&pipeline);
        let second = tokio::spawn(async move { b.process("img-b", &[1]).await });

        tokio::time::sleep(Duration::from_millis(15)).await;
        let status = pipeline.gate().status();
        assert_eq!(status.active, 1);
        assert_eq!(status.waiting, 1);

        assert!(first.await.unwrap().is_ok());
        assert!(second.await.unwrap().is_ok());
        assert_eq!(pipeline.gate().status().active, 0);
    }

    #[tokio::test]
    async fn test_record_serializes() {
        let pipeline = pipeline_with_text("Call 555-123-4567 about the order", vec![]);
        let outcome = pipeline.process("img-1", &[1]).await.unwrap();

        let json = serde_json::to_string(&outcome).unwrap();
        let back: ExtractionOutcome = serde_json::from_str(&json).unwrap();
        match back {
            ExtractionOutcome::Completed { record } => {
                assert_eq!(record.key, "img-1");
                assert!(record
                    .actions
                    .iter()
                    .any(|a| a.action_type == ActionType::Call));
            }
            other => panic!("Expected completion, got {:?}", other),
        }
    }
}
