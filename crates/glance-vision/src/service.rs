//! Perception service seams.
//!
//! OCR and object detection run in external engines; this module defines the
//! interfaces Glance consumes plus mock implementations for testing the
//! pipeline without real models.

use glance_core::error::GlanceError;
use glance_core::types::DetectionProposal;

/// Text recognized in one image.
#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    /// Recognized text. Empty when the image carries no legible text.
    pub text: String,
    /// BCP-47 language tag, when the engine reports one.
    pub language: Option<String>,
}

/// Service for extracting text from image data.
///
/// Implementations wrap platform OCR engines behind a uniform async
/// interface.
pub trait OcrService: Send + Sync {
    /// Extract text from raw image bytes.
    fn extract_text(
        &self,
        image_data: &[u8],
    ) -> impl std::future::Future<Output = Result<OcrOutput, GlanceError>> + Send;
}

/// Service producing raw object-detection proposals for an image.
///
/// Proposals come back unfiltered; callers run them through
/// [`crate::DetectionDeduplicator`] before use.
pub trait VisionService: Send + Sync {
    /// Detect objects in raw image bytes. May return an empty list.
    fn detect_objects(
        &self,
        image_data: &[u8],
    ) -> impl std::future::Future<Output = Result<Vec<DetectionProposal>, GlanceError>> + Send;

    /// One-line scene description, when the model can produce one.
    fn describe_scene(
        &self,
        image_data: &[u8],
    ) -> impl std::future::Future<Output = Result<Option<String>, GlanceError>> + Send;
}

/// Mock OCR service for testing.
///
/// Returns deterministic text output without performing real OCR.
#[derive(Debug, Clone)]
pub struct MockOcrService {
    text: String,
    language: Option<String>,
}

impl MockOcrService {
    /// Create a mock that returns the specified text, tagged as English.
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            language: Some("en".to_string()),
        }
    }

    /// Create a mock that returns empty text (no text found in the image).
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            language: None,
        }
    }
}

impl OcrService for MockOcrService {
    async fn extract_text(&self, image_data: &[u8]) -> Result<OcrOutput, GlanceError> {
        if image_data.is_empty() {
            return Err(GlanceError::Ocr("Empty image data".to_string()));
        }
        Ok(OcrOutput {
            text: self.text.clone(),
            language: self.language.clone(),
        })
    }
}

/// Mock vision service for testing.
///
/// Returns a fixed proposal list and scene description for any input.
#[derive(Debug, Clone, Default)]
pub struct MockVisionService {
    proposals: Vec<DetectionProposal>,
    scene: Option<String>,
}

impl MockVisionService {
    /// Create a mock that detects nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given proposals.
    pub fn with_proposals(proposals: Vec<DetectionProposal>) -> Self {
        Self {
            proposals,
            scene: None,
        }
    }

    /// Attach a scene description to the mock.
    pub fn with_scene(mut self, scene: &str) -> Self {
        self.scene = Some(scene.to_string());
        self
    }
}

impl VisionService for MockVisionService {
    async fn detect_objects(&self, image_data: &[u8]) -> Result<Vec<DetectionProposal>, GlanceError> {
        if image_data.is_empty() {
            return Err(GlanceError::Vision("Empty image data".to_string()));
        }
        Ok(self.proposals.clone())
    }

    async fn describe_scene(&self, image_data: &[u8]) -> Result<Option<String>, GlanceError> {
        if image_data.is_empty() {
            return Err(GlanceError::Vision("Empty image data".to_string()));
        }
        Ok(self.scene.clone())
    }
}
