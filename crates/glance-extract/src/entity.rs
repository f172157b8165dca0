//! Entity recognition over OCR text.
//!
//! The pipeline consumes entities through the [`EntityService`] seam. Real
//! deployments plug in a platform data detector; [`RegexEntityService`] is
//! the built-in default, recognizing URLs, emails, phone numbers, street
//! addresses, and ISO dates with pre-compiled patterns.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use regex::Regex;

use glance_core::error::GlanceError;
use glance_core::types::{ContactDetails, EventDetails};

/// Entities recognized in one image's text.
#[derive(Debug, Clone, Default)]
pub struct EntityBundle {
    pub urls: Vec<String>,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub addresses: Vec<String>,
    pub event: EventDetails,
    pub contact: ContactDetails,
}

/// Service recognizing entities in extracted text.
pub trait EntityService: Send + Sync {
    fn extract(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<EntityBundle, GlanceError>> + Send;
}

/// Regex-based entity recognition.
///
/// Patterns are compiled once at construction. Event name/location and
/// contact fields are beyond what regexes can infer reliably and are left
/// unset; a richer `EntityService` implementation fills them.
pub struct RegexEntityService {
    url_regex: Regex,
    email_regex: Regex,
    phone_regex: Regex,
    address_regex: Regex,
    date_iso_regex: Regex,
}

impl RegexEntityService {
    /// Create a service with pre-compiled regex patterns.
    pub fn new() -> Self {
        Self {
            url_regex: Regex::new(r#"https?://[^\s<>")\]]+"#).unwrap(),
            email_regex: Regex::new(r#"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"#).unwrap(),
            phone_regex: Regex::new(
                r#"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)[\s.-]?|\d{3}[\s.-])\d{3}[\s.-]?\d{4}"#,
            )
            .unwrap(),
            address_regex: Regex::new(
                r#"(?i)\b\d{1,5}\s+[A-Za-z][A-Za-z\s]*?\s(?:Street|St|Avenue|Ave|Boulevard|Blvd|Road|Rd|Lane|Ln|Drive|Dr|Way|Court|Ct|Place|Pl)\.?\b"#,
            )
            .unwrap(),
            date_iso_regex: Regex::new(
                r#"\b(\d{4})-(\d{2})-(\d{2})(?:[T\s](\d{2}):(\d{2}))?\b"#,
            )
            .unwrap(),
        }
    }

    fn scan(&self, text: &str) -> EntityBundle {
        let mut bundle = EntityBundle::default();

        for m in self.url_regex.find_iter(text) {
            bundle.urls.push(m.as_str().to_string());
        }
        for m in self.email_regex.find_iter(text) {
            bundle.emails.push(m.as_str().to_string());
        }
        for m in self.phone_regex.find_iter(text) {
            bundle.phone_numbers.push(m.as_str().trim().to_string());
        }
        for m in self.address_regex.find_iter(text) {
            bundle.addresses.push(m.as_str().to_string());
        }

        // The first ISO date seeds the event start.
        if let Some(caps) = self.date_iso_regex.captures(text) {
            bundle.event.start = parse_iso_capture(&caps);
        }

        bundle
    }
}

impl Default for RegexEntityService {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityService for RegexEntityService {
    async fn extract(&self, text: &str) -> Result<EntityBundle, GlanceError> {
        Ok(self.scan(text))
    }
}

/// Build a UTC datetime from an ISO date capture with optional HH:MM.
fn parse_iso_capture(caps: &regex::Captures<'_>) -> Option<DateTime<Utc>> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    let hour: u32 = caps
        .get(4)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);
    let minute: u32 = caps
        .get(5)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

/// Mock entity service returning a fixed bundle.
#[derive(Debug, Clone, Default)]
pub struct MockEntityService {
    bundle: EntityBundle,
}

impl MockEntityService {
    /// Create a mock that recognizes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a mock that returns the given bundle for any text.
    pub fn with_bundle(bundle: EntityBundle) -> Self {
        Self { bundle }
    }
}

impl EntityService for MockEntityService {
    async fn extract(&self, _text: &str) -> Result<EntityBundle, GlanceError> {
        Ok(self.bundle.clone())
    }
}
