//! Action derivation from extracted facts.
//!
//! The engine evaluates a fixed set of independent rules over the facts of
//! one image. Each rule contributes zero, one, or (for links) several
//! candidates; the collected list is then stably sorted by display priority.

use serde_json::json;
use tracing::debug;
use url::Url;

use glance_core::types::ExtractedFacts;

use crate::catalog::ActionCatalog;
use crate::types::{ActionCandidate, ActionConfig, ActionType};

/// Derives ranked action candidates from extracted facts.
///
/// `derive` is pure given the facts: a rule that cannot use its input
/// contributes nothing, and repeated calls produce an identical list.
pub struct ActionEngine {
    catalog: ActionCatalog,
    config: ActionConfig,
}

impl ActionEngine {
    /// Create an engine with the default catalog and config.
    pub fn new() -> Self {
        Self::with_parts(ActionCatalog::new(), ActionConfig::default())
    }

    /// Create an engine with a custom catalog and config.
    pub fn with_parts(catalog: ActionCatalog, config: ActionConfig) -> Self {
        Self { catalog, config }
    }

    /// Derive the ranked candidate list for one image.
    ///
    /// Rules run in a fixed order (calendar, contact, map, link, call,
    /// email, copy, note, share) and the result is sorted ascending by
    /// priority with a stable sort, so equal-priority candidates keep
    /// their rule order.
    pub fn derive(&self, facts: &ExtractedFacts) -> Vec<ActionCandidate> {
        let mut candidates = Vec::new();

        candidates.extend(self.calendar_candidate(facts));
        candidates.extend(self.contact_candidate(facts));
        candidates.extend(self.map_candidate(facts));
        candidates.extend(self.link_candidates(facts));
        candidates.extend(self.call_candidate(facts));
        candidates.extend(self.email_candidate(facts));
        candidates.extend(self.copy_candidate(facts));
        candidates.extend(self.note_candidate(facts));
        candidates.push(self.share_candidate());

        candidates.sort_by_key(|c| c.priority);

        debug!(count = candidates.len(), "Derived action candidates");
        candidates
    }

    fn candidate(
        &self,
        action_type: ActionType,
        title: String,
        payload: serde_json::Value,
    ) -> ActionCandidate {
        ActionCandidate {
            action_type,
            title,
            icon: self.catalog.icon(action_type).to_string(),
            payload,
            priority: self.catalog.priority(action_type),
            enabled: true,
        }
    }

    /// Eligible when an event start date is known together with a name or a
    /// location.
    fn calendar_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        let event = &facts.event;
        let start = event.start?;
        if event.name.is_none() && event.location.is_none() {
            return None;
        }

        let title = if let Some(name) = &event.name {
            format!("Add to Calendar: {}", name)
        } else if let Some(location) = &event.location {
            format!("Add Event at {}", location)
        } else {
            "Add to Calendar".to_string()
        };

        let payload = json!({
            "name": event.name,
            "start": start.to_rfc3339(),
            "end": event.end.map(|e| e.to_rfc3339()),
            "location": event.location,
            "description": event.description,
        });
        Some(self.candidate(ActionType::Calendar, title, payload))
    }

    /// Eligible when a contact name is known together with a phone or email.
    fn contact_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        let contact = &facts.contact;
        let name = contact.name.as_ref()?;
        if contact.phone.is_none() && contact.email.is_none() {
            return None;
        }

        let payload = json!({
            "name": name,
            "company": contact.company,
            "job_title": contact.job_title,
            "phone": contact.phone,
            "email": contact.email,
            "address": contact.address,
        });
        Some(self.candidate(
            ActionType::Contact,
            format!("Add {} to Contacts", name),
            payload,
        ))
    }

    /// Takes the first recognized address, falling back to the event
    /// location. An empty target is ineligible.
    fn map_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        let target = facts
            .addresses
            .first()
            .cloned()
            .or_else(|| facts.event.location.clone())?;
        if target.trim().is_empty() {
            return None;
        }

        let title = format!(
            "Show on Map: {}",
            truncate_for_display(&target, self.config.map_title_max_chars)
        );
        Some(self.candidate(ActionType::Map, title, json!({ "address": target })))
    }

    /// One candidate per parseable URL, up to the configured maximum.
    /// Malformed URLs are skipped, never fatal.
    fn link_candidates(&self, facts: &ExtractedFacts) -> Vec<ActionCandidate> {
        let mut candidates = Vec::new();
        for raw in &facts.urls {
            if candidates.len() == self.config.max_link_candidates {
                break;
            }
            match Url::parse(raw) {
                Ok(parsed) => {
                    let display = parsed
                        .host_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| raw.clone());
                    candidates.push(self.candidate(
                        ActionType::Link,
                        format!("Open: {}", display),
                        json!({ "url": raw }),
                    ));
                }
                Err(e) => {
                    debug!(url = %raw, error = %e, "Skipping malformed URL");
                }
            }
        }
        candidates
    }

    fn call_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        let number = facts.phone_numbers.first()?;
        Some(self.candidate(
            ActionType::Call,
            format!("Call {}", number),
            json!({ "phone_number": number }),
        ))
    }

    fn email_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        let address = facts.emails.first()?;
        Some(self.candidate(
            ActionType::Email,
            format!("Email {}", address),
            json!({ "email": address }),
        ))
    }

    fn copy_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        if facts.full_text.chars().count() < self.config.copy_min_chars {
            return None;
        }
        Some(self.candidate(
            ActionType::Copy,
            "Copy Text".to_string(),
            json!({ "text": facts.full_text }),
        ))
    }

    fn note_candidate(&self, facts: &ExtractedFacts) -> Option<ActionCandidate> {
        if facts.full_text.chars().count() < self.config.note_min_chars {
            return None;
        }
        Some(self.candidate(
            ActionType::Note,
            "Create Note".to_string(),
            json!({ "text": facts.full_text }),
        ))
    }

    /// Always eligible; with nothing else extracted this is the only
    /// candidate the engine produces.
    fn share_candidate(&self) -> ActionCandidate {
        self.candidate(ActionType::Share, "Share".to_string(), json!({}))
    }
}

impl Default for ActionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Cap `text` at `max_chars` characters, appending "..." when shortened.
fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max_chars).collect();
        format!("{}...", prefix)
    }
}
