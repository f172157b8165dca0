//! Core types and value objects for action derivation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action types the engine can suggest for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Calendar,
    Contact,
    Map,
    Link,
    Call,
    Email,
    Copy,
    Note,
    Share,
}

impl ActionType {
    /// All action types, in rule-evaluation order.
    pub const ALL: [ActionType; 9] = [
        ActionType::Calendar,
        ActionType::Contact,
        ActionType::Map,
        ActionType::Link,
        ActionType::Call,
        ActionType::Email,
        ActionType::Copy,
        ActionType::Note,
        ActionType::Share,
    ];
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionType::Calendar => write!(f, "calendar"),
            ActionType::Contact => write!(f, "contact"),
            ActionType::Map => write!(f, "map"),
            ActionType::Link => write!(f, "link"),
            ActionType::Call => write!(f, "call"),
            ActionType::Email => write!(f, "email"),
            ActionType::Copy => write!(f, "copy"),
            ActionType::Note => write!(f, "note"),
            ActionType::Share => write!(f, "share"),
        }
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "calendar" => Ok(ActionType::Calendar),
            "contact" => Ok(ActionType::Contact),
            "map" => Ok(ActionType::Map),
            "link" => Ok(ActionType::Link),
            "call" => Ok(ActionType::Call),
            "email" => Ok(ActionType::Email),
            "copy" => Ok(ActionType::Copy),
            "note" => Ok(ActionType::Note),
            "share" => Ok(ActionType::Share),
            _ => Err(format!("Unknown action type: {}", s)),
        }
    }
}

/// A proposed user-facing action derived from extracted facts.
///
/// Immutable once created; display ordering is applied by the engine, never
/// by the candidate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCandidate {
    pub action_type: ActionType,
    pub title: String,
    pub icon: String,
    /// Opaque payload handed to whatever surface executes the action.
    pub payload: serde_json::Value,
    /// Display priority; lower values are shown first.
    pub priority: u8,
    pub enabled: bool,
}

/// Configuration for the action engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    /// Maximum link candidates derived from one image.
    pub max_link_candidates: usize,
    /// Minimum text length for a "Copy Text" candidate.
    pub copy_min_chars: usize,
    /// Minimum text length for a "Create Note" candidate.
    pub note_min_chars: usize,
    /// Display length cap for map addresses in candidate titles.
    pub map_title_max_chars: usize,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            max_link_candidates: 3,
            copy_min_chars: 10,
            note_min_chars: 20,
            map_title_max_chars: 30,
        }
    }
}
