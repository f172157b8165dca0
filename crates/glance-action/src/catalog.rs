//! Static catalog of action presentation defaults.
//!
//! Maps each action type to its display icon and default priority. The
//! engine reads the catalog when building candidates; callers may override
//! individual entries before constructing the engine.

use std::collections::HashMap;

use crate::types::ActionType;

/// Presentation defaults for one action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub icon: &'static str,
    /// Default display priority; lower values are shown first.
    pub priority: u8,
}

/// Table mapping each action type to an icon and default priority.
///
/// Share carries the highest priority number so it always sorts last.
pub struct ActionCatalog {
    overrides: HashMap<ActionType, CatalogEntry>,
}

impl ActionCatalog {
    /// Create a catalog with the built-in defaults for every action type.
    pub fn new() -> Self {
        Self {
            overrides: HashMap::new(),
        }
    }

    fn default_entry(action_type: ActionType) -> CatalogEntry {
        match action_type {
            ActionType::Calendar => CatalogEntry {
                icon: "calendar-plus",
                priority: 10,
            },
            ActionType::Contact => CatalogEntry {
                icon: "user-plus",
                priority: 20,
            },
            ActionType::Map => CatalogEntry {
                icon: "map-pin",
                priority: 30,
            },
            ActionType::Link => CatalogEntry {
                icon: "external-link",
                priority: 40,
            },
            ActionType::Call => CatalogEntry {
                icon: "phone",
                priority: 50,
            },
            ActionType::Email => CatalogEntry {
                icon: "mail",
                priority: 60,
            },
            ActionType::Copy => CatalogEntry {
                icon: "clipboard",
                priority: 70,
            },
            ActionType::Note => CatalogEntry {
                icon: "file-text",
                priority: 80,
            },
            ActionType::Share => CatalogEntry {
                icon: "share",
                priority: 90,
            },
        }
    }

    /// Replace the entry for one action type.
    pub fn register(&mut self, action_type: ActionType, entry: CatalogEntry) {
        self.overrides.insert(action_type, entry);
    }

    /// The effective entry for an action type.
    pub fn entry(&self, action_type: ActionType) -> CatalogEntry {
        self.overrides
            .get(&action_type)
            .copied()
            .unwrap_or_else(|| Self::default_entry(action_type))
    }

    pub fn icon(&self, action_type: ActionType) -> &'static str {
        self.entry(action_type).icon
    }

    pub fn priority(&self, action_type: ActionType) -> u8 {
        self.entry(action_type).priority
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_action_type_has_an_entry() {
        let catalog = ActionCatalog::new();
        for action_type in ActionType::ALL {
            assert!(!catalog.icon(action_type).is_empty());
        }
    }

    #[test]
    fn test_share_has_the_highest_priority_number() {
        let catalog = ActionCatalog::new();
        let share = catalog.priority(ActionType::Share);
        for action_type in ActionType::ALL {
            if action_type != ActionType::Share {
                assert!(catalog.priority(action_type) < share);
            }
        }
    }

    #[test]
    fn test_priorities_follow_rule_order_by_default() {
        let catalog = ActionCatalog::new();
        let priorities: Vec<u8> = ActionType::ALL
            .iter()
            .map(|t| catalog.priority(*t))
            .collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_register_overrides_entry() {
        let mut catalog = ActionCatalog::new();
        catalog.register(
            ActionType::Call,
            CatalogEntry {
                icon: "phone-call",
                priority: 5,
            },
        );

        assert_eq!(catalog.icon(ActionType::Call), "phone-call");
        assert_eq!(catalog.priority(ActionType::Call), 5);
        // Other entries are untouched
        assert_eq!(catalog.icon(ActionType::Email), "mail");
        assert_eq!(catalog.priority(ActionType::Email), 60);
    }
}
