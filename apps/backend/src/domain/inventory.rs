//! Inventory list helpers. Items are free-text names; lookups ignore case.

use crate::errors::domain::{DomainError, NotFoundKind};

/// Longest accepted item name.
pub const MAX_ITEM_NAME: usize = 80;

/// Remove the first item matching `name` (ignoring case) and return it as
/// stored.
pub fn take_item(items: &mut Vec<String>, name: &str) -> Option<String> {
    let needle = name.trim().to_lowercase();
    let idx = items.iter().position(|i| i.to_lowercase() == needle)?;
    Some(items.remove(idx))
}

/// Like [`take_item`] but a missing item is an error.
pub fn require_item(items: &mut Vec<String>, name: &str) -> Result<String, DomainError> {
    take_item(items, name).ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Item, format!("Item '{}' not found", name.trim()))
    })
}

/// Names actually added and removed, as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

/// Apply narrated additions and removals. Removals of missing items are
/// ignored; the narrator is not authoritative about what players hold.
pub fn apply_changes(items: &mut Vec<String>, added: &[String], removed: &[String]) -> InventoryDelta {
    let mut delta = InventoryDelta::default();
    for name in removed {
        if let Some(item) = take_item(items, name) {
            delta.removed.push(item);
        }
    }
    for name in added {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let stored: String = name.chars().take(MAX_ITEM_NAME).collect();
        items.push(stored.clone());
        delta.added.push(stored);
    }
    delta
}
