//! Per-player item counts

use crate::core::ItemKind;
use serde::{Deserialize, Serialize};

/// Most items a player may carry at once
pub const MAX_ITEMS: usize = 8;

/// Item counts for one player, indexed by `ItemKind`
///
/// The total never exceeds `MAX_ITEMS`; adding to a full inventory is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    counts: [u8; ItemKind::COUNT],
}

impl Inventory {
    pub fn new() -> Self {
        Inventory::default()
    }

    pub fn count(&self, item: ItemKind) -> u8 {
        self.counts[item.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|&c| c as usize).sum()
    }

    pub fn is_full(&self) -> bool {
        self.total() >= MAX_ITEMS
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Add one item. Returns false (and changes nothing) when full.
    pub fn add(&mut self, item: ItemKind) -> bool {
        if self.is_full() {
            return false;
        }
        self.counts[item.index()] += 1;
        true
    }

    /// Remove one item, never going below zero. Returns false if none was held.
    pub fn remove(&mut self, item: ItemKind) -> bool {
        let slot = &mut self.counts[item.index()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Iterate over (kind, count) for every held kind
    pub fn held(&self) -> impl Iterator<Item = (ItemKind, u8)> + '_ {
        ItemKind::ALL
            .iter()
            .map(|&kind| (kind, self.count(kind)))
            .filter(|&(_, count)| count > 0)
    }

    /// Render as `"<emoji>x<count>"` entries in kind order
    pub fn emoji_list(&self) -> Vec<String> {
        self.held()
            .map(|(kind, count)| format!("{}x{}", kind.emoji(), count))
            .collect()
    }
}
