//! Loot tables and drop rolls.

use crate::config::EngineConfig;
use crate::rng::{RandomWord, weighted_pick};
use crate::state::ItemId;

/// Words consumed by one [`LootTable::roll`].
pub const LOOT_ROLL_WORDS: u32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item: ItemId,
    pub weight: u64,
}

impl LootEntry {
    pub const fn new(item: ItemId, weight: u64) -> Self {
        Self { item, weight }
    }
}

/// Drop chance plus a weighted item list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTable {
    /// Chance that anything drops, in basis points.
    pub drop_chance_bps: u64,
    pub entries: Vec<LootEntry>,
}

impl LootTable {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.drop_chance_bps > EngineConfig::BPS {
            return Err("drop chance above 10000 bps");
        }
        if self.drop_chance_bps > 0 && self.total_weight() == 0 {
            return Err("loot table has a drop chance but no weighted entries");
        }
        Ok(())
    }

    pub fn total_weight(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.weight))
    }

    /// Rolls the table.
    ///
    /// The first word decides whether anything drops
    /// (`roll_below(10000) < drop_chance_bps`), the second picks the entry.
    pub fn roll(&self, chance: &RandomWord, pick: &RandomWord) -> Option<ItemId> {
        if chance.roll_below(EngineConfig::BPS) >= self.drop_chance_bps {
            return None;
        }
        let total = self.total_weight();
        if total == 0 {
            return None;
        }
        weighted_pick(&self.entries, |entry| entry.weight, pick.roll_below(total)).map(|entry| entry.item)
    }
}
