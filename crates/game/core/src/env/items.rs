use crate::state::{Affinity, CoreStats, ItemId};

/// Read-only access to item definitions owned by the item collaborator.
pub trait ItemOracle: Send + Sync {
    fn item_stats(&self, id: ItemId) -> Option<ItemStats>;
}

/// Stat bonuses and affinity of an item.
///
/// Items that declare an affinity are weapon-like: the damage calculator adds
/// the actor stat selected by the affinity plus the flat bonuses.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStats {
    pub id: ItemId,
    pub bonuses: CoreStats,
    pub affinity: Option<Affinity>,
    pub active: bool,
}

impl ItemStats {
    pub fn weapon(id: ItemId, affinity: Affinity, bonuses: CoreStats) -> Self {
        Self {
            id,
            bonuses,
            affinity: Some(affinity),
            active: true,
        }
    }

    pub fn trinket(id: ItemId, bonuses: CoreStats) -> Self {
        Self {
            id,
            bonuses,
            affinity: None,
            active: true,
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.active && self.affinity.is_some()
    }
}
