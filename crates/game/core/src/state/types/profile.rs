//! Actor-facing value types shared by the damage calculator and quest
//! prerequisites.

/// Stat axis an item is tuned for, and the alignment an actor belongs to.
///
/// An actor whose alignment equals its weapon's affinity deals bonus damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affinity {
    Power,
    Finesse,
    Arcane,
}

/// Three-axis stat vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoreStats {
    pub power: u64,
    pub finesse: u64,
    pub arcane: u64,
}

impl CoreStats {
    pub const fn new(power: u64, finesse: u64, arcane: u64) -> Self {
        Self {
            power,
            finesse,
            arcane,
        }
    }

    /// Returns the stat selected by `affinity`.
    pub const fn axis(&self, affinity: Affinity) -> u64 {
        match affinity {
            Affinity::Power => self.power,
            Affinity::Finesse => self.finesse,
            Affinity::Arcane => self.arcane,
        }
    }

    /// Sum of all three axes.
    pub fn total(&self) -> u64 {
        self.power
            .saturating_add(self.finesse)
            .saturating_add(self.arcane)
    }

    /// Returns true if every axis is at least the corresponding minimum.
    pub fn meets(&self, minimum: &CoreStats) -> bool {
        self.power >= minimum.power && self.finesse >= minimum.finesse && self.arcane >= minimum.arcane
    }
}
