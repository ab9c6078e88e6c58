//! Monster definitions and their defensive ability pool.

use crate::ability::Element;
use crate::encounter::LootTable;
use crate::rng::{RandomWord, weighted_pick};
use crate::state::{AbilityId, ItemId, MonsterId};

/// Ability a monster may answer an attack with, and how often.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefensiveMove {
    pub ability: AbilityId,
    pub weight: u64,
}

impl DefensiveMove {
    pub const fn new(ability: AbilityId, weight: u64) -> Self {
        Self { ability, weight }
    }
}

/// Administratively defined monster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Monster {
    pub id: MonsterId,
    pub name: String,
    pub level: u32,
    pub health: u64,
    pub damage: u64,
    pub defense: u64,
    /// Reward pool before the participant bonus is applied.
    pub base_reward: u64,
    pub element: Element,
    pub boss: bool,
    /// Items an actor must have equipped to open a fight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub required_items: Vec<ItemId>,
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub defensive_pool: Vec<DefensiveMove>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Option<LootTable>,
}

impl Monster {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("monster name is empty");
        }
        if self.health == 0 {
            return Err("monster health must be positive");
        }
        validate_pool(&self.defensive_pool)?;
        if let Some(loot) = &self.loot {
            loot.validate()?;
        }
        Ok(())
    }

    fn pool_weight(&self) -> u64 {
        self.defensive_pool
            .iter()
            .fold(0u64, |total, entry| total.saturating_add(entry.weight))
    }

    /// Picks a defensive ability with one random word.
    pub fn pick_defense(&self, word: &RandomWord) -> Option<AbilityId> {
        let total = self.pool_weight();
        if total == 0 {
            return None;
        }
        weighted_pick(&self.defensive_pool, |entry| entry.weight, word.roll_below(total))
            .map(|entry| entry.ability)
    }
}

/// Rejects pools that could never select anything.
pub fn validate_pool(pool: &[DefensiveMove]) -> Result<(), &'static str> {
    if !pool.is_empty() && pool.iter().all(|entry| entry.weight == 0) {
        return Err("defensive pool has no weight");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monster(pool: Vec<DefensiveMove>) -> Monster {
        Monster {
            id: MonsterId(1),
            name: "Warden".into(),
            level: 10,
            health: 100,
            damage: 5,
            defense: 3,
            base_reward: 1_000,
            element: Element::Earth,
            boss: true,
            required_items: Vec::new(),
            active: true,
            defensive_pool: pool,
            loot: None,
        }
    }

    #[test]
    fn empty_pool_never_retaliates() {
        assert_eq!(monster(Vec::new()).pick_defense(&RandomWord([0xff; 32])), None);
    }

    #[test]
    fn pick_follows_cumulative_weights() {
        let warden = monster(vec![
            DefensiveMove::new(AbilityId(1), 1),
            DefensiveMove::new(AbilityId(2), 3),
        ]);
        // roll 0 lands in the first entry, anything above in the second.
        let mut low = [0u8; 32];
        low[7] = 4;
        assert_eq!(warden.pick_defense(&RandomWord(low)), Some(AbilityId(1)));
        low[7] = 5;
        assert_eq!(warden.pick_defense(&RandomWord(low)), Some(AbilityId(2)));
    }

    #[test]
    fn zero_health_and_weightless_pools_are_invalid() {
        let mut warden = monster(vec![DefensiveMove::new(AbilityId(1), 0)]);
        assert_eq!(warden.validate(), Err("defensive pool has no weight"));
        warden.defensive_pool.clear();
        warden.health = 0;
        assert_eq!(warden.validate(), Err("monster health must be positive"));
    }
}
