//! Authoritative engine state.
//!
//! [`EngineState`] owns every registry and every piece of mutable encounter,
//! casting, quest, cooldown and random-stream data. Runtime layers clone or
//! query it but mutate it exclusively through [`crate::Engine`].
pub mod types;

pub use types::{
    AbilityId, ActorId, Affinity, CoreStats, FightId, HuntId, Identity, ItemId, MonsterId, PartyId,
    QuestId, Timestamp,
};

use crate::ability::{AbilityBook, AbilityState, ComboBook, Element, Multiplier};
use crate::config::EngineConfig;
use crate::cooldown::CooldownGovernor;
use crate::encounter::EncounterState;
use crate::quest::QuestState;
use crate::rng::RandomGenerator;

/// Canonical snapshot of the deterministic engine state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineState {
    pub config: EngineConfig,
    pub encounters: EncounterState,
    pub abilities: AbilityBook,
    pub combos: ComboBook,
    /// Status effects, charges, prerequisite ledger and combo histories.
    pub casting: AbilityState,
    pub quests: QuestState,
    pub cooldowns: CooldownGovernor,
    pub rng: RandomGenerator,
    /// Committed command counter.
    nonce: u64,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub(crate) fn advance_nonce(&mut self) {
        self.nonce = self.nonce.saturating_add(1);
    }

    /// Read-only combo query for `actor` at `now`.
    pub fn check_combo(
        &self,
        actor: ActorId,
        sequence: &[Element],
        now: Timestamp,
    ) -> Result<Multiplier, crate::ability::AbilityError> {
        self.casting.check_combo(&self.combos, actor, sequence, now)
    }

    /// SHA-256 over the bincode encoding of the whole state.
    ///
    /// Two replicas that applied the same commands report the same root.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn state_root_is_stable_and_sensitive() {
        let state = EngineState::default();
        let root = state.state_root().unwrap();
        assert_eq!(root, EngineState::default().state_root().unwrap());

        let mut changed = EngineState::default();
        changed.advance_nonce();
        assert_ne!(root, changed.state_root().unwrap());
        assert_eq!(hex::encode(root).len(), 64);
    }
}
