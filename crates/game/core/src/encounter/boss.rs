//! Boss fight state machine.
//!
//! `Pending -> Active -> {Defeated | Expired}`. A fight accepts damage only
//! while `Active` and inside `[started_at, started_at + duration)`. Sealing
//! sets the settled flag before any grant is computed, so settlement can run
//! only once.

use std::collections::BTreeMap;

use crate::config::EngineConfig;
use crate::encounter::EncounterError;
use crate::state::{ActorId, FightId, MonsterId, Timestamp};

/// Lifecycle phase of a boss fight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FightPhase {
    Pending,
    Active,
    Defeated,
    Expired,
}

impl FightPhase {
    pub const fn is_sealed(self) -> bool {
        matches!(self, Self::Defeated | Self::Expired)
    }
}

/// Damage recorded against a fight by one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRecord {
    pub first_hit: bool,
    pub cumulative: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossFight {
    pub id: FightId,
    pub monster: MonsterId,
    pub started_at: Timestamp,
    pub duration: u64,
    cumulative_damage: u64,
    /// Attackers in first-hit order.
    participants: Vec<ActorId>,
    ledger: BTreeMap<ActorId, u64>,
    phase: FightPhase,
    settled: bool,
}

impl BossFight {
    pub fn new(id: FightId, monster: MonsterId, started_at: Timestamp, duration: u64) -> Self {
        Self {
            id,
            monster,
            started_at,
            duration,
            cumulative_damage: 0,
            participants: Vec::new(),
            ledger: BTreeMap::new(),
            phase: FightPhase::Pending,
            settled: false,
        }
    }

    pub fn activate(&mut self) {
        if self.phase == FightPhase::Pending {
            self.phase = FightPhase::Active;
        }
    }

    pub fn phase(&self) -> FightPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn ends_at(&self) -> Timestamp {
        self.started_at + self.duration
    }

    pub fn cumulative_damage(&self) -> u64 {
        self.cumulative_damage
    }

    pub fn participants(&self) -> &[ActorId] {
        &self.participants
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn damage_of(&self, actor: ActorId) -> u64 {
        self.ledger.get(&actor).copied().unwrap_or(0)
    }

    /// `(actor, damage)` pairs in first-hit order.
    pub fn contributions(&self) -> Vec<(ActorId, u64)> {
        self.participants
            .iter()
            .map(|actor| (*actor, self.damage_of(*actor)))
            .collect()
    }

    /// True while the fight is active and `now` is inside its window.
    pub fn is_live(&self, now: Timestamp) -> bool {
        self.phase == FightPhase::Active && !self.settled && now >= self.started_at && now < self.ends_at()
    }

    /// Checks that `actor` may land a hit at `now`.
    pub fn ensure_accepts(&self, actor: ActorId, now: Timestamp) -> Result<(), EncounterError> {
        if !self.is_live(now) {
            return Err(EncounterError::FightNotActive(self.id));
        }
        if !self.ledger.contains_key(&actor) && self.participants.len() >= EngineConfig::MAX_PARTICIPANTS {
            return Err(EncounterError::TooManyParticipants {
                fight: self.id,
                max: EngineConfig::MAX_PARTICIPANTS,
            });
        }
        Ok(())
    }

    /// Adds damage for `actor`. Callers validate with [`Self::ensure_accepts`] first.
    pub fn record(&mut self, actor: ActorId, damage: u64) -> DamageRecord {
        let first_hit = !self.ledger.contains_key(&actor);
        if first_hit {
            self.participants.push(actor);
        }
        let entry = self.ledger.entry(actor).or_insert(0);
        *entry = entry.saturating_add(damage);
        self.cumulative_damage = self.cumulative_damage.saturating_add(damage);
        DamageRecord {
            first_hit,
            cumulative: self.cumulative_damage,
        }
    }

    /// Ledger total equals cumulative damage.
    pub fn ledger_is_consistent(&self) -> bool {
        let total = self
            .ledger
            .values()
            .fold(0u64, |total, damage| total.saturating_add(*damage));
        total == self.cumulative_damage && self.ledger.len() == self.participants.len()
    }

    /// Seals the fight as defeated. Fails if it was already sealed.
    pub fn seal_defeated(&mut self) -> Result<(), EncounterError> {
        self.seal(FightPhase::Defeated)
    }

    /// Seals an unsettled fight whose window has elapsed, without rewards.
    pub fn expire(&mut self, now: Timestamp) -> Result<(), EncounterError> {
        self.ensure_expirable(now)?;
        self.seal(FightPhase::Expired)
    }

    pub fn ensure_expirable(&self, now: Timestamp) -> Result<(), EncounterError> {
        if self.phase != FightPhase::Active || self.settled {
            return Err(EncounterError::FightNotActive(self.id));
        }
        if now < self.ends_at() {
            return Err(EncounterError::FightStillActive {
                fight: self.id,
                ends_at: self.ends_at(),
            });
        }
        Ok(())
    }

    fn seal(&mut self, phase: FightPhase) -> Result<(), EncounterError> {
        if self.phase.is_sealed() || self.settled {
            return Err(EncounterError::FightNotActive(self.id));
        }
        self.phase = phase;
        self.settled = true;
        Ok(())
    }
}
