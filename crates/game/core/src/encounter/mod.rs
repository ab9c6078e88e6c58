//! Combat encounters: boss fights, hunts, loot and reward distribution.
//!
//! This module owns encounter state and the per-entity state machines. The
//! command flow (authorization, cooldowns, damage, retaliation, settlement)
//! lives in the action transitions that drive these types.

mod boss;
mod hunt;
mod loot;
mod monster;
mod reward;

pub use boss::{BossFight, DamageRecord, FightPhase};
pub use hunt::{Hunt, HuntProgress, KillRecord};
pub use loot::{LOOT_ROLL_WORDS, LootEntry, LootTable};
pub use monster::{DefensiveMove, Monster, validate_pool};
pub use reward::{RewardGrant, RewardSource, boss_pool, percent_of, split_by_contribution};

use std::collections::BTreeMap;

use crate::ability::AbilityError;
use crate::cooldown::CooldownError;
use crate::env::OracleError;
use crate::error::{ErrorCategory, GameError};
use crate::rng::RngError;
use crate::state::{ActorId, FightId, HuntId, ItemId, MonsterId, Timestamp};

/// Errors raised by boss fight and hunt commands.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncounterError {
    #[error("{0} not found")]
    MonsterNotFound(MonsterId),

    #[error("{0} is inactive")]
    MonsterInactive(MonsterId),

    #[error("{0} is not a boss")]
    NotABoss(MonsterId),

    #[error("{actor} does not hold required {item}")]
    MissingRequiredItem { actor: ActorId, item: ItemId },

    #[error("fight duration must be positive")]
    InvalidDuration,

    #[error("combat cooldown: {0}")]
    CombatOnCooldown(CooldownError),

    #[error("{0} not found")]
    FightNotFound(FightId),

    #[error("{0} is not accepting attacks")]
    FightNotActive(FightId),

    #[error("{fight} already has {max} participants")]
    TooManyParticipants { fight: FightId, max: usize },

    #[error("fight ids are exhausted")]
    FightIdsExhausted,

    #[error("{fight} is still running until {ends_at}")]
    FightStillActive { fight: FightId, ends_at: Timestamp },

    #[error("{0} is referenced by an active boss fight")]
    MonsterInUse(MonsterId),

    #[error("{fight} ledger does not add up to its cumulative damage")]
    LedgerMismatch { fight: FightId },

    #[error("{0} not found")]
    HuntNotFound(HuntId),

    #[error("{0} is inactive")]
    HuntInactive(HuntId),

    #[error("{actor} already has a running {hunt}")]
    HuntAlreadyActive { hunt: HuntId, actor: ActorId },

    #[error("{actor} has not started {hunt}")]
    HuntNotStarted { hunt: HuntId, actor: ActorId },

    #[error("{actor} already completed {hunt}")]
    HuntAlreadyCompleted { hunt: HuntId, actor: ActorId },

    #[error("{actor}'s run of {hunt} expired at {deadline}")]
    HuntExpired {
        hunt: HuntId,
        actor: ActorId,
        deadline: Timestamp,
    },

    #[error(transparent)]
    Ability(#[from] AbilityError),

    #[error(transparent)]
    Rng(#[from] RngError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for EncounterError {
    fn category(&self) -> ErrorCategory {
        use EncounterError::*;
        match self {
            MonsterNotFound(_) | MonsterInactive(_) | NotABoss(_) | MissingRequiredItem { .. } => {
                ErrorCategory::Precondition
            }
            InvalidDuration | FightNotFound(_) | HuntNotFound(_) | HuntInactive(_) => {
                ErrorCategory::Precondition
            }
            HuntNotStarted { .. } => ErrorCategory::Precondition,
            CombatOnCooldown(_) | FightStillActive { .. } | HuntExpired { .. } => ErrorCategory::Timing,
            FightNotActive(_) | MonsterInUse(_) | HuntAlreadyActive { .. } => {
                ErrorCategory::StateConflict
            }
            HuntAlreadyCompleted { .. } => ErrorCategory::StateConflict,
            TooManyParticipants { .. } | FightIdsExhausted => ErrorCategory::Capacity,
            LedgerMismatch { .. } => ErrorCategory::Internal,
            Ability(error) => error.category(),
            Rng(error) => error.category(),
            Oracle(error) => error.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        use EncounterError::*;
        match self {
            MonsterNotFound(_) => "ENCOUNTER_MONSTER_NOT_FOUND",
            MonsterInactive(_) => "ENCOUNTER_MONSTER_INACTIVE",
            NotABoss(_) => "ENCOUNTER_NOT_A_BOSS",
            MissingRequiredItem { .. } => "ENCOUNTER_MISSING_REQUIRED_ITEM",
            InvalidDuration => "ENCOUNTER_INVALID_DURATION",
            CombatOnCooldown(_) => "ENCOUNTER_COMBAT_ON_COOLDOWN",
            FightNotFound(_) => "ENCOUNTER_FIGHT_NOT_FOUND",
            FightNotActive(_) => "ENCOUNTER_FIGHT_NOT_ACTIVE",
            TooManyParticipants { .. } => "ENCOUNTER_TOO_MANY_PARTICIPANTS",
            FightIdsExhausted => "ENCOUNTER_FIGHT_IDS_EXHAUSTED",
            FightStillActive { .. } => "ENCOUNTER_FIGHT_STILL_ACTIVE",
            MonsterInUse(_) => "ENCOUNTER_MONSTER_IN_USE",
            LedgerMismatch { .. } => "ENCOUNTER_LEDGER_MISMATCH",
            HuntNotFound(_) => "ENCOUNTER_HUNT_NOT_FOUND",
            HuntInactive(_) => "ENCOUNTER_HUNT_INACTIVE",
            HuntAlreadyActive { .. } => "ENCOUNTER_HUNT_ALREADY_ACTIVE",
            HuntNotStarted { .. } => "ENCOUNTER_HUNT_NOT_STARTED",
            HuntAlreadyCompleted { .. } => "ENCOUNTER_HUNT_ALREADY_COMPLETED",
            HuntExpired { .. } => "ENCOUNTER_HUNT_EXPIRED",
            Ability(error) => error.error_code(),
            Rng(error) => error.error_code(),
            Oracle(error) => error.error_code(),
        }
    }
}

/// Monsters, fights and hunts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterState {
    monsters: BTreeMap<MonsterId, Monster>,
    fights: BTreeMap<FightId, BossFight>,
    /// Fight id allocator; never reused.
    next_fight_id: u32,
    hunts: BTreeMap<HuntId, Hunt>,
    progress: BTreeMap<(HuntId, ActorId), HuntProgress>,
}

impl Default for EncounterState {
    fn default() -> Self {
        Self {
            monsters: BTreeMap::new(),
            fights: BTreeMap::new(),
            next_fight_id: 1,
            hunts: BTreeMap::new(),
            progress: BTreeMap::new(),
        }
    }
}

impl EncounterState {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== monsters =====

    pub fn monster(&self, id: MonsterId) -> Result<&Monster, EncounterError> {
        self.monsters.get(&id).ok_or(EncounterError::MonsterNotFound(id))
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Result<&mut Monster, EncounterError> {
        self.monsters
            .get_mut(&id)
            .ok_or(EncounterError::MonsterNotFound(id))
    }

    pub fn contains_monster(&self, id: MonsterId) -> bool {
        self.monsters.contains_key(&id)
    }

    /// Inserts or replaces a monster definition.
    pub fn put_monster(&mut self, monster: Monster) {
        self.monsters.insert(monster.id, monster);
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// True while an active fight references the monster.
    pub fn monster_in_use(&self, id: MonsterId) -> bool {
        self.fights
            .values()
            .any(|fight| fight.monster == id && fight.phase() == FightPhase::Active)
    }

    // ===== boss fights =====

    pub fn fight(&self, id: FightId) -> Result<&BossFight, EncounterError> {
        self.fights.get(&id).ok_or(EncounterError::FightNotFound(id))
    }

    pub fn fight_mut(&mut self, id: FightId) -> Result<&mut BossFight, EncounterError> {
        self.fights.get_mut(&id).ok_or(EncounterError::FightNotFound(id))
    }

    pub fn fights(&self) -> impl Iterator<Item = &BossFight> {
        self.fights.values()
    }

    /// Id the next opened fight will receive.
    pub fn peek_fight_id(&self) -> FightId {
        FightId(self.next_fight_id)
    }

    /// Opens a fight and returns its id.
    ///
    /// Fails once the id space is used up; ids are never recycled.
    pub fn open_fight(
        &mut self,
        monster: MonsterId,
        now: Timestamp,
        duration: u64,
    ) -> Result<FightId, EncounterError> {
        let id = FightId(self.next_fight_id);
        if self.fights.contains_key(&id) {
            return Err(EncounterError::FightIdsExhausted);
        }
        let mut fight = BossFight::new(id, monster, now, duration);
        fight.activate();
        self.fights.insert(id, fight);
        // The last id is still handed out; the next call sees it taken.
        self.next_fight_id = self.next_fight_id.checked_add(1).unwrap_or(u32::MAX);
        Ok(id)
    }

    // ===== hunts =====

    pub fn hunt(&self, id: HuntId) -> Result<&Hunt, EncounterError> {
        self.hunts.get(&id).ok_or(EncounterError::HuntNotFound(id))
    }

    pub fn hunt_mut(&mut self, id: HuntId) -> Result<&mut Hunt, EncounterError> {
        self.hunts.get_mut(&id).ok_or(EncounterError::HuntNotFound(id))
    }

    pub fn contains_hunt(&self, id: HuntId) -> bool {
        self.hunts.contains_key(&id)
    }

    pub fn insert_hunt(&mut self, hunt: Hunt) {
        self.hunts.insert(hunt.id, hunt);
    }

    pub fn progress(&self, hunt: HuntId, actor: ActorId) -> Option<&HuntProgress> {
        self.progress.get(&(hunt, actor))
    }

    pub fn progress_mut(&mut self, hunt: HuntId, actor: ActorId) -> Option<&mut HuntProgress> {
        self.progress.get_mut(&(hunt, actor))
    }

    /// Starts a fresh run, replacing any earlier one.
    pub fn begin_hunt(&mut self, hunt: HuntId, actor: ActorId, now: Timestamp) {
        self.progress
            .insert((hunt, actor), HuntProgress::new(hunt, actor, now));
    }
}
