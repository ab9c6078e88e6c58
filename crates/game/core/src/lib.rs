//! Deterministic encounter and quest rules shared by runtimes and tools.
//!
//! `encounter-core` defines the canonical rules (commands, engine, state) for
//! boss fights, hunts, abilities and quests, and exposes pure APIs that never
//! perform I/O. All state mutation flows through [`engine::Engine`]; supporting
//! crates depend on the types re-exported here.
pub mod ability;
pub mod action;
pub mod combat;
pub mod config;
pub mod cooldown;
pub mod encounter;
pub mod engine;
pub mod env;
pub mod error;
pub mod quest;
pub mod rng;
pub mod state;

pub use ability::{
    Ability, AbilityBook, AbilityCategory, AbilityError, AbilityOutcome, ComboBook, ComboRule,
    Element, Multiplier, StatusEffect, TargetRef,
};
pub use action::{
    Access, Attack, Caller, Command, CommandContext, CompleteQuest, DrawRandom, ExpireBossFight,
    InitializeSeed, RecordKill, Roles, StartBossFight, StartHunt, StartQuest, Transition,
    UpdateQuestProgress, UseAbility,
};
pub use config::EngineConfig;
pub use cooldown::{CooldownError, CooldownGovernor, CooldownKey};
pub use encounter::{
    BossFight, EncounterError, FightPhase, Hunt, HuntProgress, LootEntry, LootTable, Monster,
    RewardGrant, RewardSource,
};
pub use engine::{Engine, EngineEvent, ExecuteError, Receipt, TransitionPhase, TransitionPhaseError};
pub use env::{
    ActorOracle, ActorProfile, Env, ItemOracle, ItemStats, OracleError, OracleSnapshot,
    PartyOracle, PartyRoster,
};
pub use error::{ErrorCategory, GameError};
pub use quest::{ObjectiveKind, QuestError, QuestGroup, QuestMode, QuestTemplate};
pub use rng::{Draw, RandomContext, RandomWord, RngError, Seed};
pub use state::{
    AbilityId, ActorId, Affinity, CoreStats, EngineState, FightId, HuntId, Identity, ItemId,
    MonsterId, PartyId, QuestId, Timestamp,
};
