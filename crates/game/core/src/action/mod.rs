//! Command domain.
//!
//! Every state change is a [`Command`]. Each command variant wraps a struct
//! implementing [`Transition`], which the engine drives through
//! `pre_validate -> apply -> post_validate`.
//!
//! # Module Structure
//!
//! - `admin`: content administration (monsters, abilities, combos, hunts, quests)
//! - `combat`: boss fights and ability casts
//! - `hunt`: hunt runs and kills
//! - `quest`: quest start, validator progress, completion
//! - `rng`: random stream seeding and draws

pub mod admin;
pub mod combat;
pub mod hunt;
pub mod quest;
pub mod rng;

pub use admin::{
    AdminError, ContentKind, CreateAbility, CreateHunt, CreateMonster, CreateQuest, RegisterCombo,
    SetAbilityActive, SetDefensivePool, SetHuntActive, SetLootTable, SetMonsterActive,
    SetQuestActive, UpdateMonster,
};
pub use combat::{Attack, ExpireBossFight, StartBossFight, UseAbility};
pub use hunt::{RecordKill, StartHunt};
pub use quest::{CompleteQuest, StartQuest, UpdateQuestProgress};
pub use rng::{DrawRandom, InitializeSeed};

use crate::engine::Receipt;
use crate::env::Env;
use crate::error::GameError;
use crate::state::{ActorId, EngineState, Identity, Timestamp};

bitflags::bitflags! {
    /// Capabilities a caller holds.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Roles: u8 {
        /// Content administration.
        const ADMIN = 1 << 0;
        /// Trusted reporter of quest objective progress.
        const VALIDATOR = 1 << 1;
    }
}

/// Who issued a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Caller {
    pub identity: Identity,
    pub roles: Roles,
}

impl Caller {
    pub const fn player(identity: Identity) -> Self {
        Self {
            identity,
            roles: Roles::empty(),
        }
    }

    pub const fn with_roles(identity: Identity, roles: Roles) -> Self {
        Self { identity, roles }
    }
}

/// Caller and timestamp a command executes under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandContext {
    pub caller: Caller,
    pub now: Timestamp,
}

impl CommandContext {
    pub const fn new(caller: Caller, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Authorization a command requires before any phase runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Anyone,
    Role(Roles),
    /// The caller must own this actor.
    Owner(ActorId),
}

/// Defines how a concrete command mutates engine state.
///
/// Hooks receive read-only collaborator data via [`Env`] and must stay free
/// of side effects beyond `state` and `receipt`.
pub trait Transition {
    type Error: GameError;

    fn access(&self) -> Access;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(
        &self,
        _state: &EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the command. Implementations may assume `pre_validate` passed.
    fn apply(
        &self,
        state: &mut EngineState,
        env: &Env<'_>,
        ctx: &CommandContext,
        receipt: &mut Receipt,
    ) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(
        &self,
        _state: &EngineState,
        _env: &Env<'_>,
        _ctx: &CommandContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Every command the engine accepts.
#[derive(Clone, Debug, PartialEq, Eq, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    // ===== administration =====
    CreateMonster(CreateMonster),
    UpdateMonster(UpdateMonster),
    SetMonsterActive(SetMonsterActive),
    SetDefensivePool(SetDefensivePool),
    SetLootTable(SetLootTable),
    CreateAbility(CreateAbility),
    SetAbilityActive(SetAbilityActive),
    RegisterCombo(RegisterCombo),
    CreateHunt(CreateHunt),
    SetHuntActive(SetHuntActive),
    CreateQuest(CreateQuest),
    SetQuestActive(SetQuestActive),

    // ===== players =====
    StartBossFight(StartBossFight),
    Attack(Attack),
    ExpireBossFight(ExpireBossFight),
    UseAbility(UseAbility),
    StartHunt(StartHunt),
    RecordKill(RecordKill),
    StartQuest(StartQuest),
    CompleteQuest(CompleteQuest),
    InitializeSeed(InitializeSeed),
    DrawRandom(DrawRandom),

    // ===== validators =====
    UpdateQuestProgress(UpdateQuestProgress),
}

impl Command {
    /// Variant name, for logs.
    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn access(&self) -> Access {
        match self {
            Command::CreateMonster(c) => c.access(),
            Command::UpdateMonster(c) => c.access(),
            Command::SetMonsterActive(c) => c.access(),
            Command::SetDefensivePool(c) => c.access(),
            Command::SetLootTable(c) => c.access(),
            Command::CreateAbility(c) => c.access(),
            Command::SetAbilityActive(c) => c.access(),
            Command::RegisterCombo(c) => c.access(),
            Command::CreateHunt(c) => c.access(),
            Command::SetHuntActive(c) => c.access(),
            Command::CreateQuest(c) => c.access(),
            Command::SetQuestActive(c) => c.access(),
            Command::StartBossFight(c) => c.access(),
            Command::Attack(c) => c.access(),
            Command::ExpireBossFight(c) => c.access(),
            Command::UseAbility(c) => c.access(),
            Command::StartHunt(c) => c.access(),
            Command::RecordKill(c) => c.access(),
            Command::StartQuest(c) => c.access(),
            Command::CompleteQuest(c) => c.access(),
            Command::InitializeSeed(c) => c.access(),
            Command::DrawRandom(c) => c.access(),
            Command::UpdateQuestProgress(c) => c.access(),
        }
    }
}

macro_rules! impl_into_command {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Command {
                fn from(command: $variant) -> Self {
                    Command::$variant(command)
                }
            }
        )*
    };
}

impl_into_command!(
    CreateMonster,
    UpdateMonster,
    SetMonsterActive,
    SetDefensivePool,
    SetLootTable,
    CreateAbility,
    SetAbilityActive,
    RegisterCombo,
    CreateHunt,
    SetHuntActive,
    CreateQuest,
    SetQuestActive,
    StartBossFight,
    Attack,
    ExpireBossFight,
    UseAbility,
    StartHunt,
    RecordKill,
    StartQuest,
    CompleteQuest,
    InitializeSeed,
    DrawRandom,
    UpdateQuestProgress,
);
