//! Per-command record of what happened.

use crate::ability::{AbilityOutcome, TargetRef};
use crate::action::ContentKind;
use crate::encounter::{FightPhase, RewardGrant};
use crate::quest::{ObjectiveKind, QuestGroup};
use crate::rng::{Draw, RandomContext};
use crate::state::{AbilityId, ActorId, FightId, HuntId, MonsterId, QuestId, Timestamp};

/// Observable effect of a committed command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    ContentChanged {
        kind: ContentKind,
        id: u32,
    },
    FightStarted {
        fight: FightId,
        monster: MonsterId,
        opened_by: ActorId,
        ends_at: Timestamp,
    },
    AttackLanded {
        fight: FightId,
        actor: ActorId,
        damage: u64,
        cumulative: u64,
        cast: Option<AbilityOutcome>,
        retaliation: Option<AbilityId>,
    },
    FightSealed {
        fight: FightId,
        phase: FightPhase,
        /// Total reward pool; zero for expired fights.
        pool: u64,
    },
    AbilityUsed {
        caster: ActorId,
        target: TargetRef,
        outcome: AbilityOutcome,
    },
    HuntStarted {
        hunt: HuntId,
        actor: ActorId,
        deadline: Timestamp,
    },
    KillRecorded {
        hunt: HuntId,
        actor: ActorId,
        kills: u32,
    },
    HuntCompleted {
        hunt: HuntId,
        actor: ActorId,
    },
    QuestStarted {
        quest: QuestId,
        group: QuestGroup,
        participants: Vec<ActorId>,
        mask: u64,
    },
    QuestProgressed {
        quest: QuestId,
        group: QuestGroup,
        kind: ObjectiveKind,
        value: u64,
    },
    QuestCompleted {
        quest: QuestId,
        group: QuestGroup,
        reward_per_participant: u64,
    },
    SeedInitialized {
        actor: ActorId,
        context: RandomContext,
    },
    RandomDrawn {
        actor: ActorId,
        context: RandomContext,
        draw: Draw,
    },
}

/// Outcome of one committed command.
///
/// Grants are owed, not paid: the caller hands them to the reward
/// collaborator after the state change is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Receipt {
    /// Engine nonce the command committed at.
    pub nonce: u64,
    pub at: Timestamp,
    pub events: Vec<EngineEvent>,
    pub grants: Vec<RewardGrant>,
}

impl Receipt {
    pub fn new(nonce: u64, at: Timestamp) -> Self {
        Self {
            nonce,
            at,
            events: Vec::new(),
            grants: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    /// Records a grant. Zero token amounts are dropped.
    pub fn grant(&mut self, grant: RewardGrant) {
        if matches!(grant, RewardGrant::Token { amount: 0, .. }) {
            return;
        }
        self.grants.push(grant);
    }

    /// Token total owed to `actor`.
    pub fn tokens_for(&self, actor: ActorId) -> u64 {
        self.grants
            .iter()
            .filter(|grant| grant.recipient() == actor)
            .fold(0u64, |total, grant| total.saturating_add(grant.amount()))
    }
}
