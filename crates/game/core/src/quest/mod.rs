//! Objective-based quests run solo, by a party, or as a raid of parties.
//!
//! Completion follows AND semantics: a group completes only once every
//! declared objective reaches its target. The group is marked completed
//! before any reward grant is produced.

mod instance;
mod template;

pub use instance::{ActiveQuestInstance, GroupProgress, Participation, QuestGroup};
pub use template::{Objective, ObjectiveKind, QuestMode, QuestTemplate};

use std::collections::BTreeMap;

use crate::cooldown::CooldownError;
use crate::encounter::percent_of;
use crate::env::OracleError;
use crate::error::{ErrorCategory, GameError};
use crate::state::{ActorId, PartyId, QuestId};

/// Errors raised by quest commands.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuestError {
    #[error("{0} not found")]
    QuestNotFound(QuestId),

    #[error("{0} is inactive")]
    QuestInactive(QuestId),

    #[error("{0} is a solo quest")]
    PartyNotSupported(QuestId),

    #[error("{0} is a raid and needs a party")]
    PartyRequired(QuestId),

    #[error("{0} not found")]
    PartyNotFound(PartyId),

    #[error("{0} is inactive")]
    PartyInactive(PartyId),

    #[error("{actor} is not a member of {party}")]
    NotPartyMember { actor: ActorId, party: PartyId },

    #[error("{party} has {members} members, quest allows {max}")]
    PartyTooLarge {
        party: PartyId,
        members: usize,
        max: u32,
    },

    #[error("{actor} does not meet the requirements of {quest}")]
    RequirementsNotMet { actor: ActorId, quest: QuestId },

    #[error("{0}")]
    CharacterOnCooldown(CooldownError),

    #[error("{actor} is already running {quest} with {group}")]
    AlreadyInTeam {
        actor: ActorId,
        quest: QuestId,
        group: QuestGroup,
    },

    #[error("{group} is already running {quest}")]
    QuestAlreadyActive { quest: QuestId, group: QuestGroup },

    #[error("{quest} already has {max_parties} parties")]
    RaidFull { quest: QuestId, max_parties: u32 },

    #[error("{group} is not running {quest}")]
    QuestNotActive { quest: QuestId, group: QuestGroup },

    #[error("{actor} is not a participant of {group} in {quest}")]
    NotParticipant {
        actor: ActorId,
        quest: QuestId,
        group: QuestGroup,
    },

    #[error("{group} has not met every objective of {quest}")]
    ObjectivesIncomplete { quest: QuestId, group: QuestGroup },

    #[error("{group} already completed {quest}")]
    QuestAlreadyCompleted { quest: QuestId, group: QuestGroup },

    #[error("{quest} has no {kind:?} objective")]
    UnknownObjective { quest: QuestId, kind: ObjectiveKind },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for QuestError {
    fn category(&self) -> ErrorCategory {
        use QuestError::*;
        match self {
            QuestNotFound(_) | QuestInactive(_) | PartyNotSupported(_) | PartyRequired(_) => {
                ErrorCategory::Precondition
            }
            PartyNotFound(_) | PartyInactive(_) | RequirementsNotMet { .. } => {
                ErrorCategory::Precondition
            }
            QuestNotActive { .. } | ObjectivesIncomplete { .. } | UnknownObjective { .. } => {
                ErrorCategory::Precondition
            }
            NotPartyMember { .. } | NotParticipant { .. } => ErrorCategory::Authorization,
            CharacterOnCooldown(_) => ErrorCategory::Timing,
            AlreadyInTeam { .. } | QuestAlreadyActive { .. } | QuestAlreadyCompleted { .. } => {
                ErrorCategory::StateConflict
            }
            PartyTooLarge { .. } | RaidFull { .. } => ErrorCategory::Capacity,
            Oracle(error) => error.category(),
        }
    }

    fn error_code(&self) -> &'static str {
        use QuestError::*;
        match self {
            QuestNotFound(_) => "QUEST_NOT_FOUND",
            QuestInactive(_) => "QUEST_INACTIVE",
            PartyNotSupported(_) => "QUEST_PARTY_NOT_SUPPORTED",
            PartyRequired(_) => "QUEST_PARTY_REQUIRED",
            PartyNotFound(_) => "QUEST_PARTY_NOT_FOUND",
            PartyInactive(_) => "QUEST_PARTY_INACTIVE",
            NotPartyMember { .. } => "QUEST_NOT_PARTY_MEMBER",
            PartyTooLarge { .. } => "QUEST_PARTY_TOO_LARGE",
            RequirementsNotMet { .. } => "QUEST_REQUIREMENTS_NOT_MET",
            CharacterOnCooldown(_) => "QUEST_CHARACTER_ON_COOLDOWN",
            AlreadyInTeam { .. } => "QUEST_ALREADY_IN_TEAM",
            QuestAlreadyActive { .. } => "QUEST_ALREADY_ACTIVE",
            RaidFull { .. } => "QUEST_RAID_FULL",
            QuestNotActive { .. } => "QUEST_NOT_ACTIVE",
            NotParticipant { .. } => "QUEST_NOT_PARTICIPANT",
            ObjectivesIncomplete { .. } => "QUEST_OBJECTIVES_INCOMPLETE",
            QuestAlreadyCompleted { .. } => "QUEST_ALREADY_COMPLETED",
            UnknownObjective { .. } => "QUEST_UNKNOWN_OBJECTIVE",
            Oracle(error) => error.error_code(),
        }
    }
}

/// Reward each participant of a completing group receives.
///
/// `base`, plus the party bonus when the group fills the quest's party size,
/// plus the raid bonus scaled by `live_parties` (the completing group
/// included).
pub fn completion_reward(template: &QuestTemplate, participants: usize, live_parties: usize) -> u64 {
    let base = template.base_reward;
    let full = participants >= template.mode.max_size() as usize;
    match template.mode {
        QuestMode::Solo => base,
        QuestMode::Party { bonus_pct, .. } => {
            let party_bonus = if full { percent_of(base, bonus_pct) } else { 0 };
            base.saturating_add(party_bonus)
        }
        QuestMode::Raid {
            bonus_pct,
            raid_bonus_pct,
            ..
        } => {
            let party_bonus = if full { percent_of(base, bonus_pct) } else { 0 };
            let raid_pct = raid_bonus_pct.saturating_mul(live_parties as u64);
            base.saturating_add(party_bonus)
                .saturating_add(percent_of(base, raid_pct))
        }
    }
}

/// Quest templates and their running instances.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestState {
    templates: BTreeMap<QuestId, QuestTemplate>,
    instances: BTreeMap<QuestId, ActiveQuestInstance>,
}

impl QuestState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self, id: QuestId) -> Result<&QuestTemplate, QuestError> {
        self.templates.get(&id).ok_or(QuestError::QuestNotFound(id))
    }

    pub fn template_mut(&mut self, id: QuestId) -> Result<&mut QuestTemplate, QuestError> {
        self.templates
            .get_mut(&id)
            .ok_or(QuestError::QuestNotFound(id))
    }

    pub fn contains_template(&self, id: QuestId) -> bool {
        self.templates.contains_key(&id)
    }

    pub fn insert_template(&mut self, template: QuestTemplate) {
        self.templates.insert(template.id, template);
    }

    pub fn instance(&self, id: QuestId) -> Option<&ActiveQuestInstance> {
        self.instances.get(&id)
    }

    /// Instance and template together, for updates that need both.
    pub fn instance_with_template(
        &mut self,
        id: QuestId,
    ) -> Result<(&QuestTemplate, &mut ActiveQuestInstance), QuestError> {
        let template = self.templates.get(&id).ok_or(QuestError::QuestNotFound(id))?;
        let instance = self
            .instances
            .entry(id)
            .or_insert_with(|| ActiveQuestInstance::new(id));
        Ok((template, instance))
    }
}
