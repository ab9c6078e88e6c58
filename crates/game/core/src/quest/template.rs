//! Quest templates: requirements, mode and objectives.

use crate::env::ActorProfile;
use crate::state::{CoreStats, QuestId};

/// What kind of event advances an objective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveKind {
    KillMonsters,
    DefeatBoss,
    CollectItems,
    CompleteHunts,
    Explore,
    Custom(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: u64,
}

impl Objective {
    pub const fn new(kind: ObjectiveKind, target: u64) -> Self {
        Self { kind, target }
    }
}

/// How a quest is run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestMode {
    Solo,
    Party {
        max_size: u32,
        /// Extra percent of the base reward when the party is full.
        bonus_pct: u64,
    },
    Raid {
        max_size: u32,
        bonus_pct: u64,
        /// Parties that may run the raid at once.
        max_parties: u32,
        /// Extra percent per live party.
        raid_bonus_pct: u64,
    },
}

impl QuestMode {
    pub const fn accepts_party(&self) -> bool {
        !matches!(self, QuestMode::Solo)
    }

    pub const fn requires_party(&self) -> bool {
        matches!(self, QuestMode::Raid { .. })
    }

    pub const fn max_size(&self) -> u32 {
        match self {
            QuestMode::Solo => 1,
            QuestMode::Party { max_size, .. } | QuestMode::Raid { max_size, .. } => *max_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestTemplate {
    pub id: QuestId,
    pub name: String,
    pub min_level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_stats: CoreStats,
    pub base_reward: u64,
    /// Seconds a participant waits before running the quest again.
    pub cooldown: u64,
    pub mode: QuestMode,
    pub objectives: Vec<Objective>,
    pub active: bool,
}

impl QuestTemplate {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.is_empty() {
            return Err("quest name is empty");
        }
        if self.objectives.is_empty() {
            return Err("quest has no objectives");
        }
        if self.objectives.iter().any(|objective| objective.target == 0) {
            return Err("objective target must be positive");
        }
        let mut kinds: Vec<_> = self.objectives.iter().map(|objective| objective.kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        if kinds.len() != self.objectives.len() {
            return Err("objective kinds must be unique");
        }
        match self.mode {
            QuestMode::Solo => {}
            QuestMode::Party { max_size, .. } if max_size == 0 => {
                return Err("party size must be positive");
            }
            QuestMode::Raid {
                max_size,
                max_parties,
                ..
            } if max_size == 0 || max_parties == 0 => {
                return Err("raid size and party limit must be positive");
            }
            QuestMode::Party { .. } | QuestMode::Raid { .. } => {}
        }
        Ok(())
    }

    /// Level and every stat axis meet the template minimums.
    pub fn admits(&self, actor: &ActorProfile) -> bool {
        actor.level >= self.min_level && actor.stats.meets(&self.min_stats)
    }

    pub fn objective_index(&self, kind: ObjectiveKind) -> Option<usize> {
        self.objectives
            .iter()
            .position(|objective| objective.kind == kind)
    }
}
