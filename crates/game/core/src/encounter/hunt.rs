//! Hunts: repeated kills of one monster type against a time limit.

use crate::encounter::EncounterError;
use crate::state::{ActorId, HuntId, MonsterId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hunt {
    pub id: HuntId,
    pub monster: MonsterId,
    pub kills_required: u32,
    /// Seconds from start in which kills count.
    pub time_limit: u64,
    pub reward_per_kill: u64,
    pub completion_bonus: u64,
    pub active: bool,
}

impl Hunt {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.kills_required == 0 {
            return Err("hunt needs at least one kill");
        }
        if self.time_limit == 0 {
            return Err("hunt time limit must be positive");
        }
        Ok(())
    }
}

/// Outcome of a recorded kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillRecord {
    pub kills: u32,
    pub completed: bool,
}

/// One actor's run of a hunt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HuntProgress {
    pub hunt: HuntId,
    pub actor: ActorId,
    pub kills: u32,
    pub started_at: Timestamp,
    pub completed: bool,
}

impl HuntProgress {
    pub fn new(hunt: HuntId, actor: ActorId, started_at: Timestamp) -> Self {
        Self {
            hunt,
            actor,
            kills: 0,
            started_at,
            completed: false,
        }
    }

    pub fn deadline(&self, hunt: &Hunt) -> Timestamp {
        self.started_at + hunt.time_limit
    }

    /// Progress past its deadline counts as gone.
    pub fn is_expired(&self, hunt: &Hunt, now: Timestamp) -> bool {
        now >= self.deadline(hunt)
    }

    /// A live run blocks a restart; completed or expired runs are replaced.
    pub fn is_live(&self, hunt: &Hunt, now: Timestamp) -> bool {
        !self.completed && !self.is_expired(hunt, now)
    }

    pub fn ensure_can_record(&self, hunt: &Hunt, now: Timestamp) -> Result<(), EncounterError> {
        if self.completed {
            return Err(EncounterError::HuntAlreadyCompleted {
                hunt: self.hunt,
                actor: self.actor,
            });
        }
        if self.is_expired(hunt, now) {
            return Err(EncounterError::HuntExpired {
                hunt: self.hunt,
                actor: self.actor,
                deadline: self.deadline(hunt),
            });
        }
        Ok(())
    }

    /// Counts one kill and completes the run when the target is reached.
    pub fn record_kill(&mut self, hunt: &Hunt) -> KillRecord {
        self.kills = self.kills.saturating_add(1);
        let completed = self.kills >= hunt.kills_required;
        if completed {
            self.completed = true;
        }
        KillRecord {
            kills: self.kills,
            completed,
        }
    }
}
