//! Cross-cutting rate limiter for combat, abilities and quests.
//!
//! A cooldown is data, not a timer: the governor remembers when each
//! (actor, action) last succeeded and compares the current command timestamp
//! against it.

use std::collections::BTreeMap;

use crate::ability::Element;
use crate::error::{ErrorCategory, GameError};
use crate::state::{ActorId, QuestId, Timestamp};

/// Action class a cooldown applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CooldownKey {
    /// Global boss-attack cooldown.
    Combat,
    /// Ability casts of one element.
    Element(Element),
    /// Repeat runs of one quest.
    Quest(QuestId),
}

/// Rejection produced while a cooldown is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{actor} on cooldown for {key:?}: {remaining}s remaining")]
pub struct CooldownError {
    pub actor: ActorId,
    pub key: CooldownKey,
    pub remaining: u64,
}

impl GameError for CooldownError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Timing
    }

    fn error_code(&self) -> &'static str {
        "COOLDOWN_ACTIVE"
    }
}

/// Last-success timestamps per (actor, key).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownGovernor {
    stamps: BTreeMap<(ActorId, CooldownKey), Timestamp>,
}

impl CooldownGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self, actor: ActorId, key: CooldownKey) -> Option<Timestamp> {
        self.stamps.get(&(actor, key)).copied()
    }

    /// Seconds left before `actor` may perform `key` again.
    pub fn remaining(&self, actor: ActorId, key: CooldownKey, cooldown: u64, now: Timestamp) -> u64 {
        match self.last(actor, key) {
            Some(last) => (last + cooldown).since(now),
            None => 0,
        }
    }

    /// Fails if fewer than `cooldown` seconds passed since the last stamp.
    pub fn check(
        &self,
        actor: ActorId,
        key: CooldownKey,
        cooldown: u64,
        now: Timestamp,
    ) -> Result<(), CooldownError> {
        match self.remaining(actor, key, cooldown, now) {
            0 => Ok(()),
            remaining => Err(CooldownError {
                actor,
                key,
                remaining,
            }),
        }
    }

    /// Records a success at `now`. Stamps never move backwards.
    pub fn stamp(&mut self, actor: ActorId, key: CooldownKey, now: Timestamp) {
        let entry = self.stamps.entry((actor, key)).or_insert(now);
        *entry = (*entry).max(now);
    }
}
