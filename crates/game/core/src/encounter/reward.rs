//! Reward grants and contribution-proportional splitting.
//!
//! Grants are plain data. The engine never mints anything itself; the runtime
//! hands grants to the reward collaborator after the state change commits.

use crate::state::{ActorId, FightId, HuntId, ItemId, QuestId};

/// What earned a grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardSource {
    BossFight(FightId),
    HuntKill(HuntId),
    HuntCompletion(HuntId),
    Quest(QuestId),
}

/// A reward owed to an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardGrant {
    Token {
        recipient: ActorId,
        amount: u64,
        source: RewardSource,
    },
    Item {
        recipient: ActorId,
        item: ItemId,
        source: RewardSource,
    },
}

impl RewardGrant {
    pub fn recipient(&self) -> ActorId {
        match self {
            RewardGrant::Token { recipient, .. } | RewardGrant::Item { recipient, .. } => *recipient,
        }
    }

    pub fn source(&self) -> RewardSource {
        match self {
            RewardGrant::Token { source, .. } | RewardGrant::Item { source, .. } => *source,
        }
    }

    /// Token amount, zero for item grants.
    pub fn amount(&self) -> u64 {
        match self {
            RewardGrant::Token { amount, .. } => *amount,
            RewardGrant::Item { .. } => 0,
        }
    }
}

fn narrow(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// Boss reward pool: `base * (100 + participants * bonus_pct) / 100`.
pub fn boss_pool(base_reward: u64, participants: usize, bonus_pct: u64) -> u64 {
    let bonus = (participants as u128).saturating_mul(u128::from(bonus_pct));
    narrow(u128::from(base_reward) * (100 + bonus) / 100)
}

/// Splits `total` in proportion to each contribution, flooring every share.
///
/// The rounding remainder is not redistributed.
pub fn split_by_contribution(total: u64, contributions: &[(ActorId, u64)]) -> Vec<(ActorId, u64)> {
    let cumulative: u128 = contributions
        .iter()
        .map(|(_, amount)| u128::from(*amount))
        .sum();
    if cumulative == 0 {
        return contributions.iter().map(|(actor, _)| (*actor, 0)).collect();
    }
    contributions
        .iter()
        .map(|(actor, amount)| {
            let share = u128::from(total) * u128::from(*amount) / cumulative;
            (*actor, narrow(share))
        })
        .collect()
}

/// Percentage of `base`, truncating.
pub fn percent_of(base: u64, pct: u64) -> u64 {
    narrow(u128::from(base) * u128::from(pct) / 100)
}
