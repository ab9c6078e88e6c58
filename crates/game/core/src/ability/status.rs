//! Timed status effects attached to actors and monsters.
//!
//! # Time-based Duration
//!
//! Effects store their start and duration. An effect is active while
//! `now < started_at + duration`; expired entries are pruned whenever a new
//! effect is written.

use arrayvec::ArrayVec;

use crate::ability::AbilityCategory;
use crate::config::EngineConfig;
use crate::state::{AbilityId, ActorId, MonsterId, Timestamp};

/// Anything a status effect can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Actor(ActorId),
    Monster(MonsterId),
}

/// A single applied effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub ability: AbilityId,
    pub category: AbilityCategory,
    pub started_at: Timestamp,
    pub duration: u64,
    /// Percentage for buffs/debuffs, per-tick amount for damage over time.
    pub power: u64,
}

impl StatusEffect {
    pub fn expires_at(&self) -> Timestamp {
        self.started_at + self.duration
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        now >= self.started_at && now < self.expires_at()
    }
}

/// Effects on one target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { EngineConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds an effect.
    ///
    /// Re-applying an ability refreshes its entry. When the set is full the
    /// effect closest to expiry is replaced.
    pub fn add(&mut self, effect: StatusEffect, now: Timestamp) {
        self.remove_expired(now);

        if let Some(existing) = self.effects.iter_mut().find(|e| e.ability == effect.ability) {
            *existing = effect;
            return;
        }

        if self.effects.is_full() {
            if let Some(index) = self
                .effects
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.expires_at())
                .map(|(index, _)| index)
            {
                self.effects[index] = effect;
            }
            return;
        }

        self.effects.push(effect);
    }

    pub fn remove_expired(&mut self, now: Timestamp) {
        self.effects.retain(|e| e.is_active(now));
    }

    pub fn active_at(&self, now: Timestamp) -> impl Iterator<Item = &StatusEffect> + '_ {
        self.effects.iter().filter(move |e| e.is_active(now))
    }

    /// Net percentage modifier of active buffs and debuffs, floored at -100.
    pub fn modifier_pct(&self, now: Timestamp) -> i64 {
        let net: i64 = self
            .active_at(now)
            .map(|effect| {
                let power = i64::try_from(effect.power).unwrap_or(i64::MAX);
                match effect.category {
                    AbilityCategory::Buff => power,
                    AbilityCategory::Debuff => -power,
                    _ => 0,
                }
            })
            .fold(0i64, i64::saturating_add);
        net.max(-100)
    }

    /// Applies [`Self::modifier_pct`] to `value`, truncating.
    pub fn scale(&self, value: u64, now: Timestamp) -> u64 {
        let pct = 100 + self.modifier_pct(now);
        let scaled = u128::from(value) * pct as u128 / 100;
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    pub fn is_empty_at(&self, now: Timestamp) -> bool {
        self.active_at(now).next().is_none()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn effect(ability: u32, category: AbilityCategory, start: u64, duration: u64, power: u64) -> StatusEffect {
        StatusEffect {
            ability: AbilityId(ability),
            category,
            started_at: Timestamp(start),
            duration,
            power,
        }
    }

    #[test]
    fn buffs_and_debuffs_net_out() {
        let mut effects = StatusEffects::empty();
        effects.add(effect(1, AbilityCategory::Buff, 0, 100, 30), Timestamp(0));
        effects.add(effect(2, AbilityCategory::Debuff, 0, 100, 10), Timestamp(0));
        effects.add(effect(3, AbilityCategory::DamageOverTime, 0, 100, 99), Timestamp(0));

        assert_eq!(effects.modifier_pct(Timestamp(5)), 20);
        assert_eq!(effects.scale(50, Timestamp(5)), 60);
    }

    #[test]
    fn expired_effects_stop_counting() {
        let mut effects = StatusEffects::empty();
        effects.add(effect(1, AbilityCategory::Buff, 10, 5, 50), Timestamp(10));
        assert_eq!(effects.scale(100, Timestamp(14)), 150);
        assert_eq!(effects.scale(100, Timestamp(15)), 100);
        assert!(effects.is_empty_at(Timestamp(15)));
    }

    #[test]
    fn debuffs_never_go_below_zero() {
        let mut effects = StatusEffects::empty();
        effects.add(effect(1, AbilityCategory::Debuff, 0, 10, 80), Timestamp(0));
        effects.add(effect(2, AbilityCategory::Debuff, 0, 10, 80), Timestamp(0));
        assert_eq!(effects.modifier_pct(Timestamp(1)), -100);
        assert_eq!(effects.scale(500, Timestamp(1)), 0);
    }

    #[test]
    fn reapplying_refreshes_and_full_set_evicts_soonest_expiry() {
        let mut effects = StatusEffects::empty();
        for id in 0..EngineConfig::MAX_STATUS_EFFECTS as u32 {
            effects.add(effect(id, AbilityCategory::Buff, 0, 100 + u64::from(id), 1), Timestamp(0));
        }
        effects.add(effect(0, AbilityCategory::Buff, 0, 500, 1), Timestamp(0));
        assert_eq!(effects.len(), EngineConfig::MAX_STATUS_EFFECTS);

        // Ability 1 now expires first (t=101) and is replaced.
        effects.add(effect(99, AbilityCategory::Buff, 0, 50, 1), Timestamp(0));
        assert_eq!(effects.len(), EngineConfig::MAX_STATUS_EFFECTS);
        assert!(effects.active_at(Timestamp(0)).all(|e| e.ability != AbilityId(1)));
        assert!(effects.active_at(Timestamp(0)).any(|e| e.ability == AbilityId(99)));
    }
}
