//! Damage calculation.

use crate::config::EngineConfig;
use crate::env::{ActorProfile, ItemStats};

/// Numerator/denominator of the alignment bonus (1.5×).
const ALIGNMENT_BONUS: (u64, u64) = (3, 2);

/// Calculate the base damage an actor deals with its equipped weapon.
///
/// # Formula
///
/// ```text
/// damage = floor
/// if weapon:
///     damage += actor.stats[weapon.affinity] + sum(weapon.bonuses)
///     if actor.alignment == weapon.affinity:
///         damage = damage * 3 / 2        (truncated)
/// ```
///
/// Pure: callers resolve the weapon through the item oracle and apply the
/// result to encounter state themselves.
pub fn compute_damage(actor: &ActorProfile, weapon: Option<&ItemStats>, config: &EngineConfig) -> u64 {
    let mut damage = config.base_damage_floor;

    let Some((weapon, affinity)) = weapon
        .filter(|item| item.is_weapon())
        .and_then(|item| item.affinity.map(|affinity| (item, affinity)))
    else {
        return damage;
    };

    damage = damage
        .saturating_add(actor.stats.axis(affinity))
        .saturating_add(weapon.bonuses.total());

    if actor.alignment == affinity {
        damage = damage.saturating_mul(ALIGNMENT_BONUS.0) / ALIGNMENT_BONUS.1;
    }

    damage
}
