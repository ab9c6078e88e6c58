//! Elements and the elemental effectiveness table.

use std::fmt;

use crate::config::EngineConfig;

/// Elemental affinity of abilities and monsters.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}

/// Fixed-point multiplier in basis points (10_000 = 1.0×).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Multiplier(pub u64);

impl Multiplier {
    pub const NEUTRAL: Self = Self(EngineConfig::BPS);
    pub const STRONG: Self = Self(15_000);
    pub const WEAK: Self = Self(5_000);

    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub const fn bps(self) -> u64 {
        self.0
    }

    /// Scales `value`, truncating toward zero.
    pub fn apply(self, value: u64) -> u64 {
        let scaled = u128::from(value) * u128::from(self.0) / u128::from(EngineConfig::BPS);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }

    /// Combines two multipliers.
    pub fn then(self, other: Multiplier) -> Multiplier {
        Multiplier(other.apply(self.0))
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}x", self.0 / 10_000, (self.0 % 10_000) / 100)
    }
}

/// Effectiveness of `attacker` against `defender`.
///
/// Pairs missing from the table are neutral.
pub const fn effectiveness(attacker: Element, defender: Element) -> Multiplier {
    use Element::*;
    match (attacker, defender) {
        (Fire, Earth) | (Water, Fire) | (Earth, Air) | (Air, Water) => Multiplier::STRONG,
        (Light, Dark) | (Dark, Light) => Multiplier::STRONG,
        (Fire, Water) | (Earth, Fire) | (Air, Earth) | (Water, Air) => Multiplier::WEAK,
        _ => Multiplier::NEUTRAL,
    }
}

/// Effectiveness against a target that may have no element (e.g. an actor).
pub fn effectiveness_against(attacker: Element, defender: Option<Element>) -> Multiplier {
    defender.map_or(Multiplier::NEUTRAL, |defender| effectiveness(attacker, defender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn table_matches_declared_pairs() {
        assert_eq!(effectiveness(Element::Fire, Element::Earth), Multiplier(15_000));
        assert_eq!(effectiveness(Element::Fire, Element::Water), Multiplier(5_000));
        assert_eq!(effectiveness(Element::Water, Element::Earth), Multiplier(10_000));
        assert_eq!(effectiveness(Element::Light, Element::Dark), Multiplier::STRONG);
        assert_eq!(effectiveness(Element::Dark, Element::Light), Multiplier::STRONG);
    }

    #[test]
    fn same_element_is_neutral() {
        for element in Element::iter() {
            assert_eq!(effectiveness(element, element), Multiplier::NEUTRAL);
        }
    }

    #[test]
    fn elementless_target_is_neutral() {
        assert_eq!(effectiveness_against(Element::Fire, None), Multiplier::NEUTRAL);
    }

    #[test]
    fn multiplier_truncates_and_composes() {
        assert_eq!(Multiplier::STRONG.apply(33), 49);
        assert_eq!(Multiplier::WEAK.apply(33), 16);
        assert_eq!(Multiplier::STRONG.then(Multiplier::STRONG), Multiplier(22_500));
        assert_eq!(Multiplier::STRONG.to_string(), "1.50x");
    }
}
