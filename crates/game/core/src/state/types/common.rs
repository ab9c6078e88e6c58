use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Character controlled by a player. Owned by the character collaborator.
    ActorId,
    "actor"
);
define_id!(
    /// Administratively created monster definition.
    MonsterId,
    "monster"
);
define_id!(
    /// Live or sealed boss fight.
    FightId,
    "fight"
);
define_id!(
    /// Repeatable hunt definition.
    HuntId,
    "hunt"
);
define_id!(
    /// Ability definition.
    AbilityId,
    "ability"
);
define_id!(
    /// Quest template.
    QuestId,
    "quest"
);
define_id!(
    /// Party roster managed by the party collaborator.
    PartyId,
    "party"
);
define_id!(
    /// Item definition managed by the item collaborator.
    ItemId,
    "item"
);

/// Account that owns actors and receives rewards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identity(pub u64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// Transaction timestamp in seconds.
///
/// Every expiry and cooldown is evaluated by comparing the current command's
/// timestamp against stored start/duration fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(ActorId(7).to_string(), "actor#7");
        assert_eq!(FightId(0).to_string(), "fight#0");
    }

    #[test]
    fn timestamp_arithmetic_saturates() {
        assert_eq!(Timestamp(u64::MAX) + 5, Timestamp(u64::MAX));
        assert_eq!(Timestamp(3).since(Timestamp(10)), 0);
        assert_eq!(Timestamp(10).since(Timestamp(3)), 7);
    }
}
