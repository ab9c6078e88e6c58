/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Damage every attack starts from before stats and items are added.
    pub base_damage_floor: u64,

    /// Seconds an actor must wait between two boss attacks.
    pub combat_cooldown: u64,

    /// Reward pool bonus per boss fight participant, in percent.
    pub participant_bonus_pct: u64,

    /// Seed mixed into auto-seeded random streams.
    ///
    /// Anyone who knows this value and an actor id can predict that actor's
    /// engine-seeded rolls. Treat it as an audit key, not a secret.
    pub world_seed: [u8; 32],
}

impl EngineConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum distinct attackers recorded on one boss fight.
    pub const MAX_PARTICIPANTS: usize = 256;
    /// Width of the derived participation mask.
    pub const PARTICIPATION_WORD_BITS: u32 = 64;
    /// Longest element sequence a combo rule may declare.
    pub const MAX_COMBO_LENGTH: usize = 5;
    /// Recent casts remembered per actor for combo detection.
    pub const COMBO_HISTORY: usize = 8;
    /// Status effects tracked per target.
    pub const MAX_STATUS_EFFECTS: usize = 8;
    /// Largest number of values a single draw may return.
    pub const MAX_DRAW: u32 = 32;

    /// Basis point denominator used by multipliers and drop chances.
    pub const BPS: u64 = 10_000;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_DAMAGE_FLOOR: u64 = 10;
    pub const DEFAULT_COMBAT_COOLDOWN: u64 = 30;
    pub const DEFAULT_PARTICIPANT_BONUS_PCT: u64 = 1;

    pub fn new() -> Self {
        Self {
            base_damage_floor: Self::DEFAULT_BASE_DAMAGE_FLOOR,
            combat_cooldown: Self::DEFAULT_COMBAT_COOLDOWN,
            participant_bonus_pct: Self::DEFAULT_PARTICIPANT_BONUS_PCT,
            world_seed: [0u8; 32],
        }
    }

    pub fn with_world_seed(mut self, world_seed: [u8; 32]) -> Self {
        self.world_seed = world_seed;
        self
    }

    pub fn with_combat_cooldown(mut self, combat_cooldown: u64) -> Self {
        self.combat_cooldown = combat_cooldown;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
