//! Deterministic, auditable random streams.
//!
//! Every (actor, context) pair owns an independent stream. Value `i` of a draw
//! is `SHA-256(seed ‖ be(nonce + i))`, and each draw advances the nonce by the
//! number of values returned, so any value can be recomputed later from the
//! seed and the nonce it was drawn at.
//!
//! # Trust boundary
//!
//! The stream is only as unpredictable as its seed. Anyone who learns a seed
//! (or the engine's world seed for auto-seeded streams) can predict every
//! future roll of that stream. This generator is an audit device, not a
//! randomness beacon.

use std::collections::BTreeMap;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::config::EngineConfig;
use crate::error::{ErrorCategory, GameError};
use crate::state::ActorId;

/// 32-byte stream seed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seed(pub [u8; 32]);

impl Seed {
    /// Derives the seed used when the engine opens a stream on its own.
    pub fn derive(world_seed: &[u8; 32], actor: ActorId, context: RandomContext) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(world_seed);
        hasher.update(actor.0.to_be_bytes());
        hasher.update(context.tag());
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}

/// One 256-bit output of a stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomWord(pub [u8; 32]);

impl RandomWord {
    /// Interprets the leading eight bytes as a big-endian integer.
    pub fn as_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(head)
    }

    /// Returns a value in `[0, bound)`; zero when `bound` is zero.
    pub fn roll_below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.as_u64() % bound
    }
}

/// Purpose a stream is used for.
///
/// Separate contexts keep loot rolls from shifting when combat rolls change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RandomContext {
    Combat,
    Loot,
    Ability,
    Custom(u32),
}

impl RandomContext {
    /// Stable encoding mixed into derived seeds: a discriminant byte followed
    /// by the full big-endian custom value.
    pub const fn tag(self) -> [u8; 5] {
        let (discriminant, value) = match self {
            Self::Combat => (0u8, 0u32),
            Self::Loot => (1, 0),
            Self::Ability => (2, 0),
            Self::Custom(value) => (3, value),
        };
        let value = value.to_be_bytes();
        [discriminant, value[0], value[1], value[2], value[3]]
    }
}

/// Seed and nonce of one stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomState {
    pub seed: Seed,
    pub nonce: u64,
}

/// Computes the stream value at `nonce`.
pub fn derive_value(seed: &Seed, nonce: u64) -> RandomWord {
    let mut hasher = Sha256::new();
    hasher.update(seed.0);
    hasher.update(nonce.to_be_bytes());
    RandomWord(hasher.finalize().into())
}

/// Recomputes a hash chain and checks it against previously drawn values.
pub fn verify(values: &[RandomWord], seed: &Seed, start_nonce: u64) -> bool {
    values.iter().enumerate().all(|(offset, value)| {
        start_nonce
            .checked_add(offset as u64)
            .is_some_and(|nonce| derive_value(seed, nonce) == *value)
    })
}

/// Picks the first entry whose cumulative weight exceeds `roll`.
///
/// `roll` is expected in `[0, total_weight)`. Zero-weight entries can never be
/// selected. Returns `None` for an empty or weightless list.
pub fn weighted_pick<T>(entries: &[T], weight: impl Fn(&T) -> u64, roll: u64) -> Option<&T> {
    let mut cumulative = 0u64;
    for entry in entries {
        cumulative = cumulative.saturating_add(weight(entry));
        if cumulative > roll {
            return Some(entry);
        }
    }
    None
}

/// Errors raised by the random generator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RngError {
    #[error("seed already initialized for {actor} in {context:?}")]
    AlreadyInitialized {
        actor: ActorId,
        context: RandomContext,
    },

    #[error("no seed initialized for {actor} in {context:?}")]
    NotInitialized {
        actor: ActorId,
        context: RandomContext,
    },

    #[error("draw count {count} outside 1..={max}", max = EngineConfig::MAX_DRAW)]
    InvalidCount { count: u32 },

    #[error("nonce exhausted for {actor} in {context:?}")]
    NonceExhausted {
        actor: ActorId,
        context: RandomContext,
    },
}

impl GameError for RngError {
    fn category(&self) -> ErrorCategory {
        match self {
            RngError::AlreadyInitialized { .. } => ErrorCategory::StateConflict,
            RngError::NotInitialized { .. } | RngError::InvalidCount { .. } => {
                ErrorCategory::Precondition
            }
            RngError::NonceExhausted { .. } => ErrorCategory::Capacity,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RngError::AlreadyInitialized { .. } => "RNG_ALREADY_INITIALIZED",
            RngError::NotInitialized { .. } => "RNG_NOT_INITIALIZED",
            RngError::InvalidCount { .. } => "RNG_INVALID_COUNT",
            RngError::NonceExhausted { .. } => "RNG_NONCE_EXHAUSTED",
        }
    }
}

/// Result of a draw: the values and the nonce the first one was drawn at.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Draw {
    pub start_nonce: u64,
    pub values: Vec<RandomWord>,
}

/// All random streams known to the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomGenerator {
    streams: BTreeMap<(ActorId, RandomContext), RandomState>,
}

impl RandomGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, actor: ActorId, context: RandomContext) -> Option<&RandomState> {
        self.streams.get(&(actor, context))
    }

    pub fn is_initialized(&self, actor: ActorId, context: RandomContext) -> bool {
        self.streams.contains_key(&(actor, context))
    }

    /// Opens a stream with an explicit seed.
    pub fn initialize_seed(
        &mut self,
        actor: ActorId,
        context: RandomContext,
        seed: Seed,
    ) -> Result<(), RngError> {
        if self.is_initialized(actor, context) {
            return Err(RngError::AlreadyInitialized { actor, context });
        }
        self.streams
            .insert((actor, context), RandomState { seed, nonce: 0 });
        Ok(())
    }

    /// Draws `count` values and advances the stream's nonce by `count`.
    pub fn draw(
        &mut self,
        actor: ActorId,
        context: RandomContext,
        count: u32,
    ) -> Result<Draw, RngError> {
        if count == 0 || count > EngineConfig::MAX_DRAW {
            return Err(RngError::InvalidCount { count });
        }
        let stream = self
            .streams
            .get_mut(&(actor, context))
            .ok_or(RngError::NotInitialized { actor, context })?;

        let start_nonce = stream.nonce;
        let next_nonce = start_nonce
            .checked_add(u64::from(count))
            .ok_or(RngError::NonceExhausted { actor, context })?;

        let values = (0..u64::from(count))
            .map(|offset| derive_value(&stream.seed, start_nonce + offset))
            .collect();
        stream.nonce = next_nonce;

        Ok(Draw {
            start_nonce,
            values,
        })
    }

    /// Draws from a stream, opening it from the world seed first if needed.
    pub fn draw_or_seed(
        &mut self,
        actor: ActorId,
        context: RandomContext,
        count: u32,
        world_seed: &[u8; 32],
    ) -> Result<Draw, RngError> {
        if !self.is_initialized(actor, context) {
            tracing::debug!(%actor, ?context, "auto-seeding random stream");
            self.initialize_seed(actor, context, Seed::derive(world_seed, actor, context))?;
        }
        self.draw(actor, context, count)
    }
}
