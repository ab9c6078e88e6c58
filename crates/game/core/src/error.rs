//! Common error infrastructure for encounter-core.
//!
//! Domain-specific errors (e.g. `EncounterError`, `QuestError`) are defined in
//! their respective modules alongside the operations they validate. This module
//! provides the shared classification every one of them reports through.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error enum with named variants
//! - **Named Conditions**: Every variant names the violated rule; there is no
//!   generic "operation failed"
//! - **Category Classification**: Errors map onto the caller-facing taxonomy
//!   (authorization, precondition, timing, state conflict, capacity)

/// Caller-facing classification of a rejected command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCategory {
    /// Wrong caller, wrong owner, or missing role.
    ///
    /// Examples: attacking with someone else's actor, validator-only update
    Authorization,

    /// Entity inactive or nonexistent, or a prerequisite is missing.
    ///
    /// Examples: monster not found, level too low, required item absent
    Precondition,

    /// Too early or too late.
    ///
    /// Examples: on cooldown, fight window elapsed, hunt expired
    Timing,

    /// The entity is already in the requested (or a terminal) state.
    ///
    /// Examples: already defeated, already completed, seed already initialized
    StateConflict,

    /// A bounded collection is full.
    ///
    /// Examples: raid full, party too large
    Capacity,

    /// Unexpected state inconsistency or missing collaborator.
    ///
    /// These indicate bugs or deployment mistakes and should be investigated.
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable label for this category.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authorization => "authorization",
            Self::Precondition => "precondition",
            Self::Timing => "timing",
            Self::StateConflict => "state_conflict",
            Self::Capacity => "capacity",
            Self::Internal => "internal",
        }
    }

    /// Returns true if retrying later may succeed without changing the command.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timing)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all encounter-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Error codes are stable, upper-case identifiers suitable for metrics
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the caller-facing category of this error.
    fn category(&self) -> ErrorCategory;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_timing_errors_are_retryable() {
        assert!(ErrorCategory::Timing.is_retryable());
        assert!(!ErrorCategory::StateConflict.is_retryable());
        assert!(!ErrorCategory::Capacity.is_retryable());
        assert!(ErrorCategory::Internal.is_internal());
    }
}
