//! Combat resolution system.
//!
//! This module provides pure functions for resolving combat interactions.
//! Encounter state is mutated by the boss-fight and hunt transitions; nothing
//! here touches it.
//!
//! # Core Functions
//!
//! - `compute_damage`: base damage from stats, weapon affinity and alignment

pub mod damage;

pub use damage::compute_damage;
