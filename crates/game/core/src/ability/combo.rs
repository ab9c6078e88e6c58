//! Combo rules and per-actor cast history.
//!
//! A combo is an ordered element sequence cast within a time window. Rules
//! are evaluated in registration order and the first match wins.

use arrayvec::ArrayVec;

use crate::ability::{AbilityError, Element, Multiplier};
use crate::config::EngineConfig;
use crate::state::Timestamp;

/// Registered combo.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboRule {
    pub elements: ArrayVec<Element, { EngineConfig::MAX_COMBO_LENGTH }>,
    pub bonus: Multiplier,
    /// Seconds between the first and last cast of the sequence.
    pub window: u64,
}

impl ComboRule {
    /// Builds a rule, rejecting sequences outside `2..=MAX_COMBO_LENGTH`.
    pub fn new(elements: &[Element], bonus: Multiplier, window: u64) -> Result<Self, AbilityError> {
        if elements.len() < 2 {
            return Err(AbilityError::ComboTooShort { len: elements.len() });
        }
        if elements.len() > EngineConfig::MAX_COMBO_LENGTH {
            return Err(AbilityError::ComboTooLong { len: elements.len() });
        }
        let elements = elements
            .iter()
            .copied()
            .collect::<ArrayVec<_, { EngineConfig::MAX_COMBO_LENGTH }>>();
        Ok(Self {
            elements,
            bonus,
            window,
        })
    }

    /// Validates a rule that arrived through deserialization.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.elements.len() < 2 {
            return Err("combo needs at least two elements");
        }
        if self.bonus.bps() == 0 {
            return Err("combo bonus must be positive");
        }
        Ok(())
    }

    fn is_suffix_of(&self, sequence: &[Element]) -> bool {
        sequence.ends_with(&self.elements)
    }
}

/// One remembered cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cast {
    pub element: Element,
    pub at: Timestamp,
}

/// Bounded rolling history of an actor's casts, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboHistory {
    casts: ArrayVec<Cast, { EngineConfig::COMBO_HISTORY }>,
}

impl ComboHistory {
    pub fn record(&mut self, element: Element, at: Timestamp) {
        if self.casts.is_full() {
            self.casts.remove(0);
        }
        self.casts.push(Cast { element, at });
    }

    pub fn casts(&self) -> &[Cast] {
        &self.casts
    }

    /// Elements cast no more than `window` seconds before `now`, oldest first.
    fn within(&self, window: u64, now: Timestamp) -> ArrayVec<Element, { EngineConfig::COMBO_HISTORY }> {
        self.casts
            .iter()
            .filter(|cast| now.since(cast.at) <= window && cast.at <= now)
            .map(|cast| cast.element)
            .collect()
    }
}

/// Ordered combo rule registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboBook {
    rules: Vec<ComboRule>,
}

impl ComboBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: ComboRule) -> Result<usize, AbilityError> {
        rule.validate().map_err(AbilityError::InvalidDefinition)?;
        self.rules.push(rule);
        Ok(self.rules.len() - 1)
    }

    pub fn rules(&self) -> &[ComboRule] {
        &self.rules
    }

    /// Matches a claimed cast sequence.
    ///
    /// The sequence is truncated to its last `MAX_COMBO_LENGTH` entries. A rule
    /// matches when its elements end the truncated sequence and the actor's
    /// own history, restricted to the rule window, ends the same way.
    pub fn check(
        &self,
        history: Option<&ComboHistory>,
        sequence: &[Element],
        now: Timestamp,
    ) -> Result<Multiplier, AbilityError> {
        if sequence.len() < 2 {
            return Err(AbilityError::ComboTooShort { len: sequence.len() });
        }
        let start = sequence.len().saturating_sub(EngineConfig::MAX_COMBO_LENGTH);
        let claimed = &sequence[start..];

        let Some(history) = history else {
            return Ok(Multiplier::NEUTRAL);
        };

        Ok(self
            .rules
            .iter()
            .find(|rule| rule.is_suffix_of(claimed) && rule.is_suffix_of(&history.within(rule.window, now)))
            .map_or(Multiplier::NEUTRAL, |rule| rule.bonus))
    }

    /// Finds the first rule completed by the actor's most recent casts.
    pub fn detect(&self, history: &ComboHistory, now: Timestamp) -> Option<&ComboRule> {
        self.rules
            .iter()
            .find(|rule| rule.is_suffix_of(&history.within(rule.window, now)))
    }
}
