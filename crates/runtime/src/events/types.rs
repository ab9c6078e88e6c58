//! Event payloads published by the sequencer.

use serde::{Deserialize, Serialize};

use encounter_core::{ErrorCategory, Identity, Receipt, RewardGrant};

/// Outcome of one sequenced command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CommandEvent {
    Committed {
        /// Journal position.
        sequence: u64,
        caller: Identity,
        command: String,
        receipt: Receipt,
    },
    Rejected {
        sequence: u64,
        caller: Identity,
        command: String,
        code: String,
        category: ErrorCategory,
        message: String,
    },
}

/// What the minter did with a grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RewardEvent {
    Paid {
        /// Engine nonce of the command that earned the grant.
        nonce: u64,
        /// Identity that owns the rewarded actor and received the payout.
        owner: Identity,
        grant: RewardGrant,
    },
    Failed {
        nonce: u64,
        /// `None` when the actor's owner could not be resolved.
        owner: Option<Identity>,
        grant: RewardGrant,
        reason: String,
    },
}
