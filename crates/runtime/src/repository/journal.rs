//! Audit journal entries.

use serde::{Deserialize, Serialize};

use encounter_core::{
    Command, ErrorCategory, ExecuteError, GameError, Identity, Receipt, RewardGrant, Timestamp,
};

/// One sequenced command, committed or rejected, or the settlement of a
/// committed command's refused grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Position in the journal. Rejections take a position too.
    pub sequence: u64,
    pub at: Timestamp,
    pub caller: Identity,
    pub command: Command,
    pub outcome: JournalOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalOutcome {
    Committed {
        receipt: Receipt,
        /// Hex SHA-256 over the committed state, when it could be computed.
        state_root: Option<String>,
    },
    /// Written after a commit when the minter refused some of its grants.
    /// Repeats the committed entry's caller, command and time.
    Unpaid {
        /// Nonce of the committed command.
        nonce: u64,
        grants: Vec<RewardGrant>,
    },
    Rejected {
        code: String,
        category: ErrorCategory,
        message: String,
    },
}

impl JournalOutcome {
    pub fn rejected(error: &ExecuteError) -> Self {
        JournalOutcome::Rejected {
            code: error.error_code().to_string(),
            category: error.category(),
            message: error.to_string(),
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, JournalOutcome::Committed { .. })
    }

    /// Refused grants recorded by an `Unpaid` entry.
    pub fn unpaid(&self) -> &[RewardGrant] {
        match self {
            JournalOutcome::Unpaid { grants, .. } => grants,
            _ => &[],
        }
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            JournalOutcome::Committed { receipt, .. } => Some(receipt),
            JournalOutcome::Rejected { .. } | JournalOutcome::Unpaid { .. } => None,
        }
    }
}
