//! Reward minter: the side-effect sink for committed grants.
//!
//! Grants name the actor that earned them; the sequencer resolves the actor's
//! owner through the actor oracle and pays that identity. The sequencer hands
//! every grant to a [`RewardMinter`] after the command that produced it has
//! committed and been journaled. A refused grant never rolls the command back;
//! it is journaled as unpaid and published on the rewards topic.

use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

use encounter_core::{Identity, ItemId, RewardGrant, RewardSource};

/// Items minted per item grant.
pub const ITEM_GRANT_AMOUNT: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MinterError {
    #[error("minter refused grant: {0}")]
    Refused(String),

    #[error("minter ledger lock was poisoned")]
    LockPoisoned,
}

/// External token and item issuer, keyed by owner identity.
pub trait RewardMinter: Send + Sync {
    fn mint_reward(
        &self,
        recipient: Identity,
        amount: u64,
        source: RewardSource,
    ) -> Result<(), MinterError>;

    fn mint_item(
        &self,
        recipient: Identity,
        item: ItemId,
        amount: u64,
        source: RewardSource,
    ) -> Result<(), MinterError>;

    /// Routes a grant to the matching mint call, paying `owner`.
    fn mint(&self, owner: Identity, grant: &RewardGrant) -> Result<(), MinterError> {
        match *grant {
            RewardGrant::Token { amount, source, .. } => self.mint_reward(owner, amount, source),
            RewardGrant::Item { item, source, .. } => {
                self.mint_item(owner, item, ITEM_GRANT_AMOUNT, source)
            }
        }
    }
}

/// An item handed out by [`InMemoryMinter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintedItem {
    pub recipient: Identity,
    pub item: ItemId,
    pub amount: u64,
    pub source: RewardSource,
}

#[derive(Debug, Default)]
struct Ledger {
    balances: BTreeMap<Identity, u64>,
    items: Vec<MintedItem>,
}

/// Minter that keeps balances in memory.
#[derive(Debug, Default)]
pub struct InMemoryMinter {
    ledger: RwLock<Ledger>,
}

impl InMemoryMinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, owner: Identity) -> Result<u64, MinterError> {
        let ledger = self.ledger.read().map_err(|_| MinterError::LockPoisoned)?;
        Ok(ledger.balances.get(&owner).copied().unwrap_or(0))
    }

    /// Every identity holding a balance, in identity order.
    pub fn balances(&self) -> Result<Vec<(Identity, u64)>, MinterError> {
        let ledger = self.ledger.read().map_err(|_| MinterError::LockPoisoned)?;
        Ok(ledger
            .balances
            .iter()
            .map(|(owner, balance)| (*owner, *balance))
            .collect())
    }

    pub fn items(&self) -> Result<Vec<MintedItem>, MinterError> {
        let ledger = self.ledger.read().map_err(|_| MinterError::LockPoisoned)?;
        Ok(ledger.items.clone())
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Result<u64, MinterError> {
        let ledger = self.ledger.read().map_err(|_| MinterError::LockPoisoned)?;
        Ok(ledger
            .balances
            .values()
            .fold(0u64, |total, balance| total.saturating_add(*balance)))
    }
}

impl RewardMinter for InMemoryMinter {
    fn mint_reward(
        &self,
        recipient: Identity,
        amount: u64,
        _source: RewardSource,
    ) -> Result<(), MinterError> {
        let mut ledger = self.ledger.write().map_err(|_| MinterError::LockPoisoned)?;
        let balance = ledger.balances.entry(recipient).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| MinterError::Refused(format!("balance of {recipient} would overflow")))?;
        Ok(())
    }

    fn mint_item(
        &self,
        recipient: Identity,
        item: ItemId,
        amount: u64,
        source: RewardSource,
    ) -> Result<(), MinterError> {
        let mut ledger = self.ledger.write().map_err(|_| MinterError::LockPoisoned)?;
        ledger.items.push(MintedItem {
            recipient,
            item,
            amount,
            source,
        });
        Ok(())
    }
}
