//! The chain state that validation reads, and the changes it produces.
//!
//! Validation only needs three facts about the chain: the sponsorship record
//! of an asset, the script attached to an account, and whether a
//! transaction is already in the chain. [`ChainState`] provides them from
//! an immutable snapshot.
//!
//! Transactions in a block are validated in order, and later transactions
//! see the changes of earlier ones. [`PendingState`] layers those changes
//! over a snapshot without modifying it.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tide_chain::{
    account::Address,
    asset::{AssetId, Sponsorship},
    transaction,
};
use tide_script::Script;

use crate::error::StateError;

#[cfg(test)]
mod tests;

/// Read access to a chain state snapshot.
///
/// Lookups take `&self`, so one snapshot can serve many concurrent
/// validations.
pub trait ChainState: Send + Sync {
    /// Returns the sponsorship record of `asset`, if it is sponsored.
    fn sponsorship_of(&self, asset: &AssetId) -> Result<Option<Sponsorship>, StateError>;

    /// Returns the script attached to `account`, if it has one.
    fn script_of(&self, account: &Address) -> Result<Option<Arc<Script>>, StateError>;

    /// Returns true if the transaction with `id` is already in the chain.
    fn contains_transaction(&self, id: &transaction::Hash) -> Result<bool, StateError>;
}

impl<S: ChainState + ?Sized> ChainState for &S {
    fn sponsorship_of(&self, asset: &AssetId) -> Result<Option<Sponsorship>, StateError> {
        (**self).sponsorship_of(asset)
    }

    fn script_of(&self, account: &Address) -> Result<Option<Arc<Script>>, StateError> {
        (**self).script_of(account)
    }

    fn contains_transaction(&self, id: &transaction::Hash) -> Result<bool, StateError> {
        (**self).contains_transaction(id)
    }
}

impl<S: ChainState + ?Sized> ChainState for Arc<S> {
    fn sponsorship_of(&self, asset: &AssetId) -> Result<Option<Sponsorship>, StateError> {
        (**self).sponsorship_of(asset)
    }

    fn script_of(&self, account: &Address) -> Result<Option<Arc<Script>>, StateError> {
        (**self).script_of(account)
    }

    fn contains_transaction(&self, id: &transaction::Hash) -> Result<bool, StateError> {
        (**self).contains_transaction(id)
    }
}

/// The state change made by a single valid transaction, apart from
/// recording its id.
#[derive(Clone, Debug, PartialEq)]
pub enum StateChange {
    /// The transaction only spends and moves value.
    None,
    /// Attaches a script to an account, or clears it.
    SetScript {
        account: Address,
        script: Option<Arc<Script>>,
    },
    /// Sets or cancels the sponsorship of an asset.
    SetSponsorship {
        asset: AssetId,
        sponsorship: Option<Sponsorship>,
    },
}

/// The changes made by a sequence of valid transactions.
///
/// Later changes to the same account or asset replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockDiff {
    /// The ids of the transactions, in block order.
    pub transactions: Vec<transaction::Hash>,
    /// The final script of each account whose script changed.
    pub scripts: HashMap<Address, Option<Arc<Script>>>,
    /// The final sponsorship of each asset whose sponsorship changed.
    pub sponsorships: HashMap<AssetId, Option<Sponsorship>>,
}

impl BlockDiff {
    /// Record a valid transaction and its state change.
    pub fn push(&mut self, id: transaction::Hash, change: StateChange) {
        self.transactions.push(id);

        match change {
            StateChange::None => {}
            StateChange::SetScript { account, script } => {
                self.scripts.insert(account, script);
            }
            StateChange::SetSponsorship { asset, sponsorship } => {
                self.sponsorships.insert(asset, sponsorship);
            }
        }
    }
}

/// A snapshot with the changes of earlier transactions in a block applied.
pub struct PendingState<'a, S: ChainState + ?Sized> {
    base: &'a S,
    seen: HashSet<transaction::Hash>,
    diff: BlockDiff,
}

impl<'a, S: ChainState + ?Sized> PendingState<'a, S> {
    /// Returns an empty overlay on `base`.
    pub fn new(base: &'a S) -> Self {
        Self {
            base,
            seen: HashSet::new(),
            diff: BlockDiff::default(),
        }
    }

    /// Apply the changes of a valid transaction.
    pub fn apply(&mut self, id: transaction::Hash, change: StateChange) {
        self.seen.insert(id);
        self.diff.push(id, change);
    }

    /// Returns the accumulated changes.
    pub fn into_diff(self) -> BlockDiff {
        self.diff
    }
}

impl<'a, S: ChainState + ?Sized> ChainState for PendingState<'a, S> {
    fn sponsorship_of(&self, asset: &AssetId) -> Result<Option<Sponsorship>, StateError> {
        match self.diff.sponsorships.get(asset) {
            Some(pending) => Ok(*pending),
            None => self.base.sponsorship_of(asset),
        }
    }

    fn script_of(&self, account: &Address) -> Result<Option<Arc<Script>>, StateError> {
        match self.diff.scripts.get(account) {
            Some(pending) => Ok(pending.clone()),
            None => self.base.script_of(account),
        }
    }

    fn contains_transaction(&self, id: &transaction::Hash) -> Result<bool, StateError> {
        if self.seen.contains(id) {
            return Ok(true);
        }

        self.base.contains_transaction(id)
    }
}

/// An in-memory chain state.
///
/// Used by tests, and by tools that validate transactions without a
/// database.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    sponsorships: HashMap<AssetId, Sponsorship>,
    scripts: HashMap<Address, Arc<Script>>,
    transactions: HashSet<transaction::Hash>,
}

impl MemoryState {
    /// Returns an empty state.
    pub fn new() -> MemoryState {
        MemoryState::default()
    }

    /// Returns this state with `asset` sponsored.
    pub fn with_sponsorship(mut self, asset: AssetId, sponsorship: Sponsorship) -> Self {
        self.sponsorships.insert(asset, sponsorship);
        self
    }

    /// Returns this state with `script` attached to `account`.
    pub fn with_script(mut self, account: Address, script: Script) -> Self {
        self.scripts.insert(account, Arc::new(script));
        self
    }

    /// Returns this state with the transaction `id` in the chain.
    pub fn with_transaction(mut self, id: transaction::Hash) -> Self {
        self.transactions.insert(id);
        self
    }

    /// Returns the number of transactions in this state.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Commit the changes of a validated block.
    ///
    /// The diff must come from validating against this state, so the block's
    /// transactions are new.
    pub fn commit(&mut self, diff: BlockDiff) {
        self.transactions.extend(diff.transactions);

        for (account, script) in diff.scripts {
            match script {
                Some(script) => self.scripts.insert(account, script),
                None => self.scripts.remove(&account),
            };
        }

        for (asset, sponsorship) in diff.sponsorships {
            match sponsorship {
                Some(sponsorship) => self.sponsorships.insert(asset, sponsorship),
                None => self.sponsorships.remove(&asset),
            };
        }
    }
}

impl ChainState for MemoryState {
    fn sponsorship_of(&self, asset: &AssetId) -> Result<Option<Sponsorship>, StateError> {
        Ok(self.sponsorships.get(asset).copied())
    }

    fn script_of(&self, account: &Address) -> Result<Option<Arc<Script>>, StateError> {
        Ok(self.scripts.get(account).cloned())
    }

    fn contains_transaction(&self, id: &transaction::Hash) -> Result<bool, StateError> {
        Ok(self.transactions.contains(id))
    }
}
