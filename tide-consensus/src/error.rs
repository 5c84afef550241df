//! Errors that can occur when checking consensus rules.
//!
//! Each error variant corresponds to a consensus rule, so enumerating
//! all possible verification failures enumerates the consensus rules we
//! implement, and ensures that we don't reject blocks or transactions
//! for a non-enumerated reason.

use thiserror::Error;

use tide_chain::{
    asset::AssetId,
    block::Height,
    parameters::{BlockchainFeature, UnknownFeatureError},
    transaction::{self, TransactionType},
};
use tide_script::ScriptError;

/// A chain state lookup failed.
///
/// State errors are not consensus rules: they abort validation instead of
/// rejecting the transaction.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum StateError {
    #[error("chain state is unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FeeError {
    #[error("fee is worth {actual} native units, the minimum is {required}")]
    InsufficientFee { required: u64, actual: u64 },

    #[error("asset {asset} is not sponsored, so it can't pay fees")]
    AssetNotSponsored { asset: AssetId },

    #[error("scripted accounts must pay fees in the native currency")]
    ScriptedAccountRequiresWaves,

    #[error("transaction {id} is already in the state")]
    AlreadyInTheState { id: transaction::Hash },

    #[error("could not read the chain state")]
    State(#[from] StateError),
}

impl FeeError {
    /// Returns true if this error comes from the state, rather than from the
    /// transaction.
    pub fn is_state_error(&self) -> bool {
        matches!(self, FeeError::State(_))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum TransactionError {
    #[error("{transaction_type} transactions require {feature}, which is not active at height {height}")]
    FeatureNotActivated {
        feature: BlockchainFeature,
        transaction_type: TransactionType,
        height: Height,
    },

    #[error("transaction fee is invalid")]
    Fee(#[from] FeeError),

    #[error("account script is invalid")]
    Script(#[from] ScriptError),

    #[error("sponsorship minimum fee must be positive")]
    ZeroSponsorship,
}

impl From<StateError> for TransactionError {
    fn from(err: StateError) -> TransactionError {
        TransactionError::Fee(FeeError::State(err))
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum BlockError {
    #[error("transaction {index} in block is invalid")]
    Transaction {
        index: usize,
        #[source]
        source: TransactionError,
    },

    #[error("block height {0:?} is greater than the maximum height")]
    MaxHeight(Height),
}

impl BlockError {
    /// Returns the index of the invalid transaction, if a transaction was
    /// rejected.
    pub fn transaction_index(&self) -> Option<usize> {
        match self {
            BlockError::Transaction { index, .. } => Some(*index),
            BlockError::MaxHeight(_) => None,
        }
    }
}

/// The node configuration is invalid.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pre-activated feature id is unknown")]
    UnknownFeature(#[from] UnknownFeatureError),

    #[error("activation height {0} for feature {1} is greater than the maximum height")]
    InvalidHeight(u32, BlockchainFeature),
}
