//! Block validation.
//!
//! Transactions in a block are validated in block order, and each one is
//! checked against the state left by the transactions before it. So a
//! block can sponsor an asset and then pay fees with it, but it can't
//! contain the same transaction twice.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use tide_chain::{block::Height, transaction::Transaction};

use crate::{
    config::Settings,
    error::{BlockError, TransactionError},
    state::{BlockDiff, ChainState, PendingState, StateChange},
    transaction::check_transaction,
};

#[cfg(test)]
mod tests;

/// Validates the transactions of the block at `height`, in order, against
/// `state`.
///
/// Returns the changes the block makes to `state`. Stops at the first
/// invalid transaction, and returns its index in the block.
#[instrument(skip(state, settings, transactions), fields(count = transactions.len()))]
pub fn validate_block<S: ChainState + ?Sized>(
    state: &S,
    settings: &Settings,
    height: Height,
    transactions: &[Arc<Transaction>],
) -> Result<BlockDiff, BlockError> {
    if height > Height::MAX {
        return Err(BlockError::MaxHeight(height));
    }

    let mut pending = PendingState::new(state);

    for (index, tx) in transactions.iter().enumerate() {
        let change = check_transaction(&pending, settings, height, tx)
            .map_err(|source| BlockError::Transaction { index, source })?;

        pending.apply(tx.hash(), change);
    }

    let diff = pending.into_diff();

    debug!(
        scripts = diff.scripts.len(),
        sponsorships = diff.sponsorships.len(),
        "validated block"
    );
    metrics::gauge!("block.validated.height").set(height.0 as f64);
    metrics::counter!("block.validated.count").increment(1);

    Ok(diff)
}

/// Checks independent candidate transactions against the same `state`, in
/// parallel.
///
/// Each transaction is checked as if it were the only one in the next
/// block, so conflicts between the candidates are not detected. Results are
/// returned in the same order as `transactions`.
pub fn check_transactions_parallel<S: ChainState + ?Sized>(
    state: &S,
    settings: &Settings,
    height: Height,
    transactions: &[Arc<Transaction>],
) -> Vec<Result<StateChange, TransactionError>> {
    transactions
        .par_iter()
        .map(|tx| check_transaction(state, settings, height, tx))
        .collect()
}
