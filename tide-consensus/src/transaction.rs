//! Transaction validation.
//!
//! A transaction is checked against a chain state snapshot at a specific
//! height:
//!
//! 1. its kind must be enabled by the active features,
//! 2. it must not already be in the state, and it must pay a sufficient fee
//!    in an acceptable asset,
//! 3. its kind-specific payload must be valid.

use tracing::{debug, instrument};

use tide_chain::{block::Height, transaction::Transaction};

use crate::{config::Settings, error::TransactionError, state::ChainState};

pub mod check;
pub mod fee;


pub use crate::state::StateChange;

/// Checks every consensus rule for `tx` against `state` at `height`.
///
/// Returns the state change made by `tx` if it is valid.
#[instrument(skip(state, settings, tx), fields(id = %tx.hash(), kind = %tx.transaction_type()))]
pub fn check_transaction<S: ChainState + ?Sized>(
    state: &S,
    settings: &Settings,
    height: Height,
    tx: &Transaction,
) -> Result<StateChange, TransactionError> {
    check::transaction_kind_is_active(&settings.features, height, tx)?;
    fee::check_fee(state, settings, height, tx)?;
    let change = check::payload_is_valid(settings, tx)?;

    debug!(?change, "transaction is valid");

    Ok(change)
}
