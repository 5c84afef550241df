//! Fee and sponsorship rules.
//!
//! Every transaction pays at least a minimum fee, measured in native
//! currency units. Fees can be paid in a sponsored asset once
//! [`BlockchainFeature::FeeSponsorship`] is active: the asset's sponsorship
//! record says how many asset units are worth one fee unit.
//!
//! Accounts with a script pay [`SCRIPT_EXTRA_FEE`] on top of the minimum, and
//! must pay in the native currency.

use tracing::{instrument, trace};

use tide_chain::{
    account::Address,
    asset::Asset,
    block::Height,
    parameters::{BlockchainFeature, FeatureActivation},
    transaction::{Transaction, TransactionKind},
};

use crate::{config::Settings, error::FeeError, state::ChainState};

/// The native value of one fee unit: the minimum fee of a transfer.
pub const FEE_UNIT: u64 = 100_000;

/// The extra fee paid by accounts with a script, in native units.
pub const SCRIPT_EXTRA_FEE: u64 = 4 * FEE_UNIT;

/// The number of data transaction bytes covered by one fee unit.
const DATA_BYTES_PER_FEE_UNIT: u64 = 1024;

/// Returns the minimum fee of `tx` in native units, before any script
/// premium.
pub fn minimum_fee(tx: &Transaction) -> u64 {
    use TransactionKind::*;

    let units = match tx.kind() {
        Genesis { .. } => 0,
        Payment { .. }
        | Transfer { .. }
        | Burn { .. }
        | Lease { .. }
        | LeaseCancel { .. }
        | CreateAlias { .. } => 1,
        Issue { .. } | Reissue { .. } | SponsorFee { .. } => 1000,
        SetScript { .. } => 10,
        MassTransfer { transfers, .. } => 1 + (transfers.len() as u64 + 1) / 2,
        Data { .. } => {
            let size = tx.serialized_size() as u64;
            1 + size.saturating_sub(1) / DATA_BYTES_PER_FEE_UNIT
        }
    };

    units * FEE_UNIT
}

/// Returns the native value of `fee` units of an asset sponsored at
/// `min_sponsored_asset_fee` units per fee unit.
///
/// Rounds down, so the payer never gets more than they paid for.
pub fn sponsored_fee_in_native(fee: u64, min_sponsored_asset_fee: u64) -> u64 {
    if min_sponsored_asset_fee == 0 {
        return 0;
    }

    let native = u128::from(fee) * u128::from(FEE_UNIT) / u128::from(min_sponsored_asset_fee);
    u64::try_from(native).unwrap_or(u64::MAX)
}

/// Checks that `tx` pays a sufficient fee in an acceptable asset, given the
/// chain `state` and the features active at `height`.
///
/// Rejects transactions that are already in `state`, before checking the fee.
#[instrument(skip(state, settings, tx), fields(id = %tx.hash()))]
pub fn check_fee<S: ChainState + ?Sized>(
    state: &S,
    settings: &Settings,
    height: Height,
    tx: &Transaction,
) -> Result<(), FeeError> {
    metrics::counter!("tx.fee.checked").increment(1);

    let result = fee_is_sufficient(state, settings, height, tx);
    if result.is_err() {
        metrics::counter!("tx.fee.rejected").increment(1);
    }

    result
}

fn fee_is_sufficient<S: ChainState + ?Sized>(
    state: &S,
    settings: &Settings,
    height: Height,
    tx: &Transaction,
) -> Result<(), FeeError> {
    let id = tx.hash();
    if state.contains_transaction(&id)? {
        return Err(FeeError::AlreadyInTheState { id });
    }

    let features = &settings.features;
    let mut required = minimum_fee(tx);

    if features.is_active(BlockchainFeature::SmartAccounts, height) {
        let sender = Address::from_public_key(settings.network, &tx.sender());
        if state.script_of(&sender)?.is_some() {
            if !tx.fee_asset().is_native() {
                return Err(FeeError::ScriptedAccountRequiresWaves);
            }
            required = required.saturating_add(SCRIPT_EXTRA_FEE);
        }
    }

    let fee = u64::from(tx.fee());
    let actual = match tx.fee_asset() {
        Asset::Native => fee,
        Asset::Issued(asset) if features.is_active(BlockchainFeature::FeeSponsorship, height) => {
            let sponsorship = state
                .sponsorship_of(&asset)?
                .ok_or(FeeError::AssetNotSponsored { asset })?;

            sponsored_fee_in_native(fee, sponsorship.min_sponsored_asset_fee().into())
        }
        // Issued assets are worth nothing as fees before sponsorship.
        Asset::Issued(_) => 0,
    };

    trace!(required, actual, fee_asset = %tx.fee_asset(), "checked fee");

    if actual < required {
        return Err(FeeError::InsufficientFee { required, actual });
    }

    Ok(())
}
