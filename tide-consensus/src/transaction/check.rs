//! Transaction checks.
//!
//! Code in this file can freely assume that every transaction is
//! structurally valid, because [`Transaction`] values are checked when they
//! are constructed or parsed.

use std::sync::Arc;

use tide_chain::{
    account::Address,
    amount::Amount,
    asset::Sponsorship,
    block::Height,
    parameters::{BlockchainFeature, FeatureActivation},
    transaction::{Transaction, TransactionKind},
};
use tide_script::{CompilerContext, Script, ScriptLimits};

use crate::{config::Settings, error::TransactionError, state::StateChange};

/// Returns the feature that enables transactions of this kind, if it needs
/// one.
pub fn required_feature(kind: &TransactionKind) -> Option<BlockchainFeature> {
    use TransactionKind::*;

    match kind {
        MassTransfer { .. } => Some(BlockchainFeature::MassTransfer),
        Data { .. } => Some(BlockchainFeature::DataTransaction),
        SetScript { .. } => Some(BlockchainFeature::SmartAccounts),
        SponsorFee { .. } => Some(BlockchainFeature::FeeSponsorship),
        _ => None,
    }
}

/// Checks that the kind of `tx` is enabled at `height`.
pub fn transaction_kind_is_active(
    features: impl FeatureActivation,
    height: Height,
    tx: &Transaction,
) -> Result<(), TransactionError> {
    match required_feature(tx.kind()) {
        Some(feature) if !features.is_active(feature, height) => {
            Err(TransactionError::FeatureNotActivated {
                feature,
                transaction_type: tx.transaction_type(),
                height,
            })
        }
        _ => Ok(()),
    }
}

/// Parses and checks a serialized account script.
///
/// Scripts are checked in the full version 1 context, and must satisfy
/// `limits`.
pub fn set_script_is_valid(script: &[u8], limits: &ScriptLimits) -> Result<Script, TransactionError> {
    Ok(Script::from_bytes(script, CompilerContext::v1(), limits)?)
}

/// Checks a sponsorship update.
///
/// `None` cancels the sponsorship. The minimum fee must be positive.
pub fn sponsorship_is_valid(
    min_sponsored_asset_fee: Option<Amount>,
) -> Result<Option<Sponsorship>, TransactionError> {
    min_sponsored_asset_fee
        .map(|fee| Sponsorship::new(fee).ok_or(TransactionError::ZeroSponsorship))
        .transpose()
}

/// Checks the kind-specific payload of `tx`, and returns the state change it
/// makes if it is valid.
pub fn payload_is_valid(settings: &Settings, tx: &Transaction) -> Result<StateChange, TransactionError> {
    let change = match tx.kind() {
        TransactionKind::SetScript { script } => {
            let script = script
                .as_deref()
                .map(|bytes| set_script_is_valid(bytes, &settings.script_limits))
                .transpose()?
                .map(Arc::new);

            StateChange::SetScript {
                account: Address::from_public_key(settings.network, &tx.sender()),
                script,
            }
        }
        TransactionKind::SponsorFee {
            asset,
            min_sponsored_asset_fee,
        } => StateChange::SetSponsorship {
            asset: *asset,
            sponsorship: sponsorship_is_valid(*min_sponsored_asset_fee)?,
        },
        _ => StateChange::None,
    };

    Ok(change)
}
