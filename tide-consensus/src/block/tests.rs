//! Tests for block validation.

use std::sync::Arc;

use color_eyre::eyre::Result;

use tide_chain::{
    amount::Amount,
    asset::Asset,
    block::Height,
    parameters::BlockchainFeature,
    transaction::{Transaction, TransactionKind},
};

use crate::{
    error::{BlockError, FeeError, TransactionError},
    state::{ChainState, MemoryState, StateChange},
    tests::*,
};

use super::{check_transactions_parallel, validate_block};

fn block(transactions: &[&Transaction]) -> Vec<Arc<Transaction>> {
    transactions.iter().map(|tx| Arc::new((*tx).clone())).collect()
}

#[test]
fn empty_block_is_valid() -> Result<()> {
    let _init_guard = tide_test::init();

    let diff = validate_block(&MemoryState::new(), &all_features(), HEIGHT, &[])?;
    assert!(diff.transactions.is_empty());

    Ok(())
}

#[test]
fn duplicate_in_one_block_is_rejected() {
    let _init_guard = tide_test::init();

    let tx = transfer(alice(), 100_000, Asset::Native, 0);
    let other = transfer(bob(), 100_000, Asset::Native, 1);

    // Whichever copy comes second is rejected.
    for (transactions, index) in [
        (block(&[&tx, &tx]), 1),
        (block(&[&tx, &other, &tx]), 2),
    ] {
        assert_eq!(
            validate_block(&MemoryState::new(), &all_features(), HEIGHT, &transactions),
            Err(BlockError::Transaction {
                index,
                source: TransactionError::Fee(FeeError::AlreadyInTheState { id: tx.hash() }),
            })
        );
    }
}

#[test]
fn duplicate_of_history_is_rejected() -> Result<()> {
    let _init_guard = tide_test::init();

    let tx = transfer(alice(), 100_000, Asset::Native, 0);
    let mut state = MemoryState::new();

    let diff = validate_block(&state, &all_features(), HEIGHT, &block(&[&tx]))?;
    state.commit(diff);

    let next = (HEIGHT + 1).expect("valid height");
    let err = validate_block(&state, &all_features(), next, &block(&[&tx]))
        .expect_err("transaction is already in the state");
    assert_eq!(err.transaction_index(), Some(0));
    assert!(matches!(
        err,
        BlockError::Transaction {
            source: TransactionError::Fee(FeeError::AlreadyInTheState { .. }),
            ..
        }
    ));

    Ok(())
}

#[test]
fn sponsorship_applies_to_later_transactions() -> Result<()> {
    let _init_guard = tide_test::init();

    let sponsor = transaction(
        TransactionKind::SponsorFee {
            asset: sponsored_asset(),
            min_sponsored_asset_fee: Some(Amount::new(10)),
        },
        bob(),
        100_000_000,
        Asset::Native,
        0,
    );
    let pay_with_asset = transfer(alice(), 10, Asset::Issued(sponsored_asset()), 1);

    let state = MemoryState::new();

    // Before the sponsorship, the asset can't pay fees.
    assert!(matches!(
        validate_block(&state, &all_features(), HEIGHT, &block(&[&pay_with_asset, &sponsor])),
        Err(BlockError::Transaction {
            index: 0,
            source: TransactionError::Fee(FeeError::AssetNotSponsored { .. }),
        })
    ));

    let diff = validate_block(&state, &all_features(), HEIGHT, &block(&[&sponsor, &pay_with_asset]))?;
    assert_eq!(diff.transactions, vec![sponsor.hash(), pay_with_asset.hash()]);
    assert_eq!(
        diff.sponsorships.get(&sponsored_asset()),
        Some(&Some(sponsorship(10)))
    );

    Ok(())
}

#[test]
fn set_script_applies_to_later_transactions() -> Result<()> {
    let _init_guard = tide_test::init();

    let set_script = transaction(
        TransactionKind::SetScript {
            script: Some(accept_all().bytes().to_vec()),
        },
        alice(),
        1_000_000,
        Asset::Native,
        0,
    );
    let base_fee = transfer(alice(), 100_000, Asset::Native, 1);
    let scripted_fee = transfer(alice(), 500_000, Asset::Native, 2);

    let state = MemoryState::new();
    let settings = all_features();

    assert!(matches!(
        validate_block(&state, &settings, HEIGHT, &block(&[&set_script, &base_fee])),
        Err(BlockError::Transaction {
            index: 1,
            source: TransactionError::Fee(FeeError::InsufficientFee {
                required: 500_000,
                actual: 100_000,
            }),
        })
    ));

    let mut state = state;
    let diff = validate_block(&state, &settings, HEIGHT, &block(&[&set_script, &scripted_fee]))?;
    state.commit(diff);
    assert!(state.script_of(&address_of(&alice()))?.is_some());

    Ok(())
}

#[test]
fn inactive_kind_is_rejected_with_index() {
    let _init_guard = tide_test::init();

    let ok = transfer(alice(), 100_000, Asset::Native, 0);
    let data = transaction(
        TransactionKind::Data { entries: vec![] },
        alice(),
        100_000,
        Asset::Native,
        1,
    );
    let settings = settings_with(&[BlockchainFeature::SmartAccounts]);

    let err = validate_block(&MemoryState::new(), &settings, HEIGHT, &block(&[&ok, &data]))
        .expect_err("data transactions are not active");
    assert_eq!(err.transaction_index(), Some(1));
}

#[test]
fn height_over_maximum_is_rejected() {
    let _init_guard = tide_test::init();

    let height = Height(Height::MAX_AS_U32 + 1);
    assert_eq!(
        validate_block(&MemoryState::new(), &all_features(), height, &[]),
        Err(BlockError::MaxHeight(height))
    );
}

#[test]
fn parallel_checks_match_sequential_checks() {
    let _init_guard = tide_test::init();

    let state = MemoryState::new().with_sponsorship(sponsored_asset(), sponsorship(10));
    let settings = all_features();

    let transactions: Vec<Arc<Transaction>> = (0..64)
        .map(|nonce| {
            let fee_asset = if nonce % 2 == 0 {
                Asset::Native
            } else {
                Asset::Issued(sponsored_asset())
            };
            Arc::new(transfer(alice(), nonce * 10_000, fee_asset, nonce))
        })
        .collect();

    let parallel = check_transactions_parallel(&state, &settings, HEIGHT, &transactions);
    assert_eq!(parallel.len(), transactions.len());

    for (tx, result) in transactions.iter().zip(parallel) {
        let sequential = crate::transaction::check_transaction(&state, &settings, HEIGHT, tx);
        assert_eq!(result, sequential);
        if let Ok(change) = result {
            assert_eq!(change, StateChange::None);
        }
    }
}
