//! Randomised property tests for fee checks.

use proptest::prelude::*;

use tide_chain::{
    amount::MAX_MONEY,
    asset::Asset,
    block::Height,
    parameters::{ActivationSchedule, BlockchainFeature},
};

use crate::{
    error::FeeError,
    state::MemoryState,
    tests::*,
    transaction::fee::{check_fee, sponsored_fee_in_native, FEE_UNIT},
};

proptest! {
    /// Paying exactly `k` times the sponsored minimum is worth exactly `k`
    /// native fee units.
    #[test]
    fn sponsored_conversion_is_exact(min_fee in 1..=MAX_MONEY / 1000, units in 1u64..1000) {
        let _init_guard = tide_test::init();

        let fee = min_fee as u64 * units;
        prop_assert_eq!(sponsored_fee_in_native(fee, min_fee as u64), units * FEE_UNIT);
    }

    /// The sponsored fee that is worth one fee unit passes the transfer
    /// minimum, and one asset unit less fails it.
    #[test]
    fn sponsored_boundary(min_fee in 1i64..=1_000_000_000) {
        let _init_guard = tide_test::init();

        let state = MemoryState::new().with_sponsorship(sponsored_asset(), sponsorship(min_fee));
        let settings = all_features();

        let exact = transfer(alice(), min_fee, Asset::Issued(sponsored_asset()), 0);
        prop_assert!(check_fee(&state, &settings, HEIGHT, &exact).is_ok());

        let below = transfer(alice(), min_fee - 1, Asset::Issued(sponsored_asset()), 1);
        let rejected = matches!(
            check_fee(&state, &settings, HEIGHT, &below),
            Err(FeeError::InsufficientFee { .. })
        );
        prop_assert!(rejected);
    }

    /// Once a fee is accepted at some height, it stays accepted at every
    /// later height with the same state.
    #[test]
    fn acceptance_is_monotonic_in_height(
        activation in 0u32..1000,
        before in 0u32..2000,
        after in 0u32..2000,
        fee in 0i64..200_000,
    ) {
        let _init_guard = tide_test::init();

        let (before, after) = (before.min(after), before.max(after));
        let settings = settings_with(&[]).with_features(
            ActivationSchedule::empty()
                .with_activation(BlockchainFeature::FeeSponsorship, Height(activation)),
        );
        let state = MemoryState::new().with_sponsorship(sponsored_asset(), sponsorship(1));
        let tx = transfer(alice(), fee, Asset::Issued(sponsored_asset()), 0);

        if check_fee(&state, &settings, Height(before), &tx).is_ok() {
            prop_assert!(check_fee(&state, &settings, Height(after), &tx).is_ok());
        }
    }
}
