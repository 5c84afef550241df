//! Consensus parameter tests for Tide.

#![allow(clippy::unwrap_in_result)]

use std::{collections::HashSet, convert::TryFrom};

use proptest::prelude::*;

use crate::block::Height;

use super::*;

use BlockchainFeature::*;
use Network::*;

/// Check that the feature ids are unique and round-trip.
#[test]
fn feature_ids_are_stable() {
    let _init_guard = tide_test::init();

    let ids: HashSet<u16> = BlockchainFeature::ALL.iter().map(|f| f.id()).collect();
    assert_eq!(ids.len(), BlockchainFeature::ALL.len());

    for feature in BlockchainFeature::ALL {
        assert_eq!(BlockchainFeature::try_from(feature.id()), Ok(feature));
    }

    assert_eq!(SmartAccounts.id(), 4);
    assert_eq!(FeeSponsorship.id(), 7);
    assert_eq!(
        BlockchainFeature::try_from(99),
        Err(UnknownFeatureError(99))
    );
}

/// Check that each network schedules every feature exactly once.
#[test]
fn activation_lists_are_complete() {
    let _init_guard = tide_test::init();

    for heights in [MAINNET_ACTIVATION_HEIGHTS, TESTNET_ACTIVATION_HEIGHTS] {
        let features: HashSet<BlockchainFeature> = heights.iter().map(|(f, _)| *f).collect();
        assert_eq!(features.len(), heights.len());
        assert_eq!(features.len(), BlockchainFeature::ALL.len());
    }
}

#[test]
fn activation_boundary_mainnet() {
    let _init_guard = tide_test::init();
    activation_boundary(Mainnet)
}

#[test]
fn activation_boundary_testnet() {
    let _init_guard = tide_test::init();
    activation_boundary(Testnet)
}

/// Check that every feature switches on exactly at its activation height.
fn activation_boundary(network: Network) {
    let schedule = ActivationSchedule::for_network(network);

    for (feature, height) in schedule.iter() {
        assert!(schedule.is_active(feature, height));
        assert!(schedule.is_active(feature, Height::MAX));

        if let Some(previous) = height - 1 {
            assert!(!schedule.is_active(feature, previous));
        }
    }
}

#[test]
fn unscheduled_features_are_never_active() {
    let _init_guard = tide_test::init();

    let schedule = ActivationSchedule::empty();
    assert_eq!(schedule.activation_height(SmartAccounts), None);
    assert!(!schedule.is_active(SmartAccounts, Height::MAX));
    assert!(schedule.active_at(Height::MAX).is_empty());
}

#[test]
fn pre_activated_features_are_active_from_genesis() {
    let _init_guard = tide_test::init();

    let schedule = ActivationSchedule::pre_activated([SmartAccounts, FeeSponsorship])
        .with_activation(MassTransfer, Height(10));

    assert!(schedule.is_active(SmartAccounts, Height(0)));
    assert!(schedule.is_active(FeeSponsorship, Height(0)));
    assert!(!schedule.is_active(MassTransfer, Height(9)));
    assert_eq!(
        schedule.active_at(Height(10)),
        vec![MassTransfer, SmartAccounts, FeeSponsorship]
    );
}

#[test]
fn network_names() {
    let _init_guard = tide_test::init();

    assert_eq!("mainnet".parse::<Network>().ok(), Some(Mainnet));
    assert_eq!("TESTNET".parse::<Network>().ok(), Some(Testnet));
    assert!("regtest".parse::<Network>().is_err());
    assert_eq!(Testnet.lowercase_name(), "testnet");
    assert_ne!(Mainnet.chain_id(), Testnet.chain_id());
}

proptest! {
    /// Once a feature is active, it stays active at every later height.
    #[test]
    fn feature_activation_is_monotonic(
        schedule in any::<ActivationSchedule>(),
        feature in any::<BlockchainFeature>(),
        h1 in any::<Height>(),
        h2 in any::<Height>(),
    ) {
        let (low, high) = if h1 <= h2 { (h1, h2) } else { (h2, h1) };

        if schedule.is_active(feature, low) {
            prop_assert!(schedule.is_active(feature, high));
        }
    }
}
