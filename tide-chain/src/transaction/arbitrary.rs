//! Arbitrary data generation for transaction proptests

use chrono::{DateTime, Utc};
use proptest::{collection::vec, option, prelude::*};

use crate::{
    account::{Address, PublicKey},
    amount::Amount,
    asset::{Asset, AssetId},
};

use super::*;

/// Generate a millisecond-precision timestamp between 2015 and 2100.
fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    (1_420_070_400_000i64..4_102_444_800_000i64).prop_map(|millis| {
        DateTime::<Utc>::from_timestamp_millis(millis).expect("millis are in range")
    })
}

fn attachment_strategy() -> impl Strategy<Value = Vec<u8>> {
    vec(any::<u8>(), 0..=MAX_ATTACHMENT_LENGTH)
}

impl Arbitrary for TransactionKind {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        use TransactionKind::*;

        prop_oneof![
            (any::<Address>(), any::<Amount>())
                .prop_map(|(recipient, amount)| Genesis { recipient, amount }),
            (any::<Address>(), any::<Amount>())
                .prop_map(|(recipient, amount)| Payment { recipient, amount }),
            ("[a-z]{4,16}", ".{0,32}", any::<Amount>(), 0u8..=8, any::<bool>()).prop_map(
                |(name, description, quantity, decimals, reissuable)| Issue {
                    name,
                    description,
                    quantity,
                    decimals,
                    reissuable,
                }
            ),
            (
                any::<Address>(),
                any::<Asset>(),
                any::<Amount>(),
                attachment_strategy()
            )
                .prop_map(|(recipient, asset, amount, attachment)| Transfer {
                    recipient,
                    asset,
                    amount,
                    attachment,
                }),
            (any::<AssetId>(), any::<Amount>(), any::<bool>()).prop_map(
                |(asset, quantity, reissuable)| Reissue {
                    asset,
                    quantity,
                    reissuable,
                }
            ),
            (any::<AssetId>(), any::<Amount>()).prop_map(|(asset, amount)| Burn { asset, amount }),
            (any::<Address>(), any::<Amount>())
                .prop_map(|(recipient, amount)| Lease { recipient, amount }),
            any::<Hash>().prop_map(|lease_id| LeaseCancel { lease_id }),
            "[a-z0-9]{4,30}".prop_map(|alias| CreateAlias { alias }),
            (
                any::<Asset>(),
                vec(
                    (any::<Address>(), any::<Amount>()),
                    0..=MAX_MASS_TRANSFER_COUNT
                ),
                attachment_strategy()
            )
                .prop_map(|(asset, transfers, attachment)| MassTransfer {
                    asset,
                    transfers,
                    attachment,
                }),
            vec(
                ("[a-z]{1,16}", vec(any::<u8>(), 0..256))
                    .prop_map(|(key, value)| DataEntry { key, value }),
                0..16
            )
            .prop_map(|entries| Data { entries }),
            option::of(vec(any::<u8>(), 0..512)).prop_map(|script| SetScript { script }),
            (any::<AssetId>(), option::of(any::<Amount>())).prop_map(
                |(asset, min_sponsored_asset_fee)| SponsorFee {
                    asset,
                    min_sponsored_asset_fee,
                }
            ),
        ]
        .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for Transaction {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        (
            any::<TransactionKind>(),
            any::<PublicKey>(),
            any::<Amount>(),
            any::<Asset>(),
            timestamp_strategy(),
            vec(vec(any::<u8>(), 0..=MAX_PROOF_LENGTH).prop_map(Proof), 0..=MAX_PROOF_COUNT),
        )
            .prop_map(|(kind, sender, fee, fee_asset, timestamp, proofs)| {
                Transaction::new(kind, sender, fee, fee_asset, timestamp, proofs)
                    .expect("generated transactions are structurally valid")
            })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
