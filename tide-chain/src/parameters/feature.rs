//! Blockchain features and their activation heights.

use std::{
    collections::BTreeMap,
    convert::TryFrom,
    fmt,
};

use thiserror::Error;

use crate::{block::Height, parameters::Network};

#[cfg(any(test, feature = "proptest-impl"))]
use proptest_derive::Arbitrary;

use BlockchainFeature::*;

/// A blockchain feature.
///
/// Features switch consensus rules on at a specific block height, without a
/// new node binary. Once a feature is active it stays active.
///
/// Feature ids are consensus-critical: they appear in node configuration and
/// in feature votes, so they must never be renumbered.
///
/// `SmallerMinimalGeneratingBalance`, `Ng` and `BurnAnyTokens` are reserved:
/// they change block production and asset rules, not transaction admission,
/// so no check here depends on them. They are kept so their ids stay
/// valid in configuration and activation tables.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "proptest-impl"), derive(Arbitrary))]
#[serde(try_from = "u16", into = "u16")]
pub enum BlockchainFeature {
    /// Lowers the minimal generating balance. Reserved.
    SmallerMinimalGeneratingBalance,
    /// Next-generation block production. Reserved.
    Ng,
    /// Enables `MassTransfer` transactions.
    MassTransfer,
    /// Enables account scripts and `SetScript` transactions.
    SmartAccounts,
    /// Enables `Data` transactions.
    DataTransaction,
    /// Allows any holder to burn an asset. Reserved.
    BurnAnyTokens,
    /// Enables fee sponsorship and `SponsorFee` transactions.
    FeeSponsorship,
}

impl BlockchainFeature {
    /// Every known feature, in id order.
    pub const ALL: [BlockchainFeature; 7] = [
        SmallerMinimalGeneratingBalance,
        Ng,
        MassTransfer,
        SmartAccounts,
        DataTransaction,
        BurnAnyTokens,
        FeeSponsorship,
    ];

    /// Returns the stable numeric id of this feature.
    pub fn id(&self) -> u16 {
        match self {
            SmallerMinimalGeneratingBalance => 1,
            Ng => 2,
            MassTransfer => 3,
            SmartAccounts => 4,
            DataTransaction => 5,
            BurnAnyTokens => 6,
            FeeSponsorship => 7,
        }
    }

    /// Returns a human-readable description of this feature.
    pub fn description(&self) -> &'static str {
        match self {
            SmallerMinimalGeneratingBalance => "Minimum Generating Balance of 1000 coins",
            Ng => "NG Protocol",
            MassTransfer => "Mass Transfer Transaction",
            SmartAccounts => "Smart Accounts",
            DataTransaction => "Data Transaction",
            BurnAnyTokens => "Burn Any Tokens",
            FeeSponsorship => "Fee Sponsorship",
        }
    }
}

impl fmt::Display for BlockchainFeature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.id())
    }
}

/// An error returned when converting an unknown feature id.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
#[error("unknown blockchain feature id {0}")]
pub struct UnknownFeatureError(pub u16);

impl TryFrom<u16> for BlockchainFeature {
    type Error = UnknownFeatureError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        BlockchainFeature::ALL
            .iter()
            .copied()
            .find(|feature| feature.id() == id)
            .ok_or(UnknownFeatureError(id))
    }
}

impl From<BlockchainFeature> for u16 {
    fn from(feature: BlockchainFeature) -> u16 {
        feature.id()
    }
}

/// Mainnet feature activation heights.
///
/// # Correctness
///
/// Don't use this directly; use [`ActivationSchedule::for_network`] so that
/// node configuration can pre-activate features.
pub(super) const MAINNET_ACTIVATION_HEIGHTS: &[(BlockchainFeature, Height)] = &[
    (SmallerMinimalGeneratingBalance, Height(0)),
    (Ng, Height(0)),
    (MassTransfer, Height(500_000)),
    (SmartAccounts, Height(1_080_000)),
    (DataTransaction, Height(1_080_000)),
    (BurnAnyTokens, Height(1_080_000)),
    (FeeSponsorship, Height(1_090_000)),
];

/// Testnet feature activation heights.
///
/// # Correctness
///
/// Don't use this directly; use [`ActivationSchedule::for_network`] so that
/// node configuration can pre-activate features.
pub(super) const TESTNET_ACTIVATION_HEIGHTS: &[(BlockchainFeature, Height)] = &[
    (SmallerMinimalGeneratingBalance, Height(0)),
    (Ng, Height(0)),
    (MassTransfer, Height(100)),
    (SmartAccounts, Height(200)),
    (DataTransaction, Height(200)),
    (BurnAnyTokens, Height(200)),
    (FeeSponsorship, Height(300)),
];

/// The query contract for blockchain feature activation.
///
/// Implementations are read-only views of already-materialized chain history
/// or configuration. Queries are synchronous and never block.
pub trait FeatureActivation {
    /// Returns the activation height of `feature`, or `None` if the feature
    /// isn't scheduled.
    fn activation_height(&self, feature: BlockchainFeature) -> Option<Height>;

    /// Returns true if `feature` is active at `height`.
    ///
    /// A feature is active at its activation height and every later height.
    fn is_active(&self, feature: BlockchainFeature, height: Height) -> bool {
        self.activation_height(feature)
            .map_or(false, |activation_height| height >= activation_height)
    }
}

/// An immutable snapshot of feature activation heights.
///
/// Validation receives this snapshot explicitly, so checks can be replayed
/// against any historical height.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActivationSchedule {
    heights: BTreeMap<BlockchainFeature, Height>,
}

impl ActivationSchedule {
    /// Returns a schedule where no feature is active at any height.
    pub fn empty() -> ActivationSchedule {
        ActivationSchedule::default()
    }

    /// Returns the default activation schedule for `network`.
    pub fn for_network(network: Network) -> ActivationSchedule {
        let heights = match network {
            Network::Mainnet => MAINNET_ACTIVATION_HEIGHTS,
            Network::Testnet => TESTNET_ACTIVATION_HEIGHTS,
        };

        ActivationSchedule {
            heights: heights.iter().copied().collect(),
        }
    }

    /// Returns a schedule with every feature in `features` active from genesis.
    pub fn pre_activated(features: impl IntoIterator<Item = BlockchainFeature>) -> ActivationSchedule {
        ActivationSchedule {
            heights: features
                .into_iter()
                .map(|feature| (feature, Height::MIN))
                .collect(),
        }
    }

    /// Returns a copy of this schedule, with `feature` activated at `height`.
    ///
    /// Replaces any existing activation height for `feature`.
    pub fn with_activation(mut self, feature: BlockchainFeature, height: Height) -> Self {
        self.heights.insert(feature, height);
        self
    }

    /// Returns the scheduled features and their activation heights, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockchainFeature, Height)> + '_ {
        self.heights.iter().map(|(feature, height)| (*feature, *height))
    }

    /// Returns every feature that is active at `height`.
    pub fn active_at(&self, height: Height) -> Vec<BlockchainFeature> {
        self.iter()
            .filter(|(_, activation_height)| height >= *activation_height)
            .map(|(feature, _)| feature)
            .collect()
    }
}

impl FeatureActivation for ActivationSchedule {
    fn activation_height(&self, feature: BlockchainFeature) -> Option<Height> {
        self.heights.get(&feature).copied()
    }
}

impl<T: FeatureActivation + ?Sized> FeatureActivation for &T {
    fn activation_height(&self, feature: BlockchainFeature) -> Option<Height> {
        (**self).activation_height(feature)
    }
}

#[cfg(any(test, feature = "proptest-impl"))]
impl proptest::arbitrary::Arbitrary for ActivationSchedule {
    type Parameters = ();

    fn arbitrary_with(_args: ()) -> Self::Strategy {
        use proptest::prelude::*;

        proptest::collection::btree_map(any::<BlockchainFeature>(), any::<Height>(), 0..8)
            .prop_map(|heights| ActivationSchedule { heights })
            .boxed()
    }

    type Strategy = proptest::strategy::BoxedStrategy<Self>;
}
