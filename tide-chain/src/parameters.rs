//! Consensus parameters for each Tide network.
//!
//! This module contains the consensus parameters which are required for
//! validation.
//!
//! Some consensus rules change based on blockchain features. Each feature is
//! activated at a particular block height, and stays active at every later
//! height. Rules that depend on a feature are accessed via a
//! [`FeatureActivation`] implementation and a `block::Height`.

mod feature;
mod network;

pub use feature::*;
pub use network::Network;

#[cfg(test)]
mod tests;
