//! Configuration for transaction and block validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tide_chain::{
    block::Height,
    parameters::{ActivationSchedule, BlockchainFeature, Network},
};
use tide_script::ScriptLimits;

use crate::error::ConfigError;

/// Configuration for consensus validation.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    /// The network whose feature activation heights are used.
    pub network: Network,

    /// Features activated at a configured height, by feature id.
    ///
    /// These heights replace the network defaults. This is a developer-only
    /// option, used to test features before they activate on a public
    /// network.
    ///
    /// # Security
    ///
    /// A node with different activation heights follows different consensus
    /// rules from the rest of its network.
    pub pre_activated_features: BTreeMap<u16, u32>,

    /// The maximum serialized size of an account script, in bytes.
    pub max_script_size: usize,
}

// we like our default configs to be explicit
#[allow(unknown_lints)]
#[allow(clippy::derivable_impls)]
impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            pre_activated_features: BTreeMap::new(),
            max_script_size: ScriptLimits::MAX_SIZE,
        }
    }
}

impl Config {
    /// Resolve this configuration into validation settings.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let mut features = ActivationSchedule::for_network(self.network);

        for (&id, &height) in &self.pre_activated_features {
            let feature = BlockchainFeature::try_from(id)?;
            if height > Height::MAX_AS_U32 {
                return Err(ConfigError::InvalidHeight(height, feature));
            }

            features = features.with_activation(feature, Height(height));
        }

        Ok(Settings {
            network: self.network,
            features,
            script_limits: ScriptLimits {
                max_size: self.max_script_size,
                ..ScriptLimits::default()
            },
        })
    }
}

/// The resolved consensus parameters that validation runs with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// The network, used to derive account addresses.
    pub network: Network,
    /// Feature activation heights.
    pub features: ActivationSchedule,
    /// Account script limits.
    pub script_limits: ScriptLimits,
}

impl Settings {
    /// Returns the default settings for `network`.
    pub fn for_network(network: Network) -> Settings {
        Settings {
            network,
            features: ActivationSchedule::for_network(network),
            script_limits: ScriptLimits::default(),
        }
    }

    /// Returns a copy of these settings with a different activation schedule.
    pub fn with_features(mut self, features: ActivationSchedule) -> Settings {
        self.features = features;
        self
    }
}

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;

    use tide_chain::parameters::FeatureActivation;

    use super::*;

    #[test]
    fn default_config_uses_network_schedule() -> Result<()> {
        let _init_guard = tide_test::init();

        let settings = Config::default().settings()?;
        assert_eq!(settings, Settings::for_network(Network::Mainnet));
        assert_eq!(settings.script_limits.max_complexity, 2000);

        Ok(())
    }

    #[test]
    fn pre_activated_features_override_network_heights() -> Result<()> {
        let _init_guard = tide_test::init();

        let config: Config = serde_json::from_str(
            r#"{ "network": "Testnet", "pre_activated_features": { "7": 5 }, "max_script_size": 4096 }"#,
        )?;
        let settings = config.settings()?;

        assert_eq!(settings.network, Network::Testnet);
        assert_eq!(
            settings.features.activation_height(BlockchainFeature::FeeSponsorship),
            Some(Height(5))
        );
        assert_eq!(
            settings.features.activation_height(BlockchainFeature::SmartAccounts),
            Some(Height(200))
        );
        assert_eq!(settings.script_limits.max_size, 4096);

        Ok(())
    }

    #[test]
    fn invalid_config_is_rejected() {
        let _init_guard = tide_test::init();

        let unknown_field = serde_json::from_str::<Config>(r#"{ "checkpoint_sync": true }"#);
        assert!(unknown_field.is_err());

        let mut config = Config::default();
        config.pre_activated_features.insert(99, 1);
        assert!(matches!(
            config.settings(),
            Err(ConfigError::UnknownFeature(_))
        ));

        let mut config = Config::default();
        config.pre_activated_features.insert(4, u32::MAX);
        assert_eq!(
            config.settings(),
            Err(ConfigError::InvalidHeight(
                u32::MAX,
                BlockchainFeature::SmartAccounts
            ))
        );
    }
}
