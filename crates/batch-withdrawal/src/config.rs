use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for the withdrawal executor and the bundled clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WithdrawalConfig {
    /// Chain assumed when the wallet does not report one.
    pub default_chain_id: u64,
    /// Pause before asking the wallet to sign, giving a UI time to settle.
    pub submit_delay_ms: u64,
    /// Per-request timeout for JSON-RPC calls.
    pub rpc_timeout_ms: u64,
    /// Gas limit as a percentage of the node's estimate.
    pub gas_limit_multiplier_percent: u64,
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            default_chain_id: 1,
            submit_delay_ms: 0,
            rpc_timeout_ms: 30_000,
            gas_limit_multiplier_percent: 120,
        }
    }
}

impl WithdrawalConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_timeout_ms == 0 {
            return Err(ConfigError::Invalid("rpcTimeoutMs must be non-zero".into()));
        }
        if self.gas_limit_multiplier_percent < 100 {
            return Err(ConfigError::Invalid(format!(
                "gasLimitMultiplierPercent must be at least 100, got {}",
                self.gas_limit_multiplier_percent
            )));
        }
        Ok(())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}
