//! Chain configuration.
//!
//! Network parameters (endpoints, chain id, denom, gas defaults) are
//! supplied by the embedding wallet; this module only defines their shape
//! and the fee arithmetic derived from them.

use crate::address::Bech32Address;
use crate::error::{KeyringError, KeyringResult};
use crate::types::{Coin, Fee};
use serde::{Deserialize, Serialize};

/// Gas multiplier applied when the UI asks for headroom on an estimate.
pub const GAS_ADJUSTMENT_WITH_MARGIN: f64 = 1.3;

/// Static parameters of one Cosmos SDK chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Tendermint RPC endpoint (broadcast).
    pub rpc_url: String,
    /// gRPC-gateway / LCD endpoint (queries).
    pub lcd_url: String,
    pub chain_id: String,
    pub bech32_prefix: String,
    pub denom: String,
    pub display_decimals: u8,
    /// Price per gas unit in the native denom.
    pub gas_price: f64,
    pub default_gas_limit: u64,
}

impl ChainConfig {
    pub fn babylon_testnet() -> Self {
        Self {
            rpc_url: "https://babylon-testnet-rpc.polkachu.com".to_string(),
            lcd_url: "https://babylon-testnet-api.polkachu.com".to_string(),
            chain_id: "bbn-test-5".to_string(),
            bech32_prefix: "bbn".to_string(),
            denom: "ubbn".to_string(),
            display_decimals: 6,
            gas_price: 0.002,
            default_gas_limit: 200_000,
        }
    }

    /// Fee for a given gas limit: `ceil(gas_price * gas_limit * adjustment)`
    /// in the native denom. Adjustment defaults to 1.0.
    pub fn compute_fee(&self, gas_limit: u64, gas_adjustment: Option<f64>) -> Fee {
        let adjustment = gas_adjustment.unwrap_or(1.0);
        let amount = (self.gas_price * gas_limit as f64 * adjustment).ceil() as u128;
        Fee {
            amount: vec![Coin::new(self.denom.clone(), amount)],
            gas_limit,
        }
    }

    /// Check that an address parses as Bech32 and carries this chain's prefix.
    pub fn validate_address(&self, address: &str) -> KeyringResult<Bech32Address> {
        let expected = format!("{}1", self.bech32_prefix);
        if !address.starts_with(&expected) {
            return Err(KeyringError::InvalidAddress(format!(
                "expected prefix '{}', got '{}'",
                self.bech32_prefix, address
            )));
        }
        Bech32Address::parse(address)
    }
}
