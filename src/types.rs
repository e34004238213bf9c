//! Shared types for the Babylon keyring core.
//!
//! Data structures that cross module boundaries are defined here for
//! consistent serialization against the chain's LCD/RPC JSON surfaces.

use serde::{Deserialize, Serialize};

/// A denominated amount. Amounts travel as decimal strings the way the
/// Cosmos SDK renders them; `amount_raw` parses on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }

    /// Parsed integer amount; unparseable chain data counts as zero.
    pub fn amount_raw(&self) -> u128 {
        self.amount.parse::<u128>().unwrap_or(0)
    }
}

/// Fee attached to a Direct-mode transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
}

/// Account number and sequence as reported by the auth module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_number: u64,
    pub sequence: u64,
}

/// Outcome of a `broadcast_tx_sync` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastResult {
    pub tx_hash: String,
    pub code: u32,
    pub log: String,
}

impl BroadcastResult {
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Per-address accrual record from the incentive module. Read-only;
/// fetched per query and never cached.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RewardGauge {
    #[serde(default)]
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub withdrawn_coins: Vec<Coin>,
}

/// Gas usage reported by a dry-run simulation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulatedGas {
    pub gas_used: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_amount_raw() {
        assert_eq!(Coin::new("ubbn", 1_000_000).amount_raw(), 1_000_000);

        let garbage = Coin {
            denom: "ubbn".to_string(),
            amount: "not-a-number".to_string(),
        };
        assert_eq!(garbage.amount_raw(), 0);
    }

    #[test]
    fn test_broadcast_result_success() {
        let ok = BroadcastResult {
            tx_hash: "AB12".to_string(),
            code: 0,
            log: String::new(),
        };
        assert!(ok.is_success());

        let failed = BroadcastResult {
            tx_hash: "AB12".to_string(),
            code: 5,
            log: "insufficient funds".to_string(),
        };
        assert!(!failed.is_success());
    }

    #[test]
    fn test_reward_gauge_deserializes_missing_fields() {
        let gauge: RewardGauge = serde_json::from_str("{}").unwrap();
        assert!(gauge.coins.is_empty());
        assert!(gauge.withdrawn_coins.is_empty());
    }
}
