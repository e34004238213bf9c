//! Chain RPC/LCD client.
//!
//! Read queries go through the gRPC-gateway (LCD) REST surface; broadcast
//! goes through Tendermint JSON-RPC. The client is stateless per request,
//! never retries, and never caches chain state. Timeouts and retry policy
//! belong to the caller.

use crate::config::ChainConfig;
use crate::error::{KeyringError, KeyringResult};
use crate::types::{AccountInfo, BroadcastResult, Coin, RewardGauge, SimulatedGas};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// HTTP client bound to one chain's endpoints.
pub struct ChainClient {
    http: reqwest::Client,
    config: ChainConfig,
}

impl ChainClient {
    pub fn new(config: ChainConfig) -> KeyringResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Account number and sequence for signing.
    /// `GET /cosmos/auth/v1beta1/accounts/{address}`
    pub async fn account_info(&self, address: &str) -> KeyringResult<AccountInfo> {
        let url = format!("{}/cosmos/auth/v1beta1/accounts/{}", self.config.lcd_url, address);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| KeyringError::SequenceFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(KeyringError::SequenceFetch(format!(
                "account query returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| KeyringError::SequenceFetch(e.to_string()))?;
        parse_account(&body)
    }

    /// Balance of one denom.
    /// `GET /cosmos/bank/v1beta1/balances/{address}/by_denom?denom={denom}`
    pub async fn balance(&self, address: &str, denom: &str) -> KeyringResult<Coin> {
        #[derive(serde::Deserialize)]
        struct BalanceResponse {
            balance: Option<Coin>,
        }

        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}/by_denom?denom={}",
            self.config.lcd_url, address, denom
        );
        let response: BalanceResponse = self.http.get(&url).send().await?.json().await?;
        Ok(response.balance.unwrap_or_else(|| Coin::new(denom, 0)))
    }

    /// Reward gauge for one category, or `None` when the chain has no gauge
    /// record for this address. A staker with no delegation history has no
    /// gauge, so not-found is a valid state and not an error.
    /// `GET /babylon/incentive/address/{address}/reward_gauge`
    pub async fn reward_gauge(
        &self,
        address: &str,
        category: &str,
    ) -> KeyringResult<Option<RewardGauge>> {
        let url = format!(
            "{}/babylon/incentive/address/{}/reward_gauge",
            self.config.lcd_url, address
        );
        let response = self.http.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(KeyringError::Network(format!(
                "reward gauge query returned {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_reward_gauge(&body, category)
    }

    /// Dry-run the transaction for gas estimation.
    /// `POST /cosmos/tx/v1beta1/simulate`
    pub async fn simulate(&self, tx_bytes: &[u8]) -> KeyringResult<SimulatedGas> {
        let url = format!("{}/cosmos/tx/v1beta1/simulate", self.config.lcd_url);
        let body: Value = self
            .http
            .post(&url)
            .json(&json!({ "tx_bytes": BASE64.encode(tx_bytes) }))
            .send()
            .await?
            .json()
            .await?;
        parse_simulation(&body)
    }

    /// Submit a signed transaction via Tendermint `broadcast_tx_sync`.
    /// A non-zero check-tx code is a `Broadcast` error.
    pub async fn broadcast_tx_sync(&self, tx_bytes: &[u8]) -> KeyringResult<BroadcastResult> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "broadcast_tx_sync",
            "params": { "tx": BASE64.encode(tx_bytes) },
        });
        let body: Value = self
            .http
            .post(&self.config.rpc_url)
            .json(&request)
            .send()
            .await?
            .json()
            .await?;
        parse_broadcast(&body)
    }
}

fn parse_account(body: &Value) -> KeyringResult<AccountInfo> {
    // Vesting and module accounts nest the numbers under base_account.
    let account = &body["account"];
    let account = if account["base_account"].is_object() {
        &account["base_account"]
    } else {
        account
    };

    let parse_u64 = |field: &str| -> KeyringResult<u64> {
        let value = &account[field];
        value
            .as_str()
            .and_then(|s| s.parse::<u64>().ok())
            .or_else(|| value.as_u64())
            .ok_or_else(|| {
                KeyringError::SequenceFetch(format!("missing or malformed '{}'", field))
            })
    };

    Ok(AccountInfo {
        account_number: parse_u64("account_number")?,
        sequence: parse_u64("sequence")?,
    })
}

fn parse_reward_gauge(body: &Value, category: &str) -> KeyringResult<Option<RewardGauge>> {
    let mut gauges: HashMap<String, RewardGauge> =
        serde_json::from_value(body["reward_gauges"].clone()).unwrap_or_default();
    Ok(gauges.remove(category))
}

fn parse_simulation(body: &Value) -> KeyringResult<SimulatedGas> {
    let gas_used = body["gas_info"]["gas_used"]
        .as_str()
        .and_then(|s| s.parse::<u64>().ok())
        .or_else(|| body["gas_info"]["gas_used"].as_u64())
        .ok_or_else(|| KeyringError::Encoding("simulation response missing gas_used".to_string()))?;
    Ok(SimulatedGas { gas_used })
}

fn parse_broadcast(body: &Value) -> KeyringResult<BroadcastResult> {
    if let Some(error) = body.get("error") {
        return Err(KeyringError::Network(format!(
            "broadcast_tx_sync rpc error: {}",
            error["message"].as_str().unwrap_or("unknown")
        )));
    }

    let result = &body["result"];
    // Some node versions render the check-tx code as a string.
    let code = result["code"]
        .as_u64()
        .or_else(|| result["code"].as_str().and_then(|s| s.parse().ok()))
        .unwrap_or(0) as u32;
    let log = result["log"].as_str().unwrap_or_default().to_string();
    let tx_hash = result["hash"].as_str().unwrap_or_default().to_string();

    if code != 0 {
        return Err(KeyringError::Broadcast { code, log });
    }

    Ok(BroadcastResult { tx_hash, code, log })
}
