//! Signing session orchestration.
//!
//! A `CosmosKeyring` binds one derived key, one chain endpoint pair and an
//! optional software signer, and drives the two-phase send protocol:
//!
//! 1. `prepare_send` fetches the account sequence, builds the Direct-mode
//!    sign doc, stashes the exact encoded bytes under a fresh request id,
//!    and returns the sign bytes for whichever signer the caller has
//!    (local key or hardware round trip).
//! 2. `complete_send` looks up and removes the stashed bytes for that
//!    request id, wraps them with the 64-byte signature, and broadcasts.
//!
//! Keying the stash by request id means two overlapping prepares cannot
//! clobber each other: each `complete_send` assembles exactly the document
//! its own `prepare_send` produced. Entries are removed before the
//! broadcast attempt, so a failed broadcast never leaves a consumable doc
//! behind. The session performs no locking; `&mut self` on the two-phase
//! calls makes exclusive access a compile-time requirement.

use crate::address::{self, Bech32Address, PublicKey};
use crate::amino;
use crate::chain::ChainClient;
use crate::config::ChainConfig;
use crate::direct;
use crate::error::{KeyringError, KeyringResult};
use crate::reward;
use crate::signature::{self, SoftwareSigner};
use crate::types::{BroadcastResult, Coin, SimulatedGas};
use crate::{log_info, log_warn};
use std::collections::HashMap;

/// Key algorithm identifier; the only one this keyring supports.
pub const KEY_ALGORITHM: &str = "secp256k1";

/// A derived account key. Created once per account, immutable thereafter,
/// owned exclusively by the session that created it.
#[derive(Debug, Clone)]
pub struct Key {
    pub name: String,
    pub algorithm: &'static str,
    pub public_key: PublicKey,
    pub raw_address: Bech32Address,
    pub bech32_address: String,
    pub is_hardware_backed: bool,
}

impl Key {
    fn derive(
        name: &str,
        public_key: PublicKey,
        prefix: &str,
        is_hardware_backed: bool,
    ) -> KeyringResult<Self> {
        let raw_address = address::derive_address(&public_key);
        let bech32_address = raw_address.render(prefix)?;
        Ok(Self {
            name: name.to_string(),
            algorithm: KEY_ALGORITHM,
            public_key,
            raw_address,
            bech32_address,
            is_hardware_backed,
        })
    }
}

/// Outcome of `prepare_send`: the id to complete with and the hex sign-doc
/// bytes to sign. Direct mode signs the SHA-256 of these bytes.
#[derive(Debug, Clone)]
pub struct PreparedSend {
    pub request_id: u64,
    pub sign_bytes_hex: String,
}

/// Result of an ADR-36 arbitrary-data signature.
#[derive(Debug, Clone)]
pub struct ArbitrarySignature {
    pub public_key_hex: String,
    pub signature_hex: String,
}

/// An unsigned document cached between prepare and complete. Modelled as an
/// enum so the two signing standards can never be mixed by the assembler.
#[derive(Debug, Clone)]
enum PendingSignDoc {
    Direct {
        body_bytes: Vec<u8>,
        auth_info_bytes: Vec<u8>,
    },
}

/// One account's signing session against one chain.
pub struct CosmosKeyring {
    key: Key,
    client: ChainClient,
    signer: Option<SoftwareSigner>,
    pending: HashMap<u64, PendingSignDoc>,
    next_request_id: u64,
}

impl CosmosKeyring {
    /// Session backed by a local secp256k1 key.
    pub fn with_software_signer(
        name: &str,
        signer: SoftwareSigner,
        config: ChainConfig,
    ) -> KeyringResult<Self> {
        let key = Key::derive(name, *signer.public_key(), &config.bech32_prefix, false)?;
        Ok(Self {
            key,
            client: ChainClient::new(config)?,
            signer: Some(signer),
            pending: HashMap::new(),
            next_request_id: 1,
        })
    }

    /// Session for a hardware-backed key: signatures are produced by an
    /// external device and fed into `complete_send`.
    pub fn with_hardware_key(
        name: &str,
        public_key: PublicKey,
        config: ChainConfig,
    ) -> KeyringResult<Self> {
        let key = Key::derive(name, public_key, &config.bech32_prefix, true)?;
        Ok(Self {
            key,
            client: ChainClient::new(config)?,
            signer: None,
            pending: HashMap::new(),
            next_request_id: 1,
        })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn address(&self) -> &str {
        &self.key.bech32_address
    }

    /// Render this key's address under an arbitrary prefix without
    /// changing its on-chain identity.
    pub fn address_with_prefix(&self, prefix: &str) -> KeyringResult<String> {
        self.key.raw_address.render(prefix)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn stash_pending(&mut self, doc: PendingSignDoc) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.insert(request_id, doc);
        request_id
    }

    fn take_pending(&mut self, request_id: u64) -> KeyringResult<PendingSignDoc> {
        self.pending
            .remove(&request_id)
            .ok_or(KeyringError::NoPendingSignDoc(request_id))
    }

    /// Step 1 of the send protocol. Fetches the account state, builds and
    /// caches the sign doc, returns the bytes to sign.
    pub async fn prepare_send(
        &mut self,
        to_address: &str,
        coins: &[Coin],
        memo: &str,
        gas_limit: Option<u64>,
        gas_adjustment: Option<f64>,
    ) -> KeyringResult<PreparedSend> {
        let config = self.client.config();
        config.validate_address(to_address)?;

        let gas_limit = gas_limit.unwrap_or(config.default_gas_limit);
        let fee = config.compute_fee(gas_limit, gas_adjustment);
        let chain_id = config.chain_id.clone();

        let account = self.client.account_info(&self.key.bech32_address).await?;

        let body_bytes =
            direct::build_bank_send_body(&self.key.bech32_address, to_address, coins, memo)?;
        let auth_info_bytes =
            direct::build_auth_info(&self.key.public_key, account.sequence, &fee)?;
        let sign_bytes =
            direct::build_sign_bytes(&body_bytes, &auth_info_bytes, &chain_id, account.account_number);

        let request_id = self.stash_pending(PendingSignDoc::Direct {
            body_bytes,
            auth_info_bytes,
        });

        log_info!(
            "session",
            "prepared send",
            request_id = request_id,
            to_address = to_address,
            sequence = account.sequence,
            gas_limit = gas_limit,
        );

        Ok(PreparedSend {
            request_id,
            sign_bytes_hex: hex::encode(sign_bytes),
        })
    }

    /// Sign prepared sign bytes with the session's software key. Hardware
    /// sessions skip this and obtain the signature out of band.
    pub fn sign_locally(&self, sign_bytes_hex: &str) -> KeyringResult<String> {
        let signer = self.signer.as_ref().ok_or(KeyringError::SignerUnavailable)?;
        let sign_bytes = hex::decode(sign_bytes_hex)?;
        let hash = signature::hash_for_signing(&sign_bytes);
        Ok(hex::encode(signer.sign(&hash)?))
    }

    /// Step 2 of the send protocol. Consumes the cached doc for
    /// `request_id`: the entry is removed before the broadcast attempt,
    /// so the outcome never leaves a reusable doc behind.
    pub async fn complete_send(
        &mut self,
        request_id: u64,
        signature_hex: &str,
    ) -> KeyringResult<BroadcastResult> {
        let raw = hex::decode(signature_hex)?;
        // Length check first: a malformed signature must not consume the doc.
        let sig = signature::validate_signature_bytes(&raw)?;

        let PendingSignDoc::Direct {
            body_bytes,
            auth_info_bytes,
        } = self.take_pending(request_id)?;

        let tx_bytes = direct::build_tx_raw(&body_bytes, &auth_info_bytes, &sig);
        let result = self.client.broadcast_tx_sync(&tx_bytes).await?;

        log_info!(
            "session",
            "broadcast accepted",
            request_id = request_id,
            tx_hash = result.tx_hash,
        );

        Ok(result)
    }

    /// Single-round-trip ADR-36 signature over arbitrary off-chain data.
    /// Does not touch the two-phase cache or any chain state.
    pub fn sign_arbitrary_data(&self, data: &[u8]) -> KeyringResult<ArbitrarySignature> {
        let signer = self.signer.as_ref().ok_or(KeyringError::SignerUnavailable)?;

        let doc = amino::build_adr36_sign_doc(&self.key.bech32_address, data);
        let sign_bytes = amino::serialize_sign_bytes(&doc)?;
        let hash = signature::hash_for_signing(&sign_bytes);
        let sig = signer.sign(&hash)?;

        Ok(ArbitrarySignature {
            public_key_hex: self.key.public_key.compressed_hex(),
            signature_hex: hex::encode(sig),
        })
    }

    /// Verify an ADR-36 signature produced for this key over `data`.
    pub fn verify_arbitrary_data(&self, data: &[u8], signature_hex: &str) -> KeyringResult<bool> {
        let raw = hex::decode(signature_hex)?;
        let sig = signature::validate_signature_bytes(&raw)?;

        let doc = amino::build_adr36_sign_doc(&self.key.bech32_address, data);
        let sign_bytes = amino::serialize_sign_bytes(&doc)?;
        let hash = signature::hash_for_signing(&sign_bytes);
        signature::verify(&hash, &sig, &self.key.public_key)
    }

    /// Balance of this key's account in `denom`, or the chain's native
    /// denom when `None`.
    pub async fn get_balance(&self, denom: Option<&str>) -> KeyringResult<u128> {
        let denom = self.resolve_denom(denom);
        let coin = self.client.balance(&self.key.bech32_address, &denom).await?;
        Ok(coin.amount_raw())
    }

    fn resolve_denom(&self, denom: Option<&str>) -> String {
        denom
            .map(str::to_owned)
            .unwrap_or_else(|| self.client.config().denom.clone())
    }

    /// Claimable BTC-delegation reward. An address with no gauge record has
    /// simply never accrued rewards, so that reads as zero, not an error.
    pub async fn get_claimable_reward(&self) -> KeyringResult<i128> {
        let gauge = self
            .client
            .reward_gauge(&self.key.bech32_address, reward::BTC_DELEGATION_GAUGE)
            .await?;
        Ok(gauge.map(|g| reward::claimable(&g)).unwrap_or(0))
    }

    /// Dry-run gas estimate for a send. Advisory only: every failure is
    /// logged and mapped to `None` so the UI can fall back to defaults.
    pub async fn simulate_fee(
        &self,
        to_address: &str,
        coins: &[Coin],
        memo: &str,
    ) -> Option<SimulatedGas> {
        match self.try_simulate(to_address, coins, memo).await {
            Ok(gas) => Some(gas),
            Err(e) => {
                log_warn!(
                    "session",
                    "fee simulation failed, falling back to defaults",
                    to_address = to_address,
                    error = e,
                );
                None
            }
        }
    }

    async fn try_simulate(
        &self,
        to_address: &str,
        coins: &[Coin],
        memo: &str,
    ) -> KeyringResult<SimulatedGas> {
        let config = self.client.config();
        config.validate_address(to_address)?;
        let fee = config.compute_fee(config.default_gas_limit, None);

        let account = self.client.account_info(&self.key.bech32_address).await?;

        // The simulation signer carries the real public key but a zeroed
        // signature; the node only checks shape, not validity.
        let body_bytes =
            direct::build_bank_send_body(&self.key.bech32_address, to_address, coins, memo)?;
        let auth_info_bytes =
            direct::build_auth_info(&self.key.public_key, account.sequence, &fee)?;
        let tx_bytes = direct::build_simulation_tx(&body_bytes, &auth_info_bytes);

        self.client.simulate(&tx_bytes).await
    }
}
