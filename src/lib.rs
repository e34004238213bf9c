//! Babylon Keyring
//!
//! Cosmos SDK address derivation and transaction signing core for a
//! Bitcoin wallet that doubles as a light client of the Babylon chain.
//!
//! # Architecture
//!
//! - **address**: secp256k1 key handling and Bech32 address derivation
//! - **amino**: canonical JSON and ADR-36 arbitrary-data sign documents
//! - **direct**: protobuf SIGN_MODE_DIRECT sign documents (bank send)
//! - **signature**: 64-byte compact ECDSA production and validation
//! - **chain**: LCD/RPC queries, simulation, and broadcast
//! - **session**: the `CosmosKeyring` orchestrator binding one key, one
//!   chain, and an optional software signer
//! - **reward**: reward-gauge reduction to a claimable amount
//!
//! # Security
//!
//! Software-backed secret scalars live in `zeroize`d buffers and are
//! cleared on drop. The session never sees Bitcoin-side key material: it
//! receives either a `SoftwareSigner` or a precomputed 64-byte signature.
//!
//! # Example
//!
//! ```rust,ignore
//! use babylon_keyring::{ChainConfig, CosmosKeyring, SoftwareSigner, Coin};
//!
//! let signer = SoftwareSigner::from_hex(private_key_hex)?;
//! let mut session =
//!     CosmosKeyring::with_software_signer("main", signer, ChainConfig::babylon_testnet())?;
//!
//! let prepared = session
//!     .prepare_send(recipient, &[Coin::new("ubbn", 1_000_000)], "", None, None)
//!     .await?;
//! let signature = session.sign_locally(&prepared.sign_bytes_hex)?;
//! let result = session.complete_send(prepared.request_id, &signature).await?;
//! println!("tx hash: {}", result.tx_hash);
//! ```

pub mod address;
pub mod amino;
pub mod chain;
pub mod config;
pub mod direct;
pub mod error;
pub mod logging;
pub mod reward;
pub mod session;
pub mod signature;
pub mod types;

// Re-export the surface the extension layer talks to.
pub use address::{derive_address, derive_public_key, Bech32Address, PublicKey};
pub use chain::ChainClient;
pub use config::ChainConfig;
pub use error::{ErrorCode, KeyringError, KeyringResult};
pub use session::{ArbitrarySignature, CosmosKeyring, Key, PreparedSend};
pub use signature::SoftwareSigner;
pub use types::{AccountInfo, BroadcastResult, Coin, Fee, RewardGauge, SimulatedGas};
