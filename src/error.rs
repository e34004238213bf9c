//! Unified error types for the Babylon keyring core.
//!
//! Every fallible operation in this crate reports through `KeyringError`.
//! Two chain-side conditions are deliberately *not* represented here:
//! a missing reward gauge (a valid zero-reward state, surfaced as `None`
//! by the chain client) and a failed fee simulation (advisory only,
//! logged and swallowed by the session).

use serde::{Deserialize, Serialize};

/// Main error type for keyring operations.
#[derive(Debug, thiserror::Error)]
pub enum KeyringError {
    /// The secret scalar is zero, out of range, or otherwise not a valid
    /// secp256k1 key, or a public key blob has the wrong shape.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// A signature blob was not exactly 64 bytes (r || s, big-endian).
    /// DER and 65-byte recoverable encodings are rejected outright.
    #[error("invalid signature length: expected 64 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// `complete_send` was called with a request id that was never
    /// prepared (or was already consumed). Programmer error, not retried.
    #[error("no pending sign doc for request {0}")]
    NoPendingSignDoc(u64),

    /// The account-number/sequence query failed, so no sign doc can be built.
    #[error("failed to fetch account sequence: {0}")]
    SequenceFetch(String),

    /// The node accepted the request but rejected the transaction.
    #[error("broadcast rejected (code {code}): {log}")]
    Broadcast { code: u32, log: String },

    /// A bech32 address failed to parse or carries the wrong prefix.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// This session is hardware-backed; the operation needs a local key.
    #[error("no software signer bound to this session")]
    SignerUnavailable,

    /// JSON / hex / base64 (de)serialization failure.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Transport-level RPC failure.
    #[error("network error: {0}")]
    Network(String),
}

/// Result type alias for keyring operations.
pub type KeyringResult<T> = Result<T, KeyringError>;

/// Machine-readable error code, serialized across the extension boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidKeyMaterial,
    InvalidSignatureLength,
    NoPendingSignDoc,
    SequenceFetchError,
    BroadcastError,
    InvalidAddress,
    SignerUnavailable,
    EncodingError,
    NetworkError,
}

impl KeyringError {
    pub fn code(&self) -> ErrorCode {
        match self {
            KeyringError::InvalidKeyMaterial(_) => ErrorCode::InvalidKeyMaterial,
            KeyringError::InvalidSignatureLength(_) => ErrorCode::InvalidSignatureLength,
            KeyringError::NoPendingSignDoc(_) => ErrorCode::NoPendingSignDoc,
            KeyringError::SequenceFetch(_) => ErrorCode::SequenceFetchError,
            KeyringError::Broadcast { .. } => ErrorCode::BroadcastError,
            KeyringError::InvalidAddress(_) => ErrorCode::InvalidAddress,
            KeyringError::SignerUnavailable => ErrorCode::SignerUnavailable,
            KeyringError::Encoding(_) => ErrorCode::EncodingError,
            KeyringError::Network(_) => ErrorCode::NetworkError,
        }
    }
}

// Conversions from common error types

impl From<serde_json::Error> for KeyringError {
    fn from(e: serde_json::Error) -> Self {
        KeyringError::Encoding(e.to_string())
    }
}

impl From<hex::FromHexError> for KeyringError {
    fn from(e: hex::FromHexError) -> Self {
        KeyringError::Encoding(e.to_string())
    }
}

impl From<secp256k1::Error> for KeyringError {
    fn from(e: secp256k1::Error) -> Self {
        KeyringError::InvalidKeyMaterial(e.to_string())
    }
}

impl From<reqwest::Error> for KeyringError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            KeyringError::Network("request timed out".to_string())
        } else if e.is_connect() {
            KeyringError::Network("connection failed".to_string())
        } else {
            KeyringError::Network(e.to_string())
        }
    }
}
