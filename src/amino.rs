//! Legacy Amino / ADR-36 sign-document construction.
//!
//! ADR-36 "signs" arbitrary off-chain data by wrapping it in a
//! transaction-shaped JSON document whose fee, sequence, account number and
//! chain id are all hard zero, so the result can never be broadcast.
//! Interoperating signers (Keplr, Leap, cosmjs) serialize that document as
//! canonical JSON (recursively sorted object keys) and escape `<`, `>` and
//! `&` before hashing; both steps are reproduced here byte for byte.
//!
//! Reference: cosmos-sdk ADR-036 (arbitrary message signature specification).

use crate::error::KeyringResult;
use crate::types::Coin;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message type URL used by every ADR-36 document.
pub const MSG_SIGN_DATA_TYPE: &str = "sign/MsgSignData";

/// The fixed-shape ADR-36 sign document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub chain_id: String,
    pub account_number: String,
    pub sequence: String,
    pub fee: StdFee,
    pub msgs: Vec<MsgSignData>,
    pub memo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgSignData {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: MsgSignDataValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MsgSignDataValue {
    pub signer: String,
    /// Base64 of the raw data being signed.
    pub data: String,
}

/// Serialize a JSON value with object keys recursively sorted. Array order
/// is preserved; only key order within objects is normalized.
pub fn canonicalize(value: &Value) -> String {
    sort_keys(value).to_string()
}

fn sort_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut sorted = serde_json::Map::new();
            for (key, inner) in entries {
                sorted.insert(key.clone(), sort_keys(inner));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_keys).collect()),
        other => other.clone(),
    }
}

/// Replace `<`, `>` and `&` with their `\uXXXX` escapes. Reference signing
/// clients apply the same substitution before hashing; skipping it produces
/// sign bytes no compliant verifier agrees on.
pub fn escape_for_signing(json: &str) -> String {
    json.replace('&', "\\u0026")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
}

/// Build the ADR-36 document for `signer` over `data`.
pub fn build_adr36_sign_doc(signer: &str, data: &[u8]) -> StdSignDoc {
    StdSignDoc {
        chain_id: String::new(),
        account_number: "0".to_string(),
        sequence: "0".to_string(),
        fee: StdFee {
            amount: vec![],
            gas: "0".to_string(),
        },
        msgs: vec![MsgSignData {
            msg_type: MSG_SIGN_DATA_TYPE.to_string(),
            value: MsgSignDataValue {
                signer: signer.to_string(),
                data: BASE64.encode(data),
            },
        }],
        memo: String::new(),
    }
}

/// The exact bytes a compliant signer hashes: UTF-8 of the escaped
/// canonical JSON rendering of the document.
pub fn serialize_sign_bytes(doc: &StdSignDoc) -> KeyringResult<Vec<u8>> {
    let value = serde_json::to_value(doc)?;
    Ok(escape_for_signing(&canonicalize(&value)).into_bytes())
}
