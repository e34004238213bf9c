//! Protobuf "Direct" sign-document construction.
//!
//! SIGN_MODE_DIRECT signs the SHA-256 of an encoded `SignDoc`, which wraps
//! the already-encoded `TxBody` and `AuthInfo` bytes. Protobuf encoding is
//! not guaranteed byte-stable across two encodings of logically equal
//! structures, so callers must carry the exact `body_bytes` and
//! `auth_info_bytes` from sign time through to broadcast; this module is
//! stateless and the session owns that caching.

use crate::address::PublicKey;
use crate::error::KeyringResult;
use crate::types::{Coin, Fee};
use cosmos_sdk_proto::cosmos::bank::v1beta1::MsgSend;
use cosmos_sdk_proto::cosmos::base::v1beta1::Coin as ProtoCoin;
use cosmos_sdk_proto::cosmos::crypto::secp256k1::PubKey as ProtoPubKey;
use cosmos_sdk_proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmos_sdk_proto::cosmos::tx::v1beta1::{
    mode_info, AuthInfo, Fee as ProtoFee, ModeInfo, SignDoc, SignerInfo, TxBody, TxRaw,
};
use cosmos_sdk_proto::Any;
use prost::Message;

pub const MSG_SEND_TYPE_URL: &str = "/cosmos.bank.v1beta1.MsgSend";
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

fn proto_coins(coins: &[Coin]) -> Vec<ProtoCoin> {
    coins
        .iter()
        .map(|c| ProtoCoin {
            denom: c.denom.clone(),
            amount: c.amount.clone(),
        })
        .collect()
}

/// Encode a `TxBody` holding a single bank-send message.
pub fn build_bank_send_body(
    from_address: &str,
    to_address: &str,
    coins: &[Coin],
    memo: &str,
) -> KeyringResult<Vec<u8>> {
    let msg = MsgSend {
        from_address: from_address.to_string(),
        to_address: to_address.to_string(),
        amount: proto_coins(coins),
    };

    let body = TxBody {
        messages: vec![Any {
            type_url: MSG_SEND_TYPE_URL.to_string(),
            value: msg.encode_to_vec(),
        }],
        memo: memo.to_string(),
        ..Default::default()
    };

    Ok(body.encode_to_vec())
}

/// Encode an `AuthInfo` with one SIGN_MODE_DIRECT secp256k1 signer.
pub fn build_auth_info(
    public_key: &PublicKey,
    sequence: u64,
    fee: &Fee,
) -> KeyringResult<Vec<u8>> {
    let pub_key = ProtoPubKey {
        key: public_key.compressed().to_vec(),
    };

    let signer_info = SignerInfo {
        public_key: Some(Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: pub_key.encode_to_vec(),
        }),
        mode_info: Some(ModeInfo {
            sum: Some(mode_info::Sum::Single(mode_info::Single {
                mode: SignMode::Direct as i32,
            })),
        }),
        sequence,
    };

    let auth_info = AuthInfo {
        signer_infos: vec![signer_info],
        fee: Some(ProtoFee {
            amount: proto_coins(&fee.amount),
            gas_limit: fee.gas_limit,
            payer: String::new(),
            granter: String::new(),
        }),
        ..Default::default()
    };

    Ok(auth_info.encode_to_vec())
}

/// Encode the canonical `SignDoc`. These are the bytes that get hashed and
/// signed, not the body or auth-info bytes directly.
pub fn build_sign_bytes(
    body_bytes: &[u8],
    auth_info_bytes: &[u8],
    chain_id: &str,
    account_number: u64,
) -> Vec<u8> {
    SignDoc {
        body_bytes: body_bytes.to_vec(),
        auth_info_bytes: auth_info_bytes.to_vec(),
        chain_id: chain_id.to_string(),
        account_number,
    }
    .encode_to_vec()
}

/// Assemble the broadcastable `TxRaw` from the exact cached bytes plus a
/// 64-byte compact signature.
pub fn build_tx_raw(body_bytes: &[u8], auth_info_bytes: &[u8], signature: &[u8; 64]) -> Vec<u8> {
    TxRaw {
        body_bytes: body_bytes.to_vec(),
        auth_info_bytes: auth_info_bytes.to_vec(),
        signatures: vec![signature.to_vec()],
    }
    .encode_to_vec()
}

/// A `TxRaw` with a zeroed signature placeholder, suitable only for the
/// node's `simulate` endpoint.
pub fn build_simulation_tx(body_bytes: &[u8], auth_info_bytes: &[u8]) -> Vec<u8> {
    build_tx_raw(body_bytes, auth_info_bytes, &[0u8; 64])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;

    fn test_key() -> PublicKey {
        let mut scalar = [0u8; 32];
        scalar[31] = 1;
        address::derive_public_key(&scalar).unwrap()
    }

    #[test]
    fn test_sign_doc_byte_exact() {
        // SignDoc wire format: field 1 body_bytes, 2 auth_info_bytes,
        // 3 chain_id, 4 account_number.
        let bytes = build_sign_bytes(&[0x01], &[0x02], "test-1", 7);
        let expected = [
            0x0a, 0x01, 0x01, // body_bytes
            0x12, 0x01, 0x02, // auth_info_bytes
            0x1a, 0x06, b't', b'e', b's', b't', b'-', b'1', // chain_id
            0x20, 0x07, // account_number
        ];
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_body_round_trips() {
        let coins = vec![Coin::new("ubbn", 1_000_000)];
        let bytes =
            build_bank_send_body("bbn1sender", "bbn1receiver", &coins, "test memo").unwrap();

        let body = TxBody::decode(bytes.as_slice()).unwrap();
        assert_eq!(body.memo, "test memo");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].type_url, MSG_SEND_TYPE_URL);

        let msg = MsgSend::decode(body.messages[0].value.as_slice()).unwrap();
        assert_eq!(msg.from_address, "bbn1sender");
        assert_eq!(msg.to_address, "bbn1receiver");
        assert_eq!(msg.amount[0].denom, "ubbn");
        assert_eq!(msg.amount[0].amount, "1000000");
    }

    #[test]
    fn test_auth_info_round_trips() {
        let fee = Fee {
            amount: vec![Coin::new("ubbn", 400)],
            gas_limit: 200_000,
        };
        let bytes = build_auth_info(&test_key(), 42, &fee).unwrap();

        let auth_info = AuthInfo::decode(bytes.as_slice()).unwrap();
        assert_eq!(auth_info.signer_infos.len(), 1);

        let signer = &auth_info.signer_infos[0];
        assert_eq!(signer.sequence, 42);
        let pub_key_any = signer.public_key.as_ref().unwrap();
        assert_eq!(pub_key_any.type_url, SECP256K1_PUBKEY_TYPE_URL);
        let pub_key = ProtoPubKey::decode(pub_key_any.value.as_slice()).unwrap();
        assert_eq!(pub_key.key, test_key().compressed().to_vec());

        match signer.mode_info.as_ref().unwrap().sum.as_ref().unwrap() {
            mode_info::Sum::Single(single) => {
                assert_eq!(single.mode, SignMode::Direct as i32);
            }
            other => panic!("unexpected mode info: {:?}", other),
        }

        let proto_fee = auth_info.fee.as_ref().unwrap();
        assert_eq!(proto_fee.gas_limit, 200_000);
        assert_eq!(proto_fee.amount[0].amount, "400");
    }

    #[test]
    fn test_tx_raw_carries_exact_cached_bytes() {
        // The bytes wrapped into TxRaw must be the ones that were signed,
        // not a re-encoding.
        let body = build_bank_send_body("bbn1a", "bbn1b", &[Coin::new("ubbn", 1)], "").unwrap();
        let fee = Fee {
            amount: vec![Coin::new("ubbn", 400)],
            gas_limit: 200_000,
        };
        let auth = build_auth_info(&test_key(), 0, &fee).unwrap();

        let raw = build_tx_raw(&body, &auth, &[0xAB; 64]);
        let decoded = TxRaw::decode(raw.as_slice()).unwrap();
        assert_eq!(decoded.body_bytes, body);
        assert_eq!(decoded.auth_info_bytes, auth);
        assert_eq!(decoded.signatures, vec![vec![0xAB; 64]]);
    }

    #[test]
    fn test_simulation_tx_has_zero_signature() {
        let raw = build_simulation_tx(&[0x01], &[0x02]);
        let decoded = TxRaw::decode(raw.as_slice()).unwrap();
        assert_eq!(decoded.signatures, vec![vec![0u8; 64]]);
    }
}
