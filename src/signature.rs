//! Fixed-length ECDSA signature production and validation.
//!
//! Cosmos SDK verification accepts exactly one signature shape: 64 bytes,
//! r then s, both 32-byte big-endian. No DER framing, no recovery id.
//! Externally supplied blobs (hardware signers) pass through
//! `validate_signature_bytes` before they go anywhere near a transaction.

use crate::address::{self, PublicKey};
use crate::error::{KeyringError, KeyringResult};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// The only signature length the chain accepts.
pub const SIGNATURE_LEN: usize = 64;

/// Single SHA-256 pass over the payload. Direct mode signs the SHA-256 of
/// the canonical SignDoc bytes; ADR-36 callers that route through an
/// external device hand over the raw sign bytes and the device hashes,
/// so which side calls this is documented per call site.
pub fn hash_for_signing(bytes: &[u8]) -> [u8; 32] {
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Sha256::digest(bytes));
    hash
}

/// ECDSA over secp256k1, compact output. The secp backend produces low-s
/// signatures, which is what the chain's verifier requires.
pub fn sign(message_hash: &[u8; 32], private_key: &[u8]) -> KeyringResult<[u8; SIGNATURE_LEN]> {
    if private_key.len() != 32 {
        return Err(KeyringError::InvalidKeyMaterial(format!(
            "private key must be 32 bytes, got {}",
            private_key.len()
        )));
    }
    let secp = Secp256k1::new();
    let secret = SecretKey::from_slice(private_key)?;
    let message = Message::from_digest_slice(message_hash)
        .map_err(|e| KeyringError::InvalidKeyMaterial(e.to_string()))?;
    Ok(secp.sign_ecdsa(&message, &secret).serialize_compact())
}

/// Check an externally supplied signature blob is exactly 64 bytes.
pub fn validate_signature_bytes(signature: &[u8]) -> KeyringResult<[u8; SIGNATURE_LEN]> {
    signature
        .try_into()
        .map_err(|_| KeyringError::InvalidSignatureLength(signature.len()))
}

/// Verify a compact signature against a 32-byte message hash.
pub fn verify(
    message_hash: &[u8; 32],
    signature: &[u8; SIGNATURE_LEN],
    public_key: &PublicKey,
) -> KeyringResult<bool> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(message_hash)
        .map_err(|e| KeyringError::InvalidKeyMaterial(e.to_string()))?;
    let signature = Signature::from_compact(signature)
        .map_err(|e| KeyringError::Encoding(e.to_string()))?;
    Ok(secp
        .verify_ecdsa(&message, &signature, public_key.inner())
        .is_ok())
}

/// A software secp256k1 signer. The secret scalar lives in a zeroizing
/// buffer that is cleared when the signer is dropped.
pub struct SoftwareSigner {
    secret: Zeroizing<[u8; 32]>,
    public_key: PublicKey,
}

impl SoftwareSigner {
    pub fn from_bytes(private_key: &[u8]) -> KeyringResult<Self> {
        let public_key = address::derive_public_key(private_key)?;
        let mut secret = Zeroizing::new([0u8; 32]);
        secret.copy_from_slice(private_key);
        Ok(Self { secret, public_key })
    }

    pub fn from_hex(private_key_hex: &str) -> KeyringResult<Self> {
        let bytes = Zeroizing::new(hex::decode(
            private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex),
        )?);
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn sign(&self, message_hash: &[u8; 32]) -> KeyringResult<[u8; SIGNATURE_LEN]> {
        sign(message_hash, self.secret.as_ref())
    }
}

impl std::fmt::Debug for SoftwareSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareSigner")
            .field("public_key", &self.public_key.compressed_hex())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_sign_produces_64_bytes() {
        let key = hex::decode(TEST_PRIVATE_KEY).unwrap();
        let hash = hash_for_signing(b"payload");
        let sig = sign(&hash, &key).unwrap();
        assert_eq!(sig.len(), SIGNATURE_LEN);
    }

    #[test]
    fn test_sign_is_deterministic() {
        // RFC 6979 nonces: same key and message, same signature.
        let key = hex::decode(TEST_PRIVATE_KEY).unwrap();
        let hash = hash_for_signing(b"payload");
        assert_eq!(sign(&hash, &key).unwrap(), sign(&hash, &key).unwrap());
    }

    #[test]
    fn test_sign_and_verify_round_trip() {
        let signer = SoftwareSigner::from_hex(TEST_PRIVATE_KEY).unwrap();
        let hash = hash_for_signing(b"hello babylon");
        let sig = signer.sign(&hash).unwrap();

        assert!(verify(&hash, &sig, signer.public_key()).unwrap());

        let other_hash = hash_for_signing(b"tampered");
        assert!(!verify(&other_hash, &sig, signer.public_key()).unwrap());
    }

    #[test]
    fn test_validate_signature_bytes_length() {
        assert!(validate_signature_bytes(&[0u8; 64]).is_ok());

        for len in [0, 63, 65, 70] {
            let result = validate_signature_bytes(&vec![0u8; len]);
            match result {
                Err(KeyringError::InvalidSignatureLength(got)) => assert_eq!(got, len),
                other => panic!("expected length error for {}, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_der_encoded_signature_rejected() {
        // A DER signature starts with 0x30 and runs 70-72 bytes; it must
        // fail on length alone, before any parsing.
        let key = hex::decode(TEST_PRIVATE_KEY).unwrap();
        let hash = hash_for_signing(b"payload");
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&key).unwrap();
        let message = Message::from_digest_slice(&hash).unwrap();
        let der = secp.sign_ecdsa(&message, &secret).serialize_der();

        assert!(matches!(
            validate_signature_bytes(der.as_ref()),
            Err(KeyringError::InvalidSignatureLength(_))
        ));
    }

    #[test]
    fn test_sign_rejects_bad_key_lengths() {
        let hash = hash_for_signing(b"x");
        assert!(sign(&hash, &[1u8; 31]).is_err());
        assert!(sign(&hash, &[0u8; 32]).is_err());
    }

    #[test]
    fn test_hash_for_signing_reference() {
        // SHA-256 of the empty string.
        assert_eq!(
            hex::encode(hash_for_signing(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
