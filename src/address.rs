//! secp256k1 key handling and Bech32 address derivation.
//!
//! A Cosmos SDK account address is `ripemd160(sha256(compressed_pubkey))`
//! rendered as Bech32 under the chain's prefix. The compressed encoding is
//! mandatory: hashing the uncompressed point yields a valid-looking address
//! that no chain associates with the key.
//!
//! Everything in this module is pure and deterministic.

use crate::error::{KeyringError, KeyringResult};
use bech32::{FromBase32, ToBase32, Variant};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Length of the raw account address payload.
pub const ADDRESS_LEN: usize = 20;

/// A secp256k1 public key. Wraps the parsed curve point, so conversion
/// between compressed and uncompressed encodings is a lossless
/// re-serialization, never a re-derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    /// Parse a 33-byte compressed or 65-byte uncompressed point.
    /// Any other length is rejected before touching the curve math.
    pub fn from_bytes(bytes: &[u8]) -> KeyringResult<Self> {
        if bytes.len() != 33 && bytes.len() != 65 {
            return Err(KeyringError::InvalidKeyMaterial(format!(
                "public key must be 33 or 65 bytes, got {}",
                bytes.len()
            )));
        }
        let point = secp256k1::PublicKey::from_slice(bytes)?;
        Ok(Self(point))
    }

    pub fn compressed(&self) -> [u8; 33] {
        self.0.serialize()
    }

    pub fn uncompressed(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }

    pub fn compressed_hex(&self) -> String {
        hex::encode(self.compressed())
    }

    pub(crate) fn inner(&self) -> &secp256k1::PublicKey {
        &self.0
    }
}

impl From<secp256k1::PublicKey> for PublicKey {
    fn from(point: secp256k1::PublicKey) -> Self {
        Self(point)
    }
}

/// A raw 20-byte account address. The Bech32 prefix is presentation only:
/// identity (equality, hashing) is the payload bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bech32Address([u8; ADDRESS_LEN]);

impl Bech32Address {
    pub fn from_raw(raw: [u8; ADDRESS_LEN]) -> Self {
        Self(raw)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Render under the given human-readable prefix (Bech32, not Bech32m).
    pub fn render(&self, prefix: &str) -> KeyringResult<String> {
        bech32::encode(prefix, self.0.to_base32(), Variant::Bech32)
            .map_err(|e| KeyringError::InvalidAddress(format!("bech32 encoding failed: {}", e)))
    }

    /// Parse a Bech32 string back into the raw payload. The prefix is
    /// accepted as-is; callers that care about it check separately.
    pub fn parse(address: &str) -> KeyringResult<Self> {
        let (_hrp, data, variant) = bech32::decode(address)
            .map_err(|e| KeyringError::InvalidAddress(format!("{}: {}", address, e)))?;
        if variant != Variant::Bech32 {
            return Err(KeyringError::InvalidAddress(
                "bech32m addresses are not valid account addresses".to_string(),
            ));
        }
        let raw = Vec::<u8>::from_base32(&data)
            .map_err(|e| KeyringError::InvalidAddress(e.to_string()))?;
        let raw: [u8; ADDRESS_LEN] = raw.try_into().map_err(|v: Vec<u8>| {
            KeyringError::InvalidAddress(format!("payload must be 20 bytes, got {}", v.len()))
        })?;
        Ok(Self(raw))
    }
}

/// Compute the compressed public key for a 32-byte secret scalar.
/// Zero and out-of-range scalars are rejected.
pub fn derive_public_key(private_key: &[u8]) -> KeyringResult<PublicKey> {
    if private_key.len() != 32 {
        return Err(KeyringError::InvalidKeyMaterial(format!(
            "private key must be 32 bytes, got {}",
            private_key.len()
        )));
    }
    let secp = secp256k1::Secp256k1::new();
    let secret = secp256k1::SecretKey::from_slice(private_key)?;
    Ok(PublicKey(secp256k1::PublicKey::from_secret_key(
        &secp, &secret,
    )))
}

/// `ripemd160(sha256(compressed_pubkey))`. Always hashes the compressed
/// encoding regardless of how the key was originally supplied.
pub fn derive_address(public_key: &PublicKey) -> Bech32Address {
    let sha = Sha256::digest(public_key.compressed());
    let ripemd = Ripemd160::digest(sha);
    let mut raw = [0u8; ADDRESS_LEN];
    raw.copy_from_slice(&ripemd);
    Bech32Address::from_raw(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    // The secp256k1 generator point, i.e. the public key for scalar 1.
    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const GENERATOR_RAW_ADDRESS: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

    fn generator_key() -> PublicKey {
        PublicKey::from_bytes(&hex::decode(GENERATOR_COMPRESSED).unwrap()).unwrap()
    }

    #[test]
    fn test_public_key_rejects_bad_lengths() {
        for len in [0, 20, 32, 34, 64, 66] {
            let result = PublicKey::from_bytes(&vec![2u8; len]);
            assert!(
                matches!(result, Err(KeyringError::InvalidKeyMaterial(_))),
                "length {} should be rejected",
                len
            );
        }
    }

    #[test]
    fn test_compressed_uncompressed_round_trip() {
        let key = generator_key();
        let uncompressed = key.uncompressed();
        assert_eq!(uncompressed.len(), 65);
        assert_eq!(uncompressed[0], 0x04);

        // Re-parsing the uncompressed form recovers the identical point.
        let reparsed = PublicKey::from_bytes(&uncompressed).unwrap();
        assert_eq!(reparsed.compressed(), key.compressed());
        assert_eq!(reparsed, key);
    }

    #[test]
    fn test_derive_public_key_from_scalar_one() {
        let mut scalar = [0u8; 32];
        scalar[31] = 1;
        let key = derive_public_key(&scalar).unwrap();
        assert_eq!(key.compressed_hex(), GENERATOR_COMPRESSED);
    }

    #[test]
    fn test_derive_public_key_rejects_zero_scalar() {
        let result = derive_public_key(&[0u8; 32]);
        assert!(matches!(result, Err(KeyringError::InvalidKeyMaterial(_))));
    }

    #[test]
    fn test_derive_public_key_rejects_order() {
        // The curve order n is not a valid secret scalar.
        let order =
            hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
                .unwrap();
        assert!(derive_public_key(&order).is_err());
        assert!(derive_public_key(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_derive_address_reference_vector() {
        let address = derive_address(&generator_key());
        assert_eq!(hex::encode(address.as_bytes()), GENERATOR_RAW_ADDRESS);
        assert_eq!(
            address.render("bbn").unwrap(),
            "bbn1w508d6qejxtdg4y5r3zarvary0c5xw7kdrxtsp"
        );
        assert_eq!(
            address.render("cosmos").unwrap(),
            "cosmos1w508d6qejxtdg4y5r3zarvary0c5xw7k6ah60c"
        );
    }

    #[test]
    fn test_derive_address_is_deterministic() {
        let key = generator_key();
        assert_eq!(derive_address(&key), derive_address(&key));
    }

    #[test]
    fn test_random_scalar_render_parse_round_trip() {
        use rand::RngCore;

        let mut rng = rand::thread_rng();
        for _ in 0..16 {
            let mut scalar = [0u8; 32];
            rng.fill_bytes(&mut scalar);
            let key = match derive_public_key(&scalar) {
                Ok(key) => key,
                // Out-of-range scalars are astronomically unlikely here.
                Err(_) => continue,
            };
            let address = derive_address(&key);
            let rendered = address.render("bbn").unwrap();
            assert_eq!(Bech32Address::parse(&rendered).unwrap(), address);
        }
    }

    #[test]
    fn test_prefix_independence() {
        let address = derive_address(&generator_key());
        let bbn = address.render("bbn").unwrap();
        let cosmos = address.render("cosmos").unwrap();
        assert_ne!(bbn, cosmos);

        // Both decode back to the same raw payload.
        assert_eq!(Bech32Address::parse(&bbn).unwrap(), address);
        assert_eq!(Bech32Address::parse(&cosmos).unwrap(), address);
    }

    #[test]
    fn test_parse_rejects_wrong_payload_length() {
        // Valid bech32 but a 32-byte payload (not an account address).
        let long = bech32::encode("bbn", [0u8; 32].to_base32(), Variant::Bech32).unwrap();
        assert!(Bech32Address::parse(&long).is_err());
    }

    #[test]
    fn test_parse_rejects_mangled_checksum() {
        assert!(Bech32Address::parse("bbn1w508d6qejxtdg4y5r3zarvary0c5xw7kdrxtsq").is_err());
    }

    #[test]
    fn test_uncompressed_hash_differs() {
        // Hashing the uncompressed encoding must NOT produce the canonical
        // address; derive_address always compresses first.
        let key = generator_key();
        let sha = Sha256::digest(key.uncompressed());
        let ripemd = Ripemd160::digest(sha);
        assert_ne!(hex::encode(ripemd), GENERATOR_RAW_ADDRESS);
        assert_eq!(hex::encode(derive_address(&key).as_bytes()), GENERATOR_RAW_ADDRESS);
    }
}
