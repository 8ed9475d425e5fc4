//! secp256k1 public key with Bitcoin-specific functionality.
//!
//! Supports compressed/uncompressed SEC1 serialization, Hash160 digests
//! for P2PKH scripts, and ECDSA signature verification.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed public key in bytes (prefix + 32 byte x + 32 byte y).
const UNCOMPRESSED_LEN: usize = 65;

/// A secp256k1 public key for signature verification.
///
/// Wraps a k256 `VerifyingKey` and remembers which SEC1 serialization the
/// key was created with, so `to_bytes` and `hash160` reproduce the exact
/// encoding that locking scripts commit to.
#[derive(Clone, Debug)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
    /// Whether `to_bytes` serializes in compressed form.
    compressed: bool,
}

impl PublicKey {
    /// Create a PublicKey from raw SEC1 encoded bytes.
    ///
    /// Accepts both compressed (33-byte) and uncompressed (65-byte) formats;
    /// the serialization convention is taken from the prefix byte.
    ///
    /// # Arguments
    /// * `bytes` - SEC1-encoded public key bytes.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the bytes don't represent
    /// a valid curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.is_empty() {
            return Err(PrimitivesError::InvalidPublicKey(
                "pubkey bytes are empty".to_string(),
            ));
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        let compressed = bytes.len() == COMPRESSED_LEN;
        Ok(PublicKey {
            inner: vk,
            compressed,
        })
    }

    /// Create a PublicKey from a hex-encoded SEC1 string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string of a compressed (66 chars) or uncompressed (130 chars) key.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the hex or point is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Wrap an existing k256 verifying key.
    pub(crate) fn from_verifying_key(vk: VerifyingKey, compressed: bool) -> Self {
        PublicKey {
            inner: vk,
            compressed,
        }
    }

    /// Whether this key serializes in compressed SEC1 form.
    ///
    /// # Returns
    /// `true` for compressed, `false` for uncompressed.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the
    /// 32-byte X coordinate.
    ///
    /// # Returns
    /// A 33-byte array containing the compressed public key.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key in uncompressed SEC1 format (65 bytes).
    ///
    /// The first byte is 0x04, followed by 32-byte X and Y coordinates.
    ///
    /// # Returns
    /// A 65-byte array containing the uncompressed public key.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(false);
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the public key in its own convention (33 or 65 bytes).
    ///
    /// # Returns
    /// The SEC1 encoding matching this key's compression flag.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.compressed {
            self.to_compressed().to_vec()
        } else {
            self.to_uncompressed().to_vec()
        }
    }

    /// Serialize the public key as a lowercase hexadecimal string.
    ///
    /// # Returns
    /// A hex string of the key in its own serialization convention.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Compute the Hash160 of the public key's serialization.
    ///
    /// Hash160 = RIPEMD160(SHA256(pubkey_bytes)), over the encoding matching
    /// this key's compression flag. This is the digest P2PKH locking scripts
    /// commit to.
    ///
    /// # Returns
    /// A 20-byte hash digest.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_bytes())
    }

    /// Verify an ECDSA signature against a message hash using this public key.
    ///
    /// # Arguments
    /// * `hash` - The message hash that was signed.
    /// * `sig` - The ECDSA signature to verify.
    ///
    /// # Returns
    /// `true` if the signature is valid for this hash and public key.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    /// Access the underlying k256 `VerifyingKey`.
    ///
    /// # Returns
    /// A reference to the inner `VerifyingKey`.
    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner && self.compressed == other.compressed
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    /// Display the public key as its hex serialization.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::private_key::PrivateKey;

    #[test]
    fn test_public_key_from_bytes_detects_compression() {
        let pk = PrivateKey::new();
        let pub_key = pk.public_key();

        let compressed = PublicKey::from_bytes(&pub_key.to_compressed()).unwrap();
        assert!(compressed.is_compressed());
        assert_eq!(compressed.to_bytes().len(), 33);

        let uncompressed = PublicKey::from_bytes(&pub_key.to_uncompressed()).unwrap();
        assert!(!uncompressed.is_compressed());
        assert_eq!(uncompressed.to_bytes().len(), 65);

        // Same point either way.
        assert_eq!(compressed.to_compressed(), uncompressed.to_compressed());
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let pub_key = PrivateKey::new().public_key();
        let parsed = PublicKey::from_hex(&pub_key.to_hex()).unwrap();
        assert_eq!(parsed, pub_key);
    }

    #[test]
    fn test_public_key_rejects_garbage() {
        assert!(PublicKey::from_bytes(&[]).is_err());

        // 0x05 is not a valid SEC1 prefix byte.
        assert!(PublicKey::from_bytes(&[0x05; 33]).is_err());

        // Valid prefix but the x coordinate exceeds the field modulus.
        let mut overflow = [0xff; 33];
        overflow[0] = 0x02;
        assert!(PublicKey::from_bytes(&overflow).is_err());

        assert!(PublicKey::from_hex("zz").is_err());
    }

    #[test]
    fn test_hash160_depends_on_encoding() {
        let pk = PrivateKey::new();
        let compressed = pk.public_key();
        let uncompressed = pk.clone().with_compression(false).public_key();
        // Different serializations digest to different script hashes.
        assert_ne!(compressed.hash160(), uncompressed.hash160());
    }
}
