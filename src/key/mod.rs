//! ED25519 key material and composite signing requirements.
//!
//! Private keys are accepted in the textual forms account fixtures are
//! usually distributed in: raw 32-byte hex, optionally `0x`-prefixed, or the
//! DER-encoded PKCS#8 form. A [`Key`] expresses who must sign: a single
//! public key or an M-of-N [`KeyList`].

mod list;

use std::fmt;

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use list::{Key, KeyList};

/// DER prefix of a PKCS#8-wrapped ED25519 private key.
const ED25519_PRIVATE_DER_PREFIX: &str = "302e020100300506032b657004220420";

/// Errors raised while parsing or combining keys.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The text was not valid hexadecimal.
    #[error("key is not valid hex")]
    InvalidHex,
    /// The decoded key had the wrong length.
    #[error("expected 32 key bytes, found {0}")]
    InvalidLength(usize),
    /// The bytes do not encode a point on the curve.
    #[error("bytes do not encode a valid ed25519 public key")]
    InvalidPublicKey,
    /// A threshold outside `1..=keys` was requested.
    #[error("invalid threshold {threshold} for a list of {keys} keys")]
    InvalidThreshold {
        /// Requested threshold.
        threshold: u32,
        /// Number of keys in the list.
        keys: usize,
    },
}

/// An ED25519 private key.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Parse an ED25519 private key from hex text.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidHex`] or [`KeyError::InvalidLength`] when the
    /// text does not decode to 32 key bytes.
    pub fn from_str_ed25519(s: &str) -> Result<Self, KeyError> {
        let s = s.trim();
        let s = s.strip_prefix("0x").unwrap_or(s);
        let s = s.strip_prefix(ED25519_PRIVATE_DER_PREFIX).unwrap_or(s);
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidHex)?;
        let bytes: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        Ok(Self(SigningKey::from_bytes(&bytes)))
    }

    /// Generate a fresh random key.
    #[must_use]
    pub fn generate() -> Self { Self(SigningKey::generate(&mut rand::rngs::OsRng)) }

    #[must_use]
    pub fn public_key(&self) -> PublicKey { PublicKey(self.0.verifying_key().to_bytes()) }

    /// Sign `message`.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature { self.0.sign(message) }

    /// Hex encoding of the raw key bytes.
    #[must_use]
    pub fn to_string_raw(&self) -> String { hex::encode(self.0.to_bytes()) }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

/// An ED25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Decode a public key from its 32 raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::InvalidLength`] or [`KeyError::InvalidPublicKey`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidLength(bytes.len()))?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; 32] { self.0 }

    /// Returns `true` when `signature` is a valid signature of `message` by
    /// this key.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        VerifyingKey::from_bytes(&self.0).is_ok_and(|key| key.verify(message, signature).is_ok())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&hex::encode(self.0)) }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "PublicKey({self})") }
}
