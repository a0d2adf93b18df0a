//! Ed25519 signing for participation credentials.
//!
//! When a loan pool reaches its target, a one-off keypair signs the pool
//! digest and the hex-encoded signature becomes the shared credential attached
//! to every pledge. Keys are ephemeral: generated at issuance, never stored.

use crate::hash::Hash;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("malformed signature encoding")]
    InvalidSignature,
    #[error("signature verification failed")]
    VerificationFailed,
}

/// An ed25519 keypair used to issue credentials.
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS entropy source.
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Sign a hash, returning the detached signature.
    pub fn sign_hash(&self, hash: &Hash) -> Signature {
        let signature = self.signing.sign(hash.as_bytes());
        Signature(signature.to_bytes())
    }

    /// The public half of this keypair.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// Verify a signature produced by this keypair over `hash`.
    pub fn verify(&self, hash: &Hash, signature: &Signature) -> Result<(), CryptoError> {
        let signature = DalekSignature::from_bytes(&signature.0);
        self.verifying_key()
            .verify(hash.as_bytes(), &signature)
            .map_err(|_| CryptoError::VerificationFailed)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", hex::encode(self.verifying_key().as_bytes()))
    }
}

/// A detached ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Signature {
    /// Convert to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidSignature)?;
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignature)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
