//! Proof-of-work sealing for chain records.
//!
//! A seal is the hash of (request content hash, previous seal, creation time,
//! nonce) whose leading hex characters are all zero. The sealer searches
//! nonces from zero upward until the difficulty target is met, so sealing is
//! deterministic given its inputs and costs ~16^difficulty attempts on
//! average.

use crate::hash::{hash, Hash};
use serde::Serialize;

/// Default number of leading zero hex characters required of a seal.
pub const DEFAULT_DIFFICULTY: usize = 3;

/// Upper bound on difficulty. Expected search cost is exponential in the
/// difficulty, and sealing blocks the calling thread until it completes.
pub const MAX_DIFFICULTY: usize = 6;

/// The fields a seal commits to.
#[derive(Serialize)]
struct SealDigest<'a> {
    content_hash: &'a Hash,
    previous_seal: Option<&'a Hash>,
    created_at: u64,
    nonce: u64,
}

/// Recompute the seal digest for the given inputs and nonce.
///
/// Shared between the sealing search and chain validity checking.
pub fn seal_digest(
    content_hash: &Hash,
    previous_seal: Option<&Hash>,
    created_at: u64,
    nonce: u64,
) -> Hash {
    let digest = SealDigest {
        content_hash,
        previous_seal,
        created_at,
        nonce,
    };
    let encoded = bincode::serialize(&digest).expect("serialization should not fail");
    hash(&encoded)
}

/// Performs the proof-of-work search that seals records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sealer {
    difficulty: usize,
}

impl Sealer {
    /// Create a sealer with the given difficulty, clamped to [`MAX_DIFFICULTY`].
    pub fn new(difficulty: usize) -> Self {
        Self {
            difficulty: difficulty.min(MAX_DIFFICULTY),
        }
    }

    /// The number of leading zero hex characters this sealer requires.
    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// Find the smallest nonce whose digest meets the difficulty target.
    ///
    /// Returns the winning seal and nonce. There is no failure path: the
    /// search loops until a digest qualifies.
    pub fn seal(
        &self,
        content_hash: &Hash,
        previous_seal: Option<&Hash>,
        created_at: u64,
    ) -> (Hash, u64) {
        let mut nonce = 0u64;
        loop {
            let digest = seal_digest(content_hash, previous_seal, created_at, nonce);
            if digest.has_leading_zero_digits(self.difficulty) {
                return (digest, nonce);
            }
            nonce += 1;
        }
    }
}

impl Default for Sealer {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}
