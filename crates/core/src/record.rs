//! Sealed chain records.

use crate::hash::Hash;
use crate::request::LendingRequest;
use crate::seal::{seal_digest, Sealer};
use serde::{Deserialize, Serialize};

/// A sealed entry in the record chain.
///
/// Each record carries one lending request and links backward to the previous
/// record through its seal. Records are immutable once sealed; the chain they
/// form is append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The lending request committed by this record.
    pub request: LendingRequest,
    /// Seal of the preceding record (None only for the genesis record).
    pub previous_seal: Option<Hash>,
    /// Unix timestamp at sealing.
    pub created_at: u64,
    /// Proof-of-work seal over (request, previous_seal, created_at, nonce).
    pub seal: Hash,
    /// Nonce found by the proof-of-work search.
    pub nonce: u64,
}

impl Record {
    /// Seal a request into a record.
    pub fn sealed(
        request: LendingRequest,
        previous_seal: Option<Hash>,
        created_at: u64,
        sealer: &Sealer,
    ) -> Self {
        let (seal, nonce) = sealer.seal(&request.content_hash, previous_seal.as_ref(), created_at);
        Self {
            request,
            previous_seal,
            created_at,
            seal,
            nonce,
        }
    }

    /// Check if this is the genesis record.
    pub fn is_genesis(&self) -> bool {
        self.previous_seal.is_none()
    }

    /// Recompute the seal from the stored fields.
    pub fn compute_seal(&self) -> Hash {
        seal_digest(
            &self.request.content_hash,
            self.previous_seal.as_ref(),
            self.created_at,
            self.nonce,
        )
    }

    /// Verify that the stored seal matches its recomputed digest.
    pub fn verify_seal(&self) -> bool {
        self.seal == self.compute_seal()
    }
}
