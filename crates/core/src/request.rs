//! Lending requests, the transfers recorded on the chain.

use crate::hash::{hash, Hash};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Get the current unix timestamp in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_secs()
}

/// A request to move `amount` from `lender` to `borrower`.
///
/// System-minted requests (the genesis credit and the per-commit mint) carry
/// no lender: the funds enter the ledger from outside and debit nobody.
///
/// The content hash covers every other field and is computed once at
/// construction; a request is immutable afterwards. Equal content hashes are
/// how the pending queue detects duplicate submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingRequest {
    /// Identity the amount is debited from (None for minted requests).
    pub lender: Option<String>,
    /// Identity the amount is credited to.
    pub borrower: String,
    /// Transfer amount in whole ledger units.
    pub amount: u64,
    /// Unix timestamp at submission.
    pub created_at: u64,
    /// Hash over (lender, borrower, amount, created_at).
    pub content_hash: Hash,
}

/// Request fields that feed the content hash (everything but the hash itself).
#[derive(Serialize)]
struct RequestDigest<'a> {
    lender: Option<&'a str>,
    borrower: &'a str,
    amount: u64,
    created_at: u64,
}

fn content_hash(lender: Option<&str>, borrower: &str, amount: u64, created_at: u64) -> Hash {
    let digest = RequestDigest {
        lender,
        borrower,
        amount,
        created_at,
    };
    let encoded = bincode::serialize(&digest).expect("serialization should not fail");
    hash(&encoded)
}

impl LendingRequest {
    /// Create a request from `lender` to `borrower`.
    pub fn new(
        lender: impl Into<String>,
        borrower: impl Into<String>,
        amount: u64,
        created_at: u64,
    ) -> Self {
        let lender = lender.into();
        let borrower = borrower.into();
        let content_hash = content_hash(Some(&lender), &borrower, amount, created_at);
        Self {
            lender: Some(lender),
            borrower,
            amount,
            created_at,
            content_hash,
        }
    }

    /// Create a system-minted request crediting `owner` with no lender.
    pub fn minted(owner: impl Into<String>, amount: u64, created_at: u64) -> Self {
        let borrower = owner.into();
        let content_hash = content_hash(None, &borrower, amount, created_at);
        Self {
            lender: None,
            borrower,
            amount,
            created_at,
            content_hash,
        }
    }

    /// Check if this request was minted by the system.
    pub fn is_minted(&self) -> bool {
        self.lender.is_none()
    }

    /// Recompute the content hash from the stored fields.
    pub fn compute_content_hash(&self) -> Hash {
        content_hash(
            self.lender.as_deref(),
            &self.borrower,
            self.amount,
            self.created_at,
        )
    }
}
