//! Group loan pools: pledge accumulation and credential issuance.

use lendchain_core::{hash_concat, Hash};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during pool operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("lender {lender:?} already pledged to pool {pool:?}")]
    DuplicateLender { lender: String, pool: String },

    #[error("pool {0:?} is fully funded and closed to new pledges")]
    PoolFunded(String),
}

pub type Result<T> = std::result::Result<T, PoolError>;

/// Funding state of a pool. `Funded` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolStatus {
    Open,
    Funded,
}

/// One lender's stake in a pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pledge {
    /// The pledging lender's identity.
    pub lender: String,
    /// Pledged amount (the pool's per-lender share).
    pub amount: u64,
    /// Participation credential, set once the pool is fully funded.
    pub credential: Option<String>,
}

/// A named loan pool funded jointly by multiple lenders.
///
/// Every lender pledges the same share (target × split rate, rounded once).
/// When the pledged total reaches the target exactly, an identical credential
/// is attached to every pledge and the pool stops accepting lenders.
#[derive(Debug, Clone, Serialize)]
pub struct LendingPool {
    /// Pool name, unique case-insensitively within the registry.
    pub name: String,
    /// Total amount to be raised.
    pub target_amount: u64,
    /// Fraction of the target each lender pledges, in (0, 1].
    pub split_rate: f64,
    /// Unix timestamp at creation.
    pub created_at: u64,
    /// Hash over the pool's identity; the payload credentials sign.
    pub digest: Hash,
    pledges: Vec<Pledge>,
}

impl LendingPool {
    /// Create an empty pool.
    pub fn new(name: impl Into<String>, target_amount: u64, split_rate: f64, created_at: u64) -> Self {
        let name = name.into();
        let digest = hash_concat(&[
            name.as_bytes(),
            &target_amount.to_le_bytes(),
            &split_rate.to_le_bytes(),
            &created_at.to_le_bytes(),
        ]);
        Self {
            name,
            target_amount,
            split_rate,
            created_at,
            digest,
            pledges: Vec::new(),
        }
    }

    /// The amount each lender pledges: target × split rate, rounded to whole
    /// units. Rounding happens once here so share, pledge, and transfer
    /// request all carry the same figure.
    pub fn share_amount(&self) -> u64 {
        (self.target_amount as f64 * self.split_rate).round() as u64
    }

    /// Sum of all pledged amounts.
    pub fn total_pledged(&self) -> u64 {
        self.pledges.iter().map(|pledge| pledge.amount).sum()
    }

    /// Current funding state.
    pub fn status(&self) -> PoolStatus {
        if self.total_pledged() >= self.target_amount {
            PoolStatus::Funded
        } else {
            PoolStatus::Open
        }
    }

    /// Check if the pool has reached its target.
    pub fn is_funded(&self) -> bool {
        self.status() == PoolStatus::Funded
    }

    /// Check if a lender already pledged (case-insensitive).
    pub fn has_lender(&self, lender: &str) -> bool {
        self.pledges
            .iter()
            .any(|pledge| pledge.lender.eq_ignore_ascii_case(lender))
    }

    /// Record a pledge of one share for `lender`.
    pub fn record_pledge(&mut self, lender: impl Into<String>) -> Result<()> {
        let lender = lender.into();
        if self.is_funded() {
            return Err(PoolError::PoolFunded(self.name.clone()));
        }
        if self.has_lender(&lender) {
            return Err(PoolError::DuplicateLender {
                lender,
                pool: self.name.clone(),
            });
        }
        let amount = self.share_amount();
        self.pledges.push(Pledge {
            lender,
            amount,
            credential: None,
        });
        Ok(())
    }

    /// Attach the same credential to every pledge.
    pub fn issue_credentials(&mut self, credential: &str) {
        for pledge in &mut self.pledges {
            pledge.credential = Some(credential.to_string());
        }
    }

    /// Read-only snapshot of the pledges.
    pub fn pledges(&self) -> &[Pledge] {
        &self.pledges
    }
}
