//! The lending engine: request validation, commit cycles, and the pool
//! registry.

use crate::balance::balance_of;
use crate::chain::RecordChain;
use crate::pool::{LendingPool, PoolError};
use crate::queue::{PendingQueue, QueueError};
use lendchain_core::{unix_now, Keypair, LendingRequest, Record, Sealer, DEFAULT_DIFFICULTY};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during engine operations.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("the lender cannot be the borrower")]
    SameParty,

    #[error("the lender or borrower cannot be blank")]
    BlankIdentifier,

    #[error("the amount must be greater than 0")]
    NonPositiveAmount,

    #[error("amount {amount} exceeds the mint cap of {cap}")]
    ExceedsMintLimit { amount: u64, cap: u64 },

    #[error("insufficient balance (required {required}, available {available})")]
    InsufficientBalance { required: u64, available: i64 },

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("no pool named {0:?}")]
    PoolNotFound(String),

    #[error("a pool named {0:?} already exists")]
    DuplicatePool(String),

    #[error("split rate {0} is outside (0, 1]")]
    InvalidSplitRate(f64),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Engine configuration, injected at construction.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum amount a single request may carry; also the amount minted to
    /// the mint owner every commit cycle.
    pub mint_cap: u64,
    /// Identity credited by every system mint.
    pub mint_owner: String,
    /// Sealing difficulty (leading zero hex characters).
    pub difficulty: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mint_cap: 100,
            mint_owner: "treasury".to_string(),
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

/// Orchestrates the record chain, the pending queue, and the loan pools.
///
/// The engine owns all ledger state for its lifetime and is correct only
/// under at-most-one-writer-at-a-time access; concurrent hosts must add their
/// own serialization (the HTTP server wraps the engine in a mutex).
pub struct LendingEngine {
    config: EngineConfig,
    chain: RecordChain,
    queue: PendingQueue,
    pools: Vec<LendingPool>,
}

impl LendingEngine {
    /// Create an engine and seal the genesis record: a system mint crediting
    /// the mint owner with the full cap, linked to nothing.
    pub fn new(config: EngineConfig) -> Self {
        let mut chain = RecordChain::new(Sealer::new(config.difficulty));
        let now = unix_now();
        chain.append(
            LendingRequest::minted(config.mint_owner.clone(), config.mint_cap, now),
            now,
        );
        info!(
            owner = %config.mint_owner,
            cap = config.mint_cap,
            "ledger initialized with genesis mint"
        );
        Self {
            config,
            chain,
            queue: PendingQueue::new(),
            pools: Vec::new(),
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate a lending request and enqueue it for the next commit.
    ///
    /// The checks run in a fixed order: same-party, mint cap, balance, blank
    /// identifiers, zero amount, duplicate content hash. The balance check
    /// replays the committed chain only; amounts already queued but not yet
    /// committed do not reduce what a lender may promise.
    pub fn submit_request(
        &mut self,
        lender: &str,
        borrower: &str,
        amount: u64,
    ) -> Result<LendingRequest> {
        if lender.eq_ignore_ascii_case(borrower) {
            return Err(EngineError::SameParty);
        }
        if amount > self.config.mint_cap {
            return Err(EngineError::ExceedsMintLimit {
                amount,
                cap: self.config.mint_cap,
            });
        }
        let available = self.balance_of(lender);
        if amount as i64 > available {
            return Err(EngineError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if lender.is_empty() || borrower.is_empty() {
            return Err(EngineError::BlankIdentifier);
        }
        if amount == 0 {
            return Err(EngineError::NonPositiveAmount);
        }

        let request = LendingRequest::new(lender, borrower, amount, unix_now());
        self.queue.add(request.clone())?;
        debug!(lender, borrower, amount, "lending request queued");
        Ok(request)
    }

    /// Run a commit cycle: seal every pending request into the chain in
    /// submission order, then mint one system record.
    ///
    /// The chain tail advances after each append, so later requests in the
    /// batch link to earlier ones. Every cycle grows the chain by
    /// pending-count + 1 and replenishes the mint owner's balance by the cap.
    pub fn commit(&mut self) {
        let pending = self.queue.drain();
        let sealed = pending.len();
        for request in pending {
            self.chain.append(request, unix_now());
        }

        let now = unix_now();
        let mint = LendingRequest::minted(self.config.mint_owner.clone(), self.config.mint_cap, now);
        self.chain.append(mint, now);

        info!(
            sealed = sealed + 1,
            chain_length = self.chain.len(),
            "commit cycle complete"
        );
    }

    /// Net balance of a participant, derived by replaying the chain.
    pub fn balance_of(&self, participant: &str) -> i64 {
        balance_of(participant, self.chain.records())
    }

    /// Read-only snapshot of the committed chain.
    pub fn records(&self) -> &[Record] {
        self.chain.records()
    }

    /// Read-only snapshot of the pending queue.
    pub fn pending(&self) -> &[LendingRequest] {
        self.queue.requests()
    }

    /// Verify the integrity of the committed chain. Advisory only.
    pub fn is_valid(&self) -> bool {
        self.chain.is_valid()
    }

    /// Register a new loan pool.
    pub fn create_pool(&mut self, name: &str, target_amount: u64, split_rate: f64) -> Result<()> {
        if !(split_rate > 0.0 && split_rate <= 1.0) {
            return Err(EngineError::InvalidSplitRate(split_rate));
        }
        if self
            .pools
            .iter()
            .any(|pool| pool.name.eq_ignore_ascii_case(name))
        {
            return Err(EngineError::DuplicatePool(name.to_string()));
        }
        self.pools
            .push(LendingPool::new(name, target_amount, split_rate, unix_now()));
        info!(pool = name, target_amount, split_rate, "pool created");
        Ok(())
    }

    /// Pledge one share of a pool's target on behalf of `lender`.
    ///
    /// The pledge is itself a lending request from the lender to the pool, so
    /// it passes through [`Self::submit_request`] and lands in the pending
    /// queue; a rejection there propagates and no pledge is recorded. When
    /// the pledged total reaches the target exactly, a one-off key signs the
    /// pool digest and the hex signature is attached to every pledge as the
    /// shared participation credential. Committing the queued transfers
    /// remains a separate, explicit operation.
    pub fn add_lender_to_pool(&mut self, lender: &str, pool_name: &str) -> Result<()> {
        let index = self
            .pools
            .iter()
            .position(|pool| pool.name.eq_ignore_ascii_case(pool_name))
            .ok_or_else(|| EngineError::PoolNotFound(pool_name.to_string()))?;

        let (share, pool_name) = {
            let pool = &self.pools[index];
            if pool.is_funded() {
                return Err(PoolError::PoolFunded(pool.name.clone()).into());
            }
            (pool.share_amount(), pool.name.clone())
        };
        let available = self.balance_of(lender);
        if available < share as i64 {
            return Err(EngineError::InsufficientBalance {
                required: share,
                available,
            });
        }
        if self.pools[index].has_lender(lender) {
            return Err(PoolError::DuplicateLender {
                lender: lender.to_string(),
                pool: pool_name,
            }
            .into());
        }

        self.submit_request(lender, &pool_name, share)?;

        let pool = &mut self.pools[index];
        pool.record_pledge(lender)?;

        if pool.total_pledged() == pool.target_amount {
            let credential = Keypair::generate().sign_hash(&pool.digest).to_hex();
            pool.issue_credentials(&credential);
            info!(pool = %pool.name, "pool fully funded; credentials issued");
        }
        Ok(())
    }

    /// Read-only snapshot of the registered pools.
    pub fn pools(&self) -> &[LendingPool] {
        &self.pools
    }
}

impl Default for LendingEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolStatus;

    fn engine() -> LendingEngine {
        LendingEngine::new(EngineConfig {
            mint_cap: 100,
            mint_owner: "Femi".to_string(),
            difficulty: 1,
        })
    }

    #[test]
    fn test_genesis_credits_mint_owner() {
        let engine = engine();

        assert_eq!(engine.records().len(), 1);
        assert!(engine.records()[0].is_genesis());
        assert!(engine.records()[0].request.is_minted());
        assert_eq!(engine.balance_of("Femi"), 100);
        assert!(engine.is_valid());
    }

    #[test]
    fn test_submit_rejects_same_party() {
        let mut engine = engine();
        assert_eq!(
            engine.submit_request("Femi", "femi", 10).unwrap_err(),
            EngineError::SameParty
        );
    }

    #[test]
    fn test_submit_rejects_amount_over_mint_cap() {
        let mut engine = engine();
        assert_eq!(
            engine.submit_request("Femi", "John", 101).unwrap_err(),
            EngineError::ExceedsMintLimit {
                amount: 101,
                cap: 100
            }
        );
    }

    #[test]
    fn test_submit_rejects_insufficient_balance() {
        let mut engine = engine();
        assert_eq!(
            engine.submit_request("John", "Mary", 10).unwrap_err(),
            EngineError::InsufficientBalance {
                required: 10,
                available: 0
            }
        );
    }

    #[test]
    fn test_submit_rejects_blank_identifiers() {
        let mut engine = engine();
        // the balance check runs before the blank check, so the blank-lender
        // case needs amount 0 to get past it
        assert_eq!(
            engine.submit_request("Femi", "", 10).unwrap_err(),
            EngineError::BlankIdentifier
        );
        assert_eq!(
            engine.submit_request("", "John", 0).unwrap_err(),
            EngineError::BlankIdentifier
        );
    }

    #[test]
    fn test_submit_rejects_zero_amount() {
        let mut engine = engine();
        assert_eq!(
            engine.submit_request("Femi", "John", 0).unwrap_err(),
            EngineError::NonPositiveAmount
        );
    }

    #[test]
    fn test_submit_rejects_duplicate_request() {
        let mut engine = engine();
        engine.submit_request("Femi", "John", 50).unwrap();
        assert_eq!(
            engine.submit_request("Femi", "John", 50).unwrap_err(),
            EngineError::Queue(QueueError::DuplicateRequest)
        );
        assert_eq!(engine.pending().len(), 1);
    }

    #[test]
    fn test_balance_ignores_pending_requests() {
        let mut engine = engine();
        engine.submit_request("Femi", "John", 60).unwrap();
        // the queued 60 does not reduce Femi's committed balance
        assert_eq!(engine.balance_of("Femi"), 100);
        engine.submit_request("Femi", "Mary", 60).unwrap();
        assert_eq!(engine.pending().len(), 2);
    }

    #[test]
    fn test_commit_seals_pending_plus_mint() {
        let mut engine = engine();
        engine.submit_request("Femi", "John", 50).unwrap();
        engine.submit_request("Femi", "Mary", 20).unwrap();

        engine.commit();

        // two pending + one mint on top of genesis
        assert_eq!(engine.records().len(), 4);
        assert!(engine.pending().is_empty());
        assert!(engine.is_valid());

        // batch members link to each other, the mint record closes the cycle
        let records = engine.records();
        assert_eq!(records[2].previous_seal, Some(records[1].seal));
        assert_eq!(records[3].previous_seal, Some(records[2].seal));
        assert!(records[3].request.is_minted());
    }

    #[test]
    fn test_commit_replenishes_mint_owner() {
        let mut engine = engine();
        let before = engine.balance_of("Femi");

        engine.commit();

        assert_eq!(engine.records().len(), 2);
        assert_eq!(engine.balance_of("Femi"), before + 100);
    }

    #[test]
    fn test_create_pool_rejects_duplicate_name() {
        let mut engine = engine();
        engine.create_pool("harvest", 100, 0.5).unwrap();
        assert_eq!(
            engine.create_pool("HARVEST", 200, 0.25).unwrap_err(),
            EngineError::DuplicatePool("HARVEST".to_string())
        );
        assert_eq!(engine.pools().len(), 1);
    }

    #[test]
    fn test_create_pool_rejects_bad_split_rate() {
        let mut engine = engine();
        assert_eq!(
            engine.create_pool("harvest", 100, 0.0).unwrap_err(),
            EngineError::InvalidSplitRate(0.0)
        );
        assert_eq!(
            engine.create_pool("harvest", 100, 1.5).unwrap_err(),
            EngineError::InvalidSplitRate(1.5)
        );
    }

    #[test]
    fn test_add_lender_requires_existing_pool() {
        let mut engine = engine();
        assert_eq!(
            engine.add_lender_to_pool("Femi", "nowhere").unwrap_err(),
            EngineError::PoolNotFound("nowhere".to_string())
        );
    }

    #[test]
    fn test_add_lender_requires_share_balance() {
        let mut engine = engine();
        engine.create_pool("harvest", 100, 0.5).unwrap();
        assert_eq!(
            engine.add_lender_to_pool("John", "harvest").unwrap_err(),
            EngineError::InsufficientBalance {
                required: 50,
                available: 0
            }
        );
    }

    #[test]
    fn test_add_lender_rejects_duplicate_pledge() {
        let mut engine = engine();
        engine.create_pool("harvest", 100, 0.25).unwrap();
        engine.add_lender_to_pool("Femi", "harvest").unwrap();

        assert_eq!(
            engine.add_lender_to_pool("FEMI", "harvest").unwrap_err(),
            EngineError::Pool(PoolError::DuplicateLender {
                lender: "FEMI".to_string(),
                pool: "harvest".to_string(),
            })
        );
    }

    #[test]
    fn test_pledge_queues_transfer_to_pool() {
        let mut engine = engine();
        engine.create_pool("harvest", 100, 0.25).unwrap();
        engine.add_lender_to_pool("Femi", "harvest").unwrap();

        let pending = engine.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].lender.as_deref(), Some("Femi"));
        assert_eq!(pending[0].borrower, "harvest");
        assert_eq!(pending[0].amount, 25);

        let pool = &engine.pools()[0];
        assert_eq!(pool.status(), PoolStatus::Open);
        assert_eq!(pool.total_pledged(), 25);
    }

    #[test]
    fn test_rejected_transfer_leaves_no_pledge() {
        let mut engine = engine();
        // a lender named like the pool trips the same-party check
        engine.create_pool("Femi", 100, 0.5).unwrap();
        assert_eq!(
            engine.add_lender_to_pool("FEMI", "Femi").unwrap_err(),
            EngineError::SameParty
        );
        assert!(engine.pools()[0].pledges().is_empty());
        assert!(engine.pending().is_empty());
    }
}
