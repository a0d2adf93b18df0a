//! Ledger orchestration for lendchain.
//!
//! This crate brings together the moving parts of the loan ledger:
//! - **RecordChain**: the append-only chain of sealed records
//! - **PendingQueue**: unsealed requests awaiting the next commit
//! - **Balance replay**: net balances derived from full-chain replay
//! - **Loan pools**: group funding with pledge tracking and credentials
//! - **LendingEngine**: validation, commit cycles, and the pool registry
//!
//! # Example
//!
//! ```rust
//! use lendchain_ledger::{EngineConfig, LendingEngine};
//!
//! let mut engine = LendingEngine::new(EngineConfig {
//!     mint_cap: 100,
//!     mint_owner: "Femi".to_string(),
//!     difficulty: 2,
//! });
//!
//! // The genesis record credits the mint owner with the full cap.
//! assert_eq!(engine.balance_of("Femi"), 100);
//!
//! engine.submit_request("Femi", "John", 50).unwrap();
//! engine.commit();
//!
//! assert_eq!(engine.balance_of("John"), 50);
//! assert!(engine.is_valid());
//! ```

pub mod balance;
pub mod chain;
pub mod engine;
pub mod pool;
pub mod queue;

// Re-export commonly used types
pub use balance::balance_of;
pub use chain::{ChainError, RecordChain};
pub use engine::{EngineConfig, EngineError, LendingEngine};
pub use pool::{LendingPool, Pledge, PoolError, PoolStatus};
pub use queue::{PendingQueue, QueueError};
