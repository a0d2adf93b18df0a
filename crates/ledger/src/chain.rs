//! The append-only chain of sealed records.

use lendchain_core::{LendingRequest, Record, Sealer};
use thiserror::Error;

/// Errors that can occur during chain operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("the record chain is empty")]
    EmptyChain,
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// An ordered, append-only sequence of sealed records.
///
/// Each appended record links backward to the previous record's seal, so the
/// tail advances with every append. Records are never removed or edited;
/// [`RecordChain::is_valid`] reports inconsistency but never repairs it.
pub struct RecordChain {
    records: Vec<Record>,
    sealer: Sealer,
}

impl RecordChain {
    /// Create an empty chain sealing with the given sealer.
    pub fn new(sealer: Sealer) -> Self {
        Self {
            records: Vec::new(),
            sealer,
        }
    }

    /// Seal a request into a new record linked to the current tail.
    ///
    /// Blocks for the duration of the proof-of-work search.
    pub fn append(&mut self, request: LendingRequest, at: u64) {
        let previous_seal = self.records.last().map(|record| record.seal);
        let record = Record::sealed(request, previous_seal, at, &self.sealer);
        self.records.push(record);
    }

    /// The most recently appended record.
    pub fn latest(&self) -> Result<&Record> {
        self.records.last().ok_or(ChainError::EmptyChain)
    }

    /// Walk the whole chain and verify its integrity:
    ///
    /// - the first record is a genesis record (no previous seal),
    /// - every record's previous seal matches its predecessor's seal,
    /// - every record's stored seal equals its recomputed digest,
    /// - no record's timestamp exceeds the tail record's timestamp.
    ///
    /// Advisory only: a broken chain is reported, never repaired.
    pub fn is_valid(&self) -> bool {
        let Some(tail) = self.records.last() else {
            return true;
        };
        if !self.records[0].is_genesis() {
            return false;
        }
        let records_sound = self
            .records
            .iter()
            .all(|record| record.verify_seal() && record.created_at <= tail.created_at);
        let links_sound = self
            .records
            .windows(2)
            .all(|pair| pair[1].previous_seal == Some(pair[0].seal));

        records_sound && links_sound
    }

    /// Read-only snapshot of the chain contents.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records in the chain.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the chain holds no records yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sealer this chain seals with.
    pub fn sealer(&self) -> &Sealer {
        &self.sealer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendchain_core::hash;

    fn chain_with(requests: &[(&str, &str, u64)]) -> RecordChain {
        let mut chain = RecordChain::new(Sealer::new(1));
        chain.append(LendingRequest::minted("Femi", 100, 1_700_000_000), 1_700_000_000);
        for (i, (lender, borrower, amount)) in requests.iter().enumerate() {
            let at = 1_700_000_001 + i as u64;
            chain.append(LendingRequest::new(*lender, *borrower, *amount, at), at);
        }
        chain
    }

    #[test]
    fn test_empty_chain_is_valid() {
        let chain = RecordChain::new(Sealer::new(1));
        assert!(chain.is_valid());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_latest_fails_on_empty_chain() {
        let chain = RecordChain::new(Sealer::new(1));
        assert_eq!(chain.latest().unwrap_err(), ChainError::EmptyChain);
    }

    #[test]
    fn test_appended_records_link_to_tail() {
        let chain = chain_with(&[("Femi", "John", 50), ("John", "Mary", 10)]);

        assert_eq!(chain.len(), 3);
        let records = chain.records();
        assert!(records[0].is_genesis());
        assert_eq!(records[1].previous_seal, Some(records[0].seal));
        assert_eq!(records[2].previous_seal, Some(records[1].seal));
        assert_eq!(chain.latest().unwrap().seal, records[2].seal);
    }

    #[test]
    fn test_chain_valid_after_appends() {
        let chain = chain_with(&[("Femi", "John", 50), ("John", "Mary", 10)]);
        assert!(chain.is_valid());
        // idempotent without mutation
        assert!(chain.is_valid());
    }

    #[test]
    fn test_tampered_request_invalidates_chain() {
        let mut chain = chain_with(&[("Femi", "John", 50)]);
        chain.records[1].request = LendingRequest::new("Femi", "John", 5_000, 1_700_000_001);
        assert!(!chain.is_valid());
    }

    #[test]
    fn test_broken_link_invalidates_chain() {
        let mut chain = chain_with(&[("Femi", "John", 50), ("John", "Mary", 10)]);
        chain.records[2].previous_seal = Some(hash(b"forged"));
        assert!(!chain.is_valid());
    }

    #[test]
    fn test_timestamp_after_tail_invalidates_chain() {
        let mut chain = chain_with(&[("Femi", "John", 50), ("John", "Mary", 10)]);
        // middle record claims a creation time later than the tail's
        chain.records[1].created_at = chain.records[2].created_at + 60;
        chain.records[1].seal = chain.records[1].compute_seal();
        chain.records[2].previous_seal = Some(chain.records[1].seal);
        chain.records[2].seal = chain.records[2].compute_seal();
        assert!(!chain.is_valid());
    }

    #[test]
    fn test_missing_genesis_invalidates_chain() {
        let mut chain = RecordChain::new(Sealer::new(1));
        chain.append(LendingRequest::minted("Femi", 100, 1_700_000_000), 1_700_000_000);
        chain.records[0].previous_seal = Some(hash(b"phantom parent"));
        chain.records[0].seal = chain.records[0].compute_seal();
        assert!(!chain.is_valid());
    }
}
