//! Holding area for requests awaiting the next commit cycle.

use lendchain_core::{Hash, LendingRequest};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur during queue operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("duplicate lending request not allowed")]
    DuplicateRequest,
}

pub type Result<T> = std::result::Result<T, QueueError>;

/// FIFO queue of unsealed lending requests.
///
/// Content-hash equality is the de-duplication key: a request matching one
/// already queued is rejected. Draining preserves submission order so a commit
/// cycle seals requests in the order they arrived.
#[derive(Default)]
pub struct PendingQueue {
    requests: Vec<LendingRequest>,
    hashes: HashSet<Hash>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a request, rejecting duplicates by content hash.
    pub fn add(&mut self, request: LendingRequest) -> Result<()> {
        if self.hashes.contains(&request.content_hash) {
            return Err(QueueError::DuplicateRequest);
        }
        self.hashes.insert(request.content_hash);
        self.requests.push(request);
        Ok(())
    }

    /// Remove and return every queued request in submission order.
    pub fn drain(&mut self) -> Vec<LendingRequest> {
        self.hashes.clear();
        std::mem::take(&mut self.requests)
    }

    /// Check if a request with this content hash is queued.
    pub fn contains(&self, content_hash: &Hash) -> bool {
        self.hashes.contains(content_hash)
    }

    /// Read-only snapshot of the queued requests.
    pub fn requests(&self) -> &[LendingRequest] {
        &self.requests
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
