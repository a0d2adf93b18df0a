//! Request and response shapes for the HTTP API.

use chrono::DateTime;
use lendchain_core::{LendingRequest, Record};
use lendchain_ledger::{LendingPool, Pledge, PoolStatus};
use serde::{Deserialize, Serialize};

/// Render a unix timestamp as RFC 3339.
fn rfc3339(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|moment| moment.to_rfc3339())
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
pub struct RequestDto {
    pub lender: Option<String>,
    pub borrower: String,
    pub amount: u64,
    pub created_at: String,
    pub content_hash: String,
}

impl From<&LendingRequest> for RequestDto {
    fn from(request: &LendingRequest) -> Self {
        Self {
            lender: request.lender.clone(),
            borrower: request.borrower.clone(),
            amount: request.amount,
            created_at: rfc3339(request.created_at),
            content_hash: request.content_hash.to_hex(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecordDto {
    pub request: RequestDto,
    pub previous_seal: Option<String>,
    pub created_at: String,
    pub seal: String,
    pub nonce: u64,
}

impl From<&Record> for RecordDto {
    fn from(record: &Record) -> Self {
        Self {
            request: RequestDto::from(&record.request),
            previous_seal: record.previous_seal.map(|seal| seal.to_hex()),
            created_at: rfc3339(record.created_at),
            seal: record.seal.to_hex(),
            nonce: record.nonce,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PledgeDto {
    pub lender: String,
    pub amount: u64,
    pub credential: Option<String>,
}

impl From<&Pledge> for PledgeDto {
    fn from(pledge: &Pledge) -> Self {
        Self {
            lender: pledge.lender.clone(),
            amount: pledge.amount,
            credential: pledge.credential.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PoolDto {
    pub name: String,
    pub target_amount: u64,
    pub split_rate: f64,
    pub status: PoolStatus,
    pub created_at: String,
    pub pledges: Vec<PledgeDto>,
}

impl From<&LendingPool> for PoolDto {
    fn from(pool: &LendingPool) -> Self {
        Self {
            name: pool.name.clone(),
            target_amount: pool.target_amount,
            split_rate: pool.split_rate,
            status: pool.status(),
            created_at: rfc3339(pool.created_at),
            pledges: pool.pledges().iter().map(PledgeDto::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequestBody {
    pub lender: String,
    pub borrower: String,
    pub amount: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreatePoolBody {
    pub name: String,
    pub target_amount: u64,
    pub split_rate: f64,
}

#[derive(Debug, Deserialize)]
pub struct AddLenderBody {
    pub lender: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub chain_length: usize,
    pub pending_requests: usize,
    pub pools: usize,
    pub valid: bool,
    pub mint_owner: String,
    pub mint_cap: u64,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub sealed: usize,
    pub chain_length: usize,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub participant: String,
    pub balance: i64,
}

#[derive(Debug, Serialize)]
pub struct ValidityResponse {
    pub valid: bool,
}
