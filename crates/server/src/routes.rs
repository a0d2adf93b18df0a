//! HTTP routes over the lending engine.

use crate::error::ApiError;
use crate::types::{
    AddLenderBody, BalanceResponse, CommitResponse, CreatePoolBody, PoolDto, RecordDto,
    RequestDto, StatusResponse, SubmitRequestBody, ValidityResponse,
};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use lendchain_ledger::LendingEngine;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;

/// Shared engine handle. The mutex supplies the at-most-one-writer
/// serialization the core requires; handlers hold it for the full operation,
/// including the sealing search during a commit.
pub type SharedEngine = Arc<Mutex<LendingEngine>>;

fn lock(engine: &SharedEngine) -> MutexGuard<'_, LendingEngine> {
    engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Build the API router.
pub fn router(engine: SharedEngine) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/records", get(list_records))
        .route("/requests", get(list_requests).post(submit_request))
        .route("/pending", get(list_pending))
        .route("/commit", post(commit))
        .route("/balance/:name", get(balance))
        .route("/pools", get(list_pools).post(create_pool))
        .route("/pools/:name/lenders", post(add_lender))
        .route("/validity", get(validity))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

async fn status(State(engine): State<SharedEngine>) -> Json<StatusResponse> {
    let engine = lock(&engine);
    Json(StatusResponse {
        chain_length: engine.records().len(),
        pending_requests: engine.pending().len(),
        pools: engine.pools().len(),
        valid: engine.is_valid(),
        mint_owner: engine.config().mint_owner.clone(),
        mint_cap: engine.config().mint_cap,
    })
}

async fn list_records(State(engine): State<SharedEngine>) -> Json<Vec<RecordDto>> {
    let engine = lock(&engine);
    Json(engine.records().iter().map(RecordDto::from).collect())
}

async fn list_requests(State(engine): State<SharedEngine>) -> Json<Vec<RequestDto>> {
    let engine = lock(&engine);
    Json(
        engine
            .records()
            .iter()
            .map(|record| RequestDto::from(&record.request))
            .collect(),
    )
}

async fn list_pending(State(engine): State<SharedEngine>) -> Json<Vec<RequestDto>> {
    let engine = lock(&engine);
    Json(engine.pending().iter().map(RequestDto::from).collect())
}

async fn submit_request(
    State(engine): State<SharedEngine>,
    Json(body): Json<SubmitRequestBody>,
) -> Result<Json<RequestDto>, ApiError> {
    let mut engine = lock(&engine);
    let request = engine.submit_request(&body.lender, &body.borrower, body.amount)?;
    Ok(Json(RequestDto::from(&request)))
}

async fn commit(State(engine): State<SharedEngine>) -> Json<CommitResponse> {
    let mut engine = lock(&engine);
    let sealed = engine.pending().len() + 1;
    engine.commit();
    Json(CommitResponse {
        sealed,
        chain_length: engine.records().len(),
    })
}

async fn balance(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
) -> Json<BalanceResponse> {
    let engine = lock(&engine);
    let balance = engine.balance_of(&name);
    Json(BalanceResponse {
        participant: name,
        balance,
    })
}

async fn create_pool(
    State(engine): State<SharedEngine>,
    Json(body): Json<CreatePoolBody>,
) -> Result<Json<PoolDto>, ApiError> {
    let mut engine = lock(&engine);
    engine.create_pool(&body.name, body.target_amount, body.split_rate)?;
    let pool = engine
        .pools()
        .iter()
        .find(|pool| pool.name.eq_ignore_ascii_case(&body.name))
        .map(PoolDto::from)
        .ok_or_else(|| lendchain_ledger::EngineError::PoolNotFound(body.name.clone()))?;
    Ok(Json(pool))
}

async fn add_lender(
    State(engine): State<SharedEngine>,
    Path(name): Path<String>,
    Json(body): Json<AddLenderBody>,
) -> Result<Json<PoolDto>, ApiError> {
    let mut engine = lock(&engine);
    engine.add_lender_to_pool(&body.lender, &name)?;
    let pool = engine
        .pools()
        .iter()
        .find(|pool| pool.name.eq_ignore_ascii_case(&name))
        .map(PoolDto::from)
        .ok_or_else(|| lendchain_ledger::EngineError::PoolNotFound(name.clone()))?;
    Ok(Json(pool))
}

async fn list_pools(State(engine): State<SharedEngine>) -> Json<Vec<PoolDto>> {
    let engine = lock(&engine);
    Json(engine.pools().iter().map(PoolDto::from).collect())
}

async fn validity(State(engine): State<SharedEngine>) -> Json<ValidityResponse> {
    let engine = lock(&engine);
    Json(ValidityResponse {
        valid: engine.is_valid(),
    })
}
