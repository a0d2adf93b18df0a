//! lendchain HTTP server entry point.

use anyhow::Result;
use clap::Parser;
use lendchain_ledger::{EngineConfig, LendingEngine};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod error;
mod routes;
mod types;

#[derive(Parser)]
#[command(name = "lendchain-server")]
#[command(about = "HTTP API for the lendchain loan ledger", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Sealing difficulty (leading zero hex characters per seal)
    #[arg(long, default_value_t = 3)]
    difficulty: usize,

    /// Maximum amount per request, minted to the owner every commit cycle
    #[arg(long, default_value_t = 100)]
    mint_cap: u64,

    /// Identity credited by every system mint
    #[arg(long, default_value = "treasury")]
    mint_owner: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let engine = LendingEngine::new(EngineConfig {
        mint_cap: args.mint_cap,
        mint_owner: args.mint_owner,
        difficulty: args.difficulty,
    });
    let app = routes::router(Arc::new(Mutex::new(engine)));

    info!("lendchain server listening on {}", args.addr);
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
