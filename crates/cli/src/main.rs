//! lendchain CLI entry point.

use clap::{Parser, Subcommand};
use lendchain_ledger::EngineConfig;

mod demo;
mod repl;

#[derive(Parser)]
#[command(name = "lendchain")]
#[command(about = "An in-memory ledger for group-funded loans", long_about = None)]
struct Cli {
    /// Sealing difficulty (leading zero hex characters per seal)
    #[arg(long, default_value_t = 3)]
    difficulty: usize,

    /// Maximum amount per request, minted to the owner every commit cycle
    #[arg(long, default_value_t = 100)]
    mint_cap: u64,

    /// Identity credited by every system mint
    #[arg(long, default_value = "Femi")]
    mint_owner: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session over a fresh in-memory ledger
    Repl,
    /// Scripted walkthrough: fund lenders, commit, fund a pool to completion
    Demo,
}

fn main() {
    let cli = Cli::parse();
    let config = EngineConfig {
        mint_cap: cli.mint_cap,
        mint_owner: cli.mint_owner.clone(),
        difficulty: cli.difficulty,
    };

    match cli.command {
        Some(cmd) => {
            let result = match cmd {
                Commands::Repl => repl::run(config),
                Commands::Demo => demo::run(config),
            };
            if let Err(e) = result {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("lendchain - An in-memory ledger for group-funded loans");
            println!("Run 'lendchain --help' for usage information.");
        }
    }
}
