//! Interactive session over an in-process lending engine.

use anyhow::{bail, Result};
use colored::Colorize;
use lendchain_core::Record;
use lendchain_ledger::{EngineConfig, LendingEngine};
use std::io::{self, BufRead, Write};

/// A parsed REPL command.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Submit {
        lender: String,
        borrower: String,
        amount: u64,
    },
    Commit,
    Chain,
    Pending,
    Balance(String),
    PoolCreate {
        name: String,
        target: u64,
        rate: f64,
    },
    PoolJoin {
        lender: String,
        pool: String,
    },
    Pools,
    Valid,
    Help,
    Quit,
}

impl ReplCommand {
    /// Parse one input line. Returns None for blank lines.
    fn parse(line: &str) -> Result<Option<Self>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let command = match words.as_slice() {
            [] => return Ok(None),
            ["submit", lender, borrower, amount] => ReplCommand::Submit {
                lender: lender.to_string(),
                borrower: borrower.to_string(),
                amount: amount.parse()?,
            },
            ["commit"] => ReplCommand::Commit,
            ["chain"] => ReplCommand::Chain,
            ["pending"] => ReplCommand::Pending,
            ["balance", name] => ReplCommand::Balance(name.to_string()),
            ["pool", "create", name, target, rate] => ReplCommand::PoolCreate {
                name: name.to_string(),
                target: target.parse()?,
                rate: rate.parse()?,
            },
            ["pool", "join", lender, pool] => ReplCommand::PoolJoin {
                lender: lender.to_string(),
                pool: pool.to_string(),
            },
            ["pools"] => ReplCommand::Pools,
            ["valid"] => ReplCommand::Valid,
            ["help"] => ReplCommand::Help,
            ["quit"] | ["exit"] => ReplCommand::Quit,
            _ => bail!("unrecognized command: {} (try 'help')", line.trim()),
        };
        Ok(Some(command))
    }
}

/// Run the REPL until EOF or `quit`.
pub fn run(config: EngineConfig) -> Result<()> {
    let mut engine = LendingEngine::new(config.clone());

    println!("{}", "lendchain interactive ledger".bold().cyan());
    println!(
        "Mint owner {} starts with {} (type 'help' for commands)",
        config.mint_owner.bright_yellow(),
        config.mint_cap.to_string().bright_cyan()
    );

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".bright_black());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }

        match ReplCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ReplCommand::Quit)) => break,
            Ok(Some(command)) => {
                if let Err(e) = execute(&mut engine, command) {
                    println!("{} {}", "rejected:".red().bold(), e);
                }
            }
            Err(e) => println!("{} {}", "error:".red().bold(), e),
        }
    }

    Ok(())
}

fn execute(engine: &mut LendingEngine, command: ReplCommand) -> Result<()> {
    match command {
        ReplCommand::Submit {
            lender,
            borrower,
            amount,
        } => {
            let request = engine.submit_request(&lender, &borrower, amount)?;
            println!(
                "{} {} -> {} for {} ({})",
                "queued".green(),
                lender.bright_yellow(),
                borrower.bright_yellow(),
                amount.to_string().bright_cyan(),
                request.content_hash.to_hex().bright_black()
            );
        }
        ReplCommand::Commit => {
            let sealed = engine.pending().len() + 1;
            engine.commit();
            println!(
                "{} {} record(s), chain length {}",
                "sealed".green(),
                sealed,
                engine.records().len().to_string().bright_cyan()
            );
        }
        ReplCommand::Chain => {
            for (height, record) in engine.records().iter().enumerate() {
                print_record(height, record);
            }
        }
        ReplCommand::Pending => {
            if engine.pending().is_empty() {
                println!("{}", "no pending requests".bright_black());
            }
            for request in engine.pending() {
                println!(
                    "  {} -> {} for {}",
                    request.lender.as_deref().unwrap_or("(mint)").bright_yellow(),
                    request.borrower.bright_yellow(),
                    request.amount.to_string().bright_cyan()
                );
            }
        }
        ReplCommand::Balance(name) => {
            println!(
                "  {}: {}",
                name.bright_yellow(),
                engine.balance_of(&name).to_string().bright_cyan()
            );
        }
        ReplCommand::PoolCreate { name, target, rate } => {
            engine.create_pool(&name, target, rate)?;
            println!(
                "{} pool {} targeting {} at rate {}",
                "created".green(),
                name.bright_yellow(),
                target.to_string().bright_cyan(),
                rate
            );
        }
        ReplCommand::PoolJoin { lender, pool } => {
            engine.add_lender_to_pool(&lender, &pool)?;
            println!(
                "{} {} pledged to {}",
                "joined".green(),
                lender.bright_yellow(),
                pool.bright_yellow()
            );
        }
        ReplCommand::Pools => {
            if engine.pools().is_empty() {
                println!("{}", "no pools".bright_black());
            }
            for pool in engine.pools() {
                println!(
                    "  {} {:?} {}/{} (share {})",
                    pool.name.bright_yellow(),
                    pool.status(),
                    pool.total_pledged().to_string().bright_cyan(),
                    pool.target_amount.to_string().bright_cyan(),
                    pool.share_amount()
                );
                for pledge in pool.pledges() {
                    let credential = pledge
                        .credential
                        .as_deref()
                        .map(|c| format!("{}...", &c[..16.min(c.len())]))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "    {} pledged {} credential {}",
                        pledge.lender.bright_yellow(),
                        pledge.amount,
                        credential.bright_black()
                    );
                }
            }
        }
        ReplCommand::Valid => {
            if engine.is_valid() {
                println!("{}", "ledger consistent".green().bold());
            } else {
                println!("{}", "LEDGER INCONSISTENT".red().bold());
            }
        }
        ReplCommand::Help => print_help(),
        ReplCommand::Quit => {}
    }
    Ok(())
}

fn print_record(height: usize, record: &Record) {
    let request = &record.request;
    println!(
        "  #{} {} -> {} for {} seal {} nonce {}",
        height,
        request.lender.as_deref().unwrap_or("(mint)").bright_yellow(),
        request.borrower.bright_yellow(),
        request.amount.to_string().bright_cyan(),
        format!("{:.12}", record.seal.to_hex()).bright_black(),
        record.nonce
    );
}

fn print_help() {
    println!("  submit <lender> <borrower> <amount>   queue a lending request");
    println!("  commit                                seal pending requests + mint");
    println!("  chain                                 show the record chain");
    println!("  pending                               show queued requests");
    println!("  balance <name>                        net balance by chain replay");
    println!("  pool create <name> <target> <rate>    register a loan pool");
    println!("  pool join <lender> <pool>             pledge one share");
    println!("  pools                                 list pools and pledges");
    println!("  valid                                 check chain integrity");
    println!("  quit                                  leave");
}
