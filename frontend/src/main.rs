use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use finance_tracker_frontend::services::logging::init_logging;
use finance_tracker_frontend::{
    ApiClient, Config, FinanceStore, NewTransaction, Transaction, TransactionKind,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "finance-tracker", version, about = "Track incomes and expenses against the finance backend")]
struct Cli {
    /// Base URL of the finance API, e.g. http://localhost:5000/api/v1/
    #[arg(long, env = "FINANCE_API_BASE_URL")]
    base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "FINANCE_API_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List incomes or expenses
    List { kind: TransactionKind },

    /// Add an income or expense
    Add {
        kind: TransactionKind,

        #[arg(long)]
        amount: f64,

        /// Extra field sent with the transaction, as key=value (repeatable)
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Delete an income or expense by id
    Delete { kind: TransactionKind, id: String },

    /// Show totals, balance and the most recent transactions
    Summary {
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn print_transaction(kind: TransactionKind, transaction: &Transaction) {
    let title = transaction
        .detail("title")
        .and_then(|v| v.as_str())
        .unwrap_or("-");
    println!(
        "{:<8} {:<26} {:>12.2}  {}  {}",
        kind,
        transaction.id,
        transaction.amount,
        transaction.created_at.format("%Y-%m-%d %H:%M"),
        title
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::new(&cli.base_url)?;
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    info!(base_url = %config.base_url, "Starting finance tracker client");

    let mut store = FinanceStore::new(ApiClient::new(&config)?);

    match cli.command {
        Command::List { kind } => {
            store.fetch(kind).await.context("Failed to load transactions")?;
            for transaction in store.transactions(kind) {
                print_transaction(kind, transaction);
            }
        }
        Command::Add { kind, amount, fields } => {
            let item = fields
                .into_iter()
                .fold(NewTransaction::new(amount), |item, (key, value)| item.with_field(key, value));
            store.add(kind, &item).await.context("Failed to add transaction")?;
            println!("Added {}; {} {}s on record", kind, store.transactions(kind).len(), kind);
        }
        Command::Delete { kind, id } => {
            store.delete(kind, &id).await.context("Failed to delete transaction")?;
            println!("Deleted {} {}", kind, id);
        }
        Command::Summary { limit } => {
            store.refresh_all().await.context("Failed to load transactions")?;
            println!("Total income:   {:>12.2}", store.total_income());
            println!("Total expenses: {:>12.2}", store.total_expenses());
            println!("Balance:        {:>12.2}", store.total_balance());
            println!();
            println!("Recent history:");
            for entry in store.history(limit) {
                print_transaction(entry.kind, entry.transaction);
            }
        }
    }

    Ok(())
}
