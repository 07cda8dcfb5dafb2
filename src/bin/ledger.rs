use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bath_roi::{
    client::{ApiClient, DEFAULT_BASE_URL, Ledger},
    transaction::{NewTransaction, Transaction, TransactionType},
};

/// A command line front end for the bath ledger API.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address of the bath ledger server.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all transactions, most recent first, followed by the totals.
    List,
    /// Record an income or expense.
    Add {
        /// Either "income" or "expense".
        #[arg(value_parser = parse_transaction_type)]
        kind: TransactionType,
        /// The amount of money, at least 0.01.
        amount: f64,
        /// What the money was for.
        description: String,
    },
    /// Delete a transaction by its ID.
    Delete {
        /// The ID of the transaction.
        id: i64,
    },
    /// Print the current bath price.
    Price,
    /// Change the bath price.
    SetPrice {
        /// The new price, at least 1.
        price: i64,
    },
}

fn parse_transaction_type(text: &str) -> Result<TransactionType, String> {
    text.parse().map_err(|error| format!("{error}"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let client = match ApiClient::new(&args.base_url) {
        Ok(client) => client,
        Err(error) => {
            eprintln!("Could not create API client: {error}");
            return ExitCode::FAILURE;
        }
    };
    let mut ledger = Ledger::new(client);

    run(args.command, &mut ledger).await;

    match ledger.error() {
        Some(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

async fn run(command: Command, ledger: &mut Ledger) {
    match command {
        Command::List => {
            ledger.fetch_transactions().await;
            if ledger.error().is_some() {
                return;
            }

            for transaction in ledger.transactions() {
                println!("{}", format_transaction(transaction));
            }
            println!("Total income:  {:.2}", ledger.total_income());
            println!("Total expense: {:.2}", ledger.total_expense());
        }
        Command::Add {
            kind,
            amount,
            description,
        } => {
            let new_transaction = NewTransaction {
                kind,
                amount,
                description,
            };

            if let Ok(transaction) = ledger.add_transaction(new_transaction).await {
                println!("Added {}", format_transaction(&transaction));
            }
        }
        Command::Delete { id } => {
            ledger.delete_transaction(id).await;
            if ledger.error().is_none() {
                println!("Deleted transaction {id}");
            }
        }
        Command::Price => {
            ledger.fetch_bath_price().await;
            if ledger.error().is_none() {
                println!("{}", ledger.bath_price());
            }
        }
        Command::SetPrice { price } => {
            ledger.update_bath_price(price).await;
            if ledger.error().is_none() {
                println!("Bath price set to {}", ledger.bath_price());
            }
        }
    }
}

fn format_transaction(transaction: &Transaction) -> String {
    format!(
        "#{} {} {:<7} {:>12.2}  {}",
        transaction.id,
        transaction.created_at.date(),
        transaction.kind.as_str(),
        transaction.amount,
        transaction.description
    )
}
