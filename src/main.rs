mod db;
mod error;
mod models;
mod operations;
mod repository;
mod screens;
mod viewmodel;

use clap::{Parser, Subcommand};
use repository::TransactionRepository;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Records credits and debits and shows the running balance.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, default_value = "cash_flow.db")]
    db_path: String,

    /// File the log is appended to. The terminal is reserved for the UI.
    #[arg(long, default_value = "cash_flow.log")]
    log_file: String,

    /// Most verbose level written to the log (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        /// Free-text date, usually dd/mm/yyyy.
        #[arg(long)]
        date: String,
        /// credit or debit.
        #[arg(long = "type")]
        transaction_type: String,
        /// salary/extras for credits, food/transport/health/housing for debits.
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the totals and every transaction, most recent first.
    Statement,
    /// Print the net balance.
    Balance,
    /// Delete a transaction by ID.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = setup_logging(&args.log_file, args.log_level) {
        eprintln!("Could not open log file '{}': {}", args.log_file, e);
        return ExitCode::FAILURE;
    }

    let conn = match db::connection::establish_connection(&args.db_path) {
        Ok(conn) => conn,
        Err(e) => {
            tracing::error!("Failed to open database {}: {}", args.db_path, e);
            eprintln!("Failed to open database '{}': {}", args.db_path, e);
            return ExitCode::FAILURE;
        }
    };
    let repository = TransactionRepository::new(conn);

    match run(repository, args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(repository: TransactionRepository, command: Option<Command>) -> Result<(), String> {
    match command {
        None => screens::run_app(repository)
            .await
            .map_err(|e| format!("Terminal UI failed: {}", e)),
        Some(Command::Add {
            amount,
            description,
            date,
            transaction_type,
            category,
        }) => {
            operations::add::add_transaction_to_db(
                &repository,
                &amount,
                &description,
                &date,
                &transaction_type,
                category.as_deref(),
            )
            .await?;
            println!("Transaction added successfully!");
            Ok(())
        }
        Some(Command::Statement) => {
            let state = operations::statement::load_statement(&repository).await?;
            println!("{}", operations::statement::format_statement(&state));
            Ok(())
        }
        Some(Command::Balance) => {
            let state = operations::statement::load_statement(&repository).await?;
            println!("{}", operations::statement::format_summary(&state));
            Ok(())
        }
        Some(Command::Delete { id, yes }) => {
            let confirm = |summary: &str| yes || confirm_on_stdin(summary);
            let removed =
                operations::remove::remove_transaction_from_db(&repository, &id, confirm).await?;
            if removed {
                println!("Transaction removed successfully.");
            } else {
                println!("Deletion cancelled.");
            }
            Ok(())
        }
    }
}

fn confirm_on_stdin(summary: &str) -> bool {
    print!("Delete {}? [y/N] ", summary);
    if io::stdout().flush().is_err() {
        return false;
    }
    match read_user_input() {
        Ok(answer) => matches!(answer.to_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            println!("Error reading input: {}", e);
            false
        }
    }
}

fn read_user_input() -> Result<String, String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|_| "Failed to read line".to_string())?;
    Ok(input.trim().to_string())
}

fn setup_logging(path: &str, level: LevelFilter) -> io::Result<()> {
    let log_file = OpenOptions::new().create(true).append(true).open(path)?;

    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(file_log.with_filter(level))
        .init();

    Ok(())
}
