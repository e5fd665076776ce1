use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use ghostfund_core::time::bd_now;
use ghostfund_ingest::parse_chat_export;
use ghostfund_ledger::{
    ContactBook, CsvStore, LedgerStore, all_members, member_report, merge_messages,
};

const DEFAULT_STORE: &str = "ghost_fund";

#[derive(Parser, Debug)]
#[command(name = "ghostfund", version, about = "Ghost fund chat-export savings ledger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a chat export and merge new deposits into the ledger
    Ingest {
        /// Path to the exported chat .txt
        #[arg(long)]
        chat: PathBuf,

        /// Path to the contact address-book CSV
        #[arg(long)]
        contacts: PathBuf,

        /// Store directory holding ledger.csv and summary.csv
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },

    /// Print one member's savings report as JSON
    Member {
        /// Phone (exact) or name (case-insensitive)
        identifier: String,

        /// Store directory holding ledger.csv and summary.csv
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },

    /// List all savers, largest total first
    Members {
        /// Store directory holding ledger.csv and summary.csv
        #[arg(long, default_value = DEFAULT_STORE)]
        store: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { chat, contacts, store } => ingest(&chat, &contacts, store),
        Command::Member { identifier, store } => member(&identifier, store),
        Command::Members { store } => members(store),
    }
}

fn ingest(chat: &PathBuf, contacts: &PathBuf, store_dir: PathBuf) -> Result<()> {
    let text =
        fs::read_to_string(chat).with_context(|| format!("reading {}", chat.display()))?;

    let messages = parse_chat_export(&text);
    if messages.is_empty() {
        bail!("no messages parsed from {}", chat.display());
    }

    let book = ContactBook::from_csv_path(contacts)?;
    let store = CsvStore::new(store_dir);

    let existing = store.load_ledger()?;
    let outcome = merge_messages(&messages, &book, &existing);
    store.persist(&outcome.ledger, &outcome.summary)?;

    println!("New rows added:     {}", outcome.new_rows);
    println!("Total rows in data: {}", outcome.ledger.len());
    println!("Unique savers:      {}", outcome.unique_savers());
    println!("Total amount:       {}", outcome.total_amount());
    Ok(())
}

fn member(identifier: &str, store_dir: PathBuf) -> Result<()> {
    let store = CsvStore::new(store_dir);
    let ledger = store.load_ledger()?;

    let report = member_report(identifier, &ledger, bd_now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn members(store_dir: PathBuf) -> Result<()> {
    let store = CsvStore::new(store_dir);
    let ledger = store.load_ledger()?;

    if ledger.is_empty() {
        println!("No savings recorded yet.");
        return Ok(());
    }

    for m in all_members(&ledger) {
        println!(
            "{:<28} {:<20} deposits={:<4} total={}",
            m.name, m.identifier, m.count, m.total
        );
    }
    Ok(())
}
