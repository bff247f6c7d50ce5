//! timesync: make TimeCamp hold exactly the entries of a local CSV time log.
//!
//! ```text
//! timesync [sync] [--from yyyy-MM-dd] [--to yyyy-MM-dd] [--dry-run]
//! timesync fetch --from yyyy-MM-dd --to yyyy-MM-dd [--json]
//! timesync init
//! timesync token set <TOKEN> | timesync token clear
//! ```

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use timesync::infrastructure::config::ensure_default_config;
use timesync::infrastructure::credential_store::{CredentialStore, KeyringCredentialStore};
use timesync::infrastructure::entry_mapper::TimeCampEntry;
use timesync::infrastructure::time_log::TimeLog;
use timesync::{TimeLogEntry, bootstrap_sync};
use tracing_subscriber::EnvFilter;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Parser, Debug)]
#[command(
    name = "timesync",
    version,
    about = "Synchronize a local CSV time log into TimeCamp"
)]
struct Cli {
    /// Directory containing appsettings.json
    #[arg(long, global = true, value_name = "PATH", default_value = ".")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rewrite TimeCamp entries in a date range to match the time log (default).
    Sync(SyncArgs),
    /// Print TimeCamp entries in a date range as time log rows.
    Fetch(FetchArgs),
    /// Write a starter appsettings.json into the config directory.
    Init,
    /// Manage the TimeCamp API token stored in the OS keyring.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Args, Debug, Default)]
struct SyncArgs {
    /// First day of the range; prompted for when omitted
    #[arg(long, value_parser = parse_date)]
    from: Option<NaiveDate>,
    /// Last day of the range; prompted for when omitted
    #[arg(long, value_parser = parse_date)]
    to: Option<NaiveDate>,
    /// Show what would change without touching TimeCamp
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct FetchArgs {
    #[arg(long, value_parser = parse_date)]
    from: NaiveDate,
    #[arg(long, value_parser = parse_date)]
    to: NaiveDate,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum TokenCommand {
    /// Store a TimeCamp API token
    Set { token: String },
    /// Remove the stored token
    Clear,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| format!("failed to parse '{value}'; expected format yyyy-MM-dd"))
}

fn prompt_date(label: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<NaiveDate> {
    writeln!(output, "{label}?")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no value given for {label}");
    }
    parse_date(&line).map_err(anyhow::Error::msg)
}

fn describe_entry(entry: &TimeLogEntry) -> String {
    format!(
        "{} {}-{} {}: {}",
        entry.date,
        entry.start.format("%H:%M"),
        entry.end.format("%H:%M"),
        entry.service,
        entry.description
    )
}

fn describe_remote(entry: &TimeCampEntry) -> String {
    format!(
        "{} {}-{} task {}: {}",
        entry.date,
        entry.start.format("%H:%M"),
        entry.end.format("%H:%M"),
        entry.task_id,
        entry.description
    )
}

fn resolve_range(args: &SyncArgs) -> Result<(NaiveDate, NaiveDate)> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    let from = match args.from {
        Some(from) => from,
        None => prompt_date("From", &mut input, &mut output)?,
    };
    let to = match args.to {
        Some(to) => to,
        None => prompt_date("To", &mut input, &mut output)?,
    };
    Ok((from, to))
}

async fn run_sync(config_dir: &Path, args: SyncArgs) -> Result<()> {
    let (from, to) = resolve_range(&args)?;
    let context = bootstrap_sync(config_dir, &KeyringCredentialStore::default())
        .context("failed to load configuration")?;

    let entries = context
        .time_log
        .get_entries(from, to)
        .with_context(|| format!("failed to read {}", context.time_log.path().display()))?;

    if args.dry_run {
        let plan = context.service.plan_entries(from, to, &entries).await?;
        for entry in &plan.to_add {
            println!("+ {}", describe_remote(entry));
        }
        for entry in &plan.to_remove {
            println!("- {}", describe_remote(entry));
        }
        println!(
            "{} to add, {} to remove, {} unchanged.",
            plan.to_add.len(),
            plan.to_remove.len(),
            plan.unchanged
        );
        return Ok(());
    }

    context.service.sync_entries(from, to, &entries).await?;
    println!("{} entries recorded.", entries.len());
    Ok(())
}

async fn run_fetch(config_dir: &Path, args: FetchArgs) -> Result<()> {
    let context = bootstrap_sync(config_dir, &KeyringCredentialStore::default())
        .context("failed to load configuration")?;
    let entries = context.service.fetch_entries(args.from, args.to).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", describe_entry(entry));
        }
    }
    Ok(())
}

fn run_token(command: TokenCommand) -> Result<()> {
    let store = KeyringCredentialStore::default();
    match command {
        TokenCommand::Set { token } => {
            store.save_token(&token)?;
            println!("Token stored.");
        }
        TokenCommand::Clear => {
            store.delete_token()?;
            println!("Token removed.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("timesync=info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => run_sync(&cli.config_dir, args).await,
        Commands::Fetch(args) => run_fetch(&cli.config_dir, args).await,
        Commands::Init => {
            if ensure_default_config(&cli.config_dir)? {
                println!("Wrote {}", cli.config_dir.join("appsettings.json").display());
            } else {
                println!("Configuration already exists.");
            }
            Ok(())
        }
        Commands::Token { command } => run_token(command),
    }
}
