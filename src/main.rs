use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use receipt_ledger::audit::AuditLogger;
use receipt_ledger::config::{paths, LedgerPaths, Settings};
use receipt_ledger::console::Console;
use receipt_ledger::finder::{detect_selector, ReceiptFinder};
use receipt_ledger::receipts::ReceiptStore;
use receipt_ledger::shell::Shell;
use receipt_ledger::storage::LedgerStore;
use receipt_ledger::LedgerError;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Track personal transactions and keep copies of their receipts",
    long_about = "Keeps a JSON ledger of transactions and a directory of receipt \
                  copies named after the transaction they belong to. Receipts \
                  are found by searching a directory tree, through fzf when it \
                  is installed."
)]
struct Cli {
    /// Create a new, empty ledger file (fails if the file already exists)
    #[arg(short = 'n', long = "new")]
    new_file: bool,

    /// Directory searched for receipt files [default: home directory]
    #[arg(short = 's', long = "search-directory", value_name = "DIR")]
    search_directory: Option<PathBuf>,

    /// Settings file [default: settings.json in the config directory]
    #[arg(long, value_name = "FILE", env = "RECEIPT_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Append every ledger change to this audit log
    #[arg(long, value_name = "FILE")]
    audit_log: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// JSON ledger file
    ledger_file: PathBuf,

    /// Directory holding the receipt copies
    receipts_directory: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                eprintln!("{}", e);
            }
            // Help and version go to stdout and are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(cli.config.as_deref())?;

    require_directory(&cli.receipts_directory, "Receipts directory")?;
    let search_root = match cli.search_directory {
        Some(dir) => dir,
        None => paths::home_dir()?,
    };
    require_directory(&search_root, "Search directory")?;

    let store = LedgerStore::new(&cli.ledger_file);
    let ledger = store.open(cli.new_file)?;
    if cli.new_file {
        println!("Created new ledger at {}", store.path().display());
    }

    let receipts = ReceiptStore::new(&cli.receipts_directory);
    for (id, path) in receipts.dangling(&ledger) {
        eprintln!(
            "Warning: transaction {} references missing receipt {}",
            id,
            receipts.resolve(path).display()
        );
    }

    let pager = settings.effective_pager();
    if pager.is_none() {
        warn!("PAGER is not set, long lists are printed directly");
    }
    let selector = detect_selector(&settings, pager.clone());
    debug!(selector = selector.name(), "Selector ready");

    let audit_path = cli.audit_log.or_else(|| settings.audit_log.clone());

    let mut shell = Shell::new(
        store,
        ledger,
        receipts,
        ReceiptFinder::new(search_root, &settings),
        selector,
    )
    .with_pager(pager)
    .with_currency(settings.currency_symbol.clone())
    .with_audit(audit_path.map(AuditLogger::new));

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut errors = io::stderr().lock();
    let mut console = Console::new(&mut input, &mut output, &mut errors);

    shell.run(&mut console).context("Menu loop failed")?;
    Ok(())
}

/// Settings from `--config`, else the config directory, else defaults
fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(LedgerError::Usage(format!(
                "settings file {} does not exist",
                path.display()
            ))
            .into());
        }
        return Ok(Settings::load_from(path)?);
    }

    match LedgerPaths::new() {
        Ok(paths) => Ok(Settings::load_or_create(&paths)?),
        Err(e) => {
            warn!(error = %e, "No config directory, using default settings");
            Ok(Settings::default())
        }
    }
}

fn require_directory(path: &Path, label: &str) -> Result<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(LedgerError::Usage(format!("{} {} does not exist", label, path.display())).into())
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = match std::env::var_os("RUST_LOG") {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!(
            "receipt_ledger={},{}={}",
            level,
            env!("CARGO_CRATE_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
