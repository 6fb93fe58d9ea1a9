use anyhow::{Context, Result};
use clap::Parser;
use kiosk_core::{config_schema_json, discover, logging, session, StdConsole};
use kiosk_store::SqliteStore;
use std::path::PathBuf;

mod commands;
mod records;

use commands::Tracker;

#[derive(Parser)]
#[command(name = "kiosk-finance", version, about = "Personal finance tracker")]
struct Cli {
    /// Config file (default: $KIOSK_CONFIG, then ./kiosk.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// SQLite database; overrides the config file
    #[arg(long)]
    db: Option<PathBuf>,
    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_config_schema: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init("kiosk-finance");
    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if cli.print_config_schema {
        println!("{}", serde_json::to_string_pretty(&config_schema_json())?);
        return Ok(());
    }
    let cfg = discover(cli.config.as_deref())?;
    let path = cli.db.unwrap_or_else(|| cfg.finance_database());
    let mut store =
        SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))?;
    commands::prepare(&mut store).context("preparing finance tables")?;

    let mut console = StdConsole::new(cfg.separator_width());
    let mut tracker = Tracker::new(store);
    session::run(&mut tracker, &mut console)?;
    tracker.into_store().close()?;
    Ok(())
}
