use anyhow::{Context, Result};
use clap::Parser;
use kiosk_core::{config_schema_json, discover, logging, session, StdConsole};
use kiosk_store::{RecordStore, SqliteStore};
use std::path::PathBuf;

mod book;
mod commands;

use book::Book;
use commands::Bookstore;

#[derive(Parser)]
#[command(name = "kiosk-books", version, about = "Bookstore stock clerk")]
struct Cli {
    /// Config file (default: $KIOSK_CONFIG, then ./kiosk.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// SQLite database; overrides the config file
    #[arg(long)]
    db: Option<PathBuf>,
    /// Skip inserting the starter catalogue
    #[arg(long)]
    no_seed: bool,
    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_config_schema: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init("kiosk-books");
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
    let path = cli.db.unwrap_or_else(|| cfg.books_database());
    let mut store =
        SqliteStore::open(&path).with_context(|| format!("opening {}", path.display()))?;
    store.ensure_table::<Book>()?;
    if cfg.seed_books() && !cli.no_seed {
        book::seed(&mut store).context("seeding starter stock")?;
    }

    let mut console = StdConsole::new(cfg.separator_width());
    let mut shop = Bookstore::new(store);
    session::run(&mut shop, &mut console)?;
    shop.into_store().close()?;
    Ok(())
}
