use anyhow::{Context, Result};
use clap::Parser;
use kiosk_core::{config_schema_json, discover, logging, session, ConsoleError, StdConsole};
use kiosk_store::{FlatFileStore, RecordStore};
use std::path::PathBuf;

mod commands;
mod login;
mod task;
mod users;

use commands::TaskManager;
use task::{Task, TASKS};
use users::UserDirectory;

#[derive(Parser)]
#[command(name = "kiosk-tasks", version, about = "Team task manager")]
struct Cli {
    /// Config file (default: $KIOSK_CONFIG, then ./kiosk.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Tasks file; overrides the config file
    #[arg(long)]
    tasks_file: Option<PathBuf>,
    /// Credentials file; overrides the config file
    #[arg(long)]
    users_file: Option<PathBuf>,
    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_config_schema: bool,
}

fn main() {
    let cli = Cli::parse();
    logging::init("kiosk-tasks");
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
    let users_path = cli.users_file.unwrap_or_else(|| cfg.users_file());
    let tasks_path = cli.tasks_file.unwrap_or_else(|| cfg.tasks_file());

    let users = UserDirectory::load(&users_path).with_context(|| {
        format!(
            "Error. \"{}\" not found. Cannot proceed with login",
            users_path.display()
        )
    })?;
    let dir = tasks_path
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut store = FlatFileStore::new(dir).with_file(TASKS.name, &tasks_path);
    store
        .ensure_table::<Task>()
        .with_context(|| format!("opening {}", tasks_path.display()))?;

    let mut console = StdConsole::new(cfg.separator_width());
    let username = match login::login(&mut console, &users) {
        Ok(name) => name,
        Err(ConsoleError::InputClosed) => return Ok(()),
        Err(err) => return Err(err.into()),
    };
    let today = chrono::Local::now().date_naive();
    let mut manager = TaskManager::new(store, users, username, cfg.admin_user().to_string(), today);
    session::run(&mut manager, &mut console)?;
    Ok(())
}
