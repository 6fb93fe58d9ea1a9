use anyhow::{Context, Result};
use jsonschema::{validator_for, Validator};
use once_cell::sync::Lazy;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::display::DEFAULT_RULE_WIDTH;

pub const CONFIG_ENV: &str = "KIOSK_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "kiosk.toml";

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct KioskConfig {
    /// Directory relative data paths resolve against (default: current dir)
    #[serde(default)]
    pub data_dir: Option<String>,
    #[serde(default)]
    pub finance: FinanceConfig,
    #[serde(default)]
    pub books: BooksConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FinanceConfig {
    /// SQLite database file (default: finance.db)
    #[serde(default)]
    pub database: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BooksConfig {
    /// SQLite database file (default: ebookstore.db)
    #[serde(default)]
    pub database: Option<String>,
    /// Insert the starter catalogue on startup (default: true)
    #[serde(default)]
    pub seed: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TasksConfig {
    #[serde(default)]
    pub tasks_file: Option<String>,
    /// Credentials file; must exist before login
    #[serde(default)]
    pub users_file: Option<String>,
    /// Account allowed to register users and view statistics (default: admin)
    #[serde(default)]
    pub admin_user: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    #[schemars(range(min = 1, max = 200))]
    #[serde(default)]
    pub separator_width: Option<usize>,
}

impl KioskConfig {
    /// `path` as-is when absolute, otherwise under `data_dir`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.data_dir {
            Some(dir) if path.is_relative() => Path::new(dir).join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn finance_database(&self) -> PathBuf {
        self.resolve(self.finance.database.as_deref().unwrap_or("finance.db"))
    }

    pub fn books_database(&self) -> PathBuf {
        self.resolve(self.books.database.as_deref().unwrap_or("ebookstore.db"))
    }

    pub fn seed_books(&self) -> bool {
        self.books.seed.unwrap_or(true)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.resolve(self.tasks.tasks_file.as_deref().unwrap_or("tasks.txt"))
    }

    pub fn users_file(&self) -> PathBuf {
        self.resolve(self.tasks.users_file.as_deref().unwrap_or("user.txt"))
    }

    pub fn admin_user(&self) -> &str {
        self.tasks.admin_user.as_deref().unwrap_or("admin")
    }

    pub fn separator_width(&self) -> usize {
        self.ui.separator_width.unwrap_or(DEFAULT_RULE_WIDTH)
    }
}

static CONFIG_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema = schemars::schema_for!(KioskConfig);
    let schema_value = serde_json::to_value(&schema).expect("schema value");
    validator_for(&schema_value).expect("valid schema")
});

/// Returns the JSON schema describing the configuration file.
///
/// # Panics
///
/// Panics if schema generation fails; this indicates a programming error.
pub fn config_schema_json() -> serde_json::Value {
    let schema = schemars::schema_for!(KioskConfig);
    serde_json::to_value(&schema).expect("schema json")
}

pub fn load_config(path: &Path) -> Result<KioskConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid config {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<KioskConfig> {
    let raw: toml::Value = toml::from_str(content)?;
    let json_value = serde_json::to_value(&raw)?;
    let validation_errors: Vec<_> = CONFIG_SCHEMA
        .iter_errors(&json_value)
        .map(|e| e.to_string())
        .collect();
    if !validation_errors.is_empty() {
        return Err(anyhow::anyhow!(validation_errors.join(", ")));
    }
    let cfg: KioskConfig = toml::from_str(content)?;
    Ok(cfg)
}

/// Explicit path, then `KIOSK_CONFIG`, then `./kiosk.toml` if present,
/// then built-in defaults. A file that was asked for must load.
pub fn discover(explicit: Option<&Path>) -> Result<KioskConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return load_config(Path::new(&path));
    }
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.is_file() {
        tracing::debug!(path = %local.display(), "using local config");
        return load_config(local);
    }
    Ok(KioskConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_against_data_dir() {
        let cfg = parse_config("data_dir = \"/srv/kiosk\"\n[books]\nseed = false\n").unwrap();
        assert_eq!(cfg.books_database(), PathBuf::from("/srv/kiosk/ebookstore.db"));
        assert_eq!(cfg.users_file(), PathBuf::from("/srv/kiosk/user.txt"));
        assert!(!cfg.seed_books());
        assert_eq!(cfg.admin_user(), "admin");
        assert_eq!(cfg.separator_width(), DEFAULT_RULE_WIDTH);
    }

    #[test]
    fn absolute_paths_ignore_data_dir() {
        let cfg = parse_config(
            "data_dir = \"data\"\n[finance]\ndatabase = \"/tmp/ledger.db\"\n[tasks]\ntasks_file = \"t.txt\"\n",
        )
        .unwrap();
        assert_eq!(cfg.finance_database(), PathBuf::from("/tmp/ledger.db"));
        assert_eq!(cfg.tasks_file(), Path::new("data").join("t.txt"));
    }

    #[test]
    fn schema_rejects_bad_values() {
        let err = parse_config("[ui]\nseparator_width = \"wide\"\n").unwrap_err();
        assert!(!err.to_string().is_empty());
        assert!(parse_config("[ui]\nseparator_width = 0\n").is_err());
        assert!(parse_config("[books]\ncolour = \"red\"\n").is_err());
    }

    #[test]
    fn load_reads_file_and_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        std::fs::write(&path, "[tasks]\nadmin_user = \"root\"\n").unwrap();
        assert_eq!(load_config(&path).unwrap().admin_user(), "root");

        let missing = dir.path().join("absent.toml");
        let err = load_config(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }

    #[test]
    fn schema_lists_sections() {
        let schema = config_schema_json();
        let text = schema.to_string();
        for section in ["finance", "books", "tasks", "ui", "data_dir"] {
            assert!(text.contains(section), "{section}");
        }
    }
}
