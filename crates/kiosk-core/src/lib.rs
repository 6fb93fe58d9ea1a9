//! Shared building blocks for the kiosk console tools: the line-oriented
//! console, typed prompts, the guarded mutation workflow, the menu session
//! loop, configuration and logging bootstrap.

pub mod amount;
pub mod config;
pub mod console;
pub mod display;
pub mod input;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod workflow;

pub use amount::{money, Adjustment, Amount};
pub use config::{config_schema_json, discover, load_config, KioskConfig};
pub use console::{Console, ConsoleError, ScriptedConsole, StdConsole};
pub use display::TableLayout;
pub use input::{Answer, DatePattern, InvalidInput};
pub use session::{Flow, Menu, MenuError, Session, SessionError};
pub use workflow::{AbortReason, GuardedMutation, MutationPlan, Outcome, Stage, Target};
