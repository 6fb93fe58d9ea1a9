//! Menu-driven loop shared by the three apps.

use crate::console::{Console, ConsoleError};
use kiosk_store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("Invalid entry. Choice must be a number.")]
    NotANumber,
    #[error("Invalid option. Please try again.")]
    OutOfRange,
    #[error("Input not recognised, please try again.")]
    Unrecognised,
}

#[derive(Debug, Clone)]
enum Keys {
    /// `1..=n` in entry order.
    Numbered,
    /// Each entry carries its own tokens.
    Mnemonic,
}

#[derive(Debug, Clone)]
struct MenuEntry<A> {
    tokens: Vec<&'static str>,
    label: &'static str,
    action: A,
    hidden: bool,
}

/// Enumerated choices mapped to actions.
#[derive(Debug, Clone)]
pub struct Menu<A> {
    title: &'static str,
    keys: Keys,
    entries: Vec<MenuEntry<A>>,
}

impl<A: Clone> Menu<A> {
    pub fn numbered(title: &'static str) -> Self {
        Self {
            title,
            keys: Keys::Numbered,
            entries: Vec::new(),
        }
    }

    pub fn mnemonic(title: &'static str) -> Self {
        Self {
            title,
            keys: Keys::Mnemonic,
            entries: Vec::new(),
        }
    }

    /// Append a numbered entry. Its number is its position, from 1.
    pub fn item(mut self, label: &'static str, action: A) -> Self {
        self.entries.push(MenuEntry {
            tokens: Vec::new(),
            label,
            action,
            hidden: false,
        });
        self
    }

    /// Append a mnemonic entry; every token selects it, the first is shown.
    pub fn key(mut self, tokens: &[&'static str], label: &'static str, action: A) -> Self {
        self.entries.push(MenuEntry {
            tokens: tokens.to_vec(),
            label,
            action,
            hidden: false,
        });
        self
    }

    /// Leave entries matching `hide` out of the rendered menu. They still
    /// parse, so the action can explain why it is unavailable.
    pub fn conceal(mut self, hide: impl Fn(&A) -> bool) -> Self {
        for entry in &mut self.entries {
            entry.hidden = hide(&entry.action);
        }
        self
    }

    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        if !self.title.is_empty() {
            lines.push(self.title.to_string());
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.hidden {
                continue;
            }
            lines.push(match self.keys {
                Keys::Numbered => format!("{}. {}", idx + 1, entry.label),
                Keys::Mnemonic => {
                    format!("{} - {}", entry.tokens.first().copied().unwrap_or(""), entry.label)
                }
            });
        }
        lines
    }

    /// Trimmed, case-insensitive lookup.
    pub fn parse(&self, input: &str) -> Result<A, MenuError> {
        let input = input.trim();
        match self.keys {
            Keys::Numbered => {
                let n: usize = input.parse().map_err(|_| MenuError::NotANumber)?;
                n.checked_sub(1)
                    .and_then(|idx| self.entries.get(idx))
                    .map(|e| e.action.clone())
                    .ok_or(MenuError::OutOfRange)
            }
            Keys::Mnemonic => {
                self.entries
                    .iter()
                    .find(|e| e.tokens.iter().any(|t| t.eq_ignore_ascii_case(input)))
                    .map(|e| e.action.clone())
                    .ok_or(MenuError::Unrecognised)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Console(#[from] ConsoleError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One app's menu and the actions behind it.
pub trait Session {
    type Action: Clone;

    fn menu(&self) -> Menu<Self::Action>;

    fn prompt(&self) -> &str {
        "Enter your choice: "
    }

    fn dispatch(
        &mut self,
        console: &mut dyn Console,
        action: Self::Action,
    ) -> Result<Flow, SessionError>;
}

/// Show the menu, dispatch, repeat until an action returns [`Flow::Exit`]
/// or input closes. Store errors from one action are reported and the
/// loop carries on.
pub fn run<S: Session>(session: &mut S, console: &mut dyn Console) -> Result<(), ConsoleError> {
    loop {
        let menu = session.menu();
        console.rule()?;
        for line in menu.render() {
            console.say(&line)?;
        }
        let line = match console.read_line(session.prompt()) {
            Ok(line) => line,
            Err(ConsoleError::InputClosed) => {
                tracing::debug!("input closed at menu");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let action = match menu.parse(&line) {
            Ok(action) => action,
            Err(err) => {
                console.say(&err.to_string())?;
                continue;
            }
        };
        match session.dispatch(console, action) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(SessionError::Store(err)) => {
                tracing::warn!(error = %err, "action failed");
                console.say(&format!("An error occurred: {err}"))?;
            }
            Err(SessionError::Console(ConsoleError::InputClosed)) => {
                tracing::debug!("input closed mid-action");
                return Ok(());
            }
            Err(SessionError::Console(err)) => return Err(err),
        }
    }
}
