use crate::display::{rule, DEFAULT_RULE_WIDTH};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("input closed")]
    InputClosed,
    #[error("console io: {0}")]
    Io(#[from] io::Error),
}

/// Line-oriented interaction surface.
pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError>;

    fn say(&mut self, line: &str) -> Result<(), ConsoleError>;

    fn rule_width(&self) -> usize {
        DEFAULT_RULE_WIDTH
    }

    /// Print a horizontal separator.
    fn rule(&mut self) -> Result<(), ConsoleError> {
        let line = rule(self.rule_width());
        self.say(&line)
    }
}

/// Console over the process's stdin/stdout.
pub struct StdConsole {
    rule_width: usize,
}

impl StdConsole {
    pub fn new(rule_width: usize) -> Self {
        Self { rule_width }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new(DEFAULT_RULE_WIDTH)
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        let mut out = io::stdout().lock();
        out.write_all(prompt.as_bytes())?;
        out.flush()?;
        drop(out);
        let mut buf = String::new();
        if io::stdin().lock().read_line(&mut buf)? == 0 {
            return Err(ConsoleError::InputClosed);
        }
        while buf.ends_with(['\n', '\r']) {
            buf.pop();
        }
        Ok(buf)
    }

    fn say(&mut self, line: &str) -> Result<(), ConsoleError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        Ok(())
    }

    fn rule_width(&self) -> usize {
        self.rule_width
    }
}

/// Replays canned input lines and records everything shown.
/// Running out of input behaves like a closed stdin.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Every prompt and line shown so far, one entry each.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String, ConsoleError> {
        self.transcript.push(prompt.to_string());
        self.input.pop_front().ok_or(ConsoleError::InputClosed)
    }

    fn say(&mut self, line: &str) -> Result<(), ConsoleError> {
        self.transcript.push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_console_replays_then_closes() {
        let mut console = ScriptedConsole::new(["first"]);
        assert_eq!(console.read_line("> ").unwrap(), "first");
        assert!(matches!(
            console.read_line("> "),
            Err(ConsoleError::InputClosed)
        ));
        console.rule().unwrap();
        assert_eq!(console.transcript().len(), 3);
        assert_eq!(console.transcript()[2], "-".repeat(DEFAULT_RULE_WIDTH));
    }
}
