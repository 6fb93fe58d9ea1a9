use crate::amount::Amount;
use crate::console::{Console, ConsoleError};
use crate::input::{no_commas, Answer, InvalidInput};

pub const YES_NO_HINT: &str = "Input not recognised. Please enter 'yes' or 'no'.";

/// Read until `parse` accepts the line; each rejection is shown before
/// asking again.
pub fn prompt_with<T, F>(
    console: &mut dyn Console,
    prompt: &str,
    parse: F,
) -> Result<T, ConsoleError>
where
    F: Fn(&str) -> Result<T, InvalidInput>,
{
    loop {
        let line = console.read_line(prompt)?;
        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::debug!(%err, "rejected input");
                console.say(&err.to_string())?;
            }
        }
    }
}

pub fn prompt_amount<N: Amount>(console: &mut dyn Console, prompt: &str) -> Result<N, ConsoleError> {
    prompt_with(console, prompt, N::parse_amount)
}

pub fn prompt_without_commas(
    console: &mut dyn Console,
    prompt: &str,
) -> Result<String, ConsoleError> {
    prompt_with(console, prompt, no_commas)
}

/// Ask a yes/no question until a recognised answer arrives.
pub fn confirm(console: &mut dyn Console, question: &str) -> Result<bool, ConsoleError> {
    loop {
        let line = console.read_line(question)?;
        match Answer::parse(&line) {
            Some(Answer::Yes) => return Ok(true),
            Some(Answer::No) => return Ok(false),
            None => console.say(YES_NO_HINT)?,
        }
    }
}

/// Read a free-text value and have the user confirm it, re-entering it
/// after a "no".
pub fn confirm_value(console: &mut dyn Console, prompt: &str) -> Result<String, ConsoleError> {
    loop {
        let value = console.read_line(prompt)?;
        console.rule()?;
        if confirm(console, &format!("{value} - Is this correct? (yes/no): "))? {
            return Ok(value);
        }
        console.rule()?;
        console.say("Please try again.")?;
    }
}

/// Show `options` as an indexed list and return the chosen index.
pub fn prompt_choice(
    console: &mut dyn Console,
    prompt: &str,
    options: &[&str],
) -> Result<usize, ConsoleError> {
    for (idx, label) in options.iter().enumerate() {
        console.say(&format!("{idx:>2}: {label}"))?;
    }
    let count = options.len();
    prompt_with(console, prompt, |line| {
        let idx: usize = line
            .trim()
            .parse()
            .map_err(|_| InvalidInput::Rule("Error. Input must be a number.".into()))?;
        if idx < count {
            Ok(idx)
        } else {
            Err(InvalidInput::Rule("Error. Invalid selection.".into()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use rust_decimal::Decimal;

    #[test]
    fn confirm_reprompts_on_unrecognised_answer() {
        let mut console = ScriptedConsole::new(["maybe", "Y"]);
        assert!(confirm(&mut console, "Continue? ").unwrap());
        assert_eq!(console.remaining_input(), 0);
        assert!(console.output().contains(YES_NO_HINT));
    }

    #[test]
    fn amounts_reprompt_until_numeric() {
        let mut console = ScriptedConsole::new(["lots", "", "19.999"]);
        let value: Decimal = prompt_amount(&mut console, "Amount: ").unwrap();
        assert_eq!(value.to_string(), "20.00");
        let complaints = console
            .transcript()
            .iter()
            .filter(|l| l.as_str() == InvalidInput::NotANumber.to_string())
            .count();
        assert_eq!(complaints, 2);
    }

    #[test]
    fn choice_must_be_in_range() {
        let mut console = ScriptedConsole::new(["9", "x", "1"]);
        let idx = prompt_choice(&mut console, "Pick: ", &["Salary", "Pension"]).unwrap();
        assert_eq!(idx, 1);
        let out = console.output();
        assert!(out.contains(" 0: Salary"));
        assert!(out.contains("Error. Invalid selection."));
        assert!(out.contains("Error. Input must be a number."));
    }

    #[test]
    fn confirmed_value_can_be_reentered() {
        let mut console = ScriptedConsole::new(["Dickens", "no", "Charles Dickens", "yes"]);
        let value = confirm_value(&mut console, "New author: ").unwrap();
        assert_eq!(value, "Charles Dickens");
    }

    #[test]
    fn closed_input_propagates() {
        let mut console = ScriptedConsole::new(Vec::<String>::new());
        assert!(matches!(
            confirm(&mut console, "?"),
            Err(ConsoleError::InputClosed)
        ));
    }
}
