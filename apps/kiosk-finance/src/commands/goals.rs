use crate::records::Goal;
use kiosk_core::input::InvalidInput;
use kiosk_core::prompt::prompt_with;
use kiosk_core::session::SessionError;
use kiosk_core::workflow::{GuardedMutation, MutationPlan, Target};
use kiosk_core::{money, Adjustment, Amount, Console, DatePattern};
use kiosk_store::RecordStore;
use rust_decimal::Decimal;

const MIN_NAME_LEN: usize = 4;

/// First letter upper case, the rest lower case.
fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn goal_name(input: &str) -> Result<String, InvalidInput> {
    let name = capitalize(input.trim());
    if name.chars().count() < MIN_NAME_LEN {
        return Err(InvalidInput::Rule(format!(
            "Please enter at least {MIN_NAME_LEN} characters for the name of the goal."
        )));
    }
    Ok(name)
}

fn target_amount(input: &str) -> Result<Decimal, InvalidInput> {
    let value = Decimal::parse_amount(input)
        .map_err(|_| InvalidInput::Rule("Target amount must be a number.".into()))?;
    if value.is_zero() {
        Err(InvalidInput::Rule("Target amount cannot be equal to zero.".into()))
    } else if value.is_sign_negative() {
        Err(InvalidInput::Rule("Target amount cannot be a negative number.".into()))
    } else {
        Ok(value)
    }
}

fn saved_amount(input: &str) -> Result<Decimal, InvalidInput> {
    let value = Decimal::parse_amount(input)
        .map_err(|_| InvalidInput::Rule("Saved amount must be a number.".into()))?;
    if value.is_sign_negative() && !value.is_zero() {
        Err(InvalidInput::Rule("Saved amount cannot be less than zero.".into()))
    } else {
        Ok(value)
    }
}

fn summary(goal: &Goal) -> Vec<String> {
    let progress = goal
        .progress_percent()
        .map(|pct| format!("{pct}%"))
        .unwrap_or_else(|| "n/a".to_string());
    vec![
        format!("Current goal: {}", goal.goal),
        format!("Target amount: £{}", money(goal.target_amount)),
        format!("Total saved: £{}", money(goal.saved_amount)),
        format!("Amount remaining: £{} ({progress})", money(goal.remaining())),
        format!("Deadline: {}", DatePattern::DayMonthYear.format(goal.deadline)),
    ]
}

pub fn set<S: RecordStore>(store: &mut S, console: &mut dyn Console) -> Result<(), SessionError> {
    console.rule()?;
    let goal = prompt_with(console, "What are you saving for?: ", goal_name)?;
    let target = prompt_with(console, "How much would you like to save?: £", target_amount)?;
    let saved = prompt_with(console, "How much have you saved already?: £", saved_amount)?;
    let deadline = prompt_with(console, "Please enter the deadline (DD-MM-YYYY): ", |s| {
        DatePattern::DayMonthYear.parse(s)
    })?;
    let goal = store.insert_new(Goal {
        id: 0,
        goal,
        target_amount: target,
        saved_amount: saved,
        deadline,
    })?;
    tracing::info!(id = goal.id, "goal created");
    console.rule()?;
    console.say(&format!("Goal '{}' saved.", goal.goal))?;
    Ok(())
}

pub fn progress<S: RecordStore>(store: &S, console: &mut dyn Console) -> Result<(), SessionError> {
    let needle = console.read_line("Please enter goal name: ")?;
    match store.first_partial_match::<Goal>("goal", needle.trim())? {
        Some(goal) => {
            console.rule()?;
            for line in summary(&goal) {
                console.say(&line)?;
            }
            console.rule()?;
        }
        None => console.say("No results found.")?,
    }
    Ok(())
}

fn funds_plan() -> MutationPlan<Goal, Decimal> {
    MutationPlan {
        target: Target::PartialMatch {
            field: "goal",
            prompt: "Please enter goal name: ",
        },
        field: "saved_amount",
        mode: Adjustment::Add,
        current: |g| Some(g.saved_amount),
        describe: summary,
        question: |g| format!("Do you want to add funds to '{}'? (yes/no): ", g.goal),
        amount_prompt: "Please enter amount to add towards goal: £",
        success: |g| format!("Goal updated! Total saved: £{}", money(g.saved_amount)),
    }
}

pub fn add_funds<S: RecordStore>(
    store: &mut S,
    console: &mut dyn Console,
) -> Result<(), SessionError> {
    console.rule()?;
    GuardedMutation::new(store, funds_plan()).run(console)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::store;
    use kiosk_core::ScriptedConsole;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn names_are_capitalised_and_checked() {
        assert_eq!(goal_name("  new CAR ").unwrap(), "New car");
        assert!(goal_name("tv").is_err());
        assert_eq!(capitalize("élan"), "Élan");
    }

    #[test]
    fn amounts_are_range_checked() {
        assert!(target_amount("0").is_err());
        assert!(target_amount("-5").is_err());
        assert_eq!(target_amount("250").unwrap(), dec("250.00"));
        assert_eq!(saved_amount("0").unwrap(), Decimal::ZERO);
        assert!(saved_amount("-0.01").is_err());
    }

    #[test]
    fn create_then_fund_then_check_progress() {
        let mut store = store();
        let mut console = ScriptedConsole::new([
            "car", "holiday", "0", "600", "-1", "150", "1-6-2025", "01-06-2025",
        ]);
        set(&mut store, &mut console).unwrap();
        let out = console.output();
        assert!(out.contains("Please enter at least 4 characters"));
        assert!(out.contains("Target amount cannot be equal to zero."));
        assert!(out.contains("Saved amount cannot be less than zero."));
        assert!(out.contains("Goal 'Holiday' saved."));

        let mut console = ScriptedConsole::new(["Holi", "yes", "50"]);
        add_funds(&mut store, &mut console).unwrap();
        let goal = store.find_by_id::<Goal>(1).unwrap();
        assert_eq!(goal.saved_amount, dec("200.00"));
        assert!(console.output().contains("Goal updated! Total saved: £200.00"));

        let mut console = ScriptedConsole::new(["Holiday"]);
        progress(&store, &mut console).unwrap();
        let out = console.output();
        assert!(out.contains("Amount remaining: £400.00 (33.33%)"));
        assert!(out.contains("Deadline: 01-06-2025"));
    }

    #[test]
    fn declining_funds_changes_nothing() {
        let mut store = store();
        store
            .insert_new(Goal {
                id: 0,
                goal: "Wedding".into(),
                target_amount: dec("5000"),
                saved_amount: dec("10"),
                deadline: chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            })
            .unwrap();
        let mut console = ScriptedConsole::new(["Wed", "no"]);
        add_funds(&mut store, &mut console).unwrap();
        assert_eq!(store.find_by_id::<Goal>(1).unwrap().saved_amount, dec("10"));

        let mut console = ScriptedConsole::new(["Boat"]);
        progress(&store, &mut console).unwrap();
        assert!(console.output().contains("No results found."));
    }
}
