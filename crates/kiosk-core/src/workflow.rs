//! Search, confirm, then mutate one numeric field.
//!
//! A [`GuardedMutation`] walks `Searching → Found → Confirming →
//! (Applying | Aborted)`. Nothing is written to the store unless the user
//! answers yes at the confirmation step. Apps either call
//! [`GuardedMutation::run`] for the whole walk, or [`GuardedMutation::resolve`]
//! followed by [`GuardedMutation::apply_with`] when the adjustment mode is
//! picked after the record is confirmed.

use crate::amount::{Adjustment, Amount};
use crate::console::{Console, ConsoleError};
use crate::prompt::{confirm, prompt_with};
use kiosk_store::{Record, RecordId, RecordStore, StoreError};
use std::fmt;

/// How the record to mutate is located.
#[derive(Debug, Clone, Copy)]
pub enum Target {
    /// First row whose `field` contains the entered text.
    PartialMatch {
        field: &'static str,
        prompt: &'static str,
    },
    /// Exact id; `exit` backs out.
    Id { prompt: &'static str },
}

/// Static description of one guarded mutation.
pub struct MutationPlan<R, N> {
    pub target: Target,
    /// Column rewritten on apply.
    pub field: &'static str,
    pub mode: Adjustment,
    pub current: fn(&R) -> Option<N>,
    /// Lines shown when a candidate is found.
    pub describe: fn(&R) -> Vec<String>,
    pub question: fn(&R) -> String,
    pub amount_prompt: &'static str,
    /// Message shown after a successful write, given the reloaded record.
    pub success: fn(&R) -> String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    NoMatch,
    Declined,
    Cancelled,
    StoreFailure(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMatch => f.write_str("No result found."),
            Self::Declined => f.write_str("No changes made."),
            Self::Cancelled => f.write_str("Returning to menu."),
            Self::StoreFailure(err) => write!(f, "An error occurred: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage<R> {
    Searching,
    Found(R),
    Confirming(R),
    Applying(R),
    Applied(R),
    Aborted(AbortReason),
}

impl<R> Stage<R> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Applied(_) | Self::Aborted(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    Applied(R),
    Aborted(AbortReason),
}

pub struct GuardedMutation<'s, S, R, N> {
    store: &'s mut S,
    plan: MutationPlan<R, N>,
}

impl<'s, S, R, N> GuardedMutation<'s, S, R, N>
where
    S: RecordStore,
    R: Record,
    N: Amount,
{
    pub fn new(store: &'s mut S, plan: MutationPlan<R, N>) -> Self {
        Self { store, plan }
    }

    /// Advance one transition. Terminal stages are returned unchanged.
    /// Entering `Aborted` reports the reason on the console.
    pub fn step(
        &mut self,
        console: &mut dyn Console,
        stage: Stage<R>,
    ) -> Result<Stage<R>, ConsoleError> {
        let next = match stage {
            Stage::Searching => self.search(console)?,
            Stage::Found(record) => {
                for line in (self.plan.describe)(&record) {
                    console.say(&line)?;
                }
                Stage::Confirming(record)
            }
            Stage::Confirming(record) => {
                if confirm(console, &(self.plan.question)(&record))? {
                    Stage::Applying(record)
                } else {
                    Stage::Aborted(AbortReason::Declined)
                }
            }
            Stage::Applying(record) => return self.apply_with(console, record, self.plan.mode),
            terminal => return Ok(terminal),
        };
        if let Stage::Aborted(reason) = &next {
            tracing::debug!(table = R::TABLE.name, %reason, "mutation aborted");
            console.say(&reason.to_string())?;
        }
        Ok(next)
    }

    pub fn run(&mut self, console: &mut dyn Console) -> Result<Outcome<R>, ConsoleError> {
        let mut stage = Stage::Searching;
        while !stage.is_terminal() {
            stage = self.step(console, stage)?;
        }
        Ok(match stage {
            Stage::Applied(record) => Outcome::Applied(record),
            Stage::Aborted(reason) => Outcome::Aborted(reason),
            _ => unreachable!("loop exits on terminal stages only"),
        })
    }

    /// Walk up to the confirmation. `Some` means the user said yes and the
    /// record is ready for [`GuardedMutation::apply_with`].
    pub fn resolve(&mut self, console: &mut dyn Console) -> Result<Option<R>, ConsoleError> {
        let mut stage = Stage::Searching;
        loop {
            stage = match stage {
                Stage::Applying(record) => return Ok(Some(record)),
                Stage::Aborted(_) | Stage::Applied(_) => return Ok(None),
                other => self.step(console, other)?,
            };
        }
    }

    /// Read the amount, combine it with the current value per `mode` and
    /// write it back. An amount whose result would overflow is refused and
    /// asked for again. A failed write is reported and not retried.
    pub fn apply_with(
        &mut self,
        console: &mut dyn Console,
        record: R,
        mode: Adjustment,
    ) -> Result<Stage<R>, ConsoleError> {
        let current = (self.plan.current)(&record);
        let value = prompt_with(console, self.plan.amount_prompt, |line| {
            mode.apply(current, N::parse_amount(line)?)
        })?;
        let id = record.id();
        let written = self
            .store
            .update_field::<R>(id, self.plan.field, value.to_field())
            .and_then(|()| self.store.find_by_id::<R>(id));
        match written {
            Ok(updated) => {
                tracing::info!(table = R::TABLE.name, id, field = self.plan.field, %value, "field updated");
                console.say(&(self.plan.success)(&updated))?;
                Ok(Stage::Applied(updated))
            }
            Err(err) => {
                tracing::warn!(table = R::TABLE.name, id, error = %err, "update failed");
                let reason = AbortReason::StoreFailure(err.to_string());
                console.say(&reason.to_string())?;
                Ok(Stage::Aborted(reason))
            }
        }
    }

    fn search(&mut self, console: &mut dyn Console) -> Result<Stage<R>, ConsoleError> {
        let found = match self.plan.target {
            Target::PartialMatch { field, prompt } => {
                let needle = console.read_line(prompt)?;
                self.store.first_partial_match::<R>(field, needle.trim())
            }
            Target::Id { prompt } => match read_id(console, prompt)? {
                Some(id) => match self.store.find_by_id::<R>(id) {
                    Ok(record) => Ok(Some(record)),
                    Err(StoreError::NotFound { .. }) => Ok(None),
                    Err(err) => Err(err),
                },
                None => return Ok(Stage::Aborted(AbortReason::Cancelled)),
            },
        };
        Ok(match found {
            Ok(Some(record)) => Stage::Found(record),
            Ok(None) => Stage::Aborted(AbortReason::NoMatch),
            Err(err) => Stage::Aborted(AbortReason::StoreFailure(err.to_string())),
        })
    }
}

/// Read an id, re-prompting on anything that is neither a number nor
/// `exit`. `None` means the user typed `exit`.
pub fn read_id(console: &mut dyn Console, prompt: &str) -> Result<Option<RecordId>, ConsoleError> {
    loop {
        let line = console.read_line(prompt)?;
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") {
            return Ok(None);
        }
        match line.parse::<RecordId>() {
            Ok(id) => return Ok(Some(id)),
            Err(_) => console.say("Invalid ID. Please enter a number or 'exit'.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::input::InvalidInput;
    use kiosk_store::{Column, ColumnKind, FieldValue, Row, SqliteStore, TableSpec};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    static JARS: TableSpec = TableSpec {
        name: "jars",
        columns: &[
            Column::new("label", ColumnKind::Text),
            Column::nullable("balance", ColumnKind::Decimal),
            Column::new("count", ColumnKind::Integer),
        ],
    };

    #[derive(Debug, Clone, PartialEq)]
    struct Jar {
        id: RecordId,
        label: String,
        balance: Option<Decimal>,
        count: i64,
    }

    impl Record for Jar {
        const TABLE: &'static TableSpec = &JARS;

        fn id(&self) -> RecordId {
            self.id
        }

        fn set_id(&mut self, id: RecordId) {
            self.id = id;
        }

        fn values(&self) -> Vec<FieldValue> {
            vec![
                self.label.clone().into(),
                self.balance.into(),
                self.count.into(),
            ]
        }

        fn from_row(row: &Row) -> Result<Self, StoreError> {
            Ok(Self {
                id: row.id(),
                label: row.text("label")?,
                balance: row.opt_decimal("balance")?,
                count: row.integer("count")?,
            })
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn seeded() -> SqliteStore {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.ensure_table::<Jar>().unwrap();
        for (label, balance, count) in [
            ("Holiday", Some("100.00"), 5),
            ("Holiday fund", None, 2),
            ("Rainy day", Some("20.00"), 0),
        ] {
            store
                .insert_new(Jar {
                    id: 0,
                    label: label.into(),
                    balance: balance.map(dec),
                    count,
                })
                .unwrap();
        }
        store
    }

    fn balance_plan(mode: Adjustment) -> MutationPlan<Jar, Decimal> {
        MutationPlan {
            target: Target::PartialMatch {
                field: "label",
                prompt: "Jar name: ",
            },
            field: "balance",
            mode,
            current: |j| j.balance,
            describe: |j| vec![format!("Jar: {}", j.label)],
            question: |j| format!("Update {}? (yes/no): ", j.label),
            amount_prompt: "Amount: ",
            success: |j| format!("{} updated.", j.label),
        }
    }

    fn count_plan(mode: Adjustment) -> MutationPlan<Jar, i64> {
        MutationPlan {
            target: Target::Id { prompt: "Jar ID: " },
            field: "count",
            mode,
            current: |j| Some(j.count),
            describe: |j| vec![format!("Jar: {}", j.label)],
            question: |_| "Proceed? ".into(),
            amount_prompt: "Count: ",
            success: |j| format!("Count is now {}.", j.count),
        }
    }

    #[test]
    fn every_yes_spelling_applies() {
        for yes in ["YES", "yes", "y"] {
            let mut store = seeded();
            let mut console = ScriptedConsole::new(["Rainy", yes, "5"]);
            let outcome = GuardedMutation::new(&mut store, balance_plan(Adjustment::Add))
                .run(&mut console)
                .unwrap();
            let Outcome::Applied(jar) = outcome else {
                panic!("{yes} should apply");
            };
            assert_eq!(jar.balance, Some(dec("25.00")));
            assert_eq!(store.find_by_id::<Jar>(3).unwrap().balance, Some(dec("25.00")));
        }
    }

    #[test]
    fn unrecognised_answer_stays_in_confirming() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["Rainy", "maybe", "y", "1"]);
        let outcome = GuardedMutation::new(&mut store, balance_plan(Adjustment::Set))
            .run(&mut console)
            .unwrap();
        assert!(matches!(outcome, Outcome::Applied(_)));
        let asked = console
            .transcript()
            .iter()
            .filter(|l| l.starts_with("Update Rainy day?"))
            .count();
        assert_eq!(asked, 2);
    }

    #[test]
    fn declining_leaves_the_store_untouched() {
        let mut store = seeded();
        let before = store.list_all::<Jar>(None).unwrap();
        let mut console = ScriptedConsole::new(["Holiday", "no"]);
        let outcome = GuardedMutation::new(&mut store, balance_plan(Adjustment::Set))
            .run(&mut console)
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted(AbortReason::Declined));
        assert_eq!(store.list_all::<Jar>(None).unwrap(), before);
        assert_eq!(console.remaining_input(), 0);
    }

    #[test]
    fn first_match_is_the_candidate() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["Holiday", "y", "1"]);
        let outcome = GuardedMutation::new(&mut store, balance_plan(Adjustment::Add))
            .run(&mut console)
            .unwrap();
        let Outcome::Applied(jar) = outcome else {
            panic!("expected apply");
        };
        assert_eq!(jar.id, 1);
        assert_eq!(jar.balance, Some(dec("101.00")));
    }

    #[test]
    fn no_match_aborts_without_prompting_further() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["Pension"]);
        let outcome = GuardedMutation::new(&mut store, balance_plan(Adjustment::Set))
            .run(&mut console)
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoMatch));
        assert!(console.output().contains("No result found."));
    }

    #[test]
    fn unset_value_counts_as_zero() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["fund", "y", "12.5"]);
        GuardedMutation::new(&mut store, balance_plan(Adjustment::Add))
            .run(&mut console)
            .unwrap();
        assert_eq!(store.find_by_id::<Jar>(2).unwrap().balance, Some(dec("12.50")));
    }

    #[test]
    fn subtract_goes_negative_by_id() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["abc", "1", "y", "10"]);
        let outcome = GuardedMutation::new(&mut store, count_plan(Adjustment::Subtract))
            .run(&mut console)
            .unwrap();
        let Outcome::Applied(jar) = outcome else {
            panic!("expected apply");
        };
        assert_eq!(jar.count, -5);
        assert!(console.output().contains("Count is now -5."));
        assert!(console.output().contains("Invalid ID"));
    }

    #[test]
    fn exit_and_missing_ids_abort() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["exit"]);
        let outcome = GuardedMutation::new(&mut store, count_plan(Adjustment::Set))
            .run(&mut console)
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted(AbortReason::Cancelled));

        let mut console = ScriptedConsole::new(["42"]);
        let outcome = GuardedMutation::new(&mut store, count_plan(Adjustment::Set))
            .run(&mut console)
            .unwrap();
        assert_eq!(outcome, Outcome::Aborted(AbortReason::NoMatch));
    }

    #[test]
    fn store_failure_is_reported_not_retried() {
        let mut store = seeded();
        let mut plan = balance_plan(Adjustment::Set);
        plan.field = "missing";
        let mut console = ScriptedConsole::new(["Rainy", "y", "3"]);
        let outcome = GuardedMutation::new(&mut store, plan).run(&mut console).unwrap();
        assert!(matches!(outcome, Outcome::Aborted(AbortReason::StoreFailure(_))));
        assert!(console.output().contains("An error occurred:"));
        assert_eq!(store.find_by_id::<Jar>(3).unwrap().balance, Some(dec("20.00")));
    }

    #[test]
    fn overflowing_amount_is_asked_again() {
        let mut store = seeded();
        let mut console =
            ScriptedConsole::new(["1", "y", "9223372036854775807", "3"]);
        let outcome = GuardedMutation::new(&mut store, count_plan(Adjustment::Add))
            .run(&mut console)
            .unwrap();
        let Outcome::Applied(jar) = outcome else {
            panic!("expected apply");
        };
        assert_eq!(jar.count, 8);
        assert!(console
            .output()
            .contains(&InvalidInput::OutOfRange.to_string()));

        let mut console =
            ScriptedConsole::new(["Holiday", "y", "79228162514264337593543950335"]);
        let err = GuardedMutation::new(&mut store, balance_plan(Adjustment::Add))
            .run(&mut console)
            .unwrap_err();
        assert!(matches!(err, ConsoleError::InputClosed));
        assert_eq!(store.find_by_id::<Jar>(1).unwrap().balance, Some(dec("100.00")));
    }

    #[test]
    fn resolve_then_apply_with_chosen_mode() {
        let mut store = seeded();
        let mut console = ScriptedConsole::new(["3", "yes", "4"]);
        let mut mutation = GuardedMutation::new(&mut store, count_plan(Adjustment::Set));
        let jar = mutation.resolve(&mut console).unwrap().expect("confirmed");
        let stage = mutation
            .apply_with(&mut console, jar, Adjustment::Add)
            .unwrap();
        let Stage::Applied(jar) = stage else {
            panic!("expected apply");
        };
        assert_eq!(jar.count, 4);
    }
}
