//! Validators for typed console input. Each returns [`InvalidInput`] with
//! the message shown before re-prompting.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidInput {
    #[error("Please enter the value as a number.")]
    NotANumber,
    #[error("Please enter the value as a whole number.")]
    NotAWholeNumber,
    #[error("That amount is out of range. Please enter a smaller value.")]
    OutOfRange,
    #[error("Invalid date. Please enter the date as {0}.")]
    Date(&'static str),
    #[error("Invalid input. Commas are not allowed. Please try again.")]
    Comma,
    #[error("{0}")]
    Rule(String),
}

/// Accepted date spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `DD-MM-YYYY`, used for transactions and goal deadlines.
    DayMonthYear,
    /// `DD/MM/YY`, used for task due dates.
    ShortSlashed,
}

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("static date regex"));
static SHORT_SLASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{2}$").expect("static date regex"));

impl DatePattern {
    pub fn hint(self) -> &'static str {
        match self {
            Self::DayMonthYear => "DD-MM-YYYY",
            Self::ShortSlashed => "DD/MM/YY",
        }
    }

    pub fn chrono_format(self) -> &'static str {
        match self {
            Self::DayMonthYear => "%d-%m-%Y",
            Self::ShortSlashed => "%d/%m/%y",
        }
    }

    fn shape(self) -> &'static Regex {
        match self {
            Self::DayMonthYear => &DAY_MONTH_YEAR,
            Self::ShortSlashed => &SHORT_SLASHED,
        }
    }

    /// Shape check first, then calendar check (`31-02-2024` is rejected).
    pub fn parse(self, input: &str) -> Result<NaiveDate, InvalidInput> {
        let input = input.trim();
        if !self.shape().is_match(input) {
            return Err(InvalidInput::Date(self.hint()));
        }
        NaiveDate::parse_from_str(input, self.chrono_format())
            .map_err(|_| InvalidInput::Date(self.hint()))
    }

    pub fn format(self, date: NaiveDate) -> String {
        date.format(self.chrono_format()).to_string()
    }
}

pub fn no_commas(input: &str) -> Result<String, InvalidInput> {
    if input.contains(',') {
        Err(InvalidInput::Comma)
    } else {
        Ok(input.to_string())
    }
}

/// Yes/no answer to a confirmation question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Case-insensitive `yes`/`y`/`no`/`n`; anything else is `None`.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "yes" | "y" => Some(Self::Yes),
            "no" | "n" => Some(Self::No),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_are_case_insensitive() {
        for yes in ["YES", "yes", "y", " Y "] {
            assert_eq!(Answer::parse(yes), Some(Answer::Yes), "{yes}");
        }
        assert_eq!(Answer::parse("No"), Some(Answer::No));
        assert_eq!(Answer::parse("maybe"), None);
        assert_eq!(Answer::parse(""), None);
    }

    #[test]
    fn dates_need_shape_and_calendar() {
        let day = DatePattern::DayMonthYear;
        assert_eq!(
            day.parse("05-11-2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 5).unwrap()
        );
        assert_eq!(day.parse("5-11-2024"), Err(InvalidInput::Date("DD-MM-YYYY")));
        assert_eq!(day.parse("31-02-2024"), Err(InvalidInput::Date("DD-MM-YYYY")));

        let short = DatePattern::ShortSlashed;
        let due = short.parse("16/10/26").unwrap();
        assert_eq!(due, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(short.format(due), "16/10/26");
        assert!(short.parse("16-10-26").is_err());
    }

    #[test]
    fn commas_rejected() {
        assert_eq!(no_commas("a,b"), Err(InvalidInput::Comma));
        assert_eq!(no_commas("ab").unwrap(), "ab");
    }
}
