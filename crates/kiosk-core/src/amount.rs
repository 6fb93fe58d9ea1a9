use crate::input::InvalidInput;
use kiosk_store::FieldValue;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;
use std::str::FromStr;

/// A numeric field the mutation workflow can adjust.
pub trait Amount: Copy + Display + Default + PartialOrd {
    fn parse_amount(input: &str) -> Result<Self, InvalidInput>;

    fn checked_add(self, rhs: Self) -> Option<Self>;

    fn checked_sub(self, rhs: Self) -> Option<Self>;

    fn to_field(self) -> FieldValue;
}

impl Amount for i64 {
    fn parse_amount(input: &str) -> Result<Self, InvalidInput> {
        input
            .trim()
            .parse()
            .map_err(|_| InvalidInput::NotAWholeNumber)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        i64::checked_add(self, rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        i64::checked_sub(self, rhs)
    }

    fn to_field(self) -> FieldValue {
        FieldValue::Integer(self)
    }
}

/// Money: parsed as a decimal and rounded to two places.
impl Amount for Decimal {
    fn parse_amount(input: &str) -> Result<Self, InvalidInput> {
        Decimal::from_str(input.trim())
            .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
            .map_err(|_| InvalidInput::NotANumber)
    }

    fn checked_add(self, rhs: Self) -> Option<Self> {
        Decimal::checked_add(self, rhs)
    }

    fn checked_sub(self, rhs: Self) -> Option<Self> {
        Decimal::checked_sub(self, rhs)
    }

    fn to_field(self) -> FieldValue {
        FieldValue::Decimal(self)
    }
}

/// How a new value combines with the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Set,
    Add,
    Subtract,
}

impl Adjustment {
    /// No floor is applied: subtracting past zero yields a negative value.
    /// An unset current value counts as zero. A result the type cannot hold
    /// is rejected rather than wrapped.
    pub fn apply<N: Amount>(self, current: Option<N>, delta: N) -> Result<N, InvalidInput> {
        let base = current.unwrap_or_default();
        match self {
            Self::Set => Some(delta),
            Self::Add => base.checked_add(delta),
            Self::Subtract => base.checked_sub(delta),
        }
        .ok_or(InvalidInput::OutOfRange)
    }
}

/// Render money with exactly two decimal places.
pub fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtract_does_not_clamp() {
        assert_eq!(Adjustment::Subtract.apply(Some(5i64), 10), Ok(-5));
        assert_eq!(Adjustment::Add.apply(Some(5i64), 10), Ok(15));
        assert_eq!(Adjustment::Set.apply(Some(5i64), 10), Ok(10));
        assert_eq!(Adjustment::Add.apply(None, 3i64), Ok(3));
    }

    #[test]
    fn overflow_is_rejected_not_wrapped() {
        assert_eq!(
            Adjustment::Add.apply(Some(12i64), i64::MAX),
            Err(InvalidInput::OutOfRange)
        );
        assert_eq!(
            Adjustment::Subtract.apply(Some(-2i64), i64::MAX),
            Err(InvalidInput::OutOfRange)
        );
        assert_eq!(
            Adjustment::Add.apply(Some(Decimal::from(100)), Decimal::MAX),
            Err(InvalidInput::OutOfRange)
        );
        assert_eq!(
            Adjustment::Subtract.apply(Some(Decimal::MIN), Decimal::ONE),
            Err(InvalidInput::OutOfRange)
        );
        assert_eq!(Adjustment::Set.apply(Some(1i64), i64::MAX), Ok(i64::MAX));
    }

    #[test]
    fn money_rounds_to_two_places() {
        let v = Decimal::parse_amount(" 12.345 ").unwrap();
        assert_eq!(money(v), "12.35");
        assert_eq!(money(Decimal::parse_amount("7").unwrap()), "7.00");
        assert_eq!(Decimal::parse_amount("ten"), Err(InvalidInput::NotANumber));
    }

    #[test]
    fn whole_numbers_only_for_counts() {
        assert_eq!(i64::parse_amount("40").unwrap(), 40);
        assert_eq!(i64::parse_amount("4.5"), Err(InvalidInput::NotAWholeNumber));
    }
}
