use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// Money type holding integer minor-currency-unit amounts (cents, fils, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);

    /// create from minor units (cents)
    pub fn from_minor(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from decimal, truncated to whole minor units
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.trunc())
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.trunc()))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get minor units as integer
    pub fn as_minor(&self) -> i64 {
        self.0.to_i64().unwrap_or(0)
    }

    /// integer division rounded down (the schedule step rule)
    pub fn floor_div(self, divisor: u32) -> Money {
        Money((self.0 / Decimal::from(divisor)).floor())
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// check if strictly negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i64> for Money {
    fn from(i: i64) -> Self {
        Money::from_minor(i)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_minor(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 -= other.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minor_unit_roundtrip() {
        let m = Money::from_minor(1000);
        assert_eq!(m.as_minor(), 1000);
        assert_eq!(m.to_string(), "1000");
    }

    #[test]
    fn test_floor_div() {
        assert_eq!(Money::from_minor(1000).floor_div(3), Money::from_minor(333));
        assert_eq!(Money::from_minor(600).floor_div(6), Money::from_minor(100));
        assert_eq!(Money::from_minor(5).floor_div(6), Money::ZERO);
    }

    #[test]
    fn test_from_decimal_truncates() {
        assert_eq!(Money::from_decimal(dec!(12.9)), Money::from_minor(12));
    }

    #[test]
    fn test_arithmetic() {
        let mut m = Money::from_minor(250);
        m -= Money::from_minor(100);
        assert_eq!(m, Money::from_minor(150));
        m += Money::from_minor(50);
        assert_eq!(m, Money::from_minor(200));
        assert!((m - Money::from_minor(300)).is_negative());
    }

    #[test]
    fn test_sum() {
        let total: Money = [334, 333, 333].iter().map(|&m| Money::from_minor(m)).sum();
        assert_eq!(total, Money::from_minor(1000));
    }
}
