use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// Whole-dollar amount. Shop prices carry no cents.
///
/// Arithmetic saturates at `u64::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    pub fn zero() -> Self {
        Money(0)
    }
}

impl From<u64> for Money {
    fn from(n: u64) -> Self {
        Money(n)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad the rendered string, not the digits, so `{:>8}` aligns "$220"
        f.pad(&format!("${}", self.0))
    }
}

impl<'a, 'b> Add<&'b Money> for &'a Money {
    type Output = Money;

    fn add(self, other: &Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Add<Money> for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_add(other.0);
    }
}

/// Unit price times quantity
impl Mul<u64> for Money {
    type Output = Money;

    fn mul(self, quantity: u64) -> Money {
        Money(self.0.saturating_mul(quantity))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

#[cfg(test)]
mod money_tests {
    use super::*;

    #[test]
    fn money_display() {
        assert_eq!(Money(220).to_string(), "$220");
        assert_eq!(Money::zero().to_string(), "$0");
        assert_eq!(format!("{:>6}", Money(5)), "    $5");
    }

    #[test]
    fn test_add_and_mul() {
        let add = Money(100) + Money(50);
        assert_eq!(add.to_string(), "$150");
        assert_eq!(Money(260) * 3, Money(780));
        let total: Money = vec![Money(1), Money(2), Money(3)].iter().sum();
        assert_eq!(total, Money(6));
    }

    #[test]
    fn test_saturates() {
        assert_eq!(Money(u64::MAX) + Money(1), Money(u64::MAX));
        assert_eq!(Money(u64::MAX / 2 + 1) * 2, Money(u64::MAX));
        let mut total = Money(u64::MAX - 1);
        total += Money(5);
        assert_eq!(total, Money(u64::MAX));
        let sum: Money = [Money(u64::MAX), Money(u64::MAX)].iter().sum();
        assert_eq!(sum, Money(u64::MAX));
    }
}
