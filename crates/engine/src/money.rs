use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

/// Signed money amount represented as **integer minor units** (1/100 rupiah).
///
/// Use this type for **all** monetary values in the engine (ledger amounts,
/// project income/expense, salary figures) to avoid floating-point drift. The
/// storage columns are plain `i64`.
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(1_234_56);
/// assert_eq!(amount.minor(), 123456);
/// assert_eq!(amount.to_string(), "Rp 1.234,56");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Creates a new amount from whole rupiah.
    #[must_use]
    pub const fn rupiah(major: i64) -> Self {
        Self(major * 100)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// Checked multiplication by a quantity (units, hours).
    #[must_use]
    pub fn checked_mul(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// `self / denominator * 100`, or `0.0` when either side is zero.
    #[must_use]
    pub fn percent_of(self, denominator: Money) -> f64 {
        if self.0 == 0 || denominator.0 == 0 {
            return 0.0;
        }
        self.0 as f64 / denominator.0 as f64 * 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = (abs / 100).to_string();
        let minor = abs % 100;

        // Group thousands with '.' as done on Indonesian invoices.
        let mut grouped = String::with_capacity(major.len() + major.len() / 3);
        for (i, ch) in major.chars().enumerate() {
            if i > 0 && (major.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}Rp {grouped},{minor:02}")
    }
}

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self {
        value.0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_rupiah() {
        assert_eq!(Money::new(0).to_string(), "Rp 0,00");
        assert_eq!(Money::new(5).to_string(), "Rp 0,05");
        assert_eq!(Money::rupiah(600_000).to_string(), "Rp 600.000,00");
        assert_eq!(Money::new(123_456_789).to_string(), "Rp 1.234.567,89");
        assert_eq!(Money::rupiah(-1500).to_string(), "-Rp 1.500,00");
    }

    #[test]
    fn percent_of_zero_denominator_is_zero() {
        assert_eq!(Money::rupiah(50_000).percent_of(Money::ZERO), 0.0);
        assert_eq!(Money::ZERO.percent_of(Money::rupiah(100_000)), 0.0);
    }

    #[test]
    fn percent_of_is_not_rounded() {
        assert_eq!(Money::rupiah(60_000).percent_of(Money::rupiah(100_000)), 60.0);
        assert_eq!(
            Money::rupiah(1).percent_of(Money::rupiah(3)),
            1.0_f64 / 3.0 * 100.0
        );
        assert!(Money::rupiah(1).percent_of(Money::rupiah(3)) > 33.333);
    }

    #[test]
    fn checked_mul_detects_overflow() {
        assert_eq!(Money::rupiah(50_000).checked_mul(8), Some(Money::rupiah(400_000)));
        assert_eq!(Money::new(i64::MAX).checked_mul(2), None);
    }

    #[test]
    fn sum_adds_all_amounts() {
        let total: Money = [Money::rupiah(1), Money::rupiah(2), Money::new(-50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::new(250));
    }
}
