pub mod cost;
pub mod energy;
pub mod rate;

use std::ops::{Div, Mul};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Dimensioned scalar: `ENERGY` is the kilowatt-hour exponent and `COST`
/// the franc exponent.
#[derive(
    Clone,
    Copy,
    Deserialize,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(i32, f64, OrderedFloat<f64>)]
#[must_use]
pub struct Quantity<const ENERGY: isize, const COST: isize>(pub OrderedFloat<f64>);

impl<const ENERGY: isize, const COST: isize> Quantity<ENERGY, COST> {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    /// Standard rounding rule: whole values stay whole, anything else is
    /// rounded to 2 decimal places.
    pub fn round_std(self) -> Self {
        let value = self.0.into_inner();
        if value.fract() == 0.0 { self } else { Self(OrderedFloat((value * 100.0).round() / 100.0)) }
    }
}

impl<const ENERGY: isize, const COST: isize> Mul<f64> for Quantity<ENERGY, COST> {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl<const ENERGY: isize, const COST: isize> Div<Self> for Quantity<ENERGY, COST> {
    type Output = OrderedFloat<f64>;

    fn div(self, rhs: Self) -> Self::Output {
        self.0 / rhs.0
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{Debug, Formatter};

    use super::*;

    pub type Bare = Quantity<0, 0>;

    impl Debug for Bare {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "{:?}", self.0)
        }
    }

    #[test]
    fn test_round_std_whole() {
        assert_eq!(Bare::from(3.0).round_std(), Bare::from(3));
    }

    #[test]
    fn test_round_std_fractional() {
        assert_eq!(Bare::from(3.456).round_std(), Bare::from(3.46));
    }

    #[test]
    fn test_round_std_negative() {
        assert_eq!(Bare::from(-3.456).round_std(), Bare::from(-3.46));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(Bare::from(1).min(Bare::from(2)), Bare::from(1));
        assert_eq!(Bare::from(1).max(Bare::from(2)), Bare::from(2));
    }
}
