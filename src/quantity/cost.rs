use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use ordered_float::OrderedFloat;

use crate::quantity::{Quantity, energy::KilowattHours, rate::KilowattHourRate};

/// An amount of money in CFA francs.
pub type Cost = Quantity<0, 1>;

impl Cost {
    /// Round to the nearest 10 francs, the denomination final bills are
    /// settled in.
    pub fn round_to_tens(self) -> Self {
        Self(OrderedFloat((self.0.into_inner() / 10.0).round() * 10.0))
    }
}

impl Display for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.0.into_inner();
        if value.fract() == 0.0 { write!(f, "{value:.0} F") } else { write!(f, "{value:.2} F") }
    }
}

impl Debug for Cost {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}F", self.0)
    }
}

impl Div<KilowattHours> for Cost {
    type Output = KilowattHourRate;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}

impl Div<KilowattHourRate> for Cost {
    type Output = KilowattHours;

    fn div(self, rhs: KilowattHourRate) -> Self::Output {
        Quantity(self.0 / rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tens() {
        assert_eq!(Cost::from(4695).round_to_tens(), Cost::from(4700));
        assert_eq!(Cost::from(4694.9).round_to_tens(), Cost::from(4690));
    }

    #[test]
    fn test_rate_times_energy() {
        assert_eq!(KilowattHours::from(10) * KilowattHourRate::from(79), Cost::from(790));
    }

    #[test]
    fn test_cost_over_energy() {
        assert_eq!(Cost::from(790) / KilowattHours::from(10), KilowattHourRate::from(79));
    }
}
