use bon::bon;

use crate::quantity::{cost::Cost, energy::KilowattHours};

/// Immutable snapshot of the kWh billed to one tier.
#[derive(Clone, Copy, Debug)]
pub struct TierUsage {
    pub nb_kwh: KilowattHours,
    pub price: Cost,
    pub vat: Cost,
    pub maint: Cost,
    pub cost: Cost,
}

#[bon]
impl TierUsage {
    /// Every figure is rounded on construction.
    #[builder]
    pub(crate) fn new(
        nb_kwh: KilowattHours,
        price: Cost,
        vat: Cost,
        maint: Cost,
        cost: Cost,
    ) -> Self {
        Self {
            nb_kwh: nb_kwh.round_std(),
            price: price.round_std(),
            vat: vat.round_std(),
            maint: maint.round_std(),
            cost: cost.round_std(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding_on_construction() {
        let usage = TierUsage::builder()
            .nb_kwh(KilowattHours::from(10.456))
            .price(Cost::from(731.92))
            .vat(Cost::from(131.745_6))
            .maint(Cost::from(20.0))
            .cost(Cost::from(863.665_6))
            .build();
        assert_eq!(usage.nb_kwh, KilowattHours::from(10.46));
        assert_eq!(usage.vat, Cost::from(131.75));
        assert_eq!(usage.cost, Cost::from(863.67));
    }
}
