use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::{
    core::{allocation::UsageAllocation, usage::TierUsage},
    quantity::{Quantity, cost::Cost, energy::KilowattHours},
};

/// Plain rendition of an allocation for machine consumption.
#[derive(Serialize)]
pub struct AllocationRecord {
    #[serde(serialize_with = "serialize_std")]
    pub nb_kwh: KilowattHours,

    #[serde(serialize_with = "serialize_std")]
    pub lighting: Cost,

    pub slices: BTreeMap<u8, TierUsageRecord>,

    #[serde(serialize_with = "serialize_std")]
    pub cost: Cost,
}

#[derive(Serialize)]
pub struct TierUsageRecord {
    #[serde(serialize_with = "serialize_std")]
    pub nb_kwh: KilowattHours,

    #[serde(serialize_with = "serialize_std")]
    pub price: Cost,

    #[serde(serialize_with = "serialize_std")]
    pub vat: Cost,

    #[serde(serialize_with = "serialize_std")]
    pub maint: Cost,

    #[serde(serialize_with = "serialize_std")]
    pub cost: Cost,
}

impl From<&TierUsage> for TierUsageRecord {
    fn from(usage: &TierUsage) -> Self {
        Self {
            nb_kwh: usage.nb_kwh,
            price: usage.price,
            vat: usage.vat,
            maint: usage.maint,
            cost: usage.cost,
        }
    }
}

impl UsageAllocation<'_> {
    pub fn to_record(&self) -> AllocationRecord {
        AllocationRecord {
            nb_kwh: self.nb_kwh().round_std(),
            lighting: self.lighting(),
            slices: self
                .slices()
                .iter()
                .map(|(index, usage)| (*index, TierUsageRecord::from(usage)))
                .collect(),
            cost: self.cost(),
        }
    }
}

/// Whole numbers serialize as integers, everything else keeps 2 decimals.
fn serialize_std<S, const ENERGY: isize, const COST: isize>(
    quantity: &Quantity<ENERGY, COST>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value = quantity.round_std().0.into_inner();
    if value.fract() == 0.0 {
        #[expect(clippy::cast_possible_truncation)]
        let value = value as i64;
        serializer.serialize_i64(value)
    } else {
        serializer.serialize_f64(value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::{allocation::Position, meter::test_profile};

    #[test]
    fn test_record() {
        let profile = test_profile();
        let allocation =
            UsageAllocation::new(&profile, KilowattHours::from(60), Position::default()).unwrap();
        let record = serde_json::to_value(allocation.to_record()).unwrap();
        assert_eq!(
            record,
            json!({
                "nb_kwh": 60,
                "lighting": 120,
                "slices": {
                    "1": {"nb_kwh": 50, "price": 3000, "vat": 300, "maint": 100, "cost": 3300},
                    "2": {"nb_kwh": 10, "price": 700, "vat": 70, "maint": 20, "cost": 770},
                },
                "cost": 4190,
            })
        );
    }

    #[test]
    fn test_fractional_values_stay_fractional() {
        let profile = test_profile();
        let allocation =
            UsageAllocation::new(&profile, KilowattHours::from(10.5), Position::default())
                .unwrap();
        let record = serde_json::to_value(allocation.to_record()).unwrap();
        assert_eq!(record["nb_kwh"], json!(10.5));
        assert_eq!(record["slices"]["1"]["price"], json!(630));
    }
}
