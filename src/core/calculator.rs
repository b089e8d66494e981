use bon::bon;

use crate::{
    core::{
        ValidationError,
        allocation::{Position, UsageAllocation},
        meter::MeterProfile,
    },
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
    tariff::{ConfigurationError, MeterKind, RateTable},
};

#[derive(Debug, thiserror::Error)]
pub enum BillingError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One billing request: a meter class bound to its rates, with the
/// carry-over position derived from the previous reading.
pub struct BillingCalculator {
    meter: MeterProfile,
    stamp: Cost,
    position: Position,
}

#[bon]
impl BillingCalculator {
    #[builder]
    pub fn new(
        rate_table: &RateTable,
        kind: MeterKind,
        amperage: u32,
        #[builder(default)] previous_kwh: KilowattHours,
    ) -> Result<Self, BillingError> {
        let meter = MeterProfile::new(kind, amperage, rate_table.rates(kind, amperage)?)?;
        let position =
            UsageAllocation::new(&meter, previous_kwh, Position::default())?.current_position();
        debug!(%meter, ?position, "resolved the meter");
        Ok(Self { meter, stamp: rate_table.stamp, position })
    }

    pub const fn meter(&self) -> &MeterProfile {
        &self.meter
    }

    pub const fn stamp(&self) -> Cost {
        self.stamp
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    /// Bill an energy quantity.
    pub fn consumption_for_kwh(
        &self,
        nb_kwh: KilowattHours,
    ) -> Result<UsageAllocation<'_>, ValidationError> {
        UsageAllocation::new(&self.meter, nb_kwh, self.position)
    }

    /// Bill the energy a budget affords, stamp duty included: the inverse
    /// pass determines how much, the forward pass how it is billed.
    pub fn consumption_for_amount(
        &self,
        amount: Cost,
    ) -> Result<UsageAllocation<'_>, ValidationError> {
        if amount < Cost::ZERO {
            return Err(ValidationError::NegativeAmount(amount));
        }
        let net = amount - self.stamp;
        if net < Cost::ZERO {
            return Err(ValidationError::BelowStamp { amount, stamp: self.stamp });
        }
        let probe = UsageAllocation::new(&self.meter, KilowattHours::ZERO, self.position)?;
        let nb_kwh = probe.kwh_for(net).round_std();
        UsageAllocation::new(&self.meter, nb_kwh, self.position)
    }

    /// The amount the customer actually pays: stamp duty plus the
    /// allocation total, settled to the nearest 10 francs.
    pub fn final_amount(&self, allocation: &UsageAllocation<'_>) -> Cost {
        (self.stamp + allocation.cost()).round_to_tens()
    }

    /// Average price per kWh actually paid.
    pub fn average_rate(nb_kwh: KilowattHours, amount: Cost) -> KilowattHourRate {
        if nb_kwh > KilowattHours::ZERO {
            (amount / nb_kwh).round_std()
        } else {
            KilowattHourRate::ZERO
        }
    }
}
