use crate::{
    core::meter::{BOUNDARIES, MeterProfile},
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
};

/// One tier of the progressive schedule, a borrowed view over its meter
/// profile.
#[derive(Clone, Copy)]
pub struct PriceTier<'a> {
    meter: &'a MeterProfile,
    index: u8,
}

impl<'a> PriceTier<'a> {
    pub(crate) const fn new(meter: &'a MeterProfile, index: u8) -> Self {
        Self { meter, index }
    }

    /// 1-based tier index.
    pub const fn index(self) -> u8 {
        self.index
    }

    /// Width in kWh, `None` for the unbounded final tier.
    pub fn width(self) -> Option<KilowattHours> {
        let index = usize::from(self.index) - 1;
        if index == 0 {
            Some(BOUNDARIES[0])
        } else if index == BOUNDARIES.len() {
            None
        } else {
            Some(BOUNDARIES[index] - BOUNDARIES[index - 1])
        }
    }

    pub fn unit_price(self) -> KilowattHourRate {
        self.meter.unit_price(self.index)
    }

    pub fn vat_rate(self) -> f64 {
        self.meter.vat_rate(self.index)
    }

    pub fn maintenance_rate(self) -> KilowattHourRate {
        self.meter.maintenance_rate(self.index)
    }

    pub fn price(self, nb_kwh: KilowattHours) -> Cost {
        (nb_kwh * self.unit_price()).round_std()
    }

    pub fn vat(self, nb_kwh: KilowattHours) -> Cost {
        (self.price(nb_kwh) * self.vat_rate()).round_std()
    }

    pub fn cost(self, nb_kwh: KilowattHours) -> Cost {
        (self.price(nb_kwh) + self.vat(nb_kwh)).round_std()
    }

    /// Maintenance share of the price, informational only.
    pub fn maintenance(self, nb_kwh: KilowattHours) -> Cost {
        (nb_kwh * self.maintenance_rate()).round_std()
    }

    pub fn lighting(self, nb_kwh: KilowattHours) -> Cost {
        self.meter.lighting_cost(nb_kwh)
    }

    pub fn total_cost(self, nb_kwh: KilowattHours) -> Cost {
        (self.price(nb_kwh) + self.vat(nb_kwh) + self.lighting(nb_kwh)).round_std()
    }

    pub fn max_price(self) -> Option<Cost> {
        self.width().map(|width| self.price(width))
    }

    pub fn max_vat(self) -> Option<Cost> {
        self.width().map(|width| self.vat(width))
    }

    pub fn max_cost(self) -> Option<Cost> {
        self.width().map(|width| self.cost(width))
    }

    pub fn max_total_cost(self) -> Option<Cost> {
        self.width().map(|width| self.total_cost(width))
    }

    /// How many kWh the amount buys within this tier, assuming the cost is
    /// linear in kWh. Unrounded.
    pub fn kwh_for(self, amount: Cost) -> KilowattHours {
        KilowattHours::from(amount / self.total_cost(KilowattHours::from(1)))
    }
}
