use std::fmt::{Display, Formatter};

use ordered_float::OrderedFloat;

use crate::{
    core::tier::PriceTier,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
    tariff::{ConfigurationError, MeterKind, MeterRates, Schedule},
};

/// Cumulative tier boundaries in kWh. The tier past the last boundary is
/// unbounded.
pub const BOUNDARIES: [KilowattHours; 3] = [
    KilowattHours(OrderedFloat(50.0)),
    KilowattHours(OrderedFloat(100.0)),
    KilowattHours(OrderedFloat(200.0)),
];

pub const NB_TIERS: u8 = BOUNDARIES.len() as u8 + 1;

/// One meter class with its pricing parameters resolved and validated.
pub struct MeterProfile {
    kind: MeterKind,
    amperage: u32,
    phase: Phase,
    ppkwh: Vec<KilowattHourRate>,
    vat: Schedule<f64>,
    maint: Schedule<KilowattHourRate>,
    lights: KilowattHourRate,
}

impl MeterProfile {
    pub fn new(
        kind: MeterKind,
        amperage: u32,
        rates: &MeterRates,
    ) -> Result<Self, ConfigurationError> {
        let meter = format!("{kind} {amperage} A");
        let phase = match rates.nb_phase {
            1 => Phase::Single,
            3 => Phase::Three,
            nb_phase => return Err(ConfigurationError::PhaseCount { meter, nb_phase }),
        };
        if rates.ppkwh.len() != usize::from(NB_TIERS) {
            return Err(ConfigurationError::TierPriceCount {
                meter,
                expected: usize::from(NB_TIERS),
                found: rates.ppkwh.len(),
            });
        }
        validate_schedule(&meter, "vat", &rates.vat)?;
        validate_schedule(&meter, "maint", &rates.maint)?;
        Ok(Self {
            kind,
            amperage,
            phase,
            ppkwh: rates.ppkwh.clone(),
            vat: rates.vat.clone(),
            maint: rates.maint.clone(),
            lights: rates.lights,
        })
    }

    pub const fn kind(&self) -> MeterKind {
        self.kind
    }

    pub const fn amperage(&self) -> u32 {
        self.amperage
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tier(&self, index: u8) -> PriceTier<'_> {
        PriceTier::new(self, index)
    }

    /// Tiers in ascending order of their 1-based indexes.
    pub fn tiers(&self) -> impl Iterator<Item = PriceTier<'_>> {
        (1..=NB_TIERS).map(|index| PriceTier::new(self, index))
    }

    /// Public lighting levy on a consumption total.
    pub fn lighting_cost(&self, nb_kwh: KilowattHours) -> Cost {
        (nb_kwh * self.lights).round_std()
    }

    pub(crate) fn unit_price(&self, index: u8) -> KilowattHourRate {
        self.ppkwh[usize::from(index) - 1]
    }

    pub(crate) fn vat_rate(&self, index: u8) -> f64 {
        self.vat.for_tier(index)
    }

    pub(crate) fn maintenance_rate(&self, index: u8) -> KilowattHourRate {
        self.maint.for_tier(index)
    }
}

impl Display for MeterProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} A", self.phase.label(), self.amperage)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Single,
    Three,
}

impl Phase {
    pub const fn count(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Three => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Single => "monophasé",
            Self::Three => "triphasé",
        }
    }
}

fn validate_schedule<T>(
    meter: &str,
    name: &'static str,
    schedule: &Schedule<T>,
) -> Result<(), ConfigurationError> {
    match schedule.per_tier_len() {
        None => Ok(()),
        Some(len) if len == usize::from(NB_TIERS) => Ok(()),
        Some(len) => Err(ConfigurationError::ScheduleLength {
            meter: meter.to_owned(),
            name,
            expected: usize::from(NB_TIERS),
            found: len,
        }),
    }
}

#[cfg(test)]
pub(crate) fn test_profile() -> MeterProfile {
    let rates = MeterRates {
        power: "2.2 kVA".to_owned(),
        nb_phase: 1,
        ppkwh: vec![60.0.into(), 70.0.into(), 80.0.into(), 90.0.into()],
        vat: Schedule::Uniform(0.1),
        maint: Schedule::Uniform(2.0.into()),
        lights: 2.0.into(),
    };
    MeterProfile::new(MeterKind::SinglePhase, 10, &rates).expect("the fixture rates are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates() -> MeterRates {
        MeterRates {
            power: "2.2 kVA".to_owned(),
            nb_phase: 1,
            ppkwh: vec![60.0.into(), 70.0.into(), 80.0.into(), 90.0.into()],
            vat: Schedule::Uniform(0.1),
            maint: Schedule::Uniform(2.0.into()),
            lights: 2.0.into(),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(test_profile().to_string(), "monophasé 10 A");
    }

    #[test]
    fn test_phase_count() {
        assert_eq!(Phase::Single.count(), 1);
        assert_eq!(Phase::Three.count(), 3);
    }

    #[test]
    fn test_invalid_phase() {
        let rates = MeterRates { nb_phase: 2, ..rates() };
        let error = MeterProfile::new(MeterKind::SinglePhase, 10, &rates).unwrap_err();
        assert!(matches!(error, ConfigurationError::PhaseCount { nb_phase: 2, .. }));
    }

    #[test]
    fn test_wrong_price_count() {
        let rates = MeterRates { ppkwh: vec![60.0.into(), 70.0.into()], ..rates() };
        let error = MeterProfile::new(MeterKind::SinglePhase, 10, &rates).unwrap_err();
        assert!(matches!(
            error,
            ConfigurationError::TierPriceCount { expected: 4, found: 2, .. }
        ));
    }

    #[test]
    fn test_wrong_schedule_length() {
        let rates = MeterRates { maint: Schedule::PerTier(vec![2.0.into()]), ..rates() };
        let error = MeterProfile::new(MeterKind::SinglePhase, 10, &rates).unwrap_err();
        assert!(matches!(
            error,
            ConfigurationError::ScheduleLength { name: "maint", expected: 4, found: 1, .. }
        ));
    }

    #[test]
    fn test_per_tier_resolution() {
        let rates = MeterRates {
            vat: Schedule::PerTier(vec![0.1, 0.2, 0.3, 0.4]),
            ..rates()
        };
        let profile = MeterProfile::new(MeterKind::SinglePhase, 10, &rates).unwrap();
        assert!((profile.vat_rate(3) - 0.3).abs() < f64::EPSILON);
    }
}
