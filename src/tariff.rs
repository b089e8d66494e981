use std::{collections::BTreeMap, fmt::Debug, fs, path::Path};

use itertools::Itertools;
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::{
    prelude::*,
    quantity::{cost::Cost, rate::KilowattHourRate},
};

/// The whole tariff grid: one pricing record per meter class, plus the
/// stamp duty charged on every bill.
///
/// Loaded once at startup and only ever read afterwards.
#[derive(Deserialize)]
pub struct RateTable {
    /// Fixed stamp duty added to every bill.
    pub stamp: Cost,

    pub kinds: BTreeMap<MeterKind, KindRates>,
}

impl RateTable {
    #[instrument]
    pub fn read_from<P: AsRef<Path> + Debug>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read the rate table from `{}`", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse the rate table at `{}`", path.display()))
    }

    pub fn rates(&self, kind: MeterKind, amperage: u32) -> Result<&MeterRates, ConfigurationError> {
        self.kinds
            .get(&kind)
            .and_then(|kind_rates| kind_rates.amperage.get(&amperage))
            .ok_or_else(|| ConfigurationError::UnknownMeter {
                kind,
                amperage,
                available: self
                    .kinds
                    .get(&kind)
                    .map_or_else(|| "none".to_owned(), |kind_rates| {
                        kind_rates.amperage.keys().join(", ")
                    }),
            })
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
pub enum MeterKind {
    #[serde(rename = "single-phase")]
    #[display("single-phase")]
    SinglePhase,

    #[serde(rename = "three-phases")]
    #[display("three-phases")]
    ThreePhases,
}

/// Every amperage subscription available for one meter kind.
#[serde_as]
#[derive(Deserialize)]
pub struct KindRates {
    /// Human label, e.g. «Monophasé».
    pub label: String,

    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub amperage: BTreeMap<u32, MeterRates>,
}

/// Raw pricing record for one (kind, amperage) class, as written in the
/// rate table. Validated into a profile before any billing runs.
#[derive(Clone, Deserialize)]
pub struct MeterRates {
    /// Rated power label, e.g. «2.2 kVA».
    pub power: String,

    pub nb_phase: u8,

    /// Unit prices, one per tier.
    pub ppkwh: Vec<KilowattHourRate>,

    pub vat: Schedule<f64>,

    /// Maintenance share, already included in the unit price.
    pub maint: Schedule<KilowattHourRate>,

    /// Public lighting levy, applied to the total consumption.
    pub lights: KilowattHourRate,
}

/// A rate that is either one scalar for every tier or one value per tier.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum Schedule<T> {
    Uniform(T),
    PerTier(Vec<T>),
}

impl<T: Copy> Schedule<T> {
    /// Resolve the rate for a 1-based tier index.
    pub fn for_tier(&self, index: u8) -> T {
        match self {
            Self::Uniform(value) => *value,
            Self::PerTier(values) => values[usize::from(index) - 1],
        }
    }
}

impl<T> Schedule<T> {
    pub fn per_tier_len(&self) -> Option<usize> {
        match self {
            Self::Uniform(_) => None,
            Self::PerTier(values) => Some(values.len()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no rates for {kind} meters at {amperage} A (available: {available})")]
    UnknownMeter { kind: MeterKind, amperage: u32, available: String },

    #[error("{meter}: unsupported phase count {nb_phase}")]
    PhaseCount { meter: String, nb_phase: u8 },

    #[error("{meter}: expected {expected} tier prices, found {found}")]
    TierPriceCount { meter: String, expected: usize, found: usize },

    #[error(
        "{meter}: the {name} schedule must be a scalar or one value per each of {expected} tiers, found {found}"
    )]
    ScheduleLength { meter: String, name: &'static str, expected: usize, found: usize },
}
