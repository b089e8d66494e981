use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    quantity::{cost::Cost, energy::KilowattHours},
    tariff::MeterKind,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    /// Path to the rate table.
    #[clap(long, env = "RATES_PATH", default_value = "rates.toml")]
    pub rates: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the supported meter classes.
    Meters,

    /// Bill an energy reading: kWh to francs.
    Cost(Box<CostArgs>),

    /// Invert a budget: francs to affordable kWh.
    Energy(Box<EnergyArgs>),
}

#[derive(Parser)]
pub struct MeterArgs {
    /// Meter kind.
    #[clap(long, value_enum, env = "METER_KIND")]
    pub kind: MeterKind,

    /// Subscribed amperage.
    #[clap(long, env = "AMPERAGE")]
    pub amperage: u32,

    /// Reading already billed in the previous period, in kWh.
    #[clap(long = "previous-kwh", default_value = "0", env = "PREVIOUS_KWH")]
    pub previous_kwh: KilowattHours,
}

#[derive(Parser)]
pub struct CostArgs {
    #[clap(flatten)]
    pub meter: MeterArgs,

    /// Print the allocation as JSON instead of tables.
    #[clap(long)]
    pub json: bool,

    /// Energy to bill, in kWh.
    pub nb_kwh: KilowattHours,
}

#[derive(Parser)]
pub struct EnergyArgs {
    #[clap(flatten)]
    pub meter: MeterArgs,

    /// Print the allocation as JSON instead of tables.
    #[clap(long)]
    pub json: bool,

    /// Budget in CFA francs, stamp duty included.
    pub amount: Cost,
}
