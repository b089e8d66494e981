#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod prelude;
mod quantity;
mod report;
mod tables;
mod tariff;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, CostArgs, EnergyArgs},
    core::calculator::BillingCalculator,
    prelude::*,
    tables::{Summary, build_breakdown_table, build_meters_table},
    tariff::RateTable,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();
    let rate_table = RateTable::read_from(&args.rates)?;
    info!(n_kinds = rate_table.kinds.len(), "loaded the rate table");

    match args.command {
        Command::Meters => {
            println!("{}", build_meters_table(&rate_table));
        }
        Command::Cost(args) => {
            bill_kwh(&rate_table, &args)?;
        }
        Command::Energy(args) => {
            bill_amount(&rate_table, &args)?;
        }
    }

    info!("done!");
    Ok(())
}

fn bill_kwh(rate_table: &RateTable, args: &CostArgs) -> Result {
    let calculator = BillingCalculator::builder()
        .rate_table(rate_table)
        .kind(args.meter.kind)
        .amperage(args.meter.amperage)
        .previous_kwh(args.meter.previous_kwh)
        .build()?;
    let consumption = calculator.consumption_for_kwh(args.nb_kwh)?;
    let amount = calculator.final_amount(&consumption);
    info!(%amount, "billed");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&consumption.to_record())?);
    } else {
        println!("{}", build_breakdown_table(&consumption));
        println!(
            "{}",
            Summary {
                nb_kwh: args.nb_kwh,
                amount,
                average: BillingCalculator::average_rate(args.nb_kwh, amount),
            },
        );
    }
    Ok(())
}

fn bill_amount(rate_table: &RateTable, args: &EnergyArgs) -> Result {
    let calculator = BillingCalculator::builder()
        .rate_table(rate_table)
        .kind(args.meter.kind)
        .amperage(args.meter.amperage)
        .previous_kwh(args.meter.previous_kwh)
        .build()?;
    let consumption = calculator.consumption_for_amount(args.amount)?;
    let nb_kwh = consumption.nb_kwh();
    info!(%nb_kwh, "affordable");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&consumption.to_record())?);
    } else {
        println!("{}", build_breakdown_table(&consumption));
        println!(
            "{}",
            Summary {
                nb_kwh,
                amount: args.amount,
                average: BillingCalculator::average_rate(nb_kwh, args.amount),
            },
        );
    }
    Ok(())
}
