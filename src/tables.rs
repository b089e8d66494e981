use std::fmt::{Display, Formatter};

use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};

use crate::{
    core::allocation::UsageAllocation,
    quantity::{cost::Cost, energy::KilowattHours, rate::KilowattHourRate},
    tariff::RateTable,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

/// The meter catalogue: every subscription class in the rate table.
pub fn build_meters_table(rate_table: &RateTable) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Kind", "Amperage", "Power"]);
    for kind_rates in rate_table.kinds.values() {
        for (amperage, rates) in &kind_rates.amperage {
            table.add_row(vec![
                Cell::new(&kind_rates.label),
                Cell::new(format!("{amperage} A")).set_alignment(CellAlignment::Right),
                Cell::new(&rates.power).set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}

/// Per-tier billing breakdown of one allocation.
pub fn build_breakdown_table(allocation: &UsageAllocation<'_>) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Tier", "kWh", "Price", "VAT", "Maintenance", "Cost"]);
    for (index, usage) in allocation.slices() {
        table.add_row(vec![
            Cell::new(format!("TR{index}")),
            Cell::new(usage.nb_kwh).set_alignment(CellAlignment::Right),
            Cell::new(usage.price).set_alignment(CellAlignment::Right),
            Cell::new(usage.vat).set_alignment(CellAlignment::Right),
            Cell::new(usage.maint).set_alignment(CellAlignment::Right).add_attribute(Attribute::Dim),
            Cell::new(usage.cost).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Lighting").add_attribute(Attribute::Dim),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(allocation.lighting()).set_alignment(CellAlignment::Right),
    ]);
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(allocation.nb_kwh()).set_alignment(CellAlignment::Right),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(allocation.cost()).set_alignment(CellAlignment::Right).add_attribute(Attribute::Bold),
    ]);
    table
}

/// Billing summary printed below the breakdown.
#[must_use]
pub struct Summary {
    pub nb_kwh: KilowattHours,
    pub amount: Cost,
    pub average: KilowattHourRate,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut table = new_table();
        table
            .set_header(vec![Cell::from("Energy"), Cell::from("Amount"), Cell::from("Average")])
            .add_row(vec![
                Cell::from(self.nb_kwh),
                Cell::from(self.amount).add_attribute(Attribute::Bold),
                Cell::from(self.average),
            ]);
        write!(f, "{table}")
    }
}
