use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    api::breakdown::Breakdown,
    core::projection::{Projection, Vehicle},
    quantity::cost::Cost,
};

const BAR_WIDTH: usize = 40;

const fn vehicle_color(vehicle: Vehicle) -> Color {
    match vehicle {
        Vehicle::Ice => Color::Blue,
        Vehicle::Ev => Color::Red,
    }
}

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

/// Horizontal bar proportional to `value / max`.
fn bar(value: Cost, max: Cost, width: usize) -> String {
    if max <= Cost::ZERO || value <= Cost::ZERO {
        return String::new();
    }
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let n_blocks = ((value.0 / max.0).min(1.0) * width as f64).round() as usize;
    "█".repeat(n_blocks)
}

/// Year-by-year cumulative costs, the terminal rendition of the line chart.
#[must_use]
pub fn build_projection_table(projection: &Projection) -> Table {
    let max_cost = projection.max_cost();
    let break_even_year = projection.break_even_year();

    let mut table = new_table();
    table.set_header(vec!["Year", "ICE", "", "EV", "", "EV saving"]);
    for (ice, ev) in projection.years() {
        let saving = ice.cost - ev.cost;
        let mut year = Cell::new(ice.year).set_alignment(CellAlignment::Right);
        if Some(ice.year) == break_even_year {
            year = year.add_attribute(Attribute::Bold);
        }
        let mut ev_cost = Cell::new(ev.cost).set_alignment(CellAlignment::Right);
        if ev.battery_replaced {
            ev_cost = ev_cost.fg(Color::DarkYellow);
        }
        table.add_row(vec![
            year,
            Cell::new(ice.cost).set_alignment(CellAlignment::Right),
            Cell::new(bar(ice.cost, max_cost, BAR_WIDTH)).fg(vehicle_color(Vehicle::Ice)),
            ev_cost,
            Cell::new(bar(ev.cost, max_cost, BAR_WIDTH)).fg(vehicle_color(Vehicle::Ev)),
            Cell::new(saving).set_alignment(CellAlignment::Right).fg(if saving >= Cost::ZERO {
                Color::Green
            } else {
                Color::Red
            }),
        ]);
    }
    table
}

/// Totals as returned by the breakdown service, the terminal rendition of the bar chart.
#[must_use]
pub fn build_totals_table(breakdown: &Breakdown) -> Table {
    let max_total = Vehicle::ALL.map(|vehicle| breakdown.total(vehicle)).into_iter().max();
    let max_total = max_total.unwrap_or(Cost::ZERO);

    let mut table = new_table();
    table.set_header(vec!["Vehicle", "Total cost of ownership", ""]);
    for vehicle in Vehicle::ALL {
        let total = breakdown.total(vehicle);
        table.add_row(vec![
            Cell::new(vehicle).add_attribute(Attribute::Bold),
            Cell::new(total).set_alignment(CellAlignment::Right),
            Cell::new(bar(total, max_total, BAR_WIDTH)).fg(vehicle_color(vehicle)),
        ]);
    }
    table
}

/// Itemized components of both vehicles side by side.
#[must_use]
pub fn build_breakdown_table(breakdown: &Breakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec!["ICE", "", "EV", ""]);
    for ((ice_label, ice_cost), (ev_label, ev_cost)) in
        breakdown.items(Vehicle::Ice).into_iter().zip(breakdown.items(Vehicle::Ev))
    {
        table.add_row(vec![
            Cell::new(ice_label).add_attribute(Attribute::Dim),
            Cell::new(ice_cost).set_alignment(CellAlignment::Right),
            Cell::new(ev_label).add_attribute(Attribute::Dim),
            Cell::new(ev_cost).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
