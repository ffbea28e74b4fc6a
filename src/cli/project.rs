use clap::Parser;

use crate::{
    api::breakdown::Breakdown,
    cli::parameters::ParametersArgs,
    core::projection::Projection,
    prelude::*,
    tables::{build_breakdown_table, build_projection_table, build_totals_table},
};

#[derive(Parser)]
pub struct ProjectArgs {
    #[clap(flatten)]
    parameters: ParametersArgs,
}

impl ProjectArgs {
    #[instrument(skip_all)]
    pub fn run(self) -> Result {
        let parameters = self.parameters.load()?;
        print_projection(&Projection::try_new(&parameters)?);
        Ok(())
    }
}

pub fn print_projection(projection: &Projection) {
    println!("{}", build_projection_table(projection));
    let (Some(last_ice), Some(last_ev)) = (projection.ice.last(), projection.ev.last()) else {
        return;
    };
    match projection.break_even_year() {
        Some(year) => info!(year, "the EV breaks even"),
        None => info!(n_years = last_ice.year, "the EV does not break even"),
    }
    info!(
        n_years = last_ice.year,
        ice = %last_ice.cost,
        ev = %last_ev.cost,
        saving = %(last_ice.cost - last_ev.cost),
        "total cost of ownership",
    );
}

pub fn print_breakdown(breakdown: &Breakdown) {
    println!("{}", build_totals_table(breakdown));
    println!("{}", build_breakdown_table(breakdown));
}
