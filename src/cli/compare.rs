use clap::Parser;

use crate::{
    api::breakdown::{BreakdownService, CalculateRequest},
    cli::{
        breakdown::BreakdownArgs,
        parameters::ParametersArgs,
        project::{print_breakdown, print_projection},
    },
    core::projection::Projection,
    prelude::*,
};

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    parameters: ParametersArgs,

    #[clap(flatten)]
    breakdown: BreakdownArgs,
}

impl CompareArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let parameters = self.parameters.load()?;
        print_projection(&Projection::try_new(&parameters)?);

        let api = self.breakdown.new_client()?;
        match api.calculate(&CalculateRequest::from(&parameters)).await {
            Ok(breakdown) => print_breakdown(&breakdown),
            Err(error) => warn!("the breakdown is not shown: {error:#}"),
        }
        Ok(())
    }
}
