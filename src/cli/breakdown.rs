use clap::Parser;
use reqwest::Url;

use crate::{
    api::breakdown::{Api, DEFAULT_URL},
    prelude::*,
};

#[derive(Parser)]
pub struct BreakdownArgs {
    /// Endpoint which itemizes the total cost of ownership.
    #[clap(long = "breakdown-url", env = "BREAKDOWN_URL", default_value = DEFAULT_URL)]
    url: Url,
}

impl BreakdownArgs {
    pub fn new_client(self) -> Result<Api> {
        Api::new(self.url)
    }
}
