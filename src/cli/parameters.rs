use std::path::{Path, PathBuf};

use clap::Parser;

use crate::{
    core::parameters::Parameters,
    prelude::*,
    quantity::{
        cost::Cost,
        distance::{Kilometers, KilometersPerLitre},
        energy::KilowattHours,
        rate::{KilowattHourRate, LitreRate},
    },
};

/// Comparison inputs, the flags take precedence over the scenario file.
#[derive(Parser)]
pub struct ParametersArgs {
    /// TOML scenario file with `[ice]`, `[ev]`, and `[usage]` tables, missing keys take defaults.
    #[clap(long, env = "SCENARIO_PATH")]
    scenario: Option<PathBuf>,

    /// ICE vehicle purchase price in rupees.
    #[clap(long = "ice-price", env = "ICE_PRICE")]
    ice_price: Option<Cost>,

    /// ICE vehicle mileage in kilometres per litre.
    #[clap(long = "ice-mileage", env = "ICE_MILEAGE")]
    ice_mileage: Option<KilometersPerLitre>,

    /// Fuel cost in rupees per litre.
    #[clap(long = "fuel-cost", env = "FUEL_COST")]
    fuel_cost: Option<LitreRate>,

    /// EV purchase price in rupees.
    #[clap(long = "ev-price", env = "EV_PRICE")]
    ev_price: Option<Cost>,

    /// True EV range per full charge in kilometres.
    #[clap(long = "ev-range", env = "EV_RANGE")]
    ev_range: Option<Kilometers>,

    /// Battery capacity in kilowatt-hours.
    #[clap(long = "battery-capacity", env = "BATTERY_CAPACITY")]
    battery_capacity: Option<KilowattHours>,

    /// Charging cost in rupees per kilowatt-hour.
    #[clap(long = "charging-cost", env = "CHARGING_COST")]
    charging_cost: Option<KilowattHourRate>,

    /// Cost of a single battery replacement in rupees.
    #[clap(long = "battery-replacement-cost", env = "BATTERY_REPLACEMENT_COST")]
    battery_replacement_cost: Option<Cost>,

    /// Years between battery replacements.
    #[clap(long = "battery-replacement-interval", env = "BATTERY_REPLACEMENT_INTERVAL")]
    battery_replacement_interval: Option<u32>,

    /// Distance driven per month in kilometres.
    #[clap(long = "monthly-km", env = "MONTHLY_KM")]
    monthly_km: Option<Kilometers>,

    /// Number of projected years.
    #[clap(long = "calculation-duration", env = "CALCULATION_DURATION")]
    calculation_duration: Option<u32>,

    #[clap(long = "consider-battery-replacement", env = "CONSIDER_BATTERY_REPLACEMENT")]
    consider_battery_replacement: Option<bool>,
}

impl ParametersArgs {
    #[instrument(skip_all)]
    pub fn load(&self) -> Result<Parameters> {
        let mut parameters = match &self.scenario {
            Some(path) => Self::read_scenario(path)?,
            None => Parameters::default(),
        };

        if let Some(price) = self.ice_price {
            parameters.ice.purchase_price = price;
        }
        if let Some(mileage) = self.ice_mileage {
            parameters.ice.mileage = mileage;
        }
        if let Some(fuel_cost) = self.fuel_cost {
            parameters.ice.fuel_cost = fuel_cost;
        }
        if let Some(price) = self.ev_price {
            parameters.ev.purchase_price = price;
        }
        if let Some(range) = self.ev_range {
            parameters.ev.range = range;
        }
        if let Some(capacity) = self.battery_capacity {
            parameters.ev.battery_capacity = capacity;
        }
        if let Some(charging_cost) = self.charging_cost {
            parameters.ev.charging_cost = charging_cost;
        }
        if let Some(cost) = self.battery_replacement_cost {
            parameters.ev.battery_replacement_cost = cost;
        }
        if let Some(interval) = self.battery_replacement_interval {
            parameters.ev.battery_replacement_interval = interval;
        }
        if let Some(distance) = self.monthly_km {
            parameters.usage.monthly_distance = distance;
        }
        if let Some(horizon) = self.calculation_duration {
            parameters.usage.horizon = horizon;
        }
        if let Some(consider) = self.consider_battery_replacement {
            parameters.usage.consider_battery_replacement = consider;
        }

        parameters.validate()?;
        debug!(?parameters, "loaded");
        Ok(parameters)
    }

    fn read_scenario(path: &Path) -> Result<Parameters> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }
}
