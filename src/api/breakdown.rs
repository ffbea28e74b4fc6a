//! Client of the remote service which itemizes the total cost of ownership.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::{
    core::{error::Error, parameters::Parameters, projection::Vehicle},
    prelude::*,
    quantity::{
        cost::Cost,
        distance::{Kilometers, KilometersPerLitre},
        energy::KilowattHours,
        rate::{KilowattHourRate, LitreRate},
    },
};

pub const DEFAULT_URL: &str = "http://localhost:8000/calculate";

#[async_trait]
pub trait BreakdownService: Send + Sync {
    async fn calculate(&self, request: &CalculateRequest) -> Result<Breakdown, Error>;
}

pub struct Api {
    client: Client,
    url: Url,
}

impl Api {
    #[instrument(skip_all, fields(url = %url))]
    pub fn new(url: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ev-tco/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client, url })
    }

    async fn calculate_fallible(&self, request: &CalculateRequest) -> Result<Breakdown> {
        let breakdown: Breakdown = self
            .client
            .post(self.url.clone())
            .json(request)
            .send()
            .await
            .with_context(|| format!("failed to call `{}`", self.url))?
            .error_for_status()
            .with_context(|| format!("`{}` failed", self.url))?
            .json()
            .await
            .with_context(|| format!("failed to deserialize the response from `{}`", self.url))?;
        info!(ice = %breakdown.ice_total, ev = %breakdown.ev_total, "fetched the breakdown");
        Ok(breakdown)
    }
}

#[async_trait]
impl BreakdownService for Api {
    #[instrument(skip_all, fields(url = %self.url))]
    async fn calculate(&self, request: &CalculateRequest) -> Result<Breakdown, Error> {
        self.calculate_fallible(request)
            .await
            .map_err(|error| Error::RemoteUnavailable(format!("{error:#}")))
    }
}

/// Request body, it carries exactly the same inputs as the local projection.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    pub ice_price: Cost,
    pub ice_mileage: KilometersPerLitre,
    pub fuel_cost: LitreRate,
    pub ev_price: Cost,
    pub ev_range: Kilometers,
    pub battery_capacity: KilowattHours,
    pub charging_cost: KilowattHourRate,
    pub battery_replacement_cost: Cost,
    pub battery_replacement_interval: u32,
    pub monthly_km: Kilometers,
    pub calculation_duration: u32,
    pub consider_battery_replacement: bool,
}

impl From<&Parameters> for CalculateRequest {
    fn from(parameters: &Parameters) -> Self {
        Self {
            ice_price: parameters.ice.purchase_price,
            ice_mileage: parameters.ice.mileage,
            fuel_cost: parameters.ice.fuel_cost,
            ev_price: parameters.ev.purchase_price,
            ev_range: parameters.ev.range,
            battery_capacity: parameters.ev.battery_capacity,
            charging_cost: parameters.ev.charging_cost,
            battery_replacement_cost: parameters.ev.battery_replacement_cost,
            battery_replacement_interval: parameters.ev.battery_replacement_interval,
            monthly_km: parameters.usage.monthly_distance,
            calculation_duration: parameters.usage.horizon,
            consider_battery_replacement: parameters.usage.consider_battery_replacement,
        }
    }
}

/// Totals and their components as the service sees them.
///
/// Maintenance, insurance and resale figures are never computed locally.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Breakdown {
    #[serde(rename = "ice_tco")]
    pub ice_total: Cost,

    #[serde(rename = "ev_tco")]
    pub ev_total: Cost,

    #[serde(rename = "breakdown")]
    pub components: Components,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Components {
    pub ice: IceComponents,
    pub ev: EvComponents,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceComponents {
    pub purchase_price: Cost,
    pub fuel_cost: Cost,
    pub maintenance_cost: Cost,
    pub insurance_cost: Cost,
    pub resale_value: Cost,
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvComponents {
    pub purchase_price: Cost,
    pub charging_cost: Cost,
    pub maintenance_cost: Cost,
    pub insurance_cost: Cost,
    pub battery_replacement_cost: Cost,
}

impl Breakdown {
    pub const fn total(&self, vehicle: Vehicle) -> Cost {
        match vehicle {
            Vehicle::Ice => self.ice_total,
            Vehicle::Ev => self.ev_total,
        }
    }

    /// Labelled components in display order.
    pub const fn items(&self, vehicle: Vehicle) -> [(&'static str, Cost); 5] {
        match vehicle {
            Vehicle::Ice => {
                let ice = &self.components.ice;
                [
                    ("Purchase price", ice.purchase_price),
                    ("Fuel cost", ice.fuel_cost),
                    ("Maintenance cost", ice.maintenance_cost),
                    ("Insurance cost", ice.insurance_cost),
                    ("Resale value", ice.resale_value),
                ]
            }
            Vehicle::Ev => {
                let ev = &self.components.ev;
                [
                    ("Purchase price", ev.purchase_price),
                    ("Charging cost", ev.charging_cost),
                    ("Maintenance cost", ev.maintenance_cost),
                    ("Insurance cost", ev.insurance_cost),
                    ("Battery replacement cost", ev.battery_replacement_cost),
                ]
            }
        }
    }
}
