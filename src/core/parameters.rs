use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::error::Error,
    quantity::{
        cost::Cost,
        distance::{Kilometers, KilometersPerLitre},
        energy::KilowattHours,
        rate::{KilowattHourRate, LitreRate},
    },
};

/// Longest horizon the projection accepts, in years.
pub const MAX_HORIZON: u32 = 100;

/// Everything the comparison needs, as one immutable record.
#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct Parameters {
    #[builder(default)]
    pub ice: IceParameters,

    #[builder(default)]
    pub ev: EvParameters,

    #[builder(default)]
    pub usage: Usage,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct IceParameters {
    #[builder(default = Cost(1_500_000.0))]
    pub purchase_price: Cost,

    #[builder(default = KilometersPerLitre(10.0))]
    pub mileage: KilometersPerLitre,

    #[builder(default = LitreRate(100.0))]
    pub fuel_cost: LitreRate,
}

impl Default for IceParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct EvParameters {
    #[builder(default = Cost(2_000_000.0))]
    pub purchase_price: Cost,

    /// Distance per full charge.
    #[builder(default = Kilometers(200.0))]
    pub range: Kilometers,

    #[builder(default = KilowattHours(30.0))]
    pub battery_capacity: KilowattHours,

    #[builder(default = KilowattHourRate(9.5))]
    pub charging_cost: KilowattHourRate,

    #[builder(default = Cost(700_000.0))]
    pub battery_replacement_cost: Cost,

    /// Years between battery replacements.
    #[builder(default = 6)]
    pub battery_replacement_interval: u32,
}

impl Default for EvParameters {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[serde(default)]
pub struct Usage {
    #[builder(default = Kilometers(3_000.0))]
    pub monthly_distance: Kilometers,

    /// Number of projected years.
    #[builder(default = 15)]
    pub horizon: u32,

    #[builder(default = true)]
    pub consider_battery_replacement: bool,
}

impl Default for Usage {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Parameters {
    /// Check the inputs, so that the projection never yields a non-finite cost.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, value) in self.numbers() {
            if !value.is_finite() {
                return Err(Error::invalid(field, "must be a finite number"));
            }
        }
        if self.ice.mileage.0 <= 0.0 {
            return Err(Error::invalid(Field::IceMileage, "must be positive"));
        }
        if self.ev.range.0 <= 0.0 {
            return Err(Error::invalid(Field::EvRange, "must be positive"));
        }
        if self.ev.battery_replacement_interval == 0 {
            return Err(Error::invalid(
                Field::BatteryReplacementInterval,
                "must be at least a year",
            ));
        }
        if !(1..=MAX_HORIZON).contains(&self.usage.horizon) {
            return Err(Error::invalid(
                Field::CalculationDuration,
                format!("must be within 1..={MAX_HORIZON} years"),
            ));
        }
        self.check_ice_costs()?;
        self.check_ev_costs()
    }

    /// Walk the ICE cost chain and blame the first field which overflows it.
    fn check_ice_costs(&self) -> Result<(), Error> {
        let yearly_distance = self.usage.monthly_distance * 12.0;
        ensure_finite(yearly_distance.0, Field::MonthlyKm, TOO_LARGE)?;
        let fuel = yearly_distance / self.ice.mileage;
        ensure_finite(fuel.0, Field::IceMileage, TOO_SMALL)?;
        let running_cost = fuel * self.ice.fuel_cost;
        ensure_finite(running_cost.0, Field::FuelCost, TOO_LARGE)?;
        self.check_cumulative_cost(running_cost, self.ice.purchase_price, Field::IcePrice)
    }

    fn check_ev_costs(&self) -> Result<(), Error> {
        let yearly_distance = self.usage.monthly_distance * 12.0;
        ensure_finite(yearly_distance.0, Field::MonthlyKm, TOO_LARGE)?;
        let n_charges = yearly_distance / self.ev.range;
        ensure_finite(n_charges, Field::EvRange, TOO_SMALL)?;
        let energy = self.ev.battery_capacity * n_charges;
        ensure_finite(energy.0, Field::BatteryCapacity, TOO_LARGE)?;
        let running_cost = energy * self.ev.charging_cost;
        ensure_finite(running_cost.0, Field::ChargingCost, TOO_LARGE)?;
        self.check_cumulative_cost(running_cost, self.ev.purchase_price, Field::EvPrice)?;

        if self.usage.consider_battery_replacement {
            let worst = running_cost.0.abs().mul_add(
                f64::from(self.usage.horizon),
                self.ev.purchase_price.0.abs() + self.ev.battery_replacement_cost.0.abs(),
            );
            ensure_finite(worst, Field::BatteryReplacementCost, TOO_LARGE)?;
        }
        Ok(())
    }

    /// Bound the magnitude of the cumulative cost in the last projected year.
    ///
    /// The cost is affine in the year, so the last year has the largest magnitude.
    fn check_cumulative_cost(
        &self,
        running_cost: Cost,
        purchase_price: Cost,
        price_field: Field,
    ) -> Result<(), Error> {
        let spent = running_cost.0.abs() * f64::from(self.usage.horizon);
        ensure_finite(spent, Field::CalculationDuration, "makes the running cost overflow")?;
        ensure_finite(purchase_price.0.abs() + spent, price_field, TOO_LARGE)
    }

    fn numbers(&self) -> [(Field, f64); 9] {
        [
            (Field::IcePrice, self.ice.purchase_price.0),
            (Field::IceMileage, self.ice.mileage.0),
            (Field::FuelCost, self.ice.fuel_cost.0),
            (Field::EvPrice, self.ev.purchase_price.0),
            (Field::EvRange, self.ev.range.0),
            (Field::BatteryCapacity, self.ev.battery_capacity.0),
            (Field::ChargingCost, self.ev.charging_cost.0),
            (Field::BatteryReplacementCost, self.ev.battery_replacement_cost.0),
            (Field::MonthlyKm, self.usage.monthly_distance.0),
        ]
    }
}

const TOO_LARGE: &str = "is too large to project";
const TOO_SMALL: &str = "is too small to project";

fn ensure_finite(value: f64, field: Field, reason: &'static str) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, reason))
    }
}

/// Single editable parameter, named the way the breakdown service names it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Field {
    #[display("icePrice")]
    IcePrice,

    #[display("iceMileage")]
    IceMileage,

    #[display("fuelCost")]
    FuelCost,

    #[display("evPrice")]
    EvPrice,

    #[display("evRange")]
    EvRange,

    #[display("batteryCapacity")]
    BatteryCapacity,

    #[display("chargingCost")]
    ChargingCost,

    #[display("batteryReplacementCost")]
    BatteryReplacementCost,

    #[display("batteryReplacementInterval")]
    BatteryReplacementInterval,

    #[display("monthlyKm")]
    MonthlyKm,

    #[display("calculationDuration")]
    CalculationDuration,

    #[display("considerBatteryReplacement")]
    ConsiderBatteryReplacement,
}

impl Field {
    pub const ALL: [Self; 12] = [
        Self::IcePrice,
        Self::IceMileage,
        Self::FuelCost,
        Self::EvPrice,
        Self::EvRange,
        Self::BatteryCapacity,
        Self::ChargingCost,
        Self::BatteryReplacementCost,
        Self::BatteryReplacementInterval,
        Self::MonthlyKm,
        Self::CalculationDuration,
        Self::ConsiderBatteryReplacement,
    ];

    /// Kebab-case alias, the same as the corresponding command-line flag.
    pub fn kebab_name(self) -> String {
        let mut kebab = String::new();
        for char in self.to_string().chars() {
            if char.is_ascii_uppercase() {
                kebab.push('-');
            }
            kebab.push(char.to_ascii_lowercase());
        }
        kebab
    }

    /// Parse the value and write it into the parameters.
    ///
    /// The parameters are not validated here, see [`Parameters::validate`].
    pub fn apply(self, parameters: &mut Parameters, value: &str) -> Result<(), Error> {
        let value = value.trim();
        match self {
            Self::IcePrice => parameters.ice.purchase_price = self.parse(value)?,
            Self::IceMileage => parameters.ice.mileage = self.parse(value)?,
            Self::FuelCost => parameters.ice.fuel_cost = self.parse(value)?,
            Self::EvPrice => parameters.ev.purchase_price = self.parse(value)?,
            Self::EvRange => parameters.ev.range = self.parse(value)?,
            Self::BatteryCapacity => parameters.ev.battery_capacity = self.parse(value)?,
            Self::ChargingCost => parameters.ev.charging_cost = self.parse(value)?,
            Self::BatteryReplacementCost => {
                parameters.ev.battery_replacement_cost = self.parse(value)?;
            }
            Self::BatteryReplacementInterval => {
                parameters.ev.battery_replacement_interval = self.parse(value)?;
            }
            Self::MonthlyKm => parameters.usage.monthly_distance = self.parse(value)?,
            Self::CalculationDuration => parameters.usage.horizon = self.parse(value)?,
            Self::ConsiderBatteryReplacement => {
                parameters.usage.consider_battery_replacement = match value {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => return Err(Error::invalid(self, "expected `true` or `false`")),
                };
            }
        }
        Ok(())
    }

    fn parse<T: FromStr>(self, value: &str) -> Result<T, Error> {
        value.parse().map_err(|_| Error::invalid(self, "not a valid number"))
    }
}

impl FromStr for Field {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.to_string() == name || field.kebab_name() == name)
            .ok_or_else(|| anyhow::anyhow!("unknown parameter `{name}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let parameters = Parameters::default();
        assert_eq!(parameters.ice.purchase_price, Cost(1_500_000.0));
        assert_eq!(parameters.ev.charging_cost, KilowattHourRate(9.5));
        assert_eq!(parameters.ev.battery_replacement_interval, 6);
        assert_eq!(parameters.usage.horizon, 15);
        assert!(parameters.usage.consider_battery_replacement);
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn test_zero_divisors_rejected() {
        let mut parameters = Parameters::default();
        parameters.ice.mileage = KilometersPerLitre::ZERO;
        assert!(matches!(
            parameters.validate(),
            Err(Error::InvalidParameter { field: Field::IceMileage, .. })
        ));

        let mut parameters = Parameters::default();
        parameters.ev.range = Kilometers::ZERO;
        assert!(matches!(
            parameters.validate(),
            Err(Error::InvalidParameter { field: Field::EvRange, .. })
        ));

        let mut parameters = Parameters::default();
        parameters.ev.battery_replacement_interval = 0;
        assert!(matches!(
            parameters.validate(),
            Err(Error::InvalidParameter { field: Field::BatteryReplacementInterval, .. })
        ));
    }

    #[test]
    fn test_negative_divisor_rejected() {
        let mut parameters = Parameters::default();
        parameters.ev.range = Kilometers(-200.0);
        assert!(parameters.validate().is_err());
    }

    #[test]
    fn test_horizon_out_of_range() {
        let mut parameters = Parameters::default();
        parameters.usage.horizon = 0;
        assert!(matches!(
            parameters.validate(),
            Err(Error::InvalidParameter { field: Field::CalculationDuration, .. })
        ));
        parameters.usage.horizon = MAX_HORIZON + 1;
        let error = parameters.validate().unwrap_err();
        assert!(error.to_string().contains(&format!("1..={MAX_HORIZON}")));
        parameters.usage.horizon = MAX_HORIZON;
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut parameters = Parameters::default();
        parameters.ice.fuel_cost = LitreRate(f64::NAN);
        assert!(matches!(
            parameters.validate(),
            Err(Error::InvalidParameter { field: Field::FuelCost, .. })
        ));
    }

    #[test]
    fn test_overflow_blames_first_offending_field() {
        let cases: [(fn(&mut Parameters), Field); 5] = [
            (|parameters| parameters.usage.monthly_distance = Kilometers(1e308), Field::MonthlyKm),
            (|parameters| parameters.ice.mileage = KilometersPerLitre(1e-320), Field::IceMileage),
            (|parameters| parameters.ice.fuel_cost = LitreRate(1e306), Field::FuelCost),
            (|parameters| parameters.ev.range = Kilometers(1e-320), Field::EvRange),
            (
                |parameters| parameters.ev.battery_capacity = KilowattHours(1e307),
                Field::BatteryCapacity,
            ),
        ];
        for (update, expected) in cases {
            let mut parameters = Parameters::default();
            update(&mut parameters);
            match parameters.validate() {
                Err(Error::InvalidParameter { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected `{expected}` to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_large_finite_values_within_range() {
        let mut parameters = Parameters::default();
        parameters.ice.purchase_price = Cost(1e300);
        parameters.usage.monthly_distance = Kilometers(1e12);
        assert!(parameters.validate().is_ok());
    }

    #[test]
    fn test_field_from_str() -> anyhow::Result<()> {
        assert_eq!("icePrice".parse::<Field>()?, Field::IcePrice);
        assert_eq!("monthly-km".parse::<Field>()?, Field::MonthlyKm);
        assert_eq!(
            "consider-battery-replacement".parse::<Field>()?,
            Field::ConsiderBatteryReplacement,
        );
        assert!("fuel".parse::<Field>().is_err());
        Ok(())
    }

    #[test]
    fn test_apply() -> anyhow::Result<()> {
        let mut parameters = Parameters::default();
        Field::EvRange.apply(&mut parameters, " 250 ")?;
        Field::CalculationDuration.apply(&mut parameters, "20")?;
        Field::ConsiderBatteryReplacement.apply(&mut parameters, "off")?;
        assert_eq!(parameters.ev.range, Kilometers(250.0));
        assert_eq!(parameters.usage.horizon, 20);
        assert!(!parameters.usage.consider_battery_replacement);
        assert!(Field::BatteryReplacementInterval.apply(&mut parameters, "6.5").is_err());
        assert!(Field::IcePrice.apply(&mut parameters, "lots").is_err());
        Ok(())
    }

    #[test]
    fn test_deserialize_partial_scenario() -> anyhow::Result<()> {
        // language=toml
        const SCENARIO: &str = r"
            [ev]
            purchase_price = 1800000
            charging_cost = 8.0

            [usage]
            horizon = 10
        ";
        let parameters: Parameters = toml::from_str(SCENARIO)?;
        assert_eq!(parameters.ev.purchase_price, Cost(1_800_000.0));
        assert_eq!(parameters.ev.charging_cost, KilowattHourRate(8.0));
        assert_eq!(parameters.ev.range, Kilometers(200.0));
        assert_eq!(parameters.usage.horizon, 10);
        assert_eq!(parameters.ice, IceParameters::default());
        Ok(())
    }
}
