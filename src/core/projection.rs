use itertools::Itertools;

use crate::{
    core::{error::Error, parameters::Parameters},
    quantity::cost::Cost,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Vehicle {
    #[display("ICE")]
    Ice,

    #[display("EV")]
    Ev,
}

impl Vehicle {
    pub const ALL: [Self; 2] = [Self::Ice, Self::Ev];

    /// Constant yearly spend on fuel or charging.
    ///
    /// The parameters must be validated, otherwise the result may be non-finite.
    pub fn yearly_running_cost(self, parameters: &Parameters) -> Cost {
        let yearly_distance = parameters.usage.monthly_distance * 12.0;
        match self {
            Self::Ice => (yearly_distance / parameters.ice.mileage) * parameters.ice.fuel_cost,
            Self::Ev => {
                let n_charges = yearly_distance / parameters.ev.range;
                parameters.ev.battery_capacity * n_charges * parameters.ev.charging_cost
            }
        }
    }

    /// Cumulative cost at the specified year, counted from 1.
    ///
    /// Every year is evaluated on its own: a battery replacement shows up as a step
    /// in the replacement year only and does not carry over into the following years.
    fn point_at(self, parameters: &Parameters, year: u32) -> Point {
        let (purchase_price, battery_replaced) = match self {
            Self::Ice => (parameters.ice.purchase_price, false),
            Self::Ev => (
                parameters.ev.purchase_price,
                parameters.usage.consider_battery_replacement
                    && year % parameters.ev.battery_replacement_interval == 0,
            ),
        };
        let mut cost = purchase_price + self.yearly_running_cost(parameters) * f64::from(year);
        if battery_replaced {
            cost += parameters.ev.battery_replacement_cost;
        }
        Point { year, cost, battery_replaced }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub year: u32,
    pub cost: Cost,

    /// Whether the cost includes a battery replacement.
    pub battery_replaced: bool,
}

/// Year-by-year cumulative cost of one vehicle.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Deref, derive_more::IntoIterator)]
pub struct Series(#[into_iterator(owned, ref)] Vec<Point>);

impl Series {
    /// Project the cumulative cost for each year of the configured horizon.
    pub fn try_project(parameters: &Parameters, vehicle: Vehicle) -> Result<Self, Error> {
        parameters.validate()?;
        Ok(Self(
            (1..=parameters.usage.horizon).map(|year| vehicle.point_at(parameters, year)).collect(),
        ))
    }

    pub fn costs(&self) -> impl Iterator<Item = Cost> + '_ {
        self.0.iter().map(|point| point.cost)
    }
}

/// Both vehicles projected over the same horizon.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub ice: Series,
    pub ev: Series,
}

impl Projection {
    pub fn try_new(parameters: &Parameters) -> Result<Self, Error> {
        Ok(Self {
            ice: Series::try_project(parameters, Vehicle::Ice)?,
            ev: Series::try_project(parameters, Vehicle::Ev)?,
        })
    }

    pub fn series(&self, vehicle: Vehicle) -> &Series {
        match vehicle {
            Vehicle::Ice => &self.ice,
            Vehicle::Ev => &self.ev,
        }
    }

    /// Yearly pairs of ICE and EV points.
    pub fn years(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.ice.iter().zip_eq(self.ev.iter())
    }

    /// How much cheaper the EV is by the specified year, negative when it is more expensive.
    pub fn saving_at(&self, year: u32) -> Option<Cost> {
        self.years().find(|(ice, _)| ice.year == year).map(|(ice, ev)| ice.cost - ev.cost)
    }

    /// First year when the EV is no more expensive than the ICE vehicle.
    pub fn break_even_year(&self) -> Option<u32> {
        self.years().find(|(ice, ev)| ev.cost <= ice.cost).map(|(ice, _)| ice.year)
    }

    /// Highest cost over both series, used to scale the chart bars.
    pub fn max_cost(&self) -> Cost {
        Vehicle::ALL
            .into_iter()
            .flat_map(|vehicle| self.series(vehicle).costs())
            .max()
            .unwrap_or(Cost::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::parameters::{EvParameters, IceParameters, Usage},
        quantity::{
            distance::{Kilometers, KilometersPerLitre},
            energy::KilowattHours,
            rate::{KilowattHourRate, LitreRate},
        },
    };

    fn parameters() -> Parameters {
        Parameters::builder()
            .ice(
                IceParameters::builder()
                    .purchase_price(Cost(1_500_000.0))
                    .mileage(KilometersPerLitre(10.0))
                    .fuel_cost(LitreRate(100.0))
                    .build(),
            )
            .ev(
                EvParameters::builder()
                    .purchase_price(Cost(2_000_000.0))
                    .range(Kilometers(200.0))
                    .battery_capacity(KilowattHours(30.0))
                    .charging_cost(KilowattHourRate(9.5))
                    .battery_replacement_cost(Cost(700_000.0))
                    .battery_replacement_interval(6)
                    .build(),
            )
            .usage(
                Usage::builder()
                    .monthly_distance(Kilometers(3_000.0))
                    .horizon(15)
                    .consider_battery_replacement(true)
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_ice_first_year() -> Result<(), Error> {
        let series = Series::try_project(&parameters(), Vehicle::Ice)?;
        assert_eq!(series[0].year, 1);
        assert_abs_diff_eq!(series[0].cost.0, 1_860_000.0, epsilon = 1e-6);
        Ok(())
    }

    #[test]
    fn test_ice_is_affine() -> Result<(), Error> {
        let parameters = parameters();
        let series = Series::try_project(&parameters, Vehicle::Ice)?;
        let expected_step = 12.0 * 3_000.0 * 100.0 / 10.0;
        for (previous, next) in series.costs().tuple_windows() {
            assert!(next >= previous);
            assert_abs_diff_eq!((next - previous).0, expected_step, epsilon = 1e-6);
        }
        assert_abs_diff_eq!(
            Vehicle::Ice.yearly_running_cost(&parameters).0,
            expected_step,
            epsilon = 1e-6,
        );
        Ok(())
    }

    #[test]
    fn test_ev_first_year() -> Result<(), Error> {
        let series = Series::try_project(&parameters(), Vehicle::Ev)?;
        assert_abs_diff_eq!(series[0].cost.0, 2_051_300.0, epsilon = 1e-6);
        assert!(!series[0].battery_replaced);
        Ok(())
    }

    #[test]
    fn test_ev_battery_replacement_steps() -> Result<(), Error> {
        let parameters = parameters();
        let series = Series::try_project(&parameters, Vehicle::Ev)?;
        for point in &series {
            let base = 2_000_000.0
                + f64::from(point.year) * (12.0 * 3_000.0 * 30.0 / 200.0) * 9.5;
            if point.year % 6 == 0 {
                assert!(point.battery_replaced);
                assert_abs_diff_eq!(point.cost.0, base + 700_000.0, epsilon = 1e-6);
            } else {
                assert!(!point.battery_replaced);
                assert_abs_diff_eq!(point.cost.0, base, epsilon = 1e-6);
            }
        }
        assert_abs_diff_eq!(
            series[5].cost.0,
            2_000_000.0 + 6.0 * 51_300.0 + 700_000.0,
            epsilon = 1e-6,
        );
        Ok(())
    }

    #[test]
    fn test_ev_replacement_is_not_carried_over() -> Result<(), Error> {
        let series = Series::try_project(&parameters(), Vehicle::Ev)?;
        // Year 7 drops back to the base line right after the year 6 replacement.
        assert!(series[6].cost < series[5].cost);
        Ok(())
    }

    #[test]
    fn test_ev_without_replacement_is_affine() -> Result<(), Error> {
        let mut parameters = parameters();
        parameters.usage.consider_battery_replacement = false;
        let series = Series::try_project(&parameters, Vehicle::Ev)?;
        assert!(series.iter().all(|point| !point.battery_replaced));
        for (previous, next) in series.costs().tuple_windows() {
            assert_abs_diff_eq!((next - previous).0, 51_300.0, epsilon = 1e-6);
        }
        Ok(())
    }

    #[test]
    fn test_length_follows_horizon() -> Result<(), Error> {
        let mut parameters = parameters();
        assert_eq!(Series::try_project(&parameters, Vehicle::Ice)?.len(), 15);
        parameters.usage.horizon = 7;
        let projection = Projection::try_new(&parameters)?;
        assert_eq!(projection.ice.len(), 7);
        assert_eq!(projection.ev.len(), 7);
        assert_eq!(
            projection.ev.iter().map(|point| point.year).collect_vec(),
            (1..=7).collect_vec(),
        );
        Ok(())
    }

    #[test]
    fn test_zero_divisors_fail_fast() {
        let updates: [fn(&mut Parameters); 3] = [
            |parameters| parameters.ice.mileage = KilometersPerLitre(0.0),
            |parameters| parameters.ev.range = Kilometers(0.0),
            |parameters| parameters.ev.battery_replacement_interval = 0,
        ];
        for update in updates {
            let mut broken = parameters();
            update(&mut broken);
            for vehicle in Vehicle::ALL {
                assert!(matches!(
                    Series::try_project(&broken, vehicle),
                    Err(Error::InvalidParameter { .. }),
                ));
            }
        }
    }

    #[test]
    fn test_overflowing_inputs_fail_fast() {
        let updates: [fn(&mut Parameters); 3] = [
            |parameters| parameters.usage.monthly_distance = Kilometers(1e307),
            |parameters| parameters.ice.mileage = KilometersPerLitre(1e-320),
            |parameters| parameters.ev.range = Kilometers(1e-320),
        ];
        for update in updates {
            let mut broken = parameters();
            update(&mut broken);
            assert!(Projection::try_new(&broken).is_err());
            for vehicle in Vehicle::ALL {
                assert!(matches!(
                    Series::try_project(&broken, vehicle),
                    Err(Error::InvalidParameter { .. }),
                ));
            }
        }
    }

    #[test]
    fn test_break_even() -> Result<(), Error> {
        let projection = Projection::try_new(&parameters())?;
        // 500 000 extra up front, 308 700 saved per year, but 700 000 more in the sixth year.
        assert_eq!(projection.break_even_year(), Some(2));
        assert_abs_diff_eq!(
            projection.saving_at(1).unwrap().0,
            1_860_000.0 - 2_051_300.0,
            epsilon = 1e-6,
        );
        assert!(projection.saving_at(16).is_none());
        Ok(())
    }

    #[test]
    fn test_no_break_even() -> Result<(), Error> {
        let mut parameters = parameters();
        parameters.ev.purchase_price = Cost(100_000_000.0);
        assert_eq!(Projection::try_new(&parameters)?.break_even_year(), None);
        Ok(())
    }

    #[test]
    fn test_max_cost() -> Result<(), Error> {
        let projection = Projection::try_new(&parameters())?;
        assert_eq!(projection.max_cost(), projection.ice[14].cost);
        Ok(())
    }
}
