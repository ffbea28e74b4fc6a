use crate::quantity::{cost::Cost, energy::KilowattHours, fuel::Litres};

quantity!(
    /// Rupees per litre of fuel.
    LitreRate, via: f64, suffix: "Rs/l", precision: 2
);

quantity!(
    /// Rupees per kilowatt-hour.
    KilowattHourRate, via: f64, suffix: "Rs/kWh", precision: 2
);

implement_mul!(Litres, LitreRate, Cost);
implement_mul!(KilowattHours, KilowattHourRate, Cost);
