use crate::quantity::fuel::Litres;

quantity!(Kilometers, via: f64, suffix: "km", precision: 0);

quantity!(
    /// Fuel efficiency, also known as «mileage».
    KilometersPerLitre, via: f64, suffix: "km/l", precision: 1
);

// Number of full charges needed to cover a distance.
implement_div!(Kilometers, Kilometers, f64);

implement_div!(Kilometers, KilometersPerLitre, Litres);
