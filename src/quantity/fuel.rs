quantity!(Litres, via: f64, suffix: "l", precision: 1);
