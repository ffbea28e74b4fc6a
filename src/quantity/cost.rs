quantity!(
    /// Indian rupees, the only currency the comparison deals in.
    Cost, via: f64, suffix: "Rs", precision: 0
);
