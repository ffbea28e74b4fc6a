pub mod breakdown;
pub mod lifecycle;
