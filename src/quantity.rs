#[macro_use]
pub mod macros;

pub mod cost;
pub mod distance;
pub mod energy;
pub mod fuel;
pub mod rate;
