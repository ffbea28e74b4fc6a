pub mod error;
pub mod parameters;
pub mod projection;
pub mod session;
