pub mod health_checks;
pub mod service;

pub use health_checks::*;
