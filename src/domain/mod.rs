//! Core domain types and equilibrium calculations.

pub mod error;
pub mod units;
pub mod params;
pub mod outcome;
pub mod linalg;
pub mod vertical;
pub mod horizontal;
pub mod sweep;
pub mod config_validation;
