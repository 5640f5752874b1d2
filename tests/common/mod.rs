#![allow(dead_code)]

use std::io::Write;
use std::process::ExitCode;

pub use fdi_equilibria::domain::params::{HorizontalParams, PlantAllocation, VerticalParams};

pub const TOLERANCE: f64 = 1e-9;

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// ExitCode has no PartialEq; compare through its Debug form.
pub fn same_exit_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

/// Vertical parameters with the demand intercept at or below downstream cost.
pub fn inactive_vertical(a: f64, cd: f64) -> VerticalParams {
    VerticalParams {
        a,
        cd,
        ..VerticalParams::default()
    }
}
