//! CSV profit-curve writer implementing ReportPort.

use std::fs;
use std::path::Path;

use crate::domain::error::FdiError;
use crate::domain::sweep::ProfitPoint;
use crate::ports::report_port::ReportPort;

pub struct CsvCurveAdapter;

impl CsvCurveAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize the curve into CSV text with an `input_price,upstream_profit,downstream_profit` header.
    pub fn render(curve: &[ProfitPoint]) -> Result<String, FdiError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for point in curve {
            wtr.serialize(point).map_err(|e| FdiError::Report {
                reason: format!("CSV write error: {}", e),
            })?;
        }
        let bytes = wtr.into_inner().map_err(|e| FdiError::Report {
            reason: format!("CSV flush error: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| FdiError::Report {
            reason: format!("CSV encoding error: {}", e),
        })
    }
}

impl Default for CsvCurveAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvCurveAdapter {
    fn write_curve(
        &self,
        curve: &[ProfitPoint],
        _equilibrium_price: Option<f64>,
        output_path: &Path,
    ) -> Result<(), FdiError> {
        let content = Self::render(curve)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content)?;
        Ok(())
    }
}
