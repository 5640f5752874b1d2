//! Report generation port trait.

use crate::domain::error::FdiError;
use crate::domain::sweep::ProfitPoint;
use std::path::Path;

/// Port for writing profit-versus-input-price curves.
pub trait ReportPort {
    /// `equilibrium_price` marks the separated-equilibrium input price, if known.
    fn write_curve(
        &self,
        curve: &[ProfitPoint],
        equilibrium_price: Option<f64>,
        output_path: &Path,
    ) -> Result<(), FdiError>;
}
