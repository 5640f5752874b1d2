//! Profit-versus-input-price curves for the separated vertical model.
//!
//! Resamples both firms' profits across a range of input prices with the
//! downstream firm always on its best response. Profits are floored at zero:
//! above the choke price the downstream firm simply shuts down, and below
//! upstream cost the supplier would refuse to sell.

use serde::Serialize;

use crate::domain::error::FdiError;
use crate::domain::params::{require_finite, VerticalParams};
use crate::domain::units::{Price, Profit};
use crate::domain::vertical::{evaluate_at_input_price, separated_equilibrium};

pub const DEFAULT_SAMPLES: usize = 100;

/// Floor of the default sweep range, for markets quoting a zero input price.
const MIN_SWEEP_CEILING: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfitPoint {
    pub input_price: Price,
    pub upstream_profit: Profit,
    pub downstream_profit: Profit,
}

/// Upper end of the default sweep: twice the separated-equilibrium input
/// price, and never below [`MIN_SWEEP_CEILING`].
pub fn default_sweep_ceiling(p: &VerticalParams) -> Result<f64, FdiError> {
    let eq = separated_equilibrium(p)?;
    Ok((2.0 * eq.input_price.value()).max(MIN_SWEEP_CEILING))
}

/// Sample `samples` evenly spaced input prices in `[0, max_input_price]`.
pub fn profit_curve(
    p: &VerticalParams,
    max_input_price: f64,
    samples: usize,
) -> Result<Vec<ProfitPoint>, FdiError> {
    p.validate()?;
    require_finite("max_input_price", max_input_price)?;
    if max_input_price <= 0.0 {
        return Err(FdiError::invalid("max_input_price", "must be positive"));
    }
    if samples < 2 {
        return Err(FdiError::invalid("samples", "need at least 2 samples"));
    }

    let step = max_input_price / (samples - 1) as f64;
    let curve = (0..samples)
        .map(|i| {
            let pb = if i == samples - 1 {
                max_input_price
            } else {
                i as f64 * step
            };
            let at = evaluate_at_input_price(p, pb);
            ProfitPoint {
                input_price: Price(pb),
                upstream_profit: Profit(at.upstream_profit.value().max(0.0)),
                downstream_profit: Profit(at.downstream_profit.value().max(0.0)),
            }
        })
        .collect();
    Ok(curve)
}
