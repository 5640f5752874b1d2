//! Market parameter sets and their boundary validation.

use crate::domain::error::FdiError;
use serde::Serialize;

/// Parameters of the vertical (upstream/downstream) model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VerticalParams {
    /// Demand intercept for the final good.
    pub a: f64,
    /// Demand slope for the final good.
    pub b: f64,
    /// Upstream marginal cost per unit of input.
    pub cu: f64,
    /// Downstream marginal cost per unit of output.
    pub cd: f64,
    /// Units of input required per unit of output.
    pub k: f64,
    /// Fixed cost of the integrated structure.
    pub fixed_cost: f64,
}

impl Default for VerticalParams {
    fn default() -> Self {
        Self {
            a: 240.0,
            b: 2.0,
            cu: 6.0,
            cd: 4.0,
            k: 2.0,
            fixed_cost: 1000.0,
        }
    }
}

impl VerticalParams {
    pub fn validate(&self) -> Result<(), FdiError> {
        require_positive("b", self.b, "non-positive slope")?;
        require_positive("k", self.k, "non-positive input ratio")?;
        require_non_negative("a", self.a)?;
        require_non_negative("cu", self.cu)?;
        require_non_negative("cd", self.cd)?;
        require_non_negative("fixed_cost", self.fixed_cost)?;
        Ok(())
    }

    /// Demand intercept net of downstream cost, `a - cd`.
    pub fn net_intercept(&self) -> f64 {
        self.a - self.cd
    }

    /// Marginal cost of one unit of final good when the input is bought at `input_price`.
    pub fn effective_cost(&self, input_price: f64) -> f64 {
        self.cd + self.k * input_price
    }
}

/// Parameters of the two-country (Ireland, England) horizontal model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizontalParams {
    pub a_ire: f64,
    pub a_eng: f64,
    pub b_ire: f64,
    pub b_eng: f64,
    /// Fixed cost per active plant.
    pub fixed_cost: f64,
    /// Per-unit cost of shipping from Ireland to England.
    pub transport_cost: f64,
}

impl Default for HorizontalParams {
    fn default() -> Self {
        Self {
            a_ire: 280.0,
            a_eng: 400.0,
            b_ire: 1.0,
            b_eng: 1.0,
            fixed_cost: 8000.0,
            transport_cost: 20.0,
        }
    }
}

impl HorizontalParams {
    pub fn validate(&self) -> Result<(), FdiError> {
        require_positive("b_ire", self.b_ire, "non-positive slope")?;
        require_positive("b_eng", self.b_eng, "non-positive slope")?;
        require_non_negative("a_ire", self.a_ire)?;
        require_non_negative("a_eng", self.a_eng)?;
        require_non_negative("fixed_cost", self.fixed_cost)?;
        require_non_negative("transport_cost", self.transport_cost)?;
        Ok(())
    }
}

/// An explicit two-plant production plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlantAllocation {
    /// Output of the Irish plant (Y).
    pub ireland_output: f64,
    /// Output of the English plant (Z).
    pub england_output: f64,
    /// Units shipped from Ireland to England (X).
    pub export: f64,
}

impl Default for PlantAllocation {
    /// Reference plan used by the classroom version of the model.
    fn default() -> Self {
        Self {
            ireland_output: 70.0,
            england_output: 100.0,
            export: 20.0,
        }
    }
}

impl PlantAllocation {
    pub fn validate(&self) -> Result<(), FdiError> {
        require_non_negative("ireland_output", self.ireland_output)?;
        require_non_negative("england_output", self.england_output)?;
        require_non_negative("export", self.export)?;
        if self.export > self.ireland_output {
            return Err(FdiError::invalid(
                "export",
                "cannot export more than the Irish plant produces",
            ));
        }
        Ok(())
    }
}

pub(crate) fn require_finite(name: &str, value: f64) -> Result<(), FdiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FdiError::invalid(name, format!("non-finite value {value}")))
    }
}

fn require_positive(name: &str, value: f64, reason: &str) -> Result<(), FdiError> {
    require_finite(name, value)?;
    if value <= 0.0 {
        return Err(FdiError::invalid(name, reason));
    }
    Ok(())
}

fn require_non_negative(name: &str, value: f64) -> Result<(), FdiError> {
    require_finite(name, value)?;
    if value < 0.0 {
        return Err(FdiError::invalid(name, "must be non-negative"));
    }
    Ok(())
}
