//! Horizontal FDI: one firm selling into Ireland and England.
//!
//! Each country has linear demand `P = a - b*Q`. A plant producing `Y` units
//! costs `Y^2`, each active plant carries a fixed cost `F`, and shipping from
//! Ireland to England costs `t` per unit.
//!
//! Both scenarios solve their first-order conditions as a linear system. The
//! quantities are kept non-negative by searching the boundary faces of the
//! feasible region (see [`ConcaveQuadratic`]).

use serde::Serialize;
use tracing::debug;

use crate::domain::error::FdiError;
use crate::domain::linalg::{residuals, ConcaveQuadratic};
use crate::domain::outcome::Equilibrium;
use crate::domain::params::{HorizontalParams, PlantAllocation};
use crate::domain::units::{Price, Profit, Quantity};

/// Single Irish plant serving Ireland and exporting to England.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportOnlyEquilibrium {
    pub quantity_ireland: Quantity,
    pub quantity_england: Quantity,
    pub price_ireland: Price,
    pub price_england: Price,
    pub revenue: Profit,
    pub cost: Profit,
    pub profit: Profit,
}

/// FOC coefficients for `(Q_ie, Q_en)`: `[[2b_ire+2, 2], [2, 2b_eng+2]]`.
fn export_only_system(p: &HorizontalParams) -> (Vec<Vec<f64>>, Vec<f64>) {
    let matrix = vec![
        vec![2.0 * p.b_ire + 2.0, 2.0],
        vec![2.0, 2.0 * p.b_eng + 2.0],
    ];
    let rhs = vec![p.a_ire, p.a_eng - p.transport_cost];
    (matrix, rhs)
}

/// Export-only equilibrium.
pub fn export_only(p: &HorizontalParams) -> Result<ExportOnlyEquilibrium, FdiError> {
    p.validate()?;

    let (hessian, gradient) = export_only_system(p);
    let qp = ConcaveQuadratic {
        gradient,
        hessian,
        constraints: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
    };
    let (mut x, binding) = qp.maximize()?;
    for &c in &binding {
        x[c] = 0.0;
    }
    if !binding.is_empty() {
        debug!(?binding, "export-only: at least one market unserved");
    }

    let quantity_ireland = Quantity::clamped(x[0]);
    let quantity_england = Quantity::clamped(x[1]);
    let price_ireland = Price::on_demand_curve(p.a_ire, p.b_ire, quantity_ireland);
    let price_england = Price::on_demand_curve(p.a_eng, p.b_eng, quantity_england);

    let revenue = price_ireland.value() * quantity_ireland.value()
        + price_england.value() * quantity_england.value();
    let output = quantity_ireland.value() + quantity_england.value();
    let cost = output * output + p.transport_cost * quantity_england.value() + p.fixed_cost;

    let eq = ExportOnlyEquilibrium {
        quantity_ireland,
        quantity_england,
        price_ireland,
        price_england,
        revenue: Profit(revenue),
        cost: Profit(cost),
        profit: Profit(revenue - cost),
    };
    debug!(?eq, "export-only equilibrium");
    Ok(eq)
}

impl ExportOnlyEquilibrium {
    /// Residuals of both first-order conditions at this outcome.
    ///
    /// Zero (up to rounding) whenever both markets are served.
    pub fn foc_residuals(&self, p: &HorizontalParams) -> [f64; 2] {
        let (matrix, rhs) = export_only_system(p);
        let x = [self.quantity_ireland.value(), self.quantity_england.value()];
        let r = residuals(&matrix, &x, &rhs);
        [r[0], r[1]]
    }
}

impl Equilibrium for ExportOnlyEquilibrium {
    fn scenario(&self) -> &'static str {
        "export only"
    }

    fn outcomes(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Q_ie", self.quantity_ireland.value()),
            ("Q_en", self.quantity_england.value()),
            ("P_ie", self.price_ireland.value()),
            ("P_en", self.price_england.value()),
            ("TR", self.revenue.value()),
            ("TC", self.cost.value()),
            ("profit", self.profit.value()),
        ]
    }
}

/// Plants in both countries, with optional exports from Ireland to England.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TwoPlantEquilibrium {
    pub ireland_output: Quantity,
    pub england_output: Quantity,
    pub export: Quantity,
    pub quantity_ireland: Quantity,
    pub quantity_england: Quantity,
    pub price_ireland: Price,
    pub price_england: Price,
    pub revenue: Profit,
    pub cost: Profit,
    pub profit: Profit,
}

/// Joint profit in `(Y, Z, X)` as a concave quadratic.
///
/// With `q_ire = Y - X` and `q_eng = Z + X`, the FOCs are
/// `(2b_ire+2)Y - 2b_ire X = a_ire`,
/// `(2b_eng+2)Z + 2b_eng X = a_eng`,
/// `-2b_ire Y + 2b_eng Z + 2(b_ire+b_eng)X = a_eng - a_ire - t`.
fn two_plant_program(p: &HorizontalParams) -> ConcaveQuadratic {
    let (bi, be) = (p.b_ire, p.b_eng);
    ConcaveQuadratic {
        gradient: vec![p.a_ire, p.a_eng, p.a_eng - p.a_ire - p.transport_cost],
        hessian: vec![
            vec![2.0 * bi + 2.0, 0.0, -2.0 * bi],
            vec![0.0, 2.0 * be + 2.0, 2.0 * be],
            vec![-2.0 * bi, 2.0 * be, 2.0 * (bi + be)],
        ],
        // X >= 0, Y - X >= 0, Z >= 0
        constraints: vec![
            vec![0.0, 0.0, 1.0],
            vec![1.0, 0.0, -1.0],
            vec![0.0, 1.0, 0.0],
        ],
    }
}

/// Profit-maximizing production plan for the two-plant structure.
pub fn solve_plant_allocation(p: &HorizontalParams) -> Result<PlantAllocation, FdiError> {
    p.validate()?;
    let (x, binding) = two_plant_program(p).maximize()?;
    let ireland_output = x[0].max(0.0);
    let mut plan = PlantAllocation {
        ireland_output,
        england_output: x[1].max(0.0),
        export: x[2].clamp(0.0, ireland_output),
    };
    for &c in &binding {
        match c {
            0 => plan.export = 0.0,
            1 => plan.export = plan.ireland_output,
            _ => plan.england_output = 0.0,
        }
    }
    if !binding.is_empty() {
        debug!(?binding, ?plan, "two-plant plan on a boundary face");
    }
    Ok(plan)
}

/// Two-plant equilibrium.
///
/// With `allocation = None` the plan is solved from the first-order
/// conditions; otherwise the given plan is evaluated as-is.
pub fn two_plant(
    p: &HorizontalParams,
    allocation: Option<PlantAllocation>,
) -> Result<TwoPlantEquilibrium, FdiError> {
    p.validate()?;
    let plan = match allocation {
        Some(plan) => {
            plan.validate()?;
            plan
        }
        None => solve_plant_allocation(p)?,
    };

    let quantity_ireland = Quantity::clamped(plan.ireland_output - plan.export);
    let quantity_england = Quantity::clamped(plan.england_output + plan.export);
    let price_ireland = Price::on_demand_curve(p.a_ire, p.b_ire, quantity_ireland);
    let price_england = Price::on_demand_curve(p.a_eng, p.b_eng, quantity_england);

    let revenue = price_ireland.value() * quantity_ireland.value()
        + price_england.value() * quantity_england.value();
    let cost = plan.ireland_output.powi(2)
        + plan.england_output.powi(2)
        + p.transport_cost * plan.export
        + 2.0 * p.fixed_cost;

    let eq = TwoPlantEquilibrium {
        ireland_output: Quantity(plan.ireland_output),
        england_output: Quantity(plan.england_output),
        export: Quantity(plan.export),
        quantity_ireland,
        quantity_england,
        price_ireland,
        price_england,
        revenue: Profit(revenue),
        cost: Profit(cost),
        profit: Profit(revenue - cost),
    };
    debug!(?eq, solved = allocation.is_none(), "two-plant equilibrium");
    Ok(eq)
}

impl TwoPlantEquilibrium {
    /// Residuals of the three first-order conditions at this plan.
    pub fn foc_residuals(&self, p: &HorizontalParams) -> [f64; 3] {
        let program = two_plant_program(p);
        let x = [
            self.ireland_output.value(),
            self.england_output.value(),
            self.export.value(),
        ];
        let r = residuals(&program.hessian, &x, &program.gradient);
        [r[0], r[1], r[2]]
    }
}

impl Equilibrium for TwoPlantEquilibrium {
    fn scenario(&self) -> &'static str {
        "two plant"
    }

    fn outcomes(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("Y_ireland", self.ireland_output.value()),
            ("Z_england", self.england_output.value()),
            ("X_export", self.export.value()),
            ("Q_ireland", self.quantity_ireland.value()),
            ("Q_england", self.quantity_england.value()),
            ("P_ireland", self.price_ireland.value()),
            ("P_england", self.price_england.value()),
            ("TR", self.revenue.value()),
            ("TC", self.cost.value()),
            ("profit", self.profit.value()),
        ]
    }
}
