//! Vertical FDI: an upstream input supplier and a downstream assembler.
//!
//! Demand for the final good is linear, `P = a - b*Q`, and each unit of final
//! good needs `k` units of input. The downstream firm's best response to an
//! input price `pb` is `Q(pb) = (a - cd - k*pb) / (2b)`; every scenario below
//! plugs a different `pb` (or none, under integration) into that response.
//!
//! A non-positive quantity marks an inactive market: quantity and price are
//! reported as zero and no variable profit is earned. Fixed costs are still
//! charged, so totals net of fixed cost may be negative.

use serde::Serialize;
use tracing::debug;

use crate::domain::error::FdiError;
use crate::domain::outcome::Equilibrium;
use crate::domain::params::{require_finite, VerticalParams};
use crate::domain::units::{Price, Profit, Quantity};

/// Relative slack allowed when a transfer-price target sits on the profit ceiling.
const TARGET_TOLERANCE: f64 = 1e-12;

/// Downstream profit-maximizing output for a given input price, before clamping.
pub fn downstream_best_response(p: &VerticalParams, input_price: f64) -> f64 {
    (p.a - p.cd - p.k * input_price) / (2.0 * p.b)
}

/// Derivative of upstream profit `(pb - cu)*k*Q(pb)` with respect to `pb`.
///
/// Zero at the separated-equilibrium input price.
pub fn upstream_marginal_profit(p: &VerticalParams, input_price: f64) -> f64 {
    p.k * (p.net_intercept() - 2.0 * p.k * input_price + p.k * p.cu) / (2.0 * p.b)
}

/// Largest upstream profit attainable through the input price, `(a - cd - k*cu)^2 / (8b)`.
pub fn max_upstream_profit(p: &VerticalParams) -> f64 {
    let margin = p.net_intercept() - p.k * p.cu;
    if margin <= 0.0 {
        0.0
    } else {
        margin * margin / (8.0 * p.b)
    }
}

/// Most negative upstream profit (largest subsidy) that keeps the final-good
/// price non-negative, `-(a + cd + k*cu) * a / b`.
///
/// Below it the transfer price is low enough that `P = (a + cd + k*pb) / 2`
/// would turn negative.
pub fn min_upstream_profit(p: &VerticalParams) -> f64 {
    -(p.a + p.cd + p.k * p.cu) * p.a / p.b
}

/// Market outcome when the downstream firm buys input at `input_price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputPricedOutcome {
    pub input_price: Price,
    pub quantity: Quantity,
    pub input_quantity: Quantity,
    pub price: Price,
    pub downstream_profit: Profit,
    pub upstream_profit: Profit,
}

/// Evaluate both firms' variable profits at a given input price.
pub fn evaluate_at_input_price(p: &VerticalParams, input_price: f64) -> InputPricedOutcome {
    let quantity = Quantity::clamped(downstream_best_response(p, input_price));
    let price = Price::on_demand_curve(p.a, p.b, quantity);

    let (downstream_profit, upstream_profit) = if quantity.is_active() {
        let q = quantity.value();
        (
            Profit((price.value() - p.effective_cost(input_price)) * q),
            Profit((input_price - p.cu) * p.k * q),
        )
    } else {
        (Profit::ZERO, Profit::ZERO)
    };

    InputPricedOutcome {
        input_price: Price(input_price),
        quantity,
        input_quantity: Quantity(p.k * quantity.value()),
        price,
        downstream_profit,
        upstream_profit,
    }
}

/// Independent upstream and downstream monopolists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeparatedEquilibrium {
    pub input_price: Price,
    pub quantity: Quantity,
    pub input_quantity: Quantity,
    pub price: Price,
    pub downstream_profit: Profit,
    pub upstream_profit: Profit,
    pub total_profit: Profit,
}

/// Separated-firm equilibrium.
///
/// The upstream firm sets `pb = (a - cd + k*cu) / (2k)`, the root of
/// [`upstream_marginal_profit`]. When demand cannot cover both stages' costs
/// (`a - cd <= k*cu`) nothing is traded and the input is quoted at `cu`.
pub fn separated_equilibrium(p: &VerticalParams) -> Result<SeparatedEquilibrium, FdiError> {
    p.validate()?;

    let input_price = if p.net_intercept() - p.k * p.cu > 0.0 {
        (p.net_intercept() + p.k * p.cu) / (2.0 * p.k)
    } else {
        p.cu
    };
    let at = evaluate_at_input_price(p, input_price);

    // Variable profits are non-negative by construction on an active market;
    // an inactive market already reports zero.
    let downstream_profit = Profit(at.downstream_profit.value().max(0.0));
    let upstream_profit = Profit(at.upstream_profit.value().max(0.0));

    if !at.quantity.is_active() {
        debug!(a = p.a, cd = p.cd, "separated market inactive");
    }

    let eq = SeparatedEquilibrium {
        input_price: at.input_price,
        quantity: at.quantity,
        input_quantity: at.input_quantity,
        price: at.price,
        downstream_profit,
        upstream_profit,
        total_profit: downstream_profit + upstream_profit,
    };
    debug!(?eq, "separated equilibrium");
    Ok(eq)
}

impl Equilibrium for SeparatedEquilibrium {
    fn scenario(&self) -> &'static str {
        "separated"
    }

    fn outcomes(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("pb", self.input_price.value()),
            ("Q", self.quantity.value()),
            ("q_input", self.input_quantity.value()),
            ("P", self.price.value()),
            ("pi_down", self.downstream_profit.value()),
            ("pi_up", self.upstream_profit.value()),
            ("pi_total", self.total_profit.value()),
        ]
    }
}

/// A single firm owning both stages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegratedEquilibrium {
    pub effective_cost: Price,
    pub quantity: Quantity,
    pub price: Price,
    /// Profit net of the fixed cost of integration; may be negative.
    pub profit: Profit,
}

/// Integrated-firm equilibrium: upstream cost is internalized at `k*cu`.
pub fn integrated_equilibrium(p: &VerticalParams) -> Result<IntegratedEquilibrium, FdiError> {
    p.validate()?;

    let effective_cost = p.effective_cost(p.cu);
    let quantity = Quantity::clamped((p.a - effective_cost) / (2.0 * p.b));
    let price = Price::on_demand_curve(p.a, p.b, quantity);
    let variable = if quantity.is_active() {
        (price.value() - effective_cost) * quantity.value()
    } else {
        0.0
    };

    let eq = IntegratedEquilibrium {
        effective_cost: Price(effective_cost),
        quantity,
        price,
        profit: Profit(variable - p.fixed_cost),
    };
    debug!(?eq, "integrated equilibrium");
    Ok(eq)
}

impl Equilibrium for IntegratedEquilibrium {
    fn scenario(&self) -> &'static str {
        "integrated"
    }

    fn outcomes(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("MC", self.effective_cost.value()),
            ("Q", self.quantity.value()),
            ("P", self.price.value()),
            ("pi", self.profit.value()),
        ]
    }
}

/// Integrated firm whose divisions trade at an internal input price.
///
/// Used for both transfer pricing and buying at cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivisionalEquilibrium {
    #[serde(skip)]
    pub scenario: &'static str,
    pub input_price: Price,
    pub quantity: Quantity,
    pub price: Price,
    pub downstream_profit: Profit,
    pub upstream_profit: Profit,
    /// Sum of divisional profits net of the fixed cost.
    pub total_profit: Profit,
}

impl DivisionalEquilibrium {
    fn from_input_price(scenario: &'static str, p: &VerticalParams, input_price: f64) -> Self {
        let at = evaluate_at_input_price(p, input_price);
        DivisionalEquilibrium {
            scenario,
            input_price: at.input_price,
            quantity: at.quantity,
            price: at.price,
            downstream_profit: at.downstream_profit,
            upstream_profit: at.upstream_profit,
            total_profit: at.downstream_profit + at.upstream_profit - p.fixed_cost,
        }
    }
}

impl Equilibrium for DivisionalEquilibrium {
    fn scenario(&self) -> &'static str {
        self.scenario
    }

    fn outcomes(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("pb", self.input_price.value()),
            ("Q", self.quantity.value()),
            ("P", self.price.value()),
            ("pi_down", self.downstream_profit.value()),
            ("pi_up", self.upstream_profit.value()),
            ("pi_total", self.total_profit.value()),
        ]
    }
}

/// Transfer price that leaves the upstream division exactly `target_upstream_profit`.
///
/// Substituting the downstream best response into `(pb - cu)*k*Q = T` gives
/// `k^2 pb^2 - k(A + k cu) pb + (k cu A + 2bT) = 0` with `A = a - cd`. The lower
/// root is taken: of the two prices delivering `T`, it leaves more output
/// downstream.
///
/// A market that is inactive at cost stays inactive: a non-positive target
/// is priced at `cu` and a positive one is unreachable. Subsidies larger than
/// [`min_upstream_profit`] are rejected.
pub fn transfer_price_for_target(
    p: &VerticalParams,
    target_upstream_profit: f64,
) -> Result<f64, FdiError> {
    require_finite("target_pi_up", target_upstream_profit)?;

    if target_upstream_profit == 0.0 {
        return Ok(p.cu);
    }

    let margin = p.net_intercept() - p.k * p.cu;
    let max = max_upstream_profit(p);
    if margin <= 0.0 {
        if target_upstream_profit > 0.0 {
            return Err(FdiError::TargetUnreachable {
                target: target_upstream_profit,
                max,
            });
        }
        return Ok(p.cu);
    }
    if target_upstream_profit > max * (1.0 + TARGET_TOLERANCE) {
        return Err(FdiError::TargetUnreachable {
            target: target_upstream_profit,
            max,
        });
    }
    let min = min_upstream_profit(p);
    if target_upstream_profit < min * (1.0 + TARGET_TOLERANCE) {
        return Err(FdiError::SubsidyTooLarge {
            target: target_upstream_profit,
            min,
        });
    }

    let discriminant = (margin * margin - 8.0 * p.b * target_upstream_profit).max(0.0);
    Ok((p.net_intercept() + p.k * p.cu - discriminant.sqrt()) / (2.0 * p.k))
}

/// Transfer-pricing equilibrium for a target upstream profit.
pub fn transfer_pricing_equilibrium(
    p: &VerticalParams,
    target_upstream_profit: f64,
) -> Result<DivisionalEquilibrium, FdiError> {
    p.validate()?;
    let input_price = transfer_price_for_target(p, target_upstream_profit)?;
    let eq = DivisionalEquilibrium::from_input_price("transfer pricing", p, input_price);
    debug!(target = target_upstream_profit, ?eq, "transfer pricing equilibrium");
    Ok(eq)
}

/// Downstream buys input at upstream marginal cost, so upstream earns nothing.
pub fn buy_at_cost_equilibrium(p: &VerticalParams) -> Result<DivisionalEquilibrium, FdiError> {
    p.validate()?;
    let eq = DivisionalEquilibrium::from_input_price("buy at cost", p, p.cu);
    debug!(?eq, "buy-at-cost equilibrium");
    Ok(eq)
}
