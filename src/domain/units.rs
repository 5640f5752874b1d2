//! Semantic wrappers for the three kinds of number an equilibrium reports.
//!
//! All three are transparent over `f64` for serialization, so a CSV or JSON
//! consumer sees plain numbers while Rust callers cannot pass a price where a
//! quantity is expected.

use serde::Serialize;
use std::fmt;

macro_rules! unit_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub f64);

        impl $name {
            pub const ZERO: $name = $name(0.0);

            pub fn value(self) -> f64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match f.precision() {
                    Some(p) => write!(f, "{:.*}", p, self.0),
                    None => write!(f, "{}", self.0),
                }
            }
        }

        impl From<$name> for f64 {
            fn from(v: $name) -> f64 {
                v.0
            }
        }
    };
}

unit_type!(
    /// Price per unit of a good (final good or intermediate input).
    Price
);
unit_type!(
    /// Units produced, shipped, or sold.
    Quantity
);
unit_type!(
    /// Money earned over a scenario; may be negative.
    Profit
);

impl Quantity {
    /// Clamp a raw best-response quantity at the market-inactive boundary.
    pub fn clamped(raw: f64) -> Self {
        Quantity(raw.max(0.0))
    }

    pub fn is_active(self) -> bool {
        self.0 > 0.0
    }
}

impl Price {
    /// Price read off a linear inverse demand curve `a - b*Q`.
    ///
    /// An inactive market (zero quantity) reports a zero price.
    pub fn on_demand_curve(intercept: f64, slope: f64, quantity: Quantity) -> Self {
        if quantity.is_active() {
            Price((intercept - slope * quantity.0).max(0.0))
        } else {
            Price::ZERO
        }
    }
}

impl std::ops::Add for Profit {
    type Output = Profit;

    fn add(self, rhs: Profit) -> Profit {
        Profit(self.0 + rhs.0)
    }
}

impl std::ops::Sub<f64> for Profit {
    type Output = Profit;

    fn sub(self, rhs: f64) -> Profit {
        Profit(self.0 - rhs)
    }
}
