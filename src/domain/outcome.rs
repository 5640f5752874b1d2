//! Flat, ordered view over an equilibrium result.

/// A computed equilibrium that can be listed as named numeric outcomes.
///
/// Entries come back in a fixed order: input price first (if any), then
/// quantities, prices, and profits, with totals last.
pub trait Equilibrium {
    /// Short scenario label used in console output and logs.
    fn scenario(&self) -> &'static str;

    fn outcomes(&self) -> Vec<(&'static str, f64)>;

    /// Look up a single outcome by name.
    fn outcome(&self, name: &str) -> Option<f64> {
        self.outcomes()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}

/// Render outcomes as aligned `name: value` lines.
pub fn format_outcomes(eq: &dyn Equilibrium) -> String {
    let entries = eq.outcomes();
    let width = entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    let mut out = format!("=== {} ===\n", eq.scenario());
    for (name, value) in entries {
        out.push_str(&format!("{:<width$}  {:>12.2}\n", format!("{name}:"), value, width = width + 1));
    }
    out
}
