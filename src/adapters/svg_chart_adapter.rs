//! SVG profit-curve chart implementing ReportPort.
//!
//! Draws upstream and downstream profit against the input price, with a
//! dashed marker at the equilibrium input price.

use std::fs;
use std::path::Path;

use crate::domain::error::FdiError;
use crate::domain::sweep::ProfitPoint;
use crate::ports::report_port::ReportPort;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 300.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

const UPSTREAM_COLOR: &str = "#2563eb";
const DOWNSTREAM_COLOR: &str = "#dc2626";

pub fn generate_profit_svg(curve: &[ProfitPoint], equilibrium_price: Option<f64>) -> String {
    if curve.len() < 2 {
        return String::new();
    }

    let min_x = curve[0].input_price.value();
    let max_x = curve[curve.len() - 1].input_price.value();
    let x_range = (max_x - min_x).max(f64::EPSILON);
    let max_profit = curve
        .iter()
        .flat_map(|p| [p.upstream_profit.value(), p.downstream_profit.value()])
        .fold(0.0, f64::max)
        .max(1.0);

    let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

    let x_scale = |x: f64| -> f64 { MARGIN_LEFT + ((x - min_x) / x_range) * plot_width };
    let y_scale = |v: f64| -> f64 { MARGIN_TOP + plot_height - (v / max_profit) * plot_height };

    let path_for = |select: fn(&ProfitPoint) -> f64| -> String {
        let mut d = String::new();
        for (i, point) in curve.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            d.push_str(&format!(
                "{} {:.1} {:.1}",
                cmd,
                x_scale(point.input_price.value()),
                y_scale(select(point))
            ));
        }
        d
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"15\" text-anchor=\"middle\" font-size=\"12\" fill=\"#333\">Profit vs Input Price</text>\n",
        CHART_WIDTH / 2.0
    ));

    // Axes
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.0}</text>\n",
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 5.0,
        max_profit
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">0</text>\n",
        MARGIN_LEFT - 5.0,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{:.1}</text>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
        min_x
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{:.1}</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
        max_x
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#666\">Input Price</text>\n",
        MARGIN_LEFT + plot_width / 2.0,
        CHART_HEIGHT - 5.0
    ));

    if let Some(pb) = equilibrium_price.filter(|pb| (min_x..=max_x).contains(pb)) {
        let x = x_scale(pb);
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{}\" x2=\"{:.1}\" y2=\"{}\" stroke=\"gray\" stroke-dasharray=\"4 4\"/>\n",
            x,
            MARGIN_TOP,
            x,
            CHART_HEIGHT - MARGIN_BOTTOM
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"start\" font-size=\"10\" fill=\"gray\">Equilibrium Pb = {:.2}</text>\n",
            x + 4.0,
            MARGIN_TOP + 10.0,
            pb
        ));
    }

    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        path_for(|p| p.upstream_profit.value()),
        UPSTREAM_COLOR
    ));
    svg.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        path_for(|p| p.downstream_profit.value()),
        DOWNSTREAM_COLOR
    ));

    // Legend
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"{}\">Upstream Profit</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        MARGIN_TOP + 10.0,
        UPSTREAM_COLOR
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"10\" fill=\"{}\">Downstream Profit</text>\n",
        CHART_WIDTH - MARGIN_RIGHT,
        MARGIN_TOP + 24.0,
        DOWNSTREAM_COLOR
    ));
    svg.push_str("</svg>");
    svg
}

pub struct SvgChartAdapter;

impl SvgChartAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SvgChartAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for SvgChartAdapter {
    fn write_curve(
        &self,
        curve: &[ProfitPoint],
        equilibrium_price: Option<f64>,
        output_path: &Path,
    ) -> Result<(), FdiError> {
        let svg = generate_profit_svg(curve, equilibrium_price);
        if svg.is_empty() {
            return Err(FdiError::Report {
                reason: "need at least 2 curve points to draw a chart".to_string(),
            });
        }
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, svg)?;
        Ok(())
    }
}
