//! Concrete adapter implementations for ports.

pub mod csv_curve_adapter;
pub mod file_config_adapter;
pub mod svg_chart_adapter;
