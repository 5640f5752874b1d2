//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info, warn};

use crate::adapters::csv_curve_adapter::CsvCurveAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart_adapter::SvgChartAdapter;
use crate::domain::config_validation::{
    read_number, validate_horizontal_config, validate_sweep_config, validate_vertical_config,
    HORIZONTAL, SWEEP, TWO_PLANT, VERTICAL,
};
use crate::domain::error::FdiError;
use crate::domain::horizontal::{export_only, two_plant};
use crate::domain::outcome::{format_outcomes, Equilibrium};
use crate::domain::params::{HorizontalParams, PlantAllocation, VerticalParams};
use crate::domain::sweep::{default_sweep_ceiling, profit_curve, DEFAULT_SAMPLES};
use crate::domain::vertical::{
    buy_at_cost_equilibrium, integrated_equilibrium, separated_equilibrium,
    transfer_pricing_equilibrium,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fdi", about = "Vertical and horizontal FDI equilibrium calculator")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalScenario {
    Separated,
    Integrated,
    Transfer,
    AtCost,
    All,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalScenario {
    Export,
    TwoPlant,
    All,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Solve the vertical (upstream/downstream) model
    Vertical {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "all")]
        scenario: VerticalScenario,
        /// Upstream profit the transfer price must deliver
        #[arg(long, allow_negative_numbers = true)]
        target_profit: Option<f64>,
    },
    /// Solve the horizontal (Ireland/England) model
    Horizontal {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, value_enum, default_value = "all")]
        scenario: HorizontalScenario,
        /// Evaluate a fixed two-plant plan instead of solving it, as Y,Z,X
        #[arg(long)]
        allocation: Option<String>,
    },
    /// Sample profit against the input price of the separated model
    Sweep {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write to a .csv or .svg file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        samples: Option<usize>,
        #[arg(long)]
        max_price: Option<f64>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Vertical {
            config,
            scenario,
            target_profit,
        } => run_vertical(config.as_deref(), scenario, target_profit),
        Command::Horizontal {
            config,
            scenario,
            allocation,
        } => run_horizontal(config.as_deref(), scenario, allocation.as_deref()),
        Command::Sweep {
            config,
            output,
            samples,
            max_price,
        } => run_sweep(config.as_deref(), output.as_deref(), samples, max_price),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, FdiError> {
    let Some(path) = path else {
        debug!("no config file given, using defaults");
        return Ok(FileConfigAdapter::empty());
    };
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|e| FdiError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn number_or(config: &dyn ConfigPort, section: &str, key: &str, default: f64) -> Result<f64, FdiError> {
    Ok(read_number(config, section, key)?.unwrap_or(default))
}

pub fn build_vertical_params(config: &dyn ConfigPort) -> Result<VerticalParams, FdiError> {
    validate_vertical_config(config)?;
    let d = VerticalParams::default();
    Ok(VerticalParams {
        a: number_or(config, VERTICAL, "a", d.a)?,
        b: number_or(config, VERTICAL, "b", d.b)?,
        cu: number_or(config, VERTICAL, "cu", d.cu)?,
        cd: number_or(config, VERTICAL, "cd", d.cd)?,
        k: number_or(config, VERTICAL, "k", d.k)?,
        fixed_cost: number_or(config, VERTICAL, "fixed_cost", d.fixed_cost)?,
    })
}

pub fn build_horizontal_params(config: &dyn ConfigPort) -> Result<HorizontalParams, FdiError> {
    validate_horizontal_config(config)?;
    let d = HorizontalParams::default();
    Ok(HorizontalParams {
        a_ire: number_or(config, HORIZONTAL, "a_ire", d.a_ire)?,
        a_eng: number_or(config, HORIZONTAL, "a_eng", d.a_eng)?,
        b_ire: number_or(config, HORIZONTAL, "b_ire", d.b_ire)?,
        b_eng: number_or(config, HORIZONTAL, "b_eng", d.b_eng)?,
        fixed_cost: number_or(config, HORIZONTAL, "fixed_cost", d.fixed_cost)?,
        transport_cost: number_or(config, HORIZONTAL, "transport_cost", d.transport_cost)?,
    })
}

/// The `[two_plant]` plan, if the section is present. Assumes the config was validated.
pub fn build_plant_allocation(
    config: &dyn ConfigPort,
) -> Result<Option<PlantAllocation>, FdiError> {
    let (Some(y), Some(z), Some(x)) = (
        read_number(config, TWO_PLANT, "ireland_output")?,
        read_number(config, TWO_PLANT, "england_output")?,
        read_number(config, TWO_PLANT, "export")?,
    ) else {
        return Ok(None);
    };
    Ok(Some(PlantAllocation {
        ireland_output: y,
        england_output: z,
        export: x,
    }))
}

/// Parse a `Y,Z,X` plan given on the command line.
pub fn parse_allocation(raw: &str) -> Result<PlantAllocation, FdiError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [y, z, x] = parts.as_slice() else {
        return Err(FdiError::invalid("allocation", "expected three values Y,Z,X"));
    };
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| FdiError::invalid("allocation", format!("'{s}' is not a number")))
    };
    let plan = PlantAllocation {
        ireland_output: parse(y)?,
        england_output: parse(z)?,
        export: parse(x)?,
    };
    plan.validate()?;
    Ok(plan)
}

fn print_outcomes(eq: &dyn Equilibrium) {
    let mut out = std::io::stdout().lock();
    // A closed stdout (e.g. piped into `head`) is not an error worth reporting.
    let _ = writeln!(out, "{}", format_outcomes(eq));
}

fn run_vertical(
    config_path: Option<&Path>,
    scenario: VerticalScenario,
    target_override: Option<f64>,
) -> Result<(), FdiError> {
    let config = load_config(config_path)?;
    let params = build_vertical_params(&config)?;
    info!(?params, ?scenario, "solving vertical model");

    let wants = |s: VerticalScenario| scenario == s || scenario == VerticalScenario::All;

    let separated = separated_equilibrium(&params)?;
    if !separated.quantity.is_active() {
        warn!(a = params.a, cd = params.cd, "vertical market inactive: nothing is traded");
    }
    if wants(VerticalScenario::Separated) {
        print_outcomes(&separated);
    }
    if wants(VerticalScenario::Integrated) {
        print_outcomes(&integrated_equilibrium(&params)?);
    }
    if wants(VerticalScenario::Transfer) {
        // Without an explicit target, upstream keeps what it earned as a standalone firm.
        let target = match target_override {
            Some(t) => t,
            None => number_or(
                &config,
                VERTICAL,
                "target_profit",
                separated.upstream_profit.value(),
            )?,
        };
        info!(target, "transfer pricing target");
        print_outcomes(&transfer_pricing_equilibrium(&params, target)?);
    }
    if wants(VerticalScenario::AtCost) {
        print_outcomes(&buy_at_cost_equilibrium(&params)?);
    }
    Ok(())
}

fn run_horizontal(
    config_path: Option<&Path>,
    scenario: HorizontalScenario,
    allocation_override: Option<&str>,
) -> Result<(), FdiError> {
    let config = load_config(config_path)?;
    let params = build_horizontal_params(&config)?;
    let allocation = match allocation_override {
        Some(raw) => Some(parse_allocation(raw)?),
        None => build_plant_allocation(&config)?,
    };
    info!(?params, ?allocation, ?scenario, "solving horizontal model");

    let wants = |s: HorizontalScenario| scenario == s || scenario == HorizontalScenario::All;

    if wants(HorizontalScenario::Export) {
        let eq = export_only(&params)?;
        if !eq.quantity_ireland.is_active() || !eq.quantity_england.is_active() {
            warn!(
                q_ireland = eq.quantity_ireland.value(),
                q_england = eq.quantity_england.value(),
                "export-only: at least one market unserved"
            );
        }
        print_outcomes(&eq);
    }
    if wants(HorizontalScenario::TwoPlant) {
        print_outcomes(&two_plant(&params, allocation)?);
    }
    Ok(())
}

/// Sweep settings resolved from config and command-line overrides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    pub samples: usize,
    pub max_input_price: f64,
}

pub fn build_sweep_settings(
    config: &dyn ConfigPort,
    params: &VerticalParams,
    samples_override: Option<usize>,
    max_price_override: Option<f64>,
) -> Result<SweepSettings, FdiError> {
    validate_sweep_config(config)?;
    let samples = match samples_override {
        Some(n) => n,
        None => config.get_int(SWEEP, "samples", DEFAULT_SAMPLES as i64) as usize,
    };
    let max_input_price = match max_price_override.or(read_number(config, SWEEP, "max_input_price")?) {
        Some(p) => p,
        None => default_sweep_ceiling(params)?,
    };
    Ok(SweepSettings {
        samples,
        max_input_price,
    })
}

fn run_sweep(
    config_path: Option<&Path>,
    output: Option<&Path>,
    samples: Option<usize>,
    max_price: Option<f64>,
) -> Result<(), FdiError> {
    let config = load_config(config_path)?;
    let params = build_vertical_params(&config)?;
    let settings = build_sweep_settings(&config, &params, samples, max_price)?;
    info!(?settings, "sampling profit curve");

    let curve = profit_curve(&params, settings.max_input_price, settings.samples)?;
    let equilibrium_price = separated_equilibrium(&params)?.input_price.value();

    match output {
        Some(path) => {
            let writer: Box<dyn ReportPort> = if is_svg(path) {
                Box::new(SvgChartAdapter::new())
            } else {
                Box::new(CsvCurveAdapter::new())
            };
            writer.write_curve(&curve, Some(equilibrium_price), path)?;
            eprintln!("Curve written to: {}", path.display());
        }
        None => {
            let mut out = std::io::stdout().lock();
            let _ = write!(out, "{}", CsvCurveAdapter::render(&curve)?);
        }
    }
    Ok(())
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

fn run_validate(config_path: &Path) -> Result<(), FdiError> {
    eprintln!("Validating config: {}", config_path.display());
    let config = load_config(Some(config_path))?;
    validate_vertical_config(&config)?;
    validate_horizontal_config(&config)?;
    validate_sweep_config(&config)?;
    eprintln!("Configuration is valid.");
    Ok(())
}
