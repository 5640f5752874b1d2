//! CLI integration tests for the `fdi` command orchestration.
//!
//! Tests cover:
//! - Config parsing (build_vertical_params, build_horizontal_params, build_plant_allocation)
//! - Command-line plan parsing (parse_allocation)
//! - Sweep settings resolution with overrides
//! - Full subcommand runs with real INI files on disk
//! - Exit codes per error category

mod common;

use common::*;
use fdi_equilibria::adapters::file_config_adapter::FileConfigAdapter;
use fdi_equilibria::cli::{self, Cli};
use fdi_equilibria::domain::error::FdiError;
use clap::Parser;
use std::process::ExitCode;

const VALID_INI: &str = r#"
[vertical]
a = 240
b = 2
cu = 6
cd = 4
k = 2
fixed_cost = 1000
target_profit = 2000

[horizontal]
a_ire = 280
a_eng = 400
b_ire = 1
b_eng = 1
fixed_cost = 8000
transport_cost = 20

[two_plant]
ireland_output = 70
england_output = 100
export = 20

[sweep]
samples = 25
max_input_price = 120
"#;

fn config(content: &str) -> FileConfigAdapter {
    FileConfigAdapter::from_string(content).unwrap()
}

fn run_args(args: &[&str]) -> ExitCode {
    let mut argv = vec!["fdi"];
    argv.extend_from_slice(args);
    cli::run(Cli::try_parse_from(argv).unwrap())
}

mod config_loading {
    use super::*;

    #[test]
    fn vertical_params_from_ini() {
        let params = cli::build_vertical_params(&config(VALID_INI)).unwrap();
        assert_eq!(params, VerticalParams::default());
    }

    #[test]
    fn vertical_params_default_when_section_missing() {
        let params = cli::build_vertical_params(&FileConfigAdapter::empty()).unwrap();
        assert_eq!(params, VerticalParams::default());
    }

    #[test]
    fn vertical_params_partial_section_keeps_other_defaults() {
        let params = cli::build_vertical_params(&config("[vertical]\na = 300\nk = 3\n")).unwrap();
        assert_eq!(params.a, 300.0);
        assert_eq!(params.k, 3.0);
        assert_eq!(params.b, VerticalParams::default().b);
    }

    #[test]
    fn vertical_params_reject_zero_slope() {
        let err = cli::build_vertical_params(&config("[vertical]\nb = 0\n")).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { ref key, .. } if key == "b"));
    }

    #[test]
    fn horizontal_params_from_ini() {
        let params = cli::build_horizontal_params(&config(VALID_INI)).unwrap();
        assert_eq!(params, HorizontalParams::default());
    }

    #[test]
    fn plant_allocation_from_ini() {
        let plan = cli::build_plant_allocation(&config(VALID_INI)).unwrap();
        assert_eq!(plan, Some(PlantAllocation::default()));
    }

    #[test]
    fn plant_allocation_absent_without_section() {
        let plan = cli::build_plant_allocation(&config("[horizontal]\na_ire = 280\n")).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn load_config_missing_file_is_parse_error() {
        let err = cli::load_config(Some(std::path::Path::new("/nonexistent/fdi.ini")))
            .err()
            .unwrap();
        assert!(matches!(err, FdiError::ConfigParse { .. }));
    }
}

mod allocation_parsing {
    use super::*;

    #[test]
    fn parses_three_values() {
        let plan = cli::parse_allocation("70, 100, 20").unwrap();
        assert_eq!(plan, PlantAllocation::default());
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(cli::parse_allocation("70,100").is_err());
        assert!(cli::parse_allocation("1,2,3,4").is_err());
    }

    #[test]
    fn rejects_non_numeric() {
        let err = cli::parse_allocation("70,abc,20").unwrap_err();
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn rejects_export_above_output() {
        let err = cli::parse_allocation("10,100,20").unwrap_err();
        assert!(matches!(err, FdiError::InvalidParameter { .. }));
    }
}

mod sweep_settings {
    use super::*;

    #[test]
    fn from_ini() {
        let cfg = config(VALID_INI);
        let params = cli::build_vertical_params(&cfg).unwrap();
        let settings = cli::build_sweep_settings(&cfg, &params, None, None).unwrap();
        assert_eq!(settings.samples, 25);
        assert_eq!(settings.max_input_price, 120.0);
    }

    #[test]
    fn overrides_win() {
        let cfg = config(VALID_INI);
        let params = cli::build_vertical_params(&cfg).unwrap();
        let settings = cli::build_sweep_settings(&cfg, &params, Some(5), Some(80.0)).unwrap();
        assert_eq!(settings.samples, 5);
        assert_eq!(settings.max_input_price, 80.0);
    }

    #[test]
    fn defaults_to_twice_the_equilibrium_price() {
        let cfg = FileConfigAdapter::empty();
        let params = VerticalParams::default();
        let settings = cli::build_sweep_settings(&cfg, &params, None, None).unwrap();
        assert_eq!(settings.samples, 100);
        assert!((settings.max_input_price - 124.0).abs() < TOLERANCE);
    }
}

mod commands {
    use super::*;

    #[test]
    fn vertical_all_scenarios_succeed() {
        let ini = write_temp_ini(VALID_INI);
        let code = run_args(&["vertical", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn vertical_without_config_uses_defaults() {
        let code = run_args(&["vertical", "--scenario", "separated"]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn vertical_negative_target_accepted() {
        let code = run_args(&["vertical", "--scenario", "transfer", "--target-profit", "-500"]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn vertical_unreachable_target_exits_4() {
        let code = run_args(&["vertical", "--scenario", "transfer", "--target-profit", "5000"]);
        assert!(same_exit_code(code, ExitCode::from(4)));
    }

    #[test]
    fn vertical_bad_config_exits_2() {
        let ini = write_temp_ini("[vertical]\nb = -2\n");
        let code = run_args(&["vertical", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::from(2)));
    }

    #[test]
    fn horizontal_with_config_plan_succeeds() {
        let ini = write_temp_ini(VALID_INI);
        let code = run_args(&["horizontal", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn horizontal_bad_allocation_exits_3() {
        let code = run_args(&[
            "horizontal",
            "--scenario",
            "two-plant",
            "--allocation",
            "10,10,50",
        ]);
        assert!(same_exit_code(code, ExitCode::from(3)));
    }

    #[test]
    fn sweep_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("curve.csv");
        let code = run_args(&["sweep", "-o", out.to_str().unwrap(), "--samples", "11"]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));

        let content = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "input_price,upstream_profit,downstream_profit");
        assert_eq!(lines.len(), 12);
    }

    #[test]
    fn sweep_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts").join("curve.svg");
        let code = run_args(&["sweep", "-o", out.to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
        let svg = std::fs::read_to_string(&out).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Equilibrium Pb = 62.00"));
    }

    #[test]
    fn sweep_inactive_market_succeeds() {
        let ini = write_temp_ini("[vertical]\na = 0\ncd = 20\n");
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("curve.csv");
        let code = run_args(&[
            "sweep",
            "-c",
            ini.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(content.lines().count(), 101);
    }

    #[test]
    fn inactive_markets_still_report_outcomes() {
        let ini = write_temp_ini("[vertical]\na = 2\ncd = 4\n\n[horizontal]\ntransport_cost = 1000\n");
        let path = ini.path().to_str().unwrap();
        let code = run_args(&["-vv", "vertical", "-c", path, "--target-profit", "-100"]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
        let code = run_args(&["-vv", "horizontal", "-c", path, "--scenario", "export"]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn vertical_subsidy_beyond_floor_exits_4() {
        let code = run_args(&["vertical", "--scenario", "transfer", "--target-profit", "-40000"]);
        assert!(same_exit_code(code, ExitCode::from(4)));
    }

    #[test]
    fn sweep_single_sample_exits_3() {
        let code = run_args(&["sweep", "--samples", "1"]);
        assert!(same_exit_code(code, ExitCode::from(3)));
    }

    #[test]
    fn validate_accepts_good_config() {
        let ini = write_temp_ini(VALID_INI);
        let code = run_args(&["validate", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn validate_rejects_partial_two_plant() {
        let ini = write_temp_ini("[two_plant]\nireland_output = 70\n");
        let code = run_args(&["validate", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_rejects_bad_sweep() {
        let ini = write_temp_ini("[sweep]\nsamples = 1.5\n");
        let code = run_args(&["validate", "-c", ini.path().to_str().unwrap()]);
        assert!(same_exit_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_missing_file_exits_2() {
        let code = run_args(&["validate", "-c", "/nonexistent/fdi.ini"]);
        assert!(same_exit_code(code, ExitCode::from(2)));
    }
}
