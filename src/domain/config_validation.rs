//! Configuration validation.
//!
//! Checks every configured market parameter before any equilibrium is
//! computed, so a bad INI value is reported with its section and key rather
//! than as a parameter error deep inside a model.

use crate::domain::error::FdiError;
use crate::ports::config_port::ConfigPort;

pub const VERTICAL: &str = "vertical";
pub const HORIZONTAL: &str = "horizontal";
pub const TWO_PLANT: &str = "two_plant";
pub const SWEEP: &str = "sweep";

const TWO_PLANT_KEYS: [&str; 3] = ["ireland_output", "england_output", "export"];

pub fn validate_vertical_config(config: &dyn ConfigPort) -> Result<(), FdiError> {
    require_positive(config, VERTICAL, "b")?;
    require_positive(config, VERTICAL, "k")?;
    for key in ["a", "cu", "cd", "fixed_cost"] {
        require_non_negative(config, VERTICAL, key)?;
    }
    read_number(config, VERTICAL, "target_profit")?;
    Ok(())
}

pub fn validate_horizontal_config(config: &dyn ConfigPort) -> Result<(), FdiError> {
    require_positive(config, HORIZONTAL, "b_ire")?;
    require_positive(config, HORIZONTAL, "b_eng")?;
    for key in ["a_ire", "a_eng", "fixed_cost", "transport_cost"] {
        require_non_negative(config, HORIZONTAL, key)?;
    }
    validate_two_plant_config(config)
}

fn validate_two_plant_config(config: &dyn ConfigPort) -> Result<(), FdiError> {
    let present: Vec<&str> = TWO_PLANT_KEYS
        .iter()
        .copied()
        .filter(|k| config.get_string(TWO_PLANT, k).is_some())
        .collect();
    if present.is_empty() {
        return Ok(());
    }
    if let Some(missing) = TWO_PLANT_KEYS.iter().find(|k| !present.contains(k)) {
        return Err(FdiError::ConfigMissing {
            section: TWO_PLANT.to_string(),
            key: missing.to_string(),
        });
    }
    for key in TWO_PLANT_KEYS {
        require_non_negative(config, TWO_PLANT, key)?;
    }
    let output = config.get_double(TWO_PLANT, "ireland_output", 0.0);
    let export = config.get_double(TWO_PLANT, "export", 0.0);
    if export > output {
        return Err(FdiError::ConfigInvalid {
            section: TWO_PLANT.to_string(),
            key: "export".to_string(),
            reason: "export must not exceed ireland_output".to_string(),
        });
    }
    Ok(())
}

pub fn validate_sweep_config(config: &dyn ConfigPort) -> Result<(), FdiError> {
    if let Some(raw) = config.get_string(SWEEP, "samples") {
        match raw.trim().parse::<i64>() {
            Ok(n) if n >= 2 => {}
            _ => {
                return Err(FdiError::ConfigInvalid {
                    section: SWEEP.to_string(),
                    key: "samples".to_string(),
                    reason: "samples must be an integer of at least 2".to_string(),
                })
            }
        }
    }
    require_positive(config, SWEEP, "max_input_price")?;
    Ok(())
}

/// Parse an optional numeric key. A present but non-numeric value is an error.
pub fn read_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, FdiError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(FdiError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a finite number", raw.trim()),
        }),
    }
}

fn require_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FdiError> {
    match read_number(config, section, key)? {
        Some(v) if v <= 0.0 => Err(FdiError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be positive"),
        }),
        _ => Ok(()),
    }
}

fn require_non_negative(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), FdiError> {
    match read_number(config, section, key)? {
        Some(v) if v < 0.0 => Err(FdiError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_passes() {
        let config = make_config("");
        assert!(validate_vertical_config(&config).is_ok());
        assert!(validate_horizontal_config(&config).is_ok());
        assert!(validate_sweep_config(&config).is_ok());
    }

    #[test]
    fn valid_vertical_config_passes() {
        let config = make_config(
            r#"
[vertical]
a = 240
b = 2
cu = 6
cd = 4
k = 2
fixed_cost = 1000
target_profit = 1500
"#,
        );
        assert!(validate_vertical_config(&config).is_ok());
    }

    #[test]
    fn zero_slope_fails() {
        let config = make_config("[vertical]\nb = 0\n");
        let err = validate_vertical_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "b"));
    }

    #[test]
    fn negative_input_ratio_fails() {
        let config = make_config("[vertical]\nk = -2\n");
        let err = validate_vertical_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "k"));
    }

    #[test]
    fn negative_cost_fails() {
        let config = make_config("[vertical]\ncd = -4\n");
        let err = validate_vertical_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "cd"));
    }

    #[test]
    fn non_numeric_value_fails() {
        let config = make_config("[vertical]\na = lots\n");
        let err = validate_vertical_config(&config).unwrap_err();
        assert!(
            matches!(err, FdiError::ConfigInvalid { ref key, ref reason, .. } if key == "a" && reason.contains("lots"))
        );
    }

    #[test]
    fn negative_target_profit_allowed() {
        let config = make_config("[vertical]\ntarget_profit = -200\n");
        assert!(validate_vertical_config(&config).is_ok());
    }

    #[test]
    fn horizontal_slope_fails() {
        let config = make_config("[horizontal]\nb_eng = 0\n");
        let err = validate_horizontal_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "b_eng"));
    }

    #[test]
    fn negative_transport_cost_fails() {
        let config = make_config("[horizontal]\ntransport_cost = -1\n");
        let err = validate_horizontal_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "transport_cost"));
    }

    #[test]
    fn partial_two_plant_section_fails() {
        let config = make_config("[two_plant]\nireland_output = 70\nexport = 20\n");
        let err = validate_horizontal_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigMissing { key, .. } if key == "england_output"));
    }

    #[test]
    fn full_two_plant_section_passes() {
        let config =
            make_config("[two_plant]\nireland_output = 70\nengland_output = 100\nexport = 20\n");
        assert!(validate_horizontal_config(&config).is_ok());
    }

    #[test]
    fn export_above_output_fails() {
        let config =
            make_config("[two_plant]\nireland_output = 10\nengland_output = 100\nexport = 20\n");
        let err = validate_horizontal_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "export"));
    }

    #[test]
    fn sweep_samples_too_small_fails() {
        let config = make_config("[sweep]\nsamples = 1\n");
        let err = validate_sweep_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "samples"));
    }

    #[test]
    fn sweep_samples_non_integer_fails() {
        let config = make_config("[sweep]\nsamples = 2.5\n");
        assert!(validate_sweep_config(&config).is_err());
    }

    #[test]
    fn sweep_ceiling_zero_fails() {
        let config = make_config("[sweep]\nmax_input_price = 0\n");
        let err = validate_sweep_config(&config).unwrap_err();
        assert!(matches!(err, FdiError::ConfigInvalid { key, .. } if key == "max_input_price"));
    }
}
