//! Domain error types.

/// Top-level error type for fdi-equilibria.
#[derive(Debug, thiserror::Error)]
pub enum FdiError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("target upstream profit {target} is unreachable (maximum attainable is {max})")]
    TargetUnreachable { target: f64, max: f64 },

    #[error("target upstream profit {target} is below {min}, the largest subsidy that keeps the final-good price non-negative")]
    SubsidyTooLarge { target: f64, min: f64 },

    #[error("first-order condition system of size {size} has no unique solution")]
    SingularSystem { size: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FdiError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        FdiError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&FdiError> for std::process::ExitCode {
    fn from(err: &FdiError) -> Self {
        let code: u8 = match err {
            FdiError::Io(_) | FdiError::Report { .. } => 1,
            FdiError::ConfigParse { .. }
            | FdiError::ConfigMissing { .. }
            | FdiError::ConfigInvalid { .. } => 2,
            FdiError::InvalidParameter { .. } => 3,
            FdiError::TargetUnreachable { .. }
            | FdiError::SubsidyTooLarge { .. }
            | FdiError::SingularSystem { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_names_the_field() {
        let err = FdiError::invalid("b", "non-positive slope");
        assert_eq!(err.to_string(), "invalid parameter b: non-positive slope");
    }

    #[test]
    fn target_unreachable_display() {
        let err = FdiError::TargetUnreachable {
            target: 5000.0,
            max: 3136.0,
        };
        assert_eq!(
            err.to_string(),
            "target upstream profit 5000 is unreachable (maximum attainable is 3136)"
        );
    }

    #[test]
    fn subsidy_too_large_display() {
        let err = FdiError::SubsidyTooLarge {
            target: -40_000.0,
            min: -30_720.0,
        };
        assert_eq!(
            err.to_string(),
            "target upstream profit -40000 is below -30720, the largest subsidy that keeps the final-good price non-negative"
        );
    }

    #[test]
    fn config_missing_display() {
        let err = FdiError::ConfigMissing {
            section: "two_plant".into(),
            key: "export".into(),
        };
        assert_eq!(err.to_string(), "missing config key [two_plant] export");
    }
}
