//! Decision engine configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use verdict_contracts::{
    decision::Decision,
    error::{VerdictError, VerdictResult},
};

/// Settings for a [`PdpEngine`](crate::engine::PdpEngine).
///
/// ```toml
/// default_decision = "deny"
/// parallel_evaluation = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdpConfig {
    /// Decision returned when no root policy applies.
    #[serde(default = "default_decision")]
    pub default_decision: Decision,
    /// Evaluate individual decision requests on scoped worker threads.
    #[serde(default)]
    pub parallel_evaluation: bool,
}

fn default_decision() -> Decision {
    Decision::Indeterminate
}

impl Default for PdpConfig {
    fn default() -> Self {
        Self { default_decision: default_decision(), parallel_evaluation: false }
    }
}

impl PdpConfig {
    /// Returns `VerdictError::ConfigError` if `s` is not valid TOML for this
    /// schema.
    pub fn from_toml_str(s: &str) -> VerdictResult<Self> {
        toml::from_str(s).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to parse PDP config TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> VerdictResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to read PDP config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = PdpConfig::from_toml_str("").unwrap();
        assert_eq!(config, PdpConfig::default());
        assert_eq!(config.default_decision, Decision::Indeterminate);
        assert!(!config.parallel_evaluation);
    }

    #[test]
    fn kebab_case_decisions() {
        let config = PdpConfig::from_toml_str(
            r#"
            default_decision = "not-applicable"
            parallel_evaluation = true
            "#,
        )
        .unwrap();
        assert_eq!(config.default_decision, Decision::NotApplicable);
        assert!(config.parallel_evaluation);
    }

    #[test]
    fn unknown_decision_is_config_error() {
        match PdpConfig::from_toml_str(r#"default_decision = "maybe""#) {
            Err(VerdictError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse PDP config TOML"));
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = PdpConfig::from_file(Path::new("/nonexistent/pdp.toml")).unwrap_err();
        assert!(matches!(err, VerdictError::ConfigError { .. }));
    }
}
