//! Enforcement-point configuration, loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use verdict_contracts::error::{VerdictError, VerdictResult};

/// What `allowed()` answers for a decision that is neither Permit nor Deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseBehavior {
    /// Treat the decision as a permit.
    Allow,
    /// Treat the decision as a deny.
    Deny,
    /// Surface `VerdictError::DecisionRejected`.
    Error,
}

/// ```toml
/// indeterminate_behavior = "error"
/// not_applicable_behavior = "deny"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PepConfig {
    #[serde(default = "default_behavior")]
    pub indeterminate_behavior: ResponseBehavior,
    #[serde(default = "default_behavior")]
    pub not_applicable_behavior: ResponseBehavior,
}

fn default_behavior() -> ResponseBehavior {
    ResponseBehavior::Deny
}

impl Default for PepConfig {
    fn default() -> Self {
        Self {
            indeterminate_behavior: default_behavior(),
            not_applicable_behavior: default_behavior(),
        }
    }
}

impl PepConfig {
    pub fn from_toml_str(s: &str) -> VerdictResult<Self> {
        toml::from_str(s).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to parse PEP config TOML: {}", e),
        })
    }

    pub fn from_file(path: &Path) -> VerdictResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VerdictError::ConfigError {
            reason: format!("failed to read PEP config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
