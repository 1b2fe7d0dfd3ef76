//! Host configuration for the filter engine.
//!
//! Loaded once at startup and passed to [`Params::permit_with`]; nothing here
//! is process-global. Sources, later wins: defaults, YAML file, environment.
//!
//! ```yaml
//! strong_parameters:
//!   strict: true
//!   forbidden_status: 422
//! ```
//!
//! [`Params::permit_with`]: crate::params::Params::permit_with

use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ParamsError, ParamsResult};

pub const ENV_STRICT: &str = "PARAMGUARD_STRICT";
pub const ENV_FORBIDDEN_STATUS: &str = "PARAMGUARD_FORBIDDEN_STATUS";

/// Wrapper key accepted at the top of a config file.
const SECTION: &str = "strong_parameters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamsConfig {
    /// Validate every `permit` call as if the tree had been marked strict.
    #[serde(alias = "strict")]
    pub strict_by_default: bool,
    /// Status used when rendering a forbidden-keys rejection (400 or 422 in practice).
    pub forbidden_status: u16,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            strict_by_default: false,
            forbidden_status: 400,
        }
    }
}

impl ParamsConfig {
    pub fn strict() -> Self {
        Self {
            strict_by_default: true,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> ParamsResult<Self> {
        let doc: serde_yaml::Value = serde_yaml::from_str(text)?;
        if doc.is_null() {
            return Ok(Self::default());
        }
        if !doc.is_mapping() {
            return Err(ParamsError::config("config root must be a mapping"));
        }
        let section = doc.get(SECTION).cloned().unwrap_or(doc);
        let cfg: Self = match section {
            serde_yaml::Value::Null => Self::default(),
            other => serde_yaml::from_value(other)?,
        };
        cfg.validate()
    }

    pub fn from_yaml_file(path: &Path) -> ParamsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParamsError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overlaid with the environment.
    pub fn from_env() -> ParamsResult<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(mut self) -> ParamsResult<Self> {
        if let Ok(v) = env::var(ENV_STRICT) {
            self.strict_by_default = parse_bool(&v).ok_or_else(|| {
                ParamsError::config(format!("{ENV_STRICT}: expected a boolean, got '{v}'"))
            })?;
        }

        if let Ok(v) = env::var(ENV_FORBIDDEN_STATUS) {
            self.forbidden_status = v.trim().parse().map_err(|_| {
                ParamsError::config(format!("{ENV_FORBIDDEN_STATUS}: expected a status code, got '{v}'"))
            })?;
        }

        self.validate()
    }

    fn validate(self) -> ParamsResult<Self> {
        if !(400..500).contains(&self.forbidden_status) {
            return Err(ParamsError::config(format!(
                "forbidden_status must be a 4xx code, got {}",
                self.forbidden_status
            )));
        }
        Ok(self)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
