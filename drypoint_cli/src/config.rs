//! CLI configuration.
//!
//! Read from the JSON file named by `DRYPOINT_CONFIG`; every field is
//! optional and falls back to the built-in defaults.
//!
//! ```json
//! {
//!   "default_drying_days": 5,
//!   "commercial": { "overheads_percent": 12, "profit_percent": 18,
//!                   "profit_applied_after": true, "contingency_percent": 10,
//!                   "escalation_percent": 0, "gst_percent": 10, "round_to": 5 },
//!   "pricing": { "tier_rates": { "lgr_dehumidifier": 65 } }
//! }
//! ```

use std::fs;
use std::path::Path;

use drypoint_core::costing::{CommercialParams, RateTable};
use drypoint_core::equipment::PricingConfig;
use drypoint_core::errors::{EstimateError, EstimateResult};
use drypoint_core::job::{JobSettings, DEFAULT_DRYING_DAYS};
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "DRYPOINT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub default_drying_days: f64,
    pub commercial: CommercialParams,
    pub rates: RateTable,
    pub pricing: Option<PricingConfig>,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            default_drying_days: DEFAULT_DRYING_DAYS,
            commercial: CommercialParams::default(),
            rates: RateTable::default(),
            pricing: None,
        }
    }
}

impl CliConfig {
    /// Load from `DRYPOINT_CONFIG`, or defaults when it is unset.
    pub fn from_env() -> EstimateResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(path.trim())),
            _ => {
                tracing::debug!("{} not set, using default configuration", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    pub fn load(path: &Path) -> EstimateResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EstimateError::file_error("read config", path.display().to_string(), e.to_string())
        })?;
        let config: CliConfig = serde_json::from_str(&raw).map_err(|e| {
            EstimateError::serialization(format!("Invalid config {}: {}", path.display(), e))
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> EstimateResult<()> {
        if !self.default_drying_days.is_finite() || self.default_drying_days < 0.0 {
            return Err(EstimateError::invalid_input(
                "default_drying_days",
                self.default_drying_days.to_string(),
                "Drying duration must be a non-negative number of days",
            ));
        }
        self.commercial.validate()
    }

    /// Settings for a new job under this configuration
    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            drying_days: self.default_drying_days,
            commercial: self.commercial,
            rates: self.rates.clone(),
            pricing: self.pricing.clone(),
            ..JobSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drypoint_core::costing::RoundTo;
    use drypoint_core::equipment::PricingTier;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: CliConfig = serde_json::from_str(r#"{ "default_drying_days": 6 }"#).unwrap();
        assert_eq!(config.default_drying_days, 6.0);
        assert_eq!(config.commercial, CommercialParams::default());
        assert_eq!(config.rates, RateTable::default());
        assert!(config.pricing.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(
            file.path(),
            r#"{
                "commercial": {
                    "overheads_percent": 12, "profit_percent": 18,
                    "profit_applied_after": false, "contingency_percent": 5,
                    "escalation_percent": 0, "gst_percent": 10, "round_to": 5
                },
                "pricing": { "tier_rates": { "lgr_dehumidifier": 65 } }
            }"#,
        )
        .unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.commercial.round_to, RoundTo::Five);

        let settings = config.job_settings();
        assert_eq!(settings.drying_days, DEFAULT_DRYING_DAYS);
        let pricing = settings.pricing.unwrap();
        assert_eq!(pricing.tier_rates.get(&PricingTier::LgrDehumidifier), Some(&65.0));
    }

    #[test]
    fn test_invalid_config() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"{ "default_drying_days": -2 }"#).unwrap();
        assert_eq!(CliConfig::load(file.path()).unwrap_err().error_code(), "INVALID_INPUT");

        fs::write(file.path(), "not json").unwrap();
        assert_eq!(CliConfig::load(file.path()).unwrap_err().error_code(), "SERIALIZATION_ERROR");
    }
}
