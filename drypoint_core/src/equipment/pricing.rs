//! Daily hire rates for equipment groups.
//!
//! A tenant may supply a [`PricingConfig`]; without one every group costs 0
//! per day until pricing is configured.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::catalog::{EquipmentCatalog, PricingTier};

/// Tenant pricing: per-group overrides take precedence over tier rates.
///
/// ## JSON Example
///
/// ```json
/// {
///   "group_rates": { "lgr-135": 95.0 },
///   "tier_rates": {
///     "lgr_dehumidifier": 65.0,
///     "air_mover_axial": 35.0,
///     "heat_drying": 150.0
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Daily rate by group id
    #[serde(default)]
    pub group_rates: BTreeMap<String, f64>,

    #[serde(default)]
    pub tier_rates: BTreeMap<PricingTier, f64>,
}

impl PricingConfig {
    pub fn with_tier_rate(mut self, tier: PricingTier, rate: f64) -> Self {
        self.tier_rates.insert(tier, rate);
        self
    }

    pub fn with_group_rate(mut self, group_id: impl Into<String>, rate: f64) -> Self {
        self.group_rates.insert(group_id.into(), rate);
        self
    }
}

// Negative and non-finite rates price as 0
fn sanitize_rate(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

impl EquipmentCatalog {
    /// Daily rate of a group in this catalog: group override, then tier rate, else 0.
    pub fn daily_rate(&self, group_id: &str, pricing: Option<&PricingConfig>) -> f64 {
        let Some(pricing) = pricing else {
            return 0.0;
        };

        if let Some(rate) = pricing.group_rates.get(group_id) {
            return sanitize_rate(*rate);
        }

        self.get(group_id)
            .and_then(|group| pricing.tier_rates.get(&group.tier))
            .map(|rate| sanitize_rate(*rate))
            .unwrap_or(0.0)
    }
}

/// Daily rate of a standard catalog group.
///
/// ```rust
/// use drypoint_core::equipment::{resolve_daily_rate, PricingConfig, PricingTier};
///
/// let pricing = PricingConfig::default().with_tier_rate(PricingTier::LgrDehumidifier, 65.0);
/// assert_eq!(resolve_daily_rate("lgr-85", Some(&pricing)), 65.0);
/// assert_eq!(resolve_daily_rate("lgr-85", None), 0.0);
/// ```
pub fn resolve_daily_rate(group_id: &str, pricing: Option<&PricingConfig>) -> f64 {
    EquipmentCatalog::standard().daily_rate(group_id, pricing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing() -> PricingConfig {
        PricingConfig::default()
            .with_tier_rate(PricingTier::LgrDehumidifier, 65.0)
            .with_tier_rate(PricingTier::AirMoverAxial, 35.0)
            .with_group_rate("lgr-135", 95.0)
    }

    #[test]
    fn test_group_override_beats_tier() {
        let pricing = pricing();
        assert_eq!(resolve_daily_rate("lgr-135", Some(&pricing)), 95.0);
        assert_eq!(resolve_daily_rate("lgr-55", Some(&pricing)), 65.0);
        assert_eq!(resolve_daily_rate("airmover-axial", Some(&pricing)), 35.0);
    }

    #[test]
    fn test_missing_pricing_is_zero() {
        let pricing = pricing();
        assert_eq!(resolve_daily_rate("heat-3kw", Some(&pricing)), 0.0);
        assert_eq!(resolve_daily_rate("no-such-group", Some(&pricing)), 0.0);
        assert_eq!(resolve_daily_rate("lgr-135", None), 0.0);
    }

    #[test]
    fn test_invalid_rates_are_zero() {
        let pricing = PricingConfig::default()
            .with_group_rate("lgr-85", -20.0)
            .with_tier_rate(PricingTier::HeatDrying, f64::NAN);
        assert_eq!(resolve_daily_rate("lgr-85", Some(&pricing)), 0.0);
        assert_eq!(resolve_daily_rate("heat-10kw", Some(&pricing)), 0.0);
    }

    #[test]
    fn test_pricing_config_json() {
        let json = r#"{ "tier_rates": { "air_mover_low_profile": 22.5 } }"#;
        let pricing: PricingConfig = serde_json::from_str(json).unwrap();
        assert!(pricing.group_rates.is_empty());
        assert_eq!(resolve_daily_rate("airmover-lowprofile", Some(&pricing)), 22.5);
    }
}
