//! Commercial parameters: the markup stack settings of an estimate.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Rounding applied to the GST-inclusive total.
///
/// Only `Five` rounds; `Ten` is accepted for configuration but leaves the
/// total untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RoundTo {
    None,
    Five,
    Ten,
}

impl RoundTo {
    pub fn increment(self) -> u8 {
        match self {
            RoundTo::None => 0,
            RoundTo::Five => 5,
            RoundTo::Ten => 10,
        }
    }

    /// Apply to a total. Half-way values round up (toward +∞).
    pub fn apply(self, total: f64) -> f64 {
        match self {
            RoundTo::Five => (total / 5.0 + 0.5).floor() * 5.0,
            // TODO: round to the nearest 10 once product confirms `Ten` should round
            RoundTo::None | RoundTo::Ten => total,
        }
    }
}

impl Default for RoundTo {
    fn default() -> Self {
        RoundTo::None
    }
}

impl TryFrom<u8> for RoundTo {
    type Error = EstimateError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(RoundTo::None),
            5 => Ok(RoundTo::Five),
            10 => Ok(RoundTo::Ten),
            _ => Err(EstimateError::invalid_input(
                "round_to",
                n.to_string(),
                "Rounding must be 0, 5 or 10",
            )),
        }
    }
}

impl From<RoundTo> for u8 {
    fn from(round_to: RoundTo) -> Self {
        round_to.increment()
    }
}

/// Markup stack settings.
///
/// ## JSON Example
///
/// ```json
/// {
///   "overheads_percent": 15.0,
///   "profit_percent": 20.0,
///   "profit_applied_after": true,
///   "contingency_percent": 10.0,
///   "escalation_percent": 0.0,
///   "gst_percent": 10.0,
///   "round_to": 5
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommercialParams {
    /// Applied to labour + equipment + subcontractor
    pub overheads_percent: f64,

    pub profit_percent: f64,

    /// Apply profit on top of overheads rather than on the base alone
    pub profit_applied_after: bool,

    /// Applied to labour + equipment
    pub contingency_percent: f64,

    /// Applied to labour + equipment + subcontractor
    pub escalation_percent: f64,

    pub gst_percent: f64,

    #[serde(default)]
    pub round_to: RoundTo,
}

impl CommercialParams {
    /// Validate percentages (host-side check; the rollup accepts anything)
    pub fn validate(&self) -> EstimateResult<()> {
        for (field, value) in [
            ("overheads_percent", self.overheads_percent),
            ("profit_percent", self.profit_percent),
            ("contingency_percent", self.contingency_percent),
            ("escalation_percent", self.escalation_percent),
            ("gst_percent", self.gst_percent),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateError::invalid_input(
                    field,
                    value.to_string(),
                    "Percentage must be a non-negative number",
                ));
            }
        }
        Ok(())
    }
}

impl Default for CommercialParams {
    fn default() -> Self {
        CommercialParams {
            overheads_percent: 15.0,
            profit_percent: 20.0,
            profit_applied_after: true,
            contingency_percent: 10.0,
            escalation_percent: 0.0,
            gst_percent: 10.0,
            round_to: RoundTo::None,
        }
    }
}
