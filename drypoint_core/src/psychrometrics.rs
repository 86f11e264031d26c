//! # Psychrometric Drying Potential
//!
//! Rates how readily a wet structure will give up moisture under the
//! current ambient conditions. The drying index is derived from the
//! vapour-pressure deficit (VPD): the gap between the saturation vapour
//! pressure at the measured temperature and the actual vapour pressure of
//! the air.
//!
//! ```text
//! es    = 0.61078 · exp(17.27·T / (T + 237.3))     kPa (Magnus–Tetens)
//! VPD   = es · (1 − RH/100)
//! index = VPD · 10 · system factor                  (open 1.0, closed 0.85)
//! ```
//!
//! The index is then banded into four tiers. Higher water classes need a
//! larger index for the same rating:
//!
//! | Class | FAIR from | GOOD from | EXCELLENT from |
//! |-------|-----------|-----------|----------------|
//! | 1     | 5.0       | 10.0      | 15.0           |
//! | 2     | 5.5       | 11.0      | 16.5           |
//! | 3     | 6.25      | 12.5      | 18.75          |
//! | 4     | 7.0       | 14.0      | 21.0           |
//!
//! The result drives the on-screen drying-potential panel only; it does not
//! feed the cost math.
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::classification::{SystemType, WaterClass};
//! use drypoint_core::psychrometrics::{compute_drying_potential, DryingPotentialInput, DryingStatus};
//! use drypoint_core::units::Celsius;
//!
//! let input = DryingPotentialInput {
//!     water_class: WaterClass::Class1,
//!     temperature: Celsius(20.0),
//!     humidity_percent: 50.0,
//!     system_type: SystemType::Open,
//! };
//!
//! let result = compute_drying_potential(&input);
//! assert_eq!(result.drying_index, 11.7);
//! assert_eq!(result.status, DryingStatus::Good);
//! ```

use serde::{Deserialize, Serialize};

use crate::classification::{SystemType, WaterClass};
use crate::units::{Celsius, Kilopascals};

/// Temperatures outside this range are clamped before evaluation
const TEMPERATURE_RANGE_C: (f64, f64) = (-20.0, 60.0);

/// Magnus–Tetens coefficients over water
const MAGNUS_A_KPA: f64 = 0.61078;
const MAGNUS_B: f64 = 17.27;
const MAGNUS_C: f64 = 237.3;

/// Base band thresholds before the water-class multiplier
const BASE_FAIR: f64 = 5.0;
const BASE_GOOD: f64 = 10.0;
const BASE_EXCELLENT: f64 = 15.0;

/// Ambient conditions and hazard class for a drying-potential reading.
///
/// ## JSON Example
///
/// ```json
/// {
///   "water_class": 2,
///   "temperature": 22.5,
///   "humidity_percent": 55.0,
///   "system_type": "closed"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DryingPotentialInput {
    /// Water-loss class of the job
    pub water_class: WaterClass,

    /// Ambient dry-bulb temperature
    pub temperature: Celsius,

    /// Ambient relative humidity (0-100 %)
    pub humidity_percent: f64,

    /// Open or closed drying system
    pub system_type: SystemType,
}

/// Qualitative drying rating, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DryingStatus {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl DryingStatus {
    /// All tiers, worst first
    pub const ALL: [DryingStatus; 4] = [
        DryingStatus::Poor,
        DryingStatus::Fair,
        DryingStatus::Good,
        DryingStatus::Excellent,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            DryingStatus::Poor => "POOR",
            DryingStatus::Fair => "FAIR",
            DryingStatus::Good => "GOOD",
            DryingStatus::Excellent => "EXCELLENT",
        }
    }
}

impl std::fmt::Display for DryingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lower index bound of each tier above POOR.
///
/// Bands are contiguous: POOR is `[0, fair)`, FAIR `[fair, good)`,
/// GOOD `[good, excellent)` and EXCELLENT `[excellent, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBands {
    pub fair: f64,
    pub good: f64,
    pub excellent: f64,
}

impl StatusBands {
    /// Thresholds for a water class
    pub fn for_class(water_class: WaterClass) -> Self {
        let factor = class_threshold_factor(water_class);
        StatusBands {
            fair: BASE_FAIR * factor,
            good: BASE_GOOD * factor,
            excellent: BASE_EXCELLENT * factor,
        }
    }

    /// Rate an index against these bands
    pub fn classify(&self, index: f64) -> DryingStatus {
        if index >= self.excellent {
            DryingStatus::Excellent
        } else if index >= self.good {
            DryingStatus::Good
        } else if index >= self.fair {
            DryingStatus::Fair
        } else {
            DryingStatus::Poor
        }
    }
}

/// Drying-potential reading.
///
/// ## JSON Example
///
/// ```json
/// {
///   "drying_index": 11.7,
///   "status": "GOOD",
///   "recommendation": "Conditions are good. Maintain current equipment and monitor daily.",
///   "saturation_pressure": 2.338,
///   "vapour_pressure_deficit": 1.169,
///   "dew_point": 9.3
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryingPotential {
    /// Drying index (non-negative, one decimal place)
    pub drying_index: f64,

    /// Qualitative rating of the index for this water class
    pub status: DryingStatus,

    /// Operator guidance for the rating
    pub recommendation: String,

    /// Saturation vapour pressure at the (clamped) temperature
    pub saturation_pressure: Kilopascals,

    /// Vapour-pressure deficit of the ambient air
    pub vapour_pressure_deficit: Kilopascals,

    /// Dew point, unless the air is completely dry
    pub dew_point: Option<Celsius>,
}

/// Compute the drying potential for the given conditions.
///
/// Pure and deterministic. Out-of-range inputs are clamped (temperature to
/// -20..60 °C, humidity to 0..100 %), infinities included; NaN inputs are
/// treated as the worst case, so the result is always well formed.
pub fn compute_drying_potential(input: &DryingPotentialInput) -> DryingPotential {
    let temperature_c = sanitize(input.temperature.0, TEMPERATURE_RANGE_C.0, TEMPERATURE_RANGE_C);
    let humidity = sanitize(input.humidity_percent, 100.0, (0.0, 100.0));

    let es = saturation_pressure_kpa(temperature_c);
    let vpd = es * (1.0 - humidity / 100.0);

    let raw_index = vpd * 10.0 * system_factor(input.system_type);
    let drying_index = round_to_tenth(raw_index.max(0.0));

    let status = StatusBands::for_class(input.water_class).classify(drying_index);

    DryingPotential {
        drying_index,
        status,
        recommendation: recommendation(status, input.system_type).to_string(),
        saturation_pressure: Kilopascals(es),
        vapour_pressure_deficit: Kilopascals(vpd),
        dew_point: dew_point_c(temperature_c, humidity).map(|td| Celsius(round_to_tenth(td))),
    }
}

/// Saturation vapour pressure over water (kPa)
pub fn saturation_pressure_kpa(temperature_c: f64) -> f64 {
    MAGNUS_A_KPA * (MAGNUS_B * temperature_c / (temperature_c + MAGNUS_C)).exp()
}

/// Dew point by inverting the Magnus form. `None` at 0 % humidity.
fn dew_point_c(temperature_c: f64, humidity: f64) -> Option<f64> {
    if humidity <= 0.0 {
        return None;
    }
    let gamma = (humidity / 100.0).ln() + MAGNUS_B * temperature_c / (temperature_c + MAGNUS_C);
    Some(MAGNUS_C * gamma / (MAGNUS_B - gamma))
}

/// Closed systems trap moisture, lowering effective drying potential
fn system_factor(system_type: SystemType) -> f64 {
    match system_type {
        SystemType::Open => 1.0,
        SystemType::Closed => 0.85,
    }
}

fn class_threshold_factor(water_class: WaterClass) -> f64 {
    match water_class {
        WaterClass::Class1 => 1.0,
        WaterClass::Class2 => 1.1,
        WaterClass::Class3 => 1.25,
        WaterClass::Class4 => 1.4,
    }
}

fn recommendation(status: DryingStatus, system_type: SystemType) -> &'static str {
    match (status, system_type) {
        (DryingStatus::Poor, SystemType::Open) => {
            "Drying conditions are poor. Close the structure and add dehumidification \
             or heat before relying on air movement."
        }
        (DryingStatus::Poor, SystemType::Closed) => {
            "Drying conditions are poor. Add dehumidification capacity or heat to lower \
             the humidity of the contained air."
        }
        (DryingStatus::Fair, _) => {
            "Drying conditions are fair. Increase temperature or dehumidification to \
             speed evaporation."
        }
        (DryingStatus::Good, _) => {
            "Conditions are good. Maintain current equipment and monitor daily."
        }
        (DryingStatus::Excellent, _) => {
            "Conditions are excellent. Monitor moisture readings to avoid over-drying \
             sensitive materials."
        }
    }
}

/// NaN takes the fallback; infinities clamp to the matching end of the range.
fn sanitize(value: f64, fallback: f64, (lo, hi): (f64, f64)) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
