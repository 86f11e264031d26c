//! # Scope Areas
//!
//! Room measurements captured on site and their aggregation into the two
//! quantities equipment sizing needs: total air volume and total wet floor
//! area.
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::scope::{aggregate_scope, ScopeArea};
//!
//! let areas = vec![
//!     ScopeArea::new("Lounge", 5.0, 4.0, 2.4, 50.0),
//!     ScopeArea::new("Hallway", 6.0, 1.0, 2.4, 100.0),
//! ];
//!
//! let totals = aggregate_scope(&areas);
//! assert!((totals.total_volume.0 - 62.4).abs() < 1e-9);
//! assert!((totals.total_affected_area.0 - 16.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::units::{CubicMetres, SquareMetres};

/// A measured room or zone within the affected structure.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "6f1c7a8e-2b8e-4f5e-9f39-0f8f5f3f0c11",
///   "name": "Master Bedroom",
///   "length_m": 4.2,
///   "width_m": 3.6,
///   "height_m": 2.4,
///   "wet_percentage": 60.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeArea {
    pub id: Uuid,

    /// Operator label (e.g., "Kitchen", "Bed 2")
    pub name: String,

    /// Room length in metres
    pub length_m: f64,

    /// Room width in metres
    pub width_m: f64,

    /// Ceiling height in metres
    pub height_m: f64,

    /// Share of the floor that is wet (0-100 %)
    pub wet_percentage: f64,
}

impl ScopeArea {
    /// Create an area with a fresh id
    pub fn new(
        name: impl Into<String>,
        length_m: f64,
        width_m: f64,
        height_m: f64,
        wet_percentage: f64,
    ) -> Self {
        ScopeArea {
            id: Uuid::new_v4(),
            name: name.into(),
            length_m,
            width_m,
            height_m,
            wet_percentage,
        }
    }

    /// Air volume: length × width × height
    pub fn volume(&self) -> CubicMetres {
        CubicMetres(measured(self.length_m) * measured(self.width_m) * measured(self.height_m))
    }

    /// Floor area: length × width
    pub fn floor_area(&self) -> SquareMetres {
        SquareMetres(measured(self.length_m) * measured(self.width_m))
    }

    /// Wet floor area: length × width × (wet % / 100), wet % clamped to 0-100
    pub fn wet_floor_area(&self) -> SquareMetres {
        let wet = if self.wet_percentage.is_nan() {
            0.0
        } else {
            self.wet_percentage.clamp(0.0, 100.0)
        };
        self.floor_area() * (wet / 100.0)
    }

    /// Validate measurements.
    ///
    /// Host forms call this before accepting an area; the aggregation
    /// functions never do, so a half-filled form still totals.
    pub fn validate(&self) -> EstimateResult<()> {
        if self.name.trim().is_empty() {
            return Err(EstimateError::missing_field("name"));
        }
        for (field, value) in [
            ("length_m", self.length_m),
            ("width_m", self.width_m),
            ("height_m", self.height_m),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(EstimateError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be positive",
                ));
            }
        }
        if !(0.0..=100.0).contains(&self.wet_percentage) {
            return Err(EstimateError::invalid_input(
                "wet_percentage",
                self.wet_percentage.to_string(),
                "Wet percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

/// A dimension as it counts toward totals: unset, negative or non-finite
/// entries contribute nothing.
fn measured(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Aggregated scope of a job.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScopeTotals {
    /// Sum of area volumes
    pub total_volume: CubicMetres,

    /// Sum of wet floor areas
    pub total_affected_area: SquareMetres,
}

impl ScopeTotals {
    /// Wet floor as a share of the given floor area, 0 when the floor is empty
    pub fn affected_share_of(&self, floor_area: SquareMetres) -> f64 {
        if floor_area.0 > 0.0 {
            self.total_affected_area.0 / floor_area.0
        } else {
            0.0
        }
    }
}

/// Sum volume and wet floor area across all areas.
///
/// Order does not matter; an empty slice yields zero totals. An area with a
/// missing or invalid measurement contributes 0 without affecting the rest.
pub fn aggregate_scope(areas: &[ScopeArea]) -> ScopeTotals {
    ScopeTotals {
        total_volume: areas.iter().map(ScopeArea::volume).sum(),
        total_affected_area: areas.iter().map(ScopeArea::wet_floor_area).sum(),
    }
}

/// Total floor area (wet or not), used for affected-share displays
pub fn total_floor_area(areas: &[ScopeArea]) -> SquareMetres {
    areas.iter().map(ScopeArea::floor_area).sum()
}
