//! # Drying Targets
//!
//! Converts the aggregated scope into the two sizing targets the equipment
//! planner fills: daily water removal and air-mover count.
//!
//! ```text
//! water_removal = ceil(volume · class_rate + wet_area · 0.25)     L/day
//! air_movers    = ceil(wet_area / class_coverage)                  units
//! ```
//!
//! | Class | L/day per m³ | m² per air mover |
//! |-------|--------------|------------------|
//! | 1     | 0.4          | 20               |
//! | 2     | 0.6          | 18               |
//! | 3     | 0.8          | 16               |
//! | 4     | 1.0          | 15               |
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::classification::WaterClass;
//! use drypoint_core::targets::compute_targets;
//! use drypoint_core::units::{CubicMetres, SquareMetres};
//!
//! let targets = compute_targets(CubicMetres(100.0), WaterClass::Class2, SquareMetres(30.0));
//! assert_eq!(targets.water_removal_target.0, 68.0); // 60 + 7.5, rounded up
//! assert_eq!(targets.air_movers_required, 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::classification::WaterClass;
use crate::scope::ScopeTotals;
use crate::units::{CubicMetres, LitresPerDay, SquareMetres};

/// Extra removal per m² of wet floor (L/day), the surface-evaporation correction
const WET_AREA_REMOVAL_LPD_PER_M2: f64 = 0.25;

/// Sizing targets for a job.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DryingTargets {
    /// Dehumidification needed per day
    pub water_removal_target: LitresPerDay,

    /// Air movers needed (standard 1500 CFM units)
    pub air_movers_required: u32,
}

/// Base water removal rate per cubic metre for a class
pub fn removal_rate_lpd_per_m3(water_class: WaterClass) -> f64 {
    match water_class {
        WaterClass::Class1 => 0.4,
        WaterClass::Class2 => 0.6,
        WaterClass::Class3 => 0.8,
        WaterClass::Class4 => 1.0,
    }
}

/// Wet floor area one air mover covers for a class
pub fn air_mover_coverage_m2(water_class: WaterClass) -> f64 {
    match water_class {
        WaterClass::Class1 => 20.0,
        WaterClass::Class2 => 18.0,
        WaterClass::Class3 => 16.0,
        WaterClass::Class4 => 15.0,
    }
}

/// Compute the water-removal and air-mover targets.
///
/// Negative or non-finite inputs count as zero, so the result is never
/// negative or NaN and an empty scope gives zero targets.
pub fn compute_targets(
    total_volume: CubicMetres,
    water_class: WaterClass,
    total_affected_area: SquareMetres,
) -> DryingTargets {
    let volume = non_negative(total_volume.0);
    let wet_area = non_negative(total_affected_area.0);

    let litres =
        volume * removal_rate_lpd_per_m3(water_class) + wet_area * WET_AREA_REMOVAL_LPD_PER_M2;
    let air_movers = wet_area / air_mover_coverage_m2(water_class);

    DryingTargets {
        water_removal_target: LitresPerDay(litres.ceil()),
        air_movers_required: air_movers.ceil() as u32,
    }
}

/// Shorthand for [`compute_targets`] over an aggregated scope
pub fn targets_for_scope(totals: &ScopeTotals, water_class: WaterClass) -> DryingTargets {
    compute_targets(totals.total_volume, water_class, totals.total_affected_area)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
