//! # Unit Types
//!
//! Type-safe wrappers for the units a drying job is measured in. These are
//! plain f64 newtypes: they keep volume and area from being swapped at call
//! sites while serializing as bare numbers.
//!
//! ## Metric Units (Primary)
//!
//! Drypoint works in the units restoration technicians record on site:
//! - Length/area/volume: metres, m², m³
//! - Water removal: litres per day (L/day)
//! - Airflow: cubic feet per minute (CFM), as printed on air-mover plates
//! - Temperature: degrees Celsius
//! - Vapour pressure: kilopascals (kPa)
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::units::{AirMoverUnits, Cfm, CubicMetres};
//!
//! let room = CubicMetres(4.0 * 5.0 * 2.4);
//! assert!((room.0 - 48.0).abs() < 1e-9);
//!
//! // A 3000 CFM axial fan counts as two standard air movers
//! let units: AirMoverUnits = Cfm(3000.0).into();
//! assert_eq!(units.0, 2.0);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};

/// Airflow that counts as one standard air mover
pub const CFM_PER_AIR_MOVER_UNIT: f64 = 1500.0;

// ============================================================================
// Geometry Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMetres(pub f64);

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMetres(pub f64);

// ============================================================================
// Equipment Capacity Units
// ============================================================================

/// Water removal rate in litres per day
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LitresPerDay(pub f64);

/// Airflow in cubic feet per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cfm(pub f64);

/// Air movement expressed in standard air-mover equivalents
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirMoverUnits(pub f64);

impl From<Cfm> for AirMoverUnits {
    fn from(cfm: Cfm) -> Self {
        AirMoverUnits(cfm.0 / CFM_PER_AIR_MOVER_UNIT)
    }
}

impl From<AirMoverUnits> for Cfm {
    fn from(units: AirMoverUnits) -> Self {
        Cfm(units.0 * CFM_PER_AIR_MOVER_UNIT)
    }
}

// ============================================================================
// Environmental Units
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

/// Pressure in kilopascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilopascals(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.fold(0.0, |acc, v| acc + v.0))
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(SquareMetres);
impl_arithmetic!(CubicMetres);
impl_arithmetic!(LitresPerDay);
impl_arithmetic!(Cfm);
impl_arithmetic!(AirMoverUnits);
impl_arithmetic!(Celsius);
impl_arithmetic!(Kilopascals);
