//! # drypoint_core - Restoration Equipment Sizing & Cost Estimation Engine
//!
//! `drypoint_core` turns water-damage site measurements into a drying
//! equipment plan and a fully costed estimate. All inputs and outputs are
//! JSON-serializable so a host UI or API layer can drive it directly.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Never stuck mid-entry**: Computations on incomplete data return
//!   well-formed (possibly all-zero) results instead of errors
//! - **Rich Errors**: Structured error types at the ingestion and file edges
//!
//! ## Pipeline
//!
//! ```text
//! rooms ─► aggregate_scope ─► compute_targets ─► auto_select_equipment
//!                                                        │
//!          other line items ─────────────► rollup_costs ◄┘ (equipment line items)
//!
//! temperature/humidity ─► compute_drying_potential (display only)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use drypoint_core::prelude::*;
//!
//! let areas = vec![ScopeArea::new("Lounge", 5.0, 4.0, 2.5, 100.0)];
//! let scope = aggregate_scope(&areas);
//! let targets = compute_targets(scope.total_volume, WaterClass::Class2, scope.total_affected_area);
//! assert_eq!(targets.air_movers_required, 2);
//!
//! let selections = auto_select_equipment(
//!     targets.water_removal_target,
//!     targets.air_movers_required,
//!     EquipmentCatalog::standard(),
//!     None,
//! );
//! assert!(!selections.is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`psychrometrics`] - Drying potential from temperature and humidity
//! - [`scope`] - Room measurements and scope totals
//! - [`targets`] - Water removal and air movement targets
//! - [`equipment`] - Catalog, pricing and the equipment planner
//! - [`costing`] - Line items, rate tables and the cost rollup
//! - [`job`] - Job container, settings and estimate snapshots
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Job files with atomic saves and locking

pub mod classification;
pub mod costing;
pub mod equipment;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod job;
pub mod psychrometrics;
pub mod scope;
pub mod targets;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_job, save_job, FileLock};
pub use job::{Job, JobMetadata, JobSettings};

/// Everything needed to run the estimation pipeline
pub mod prelude {
    pub use crate::classification::{SystemType, WaterClass};
    pub use crate::costing::{
        rollup_costs, CommercialParams, CostRollup, LineCategory, LineItem, RateTable,
    };
    pub use crate::equipment::{
        auto_select_equipment, resolve_daily_rate, EquipmentCatalog, PricingConfig,
    };
    pub use crate::psychrometrics::{compute_drying_potential, DryingPotentialInput};
    pub use crate::scope::{aggregate_scope, ScopeArea};
    pub use crate::targets::compute_targets;
    pub use crate::units::*;
}
