//! # Costing
//!
//! Line items, rate tables and the cost rollup that turns them into an
//! estimate total.
//!
//! ## Pipeline
//!
//! 1. Each [`LineItem`] gets a subtotal: equipment hire is billed by tier
//!    from the [`RateTable`], everything else is `qty × rate`
//! 2. Each item is attributed to a [`CostBucket`] by the ordered
//!    [`ATTRIBUTION_RULES`]
//! 3. The markup stack in [`CommercialParams`] is applied to the bucket
//!    subtotals, then GST and rounding
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::costing::{rollup_costs, CommercialParams, LineCategory, LineItem, RateTable};
//!
//! let items = vec![
//!     LineItem::new("LAB-TECH-NH", LineCategory::Mitigation, "Technician", 10.0, "hr", 100.0),
//! ];
//! let rollup = rollup_costs(&items, &RateTable::default(), &CommercialParams::default());
//! assert_eq!(rollup.totals.labour, 1000.0);
//! assert!(rollup.unattributed.is_empty());
//! ```

pub mod attribution;
pub mod cache;
pub mod line_item;
pub mod params;
pub mod rates;
pub mod rollup;

pub use attribution::{attribute, matching_rule, AttributionRule, CostBucket, ATTRIBUTION_RULES};
pub use cache::RollupCache;
pub use line_item::{EquipmentData, LineCategory, LineItem};
pub use params::{CommercialParams, RoundTo};
pub use rates::{
    equipment_hire_cost, ChemicalTreatment, EquipmentKind, EquipmentRates, HireTier, LabourRate,
    LabourRole, RateTable, Trade,
};
pub use rollup::{apply_markups, rollup_costs, BucketSubtotals, CostRollup, EstimateTotals};
