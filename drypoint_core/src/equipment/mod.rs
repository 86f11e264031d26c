//! # Drying Equipment
//!
//! Catalog data, pricing and the planner that sizes equipment against the
//! drying targets.
//!
//! - [`catalog`] - Equipment groups and the standard catalog
//! - [`pricing`] - Daily rate resolution from tenant pricing
//! - [`planner`] - Auto-selection, manual adjustment and plan summaries

pub mod catalog;
pub mod planner;
pub mod pricing;

pub use catalog::{
    parse_capacity_label, EquipmentCatalog, EquipmentFamily, EquipmentGroup, PricingTier,
};
pub use planner::{auto_select_equipment, EquipmentPlan, EquipmentSelection, PlanSummary};
pub use pricing::{resolve_daily_rate, PricingConfig};
