//! Equipment Planner
//!
//! Chooses how many units of each catalog group go on site.
//!
//! ## Auto-selection
//!
//! Groups are considered largest first. The current group is assigned
//! `ceil(remaining / capacity)` units, so the first group that fits
//! usually covers the whole target on its own:
//!
//! 1. LGR groups against the water removal target (L/day)
//! 2. Air-mover groups against the required air-mover count, each unit
//!    worth `airflow / 1500` standard units
//!
//! The result replaces the previous plan. Groups without a usable capacity
//! or airflow are skipped.
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::equipment::{auto_select_equipment, EquipmentCatalog};
//! use drypoint_core::units::LitresPerDay;
//!
//! let selections = auto_select_equipment(LitresPerDay(78.0), 2, EquipmentCatalog::standard(), None);
//! assert_eq!(selections[0].group_id, "lgr-135");
//! assert_eq!(selections[1].group_id, "airmover-axial");
//! assert_eq!(selections[1].quantity, 2);
//! ```

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::catalog::{EquipmentCatalog, EquipmentFamily, EquipmentGroup};
use super::pricing::PricingConfig;
use crate::costing::line_item::{EquipmentData, LineCategory, LineItem};
use crate::costing::rates::EquipmentKind;
use crate::targets::DryingTargets;
use crate::units::{AirMoverUnits, Cfm, LitresPerDay};

/// Quantity of one catalog group in a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSelection {
    pub group_id: String,

    /// Always at least 1; a group at 0 has no entry
    pub quantity: u32,

    /// Captured when the entry is created
    pub daily_rate: f64,
}

/// Largest first; the sort is stable so equal groups keep catalog order
fn descending<'a>(mut groups: Vec<(&'a EquipmentGroup, f64)>) -> Vec<(&'a EquipmentGroup, f64)> {
    groups.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    groups
}

fn add_selection(
    selections: &mut Vec<EquipmentSelection>,
    group_id: &str,
    quantity: u32,
    catalog: &EquipmentCatalog,
    pricing: Option<&PricingConfig>,
) {
    match selections.iter_mut().find(|s| s.group_id == group_id) {
        Some(existing) => existing.quantity += quantity,
        None => selections.push(EquipmentSelection {
            group_id: group_id.to_string(),
            quantity,
            daily_rate: catalog.daily_rate(group_id, pricing),
        }),
    }
}

fn greedy_fill(
    selections: &mut Vec<EquipmentSelection>,
    groups: Vec<(&EquipmentGroup, f64)>,
    target: f64,
    catalog: &EquipmentCatalog,
    pricing: Option<&PricingConfig>,
) {
    let mut remaining = if target.is_finite() { target } else { 0.0 };
    for (group, per_unit) in descending(groups) {
        if remaining <= 0.0 {
            break;
        }
        let needed = (remaining / per_unit).ceil();
        if needed > 0.0 {
            add_selection(selections, &group.id, needed as u32, catalog, pricing);
            remaining -= needed * per_unit;
        }
    }
}

/// Select equipment for the given targets.
///
/// Deterministic: identical targets, catalog and pricing give an identical
/// list.
pub fn auto_select_equipment(
    water_removal_target: LitresPerDay,
    air_movers_required: u32,
    catalog: &EquipmentCatalog,
    pricing: Option<&PricingConfig>,
) -> Vec<EquipmentSelection> {
    let mut selections = Vec::new();

    let dehumidifiers: Vec<(&EquipmentGroup, f64)> = catalog
        .by_family(EquipmentFamily::Lgr)
        .filter_map(|g| match g.usable_capacity() {
            Some(capacity) => Some((g, capacity)),
            None => {
                tracing::debug!(
                    group = %g.id,
                    label = %g.capacity_label,
                    "skipping group without usable capacity"
                );
                None
            }
        })
        .collect();
    greedy_fill(&mut selections, dehumidifiers, water_removal_target.0, catalog, pricing);

    let air_movers: Vec<(&EquipmentGroup, f64)> = catalog
        .by_family(EquipmentFamily::AirMover)
        .filter_map(|g| match g.air_mover_units() {
            Some(units) => Some((g, units.0)),
            None => {
                tracing::debug!(group = %g.id, "skipping air mover without airflow");
                None
            }
        })
        .collect();
    greedy_fill(&mut selections, air_movers, air_movers_required as f64, catalog, pricing);

    selections
}

/// Totals of a plan against its targets
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_dehumidification: LitresPerDay,
    pub total_airflow: Cfm,
    pub air_mover_units: AirMoverUnits,
    pub total_amps: f64,
    pub daily_cost: f64,
    pub water_removal_met: bool,
    pub air_movement_met: bool,
}

/// The equipment a job has on site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentPlan {
    pub selections: Vec<EquipmentSelection>,
}

impl EquipmentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Replace the plan with an auto-selection for `targets`
    pub fn auto_select(
        &mut self,
        targets: &DryingTargets,
        catalog: &EquipmentCatalog,
        pricing: Option<&PricingConfig>,
    ) {
        self.selections = auto_select_equipment(
            targets.water_removal_target,
            targets.air_movers_required,
            catalog,
            pricing,
        );
    }

    pub fn quantity_of(&self, group_id: &str) -> u32 {
        self.selections
            .iter()
            .find(|s| s.group_id == group_id)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    /// Add one unit. Returns false for ids not in the catalog.
    ///
    /// A new entry captures the current rate; an existing entry keeps its
    /// rate unless it was captured as 0.
    pub fn increment(
        &mut self,
        group_id: &str,
        catalog: &EquipmentCatalog,
        pricing: Option<&PricingConfig>,
    ) -> bool {
        if catalog.get(group_id).is_none() {
            tracing::debug!(group = group_id, "ignoring increment of unknown group");
            return false;
        }

        match self.selections.iter_mut().find(|s| s.group_id == group_id) {
            Some(existing) => {
                existing.quantity += 1;
                if existing.daily_rate == 0.0 {
                    existing.daily_rate = catalog.daily_rate(group_id, pricing);
                }
            }
            None => self.selections.push(EquipmentSelection {
                group_id: group_id.to_string(),
                quantity: 1,
                daily_rate: catalog.daily_rate(group_id, pricing),
            }),
        }
        true
    }

    /// Remove one unit; the entry goes away at 0
    pub fn decrement(&mut self, group_id: &str) {
        if let Some(pos) = self.selections.iter().position(|s| s.group_id == group_id) {
            let selection = &mut self.selections[pos];
            selection.quantity = selection.quantity.saturating_sub(1);
            if selection.quantity == 0 {
                self.selections.remove(pos);
            }
        }
    }

    pub fn summary(&self, catalog: &EquipmentCatalog, targets: &DryingTargets) -> PlanSummary {
        let mut summary = PlanSummary::default();

        for selection in &self.selections {
            let qty = selection.quantity as f64;
            summary.daily_cost += selection.daily_rate * qty;

            let Some(group) = catalog.get(&selection.group_id) else {
                continue;
            };
            summary.total_amps += group.amps * qty;
            if group.family.removes_water() {
                if let Some(capacity) = group.usable_capacity() {
                    let added = LitresPerDay(capacity * qty);
                    summary.total_dehumidification = summary.total_dehumidification + added;
                }
            }
            if let Some(units) = group.air_mover_units() {
                summary.air_mover_units = summary.air_mover_units + units * qty;
                summary.total_airflow = summary.total_airflow + Cfm::from(units * qty);
            }
        }

        summary.water_removal_met = summary.total_dehumidification >= targets.water_removal_target;
        summary.air_movement_met = summary.air_mover_units.0 >= targets.air_movers_required as f64;
        summary
    }

    /// One scope-linked hire line per selection
    pub fn line_items(&self, catalog: &EquipmentCatalog, duration_days: f64) -> Vec<LineItem> {
        self.selections
            .iter()
            .map(|selection| {
                let (kind, description) = match catalog.get(&selection.group_id) {
                    Some(group) => (group.kind(), group.display_name()),
                    None => (EquipmentKind::Other, selection.group_id.clone()),
                };
                let quantity = selection.quantity as f64;
                LineItem::new(
                    format!("EQ-{}", selection.group_id.to_uppercase()),
                    LineCategory::DryingEquipment,
                    description,
                    quantity,
                    "day",
                    selection.daily_rate,
                )
                .with_equipment(EquipmentData {
                    kind,
                    quantity,
                    duration_days,
                })
                .scope_linked()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::catalog::PricingTier;

    fn catalog() -> &'static EquipmentCatalog {
        EquipmentCatalog::standard()
    }

    fn pricing() -> PricingConfig {
        PricingConfig::default()
            .with_tier_rate(PricingTier::LgrDehumidifier, 65.0)
            .with_tier_rate(PricingTier::AirMoverAxial, 35.0)
    }

    #[test]
    fn test_largest_group_takes_the_target() {
        let selections = auto_select_equipment(LitresPerDay(78.0), 0, catalog(), None);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].group_id, "lgr-135");
        assert_eq!(selections[0].quantity, 1);
        assert_eq!(selections[0].daily_rate, 0.0);
    }

    #[test]
    fn test_large_target_stays_on_first_group() {
        // ceil(300 / 135) = 3 covers it; smaller groups get nothing
        let selections = auto_select_equipment(LitresPerDay(300.0), 0, catalog(), None);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].quantity, 3);
    }

    #[test]
    fn test_air_movers_use_cfm_units() {
        let selections = auto_select_equipment(LitresPerDay(0.0), 2, catalog(), Some(&pricing()));
        assert_eq!(
            selections,
            vec![EquipmentSelection {
                group_id: "airmover-axial".to_string(),
                quantity: 2,
                daily_rate: 35.0,
            }]
        );
    }

    #[test]
    fn test_zero_targets_select_nothing() {
        assert!(auto_select_equipment(LitresPerDay(0.0), 0, catalog(), None).is_empty());
        assert!(auto_select_equipment(LitresPerDay(f64::NAN), 0, catalog(), None).is_empty());
    }

    #[test]
    fn test_auto_select_is_idempotent() {
        let pricing = pricing();
        let first = auto_select_equipment(LitresPerDay(412.0), 9, catalog(), Some(&pricing));
        let second = auto_select_equipment(LitresPerDay(412.0), 9, catalog(), Some(&pricing));
        assert_eq!(first, second);
    }

    #[test]
    fn test_unparsed_capacity_is_skipped() {
        let lgr = |id: &str, label: &str| {
            EquipmentGroup::from_label(
                id,
                EquipmentFamily::Lgr,
                label,
                3.0,
                1,
                None,
                PricingTier::LgrDehumidifier,
            )
        };
        let custom = EquipmentCatalog::new(vec![lgr("lgr-x", "Compact"), lgr("lgr-40", "40L/Day")]);
        let selections = auto_select_equipment(LitresPerDay(90.0), 0, &custom, None);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].group_id, "lgr-40");
        assert_eq!(selections[0].quantity, 3);
    }

    #[test]
    fn test_same_id_across_passes_merges() {
        // A group carrying both capacity and airflow is planned in both passes
        let hybrid = EquipmentGroup {
            id: "combo-50".to_string(),
            family: EquipmentFamily::Lgr,
            capacity_label: "50L/Day".to_string(),
            capacity: Some(50.0),
            amps: 5.0,
            model_count: 1,
            airflow: Some(Cfm(1500.0)),
            tier: PricingTier::LgrDehumidifier,
        };
        let mover = EquipmentGroup {
            family: EquipmentFamily::AirMover,
            capacity: None,
            ..hybrid.clone()
        };
        let custom = EquipmentCatalog::new(vec![hybrid, mover]);
        let selections = auto_select_equipment(LitresPerDay(100.0), 3, &custom, None);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].quantity, 5);
    }

    #[test]
    fn test_auto_select_replaces_manual_plan() {
        let mut plan = EquipmentPlan::new();
        plan.increment("heat-3kw", catalog(), None);
        let targets = DryingTargets {
            water_removal_target: LitresPerDay(50.0),
            air_movers_required: 0,
        };
        plan.auto_select(&targets, catalog(), None);
        assert_eq!(plan.quantity_of("heat-3kw"), 0);
        assert_eq!(plan.quantity_of("lgr-135"), 1);
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut plan = EquipmentPlan::new();
        assert!(plan.increment("lgr-85", catalog(), Some(&pricing())));
        assert!(plan.increment("lgr-85", catalog(), Some(&pricing())));
        assert_eq!(plan.quantity_of("lgr-85"), 2);
        assert_eq!(plan.selections[0].daily_rate, 65.0);

        plan.decrement("lgr-85");
        assert_eq!(plan.quantity_of("lgr-85"), 1);
        plan.decrement("lgr-85");
        assert!(plan.is_empty());

        // Floor at zero
        plan.decrement("lgr-85");
        assert!(plan.is_empty());

        assert!(!plan.increment("lgr-999", catalog(), None));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_captured_rate_survives_pricing_change() {
        let mut plan = EquipmentPlan::new();
        plan.increment("lgr-85", catalog(), Some(&pricing()));

        let repriced = PricingConfig::default().with_tier_rate(PricingTier::LgrDehumidifier, 80.0);
        plan.increment("lgr-85", catalog(), Some(&repriced));
        assert_eq!(plan.selections[0].daily_rate, 65.0);
    }

    #[test]
    fn test_empty_rate_is_filled_later() {
        let mut plan = EquipmentPlan::new();
        plan.increment("lgr-85", catalog(), None);
        assert_eq!(plan.selections[0].daily_rate, 0.0);

        plan.increment("lgr-85", catalog(), Some(&pricing()));
        assert_eq!(plan.selections[0].daily_rate, 65.0);
    }

    #[test]
    fn test_summary() {
        let mut plan = EquipmentPlan::new();
        for _ in 0..2 {
            plan.increment("lgr-85", catalog(), Some(&pricing()));
            plan.increment("airmover-centrifugal", catalog(), Some(&pricing()));
        }
        plan.increment("heat-3kw", catalog(), None);

        let targets = DryingTargets {
            water_removal_target: LitresPerDay(160.0),
            air_movers_required: 3,
        };
        let summary = plan.summary(catalog(), &targets);
        assert_eq!(summary.total_dehumidification, LitresPerDay(170.0));
        assert_eq!(summary.total_airflow, Cfm(3000.0));
        assert_eq!(summary.air_mover_units, AirMoverUnits(2.0));
        assert!((summary.total_amps - (13.0 + 4.6 + 13.0)).abs() < 1e-9);
        assert_eq!(summary.daily_cost, 130.0);
        assert!(summary.water_removal_met);
        assert!(!summary.air_movement_met);
    }

    #[test]
    fn test_line_items() {
        let mut plan = EquipmentPlan::new();
        plan.increment("lgr-85", catalog(), Some(&pricing()));
        plan.increment("lgr-85", catalog(), Some(&pricing()));

        let items = plan.line_items(catalog(), 4.0);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.code, "EQ-LGR-85");
        assert_eq!(item.category, LineCategory::DryingEquipment);
        assert_eq!(item.description, "LGR dehumidifier 85L/Day Ave");
        assert!(item.is_scope_linked);
        assert_eq!(
            item.equipment_data,
            Some(EquipmentData {
                kind: EquipmentKind::LgrDehumidifier,
                quantity: 2.0,
                duration_days: 4.0,
            })
        );
    }
}
