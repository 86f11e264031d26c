//! Cost rollup: per-item subtotals, bucket totals and the markup stack.
//!
//! ```text
//! overheads_base  = labour + equipment + subcontractor
//! overheads       = overheads_base × overheads%
//! profit_base     = overheads_base (+ overheads if profit applied after)
//! profit          = profit_base × profit%
//! contingency     = (labour + equipment) × contingency%
//! escalation      = overheads_base × escalation%
//! total_base_cost = sum of the six buckets
//! subtotal_ex_gst = total_base_cost + overheads + profit + contingency + escalation
//! gst             = subtotal_ex_gst × gst%
//! total_inc_gst   = subtotal_ex_gst + gst, then rounding
//! ```

use serde::{Deserialize, Serialize};

use super::attribution::{attribute, CostBucket};
use super::line_item::LineItem;
use super::params::CommercialParams;
use super::rates::RateTable;

/// Subtotal of each cost bucket
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BucketSubtotals {
    pub labour: f64,
    pub equipment: f64,
    pub chemicals: f64,
    pub subcontractor: f64,
    pub travel: f64,
    pub waste: f64,
}

impl BucketSubtotals {
    pub fn add(&mut self, bucket: CostBucket, amount: f64) {
        match bucket {
            CostBucket::Labour => self.labour += amount,
            CostBucket::Equipment => self.equipment += amount,
            CostBucket::Chemicals => self.chemicals += amount,
            CostBucket::Subcontractor => self.subcontractor += amount,
            CostBucket::Travel => self.travel += amount,
            CostBucket::Waste => self.waste += amount,
        }
    }

    pub fn get(&self, bucket: CostBucket) -> f64 {
        match bucket {
            CostBucket::Labour => self.labour,
            CostBucket::Equipment => self.equipment,
            CostBucket::Chemicals => self.chemicals,
            CostBucket::Subcontractor => self.subcontractor,
            CostBucket::Travel => self.travel,
            CostBucket::Waste => self.waste,
        }
    }

    /// Sum of all six buckets
    pub fn total(&self) -> f64 {
        self.labour
            + self.equipment
            + self.chemicals
            + self.subcontractor
            + self.travel
            + self.waste
    }
}

/// Estimate totals, derived from line items, rates and commercial params.
///
/// ## JSON Example
///
/// ```json
/// {
///   "labour": 1000.0, "equipment": 500.0, "chemicals": 0.0,
///   "subcontractor": 0.0, "travel": 0.0, "waste": 0.0,
///   "total_base_cost": 1500.0,
///   "overheads": 225.0, "profit": 345.0, "contingency": 150.0, "escalation": 0.0,
///   "subtotal_ex_gst": 2220.0, "gst": 222.0, "total_inc_gst": 2440.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimateTotals {
    pub labour: f64,
    pub equipment: f64,
    pub chemicals: f64,
    pub subcontractor: f64,
    pub travel: f64,
    pub waste: f64,
    pub total_base_cost: f64,
    pub overheads: f64,
    pub profit: f64,
    pub contingency: f64,
    pub escalation: f64,
    pub subtotal_ex_gst: f64,
    pub gst: f64,
    pub total_inc_gst: f64,
}

/// Rollup output: totals plus line items with refreshed subtotals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRollup {
    pub totals: EstimateTotals,

    /// Input items in input order with `subtotal` recomputed
    pub line_items: Vec<LineItem>,

    /// Codes of items no attribution rule matched. Their subtotals are not
    /// part of any bucket and therefore not part of the totals.
    pub unattributed: Vec<String>,
}

/// Apply the markup stack to bucket subtotals.
pub fn apply_markups(buckets: &BucketSubtotals, params: &CommercialParams) -> EstimateTotals {
    let overheads_base = buckets.labour + buckets.equipment + buckets.subcontractor;
    let overheads = overheads_base * params.overheads_percent / 100.0;

    let profit_base = if params.profit_applied_after {
        overheads_base + overheads
    } else {
        overheads_base
    };
    let profit = profit_base * params.profit_percent / 100.0;

    let contingency = (buckets.labour + buckets.equipment) * params.contingency_percent / 100.0;
    let escalation = overheads_base * params.escalation_percent / 100.0;

    let total_base_cost = buckets.total();
    let subtotal_ex_gst = total_base_cost + overheads + profit + contingency + escalation;
    let gst = subtotal_ex_gst * params.gst_percent / 100.0;
    let total_inc_gst = params.round_to.apply(subtotal_ex_gst + gst);

    EstimateTotals {
        labour: buckets.labour,
        equipment: buckets.equipment,
        chemicals: buckets.chemicals,
        subcontractor: buckets.subcontractor,
        travel: buckets.travel,
        waste: buckets.waste,
        total_base_cost,
        overheads,
        profit,
        contingency,
        escalation,
        subtotal_ex_gst,
        gst,
        total_inc_gst,
    }
}

/// Roll up line items into estimate totals.
///
/// Pure and deterministic: the same inputs always produce bit-identical
/// totals. Items are processed in input order.
pub fn rollup_costs(
    line_items: &[LineItem],
    rates: &RateTable,
    params: &CommercialParams,
) -> CostRollup {
    let mut buckets = BucketSubtotals::default();
    let mut unattributed = Vec::new();

    let line_items: Vec<LineItem> = line_items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            item.subtotal = item.compute_subtotal(rates);
            match attribute(&item) {
                Some(bucket) => buckets.add(bucket, item.subtotal),
                None => {
                    tracing::debug!(
                        code = %item.code,
                        subtotal = item.subtotal,
                        "line item matched no cost bucket"
                    );
                    unattributed.push(item.code.clone());
                }
            }
            item
        })
        .collect();

    let totals = apply_markups(&buckets, params);
    tracing::trace!(
        items = line_items.len(),
        total_inc_gst = totals.total_inc_gst,
        "cost rollup computed"
    );

    CostRollup {
        totals,
        line_items,
        unattributed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::line_item::{EquipmentData, LineCategory};
    use crate::costing::params::RoundTo;
    use crate::costing::rates::{EquipmentKind, EquipmentRates};

    fn reference_params() -> CommercialParams {
        CommercialParams {
            overheads_percent: 15.0,
            profit_percent: 20.0,
            profit_applied_after: true,
            contingency_percent: 10.0,
            escalation_percent: 0.0,
            gst_percent: 10.0,
            round_to: RoundTo::Five,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_markup_stack_reference_example() {
        let buckets = BucketSubtotals {
            labour: 1000.0,
            equipment: 500.0,
            ..Default::default()
        };
        let totals = apply_markups(&buckets, &reference_params());

        assert!(approx(totals.overheads, 225.0));
        assert!(approx(totals.profit, 345.0));
        assert!(approx(totals.contingency, 150.0));
        assert!(approx(totals.escalation, 0.0));
        assert!(approx(totals.total_base_cost, 1500.0));
        assert!(approx(totals.subtotal_ex_gst, 2220.0));
        assert!(approx(totals.gst, 222.0));
        // 2442 rounded to the nearest 5
        assert_eq!(totals.total_inc_gst, 2440.0);
    }

    #[test]
    fn test_profit_before_overheads() {
        let buckets = BucketSubtotals {
            labour: 1000.0,
            equipment: 500.0,
            ..Default::default()
        };
        let params = CommercialParams {
            profit_applied_after: false,
            round_to: RoundTo::None,
            ..reference_params()
        };
        let totals = apply_markups(&buckets, &params);
        // profit on 1500 only
        assert!(approx(totals.profit, 300.0));
        assert!(approx(totals.subtotal_ex_gst, 2175.0));
        assert!(approx(totals.total_inc_gst, 2392.5));
    }

    #[test]
    fn test_markups_exclude_chemicals_travel_waste() {
        let buckets = BucketSubtotals {
            chemicals: 100.0,
            travel: 50.0,
            waste: 25.0,
            subcontractor: 200.0,
            ..Default::default()
        };
        let params = CommercialParams {
            escalation_percent: 5.0,
            round_to: RoundTo::None,
            ..reference_params()
        };
        let totals = apply_markups(&buckets, &params);
        assert!(approx(totals.overheads, 30.0));
        assert!(approx(totals.escalation, 10.0));
        // Contingency only covers labour + equipment
        assert!(approx(totals.contingency, 0.0));
        assert!(approx(totals.total_base_cost, 375.0));
    }

    #[test]
    fn test_round_to_ten_leaves_total() {
        let buckets = BucketSubtotals {
            labour: 1000.0,
            equipment: 500.0,
            ..Default::default()
        };
        let params = CommercialParams {
            round_to: RoundTo::Ten,
            ..reference_params()
        };
        let totals = apply_markups(&buckets, &params);
        assert!(approx(totals.total_inc_gst, 2442.0));
    }

    fn sample_items() -> Vec<LineItem> {
        vec![
            LineItem::new("LAB-TECH-NH", LineCategory::Mitigation, "Technician", 10.0, "hr", 100.0),
            LineItem::new("EQ-AM", LineCategory::DryingEquipment, "Air movers", 0.0, "day", 0.0)
                .with_equipment(EquipmentData {
                    kind: EquipmentKind::AirMover,
                    quantity: 2.0,
                    duration_days: 5.0,
                }),
            LineItem::new(
                "CHM-1",
                LineCategory::CleaningDecontamination,
                "Anti-microbial spray",
                40.0,
                "m²",
                4.5,
            ),
            LineItem::new("TRV-1", LineCategory::TravelLogistics, "Return trip", 60.0, "km", 1.0),
            LineItem::new("CNT-1", LineCategory::Contents, "Pack-out boxes", 10.0, "ea", 3.0),
        ]
    }

    fn sample_rates() -> RateTable {
        let mut rates = RateTable::empty();
        rates.equipment.insert(EquipmentKind::AirMover, EquipmentRates::new(30.0, 180.0, 600.0));
        rates
    }

    #[test]
    fn test_rollup_buckets_and_subtotals() {
        let rollup = rollup_costs(&sample_items(), &sample_rates(), &reference_params());

        assert!(approx(rollup.totals.labour, 1000.0));
        // 2 air movers × 5 days × $30
        assert!(approx(rollup.totals.equipment, 300.0));
        assert!(approx(rollup.totals.chemicals, 180.0));
        assert!(approx(rollup.totals.travel, 60.0));
        assert!(approx(rollup.totals.total_base_cost, 1540.0));

        assert_eq!(rollup.line_items.len(), 5);
        assert!(approx(rollup.line_items[1].subtotal, 300.0));
        assert!(approx(rollup.line_items[4].subtotal, 30.0));
    }

    #[test]
    fn test_unattributed_items_are_excluded_from_totals() {
        let rollup = rollup_costs(&sample_items(), &sample_rates(), &reference_params());
        assert_eq!(rollup.unattributed, vec!["CNT-1".to_string()]);

        let t = &rollup.totals;
        let bucket_sum =
            t.labour + t.equipment + t.chemicals + t.subcontractor + t.travel + t.waste;
        let item_sum: f64 = rollup.line_items.iter().map(|i| i.subtotal).sum();
        assert!(approx(bucket_sum, rollup.totals.total_base_cost));
        assert!(approx(item_sum - bucket_sum, 30.0));
    }

    #[test]
    fn test_rollup_is_idempotent() {
        let items = sample_items();
        let rates = sample_rates();
        let params = reference_params();

        let first = rollup_costs(&items, &rates, &params);
        let second = rollup_costs(&items, &rates, &params);
        assert_eq!(first.totals.total_inc_gst.to_bits(), second.totals.total_inc_gst.to_bits());
        assert_eq!(first, second);

        // Feeding updated items back in changes nothing
        let third = rollup_costs(&first.line_items, &rates, &params);
        assert_eq!(first, third);
    }

    #[test]
    fn test_equipment_duration_tiers_in_rollup() {
        let rates = sample_rates();
        let params = CommercialParams::default();
        let cost_for = |days: f64| {
            let item = LineItem::new(
                "EQ-AM",
                LineCategory::DryingEquipment,
                "Air mover",
                1.0,
                "day",
                0.0,
            )
            .with_equipment(EquipmentData {
                kind: EquipmentKind::AirMover,
                quantity: 1.0,
                duration_days: days,
            });
            rollup_costs(&[item], &rates, &params).totals.equipment
        };
        assert_eq!(cost_for(7.0), 210.0); // 7 × 30
        assert_eq!(cost_for(8.0), 360.0); // 2 weeks × 180
        assert_eq!(cost_for(30.0), 900.0); // 5 weeks × 180
        assert_eq!(cost_for(31.0), 1200.0); // 2 months × 600
    }

    #[test]
    fn test_bucket_subtotals_accessors() {
        let mut buckets = BucketSubtotals::default();
        for bucket in CostBucket::ALL {
            buckets.add(bucket, 10.0);
        }
        buckets.add(CostBucket::Waste, 5.0);
        assert_eq!(buckets.get(CostBucket::Waste), 15.0);
        assert_eq!(buckets.total(), 65.0);
    }

    #[test]
    fn test_empty_rollup_is_zero() {
        let rollup = rollup_costs(&[], &RateTable::default(), &reference_params());
        assert_eq!(rollup.totals, EstimateTotals::default());
        assert!(rollup.unattributed.is_empty());
    }
}
