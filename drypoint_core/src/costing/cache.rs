//! Memoized rollup.
//!
//! Hosts that re-render on every keystroke call the rollup with the same
//! inputs many times. [`RollupCache`] keeps the last inputs and result and
//! recomputes only when the inputs differ by value. Floats compare by bit
//! pattern, so a NaN left by an empty form field still matches itself.

use std::collections::BTreeMap;

use super::line_item::{EquipmentData, LineItem};
use super::params::CommercialParams;
use super::rates::{EquipmentRates, LabourRate, RateTable};
use super::rollup::{rollup_costs, CostRollup};

/// Content equality for cache keys, exact on floats
trait SameInput {
    fn same_input(&self, other: &Self) -> bool;
}

impl SameInput for f64 {
    fn same_input(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl<T: SameInput> SameInput for Option<T> {
    fn same_input(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_input(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: SameInput> SameInput for [T] {
    fn same_input(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_input(b))
    }
}

impl<K: Ord, V: SameInput> SameInput for BTreeMap<K, V> {
    fn same_input(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other)
                .all(|((ka, va), (kb, vb))| ka == kb && va.same_input(vb))
    }
}

impl SameInput for EquipmentData {
    fn same_input(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.quantity.same_input(&other.quantity)
            && self.duration_days.same_input(&other.duration_days)
    }
}

impl SameInput for LineItem {
    fn same_input(&self, other: &Self) -> bool {
        self.code == other.code
            && self.category == other.category
            && self.description == other.description
            && self.unit == other.unit
            && self.is_scope_linked == other.is_scope_linked
            && self.is_estimator_added == other.is_estimator_added
            && self.qty.same_input(&other.qty)
            && self.rate.same_input(&other.rate)
            && self.subtotal.same_input(&other.subtotal)
            && self.equipment_data.same_input(&other.equipment_data)
    }
}

impl SameInput for LabourRate {
    fn same_input(&self, other: &Self) -> bool {
        self.normal_hourly.same_input(&other.normal_hourly)
            && self.after_hours_hourly.same_input(&other.after_hours_hourly)
    }
}

impl SameInput for EquipmentRates {
    fn same_input(&self, other: &Self) -> bool {
        self.day.same_input(&other.day)
            && self.week.same_input(&other.week)
            && self.month.same_input(&other.month)
    }
}

impl SameInput for RateTable {
    fn same_input(&self, other: &Self) -> bool {
        self.labour.same_input(&other.labour)
            && self.subcontractors.same_input(&other.subcontractors)
            && self.equipment.same_input(&other.equipment)
            && self.chemicals.same_input(&other.chemicals)
    }
}

impl SameInput for CommercialParams {
    fn same_input(&self, other: &Self) -> bool {
        self.profit_applied_after == other.profit_applied_after
            && self.round_to == other.round_to
            && self.overheads_percent.same_input(&other.overheads_percent)
            && self.profit_percent.same_input(&other.profit_percent)
            && self.contingency_percent.same_input(&other.contingency_percent)
            && self.escalation_percent.same_input(&other.escalation_percent)
            && self.gst_percent.same_input(&other.gst_percent)
    }
}

#[derive(Debug, Clone)]
struct CachedRollup {
    line_items: Vec<LineItem>,
    rates: RateTable,
    params: CommercialParams,
    result: CostRollup,
}

impl CachedRollup {
    fn matches(
        &self,
        line_items: &[LineItem],
        rates: &RateTable,
        params: &CommercialParams,
    ) -> bool {
        self.params.same_input(params)
            && self.line_items.same_input(line_items)
            && self.rates.same_input(rates)
    }
}

/// Single-entry memo of [`rollup_costs`]
#[derive(Debug, Clone, Default)]
pub struct RollupCache {
    cached: Option<CachedRollup>,
    computations: u64,
}

impl RollupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rollup for the given inputs, reusing the previous result when the
    /// inputs are equal to the last call's.
    pub fn rollup(
        &mut self,
        line_items: &[LineItem],
        rates: &RateTable,
        params: &CommercialParams,
    ) -> &CostRollup {
        let cached = match self.cached.take() {
            Some(hit) if hit.matches(line_items, rates, params) => {
                tracing::trace!("rollup cache hit");
                hit
            }
            _ => {
                self.computations += 1;
                tracing::trace!(computations = self.computations, "rollup cache miss");
                CachedRollup {
                    line_items: line_items.to_vec(),
                    rates: rates.clone(),
                    params: *params,
                    result: rollup_costs(line_items, rates, params),
                }
            }
        };
        &self.cached.insert(cached).result
    }

    /// Number of rollups actually computed
    pub fn computations(&self) -> u64 {
        self.computations
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
