//! # Job Data Structures
//!
//! The `Job` struct is the root container for one water-damage site.
//! Jobs serialize to `.dpj` (Drypoint job) files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Job
//! ├── meta: JobMetadata (version, technician, claim, timestamps)
//! ├── settings: JobSettings (water class, system, drying days, rates, markups)
//! ├── areas: Vec<ScopeArea> (room measurements)
//! ├── environment: Option<EnvironmentReading> (latest site reading)
//! ├── equipment: EquipmentPlan (selected equipment groups)
//! ├── line_items: Vec<LineItem> (the estimate rows)
//! └── snapshots: Vec<EstimateSnapshot> (estimates as issued)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drypoint_core::equipment::EquipmentCatalog;
//! use drypoint_core::job::Job;
//! use drypoint_core::scope::ScopeArea;
//!
//! let mut job = Job::new("Sam Technician", "CLM-2291", "Harbour Insurance");
//! job.add_area(ScopeArea::new("Lounge", 5.0, 4.0, 2.5, 100.0));
//!
//! let catalog = EquipmentCatalog::standard();
//! job.auto_plan_equipment(catalog);
//! job.sync_equipment_line_items(catalog);
//!
//! let rollup = job.rollup();
//! assert!(rollup.totals.equipment > 0.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classification::{SystemType, WaterClass};
use crate::costing::{
    rollup_costs, CommercialParams, CostRollup, EstimateTotals, LineItem, RateTable, RollupCache,
};
use crate::equipment::{EquipmentCatalog, EquipmentPlan, EquipmentSelection, PricingConfig};
use crate::psychrometrics::{compute_drying_potential, DryingPotential, DryingPotentialInput};
use crate::scope::{aggregate_scope, ScopeArea, ScopeTotals};
use crate::targets::{targets_for_scope, DryingTargets};
use crate::units::Celsius;

/// Current schema version for .dpj files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Drying duration used when none is configured
pub const DEFAULT_DRYING_DAYS: f64 = 4.0;

/// Root job container.
///
/// This is the top-level struct that gets serialized to `.dpj` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub meta: JobMetadata,

    pub settings: JobSettings,

    /// Room measurements, in entry order
    #[serde(default)]
    pub areas: Vec<ScopeArea>,

    #[serde(default)]
    pub environment: Option<EnvironmentReading>,

    #[serde(default)]
    pub equipment: EquipmentPlan,

    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Issued estimates; each owns a copy of its inputs
    #[serde(default)]
    pub snapshots: Vec<EstimateSnapshot>,
}

impl Job {
    /// Create a new empty job.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drypoint_core::job::Job;
    ///
    /// let job = Job::new("Sam Technician", "CLM-2291", "Harbour Insurance");
    /// assert_eq!(job.meta.claim_number, "CLM-2291");
    /// assert!(job.areas.is_empty());
    /// ```
    pub fn new(
        technician: impl Into<String>,
        claim_number: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Job {
            meta: JobMetadata {
                version: SCHEMA_VERSION.to_string(),
                technician: technician.into(),
                claim_number: claim_number.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: JobSettings::default(),
            areas: Vec::new(),
            environment: None,
            equipment: EquipmentPlan::default(),
            line_items: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    /// Add a room. Returns the area's id.
    pub fn add_area(&mut self, area: ScopeArea) -> Uuid {
        let id = area.id;
        self.areas.push(area);
        self.touch();
        id
    }

    /// Replace the area with the same id, returning the previous version.
    ///
    /// Returns `None` (and changes nothing) when no area has that id.
    pub fn update_area(&mut self, area: ScopeArea) -> Option<ScopeArea> {
        let slot = self.areas.iter_mut().find(|a| a.id == area.id)?;
        let previous = std::mem::replace(slot, area);
        self.touch();
        Some(previous)
    }

    pub fn remove_area(&mut self, id: &Uuid) -> Option<ScopeArea> {
        let pos = self.areas.iter().position(|a| a.id == *id)?;
        let removed = self.areas.remove(pos);
        self.touch();
        Some(removed)
    }

    pub fn get_area(&self, id: &Uuid) -> Option<&ScopeArea> {
        self.areas.iter().find(|a| a.id == *id)
    }

    pub fn scope_totals(&self) -> ScopeTotals {
        aggregate_scope(&self.areas)
    }

    pub fn targets(&self) -> DryingTargets {
        targets_for_scope(&self.scope_totals(), self.settings.water_class)
    }

    /// Record the latest temperature/humidity reading on site
    pub fn record_environment(&mut self, temperature: Celsius, humidity_percent: f64) {
        self.environment = Some(EnvironmentReading {
            temperature,
            humidity_percent,
            recorded_at: Utc::now(),
        });
        self.touch();
    }

    /// Drying potential of the latest reading, if one was recorded
    pub fn drying_potential(&self) -> Option<DryingPotential> {
        self.environment.as_ref().map(|reading| {
            compute_drying_potential(&DryingPotentialInput {
                water_class: self.settings.water_class,
                temperature: reading.temperature,
                humidity_percent: reading.humidity_percent,
                system_type: self.settings.system_type,
            })
        })
    }

    /// Replace the equipment plan with an auto-selection for the current scope
    pub fn auto_plan_equipment(&mut self, catalog: &EquipmentCatalog) {
        let targets = self.targets();
        self.equipment.auto_select(&targets, catalog, self.settings.pricing.as_ref());
        tracing::debug!(
            claim = %self.meta.claim_number,
            water_removal_target = targets.water_removal_target.0,
            air_movers_required = targets.air_movers_required,
            selections = self.equipment.selections.len(),
            "auto-planned equipment"
        );
        self.touch();
    }

    /// Regenerate the equipment hire lines from the plan.
    ///
    /// Scope-linked hire lines from a previous sync are replaced; hire lines
    /// the estimator added by hand are kept.
    pub fn sync_equipment_line_items(&mut self, catalog: &EquipmentCatalog) {
        self.line_items.retain(|item| {
            !(item.is_scope_linked && item.equipment_data.is_some() && !item.is_estimator_added)
        });
        let generated = self.equipment.line_items(catalog, self.settings.drying_days);
        self.line_items.extend(generated);
        self.touch();
    }

    pub fn add_line_item(&mut self, item: LineItem) {
        self.line_items.push(item);
        self.touch();
    }

    /// Cost rollup of the current line items
    pub fn rollup(&self) -> CostRollup {
        rollup_costs(&self.line_items, &self.settings.rates, &self.settings.commercial)
    }

    /// Cost rollup through a cache, for hosts that recompute on every edit
    pub fn rollup_with<'c>(&self, cache: &'c mut RollupCache) -> &'c CostRollup {
        cache.rollup(&self.line_items, &self.settings.rates, &self.settings.commercial)
    }

    /// Capture the current estimate. Returns the snapshot's id.
    pub fn take_snapshot(&mut self, label: impl Into<String>) -> Uuid {
        let rollup = self.rollup();
        let snapshot = EstimateSnapshot {
            id: Uuid::new_v4(),
            label: label.into(),
            taken_at: Utc::now(),
            areas: self.areas.clone(),
            selections: self.equipment.selections.clone(),
            line_items: rollup.line_items,
            totals: rollup.totals,
        };
        let id = snapshot.id;
        tracing::info!(
            claim = %self.meta.claim_number,
            total_inc_gst = snapshot.totals.total_inc_gst,
            "estimate snapshot taken"
        );
        self.snapshots.push(snapshot);
        self.touch();
        id
    }

    pub fn get_snapshot(&self, id: &Uuid) -> Option<&EstimateSnapshot> {
        self.snapshots.iter().find(|s| s.id == *id)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Job {
    fn default() -> Self {
        Job::new("", "", "")
    }
}

/// Job metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Technician responsible for the site
    pub technician: String,

    /// Insurance claim or work order number
    pub claim_number: String,

    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Per-job settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSettings {
    pub water_class: WaterClass,

    pub system_type: SystemType,

    /// Planned hire duration for equipment lines
    pub drying_days: f64,

    #[serde(default)]
    pub commercial: CommercialParams,

    #[serde(default)]
    pub rates: RateTable,

    /// Tenant pricing; without it equipment is planned at $0/day
    #[serde(default)]
    pub pricing: Option<PricingConfig>,
}

impl Default for JobSettings {
    fn default() -> Self {
        JobSettings {
            water_class: WaterClass::default(),
            system_type: SystemType::default(),
            drying_days: DEFAULT_DRYING_DAYS,
            commercial: CommercialParams::default(),
            rates: RateTable::default(),
            pricing: None,
        }
    }
}

/// A temperature/humidity reading taken on site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentReading {
    pub temperature: Celsius,
    pub humidity_percent: f64,
    pub recorded_at: DateTime<Utc>,
}

/// An issued estimate. Later edits to the job do not affect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateSnapshot {
    pub id: Uuid,
    pub label: String,
    pub taken_at: DateTime<Utc>,
    pub areas: Vec<ScopeArea>,
    pub selections: Vec<EquipmentSelection>,
    pub line_items: Vec<LineItem>,
    pub totals: EstimateTotals,
}
