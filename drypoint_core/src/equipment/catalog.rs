//! Equipment Catalog
//!
//! Static reference data for the drying equipment a crew can deploy,
//! grouped by family and capacity. Groups are identified by a stable id
//! (e.g. `lgr-85`); the capacity label is kept for display while the
//! numeric capacity is an explicit field.
//!
//! ## Standard Groups
//!
//! | id                   | family    | capacity       | airflow  |
//! |----------------------|-----------|----------------|----------|
//! | lgr-55 .. lgr-135    | LGR       | 55–135 L/day   |          |
//! | desiccant-120/200    | Desiccant | 120/200 L/day  |          |
//! | airmover-lowprofile  | AirMover  |                | 900 CFM  |
//! | airmover-centrifugal | AirMover  |                | 1500 CFM |
//! | airmover-axial       | AirMover  |                | 2800 CFM |
//! | heat-3kw, heat-10kw  | Heat      | 3/10 kW        |          |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::costing::rates::EquipmentKind;
use crate::errors::{EstimateError, EstimateResult};
use crate::units::{AirMoverUnits, Cfm};

/// Equipment family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentFamily {
    Lgr,
    Desiccant,
    AirMover,
    Heat,
}

impl EquipmentFamily {
    pub const ALL: [EquipmentFamily; 4] = [
        EquipmentFamily::Lgr,
        EquipmentFamily::Desiccant,
        EquipmentFamily::AirMover,
        EquipmentFamily::Heat,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            EquipmentFamily::Lgr => "LGR dehumidifier",
            EquipmentFamily::Desiccant => "Desiccant dehumidifier",
            EquipmentFamily::AirMover => "Air mover",
            EquipmentFamily::Heat => "Heat drying unit",
        }
    }

    /// Rate-table kind used to bill this family
    pub fn kind(&self) -> EquipmentKind {
        match self {
            EquipmentFamily::Lgr => EquipmentKind::LgrDehumidifier,
            EquipmentFamily::Desiccant => EquipmentKind::DesiccantDehumidifier,
            EquipmentFamily::AirMover => EquipmentKind::AirMover,
            EquipmentFamily::Heat => EquipmentKind::HeatDryer,
        }
    }

    /// Whether capacity is a water removal rate (L/day)
    pub fn removes_water(&self) -> bool {
        matches!(self, EquipmentFamily::Lgr | EquipmentFamily::Desiccant)
    }
}

/// Tier a tenant's pricing configuration assigns a daily rate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingTier {
    LgrDehumidifier,
    DesiccantDehumidifier,
    AirMoverAxial,
    AirMoverCentrifugal,
    AirMoverLowProfile,
    HeatDrying,
}

/// A catalog entry: one family at one capacity.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "lgr-85",
///   "family": "Lgr",
///   "capacity_label": "85L/Day Ave",
///   "capacity": 85.0,
///   "amps": 6.5,
///   "model_count": 4,
///   "airflow": null,
///   "tier": "lgr_dehumidifier"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentGroup {
    pub id: String,

    pub family: EquipmentFamily,

    /// Display label, e.g. "85L/Day Ave"
    pub capacity_label: String,

    /// L/day for dehumidifiers, kW for heat; `None` when unknown
    pub capacity: Option<f64>,

    /// Current draw per unit
    pub amps: f64,

    /// Number of models stocked in this group
    pub model_count: u32,

    /// Air movers only
    pub airflow: Option<Cfm>,

    pub tier: PricingTier,
}

impl EquipmentGroup {
    /// Build a group whose capacity comes from the first integer in its label.
    pub fn from_label(
        id: impl Into<String>,
        family: EquipmentFamily,
        capacity_label: impl Into<String>,
        amps: f64,
        model_count: u32,
        airflow: Option<Cfm>,
        tier: PricingTier,
    ) -> Self {
        let capacity_label = capacity_label.into();
        EquipmentGroup {
            id: id.into(),
            family,
            capacity: parse_capacity_label(&capacity_label),
            capacity_label,
            amps,
            model_count,
            airflow,
            tier,
        }
    }

    pub fn kind(&self) -> EquipmentKind {
        self.family.kind()
    }

    /// Capacity when it is usable for planning (finite and positive)
    pub fn usable_capacity(&self) -> Option<f64> {
        self.capacity.filter(|c| c.is_finite() && *c > 0.0)
    }

    /// Air-mover equivalents of one unit, `None` without a usable airflow
    pub fn air_mover_units(&self) -> Option<AirMoverUnits> {
        self.airflow
            .filter(|cfm| cfm.0.is_finite() && cfm.0 > 0.0)
            .map(AirMoverUnits::from)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.family.display_name(), self.capacity_label)
    }
}

/// First integer substring of a label, e.g. "85L/Day Ave" → 85.
///
/// Only the leading run of digits counts, so "1,500 CFM" parses as 1.
pub fn parse_capacity_label(label: &str) -> Option<f64> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().ok().map(|n| n as f64)
}

/// A set of equipment groups, in catalog order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    groups: Vec<EquipmentGroup>,
}

static STANDARD_CATALOG: Lazy<EquipmentCatalog> = Lazy::new(|| {
    use EquipmentFamily::*;
    use PricingTier::*;

    let rated = |id: &str, family, label: &str, capacity: f64, amps: f64, models, tier| {
        EquipmentGroup {
            id: id.to_string(),
            family,
            capacity_label: label.to_string(),
            capacity: Some(capacity),
            amps,
            model_count: models,
            airflow: None,
            tier,
        }
    };
    let air_mover = |id: &str, label: &str, cfm: f64, amps: f64, models: u32, tier| EquipmentGroup {
        id: id.to_string(),
        family: AirMover,
        capacity_label: label.to_string(),
        capacity: None,
        amps,
        model_count: models,
        airflow: Some(Cfm(cfm)),
        tier,
    };

    EquipmentCatalog::new(vec![
        rated("lgr-55", Lgr, "55L/Day Ave", 55.0, 4.5, 3, LgrDehumidifier),
        rated("lgr-85", Lgr, "85L/Day Ave", 85.0, 6.5, 4, LgrDehumidifier),
        rated("lgr-105", Lgr, "105L/Day Ave", 105.0, 7.5, 2, LgrDehumidifier),
        rated("lgr-135", Lgr, "135L/Day Ave", 135.0, 8.5, 2, LgrDehumidifier),
        rated("desiccant-120", Desiccant, "120L/Day", 120.0, 10.0, 1, DesiccantDehumidifier),
        rated("desiccant-200", Desiccant, "200L/Day", 200.0, 15.0, 1, DesiccantDehumidifier),
        air_mover("airmover-lowprofile", "900 CFM Low Profile", 900.0, 1.5, 2, AirMoverLowProfile),
        air_mover(
            "airmover-centrifugal",
            "1500 CFM Centrifugal",
            1500.0,
            2.3,
            3,
            AirMoverCentrifugal,
        ),
        air_mover("airmover-axial", "2800 CFM Axial", 2800.0, 3.0, 2, AirMoverAxial),
        rated("heat-3kw", Heat, "3kW", 3.0, 13.0, 1, HeatDrying),
        rated("heat-10kw", Heat, "10kW", 10.0, 15.0, 1, HeatDrying),
    ])
});

impl EquipmentCatalog {
    pub fn new(groups: Vec<EquipmentGroup>) -> Self {
        EquipmentCatalog { groups }
    }

    /// The built-in catalog
    pub fn standard() -> &'static EquipmentCatalog {
        &STANDARD_CATALOG
    }

    pub fn groups(&self) -> &[EquipmentGroup] {
        &self.groups
    }

    pub fn get(&self, group_id: &str) -> Option<&EquipmentGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// Like [`get`](Self::get), for hosts that must reject unknown ids
    pub fn require(&self, group_id: &str) -> EstimateResult<&EquipmentGroup> {
        self.get(group_id).ok_or_else(|| EstimateError::unknown_group(group_id))
    }

    pub fn by_family(&self, family: EquipmentFamily) -> impl Iterator<Item = &EquipmentGroup> {
        self.groups.iter().filter(move |g| g.family == family)
    }
}
