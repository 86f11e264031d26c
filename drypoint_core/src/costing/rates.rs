//! Rate tables: labour, subcontractor trades, equipment hire tiers and
//! chemical treatments.
//!
//! Equipment hire rates are keyed by [`EquipmentKind`], a closed set. Free
//! text from host forms ("Air Mover", "LGR dehumidifier") is normalized once
//! on ingestion (lowercased, whitespace removed) and matched against known
//! aliases; anything else becomes [`EquipmentKind::Other`], which has no rate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::line_item::{LineCategory, LineItem};

// ============================================================================
// Equipment
// ============================================================================

/// Kind of hired drying equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EquipmentKind {
    LgrDehumidifier,
    DesiccantDehumidifier,
    AirMover,
    AirScrubber,
    HeatDryer,
    MoistureMeter,
    /// Unrecognized equipment text; never priced
    Other,
}

impl EquipmentKind {
    /// All priced kinds
    pub const PRICED: [EquipmentKind; 6] = [
        EquipmentKind::LgrDehumidifier,
        EquipmentKind::DesiccantDehumidifier,
        EquipmentKind::AirMover,
        EquipmentKind::AirScrubber,
        EquipmentKind::HeatDryer,
        EquipmentKind::MoistureMeter,
    ];

    /// Canonical normalized key
    pub fn key(&self) -> &'static str {
        match self {
            EquipmentKind::LgrDehumidifier => "lgrdehumidifier",
            EquipmentKind::DesiccantDehumidifier => "desiccantdehumidifier",
            EquipmentKind::AirMover => "airmover",
            EquipmentKind::AirScrubber => "airscrubber",
            EquipmentKind::HeatDryer => "heatdryer",
            EquipmentKind::MoistureMeter => "moisturemeter",
            EquipmentKind::Other => "other",
        }
    }

    /// Parse free text: lowercase, strip whitespace, then match aliases
    pub fn from_str_flexible(s: &str) -> Self {
        match normalize_key(s).as_str() {
            "lgrdehumidifier" | "lgr" | "dehumidifier" | "lgr-dehumidifier" => {
                EquipmentKind::LgrDehumidifier
            }
            "desiccantdehumidifier" | "desiccant" | "desiccant-dehumidifier" => {
                EquipmentKind::DesiccantDehumidifier
            }
            "airmover" | "air-mover" | "axialairmover" | "centrifugalairmover" | "fan" => {
                EquipmentKind::AirMover
            }
            "airscrubber" | "air-scrubber" | "afd" | "hepaairscrubber" | "negativeairmachine" => {
                EquipmentKind::AirScrubber
            }
            "heatdryer" | "heatdryingunit" | "heater" | "heat" => EquipmentKind::HeatDryer,
            "moisturemeter" | "moisture-meter" => EquipmentKind::MoistureMeter,
            _ => EquipmentKind::Other,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            EquipmentKind::LgrDehumidifier => "LGR Dehumidifier",
            EquipmentKind::DesiccantDehumidifier => "Desiccant Dehumidifier",
            EquipmentKind::AirMover => "Air Mover",
            EquipmentKind::AirScrubber => "Air Scrubber",
            EquipmentKind::HeatDryer => "Heat Drying Unit",
            EquipmentKind::MoistureMeter => "Moisture Meter",
            EquipmentKind::Other => "Other Equipment",
        }
    }
}

impl From<String> for EquipmentKind {
    fn from(s: String) -> Self {
        EquipmentKind::from_str_flexible(&s)
    }
}

impl From<EquipmentKind> for String {
    fn from(kind: EquipmentKind) -> Self {
        kind.key().to_string()
    }
}

impl std::fmt::Display for EquipmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Lowercase with all whitespace removed
pub fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Hire rates per unit for each billing period
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EquipmentRates {
    pub day: f64,
    pub week: f64,
    pub month: f64,
}

impl EquipmentRates {
    pub fn new(day: f64, week: f64, month: f64) -> Self {
        EquipmentRates { day, week, month }
    }
}

/// Billing period chosen from the hire duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HireTier {
    /// Up to and including 7 days
    Daily,
    /// Over 7 and up to 30 days, billed per started week
    Weekly,
    /// Over 30 days, billed per started 30-day month
    Monthly,
}

impl HireTier {
    pub fn for_duration(duration_days: f64) -> Self {
        if duration_days <= 7.0 {
            HireTier::Daily
        } else if duration_days <= 30.0 {
            HireTier::Weekly
        } else {
            HireTier::Monthly
        }
    }
}

/// Hire cost for `quantity` units over `duration_days`.
///
/// Quantity is floored at 0. Negative durations fall in the daily tier and
/// propagate as-is; a non-finite duration costs nothing.
pub fn equipment_hire_cost(rates: &EquipmentRates, quantity: f64, duration_days: f64) -> f64 {
    let quantity = quantity.max(0.0);
    if !duration_days.is_finite() {
        return 0.0;
    }
    match HireTier::for_duration(duration_days) {
        HireTier::Daily => rates.day * quantity * duration_days,
        HireTier::Weekly => rates.week * quantity * (duration_days / 7.0).ceil(),
        HireTier::Monthly => rates.month * quantity * (duration_days / 30.0).ceil(),
    }
}

// ============================================================================
// Labour, trades and chemicals
// ============================================================================

/// In-house labour role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabourRole {
    Technician,
    Supervisor,
    Labourer,
    Admin,
}

impl LabourRole {
    fn code(&self) -> &'static str {
        match self {
            LabourRole::Technician => "TECH",
            LabourRole::Supervisor => "SUPV",
            LabourRole::Labourer => "LABR",
            LabourRole::Admin => "ADMN",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LabourRole::Technician => "Technician",
            LabourRole::Supervisor => "Supervisor",
            LabourRole::Labourer => "Labourer",
            LabourRole::Admin => "Admin",
        }
    }
}

/// Hourly labour rates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabourRate {
    pub normal_hourly: f64,
    pub after_hours_hourly: f64,
}

/// Subcontracted trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trade {
    Electrician,
    Plumber,
    Hygienist,
    Asbestos,
    Carpenter,
    Roofer,
}

impl Trade {
    fn code(&self) -> &'static str {
        match self {
            Trade::Electrician => "ELEC",
            Trade::Plumber => "PLMB",
            Trade::Hygienist => "HYGN",
            Trade::Asbestos => "ASBS",
            Trade::Carpenter => "CARP",
            Trade::Roofer => "ROOF",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Trade::Electrician => "Electrician",
            Trade::Plumber => "Plumber",
            Trade::Hygienist => "Hygienist",
            Trade::Asbestos => "Asbestos removalist",
            Trade::Carpenter => "Carpenter",
            Trade::Roofer => "Roofer",
        }
    }
}

/// Chemical treatment applied per square metre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalTreatment {
    AntiMicrobial,
    BioDecontamination,
    MouldRemediation,
    OdourControl,
}

impl ChemicalTreatment {
    fn code(&self) -> &'static str {
        match self {
            ChemicalTreatment::AntiMicrobial => "AM",
            ChemicalTreatment::BioDecontamination => "BIO",
            ChemicalTreatment::MouldRemediation => "MOULD",
            ChemicalTreatment::OdourControl => "ODOUR",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ChemicalTreatment::AntiMicrobial => "Anti-microbial treatment",
            ChemicalTreatment::BioDecontamination => "Bio-decontamination treatment",
            ChemicalTreatment::MouldRemediation => "Mould remediation treatment",
            ChemicalTreatment::OdourControl => "Odour control treatment",
        }
    }
}

// ============================================================================
// Rate table
// ============================================================================

/// Operator-editable rate table, seeded with defaults.
///
/// ## JSON Example
///
/// ```json
/// {
///   "labour": { "technician": { "normal_hourly": 95.0, "after_hours_hourly": 142.5 } },
///   "subcontractors": { "electrician": 125.0 },
///   "equipment": { "airmover": { "day": 30.0, "week": 180.0, "month": 600.0 } },
///   "chemicals": { "anti_microbial": 4.5 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(default)]
    pub labour: BTreeMap<LabourRole, LabourRate>,

    /// Hourly rate per trade
    #[serde(default)]
    pub subcontractors: BTreeMap<Trade, f64>,

    #[serde(default)]
    pub equipment: BTreeMap<EquipmentKind, EquipmentRates>,

    /// Rate per m² per treatment
    #[serde(default)]
    pub chemicals: BTreeMap<ChemicalTreatment, f64>,
}

impl RateTable {
    /// A table with no rates at all
    pub fn empty() -> Self {
        RateTable {
            labour: BTreeMap::new(),
            subcontractors: BTreeMap::new(),
            equipment: BTreeMap::new(),
            chemicals: BTreeMap::new(),
        }
    }

    /// Hire rates for a kind, if configured
    pub fn equipment_rates(&self, kind: EquipmentKind) -> Option<&EquipmentRates> {
        self.equipment.get(&kind)
    }

    /// Labour line priced from this table (0 if the role has no rate)
    pub fn labour_item(&self, role: LabourRole, hours: f64, after_hours: bool) -> LineItem {
        let rate = self.labour.get(&role).copied().unwrap_or_default();
        let (suffix, hourly, period) = if after_hours {
            ("AH", rate.after_hours_hourly, "after hours")
        } else {
            ("NH", rate.normal_hourly, "normal hours")
        };
        LineItem::new(
            format!("LAB-{}-{}", role.code(), suffix),
            LineCategory::Mitigation,
            format!("{} - {}", role.display_name(), period),
            hours,
            "hr",
            hourly,
        )
        .estimator_added()
    }

    /// Subcontractor line priced from this table
    pub fn subcontractor_item(&self, trade: Trade, hours: f64) -> LineItem {
        let hourly = self.subcontractors.get(&trade).copied().unwrap_or(0.0);
        LineItem::new(
            format!("SUB-{}", trade.code()),
            LineCategory::SpecialistServices,
            trade.display_name(),
            hours,
            "hr",
            hourly,
        )
        .estimator_added()
    }

    /// Chemical treatment line over `area_m2`
    pub fn chemical_item(&self, treatment: ChemicalTreatment, area_m2: f64) -> LineItem {
        let per_m2 = self.chemicals.get(&treatment).copied().unwrap_or(0.0);
        LineItem::new(
            format!("CHEM-{}", treatment.code()),
            LineCategory::CleaningDecontamination,
            treatment.display_name(),
            area_m2,
            "m²",
            per_m2,
        )
        .estimator_added()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        let labour = [
            (LabourRole::Technician, 95.0, 142.5),
            (LabourRole::Supervisor, 120.0, 180.0),
            (LabourRole::Labourer, 70.0, 105.0),
            (LabourRole::Admin, 65.0, 97.5),
        ]
        .into_iter()
        .map(|(role, normal_hourly, after_hours_hourly)| {
            (
                role,
                LabourRate {
                    normal_hourly,
                    after_hours_hourly,
                },
            )
        })
        .collect();

        let subcontractors = [
            (Trade::Electrician, 125.0),
            (Trade::Plumber, 130.0),
            (Trade::Hygienist, 180.0),
            (Trade::Asbestos, 160.0),
            (Trade::Carpenter, 95.0),
            (Trade::Roofer, 110.0),
        ]
        .into_iter()
        .collect();

        let equipment = [
            (EquipmentKind::LgrDehumidifier, EquipmentRates::new(60.0, 360.0, 1200.0)),
            (EquipmentKind::DesiccantDehumidifier, EquipmentRates::new(95.0, 570.0, 1900.0)),
            (EquipmentKind::AirMover, EquipmentRates::new(30.0, 180.0, 600.0)),
            (EquipmentKind::AirScrubber, EquipmentRates::new(80.0, 480.0, 1600.0)),
            (EquipmentKind::HeatDryer, EquipmentRates::new(150.0, 900.0, 3000.0)),
            (EquipmentKind::MoistureMeter, EquipmentRates::new(15.0, 90.0, 300.0)),
        ]
        .into_iter()
        .collect();

        let chemicals = [
            (ChemicalTreatment::AntiMicrobial, 4.5),
            (ChemicalTreatment::BioDecontamination, 8.0),
            (ChemicalTreatment::MouldRemediation, 12.0),
            (ChemicalTreatment::OdourControl, 3.0),
        ]
        .into_iter()
        .collect();

        RateTable {
            labour,
            subcontractors,
            equipment,
            chemicals,
        }
    }
}
