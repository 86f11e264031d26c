//! Estimate line items.

use serde::{Deserialize, Serialize};

use super::rates::{equipment_hire_cost, EquipmentKind, RateTable};

/// The nine fixed estimate sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCategory {
    #[serde(rename = "Prelims & Site Setup")]
    PrelimsSiteSetup,
    #[serde(rename = "Mitigation")]
    Mitigation,
    #[serde(rename = "Drying Equipment")]
    DryingEquipment,
    #[serde(rename = "Cleaning & Decontamination")]
    CleaningDecontamination,
    #[serde(rename = "Demolition/Removal")]
    DemolitionRemoval,
    #[serde(rename = "Restoration/Build-Back")]
    RestorationBuildBack,
    #[serde(rename = "Specialist Services")]
    SpecialistServices,
    #[serde(rename = "Travel & Logistics")]
    TravelLogistics,
    #[serde(rename = "Contents")]
    Contents,
}

impl LineCategory {
    /// All categories in estimate order
    pub const ALL: [LineCategory; 9] = [
        LineCategory::PrelimsSiteSetup,
        LineCategory::Mitigation,
        LineCategory::DryingEquipment,
        LineCategory::CleaningDecontamination,
        LineCategory::DemolitionRemoval,
        LineCategory::RestorationBuildBack,
        LineCategory::SpecialistServices,
        LineCategory::TravelLogistics,
        LineCategory::Contents,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            LineCategory::PrelimsSiteSetup => "Prelims & Site Setup",
            LineCategory::Mitigation => "Mitigation",
            LineCategory::DryingEquipment => "Drying Equipment",
            LineCategory::CleaningDecontamination => "Cleaning & Decontamination",
            LineCategory::DemolitionRemoval => "Demolition/Removal",
            LineCategory::RestorationBuildBack => "Restoration/Build-Back",
            LineCategory::SpecialistServices => "Specialist Services",
            LineCategory::TravelLogistics => "Travel & Logistics",
            LineCategory::Contents => "Contents",
        }
    }
}

impl std::fmt::Display for LineCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Hire details for an equipment line, billed by the rate table's tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentData {
    /// Normalized on ingestion, e.g. "Air Mover" → `airmover`
    #[serde(rename = "type")]
    pub kind: EquipmentKind,

    pub quantity: f64,

    pub duration_days: f64,
}

/// One row of the estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "code": "EQ-LGR-85",
///   "category": "Drying Equipment",
///   "description": "LGR dehumidifier 85L/Day Ave",
///   "qty": 2.0,
///   "unit": "day",
///   "rate": 60.0,
///   "subtotal": 480.0,
///   "equipment_data": { "type": "lgrdehumidifier", "quantity": 2.0, "duration_days": 4.0 },
///   "is_scope_linked": true,
///   "is_estimator_added": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub code: String,

    pub category: LineCategory,

    pub description: String,

    pub qty: f64,

    pub unit: String,

    pub rate: f64,

    /// Recomputed by the rollup; any posted value is ignored
    #[serde(default)]
    pub subtotal: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment_data: Option<EquipmentData>,

    /// Generated from scope (areas, equipment plan) rather than typed in
    #[serde(default)]
    pub is_scope_linked: bool,

    #[serde(default)]
    pub is_estimator_added: bool,
}

impl LineItem {
    /// Create a plain `qty × rate` item
    pub fn new(
        code: impl Into<String>,
        category: LineCategory,
        description: impl Into<String>,
        qty: f64,
        unit: impl Into<String>,
        rate: f64,
    ) -> Self {
        LineItem {
            code: code.into(),
            category,
            description: description.into(),
            qty,
            unit: unit.into(),
            rate,
            subtotal: 0.0,
            equipment_data: None,
            is_scope_linked: false,
            is_estimator_added: false,
        }
    }

    /// Attach hire details (builder pattern)
    pub fn with_equipment(mut self, data: EquipmentData) -> Self {
        self.equipment_data = Some(data);
        self
    }

    /// Mark as generated from scope (builder pattern)
    pub fn scope_linked(mut self) -> Self {
        self.is_scope_linked = true;
        self
    }

    /// Mark as added by the estimator (builder pattern)
    pub fn estimator_added(mut self) -> Self {
        self.is_estimator_added = true;
        self
    }

    /// Subtotal under the given rates.
    ///
    /// Equipment lines are billed by hire tier from `rates` (0 when the kind
    /// has no rates); everything else is `qty × rate` with qty floored at 0.
    pub fn compute_subtotal(&self, rates: &RateTable) -> f64 {
        match &self.equipment_data {
            Some(data) => rates
                .equipment_rates(data.kind)
                .map(|tier_rates| {
                    equipment_hire_cost(tier_rates, data.quantity, data.duration_days)
                })
                .unwrap_or(0.0),
            None => self.qty.max(0.0) * self.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::rates::EquipmentRates;

    #[test]
    fn test_every_category_serializes_as_its_name() {
        for category in LineCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.display_name()));
            let parsed: LineCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&LineCategory::TravelLogistics).unwrap();
        assert_eq!(json, "\"Travel & Logistics\"");

        let parsed: LineCategory = serde_json::from_str("\"Demolition/Removal\"").unwrap();
        assert_eq!(parsed, LineCategory::DemolitionRemoval);
    }

    #[test]
    fn test_plain_subtotal() {
        let item = LineItem::new(
            "PRE-01",
            LineCategory::PrelimsSiteSetup,
            "Site induction",
            2.0,
            "hr",
            85.0,
        );
        assert_eq!(item.compute_subtotal(&RateTable::empty()), 170.0);

        let mut negative = item.clone();
        negative.qty = -4.0;
        assert_eq!(negative.compute_subtotal(&RateTable::empty()), 0.0);
    }

    #[test]
    fn test_equipment_subtotal_uses_rate_table() {
        let mut rates = RateTable::empty();
        rates
            .equipment
            .insert(EquipmentKind::AirMover, EquipmentRates::new(30.0, 180.0, 600.0));

        // The line's own rate is display-only for equipment
        let item = LineItem::new(
            "EQ-AM",
            LineCategory::DryingEquipment,
            "Air mover",
            3.0,
            "day",
            999.0,
        )
        .with_equipment(EquipmentData {
            kind: EquipmentKind::AirMover,
            quantity: 3.0,
            duration_days: 10.0,
        });
        // 10 days → 2 weeks × 180 × 3
        assert_eq!(item.compute_subtotal(&rates), 1080.0);

        // No rates for the kind → nothing billed
        assert_eq!(item.compute_subtotal(&RateTable::empty()), 0.0);
    }

    #[test]
    fn test_deserialize_minimal_item() {
        let json = r#"{
            "code": "TRV-01",
            "category": "Travel & Logistics",
            "description": "Travel to site",
            "qty": 42.0,
            "unit": "km",
            "rate": 0.95
        }"#;
        let item: LineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.subtotal, 0.0);
        assert!(item.equipment_data.is_none());
        assert!(!item.is_scope_linked);
    }

    #[test]
    fn test_equipment_type_normalized_on_ingestion() {
        let json = r#"{ "type": "Air Scrubber", "quantity": 1.0, "duration_days": 3.0 }"#;
        let data: EquipmentData = serde_json::from_str(json).unwrap();
        assert_eq!(data.kind, EquipmentKind::AirScrubber);
    }
}
