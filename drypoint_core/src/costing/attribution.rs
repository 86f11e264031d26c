//! Cost-bucket attribution.
//!
//! Each line item is attributed to at most one of six cost buckets by an
//! ordered rule list; the first rule that matches wins:
//!
//! 1. code prefix: `LAB-` labour, `EQ-` equipment, `CHEM-` chemicals
//! 2. hire details present: equipment
//! 3. category: Specialist Services → subcontractor, Travel & Logistics → travel
//! 4. description keywords (lower-cased), checked bucket by bucket in the
//!    order labour, equipment, chemicals, subcontractor, travel, waste
//! 5. category fallback: Prelims & Site Setup → labour,
//!    Restoration/Build-Back → subcontractor
//!
//! Items matching no rule land in no bucket.

use serde::{Deserialize, Serialize};

use super::line_item::{LineCategory, LineItem};

/// Cost bucket a line item rolls up into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBucket {
    Labour,
    Equipment,
    Chemicals,
    Subcontractor,
    Travel,
    Waste,
}

impl CostBucket {
    pub const ALL: [CostBucket; 6] = [
        CostBucket::Labour,
        CostBucket::Equipment,
        CostBucket::Chemicals,
        CostBucket::Subcontractor,
        CostBucket::Travel,
        CostBucket::Waste,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            CostBucket::Labour => "Labour",
            CostBucket::Equipment => "Equipment",
            CostBucket::Chemicals => "Chemicals",
            CostBucket::Subcontractor => "Subcontractors",
            CostBucket::Travel => "Travel",
            CostBucket::Waste => "Waste",
        }
    }
}

const LABOUR_KEYWORDS: &[&str] = &["technician", "supervisor", "labourer", "admin"];
const EQUIPMENT_KEYWORDS: &[&str] = &[
    "dehumidifier",
    "air mover",
    "air scrubber",
    "moisture meter",
    "equipment",
];
const CHEMICAL_KEYWORDS: &[&str] = &[
    "chemical",
    "anti-microbial",
    "bio-decontamination",
    "mould remediation",
    "odor control",
];
const SUBCONTRACTOR_KEYWORDS: &[&str] = &[
    "electrician",
    "plumber",
    "hygienist",
    "asbestos",
    "carpenter",
    "roofer",
    "subcontractor",
];
const TRAVEL_KEYWORDS: &[&str] = &["travel", "parking", "tolls", "km"];
const WASTE_KEYWORDS: &[&str] = &["disposal", "tip fee"];

/// Line item as seen by the rules, with the description lower-cased once
pub struct ItemView<'a> {
    pub item: &'a LineItem,
    pub description: String,
}

impl<'a> ItemView<'a> {
    pub fn new(item: &'a LineItem) -> Self {
        ItemView {
            item,
            description: item.description.to_lowercase(),
        }
    }

    fn mentions_any(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.description.contains(k))
    }
}

/// A named predicate mapping matching items to a bucket
pub struct AttributionRule {
    pub name: &'static str,
    pub bucket: CostBucket,
    pub applies: fn(&ItemView<'_>) -> bool,
}

const fn rule(
    name: &'static str,
    bucket: CostBucket,
    applies: fn(&ItemView<'_>) -> bool,
) -> AttributionRule {
    AttributionRule {
        name,
        bucket,
        applies,
    }
}

fn code_labour(v: &ItemView<'_>) -> bool {
    v.item.code.starts_with("LAB-")
}

fn code_equipment(v: &ItemView<'_>) -> bool {
    v.item.code.starts_with("EQ-")
}

fn code_chemicals(v: &ItemView<'_>) -> bool {
    v.item.code.starts_with("CHEM-")
}

fn has_equipment_data(v: &ItemView<'_>) -> bool {
    v.item.equipment_data.is_some()
}

fn category_specialist(v: &ItemView<'_>) -> bool {
    v.item.category == LineCategory::SpecialistServices
}

fn category_travel(v: &ItemView<'_>) -> bool {
    v.item.category == LineCategory::TravelLogistics
}

fn keyword_labour(v: &ItemView<'_>) -> bool {
    v.mentions_any(LABOUR_KEYWORDS)
}

fn keyword_equipment(v: &ItemView<'_>) -> bool {
    v.mentions_any(EQUIPMENT_KEYWORDS)
}

fn keyword_chemicals(v: &ItemView<'_>) -> bool {
    v.mentions_any(CHEMICAL_KEYWORDS)
}

fn keyword_subcontractor(v: &ItemView<'_>) -> bool {
    v.mentions_any(SUBCONTRACTOR_KEYWORDS)
}

fn keyword_travel(v: &ItemView<'_>) -> bool {
    v.mentions_any(TRAVEL_KEYWORDS)
}

// "waste" alone only counts on demolition lines
fn keyword_waste(v: &ItemView<'_>) -> bool {
    v.mentions_any(WASTE_KEYWORDS)
        || (v.description.contains("waste") && v.item.category == LineCategory::DemolitionRemoval)
}

fn category_prelims(v: &ItemView<'_>) -> bool {
    v.item.category == LineCategory::PrelimsSiteSetup
}

fn category_build_back(v: &ItemView<'_>) -> bool {
    v.item.category == LineCategory::RestorationBuildBack
}

/// Attribution rules in priority order
pub static ATTRIBUTION_RULES: [AttributionRule; 14] = [
    rule("code-prefix-labour", CostBucket::Labour, code_labour),
    rule("code-prefix-equipment", CostBucket::Equipment, code_equipment),
    rule("code-prefix-chemicals", CostBucket::Chemicals, code_chemicals),
    rule("equipment-data", CostBucket::Equipment, has_equipment_data),
    rule("category-specialist-services", CostBucket::Subcontractor, category_specialist),
    rule("category-travel-logistics", CostBucket::Travel, category_travel),
    rule("keyword-labour", CostBucket::Labour, keyword_labour),
    rule("keyword-equipment", CostBucket::Equipment, keyword_equipment),
    rule("keyword-chemicals", CostBucket::Chemicals, keyword_chemicals),
    rule("keyword-subcontractor", CostBucket::Subcontractor, keyword_subcontractor),
    rule("keyword-travel", CostBucket::Travel, keyword_travel),
    rule("keyword-waste", CostBucket::Waste, keyword_waste),
    rule("category-prelims-fallback", CostBucket::Labour, category_prelims),
    rule("category-build-back-fallback", CostBucket::Subcontractor, category_build_back),
];

/// First matching rule for an item
pub fn matching_rule(item: &LineItem) -> Option<&'static AttributionRule> {
    let view = ItemView::new(item);
    ATTRIBUTION_RULES.iter().find(|rule| (rule.applies)(&view))
}

/// Bucket for an item, `None` when no rule matches
pub fn attribute(item: &LineItem) -> Option<CostBucket> {
    matching_rule(item).map(|rule| rule.bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::costing::line_item::EquipmentData;
    use crate::costing::rates::EquipmentKind;

    fn item(code: &str, category: LineCategory, description: &str) -> LineItem {
        LineItem::new(code, category, description, 1.0, "ea", 10.0)
    }

    #[test]
    fn test_code_prefix_beats_everything() {
        // Description says plumber, category says travel; code wins
        let i = item("LAB-01", LineCategory::TravelLogistics, "Plumber travel");
        assert_eq!(attribute(&i), Some(CostBucket::Labour));
        assert_eq!(matching_rule(&i).unwrap().name, "code-prefix-labour");

        let i = item("CHEM-02", LineCategory::Mitigation, "Technician applies product");
        assert_eq!(attribute(&i), Some(CostBucket::Chemicals));
    }

    #[test]
    fn test_equipment_data_beats_category() {
        let i = item("X-1", LineCategory::SpecialistServices, "Hire").with_equipment(EquipmentData {
            kind: EquipmentKind::HeatDryer,
            quantity: 1.0,
            duration_days: 2.0,
        });
        assert_eq!(attribute(&i), Some(CostBucket::Equipment));
    }

    #[test]
    fn test_category_beats_keywords() {
        let i = item("S-1", LineCategory::SpecialistServices, "Technician call-out");
        assert_eq!(attribute(&i), Some(CostBucket::Subcontractor));

        let i = item("T-1", LineCategory::TravelLogistics, "Equipment delivery");
        assert_eq!(attribute(&i), Some(CostBucket::Travel));
    }

    #[test]
    fn test_keyword_order() {
        // Labour keywords are checked before equipment keywords
        let i = item("M-1", LineCategory::Mitigation, "Technician to set up dehumidifier");
        assert_eq!(attribute(&i), Some(CostBucket::Labour));

        let i = item("M-2", LineCategory::Mitigation, "Moisture meter readings");
        assert_eq!(attribute(&i), Some(CostBucket::Equipment));

        let i = item("C-1", LineCategory::CleaningDecontamination, "Anti-Microbial application");
        assert_eq!(attribute(&i), Some(CostBucket::Chemicals));

        let i = item("R-1", LineCategory::Contents, "Roofer to inspect");
        assert_eq!(attribute(&i), Some(CostBucket::Subcontractor));

        let i = item("P-1", LineCategory::Contents, "Parking at site");
        assert_eq!(attribute(&i), Some(CostBucket::Travel));
    }

    #[test]
    fn test_waste_rules() {
        let i = item("D-1", LineCategory::Contents, "Skip bin tip fee");
        assert_eq!(attribute(&i), Some(CostBucket::Waste));

        let i = item("D-2", LineCategory::DemolitionRemoval, "Remove waste carpet");
        assert_eq!(attribute(&i), Some(CostBucket::Waste));

        // "waste" outside demolition does not count
        let i = item("D-3", LineCategory::Contents, "Waste bags");
        assert_eq!(attribute(&i), None);
    }

    #[test]
    fn test_category_fallbacks() {
        let i = item("PRE-1", LineCategory::PrelimsSiteSetup, "Site induction");
        assert_eq!(attribute(&i), Some(CostBucket::Labour));

        let i = item("BB-1", LineCategory::RestorationBuildBack, "Replace skirting");
        assert_eq!(attribute(&i), Some(CostBucket::Subcontractor));
    }

    #[test]
    fn test_unmatched_items() {
        let i = item("CNT-1", LineCategory::Contents, "Pack out lounge contents");
        assert_eq!(attribute(&i), None);

        let i = item("CLN-1", LineCategory::CleaningDecontamination, "HEPA vacuum floors");
        assert_eq!(attribute(&i), None);
    }

    #[test]
    fn test_code_prefix_is_case_sensitive() {
        let i = item("lab-01", LineCategory::Contents, "Sundries");
        assert_eq!(attribute(&i), None);
    }
}
