//! # Loss Classification
//!
//! Water-loss class and drying-system type, the two hazard inputs shared by
//! the psychrometric model and the target calculator.
//!
//! Water class follows the usual restoration convention (1 = least water,
//! slow evaporation; 4 = bound water in dense materials). It serializes as
//! the bare class number so host forms can post `"water_class": 3`.

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Water-loss class 1 through 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WaterClass {
    /// Class 1 - small area, low-porosity materials
    Class1,
    /// Class 2 - whole room, wicking up walls under 60 cm
    Class2,
    /// Class 3 - saturated from overhead, walls/ceiling/insulation wet
    Class3,
    /// Class 4 - specialty drying of bound water (hardwood, concrete, plaster)
    Class4,
}

impl WaterClass {
    /// All water classes for UI selection
    pub const ALL: [WaterClass; 4] = [
        WaterClass::Class1,
        WaterClass::Class2,
        WaterClass::Class3,
        WaterClass::Class4,
    ];

    /// Class number (1-4)
    pub fn number(self) -> u8 {
        match self {
            WaterClass::Class1 => 1,
            WaterClass::Class2 => 2,
            WaterClass::Class3 => 3,
            WaterClass::Class4 => 4,
        }
    }

    /// Build from a class number, rejecting anything outside 1-4
    pub fn from_number(n: u8) -> EstimateResult<Self> {
        match n {
            1 => Ok(WaterClass::Class1),
            2 => Ok(WaterClass::Class2),
            3 => Ok(WaterClass::Class3),
            4 => Ok(WaterClass::Class4),
            _ => Err(EstimateError::invalid_input(
                "water_class",
                n.to_string(),
                "Water class must be between 1 and 4",
            )),
        }
    }

    /// Parse from common string representations ("3", "Class 3", "class3")
    pub fn from_str_flexible(s: &str) -> EstimateResult<Self> {
        let digits: String = s
            .trim()
            .to_lowercase()
            .trim_start_matches("class")
            .trim()
            .to_string();
        digits
            .parse::<u8>()
            .map_err(|_| {
                EstimateError::invalid_input("water_class", s, "Expected a class number 1-4")
            })
            .and_then(Self::from_number)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WaterClass::Class1 => "Class 1",
            WaterClass::Class2 => "Class 2",
            WaterClass::Class3 => "Class 3",
            WaterClass::Class4 => "Class 4",
        }
    }
}

impl Default for WaterClass {
    fn default() -> Self {
        WaterClass::Class2
    }
}

impl TryFrom<u8> for WaterClass {
    type Error = EstimateError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        WaterClass::from_number(n)
    }
}

impl From<WaterClass> for u8 {
    fn from(class: WaterClass) -> Self {
        class.number()
    }
}

impl std::fmt::Display for WaterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Drying system configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    /// Exchanging air with outside (windows/doors open)
    Open,
    /// Sealed containment; moisture is only removed by dehumidification
    Closed,
}

impl SystemType {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            SystemType::Open => "Open",
            SystemType::Closed => "Closed",
        }
    }
}

impl Default for SystemType {
    fn default() -> Self {
        SystemType::Closed
    }
}

impl std::fmt::Display for SystemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_class_serializes_as_number() {
        let json = serde_json::to_string(&WaterClass::Class3).unwrap();
        assert_eq!(json, "3");

        let parsed: WaterClass = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, WaterClass::Class4);
    }

    #[test]
    fn test_water_class_out_of_range() {
        assert!(serde_json::from_str::<WaterClass>("0").is_err());
        assert!(serde_json::from_str::<WaterClass>("5").is_err());
        assert_eq!(WaterClass::from_number(9).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_water_class_flexible_parse() {
        assert_eq!(WaterClass::from_str_flexible("Class 2").unwrap(), WaterClass::Class2);
        assert_eq!(WaterClass::from_str_flexible("class3").unwrap(), WaterClass::Class3);
        assert_eq!(WaterClass::from_str_flexible(" 1 ").unwrap(), WaterClass::Class1);
        assert!(WaterClass::from_str_flexible("wet").is_err());
    }

    #[test]
    fn test_system_type_serialization() {
        assert_eq!(serde_json::to_string(&SystemType::Closed).unwrap(), "\"closed\"");
        let parsed: SystemType = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(parsed, SystemType::Open);
    }
}
