//! Cedar appearance grades used to label catalog products.

use serde::{Deserialize, Serialize};

/// Appearance grade of a catalog product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CedarGrade {
    /// Clear Heart
    #[serde(rename = "Clear Heart")]
    ClearHeart,
    /// A & Better Clear
    #[serde(rename = "A & Better Clear")]
    AClear,
    /// Select Tight Knot (STK)
    #[serde(rename = "Select Tight Knot (STK)")]
    SelectTightKnot,
    /// Architectural Knotty
    #[serde(rename = "Architectural Knotty")]
    ArchitecturalKnotty,
}

impl CedarGrade {
    /// All grade variants for UI selection
    pub const ALL: [CedarGrade; 4] = [
        CedarGrade::ClearHeart,
        CedarGrade::AClear,
        CedarGrade::SelectTightKnot,
        CedarGrade::ArchitecturalKnotty,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            CedarGrade::ClearHeart => "Clear Heart",
            CedarGrade::AClear => "A & Better Clear",
            CedarGrade::SelectTightKnot => "Select Tight Knot (STK)",
            CedarGrade::ArchitecturalKnotty => "Architectural Knotty",
        }
    }
}

impl std::fmt::Display for CedarGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
