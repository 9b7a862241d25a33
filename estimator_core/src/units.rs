//! # Unit Types
//!
//! Lightweight newtypes for the lengths the engines convert between, and the
//! fixed set of ordering units a material line item can carry.
//!
//! ## US Customary Units Only
//!
//! - Length: feet (ft), inches (in)
//! - Ordering: linear feet (LF), posts, pieces, bags
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::units::{Feet, Inches};
//!
//! let width = Feet(12.0);
//! let width_in: Inches = width.into();
//! assert_eq!(width_in.0, 144.0);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length in feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Feet(pub f64);

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Inches(pub f64);

impl From<Feet> for Inches {
    fn from(ft: Feet) -> Self {
        Inches(ft.0 * 12.0)
    }
}

impl From<Inches> for Feet {
    fn from(inches: Inches) -> Self {
        Feet(inches.0 / 12.0)
    }
}

// ============================================================================
// Ordering Units
// ============================================================================

/// Unit a material line item is ordered in.
///
/// Serializes to the short labels shown on a material list
/// (`"LF"`, `"Posts"`, `"Pcs"`, `"Bags"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialUnit {
    /// Linear feet of board, regardless of cross-section
    #[serde(rename = "LF")]
    LinearFeet,
    /// Whole posts
    Posts,
    /// Individual pieces (balusters)
    #[serde(rename = "Pcs")]
    Pieces,
    /// Bags of concrete mix
    Bags,
}

impl MaterialUnit {
    /// All units, in display order
    pub const ALL: [MaterialUnit; 4] = [
        MaterialUnit::LinearFeet,
        MaterialUnit::Posts,
        MaterialUnit::Pieces,
        MaterialUnit::Bags,
    ];

    /// Short label used on material lists
    pub fn label(&self) -> &'static str {
        match self {
            MaterialUnit::LinearFeet => "LF",
            MaterialUnit::Posts => "Posts",
            MaterialUnit::Pieces => "Pcs",
            MaterialUnit::Bags => "Bags",
        }
    }
}

impl std::fmt::Display for MaterialUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feet_inches_conversion() {
        let inches: Inches = Feet(10.0).into();
        assert_eq!(inches.0, 120.0);

        let feet: Feet = Inches(66.0).into();
        assert!((feet.0 - 5.5).abs() < 1e-12);
    }

    #[test]
    fn test_unit_labels_match_serialization() {
        for unit in MaterialUnit::ALL {
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", unit.label()));
        }
    }
}
