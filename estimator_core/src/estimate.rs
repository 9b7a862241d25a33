//! # Estimate Output
//!
//! The shared result shape both quantity engines produce, and the one
//! rounding helper every line item goes through.
//!
//! ```text
//! ProjectEstimate
//! ├── id / created        (per calculation)
//! ├── project_type        DECK | FENCE
//! ├── dimensions          "12' x 10'"
//! ├── materials           ordered MaterialItem list
//! └── waste_factor        0.10 for decks, 0 for fences
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EstimateResult;
use crate::units::MaterialUnit;

/// Overage applied to deck surface boards and joists
pub const WASTE_FACTOR: f64 = 0.10;

/// Relative slack taken off before rounding up, so that binary floating-point
/// noise (100 x 1.1 = 110.00000000000001) does not order an extra unit while
/// any real fraction still does.
const ROUNDING_TOLERANCE: f64 = 1e-12;

/// Which estimator produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProjectType {
    Deck,
    Fence,
}

impl ProjectType {
    pub fn display_name(&self) -> &'static str {
        match self {
            ProjectType::Deck => "Deck",
            ProjectType::Fence => "Fence",
        }
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One line of a material list.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "6x6 Pressure Treated Posts",
///   "description": "Support posts spaced every 8ft.",
///   "quantity": 3,
///   "unit": "Posts"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialItem {
    /// Product or material label
    pub name: String,
    /// How the quantity was derived, for the reader only
    pub description: String,
    /// Whole units to order
    pub quantity: u32,
    /// Ordering unit
    pub unit: MaterialUnit,
}

/// Round a raw amount up to whole ordering units.
///
/// Negative and NaN amounts clamp to zero; anything past `u32::MAX`,
/// infinity included, saturates.
pub fn ceil_quantity(raw: f64) -> u32 {
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    if raw.is_infinite() {
        return u32::MAX;
    }

    let rounded = (raw * (1.0 - ROUNDING_TOLERANCE)).ceil();
    if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Build a line item: apply the waste factor multiplicatively, then round up.
///
/// # Example
///
/// ```rust
/// use estimator_core::estimate::round_up_item;
/// use estimator_core::units::MaterialUnit;
///
/// let joists = round_up_item("2x6 Doug Fir Framing", "Joists", 100.0, 0.10, MaterialUnit::LinearFeet);
/// assert_eq!(joists.quantity, 110);
/// ```
pub fn round_up_item(
    name: impl Into<String>,
    description: impl Into<String>,
    raw_quantity: f64,
    waste_factor: f64,
    unit: MaterialUnit,
) -> MaterialItem {
    MaterialItem {
        name: name.into(),
        description: description.into(),
        quantity: ceil_quantity(raw_quantity * (1.0 + waste_factor)),
        unit,
    }
}

/// Result of one "calculate" action.
///
/// Never mutated after creation; a new calculation replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEstimate {
    /// Unique per calculation
    pub id: String,
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    /// Geometry summary, e.g. `12' x 10'`
    pub dimensions: String,
    /// Line items in display order
    pub materials: Vec<MaterialItem>,
    /// Overage applied to waste-bearing linear-foot items
    pub waste_factor: f64,
    /// When the estimate was produced
    pub created: DateTime<Utc>,
}

impl ProjectEstimate {
    /// Wrap freshly computed materials with a new id and timestamp
    pub fn new(
        project_type: ProjectType,
        dimensions: impl Into<String>,
        materials: Vec<MaterialItem>,
        waste_factor: f64,
    ) -> Self {
        ProjectEstimate {
            id: Uuid::new_v4().to_string(),
            project_type,
            dimensions: dimensions.into(),
            materials,
            waste_factor,
            created: Utc::now(),
        }
    }

    /// Find a line item by its name
    pub fn item(&self, name: &str) -> Option<&MaterialItem> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Sum of quantities for one unit (e.g. total LF on the list)
    pub fn total_for_unit(&self, unit: MaterialUnit) -> u64 {
        self.materials
            .iter()
            .filter(|m| m.unit == unit)
            .map(|m| u64::from(m.quantity))
            .sum()
    }

    /// Same materials, dimensions, and waste factor; ignores id and timestamp
    pub fn same_content(&self, other: &ProjectEstimate) -> bool {
        self.project_type == other.project_type
            && self.dimensions == other.dimensions
            && self.materials == other.materials
            && self.waste_factor == other.waste_factor
    }

    /// Pretty JSON for storage or hand-off to another tool
    pub fn to_json_pretty(&self) -> EstimateResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_quantity_absorbs_float_noise() {
        assert_eq!(ceil_quantity(100.0 * 1.1), 110);
        assert_eq!(ceil_quantity(264.0 * 1.1), 291);
        assert_eq!(ceil_quantity(545.45), 546);
        assert_eq!(ceil_quantity(12.0), 12);
    }

    #[test]
    fn test_ceil_quantity_clamps() {
        assert_eq!(ceil_quantity(-4.2), 0);
        assert_eq!(ceil_quantity(f64::NAN), 0);
        assert_eq!(ceil_quantity(0.0), 0);
        assert_eq!(ceil_quantity(1e12), u32::MAX);
        assert_eq!(ceil_quantity(f64::INFINITY), u32::MAX);
    }

    #[test]
    fn test_ceil_quantity_keeps_small_fractions() {
        assert_eq!(ceil_quantity(12.0000000005), 13);
        assert_eq!(ceil_quantity(1e-7), 1);
        assert_eq!(ceil_quantity(1_000_000.0 * 1.1), 1_100_000);
    }

    #[test]
    fn test_round_up_item_without_waste() {
        let item = round_up_item("Beam", "Main beam", 12.2, 0.0, MaterialUnit::LinearFeet);
        assert_eq!(item.quantity, 13);
        assert_eq!(item.unit, MaterialUnit::LinearFeet);
    }

    #[test]
    fn test_estimate_serialization() {
        let estimate = ProjectEstimate::new(
            ProjectType::Fence,
            "50' Length x 6' Height",
            vec![round_up_item("Concrete Mix", "1.5 bags per hole", 12.0, 0.0, MaterialUnit::Bags)],
            0.0,
        );
        let json = estimate.to_json_pretty().unwrap();
        assert!(json.contains("\"type\": \"FENCE\""));
        assert!(json.contains("\"unit\": \"Bags\""));

        let roundtrip: ProjectEstimate = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, estimate);
    }

    #[test]
    fn test_ids_differ_but_content_matches() {
        let a = ProjectEstimate::new(ProjectType::Deck, "1' x 1'", vec![], WASTE_FACTOR);
        let b = ProjectEstimate::new(ProjectType::Deck, "1' x 1'", vec![], WASTE_FACTOR);
        assert_ne!(a.id, b.id);
        assert!(a.same_content(&b));
    }
}
