//! # Deck Estimate
//!
//! Converts deck dimensions and feature toggles into a material list.
//!
//! ## Assumptions
//!
//! - Surface boards run parallel to the width; runs are stacked across the depth
//! - 5.5" board face plus a 0.125" gap per run
//! - Joists at 16" on-center with one at each end
//! - A single beam and one row of posts along the width
//! - Railings on three sides; the side against the house is open
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::calculations::deck::{calculate_deck, DeckConfig};
//!
//! let config = DeckConfig {
//!     width_ft: 12.0,
//!     depth_ft: 10.0,
//!     ..DeckConfig::default()
//! };
//!
//! let estimate = calculate_deck(&config).unwrap();
//! assert_eq!(estimate.dimensions, "12' x 10'");
//! for item in &estimate.materials {
//!     println!("{}: {} {}", item.name, item.quantity, item.unit);
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{evaluate_rules, require_positive, LineRule};
use crate::errors::EstimateResult;
use crate::estimate::{ceil_quantity, round_up_item, MaterialItem, ProjectEstimate, ProjectType, WASTE_FACTOR};
use crate::materials::{lookup_product, DEFAULT_DECKING_ID};
use crate::units::{Feet, Inches, MaterialUnit};

/// Face width of a 5/4x6 decking board (in)
pub const DECKING_WIDTH_IN: f64 = 5.5;

/// Gap left between adjacent decking runs (in)
pub const DECKING_GAP_IN: f64 = 0.125;

/// Joist on-center spacing (in)
pub const JOIST_SPACING_IN: f64 = 16.0;

/// Top rail is two boards wide
const TOP_RAIL_BOARDS: f64 = 2.0;

/// Roughly one baluster every 4 inches
const BALUSTERS_PER_FT: f64 = 3.0;

/// Input parameters for a deck estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "width_ft": 12.0,
///   "depth_ft": 10.0,
///   "post_spacing_ft": 8.0,
///   "include_railings": true,
///   "include_mid_rail": false,
///   "include_ledger": true,
///   "decking_product_id": "deck-ic-patio"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Deck width along the house (ft)
    pub width_ft: f64,

    /// Deck depth away from the house (ft)
    pub depth_ft: f64,

    /// Maximum spacing between support posts (ft)
    pub post_spacing_ft: f64,

    /// Railings on the three open sides
    #[serde(default = "default_true")]
    pub include_railings: bool,

    /// Add a mid-rail; only meaningful with railings
    #[serde(default)]
    pub include_mid_rail: bool,

    /// Attach to the house with a ledger board
    #[serde(default = "default_true")]
    pub include_ledger: bool,

    /// Catalog id of the surface boards; unknown ids fall back to the catalog default
    #[serde(default = "default_decking_id")]
    pub decking_product_id: String,
}

fn default_true() -> bool {
    true
}

fn default_decking_id() -> String {
    DEFAULT_DECKING_ID.to_string()
}

impl Default for DeckConfig {
    fn default() -> Self {
        DeckConfig {
            width_ft: 12.0,
            depth_ft: 10.0,
            post_spacing_ft: 8.0,
            include_railings: true,
            include_mid_rail: false,
            include_ledger: true,
            decking_product_id: default_decking_id(),
        }
    }
}

impl DeckConfig {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        require_positive("width_ft", self.width_ft)?;
        require_positive("depth_ft", self.depth_ft)?;
        require_positive("post_spacing_ft", self.post_spacing_ft)?;
        Ok(())
    }

    /// Width of deck covered by one run of boards, gap included (ft)
    pub fn board_coverage_ft(&self) -> f64 {
        Feet::from(Inches(DECKING_WIDTH_IN + DECKING_GAP_IN)).0
    }

    /// Parallel board runs needed to cover the depth
    pub fn decking_runs(&self) -> u32 {
        ceil_quantity(self.depth_ft / self.board_coverage_ft())
    }

    /// Joists across the width, including both ends
    pub fn joist_count(&self) -> u32 {
        let width_in = Inches::from(Feet(self.width_ft)).0;
        ceil_quantity(width_in / JOIST_SPACING_IN).saturating_add(1)
    }

    /// Support posts along the width, including both ends
    pub fn post_count(&self) -> u32 {
        ceil_quantity(self.width_ft / self.post_spacing_ft).saturating_add(1)
    }

    /// Railing run over the three open sides (ft)
    pub fn railing_perimeter_ft(&self) -> f64 {
        2.0 * self.depth_ft + self.width_ft
    }

    /// Surface area (sq ft)
    pub fn area_sqft(&self) -> f64 {
        self.width_ft * self.depth_ft
    }

    /// Label such as `12' x 10'`
    pub fn dimension_label(&self) -> String {
        format!("{}' x {}'", self.width_ft, self.depth_ft)
    }
}

// ============================================================================
// Production Rules
// ============================================================================

fn decking(config: &DeckConfig) -> Option<MaterialItem> {
    let runs = config.decking_runs();
    let raw_lf = f64::from(runs) * config.width_ft;
    let product = lookup_product(&config.decking_product_id).product;
    Some(round_up_item(
        product.name.clone(),
        format!(
            "Surface decking for {} sq ft area: {} runs of {}ft.",
            config.area_sqft(),
            runs,
            config.width_ft
        ),
        raw_lf,
        WASTE_FACTOR,
        MaterialUnit::LinearFeet,
    ))
}

fn joists(config: &DeckConfig) -> Option<MaterialItem> {
    let count = config.joist_count();
    Some(round_up_item(
        "2x6 Doug Fir Framing",
        format!(
            "Joists: {} rows at {}\" on-center spanning {}ft.",
            count, JOIST_SPACING_IN, config.depth_ft
        ),
        f64::from(count) * config.depth_ft,
        WASTE_FACTOR,
        MaterialUnit::LinearFeet,
    ))
}

fn ledger(config: &DeckConfig) -> Option<MaterialItem> {
    config.include_ledger.then(|| {
        round_up_item(
            "2x8 Doug Fir Ledger",
            format!("House attachment board along the {}ft width.", config.width_ft),
            config.width_ft,
            0.0,
            MaterialUnit::LinearFeet,
        )
    })
}

fn beam(config: &DeckConfig) -> Option<MaterialItem> {
    Some(round_up_item(
        "4x10 WRC Beam",
        format!("Main support beam spanning the {}ft deck width.", config.width_ft),
        config.width_ft,
        0.0,
        MaterialUnit::LinearFeet,
    ))
}

fn posts(config: &DeckConfig) -> Option<MaterialItem> {
    Some(round_up_item(
        "6x6 Pressure Treated Posts",
        format!("Support posts spaced every {}ft.", config.post_spacing_ft),
        f64::from(config.post_count()),
        0.0,
        MaterialUnit::Posts,
    ))
}

fn top_rail(config: &DeckConfig) -> Option<MaterialItem> {
    config.include_railings.then(|| {
        let perimeter = config.railing_perimeter_ft();
        round_up_item(
            "2x6 WRC Railing (Top)",
            format!("Double 2x6 top rail configuration for {}ft of railing.", perimeter),
            perimeter * TOP_RAIL_BOARDS,
            0.0,
            MaterialUnit::LinearFeet,
        )
    })
}

fn mid_rail(config: &DeckConfig) -> Option<MaterialItem> {
    (config.include_railings && config.include_mid_rail).then(|| {
        let perimeter = config.railing_perimeter_ft();
        round_up_item(
            "2x6 WRC Railing (Mid)",
            format!("Single mid-rail reinforcement for {}ft of railing.", perimeter),
            perimeter,
            0.0,
            MaterialUnit::LinearFeet,
        )
    })
}

fn balusters(config: &DeckConfig) -> Option<MaterialItem> {
    config.include_railings.then(|| {
        let perimeter = config.railing_perimeter_ft();
        round_up_item(
            "2x2 Cedar Balusters",
            format!("Vertical pickets at about 4\" spacing over {}ft of railing.", perimeter),
            perimeter * BALUSTERS_PER_FT,
            0.0,
            MaterialUnit::Pieces,
        )
    })
}

/// Deck rules in material-list order: decking, framing, structure, railing.
pub static DECK_RULES: &[LineRule<DeckConfig>] = &[
    LineRule { key: "decking", produce: decking },
    LineRule { key: "joists", produce: joists },
    LineRule { key: "ledger", produce: ledger },
    LineRule { key: "beam", produce: beam },
    LineRule { key: "posts", produce: posts },
    LineRule { key: "top_rail", produce: top_rail },
    LineRule { key: "mid_rail", produce: mid_rail },
    LineRule { key: "balusters", produce: balusters },
];

/// Estimate deck materials.
///
/// # Errors
///
/// `InvalidConfiguration` if any dimension or the post spacing is not a
/// finite positive number. An unknown decking id is not an error.
pub fn calculate_deck(config: &DeckConfig) -> EstimateResult<ProjectEstimate> {
    config.validate()?;

    let materials = evaluate_rules(config, DECK_RULES);
    debug!(
        width_ft = config.width_ft,
        depth_ft = config.depth_ft,
        items = materials.len(),
        "deck estimate computed"
    );

    Ok(ProjectEstimate::new(
        ProjectType::Deck,
        config.dimension_label(),
        materials,
        WASTE_FACTOR,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EstimateError;

    fn reference_deck() -> DeckConfig {
        DeckConfig {
            width_ft: 12.0,
            depth_ft: 10.0,
            post_spacing_ft: 8.0,
            include_railings: true,
            include_mid_rail: false,
            include_ledger: true,
            decking_product_id: "deck-ic-patio".to_string(),
        }
    }

    fn quantities(estimate: &ProjectEstimate) -> Vec<(String, u32)> {
        estimate
            .materials
            .iter()
            .map(|m| (m.name.clone(), m.quantity))
            .collect()
    }

    #[test]
    fn test_reference_deck() {
        let estimate = calculate_deck(&reference_deck()).unwrap();

        assert_eq!(estimate.project_type, ProjectType::Deck);
        assert_eq!(estimate.dimensions, "12' x 10'");
        assert_eq!(estimate.waste_factor, WASTE_FACTOR);
        assert_eq!(
            quantities(&estimate),
            vec![
                ("5/4x6 IC Patio S4S EE Dry".to_string(), 291),
                ("2x6 Doug Fir Framing".to_string(), 110),
                ("2x8 Doug Fir Ledger".to_string(), 12),
                ("4x10 WRC Beam".to_string(), 12),
                ("6x6 Pressure Treated Posts".to_string(), 3),
                ("2x6 WRC Railing (Top)".to_string(), 64),
                ("2x2 Cedar Balusters".to_string(), 96),
            ]
        );
    }

    #[test]
    fn test_intermediate_counts() {
        let config = reference_deck();
        assert!((config.board_coverage_ft() - 0.46875).abs() < 1e-12);
        assert_eq!(config.decking_runs(), 22);
        assert_eq!(config.joist_count(), 10);
        assert_eq!(config.post_count(), 3);
        assert_eq!(config.railing_perimeter_ft(), 32.0);
    }

    #[test]
    fn test_units() {
        let estimate = calculate_deck(&reference_deck()).unwrap();
        assert_eq!(estimate.item("6x6 Pressure Treated Posts").unwrap().unit, MaterialUnit::Posts);
        assert_eq!(estimate.item("2x2 Cedar Balusters").unwrap().unit, MaterialUnit::Pieces);
        assert_eq!(estimate.item("4x10 WRC Beam").unwrap().unit, MaterialUnit::LinearFeet);
    }

    #[test]
    fn test_mid_rail_added() {
        let config = DeckConfig {
            include_mid_rail: true,
            ..reference_deck()
        };
        let estimate = calculate_deck(&config).unwrap();
        let names: Vec<_> = estimate.materials.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            &names[5..],
            &["2x6 WRC Railing (Top)", "2x6 WRC Railing (Mid)", "2x2 Cedar Balusters"]
        );
        assert_eq!(estimate.item("2x6 WRC Railing (Mid)").unwrap().quantity, 32);
    }

    #[test]
    fn test_no_railings_ignores_mid_rail() {
        let without = DeckConfig {
            include_railings: false,
            include_mid_rail: false,
            ..reference_deck()
        };
        let with_mid = DeckConfig {
            include_mid_rail: true,
            ..without.clone()
        };
        let a = calculate_deck(&without).unwrap();
        let b = calculate_deck(&with_mid).unwrap();
        assert!(a.same_content(&b));
        assert_eq!(a.materials.len(), 5);
    }

    #[test]
    fn test_ledger_toggle() {
        let config = DeckConfig {
            include_ledger: false,
            ..reference_deck()
        };
        let estimate = calculate_deck(&config).unwrap();
        assert!(estimate.item("2x8 Doug Fir Ledger").is_none());
        assert_eq!(estimate.materials.len(), 6);
    }

    #[test]
    fn test_unknown_decking_falls_back() {
        let config = DeckConfig {
            decking_product_id: "deck-teak".to_string(),
            ..reference_deck()
        };
        let estimate = calculate_deck(&config).unwrap();
        assert_eq!(estimate.materials[0].name, "5/4x6 IC Patio S4S EE Dry");
    }

    #[test]
    fn test_selected_decking_name() {
        let config = DeckConfig {
            decking_product_id: "deck-red-grandis".to_string(),
            ..reference_deck()
        };
        let estimate = calculate_deck(&config).unwrap();
        assert_eq!(estimate.materials[0].name, "5/4 Red Grandis PO FAS S4S EE");
    }

    #[test]
    fn test_spacing_equal_to_width_gives_two_posts() {
        let config = DeckConfig {
            post_spacing_ft: 12.0,
            ..reference_deck()
        };
        assert_eq!(config.post_count(), 2);
    }

    #[test]
    fn test_huge_width_saturates_counts() {
        let config = DeckConfig {
            width_ft: 1.0e10,
            ..reference_deck()
        };
        assert_eq!(config.joist_count(), u32::MAX);
        assert_eq!(config.post_count(), 1_250_000_001);

        let estimate = calculate_deck(&config).unwrap();
        assert_eq!(estimate.item("2x6 Doug Fir Framing").unwrap().quantity, u32::MAX);
        assert_eq!(estimate.item("4x10 WRC Beam").unwrap().quantity, u32::MAX);
        assert!(estimate.materials.iter().all(|m| m.quantity > 0));
    }

    #[test]
    fn test_fractional_dimensions_label() {
        let config = DeckConfig {
            width_ft: 12.5,
            ..reference_deck()
        };
        assert_eq!(config.dimension_label(), "12.5' x 10'");
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        for config in [
            DeckConfig { width_ft: 0.0, ..reference_deck() },
            DeckConfig { depth_ft: -1.0, ..reference_deck() },
            DeckConfig { post_spacing_ft: 0.0, ..reference_deck() },
        ] {
            let err = calculate_deck(&config).unwrap_err();
            assert!(matches!(err, EstimateError::InvalidConfiguration { .. }));
        }
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "width_ft": 16.0, "depth_ft": 12.0, "post_spacing_ft": 6.0 }"#;
        let config: DeckConfig = serde_json::from_str(json).unwrap();
        assert!(config.include_railings);
        assert!(config.include_ledger);
        assert!(!config.include_mid_rail);
        assert_eq!(config.decking_product_id, DEFAULT_DECKING_ID);
    }
}
