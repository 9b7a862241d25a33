//! # Fence Estimate
//!
//! Converts a fence run into posts, rails, pickets, and concrete. No waste
//! factor is applied to any fence line.
//!
//! ## Assumptions
//!
//! - Posts at both ends plus one per section
//! - Two rail rows up to 5 ft tall, three above that
//! - Privacy layout: 5.5" pickets with no gap
//! - 1.5 bags of concrete per post hole

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{evaluate_rules, require_positive, LineRule};
use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::{ceil_quantity, round_up_item, MaterialItem, ProjectEstimate, ProjectType};
use crate::units::MaterialUnit;

/// Fence heights the yard stocks pickets for (ft)
pub const ALLOWED_HEIGHTS_FT: [u8; 3] = [4, 6, 8];

/// Picket face coverage (in)
pub const PICKET_WIDTH_IN: f64 = 5.5;

/// Post length added for burial below grade (ft)
pub const POST_BURIAL_FT: f64 = 2.0;

/// Fences taller than this get a third rail row (ft)
const THIRD_RAIL_ABOVE_FT: f64 = 5.0;

const CONCRETE_BAGS_PER_POST: f64 = 1.5;

/// Input parameters for a fence estimate.
///
/// ## JSON Example
///
/// ```json
/// { "length_ft": 50.0, "height_ft": 6, "post_spacing_ft": 8.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceConfig {
    /// Total fence run (ft)
    pub length_ft: f64,

    /// Finished fence height (ft); one of [`ALLOWED_HEIGHTS_FT`]
    pub height_ft: u8,

    /// Maximum spacing between posts (ft)
    pub post_spacing_ft: f64,
}

impl Default for FenceConfig {
    fn default() -> Self {
        FenceConfig {
            length_ft: 50.0,
            height_ft: 6,
            post_spacing_ft: 8.0,
        }
    }
}

impl FenceConfig {
    /// Validate input parameters.
    pub fn validate(&self) -> EstimateResult<()> {
        require_positive("length_ft", self.length_ft)?;
        require_positive("post_spacing_ft", self.post_spacing_ft)?;
        if !ALLOWED_HEIGHTS_FT.contains(&self.height_ft) {
            return Err(EstimateError::invalid_configuration(
                "height_ft",
                self.height_ft.to_string(),
                "Height must be 4, 6, or 8 ft",
            ));
        }
        Ok(())
    }

    fn height(&self) -> f64 {
        f64::from(self.height_ft)
    }

    /// Spans between adjacent posts
    pub fn section_count(&self) -> u32 {
        ceil_quantity(self.length_ft / self.post_spacing_ft)
    }

    /// Posts including both ends
    pub fn post_count(&self) -> u32 {
        self.section_count().saturating_add(1)
    }

    /// Post length including the buried portion (ft).
    ///
    /// Informational only; posts are ordered by count, not footage.
    pub fn post_length_ft(&self) -> f64 {
        self.height() + POST_BURIAL_FT
    }

    /// Horizontal rail rows per section
    pub fn rail_rows(&self) -> u32 {
        if self.height() > THIRD_RAIL_ABOVE_FT {
            3
        } else {
            2
        }
    }

    /// Label such as `50' Length x 6' Height`
    pub fn dimension_label(&self) -> String {
        format!("{}' Length x {}' Height", self.length_ft, self.height_ft)
    }
}

// ============================================================================
// Production Rules
// ============================================================================

fn posts(config: &FenceConfig) -> Option<MaterialItem> {
    let count = config.post_count();
    Some(round_up_item(
        "4x4 WC Outs Posts",
        format!(
            "{} posts ({}ft each) buried {}ft deep.",
            count,
            config.post_length_ft(),
            POST_BURIAL_FT
        ),
        f64::from(count),
        0.0,
        MaterialUnit::Posts,
    ))
}

fn rails(config: &FenceConfig) -> Option<MaterialItem> {
    let rows = config.rail_rows();
    Some(round_up_item(
        "2x4 IC Cedar Rails",
        format!("{} rails per section across {} sections.", rows, config.section_count()),
        config.length_ft * f64::from(rows),
        0.0,
        MaterialUnit::LinearFeet,
    ))
}

fn pickets(config: &FenceConfig) -> Option<MaterialItem> {
    Some(round_up_item(
        "1x6 IC #3 Fencing Pickets",
        format!(
            "Assuming no-gap privacy layout of {}\" pickets at {}ft tall.",
            PICKET_WIDTH_IN, config.height_ft
        ),
        config.length_ft * (12.0 / PICKET_WIDTH_IN) * config.height(),
        0.0,
        MaterialUnit::LinearFeet,
    ))
}

fn concrete(config: &FenceConfig) -> Option<MaterialItem> {
    Some(round_up_item(
        "Concrete Mix",
        format!("Approx {} bags per post hole.", CONCRETE_BAGS_PER_POST),
        f64::from(config.post_count()) * CONCRETE_BAGS_PER_POST,
        0.0,
        MaterialUnit::Bags,
    ))
}

/// Fence rules in material-list order: posts, rails, pickets, concrete.
pub static FENCE_RULES: &[LineRule<FenceConfig>] = &[
    LineRule { key: "posts", produce: posts },
    LineRule { key: "rails", produce: rails },
    LineRule { key: "pickets", produce: pickets },
    LineRule { key: "concrete", produce: concrete },
];

/// Estimate fence materials.
///
/// # Errors
///
/// `InvalidConfiguration` for a non-positive length or spacing, or a height
/// outside [`ALLOWED_HEIGHTS_FT`].
pub fn calculate_fence(config: &FenceConfig) -> EstimateResult<ProjectEstimate> {
    config.validate()?;

    let materials = evaluate_rules(config, FENCE_RULES);
    debug!(
        length_ft = config.length_ft,
        height_ft = config.height_ft,
        items = materials.len(),
        "fence estimate computed"
    );

    Ok(ProjectEstimate::new(
        ProjectType::Fence,
        config.dimension_label(),
        materials,
        0.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fence() {
        let estimate = calculate_fence(&FenceConfig::default()).unwrap();

        assert_eq!(estimate.project_type, ProjectType::Fence);
        assert_eq!(estimate.dimensions, "50' Length x 6' Height");
        assert_eq!(estimate.waste_factor, 0.0);

        let got: Vec<_> = estimate
            .materials
            .iter()
            .map(|m| (m.name.as_str(), m.quantity, m.unit))
            .collect();
        assert_eq!(
            got,
            vec![
                ("4x4 WC Outs Posts", 8, MaterialUnit::Posts),
                ("2x4 IC Cedar Rails", 150, MaterialUnit::LinearFeet),
                // 50 x (12 / 5.5) x 6 = 654.5
                ("1x6 IC #3 Fencing Pickets", 655, MaterialUnit::LinearFeet),
                ("Concrete Mix", 12, MaterialUnit::Bags),
            ]
        );
    }

    #[test]
    fn test_section_and_post_counts() {
        let config = FenceConfig::default();
        assert_eq!(config.section_count(), 7);
        assert_eq!(config.post_count(), 8);
        assert_eq!(config.post_length_ft(), 8.0);
    }

    #[test]
    fn test_short_fence_has_two_rails() {
        let config = FenceConfig {
            height_ft: 4,
            ..FenceConfig::default()
        };
        assert_eq!(config.rail_rows(), 2);
        let estimate = calculate_fence(&config).unwrap();
        assert_eq!(estimate.item("2x4 IC Cedar Rails").unwrap().quantity, 100);
        // 50 x (12 / 5.5) x 4 = 436.4
        assert_eq!(estimate.item("1x6 IC #3 Fencing Pickets").unwrap().quantity, 437);
    }

    #[test]
    fn test_spacing_equal_to_length_gives_two_posts() {
        let config = FenceConfig {
            length_ft: 8.0,
            height_ft: 6,
            post_spacing_ft: 8.0,
        };
        assert_eq!(config.section_count(), 1);
        let estimate = calculate_fence(&config).unwrap();
        assert_eq!(estimate.materials[0].quantity, 2);
        assert_eq!(estimate.item("Concrete Mix").unwrap().quantity, 3);
    }

    #[test]
    fn test_huge_length_saturates_posts() {
        let config = FenceConfig {
            length_ft: 5.0e9,
            height_ft: 6,
            post_spacing_ft: 1.0,
        };
        assert_eq!(config.post_count(), u32::MAX);

        let estimate = calculate_fence(&config).unwrap();
        assert_eq!(estimate.materials[0].quantity, u32::MAX);
        assert_eq!(estimate.item("Concrete Mix").unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_post_length_not_a_line_item() {
        let estimate = calculate_fence(&FenceConfig::default()).unwrap();
        assert_eq!(estimate.materials.len(), 4);
        assert!(estimate.materials[0].description.contains("8ft each"));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let bad_height = FenceConfig {
            height_ft: 5,
            ..FenceConfig::default()
        };
        assert!(matches!(
            calculate_fence(&bad_height),
            Err(EstimateError::InvalidConfiguration { ref field, .. }) if field == "height_ft"
        ));

        let zero_spacing = FenceConfig {
            post_spacing_ft: 0.0,
            ..FenceConfig::default()
        };
        assert!(calculate_fence(&zero_spacing).is_err());

        let negative_length = FenceConfig {
            length_ft: -10.0,
            ..FenceConfig::default()
        };
        assert!(calculate_fence(&negative_length).is_err());
    }
}
