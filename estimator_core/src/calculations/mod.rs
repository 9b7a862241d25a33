//! # Quantity Engines
//!
//! Each estimator follows the pattern:
//!
//! - `*Config` - Input parameters (JSON-serializable)
//! - an ordered table of [`LineRule`]s, each producing at most one line item
//! - `calculate_*(config) -> EstimateResult<ProjectEstimate>` - validate, then
//!   evaluate every rule in table order
//!
//! The engines are pure: no I/O, no shared mutable state. The catalog they
//! read is immutable.
//!
//! ## Available Estimators
//!
//! - [`deck`] - Surface boards, framing, posts, and optional railings
//! - [`fence`] - Posts, rails, pickets, and concrete

pub mod deck;
pub mod fence;

use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::{MaterialItem, ProjectEstimate};

pub use deck::{calculate_deck, DeckConfig, DECK_RULES};
pub use fence::{calculate_fence, FenceConfig, FENCE_RULES};

/// A named production rule: a predicate over the configuration that yields
/// at most one line item.
pub struct LineRule<C> {
    /// Stable rule name, used in logs and tests
    pub key: &'static str,
    /// Produces the rule's line item, or `None` when the rule does not apply
    pub produce: fn(&C) -> Option<MaterialItem>,
}

impl<C> LineRule<C> {
    pub fn apply(&self, config: &C) -> Option<MaterialItem> {
        (self.produce)(config)
    }
}

/// Evaluate rules in table order, keeping the items that apply.
pub fn evaluate_rules<C>(config: &C, rules: &[LineRule<C>]) -> Vec<MaterialItem> {
    rules.iter().filter_map(|rule| rule.apply(config)).collect()
}

/// Find a rule by key
pub fn rule<C: 'static>(rules: &'static [LineRule<C>], key: &str) -> Option<&'static LineRule<C>> {
    rules.iter().find(|r| r.key == key)
}

/// Either estimator's input, tagged for JSON.
///
/// ```json
/// { "type": "Fence", "length_ft": 50.0, "height_ft": 6, "post_spacing_ft": 8.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ProjectConfig {
    Deck(DeckConfig),
    Fence(FenceConfig),
}

impl ProjectConfig {
    /// Get the estimator type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            ProjectConfig::Deck(_) => "Deck",
            ProjectConfig::Fence(_) => "Fence",
        }
    }

    pub fn validate(&self) -> EstimateResult<()> {
        match self {
            ProjectConfig::Deck(c) => c.validate(),
            ProjectConfig::Fence(c) => c.validate(),
        }
    }
}

/// Run whichever estimator the configuration selects
pub fn calculate(config: &ProjectConfig) -> EstimateResult<ProjectEstimate> {
    match config {
        ProjectConfig::Deck(c) => calculate_deck(c),
        ProjectConfig::Fence(c) => calculate_fence(c),
    }
}

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn require_positive(field: &str, value: f64) -> EstimateResult<()> {
    if !value.is_finite() {
        return Err(EstimateError::invalid_configuration(
            field,
            value.to_string(),
            "Value must be a finite number",
        ));
    }
    if value <= 0.0 {
        return Err(EstimateError::invalid_configuration(
            field,
            value.to_string(),
            "Value must be greater than zero",
        ));
    }
    Ok(())
}
