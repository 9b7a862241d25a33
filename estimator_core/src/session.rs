//! # Estimator Session
//!
//! The calling context for the quantity engines. A session remembers the
//! most recent estimate of each workflow and nothing else; computing a new
//! one replaces the old one outright.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── id / started
//! ├── settings: EstimatorSettings (default deck and fence inputs)
//! ├── last_deck: Option<ProjectEstimate>
//! └── last_fence: Option<ProjectEstimate>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::session::Session;
//!
//! let mut session = Session::new();
//! let deck = session.settings.deck.clone();
//! let estimate = session.estimate_deck(deck).unwrap();
//! assert_eq!(estimate.dimensions, "12' x 10'");
//! assert!(session.last_deck.is_some());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::calculations::{calculate_deck, calculate_fence, DeckConfig, FenceConfig};
use crate::errors::EstimateResult;
use crate::estimate::{ProjectEstimate, ProjectType};

/// Current schema version for settings files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Defaults pre-filled into the estimator forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EstimatorSettings {
    /// Deck inputs used when the caller does not override them
    #[serde(default)]
    pub deck: DeckConfig,

    /// Fence inputs used when the caller does not override them
    #[serde(default)]
    pub fence: FenceConfig,
}

/// One user's working session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub started: DateTime<Utc>,
    pub settings: EstimatorSettings,
    pub last_deck: Option<ProjectEstimate>,
    pub last_fence: Option<ProjectEstimate>,
}

impl Session {
    /// Start a session with default settings
    pub fn new() -> Self {
        Session::with_settings(EstimatorSettings::default())
    }

    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Session {
            id: Uuid::new_v4(),
            started: Utc::now(),
            settings,
            last_deck: None,
            last_fence: None,
        }
    }

    /// Compute a deck estimate and make it the session's current one.
    ///
    /// On error the previous estimate is kept.
    pub fn estimate_deck(&mut self, config: DeckConfig) -> EstimateResult<&ProjectEstimate> {
        let estimate = calculate_deck(&config)?;
        info!(estimate_id = %estimate.id, dimensions = %estimate.dimensions, "deck estimate replaced");
        Ok(self.last_deck.insert(estimate))
    }

    /// Compute a fence estimate and make it the session's current one.
    ///
    /// On error the previous estimate is kept.
    pub fn estimate_fence(&mut self, config: FenceConfig) -> EstimateResult<&ProjectEstimate> {
        let estimate = calculate_fence(&config)?;
        info!(estimate_id = %estimate.id, dimensions = %estimate.dimensions, "fence estimate replaced");
        Ok(self.last_fence.insert(estimate))
    }

    /// Current estimate for a workflow, if one has been computed
    pub fn last_estimate(&self, project_type: ProjectType) -> Option<&ProjectEstimate> {
        match project_type {
            ProjectType::Deck => self.last_deck.as_ref(),
            ProjectType::Fence => self.last_fence.as_ref(),
        }
    }

    /// Drop both remembered estimates
    pub fn clear(&mut self) {
        self.last_deck = None;
        self.last_fence = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_estimate_replaces_previous() {
        let mut session = Session::new();
        let first_id = session.estimate_deck(DeckConfig::default()).unwrap().id.clone();

        let wider = DeckConfig {
            width_ft: 20.0,
            ..DeckConfig::default()
        };
        let second = session.estimate_deck(wider).unwrap();
        assert_ne!(second.id, first_id);
        assert_eq!(second.dimensions, "20' x 10'");
        assert_eq!(
            session.last_estimate(ProjectType::Deck).unwrap().dimensions,
            "20' x 10'"
        );
    }

    #[test]
    fn test_failed_estimate_keeps_previous() {
        let mut session = Session::new();
        session.estimate_fence(FenceConfig::default()).unwrap();

        let bad = FenceConfig {
            post_spacing_ft: 0.0,
            ..FenceConfig::default()
        };
        assert!(session.estimate_fence(bad).is_err());
        assert_eq!(
            session.last_fence.as_ref().unwrap().dimensions,
            "50' Length x 6' Height"
        );
    }

    #[test]
    fn test_workflows_are_independent() {
        let mut session = Session::new();
        session.estimate_fence(FenceConfig::default()).unwrap();
        assert!(session.last_estimate(ProjectType::Deck).is_none());
        assert!(session.last_estimate(ProjectType::Fence).is_some());

        session.clear();
        assert!(session.last_fence.is_none());
    }

    #[test]
    fn test_settings_serialization() {
        let settings = EstimatorSettings::default();
        let json = serde_json::to_string_pretty(&settings).unwrap();
        assert!(json.contains("deck-ic-patio"));

        let partial: EstimatorSettings = serde_json::from_str(r#"{ "fence": { "length_ft": 30.0, "height_ft": 4, "post_spacing_ft": 6.0 } }"#).unwrap();
        assert_eq!(partial.deck, DeckConfig::default());
        assert_eq!(partial.fence.height_ft, 4);
    }
}
