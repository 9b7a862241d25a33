//! Application configuration file.
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "estimator": { "deck": { ... }, "fence": { ... } },
//!   "assist": { "chat_model": "...", "cache_dir": ".estimator-cache", ... }
//! }
//! ```

use std::path::{Path, PathBuf};

use estimator_assist::AssistSettings;
use estimator_core::file_io::{load_versioned, save_versioned};
use estimator_core::{DeckConfig, EstimateResult, EstimatorSettings, FenceConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::{DeckArgs, FenceArgs};

pub const DEFAULT_CONFIG_FILE: &str = "estimator.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub estimator: EstimatorSettings,

    #[serde(default)]
    pub assist: AssistSettings,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `estimator.json` in the
    /// working directory is used if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> EstimateResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    debug!("no configuration file, using defaults");
                    return Ok(AppConfig::default());
                }
                fallback
            }
        };

        debug!(path = %path.display(), "loading configuration");
        load_versioned(&path)
    }

    pub fn save(&self, path: &Path) -> EstimateResult<()> {
        save_versioned(self, path)
    }
}

impl DeckArgs {
    /// Overlay command-line values on the configured defaults
    pub fn apply(&self, base: &DeckConfig) -> DeckConfig {
        DeckConfig {
            width_ft: self.width.unwrap_or(base.width_ft),
            depth_ft: self.depth.unwrap_or(base.depth_ft),
            post_spacing_ft: self.post_spacing.unwrap_or(base.post_spacing_ft),
            include_railings: self.railings.unwrap_or(base.include_railings),
            include_mid_rail: self.mid_rail.unwrap_or(base.include_mid_rail),
            include_ledger: self.ledger.unwrap_or(base.include_ledger),
            decking_product_id: self
                .decking
                .clone()
                .unwrap_or_else(|| base.decking_product_id.clone()),
        }
    }
}

impl FenceArgs {
    pub fn apply(&self, base: &FenceConfig) -> FenceConfig {
        FenceConfig {
            length_ft: self.length.unwrap_or(base.length_ft),
            height_ft: self.height.unwrap_or(base.height_ft),
            post_spacing_ft: self.post_spacing.unwrap_or(base.post_spacing_ft),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estimator.json");

        let mut config = AppConfig::default();
        config.estimator.fence.height_ft = 8;
        config.assist.timeout_secs = 15;
        config.save(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"version\""));

        let loaded = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(Some(&dir.path().join("nope.json")));
        assert!(result.is_err());
    }

    #[test]
    fn test_args_override_only_given_fields() {
        let args = DeckArgs {
            width: Some(16.0),
            railings: Some(false),
            ..DeckArgs::default()
        };
        let merged = args.apply(&DeckConfig::default());
        assert_eq!(merged.width_ft, 16.0);
        assert_eq!(merged.depth_ft, 10.0);
        assert!(!merged.include_railings);
        assert!(merged.include_ledger);

        let fence = FenceArgs {
            height: Some(4),
            ..FenceArgs::default()
        }
        .apply(&FenceConfig::default());
        assert_eq!(fence.height_ft, 4);
        assert_eq!(fence.length_ft, 50.0);
    }
}
