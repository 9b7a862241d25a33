//! Assistant configuration, stored in the `assist` section of the app config.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{AssistError, AssistResult};

pub const DEFAULT_CHAT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistSettings {
    /// Model used for the carpentry chat
    pub chat_model: String,

    /// Model used for product sample images
    pub image_model: String,

    /// Name of the environment variable holding the API key
    pub api_key_env: String,

    /// Base URL of the generative-language REST API
    pub endpoint: String,

    /// Directory for cached product images
    pub cache_dir: PathBuf,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AssistSettings {
    fn default() -> Self {
        AssistSettings {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_dir: PathBuf::from(".estimator-cache"),
            timeout_secs: 60,
        }
    }
}

impl AssistSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Read the API key from the configured environment variable.
    ///
    /// Blank values count as missing.
    pub fn api_key(&self) -> AssistResult<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AssistError::MissingApiKey {
                var: self.api_key_env.clone(),
            })
    }
}
