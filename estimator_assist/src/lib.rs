//! # estimator_assist - Generative Collaborators
//!
//! Optional helpers around the estimator: a carpentry chat assistant and
//! generated product sample images. Neither affects quantities, and neither
//! ever fails loudly; without an API key or network they degrade to fixed
//! replies and the catalog's static images.
//!
//! ## Modules
//!
//! - [`chat`] - Conversation history and the text backend seam
//! - [`image`] - Image generation with a one-way rate-limit breaker
//! - [`cache`] - On-disk product image cache
//! - [`gemini`] - REST backend for both seams
//! - [`settings`] - Models, key variable, cache location, timeout
//! - [`errors`] - Backend and cache errors

pub mod cache;
pub mod chat;
pub mod errors;
pub mod gemini;
pub mod image;
pub mod settings;

pub use cache::{ImageCache, ProductImageService};
pub use chat::{ChatAssistant, ChatMessage, Role, TextBackend};
pub use errors::{AssistError, AssistResult};
pub use gemini::GeminiClient;
pub use image::{ImageBackend, ImageGenerator, ImagePayload};
pub use settings::AssistSettings;
