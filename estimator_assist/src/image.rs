//! # Product Image Generation
//!
//! Photorealistic lumber sample images for catalog entries.
//!
//! Generation is best-effort: every failure path yields `None` and the
//! caller shows the product's static image instead. Once the backend reports
//! quota exhaustion the generator stops calling it for the rest of the
//! process.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::errors::AssistResult;

/// Inline image bytes as returned by the backend (base64 payload)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub data: String,
}

impl ImagePayload {
    /// `data:<mime>;base64,<data>` form, usable wherever an image URL is
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// An image-generation backend.
///
/// `Ok(None)` means the call succeeded but no inline image came back.
pub trait ImageBackend: Send + Sync {
    fn generate_image(&self, prompt: &str) -> impl Future<Output = AssistResult<Option<ImagePayload>>> + Send;
}

/// Prompt asking for a close-up material sample that shows grade and species.
pub fn image_prompt(product_name: &str, description: &str) -> String {
    format!(
        "Create a photorealistic product image of a single piece of lumber.
Product Name: {product_name}
Material Description: {description}

Visual Requirements:
- Show a close-up, angled view of the wood board/post.
- HIGHLIGHT THE WOOD GRAIN AND GRADE:
  - If the name contains \"Knotty\" or \"STK\", show tight, natural knots.
  - If the name contains \"Clear\" or \"CVG\", show a smooth, knot-free surface.
  - If it is \"Incense Cedar\", show rich reddish-brown tones.
  - If it is \"Douglas Fir\", show the characteristic straight grain and light red/orange hue.
- Studio lighting, neutral soft white background.
- The image should look like a material sample from a high-end lumber yard.
- No text, labels, or watermarks in the image."
    )
}

pub struct ImageGenerator<B> {
    backend: Option<B>,
    quota_exceeded: AtomicBool,
}

impl<B: ImageBackend> ImageGenerator<B> {
    pub fn new(backend: B) -> Self {
        ImageGenerator {
            backend: Some(backend),
            quota_exceeded: AtomicBool::new(false),
        }
    }

    /// A generator with no API key; always yields `None`.
    pub fn disabled() -> Self {
        ImageGenerator {
            backend: None,
            quota_exceeded: AtomicBool::new(false),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Whether the rate-limit breaker has tripped
    pub fn quota_exceeded(&self) -> bool {
        self.quota_exceeded.load(Ordering::Acquire)
    }

    /// Generate a sample image for a product.
    ///
    /// Returns `None` without calling the backend when no API key is
    /// configured or the breaker has tripped.
    pub async fn generate(&self, product_name: &str, description: &str) -> Option<ImagePayload> {
        if self.quota_exceeded() {
            return None;
        }
        let backend = self.backend.as_ref()?;

        match backend.generate_image(&image_prompt(product_name, description)).await {
            Ok(Some(payload)) => {
                debug!(product = product_name, mime = %payload.mime_type, "image generated");
                Some(payload)
            }
            Ok(None) => {
                debug!(product = product_name, "no inline image in response");
                None
            }
            Err(e) if e.is_rate_limit() => {
                // Only the first caller to flip the flag logs it
                if !self.quota_exceeded.swap(true, Ordering::AcqRel) {
                    warn!(error = %e, "image quota exceeded; using static product images from now on");
                }
                None
            }
            Err(e) => {
                error!(product = product_name, error = %e, "image generation failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AssistError;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    struct FakeImages {
        calls: AtomicUsize,
        result: Mutex<AssistResult<Option<ImagePayload>>>,
    }

    impl FakeImages {
        fn returning(result: AssistResult<Option<ImagePayload>>) -> Self {
            FakeImages {
                calls: AtomicUsize::new(0),
                result: Mutex::new(result),
            }
        }
    }

    impl ImageBackend for FakeImages {
        fn generate_image(&self, prompt: &str) -> impl Future<Output = AssistResult<Option<ImagePayload>>> + Send {
            assert!(prompt.contains("photorealistic"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.lock().unwrap().clone();
            async move { result }
        }
    }

    fn png() -> ImagePayload {
        ImagePayload {
            mime_type: "image/png".to_string(),
            data: "iVBORw0KGgo=".to_string(),
        }
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(png().data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    }

    #[test]
    fn test_prompt_names_product() {
        let prompt = image_prompt("6x6 Doug Fir Post", "Structural grade");
        assert!(prompt.contains("Product Name: 6x6 Doug Fir Post"));
        assert!(prompt.contains("Material Description: Structural grade"));
        assert!(prompt.contains("No text, labels, or watermarks"));
    }

    #[tokio::test]
    async fn test_success_returns_payload() {
        let generator = ImageGenerator::new(FakeImages::returning(Ok(Some(png()))));
        assert_eq!(generator.generate("Post", "desc").await, Some(png()));
    }

    #[tokio::test]
    async fn test_disabled_never_calls_backend() {
        let generator: ImageGenerator<FakeImages> = ImageGenerator::disabled();
        assert!(!generator.is_enabled());
        assert_eq!(generator.generate("Post", "desc").await, None);
    }

    #[tokio::test]
    async fn test_rate_limit_trips_breaker_for_good() {
        let generator = ImageGenerator::new(FakeImages::returning(Err(AssistError::Api {
            status: 429,
            message: "RESOURCE_EXHAUSTED".into(),
        })));

        assert_eq!(generator.generate("Post", "desc").await, None);
        assert!(generator.quota_exceeded());

        *generator.backend.as_ref().unwrap().result.lock().unwrap() = Ok(Some(png()));
        assert_eq!(generator.generate("Post", "desc").await, None);
        assert_eq!(generator.backend.as_ref().unwrap().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_errors_do_not_trip_breaker() {
        let generator = ImageGenerator::new(FakeImages::returning(Err(AssistError::http("connection reset"))));

        assert_eq!(generator.generate("Post", "desc").await, None);
        assert!(!generator.quota_exceeded());

        *generator.backend.as_ref().unwrap().result.lock().unwrap() = Ok(Some(png()));
        assert_eq!(generator.generate("Post", "desc").await, Some(png()));
    }
}
