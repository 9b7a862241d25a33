//! # Product Image Cache
//!
//! Generated images are expensive, so each one is stored on disk under
//! `<cache_dir>/product_img_v2_<product id>.json` and reused on later runs.
//! Entries are written atomically under a file lock.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use estimator_core::file_io::{load_json, save_json, FileLock};
use estimator_core::materials::LumberProduct;
use estimator_core::EstimateError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AssistResult;
use crate::image::{ImageBackend, ImageGenerator, ImagePayload};

/// Bump the version suffix to invalidate every cached image
pub const CACHE_KEY_PREFIX: &str = "product_img_v2_";

pub fn cache_key(product_id: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, product_id)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedImage {
    pub product_id: String,
    pub image: ImagePayload,
    pub created: DateTime<Utc>,
}

/// Directory-backed image store
#[derive(Debug, Clone)]
pub struct ImageCache {
    dir: PathBuf,
}

impl ImageCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ImageCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, product_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(product_id)))
    }

    /// Cached image for a product, if present.
    ///
    /// A missing entry is `Ok(None)`; an unreadable one is an error.
    pub fn get(&self, product_id: &str) -> AssistResult<Option<CachedImage>> {
        let path = self.entry_path(product_id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(load_json(&path)?))
    }

    pub fn put(&self, product_id: &str, image: &ImagePayload) -> AssistResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            EstimateError::file_error("create cache dir", self.dir.display().to_string(), e.to_string())
        })?;

        let path = self.entry_path(product_id);
        let _lock = FileLock::acquire(&path)?;

        let entry = CachedImage {
            product_id: product_id.to_string(),
            image: image.clone(),
            created: Utc::now(),
        };
        save_json(&entry, &path)?;
        Ok(())
    }
}

/// Resolves the image to display for a catalog product.
pub struct ProductImageService<B> {
    generator: ImageGenerator<B>,
    cache: ImageCache,
}

impl<B: ImageBackend> ProductImageService<B> {
    pub fn new(generator: ImageGenerator<B>, cache: ImageCache) -> Self {
        ProductImageService { generator, cache }
    }

    pub fn generator(&self) -> &ImageGenerator<B> {
        &self.generator
    }

    /// Image source for `product`: a cached or freshly generated data URI,
    /// or the product's static `image_url`.
    ///
    /// Cache failures are logged and otherwise ignored.
    pub async fn image_for(&self, product: &LumberProduct) -> String {
        match self.cache.get(&product.id) {
            Ok(Some(entry)) => {
                debug!(product_id = %product.id, "image cache hit");
                return entry.image.data_uri();
            }
            Ok(None) => {}
            Err(e) => warn!(product_id = %product.id, error = %e, "unreadable image cache entry"),
        }

        match self.generator.generate(&product.name, &product.description).await {
            Some(image) => {
                if let Err(e) = self.cache.put(&product.id, &image) {
                    warn!(product_id = %product.id, error = %e, "failed to cache generated image");
                }
                image.data_uri()
            }
            None => product.image_url.clone(),
        }
    }
}
