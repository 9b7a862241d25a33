//! Lumber Product Catalog
//!
//! Static, read-only table of the products the yard stocks. Built once on
//! first access and never mutated.
//!
//! Lookups by id never fail: an unknown or empty id resolves to the first
//! catalog entry, and the returned [`ProductLookup`] records whether that
//! fallback happened.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::grade::CedarGrade;
use crate::errors::{EstimateError, EstimateResult};

/// Decking product selected when a deck configuration does not name one
pub const DEFAULT_DECKING_ID: &str = "deck-ic-patio";

/// A catalog entry.
///
/// ## JSON Example
///
/// ```json
/// {
///   "id": "deck-ic-patio",
///   "name": "5/4x6 IC Patio S4S EE Dry",
///   "grade": "Architectural Knotty",
///   "dimensions": "1\" x 5.5\"",
///   "image_url": "https://picsum.photos/400/300",
///   "description": "Premium Incense Cedar patio decking.",
///   "usage": ["Decks", "Patios"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LumberProduct {
    /// Stable unique key
    pub id: String,
    /// Yard tally name
    pub name: String,
    /// Appearance grade
    pub grade: CedarGrade,
    /// Actual cross-section, for display
    pub dimensions: String,
    /// Static placeholder image, used when no generated image is available
    pub image_url: String,
    /// Marketing description
    pub description: String,
    /// Intended uses, in display order
    pub usage: Vec<String>,
}

impl LumberProduct {
    fn new(
        id: &str,
        name: &str,
        grade: CedarGrade,
        dimensions: &str,
        image_url: &str,
        description: &str,
        usage: &[&str],
    ) -> Self {
        LumberProduct {
            id: id.to_string(),
            name: name.to_string(),
            grade,
            dimensions: dimensions.to_string(),
            image_url: image_url.to_string(),
            description: description.to_string(),
            usage: usage.iter().map(|u| u.to_string()).collect(),
        }
    }

    /// Whether the product lists the given usage tag (case-insensitive)
    pub fn has_usage(&self, tag: &str) -> bool {
        self.usage.iter().any(|u| u.eq_ignore_ascii_case(tag))
    }
}

/// How a lookup was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// The requested id exists in the catalog
    Found,
    /// The id was unknown or empty; the first catalog entry was substituted
    Defaulted,
}

/// Result of [`lookup_product`]
#[derive(Debug, Clone, Copy)]
pub struct ProductLookup {
    pub product: &'static LumberProduct,
    pub resolution: Resolution,
}

impl ProductLookup {
    /// True when the fallback product was substituted
    pub fn is_defaulted(&self) -> bool {
        self.resolution == Resolution::Defaulted
    }
}

static CATALOG: Lazy<Vec<LumberProduct>> = Lazy::new(|| {
    use CedarGrade::*;
    vec![
        // Decking (Incense Cedar & Red Grandis)
        LumberProduct::new(
            "deck-ic-patio",
            "5/4x6 IC Patio S4S EE Dry",
            ArchitecturalKnotty,
            "1\" x 5.5\"",
            "https://picsum.photos/400/300",
            "Premium Incense Cedar patio decking. Sourced from Unity Forest Products. Dried for stability.",
            &["Decks", "Patios"],
        ),
        LumberProduct::new(
            "deck-ic-3btr",
            "5/4x6 IC #3 & Better S4S EE Dry",
            SelectTightKnot,
            "1\" x 5.5\"",
            "https://picsum.photos/401/300",
            "Standard rustic grade Incense Cedar decking. Cost-effective and durable.",
            &["Decks", "Walkways"],
        ),
        LumberProduct::new(
            "deck-red-grandis",
            "5/4 Red Grandis PO FAS S4S EE",
            ClearHeart,
            "1\" x 5.5\"",
            "https://picsum.photos/411/300",
            "FSC-certified plantation hardwood from Uruguay. A sustainable, premium alternative to Mahogany.",
            &["High-end Decks", "Furniture"],
        ),
        // Fencing (Incense Cedar)
        LumberProduct::new(
            "fence-picket-ic-3",
            "1x6 IC #3 Fencing",
            ArchitecturalKnotty,
            "0.75\" x 5.5\"",
            "https://picsum.photos/403/300",
            "Standard Incense Cedar fence picket. Rot resistant.",
            &["Privacy Fences"],
        ),
        LumberProduct::new(
            "fence-rail-ic",
            "2x4 IC Std Rails Rgh Dry",
            SelectTightKnot,
            "1.5\" x 3.5\"",
            "https://picsum.photos/404/300",
            "Rough sawn Incense Cedar rails. Matches cedar pickets perfectly.",
            &["Fence Rails"],
        ),
        // Posts
        LumberProduct::new(
            "post-4x4-wc",
            "4x4 WC Outs Posts",
            SelectTightKnot,
            "3.5\" x 3.5\"",
            "https://picsum.photos/402/300",
            "Utility grade Western Cedar posts.",
            &["Fence Posts"],
        ),
        LumberProduct::new(
            "post-6x6-pt",
            "6x6 Pressure Treated",
            SelectTightKnot,
            "5.5\" x 5.5\"",
            "https://picsum.photos/405/300",
            "Ground contact pressure treated post for structural deck support.",
            &["Deck Posts", "Structural"],
        ),
        // Framing
        LumberProduct::new(
            "framing-2x4-df",
            "2x4 Doug Fir \"Framing\"",
            SelectTightKnot,
            "1.5\" x 3.5\"",
            "https://picsum.photos/412/300",
            "Standard Douglas Fir framing lumber.",
            &["Framing", "Fence Rails"],
        ),
        LumberProduct::new(
            "framing-2x6-df",
            "2x6 Doug Fir \"Framing\"",
            SelectTightKnot,
            "1.5\" x 5.5\"",
            "https://picsum.photos/406/300",
            "Structural Douglas Fir. Ideal for deck joists.",
            &["Joists", "Framing"],
        ),
        // Beams
        LumberProduct::new(
            "beam-4x10-wrc",
            "4x10 WRC Per Ft.",
            SelectTightKnot,
            "3.5\" x 9.25\"",
            "https://picsum.photos/408/300",
            "Massive Western Red Cedar timber. The gold standard for appearance.",
            &["Beams", "Pergolas"],
        ),
        // Siding
        LumberProduct::new(
            "siding-bevel-wrc",
            "1x10 Cedar Bevel Siding Per Ft.",
            ArchitecturalKnotty,
            "0.75\" x 9.25\"",
            "https://picsum.photos/409/300",
            "Classic WRC Bevel Siding. Sourced from Unity Forest Products.",
            &["Siding"],
        ),
        LumberProduct::new(
            "siding-bnb-pp",
            "1x12 PP S4S (Board and Batten)",
            SelectTightKnot,
            "0.75\" x 11.25\"",
            "https://picsum.photos/410/300",
            "Ponderosa Pine S4S. Perfect for board and batten siding.",
            &["Siding", "Trim"],
        ),
    ]
});

/// Every catalog product, in display order
pub fn catalog() -> &'static [LumberProduct] {
    CATALOG.as_slice()
}

/// The entry substituted for unknown ids
pub fn fallback_product() -> &'static LumberProduct {
    // The table literal above is non-empty.
    &CATALOG[0]
}

/// Look up a product by id, degrading to [`fallback_product`] on a miss.
///
/// # Example
///
/// ```rust
/// use estimator_core::materials::{lookup_product, Resolution};
///
/// let hit = lookup_product("deck-red-grandis");
/// assert_eq!(hit.resolution, Resolution::Found);
///
/// let miss = lookup_product("deck-teak");
/// assert!(miss.is_defaulted());
/// assert_eq!(miss.product.id, "deck-ic-patio");
/// ```
pub fn lookup_product(id: &str) -> ProductLookup {
    match catalog().iter().find(|p| p.id == id) {
        Some(product) => ProductLookup {
            product,
            resolution: Resolution::Found,
        },
        None => {
            let product = fallback_product();
            warn!(requested = id, fallback = %product.id, "unknown product id, using catalog default");
            ProductLookup {
                product,
                resolution: Resolution::Defaulted,
            }
        }
    }
}

/// Strict lookup: an unknown id is an error rather than a fallback.
pub fn find_product(id: &str) -> EstimateResult<&'static LumberProduct> {
    catalog()
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| EstimateError::unknown_product_id(id))
}

/// Products tagged with the given usage (case-insensitive)
pub fn products_for_usage(tag: &str) -> Vec<&'static LumberProduct> {
    catalog().iter().filter(|p| p.has_usage(tag)).collect()
}

/// Products selectable as deck surface boards
pub fn decking_products() -> Vec<&'static LumberProduct> {
    catalog().iter().filter(|p| p.id.starts_with("deck-")).collect()
}
