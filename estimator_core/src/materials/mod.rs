//! # Materials
//!
//! The product catalog and the grades used to describe it.
//!
//! ## Example
//!
//! ```rust
//! use estimator_core::materials::{catalog, lookup_product, CedarGrade};
//!
//! let product = lookup_product("deck-red-grandis").product;
//! assert_eq!(product.grade, CedarGrade::ClearHeart);
//! assert!(catalog().len() > 1);
//! ```

pub mod catalog;
pub mod grade;

pub use catalog::{
    catalog, decking_products, fallback_product, find_product, lookup_product,
    products_for_usage, LumberProduct, ProductLookup, Resolution, DEFAULT_DECKING_ID,
};
pub use grade::CedarGrade;
