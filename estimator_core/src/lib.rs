//! # estimator_core - Deck & Fence Material Engine
//!
//! `estimator_core` turns a handful of deck or fence dimensions into an
//! itemized bill of materials. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take a configuration and return an estimate
//! - **Rule tables**: Each line item comes from one named rule, evaluated in order
//! - **Whole units**: Every quantity is rounded up before it reaches the list
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use estimator_core::calculations::{calculate_fence, FenceConfig};
//!
//! let estimate = calculate_fence(&FenceConfig::default()).unwrap();
//! assert_eq!(estimate.dimensions, "50' Length x 6' Height");
//!
//! let json = serde_json::to_string_pretty(&estimate).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Deck and fence quantity engines
//! - [`materials`] - Product catalog and grades
//! - [`estimate`] - Output types and the shared rounding helper
//! - [`session`] - Last-estimate holder and default settings
//! - [`units`] - Length newtypes and ordering units
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes, versioned settings files, file locks
//! - [`pdf`] - Material list PDF export

pub mod calculations;
pub mod errors;
pub mod estimate;
pub mod file_io;
pub mod materials;
pub mod pdf;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, calculate_deck, calculate_fence, DeckConfig, FenceConfig, ProjectConfig};
pub use errors::{EstimateError, EstimateResult};
pub use estimate::{MaterialItem, ProjectEstimate, ProjectType};
pub use materials::{lookup_product, LumberProduct};
pub use session::{EstimatorSettings, Session};
pub use units::MaterialUnit;
