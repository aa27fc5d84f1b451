//! # Core models for t3e
//!
//! Shared building blocks of the t3e (Transposable Element Enrichment Estimator)
//! workspace: the error taxonomy, four-column record parsing, the
//! species/chromosome registry and the per-chromosome background distribution.
//!
//! ```rust
//! use t3e_core::models::SpeciesRegistry;
//!
//! let chromosomes = SpeciesRegistry::builtin().resolve("mm10").unwrap();
//! assert_eq!(chromosomes.len(), 21);
//! ```
pub mod consts;
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::{Result, T3eError};
