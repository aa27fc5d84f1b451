//! # Background probability builder for t3e
//!
//! Builds the per-chromosome cumulative distributions that permutation draws
//! positions from. The distribution follows the read coverage of an input
//! control experiment, with multi-mapped reads down-weighted by the number of
//! loci they align to.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use t3e_core::models::SpeciesRegistry;
//! use t3e_probability::{build_background, write_background};
//!
//! let chromosomes = SpeciesRegistry::builtin().resolve("hg38").unwrap();
//! let distributions = build_background(Path::new("control.bed"), &chromosomes, 36).unwrap();
//! write_background(Path::new("prob"), &chromosomes, &distributions).unwrap();
//! ```
pub mod builder;

pub use builder::{build_background, build_background_from_records, write_background};
