//! # Permutation engine for t3e
//!
//! Estimates how often ChIP-seq reads would overlap each repeat family by
//! chance. Every iteration re-draws as many read positions per chromosome as
//! the real sample has, from a background distribution built on the input
//! control. Each drawn position is tied to a nearby real control read, and all
//! alignment loci of that read are moved together, so multi-mapped reads keep
//! their ambiguity. Overlap with repeat annotations is weighted by
//! `1 / (multiplicity * read_len)` per shared base.
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use t3e_core::models::SpeciesRegistry;
//! use t3e_permute::{CancelToken, PermutationConfig, PermutationPaths, permute};
//!
//! let chromosomes = SpeciesRegistry::builtin().resolve("hg38").unwrap();
//! let paths = PermutationPaths {
//!     control: PathBuf::from("control.bed"),
//!     sample: PathBuf::from("sample.bed"),
//!     repeats: PathBuf::from("repeats.bed"),
//!     probability_folder: PathBuf::from("prob"),
//! };
//! let config = PermutationConfig {
//!     iterations: 10,
//!     seed: Some(1),
//!     ..Default::default()
//! };
//!
//! let matrix = permute(&paths, chromosomes, &config, &CancelToken::new()).unwrap();
//! matrix.write_to_file("sample_background.txt".as_ref()).unwrap();
//! ```
pub mod accumulator;
pub mod assigner;
pub mod background;
pub mod consts;
pub mod control;
pub mod matrix;
pub mod observed;
pub mod pipeline;
pub mod projector;
pub mod repeats;
pub mod sample;
pub mod sampler;
pub mod sweep;

pub use matrix::NullCountMatrix;
pub use observed::{ObservedCounts, count_observed, count_observed_from_paths};
pub use pipeline::{
    CancelToken, PermutationConfig, PermutationInputs, PermutationPaths, permute, run_permutations,
};
