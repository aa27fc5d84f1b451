//! # Enrichment tester for t3e
//!
//! Scores the observed overlap of each repeat family against the null
//! distribution produced by the permutation engine: an empirical p-value and
//! the log2 fold-change over the permuted mean.
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use t3e_enrichment::{EnrichmentThresholds, assess_enrichment, write_results};
//! use t3e_permute::{NullCountMatrix, ObservedCounts};
//!
//! let background = NullCountMatrix::from_path(Path::new("sample_background.txt")).unwrap();
//! let observed = ObservedCounts::from_path(Path::new("sample_counts.txt")).unwrap();
//! let thresholds = EnrichmentThresholds { alpha: 0.05, log2fc: 1.0 };
//!
//! let results = assess_enrichment(&observed, &background, &thresholds);
//! write_results(Path::new("sample_enrichment.txt"), &results).unwrap();
//! ```
pub mod tester;

pub use tester::{EnrichmentResult, EnrichmentThresholds, assess_enrichment, write_results};
