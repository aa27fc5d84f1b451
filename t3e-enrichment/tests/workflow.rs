use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

use t3e_core::models::SpeciesRegistry;
use t3e_enrichment::{EnrichmentThresholds, assess_enrichment, write_results};
use t3e_permute::{
    CancelToken, NullCountMatrix, ObservedCounts, PermutationConfig, PermutationPaths, count_observed_from_paths,
    permute,
};
use t3e_probability::{build_background, write_background};

#[fixture]
fn path_to_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../tests/data/t3e")
}

#[rstest]
fn test_full_workflow(path_to_data: PathBuf) {
    let registry = SpeciesRegistry::try_from(path_to_data.join("species.toml").as_path()).unwrap();
    let chromosomes = registry.resolve("toy").unwrap();
    let out = tempdir().unwrap();
    let read_len = 36;

    // background probabilities from the input control
    let prob = out.path().join("prob");
    let distributions = build_background(&path_to_data.join("control.bed"), &chromosomes, read_len).unwrap();
    let written = write_background(&prob, &chromosomes, &distributions).unwrap();
    assert_eq!(written, vec![prob.join("chr1_prob.txt"), prob.join("chr2_prob.txt")]);

    // permutations
    let paths = PermutationPaths {
        control: path_to_data.join("control.bed"),
        sample: path_to_data.join("sample.bed"),
        repeats: path_to_data.join("repeats.bed"),
        probability_folder: prob,
    };
    let config = PermutationConfig {
        iterations: 20,
        read_len,
        seed: Some(11),
        threads: 2,
        show_progress: false,
    };
    let matrix = permute(&paths, chromosomes.clone(), &config, &CancelToken::new()).unwrap();
    let background = out.path().join("toy_background.txt");
    matrix.write_to_file(&background).unwrap();

    assert_eq!(matrix.families(), &["LINE1".to_string(), "AluY".to_string(), "SVA".to_string()]);
    assert_eq!(fs::read_to_string(&background).unwrap().lines().count(), 20 * 3);
    for iteration in 0..20 {
        let total: f64 = matrix.column(iteration).iter().sum();
        assert!(total <= 36.0 + 1e-9, "iteration {} placed {} reads", iteration + 1, total);
    }
    assert!(matrix.family_counts(2).all(|c| c == 0.0));

    // observed counts
    let counts = out.path().join("toy_counts.txt");
    count_observed_from_paths(&paths.sample, &paths.repeats, &chromosomes, read_len)
        .unwrap()
        .write_to_file(&counts)
        .unwrap();

    // enrichment
    let background = NullCountMatrix::from_path(&background).unwrap();
    let observed = ObservedCounts::from_path(&counts).unwrap();
    let thresholds = EnrichmentThresholds {
        alpha: 0.05,
        log2fc: 0.5,
    };
    let results = assess_enrichment(&observed, &background, &thresholds);
    let output = out.path().join("toy_enrichment.txt");
    write_results(&output, &results).unwrap();

    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 3);

    let line1 = results.iter().find(|r| r.family == "LINE1").unwrap();
    assert_eq!(line1.p_value, 0.0);
    assert!(line1.enriched, "LINE1: {}", line1);

    let sva = results.iter().find(|r| r.family == "SVA").unwrap();
    assert_eq!(sva.log2fc, None);
    assert!(!sva.enriched);
}
