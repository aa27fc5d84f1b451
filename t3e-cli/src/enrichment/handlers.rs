use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use t3e_core::consts::ENRICHMENT_FILE_SUFFIX;
use t3e_enrichment::{EnrichmentThresholds, assess_enrichment, write_results};
use t3e_permute::{NullCountMatrix, ObservedCounts};

pub fn run_enrichment(matches: &ArgMatches) -> Result<()> {
    let background = matches
        .get_one::<String>("background")
        .expect("A path to the background file is required.");

    let signal = matches
        .get_one::<String>("signal")
        .expect("A path to the observed counts is required.");

    let thresholds = EnrichmentThresholds {
        alpha: *matches.get_one::<f64>("alpha").expect("alpha has a default value"),
        log2fc: *matches
            .get_one::<f64>("enrichment")
            .expect("enrichment has a default value"),
    };

    let folder = matches
        .get_one::<String>("outputfolder")
        .expect("An output folder is required.");
    let prefix = matches
        .get_one::<String>("outputprefix")
        .expect("An output prefix is required.");
    let output = Path::new(folder).join(format!("{}{}", prefix, ENRICHMENT_FILE_SUFFIX));

    let background = NullCountMatrix::from_path(Path::new(background))
        .with_context(|| format!("Failed to load background {}", background))?;
    let observed = ObservedCounts::from_path(Path::new(signal))
        .with_context(|| format!("Failed to load observed counts {}", signal))?;

    let results = assess_enrichment(&observed, &background, &thresholds);
    let enriched = results.iter().filter(|r| r.enriched).count();
    info!(
        "{} of {} families enriched over {} iterations",
        enriched,
        results.len(),
        background.iterations()
    );

    write_results(&output, &results).with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
