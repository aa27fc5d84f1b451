use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use t3e_permute::count_observed_from_paths;

use crate::species::resolve_chromosomes;

pub fn run_count(matches: &ArgMatches) -> Result<()> {
    let repeat = matches
        .get_one::<String>("repeat")
        .expect("A path to the repeat annotation is required.");

    let sample = matches
        .get_one::<String>("sample")
        .expect("A path to the sample reads is required.");

    let read_len = *matches
        .get_one::<u32>("readlen")
        .expect("A read length is required.");

    let output = matches
        .get_one::<String>("output")
        .expect("An output path is required.");

    let chromosomes = resolve_chromosomes(matches)?;
    let observed = count_observed_from_paths(Path::new(sample), Path::new(repeat), &chromosomes, read_len)?;

    observed
        .write_to_file(Path::new(output))
        .with_context(|| format!("Failed to write {}", output))?;

    Ok(())
}
