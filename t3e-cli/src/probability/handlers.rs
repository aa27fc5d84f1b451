use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use t3e_core::models::BedRecordReader;
use t3e_probability::{build_background_from_records, write_background};

use crate::species::resolve_chromosomes;

pub fn run_probability(matches: &ArgMatches) -> Result<()> {
    let control = matches
        .get_one::<String>("control")
        .expect("A path to the control reads is required.");

    let read_len = *matches
        .get_one::<u32>("readlen")
        .expect("A read length is required.");

    let output = matches
        .get_one::<String>("outputfolder")
        .expect("An output folder is required.");

    let show_progress = !matches.get_flag("no-progress");
    let chromosomes = resolve_chromosomes(matches)?;

    let reader = BedRecordReader::from_path(Path::new(control))
        .with_context(|| format!("Failed to open control reads {}", control))?;
    let distributions = build_background_from_records(reader, &chromosomes, read_len, control, show_progress)?;

    write_background(Path::new(output), &chromosomes, &distributions)
        .with_context(|| format!("Failed to write probability files to {}", output))?;

    Ok(())
}
