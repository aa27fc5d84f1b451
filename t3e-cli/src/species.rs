use std::path::Path;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches};

use t3e_core::consts::DEFAULT_SPECIES;
use t3e_core::models::{ChromosomeSet, SpeciesRegistry};

pub fn species_args() -> [Arg; 2] {
    [
        Arg::new("species")
            .long("species")
            .default_value(DEFAULT_SPECIES)
            .help("Species whose chromosomes are analysed, e.g. hg38 or mm10"),
        Arg::new("species-config")
            .long("species-config")
            .help("TOML file with a [species] table replacing the built-in species"),
    ]
}

///
/// Resolve `--species` against the built-in registry or the one given with
/// `--species-config`.
///
pub fn resolve_chromosomes(matches: &ArgMatches) -> Result<ChromosomeSet> {
    let species = matches
        .get_one::<String>("species")
        .expect("species has a default value");

    let registry = match matches.get_one::<String>("species-config") {
        Some(path) => SpeciesRegistry::try_from(Path::new(path))
            .with_context(|| format!("Failed to load species config {}", path))?,
        None => SpeciesRegistry::builtin(),
    };

    Ok(registry.resolve(species)?)
}
