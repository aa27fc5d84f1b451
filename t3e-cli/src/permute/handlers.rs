use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use t3e_core::consts::BACKGROUND_FILE_SUFFIX;
use t3e_permute::{CancelToken, PermutationConfig, PermutationPaths, permute};

use crate::species::resolve_chromosomes;

pub fn run_permute(matches: &ArgMatches) -> Result<()> {
    let path_of = |name: &str| -> PathBuf {
        PathBuf::from(
            matches
                .get_one::<String>(name)
                .unwrap_or_else(|| panic!("--{} is required", name)),
        )
    };

    let paths = PermutationPaths {
        control: path_of("control"),
        sample: path_of("sample"),
        repeats: path_of("repeat"),
        probability_folder: path_of("probability"),
    };

    let config = PermutationConfig {
        iterations: *matches.get_one::<usize>("iter").expect("--iter is required"),
        read_len: *matches.get_one::<u32>("readlen").expect("--readlen is required"),
        seed: matches.get_one::<u64>("seed").copied(),
        threads: *matches.get_one::<usize>("threads").expect("threads has a default value"),
        show_progress: !matches.get_flag("no-progress"),
    };

    let folder = path_of("outputfolder");
    let prefix = matches
        .get_one::<String>("outputprefix")
        .expect("--outputprefix is required");
    let output = folder.join(format!("{}{}", prefix, BACKGROUND_FILE_SUFFIX));

    let chromosomes = resolve_chromosomes(matches)?;
    let matrix = permute(&paths, chromosomes, &config, &CancelToken::new())?;

    matrix
        .write_to_file(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Background written to {}", output.display());

    Ok(())
}
