use clap::{Arg, Command};

use crate::species::species_args;

pub const PROBABILITY_CMD: &str = "probability";

pub fn create_probability_cli() -> Command {
    Command::new(PROBABILITY_CMD)
        .about("Build per-chromosome background probability files from an input control experiment.")
        .arg(
            Arg::new("control")
                .long("control")
                .required(true)
                .help("Input control reads: chromosome, start, end, read id (tab-separated, optionally gzipped)"),
        )
        .arg(
            Arg::new("readlen")
                .long("readlen")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Read length in base pairs"),
        )
        .args(species_args())
        .arg(
            Arg::new("outputfolder")
                .long("outputfolder")
                .required(true)
                .help("Folder receiving one <chrom>_prob.txt file per chromosome"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(clap::ArgAction::SetTrue)
                .help("Hide the progress bar"),
        )
}
