use clap::{Arg, Command};

use crate::species::species_args;

pub const PERMUTE_CMD: &str = "permute";

pub fn create_permute_cli() -> Command {
    Command::new(PERMUTE_CMD)
        .about("Estimate the null overlap of sample reads with repeat families by permutation.")
        .arg(
            Arg::new("repeat")
                .long("repeat")
                .required(true)
                .help("Repeat annotation: chromosome, start, end, family (tab-separated)"),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .required(true)
                .help("ChIP-seq sample reads: chromosome, start, end, read id"),
        )
        .arg(
            Arg::new("control")
                .long("control")
                .required(true)
                .help("Input control reads: chromosome, start, end, read id"),
        )
        .arg(
            Arg::new("probability")
                .long("probability")
                .required(true)
                .help("Folder with the <chrom>_prob.txt files built by the probability command"),
        )
        .arg(
            Arg::new("readlen")
                .long("readlen")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Read length in base pairs"),
        )
        .arg(
            Arg::new("iter")
                .long("iter")
                .required(true)
                .value_parser(clap::value_parser!(usize))
                .help("Number of iterations"),
        )
        .args(species_args())
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(clap::value_parser!(u64))
                .help("Random seed; a fresh one is drawn and logged when omitted"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Worker threads, 0 for one per core"),
        )
        .arg(
            Arg::new("outputfolder")
                .long("outputfolder")
                .required(true)
                .help("Output folder"),
        )
        .arg(
            Arg::new("outputprefix")
                .long("outputprefix")
                .required(true)
                .help("Prefix of the <prefix>_background.txt output"),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .action(clap::ArgAction::SetTrue)
                .help("Hide the progress bar"),
        )
}
