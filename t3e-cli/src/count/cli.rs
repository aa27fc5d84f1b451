use clap::{Arg, Command};

use crate::species::species_args;

pub const COUNT_CMD: &str = "count";

pub fn create_count_cli() -> Command {
    Command::new(COUNT_CMD)
        .about("Count the weighted overlap of sample reads with each repeat family.")
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
            Arg::new("readlen")
                .long("readlen")
                .required(true)
                .value_parser(clap::value_parser!(u32).range(1..))
                .help("Read length in base pairs"),
        )
        .args(species_args())
        .arg(
            Arg::new("output")
                .long("output")
                .required(true)
                .help("Output file of <family>\\t<count> rows"),
        )
}
