use clap::{Arg, Command};

pub const ENRICHMENT_CMD: &str = "enrichment";

pub fn create_enrichment_cli() -> Command {
    Command::new(ENRICHMENT_CMD)
        .about("Test repeat families for enrichment against a permutation background.")
        .arg(
            Arg::new("background")
                .long("background")
                .required(true)
                .help("Background file written by the permute command"),
        )
        .arg(
            Arg::new("signal")
                .long("signal")
                .required(true)
                .help("Observed counts written by the count command"),
        )
        .arg(
            Arg::new("alpha")
                .long("alpha")
                .default_value("0.05")
                .value_parser(clap::value_parser!(f64))
                .help("Significance level"),
        )
        .arg(
            Arg::new("enrichment")
                .long("enrichment")
                .default_value("1.0")
                .value_parser(clap::value_parser!(f64))
                .help("Minimum log2 fold-change"),
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
                .help("Prefix of the <prefix>_enrichment.txt output"),
        )
}
