mod count;
mod enrichment;
mod permute;
mod probability;
mod species;

use anyhow::Result;
use clap::Command;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "t3e";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Transposable Element Enrichment Estimator: permutation-based enrichment of ChIP-seq signal over repeat families, honouring multi-mapped reads.")
        .subcommand_required(true)
        .subcommand(probability::cli::create_probability_cli())
        .subcommand(permute::cli::create_permute_cli())
        .subcommand(count::cli::create_count_cli())
        .subcommand(enrichment::cli::create_enrichment_cli())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // BACKGROUND PROBABILITIES
        //
        Some((probability::cli::PROBABILITY_CMD, matches)) => {
            probability::handlers::run_probability(matches)?;
        }

        //
        // PERMUTATIONS
        //
        Some((permute::cli::PERMUTE_CMD, matches)) => {
            permute::handlers::run_permute(matches)?;
        }

        //
        // OBSERVED COUNTS
        //
        Some((count::cli::COUNT_CMD, matches)) => {
            count::handlers::run_count(matches)?;
        }

        //
        // ENRICHMENT
        //
        Some((enrichment::cli::ENRICHMENT_CMD, matches)) => {
            enrichment::handlers::run_enrichment(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
