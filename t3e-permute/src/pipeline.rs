use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use t3e_core::models::{ChromId, ChromosomeSet};
use t3e_core::utils::check_read_len;
use t3e_core::{Result, T3eError};

use crate::accumulator::IterationAccumulator;
use crate::assigner::ReadAssigner;
use crate::background::BackgroundModel;
use crate::consts::{
    CHROM_SEED_MIX, DEFAULT_ITERATIONS, DEFAULT_READ_LEN, DEFAULT_THREADS, ITERATION_SEED_MIX,
};
use crate::control::ControlReadIndex;
use crate::matrix::NullCountMatrix;
use crate::projector::{LocusProjector, ProjectedReads};
use crate::repeats::RepeatIndex;
use crate::sample::SampleReadCounts;
use crate::sampler::BackgroundSampler;
use crate::sweep::OverlapSweep;

#[derive(Debug, Clone, PartialEq)]
pub struct PermutationConfig {
    pub iterations: usize,
    pub read_len: u32,
    /// Run seed; a fresh one is drawn (and logged) when absent.
    pub seed: Option<u64>,
    /// Worker threads, 0 for one per core.
    pub threads: usize,
    pub show_progress: bool,
}

impl Default for PermutationConfig {
    fn default() -> Self {
        PermutationConfig {
            iterations: DEFAULT_ITERATIONS,
            read_len: DEFAULT_READ_LEN,
            seed: None,
            threads: DEFAULT_THREADS,
            show_progress: true,
        }
    }
}

impl PermutationConfig {
    pub fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }
}

///
/// Input files of a permutation run.
///
#[derive(Debug, Clone)]
pub struct PermutationPaths {
    pub control: PathBuf,
    pub sample: PathBuf,
    pub repeats: PathBuf,
    pub probability_folder: PathBuf,
}

///
/// Static, read-only state shared by every worker of a run.
///
#[derive(Debug, Clone)]
pub struct PermutationInputs {
    pub chromosomes: ChromosomeSet,
    pub control: ControlReadIndex,
    pub repeats: RepeatIndex,
    pub background: BackgroundModel,
    pub sample_counts: SampleReadCounts,
}

impl PermutationInputs {
    ///
    /// Load all inputs. `seed` drives the placement of multi-mapped sample
    /// reads when counting draws per chromosome.
    ///
    pub fn load(paths: &PermutationPaths, chromosomes: ChromosomeSet, seed: u64) -> Result<Self> {
        let start = Instant::now();

        let control = ControlReadIndex::from_path(&paths.control, &chromosomes)?;
        info!("Loaded {} control loci of {} reads", control.len(), control.n_reads());

        let repeats = RepeatIndex::from_path(&paths.repeats, &chromosomes)?;
        info!(
            "Loaded {} repeat annotations of {} families",
            repeats.len(),
            repeats.n_families()
        );

        let mut rng = StdRng::seed_from_u64(seed);
        let sample_counts = SampleReadCounts::from_path(&paths.sample, &chromosomes, &mut rng)?;
        info!("Counted {} sample reads", sample_counts.total());

        let background = BackgroundModel::from_folder(
            &paths.probability_folder,
            &chromosomes,
            sample_counts.chromosomes_with_reads(),
        )?;

        info!("Inputs loaded in {:.2}s", start.elapsed().as_secs_f64());

        Ok(PermutationInputs {
            chromosomes,
            control,
            repeats,
            background,
            sample_counts,
        })
    }
}

///
/// Shared flag that stops a run before its next iteration starts.
///
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

///
/// Seed of one (chromosome, iteration) unit, independent of which worker runs
/// it.
///
pub fn unit_seed(seed: u64, chrom: ChromId, iteration: usize) -> u64 {
    seed ^ (chrom.0 as u64 + 1).wrapping_mul(CHROM_SEED_MIX) ^ (iteration as u64 + 1).wrapping_mul(ITERATION_SEED_MIX)
}

struct UnitRunner<'a> {
    inputs: &'a PermutationInputs,
    sampler: BackgroundSampler<'a>,
    assigner: ReadAssigner<'a>,
    projector: LocusProjector<'a>,
    sweep: OverlapSweep,
    read_len: u32,
    seed: u64,
}

impl<'a> UnitRunner<'a> {
    fn new(inputs: &'a PermutationInputs, read_len: u32, seed: u64) -> Self {
        UnitRunner {
            inputs,
            sampler: BackgroundSampler::new(&inputs.background, &inputs.chromosomes),
            assigner: ReadAssigner::new(&inputs.control, &inputs.chromosomes, read_len),
            projector: LocusProjector::new(&inputs.control, read_len),
            sweep: OverlapSweep::new(read_len),
            read_len,
            seed,
        }
    }

    ///
    /// Draw, assign, project and sweep the reads of one chromosome in one
    /// iteration. Projected loci may land on other chromosomes, so every
    /// chromosome that received one is swept.
    ///
    fn run(&self, chrom: ChromId, iteration: usize, accumulator: &mut IterationAccumulator) -> Result<()> {
        let mut rng = StdRng::seed_from_u64(unit_seed(self.seed, chrom, iteration));
        let count = self.inputs.sample_counts.count(chrom);

        let drawn = self.sampler.draw(chrom, count, &mut rng)?;
        let assignments = self.assigner.assign(chrom, drawn, &mut rng)?;
        let projected = ProjectedReads::from_assignments(&self.projector, &assignments, self.inputs.chromosomes.len());

        for target in self.inputs.chromosomes.ids() {
            let reads = projected.on(target);
            if reads.is_empty() {
                continue;
            }
            self.sweep.run(
                reads,
                |id| projected.times(id),
                self.inputs.repeats.intervals_on(target),
                accumulator,
            );
        }

        debug!(
            "iter{} {}: {} reads projected ({} bp)",
            iteration + 1,
            self.inputs.chromosomes.name(chrom),
            projected.n_reads(),
            self.read_len
        );
        Ok(())
    }
}

fn progress_bar(len: usize, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} iterations")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

///
/// Run every iteration and return the null count matrix.
///
/// Iterations are spread over a rayon pool; each worker owns the matrix
/// column of the iteration it runs, and every unit draws from its own seeded
/// generator, so the result depends on `seed` only and not on the number of
/// threads.
///
pub fn run_permutations(
    inputs: &PermutationInputs,
    config: &PermutationConfig,
    seed: u64,
    cancel: &CancelToken,
) -> Result<NullCountMatrix> {
    let read_len = check_read_len(config.read_len)?;
    let n_families = inputs.repeats.n_families();
    let mut matrix = NullCountMatrix::new(inputs.repeats.family_names().to_vec(), config.iterations);

    if n_families == 0 || config.iterations == 0 {
        warn!("Nothing to permute: {} families, {} iterations", n_families, config.iterations);
        return Ok(matrix);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .map_err(|err| T3eError::WorkerPoolError(err.to_string()))?;

    let units: Vec<ChromId> = inputs.sample_counts.chromosomes_with_reads().collect();
    let runner = UnitRunner::new(inputs, read_len, seed);
    let bar = progress_bar(config.iterations, config.show_progress);
    let start = Instant::now();

    info!(
        "Running {} iterations over {} chromosomes on {} threads (seed {})",
        config.iterations,
        units.len(),
        pool.current_num_threads(),
        seed
    );

    pool.install(|| {
        matrix
            .counts_mut()
            .par_chunks_mut(n_families)
            .enumerate()
            .try_for_each(|(iteration, column)| {
                if cancel.is_cancelled() {
                    return Err(T3eError::Cancelled(iteration + 1));
                }
                let mut accumulator = IterationAccumulator::new(n_families);
                for &chrom in &units {
                    runner.run(chrom, iteration, &mut accumulator)?;
                    accumulator.fold_into(column);
                }
                bar.inc(1);
                Ok(())
            })
    })?;

    bar.finish_and_clear();
    info!(
        "Finished {} iterations in {:.2}s",
        config.iterations,
        start.elapsed().as_secs_f64()
    );

    Ok(matrix)
}

///
/// Load the inputs and run the permutations, resolving the seed first.
///
pub fn permute(
    paths: &PermutationPaths,
    chromosomes: ChromosomeSet,
    config: &PermutationConfig,
    cancel: &CancelToken,
) -> Result<NullCountMatrix> {
    check_read_len(config.read_len)?;
    let seed = config.seed_or_random();
    if config.seed.is_none() {
        info!("No seed given, using {}", seed);
    }
    let inputs = PermutationInputs::load(paths, chromosomes, seed)?;
    run_permutations(&inputs, config, seed, cancel)
}
