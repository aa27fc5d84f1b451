use rand::Rng;

use t3e_core::models::{BackgroundDistribution, ChromId, ChromosomeSet};
use t3e_core::{Result, T3eError};

use crate::background::BackgroundModel;

///
/// Draws genomic positions from the per-chromosome background by inverse-CDF
/// lookup.
///
pub struct BackgroundSampler<'a> {
    model: &'a BackgroundModel,
    chromosomes: &'a ChromosomeSet,
}

impl<'a> BackgroundSampler<'a> {
    pub fn new(model: &'a BackgroundModel, chromosomes: &'a ChromosomeSet) -> Self {
        BackgroundSampler { model, chromosomes }
    }

    ///
    /// Draw `count` positions on `chrom`, returned in ascending order.
    ///
    /// Fails with [T3eError::EmptyDistributionError] when the chromosome has no
    /// support points.
    ///
    pub fn draw<R: Rng + ?Sized>(&self, chrom: ChromId, count: usize, rng: &mut R) -> Result<Vec<i64>> {
        match self.model.get(chrom) {
            Some(distribution) if !distribution.is_empty() => Ok(draw_positions(distribution, count, rng)),
            _ => Err(T3eError::EmptyDistributionError(
                self.chromosomes.name(chrom).to_string(),
            )),
        }
    }
}

///
/// Draw `count` values uniformly from `[min cumulative, max cumulative]`,
/// sort them, and resolve all of them against the support in one merge pass:
/// each draw maps to the smallest position whose cumulative probability is
/// >= the draw.
///
/// `distribution` must not be empty.
///
pub fn draw_positions<R: Rng + ?Sized>(distribution: &BackgroundDistribution, count: usize, rng: &mut R) -> Vec<i64> {
    let cumulative = distribution.cumulative();
    let positions = distribution.positions();
    let (Some(low), Some(high)) = (distribution.min_cumulative(), distribution.max_cumulative()) else {
        return Vec::new();
    };

    let mut draws: Vec<f64> = (0..count).map(|_| rng.random_range(low..=high)).collect();
    draws.sort_by(f64::total_cmp);

    let last = cumulative.len() - 1;
    let mut support = 0;
    let mut drawn = Vec::with_capacity(count);
    for value in draws {
        while support < last && cumulative[support] < value {
            support += 1;
        }
        drawn.push(positions[support]);
    }

    drawn
}
