use std::path::Path;

use log::debug;

use t3e_core::Result;
use t3e_core::models::{BackgroundDistribution, ChromId, ChromosomeSet, probability_file_path};

///
/// The background distributions of a run, one slot per chromosome. Slots of
/// chromosomes that receive no draws stay empty.
///
#[derive(Debug, Clone, Default)]
pub struct BackgroundModel {
    distributions: Vec<Option<BackgroundDistribution>>,
}

impl BackgroundModel {
    pub fn new(n_chromosomes: usize) -> Self {
        BackgroundModel {
            distributions: vec![None; n_chromosomes],
        }
    }

    ///
    /// Load `<chrom>_prob.txt` from `folder` for every chromosome in `wanted`.
    ///
    pub fn from_folder<I>(folder: &Path, chromosomes: &ChromosomeSet, wanted: I) -> Result<Self>
    where
        I: IntoIterator<Item = ChromId>,
    {
        let mut model = BackgroundModel::new(chromosomes.len());
        for chrom in wanted {
            let path = probability_file_path(folder, chromosomes.name(chrom));
            let distribution = BackgroundDistribution::from_path(&path)?;
            debug!(
                "Loaded {} support points for {}",
                distribution.len(),
                chromosomes.name(chrom)
            );
            model.insert(chrom, distribution);
        }
        Ok(model)
    }

    pub fn insert(&mut self, chrom: ChromId, distribution: BackgroundDistribution) {
        if chrom.0 >= self.distributions.len() {
            self.distributions.resize(chrom.0 + 1, None);
        }
        self.distributions[chrom.0] = Some(distribution);
    }

    pub fn get(&self, chrom: ChromId) -> Option<&BackgroundDistribution> {
        self.distributions.get(chrom.0).and_then(Option::as_ref)
    }
}
