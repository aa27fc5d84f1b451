use std::path::Path;

use fxhash::FxHashMap as HashMap;
use rand::Rng;
use rand::seq::IndexedRandom;

use t3e_core::Result;
use t3e_core::models::{BedRecord, BedRecordReader, ChromId, ChromosomeSet};

///
/// Number of reads to simulate on each chromosome, taken from the real
/// sample. A multi-mapped read counts once, on one of its loci picked
/// uniformly at random.
///
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReadCounts {
    counts: Vec<usize>,
}

impl SampleReadCounts {
    pub fn from_path<R: Rng + ?Sized>(path: &Path, chromosomes: &ChromosomeSet, rng: &mut R) -> Result<Self> {
        let reader = BedRecordReader::from_path(path)?;
        Self::from_records(reader, chromosomes, rng)
    }

    pub fn from_records<I, R>(records: I, chromosomes: &ChromosomeSet, rng: &mut R) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(usize, BedRecord)>>,
        R: Rng + ?Sized,
    {
        // first-seen order keeps the draws reproducible for a given seed
        let mut read_slots: HashMap<String, usize> = HashMap::default();
        let mut read_chroms: Vec<Vec<ChromId>> = Vec::new();

        for record in records {
            let (_, record) = record?;
            let chrom = chromosomes.require(&record.chr)?;
            match read_slots.get(&record.name) {
                Some(&slot) => read_chroms[slot].push(chrom),
                None => {
                    read_slots.insert(record.name, read_chroms.len());
                    read_chroms.push(vec![chrom]);
                }
            }
        }

        let mut counts = vec![0; chromosomes.len()];
        for chroms in &read_chroms {
            if let Some(chrom) = chroms.choose(rng) {
                counts[chrom.0] += 1;
            }
        }

        Ok(SampleReadCounts { counts })
    }

    pub fn count(&self, chrom: ChromId) -> usize {
        self.counts.get(chrom.0).copied().unwrap_or(0)
    }

    ///
    /// Chromosomes that receive at least one draw.
    ///
    pub fn chromosomes_with_reads(&self) -> impl Iterator<Item = ChromId> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(i, _)| ChromId(i))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
