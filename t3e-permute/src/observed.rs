use std::io::{BufRead, Write};
use std::path::Path;

use fxhash::FxHashSet as HashSet;
use log::info;

use t3e_core::models::ChromosomeSet;
use t3e_core::utils::{check_read_len, create_output_file, get_dynamic_reader};
use t3e_core::{Result, T3eError};

use crate::accumulator::IterationAccumulator;
use crate::control::{ControlReadIndex, ReadId};
use crate::projector::ReadSpan;
use crate::repeats::RepeatIndex;
use crate::sweep::OverlapSweep;

///
/// Per-family overlap of the real sample reads, in family order.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedCounts {
    families: Vec<String>,
    counts: Vec<f64>,
}

impl ObservedCounts {
    pub fn new(families: Vec<String>, counts: Vec<f64>) -> Self {
        ObservedCounts { families, counts }
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn get(&self, family: &str) -> Option<f64> {
        let index = self.families.iter().position(|f| f == family)?;
        Some(self.counts[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.families.iter().map(String::as_str).zip(self.counts.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let mut writer = create_output_file(path)?;
        for (family, count) in self.iter() {
            writeln!(writer, "{}\t{}", family, count)?;
        }
        writer.flush()?;
        Ok(())
    }

    ///
    /// Parse `<family>\t<count>` rows. A family may appear only once.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        Self::from_reader(reader, &path.display().to_string())
    }

    pub fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut families = Vec::new();
        let mut counts = Vec::new();
        let mut seen: HashSet<String> = HashSet::default();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != 2 {
                return Err(T3eError::format(
                    source_name,
                    index + 1,
                    format!("expected 2 tab-separated fields, found {}", fields.len()),
                ));
            }
            let count = fields[1].parse::<f64>().map_err(|_| {
                T3eError::format(source_name, index + 1, format!("invalid count: {:?}", fields[1]))
            })?;
            if !seen.insert(fields[0].to_string()) {
                return Err(T3eError::format(
                    source_name,
                    index + 1,
                    format!("duplicate family {}", fields[0]),
                ));
            }
            families.push(fields[0].to_string());
            counts.push(count);
        }

        Ok(ObservedCounts { families, counts })
    }
}

///
/// Sweep the real sample reads against the repeat families with the same
/// weighting applied to permuted reads: every locus covers
/// `[start, start + read_len - 1]` and each shared base is worth
/// `1 / (multiplicity * read_len)`.
///
pub fn count_observed(
    sample: &ControlReadIndex,
    repeats: &RepeatIndex,
    chromosomes: &ChromosomeSet,
    read_len: u32,
) -> Result<ObservedCounts> {
    let read_len = check_read_len(read_len)?;
    let sweep = OverlapSweep::new(read_len);
    let mut accumulator = IterationAccumulator::new(repeats.n_families());
    let mut counts = vec![0.0; repeats.n_families()];

    for chrom in chromosomes.ids() {
        let reads: Vec<ReadSpan<ReadId>> = sample
            .loci_on(chrom)
            .iter()
            .map(|locus| ReadSpan {
                start: locus.position,
                end: locus.position + i64::from(read_len) - 1,
                read: locus.read,
            })
            .collect();

        sweep.run(
            &reads,
            |read| sample.read_multiplicity(read),
            repeats.intervals_on(chrom),
            &mut accumulator,
        );
        accumulator.fold_into(&mut counts);
    }

    info!("Counted sample overlap for {} families", repeats.n_families());
    Ok(ObservedCounts::new(repeats.family_names().to_vec(), counts))
}

///
/// Load the sample and repeat tables and count observed overlap.
///
pub fn count_observed_from_paths(
    sample_path: &Path,
    repeat_path: &Path,
    chromosomes: &ChromosomeSet,
    read_len: u32,
) -> Result<ObservedCounts> {
    let sample = ControlReadIndex::from_path(sample_path, chromosomes)?;
    let repeats = RepeatIndex::from_path(repeat_path, chromosomes)?;
    info!("Loaded {} sample loci of {} reads", sample.len(), sample.n_reads());
    count_observed(&sample, &repeats, chromosomes, read_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use t3e_core::models::BedRecordReader;
    use tempfile::tempdir;

    #[fixture]
    fn chromosomes() -> ChromosomeSet {
        ChromosomeSet::new(&["chr1", "chr2"])
    }

    fn load(sample: &str, repeats: &str, chromosomes: &ChromosomeSet) -> (ControlReadIndex, RepeatIndex) {
        let sample =
            ControlReadIndex::from_records(BedRecordReader::new(sample.as_bytes(), "sample"), chromosomes, "sample")
                .unwrap();
        let repeats =
            RepeatIndex::from_records(BedRecordReader::new(repeats.as_bytes(), "repeats"), chromosomes, "repeats")
                .unwrap();
        (sample, repeats)
    }

    #[rstest]
    fn test_unique_and_shared_reads(chromosomes: ChromosomeSet) {
        let sample = "chr1\t140\t161\tu\n\
                      chr1\t300\t321\tm\n\
                      chr2\t50\t71\tm\n";
        let repeats = "chr1\t100\t200\tLINE1\n\
                       chr1\t290\t310\tAluY\n\
                       chr2\t0\t1000\tLINE1\n\
                       chr2\t5000\t6000\tSVA\n";
        let (sample, repeats) = load(sample, repeats, &chromosomes);

        let observed = count_observed(&sample, &repeats, &chromosomes, 21).unwrap();
        assert_eq!(observed.families(), &["LINE1".to_string(), "AluY".to_string(), "SVA".to_string()]);

        // u: 21/21 in LINE1; m: 11/42 in AluY on chr1 and 21/42 in LINE1 on chr2
        assert!((observed.get("LINE1").unwrap() - 1.5).abs() < 1e-12);
        assert!((observed.get("AluY").unwrap() - 11.0 / 42.0).abs() < 1e-12);
        assert_eq!(observed.get("SVA"), Some(0.0));
    }

    #[rstest]
    fn test_write_and_read_back(chromosomes: ChromosomeSet) {
        let (sample, repeats) = load("chr1\t140\t161\tu\n", "chr1\t100\t200\tLINE1\n", &chromosomes);
        let observed = count_observed(&sample, &repeats, &chromosomes, 21).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("counts.txt");
        observed.write_to_file(&path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "LINE1\t1\n");
        assert_eq!(ObservedCounts::from_path(&path).unwrap(), observed);
    }

    #[rstest]
    fn test_malformed_counts_rejected() {
        let result = ObservedCounts::from_reader("LINE1\t1\tx\n".as_bytes(), "inline");
        assert!(matches!(result, Err(T3eError::FormatError { line: 1, .. })));
    }

    #[rstest]
    fn test_duplicate_family_rejected() {
        let result = ObservedCounts::from_reader("LINE1\t1\nAluY\t2\n\nLINE1\t3\n".as_bytes(), "inline");
        assert!(matches!(result, Err(T3eError::FormatError { line: 4, .. })));
    }

    #[rstest]
    fn test_zero_read_length_rejected(chromosomes: ChromosomeSet) {
        let (sample, repeats) = load("chr1\t140\t161\tu\n", "chr1\t100\t200\tLINE1\n", &chromosomes);
        let result = count_observed(&sample, &repeats, &chromosomes, 0);
        assert!(matches!(result, Err(T3eError::ReadLengthError(0))));
    }
}
