use std::path::{Path, PathBuf};
use std::time::Instant;

use fxhash::FxHashMap as HashMap;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

use t3e_core::Result;
use t3e_core::utils::check_read_len;
use t3e_core::models::{
    BackgroundDistribution, BedRecord, BedRecordReader, ChromId, ChromosomeSet, probability_file_path,
};

///
/// Start positions of the loci on each chromosome, paired with the read
/// they belong to, plus the number of loci of every read.
///
struct ControlLoci {
    starts: Vec<Vec<(i64, usize)>>,
    multiplicity: Vec<u32>,
}

impl ControlLoci {
    fn from_records<I>(records: I, chromosomes: &ChromosomeSet) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(usize, BedRecord)>>,
    {
        let mut starts = vec![Vec::new(); chromosomes.len()];
        let mut multiplicity: Vec<u32> = Vec::new();
        let mut read_slots: HashMap<String, usize> = HashMap::default();

        for record in records {
            let (_, record) = record?;
            let chrom = chromosomes.require(&record.chr)?;
            let slot = match read_slots.get(&record.name) {
                Some(&slot) => {
                    multiplicity[slot] += 1;
                    slot
                }
                None => {
                    read_slots.insert(record.name, multiplicity.len());
                    multiplicity.push(1);
                    multiplicity.len() - 1
                }
            };
            starts[chrom.0].push((record.start, slot));
        }

        Ok(ControlLoci { starts, multiplicity })
    }
}

///
/// Turn the loci of one chromosome into a cumulative distribution.
///
/// Every locus spreads `1 / (m * read_len * N)` over the positions
/// `start + 1 ..= start + read_len`, where `m` is the multiplicity of its read
/// and `N` the sum of `1 / m` over all loci of the chromosome. Positions are
/// the drawn positions from which the locus can be picked, since a locus is a
/// candidate for every draw in `(start, start + read_len]`.
///
fn chromosome_distribution(
    loci: &[(i64, usize)],
    multiplicity: &[u32],
    read_len: u32,
    source_name: &str,
) -> Result<BackgroundDistribution> {
    let total: f64 = loci.iter().map(|(_, read)| 1.0 / f64::from(multiplicity[*read])).sum();
    let len = i64::from(read_len);

    let mut mass: HashMap<i64, f64> = HashMap::default();
    for (start, read) in loci {
        let weight = 1.0 / (f64::from(multiplicity[*read]) * f64::from(read_len) * total);
        for position in start + 1..=start + len {
            *mass.entry(position).or_insert(0.0) += weight;
        }
    }

    let mut positions: Vec<(i64, f64)> = mass.into_iter().collect();
    positions.sort_by_key(|(position, _)| *position);

    let mut pairs = Vec::with_capacity(positions.len());
    let mut cumulative = 0.0;
    for (position, weight) in positions {
        let next = cumulative + weight;
        // rounding can leave a tiny mass invisible in the running sum
        if next > cumulative {
            pairs.push((position, next));
            cumulative = next;
        }
    }

    BackgroundDistribution::from_pairs(pairs, source_name)
}

///
/// Build the background distribution of every chromosome in `chromosomes`
/// that carries at least one control read.
///
pub fn build_background(
    control_path: &Path,
    chromosomes: &ChromosomeSet,
    read_len: u32,
) -> Result<Vec<(ChromId, BackgroundDistribution)>> {
    let reader = BedRecordReader::from_path(control_path)?;
    let source_name = reader.source_name().to_string();
    build_background_from_records(reader, chromosomes, read_len, &source_name, false)
}

pub fn build_background_from_records<I>(
    records: I,
    chromosomes: &ChromosomeSet,
    read_len: u32,
    source_name: &str,
    show_progress: bool,
) -> Result<Vec<(ChromId, BackgroundDistribution)>>
where
    I: IntoIterator<Item = Result<(usize, BedRecord)>>,
{
    let read_len = check_read_len(read_len)?;
    let start = Instant::now();
    let loci = ControlLoci::from_records(records, chromosomes)?;
    info!(
        "Read {} control reads in {:.2}s",
        loci.multiplicity.len(),
        start.elapsed().as_secs_f64()
    );

    let bar = if show_progress {
        let bar = ProgressBar::new(chromosomes.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut distributions = Vec::new();
    for chrom in chromosomes.ids() {
        let name = chromosomes.name(chrom);
        bar.set_message(name.to_string());
        let on_chrom = &loci.starts[chrom.0];
        if on_chrom.is_empty() {
            warn!("No control reads on {}, skipping", name);
        } else {
            let distribution = chromosome_distribution(on_chrom, &loci.multiplicity, read_len, source_name)?;
            distributions.push((chrom, distribution));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    Ok(distributions)
}

///
/// Write one `<chrom>_prob.txt` file per distribution into `folder`.
///
pub fn write_background(
    folder: &Path,
    chromosomes: &ChromosomeSet,
    distributions: &[(ChromId, BackgroundDistribution)],
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(distributions.len());
    for (chrom, distribution) in distributions {
        let path = probability_file_path(folder, chromosomes.name(*chrom));
        distribution.write_to_file(&path)?;
        written.push(path);
    }
    info!("Wrote {} distribution files to {}", written.len(), folder.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use t3e_core::T3eError;
    use tempfile::tempdir;

    #[fixture]
    fn chromosomes() -> ChromosomeSet {
        ChromosomeSet::new(&["chr1", "chr2", "chr3"])
    }

    fn build(data: &str, chromosomes: &ChromosomeSet) -> Result<Vec<(ChromId, BackgroundDistribution)>> {
        build_background_from_records(
            BedRecordReader::new(data.as_bytes(), "inline"),
            chromosomes,
            21,
            "inline",
            false,
        )
    }

    #[rstest]
    fn test_unique_reads(chromosomes: ChromosomeSet) {
        let distributions = build("chr1\t100\t121\ta\nchr1\t110\t131\tb\n", &chromosomes).unwrap();
        assert_eq!(distributions.len(), 1);

        let (chrom, distribution) = &distributions[0];
        assert_eq!(*chrom, ChromId(0));
        assert_eq!(distribution.len(), 31);
        assert_eq!(distribution.min_position(), Some(101));
        assert_eq!(distribution.max_position(), Some(131));
        assert!((distribution.max_cumulative().unwrap() - 1.0).abs() < 1e-12);

        // 101..=110 carry one read, 111..=121 both
        let step = 1.0 / 42.0;
        assert!((distribution.cumulative()[0] - step).abs() < 1e-12);
        assert!((distribution.cumulative()[10] - 12.0 * step).abs() < 1e-12);
    }

    #[rstest]
    fn test_each_chromosome_is_normalised(chromosomes: ChromosomeSet) {
        let data = "chr1\t100\t121\tm\n\
                    chr1\t300\t321\tu\n\
                    chr3\t500\t521\tm\n";
        let distributions = build(data, &chromosomes).unwrap();
        let chroms: Vec<ChromId> = distributions.iter().map(|(c, _)| *c).collect();
        assert_eq!(chroms, vec![ChromId(0), ChromId(2)]);

        for (_, distribution) in &distributions {
            assert!((distribution.max_cumulative().unwrap() - 1.0).abs() < 1e-12);
        }

        // on chr1 the ambiguous read weighs half of the unique one
        let chr1 = &distributions[0].1;
        let at = |pos: i64| {
            let i = chr1.positions().iter().position(|&p| p == pos).unwrap();
            chr1.cumulative()[i]
        };
        assert!((at(121) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[rstest]
    fn test_unknown_chromosome(chromosomes: ChromosomeSet) {
        let result = build("chrM\t1\t22\ta\n", &chromosomes);
        assert!(matches!(result, Err(T3eError::UnknownChromosomeError(name)) if name == "chrM"));
    }

    #[rstest]
    fn test_zero_read_length(chromosomes: ChromosomeSet) {
        let result = build_background_from_records(
            BedRecordReader::new("chr1\t100\t121\ta\n".as_bytes(), "inline"),
            &chromosomes,
            0,
            "inline",
            false,
        );
        assert!(matches!(result, Err(T3eError::ReadLengthError(0))));
    }

    #[rstest]
    fn test_written_files_are_readable(chromosomes: ChromosomeSet) {
        let dir = tempdir().unwrap();
        let control = dir.path().join("control.bed");
        std::fs::write(&control, "chr2\t40\t61\ta\nchr2\t45\t66\tb\n").unwrap();

        let distributions = build_background(&control, &chromosomes, 21).unwrap();
        let folder = dir.path().join("prob");
        let written = write_background(&folder, &chromosomes, &distributions).unwrap();

        assert_eq!(written, vec![folder.join("chr2_prob.txt")]);
        assert!(!folder.join("chr1_prob.txt").exists());

        let reread = BackgroundDistribution::from_path(&written[0]).unwrap();
        assert_eq!(reread, distributions[0].1);
    }
}
