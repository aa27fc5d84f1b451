use std::ops::Range;
use std::path::Path;

use fxhash::FxHashMap as HashMap;

use t3e_core::models::{BedRecord, BedRecordReader, ChromId, ChromosomeSet};
use t3e_core::{Result, T3eError};

/// Handle of one alignment locus inside a [ControlReadIndex].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocusId(pub usize);

/// Handle of one read id (all of its loci) inside a [ControlReadIndex].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReadId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct ControlLocus {
    pub chrom: ChromId,
    pub position: i64,
    pub end: i64,
    pub read: ReadId,
}

///
/// Aligned reads indexed per chromosome, with every locus of a multi-mapped
/// read linked into a circular chain.
///
/// Loci are stored in file order, which is contiguous by chromosome. For each
/// chromosome a position-sorted view is kept for window lookups.
///
#[derive(Debug, Clone)]
pub struct ControlReadIndex {
    loci: Vec<ControlLocus>,
    // link to the previous occurrence of the same read; the first occurrence
    // links to the last one, closing the circle
    chain: Vec<LocusId>,
    multiplicity: Vec<u32>,
    bounds: Vec<Option<Range<usize>>>,
    by_position: Vec<Vec<LocusId>>,
}

impl ControlReadIndex {
    ///
    /// Load a four-column `chromosome start end read_id` table.
    ///
    pub fn from_path(path: &Path, chromosomes: &ChromosomeSet) -> Result<Self> {
        let reader = BedRecordReader::from_path(path)?;
        let source_name = reader.source_name().to_string();
        Self::from_records(reader, chromosomes, &source_name)
    }

    ///
    /// Build the index from a stream of `(line number, record)` pairs.
    ///
    pub fn from_records<I>(records: I, chromosomes: &ChromosomeSet, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = Result<(usize, BedRecord)>>,
    {
        let mut loci: Vec<ControlLocus> = Vec::new();
        let mut chain: Vec<LocusId> = Vec::new();
        let mut multiplicity: Vec<u32> = Vec::new();
        let mut first_seen: Vec<LocusId> = Vec::new();
        let mut last_seen: Vec<LocusId> = Vec::new();
        let mut read_ids: HashMap<String, ReadId> = HashMap::default();
        let mut bounds: Vec<Option<Range<usize>>> = vec![None; chromosomes.len()];
        let mut current: Option<ChromId> = None;

        for record in records {
            let (line, record) = record?;
            let chrom = chromosomes.require(&record.chr)?;

            if current != Some(chrom) {
                if bounds[chrom.0].is_some() {
                    return Err(T3eError::format(
                        source_name,
                        line,
                        format!("rows of {} are not contiguous", record.chr),
                    ));
                }
                bounds[chrom.0] = Some(loci.len()..loci.len());
                current = Some(chrom);
            }

            let locus = LocusId(loci.len());
            let read = match read_ids.get(&record.name) {
                Some(&read) => {
                    chain.push(last_seen[read.0]);
                    multiplicity[read.0] += 1;
                    last_seen[read.0] = locus;
                    read
                }
                None => {
                    let read = ReadId(multiplicity.len());
                    read_ids.insert(record.name, read);
                    // resolved once the last occurrence is known
                    chain.push(locus);
                    multiplicity.push(1);
                    first_seen.push(locus);
                    last_seen.push(locus);
                    read
                }
            };

            loci.push(ControlLocus {
                chrom,
                position: record.start,
                end: record.end,
                read,
            });
            if let Some(range) = bounds[chrom.0].as_mut() {
                range.end = loci.len();
            }
        }

        for (first, last) in first_seen.iter().zip(&last_seen) {
            chain[first.0] = *last;
        }

        let by_position = bounds
            .iter()
            .map(|range| match range {
                Some(range) => {
                    let mut ids: Vec<LocusId> = range.clone().map(LocusId).collect();
                    ids.sort_by_key(|id| loci[id.0].position);
                    ids
                }
                None => Vec::new(),
            })
            .collect();

        Ok(ControlReadIndex {
            loci,
            chain,
            multiplicity,
            bounds,
            by_position,
        })
    }

    pub fn locus_at(&self, id: LocusId) -> &ControlLocus {
        &self.loci[id.0]
    }

    ///
    /// The next locus of the same read along its circular chain.
    ///
    pub fn next_locus(&self, id: LocusId) -> LocusId {
        self.chain[id.0]
    }

    ///
    /// Number of loci the read owning `id` aligns to.
    ///
    pub fn multiplicity_of(&self, id: LocusId) -> u32 {
        self.multiplicity[self.loci[id.0].read.0]
    }

    pub fn read_multiplicity(&self, read: ReadId) -> u32 {
        self.multiplicity[read.0]
    }

    ///
    /// Every locus of the read owning `start`, each exactly once. The walk
    /// begins with the link after `start` and ends on `start` itself.
    ///
    pub fn chain_from(&self, start: LocusId) -> ChainIter<'_> {
        ChainIter {
            index: self,
            start,
            current: start,
            done: false,
        }
    }

    ///
    /// Loci of a chromosome in file order.
    ///
    pub fn loci_on(&self, chrom: ChromId) -> &[ControlLocus] {
        match &self.bounds[chrom.0] {
            Some(range) => &self.loci[range.clone()],
            None => &[],
        }
    }

    ///
    /// Loci of a chromosome sorted by start position (stable for ties).
    ///
    pub fn loci_by_position(&self, chrom: ChromId) -> &[LocusId] {
        &self.by_position[chrom.0]
    }

    pub fn n_reads(&self) -> usize {
        self.multiplicity.len()
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }
}

pub struct ChainIter<'a> {
    index: &'a ControlReadIndex,
    start: LocusId,
    current: LocusId,
    done: bool,
}

impl Iterator for ChainIter<'_> {
    type Item = LocusId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        self.current = self.index.next_locus(self.current);
        if self.current == self.start {
            self.done = true;
        }
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use t3e_core::models::BedRecordReader;

    #[fixture]
    fn chromosomes() -> ChromosomeSet {
        ChromosomeSet::new(&["chr1", "chr2", "chr3"])
    }

    fn build(data: &str, chromosomes: &ChromosomeSet) -> Result<ControlReadIndex> {
        ControlReadIndex::from_records(BedRecordReader::new(data.as_bytes(), "inline"), chromosomes, "inline")
    }

    #[rstest]
    fn test_chains_are_circular_and_complete(chromosomes: ChromosomeSet) {
        let data = "chr1\t500\t536\ta\n\
                    chr1\t100\t136\tb\n\
                    chr1\t300\t336\ta\n\
                    chr2\t50\t86\tc\n\
                    chr2\t70\t106\ta\n";
        let index = build(data, &chromosomes).unwrap();

        assert_eq!(index.len(), 5);
        assert_eq!(index.n_reads(), 3);

        // read "a" lives at loci 0, 2 and 4
        for start in [0, 2, 4] {
            let mut visited: Vec<usize> = index.chain_from(LocusId(start)).map(|l| l.0).collect();
            assert_eq!(visited.last(), Some(&start));
            visited.sort();
            assert_eq!(visited, vec![0, 2, 4]);
            assert_eq!(index.multiplicity_of(LocusId(start)), 3);
        }

        // links point to the previous occurrence, the first to the last
        assert_eq!(index.next_locus(LocusId(4)), LocusId(2));
        assert_eq!(index.next_locus(LocusId(2)), LocusId(0));
        assert_eq!(index.next_locus(LocusId(0)), LocusId(4));

        // unique reads link to themselves
        assert_eq!(index.next_locus(LocusId(1)), LocusId(1));
        assert_eq!(index.multiplicity_of(LocusId(1)), 1);
        assert_eq!(index.chain_from(LocusId(1)).count(), 1);
    }

    #[rstest]
    fn test_per_chromosome_views(chromosomes: ChromosomeSet) {
        let data = "chr1\t500\t536\ta\n\
                    chr1\t100\t136\tb\n\
                    chr1\t300\t336\tc\n\
                    chr3\t5\t41\td\n";
        let index = build(data, &chromosomes).unwrap();

        assert_eq!(index.loci_on(ChromId(0)).len(), 3);
        assert_eq!(index.loci_on(ChromId(1)).len(), 0);
        assert_eq!(index.loci_on(ChromId(2))[0].position, 5);

        let sorted: Vec<i64> = index
            .loci_by_position(ChromId(0))
            .iter()
            .map(|&id| index.locus_at(id).position)
            .collect();
        assert_eq!(sorted, vec![100, 300, 500]);
        assert_eq!(index.loci_by_position(ChromId(2)), &[LocusId(3)]);
    }

    #[rstest]
    fn test_unknown_chromosome_fails(chromosomes: ChromosomeSet) {
        let result = build("chr1\t1\t10\ta\nchrUn_gl000220\t1\t10\tb\n", &chromosomes);
        assert!(matches!(result, Err(T3eError::UnknownChromosomeError(name)) if name == "chrUn_gl000220"));
    }

    #[rstest]
    fn test_non_contiguous_chromosome_fails(chromosomes: ChromosomeSet) {
        let result = build("chr1\t1\t10\ta\nchr2\t1\t10\tb\nchr1\t20\t30\tc\n", &chromosomes);
        assert!(matches!(result, Err(T3eError::FormatError { line: 3, .. })));
    }

    #[rstest]
    fn test_malformed_row_fails(chromosomes: ChromosomeSet) {
        let result = build("chr1\t1\t10\n", &chromosomes);
        assert!(matches!(result, Err(T3eError::FormatError { line: 1, .. })));
    }
}
