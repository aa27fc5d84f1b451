use rand::Rng;
use rand::seq::IndexedRandom;

use t3e_core::models::{ChromId, ChromosomeSet};
use t3e_core::{Result, T3eError};

use crate::control::{ControlReadIndex, LocusId};

///
/// A drawn position tied to the real control locus that will be moved there.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub drawn: i64,
    pub locus: LocusId,
    pub shift: i64,
}

///
/// Maps drawn positions to control loci starting in the window
/// `[drawn - read_len, drawn)`.
///
pub struct ReadAssigner<'a> {
    index: &'a ControlReadIndex,
    chromosomes: &'a ChromosomeSet,
    read_len: u32,
}

impl<'a> ReadAssigner<'a> {
    pub fn new(index: &'a ControlReadIndex, chromosomes: &'a ChromosomeSet, read_len: u32) -> Self {
        ReadAssigner {
            index,
            chromosomes,
            read_len,
        }
    }

    ///
    /// Assign every drawn position on `chrom` to a control locus.
    ///
    /// Drawn positions and the position-sorted control loci are walked together
    /// with two monotone cursors, so each draw sees its candidate window without
    /// a search. Assignments come back in ascending drawn order.
    ///
    pub fn assign<R: Rng + ?Sized>(&self, chrom: ChromId, mut drawn: Vec<i64>, rng: &mut R) -> Result<Vec<Assignment>> {
        drawn.sort_unstable();

        let sorted = self.index.loci_by_position(chrom);
        let read_len = i64::from(self.read_len);
        let mut low = 0;
        let mut high = 0;
        let mut assignments = Vec::with_capacity(drawn.len());

        for position in drawn {
            while high < sorted.len() && self.index.locus_at(sorted[high]).position < position {
                high += 1;
            }
            while low < high && self.index.locus_at(sorted[low]).position < position - read_len {
                low += 1;
            }

            let candidates = &sorted[low..high];
            let locus = match candidates {
                [] => {
                    return Err(T3eError::EmptyCandidateError {
                        chrom: self.chromosomes.name(chrom).to_string(),
                        position,
                        read_len: self.read_len,
                    });
                }
                [only] => *only,
                _ => self.select_candidate(candidates, rng)?,
            };

            let anchor = position - read_len / 2;
            assignments.push(Assignment {
                drawn: position,
                locus,
                shift: anchor - self.index.locus_at(locus).position,
            });
        }

        Ok(assignments)
    }

    ///
    /// Pick one candidate with probability proportional to the inverse of its
    /// read's multiplicity, favouring unambiguous reads.
    ///
    pub fn select_candidate<R: Rng + ?Sized>(&self, candidates: &[LocusId], rng: &mut R) -> Result<LocusId> {
        candidates
            .choose_weighted(rng, |&locus| 1.0 / f64::from(self.index.multiplicity_of(locus)))
            .copied()
            .map_err(|err| T3eError::SamplingError(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::*;
    use t3e_core::models::BedRecordReader;

    fn build(data: &str) -> (ControlReadIndex, ChromosomeSet) {
        let chromosomes = ChromosomeSet::new(&["chr1", "chr2"]);
        let index =
            ControlReadIndex::from_records(BedRecordReader::new(data.as_bytes(), "inline"), &chromosomes, "inline")
                .unwrap();
        (index, chromosomes)
    }

    #[rstest]
    fn test_single_candidate_and_shift() {
        let (index, chromosomes) = build("chr1\t140\t161\tr1\n");
        let assigner = ReadAssigner::new(&index, &chromosomes, 21);
        let mut rng = StdRng::seed_from_u64(0);

        let assignments = assigner.assign(ChromId(0), vec![150], &mut rng).unwrap();
        assert_eq!(
            assignments,
            vec![Assignment {
                drawn: 150,
                locus: LocusId(0),
                shift: 0
            }]
        );
    }

    #[rstest]
    fn test_window_is_half_open() {
        // loci at 100 and 121; with read_len 21 the window of 121 is [100, 121)
        let (index, chromosomes) = build("chr1\t100\t121\ta\nchr1\t121\t142\tb\n");
        let assigner = ReadAssigner::new(&index, &chromosomes, 21);
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..50 {
            let assignments = assigner.assign(ChromId(0), vec![121], &mut rng).unwrap();
            assert_eq!(assignments[0].locus, LocusId(0));
        }

        // 122 still sees 121 but no longer 100
        let assignments = assigner.assign(ChromId(0), vec![122], &mut rng).unwrap();
        assert_eq!(assignments[0].locus, LocusId(1));
    }

    #[rstest]
    fn test_selection_never_leaves_window() {
        let data: String = [10, 25, 40, 45, 60, 70, 85, 90]
            .iter()
            .enumerate()
            .map(|(i, p)| format!("chr1\t{}\t{}\tread{}\n", p, p + 21, i))
            .collect();
        let (index, chromosomes) = build(&data);
        let assigner = ReadAssigner::new(&index, &chromosomes, 21);
        let mut rng = StdRng::seed_from_u64(11);

        let drawn: Vec<i64> = (11..=111).collect();
        let assignments = assigner.assign(ChromId(0), drawn, &mut rng).unwrap();
        for assignment in assignments {
            let position = index.locus_at(assignment.locus).position;
            assert!(position >= assignment.drawn - 21 && position < assignment.drawn);
            assert_eq!(assignment.shift, assignment.drawn - 10 - position);
        }
    }

    #[rstest]
    fn test_empty_window_fails() {
        let (index, chromosomes) = build("chr1\t100\t121\ta\n");
        let assigner = ReadAssigner::new(&index, &chromosomes, 21);
        let mut rng = StdRng::seed_from_u64(0);

        let result = assigner.assign(ChromId(0), vec![500], &mut rng);
        assert!(matches!(
            result,
            Err(T3eError::EmptyCandidateError { position: 500, read_len: 21, .. })
        ));

        let result = assigner.assign(ChromId(1), vec![5], &mut rng);
        assert!(matches!(result, Err(T3eError::EmptyCandidateError { .. })));
    }

    #[rstest]
    fn test_inverse_multiplicity_weighting() {
        // "u" is unique, "m" maps three times (twice on chr2)
        let data = "chr1\t100\t121\tu\n\
                    chr1\t105\t126\tm\n\
                    chr2\t5000\t5021\tm\n\
                    chr2\t9000\t9021\tm\n";
        let (index, chromosomes) = build(data);
        let assigner = ReadAssigner::new(&index, &chromosomes, 21);
        let mut rng = StdRng::seed_from_u64(2024);

        let trials = 10_000;
        let mut unique = 0;
        for _ in 0..trials {
            let assignments = assigner.assign(ChromId(0), vec![110], &mut rng).unwrap();
            if assignments[0].locus == LocusId(0) {
                unique += 1;
            }
        }

        let share = unique as f64 / trials as f64;
        assert!((share - 0.75).abs() < 0.03, "unique read selected {:.3} of the time", share);
    }
}
