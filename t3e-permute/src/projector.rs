use t3e_core::models::ChromId;

use crate::assigner::Assignment;
use crate::control::ControlReadIndex;

/// Identifier of one simulated read within a (chromosome, iteration) unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PermutedId(pub usize);

///
/// Footprint of one read locus, closed coordinates `[start, end]`. `read`
/// names the read the locus belongs to: a [`PermutedId`] for projected reads,
/// a [`ReadId`](crate::control::ReadId) for real sample reads.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSpan<I = PermutedId> {
    pub start: i64,
    pub end: i64,
    pub read: I,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PermutedRead {
    pub id: PermutedId,
    pub shift: i64,
    pub loci: Vec<(ChromId, ReadSpan)>,
}

impl PermutedRead {
    ///
    /// Number of loci projected for this read; the multiplicity of the real
    /// read it was copied from.
    ///
    pub fn times(&self) -> u32 {
        self.loci.len() as u32
    }
}

///
/// Moves a selected control read, with all of its alignment loci, by the
/// shift of its assignment.
///
pub struct LocusProjector<'a> {
    index: &'a ControlReadIndex,
    read_len: u32,
}

impl<'a> LocusProjector<'a> {
    pub fn new(index: &'a ControlReadIndex, read_len: u32) -> Self {
        LocusProjector { index, read_len }
    }

    pub fn project(&self, id: PermutedId, assignment: &Assignment) -> PermutedRead {
        let loci = self
            .index
            .chain_from(assignment.locus)
            .map(|locus| {
                let locus = self.index.locus_at(locus);
                let start = locus.position + assignment.shift;
                (
                    locus.chrom,
                    ReadSpan {
                        start,
                        end: start + i64::from(self.read_len) - 1,
                        read: id,
                    },
                )
            })
            .collect();

        PermutedRead {
            id,
            shift: assignment.shift,
            loci,
        }
    }
}

///
/// Projected reads of one unit, bucketed by the chromosome each locus landed
/// on, with the per-read locus count used for weighting.
///
#[derive(Debug, Clone, Default)]
pub struct ProjectedReads {
    spans: Vec<Vec<ReadSpan>>,
    times: Vec<u32>,
}

impl ProjectedReads {
    pub fn new(n_chromosomes: usize) -> Self {
        ProjectedReads {
            spans: vec![Vec::new(); n_chromosomes],
            times: Vec::new(),
        }
    }

    ///
    /// Project every assignment, handing out fresh ids in order.
    ///
    pub fn from_assignments(
        projector: &LocusProjector,
        assignments: &[Assignment],
        n_chromosomes: usize,
    ) -> Self {
        let mut projected = ProjectedReads::new(n_chromosomes);
        for assignment in assignments {
            let id = projected.next_id();
            projected.push(projector.project(id, assignment));
        }
        projected
    }

    pub fn next_id(&self) -> PermutedId {
        PermutedId(self.times.len())
    }

    pub fn push(&mut self, read: PermutedRead) {
        if read.id.0 >= self.times.len() {
            self.times.resize(read.id.0 + 1, 0);
        }
        self.times[read.id.0] = read.times();
        for (chrom, span) in read.loci {
            self.spans[chrom.0].push(span);
        }
    }

    pub fn on(&self, chrom: ChromId) -> &[ReadSpan] {
        &self.spans[chrom.0]
    }

    pub fn times(&self, id: PermutedId) -> u32 {
        self.times[id.0]
    }

    ///
    /// Weight of one overlapping base of read `id`: `1 / (times * read_len)`.
    ///
    pub fn weight(&self, id: PermutedId, read_len: u32) -> f64 {
        1.0 / (f64::from(self.times(id)) * f64::from(read_len))
    }

    pub fn n_reads(&self) -> usize {
        self.times.len()
    }
}
