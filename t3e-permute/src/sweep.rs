use crate::accumulator::IterationAccumulator;
use crate::projector::ReadSpan;
use crate::repeats::RepeatInterval;

///
/// Anything with closed `[start, end]` coordinates on one chromosome.
///
pub trait Span {
    fn start(&self) -> i64;
    fn end(&self) -> i64;
}

impl<I> Span for ReadSpan<I> {
    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }
}

impl Span for RepeatInterval {
    fn start(&self) -> i64 {
        self.start
    }

    fn end(&self) -> i64 {
        self.end
    }
}

// variant order matters: opens sort before closes at the same coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Boundary {
    Open,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entity {
    Read,
    Feature,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    position: i64,
    boundary: Boundary,
    entity: Entity,
    slot: usize,
}

fn push_events<S: Span>(events: &mut Vec<Event>, spans: &[S], entity: Entity) {
    for (slot, span) in spans.iter().enumerate() {
        events.push(Event {
            position: span.start(),
            boundary: Boundary::Open,
            entity,
            slot,
        });
        events.push(Event {
            position: span.end(),
            boundary: Boundary::Close,
            entity,
            slot,
        });
    }
}

///
/// Sweep two interval streams of one chromosome and report every overlapping
/// pair once, as `(read slot, feature slot, shared bases)`.
///
/// Both streams use closed coordinates, so intervals that share a single
/// coordinate overlap by one base and adjacent intervals do not overlap. The
/// pair is reported when the first of the two closes, which keeps the work per
/// event proportional to the number of intervals currently open.
///
pub fn sweep<A, B, F>(reads: &[A], features: &[B], mut on_overlap: F)
where
    A: Span,
    B: Span,
    F: FnMut(usize, usize, i64),
{
    let mut events = Vec::with_capacity(2 * (reads.len() + features.len()));
    push_events(&mut events, reads, Entity::Read);
    push_events(&mut events, features, Entity::Feature);
    events.sort_by_key(|event| (event.position, event.boundary));

    let mut open_reads: Vec<usize> = Vec::new();
    let mut open_features: Vec<usize> = Vec::new();

    for event in events {
        match (event.boundary, event.entity) {
            (Boundary::Open, Entity::Read) => open_reads.push(event.slot),
            (Boundary::Open, Entity::Feature) => open_features.push(event.slot),
            (Boundary::Close, Entity::Read) => {
                let start = reads[event.slot].start();
                for &feature in &open_features {
                    let shared = event.position - start.max(features[feature].start()) + 1;
                    on_overlap(event.slot, feature, shared);
                }
                release(&mut open_reads, event.slot);
            }
            (Boundary::Close, Entity::Feature) => {
                let start = features[event.slot].start();
                for &read in &open_reads {
                    let shared = event.position - start.max(reads[read].start()) + 1;
                    on_overlap(read, event.slot, shared);
                }
                release(&mut open_features, event.slot);
            }
        }
    }
}

fn release(open: &mut Vec<usize>, slot: usize) {
    if let Some(i) = open.iter().position(|&s| s == slot) {
        open.remove(i);
    }
}

///
/// Weighted overlap of projected reads with the repeat families of one
/// chromosome.
///
pub struct OverlapSweep {
    read_len: u32,
}

impl OverlapSweep {
    pub fn new(read_len: u32) -> Self {
        OverlapSweep { read_len }
    }

    ///
    /// Add `shared bases / (times(read) * read_len)` to the family of every
    /// feature a read overlaps.
    ///
    pub fn run<I, T>(
        &self,
        reads: &[ReadSpan<I>],
        times: T,
        features: &[RepeatInterval],
        accumulator: &mut IterationAccumulator,
    ) where
        I: Copy,
        T: Fn(I) -> u32,
    {
        let read_len = f64::from(self.read_len);
        sweep(reads, features, |read, feature, shared| {
            let weight = shared as f64 / (f64::from(times(reads[read].read)) * read_len);
            accumulator.add(features[feature].family, weight);
        });
    }
}
