use crate::repeats::FamilyId;

///
/// Per-family totals of a single (chromosome, iteration) unit.
///
#[derive(Debug, Clone, PartialEq)]
pub struct IterationAccumulator {
    totals: Vec<f64>,
}

impl IterationAccumulator {
    pub fn new(n_families: usize) -> Self {
        IterationAccumulator {
            totals: vec![0.0; n_families],
        }
    }

    pub fn add(&mut self, family: FamilyId, weight: f64) {
        self.totals[family.0] += weight;
    }

    pub fn totals(&self) -> &[f64] {
        &self.totals
    }

    ///
    /// Add the unit totals into one iteration column of the null matrix and
    /// reset for the next unit.
    ///
    pub fn fold_into(&mut self, column: &mut [f64]) {
        for (cell, total) in column.iter_mut().zip(self.totals.iter_mut()) {
            *cell += *total;
            *total = 0.0;
        }
    }
}
