use std::io::{BufRead, Write};
use std::path::Path;

use fxhash::FxHashMap as HashMap;

use t3e_core::utils::{create_output_file, get_dynamic_reader};
use t3e_core::{Result, T3eError};

///
/// Null overlap counts, one column of family totals per iteration.
///
/// Cells are stored iteration-major so that each iteration's column is one
/// contiguous slice, which the permutation runner hands to a single worker.
///
#[derive(Debug, Clone, PartialEq)]
pub struct NullCountMatrix {
    families: Vec<String>,
    iterations: usize,
    counts: Vec<f64>,
}

impl NullCountMatrix {
    pub fn new(families: Vec<String>, iterations: usize) -> Self {
        let counts = vec![0.0; families.len() * iterations];
        NullCountMatrix {
            families,
            iterations,
            counts,
        }
    }

    pub fn families(&self) -> &[String] {
        &self.families
    }

    pub fn n_families(&self) -> usize {
        self.families.len()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    ///
    /// Count of `family` (by index) in the zero-based `iteration`.
    ///
    pub fn get(&self, family: usize, iteration: usize) -> f64 {
        self.counts[iteration * self.families.len() + family]
    }

    ///
    /// Count of a family by name in the one-based `iteration`, as it appears
    /// in the written file.
    ///
    pub fn value(&self, family: &str, iteration: usize) -> Option<f64> {
        let family = self.families.iter().position(|f| f == family)?;
        if iteration == 0 || iteration > self.iterations {
            return None;
        }
        Some(self.get(family, iteration - 1))
    }

    ///
    /// All permuted totals of one family, in iteration order.
    ///
    pub fn family_counts(&self, family: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.iterations).map(move |iteration| self.get(family, iteration))
    }

    pub fn column(&self, iteration: usize) -> &[f64] {
        let n = self.families.len();
        &self.counts[iteration * n..(iteration + 1) * n]
    }

    pub(crate) fn counts_mut(&mut self) -> &mut [f64] {
        &mut self.counts
    }

    ///
    /// Write `iter<k>\t<family>\t<count>` rows, iteration by iteration.
    ///
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for iteration in 0..self.iterations {
            for (family, name) in self.families.iter().enumerate() {
                writeln!(writer, "iter{}\t{}\t{}", iteration + 1, name, self.get(family, iteration))?;
            }
        }
        Ok(())
    }

    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let mut writer = create_output_file(path)?;
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    ///
    /// Parse a written matrix. Family order follows first appearance.
    ///
    /// A file whose row count is not `iterations * families` (for example one
    /// left behind by an interrupted run) is rejected.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = get_dynamic_reader(path)?;
        Self::from_reader(reader, &path.display().to_string())
    }

    pub fn from_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut families: Vec<String> = Vec::new();
        let mut family_slots: HashMap<String, usize> = HashMap::default();
        let mut cells: HashMap<(usize, usize), f64> = HashMap::default();
        let mut iterations = 0;
        let mut rows = 0;
        let mut last_line = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = index + 1;
            last_line = line_no;
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != 3 {
                return Err(T3eError::format(
                    source_name,
                    line_no,
                    format!("expected 3 tab-separated fields, found {}", fields.len()),
                ));
            }

            let iteration = fields[0]
                .strip_prefix("iter")
                .and_then(|k| k.parse::<usize>().ok())
                .filter(|&k| k > 0)
                .ok_or_else(|| T3eError::format(source_name, line_no, format!("invalid iteration: {:?}", fields[0])))?;
            let count = fields[2]
                .parse::<f64>()
                .map_err(|_| T3eError::format(source_name, line_no, format!("invalid count: {:?}", fields[2])))?;

            let family = match family_slots.get(fields[1]) {
                Some(&slot) => slot,
                None => {
                    family_slots.insert(fields[1].to_string(), families.len());
                    families.push(fields[1].to_string());
                    families.len() - 1
                }
            };

            if cells.insert((iteration, family), count).is_some() {
                return Err(T3eError::format(
                    source_name,
                    line_no,
                    format!("duplicate row for iter{} {}", iteration, fields[1]),
                ));
            }
            iterations = iterations.max(iteration);
            rows += 1;
        }

        if rows != iterations * families.len() {
            return Err(T3eError::format(
                source_name,
                last_line,
                format!(
                    "expected {} rows for {} iterations x {} families, found {}",
                    iterations * families.len(),
                    iterations,
                    families.len(),
                    rows
                ),
            ));
        }

        let mut matrix = NullCountMatrix::new(families, iterations);
        let n = matrix.n_families();
        for ((iteration, family), count) in cells {
            matrix.counts[(iteration - 1) * n + family] = count;
        }
        Ok(matrix)
    }
}
