use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::consts::PROBABILITY_FILE_SUFFIX;
use crate::errors::{Result, T3eError};
use crate::utils::{create_output_file, get_dynamic_reader};

///
/// Per-chromosome empirical background: a step function of
/// `(position, cumulative probability)` pairs, strictly increasing in both.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundDistribution {
    positions: Vec<i64>,
    cumulative: Vec<f64>,
}

impl BackgroundDistribution {
    ///
    /// Build a distribution from its support points, validating monotonicity.
    ///
    /// # Arguments
    /// - pairs: `(position, cumulative probability)` in file order
    /// - source_name: used in error messages
    ///
    pub fn from_pairs(pairs: Vec<(i64, f64)>, source_name: &str) -> Result<Self> {
        let rows = pairs
            .into_iter()
            .enumerate()
            .map(|(index, (position, prob))| (index + 1, position, prob));
        Self::from_rows(rows, source_name)
    }

    // rows carry the line they were read from
    fn from_rows<I>(rows: I, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, i64, f64)>,
    {
        let mut positions: Vec<i64> = Vec::new();
        let mut cumulative: Vec<f64> = Vec::new();

        for (line, position, prob) in rows {
            if !prob.is_finite() || prob < 0.0 {
                return Err(T3eError::format(
                    source_name,
                    line,
                    format!("invalid cumulative probability: {}", prob),
                ));
            }
            if let (Some(&last_pos), Some(&last_prob)) = (positions.last(), cumulative.last()) {
                if position <= last_pos {
                    return Err(T3eError::format(
                        source_name,
                        line,
                        format!("position {} does not increase after {}", position, last_pos),
                    ));
                }
                if prob <= last_prob {
                    return Err(T3eError::format(
                        source_name,
                        line,
                        format!("cumulative probability {} does not increase after {}", prob, last_prob),
                    ));
                }
            }
            positions.push(position);
            cumulative.push(prob);
        }

        Ok(BackgroundDistribution {
            positions,
            cumulative,
        })
    }

    ///
    /// Read a two-column `position<TAB>cumulative` file. Whitespace around the
    /// fields is tolerated.
    ///
    pub fn from_path(path: &Path) -> Result<Self> {
        let source_name = path.display().to_string();
        let reader = get_dynamic_reader(path)?;
        let mut rows = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            if fields.len() != 2 {
                return Err(T3eError::format(
                    &source_name,
                    index + 1,
                    format!("expected 2 tab-separated fields, found {}", fields.len()),
                ));
            }
            let position = fields[0].parse::<i64>().map_err(|_| {
                T3eError::format(&source_name, index + 1, format!("invalid position: {:?}", fields[0]))
            })?;
            let prob = fields[1].parse::<f64>().map_err(|_| {
                T3eError::format(&source_name, index + 1, format!("invalid probability: {:?}", fields[1]))
            })?;
            rows.push((index + 1, position, prob));
        }

        Self::from_rows(rows, &source_name)
    }

    ///
    /// Write the distribution in the same two-column format it is read from.
    ///
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let mut writer = create_output_file(path)?;
        for (position, prob) in self.positions.iter().zip(&self.cumulative) {
            writeln!(writer, "{}\t{}", position, prob)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn positions(&self) -> &[i64] {
        &self.positions
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    pub fn min_cumulative(&self) -> Option<f64> {
        self.cumulative.first().copied()
    }

    pub fn max_cumulative(&self) -> Option<f64> {
        self.cumulative.last().copied()
    }

    pub fn min_position(&self) -> Option<i64> {
        self.positions.first().copied()
    }

    pub fn max_position(&self) -> Option<i64> {
        self.positions.last().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

///
/// Location of the background file of a chromosome inside a probability folder.
///
pub fn probability_file_path(folder: &Path, chrom: &str) -> PathBuf {
    folder.join(format!("{}{}", chrom, PROBABILITY_FILE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Write;

    #[fixture]
    fn distribution() -> BackgroundDistribution {
        BackgroundDistribution::from_pairs(vec![(10, 0.1), (11, 0.4), (12, 0.5), (20, 1.0)], "test")
            .unwrap()
    }

    #[rstest]
    fn test_bounds(distribution: BackgroundDistribution) {
        assert_eq!(distribution.min_position(), Some(10));
        assert_eq!(distribution.max_position(), Some(20));
        assert_eq!(distribution.min_cumulative(), Some(0.1));
        assert_eq!(distribution.max_cumulative(), Some(1.0));
    }

    #[rstest]
    #[case(vec![(10, 0.1), (10, 0.2)])]
    #[case(vec![(10, 0.1), (9, 0.2)])]
    #[case(vec![(10, 0.2), (11, 0.2)])]
    #[case(vec![(10, 0.2), (11, 0.1)])]
    #[case(vec![(10, f64::NAN)])]
    fn test_rejects_non_increasing(#[case] pairs: Vec<(i64, f64)>) {
        let result = BackgroundDistribution::from_pairs(pairs, "test");
        assert!(matches!(result, Err(T3eError::FormatError { .. })));
    }

    #[rstest]
    fn test_read_file_with_padded_fields() {
        // files written by older tooling pad the tab with spaces
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "100 \t 0.25\n101 \t 0.75\n102\t1.0\n").unwrap();

        let distribution = BackgroundDistribution::from_path(file.path()).unwrap();
        assert_eq!(distribution.positions(), &[100, 101, 102]);
        assert_eq!(distribution.cumulative(), &[0.25, 0.75, 1.0]);
    }

    #[rstest]
    fn test_errors_report_file_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\n\n\n100\t0.5\n\n101\t0.4\n").unwrap();

        let result = BackgroundDistribution::from_path(file.path());
        assert!(matches!(result, Err(T3eError::FormatError { line: 6, .. })));
    }

    #[rstest]
    fn test_write_then_read(distribution: BackgroundDistribution) {
        let tempdir = tempfile::tempdir().unwrap();
        let path = probability_file_path(tempdir.path(), "chr1");
        distribution.write_to_file(&path).unwrap();

        assert!(path.ends_with("chr1_prob.txt"));
        assert_eq!(BackgroundDistribution::from_path(&path).unwrap(), distribution);
    }

    #[rstest]
    fn test_empty_distribution() {
        let distribution = BackgroundDistribution::from_pairs(vec![], "test").unwrap();
        assert!(distribution.is_empty());
        assert_eq!(distribution.min_cumulative(), None);
    }
}
