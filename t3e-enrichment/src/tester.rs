use std::fmt::{self, Display};
use std::io::Write;
use std::path::Path;

use log::info;

use t3e_core::Result;
use t3e_core::utils::create_output_file;
use t3e_permute::{NullCountMatrix, ObservedCounts};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnrichmentThresholds {
    /// Largest empirical p-value still called significant.
    pub alpha: f64,
    /// Smallest log2 fold-change still called enriched.
    pub log2fc: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub family: String,
    pub observed: f64,
    pub p_value: f64,
    pub mean: f64,
    /// `None` when the permuted mean is zero.
    pub log2fc: Option<f64>,
    pub enriched: bool,
}

impl Display for EnrichmentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.log2fc {
            Some(log2fc) => write!(f, "{}\t{}\t{}\t{}", self.family, self.p_value, log2fc, self.enriched),
            None => write!(f, "{}\t{}\tNA\t{}", self.family, self.p_value, self.enriched),
        }
    }
}

///
/// Compare the observed count of every family with its permuted totals.
///
/// The p-value is the share of iterations whose total is strictly greater
/// than the observed count. A family is enriched when its p-value is at most
/// `alpha` and its log2 fold-change over the permuted mean reaches the
/// threshold. Families absent from the background have a zero mean and are
/// never enriched.
///
pub fn assess_enrichment(
    observed: &ObservedCounts,
    background: &NullCountMatrix,
    thresholds: &EnrichmentThresholds,
) -> Vec<EnrichmentResult> {
    let iterations = background.iterations();

    observed
        .iter()
        .map(|(family, count)| {
            let (above, sum) = match background.families().iter().position(|f| f == family) {
                Some(index) => background
                    .family_counts(index)
                    .fold((0usize, 0.0), |(above, sum), permuted| {
                        (above + usize::from(permuted > count), sum + permuted)
                    }),
                None => (0, 0.0),
            };

            let (p_value, mean) = if iterations == 0 {
                (1.0, 0.0)
            } else {
                (above as f64 / iterations as f64, sum / iterations as f64)
            };
            let log2fc = (mean > 0.0).then(|| (count / mean).log2());
            let enriched = log2fc.is_some_and(|fc| p_value <= thresholds.alpha && fc >= thresholds.log2fc);

            if enriched {
                info!(
                    "{} enriched: p = {}, log2FC = {:.3}",
                    family,
                    p_value,
                    log2fc.unwrap_or_default()
                );
            }

            EnrichmentResult {
                family: family.to_string(),
                observed: count,
                p_value,
                mean,
                log2fc,
                enriched,
            }
        })
        .collect()
}

///
/// Write `<family>\t<pvalue>\t<log2fc>\t<enriched>` rows.
///
pub fn write_results(path: &Path, results: &[EnrichmentResult]) -> Result<()> {
    let mut writer = create_output_file(path)?;
    for result in results {
        writeln!(writer, "{}", result)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use tempfile::tempdir;

    #[fixture]
    fn background() -> NullCountMatrix {
        // LINE1 permuted totals 1..=10, AluY always 4, SVA always 0
        let mut text = String::new();
        for k in 1..=10 {
            text.push_str(&format!("iter{}\tLINE1\t{}\n", k, k));
            text.push_str(&format!("iter{}\tAluY\t4\n", k));
            text.push_str(&format!("iter{}\tSVA\t0\n", k));
        }
        NullCountMatrix::from_reader(text.as_bytes(), "inline").unwrap()
    }

    #[fixture]
    fn thresholds() -> EnrichmentThresholds {
        EnrichmentThresholds {
            alpha: 0.05,
            log2fc: 1.0,
        }
    }

    fn observed(rows: &[(&str, f64)]) -> ObservedCounts {
        ObservedCounts::new(
            rows.iter().map(|(f, _)| f.to_string()).collect(),
            rows.iter().map(|(_, c)| *c).collect(),
        )
    }

    #[rstest]
    fn test_p_value_and_fold_change(background: NullCountMatrix, thresholds: EnrichmentThresholds) {
        let results = assess_enrichment(&observed(&[("LINE1", 7.0), ("AluY", 16.0)]), &background, &thresholds);

        assert_eq!(results[0].family, "LINE1");
        assert_eq!(results[0].p_value, 0.3);
        assert_eq!(results[0].mean, 5.5);
        assert!((results[0].log2fc.unwrap() - (7.0f64 / 5.5).log2()).abs() < 1e-12);
        assert!(!results[0].enriched);

        assert_eq!(results[1].p_value, 0.0);
        assert_eq!(results[1].log2fc, Some(2.0));
        assert!(results[1].enriched);
    }

    #[rstest]
    fn test_ties_do_not_count_as_above(background: NullCountMatrix, thresholds: EnrichmentThresholds) {
        let results = assess_enrichment(&observed(&[("AluY", 4.0)]), &background, &thresholds);
        assert_eq!(results[0].p_value, 0.0);
        assert_eq!(results[0].log2fc, Some(0.0));
        assert!(!results[0].enriched);
    }

    #[rstest]
    fn test_zero_mean_is_not_available(background: NullCountMatrix, thresholds: EnrichmentThresholds) {
        let results = assess_enrichment(&observed(&[("SVA", 3.0), ("HERV", 2.0)]), &background, &thresholds);
        for result in &results {
            assert_eq!(result.log2fc, None);
            assert!(!result.enriched);
        }
        assert_eq!(results[0].to_string(), "SVA\t0\tNA\tfalse");
    }

    #[rstest]
    fn test_written_rows(background: NullCountMatrix, thresholds: EnrichmentThresholds) {
        let results = assess_enrichment(&observed(&[("AluY", 16.0), ("SVA", 1.0)]), &background, &thresholds);
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("sample_enrichment.txt");
        write_results(&path, &results).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "AluY\t0\t2\ttrue\nSVA\t0\tNA\tfalse\n");
    }
}
