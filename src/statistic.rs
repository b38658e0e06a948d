//! Per-generation fitness summaries.
//!
//! `genevo`'s `statistic` module tracks processing time
//! (`ProcessingTime`/`TimedResult`, see `statistic.rs` in the teacher crate);
//! this crate instead needs the six-number fitness summary spec §4.3
//! appends once per generation (`max, mean, q1, median, q3, min`), so the
//! module is rebuilt around that statistic while keeping the "plain struct +
//! free function to build it from a slice" shape the teacher uses.

/// One row of the per-generation summary matrix described in spec §6.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SummaryRow {
    pub max: f64,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub min: f64,
}

/// Computes the summary row over the given finite fitness values, ignoring
/// any missing (`NaN`) entries. Returns `None` if every entry is missing.
pub fn summarize(fitness: &[f64]) -> Option<SummaryRow> {
    let mut finite: Vec<f64> = fitness.iter().copied().filter(|f| f.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);

    let max = *finite.last().unwrap();
    let min = *finite.first().unwrap();
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    let q1 = percentile(&finite, 0.25);
    let median = percentile(&finite, 0.50);
    let q3 = percentile(&finite, 0.75);

    Some(SummaryRow {
        max,
        mean,
        q1,
        median,
        q3,
        min,
    })
}

/// Linear-interpolation percentile over an already-sorted slice, matching
/// the default quantile method used by most statistical packages (R's
/// `type = 7`, the GA ancestor of this spec among them).
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = position - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summarize_basic_row() {
        let row = summarize(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(row.max, 5.0);
        assert_eq!(row.min, 1.0);
        assert_eq!(row.mean, 3.0);
        assert_eq!(row.median, 3.0);
    }

    #[test]
    fn summarize_ignores_missing_entries() {
        let row = summarize(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(row.mean, 2.0);
    }

    #[test]
    fn summarize_all_missing_returns_none() {
        assert!(summarize(&[f64::NAN, f64::NAN]).is_none());
    }
}
