//! Aggregate error statistics.

use serde::{Deserialize, Serialize};

/// Summary statistics for one error quantity, in that quantity's unit.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorStats {
    /// Root mean square of the errors
    pub rmse: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    /// Smallest error
    pub min: f64,
    /// Largest error
    pub max: f64,
    /// Median (midpoint average for an even count)
    pub median: f64,
    /// Number of errors aggregated
    pub count: usize,
}

impl ErrorStats {
    /// Aggregate a slice of errors. An empty slice yields all zeros.
    pub fn from_errors(errors: &[f64]) -> Self {
        let mut sorted = errors.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();
        if count == 0 {
            return Self::default();
        }
        let n = count as f64;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for e in &sorted {
            sum += e;
            sum_sq += e * e;
        }
        let mean = sum / n;
        // E[e²] − mean² can dip just below zero from rounding
        let std = (sum_sq / n - mean * mean).max(0.0).sqrt();

        let mid = count / 2;
        let median = if count % 2 == 0 {
            0.5 * (sorted[mid - 1] + sorted[mid])
        } else {
            sorted[mid]
        };

        Self {
            rmse: (sum_sq / n).sqrt(),
            mean,
            std,
            min: sorted[0],
            max: sorted[count - 1],
            median,
            count,
        }
    }

    /// One-line rendering for log output.
    pub fn summary(&self) -> String {
        format!(
            "rmse {:.6} / mean {:.6} ± {:.6}, range [{:.6}, {:.6}]",
            self.rmse, self.mean, self.std, self.min, self.max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stats_basic() {
        let errors = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = ErrorStats::from_errors(&errors);

        assert_eq!(stats.count, 5);
        assert_relative_eq!(stats.mean, 3.0);
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 5.0);
        assert_relative_eq!(stats.median, 3.0);
        assert_relative_eq!(stats.rmse, (55.0f64 / 5.0).sqrt());
        assert_relative_eq!(stats.std, 2.0f64.sqrt());
    }

    #[test]
    fn test_stats_even_count_median() {
        let stats = ErrorStats::from_errors(&[1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(stats.median, 2.5);
        assert_relative_eq!(stats.std, 1.25f64.sqrt());
    }

    #[test]
    fn test_stats_unsorted_input() {
        let stats = ErrorStats::from_errors(&[4.0, 1.0, 3.0, 5.0, 2.0]);
        assert_relative_eq!(stats.min, 1.0);
        assert_relative_eq!(stats.max, 5.0);
        assert_relative_eq!(stats.median, 3.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = ErrorStats::from_errors(&[]);
        assert_eq!(stats.count, 0);
        assert_relative_eq!(stats.rmse, 0.0);
    }

    #[test]
    fn test_stats_constant_signal() {
        let stats = ErrorStats::from_errors(&[0.5; 10]);
        assert_relative_eq!(stats.rmse, 0.5);
        assert_relative_eq!(stats.std, 0.0);
        assert_relative_eq!(stats.median, 0.5);
    }
}
