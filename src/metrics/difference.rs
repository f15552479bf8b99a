//! Pairwise differences between aligned estimate series.

use serde::{Deserialize, Serialize};

use crate::align::AlignedPair;
use crate::core::types::Vec3;
use crate::metrics::summary::ErrorStats;

/// Differences for one aligned sample (comparison minus reference).
#[derive(Debug, Clone, Copy)]
pub struct DiffSample {
    /// Time since the first aligned sample, in seconds
    pub time_s: f64,
    /// Reference position, kept for spatial error plots
    pub reference_position: Vec3,
    /// Per-axis position difference (m)
    pub position_delta: Vec3,
    /// Position difference norm (m)
    pub position_error: f64,
    /// Angular distance between the two orientations (rad)
    pub attitude_error: f64,
    /// Per-axis velocity difference (m/s), when both series log velocity
    pub velocity_delta: Option<Vec3>,
    /// Gyro bias difference (rad/s)
    pub gyro_bias_delta: Option<Vec3>,
    /// Accel bias difference (m/s²)
    pub accel_bias_delta: Option<Vec3>,
    /// Outlier count difference
    pub outlier_delta: Option<i64>,
}

/// Elementwise differences between a reference series and one
/// comparison series, over their aligned samples.
#[derive(Debug, Clone)]
pub struct SeriesDiff {
    /// Name of the reference series
    pub reference_name: String,
    /// Name of the comparison series
    pub compared_name: String,
    /// One sample per aligned pair, in time order
    pub samples: Vec<DiffSample>,
}

impl SeriesDiff {
    /// Compute differences over aligned pairs.
    pub fn compute(
        reference_name: impl Into<String>,
        compared_name: impl Into<String>,
        pairs: &[AlignedPair],
    ) -> Self {
        let start_us = pairs.first().map(|p| p.timestamp_us).unwrap_or(0);

        let samples = pairs
            .iter()
            .map(|pair| {
                let r = &pair.reference;
                let o = &pair.other;
                let position_delta = o.position.sub(&r.position);

                DiffSample {
                    time_s: (pair.timestamp_us - start_us) as f64 / 1_000_000.0,
                    reference_position: r.position,
                    position_delta,
                    position_error: position_delta.norm(),
                    attitude_error: r.orientation.angular_distance(&o.orientation),
                    velocity_delta: o
                        .velocity
                        .zip(r.velocity)
                        .map(|(ov, rv)| ov.sub(&rv)),
                    gyro_bias_delta: o
                        .gyro_bias
                        .zip(r.gyro_bias)
                        .map(|(ob, rb)| ob.sub(&rb)),
                    accel_bias_delta: o
                        .accel_bias
                        .zip(r.accel_bias)
                        .map(|(ob, rb)| ob.sub(&rb)),
                    outlier_delta: o
                        .outliers
                        .zip(r.outliers)
                        .map(|(oo, ro)| oo as i64 - ro as i64),
                }
            })
            .collect();

        Self {
            reference_name: reference_name.into(),
            compared_name: compared_name.into(),
            samples,
        }
    }

    /// Duration covered by the aligned samples, in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.last().map(|s| s.time_s).unwrap_or(0.0)
    }

    /// Aggregate statistics over all samples.
    pub fn summary(&self) -> DiffSummary {
        let collect = |f: &dyn Fn(&DiffSample) -> f64| -> Vec<f64> {
            self.samples.iter().map(f).collect()
        };
        // With no samples there is no evidence the field was logged at
        // all, so the optional stats stay None rather than zeroed.
        let collect_opt = |f: &dyn Fn(&DiffSample) -> Option<f64>| -> Option<Vec<f64>> {
            if self.samples.is_empty() {
                return None;
            }
            self.samples.iter().map(f).collect()
        };

        DiffSummary {
            reference: self.reference_name.clone(),
            compared: self.compared_name.clone(),
            pairs: self.samples.len(),
            duration_secs: self.duration_secs(),
            position_x: ErrorStats::from_errors(&collect(&|s| s.position_delta.x)),
            position_y: ErrorStats::from_errors(&collect(&|s| s.position_delta.y)),
            position_z: ErrorStats::from_errors(&collect(&|s| s.position_delta.z)),
            position_norm: ErrorStats::from_errors(&collect(&|s| s.position_error)),
            attitude: ErrorStats::from_errors(&collect(&|s| s.attitude_error)),
            velocity_norm: collect_opt(&|s| s.velocity_delta.map(|v| v.norm()))
                .map(|v| ErrorStats::from_errors(&v)),
            gyro_bias_norm: collect_opt(&|s| s.gyro_bias_delta.map(|v| v.norm()))
                .map(|v| ErrorStats::from_errors(&v)),
            accel_bias_norm: collect_opt(&|s| s.accel_bias_delta.map(|v| v.norm()))
                .map(|v| ErrorStats::from_errors(&v)),
        }
    }
}

/// Aggregate comparison statistics between two series.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Reference series name
    pub reference: String,
    /// Comparison series name
    pub compared: String,
    /// Number of aligned sample pairs
    pub pairs: usize,
    /// Time span covered by the aligned samples (s)
    pub duration_secs: f64,
    /// Position difference along x (m)
    pub position_x: ErrorStats,
    /// Position difference along y (m)
    pub position_y: ErrorStats,
    /// Position difference along z (m)
    pub position_z: ErrorStats,
    /// Position difference norm (m)
    pub position_norm: ErrorStats,
    /// Attitude angular difference (rad)
    pub attitude: ErrorStats,
    /// Velocity difference norm (m/s), when both series log velocity
    pub velocity_norm: Option<ErrorStats>,
    /// Gyro bias difference norm (rad/s)
    pub gyro_bias_norm: Option<ErrorStats>,
    /// Accel bias difference norm (m/s²)
    pub accel_bias_norm: Option<ErrorStats>,
}

impl DiffSummary {
    /// Print the summary.
    pub fn print(&self) {
        println!(
            "=== {} vs {} ({} pairs over {:.1}s) ===",
            self.compared, self.reference, self.pairs, self.duration_secs
        );
        println!(
            "Position RMSE:  {:.6} m (x: {:.6}, y: {:.6}, z: {:.6})",
            self.position_norm.rmse, self.position_x.rmse, self.position_y.rmse,
            self.position_z.rmse
        );
        println!(
            "Attitude RMSE:  {:.6} rad (mean: {:.6}, max: {:.6})",
            self.attitude.rmse, self.attitude.mean, self.attitude.max
        );
        if let Some(ref v) = self.velocity_norm {
            println!("Velocity RMSE:  {:.6} m/s ({})", v.rmse, v.summary());
        }
        if let Some(ref g) = self.gyro_bias_norm {
            println!("Gyro bias RMSE: {:.6} rad/s", g.rmse);
        }
        if let Some(ref a) = self.accel_bias_norm {
            println!("Accel bias RMSE: {:.6} m/s²", a.rmse);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignedPair;
    use crate::core::quaternion::Quaternion;
    use crate::core::types::EstimateRecord;
    use approx::assert_relative_eq;

    /// Pairs where the comparison runs 0.1m ahead along x.
    fn offset_pairs(n: usize) -> Vec<AlignedPair> {
        (0..n)
            .map(|i| {
                let ts = i as u64 * 100_000;
                let reference = EstimateRecord::new(
                    ts,
                    Vec3::new(i as f64 * 0.5, 0.0, 0.0),
                    Quaternion::identity(),
                );
                let mut other = reference;
                other.position.x += 0.1;
                AlignedPair {
                    timestamp_us: ts,
                    reference,
                    other,
                }
            })
            .collect()
    }

    #[test]
    fn test_constant_offset() {
        let diff = SeriesDiff::compute("ref", "cmp", &offset_pairs(10));
        let summary = diff.summary();

        assert_eq!(summary.pairs, 10);
        assert_relative_eq!(summary.position_x.rmse, 0.1, epsilon = 1e-9);
        assert_relative_eq!(summary.position_y.rmse, 0.0, epsilon = 1e-9);
        assert_relative_eq!(summary.position_norm.rmse, 0.1, epsilon = 1e-9);
        assert_relative_eq!(summary.attitude.rmse, 0.0, epsilon = 1e-9);
        assert!(summary.velocity_norm.is_none());
    }

    #[test]
    fn test_attitude_difference() {
        let half = 0.05f64;
        let rotated = Quaternion::new(half.cos(), 0.0, 0.0, half.sin()); // 0.1 rad about z

        let reference = EstimateRecord::new(0, Vec3::default(), Quaternion::identity());
        let mut other = reference;
        other.orientation = rotated;

        let pairs = vec![AlignedPair {
            timestamp_us: 0,
            reference,
            other,
        }];
        let diff = SeriesDiff::compute("ref", "cmp", &pairs);

        assert_relative_eq!(diff.samples[0].attitude_error, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_time_axis_starts_at_zero() {
        let mut pairs = offset_pairs(3);
        for p in &mut pairs {
            p.timestamp_us += 5_000_000;
        }
        let diff = SeriesDiff::compute("ref", "cmp", &pairs);

        assert_relative_eq!(diff.samples[0].time_s, 0.0);
        assert_relative_eq!(diff.samples[2].time_s, 0.2, epsilon = 1e-9);
        assert_relative_eq!(diff.duration_secs(), 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_outlier_delta() {
        let mut reference = EstimateRecord::new(0, Vec3::default(), Quaternion::identity());
        reference.outliers = Some(2);
        let mut other = reference;
        other.outliers = Some(5);

        let pairs = vec![AlignedPair {
            timestamp_us: 0,
            reference,
            other,
        }];
        let diff = SeriesDiff::compute("ref", "cmp", &pairs);
        assert_eq!(diff.samples[0].outlier_delta, Some(3));
    }

    #[test]
    fn test_empty_pairs() {
        let diff = SeriesDiff::compute("ref", "cmp", &[]);
        let summary = diff.summary();
        assert_eq!(summary.pairs, 0);
        assert_relative_eq!(summary.position_norm.rmse, 0.0);
        // Optional fields were never observed, so no stats for them
        assert!(summary.velocity_norm.is_none());
        assert!(summary.gyro_bias_norm.is_none());
        assert!(summary.accel_bias_norm.is_none());
    }

    #[test]
    fn test_velocity_stats_present_when_logged() {
        let mut pairs = offset_pairs(4);
        for p in &mut pairs {
            p.reference.velocity = Some(Vec3::new(1.0, 0.0, 0.0));
            p.other.velocity = Some(Vec3::new(1.0, 0.2, 0.0));
        }
        let summary = SeriesDiff::compute("ref", "cmp", &pairs).summary();
        let velocity = summary.velocity_norm.unwrap();
        assert_relative_eq!(velocity.rmse, 0.2, epsilon = 1e-9);
    }
}
