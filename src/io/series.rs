//! In-memory estimate series.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::core::types::EstimateRecord;
use crate::error::{Result, TulanaError};
use crate::io::parser;

/// A time-ordered table of estimate records from one log file.
///
/// Construction sorts by timestamp (the estimator flushes its log
/// asynchronously, so mild disorder is normal) and rejects duplicate
/// timestamps and empty inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateSeries {
    name: String,
    records: Vec<EstimateRecord>,
}

impl EstimateSeries {
    /// Load a series from a log file. The series name is the file stem.
    pub fn load(path: &Path) -> Result<Self> {
        let records = parser::load_records(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_records(name, records)
    }

    /// Build a series from records, sorting by timestamp.
    pub fn from_records(name: impl Into<String>, mut records: Vec<EstimateRecord>) -> Result<Self> {
        let name = name.into();
        if records.is_empty() {
            return Err(TulanaError::Series(format!("'{}': empty series", name)));
        }

        if !records.windows(2).all(|w| w[0].timestamp_us <= w[1].timestamp_us) {
            warn!("'{}': records out of order, sorting by timestamp", name);
            records.sort_by_key(|r| r.timestamp_us);
        }

        if let Some(w) = records
            .windows(2)
            .find(|w| w[0].timestamp_us == w[1].timestamp_us)
        {
            return Err(TulanaError::Series(format!(
                "'{}': duplicate timestamp {} us",
                name, w[0].timestamp_us
            )));
        }

        Ok(Self { name, records })
    }

    /// Series name (file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records in ascending timestamp order.
    pub fn records(&self) -> &[EstimateRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the series holds no records. Always false for a
    /// constructed series; kept for the usual len/is_empty pairing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Timestamp of the first record.
    pub fn start_time_us(&self) -> u64 {
        self.records[0].timestamp_us
    }

    /// Timestamp of the last record.
    pub fn end_time_us(&self) -> u64 {
        self.records[self.records.len() - 1].timestamp_us
    }

    /// Time span covered by the series, in seconds.
    pub fn duration_secs(&self) -> f64 {
        (self.end_time_us() - self.start_time_us()) as f64 / 1_000_000.0
    }

    /// Mean sample rate in Hz. Zero for a single-record series.
    pub fn mean_rate_hz(&self) -> f64 {
        let duration = self.duration_secs();
        if duration <= 0.0 {
            return 0.0;
        }
        (self.len() - 1) as f64 / duration
    }

    /// Whether every record carries a velocity estimate.
    pub fn has_velocity(&self) -> bool {
        self.records.iter().all(|r| r.velocity.is_some())
    }

    /// Whether every record carries a covariance diagonal.
    pub fn has_covariance(&self) -> bool {
        self.records.iter().all(|r| r.covariance.is_some())
    }

    /// Whether every record carries an outlier count.
    pub fn has_outliers(&self) -> bool {
        self.records.iter().all(|r| r.outliers.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quaternion::Quaternion;
    use crate::core::types::Vec3;
    use approx::assert_relative_eq;

    fn record(timestamp_us: u64) -> EstimateRecord {
        EstimateRecord::new(
            timestamp_us,
            Vec3::new(0.0, 0.0, 0.0),
            Quaternion::identity(),
        )
    }

    #[test]
    fn test_sorted_on_construction() {
        let series =
            EstimateSeries::from_records("test", vec![record(3000), record(1000), record(2000)])
                .unwrap();

        let timestamps: Vec<u64> = series.records().iter().map(|r| r.timestamp_us).collect();
        assert_eq!(timestamps, vec![1000, 2000, 3000]);
    }

    #[test]
    fn test_duplicate_timestamp_rejected() {
        let result = EstimateSeries::from_records("test", vec![record(1000), record(1000)]);
        assert!(matches!(result, Err(TulanaError::Series(_))));
    }

    #[test]
    fn test_empty_rejected() {
        let result = EstimateSeries::from_records("test", vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_and_rate() {
        let records: Vec<EstimateRecord> = (0..11).map(|i| record(i * 100_000)).collect();
        let series = EstimateSeries::from_records("test", records).unwrap();

        assert_relative_eq!(series.duration_secs(), 1.0);
        assert_relative_eq!(series.mean_rate_hz(), 10.0);
    }

    #[test]
    fn test_single_record_rate_is_zero() {
        let series = EstimateSeries::from_records("test", vec![record(5)]).unwrap();
        assert_relative_eq!(series.mean_rate_hz(), 0.0);
    }

    #[test]
    fn test_optional_field_presence() {
        let mut with_vel = record(0);
        with_vel.velocity = Some(Vec3::new(1.0, 0.0, 0.0));
        let series =
            EstimateSeries::from_records("test", vec![with_vel, record(1000)]).unwrap();

        // Mixed presence counts as absent
        assert!(!series.has_velocity());
        assert!(!series.has_covariance());
    }
}
