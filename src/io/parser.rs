//! Text parsing of EKF estimate logs.
//!
//! The estimator writes one record per line as whitespace-separated
//! numeric columns:
//!
//! ```text
//! timestamp  px py pz  qw qx qy qz  [vx vy vz]  [bgx bgy bgz]
//!            [bax bay baz]  [cov diagonal ×9]  [outliers]
//! ```
//!
//! Timestamps are seconds. Lines starting with `#` and blank lines are
//! skipped, as is a single leading header line whose first token is not
//! numeric. Optional column groups must be complete; a line with a
//! partial group is a parse error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::core::quaternion::Quaternion;
use crate::core::types::{CovarianceDiagonal, EstimateRecord, Vec3};
use crate::error::{Result, TulanaError};

/// Column counts that form a complete record.
///
/// 8 = timestamp + position + quaternion, then +3 for each of velocity,
/// gyro bias, accel bias, +9 for the covariance diagonal, +1 for the
/// outlier count.
const VALID_COLUMN_COUNTS: [usize; 6] = [8, 11, 14, 17, 26, 27];

/// Quaternion norm deviation above which a record is counted as
/// denormalized (still accepted after renormalization).
const QUAT_NORM_TOLERANCE: f64 = 1e-3;

/// Read all records from an estimate log file.
///
/// Records are returned in file order; sorting and duplicate detection
/// happen in [`EstimateSeries::from_records`](crate::io::EstimateSeries::from_records).
pub fn load_records(path: &Path) -> Result<Vec<EstimateRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let path_display = path.display().to_string();
    let mut records = Vec::new();
    let mut header_skipped = false;
    let mut denormalized = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();

        // A single leading header line is tolerated
        if !header_skipped && records.is_empty() && tokens[0].parse::<f64>().is_err() {
            debug!("{}: skipping header line", path_display);
            header_skipped = true;
            continue;
        }

        let record = parse_line(&tokens).map_err(|message| TulanaError::Parse {
            path: path_display.clone(),
            line: line_no,
            message,
        })?;

        if (record.orientation.norm() - 1.0).abs() > QUAT_NORM_TOLERANCE {
            denormalized += 1;
        }

        records.push(normalize_record(record));
    }

    if denormalized > 0 {
        warn!(
            "{}: renormalized {} quaternions with norm off by more than {}",
            path_display, denormalized, QUAT_NORM_TOLERANCE
        );
    }

    if records.is_empty() {
        return Err(TulanaError::Series(format!(
            "{}: no records found",
            path_display
        )));
    }

    Ok(records)
}

/// Parse one data line into a record. Returns a message without file
/// context; the caller attaches path and line number.
fn parse_line(tokens: &[&str]) -> std::result::Result<EstimateRecord, String> {
    if !VALID_COLUMN_COUNTS.contains(&tokens.len()) {
        return Err(format!(
            "expected {:?} columns, found {} (incomplete column group?)",
            VALID_COLUMN_COUNTS,
            tokens.len()
        ));
    }

    let mut fields = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let value: f64 = token
            .parse()
            .map_err(|_| format!("column {}: invalid number '{}'", i + 1, token))?;
        if !value.is_finite() {
            return Err(format!("column {}: non-finite value '{}'", i + 1, token));
        }
        fields.push(value);
    }

    let timestamp_s = fields[0];
    if timestamp_s < 0.0 {
        return Err(format!("negative timestamp {}", timestamp_s));
    }
    let timestamp_us = (timestamp_s * 1_000_000.0).round() as u64;

    let position = Vec3::new(fields[1], fields[2], fields[3]);
    let orientation = Quaternion::new(fields[4], fields[5], fields[6], fields[7]);

    let mut record = EstimateRecord::new(timestamp_us, position, orientation);

    if fields.len() >= 11 {
        record.velocity = Some(Vec3::new(fields[8], fields[9], fields[10]));
    }
    if fields.len() >= 14 {
        record.gyro_bias = Some(Vec3::new(fields[11], fields[12], fields[13]));
    }
    if fields.len() >= 17 {
        record.accel_bias = Some(Vec3::new(fields[14], fields[15], fields[16]));
    }
    if fields.len() >= 26 {
        record.covariance = Some(CovarianceDiagonal::from_slice(&fields[17..26]));
    }
    if fields.len() >= 27 {
        let count = fields[26];
        if count < 0.0 || count.fract() != 0.0 {
            return Err(format!(
                "column 27: outlier count must be a non-negative integer, got '{}'",
                count
            ));
        }
        record.outliers = Some(count as u32);
    }

    Ok(record)
}

/// Renormalize the orientation so downstream math can assume unit norm.
fn normalize_record(mut record: EstimateRecord) -> EstimateRecord {
    record.orientation = record.orientation.normalized();
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn write_log(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_minimal_record() {
        let file = write_log("1.5 0.1 0.2 0.3 1 0 0 0\n");
        let records = load_records(file.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp_us, 1_500_000);
        assert_relative_eq!(records[0].position.y, 0.2);
        assert!(records[0].velocity.is_none());
        assert!(records[0].covariance.is_none());
    }

    #[test]
    fn test_parse_full_record() {
        let mut line = String::from("2.0 1 2 3 1 0 0 0 0.1 0.2 0.3 0.01 0.02 0.03 0.1 0.1 0.1");
        for i in 0..9 {
            line.push_str(&format!(" {}", 0.001 * (i + 1) as f64));
        }
        line.push_str(" 4\n");

        let file = write_log(&line);
        let records = load_records(file.path()).unwrap();

        let r = &records[0];
        assert_relative_eq!(r.velocity.unwrap().z, 0.3);
        assert_relative_eq!(r.gyro_bias.unwrap().x, 0.01);
        assert_relative_eq!(r.accel_bias.unwrap().y, 0.1);
        assert_relative_eq!(r.covariance.unwrap().position[0], 0.001);
        assert_relative_eq!(r.covariance.unwrap().velocity[2], 0.009);
        assert_eq!(r.outliers, Some(4));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let file = write_log("# estimator log\n\n0.0 0 0 0 1 0 0 0\n# trailing comment\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_header_line_skipped() {
        let file = write_log("time px py pz qw qx qy qz\n0.0 0 0 0 1 0 0 0\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_partial_group_rejected() {
        // 9 columns: velocity group started but incomplete
        let file = write_log("0.0 0 0 0 1 0 0 0 0.5\n");
        let err = load_records(file.path()).unwrap_err();
        match err {
            TulanaError::Parse { line, .. } => assert_eq!(line, 1),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_reports_line() {
        let file = write_log("0.0 0 0 0 1 0 0 0\n1.0 0 0 abc 1 0 0 0\n");
        let err = load_records(file.path()).unwrap_err();
        match err {
            TulanaError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("abc"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_rejected() {
        let file = write_log("0.0 0 0 nan 1 0 0 0\n");
        assert!(load_records(file.path()).is_err());
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = write_log("# only comments\n");
        assert!(matches!(
            load_records(file.path()),
            Err(TulanaError::Series(_))
        ));
    }

    #[test]
    fn test_quaternion_renormalized() {
        let file = write_log("0.0 0 0 0 2 0 0 0\n");
        let records = load_records(file.path()).unwrap();
        assert_relative_eq!(records[0].orientation.norm(), 1.0, epsilon = 1e-12);
    }
}
