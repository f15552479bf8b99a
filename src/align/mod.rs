//! Time alignment between two estimate series.
//!
//! Two estimators rarely log on the same clock ticks. Alignment walks
//! the reference series and, for each reference record, produces the
//! comparison series' state at that time: either the nearest logged
//! record within a maximum offset, or an interpolated record (linear
//! for vector fields, spherical for orientation).

use serde::{Deserialize, Serialize};

use crate::core::quaternion::Quaternion;
use crate::core::types::{CovarianceDiagonal, EstimateRecord, Vec3};
use crate::io::EstimateSeries;

/// How comparison records are matched to reference timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlignMethod {
    /// Pair with the closest comparison record in time.
    Nearest,
    /// Interpolate the comparison series at the reference timestamp.
    Interpolate,
}

/// Configuration for time alignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Maximum |Δt| accepted when pairing (microseconds). In
    /// interpolation mode, a bracketing interval wider than twice this
    /// is treated as a gap in the comparison log.
    pub max_offset_us: u64,
    /// Matching method.
    pub method: AlignMethod,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            max_offset_us: 20_000, // 20 ms, one tick at 50 Hz
            method: AlignMethod::Nearest,
        }
    }
}

/// A reference record paired with the comparison series' state at the
/// same (reference) timestamp.
#[derive(Debug, Clone, Copy)]
pub struct AlignedPair {
    /// Reference timestamp the pair is anchored to
    pub timestamp_us: u64,
    /// Record from the reference series
    pub reference: EstimateRecord,
    /// Matched or interpolated record from the comparison series
    pub other: EstimateRecord,
}

/// Align a comparison series against a reference series.
///
/// Reference records with no acceptable counterpart are dropped; the
/// result is ordered by reference timestamp and may be empty.
pub fn align(
    reference: &EstimateSeries,
    other: &EstimateSeries,
    config: &AlignConfig,
) -> Vec<AlignedPair> {
    match config.method {
        AlignMethod::Nearest => align_nearest(reference, other, config.max_offset_us),
        AlignMethod::Interpolate => align_interpolated(reference, other, config.max_offset_us),
    }
}

/// Single-pass nearest-neighbor pairing over two sorted series.
fn align_nearest(
    reference: &EstimateSeries,
    other: &EstimateSeries,
    max_offset_us: u64,
) -> Vec<AlignedPair> {
    let refs = reference.records();
    let others = other.records();
    if refs.is_empty() || others.is_empty() {
        return Vec::new();
    }

    let mut pairs = Vec::with_capacity(refs.len());
    let mut j = 0usize;

    for r in refs {
        // Reference timestamps ascend, so the nearest candidate only
        // moves forward.
        while j + 1 < others.len()
            && others[j + 1].timestamp_us.abs_diff(r.timestamp_us)
                <= others[j].timestamp_us.abs_diff(r.timestamp_us)
        {
            j += 1;
        }

        if others[j].timestamp_us.abs_diff(r.timestamp_us) <= max_offset_us {
            pairs.push(AlignedPair {
                timestamp_us: r.timestamp_us,
                reference: *r,
                other: others[j],
            });
        }
    }

    pairs
}

/// Interpolate the comparison series at each reference timestamp inside
/// its span.
fn align_interpolated(
    reference: &EstimateSeries,
    other: &EstimateSeries,
    max_offset_us: u64,
) -> Vec<AlignedPair> {
    let refs = reference.records();
    let others = other.records();
    if refs.is_empty() || others.is_empty() {
        return Vec::new();
    }

    let span_start = others[0].timestamp_us;
    let span_end = others[others.len() - 1].timestamp_us;
    let max_gap_us = max_offset_us.saturating_mul(2);

    let mut pairs = Vec::with_capacity(refs.len());
    let mut k = 0usize;

    for r in refs {
        let ts = r.timestamp_us;
        if ts < span_start || ts > span_end {
            continue;
        }

        while k + 1 < others.len() && others[k + 1].timestamp_us < ts {
            k += 1;
        }

        if others[k].timestamp_us == ts {
            pairs.push(AlignedPair {
                timestamp_us: ts,
                reference: *r,
                other: others[k],
            });
            continue;
        }

        // others[k].ts < ts <= others[k+1].ts at this point
        let a = &others[k];
        let b = &others[k + 1];

        if b.timestamp_us - a.timestamp_us > max_gap_us {
            continue;
        }

        pairs.push(AlignedPair {
            timestamp_us: ts,
            reference: *r,
            other: interpolate_record(a, b, ts),
        });
    }

    pairs
}

/// Interpolate between two records at `timestamp_us` ∈ [a, b].
///
/// Vector fields interpolate linearly, orientation spherically. Optional
/// fields survive only when both endpoints carry them. The outlier count
/// is not interpolated; the nearer endpoint wins.
fn interpolate_record(a: &EstimateRecord, b: &EstimateRecord, timestamp_us: u64) -> EstimateRecord {
    let t = (timestamp_us - a.timestamp_us) as f64 / (b.timestamp_us - a.timestamp_us) as f64;

    EstimateRecord {
        timestamp_us,
        position: Vec3::lerp(&a.position, &b.position, t),
        orientation: Quaternion::slerp(&a.orientation, &b.orientation, t),
        velocity: a
            .velocity
            .zip(b.velocity)
            .map(|(va, vb)| Vec3::lerp(&va, &vb, t)),
        gyro_bias: a
            .gyro_bias
            .zip(b.gyro_bias)
            .map(|(ga, gb)| Vec3::lerp(&ga, &gb, t)),
        accel_bias: a
            .accel_bias
            .zip(b.accel_bias)
            .map(|(aa, ab)| Vec3::lerp(&aa, &ab, t)),
        covariance: a
            .covariance
            .zip(b.covariance)
            .map(|(ca, cb)| CovarianceDiagonal::lerp(&ca, &cb, t)),
        outliers: if t < 0.5 { a.outliers } else { b.outliers },
    }
}
