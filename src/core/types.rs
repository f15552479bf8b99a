//! Record and vector types for estimate logs.

use serde::{Deserialize, Serialize};

use crate::core::quaternion::Quaternion;

/// A 3D vector. Units depend on the field it came from (meters for
/// position, m/s for velocity, rad/s and m/s² for the IMU biases).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vec3 {
    /// Create a new vector.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Componentwise difference `self - other`.
    #[inline]
    pub fn sub(&self, other: &Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Distance to another vector.
    #[inline]
    pub fn distance(&self, other: &Vec3) -> f64 {
        self.sub(other).norm()
    }

    /// Linear interpolation: `a + t * (b - a)`.
    #[inline]
    pub fn lerp(a: &Vec3, b: &Vec3, t: f64) -> Vec3 {
        Vec3::new(
            a.x + t * (b.x - a.x),
            a.y + t * (b.y - a.y),
            a.z + t * (b.z - a.z),
        )
    }
}

/// Diagonal of the EKF error covariance, grouped by state block.
///
/// The estimator logs only the diagonal: position variances (m²),
/// attitude variances (rad²), velocity variances (m²/s²).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CovarianceDiagonal {
    /// Position variances (x, y, z)
    pub position: [f64; 3],
    /// Attitude variances (roll, pitch, yaw)
    pub attitude: [f64; 3],
    /// Velocity variances (x, y, z)
    pub velocity: [f64; 3],
}

impl CovarianceDiagonal {
    /// Component labels in storage order, for plot axes.
    pub const COMPONENT_LABELS: [&'static str; 9] = [
        "pos x", "pos y", "pos z", "roll", "pitch", "yaw", "vel x", "vel y", "vel z",
    ];

    /// Create from a 9-element slice in storage order.
    ///
    /// # Panics
    ///
    /// Panics if `values` has fewer than 9 elements.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            position: [values[0], values[1], values[2]],
            attitude: [values[3], values[4], values[5]],
            velocity: [values[6], values[7], values[8]],
        }
    }

    /// All 9 variances in storage order.
    pub fn as_array(&self) -> [f64; 9] {
        [
            self.position[0],
            self.position[1],
            self.position[2],
            self.attitude[0],
            self.attitude[1],
            self.attitude[2],
            self.velocity[0],
            self.velocity[1],
            self.velocity[2],
        ]
    }

    /// Componentwise linear interpolation.
    pub fn lerp(a: &CovarianceDiagonal, b: &CovarianceDiagonal, t: f64) -> Self {
        let av = a.as_array();
        let bv = b.as_array();
        let mut out = [0.0f64; 9];
        for i in 0..9 {
            out[i] = av[i] + t * (bv[i] - av[i]);
        }
        Self::from_slice(&out)
    }
}

/// One line of an EKF estimate log.
///
/// Position and orientation are always present; the remaining fields are
/// optional column groups that shorter log formats omit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimateRecord {
    /// Timestamp in microseconds since log epoch
    pub timestamp_us: u64,
    /// Estimated position (m)
    pub position: Vec3,
    /// Estimated orientation (unit quaternion)
    pub orientation: Quaternion,
    /// Estimated velocity (m/s)
    pub velocity: Option<Vec3>,
    /// Gyroscope bias estimate (rad/s)
    pub gyro_bias: Option<Vec3>,
    /// Accelerometer bias estimate (m/s²)
    pub accel_bias: Option<Vec3>,
    /// Covariance diagonal
    pub covariance: Option<CovarianceDiagonal>,
    /// Measurement outliers rejected since the previous record
    pub outliers: Option<u32>,
}

impl EstimateRecord {
    /// Create a record with only the mandatory fields set.
    pub fn new(timestamp_us: u64, position: Vec3, orientation: Quaternion) -> Self {
        Self {
            timestamp_us,
            position,
            orientation,
            velocity: None,
            gyro_bias: None,
            accel_bias: None,
            covariance: None,
            outliers: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vec3_norm() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_relative_eq!(v.norm(), 5.0);
    }

    #[test]
    fn test_vec3_distance() {
        let a = Vec3::new(1.0, 1.0, 1.0);
        let b = Vec3::new(1.0, 1.0, 3.0);
        assert_relative_eq!(a.distance(&b), 2.0);
    }

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(2.0, 4.0, -2.0);
        let mid = Vec3::lerp(&a, &b, 0.5);
        assert_relative_eq!(mid.x, 1.0);
        assert_relative_eq!(mid.y, 2.0);
        assert_relative_eq!(mid.z, -1.0);
    }

    #[test]
    fn test_covariance_roundtrip() {
        let values: Vec<f64> = (1..=9).map(|i| i as f64 * 0.1).collect();
        let cov = CovarianceDiagonal::from_slice(&values);
        assert_eq!(cov.as_array().to_vec(), values);
    }

    #[test]
    fn test_covariance_lerp() {
        let a = CovarianceDiagonal::from_slice(&[0.0; 9]);
        let b = CovarianceDiagonal::from_slice(&[1.0; 9]);
        let mid = CovarianceDiagonal::lerp(&a, &b, 0.25);
        for v in mid.as_array() {
            assert_relative_eq!(v, 0.25);
        }
    }
}
