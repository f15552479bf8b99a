//! Unit quaternion for orientation comparison and interpolation.
//!
//! The estimator logs orientation as a `w x y z` quaternion. This module
//! provides the small amount of quaternion arithmetic the pipeline needs:
//! normalization on load, angular distance between two orientations, and
//! spherical interpolation for time alignment.

use serde::{Deserialize, Serialize};

/// Orientation quaternion in `w x y z` order.
///
/// All operations assume unit quaternions; [`Quaternion::normalized`] is
/// applied when records are parsed. `q` and `-q` represent the same
/// rotation, and [`Quaternion::angular_distance`] and
/// [`Quaternion::slerp`] are invariant under that sign flip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar part
    pub w: f64,
    /// Vector part, x
    pub x: f64,
    /// Vector part, y
    pub y: f64,
    /// Vector part, z
    pub z: f64,
}

impl Quaternion {
    /// Create a quaternion from components (not normalized).
    #[inline]
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Identity rotation.
    #[inline]
    pub fn identity() -> Self {
        Self {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Euclidean norm of the four components.
    #[inline]
    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Return a unit-norm copy. A zero quaternion maps to identity.
    pub fn normalized(&self) -> Quaternion {
        let n = self.norm();
        if n < f64::EPSILON {
            return Quaternion::identity();
        }
        Quaternion::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    /// Four-component dot product.
    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Conjugate (inverse rotation for unit quaternions).
    #[inline]
    pub fn conjugate(&self) -> Quaternion {
        Quaternion::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Angular distance to another orientation, in radians.
    ///
    /// Returns the rotation angle of `self⁻¹ ⊗ other`, in [0, π].
    /// Symmetric, and invariant under the q / -q hemisphere ambiguity.
    pub fn angular_distance(&self, other: &Quaternion) -> f64 {
        let d = self.dot(other).abs().min(1.0);
        2.0 * d.acos()
    }

    /// Spherical linear interpolation between two unit quaternions.
    ///
    /// `t` should be in [0, 1] where 0 returns `a` and 1 returns `b`.
    /// Takes the shortest path on the rotation sphere; for nearly
    /// parallel inputs it degrades to normalized linear interpolation
    /// to avoid division by a vanishing sine.
    pub fn slerp(a: &Quaternion, b: &Quaternion, t: f64) -> Quaternion {
        let mut dot = a.dot(b);

        // Take the short way around
        let b = if dot < 0.0 {
            dot = -dot;
            Quaternion::new(-b.w, -b.x, -b.y, -b.z)
        } else {
            *b
        };

        if dot > 0.9995 {
            // Nearly parallel: nlerp
            return Quaternion::new(
                a.w + t * (b.w - a.w),
                a.x + t * (b.x - a.x),
                a.y + t * (b.y - a.y),
                a.z + t * (b.z - a.z),
            )
            .normalized();
        }

        let theta = dot.min(1.0).acos();
        let sin_theta = theta.sin();
        let wa = ((1.0 - t) * theta).sin() / sin_theta;
        let wb = (t * theta).sin() / sin_theta;

        Quaternion::new(
            wa * a.w + wb * b.w,
            wa * a.x + wb * b.x,
            wa * a.y + wb * b.y,
            wa * a.z + wb * b.z,
        )
        .normalized()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}
