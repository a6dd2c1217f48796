//! Quaternion algebra used for rigid body orientation.
//!
//! The integrator works directly on the four components: it adds the first-order
//! derivative `ω * q` to the orientation and renormalizes afterwards, so the type
//! exposes plain (non-unit) arithmetic instead of wrapping a unit quaternion.
//!
//! # Example
//! ```
//! use embedded_rigidbody::quaternion::Quaternion;
//! use nalgebra::Vector3;
//!
//! let mut q = Quaternion::identity() + Quaternion::from_pure(Vector3::new(0.0, 0.0, 0.1));
//! q.normalize();
//! assert!((q.dot(&q) - 1.0).abs() < 1e-6);
//!
//! let r = q.to_rotation_matrix();
//! assert!((r * r.transpose() - nalgebra::Matrix3::identity()).norm() < 1e-5);
//! ```

use core::fmt;
use core::ops::{Add, Mul};

use nalgebra::{Matrix3, Vector3};

/// Four-component quaternion `w + xi + yj + zk`.
///
/// Thin wrapper over [`nalgebra::Quaternion`], which does the arithmetic. The
/// wrapper fixes the `(w, x, y, z)` component order at construction and display,
/// and carries the closed-form rotation matrix the integrator uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion(pub nalgebra::Quaternion<f32>);

impl Quaternion {
    #[inline]
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self(nalgebra::Quaternion::new(w, x, y, z))
    }

    /// The identity rotation `(1, 0, 0, 0)`.
    #[inline]
    pub fn identity() -> Self {
        Self(nalgebra::Quaternion::identity())
    }

    /// Pure quaternion `(0, v)`, used to lift an angular velocity into quaternion space.
    #[inline]
    pub fn from_pure(v: Vector3<f32>) -> Self {
        Self(nalgebra::Quaternion::from_imag(v))
    }

    /// Scalar part.
    #[inline]
    pub fn w(&self) -> f32 {
        self.0.w
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.0.i
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.0.j
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.0.k
    }

    /// Imaginary part as a vector.
    #[inline]
    pub fn vector(&self) -> Vector3<f32> {
        self.0.imag()
    }

    #[inline]
    pub fn conjugate(&self) -> Self {
        Self(self.0.conjugate())
    }

    /// 4-D Euclidean inner product.
    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.0.dot(&other.0)
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.0.norm()
    }

    /// Rescale to unit norm in place.
    ///
    /// The quaternion must be non-zero. A zero norm means the orientation was
    /// corrupted upstream; it is asserted in debug builds and left to propagate as
    /// NaN otherwise.
    #[inline]
    pub fn normalize(&mut self) {
        *self = self.normalized();
    }

    /// Unit-norm copy of this quaternion. Same precondition as [`normalize`](Self::normalize).
    #[inline]
    pub fn normalized(&self) -> Self {
        debug_assert!(self.0.norm_squared() > 0.0, "cannot normalize a zero quaternion");
        Self(self.0.normalize())
    }

    /// Rotation matrix equivalent to this (unit) quaternion.
    ///
    /// Only meaningful for unit-norm input; the integrator renormalizes before
    /// every conversion.
    pub fn to_rotation_matrix(&self) -> Matrix3<f32> {
        let (w, x, y, z) = (self.w(), self.x(), self.y(), self.z());
        Matrix3::new(
            1.0 - 2.0 * (y * y + z * z),
            2.0 * (x * y - w * z),
            2.0 * (x * z + w * y),
            2.0 * (x * y + w * z),
            1.0 - 2.0 * (x * x + z * z),
            2.0 * (y * z - w * x),
            2.0 * (x * z - w * y),
            2.0 * (y * z + w * x),
            1.0 - 2.0 * (x * x + y * y),
        )
    }

    /// Rotate `v` by the sandwich product `q v q*`. Assumes a unit quaternion.
    pub fn rotate_vector(&self, v: &Vector3<f32>) -> Vector3<f32> {
        (*self * Self::from_pure(*v) * self.conjugate()).vector()
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

/// Hamilton product. Not commutative.
impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, q: Self) -> Self {
        Self(self.0 * q.0)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, s: f32) -> Self {
        Self(self.0 * s)
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;

    #[inline]
    fn mul(self, q: Quaternion) -> Quaternion {
        q * self
    }
}

impl Add for Quaternion {
    type Output = Self;

    #[inline]
    fn add(self, q: Self) -> Self {
        Self(self.0 + q.0)
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w(), self.x(), self.y(), self.z())
    }
}

impl From<nalgebra::Quaternion<f32>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f32>) -> Self {
        Self(q)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f32> {
    fn from(q: Quaternion) -> Self {
        q.0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use nalgebra::UnitQuaternion;
    use std::format;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_quat_eq(a: &Quaternion, b: &Quaternion) -> bool {
        approx_eq(a.w(), b.w())
            && approx_eq(a.x(), b.x())
            && approx_eq(a.y(), b.y())
            && approx_eq(a.z(), b.z())
    }

    fn approx_vec_eq(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    fn axis_angle(axis: Vector3<f32>, angle: f32) -> Quaternion {
        UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle)
            .into_inner()
            .into()
    }

    fn samples() -> [Quaternion; 4] {
        [
            axis_angle(Vector3::new(1.0, 0.0, 0.0), 0.3),
            axis_angle(Vector3::new(0.0, 1.0, 1.0), 1.2),
            axis_angle(Vector3::new(-1.0, 2.0, 0.5), 2.7),
            axis_angle(Vector3::new(0.3, -0.4, 0.9), -0.8),
        ]
    }

    #[test]
    fn test_hamilton_basis() {
        let i = Quaternion::new(0.0, 1.0, 0.0, 0.0);
        let j = Quaternion::new(0.0, 0.0, 1.0, 0.0);
        let k = Quaternion::new(0.0, 0.0, 0.0, 1.0);

        assert!(approx_quat_eq(&(i * j), &k));
        assert!(approx_quat_eq(&(j * i), &(k * -1.0)));
        assert!(approx_quat_eq(&(i * i), &Quaternion::new(-1.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_product_matches_nalgebra() {
        let s = samples();
        let expected: Quaternion =
            (nalgebra::Quaternion::from(s[1]) * nalgebra::Quaternion::from(s[2])).into();
        assert!(approx_quat_eq(&(s[1] * s[2]), &expected));
    }

    #[test]
    fn test_product_not_commutative() {
        let s = samples();
        assert!(!approx_quat_eq(&(s[0] * s[1]), &(s[1] * s[0])));
    }

    #[test]
    fn test_product_associative() {
        let s = samples();
        for p in &s {
            for q in &s {
                for r in &s {
                    let lhs = (*p * *q) * *r;
                    let rhs = *p * (*q * *r);
                    assert!(approx_quat_eq(&lhs, &rhs), "{} != {}", lhs, rhs);
                }
            }
        }
    }

    #[test]
    fn test_add_and_scale() {
        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(-0.5, 0.5, 1.0, -2.0);
        assert_eq!(a + b, b + a);
        assert_eq!(a + b, Quaternion::new(0.5, 2.5, 4.0, 2.0));
        assert_eq!(a * 2.0, Quaternion::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(2.0 * a, a * 2.0);
    }

    #[test]
    fn test_dot_is_squared_norm() {
        let q = Quaternion::new(1.0, 2.0, 2.0, 4.0);
        assert!(approx_eq(q.dot(&q), 25.0));
        assert!(approx_eq(q.norm(), 5.0));
    }

    #[test]
    fn test_normalize() {
        let mut q = Quaternion::new(1.0, 2.0, 2.0, 4.0);
        q.normalize();
        assert!(approx_eq(q.dot(&q), 1.0));
        assert!(approx_quat_eq(&q, &Quaternion::new(0.2, 0.4, 0.4, 0.8)));
    }

    #[test]
    fn test_normalize_idempotent() {
        for q in samples() {
            assert!(approx_quat_eq(&q.normalized(), &q));
        }
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_normalize_zero_panics_in_debug() {
        let mut q = Quaternion::new(0.0, 0.0, 0.0, 0.0);
        q.normalize();
    }

    #[test]
    fn test_identity_rotation_matrix() {
        assert_eq!(Quaternion::identity().to_rotation_matrix(), Matrix3::identity());
    }

    #[test]
    fn test_rotation_matrix_quarter_turn_z() {
        let q = axis_angle(Vector3::new(0.0, 0.0, 1.0), core::f32::consts::FRAC_PI_2);
        let r = q.to_rotation_matrix();
        let v = r * Vector3::new(1.0, 0.0, 0.0);
        assert!(approx_vec_eq(&v, &Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotation_matrix_orthonormal() {
        for q in samples() {
            let r = q.to_rotation_matrix();
            assert!((r * r.transpose() - Matrix3::identity()).norm() < 1e-5);
            assert!(approx_eq(r.determinant(), 1.0));
        }
    }

    #[test]
    fn test_rotation_matrix_matches_nalgebra() {
        for q in samples() {
            let unit = UnitQuaternion::new_unchecked(nalgebra::Quaternion::from(q));
            let expected = unit.to_rotation_matrix().into_inner();
            assert!((q.to_rotation_matrix() - expected).norm() < 1e-5);
        }
    }

    #[test]
    fn test_matrix_and_sandwich_agree() {
        let vectors = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -2.0, 0.5),
            Vector3::new(3.0, 1.0, -4.0),
        ];
        for q in samples() {
            let r = q.to_rotation_matrix();
            for v in &vectors {
                assert!(approx_vec_eq(&(r * v), &q.rotate_vector(v)));
            }
        }
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let q = Quaternion::new(0.5, -0.5, 0.25, 0.75);
        let back: Quaternion = nalgebra::Quaternion::from(q).into();
        assert_eq!(q, back);
    }

    #[test]
    fn test_components_follow_wxyz_order() {
        let q = Quaternion::new(0.5, -1.0, 2.0, 0.25);
        assert_eq!((q.w(), q.x(), q.y(), q.z()), (0.5, -1.0, 2.0, 0.25));
        assert_eq!((q.0.w, q.0.i, q.0.j, q.0.k), (0.5, -1.0, 2.0, 0.25));
        assert_eq!(q.vector(), Vector3::new(-1.0, 2.0, 0.25));
        assert_eq!(q.conjugate(), Quaternion::new(0.5, 1.0, -2.0, -0.25));
        assert_eq!(
            Quaternion::from_pure(Vector3::new(1.0, 2.0, 3.0)),
            Quaternion::new(0.0, 1.0, 2.0, 3.0)
        );
        assert_eq!(Quaternion::default(), Quaternion::new(1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Quaternion::identity()), "(1, 0, 0, 0)");
        assert_eq!(format!("{}", Quaternion::new(0.5, -1.0, 2.0, 0.25)), "(0.5, -1, 2, 0.25)");
    }
}
