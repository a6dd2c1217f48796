//! Rigid body state and shape-derived mass properties.
//!
//! A [`BodyAttributes`] holds everything the integrator reads and writes: the
//! constant mass properties, the primary state (position, orientation, momenta),
//! the quantities derived from it each step, and the force/torque applied during
//! the current step.
//!
//! # Example
//! ```
//! use embedded_rigidbody::body::BodyAttributes;
//! use nalgebra::Vector3;
//!
//! let body = BodyAttributes::new_box(1.0, 1.0, 1.0, 10.0, Vector3::zeros(), Vector3::zeros());
//! assert_eq!(body.mass, 10.0);
//! assert_eq!(body.vertices.len(), 8);
//! ```

use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::error::{Axis, ShapeError};
use crate::quaternion::Quaternion;

/// Number of mesh vertices carried by a body.
pub const VERTEX_COUNT: usize = 8;

/// Closed set of supported body shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Solid box centered on the body origin, with full extents along x, y and z.
    Box { width: f32, height: f32, depth: f32 },
}

impl Shape {
    /// Validate dimensions and build a box shape.
    pub fn try_box(width: f32, height: f32, depth: f32) -> Result<Self, ShapeError> {
        for (axis, value) in [(Axis::Width, width), (Axis::Height, height), (Axis::Depth, depth)] {
            if !value.is_finite() {
                return Err(ShapeError::NonFinite);
            }
            if value <= 0.0 {
                return Err(ShapeError::NonPositiveDimension { axis, value });
            }
        }
        Ok(Shape::Box { width, height, depth })
    }

    pub fn volume(&self) -> f32 {
        match *self {
            Shape::Box { width, height, depth } => width * height * depth,
        }
    }

    /// Mass of a solid of uniform `density`.
    pub fn mass(&self, density: f32) -> f32 {
        density * self.volume()
    }

    /// Mass for `density`, rejected when it or the inertia derived from it does
    /// not survive `f32` range.
    ///
    /// Dimensions and density are assumed individually valid. Their products can
    /// still overflow to infinity or underflow to zero.
    pub fn checked_mass(&self, density: f32) -> Result<f32, ShapeError> {
        let mass = self.mass(density);
        if !mass.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if mass <= 0.0 {
            return Err(ShapeError::DegenerateMass(mass));
        }

        // Inertia first: an underflowed moment also blows up its inverse.
        for diagonal in [self.inertia(mass).diagonal(), self.inverse_inertia(mass).diagonal()] {
            if diagonal.iter().any(|v| !v.is_finite()) {
                return Err(ShapeError::NonFinite);
            }
            if diagonal.iter().any(|&v| v <= 0.0) {
                return Err(ShapeError::DegenerateInertia);
            }
        }
        Ok(mass)
    }

    /// Body-space inertia tensor for the given mass.
    ///
    /// For a box: `diag(M(h²+d²), M(w²+d²), M(w²+h²)) / 12`.
    pub fn inertia(&self, mass: f32) -> Matrix3<f32> {
        let k = mass / 12.0;
        let (a, b, c) = self.principal_terms();
        Matrix3::from_diagonal(&Vector3::new(k * a, k * b, k * c))
    }

    /// Inverse of [`inertia`](Self::inertia) in closed form.
    ///
    /// Valid because the box tensor is diagonal in body space.
    pub fn inverse_inertia(&self, mass: f32) -> Matrix3<f32> {
        let k = 12.0 / mass;
        let (a, b, c) = self.principal_terms();
        Matrix3::from_diagonal(&Vector3::new(k / a, k / b, k / c))
    }

    /// Mesh vertices in body-local coordinates.
    ///
    /// Box corners: the four `-z` corners, then the four `+z` corners in the same
    /// winding. Consumers index into this order.
    pub fn vertices(&self) -> [Vector3<f32>; VERTEX_COUNT] {
        match *self {
            Shape::Box { width, height, depth } => {
                let (hw, hh, hd) = (0.5 * width, 0.5 * height, 0.5 * depth);
                [
                    Vector3::new(-hw, -hh, -hd),
                    Vector3::new(hw, -hh, -hd),
                    Vector3::new(hw, hh, -hd),
                    Vector3::new(-hw, hh, -hd),
                    Vector3::new(-hw, -hh, hd),
                    Vector3::new(hw, -hh, hd),
                    Vector3::new(hw, hh, hd),
                    Vector3::new(-hw, hh, hd),
                ]
            }
        }
    }

    /// Sums of squared extents for the three principal axes.
    fn principal_terms(&self) -> (f32, f32, f32) {
        match *self {
            Shape::Box { width, height, depth } => {
                let (w2, h2, d2) = (width * width, height * height, depth * depth);
                (h2 + d2, w2 + d2, w2 + h2)
            }
        }
    }
}

/// Physical and kinematic state of one rigid body.
#[derive(Debug, Clone)]
pub struct BodyAttributes {
    pub shape: Shape,

    // -- Constants --
    pub mass: f32,
    /// Inertia tensor in body space.
    pub inertia_body: Matrix3<f32>,
    pub inv_inertia_body: Matrix3<f32>,

    /// World-space inverse inertia tensor `R * I0⁻¹ * Rᵀ`.
    pub inv_inertia: Matrix3<f32>,

    // -- Primary state --
    pub position: Vector3<f32>,
    /// Rotation matrix, re-derived from `orientation` every step.
    pub rotation: Matrix3<f32>,
    /// Orientation quaternion. This is what the integrator advances.
    pub orientation: Quaternion,
    pub momentum: Vector3<f32>,
    pub angular_momentum: Vector3<f32>,

    // -- Derived from momenta --
    pub velocity: Vector3<f32>,
    pub angular_velocity: Vector3<f32>,

    // -- Inputs for the current step --
    pub force: Vector3<f32>,
    pub torque: Vector3<f32>,

    /// Mesh vertices in body space.
    pub vertices: [Vector3<f32>; VERTEX_COUNT],
}

impl BodyAttributes {
    /// Build a body from a shape and density, at rest at the origin.
    ///
    /// Shape and density are trusted; use [`try_new_box`](Self::try_new_box) for
    /// unvalidated input.
    pub fn from_shape(shape: Shape, density: f32) -> Self {
        let mass = shape.mass(density);
        debug_assert!(mass > 0.0, "body mass must be positive");

        let inertia_body = shape.inertia(mass);
        let inv_inertia_body = shape.inverse_inertia(mass);
        let rotation = Matrix3::identity();

        Self {
            shape,
            mass,
            inertia_body,
            inv_inertia_body,
            inv_inertia: rotation * inv_inertia_body * rotation.transpose(),
            position: Vector3::zeros(),
            rotation,
            orientation: Quaternion::identity(),
            momentum: Vector3::zeros(),
            angular_momentum: Vector3::zeros(),
            velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            force: Vector3::zeros(),
            torque: Vector3::zeros(),
            vertices: shape.vertices(),
        }
    }

    /// Create a box of the given extents and density.
    ///
    /// `v0` and `omega0` seed the derived velocities only; the momenta start at
    /// zero, so the first step re-derives both velocities from zero momentum.
    pub fn new_box(
        width: f32,
        height: f32,
        depth: f32,
        density: f32,
        v0: Vector3<f32>,
        omega0: Vector3<f32>,
    ) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0 && depth > 0.0,
            "box dimensions must be positive"
        );
        let mut body = Self::from_shape(Shape::Box { width, height, depth }, density);
        body.velocity = v0;
        body.angular_velocity = omega0;
        body
    }

    /// Checked variant of [`new_box`](Self::new_box).
    pub fn try_new_box(
        width: f32,
        height: f32,
        depth: f32,
        density: f32,
        v0: Vector3<f32>,
        omega0: Vector3<f32>,
    ) -> Result<Self, ShapeError> {
        let shape = Shape::try_box(width, height, depth)?;
        if !density.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if density <= 0.0 {
            return Err(ShapeError::NonPositiveDensity(density));
        }
        shape.checked_mass(density)?;
        let mut body = Self::from_shape(shape, density);
        body.velocity = v0;
        body.angular_velocity = omega0;
        Ok(body)
    }

    /// Builder: set initial position.
    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Builder: set initial orientation. The quaternion is normalized and the
    /// rotation matrix and world inverse inertia are re-derived from it.
    pub fn with_orientation(mut self, orientation: Quaternion) -> Self {
        self.orientation = orientation.normalized();
        self.rotation = self.orientation.to_rotation_matrix();
        self.refresh_inv_inertia();
        self
    }

    /// Builder: set initial linear momentum.
    pub fn with_momentum(mut self, momentum: Vector3<f32>) -> Self {
        self.momentum = momentum;
        self
    }

    /// Builder: set initial angular momentum.
    pub fn with_angular_momentum(mut self, angular_momentum: Vector3<f32>) -> Self {
        self.angular_momentum = angular_momentum;
        self
    }

    /// Recompute `inv_inertia = R * I0⁻¹ * Rᵀ` from the current rotation matrix.
    #[inline]
    pub fn refresh_inv_inertia(&mut self) {
        self.inv_inertia = self.rotation * self.inv_inertia_body * self.rotation.transpose();
    }

    /// Kinetic energy `½ m v² + ½ ωᵀ I ω` from the stored derived velocities.
    pub fn kinetic_energy(&self) -> f32 {
        let inertia_world = self.rotation * self.inertia_body * self.rotation.transpose();
        let w = &self.angular_velocity;
        0.5 * self.mass * self.velocity.norm_squared() + 0.5 * w.dot(&(inertia_world * w))
    }

    /// Homogeneous body-to-world transform: rotation block from `R`, translation
    /// `X` in the last column, bottom row `(0, 0, 0, 1)`.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.position);
        m
    }

    /// [`world_matrix`](Self::world_matrix) flattened column by column, the layout
    /// graphics APIs expect.
    pub fn world_matrix_column_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.world_matrix().as_slice());
        out
    }
}

impl Default for BodyAttributes {
    /// Unit cube of density 10 at rest.
    fn default() -> Self {
        Self::new_box(1.0, 1.0, 1.0, 10.0, Vector3::zeros(), Vector3::zeros())
    }
}
