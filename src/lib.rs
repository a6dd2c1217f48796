//! Single rigid body stepping kernel for `no_std` targets.
//!
//! Advances one free rigid body under scaled gravity and a scripted impulse with
//! explicit time stepping. Orientation is integrated as a quaternion and converted
//! to a rotation matrix each step; momenta are integrated and velocities derived
//! from them.
//!
//! # Example
//! ```
//! use embedded_rigidbody::{BodyAttributes, RigidSolver};
//! use nalgebra::Vector3;
//!
//! let mut body = BodyAttributes::new_box(1.0, 1.0, 1.0, 10.0, Vector3::zeros(), Vector3::zeros());
//! let mut solver = RigidSolver::new(Vector3::new(0.0, -9.8, 0.0));
//!
//! for _ in 0..10 {
//!     solver.step(&mut body, 0.016);
//! }
//!
//! // Column-major model matrix for a renderer.
//! let model: [f32; 16] = body.world_matrix_column_major();
//! assert_eq!(model[15], 1.0);
//! ```
#![no_std]

pub mod body;
pub mod error;
pub mod force;
pub mod mesh;
pub mod physics;
pub mod quaternion;

pub use body::{BodyAttributes, Shape};
pub use error::ShapeError;
pub use force::{ForceModel, Gravity, NoForce, ScriptedImpulse, Wrench};
pub use physics::{BoundSolver, InertiaUpdate, RigidSolver, SolverConfig};
pub use quaternion::Quaternion;
