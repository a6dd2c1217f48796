//! Explicit time-stepping integrator for a single rigid body.
//!
//! Each [`RigidSolver::step`] advances one body by a fixed `dt` using forward
//! Euler on the momenta, then derives position and orientation from the
//! velocities computed *before* the momentum update. Orientation is integrated as
//! a quaternion and renormalized every step.
//!
//! # Example
//! ```
//! use embedded_rigidbody::body::BodyAttributes;
//! use embedded_rigidbody::physics::RigidSolver;
//! use nalgebra::Vector3;
//!
//! let mut body = BodyAttributes::default();
//! let mut solver = RigidSolver::new(Vector3::new(0.0, -9.8, 0.0));
//!
//! for _ in 0..100 {
//!     solver.step(&mut body, 0.01);
//! }
//! assert_eq!(solver.step_count(), 100);
//! assert!(body.position.y < 0.0);
//! ```

use log::trace;
use nalgebra::Vector3;

use crate::body::BodyAttributes;
use crate::force::{ForceModel, Gravity, ScriptedImpulse};
use crate::quaternion::Quaternion;

/// How the world-space inverse inertia tensor is maintained across steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InertiaUpdate {
    /// Keep the tensor derived at construction for the whole run.
    #[default]
    Fixed,
    /// Re-derive `R * I0⁻¹ * Rᵀ` after every orientation update.
    FromOrientation,
}

/// Integrator settings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolverConfig {
    pub inertia_update: InertiaUpdate,
}

impl SolverConfig {
    /// Builder: choose how the world inverse inertia is maintained.
    pub fn with_inertia_update(mut self, inertia_update: InertiaUpdate) -> Self {
        self.inertia_update = inertia_update;
        self
    }
}

/// Default force model: scaled gravity plus the scripted impulse on the second step.
pub type KickedGravity = ScriptedImpulse<Gravity>;

/// Fixed-step rigid body integrator.
///
/// The solver does not hold the body; it is passed to every [`step`](Self::step).
/// Use [`BoundSolver`] to tie a solver to one body for a scope.
#[derive(Debug, Clone)]
pub struct RigidSolver<F = KickedGravity> {
    force_model: F,
    config: SolverConfig,
    step: usize,
    sim_t: f32,
}

impl RigidSolver<KickedGravity> {
    /// Solver with gravity `g` (scaled by [`GRAVITY_SCALE`](crate::force::GRAVITY_SCALE))
    /// and the default scripted impulse.
    pub fn new(g: Vector3<f32>) -> Self {
        Self::with_force_model(ScriptedImpulse::new(Gravity::new(g)))
    }

    /// Builder: replace the gravity vector, keeping the scripted impulse.
    pub fn with_gravity(mut self, g: Vector3<f32>) -> Self {
        self.force_model.base.acceleration = g;
        self
    }
}

impl Default for RigidSolver<KickedGravity> {
    fn default() -> Self {
        Self::new(Vector3::zeros())
    }
}

impl<F: ForceModel> RigidSolver<F> {
    pub fn with_force_model(force_model: F) -> Self {
        Self {
            force_model,
            config: SolverConfig::default(),
            step: 0,
            sim_t: 0.0,
        }
    }

    /// Builder: apply a configuration.
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Builder: choose how the world inverse inertia is maintained.
    pub fn with_inertia_update(mut self, inertia_update: InertiaUpdate) -> Self {
        self.config.inertia_update = inertia_update;
        self
    }

    /// Reset the step counter and simulated time to zero.
    pub fn init(&mut self) {
        self.step = 0;
        self.sim_t = 0.0;
    }

    /// Number of steps taken since construction or the last [`init`](Self::init).
    pub fn step_count(&self) -> usize {
        self.step
    }

    /// Simulated time accumulated since construction or the last [`init`](Self::init).
    pub fn sim_time(&self) -> f32 {
        self.sim_t
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn force_model(&self) -> &F {
        &self.force_model
    }

    /// Advance `body` by `dt` seconds.
    ///
    /// Order matters: the force is evaluated from the incoming state, and the
    /// velocities used for position and orientation come from the momenta as
    /// they were before this step's force is applied.
    pub fn step(&mut self, body: &mut BodyAttributes, dt: f32) {
        debug_assert!(dt > 0.0, "time step must be positive");
        trace!("t={} (dt={})", self.sim_t, dt);

        let wrench = self.force_model.evaluate(self.step, body);
        body.force = wrench.force;
        body.torque = wrench.torque;

        body.velocity = body.momentum / body.mass;
        body.angular_velocity = body.inv_inertia * body.angular_momentum;

        body.momentum += body.force * dt;
        body.angular_momentum += body.torque * dt;

        body.position += body.velocity * dt;

        let spin = Quaternion::from_pure(body.angular_velocity) * body.orientation;
        body.orientation = body.orientation + spin * dt;
        body.orientation.normalize();
        body.rotation = body.orientation.to_rotation_matrix();

        if self.config.inertia_update == InertiaUpdate::FromOrientation {
            body.refresh_inv_inertia();
        }

        self.step += 1;
        self.sim_t += dt;
    }
}

/// A solver tied to one caller-owned body for the lifetime `'a`.
///
/// The borrow keeps the body alive and exclusive for as long as it is bound.
#[derive(Debug)]
pub struct BoundSolver<'a, F = KickedGravity> {
    solver: RigidSolver<F>,
    body: &'a mut BodyAttributes,
}

impl<'a, F: ForceModel> BoundSolver<'a, F> {
    pub fn new(solver: RigidSolver<F>, body: &'a mut BodyAttributes) -> Self {
        Self { solver, body }
    }

    /// Rebind to `body` and reset the step counter and simulated time.
    ///
    /// Returns the previously bound body.
    pub fn init(&mut self, body: &'a mut BodyAttributes) -> &'a mut BodyAttributes {
        self.solver.init();
        core::mem::replace(&mut self.body, body)
    }

    /// Advance the bound body by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.solver.step(&mut *self.body, dt);
    }

    pub fn body(&self) -> &BodyAttributes {
        &*self.body
    }

    pub fn body_mut(&mut self) -> &mut BodyAttributes {
        &mut *self.body
    }

    pub fn solver(&self) -> &RigidSolver<F> {
        &self.solver
    }

    /// Unbind, returning the solver and the body borrow.
    pub fn release(self) -> (RigidSolver<F>, &'a mut BodyAttributes) {
        (self.solver, self.body)
    }
}
