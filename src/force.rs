//! Force models evaluated once per step.
//!
//! A [`ForceModel`] maps the current step index and body state to the force and
//! torque applied during that step. Nothing accumulates between steps: the
//! integrator overwrites the body's force and torque with the model's output.

use core::ops::Add;

use log::debug;
use nalgebra::Vector3;

use crate::body::BodyAttributes;

/// Fixed factor applied to the configured gravity vector.
pub const GRAVITY_SCALE: f32 = 0.1;

/// Step index on which the default scripted impulse fires (the second step).
pub const KICK_STEP: usize = 1;

/// Extra force of the default scripted impulse: `(1.0, 7.0, 2.4) / 5`.
pub const KICK_FORCE: Vector3<f32> = Vector3::new(1.0 / 5.0, 7.0 / 5.0, 2.4 / 5.0);

/// Extra torque of the default scripted impulse.
pub const KICK_TORQUE: Vector3<f32> = Vector3::new(0.005, 0.005, 0.0);

/// Force and torque acting on a body during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wrench {
    pub force: Vector3<f32>,
    pub torque: Vector3<f32>,
}

impl Wrench {
    pub fn new(force: Vector3<f32>, torque: Vector3<f32>) -> Self {
        Self { force, torque }
    }

    pub fn zero() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }
}

impl Default for Wrench {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Wrench {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.force + rhs.force, self.torque + rhs.torque)
    }
}

/// Source of the force and torque for a step.
pub trait ForceModel {
    /// Wrench for step index `step` (0 on the first call after init), given the
    /// body state before the step mutates it.
    fn evaluate(&self, step: usize, body: &BodyAttributes) -> Wrench;
}

impl<F> ForceModel for F
where
    F: Fn(usize, &BodyAttributes) -> Wrench,
{
    fn evaluate(&self, step: usize, body: &BodyAttributes) -> Wrench {
        self(step, body)
    }
}

/// No force and no torque.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoForce;

impl ForceModel for NoForce {
    fn evaluate(&self, _step: usize, _body: &BodyAttributes) -> Wrench {
        Wrench::zero()
    }
}

/// Constant force `acceleration * scale`, no torque.
///
/// The force is not multiplied by the body mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gravity {
    pub acceleration: Vector3<f32>,
    pub scale: f32,
}

impl Gravity {
    /// Gravity with the default [`GRAVITY_SCALE`].
    pub fn new(acceleration: Vector3<f32>) -> Self {
        Self { acceleration, scale: GRAVITY_SCALE }
    }

    /// Builder: override the scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }
}

impl Default for Gravity {
    fn default() -> Self {
        Self::new(Vector3::zeros())
    }
}

impl ForceModel for Gravity {
    fn evaluate(&self, _step: usize, _body: &BodyAttributes) -> Wrench {
        Wrench::new(self.acceleration * self.scale, Vector3::zeros())
    }
}

/// Adds a one-off wrench on top of a base model at a single step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedImpulse<M> {
    pub base: M,
    pub step: usize,
    pub force: Vector3<f32>,
    pub torque: Vector3<f32>,
}

impl<M: ForceModel> ScriptedImpulse<M> {
    /// Wrap `base` with the default kick ([`KICK_FORCE`], [`KICK_TORQUE`] at [`KICK_STEP`]).
    pub fn new(base: M) -> Self {
        Self { base, step: KICK_STEP, force: KICK_FORCE, torque: KICK_TORQUE }
    }

    /// Builder: fire on a different step index.
    pub fn at_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    /// Builder: replace the extra wrench.
    pub fn with_wrench(mut self, force: Vector3<f32>, torque: Vector3<f32>) -> Self {
        self.force = force;
        self.torque = torque;
        self
    }
}

impl<M: ForceModel> ForceModel for ScriptedImpulse<M> {
    fn evaluate(&self, step: usize, body: &BodyAttributes) -> Wrench {
        let base = self.base.evaluate(step, body);
        if step != self.step {
            return base;
        }
        debug!("scripted impulse at step {}", step);
        base + Wrench::new(self.force, self.torque)
    }
}
