//! Turning root motion into normalized drive signals.
//!
//! The axial drive `u` grows with the root's speed; the lateral drive `v`
//! follows the root's turn rate, with `0.5` meaning "no turn".

use crate::config::StackConfig;
use crate::curve::Curve;
use crate::float::Float;
use crate::vec::{Vec, Vec3};

/// One tick of root motion.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RootSample<F: Float> {
    pub position: Vec3<F>,
    /// Root forward axis in world space.
    pub forward: Vec3<F>,
    /// Root right axis in world space.
    pub right: Vec3<F>,
}

impl<F: Float> RootSample<F> {
    /// Sample with the default frame: forward `+Z`, right `+X`.
    pub fn at(position: Vec3<F>) -> Self {
        RootSample {
            position,
            forward: Vec3::forward(),
            right: Vec3::right(),
        }
    }

    pub fn with_orientation(mut self, forward: Vec3<F>, right: Vec3<F>) -> Self {
        self.forward = forward;
        self.right = right;
        self
    }
}

/// Drive values for one tick, both in [0, 1] before jitter.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Drive<F: Float> {
    /// Axial drive from linear velocity (jitter included).
    pub axial: F,
    /// Lateral drive from angular velocity.
    pub lateral: F,
}

/// Root motion tracked across ticks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MotionState<F: Float> {
    previous_position: Vec3<F>,
    previous_forward: Vec3<F>,
    velocity: Vec3<F>,
    velocity_magnitude: F,
    angular_velocity: F,
    elapsed: F,
}

impl<F: Float> MotionState<F> {
    pub fn new(root: RootSample<F>) -> Self {
        MotionState {
            previous_position: root.position,
            previous_forward: root.forward,
            velocity: Vec3::zero(),
            velocity_magnitude: F::zero(),
            angular_velocity: F::zero(),
            elapsed: F::zero(),
        }
    }

    /// Fold in a new root sample taken `dt` after the previous one.
    ///
    /// A non-positive `dt` keeps the previous velocities; the sample still
    /// becomes the new reference.
    pub fn observe(&mut self, dt: F, sample: RootSample<F>, config: &StackConfig<F>) {
        if dt > F::zero() {
            self.elapsed = self.elapsed + dt;
            self.velocity = (sample.position - self.previous_position).scale(F::one() / dt);

            let raw = self.velocity.length();
            self.velocity_magnitude = match &config.bend_speed {
                Some(speed) => {
                    let rate = speed.rate_towards(self.velocity_magnitude, raw);
                    self.velocity_magnitude.move_towards(raw, rate * dt)
                }
                None => raw,
            };

            if let Some(side) = &config.side_bending {
                let angle = sample.forward.angle_between(self.previous_forward);
                let raw = if self.previous_forward.dot(sample.right) > F::zero() {
                    angle / dt
                } else {
                    -(angle / dt)
                };
                self.angular_velocity = match (&config.bend_speed, side.rate_limited) {
                    (Some(speed), true) => {
                        let rate = speed.rate_towards(self.angular_velocity.abs(), raw.abs());
                        self.angular_velocity.move_towards(raw, rate * dt)
                    }
                    _ => raw,
                };
            }
        }

        self.previous_position = sample.position;
        self.previous_forward = sample.forward;
    }

    /// Axial drive `u`, with jitter folded in when shaking is enabled.
    pub fn axial_drive<S: Curve<F>>(&self, config: &StackConfig<F>, shake_curve: &S) -> F {
        let u = F::inverse_lerp(F::zero(), config.max_velocity, self.velocity_magnitude);
        match &config.shake {
            Some(shake) => {
                let wave = (self.elapsed * shake.frequency).ping_pong(shake.power);
                u + (wave - shake.power * F::half()) * shake_curve.evaluate(u)
            }
            None => u,
        }
    }

    /// Lateral drive `v`; `0.5` when side bending is disabled.
    pub fn lateral_drive(&self, config: &StackConfig<F>) -> F {
        match &config.side_bending {
            Some(side) => F::inverse_lerp(
                -side.max_angular_velocity,
                side.max_angular_velocity,
                self.angular_velocity,
            ),
            None => F::half(),
        }
    }

    pub fn drive<S: Curve<F>>(&self, config: &StackConfig<F>, shake_curve: &S) -> Drive<F> {
        Drive {
            axial: self.axial_drive(config, shake_curve),
            lateral: self.lateral_drive(config),
        }
    }

    /// Latest raw root velocity.
    pub fn velocity(&self) -> Vec3<F> { self.velocity }

    /// Velocity magnitude driving the bend, after rate limiting.
    pub fn velocity_magnitude(&self) -> F { self.velocity_magnitude }

    /// Signed turn rate in degrees per second.
    ///
    /// Positive when the previous forward axis lies on the root's current
    /// right side, i.e. the root turned left.
    pub fn angular_velocity(&self) -> F { self.angular_velocity }

    /// Total time observed, used as the jitter clock.
    pub fn elapsed(&self) -> F { self.elapsed }
}
