//! Stability-corrected second-order dynamics.
//!
//! A [`SecondOrderTracker`] drives its output towards a moving target with a
//! damped spring response described by frequency `f`, damping ratio `z` and
//! initial response `r`:
//!
//! ```text
//! y + k1·y' + k2·y'' = x + k3·x'
//! k1 = z / (π·f)    k2 = 1 / (2π·f)²    k3 = r·z / (2π·f)
//! ```
//!
//! Plain explicit integration of this system rings or diverges once the time
//! step grows relative to the damping. Every step therefore picks one of two
//! discretizations (see [`StepCoefficients`]), which keeps the update bounded
//! for any step size.

use crate::config::DynamicsParams;
use crate::error::DynamicsError;
use crate::float::Float;
use crate::vec::Vec;
use crate::vec::{Scalar, Vec2, Vec3};

/// Velocity of the target for one update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TargetVelocity<V> {
    /// Estimate from the previous target: `(target - previous) / dt`.
    Estimate,
    /// Use a velocity the caller already knows.
    Supplied(V),
}

/// Response coefficients derived from [`DynamicsParams`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients<F: Float> {
    pub k1: F,
    pub k2: F,
    pub k3: F,
}

/// Which discretization a step used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StepBranch {
    /// `w·dt < z`: nominal `k1`, `k2` floored for the step size.
    Nominal,
    /// `w·dt >= z`: exponentially exact pair from the closed-form response.
    Implicit,
}

/// Effective `k1`, `k2` for one step of a given size.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepCoefficients<F: Float> {
    pub k1: F,
    pub k2: F,
    pub branch: StepBranch,
}

/// Second-order tracker following a target per axis with shared coefficients.
///
/// Re-tuning means building a new tracker; see [`SecondOrderTracker::retuned`].
#[derive(Clone, Debug)]
pub struct SecondOrderTracker<V: Vec> {
    params: DynamicsParams<V::Scalar>,
    coefficients: Coefficients<V::Scalar>,
    /// Angular frequency `2π·f`.
    w: V::Scalar,
    z: V::Scalar,
    /// `w·sqrt(|z² - 1|)`
    d: V::Scalar,
    previous_input: V,
    position: V,
    velocity: V,
}

impl<V: Vec> SecondOrderTracker<V> {
    /// Build a tracker resting at `initial`.
    ///
    /// Fails with [`DynamicsError::InvalidParameter`] when `f <= 0`, `z < 0`,
    /// or any parameter is not finite.
    pub fn new(params: DynamicsParams<V::Scalar>, initial: V) -> Result<Self, DynamicsError> {
        params.validate()?;

        let one = V::Scalar::one();
        let pi = V::Scalar::pi();
        let DynamicsParams { frequency: f, damping: z, response: r } = params;

        let w = V::Scalar::two() * pi * f;
        let d = w * (z * z - one).abs().sqrt();
        let coefficients = Coefficients {
            k1: z / (pi * f),
            k2: one / (w * w),
            k3: r * z / w,
        };

        tracing::debug!(
            frequency = f.to_f64(),
            damping = z.to_f64(),
            response = r.to_f64(),
            "second-order tracker created"
        );

        Ok(SecondOrderTracker {
            params,
            coefficients,
            w,
            z,
            d,
            previous_input: initial,
            position: initial,
            velocity: V::zero(),
        })
    }

    /// Replace this tracker with one using `params`, starting from the current position.
    pub fn retuned(self, params: DynamicsParams<V::Scalar>) -> Result<Self, DynamicsError> {
        SecondOrderTracker::new(params, self.position)
    }

    /// Advance by `dt` towards `target`, estimating the target velocity.
    pub fn update(&mut self, dt: V::Scalar, target: V) -> V {
        self.update_with_velocity(dt, target, TargetVelocity::Estimate)
    }

    /// Advance by `dt` towards `target`.
    ///
    /// A non-positive `dt` leaves every piece of state untouched and returns
    /// the current position.
    pub fn update_with_velocity(
        &mut self,
        dt: V::Scalar,
        target: V,
        target_velocity: TargetVelocity<V>,
    ) -> V {
        if !(dt > V::Scalar::zero()) {
            tracing::trace!(dt = dt.to_f64(), "skipping non-positive time step");
            return self.position;
        }

        let target_velocity = match target_velocity {
            TargetVelocity::Supplied(v) => v,
            TargetVelocity::Estimate => {
                let estimate = (target - self.previous_input).scale(V::Scalar::one() / dt);
                self.previous_input = target;
                estimate
            }
        };

        let step = self.step_coefficients(dt);

        self.position = self.position + self.velocity.scale(dt);
        let accel = target + target_velocity.scale(self.coefficients.k3)
            - self.position
            - self.velocity.scale(step.k1);
        self.velocity = self.velocity + accel.scale(dt / step.k2);
        self.position
    }

    /// Coefficients a step of `dt` would use. `dt` must be positive.
    pub fn step_coefficients(&self, dt: V::Scalar) -> StepCoefficients<V::Scalar> {
        let zero = V::Scalar::zero();
        let one = V::Scalar::one();
        let half = V::Scalar::half();
        let Coefficients { k1, k2, .. } = self.coefficients;

        if self.w * dt < self.z {
            let k2 = k2.max(dt * dt * half + dt * k1 * half).max(dt * k1);
            tracing::trace!(k1 = k1.to_f64(), k2 = k2.to_f64(), "nominal step");
            return StepCoefficients { k1, k2, branch: StepBranch::Nominal };
        }

        let t1 = (-self.z * self.w * dt).exp();
        let oscillation = if self.z <= one { (dt * self.d).cos() } else { (dt * self.d).cosh() };
        let alpha = V::Scalar::two() * t1 * oscillation;
        let beta = t1 * t1;
        // 1 + beta - alpha only vanishes for z = 0 at whole periods. At half
        // periods an undamped pair gives the update a repeated eigenvalue -1.
        // Keep the denominator just inside both edges.
        let margin = V::Scalar::epsilon().sqrt();
        let denom = one + beta - alpha;
        let denom = if self.z == zero {
            denom.clamp(margin, V::Scalar::from_f32(4.0) - margin)
        } else {
            denom.max(margin)
        };
        let t2 = dt / denom;
        let (k1_eff, k2_eff) = ((one - beta) * t2, dt * t2);

        tracing::trace!(k1 = k1_eff.to_f64(), k2 = k2_eff.to_f64(), "implicit step");
        StepCoefficients { k1: k1_eff, k2: k2_eff, branch: StepBranch::Implicit }
    }

    /// Current filtered output.
    pub fn position(&self) -> V { self.position }

    /// Current filtered rate of change.
    pub fn velocity(&self) -> V { self.velocity }

    /// Last target seen by a velocity-estimating update.
    pub fn previous_input(&self) -> V { self.previous_input }

    pub fn params(&self) -> &DynamicsParams<V::Scalar> { &self.params }

    pub fn coefficients(&self) -> &Coefficients<V::Scalar> { &self.coefficients }

    /// Angular frequency `2π·f`.
    pub fn angular_freq(&self) -> V::Scalar { self.w }
}

pub type Tracker1D<F> = SecondOrderTracker<Scalar<F>>;
pub type Tracker2D<F> = SecondOrderTracker<Vec2<F>>;
pub type Tracker3D<F> = SecondOrderTracker<Vec3<F>>;
