//! Tuning types for trackers and stack controllers.

use crate::error::{DynamicsError, InvalidParameter};
use crate::float::Float;

/// Physical tuning of a second-order tracker.
///
/// - `frequency` (Hz): how fast the output responds. Must be positive.
/// - `damping`: `< 1` overshoots, `1` is critically damped, `> 1` is sluggish.
/// - `response`: initial reaction. `0` eases in, `> 1` overshoots the first
///   move, `< 0` anticipates by moving the wrong way first.
///
/// ```
/// use sodyn::config::DynamicsParams;
///
/// let params: DynamicsParams<f32> = DynamicsParams::new()
///     .with_frequency(2.5)
///     .with_damping(0.4)
///     .with_response(1.5);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicsParams<F: Float> {
    /// Natural frequency in Hz. Default: 1.
    pub frequency: F,
    /// Damping ratio. Default: 1.
    pub damping: F,
    /// Initial response coefficient. Default: 0.
    pub response: F,
}

impl<F: Float> DynamicsParams<F> {
    /// Create params with default values.
    pub fn new() -> Self {
        DynamicsParams {
            frequency: F::one(),
            damping: F::one(),
            response: F::zero(),
        }
    }

    /// Shorthand for `(f, z, r)`.
    pub fn fzr(frequency: F, damping: F, response: F) -> Self {
        DynamicsParams { frequency, damping, response }
    }

    /// Set the natural frequency.
    pub fn with_frequency(mut self, frequency: F) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the damping ratio.
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    /// Set the initial response coefficient.
    pub fn with_response(mut self, response: F) -> Self {
        self.response = response;
        self
    }

    /// Reject parameters that would make coefficient derivation degenerate.
    pub fn validate(&self) -> Result<(), DynamicsError> {
        if !self.frequency.is_finite() || self.frequency <= F::zero() {
            return Err(InvalidParameter::Frequency.into());
        }
        if !self.damping.is_finite() || self.damping < F::zero() {
            return Err(InvalidParameter::DampingRatio.into());
        }
        if !self.response.is_finite() {
            return Err(InvalidParameter::Response.into());
        }
        Ok(())
    }
}

impl<F: Float> Default for DynamicsParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Asymmetric rate limit for the velocity magnitude that drives bending.
///
/// The magnitude moves towards the measured value at `bending` units/s while
/// rising and `stabilization` units/s while falling.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BendSpeed<F: Float> {
    pub bending: F,
    pub stabilization: F,
}

impl<F: Float> BendSpeed<F> {
    pub fn new(bending: F, stabilization: F) -> Self {
        BendSpeed { bending, stabilization }
    }

    /// Rate to use when moving from `current` towards `target`.
    pub fn rate_towards(&self, current: F, target: F) -> F {
        if current < target { self.bending } else { self.stabilization }
    }
}

/// Periodic jitter folded into the axial drive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShakeConfig<F: Float> {
    /// Peak-to-peak amplitude of the jitter. Default: 0.15.
    pub power: F,
    /// Oscillation rate multiplier. Default: 1.
    pub frequency: F,
}

impl<F: Float> Default for ShakeConfig<F> {
    fn default() -> Self {
        ShakeConfig {
            power: F::from_f32(0.15),
            frequency: F::one(),
        }
    }
}

/// Lateral bending driven by the root's angular velocity.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideBendConfig<F: Float> {
    /// Angular velocity (deg/s) that saturates the lateral drive. Default: 360.
    pub max_angular_velocity: F,
    /// Apply the [`BendSpeed`] rate limit to the angular velocity too. Default: false.
    pub rate_limited: bool,
}

impl<F: Float> Default for SideBendConfig<F> {
    fn default() -> Self {
        SideBendConfig {
            max_angular_velocity: F::from_f32(360.0),
            rate_limited: false,
        }
    }
}

/// Configuration for a [`StackBendController`](crate::stack::StackBendController).
///
/// Optional features default to `None`, which disables them entirely.
///
/// # Builder Pattern
/// ```
/// use sodyn::config::{BendSpeed, DynamicsParams, ShakeConfig, StackConfig};
///
/// let config: StackConfig<f32> = StackConfig::new()
///     .with_bending_force(0.3)
///     .with_items_spacing(0.05)
///     .with_max_velocity(4.0)
///     .with_bend_speed(BendSpeed::new(12.0, 4.0))
///     .with_shake(ShakeConfig::default())
///     .with_dynamics(DynamicsParams::fzr(2.0, 0.3, 0.0));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StackConfig<F: Float> {
    /// Fraction of the stack height used as the maximum offset, in [0, 1]. Default: 0.
    pub bending_force: F,
    /// Gap added after every item. Default: 0.
    pub items_spacing: F,
    /// Velocity magnitude that saturates the axial drive. Default: 2.
    pub max_velocity: F,
    /// Asymmetric rate limit on the velocity magnitude. Default: off.
    pub bend_speed: Option<BendSpeed<F>>,
    /// Jitter on the axial drive. Default: off.
    pub shake: Option<ShakeConfig<F>>,
    /// Lateral bending from angular velocity. Default: off.
    pub side_bending: Option<SideBendConfig<F>>,
    /// Tuning shared by every item tracker.
    pub dynamics: DynamicsParams<F>,
}

impl<F: Float> StackConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        StackConfig {
            bending_force: F::zero(),
            items_spacing: F::zero(),
            max_velocity: F::two(),
            bend_speed: None,
            shake: None,
            side_bending: None,
            dynamics: DynamicsParams::new(),
        }
    }

    pub fn with_bending_force(mut self, bending_force: F) -> Self {
        self.bending_force = bending_force;
        self
    }

    pub fn with_items_spacing(mut self, items_spacing: F) -> Self {
        self.items_spacing = items_spacing;
        self
    }

    pub fn with_max_velocity(mut self, max_velocity: F) -> Self {
        self.max_velocity = max_velocity;
        self
    }

    pub fn with_bend_speed(mut self, bend_speed: BendSpeed<F>) -> Self {
        self.bend_speed = Some(bend_speed);
        self
    }

    pub fn with_shake(mut self, shake: ShakeConfig<F>) -> Self {
        self.shake = Some(shake);
        self
    }

    pub fn with_side_bending(mut self, side_bending: SideBendConfig<F>) -> Self {
        self.side_bending = Some(side_bending);
        self
    }

    pub fn with_dynamics(mut self, dynamics: DynamicsParams<F>) -> Self {
        self.dynamics = dynamics;
        self
    }

    /// Check every knob, including the tracker tuning.
    pub fn validate(&self) -> Result<(), DynamicsError> {
        if !(self.bending_force >= F::zero() && self.bending_force <= F::one()) {
            return Err(InvalidParameter::BendingForce.into());
        }
        if !self.items_spacing.is_finite() || self.items_spacing < F::zero() {
            return Err(InvalidParameter::ItemsSpacing.into());
        }
        if !self.max_velocity.is_finite() || self.max_velocity <= F::zero() {
            return Err(InvalidParameter::MaxVelocity.into());
        }
        if let Some(speed) = &self.bend_speed {
            let valid = |rate: F| rate.is_finite() && rate >= F::zero();
            if !(valid(speed.bending) && valid(speed.stabilization)) {
                return Err(InvalidParameter::Rate.into());
            }
        }
        if let Some(shake) = &self.shake {
            let valid = |v: F| v.is_finite() && v >= F::zero();
            if !(valid(shake.power) && valid(shake.frequency)) {
                return Err(InvalidParameter::Shake.into());
            }
        }
        if let Some(side) = &self.side_bending {
            if !side.max_angular_velocity.is_finite() || side.max_angular_velocity <= F::zero() {
                return Err(InvalidParameter::MaxAngularVelocity.into());
            }
        }
        self.dynamics.validate()
    }
}

impl<F: Float> Default for StackConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
