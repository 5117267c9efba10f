//! Scalar abstraction so every tracker and stack works in `f32` or `f64`.

use core::cmp::PartialOrd;
use core::ops::{Add, Sub, Mul, Div, Neg};

/// Floating-point operations the dynamics need.
///
/// Implemented for `f32` and `f64`. All transcendental functions go through
/// `libm` so results are identical on every target, including `no_std`.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + core::fmt::Debug
{
    /// `0`
    fn zero() -> Self;
    /// `1`
    fn one() -> Self;
    /// `0.5`, used for half heights and the neutral lateral drive.
    fn half() -> Self;
    /// `2`
    fn two() -> Self;
    /// `π`
    fn pi() -> Self;
    /// Machine epsilon of the underlying type.
    fn epsilon() -> Self;
    /// Square root through libm.
    fn sqrt(self) -> Self;
    /// Cosine of an angle in radians.
    fn cos(self) -> Self;
    /// Hyperbolic cosine, used by overdamped implicit steps.
    fn cosh(self) -> Self;
    /// Arc cosine, in radians.
    fn acos(self) -> Self;
    /// `e^self`
    fn exp(self) -> Self;
    /// Absolute value.
    fn abs(self) -> Self;
    /// Largest integer value not above `self`.
    fn floor(self) -> Self;
    /// Neither infinite nor NaN.
    fn is_finite(self) -> bool;
    /// Smaller of the two; `other` when they compare equal or either is NaN.
    fn min(self, other: Self) -> Self;
    /// Larger of the two; `other` when they compare equal or either is NaN.
    fn max(self, other: Self) -> Self;
    /// Convert from f32 (for constants and configuration).
    fn from_f32(v: f32) -> Self;
    /// Convert from f64, rounding for `f32`. Use for counts and indices,
    /// which `f32` cannot hold exactly past 2^24.
    fn from_f64(v: f64) -> Self;
    /// Convert to f64 (for logging).
    fn to_f64(self) -> f64;

    /// Clamp to `[min, max]`.
    fn clamp(self, min: Self, max: Self) -> Self {
        self.max(min).min(max)
    }

    /// Clamp self to [0, 1].
    fn clamp01(self) -> Self {
        self.clamp(Self::zero(), Self::one())
    }

    /// `self + (other - self) * t`, unclamped.
    fn lerp(self, other: Self, t: Self) -> Self {
        self + (other - self) * t
    }

    /// Where `value` sits between `a` and `b`, clamped to [0, 1].
    ///
    /// Returns 0 when the range is empty.
    fn inverse_lerp(a: Self, b: Self, value: Self) -> Self {
        if a == b {
            Self::zero()
        } else {
            ((value - a) / (b - a)).clamp01()
        }
    }

    /// Step from `self` towards `target` by at most `max_delta`, never past it.
    fn move_towards(self, target: Self, max_delta: Self) -> Self {
        let delta = target - self;
        if delta.abs() <= max_delta {
            target
        } else if delta > Self::zero() {
            self + max_delta
        } else {
            self - max_delta
        }
    }

    /// Triangle wave bouncing between 0 and `length`.
    fn ping_pong(self, length: Self) -> Self {
        if length <= Self::zero() {
            return Self::zero();
        }
        let period = length * Self::two();
        let t = (self - (self / period).floor() * period).clamp(Self::zero(), period);
        length - (t - length).abs()
    }

    fn to_degrees(self) -> Self {
        self * Self::from_f32(180.0) / Self::pi()
    }

    /// `|self| < epsilon`
    fn is_near_zero(self, epsilon: Self) -> bool {
        self.abs() < epsilon
    }
}

impl Float for f32 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn half() -> Self { 0.5 }
    fn two() -> Self { 2.0 }
    fn pi() -> Self { core::f32::consts::PI }
    fn epsilon() -> Self { f32::EPSILON }
    fn sqrt(self) -> Self { libm::sqrtf(self) }
    fn cos(self) -> Self { libm::cosf(self) }
    fn cosh(self) -> Self { libm::coshf(self) }
    fn acos(self) -> Self { libm::acosf(self) }
    fn exp(self) -> Self { libm::expf(self) }
    fn abs(self) -> Self { libm::fabsf(self) }
    fn floor(self) -> Self { libm::floorf(self) }
    fn is_finite(self) -> bool { f32::is_finite(self) }
    fn min(self, other: Self) -> Self { if self < other { self } else { other } }
    fn max(self, other: Self) -> Self { if self > other { self } else { other } }
    fn from_f32(v: f32) -> Self { v }
    fn from_f64(v: f64) -> Self { v as f32 }
    fn to_f64(self) -> f64 { self as f64 }
}

impl Float for f64 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn half() -> Self { 0.5 }
    fn two() -> Self { 2.0 }
    fn pi() -> Self { core::f64::consts::PI }
    fn epsilon() -> Self { f64::EPSILON }
    fn sqrt(self) -> Self { libm::sqrt(self) }
    fn cos(self) -> Self { libm::cos(self) }
    fn cosh(self) -> Self { libm::cosh(self) }
    fn acos(self) -> Self { libm::acos(self) }
    fn exp(self) -> Self { libm::exp(self) }
    fn abs(self) -> Self { libm::fabs(self) }
    fn floor(self) -> Self { libm::floor(self) }
    fn is_finite(self) -> bool { f64::is_finite(self) }
    fn min(self, other: Self) -> Self { if self < other { self } else { other } }
    fn max(self, other: Self) -> Self { if self > other { self } else { other } }
    fn from_f32(v: f32) -> Self { v as f64 }
    fn from_f64(v: f64) -> Self { v }
    fn to_f64(self) -> f64 { self }
}
