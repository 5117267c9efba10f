//! Vector types and traits shared by the trackers and the stack controller.

use crate::float::Float;
use core::ops::{Add, Sub, Neg};

/// Value a tracker can integrate: one, two or three axes, each advanced
/// independently with the same coefficients.
pub trait Vec:
    Copy
    + Clone
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + PartialEq
    + Default
    + core::fmt::Debug
{
    type Scalar: Float;

    fn zero() -> Self;

    fn splat(value: Self::Scalar) -> Self;

    fn dot(self, other: Self) -> Self::Scalar;

    fn length_sq(self) -> Self::Scalar {
        self.dot(self)
    }

    fn length(self) -> Self::Scalar {
        self.length_sq().sqrt()
    }

    /// Unit-length copy, or zero for a degenerate vector.
    fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(Self::Scalar::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(Self::Scalar::one() / len)
        }
    }

    fn scale(self, s: Self::Scalar) -> Self;

    fn distance(self, other: Self) -> Self::Scalar {
        (self - other).length()
    }

    fn lerp(self, other: Self, t: Self::Scalar) -> Self {
        self + (other - self).scale(t)
    }
}

/// Component-wise `Add`, `Sub`, `Neg` and the [`Vec`] impl for a vector type.
macro_rules! componentwise {
    ($ty:ident { $($c:tt),+ }) => {
        impl<F: Float> Add for $ty<F> {
            type Output = Self;
            fn add(self, rhs: Self) -> Self { $ty { $($c: self.$c + rhs.$c),+ } }
        }

        impl<F: Float> Sub for $ty<F> {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self { $ty { $($c: self.$c - rhs.$c),+ } }
        }

        impl<F: Float> Neg for $ty<F> {
            type Output = Self;
            fn neg(self) -> Self { $ty { $($c: -self.$c),+ } }
        }

        impl<F: Float> Vec for $ty<F> {
            type Scalar = F;
            fn zero() -> Self { $ty { $($c: F::zero()),+ } }
            fn splat(value: F) -> Self { $ty { $($c: value),+ } }
            fn dot(self, other: Self) -> F { F::zero() $(+ self.$c * other.$c)+ }
            fn scale(self, s: F) -> Self { $ty { $($c: self.$c * s),+ } }
        }
    };
}

/// One-axis value, for tracking a single quantity (zoom, a slider, one bend axis).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Scalar<F: Float>(pub F);

componentwise!(Scalar { 0 });

/// Planar point or offset.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }
}

componentwise!(Vec2 { x, y });

/// Spatial point or offset. Stack offsets use `x` for the lateral axis, `y`
/// for the stack axis and `z` for the axial (forward) axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Unsigned angle to `other`, in degrees. Zero if either vector is degenerate.
    pub fn angle_between(self, other: Self) -> F {
        let denom = (self.length_sq() * other.length_sq()).sqrt();
        if denom.is_near_zero(F::from_f32(1e-15)) {
            return F::zero();
        }
        let cos = (self.dot(other) / denom).clamp(-F::one(), F::one());
        cos.acos().to_degrees()
    }

    /// +Y
    pub fn up() -> Self { Vec3 { x: F::zero(), y: F::one(), z: F::zero() } }

    /// +X
    pub fn right() -> Self { Vec3 { x: F::one(), y: F::zero(), z: F::zero() } }

    /// +Z
    pub fn forward() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::one() } }
}

componentwise!(Vec3 { x, y, z });
