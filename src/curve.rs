//! Response curves mapping a normalized input in [0, 1] to a scalar.
//!
//! The stack controller only needs `evaluate`; authoring tools can plug in
//! whatever representation they use. Callers clamp their own input before
//! evaluating, so implementations may assume `t` is already in range.

use crate::float::Float;
use alloc::vec::Vec as AllocVec;

/// A designer-authored response curve.
pub trait Curve<F: Float> {
    fn evaluate(&self, t: F) -> F;
}

impl<F: Float, C: Fn(F) -> F> Curve<F> for C {
    fn evaluate(&self, t: F) -> F {
        self(t)
    }
}

/// Same value everywhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantCurve<F: Float>(pub F);

impl<F: Float> Curve<F> for ConstantCurve<F> {
    fn evaluate(&self, _t: F) -> F {
        self.0
    }
}

/// Identity curve, `t -> t`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LinearCurve;

impl<F: Float> Curve<F> for LinearCurve {
    fn evaluate(&self, t: F) -> F {
        t
    }
}

/// A single `(time, value)` key.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Key<F: Float> {
    pub time: F,
    pub value: F,
}

impl<F: Float> Key<F> {
    pub fn new(time: F, value: F) -> Self {
        Key { time, value }
    }
}

/// Piecewise-linear curve through keys sorted by time.
///
/// Holds the first/last value outside the key range and returns
/// `default_value` when there are no keys.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyframeCurve<F: Float> {
    keys: AllocVec<Key<F>>,
    default_value: F,
}

impl<F: Float> KeyframeCurve<F> {
    /// Build from keys in any order; they are sorted by time.
    pub fn new(mut keys: AllocVec<Key<F>>) -> Self {
        keys.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(core::cmp::Ordering::Equal));
        KeyframeCurve { keys, default_value: F::zero() }
    }

    /// Straight line from `(0, start)` to `(1, end)`.
    pub fn linear(start: F, end: F) -> Self {
        Self::new(alloc::vec![Key::new(F::zero(), start), Key::new(F::one(), end)])
    }

    pub fn with_default(mut self, default_value: F) -> Self {
        self.default_value = default_value;
        self
    }

    pub fn keys(&self) -> &[Key<F>] {
        &self.keys
    }
}

impl<F: Float> Curve<F> for KeyframeCurve<F> {
    fn evaluate(&self, t: F) -> F {
        let keys = &self.keys;
        let (first, last) = match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return self.default_value,
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        let i = keys.partition_point(|k| k.time <= t).saturating_sub(1);
        let (a, b) = (keys[i], keys[i + 1]);
        let span = b.time - a.time;
        if span <= F::zero() {
            return b.value;
        }
        a.value.lerp(b.value, (t - a.time) / span)
    }
}
