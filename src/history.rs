//! Read-only diagnostics: bounded sample history and step-response series.
//!
//! Nothing here draws anything. A graphing layer reads the samples and
//! bounds and renders them however it likes.

use crate::config::DynamicsParams;
use crate::error::{DynamicsError, InvalidParameter};
use crate::float::Float;
use crate::observer::TickObserver;
use crate::tracker::Tracker2D;
use crate::vec::{Vec2, Vec3};
use alloc::vec::Vec as AllocVec;

/// Fixed-capacity buffer that overwrites its oldest sample when full.
#[derive(Clone, Debug)]
pub struct SampleBuffer<T> {
    data: AllocVec<Option<T>>,
    read: usize,
    len: usize,
}

impl<T: Copy> SampleBuffer<T> {
    pub fn new(capacity: usize) -> Result<Self, DynamicsError> {
        if capacity == 0 {
            return Err(InvalidParameter::Capacity.into());
        }
        Ok(SampleBuffer {
            data: alloc::vec![None; capacity],
            read: 0,
            len: 0,
        })
    }

    /// Append a sample, dropping the oldest one when full.
    pub fn push(&mut self, sample: T) {
        let capacity = self.data.len();
        let write = (self.read + self.len) % capacity;
        self.data[write] = Some(sample);
        if self.len == capacity {
            self.read = (self.read + 1) % capacity;
        } else {
            self.len += 1;
        }
    }

    /// Remove and return the oldest sample.
    pub fn pop_oldest(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let sample = self.data[self.read].take();
        self.read = (self.read + 1) % self.data.len();
        self.len -= 1;
        sample
    }

    /// Sample `index` positions after the oldest one.
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        self.data[(self.read + index) % self.data.len()]
    }

    pub fn latest(&self) -> Option<T> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len).filter_map(move |i| self.get(i))
    }

    pub fn clear(&mut self) {
        self.data.iter_mut().for_each(|slot| *slot = None);
        self.read = 0;
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

/// Inclusive `[min, max]` range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds<F: Float> {
    pub min: F,
    pub max: F,
}

impl<F: Float> Bounds<F> {
    fn point(v: F) -> Self {
        Bounds { min: v, max: v }
    }

    fn extend(bounds: Option<Self>, v: F) -> Self {
        match bounds {
            Some(b) => Bounds { min: b.min.min(v), max: b.max.max(v) },
            None => Bounds::point(v),
        }
    }

    /// Map `v` from this range onto `[lo, hi]`. Degenerate ranges map to `lo`.
    pub fn remap(&self, v: F, lo: F, hi: F) -> F {
        let span = self.max - self.min;
        if span.is_near_zero(F::epsilon()) {
            return lo;
        }
        lo + (v - self.min) / span * (hi - lo)
    }
}

/// Growable `(x, y)` series that tracks its own bounds.
#[derive(Clone, Debug, Default)]
pub struct SampleSeries<F: Float> {
    points: AllocVec<Vec2<F>>,
    x: Option<Bounds<F>>,
    y: Option<Bounds<F>>,
}

impl<F: Float> SampleSeries<F> {
    pub fn new() -> Self {
        SampleSeries { points: AllocVec::new(), x: None, y: None }
    }

    pub fn push(&mut self, point: Vec2<F>) {
        self.x = Some(Bounds::extend(self.x, point.x));
        self.y = Some(Bounds::extend(self.y, point.y));
        self.points.push(point);
    }

    pub fn points(&self) -> &[Vec2<F>] {
        &self.points
    }

    /// `None` while empty.
    pub fn x_bounds(&self) -> Option<Bounds<F>> {
        self.x
    }

    /// `None` while empty.
    pub fn y_bounds(&self) -> Option<Bounds<F>> {
        self.y
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.x = None;
        self.y = None;
    }
}

/// Step response of a tracker with `params`, for previewing a tuning.
///
/// The input sweeps `x` linearly from `-span` to `span` over `steps` samples
/// while `y` jumps from 0 to `height` once `x` turns positive. The tracker
/// starts at `(-span, 0)`; only samples after the jump are recorded, as the
/// tracker's `(x, y)` output.
pub fn step_response<F: Float>(
    params: DynamicsParams<F>,
    dt: F,
    steps: usize,
    span: F,
    height: F,
) -> Result<SampleSeries<F>, DynamicsError> {
    let mut tracker = Tracker2D::new(params, Vec2::new(-span, F::zero()))?;
    let mut series = SampleSeries::new();

    for i in 0..steps {
        let x = sweep(i, steps, span);
        let y = if x > F::zero() { height } else { F::zero() };
        let out = tracker.update(dt, Vec2::new(x, y));
        if x > F::zero() {
            series.push(out);
        }
    }
    Ok(series)
}

/// Input `x` at sample `i` of a linear sweep from `-span` to `span`.
fn sweep<F: Float>(i: usize, steps: usize, span: F) -> F {
    let last = F::from_f64(steps.saturating_sub(1).max(1) as f64);
    (-span).lerp(span, F::from_f64(i as f64) / last)
}

/// Records one stack item's offset on every tick.
pub struct PositionHistory<F: Float> {
    item: usize,
    samples: SampleBuffer<Vec3<F>>,
}

impl<F: Float> PositionHistory<F> {
    pub fn new(item: usize, capacity: usize) -> Result<Self, DynamicsError> {
        Ok(PositionHistory { item, samples: SampleBuffer::new(capacity)? })
    }

    pub fn samples(&self) -> &SampleBuffer<Vec3<F>> {
        &self.samples
    }
}

impl<F: Float> TickObserver<F> for PositionHistory<F> {
    fn on_item_updated(&mut self, index: usize, _target: Vec3<F>, offset: Vec3<F>) {
        if index == self.item {
            self.samples.push(offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn buffer_overwrites_oldest() {
        let mut buf = SampleBuffer::new(3).unwrap();
        for i in 0..5 {
            buf.push(i);
        }
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.iter().collect::<Vec<_>>(), [2, 3, 4]);
        assert_eq!(buf.latest(), Some(4));
        assert_eq!(buf.get(3), None);
    }

    #[test]
    fn buffer_pop_and_clear() {
        let mut buf = SampleBuffer::new(2).unwrap();
        buf.push(1.0f32);
        buf.push(2.0);
        assert_eq!(buf.pop_oldest(), Some(1.0));
        buf.push(3.0);
        assert_eq!(buf.iter().collect::<Vec<_>>(), [2.0, 3.0]);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.pop_oldest(), None);
    }

    #[test]
    fn zero_capacity_rejected() {
        let err = SampleBuffer::<f32>::new(0).unwrap_err();
        assert_eq!(err, DynamicsError::InvalidParameter(InvalidParameter::Capacity));
    }

    #[test]
    fn series_tracks_bounds() {
        let mut series = SampleSeries::new();
        assert_eq!(series.x_bounds(), None);
        series.push(Vec2::new(1.0f64, -2.0));
        series.push(Vec2::new(-1.0, 5.0));
        assert_eq!(series.x_bounds(), Some(Bounds { min: -1.0, max: 1.0 }));
        assert_eq!(series.y_bounds(), Some(Bounds { min: -2.0, max: 5.0 }));
        series.clear();
        assert!(series.is_empty());
        assert_eq!(series.y_bounds(), None);
    }

    #[test]
    fn sweep_resolves_long_runs() {
        // 2^24 + 1 is the first count f32 cannot represent.
        let steps = (1usize << 25) + 1;
        let x: f64 = sweep(1 << 24, steps, 1.0);
        assert_eq!(x, 0.0);
        let x: f64 = sweep((1 << 24) + 1, steps, 1.0);
        assert_eq!(x, 1.0 / 16_777_216.0);
        assert_eq!(sweep(steps - 1, steps, 2.0f64), 2.0);
    }

    #[test]
    fn remap_bounds() {
        let b = Bounds { min: 0.0f64, max: 2.0 };
        assert_eq!(b.remap(1.0, 0.0, 100.0), 50.0);
        assert_eq!(Bounds { min: 1.0f64, max: 1.0 }.remap(1.0, 3.0, 9.0), 3.0);
    }
}
