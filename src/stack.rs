//! Stack bending: a chain of trackers driven by a single motion signal.
//!
//! Items are stacked along the root's up axis. Every tick the root motion is
//! reduced to drive values (see [`crate::drive`]), each item gets a target
//! offset bounded by the bend-limit curve at its height, and the item's own
//! tracker smooths its way there. All positions are in the root's local
//! frame: `x` lateral, `y` up the stack, `z` axial.

use crate::config::{DynamicsParams, StackConfig};
use crate::curve::{ConstantCurve, Curve};
use crate::drive::{Drive, MotionState, RootSample};
use crate::error::{DynamicsError, InvalidParameter};
use crate::float::Float;
use crate::observer::TickObserver;
use crate::tracker::{SecondOrderTracker, Tracker3D};
use crate::vec::{Vec, Vec3};
use alloc::vec::Vec as AllocVec;

/// Orientation of an item, expressed as two unit axes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Facing<F: Float> {
    /// Item's local up, pointing away from the item below it.
    pub up: Vec3<F>,
    /// Item's local forward.
    pub forward: Vec3<F>,
}

impl<F: Float> Default for Facing<F> {
    fn default() -> Self {
        Facing { up: Vec3::up(), forward: Vec3::forward() }
    }
}

impl<F: Float> Facing<F> {
    /// Facing of an item at `position` whose up axis points away from `anchor`.
    ///
    /// Forward is `down × right`. When `down` lines up with the right axis the
    /// current forward is kept, and a degenerate `down` resets to the default.
    pub fn towards(self, anchor: Vec3<F>, position: Vec3<F>) -> Self {
        let down = (anchor - position).normalize();
        if down == Vec3::zero() {
            return Facing::default();
        }
        let forward = down.cross(Vec3::right()).normalize();
        Facing {
            up: -down,
            forward: if forward == Vec3::zero() { self.forward } else { forward },
        }
    }
}

/// One item in the stack and the tracker that moves it.
#[derive(Clone, Debug)]
pub struct StackItem<F: Float> {
    height: F,
    half_height: F,
    offset_from_base: F,
    tracker: Tracker3D<F>,
    local_position: Vec3<F>,
    facing: Facing<F>,
}

impl<F: Float> StackItem<F> {
    pub fn height(&self) -> F { self.height }

    pub fn half_height(&self) -> F { self.half_height }

    /// Height of the item's center above the stack root.
    pub fn offset_from_base(&self) -> F { self.offset_from_base }

    /// Where the item sits when the stack is at rest.
    pub fn rest_position(&self) -> Vec3<F> {
        Vec3::new(F::zero(), self.offset_from_base, F::zero())
    }

    /// Filtered position from the latest tick.
    pub fn local_position(&self) -> Vec3<F> { self.local_position }

    /// Offset of the filtered position from the rest position.
    pub fn displacement(&self) -> Vec3<F> {
        self.local_position - self.rest_position()
    }

    pub fn facing(&self) -> Facing<F> { self.facing }

    /// Top of the item along its current up axis; the next item looks at it.
    pub fn look_at_point(&self) -> Vec3<F> {
        self.local_position + self.facing.up.scale(self.half_height)
    }

    pub fn tracker(&self) -> &Tracker3D<F> { &self.tracker }
}

/// Bend limit at one item, as used to build its target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BendLimit<F: Float> {
    pub height: F,
    pub normalized_height: F,
    pub limit: F,
}

/// Drives an ordered stack of items from the root's motion.
pub struct StackBendController<F: Float, B: Curve<F>, S: Curve<F> = ConstantCurve<F>> {
    config: StackConfig<F>,
    bend_curve: B,
    shake_curve: S,
    items: AllocVec<StackItem<F>>,
    total_height: F,
    motion: MotionState<F>,
    drive: Drive<F>,
}

impl<F: Float, B: Curve<F>> StackBendController<F, B, ConstantCurve<F>> {
    /// Empty stack anchored at `root`. Jitter is distributed evenly until
    /// [`with_shake_curve`](Self::with_shake_curve) replaces the curve.
    pub fn new(
        config: StackConfig<F>,
        bend_curve: B,
        root: RootSample<F>,
    ) -> Result<Self, DynamicsError> {
        config.validate()?;
        Ok(StackBendController {
            config,
            bend_curve,
            shake_curve: ConstantCurve(F::one()),
            items: AllocVec::new(),
            total_height: F::zero(),
            motion: MotionState::new(root),
            drive: Drive { axial: F::zero(), lateral: F::half() },
        })
    }
}

impl<F: Float, B: Curve<F>, S: Curve<F>> StackBendController<F, B, S> {
    /// Replace the curve scaling the jitter by axial drive.
    pub fn with_shake_curve<S2: Curve<F>>(self, shake_curve: S2) -> StackBendController<F, B, S2> {
        StackBendController {
            config: self.config,
            bend_curve: self.bend_curve,
            shake_curve,
            items: self.items,
            total_height: self.total_height,
            motion: self.motion,
            drive: self.drive,
        }
    }

    /// Put an item of `height` on top of the stack. Returns its index.
    pub fn push_item(&mut self, height: F) -> Result<usize, DynamicsError> {
        if !height.is_finite() || height < F::zero() {
            return Err(InvalidParameter::ItemHeight.into());
        }
        let half_height = height * F::half();
        let offset_from_base = self.total_height + half_height;
        let tracker = SecondOrderTracker::new(
            self.config.dynamics,
            Vec3::new(F::zero(), offset_from_base, F::zero()),
        )?;
        self.items.push(StackItem {
            height,
            half_height,
            offset_from_base,
            local_position: tracker.position(),
            tracker,
            facing: Facing::default(),
        });
        self.relayout();
        Ok(self.items.len() - 1)
    }

    /// Take an item out of the stack. Items above it settle down through their trackers.
    pub fn remove_item(&mut self, index: usize) -> Result<StackItem<F>, DynamicsError> {
        if index >= self.items.len() {
            return Err(DynamicsError::ItemOutOfBounds { index, count: self.items.len() });
        }
        let item = self.items.remove(index);
        self.relayout();
        Ok(item)
    }

    pub fn set_items_spacing(&mut self, spacing: F) -> Result<(), DynamicsError> {
        if !spacing.is_finite() || spacing < F::zero() {
            return Err(InvalidParameter::ItemsSpacing.into());
        }
        self.config.items_spacing = spacing;
        self.relayout();
        Ok(())
    }

    pub fn set_bending_force(&mut self, bending_force: F) -> Result<(), DynamicsError> {
        if !(bending_force >= F::zero() && bending_force <= F::one()) {
            return Err(InvalidParameter::BendingForce.into());
        }
        self.config.bending_force = bending_force;
        Ok(())
    }

    /// Rebuild every tracker with new tuning, keeping current positions.
    pub fn retune(&mut self, params: DynamicsParams<F>) -> Result<(), DynamicsError> {
        params.validate()?;
        for item in self.items.iter_mut() {
            item.tracker = SecondOrderTracker::new(params, item.tracker.position())?;
        }
        self.config.dynamics = params;
        tracing::debug!(items = self.items.len(), "stack trackers retuned");
        Ok(())
    }

    /// Advance the stack by `dt` with a new root sample.
    ///
    /// An empty stack only records the root motion.
    pub fn tick<O: TickObserver<F>>(&mut self, dt: F, sample: RootSample<F>, observer: &mut O) {
        self.motion.observe(dt, sample, &self.config);
        if self.items.is_empty() {
            return;
        }

        let drive = self.motion.drive(&self.config, &self.shake_curve);
        let max_offset = self.max_offset();

        for (index, item) in self.items.iter_mut().enumerate() {
            let normalized = normalized_height(item.offset_from_base, self.total_height);
            let limit = self.bend_curve.evaluate(normalized) * max_offset;

            let axial = F::zero().lerp(-limit, drive.axial);
            let lateral = (-limit).lerp(limit, drive.lateral);
            let target = Vec3::new(lateral, item.offset_from_base, axial);

            item.local_position = item.tracker.update(dt, target);
            observer.on_item_updated(index, target, item.local_position);
        }

        self.update_facing();
        self.drive = drive;
        observer.on_tick_complete(drive);
    }

    /// Per-item bend limits for the current layout.
    pub fn bending_limits(&self) -> AllocVec<BendLimit<F>> {
        let max_offset = self.max_offset();
        self.items
            .iter()
            .map(|item| {
                let normalized_height = normalized_height(item.offset_from_base, self.total_height);
                BendLimit {
                    height: item.offset_from_base,
                    normalized_height,
                    limit: self.bend_curve.evaluate(normalized_height) * max_offset,
                }
            })
            .collect()
    }

    /// Point every item at the top of the item below it, or at the root.
    fn update_facing(&mut self) {
        let mut anchor = Vec3::zero();
        for item in self.items.iter_mut() {
            item.facing = item.facing.towards(anchor, item.local_position);
            anchor = item.look_at_point();
        }
    }

    fn relayout(&mut self) {
        let spacing = self.config.items_spacing;
        let mut height = F::zero();
        for item in self.items.iter_mut() {
            item.offset_from_base = height + item.half_height;
            height = height + item.height + spacing;
        }
        self.total_height = height;

        if !self.items.is_empty() && self.total_height <= F::zero() {
            tracing::warn!(
                items = self.items.len(),
                "stack has zero height, bend limits sampled at the base"
            );
        }
        tracing::debug!(
            items = self.items.len(),
            total_height = self.total_height.to_f64(),
            "stack layout rebuilt"
        );
    }

    /// Sum of item heights plus the spacing after each item.
    pub fn total_height(&self) -> F { self.total_height }

    /// Largest offset the bend curve can scale: `total_height · bending_force`.
    pub fn max_offset(&self) -> F { self.total_height * self.config.bending_force }

    pub fn items(&self) -> &[StackItem<F>] { &self.items }

    pub fn item(&self, index: usize) -> Result<&StackItem<F>, DynamicsError> {
        self.items
            .get(index)
            .ok_or(DynamicsError::ItemOutOfBounds { index, count: self.items.len() })
    }

    pub fn len(&self) -> usize { self.items.len() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    pub fn motion(&self) -> &MotionState<F> { &self.motion }

    /// Drive used by the latest tick.
    pub fn drive(&self) -> Drive<F> { self.drive }

    pub fn config(&self) -> &StackConfig<F> { &self.config }
}

/// `height / total` clamped to [0, 1]; 0 for a stack without height.
pub fn normalized_height<F: Float>(height: F, total: F) -> F {
    if total > F::zero() {
        (height / total).clamp01()
    } else {
        F::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::LinearCurve;
    use approx::assert_abs_diff_eq;

    fn controller(config: StackConfig<f64>) -> StackBendController<f64, LinearCurve> {
        StackBendController::new(config, LinearCurve, RootSample::at(Vec3::zero())).unwrap()
    }

    #[test]
    fn normalized_height_clamps_and_guards() {
        assert_eq!(normalized_height(1.5f64, 3.0), 0.5);
        assert_eq!(normalized_height(4.0f64, 3.0), 1.0);
        assert_eq!(normalized_height(1.0f64, 0.0), 0.0);
    }

    #[test]
    fn spacing_counts_after_each_item() {
        let mut stack = controller(StackConfig::new().with_items_spacing(0.5));
        stack.push_item(1.0).unwrap();
        stack.push_item(2.0).unwrap();
        assert_abs_diff_eq!(stack.total_height(), 4.0);
        assert_abs_diff_eq!(stack.items()[1].offset_from_base(), 2.5);
    }

    #[test]
    fn rejects_negative_height() {
        let mut stack = controller(StackConfig::new());
        let err = stack.push_item(-1.0).unwrap_err();
        assert_eq!(err, DynamicsError::InvalidParameter(InvalidParameter::ItemHeight));
        assert!(stack.is_empty());
    }

    #[test]
    fn facing_keeps_forward_when_down_lines_up_with_right() {
        let previous = Facing::<f64>::default();
        let facing = previous.towards(Vec3::new(1.0, 0.5, 0.0), Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(facing.up, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(facing.forward, previous.forward);
    }

    #[test]
    fn facing_resets_on_coincident_anchor() {
        let tilted = Facing { up: Vec3::new(0.0, 0.0, 1.0), forward: Vec3::new(0.0, -1.0, 0.0) };
        let p = Vec3::new(0.0f64, 1.0, 0.0);
        assert_eq!(tilted.towards(p, p), Facing::default());
    }

    #[test]
    fn rest_facing_points_up() {
        let mut stack = controller(StackConfig::new());
        stack.push_item(1.0).unwrap();
        stack.push_item(1.0).unwrap();
        stack.tick(0.016, RootSample::at(Vec3::zero()), &mut crate::observer::NoOpTickObserver);
        for item in stack.items() {
            let facing = item.facing();
            assert_abs_diff_eq!(facing.up.y, 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(facing.forward.z, 1.0, epsilon = 1e-9);
        }
        assert_abs_diff_eq!(stack.items()[0].look_at_point().y, 1.0, epsilon = 1e-9);
    }
}
