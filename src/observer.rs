//! Tick observer trait for monitoring stack updates.

use crate::drive::Drive;
use crate::float::Float;
use crate::vec::Vec3;

/// Trait for observing stack ticks.
///
/// Implement this trait to watch what the controller feeds each tracker
/// (debug graphs, recording, profiling). All methods have default no-op
/// implementations.
pub trait TickObserver<F: Float> {
    /// Called after an item's tracker consumed its target.
    fn on_item_updated(&mut self, _index: usize, _target: Vec3<F>, _offset: Vec3<F>) {}

    /// Called when every item has been updated for this tick.
    fn on_tick_complete(&mut self, _drive: Drive<F>) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpTickObserver;

impl<F: Float> TickObserver<F> for NoOpTickObserver {}
