//! Stability-corrected second-order dynamics for games.
//!
//! `sodyn` drives values smoothly towards moving targets with a tunable
//! spring response (frequency, damping, initial response) that stays bounded
//! for any time step, and composes those trackers into bending stacks: piles
//! of items that lean and wobble as their root moves and turns.
//!
//! # Features
//!
//! - **Second-order trackers**: `f`/`z`/`r` tuning, per-axis integration,
//!   stable under large or irregular frame times
//! - **Stack bending**: one motion signal fans out into per-item targets
//!   shaped by a bend-limit curve
//! - **Optional behaviors**: asymmetric bend/settle rates, jitter, lateral
//!   bending from turn rate, each off by default
//! - **Diagnostics**: bounded sample history and step-response previews
//! - **Observable**: Monitor stack ticks via the `TickObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod error;
pub mod config;
pub mod tracker;
pub mod curve;
pub mod drive;
pub mod stack;
pub mod observer;
pub mod history;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Scalar, Vec2, Vec3};
pub use error::{DynamicsError, InvalidParameter};
pub use config::{DynamicsParams, StackConfig, BendSpeed, ShakeConfig, SideBendConfig};
pub use tracker::{SecondOrderTracker, Tracker1D, Tracker2D, Tracker3D, TargetVelocity, StepBranch};
pub use curve::{Curve, ConstantCurve, LinearCurve, KeyframeCurve, Key};
pub use drive::{Drive, MotionState, RootSample};
pub use stack::{StackBendController, StackItem, Facing, BendLimit};
pub use observer::{TickObserver, NoOpTickObserver};
pub use history::{SampleBuffer, SampleSeries, PositionHistory, step_response};
