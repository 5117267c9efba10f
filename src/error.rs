//! Error types for tracker and stack construction.

/// Errors that can occur while building or editing trackers and stacks.
///
/// Stepping never fails: a zero time step and a zero-height stack have
/// defined fallbacks instead of errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DynamicsError {
    /// A tuning parameter is outside its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(InvalidParameter),
    /// Stack item index is out of bounds.
    #[error("stack item index {index} out of bounds (count: {count})")]
    ItemOutOfBounds { index: usize, count: usize },
}

/// Which parameter was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidParameter {
    #[error("frequency must be positive and finite")]
    Frequency,
    #[error("damping ratio must be non-negative and finite")]
    DampingRatio,
    #[error("response must be finite")]
    Response,
    #[error("max velocity must be positive")]
    MaxVelocity,
    #[error("max angular velocity must be positive")]
    MaxAngularVelocity,
    #[error("bending force must be in [0, 1]")]
    BendingForce,
    #[error("items spacing must be non-negative")]
    ItemsSpacing,
    #[error("item height must be non-negative and finite")]
    ItemHeight,
    #[error("rate must be non-negative and finite")]
    Rate,
    #[error("shake power and frequency must be non-negative and finite")]
    Shake,
    #[error("capacity must be at least 1")]
    Capacity,
}

impl From<InvalidParameter> for DynamicsError {
    fn from(param: InvalidParameter) -> Self {
        DynamicsError::InvalidParameter(param)
    }
}
