#![forbid(unsafe_code)]

//! Error types.
//!
//! Only configuration problems are errors. Everything the drawer can run into
//! while handling input (an unregistered event, a move blocked by a side lock,
//! a NaN offset) degrades to a silent no-op instead.

use thiserror::Error;

/// Invalid drawer settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Bounds must straddle zero: `min <= 0 <= max`.
    #[error("invalid bounds: minPosition {min} / maxPosition {max} must satisfy min <= 0 <= max")]
    InvalidBounds { min: i32, max: i32 },
    /// Resistance must be a finite factor in `[0, 1]`.
    #[error("invalid resistance {0}: expected a value in [0, 1]")]
    InvalidResistance(f64),
    /// Slide intent must be an angle in `[0, 90]` degrees.
    #[error("invalid slideIntent {0}: expected degrees in [0, 90]")]
    InvalidSlideIntent(f64),
    /// A pixel distance setting was negative or not finite.
    #[error("invalid {field} {value}: expected a non-negative distance")]
    NegativeDistance { field: &'static str, value: f64 },
    /// Transition speed was negative or not finite.
    #[error("invalid transitionSpeed {0}: expected non-negative seconds")]
    NegativeDuration(f64),
    /// The merged settings object could not be deserialized.
    #[error("settings patch rejected: {0}")]
    Patch(String),
}

/// Drawer construction and reconfiguration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawerError {
    /// No element (surface) was supplied to bind the drawer to.
    #[error("a target element is required to construct a drawer")]
    MissingElement,
    /// Settings failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// An event name string that does not match any [`crate::DrawerEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drawer event name: {0:?}")]
pub struct UnknownEventName(pub String);
