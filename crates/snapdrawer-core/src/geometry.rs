#![forbid(unsafe_code)]

//! Geometry primitives shared by the gesture machine and translation engine.
//!
//! Offsets are horizontal pixel translations of the content pane: positive
//! values slide the pane right and reveal the **left** panel, negative values
//! slide it left and reveal the **right** panel.

use serde::{Deserialize, Serialize};

/// A side panel of the drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Revealed by positive offsets.
    Left,
    /// Revealed by negative offsets.
    Right,
}

impl Side {
    /// Lower-case name as used in option objects and body classes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// The panel revealed by an offset of this sign, if any.
    #[must_use]
    pub fn revealed_by(offset: f64) -> Option<Self> {
        if offset > 0.0 {
            Some(Self::Left)
        } else if offset < 0.0 {
            Some(Self::Right)
        } else {
            None
        }
    }

    /// Movement direction that opens this side further.
    #[must_use]
    pub const fn opening_direction(self) -> Direction {
        match self {
            Self::Left => Direction::Right,
            Self::Right => Direction::Left,
        }
    }
}

/// Horizontal movement direction of the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// One pointer position in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Angle of the drag from `start` to `current`, in whole degrees in `[0, 360)`.
///
/// 0° points right, 90° up (page y grows downward, so it is flipped), 180°
/// left. Fractional degrees are floored.
#[must_use]
pub fn drag_angle(start: PointerSample, current: PointerSample) -> f64 {
    let dx = current.x - start.x;
    let dy = start.y - current.y;
    let mut degrees = dy.atan2(dx).to_degrees().floor();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    if degrees >= 360.0 {
        degrees -= 360.0;
    }
    degrees
}

/// Whether `degrees` lies within `slide_intent` of the horizontal axis.
#[must_use]
pub fn is_slide_angle(degrees: f64, slide_intent: f64) -> bool {
    let towards_right = (0.0..=slide_intent).contains(&degrees) || degrees > 360.0 - slide_intent;
    let towards_left = ((180.0 - slide_intent)..=(180.0 + slide_intent)).contains(&degrees);
    towards_right || towards_left
}

/// Truncate a pixel value towards zero; non-numeric values become `0`.
#[must_use]
pub fn to_pixels(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    // `as` saturates at the i32 range and truncates towards zero.
    value.trunc() as i32
}

/// Damp the part of `candidate` that lies beyond `[min, max]`.
///
/// The overshoot past the nearer bound is scaled by `resistance` and added
/// back to that bound, so with `resistance < 1` the pane keeps moving past
/// the limit but more slowly than the pointer.
#[must_use]
pub fn apply_resistance(candidate: f64, min: f64, max: f64, resistance: f64) -> f64 {
    if candidate > max {
        max + (candidate - max) * resistance
    } else if candidate < min {
        min + (candidate - min) * resistance
    } else {
        candidate
    }
}
