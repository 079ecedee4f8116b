#![forbid(unsafe_code)]

//! JSON pointer input parser.
//!
//! Hosts that batch browser events (workers, replay harnesses, native shells
//! embedding a webview) hand them over as small JSON records:
//!
//! ```json
//! { "kind": "move", "pointerId": 1, "pageX": 120.5, "pageY": 40 }
//! { "kind": "down", "touches": [{ "pageX": 12, "pageY": 30 }], "ignore": false }
//! ```
//!
//! [`parse_pointer_input`] validates a record into a [`PointerInput`], which
//! [`PointerInput::apply`] forwards to a [`PointerAdapter`].
//!
//! # Page coordinates
//!
//! A record carrying a non-empty `touches` list takes its position from the
//! first touch; otherwise `pageX`/`pageY` are used.

use serde::Deserialize;
use snapdrawer_core::{PointerSample, PointerTarget, Surface};
use thiserror::Error;

use crate::pointer::{MOUSE_POINTER_ID, PointerAdapter, PointerDispatch};

/// Errors from parsing pointer input JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputParseError {
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown pointer input kind: {0}")]
    UnknownKind(String),
}

/// Lifecycle signal carried by one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInputKind {
    Down,
    Move,
    Up,
    Cancel,
    Leave,
    Blur,
}

impl PointerInputKind {
    fn parse(kind: &str) -> Result<Self, InputParseError> {
        match kind {
            "down" => Ok(Self::Down),
            "move" => Ok(Self::Move),
            "up" => Ok(Self::Up),
            "cancel" => Ok(Self::Cancel),
            "leave" => Ok(Self::Leave),
            "blur" => Ok(Self::Blur),
            other => Err(InputParseError::UnknownKind(other.to_string())),
        }
    }

    /// Whether records of this kind must carry a position.
    const fn needs_position(self) -> bool {
        matches!(self, Self::Down | Self::Move)
    }
}

/// A validated pointer input record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub kind: PointerInputKind,
    pub pointer_id: u32,
    /// Page position; present for `down` and `move`.
    pub position: Option<PointerSample>,
    pub target: PointerTarget,
}

impl PointerInput {
    /// Forward this record to `adapter`.
    pub fn apply<S: Surface>(&self, adapter: &mut PointerAdapter<S>) -> PointerDispatch {
        let position = self.position.unwrap_or_default();
        match self.kind {
            PointerInputKind::Down => adapter.pointer_down(self.pointer_id, position, self.target),
            PointerInputKind::Move => adapter.pointer_move(self.pointer_id, position),
            PointerInputKind::Up => adapter.pointer_up(self.pointer_id),
            PointerInputKind::Cancel => adapter.pointer_cancel(Some(self.pointer_id)),
            PointerInputKind::Leave => adapter.pointer_leave(self.pointer_id),
            PointerInputKind::Blur => adapter.blur(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTouch {
    #[serde(default)]
    page_x: Option<f64>,
    #[serde(default)]
    page_y: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    kind: String,
    #[serde(default)]
    pointer_id: Option<u32>,
    #[serde(default)]
    page_x: Option<f64>,
    #[serde(default)]
    page_y: Option<f64>,
    #[serde(default)]
    touches: Vec<RawTouch>,
    #[serde(default)]
    ignore: bool,
    #[serde(default)]
    drag_handle: bool,
}

/// Resolve the page coordinate for one axis: the first touch when touches
/// are present, else the event's own page coordinate.
#[must_use]
pub fn page_coordinate(
    first_touch: Option<f64>,
    has_touches: bool,
    page: Option<f64>,
) -> Option<f64> {
    if has_touches { first_touch } else { page }
}

/// Parse one JSON pointer record.
pub fn parse_pointer_input(json: &str) -> Result<PointerInput, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    let kind = PointerInputKind::parse(&raw.kind)?;

    let first = raw.touches.first();
    let has_touches = first.is_some();
    let x = page_coordinate(first.and_then(|t| t.page_x), has_touches, raw.page_x);
    let y = page_coordinate(first.and_then(|t| t.page_y), has_touches, raw.page_y);

    let position = match (x, y) {
        (Some(x), Some(y)) => Some(PointerSample::new(x, y)),
        (None, _) if kind.needs_position() => return Err(InputParseError::MissingField("pageX")),
        (_, None) if kind.needs_position() => return Err(InputParseError::MissingField("pageY")),
        _ => None,
    };

    Ok(PointerInput {
        kind,
        pointer_id: raw.pointer_id.unwrap_or(MOUSE_POINTER_ID),
        position,
        target: PointerTarget {
            in_ignore_region: raw.ignore,
            in_drag_handle: raw.drag_handle,
        },
    })
}
