#![forbid(unsafe_code)]

//! Gesture state machine: turns pointer samples into pane offset decisions.
//!
//! [`GestureMachine`] owns at most one [`GestureSession`] at a time and the
//! [`GestureReadout`] derived from it. It never writes positions itself:
//! every handler returns an outcome that the owning drawer applies through
//! the translation engine.
//!
//! # State Machine
//!
//! ```text
//!            pointer_down            pointer_up / pointer_cancel
//!   Idle ───────────────────▶ Dragging ──────────────────────────▶ Idle
//!                               │   ▲                (settle decision)
//!                               └───┘ pointer_move
//! ```
//!
//! Within `Dragging`, each move sample passes these gates in order:
//!
//! 1. **Intent**: the first sample that moved away from the start point is
//!    classified by its angle. Within `slide_intent` degrees of horizontal
//!    the gesture is a slide; otherwise it is a scroll and the rest of the
//!    session is ignored so the host can scroll natively.
//! 2. **Distance**: nothing happens until the pointer has travelled more than
//!    `min_drag_distance` pixels horizontally from the start.
//! 3. **Direction tracking**: each reversal of horizontal movement records
//!    the reversal point; flicks are measured from there.
//! 4. **Resistance**: the candidate offset (base offset plus horizontal
//!    travel) is damped beyond the bounds.
//!
//! # Invariants
//!
//! 1. Intent is decided at most once per session and never revisited.
//! 2. A session whose intent was rejected never yields a slide or a settle.
//! 3. The readout is reset when a session starts and recomputed on every
//!    slide sample; release decisions read only the readout.
//! 4. `pointer_up` always ends the session.
//!
//! # Failure Modes
//!
//! - A sample identical to the start point carries no angle; the intent
//!   decision waits for the next one.
//! - Move or release without a session is reported as `Idle` and ignored.

use serde::Serialize;

use crate::geometry::{
    Direction, PointerSample, Side, apply_resistance, drag_angle, is_slide_angle, to_pixels,
};
use crate::logging::{debug, trace};
use crate::settings::Settings;
use crate::surface::PointerTarget;

// ---------------------------------------------------------------------------
// Readout
// ---------------------------------------------------------------------------

/// Pixel measurements of the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    /// Offset the pane is shown at.
    pub absolute: i32,
    /// Horizontal pointer travel since pointer-down.
    pub relative: f64,
    /// Horizontal pointer travel since the last direction change.
    pub since_direction_change: f64,
    /// `absolute` as a percentage of the bound being opened.
    pub percentage: f64,
}

/// Derived state of the gesture, exposed to listeners and `state()`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureReadout {
    /// Panel being revealed.
    pub opening: Option<Side>,
    /// Current horizontal movement direction.
    pub towards: Option<Direction>,
    /// The pane is beyond the bound of the opening side.
    pub hyper_extending: bool,
    /// The pane is past half of the bound of the opening side.
    pub halfway: bool,
    /// Travel since the last direction change exceeds the flick threshold.
    pub flick: bool,
    pub translation: Translation,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Slide/scroll classification of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Intent {
    #[default]
    Undecided,
    Slide,
    Scroll,
}

/// Working state of one pointer-down → pointer-up interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    /// First sample of the gesture.
    pub start: PointerSample,
    /// Committed pane offset when the gesture began.
    pub base_offset: i32,
    /// X of the latest slide sample; `None` until the pane first moves.
    pub last_x: Option<f64>,
    /// X where the current direction run began.
    pub hold_x: f64,
    pub direction: Option<Direction>,
    pub intent: Intent,
}

impl GestureSession {
    #[must_use]
    pub fn new(start: PointerSample, base_offset: i32) -> Self {
        Self {
            start,
            base_offset,
            last_x: None,
            hold_x: start.x,
            direction: None,
            intent: Intent::Undecided,
        }
    }

    /// Whether the pane followed at least one sample.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.last_x.is_some()
    }

    /// Update the direction run with a new X coordinate.
    ///
    /// The first direction established starts its run at the gesture start;
    /// every reversal starts a new run at the reversal point.
    fn track_direction(&mut self, x: f64) {
        let last = self.last_x.unwrap_or(self.start.x);
        let moving = if x < last {
            Some(Direction::Left)
        } else if x > last {
            Some(Direction::Right)
        } else {
            None
        };
        if let Some(moving) = moving
            && self.direction != Some(moving)
        {
            self.hold_x = if self.direction.is_none() {
                self.start.x
            } else {
                x
            };
            self.direction = Some(moving);
        }
        self.last_x = Some(x);
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a pointer-down did not start a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The target sits inside a region marked with the ignore attribute.
    IgnoreRegion,
    /// A drag handle is configured, the target is outside it, and the pane
    /// is not fully open.
    OutsideDragHandle,
}

/// Result of [`GestureMachine::pointer_down`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownOutcome {
    Started,
    Ignored(IgnoreReason),
}

/// Result of [`GestureMachine::pointer_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No session is active.
    Idle,
    /// Touch dragging is switched off in the settings.
    DragDisabled,
    /// The session was classified as a scroll; leave the event alone.
    Scroll,
    /// Intent undecided or accepted, but the pointer has not travelled far
    /// enough yet.
    BelowThreshold,
    /// Move the pane to `offset` (already damped) and suppress scrolling.
    Slide { offset: f64 },
}

/// Where a released pane should settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleTarget {
    Closed,
    Open(Side),
}

/// Result of [`GestureMachine::pointer_up`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No session was active.
    Idle,
    /// A tap on an open pane: close it.
    TapToClose,
    /// Animate to the given position.
    Settle(SettleTarget),
    /// The pane never moved and nothing needs settling.
    Unmoved,
}

// ---------------------------------------------------------------------------
// GestureMachine
// ---------------------------------------------------------------------------

/// Per-instance gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    session: Option<GestureSession>,
    readout: GestureReadout,
}

impl GestureMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is active.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&GestureSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn readout(&self) -> &GestureReadout {
        &self.readout
    }

    /// Preset the readout for a programmatic open of `side`.
    pub fn preset_opening(&mut self, side: Side) {
        self.readout.opening = Some(side);
        self.readout.towards = Some(side.opening_direction());
    }

    /// Begin a session unless the target excludes it.
    ///
    /// `offset` is the committed pane offset (or the target of an animation
    /// about to be cut short); it becomes the session's base offset.
    pub fn pointer_down(
        &mut self,
        sample: PointerSample,
        target: PointerTarget,
        offset: i32,
        settings: &Settings,
    ) -> DownOutcome {
        if target.in_ignore_region {
            debug!(x = sample.x, y = sample.y, "pointer-down inside ignore region");
            return DownOutcome::Ignored(IgnoreReason::IgnoreRegion);
        }
        let fully_open = offset == settings.min_position || offset == settings.max_position;
        if settings.dragger.is_some() && !target.in_drag_handle && !fully_open {
            debug!(x = sample.x, y = sample.y, "pointer-down outside drag handle");
            return DownOutcome::Ignored(IgnoreReason::OutsideDragHandle);
        }
        if self.session.is_some() {
            debug!("pointer-down replaced an unfinished session");
        }
        self.session = Some(GestureSession::new(sample, offset));
        self.readout = GestureReadout::default();
        debug!(x = sample.x, y = sample.y, base = offset, "gesture started");
        DownOutcome::Started
    }

    /// Process one move sample.
    ///
    /// `offset` is the offset the pane is currently shown at.
    pub fn pointer_move(
        &mut self,
        sample: PointerSample,
        offset: i32,
        settings: &Settings,
    ) -> MoveOutcome {
        let Some(session) = self.session.as_mut() else {
            return MoveOutcome::Idle;
        };
        if !settings.touch_to_drag {
            return MoveOutcome::DragDisabled;
        }

        match session.intent {
            Intent::Scroll => return MoveOutcome::Scroll,
            Intent::Slide => {}
            Intent::Undecided => {
                if sample == session.start {
                    return MoveOutcome::BelowThreshold;
                }
                let degrees = drag_angle(session.start, sample);
                let slide = is_slide_angle(degrees, settings.slide_intent);
                session.intent = if slide { Intent::Slide } else { Intent::Scroll };
                debug!(degrees, slide, "gesture intent decided");
                if !slide {
                    return MoveOutcome::Scroll;
                }
            }
        }

        let relative = sample.x - session.start.x;
        if relative.abs() <= settings.min_drag_distance {
            return MoveOutcome::BelowThreshold;
        }

        session.track_direction(sample.x);

        let min = f64::from(settings.min_position);
        let max = f64::from(settings.max_position);
        let raw = f64::from(session.base_offset) + relative;
        let damped = apply_resistance(raw, min, max, settings.resistance);

        // A locked candidate is never written, so the pane stays at `offset`.
        let locked = settings.disable.forbids(damped);
        let shown = if locked {
            offset
        } else if settings.hyperextensible {
            to_pixels(damped)
        } else {
            to_pixels(damped).clamp(settings.min_position, settings.max_position)
        };
        let opening = Side::revealed_by(f64::from(offset))
            .or_else(|| Side::revealed_by(damped).filter(|_| !locked))
            .or(self.readout.opening)
            .filter(|side| !settings.disable.forbids(f64::from(settings.bound(*side))));
        let since_direction_change = sample.x - session.hold_x;

        let mut readout = GestureReadout {
            opening,
            towards: session.direction,
            hyper_extending: false,
            halfway: false,
            flick: since_direction_change.abs() > settings.flick_threshold,
            translation: Translation {
                absolute: shown,
                relative,
                since_direction_change,
                percentage: 0.0,
            },
        };
        if let Some(side) = opening {
            let bound = settings.bound(side);
            let shown_f = f64::from(shown);
            let bound_f = f64::from(bound);
            match side {
                Side::Left => {
                    readout.hyper_extending = shown > bound;
                    readout.halfway = shown_f > bound_f / 2.0;
                }
                Side::Right => {
                    readout.hyper_extending = shown < bound;
                    readout.halfway = shown_f < bound_f / 2.0;
                }
            }
            readout.translation.percentage = if bound == 0 {
                0.0
            } else {
                shown_f / bound_f * 100.0
            };
        }
        self.readout = readout;

        trace!(x = sample.x, offset = damped, "slide sample");
        MoveOutcome::Slide { offset: damped }
    }

    /// End the session and decide where the pane settles.
    ///
    /// `offset` is the offset the pane is currently shown at.
    pub fn pointer_up(&mut self, offset: i32, settings: &Settings) -> ReleaseOutcome {
        let Some(session) = self.session.take() else {
            return ReleaseOutcome::Idle;
        };

        if session.intent == Intent::Scroll {
            return ReleaseOutcome::Unmoved;
        }
        if !session.moved() {
            return if offset != 0 && settings.tap_to_close {
                debug!(offset, "tap to close");
                ReleaseOutcome::TapToClose
            } else {
                ReleaseOutcome::Unmoved
            };
        }

        let outcome = match self.readout.opening {
            Some(side) => ReleaseOutcome::Settle(settle_target(&self.readout, side)),
            None => ReleaseOutcome::Unmoved,
        };
        debug!(?outcome, readout = ?self.readout, "gesture released");
        outcome
    }

    /// Drop the session without a settle decision.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

/// Release rule for a pane opening towards `side`.
///
/// Past halfway, beyond the bound, or flicking: a flick back towards closed
/// closes; a flick towards open, halfway, or hyperextension opens. Anything
/// short of that closes.
fn settle_target(readout: &GestureReadout, side: Side) -> SettleTarget {
    let opening_direction = side.opening_direction();
    let flick_open = readout.flick && readout.towards == Some(opening_direction);
    let flick_closed = readout.flick && !flick_open && readout.towards.is_some();

    if flick_closed {
        SettleTarget::Closed
    } else if flick_open || readout.halfway || readout.hyper_extending {
        SettleTarget::Open(side)
    } else {
        SettleTarget::Closed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
