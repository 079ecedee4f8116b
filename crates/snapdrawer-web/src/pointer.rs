#![forbid(unsafe_code)]

//! Single-pointer adapter between browser pointer lifecycle signals and a
//! [`Drawer`].
//!
//! Browsers deliver touch and mouse events for every finger and button.
//! The drawer handles exactly one gesture at a time, so this adapter:
//! - tracks the one pointer that started the active gesture,
//! - drops signals from any other pointer with a recorded reason, and
//! - turns interruption paths (touch cancel, mouse leaving the pane, window
//!   blur) into a settle so the pane never stays mid-way.
//!
//! Every call returns a [`PointerDispatch`] carrying the host response and a
//! structured [`PointerLogEntry`].

use snapdrawer_core::{Drawer, PointerResponse, PointerSample, PointerTarget, Surface};
use tracing::{debug, trace};

/// Pointer id used for mouse input, which has no identifier of its own.
pub const MOUSE_POINTER_ID: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActivePointer {
    pointer_id: u32,
    last_position: PointerSample,
}

/// Lifecycle phase recorded for one adapter dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLifecyclePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    Blur,
}

/// Why an incoming lifecycle signal was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIgnoredReason {
    /// A second pointer went down while a gesture is running.
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    /// The signal belongs to a pointer other than the active one.
    PointerMismatch,
    /// The drawer declined to start a gesture (ignore region, drag handle,
    /// or disabled).
    DrawerDeclined,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLogOutcome {
    Forwarded,
    Ignored(PointerIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerLogEntry {
    pub phase: PointerLifecyclePhase,
    /// Sequence number of forwarded signals; `None` when ignored.
    pub sequence: Option<u64>,
    pub pointer_id: Option<u32>,
    pub position: Option<PointerSample>,
    pub outcome: PointerLogOutcome,
}

/// Result of one lifecycle dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDispatch {
    /// What the host must do with the DOM event.
    pub response: PointerResponse,
    pub log: PointerLogEntry,
}

impl PointerDispatch {
    fn ignored(
        phase: PointerLifecyclePhase,
        reason: PointerIgnoredReason,
        pointer_id: Option<u32>,
        position: Option<PointerSample>,
    ) -> Self {
        trace!(?phase, ?reason, ?pointer_id, "pointer signal ignored");
        Self {
            response: PointerResponse::default(),
            log: PointerLogEntry {
                phase,
                sequence: None,
                pointer_id,
                position,
                outcome: PointerLogOutcome::Ignored(reason),
            },
        }
    }

    /// Whether the signal reached the drawer.
    #[must_use]
    pub const fn is_forwarded(&self) -> bool {
        matches!(self.log.outcome, PointerLogOutcome::Forwarded)
    }
}

/// Owns a [`Drawer`] and feeds it one pointer at a time.
#[derive(Debug)]
pub struct PointerAdapter<S: Surface> {
    drawer: Drawer<S>,
    active: Option<ActivePointer>,
    next_sequence: u64,
}

impl<S: Surface> PointerAdapter<S> {
    #[must_use]
    pub fn new(drawer: Drawer<S>) -> Self {
        Self {
            drawer,
            active: None,
            next_sequence: 1,
        }
    }

    #[must_use]
    pub const fn drawer(&self) -> &Drawer<S> {
        &self.drawer
    }

    pub fn drawer_mut(&mut self) -> &mut Drawer<S> {
        &mut self.drawer
    }

    /// Release the drawer.
    pub fn into_drawer(self) -> Drawer<S> {
        self.drawer
    }

    /// Active pointer id, if any.
    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    /// Last position seen for the active pointer.
    #[must_use]
    pub fn last_position(&self) -> Option<PointerSample> {
        self.active.map(|active| active.last_position)
    }

    /// Handle a pointer-down on the pane.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        position: PointerSample,
        target: PointerTarget,
    ) -> PointerDispatch {
        let phase = PointerLifecyclePhase::PointerDown;
        if self.active.is_some() {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::ActivePointerAlreadyInProgress,
                Some(pointer_id),
                Some(position),
            );
        }

        let response = self.drawer.pointer_down(position, target);
        if !self.drawer.is_dragging() {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::DrawerDeclined,
                Some(pointer_id),
                Some(position),
            );
        }
        self.active = Some(ActivePointer {
            pointer_id,
            last_position: position,
        });
        self.forwarded(phase, pointer_id, Some(position), response)
    }

    /// Handle a pointer move.
    pub fn pointer_move(&mut self, pointer_id: u32, position: PointerSample) -> PointerDispatch {
        let phase = PointerLifecyclePhase::PointerMove;
        let Some(mut active) = self.active else {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                Some(position),
            );
        };
        if active.pointer_id != pointer_id {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                Some(position),
            );
        }

        let response = self.drawer.pointer_move(position);
        active.last_position = position;
        self.active = Some(active);
        self.forwarded(phase, pointer_id, Some(position), response)
    }

    /// Handle pointer release.
    pub fn pointer_up(&mut self, pointer_id: u32) -> PointerDispatch {
        let phase = PointerLifecyclePhase::PointerUp;
        let Some(active) = self.active else {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                Some(pointer_id),
                None,
            );
        };
        if active.pointer_id != pointer_id {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(pointer_id),
                None,
            );
        }

        self.active = None;
        let response = self.drawer.pointer_up();
        self.forwarded(phase, pointer_id, Some(active.last_position), response)
    }

    /// Handle `touchcancel`. `None` cancels whichever pointer is active.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> PointerDispatch {
        self.cancel_active(PointerLifecyclePhase::PointerCancel, pointer_id)
    }

    /// Handle the pointer leaving the pane (`mouseout`).
    pub fn pointer_leave(&mut self, pointer_id: u32) -> PointerDispatch {
        self.cancel_active(PointerLifecyclePhase::PointerLeave, Some(pointer_id))
    }

    /// Handle window blur.
    pub fn blur(&mut self) -> PointerDispatch {
        self.cancel_active(PointerLifecyclePhase::Blur, None)
    }

    fn cancel_active(
        &mut self,
        phase: PointerLifecyclePhase,
        pointer_id: Option<u32>,
    ) -> PointerDispatch {
        let Some(active) = self.active else {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::NoActivePointer,
                pointer_id,
                None,
            );
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return PointerDispatch::ignored(
                phase,
                PointerIgnoredReason::PointerMismatch,
                Some(id),
                None,
            );
        }

        self.active = None;
        debug!(?phase, pointer_id = active.pointer_id, "active pointer interrupted");
        let response = self.drawer.pointer_cancel();
        self.forwarded(
            phase,
            active.pointer_id,
            Some(active.last_position),
            response,
        )
    }

    fn forwarded(
        &mut self,
        phase: PointerLifecyclePhase,
        pointer_id: u32,
        position: Option<PointerSample>,
        response: PointerResponse,
    ) -> PointerDispatch {
        let sequence = self.next_sequence();
        trace!(?phase, sequence, pointer_id, "pointer signal forwarded");
        PointerDispatch {
            response,
            log: PointerLogEntry {
                phase,
                sequence: Some(sequence),
                pointer_id: Some(pointer_id),
                position,
                outcome: PointerLogOutcome::Forwarded,
            },
        }
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}
