#![forbid(unsafe_code)]

//! Drawer instance: one content pane, its settings, and its public API.
//!
//! A [`Drawer`] ties the [`GestureMachine`] to the [`TranslationEngine`] and
//! announces lifecycle moments on its [`NotificationBus`]. Hosts feed it
//! pointer samples through [`Drawer::pointer_down`], [`Drawer::pointer_move`]
//! and [`Drawer::pointer_up`], forward the transition-end signal through
//! [`Drawer::transition_finished`], and honor the returned
//! [`PointerResponse`] (suppress the browser's default scrolling when asked).
//!
//! # Example
//!
//! ```
//! use snapdrawer_core::{DrawerBuilder, DrawerEvent, MemorySurface, PaneState, Side};
//!
//! let mut drawer = DrawerBuilder::new()
//!     .element(MemorySurface::default())
//!     .build()
//!     .unwrap();
//! drawer.on(DrawerEvent::Animated, |_, state| println!("settled: {:?}", state.state));
//!
//! drawer.open(Side::Left);
//! drawer.transition_finished();
//! assert_eq!(drawer.state().state, PaneState::Left);
//! ```
//!
//! # Invariants
//!
//! 1. Every offset written to the surface goes through the engine.
//! 2. `animated` fires exactly once per completed animation, including the
//!    synchronous completion of hosts without transform support.
//! 3. Pointer listeners are attached at most once; settings patches and
//!    `enable` reconcile them instead of stacking subscriptions.
//! 4. Instances share nothing: two drawers over two surfaces never observe
//!    each other's offsets, sessions or callbacks.

use serde::Serialize;
use serde_json::Value;

use crate::bus::{DrawerEvent, NotificationBus};
use crate::error::DrawerError;
use crate::geometry::{PointerSample, Side};
use crate::gesture::{
    DownOutcome, GestureMachine, GestureReadout, MoveOutcome, ReleaseOutcome, SettleTarget,
};
use crate::logging::{debug, info, trace};
use crate::probe::{Capabilities, CapabilityProbe, PointerEventNames};
use crate::settings::Settings;
use crate::surface::{PointerTarget, Surface};
use crate::translate::{AnimationOutcome, TranslationEngine};

const CLASS_LEFT: &str = "snapjs-left";
const CLASS_RIGHT: &str = "snapjs-right";
const CLASS_EXPAND_LEFT: &str = "snapjs-expand-left";
const CLASS_EXPAND_RIGHT: &str = "snapjs-expand-right";

/// Coarse pane position reported by [`Drawer::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaneState {
    /// The offset equals `max_position`.
    Left,
    /// The offset equals `min_position`.
    Right,
    Closed,
}

impl PaneState {
    /// Classify `offset`. `max_position` is checked first, so a degenerate
    /// `0..=0` range reports `Left`.
    #[must_use]
    pub fn of(offset: i32, settings: &Settings) -> Self {
        if offset == settings.max_position {
            Self::Left
        } else if offset == settings.min_position {
            Self::Right
        } else {
            Self::Closed
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Closed => "closed",
        }
    }
}

/// Snapshot handed to callers of `state()` and to every callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawerState {
    pub state: PaneState,
    pub info: GestureReadout,
}

/// What the host should do with the browser event it just forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerResponse {
    /// Call `preventDefault()` on the event.
    pub prevent_default: bool,
}

impl PointerResponse {
    const PREVENT: Self = Self {
        prevent_default: true,
    };
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`Drawer`].
///
/// `element` is required; everything else falls back to defaults.
#[derive(Debug, Clone)]
pub struct DrawerBuilder<S> {
    element: Option<S>,
    settings: Settings,
    options: Option<Value>,
    caps: Option<Capabilities>,
}

impl<S> Default for DrawerBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> DrawerBuilder<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            element: None,
            settings: Settings::default(),
            options: None,
            caps: None,
        }
    }

    /// Surface of the content pane.
    #[must_use]
    pub fn element(mut self, element: S) -> Self {
        self.element = Some(element);
        self
    }

    /// Start from explicit settings instead of the defaults.
    #[must_use]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Flat option object merged over the settings at build time.
    #[must_use]
    pub fn options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = Some(caps);
        self
    }

    /// Resolve capabilities from `probe`.
    #[must_use]
    pub fn probe(self, probe: &impl CapabilityProbe) -> Self {
        self.capabilities(probe.probe())
    }
}

impl<S: Surface> DrawerBuilder<S> {
    /// Validate the configuration, bind the element and attach listeners.
    ///
    /// No `enable` notification is dispatched for the initial attach.
    pub fn build(self) -> Result<Drawer<S>, DrawerError> {
        let surface = self.element.ok_or(DrawerError::MissingElement)?;
        let mut settings = self.settings;
        settings.validate()?;
        if let Some(options) = &self.options {
            settings.merge(options)?;
        }
        let caps = self.caps.unwrap_or_default();
        info!(
            can_transform = caps.can_transform,
            has_touch = caps.has_touch,
            vendor = ?caps.vendor,
            "drawer bound"
        );

        let mut drawer = Drawer {
            settings,
            surface,
            engine: TranslationEngine::new(caps),
            gesture: GestureMachine::new(),
            bus: NotificationBus::new(),
            enabled: true,
            listening: None,
        };
        drawer.attach_listeners();
        Ok(drawer)
    }
}

// ---------------------------------------------------------------------------
// Drawer
// ---------------------------------------------------------------------------

/// A content pane that can be dragged or animated to reveal side panels.
#[derive(Debug)]
pub struct Drawer<S: Surface> {
    settings: Settings,
    surface: S,
    engine: TranslationEngine,
    gesture: GestureMachine,
    bus: NotificationBus<DrawerState>,
    enabled: bool,
    listening: Option<PointerEventNames>,
}

impl<S: Surface> Drawer<S> {
    // -- Public API ---------------------------------------------------------

    /// Settle the pane fully open on `side`.
    pub fn open(&mut self, side: Side) {
        self.emit(DrawerEvent::Open);
        if self.settings.add_body_classes {
            self.surface.remove_body_class(CLASS_EXPAND_LEFT);
            self.surface.remove_body_class(CLASS_EXPAND_RIGHT);
            self.mark_open_side(side);
        }
        self.gesture.preset_opening(side);
        let bound = self.settings.bound(side);
        self.animate(f64::from(bound));
    }

    /// Settle the pane closed.
    pub fn close(&mut self) {
        self.emit(DrawerEvent::Close);
        self.animate(0.0);
    }

    /// Move the pane out of view so the `side` panel fills the viewport.
    pub fn expand(&mut self, side: Side) {
        let width = self.surface.viewport_width();
        let (event, add, remove, target) = match side {
            Side::Left => (
                DrawerEvent::ExpandLeft,
                CLASS_EXPAND_LEFT,
                CLASS_EXPAND_RIGHT,
                width,
            ),
            Side::Right => (
                DrawerEvent::ExpandRight,
                CLASS_EXPAND_RIGHT,
                CLASS_EXPAND_LEFT,
                width.saturating_neg(),
            ),
        };
        self.emit(event);
        if self.settings.add_body_classes {
            self.surface.add_body_class(add);
            self.surface.remove_body_class(remove);
        }
        self.animate(f64::from(target));
    }

    /// Attach pointer listeners. The offset is left alone.
    pub fn enable(&mut self) {
        self.emit(DrawerEvent::Enable);
        self.enabled = true;
        self.attach_listeners();
    }

    /// Detach pointer listeners. A drag already in progress still finishes.
    pub fn disable(&mut self) {
        self.emit(DrawerEvent::Disable);
        self.enabled = false;
        self.detach_listeners();
    }

    /// Register `callback` for `event`, replacing any previous one.
    pub fn on(
        &mut self,
        event: DrawerEvent,
        callback: impl FnMut(DrawerEvent, &DrawerState) + 'static,
    ) -> &mut Self {
        self.bus.on(event, callback);
        self
    }

    pub fn off(&mut self, event: DrawerEvent) {
        self.bus.off(event);
    }

    #[must_use]
    pub fn state(&self) -> DrawerState {
        DrawerState {
            state: PaneState::of(self.engine.offset(), &self.settings),
            info: *self.gesture.readout(),
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Deep-merge `patch` into the settings.
    ///
    /// A rejected patch leaves the settings untouched. Listener names are
    /// re-resolved so a `clickToDrag` change takes effect at once.
    pub fn update_settings(&mut self, patch: &Value) -> Result<(), DrawerError> {
        self.settings.merge(patch)?;
        info!(patch = %patch, "settings updated");
        if self.enabled {
            self.attach_listeners();
        }
        Ok(())
    }

    // -- Host entry points --------------------------------------------------

    /// Pointer pressed on the pane.
    pub fn pointer_down(&mut self, sample: PointerSample, target: PointerTarget) -> PointerResponse {
        if !self.enabled {
            trace!("pointer-down while disabled");
            return PointerResponse::default();
        }
        let base = self
            .engine
            .pending_target()
            .unwrap_or_else(|| self.engine.offset());

        match self.gesture.pointer_down(sample, target, base, &self.settings) {
            DownOutcome::Started => {
                if self.engine.is_animating() {
                    debug!(target = base, "drag interrupts animation");
                    self.transition_finished();
                } else {
                    self.engine.clear_transition(&mut self.surface);
                }
                self.emit(DrawerEvent::Start);
            }
            DownOutcome::Ignored(_) => self.emit(DrawerEvent::Ignore),
        }
        PointerResponse::default()
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, sample: PointerSample) -> PointerResponse {
        let shown = self.engine.offset();
        match self.gesture.pointer_move(sample, shown, &self.settings) {
            MoveOutcome::Slide { offset } => {
                if self.settings.add_body_classes {
                    if shown > 0 {
                        self.mark_open_side(Side::Left);
                    } else if shown < 0 {
                        self.mark_open_side(Side::Right);
                    }
                }
                self.engine
                    .set_offset_immediate(offset, &self.settings, &mut self.surface);
                self.emit(DrawerEvent::Drag);
                PointerResponse::PREVENT
            }
            MoveOutcome::Idle
            | MoveOutcome::DragDisabled
            | MoveOutcome::Scroll
            | MoveOutcome::BelowThreshold => PointerResponse::default(),
        }
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) -> PointerResponse {
        if !self.gesture.is_dragging() {
            return PointerResponse::default();
        }
        let outcome = self.gesture.pointer_up(self.engine.offset(), &self.settings);
        self.emit(DrawerEvent::End);

        match outcome {
            ReleaseOutcome::TapToClose => {
                self.emit(DrawerEvent::Close);
                self.animate(0.0);
                PointerResponse::PREVENT
            }
            ReleaseOutcome::Settle(SettleTarget::Closed) => {
                self.animate(0.0);
                PointerResponse::default()
            }
            ReleaseOutcome::Settle(SettleTarget::Open(side)) => {
                let bound = self.settings.bound(side);
                self.animate(f64::from(bound));
                PointerResponse::default()
            }
            ReleaseOutcome::Idle | ReleaseOutcome::Unmoved => PointerResponse::default(),
        }
    }

    /// Pointer lost (touch cancelled, mouse left the pane). Settles like a
    /// release.
    pub fn pointer_cancel(&mut self) -> PointerResponse {
        if self.gesture.is_dragging() {
            debug!("gesture cancelled");
        }
        self.pointer_up()
    }

    /// Host signal: the pane's transition ended.
    pub fn transition_finished(&mut self) {
        if let Some(target) = self.engine.transition_finished(&mut self.surface) {
            self.after_animation(target);
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Committed pane offset.
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.engine.offset()
    }

    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.engine.is_animating()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        self.engine.capabilities()
    }

    #[must_use]
    pub const fn readout(&self) -> &GestureReadout {
        self.gesture.readout()
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Detach every listener and hand the element back.
    pub fn teardown(mut self) -> S {
        self.detach_listeners();
        if self.engine.is_animating() {
            let event = self.engine.capabilities().transition_end_event();
            self.surface.unlisten_transition_end(&event);
        }
        debug!("drawer torn down");
        self.surface
    }

    // -- Internals ----------------------------------------------------------

    fn emit(&mut self, event: DrawerEvent) {
        let state = self.state();
        if self.bus.dispatch(event, &state) {
            trace!(event = event.as_str(), "event dispatched");
        }
    }

    fn animate(&mut self, target: f64) {
        match self
            .engine
            .animate_to(target, &self.settings, &mut self.surface)
        {
            AnimationOutcome::Completed { target } => self.after_animation(target),
            AnimationOutcome::Started { .. } => {}
        }
    }

    fn after_animation(&mut self, target: i32) {
        if target == 0 && self.settings.add_body_classes {
            self.surface.remove_body_class(CLASS_LEFT);
            self.surface.remove_body_class(CLASS_RIGHT);
        }
        self.emit(DrawerEvent::Animated);
    }

    fn mark_open_side(&mut self, side: Side) {
        let (add, remove) = match side {
            Side::Left => (CLASS_LEFT, CLASS_RIGHT),
            Side::Right => (CLASS_RIGHT, CLASS_LEFT),
        };
        self.surface.add_body_class(add);
        self.surface.remove_body_class(remove);
    }

    fn attach_listeners(&mut self) {
        let wanted = self
            .engine
            .capabilities()
            .pointer_events(self.settings.click_to_drag);
        if wanted == self.listening {
            return;
        }
        self.detach_listeners();
        if let Some(events) = wanted {
            self.surface.listen_pointer(events);
            debug!(down = events.down, "pointer listeners attached");
        }
        self.listening = wanted;
    }

    fn detach_listeners(&mut self) {
        if let Some(events) = self.listening.take() {
            self.surface.unlisten_pointer(events);
            debug!(down = events.down, "pointer listeners detached");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
