#![forbid(unsafe_code)]

//! Translation engine: the only writer of the pane's position.
//!
//! [`TranslationEngine`] owns the committed horizontal offset and the single
//! in-flight animation, if any. Position writes go through one of two paths:
//!
//! - **Immediate** ([`set_offset_immediate`](TranslationEngine::set_offset_immediate)):
//!   used for every drag sample; commits the offset at once.
//! - **Animated** ([`animate_to`](TranslationEngine::animate_to)): writes a
//!   transition plus the target position and arms the host's transition-end
//!   listener. The offset is committed when the host reports completion via
//!   [`transition_finished`](TranslationEngine::transition_finished).
//!
//! # Invariants
//!
//! 1. Every written offset is an integer pixel value; NaN becomes 0.
//! 2. Without `hyperextensible`, written offsets lie in
//!    `[min_position, max_position]`.
//! 3. An offset whose sign is forbidden by the side lock is never written.
//! 4. At most one animation is pending. A new `animate_to` re-targets it and
//!    completion commits only the latest target.
//!
//! # Failure Modes
//!
//! - Hosts without transform support get `left` positioning and animations
//!   that complete synchronously.
//! - Animating to the offset already shown (closing a closed pane, opening
//!   towards a locked side) completes synchronously as well: the host would
//!   never report a finished transition.
//! - A transition-end signal with nothing pending is ignored.

use crate::geometry::to_pixels;
use crate::logging::{debug, trace};
use crate::probe::Capabilities;
use crate::settings::Settings;
use crate::surface::Surface;

/// Result of [`TranslationEngine::animate_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    /// A transition is running; completion arrives via the host.
    Started { target: i32 },
    /// The offset was committed synchronously (no transform support, or
    /// the target was already shown).
    Completed { target: i32 },
}

impl AnimationOutcome {
    #[must_use]
    pub const fn target(self) -> i32 {
        match self {
            Self::Started { target } | Self::Completed { target } => target,
        }
    }
}

/// Owner of the committed pane offset.
#[derive(Debug, Clone)]
pub struct TranslationEngine {
    caps: Capabilities,
    offset: i32,
    pending: Option<i32>,
}

impl TranslationEngine {
    #[must_use]
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            offset: 0,
            pending: None,
        }
    }

    /// Last committed offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> i32 {
        self.offset
    }

    #[inline]
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.pending.is_some()
    }

    /// Target of the in-flight animation.
    #[must_use]
    pub const fn pending_target(&self) -> Option<i32> {
        self.pending
    }

    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    /// Apply the side lock, bounds clamp and pixel truncation to `n`.
    ///
    /// Returns `None` when the side lock forbids the offset.
    #[must_use]
    pub fn resolve(&self, n: f64, settings: &Settings) -> Option<i32> {
        if settings.disable.forbids(n) {
            return None;
        }
        let px = to_pixels(n);
        if settings.hyperextensible {
            Some(px)
        } else {
            Some(px.clamp(settings.min_position, settings.max_position))
        }
    }

    /// Write `n` as the pane position right away and commit it.
    ///
    /// Returns the written offset, or `None` if the side lock rejected it.
    pub fn set_offset_immediate<S: Surface + ?Sized>(
        &mut self,
        n: f64,
        settings: &Settings,
        surface: &mut S,
    ) -> Option<i32> {
        let Some(px) = self.resolve(n, settings) else {
            debug!(offset = n, lock = ?settings.disable, "offset rejected by side lock");
            return None;
        };
        self.write_position(px, surface);
        self.offset = px;
        trace!(offset = px, "offset set");
        Some(px)
    }

    /// Start an eased transition towards `n`.
    ///
    /// A forbidden target keeps the pane where it is. When nothing is in
    /// flight and the target is already shown, no style changes and no
    /// transition-end signal will follow, so the call completes at once.
    pub fn animate_to<S: Surface + ?Sized>(
        &mut self,
        n: f64,
        settings: &Settings,
        surface: &mut S,
    ) -> AnimationOutcome {
        let target = self.resolve(n, settings).unwrap_or(self.offset);

        if !self.caps.can_transform {
            self.write_position(target, surface);
            if target == 0 {
                self.clear_position(surface);
            }
            self.offset = target;
            self.pending = None;
            debug!(target, "animation completed without transform support");
            return AnimationOutcome::Completed { target };
        }

        if self.pending.is_none() && target == self.offset {
            if target == 0 {
                self.clear_position(surface);
            }
            debug!(target, "animation target already shown");
            return AnimationOutcome::Completed { target };
        }

        surface.set_style(&self.caps.transition_property(), &settings.transition_css());
        surface.listen_transition_end(&self.caps.transition_end_event());
        self.write_position(target, surface);
        if target == 0 {
            self.clear_position(surface);
        }
        if self.pending.replace(target).is_some() {
            debug!(target, "animation re-targeted");
        } else {
            debug!(from = self.offset, target, "animation started");
        }
        AnimationOutcome::Started { target }
    }

    /// Host signal: the running transition finished.
    ///
    /// Commits the pending target and disarms the listener. Returns the
    /// committed offset, or `None` if nothing was animating.
    pub fn transition_finished<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<i32> {
        let target = self.pending.take()?;
        surface.set_style(&self.caps.transition_property(), "");
        surface.unlisten_transition_end(&self.caps.transition_end_event());
        self.offset = target;
        debug!(offset = target, "animation finished");
        Some(target)
    }

    /// Remove any transition so subsequent writes apply instantly.
    pub fn clear_transition<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_style(&self.caps.transition_property(), "");
    }

    fn write_position<S: Surface + ?Sized>(&self, px: i32, surface: &mut S) {
        if self.caps.can_transform {
            surface.set_style(
                &self.caps.transform_property(),
                &format!("translate3d({px}px, 0, 0)"),
            );
        } else {
            let width = surface.viewport_width();
            surface.set_style("width", &format!("{width}px"));
            surface.set_style("left", &format!("{px}px"));
            surface.set_style("right", "");
        }
    }

    fn clear_position<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.caps.can_transform {
            surface.set_style(&self.caps.transform_property(), "");
        } else {
            surface.set_style("left", "");
            surface.set_style("width", "");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SideLock;
    use crate::surface::MemorySurface;

    fn engine() -> TranslationEngine {
        TranslationEngine::new(Capabilities::modern())
    }

    fn clamped() -> Settings {
        Settings {
            hyperextensible: false,
            ..Settings::default()
        }
    }

    #[test]
    fn immediate_offset_is_written_and_committed() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        assert_eq!(
            engine.set_offset_immediate(120.7, &Settings::default(), &mut surface),
            Some(120)
        );
        assert_eq!(engine.offset(), 120);
        assert_eq!(surface.style("transform"), Some("translate3d(120px, 0, 0)"));
    }

    #[test]
    fn clamps_without_hyperextension() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = clamped();
        assert_eq!(engine.set_offset_immediate(500.0, &settings, &mut surface), Some(266));
        assert_eq!(engine.set_offset_immediate(-500.0, &settings, &mut surface), Some(-266));
    }

    #[test]
    fn hyperextension_allows_overshoot() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        assert_eq!(
            engine.set_offset_immediate(500.0, &Settings::default(), &mut surface),
            Some(500)
        );
    }

    #[test]
    fn side_lock_makes_writes_no_ops() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings {
            disable: SideLock::Left,
            ..Settings::default()
        };
        assert_eq!(engine.set_offset_immediate(40.0, &settings, &mut surface), None);
        assert_eq!(engine.offset(), 0);
        assert_eq!(surface.style_writes(), 0);
        assert_eq!(engine.set_offset_immediate(-40.0, &settings, &mut surface), Some(-40));
    }

    #[test]
    fn nan_offsets_become_zero() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        assert_eq!(
            engine.set_offset_immediate(f64::NAN, &Settings::default(), &mut surface),
            Some(0)
        );
    }

    #[test]
    fn animation_commits_on_completion() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings::default();

        let outcome = engine.animate_to(266.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Started { target: 266 });
        assert!(engine.is_animating());
        assert_eq!(engine.offset(), 0);
        assert_eq!(surface.style("transition"), Some("all 0.3s ease"));
        assert_eq!(surface.transition_listener(), Some("transitionend"));

        assert_eq!(engine.transition_finished(&mut surface), Some(266));
        assert!(!engine.is_animating());
        assert_eq!(engine.offset(), 266);
        assert_eq!(surface.style("transition"), None);
        assert_eq!(surface.transition_listener(), None);

        // A stray completion signal changes nothing.
        assert_eq!(engine.transition_finished(&mut surface), None);
    }

    #[test]
    fn retarget_keeps_last_write() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings::default();
        engine.animate_to(266.0, &settings, &mut surface);
        engine.animate_to(-266.0, &settings, &mut surface);
        assert_eq!(engine.pending_target(), Some(-266));
        assert_eq!(engine.transition_finished(&mut surface), Some(-266));
    }

    #[test]
    fn animating_to_zero_clears_transform() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings::default();
        engine.set_offset_immediate(100.0, &settings, &mut surface);
        engine.animate_to(0.0, &settings, &mut surface);
        assert_eq!(surface.style("transform"), None);
        assert_eq!(engine.transition_finished(&mut surface), Some(0));
    }

    #[test]
    fn legacy_hosts_position_with_left_and_complete_immediately() {
        let mut engine = TranslationEngine::new(Capabilities::legacy());
        let mut surface = MemorySurface::new(800);
        let settings = Settings::default();

        let outcome = engine.animate_to(-100.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Completed { target: -100 });
        assert!(!engine.is_animating());
        assert_eq!(engine.offset(), -100);
        assert_eq!(surface.style("left"), Some("-100px"));
        assert_eq!(surface.style("width"), Some("800px"));
        assert_eq!(surface.style("transform"), None);

        engine.animate_to(0.0, &settings, &mut surface);
        assert_eq!(surface.style("left"), None);
    }

    #[test]
    fn animating_to_the_shown_offset_completes_at_once() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings::default();

        let outcome = engine.animate_to(0.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Completed { target: 0 });
        assert!(!engine.is_animating());
        assert_eq!(surface.transition_listener(), None);
        assert_eq!(surface.style("transition"), None);

        engine.set_offset_immediate(266.0, &settings, &mut surface);
        let outcome = engine.animate_to(266.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Completed { target: 266 });
        assert_eq!(surface.style("transform"), Some("translate3d(266px, 0, 0)"));
    }

    #[test]
    fn locked_target_completes_at_once() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings {
            disable: SideLock::Left,
            ..Settings::default()
        };
        let outcome = engine.animate_to(266.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Completed { target: 0 });
        assert!(!engine.is_animating());
        assert_eq!(surface.transition_listener(), None);
    }

    #[test]
    fn returning_to_the_committed_offset_mid_flight_still_animates() {
        let mut engine = engine();
        let mut surface = MemorySurface::default();
        let settings = Settings::default();
        engine.animate_to(266.0, &settings, &mut surface);
        let outcome = engine.animate_to(0.0, &settings, &mut surface);
        assert_eq!(outcome, AnimationOutcome::Started { target: 0 });
        assert_eq!(engine.transition_finished(&mut surface), Some(0));
    }

    #[test]
    fn vendor_prefixed_properties() {
        let caps = Capabilities::modern().with_vendor(Some(crate::probe::Vendor::Webkit));
        let mut engine = TranslationEngine::new(caps);
        let mut surface = MemorySurface::default();
        engine.animate_to(50.0, &Settings::default(), &mut surface);
        assert_eq!(surface.style("webkitTransform"), Some("translate3d(50px, 0, 0)"));
        assert_eq!(surface.transition_listener(), Some("webkitTransitionEnd"));
    }
}
