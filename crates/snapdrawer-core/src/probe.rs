#![forbid(unsafe_code)]

//! Host capability probing.
//!
//! Vendor prefixes and transform support are environment facts, not gesture
//! logic. They are resolved once at construction into a [`Capabilities`]
//! value; the engine only ever asks it for property names and a single
//! "can animate via transform" flag.
//!
//! # Fail-Open
//!
//! A host that cannot answer a probe reports no vendor and no transform
//! support. The engine then falls back to `left` positioning and completes
//! animations immediately, which is always correct if not smooth.

/// Legacy CSS vendor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Webkit,
    Moz,
    O,
    Ms,
}

impl Vendor {
    /// Probe order; the first prefix whose transition property exists wins.
    pub const PROBE_ORDER: [Self; 4] = [Self::Webkit, Self::Moz, Self::O, Self::Ms];

    /// Style-property prefix as it appears on a `CSSStyleDeclaration`.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Webkit => "webkit",
            Self::Moz => "Moz",
            Self::O => "O",
            Self::Ms => "ms",
        }
    }

    /// Find the vendor whose `<prefix>Transition` property is supported.
    ///
    /// `has_property` answers whether a camel-cased style property exists.
    pub fn detect(mut has_property: impl FnMut(&str) -> bool) -> Option<Self> {
        Self::PROBE_ORDER
            .into_iter()
            .find(|vendor| has_property(&format!("{}Transition", vendor.prefix())))
    }
}

/// DOM event names for one pointer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEventNames {
    pub down: &'static str,
    pub moving: &'static str,
    pub up: &'static str,
    pub out: &'static str,
}

impl PointerEventNames {
    pub const TOUCH: Self = Self {
        down: "touchstart",
        moving: "touchmove",
        up: "touchend",
        out: "touchcancel",
    };

    pub const MOUSE: Self = Self {
        down: "mousedown",
        moving: "mousemove",
        up: "mouseup",
        out: "mouseout",
    };
}

/// Resolved host capabilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Vendor prefix for transform/transition properties, if one is needed.
    pub vendor: Option<Vendor>,
    /// Whether the pane can be translated with a transform.
    pub can_transform: bool,
    /// Whether the host delivers touch events.
    pub has_touch: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::modern()
    }
}

impl Capabilities {
    /// Unprefixed transforms, mouse input.
    #[must_use]
    pub const fn modern() -> Self {
        Self {
            vendor: None,
            can_transform: true,
            has_touch: false,
        }
    }

    /// No transform support: the pane is positioned with `left`.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            vendor: None,
            can_transform: false,
            has_touch: false,
        }
    }

    #[must_use]
    pub const fn with_touch(mut self, has_touch: bool) -> Self {
        self.has_touch = has_touch;
        self
    }

    #[must_use]
    pub const fn with_vendor(mut self, vendor: Option<Vendor>) -> Self {
        self.vendor = vendor;
        self
    }

    fn prefixed(&self, unprefixed: &str, suffix: &str) -> String {
        match self.vendor {
            Some(vendor) => format!("{}{suffix}", vendor.prefix()),
            None => unprefixed.to_string(),
        }
    }

    /// Style property carrying the transform (`webkitTransform`, `transform`, ..).
    #[must_use]
    pub fn transform_property(&self) -> String {
        self.prefixed("transform", "Transform")
    }

    /// Style property carrying the transition.
    #[must_use]
    pub fn transition_property(&self) -> String {
        self.prefixed("transition", "Transition")
    }

    /// Event fired by the host when a transition completes.
    #[must_use]
    pub fn transition_end_event(&self) -> String {
        match self.vendor {
            Some(vendor @ (Vendor::Webkit | Vendor::O)) => {
                format!("{}TransitionEnd", vendor.prefix())
            }
            Some(Vendor::Moz | Vendor::Ms) | None => "transitionend".to_string(),
        }
    }

    /// Event names to subscribe to, or `None` when no input source applies.
    #[must_use]
    pub fn pointer_events(&self, click_to_drag: bool) -> Option<PointerEventNames> {
        if self.has_touch {
            Some(PointerEventNames::TOUCH)
        } else if click_to_drag {
            Some(PointerEventNames::MOUSE)
        } else {
            None
        }
    }
}

/// Source of [`Capabilities`] for a bound element.
pub trait CapabilityProbe {
    fn probe(&self) -> Capabilities;
}

/// Probe returning a fixed answer; for native hosts and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProbe(pub Capabilities);

impl CapabilityProbe for StaticProbe {
    fn probe(&self) -> Capabilities {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_probe_order() {
        let found = Vendor::detect(|prop| prop == "MozTransition" || prop == "msTransition");
        assert_eq!(found, Some(Vendor::Moz));
        assert_eq!(Vendor::detect(|_| false), None);
    }

    #[test]
    fn property_names_follow_vendor() {
        let caps = Capabilities::modern().with_vendor(Some(Vendor::Webkit));
        assert_eq!(caps.transform_property(), "webkitTransform");
        assert_eq!(caps.transition_property(), "webkitTransition");
        assert_eq!(caps.transition_end_event(), "webkitTransitionEnd");

        let caps = Capabilities::modern();
        assert_eq!(caps.transform_property(), "transform");
        assert_eq!(caps.transition_end_event(), "transitionend");
    }

    #[test]
    fn moz_and_ms_use_standard_transition_end() {
        for vendor in [Vendor::Moz, Vendor::Ms] {
            let caps = Capabilities::modern().with_vendor(Some(vendor));
            assert_eq!(caps.transition_end_event(), "transitionend");
        }
        let caps = Capabilities::modern().with_vendor(Some(Vendor::O));
        assert_eq!(caps.transition_end_event(), "OTransitionEnd");
    }

    #[test]
    fn touch_wins_over_mouse() {
        let caps = Capabilities::modern().with_touch(true);
        assert_eq!(caps.pointer_events(false), Some(PointerEventNames::TOUCH));

        let caps = Capabilities::modern();
        assert_eq!(caps.pointer_events(true), Some(PointerEventNames::MOUSE));
        assert_eq!(caps.pointer_events(false), None);
    }
}
