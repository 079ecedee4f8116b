#![forbid(unsafe_code)]

//! Host surface: everything a drawer needs from the element it is bound to.
//!
//! The core never touches a DOM. A [`Surface`] writes style properties on the
//! pane, toggles state classes on the document body, and subscribes or
//! unsubscribes the pointer and transition-end listeners. `snapdrawer-web`
//! implements it over `web-sys`; [`MemorySurface`] implements it in memory
//! for headless hosts and tests.

use std::collections::{BTreeMap, BTreeSet};

use crate::probe::PointerEventNames;

/// Host-side facts about the element a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerTarget {
    /// Target or an ancestor carries the ignore attribute.
    pub in_ignore_region: bool,
    /// Target is inside the configured drag handle.
    pub in_drag_handle: bool,
}

/// Element bound to a drawer.
pub trait Surface {
    /// Set a camel-cased style property on the pane; an empty value clears it.
    fn set_style(&mut self, property: &str, value: &str);

    fn add_body_class(&mut self, class: &str);

    fn remove_body_class(&mut self, class: &str);

    /// Attach pointer listeners for the given event names.
    fn listen_pointer(&mut self, events: PointerEventNames);

    /// Detach pointer listeners previously attached with the same names.
    fn unlisten_pointer(&mut self, events: PointerEventNames);

    /// Arm the single-shot transition-end listener.
    fn listen_transition_end(&mut self, event: &str);

    fn unlisten_transition_end(&mut self, event: &str);

    /// Width of the viewport in pixels, used by `expand`.
    fn viewport_width(&self) -> i32;
}

/// In-memory [`Surface`] that records the current element state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySurface {
    styles: BTreeMap<String, String>,
    body_classes: BTreeSet<String>,
    pointer_listeners: Option<PointerEventNames>,
    transition_listener: Option<String>,
    viewport_width: i32,
    style_writes: usize,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl MemorySurface {
    #[must_use]
    pub fn new(viewport_width: i32) -> Self {
        Self {
            styles: BTreeMap::new(),
            body_classes: BTreeSet::new(),
            pointer_listeners: None,
            transition_listener: None,
            viewport_width,
            style_writes: 0,
        }
    }

    /// Current value of a style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.contains(class)
    }

    /// Body classes in sorted order.
    pub fn body_classes(&self) -> impl Iterator<Item = &str> {
        self.body_classes.iter().map(String::as_str)
    }

    /// Pointer events currently subscribed.
    #[must_use]
    pub const fn pointer_listeners(&self) -> Option<PointerEventNames> {
        self.pointer_listeners
    }

    /// Transition-end event currently armed.
    #[must_use]
    pub fn transition_listener(&self) -> Option<&str> {
        self.transition_listener.as_deref()
    }

    /// Number of style writes so far, including clears.
    #[must_use]
    pub const fn style_writes(&self) -> usize {
        self.style_writes
    }

    pub fn set_viewport_width(&mut self, width: i32) {
        self.viewport_width = width;
    }
}

impl Surface for MemorySurface {
    fn set_style(&mut self, property: &str, value: &str) {
        self.style_writes += 1;
        if value.is_empty() {
            self.styles.remove(property);
        } else {
            self.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn add_body_class(&mut self, class: &str) {
        self.body_classes.insert(class.to_string());
    }

    fn remove_body_class(&mut self, class: &str) {
        self.body_classes.remove(class);
    }

    fn listen_pointer(&mut self, events: PointerEventNames) {
        self.pointer_listeners = Some(events);
    }

    fn unlisten_pointer(&mut self, events: PointerEventNames) {
        if self.pointer_listeners == Some(events) {
            self.pointer_listeners = None;
        }
    }

    fn listen_transition_end(&mut self, event: &str) {
        self.transition_listener = Some(event.to_string());
    }

    fn unlisten_transition_end(&mut self, event: &str) {
        if self.transition_listener.as_deref() == Some(event) {
            self.transition_listener = None;
        }
    }

    fn viewport_width(&self) -> i32 {
        self.viewport_width
    }
}
