#![forbid(unsafe_code)]

//! Notification bus: one optional callback per lifecycle event.
//!
//! Registration overwrites: the last callback registered for an event is the
//! only one that runs. Dispatching an event with no callback does nothing.
//! Event kinds are a closed enum; string names exist only for hosts that
//! receive them from JavaScript.

use std::fmt;
use std::str::FromStr;

use crate::error::UnknownEventName;

/// Lifecycle moments announced by a drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawerEvent {
    /// A drag session started.
    Start,
    /// The pane followed a move sample.
    Drag,
    /// A drag session was released.
    End,
    /// A pointer-down was ignored (ignore region or outside the drag handle).
    Ignore,
    Open,
    Close,
    ExpandLeft,
    ExpandRight,
    /// A settle animation finished.
    Animated,
    Enable,
    Disable,
}

impl DrawerEvent {
    pub const ALL: [Self; 11] = [
        Self::Start,
        Self::Drag,
        Self::End,
        Self::Ignore,
        Self::Open,
        Self::Close,
        Self::ExpandLeft,
        Self::ExpandRight,
        Self::Animated,
        Self::Enable,
        Self::Disable,
    ];

    /// Event name as used by the JavaScript API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Drag => "drag",
            Self::End => "end",
            Self::Ignore => "ignore",
            Self::Open => "open",
            Self::Close => "close",
            Self::ExpandLeft => "expandLeft",
            Self::ExpandRight => "expandRight",
            Self::Animated => "animated",
            Self::Enable => "enable",
            Self::Disable => "disable",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DrawerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawerEvent {
    type Err = UnknownEventName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == name)
            .ok_or_else(|| UnknownEventName(name.to_string()))
    }
}

type Callback<T> = Box<dyn FnMut(DrawerEvent, &T)>;

/// Single-subscriber callback registry keyed by [`DrawerEvent`].
///
/// `T` is the payload handed to callbacks; drawers pass their current
/// [`crate::DrawerState`] so listeners never need to call back in.
pub struct NotificationBus<T> {
    slots: [Option<Callback<T>>; DrawerEvent::ALL.len()],
}

impl<T> Default for NotificationBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NotificationBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<&str> = DrawerEvent::ALL
            .into_iter()
            .filter(|event| self.is_registered(*event))
            .map(DrawerEvent::as_str)
            .collect();
        f.debug_struct("NotificationBus")
            .field("registered", &registered)
            .finish()
    }
}

impl<T> NotificationBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Register `callback` for `event`, replacing any previous one.
    pub fn on(&mut self, event: DrawerEvent, callback: impl FnMut(DrawerEvent, &T) + 'static) {
        self.slots[event.index()] = Some(Box::new(callback));
    }

    /// Remove the callback for `event`, if any.
    pub fn off(&mut self, event: DrawerEvent) {
        self.slots[event.index()] = None;
    }

    #[must_use]
    pub fn is_registered(&self, event: DrawerEvent) -> bool {
        self.slots[event.index()].is_some()
    }

    /// Invoke the callback for `event`. Returns whether one ran.
    pub fn dispatch(&mut self, event: DrawerEvent, payload: &T) -> bool {
        match self.slots[event.index()].as_mut() {
            Some(callback) => {
                callback(event, payload);
                true
            }
            None => false,
        }
    }
}
