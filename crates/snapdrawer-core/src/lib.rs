// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: drag-gesture state machine and translation engine for side drawers.
//!
//! # Role in snapdrawer
//! `snapdrawer-core` owns everything that decides where a content pane sits:
//! gesture classification, resistance at the travel limits, settle decisions
//! on release, and the animated translation itself. It never talks to a
//! browser directly; hosts implement [`surface::Surface`] and feed pointer
//! samples into a [`drawer::Drawer`].
//!
//! # Primary responsibilities
//! - **Drawer**: one instance per bound pane, public open/close/expand API.
//! - **GestureMachine**: pointer sample → offset decisions.
//! - **TranslationEngine**: the only writer of the pane's position style.
//! - **NotificationBus**: typed lifecycle callbacks.
//! - **Capabilities**: transform support and vendor property names.
//!
//! # How it fits in the system
//! `snapdrawer-web` wraps a [`drawer::Drawer`] around a DOM element and
//! translates browser pointer/touch events into [`geometry::PointerSample`]
//! values. Native hosts and tests drive the same drawer with
//! [`surface::MemorySurface`].

pub mod bus;
pub mod drawer;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod probe;
pub mod settings;
pub mod surface;
pub mod translate;

pub use bus::{DrawerEvent, NotificationBus};
pub use drawer::{Drawer, DrawerBuilder, DrawerState, PaneState, PointerResponse};
pub use error::{ConfigError, DrawerError, UnknownEventName};
pub use geometry::{Direction, PointerSample, Side};
pub use gesture::{GestureReadout, Translation};
pub use probe::{Capabilities, CapabilityProbe, StaticProbe, Vendor};
pub use settings::{Settings, SideLock};
pub use surface::{MemorySurface, PointerTarget, Surface};
