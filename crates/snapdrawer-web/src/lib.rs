#![forbid(unsafe_code)]

//! `snapdrawer-web` binds a [`snapdrawer_core::Drawer`] to the browser.
//!
//! - [`pointer`]: single-pointer adapter that filters raw pointer/touch
//!   signals before they reach the drawer and logs every decision.
//! - [`input`]: JSON pointer records for hosts that batch or replay events.
//! - `dom` (wasm32 only): the `SnapDrawer` class exported to JavaScript and
//!   the DOM-backed [`snapdrawer_core::Surface`].
//!
//! Everything except `dom` builds on native targets, so gesture handling can
//! be tested without a browser.

pub mod input;
pub mod pointer;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use input::{InputParseError, PointerInput, PointerInputKind, parse_pointer_input};
pub use pointer::{
    MOUSE_POINTER_ID, PointerAdapter, PointerDispatch, PointerIgnoredReason,
    PointerLifecyclePhase, PointerLogEntry, PointerLogOutcome,
};

#[cfg(target_arch = "wasm32")]
pub use dom::{DomProbe, DomSurface, SnapDrawer};
