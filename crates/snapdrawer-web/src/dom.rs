#![forbid(unsafe_code)]

//! Browser binding: a [`Surface`] over a DOM element and the `SnapDrawer`
//! class exported to JavaScript.
//!
//! ```js
//! const snapper = new SnapDrawer({ element: document.getElementById('content') });
//! snapper.on('animated', () => console.log(snapper.state()));
//! snapper.open('left');
//! ```
//!
//! DOM listeners hold a weak handle to the drawer. JavaScript callbacks
//! registered with `on` never run while the drawer is borrowed: lifecycle
//! events are queued during an operation and delivered once it returns, so a
//! callback may call straight back into the same instance.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use js_sys::{Function, JSON, Object, Reflect};
use serde_json::Value;
use snapdrawer_core::geometry::to_pixels;
use snapdrawer_core::probe::PointerEventNames;
use snapdrawer_core::{
    Capabilities, CapabilityProbe, DrawerBuilder, DrawerError, DrawerEvent, DrawerState,
    PointerSample, PointerTarget, Settings, Side, Surface, Vendor,
};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlElement, MouseEvent, Node, TouchEvent};

use crate::input::page_coordinate;
use crate::pointer::{MOUSE_POINTER_ID, PointerAdapter, PointerDispatch};

type Listener = Closure<dyn FnMut(Event)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DomPhase {
    Down,
    Move,
    Up,
    Out,
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

fn drawer_error(err: &DrawerError) -> JsValue {
    js_error(&err.to_string())
}

fn document_body() -> Option<HtmlElement> {
    web_sys::window()?.document()?.body()
}

// ---------------------------------------------------------------------------
// DomSurface
// ---------------------------------------------------------------------------

/// [`Surface`] over the content pane element.
pub struct DomSurface {
    element: HtmlElement,
    style: JsValue,
    sink: Weak<Shared>,
    pointer_listeners: Vec<(&'static str, Listener)>,
    blur_listener: Option<Listener>,
    transition_listener: Option<(String, Listener)>,
}

impl fmt::Debug for DomSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer: Vec<&str> = self.pointer_listeners.iter().map(|(name, _)| *name).collect();
        f.debug_struct("DomSurface")
            .field("pointer_listeners", &pointer)
            .field("blur_listener", &self.blur_listener.is_some())
            .field(
                "transition_listener",
                &self.transition_listener.as_ref().map(|(name, _)| name),
            )
            .finish_non_exhaustive()
    }
}

impl DomSurface {
    fn new(element: HtmlElement, sink: Weak<Shared>) -> Self {
        // Style writes go through reflection so vendor-prefixed names work.
        let style = Reflect::get(element.as_ref(), &JsValue::from_str("style"))
            .unwrap_or(JsValue::UNDEFINED);
        Self {
            element,
            style,
            sink,
            pointer_listeners: Vec::new(),
            blur_listener: None,
            transition_listener: None,
        }
    }

    fn listener(&self, handler: fn(&Rc<Shared>, &Event)) -> Listener {
        let sink = self.sink.clone();
        Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(shared) = sink.upgrade() {
                handler(&shared, &event);
            }
        })
    }

    fn remove_listener(&self, name: &str, listener: &Listener) {
        if let Err(err) = self
            .element
            .remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
        {
            warn!(event = name, error = ?err, "listener removal failed");
        }
    }
}

impl Surface for DomSurface {
    fn set_style(&mut self, property: &str, value: &str) {
        if Reflect::set(
            &self.style,
            &JsValue::from_str(property),
            &JsValue::from_str(value),
        )
        .is_err()
        {
            warn!(property, "style write rejected");
        }
    }

    fn add_body_class(&mut self, class: &str) {
        if let Some(body) = document_body()
            && let Err(err) = body.class_list().add_1(class)
        {
            warn!(class, error = ?err, "body class add failed");
        }
    }

    fn remove_body_class(&mut self, class: &str) {
        if let Some(body) = document_body()
            && let Err(err) = body.class_list().remove_1(class)
        {
            warn!(class, error = ?err, "body class removal failed");
        }
    }

    fn listen_pointer(&mut self, events: PointerEventNames) {
        let handlers: [(&'static str, fn(&Rc<Shared>, &Event)); 4] = [
            (events.down, |shared, event| Shared::on_pointer(shared, DomPhase::Down, event)),
            (events.moving, |shared, event| Shared::on_pointer(shared, DomPhase::Move, event)),
            (events.up, |shared, event| Shared::on_pointer(shared, DomPhase::Up, event)),
            (events.out, |shared, event| Shared::on_pointer(shared, DomPhase::Out, event)),
        ];
        for (name, handler) in handlers {
            let listener = self.listener(handler);
            if let Err(err) = self
                .element
                .add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())
            {
                warn!(event = name, error = ?err, "listener attach failed");
                continue;
            }
            self.pointer_listeners.push((name, listener));
        }

        // Losing window focus mid-drag never delivers the release.
        if self.blur_listener.is_none()
            && let Some(window) = web_sys::window()
        {
            let listener = self.listener(Shared::on_blur);
            match window.add_event_listener_with_callback("blur", listener.as_ref().unchecked_ref())
            {
                Ok(()) => self.blur_listener = Some(listener),
                Err(err) => warn!(error = ?err, "blur listener attach failed"),
            }
        }
    }

    fn unlisten_pointer(&mut self, _events: PointerEventNames) {
        for (name, listener) in std::mem::take(&mut self.pointer_listeners) {
            self.remove_listener(name, &listener);
        }
        if let Some(listener) = self.blur_listener.take()
            && let Some(window) = web_sys::window()
            && let Err(err) = window
                .remove_event_listener_with_callback("blur", listener.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "blur listener removal failed");
        }
    }

    fn listen_transition_end(&mut self, event: &str) {
        if let Some((name, _)) = &self.transition_listener
            && name == event
        {
            return;
        }
        if let Some((name, listener)) = self.transition_listener.take() {
            self.remove_listener(&name, &listener);
        }
        let listener = self.listener(Shared::on_transition_end);
        match self
            .element
            .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        {
            Ok(()) => self.transition_listener = Some((event.to_string(), listener)),
            Err(err) => warn!(event, error = ?err, "transition listener attach failed"),
        }
    }

    fn unlisten_transition_end(&mut self, event: &str) {
        if let Some((name, listener)) = self.transition_listener.take() {
            if name == event {
                self.remove_listener(&name, &listener);
            } else {
                self.transition_listener = Some((name, listener));
            }
        }
    }

    fn viewport_width(&self) -> i32 {
        let inner = web_sys::window()
            .and_then(|window| window.inner_width().ok())
            .and_then(|width| width.as_f64());
        match inner {
            Some(width) => to_pixels(width),
            None => web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.document_element())
                .map_or(0, |root| root.client_width()),
        }
    }
}

// ---------------------------------------------------------------------------
// Capability probe
// ---------------------------------------------------------------------------

/// Reads transform support and the vendor prefix from a live element.
#[derive(Debug, Clone)]
pub struct DomProbe {
    element: HtmlElement,
}

impl DomProbe {
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }
}

impl CapabilityProbe for DomProbe {
    fn probe(&self) -> Capabilities {
        let style = Reflect::get(self.element.as_ref(), &JsValue::from_str("style")).ok();
        let has_property = |property: &str| {
            style.as_ref().is_some_and(|style| {
                Reflect::has(style, &JsValue::from_str(property)).unwrap_or(false)
            })
        };
        let has_touch = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .is_some_and(|root| {
                Reflect::has(root.as_ref(), &JsValue::from_str("ontouchstart")).unwrap_or(false)
            });

        let mut caps = Capabilities::modern()
            .with_vendor(Vendor::detect(has_property))
            .with_touch(has_touch);
        caps.can_transform = has_property(&caps.transform_property());
        debug!(?caps, "dom capabilities probed");
        caps
    }
}

// ---------------------------------------------------------------------------
// Event translation
// ---------------------------------------------------------------------------

fn is_touch(event: &Event) -> bool {
    event.type_().starts_with("touch")
}

fn pointer_id_of(event: &Event) -> u32 {
    if is_touch(event) {
        event
            .unchecked_ref::<TouchEvent>()
            .changed_touches()
            .get(0)
            .map_or(MOUSE_POINTER_ID, |touch| touch.identifier().unsigned_abs())
    } else {
        MOUSE_POINTER_ID
    }
}

fn page_position(event: &Event) -> Option<PointerSample> {
    let (first_touch, has_touches, page) = if is_touch(event) {
        let first = event.unchecked_ref::<TouchEvent>().touches().get(0);
        let coords = first.map(|touch| (f64::from(touch.page_x()), f64::from(touch.page_y())));
        (coords, coords.is_some(), None)
    } else {
        let mouse = event.unchecked_ref::<MouseEvent>();
        (None, false, Some((f64::from(mouse.page_x()), f64::from(mouse.page_y()))))
    };
    let x = page_coordinate(first_touch.map(|c| c.0), has_touches, page.map(|c| c.0))?;
    let y = page_coordinate(first_touch.map(|c| c.1), has_touches, page.map(|c| c.1))?;
    Some(PointerSample::new(x, y))
}

/// Whether `node` or an ancestor carries a non-empty `attribute`.
fn has_marked_ancestor(mut node: Option<Element>, attribute: &str) -> bool {
    while let Some(element) = node {
        if element
            .get_attribute(attribute)
            .is_some_and(|value| !value.is_empty())
        {
            return true;
        }
        node = element.parent_element();
    }
    false
}

/// Whether a `mouseout` took the pointer outside `pane`. Moving onto a
/// child element also fires `mouseout`, and children's events bubble up.
fn left_pane(event: &Event, pane: &HtmlElement) -> bool {
    let related = event
        .unchecked_ref::<MouseEvent>()
        .related_target()
        .and_then(|target| target.dyn_into::<Node>().ok());
    !related.is_some_and(|node| pane.contains(Some(&node)))
}

fn pointer_target(event: &Event, settings: &Settings) -> PointerTarget {
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    PointerTarget {
        in_ignore_region: has_marked_ancestor(target.clone(), &settings.ignore_attribute),
        in_drag_handle: settings
            .dragger
            .as_deref()
            .is_some_and(|attribute| has_marked_ancestor(target, attribute)),
    }
}

fn state_to_js(state: &DrawerState) -> JsValue {
    serde_json::to_string(state)
        .ok()
        .and_then(|json| JSON::parse(&json).ok())
        .unwrap_or(JsValue::UNDEFINED)
}

fn parse_side(name: &str) -> Result<Side, JsValue> {
    match name {
        "left" => Ok(Side::Left),
        "right" => Ok(Side::Right),
        other => Err(js_error(&format!("unknown side: {other}"))),
    }
}

fn parse_event(name: &str) -> Result<DrawerEvent, JsValue> {
    name.parse::<DrawerEvent>()
        .map_err(|err| js_error(&err.to_string()))
}

/// Options object minus `element`, as JSON.
fn options_to_json(options: &JsValue) -> Result<Value, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    let copy = Object::assign(&Object::new(), options.unchecked_ref());
    Reflect::delete_property(&copy, &JsValue::from_str("element"))?;
    let json: String = JSON::stringify(&copy)?.into();
    serde_json::from_str(&json).map_err(|err| js_error(&err.to_string()))
}

// ---------------------------------------------------------------------------
// Shared instance state
// ---------------------------------------------------------------------------

type Outbox = Rc<RefCell<VecDeque<(DrawerEvent, DrawerState)>>>;

struct Shared {
    adapter: RefCell<Option<PointerAdapter<DomSurface>>>,
    callbacks: RefCell<Vec<(DrawerEvent, Function)>>,
    outbox: Outbox,
}

impl Shared {
    /// Run `f` against the drawer, then deliver queued lifecycle events.
    fn with_adapter<R>(
        self: &Rc<Self>,
        f: impl FnOnce(&mut PointerAdapter<DomSurface>) -> R,
    ) -> Option<R> {
        let result = {
            let Ok(mut slot) = self.adapter.try_borrow_mut() else {
                warn!("re-entrant drawer access dropped");
                return None;
            };
            f(slot.as_mut()?)
        };
        self.flush();
        Some(result)
    }

    fn flush(&self) {
        loop {
            let next = self.outbox.borrow_mut().pop_front();
            let Some((event, state)) = next else {
                break;
            };
            let callback = self
                .callbacks
                .borrow()
                .iter()
                .find(|(registered, _)| *registered == event)
                .map(|(_, callback)| callback.clone());
            if let Some(callback) = callback
                && let Err(err) = callback.call1(&JsValue::NULL, &state_to_js(&state))
            {
                warn!(event = event.as_str(), error = ?err, "callback threw");
            }
        }
    }

    fn on_pointer(self: &Rc<Self>, phase: DomPhase, event: &Event) {
        let dispatch = self.with_adapter(|adapter| -> Option<PointerDispatch> {
            let pointer_id = pointer_id_of(event);
            match phase {
                DomPhase::Down => {
                    let position = page_position(event)?;
                    let target = pointer_target(event, adapter.drawer().settings());
                    Some(adapter.pointer_down(pointer_id, position, target))
                }
                DomPhase::Move => {
                    let position = page_position(event)?;
                    Some(adapter.pointer_move(pointer_id, position))
                }
                DomPhase::Up => Some(adapter.pointer_up(pointer_id)),
                DomPhase::Out if is_touch(event) => Some(adapter.pointer_cancel(Some(pointer_id))),
                DomPhase::Out => {
                    let pane = &adapter.drawer().surface().element;
                    if !left_pane(event, pane) {
                        return None;
                    }
                    Some(adapter.pointer_leave(pointer_id))
                }
            }
        });
        if let Some(Some(dispatch)) = dispatch
            && dispatch.response.prevent_default
        {
            event.prevent_default();
        }
    }

    fn on_blur(self: &Rc<Self>, _event: &Event) {
        self.with_adapter(|adapter| {
            adapter.blur();
        });
    }

    fn on_transition_end(self: &Rc<Self>, event: &Event) {
        self.with_adapter(|adapter| {
            // Transitions of descendants bubble up to the pane too.
            let pane: &JsValue = adapter.drawer().surface().element.as_ref();
            if event.target().map(JsValue::from).as_ref() == Some(pane) {
                adapter.drawer_mut().transition_finished();
            }
        });
    }
}

// ---------------------------------------------------------------------------
// JavaScript API
// ---------------------------------------------------------------------------

/// Drawer bound to a DOM element.
#[wasm_bindgen]
pub struct SnapDrawer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl SnapDrawer {
    /// `new SnapDrawer({ element, ...settings })`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<SnapDrawer, JsValue> {
        let element = Reflect::get(&options, &JsValue::from_str("element"))
            .ok()
            .and_then(|value| value.dyn_into::<HtmlElement>().ok());
        let settings = options_to_json(&options)?;

        let shared = Rc::new(Shared {
            adapter: RefCell::new(None),
            callbacks: RefCell::new(Vec::new()),
            outbox: Rc::new(RefCell::new(VecDeque::new())),
        });

        let mut builder = DrawerBuilder::new().options(settings);
        if let Some(element) = element {
            builder = builder
                .probe(&DomProbe::new(element.clone()))
                .element(DomSurface::new(element, Rc::downgrade(&shared)));
        }
        let drawer = builder.build().map_err(|err| drawer_error(&err))?;
        *shared.adapter.borrow_mut() = Some(PointerAdapter::new(drawer));
        Ok(Self { shared })
    }

    pub fn open(&self, side: &str) -> Result<(), JsValue> {
        let side = parse_side(side)?;
        self.shared.with_adapter(|adapter| adapter.drawer_mut().open(side));
        Ok(())
    }

    pub fn close(&self) {
        self.shared.with_adapter(|adapter| adapter.drawer_mut().close());
    }

    /// Anything other than `"left"` expands to the right.
    pub fn expand(&self, side: &str) {
        let side = if side == "left" { Side::Left } else { Side::Right };
        self.shared
            .with_adapter(|adapter| adapter.drawer_mut().expand(side));
    }

    pub fn enable(&self) {
        self.shared.with_adapter(|adapter| adapter.drawer_mut().enable());
    }

    pub fn disable(&self) {
        self.shared
            .with_adapter(|adapter| adapter.drawer_mut().disable());
    }

    /// Register `callback` for `event`, replacing any previous one.
    pub fn on(&self, event: &str, callback: Function) -> Result<(), JsValue> {
        let event = parse_event(event)?;
        {
            let mut callbacks = self.shared.callbacks.borrow_mut();
            callbacks.retain(|(registered, _)| *registered != event);
            callbacks.push((event, callback));
        }
        let outbox = Rc::clone(&self.shared.outbox);
        self.shared.with_adapter(|adapter| {
            adapter.drawer_mut().on(event, move |event, state| {
                outbox.borrow_mut().push_back((event, *state));
            });
        });
        Ok(())
    }

    pub fn off(&self, event: &str) -> Result<(), JsValue> {
        let event = parse_event(event)?;
        self.shared
            .callbacks
            .borrow_mut()
            .retain(|(registered, _)| *registered != event);
        self.shared
            .with_adapter(|adapter| adapter.drawer_mut().off(event));
        Ok(())
    }

    /// Whether a pointer gesture is in progress.
    #[wasm_bindgen(getter, js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.shared
            .with_adapter(|adapter| adapter.drawer().is_dragging())
            .unwrap_or(false)
    }

    /// `{ state: 'left' | 'right' | 'closed', info: {..} }`
    pub fn state(&self) -> JsValue {
        self.shared
            .with_adapter(|adapter| state_to_js(&adapter.drawer().state()))
            .unwrap_or(JsValue::UNDEFINED)
    }

    /// Deep-merge `options` into the settings.
    pub fn settings(&self, options: JsValue) -> Result<(), JsValue> {
        let patch = options_to_json(&options)?;
        self.shared
            .with_adapter(|adapter| adapter.drawer_mut().update_settings(&patch))
            .unwrap_or(Ok(()))
            .map_err(|err| drawer_error(&err))
    }

    /// Detach every listener. Later calls are no-ops.
    pub fn destroy(&self) {
        let adapter = self.shared.adapter.borrow_mut().take();
        if let Some(adapter) = adapter {
            let _surface = adapter.into_drawer().teardown();
            debug!("snap drawer destroyed");
        }
        self.shared.callbacks.borrow_mut().clear();
    }
}
