//! Browser front end: the site entry point and the `PositioningMode` JavaScript class.
//!
//! ```js
//! import init, { PositioningMode } from "./positioning_mode.js";
//! await init();
//! const positioningMode = new PositioningMode();
//! positioningMode.enable(".hero-logo");
//! // drag, nudge, scale ... then Esc or:
//! positioningMode.disable();
//! ```
//!
//! All session state lives in the instance. Document listeners hold a weak
//! reference to it and are registered only while a session is live.

mod element;
mod listener;
mod overlay;

pub use element::WebDocument;

use self::listener::{release_later, EventListener};
use self::overlay::Overlay;
use crate::config::PositioningConfig;
use crate::constants::{CURSOR_GRAB, CURSOR_GRABBING};
use crate::error::PositioningError;
use crate::hud::PanelDrag;
use crate::tool::{KeyResult, PositioningTool};
use crate::types::{KeyCommand, Modifiers, Point, Rect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, MouseEvent, Node, WheelEvent};

/// Site entry point: runs once when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        // A logger is already installed by the embedding page.
        log::debug!("Console logger already initialized");
    }
    log::info!("Site script loaded");
}

/// Everything a live browser session needs besides the tool itself.
struct WebState {
    tool: PositioningTool<Element>,
    document: WebDocument,
    overlay: Option<Overlay>,
    panel_drag: Option<PanelDrag>,
    listeners: Vec<EventListener>,
}

impl WebState {
    fn refresh_overlay(&self) {
        if let (Some(overlay), Some(report)) = (&self.overlay, self.tool.position()) {
            overlay.show(&report);
        }
    }

    /// Unmounts the panel and detaches every listener, handing the closures
    /// back so they can be dropped after the current dispatch.
    fn release_ui(&mut self) -> Vec<EventListener> {
        if let Some(overlay) = self.overlay.take() {
            overlay.unmount();
        }
        self.panel_drag = None;
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener.detach();
        }
        listeners
    }
}

impl Drop for WebState {
    fn drop(&mut self) {
        self.tool.disable();
        if let Some(overlay) = self.overlay.take() {
            overlay.unmount();
        }
    }
}

type SharedState = Rc<RefCell<WebState>>;

/// Drag-to-position tool for one element at a time.
#[wasm_bindgen]
pub struct PositioningMode {
    state: SharedState,
}

#[wasm_bindgen]
impl PositioningMode {
    /// Creates an inactive tool with default options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PositioningMode, JsValue> {
        Self::build(PositioningConfig::default()).map_err(to_js_error)
    }

    /// Creates an inactive tool; `options` may name any subset of the option fields.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> Result<PositioningMode, JsValue> {
        let config = if options.is_undefined() || options.is_null() {
            PositioningConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<PositioningConfig>(options)
                .map_err(|e| to_js_error(PositioningError::InvalidConfig(e.to_string())))?
        };
        config.validate().map_err(to_js_error)?;
        Self::build(config).map_err(to_js_error)
    }

    /// Starts positioning the first element matching `selector`.
    ///
    /// A selector that matches nothing is logged and leaves the tool as it was.
    pub fn enable(&self, selector: &str) {
        if let Err(err) = enable_session(&self.state, selector) {
            log::error!("Positioning Mode: {err}");
        }
    }

    /// Ends the session, logging the final values and restoring the element.
    pub fn disable(&self) {
        let listeners = {
            let mut inner = self.state.borrow_mut();
            inner.tool.disable();
            inner.release_ui()
        };
        release_later(listeners);
    }

    /// `{ x, y, scale }` of the live session, or `null`.
    #[wasm_bindgen(js_name = getPosition)]
    pub fn get_position(&self) -> JsValue {
        let Some(report) = self.state.borrow().tool.position() else {
            log::info!("No element in positioning mode");
            return JsValue::NULL;
        };
        serde_wasm_bindgen::to_value(&report).unwrap_or_else(|err| {
            log::error!("Could not convert position: {err}");
            JsValue::NULL
        })
    }

    /// Whether a session is live.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.state.borrow().tool.is_active()
    }
}

impl PositioningMode {
    fn build(config: PositioningConfig) -> Result<PositioningMode, PositioningError> {
        let state = WebState {
            tool: PositioningTool::new(config),
            document: WebDocument::current()?,
            overlay: None,
            panel_drag: None,
            listeners: Vec::new(),
        };
        Ok(PositioningMode {
            state: Rc::new(RefCell::new(state)),
        })
    }
}

fn to_js_error(err: PositioningError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn enable_session(state: &SharedState, selector: &str) -> Result<(), PositioningError> {
    let mut inner = state.borrow_mut();
    let document = inner.document.clone();

    if let Err(err) = inner.tool.enable(&document, selector) {
        if !inner.tool.is_active() {
            let stale = inner.release_ui();
            drop(inner);
            release_later(stale);
        }
        return Err(err);
    }

    let previous = inner.release_ui();
    let mounted = mount_ui(state, &mut inner);
    if mounted.is_err() {
        inner.tool.disable();
        let partial = inner.release_ui();
        drop(inner);
        release_later(partial);
        release_later(previous);
        return mounted;
    }
    inner.refresh_overlay();
    drop(inner);
    release_later(previous);
    Ok(())
}

fn mount_ui(state: &SharedState, inner: &mut WebState) -> Result<(), PositioningError> {
    let overlay = Overlay::mount(inner.document.document(), inner.tool.config())?;
    let header: EventTarget = overlay.header().clone().into();
    inner.overlay = Some(overlay);

    let document: EventTarget = inner.document.document().clone().into();
    inner
        .listeners
        .push(listen(state, &header, "mousedown", on_panel_mouse_down)?);
    inner
        .listeners
        .push(listen(state, &document, "mousedown", on_mouse_down)?);
    inner
        .listeners
        .push(listen(state, &document, "mousemove", on_mouse_move)?);
    inner
        .listeners
        .push(listen(state, &document, "mouseup", on_mouse_up)?);
    inner
        .listeners
        .push(listen(state, &document, "keydown", on_key_down)?);
    inner
        .listeners
        .push(listen(state, &document, "wheel", on_wheel)?);
    Ok(())
}

fn listen(
    state: &SharedState,
    target: &EventTarget,
    event_type: &'static str,
    handler: fn(&SharedState, Event),
) -> Result<EventListener, PositioningError> {
    let weak = Rc::downgrade(state);
    EventListener::new(target, event_type, move |event| {
        if let Some(state) = weak.upgrade() {
            handler(&state, event);
        }
    })
}

fn client_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

fn event_node(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

fn on_panel_mouse_down(state: &SharedState, event: Event) {
    let Some(event) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let mut inner = state.borrow_mut();
    let Some(overlay) = inner.overlay.as_ref() else {
        return;
    };
    let drag = PanelDrag::begin(client_point(event), overlay.origin());
    overlay.set_header_cursor(CURSOR_GRABBING);
    inner.panel_drag = Some(drag);
    event.prevent_default();
    event.stop_propagation();
}

fn on_mouse_down(state: &SharedState, event: Event) {
    let Some(event) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let mut inner = state.borrow_mut();
    let over_target = match (inner.tool.session(), event_node(event)) {
        (Some(session), Some(node)) => session.target().contains(Some(&node)),
        _ => false,
    };
    if over_target && inner.tool.begin_drag(client_point(event)) {
        event.prevent_default();
    }
}

fn on_mouse_move(state: &SharedState, event: Event) {
    let Some(event) = event.dyn_ref::<MouseEvent>() else {
        return;
    };
    let mut inner = state.borrow_mut();
    let pointer = client_point(event);
    if let Some(drag) = inner.panel_drag {
        if let Some(overlay) = inner.overlay.as_ref() {
            overlay.move_to(drag.origin_for(pointer));
        }
        return;
    }
    if inner.tool.drag_to(pointer) {
        inner.refresh_overlay();
    }
}

fn on_mouse_up(state: &SharedState, _event: Event) {
    let mut inner = state.borrow_mut();
    if inner.panel_drag.take().is_some() {
        if let Some(overlay) = inner.overlay.as_ref() {
            overlay.set_header_cursor(CURSOR_GRAB);
        }
    }
    inner.tool.end_drag();
}

fn on_key_down(state: &SharedState, event: Event) {
    let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
        return;
    };
    let Some(command) = KeyCommand::from_dom_key(&event.key()) else {
        return;
    };
    let modifiers = Modifiers {
        shift: event.shift_key(),
    };

    let mut inner = state.borrow_mut();
    let result = inner.tool.key_down(command, modifiers);
    if result.is_handled() {
        event.prevent_default();
    }
    match result {
        KeyResult::Disabled(_) => {
            let listeners = inner.release_ui();
            drop(inner);
            release_later(listeners);
        }
        KeyResult::Handled => inner.refresh_overlay(),
        KeyResult::Ignored => {}
    }
}

fn on_wheel(state: &SharedState, event: Event) {
    let Some(event) = event.dyn_ref::<WheelEvent>() else {
        return;
    };
    let mut inner = state.borrow_mut();
    let Some(session) = inner.tool.session() else {
        return;
    };

    let bounds = session.target().get_bounding_client_rect();
    let rect = Rect {
        left: bounds.left(),
        top: bounds.top(),
        right: bounds.right(),
        bottom: bounds.bottom(),
    };
    let over_target = rect.contains(client_point(event));
    let over_panel = match (inner.overlay.as_ref(), event_node(event)) {
        (Some(overlay), Some(node)) => overlay.contains(&node),
        _ => false,
    };
    if !(over_target || over_panel) {
        return;
    }

    // Scrolling over the target is consumed even when a zero vertical delta leaves the scale alone.
    event.prevent_default();
    if inner.tool.wheel(event.delta_y()) {
        inner.refresh_overlay();
    }
}
