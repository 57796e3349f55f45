//! Event listener registrations that can be detached without dropping their closure.

use super::element::dom_error;
use crate::error::PositioningError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

/// A callback registered on an event target.
///
/// Dropping it removes the registration. [`EventListener::detach`] removes it
/// early while keeping the closure alive, which is what a listener that ends
/// its own session needs: the closure must outlive the dispatch it is running in.
pub struct EventListener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
    attached: bool,
}

impl EventListener {
    /// Registers `callback` for `event_type` as a non-passive listener, so it may cancel
    /// the default action (wheel scrolling included).
    pub fn new<F>(target: &EventTarget, event_type: &'static str, callback: F) -> Result<Self, PositioningError>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_type,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| dom_error(&format!("addEventListener({event_type})"), e))?;
        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
            attached: true,
        })
    }

    /// Removes the registration. Safe to call more than once.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("{}", dom_error(&format!("removeEventListener({})", self.event_type), err));
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Drops detached listeners once the current event dispatch has finished.
pub fn release_later(listeners: Vec<EventListener>) {
    if listeners.is_empty() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        log::trace!("Releasing {} listener closures", listeners.len());
        drop(listeners);
    });
}
