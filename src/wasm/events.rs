//! Event listener registration with removal on drop.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget};

/// Listeners owned by the effect.
///
/// Each closure stays alive while registered and is removed from its
/// target on drop, so tearing the effect down stops event delivery
/// instead of leaking forgotten callbacks.
#[derive(Default)]
pub struct Subscriptions {
    listeners: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `event` on `target` and retain it.
    pub fn add(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(callback) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        self.listeners.push((target.clone(), event, closure));
        Ok(())
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for (target, event, closure) in self.listeners.drain(..) {
            let _ =
                target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}
