//! DOM event listeners that unregister themselves when dropped

use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// Every listener one mounted field registered
#[derive(Default)]
pub struct Listeners {
    active: Vec<Listener>,
}

impl Listeners {
    pub fn add(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        self.active.push(Listener {
            target: target.clone(),
            kind,
            closure,
        });
        Ok(())
    }

    /// Unregister and drop everything
    pub fn clear(&mut self) {
        self.active.clear();
    }
}
