//! requestAnimationFrame loop with cancellation

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Re-schedules itself once per display frame until cancelled or until the
/// step function returns `false`
pub struct FrameDriver {
    callback: Rc<RefCell<Option<FrameCallback>>>,
    request_id: Rc<Cell<Option<i32>>>,
}

impl FrameDriver {
    pub fn start(mut step: impl FnMut(f64) -> bool + 'static) -> Self {
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let request_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let callback_tick = callback.clone();
        let request_tick = request_id.clone();
        *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
            request_tick.set(None);
            if step(time) {
                request_tick.set(request_frame(&callback_tick));
            }
        }));
        request_id.set(request_frame(&callback));

        Self {
            callback,
            request_id,
        }
    }

    /// Cancel the pending frame and release the loop closure
    pub fn cancel(&self) {
        if let Some(id) = self.request_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        self.callback.borrow_mut().take();
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(callback: &Rc<RefCell<Option<FrameCallback>>>) -> Option<i32> {
    let window = web_sys::window()?;
    let callback = callback.borrow();
    let closure = callback.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}
