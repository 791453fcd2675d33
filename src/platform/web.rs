//! Browser glue (WASM only)

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::scheduler::{FrameHandle, FrameHost};

/// Route `log` to the browser console and panics to `console.error`
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Wall-clock milliseconds
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Frame callback slot, filled once the game loop closure exists
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame`-backed frame host
pub struct AnimationFrameHost {
    callback: FrameCallback,
}

impl AnimationFrameHost {
    pub fn new(callback: FrameCallback) -> Self {
        Self { callback }
    }
}

impl FrameHost for AnimationFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        let id = web_sys::window().and_then(|window| {
            let slot = self.callback.borrow();
            let closure = slot.as_ref()?;
            window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .ok()
        });
        match id {
            Some(id) => FrameHandle(id as u64),
            None => {
                log::warn!("requestAnimationFrame unavailable");
                FrameHandle(0)
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0 as i32);
        }
    }
}
