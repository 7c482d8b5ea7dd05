/// Trailing-edge debounce over window.setTimeout

use js_sys::Function;
use wasm_bindgen::prelude::*;

/// setTimeout takes a signed delay; clamp rather than wrap
fn timeout_ms(delay_ms: u32) -> i32 {
    i32::try_from(delay_ms).unwrap_or(i32::MAX)
}

#[derive(Default)]
pub struct Debouncer {
    handle: Option<i32>,
    // Kept alive until the timeout fires or is replaced
    callback: Option<Closure<dyn FnMut()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` after `delay_ms` of quiet, dropping any call still pending
    pub fn schedule<F>(&mut self, delay_ms: u32, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.cancel();

        let Some(window) = web_sys::window() else {
            log::warn!("No window; running debounced call immediately");
            f();
            return;
        };

        let mut f = Some(f);
        let callback = Closure::wrap(Box::new(move || {
            if let Some(f) = f.take() {
                f();
            }
        }) as Box<dyn FnMut()>);

        let function: &Function = callback.as_ref().unchecked_ref();
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(function, timeout_ms(delay_ms)) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.callback = Some(callback);
            }
            Err(e) => log::warn!("setTimeout failed: {:?}", e),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                window.clear_timeout_with_handle(handle);
            }
        }
        self.callback = None;
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
