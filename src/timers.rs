/// setTimeout-backed timing helpers for the window-bearing contexts
///
/// Only the content script and the popup use these; the background service
/// worker never sleeps or debounces.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Suspend the current async flow for `ms` milliseconds
pub async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        let scheduled = web_sys::window().and_then(|window| {
            window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                .ok()
        });
        // No window or no timer: resolve immediately rather than hang
        if scheduled.is_none() {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// A cancel-and-reschedule single-shot timer.
///
/// Each `restart` drops any pending callback and schedules a fresh one, so
/// only the last scheduled action in a burst ever fires.
pub struct DebounceTimer {
    handle: Option<i32>,
    // Held so the scheduled callback stays alive until it fires
    callback: Option<Closure<dyn FnMut()>>,
}

impl DebounceTimer {
    pub fn new() -> Self {
        DebounceTimer {
            handle: None,
            callback: None,
        }
    }

    pub fn restart<F: FnMut() + 'static>(&mut self, delay_ms: i32, action: F) {
        self.cancel();

        let callback = Closure::wrap(Box::new(action) as Box<dyn FnMut()>);
        let Some(window) = web_sys::window() else {
            log::error!("No window available to schedule timer");
            return;
        };

        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        ) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.callback = Some(callback);
            }
            Err(e) => {
                log::error!("Failed to schedule timer: {:?}", e);
            }
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

impl Default for DebounceTimer {
    fn default() -> Self {
        Self::new()
    }
}
