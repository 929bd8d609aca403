/// Selection Observer: content-script side of the extension
///
/// Watches mouseup events on the hosted page, debounces qualifying text
/// selections, and forwards the last one in a burst to the Event Router.
/// Also answers GET_SELECTED_TEXT queries from the popup with the page-local
/// value, which survives background restarts as long as the page is open.

use crate::messages::{self, RuntimeMessage};
use crate::timers::DebounceTimer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/content.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    fn onRuntimeMessage(handler: &js_sys::Function);
}

/// Quiet period a selection burst must survive before it is forwarded
const SELECTION_DEBOUNCE_MS: i32 = 500;

struct ObserverState {
    last_selection: String,
    debounce: DebounceTimer,
}

impl ObserverState {
    fn new() -> Self {
        ObserverState {
            last_selection: String::new(),
            debounce: DebounceTimer::new(),
        }
    }
}

/// A selection is forwarded only when non-empty and different from the last
/// captured one; anything else leaves the debounce timer untouched
fn qualifies(text: &str, last_selection: &str) -> bool {
    !text.is_empty() && text != last_selection
}

/// Read the current page selection, trimmed
fn current_selection() -> String {
    web_sys::window()
        .and_then(|window| window.get_selection().ok().flatten())
        .map(|selection| String::from(selection.to_string()).trim().to_string())
        .unwrap_or_default()
}

fn forward_selection(text: String) {
    spawn_local(async move {
        let message = RuntimeMessage::TextSelected { text };
        let payload = match serde_wasm_bindgen::to_value(&message) {
            Ok(payload) => payload,
            Err(e) => {
                log::error!("Failed to serialize selection message: {:?}", e);
                return;
            }
        };

        if let Err(e) = sendRuntimeMessage(payload).await {
            log::error!("Error sending selection: {:?}", e);
        }
    });
}

/// Attach the mouseup listener and the query responder
pub fn start() {
    let state = Rc::new(RefCell::new(ObserverState::new()));

    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::error!("No document available; selection observer not started");
        return;
    };

    let on_mouseup = {
        let state = state.clone();
        Closure::wrap(Box::new(move |_event: web_sys::MouseEvent| {
            let text = current_selection();
            let mut observer = state.borrow_mut();

            if !qualifies(&text, &observer.last_selection) {
                return;
            }

            observer.last_selection = text.clone();
            observer
                .debounce
                .restart(SELECTION_DEBOUNCE_MS, move || forward_selection(text.clone()));
        }) as Box<dyn FnMut(web_sys::MouseEvent)>)
    };

    if let Err(e) =
        document.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref())
    {
        log::error!("Failed to attach mouseup listener: {:?}", e);
        return;
    }
    on_mouseup.forget();

    // Synchronous responder: replies with the local slot, independent of
    // whether the value was ever forwarded upstream
    let responder = {
        let state = state.clone();
        Closure::wrap(Box::new(move |message: JsValue| -> JsValue {
            match messages::parse_message(&message) {
                Some(RuntimeMessage::GetSelectedText) => {
                    messages::text_response(&state.borrow().last_selection)
                }
                _ => JsValue::UNDEFINED,
            }
        }) as Box<dyn FnMut(JsValue) -> JsValue>)
    };
    onRuntimeMessage(responder.as_ref().unchecked_ref());
    responder.forget();

    log::debug!("Selection observer started");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonempty_new_selection_qualifies() {
        assert!(qualifies("fresh text", ""));
        assert!(qualifies("fresh text", "older text"));
    }

    #[test]
    fn test_empty_selection_never_qualifies() {
        assert!(!qualifies("", ""));
        assert!(!qualifies("", "older text"));
    }

    #[test]
    fn test_repeated_selection_does_not_qualify() {
        assert!(!qualifies("same text", "same text"));
    }
}
