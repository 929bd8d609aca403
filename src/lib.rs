/// Anki Card Builder - Chrome Extension for turning page selections into flashcards
/// Built with Rust + WASM + Yew

mod card_data;
mod compose;
mod export;
mod messages;
mod observer;
mod router;
mod storage;
mod timers;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the selection observer in the content-script context
#[wasm_bindgen]
pub fn start_selection_observer() {
    observer::start();
}

// Start the event router in the background service-worker context
#[wasm_bindgen]
pub fn start_event_router() {
    router::start();
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
