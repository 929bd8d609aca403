/// Runtime message protocol between the three extension contexts
///
/// Messages travel over chrome.runtime / chrome.tabs as plain JSON objects
/// tagged by `type`. Anything that fails to parse is simply not ours and is
/// ignored by every receiver.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

/// A message on the extension bus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum RuntimeMessage {
    /// Observer → Router: a debounced page selection (fire-and-forget)
    #[serde(rename = "TEXT_SELECTED")]
    TextSelected { text: String },
    /// Composer → Router: read the router's in-memory selection
    #[serde(rename = "GET_LAST_SELECTED_TEXT")]
    GetLastSelectedText,
    /// Composer → Observer (via the active tab): read the page-local selection
    #[serde(rename = "GET_SELECTED_TEXT")]
    GetSelectedText,
}

/// Response to either of the two selection queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextResponse {
    pub text: String,
}

/// Parse an incoming bus message; `None` for anything outside the protocol
pub fn parse_message(value: &JsValue) -> Option<RuntimeMessage> {
    serde_wasm_bindgen::from_value(value.clone()).ok()
}

/// Build a `{text}` response value for a synchronous message reply
pub fn text_response(text: &str) -> JsValue {
    serde_wasm_bindgen::to_value(&TextResponse {
        text: text.to_string(),
    })
    .unwrap_or(JsValue::UNDEFINED)
}

/// Extract the `text` field from a query response, if one came back at all
pub fn response_text(value: JsValue) -> Option<String> {
    serde_wasm_bindgen::from_value::<TextResponse>(value)
        .ok()
        .map(|response| response.text)
}
