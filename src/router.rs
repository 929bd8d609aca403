/// Event Router: background service-worker side of the extension
///
/// Holds the single most-recent selection in process memory, relays it on
/// demand to the popup, owns the context-menu entry, and initializes the
/// persistent store on install/update.

use crate::messages::{self, RuntimeMessage};
use crate::storage::{self, StoreData, StoreSnapshot, STORE_KEYS};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    fn onRuntimeMessage(handler: &js_sys::Function);

    fn onInstalled(handler: &js_sys::Function);

    fn createContextMenu(id: &str, title: &str);

    fn onContextMenuClicked(handler: &js_sys::Function);

    #[wasm_bindgen(catch)]
    async fn openPopup() -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorageItems(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorageItems(items: JsValue) -> Result<(), JsValue>;
}

const CONTEXT_MENU_ID: &str = "generateAnkiCard";
// Localized label, treated as opaque
const CONTEXT_MENU_TITLE: &str = "生成Anki卡片";

/// Single-slot, last-write-wins holder for the most recent selection.
///
/// Lives only as long as the background process; a restart resets it to
/// empty, which is why the popup falls back to querying the page directly.
pub struct SelectionMailbox {
    text: String,
}

impl SelectionMailbox {
    pub fn new() -> Self {
        SelectionMailbox {
            text: String::new(),
        }
    }

    pub fn set(&mut self, text: String) {
        self.text = text;
    }

    pub fn get(&self) -> &str {
        &self.text
    }
}

impl Default for SelectionMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// One-way command to surface the popup; failures are logged and discarded
fn surface_composer() {
    spawn_local(async {
        if let Err(e) = openPopup().await {
            log::debug!("Popup not surfaced: {:?}", e);
        }
    });
}

/// First-run store initialization: write both keys as empty sequences when
/// either is absent, leave existing data alone otherwise
async fn bootstrap_store() {
    let keys = match serde_wasm_bindgen::to_value(&STORE_KEYS) {
        Ok(keys) => keys,
        Err(e) => {
            log::error!("Failed to serialize store keys: {:?}", e);
            return;
        }
    };

    let snapshot: StoreSnapshot = match getStorageItems(keys).await {
        Ok(raw) => serde_wasm_bindgen::from_value(raw).unwrap_or_else(|e| {
            log::error!("Malformed store contents, reinitializing: {:?}", e);
            StoreSnapshot::default()
        }),
        Err(e) => {
            log::error!("Error reading store during bootstrap: {:?}", e);
            return;
        }
    };

    let Some(initial) = storage::bootstrap_plan(&snapshot) else {
        return;
    };

    if let Err(e) = write_store(&initial).await {
        log::error!("Error initializing store: {}", e);
    }
}

async fn write_store(store: &StoreData) -> Result<(), String> {
    let items = serde_wasm_bindgen::to_value(store)
        .map_err(|e| format!("Failed to serialize store: {:?}", e))?;

    setStorageItems(items)
        .await
        .map_err(|e| format!("Failed to write store: {:?}", e))
}

/// Register all background listeners
pub fn start() {
    let mailbox = Rc::new(RefCell::new(SelectionMailbox::new()));

    // Message bus: selection notifications overwrite the mailbox and surface
    // the popup; mailbox queries are answered synchronously
    let on_message = {
        let mailbox = mailbox.clone();
        Closure::wrap(Box::new(move |message: JsValue| -> JsValue {
            match messages::parse_message(&message) {
                Some(RuntimeMessage::TextSelected { text }) => {
                    mailbox.borrow_mut().set(text);
                    surface_composer();
                    JsValue::UNDEFINED
                }
                Some(RuntimeMessage::GetLastSelectedText) => {
                    messages::text_response(mailbox.borrow().get())
                }
                _ => JsValue::UNDEFINED,
            }
        }) as Box<dyn FnMut(JsValue) -> JsValue>)
    };
    onRuntimeMessage(on_message.as_ref().unchecked_ref());
    on_message.forget();

    // Install/update: context menu entry, then storage bootstrap
    let on_installed = Closure::wrap(Box::new(move || {
        createContextMenu(CONTEXT_MENU_ID, CONTEXT_MENU_TITLE);
        spawn_local(bootstrap_store());
    }) as Box<dyn FnMut()>);
    onInstalled(on_installed.as_ref().unchecked_ref());
    on_installed.forget();

    // A menu click on a right-click selection behaves exactly like a
    // TEXT_SELECTED notification
    let on_menu_click = {
        let mailbox = mailbox.clone();
        Closure::wrap(Box::new(move |menu_id: String, selection_text: String| {
            if menu_id == CONTEXT_MENU_ID {
                mailbox.borrow_mut().set(selection_text);
                surface_composer();
            }
        }) as Box<dyn FnMut(String, String)>)
    };
    onContextMenuClicked(on_menu_click.as_ref().unchecked_ref());
    on_menu_click.forget();

    log::debug!("Event router started");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailbox_starts_empty() {
        let mailbox = SelectionMailbox::new();
        assert_eq!(mailbox.get(), "");
    }

    #[test]
    fn test_mailbox_returns_last_write() {
        let mut mailbox = SelectionMailbox::new();

        mailbox.set("first".to_string());
        assert_eq!(mailbox.get(), "first");

        mailbox.set("second".to_string());
        assert_eq!(mailbox.get(), "second");
    }

    #[test]
    fn test_mailbox_keeps_empty_overwrite() {
        let mut mailbox = SelectionMailbox::new();
        mailbox.set("something".to_string());

        mailbox.set(String::new());

        assert_eq!(mailbox.get(), "");
    }
}
