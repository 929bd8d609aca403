/// Popup UI for Anki Card Builder: the card composer
///
/// All state is rebuilt on every open: the store is reloaded from
/// chrome.storage.local and the current text is pulled from the Event Router,
/// falling back to the page itself when the router's copy is gone.

use yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use patternfly_yew::prelude::*;
use crate::card_data::{Card, CardContent};
use crate::compose::{self, GenerateMode};
use crate::export;
use crate::messages::{self, RuntimeMessage};
use crate::storage::{RetryPolicy, StoreData, StoreSnapshot, STORE_KEYS};
use crate::timers;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorageItems(keys: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorageItems(items: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendActiveTabMessage(message: JsValue) -> Result<JsValue, JsValue>;

    fn downloadFile(data: &str, filename: &str);
}

/// Defensive wait before the first storage call on popup open
const STARTUP_SETTLE_MS: i32 = 100;
/// Store load retry policy: bounded, then degrade to an empty store
const STORE_LOAD_RETRY: RetryPolicy = RetryPolicy::new(3, 100);
/// Card list rows show at most this many characters per side
const CLIP_CHARS: usize = 30;

#[derive(Clone, PartialEq)]
enum AppState {
    Loading(String),
    Idle,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Loading("Loading cards...".to_string()));
    let store = use_state(StoreData::new);
    let current_text = use_state(String::new);
    let selected_deck = use_state(String::new);
    let preview = use_state(CardContent::default);

    // Startup sequence on mount: settle, load store, resolve selection
    {
        let state = state.clone();
        let store = store.clone();
        let current_text = current_text.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match init_composer().await {
                    Ok((loaded, text)) => {
                        store.set(loaded);
                        current_text.set(text);
                        state.set(AppState::Idle);
                    }
                    Err(e) => {
                        log::error!("Error initializing popup: {}", e);
                        alert("Initialization failed, please reopen the popup.");
                        state.set(AppState::Error(e));
                    }
                }
            });
            || ()
        });
    }

    // Deck selector change
    let on_deck_change = {
        let selected_deck = selected_deck.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                selected_deck.set(select.value());
            }
        })
    };

    // Add deck handler: prompt, reject empty/duplicate names, persist
    let on_add_deck = {
        let store = store.clone();
        let state = state.clone();

        Callback::from(move |_| {
            let Some(name) = prompt_text("New deck name:") else {
                return;
            };

            let mut new_store = (*store).clone();
            if !new_store.add_deck(&name) {
                return;
            }

            store.set(new_store.clone());
            persist(new_store, state.clone());
        })
    };

    // Generation-mode handlers
    let on_generate = {
        let preview = preview.clone();
        let current_text = current_text.clone();
        move |mode: GenerateMode| {
            let preview = preview.clone();
            let current_text = current_text.clone();
            Callback::from(move |_| {
                preview.set(compose::generate_card(&current_text, mode));
            })
        }
    };

    // Add the previewed card to the list
    let on_add_card = {
        let store = store.clone();
        let state = state.clone();
        let selected_deck = selected_deck.clone();
        let preview = preview.clone();

        Callback::from(move |_| {
            if selected_deck.is_empty() {
                alert("Select a deck first!");
                return;
            }
            if !preview.has_content() {
                alert("Generate card content first!");
                return;
            }

            let mut new_store = (*store).clone();
            new_store.add_card(Card::new(
                (*selected_deck).clone(),
                preview.front.clone(),
                preview.back.clone(),
            ));

            store.set(new_store.clone());
            persist(new_store, state.clone());
        })
    };

    // Remove a card by list position
    let on_remove_card = {
        let store = store.clone();
        let state = state.clone();

        Callback::from(move |index: usize| {
            let mut new_store = (*store).clone();
            new_store.remove_card(index);

            store.set(new_store.clone());
            persist(new_store, state.clone());
        })
    };

    // Export the accumulated list as CSV
    let on_export = {
        let store = store.clone();

        Callback::from(move |_| {
            if store.cards.is_empty() {
                return;
            }
            downloadFile(&export::to_csv(&store.cards), export::EXPORT_FILENAME);
        })
    };

    let is_busy = !matches!(*state, AppState::Idle);

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Anki Card Builder"}</h1>

            // Status display
            {match &*state {
                AppState::Loading(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg}</p>
                    </div>
                },
                AppState::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                AppState::Idle => html! {}
            }}

            // Deck selector row
            <div class="deck-row">
                <select class="deck-select" onchange={on_deck_change} disabled={is_busy}>
                    <option value="" selected={selected_deck.is_empty()}>
                        {"Select a deck..."}
                    </option>
                    {for store.decks.iter().map(|deck| html! {
                        <option
                            key={deck.clone()}
                            value={deck.clone()}
                            selected={*selected_deck == *deck}
                        >
                            {deck}
                        </option>
                    })}
                </select>
                <Button onclick={on_add_deck} disabled={is_busy} variant={ButtonVariant::Secondary}>
                    {"+ New Deck"}
                </Button>
            </div>

            // Generation-mode buttons
            <div class="flex-column-gap">
                <Button onclick={on_generate(GenerateMode::Front)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Front Only"}
                </Button>
                <Button onclick={on_generate(GenerateMode::Back)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Back Only"}
                </Button>
                <Button onclick={on_generate(GenerateMode::Both)} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                    {"Split at Period"}
                </Button>
            </div>

            // Front/back preview panes
            <div class="preview-container">
                <div class="preview-pane">
                    <h3 class="preview-label">{"Front"}</h3>
                    <p class="preview-text">{&preview.front}</p>
                </div>
                <div class="preview-pane">
                    <h3 class="preview-label">{"Back"}</h3>
                    <p class="preview-text">{&preview.back}</p>
                </div>
            </div>

            <Button onclick={on_add_card} disabled={is_busy} block={true}>
                {"Add to List"}
            </Button>

            // Accumulated card list
            <div class="cards-list">
                {for store.cards.iter().enumerate().map(|(index, card)| html! {
                    <div key={index.to_string()} class="card-item">
                        <div class="card-text">
                            <strong>{&card.deck}</strong>
                            {": "}
                            {clip(&card.front)}
                            {" | "}
                            {clip(&card.back)}
                        </div>
                        <Button
                            onclick={on_remove_card.reform(move |_| index)}
                            variant={ButtonVariant::Danger}
                        >
                            {"🗑️"}
                        </Button>
                    </div>
                })}
            </div>

            <p class="card-count">
                {format!("{} cards added", store.cards.len())}
            </p>

            <Button onclick={on_export} disabled={is_busy || store.cards.is_empty()} block={true}>
                {"Export CSV"}
            </Button>
        </div>
    }
}

// Helper functions

async fn init_composer() -> Result<(StoreData, String), String> {
    timers::sleep(STARTUP_SETTLE_MS).await;

    let store = load_store(STORE_LOAD_RETRY).await;
    let text = resolve_selected_text().await?;

    Ok((store, text))
}

/// Load the store, retrying while the platform comes up; after the policy is
/// exhausted the popup proceeds with an empty store rather than failing
async fn load_store(policy: RetryPolicy) -> StoreData {
    let mut attempts_left = policy.attempts;

    loop {
        match try_load_store().await {
            Ok(store) => return store,
            Err(e) if attempts_left > 0 => {
                log::warn!("Store not readable yet ({}), retrying", e);
                attempts_left -= 1;
                timers::sleep(policy.delay_ms as i32).await;
            }
            Err(e) => {
                log::error!("Error loading store, proceeding empty: {}", e);
                return StoreData::new();
            }
        }
    }
}

async fn try_load_store() -> Result<StoreData, String> {
    let keys = serde_wasm_bindgen::to_value(&STORE_KEYS)
        .map_err(|e| format!("Failed to serialize store keys: {:?}", e))?;

    let raw = getStorageItems(keys)
        .await
        .map_err(|e| format!("Failed to read store: {:?}", e))?;

    let snapshot: StoreSnapshot = serde_wasm_bindgen::from_value(raw)
        .map_err(|e| format!("Failed to parse store: {:?}", e))?;

    Ok(StoreData::from_snapshot(snapshot))
}

/// Resolve the text to compose from. The router's in-memory copy wins, but it
/// dies with the background process; the page-local observer keeps its copy
/// alive as long as the tab is open, so query it as the fallback.
async fn resolve_selected_text() -> Result<String, String> {
    let request = serde_wasm_bindgen::to_value(&RuntimeMessage::GetLastSelectedText)
        .map_err(|e| format!("Failed to serialize query: {:?}", e))?;

    match sendRuntimeMessage(request).await {
        Ok(response) => {
            if let Some(text) = messages::response_text(response) {
                if !text.is_empty() {
                    return Ok(text);
                }
            }
        }
        Err(e) => {
            log::warn!("Router selection query failed: {:?}", e);
        }
    }

    let request = serde_wasm_bindgen::to_value(&RuntimeMessage::GetSelectedText)
        .map_err(|e| format!("Failed to serialize query: {:?}", e))?;

    match sendActiveTabMessage(request).await {
        Ok(response) => Ok(messages::response_text(response).unwrap_or_default()),
        Err(e) => {
            log::warn!("Active tab selection query failed: {:?}", e);
            Ok(String::new())
        }
    }
}

async fn save_store(store: &StoreData) -> Result<(), String> {
    let items = serde_wasm_bindgen::to_value(store)
        .map_err(|e| format!("Failed to serialize store: {:?}", e))?;

    setStorageItems(items)
        .await
        .map_err(|e| format!("Failed to save store: {:?}", e))
}

/// Every mutation writes the whole store back immediately
fn persist(store: StoreData, state: UseStateHandle<AppState>) {
    spawn_local(async move {
        if let Err(e) = save_store(&store).await {
            log::error!("Error saving store: {}", e);
            state.set(AppState::Error(e));
        }
    });
}

fn clip(text: &str) -> String {
    let mut clipped: String = text.chars().take(CLIP_CHARS).collect();
    if clipped.len() < text.len() {
        clipped.push_str("...");
    }
    clipped
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn prompt_text(message: &str) -> Option<String> {
    web_sys::window()?.prompt_with_message(message).ok().flatten()
}
