//! Field Context
//!
//! The "current field" shared by every component of one token field:
//! reactive state, container element, renderers and debug logger.
//! Provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use wasm_bindgen::JsCast;
use web_sys::{AbortController, AbortSignal, CustomEvent, CustomEventInit, HtmlElement};

use crate::config::TokenFieldConfig;
use crate::error::{FieldError, Result};
use crate::input::{normalize_input, sanitize_paste};
use crate::logger::FieldLogger;
use crate::models::{FieldEvent, Suggestion, Token};
use crate::remote::{self, RequestTicket};
use crate::state::{FieldState, FieldStateStoreFields, Requery};

/// Non-`Send` parts of a field, kept in local storage.
pub struct FieldShared {
    pub id: String,
    pub container: HtmlElement,
    pub config: TokenFieldConfig,
    pub logger: FieldLogger,
    in_flight: Option<AbortController>,
}

impl FieldShared {
    pub fn new(id: String, container: HtmlElement, config: TokenFieldConfig) -> Self {
        Self {
            logger: FieldLogger::new(&id),
            id,
            container,
            config,
            in_flight: None,
        }
    }
}

#[derive(Clone, Copy)]
pub struct FieldContext {
    pub store: Store<FieldState>,
    shared: StoredValue<FieldShared, LocalStorage>,
}

impl FieldContext {
    pub fn new(store: Store<FieldState>, shared: StoredValue<FieldShared, LocalStorage>) -> Self {
        Self { store, shared }
    }

    pub fn id(&self) -> String {
        self.shared.try_with_value(|s| s.id.clone()).unwrap_or_default()
    }

    pub fn name(&self) -> String {
        self.shared
            .try_with_value(|s| s.config.options.name.clone())
            .unwrap_or_default()
    }

    pub fn log(&self, message: impl AsRef<str>) {
        self.shared.try_with_value(|s| s.logger.log(message));
    }

    pub fn set_debug(&self, enabled: bool) {
        self.shared.try_update_value(|s| s.logger.set_enabled(enabled));
    }

    pub fn render_token(&self, token: &Token) -> Option<AnyView> {
        let render = self.shared.try_with_value(|s| s.config.token_renderer.clone())?;
        Some(render(token))
    }

    pub fn render_suggestion(&self, suggestion: &Suggestion) -> Option<AnyView> {
        let render = self.shared.try_with_value(|s| s.config.suggestion_renderer.clone())?;
        Some(render(suggestion))
    }

    /// Run a transition against the store. A disposed field is a no-op.
    fn transition<U: Default>(&self, f: impl FnOnce(&mut FieldState) -> U) -> U {
        match self.store.try_write() {
            Some(mut state) => f(&mut *state),
            None => U::default(),
        }
    }

    fn dispatch(&self, events: Vec<FieldEvent>) {
        if events.is_empty() {
            return;
        }
        let Some(container) = self.shared.try_with_value(|s| s.container.clone()) else {
            return;
        };
        for event in events {
            self.log(format!("{} {:?}", event.name(), event));
            if let Err(e) = dispatch_event(&container, &event) {
                self.log(format!("failed to dispatch {}: {}", event.name(), e));
            }
        }
    }

    // ========================
    // Token Store
    // ========================

    pub fn add_token(&self, token: Token, silent: bool) {
        self.log(format!("add token {:?}", token));
        let events = self.transition(|s| s.add_token(token, silent));
        self.dispatch(events);
    }

    pub fn remove_token_at(&self, index: usize, silent: bool) {
        let events = self.transition(|s| s.remove_token_at(index, silent));
        self.dispatch(events);
    }

    pub fn remove_token_with_value(&self, value: &str, silent: bool) {
        let events = self.transition(|s| s.remove_token_with_value(value, silent));
        self.dispatch(events);
    }

    pub fn remove_token_with_text(&self, text: &str, silent: bool) {
        let events = self.transition(|s| s.remove_token_with_text(text, silent));
        self.dispatch(events);
    }

    pub fn remove_last_token(&self, silent: bool) {
        let events = self.transition(|s| s.remove_last_token(silent));
        self.dispatch(events);
    }

    pub fn clear(&self, silent: bool) {
        let events = self.transition(|s| s.clear(silent));
        self.dispatch(events);
    }

    pub fn val(&self, tokens: Vec<Token>, silent: bool) {
        let events = self.transition(|s| s.val(tokens, silent));
        self.dispatch(events);
    }

    pub fn current_tokens(&self) -> Vec<String> {
        self.store
            .tokens()
            .try_with_untracked(|t| t.current_tokens())
            .unwrap_or_default()
    }

    // ========================
    // Input Surface
    // ========================

    pub fn current_input(&self) -> String {
        self.store.input().try_get_untracked().unwrap_or_default()
    }

    pub fn set_current_input(&self, text: String, silent: bool) {
        let requery = self.transition(|s| s.set_input(text, silent));
        self.run(requery);
    }

    pub fn clear_current_input(&self) {
        self.transition(|s| s.clear_input());
        self.run(Requery::None);
    }

    pub fn set_placeholder_text(&self, text: String) {
        self.transition(|s| s.placeholder = text);
    }

    /// Copy the editable span's text into the store.
    pub fn sync_input(&self, raw: &str) {
        let text = normalize_input(raw);
        let changed = self
            .store
            .input()
            .try_with_untracked(|current| *current != text)
            .unwrap_or(false);
        if changed {
            self.transition(|s| s.sync_input(text));
        }
    }

    pub fn on_keydown(&self, ev: &web_sys::KeyboardEvent) {
        let key = ev.key();
        let outcome = self.transition(|s| s.keydown(&key));
        if outcome.prevent_default {
            ev.prevent_default();
        }
        self.dispatch(outcome.events);
    }

    pub fn on_keyup(&self, key: &str) {
        let requery = self.transition(|s| s.keyup(key));
        self.run(requery);
    }

    /// Insert pasted content as plain text only.
    pub fn on_paste(&self, ev: &web_sys::ClipboardEvent) {
        ev.prevent_default();
        let text = ev
            .clipboard_data()
            .and_then(|data| data.get_data("text/plain").ok())
            .map(|text| sanitize_paste(&text))
            .unwrap_or_default();
        if text.is_empty() {
            return;
        }

        let inserted = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .and_then(|d| d.exec_command_with_show_ui_and_value("insertText", false, &text).ok())
            .unwrap_or(false);
        if !inserted {
            let current = self.current_input();
            self.set_current_input(format!("{}{}", current, text), false);
        }
    }

    // ========================
    // Suggestion Engine
    // ========================

    pub fn select_suggestion(&self, index: usize) {
        let events = self.transition(|s| s.select_suggestion(index));
        self.dispatch(events);
    }

    pub fn highlight(&self, index: usize) {
        let already = self
            .store
            .dropdown()
            .try_with_untracked(|d| d.highlighted_index() == Some(index))
            .unwrap_or(true);
        if !already {
            self.transition(|s| s.highlight(index));
        }
    }

    /// Start the requested fetch, or abort the HTTP request once no ticket is pending.
    fn run(&self, requery: Requery) {
        match requery {
            Requery::Fetch { ticket, query } => self.fetch_suggestions(ticket, query),
            Requery::None => {
                let pending = self
                    .store
                    .requests()
                    .try_with_untracked(|r| r.in_flight())
                    .unwrap_or(false);
                if !pending {
                    self.abort_in_flight();
                }
            }
        }
    }

    fn is_current(&self, ticket: RequestTicket) -> bool {
        self.store
            .requests()
            .try_with_untracked(|r| r.is_current(ticket))
            .unwrap_or(false)
    }

    fn fetch_suggestions(&self, ticket: RequestTicket, query: String) {
        self.abort_in_flight();
        let Some((uri, delay)) = self.shared.try_with_value(|s| {
            (s.config.request_uri(&query), s.config.options.suggestion_delay_ms)
        }) else {
            return;
        };
        let Some(uri) = uri else {
            self.transition(|s| s.remote_failed(ticket));
            return;
        };

        let ctx = *self;
        spawn_local(async move {
            if delay > 0 {
                gloo_timers::future::TimeoutFuture::new(delay).await;
                if !ctx.is_current(ticket) {
                    return;
                }
            }
            let Some(signal) = ctx.replace_in_flight() else {
                return;
            };

            ctx.log(format!("requesting suggestions from {}", uri));
            match remote::fetch_completions(&uri, &signal).await {
                Ok(suggestions) => {
                    let count = suggestions.len();
                    if ctx.transition(|s| s.apply_remote(ticket, suggestions)) {
                        ctx.log(format!("loaded {} suggestions", count));
                    } else {
                        ctx.log("discarded stale suggestions");
                    }
                }
                Err(e) => {
                    ctx.transition(|s| s.remote_failed(ticket));
                    ctx.log(format!("suggestion request failed: {}", e));
                }
            }
        });
    }

    /// Abort the previous request and hand out the signal for the next one.
    fn replace_in_flight(&self) -> Option<AbortSignal> {
        let controller = AbortController::new().ok()?;
        let signal = controller.signal();
        let previous = self
            .shared
            .try_update_value(|s| s.in_flight.replace(controller))
            .flatten();
        if let Some(previous) = previous {
            previous.abort();
        }
        Some(signal)
    }

    pub fn abort_in_flight(&self) {
        let previous = self
            .shared
            .try_update_value(|s| s.in_flight.take())
            .flatten();
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

/// Fire a bubbling `CustomEvent` on the container.
fn dispatch_event(container: &HtmlElement, event: &FieldEvent) -> Result<()> {
    let detail = match event {
        FieldEvent::TokensChanged(detail) => serde_wasm_bindgen::to_value(detail),
        FieldEvent::QueryChanged(detail) => serde_wasm_bindgen::to_value(detail),
    }
    .map_err(|e| FieldError::Js(e.to_string()))?;

    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    let custom = CustomEvent::new_with_event_init_dict(event.name(), &init)?;
    container.dispatch_event(&custom)?;
    Ok(())
}
