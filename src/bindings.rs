//! JavaScript Bindings
//!
//! `new TokenAutocomplete({ selector: "#tags", ... })` for host pages that do
//! not use Rust. Function-valued options (`tokenRenderer`,
//! `suggestionRenderer`, `suggestionsUriBuilder`) may return an element or an
//! HTML string.

use js_sys::{Array, Function, Reflect};
use leptos::prelude::*;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{FieldOptions, TokenFieldConfig};
use crate::error::FieldError;
use crate::field::{self, TokenFieldHandle};
use crate::models::{Suggestion, Token};

fn js_function(options: &JsValue, key: &str) -> Option<Function> {
    Reflect::get(options, &JsValue::from_str(key))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
}

/// Call a user renderer and wrap its output (element or HTML string).
fn js_render<T: Serialize>(render: &Function, arg: &T, class: &'static str) -> AnyView {
    let html = serde_wasm_bindgen::to_value(arg)
        .ok()
        .and_then(|js| render.call1(&JsValue::NULL, &js).ok())
        .map(|out| match out.dyn_ref::<web_sys::Element>() {
            Some(element) => element.outer_html(),
            None => out.as_string().unwrap_or_default(),
        })
        .unwrap_or_default();
    view! { <span class=class inner_html=html></span> }.into_any()
}

fn js_strings(value: &JsValue) -> Vec<String> {
    if Array::is_array(value) {
        Array::from(value).iter().filter_map(|v| v.as_string()).collect()
    } else {
        value.as_string().into_iter().collect()
    }
}

#[wasm_bindgen(js_name = TokenAutocomplete)]
pub struct JsTokenAutocomplete {
    handle: TokenFieldHandle,
}

#[wasm_bindgen(js_class = TokenAutocomplete)]
impl JsTokenAutocomplete {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JsTokenAutocomplete, JsValue> {
        console_error_panic_hook::set_once();

        let parsed: FieldOptions = serde_wasm_bindgen::from_value(options.clone())
            .map_err(|e| FieldError::InvalidOptions(e.to_string()))?;
        let mut config = TokenFieldConfig::new(parsed);

        if let Some(render) = js_function(&options, "tokenRenderer") {
            config = config.with_token_renderer(move |token: &Token| {
                js_render(&render, token, "token-autocomplete-token-label")
            });
        }
        if let Some(render) = js_function(&options, "suggestionRenderer") {
            config = config.with_suggestion_renderer(move |suggestion: &Suggestion| {
                js_render(&render, suggestion, "token-autocomplete-suggestion-text")
            });
        }
        if let Some(build) = js_function(&options, "suggestionsUriBuilder") {
            config = config.with_uri_builder(move |query: &str| {
                build
                    .call1(&JsValue::NULL, &JsValue::from_str(query))
                    .ok()
                    .and_then(|uri| uri.as_string())
                    .unwrap_or_default()
            });
        }

        let handle = field::attach(config)?;
        Ok(Self { handle })
    }

    /// Replace all tokens with one value or an array of values.
    pub fn val(&self, value: JsValue, silent: Option<bool>) {
        self.handle.val(&js_strings(&value), silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = addToken)]
    pub fn add_token(&self, value: String, text: String, kind: Option<String>, silent: Option<bool>) {
        let token = Token::new(value, text).with_kind(kind);
        self.handle.add_token(token, silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = removeTokenWithText)]
    pub fn remove_token_with_text(&self, text: String, silent: Option<bool>) {
        self.handle.remove_token_with_text(&text, silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = removeTokenWithValue)]
    pub fn remove_token_with_value(&self, value: String, silent: Option<bool>) {
        self.handle.remove_token_with_value(&value, silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = removeLastToken)]
    pub fn remove_last_token(&self, silent: Option<bool>) {
        self.handle.remove_last_token(silent.unwrap_or(false));
    }

    pub fn clear(&self, silent: Option<bool>) {
        self.handle.clear(silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = currentTokens)]
    pub fn current_tokens(&self) -> Array {
        self.handle
            .current_tokens()
            .into_iter()
            .map(JsValue::from)
            .collect()
    }

    #[wasm_bindgen(js_name = getCurrentInput)]
    pub fn get_current_input(&self) -> String {
        self.handle.current_input()
    }

    #[wasm_bindgen(js_name = setCurrentInput)]
    pub fn set_current_input(&self, text: String, silent: Option<bool>) {
        self.handle.set_current_input(text, silent.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = clearCurrentInput)]
    pub fn clear_current_input(&self) {
        self.handle.clear_current_input();
    }

    #[wasm_bindgen(js_name = setPlaceholderText)]
    pub fn set_placeholder_text(&self, text: String) {
        self.handle.set_placeholder_text(text);
    }

    pub fn debug(&self, enabled: bool) {
        self.handle.debug(enabled);
    }

    pub fn detach(&self) {
        self.handle.detach();
    }
}

/// Instance attached to the container with this id, if any.
#[wasm_bindgen(js_name = findTokenAutocomplete)]
pub fn find_token_autocomplete(container_id: String) -> Option<JsTokenAutocomplete> {
    field::find(&container_id).map(|handle| JsTokenAutocomplete { handle })
}
