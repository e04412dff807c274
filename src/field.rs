//! Token Field Lifecycle
//!
//! Attaching a field to a container, the public handle API, and the
//! process-wide registry of live fields.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::reactive::owner::Owner;
use reactive_stores::Store;
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlOptionElement};

use crate::components::TokenFieldView;
use crate::config::TokenFieldConfig;
use crate::context::{FieldContext, FieldShared};
use crate::error::{FieldError, Result};
use crate::models::{Suggestion, SuggestionSeed, Token, TokenSeed};
use crate::registry::Registry;
use crate::state::FieldState;

thread_local! {
    static FIELDS: RefCell<Registry<TokenFieldHandle>> = RefCell::new(Registry::new());
}

struct FieldInstance {
    ctx: FieldContext,
    owner: Owner,
    mount: RefCell<Option<Box<dyn Any>>>,
}

/// Live token field. Cheap to clone; all clones refer to the same field.
#[derive(Clone)]
pub struct TokenFieldHandle {
    inner: Rc<FieldInstance>,
}

/// Build a field inside the element matched by `config.options.selector`.
///
/// The only fallible operation of the widget: a selector that matches nothing
/// is reported instead of swallowed.
pub fn attach(mut config: TokenFieldConfig) -> Result<TokenFieldHandle> {
    let selector = config.options.selector.clone();
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FieldError::Js("no document available".to_string()))?;
    let container: HtmlElement = document
        .query_selector(&selector)?
        .ok_or_else(|| FieldError::SelectorNotFound(selector.clone()))?
        .dyn_into()
        .map_err(|_| FieldError::NotAnHtmlElement(selector.clone()))?;

    container.class_list().add_1("token-autocomplete-container")?;

    if config.options.initial_tokens.is_none() && config.options.initial_suggestions.is_none() {
        let (tokens, suggestions) = take_options(&container)?;
        config.options.initial_tokens = Some(tokens.into_iter().map(TokenSeed::Token).collect());
        config.options.initial_suggestions =
            Some(suggestions.into_iter().map(SuggestionSeed::Suggestion).collect());
    }

    let id = match container.id() {
        id if id.is_empty() => {
            let id = FIELDS.with(|f| {
                f.borrow_mut().next_id(|id| {
                    [String::new(), "-input".to_string(), "-select".to_string()]
                        .iter()
                        .any(|suffix| document.get_element_by_id(&format!("{}{}", id, suffix)).is_some())
                })
            });
            container.set_id(&id);
            id
        }
        id => id,
    };

    if let Some(previous) = find(&id) {
        previous.detach();
    }

    let initial_tokens = config.options.initial_tokens();
    let state = FieldState::new(config.settings(), config.options.placeholder());

    let owner = Owner::new();
    let ctx = owner.with(|| {
        let store = Store::new(state);
        let shared = StoredValue::new_local(FieldShared::new(id.clone(), container.clone(), config));
        FieldContext::new(store, shared)
    });
    ctx.val(initial_tokens, true);

    let mount = owner.with(|| {
        leptos::mount::mount_to(container.clone(), move || view! { <TokenFieldView ctx=ctx /> })
    });

    let handle = TokenFieldHandle {
        inner: Rc::new(FieldInstance {
            ctx,
            owner,
            mount: RefCell::new(Some(Box::new(mount))),
        }),
    };
    FIELDS.with(|f| f.borrow_mut().register(id.clone(), handle.clone()));
    ctx.log(format!("attached to {}", selector));
    Ok(handle)
}

/// Live field attached to the container with this id.
pub fn find(container_id: &str) -> Option<TokenFieldHandle> {
    FIELDS.with(|f| f.borrow().get(container_id))
}

/// Collect `<option>` children as seed tokens (selected ones) and suggestions
/// (all of them), removing them from the DOM.
fn take_options(container: &HtmlElement) -> Result<(Vec<Token>, Vec<Suggestion>)> {
    let nodes = container.query_selector_all("option")?;
    let mut tokens = Vec::new();
    let mut suggestions = Vec::new();

    for i in 0..nodes.length() {
        let Some(option) = nodes.item(i).and_then(|n| n.dyn_into::<HtmlOptionElement>().ok()) else {
            continue;
        };
        let text = option.text();
        let value = option.value();
        let kind = option.get_attribute("data-type");

        if option.has_attribute("selected") {
            tokens.push(Token::new(value.clone(), text.clone()).with_kind(kind.clone()));
        }
        suggestions.push(Suggestion {
            id: None,
            value,
            text,
            kind,
            description: option.get_attribute("data-description"),
        });
        option.remove();
    }

    Ok((tokens, suggestions))
}

impl TokenFieldHandle {
    pub fn id(&self) -> String {
        self.inner.ctx.id()
    }

    /// Replace all tokens with free-text tokens (value = text).
    pub fn val<S: AsRef<str>>(&self, values: &[S], silent: bool) {
        let tokens = values.iter().map(|v| Token::from_text(v.as_ref())).collect();
        self.inner.ctx.val(tokens, silent);
    }

    pub fn val_tokens(&self, tokens: Vec<Token>, silent: bool) {
        self.inner.ctx.val(tokens, silent);
    }

    pub fn add_token(&self, token: Token, silent: bool) {
        self.inner.ctx.add_token(token, silent);
    }

    pub fn remove_token_with_value(&self, value: &str, silent: bool) {
        self.inner.ctx.remove_token_with_value(value, silent);
    }

    pub fn remove_token_with_text(&self, text: &str, silent: bool) {
        self.inner.ctx.remove_token_with_text(text, silent);
    }

    pub fn remove_last_token(&self, silent: bool) {
        self.inner.ctx.remove_last_token(silent);
    }

    pub fn clear(&self, silent: bool) {
        self.inner.ctx.clear(silent);
    }

    pub fn current_tokens(&self) -> Vec<String> {
        self.inner.ctx.current_tokens()
    }

    pub fn current_input(&self) -> String {
        self.inner.ctx.current_input()
    }

    /// Non-silent updates refresh the suggestions as if the text was typed.
    pub fn set_current_input(&self, text: impl Into<String>, silent: bool) {
        self.inner.ctx.set_current_input(text.into(), silent);
    }

    pub fn clear_current_input(&self) {
        self.inner.ctx.clear_current_input();
    }

    pub fn set_placeholder_text(&self, text: impl Into<String>) {
        self.inner.ctx.set_placeholder_text(text.into());
    }

    pub fn debug(&self, enabled: bool) {
        self.inner.ctx.set_debug(enabled);
    }

    /// Unmount the field and drop it from the registry.
    pub fn detach(&self) {
        let id = self.id();
        let removed = FIELDS.with(|f| {
            f.borrow_mut()
                .remove_if(&id, |h| Rc::ptr_eq(&h.inner, &self.inner))
        });
        drop(removed);

        self.inner.ctx.log("detached");
        self.inner.ctx.abort_in_flight();
        let mount = self.inner.mount.borrow_mut().take();
        drop(mount);
        self.inner.owner.cleanup();
    }
}
