//! Token Field Component
//!
//! Root view mounted into the container: chips, the editable span, the hidden
//! multi-select mirroring the tokens, and the suggestion dropdown.

use leptos::html::Span;
use leptos::prelude::*;

use crate::components::{SuggestionDropdown, TokenChip};
use crate::context::FieldContext;
use crate::state::FieldStateStoreFields;

#[component]
pub fn TokenFieldView(ctx: FieldContext) -> impl IntoView {
    provide_context(ctx);
    let store = ctx.store;
    let id = ctx.id();
    let input_ref: NodeRef<Span> = NodeRef::new();

    // Push programmatic input changes into the editable span. Typed text is
    // already equal here, so the caret is left alone.
    Effect::new(move |_| {
        let text = store.input().get();
        if let Some(node) = input_ref.get() {
            if node.text_content().unwrap_or_default() != text {
                node.set_text_content(Some(&text));
            }
        }
    });

    let read_input = move || {
        if let Some(node) = input_ref.get_untracked() {
            ctx.sync_input(&node.text_content().unwrap_or_default());
        }
    };

    let indexed_tokens = move || {
        store
            .tokens()
            .get()
            .tokens()
            .iter()
            .cloned()
            .enumerate()
            .collect::<Vec<_>>()
    };

    view! {
        <For
            each=indexed_tokens
            key=|(index, token)| (*index, token.value.clone())
            children=move |(index, token)| view! { <TokenChip token=token index=index /> }
        />
        <span
            id=format!("{}-input", id)
            class="token-autocomplete-input"
            contenteditable="true"
            data-placeholder=move || store.placeholder().get()
            node_ref=input_ref
            on:input=move |_| read_input()
            on:keydown=move |ev: web_sys::KeyboardEvent| {
                read_input();
                ctx.on_keydown(&ev);
            }
            on:keyup=move |ev: web_sys::KeyboardEvent| {
                read_input();
                ctx.on_keyup(&ev.key());
            }
            on:paste=move |ev: web_sys::ClipboardEvent| ctx.on_paste(&ev)
        ></span>
        <select
            id=format!("{}-select", id)
            name=ctx.name()
            multiple=true
            style="display: none;"
        >
            <For
                each=indexed_tokens
                key=|(index, token)| (*index, token.value.clone())
                children=move |(_, token)| {
                    view! { <option value=token.value.clone() selected=true>{token.text.clone()}</option> }
                }
            />
        </select>
        <SuggestionDropdown id=format!("{}-suggestions", id) />
    }
}
