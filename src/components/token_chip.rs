//! Token Chip Component
//!
//! One committed token with its × delete glyph.

use leptos::prelude::*;

use crate::context::FieldContext;
use crate::models::Token;

/// Chip for the token at `index`; the body comes from the configured renderer.
#[component]
pub fn TokenChip(token: Token, index: usize) -> impl IntoView {
    let ctx = expect_context::<FieldContext>();
    let body = ctx.render_token(&token);

    view! {
        <span
            class="token-autocomplete-token"
            data-value=token.value.clone()
            data-text=token.text.clone()
        >
            {body}
            <span
                class="token-autocomplete-token-delete"
                on:click=move |ev: web_sys::MouseEvent| {
                    ev.stop_propagation();
                    ctx.remove_token_at(index, false);
                }
            >
                "×"
            </span>
        </span>
    }
}
