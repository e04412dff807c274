//! Suggestion Dropdown Component
//!
//! Renders the dropdown rows; click selects, hover highlights.

use leptos::prelude::*;

use crate::context::FieldContext;
use crate::state::FieldStateStoreFields;
use crate::suggest::SuggestionEntry;

fn entry_class(entry: &SuggestionEntry, highlighted: bool) -> String {
    let mut class = String::from("token-autocomplete-suggestion");
    if highlighted {
        class.push_str(" token-autocomplete-suggestion-highlighted");
    }
    if entry.active {
        class.push_str(" token-autocomplete-suggestion-active");
    }
    if entry.is_placeholder() {
        class.push_str(" token-autocomplete-suggestion-no-match");
    }
    class
}

#[component]
pub fn SuggestionDropdown(#[prop(into)] id: String) -> impl IntoView {
    let ctx = expect_context::<FieldContext>();
    let store = ctx.store;

    view! {
        <ul
            id=id
            class="token-autocomplete-suggestions"
            style=move || if store.dropdown().with(|d| d.is_open()) { "display: block;" } else { "" }
        >
            {move || {
                let dropdown = store.dropdown().get();
                let highlighted = dropdown.highlighted_index();
                dropdown.entries().iter().cloned().enumerate().map(|(i, entry)| {
                    let class = entry_class(&entry, highlighted == Some(i));
                    let value = entry.suggestion.effective_value().to_string();
                    let body = ctx.render_suggestion(&entry.suggestion);
                    view! {
                        <li
                            class=class
                            data-value=value
                            // keep focus in the editable span
                            on:mousedown=move |ev: web_sys::MouseEvent| ev.prevent_default()
                            on:mouseenter=move |_| ctx.highlight(i)
                            on:click=move |_| ctx.select_suggestion(i)
                        >
                            {body}
                        </li>
                    }
                }).collect_view()
            }}
        </ul>
    }
}
