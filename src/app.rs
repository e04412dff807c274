//! Token Field Demo App
//!
//! Three fields (multi-select, search, single-select) plus a log of the
//! events they emit.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use token_field::models::{SuggestionSeed, TokenSeed};
use token_field::{attach, FieldOptions, SelectMode, TokenFieldConfig};

const FRUITS: &[&str] = &["Apple", "Apricot", "Banana", "Blueberry", "Cherry", "Grape", "Lemon"];

fn fruit_options(selector: &str, mode: SelectMode) -> FieldOptions {
    FieldOptions {
        name: format!("{}[]", selector.trim_start_matches('#')),
        selector: selector.to_string(),
        no_matches_text: Some("No matches".to_string()),
        initial_suggestions: Some(
            FRUITS.iter().map(|f| SuggestionSeed::Text(f.to_string())).collect(),
        ),
        select_mode: mode,
        ..Default::default()
    }
}

/// Append every `tokens-changed` / `query-changed` event of a container to the log.
fn bind_field_events(container_id: &str, set_log: WriteSignal<Vec<String>>) {
    let Some(container) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(container_id))
    else {
        return;
    };

    for name in ["tokens-changed", "query-changed"] {
        let id = container_id.to_string();
        let on_event = Closure::<dyn FnMut(web_sys::CustomEvent)>::new(move |ev: web_sys::CustomEvent| {
            let detail = js_sys::JSON::stringify(&ev.detail())
                .map(String::from)
                .unwrap_or_default();
            set_log.update(|log| log.push(format!("[{}] {} {}", id, ev.type_(), detail)));
        });
        if let Err(e) = container.add_event_listener_with_callback(name, on_event.as_ref().unchecked_ref()) {
            web_sys::console::error_1(&format!("[APP] Failed to listen for {}: {:?}", name, e).into());
        }
        on_event.forget();
    }
}

#[component]
pub fn App() -> impl IntoView {
    let (log, set_log) = signal(Vec::<String>::new());

    // Attach once the containers are in the DOM
    Effect::new(move |_| {
        let mut fruits = fruit_options("#fruits", SelectMode::Multi);
        fruits.initial_tokens = Some(vec![TokenSeed::Text("Cherry".to_string())]);

        let mut search = FieldOptions {
            selector: "#search".to_string(),
            name: "search".to_string(),
            suggestions_uri: Some("suggestions.json".to_string()),
            suggestion_delay_ms: 150,
            select_mode: SelectMode::Search,
            min_characters_for_suggestion: 2,
            ..Default::default()
        };
        search.placeholder_text = Some("search...".to_string());

        let configs = [
            TokenFieldConfig::new(fruits),
            TokenFieldConfig::new(search),
            TokenFieldConfig::new(fruit_options("#favourite", SelectMode::Single)),
        ];
        for config in configs {
            let selector = config.options.selector.clone();
            match attach(config) {
                Ok(field) => {
                    field.debug(true);
                    bind_field_events(&field.id(), set_log);
                }
                Err(e) => {
                    web_sys::console::error_1(&format!("[APP] Failed to attach {}: {}", selector, e).into());
                }
            }
        }
    });

    view! {
        <main class="demo">
            <h1>"Token Field"</h1>
            <form action="#" method="get">
                <label>"Fruits"</label>
                <div id="fruits"></div>
                <label>"Search"</label>
                <div id="search"></div>
                <label>"Favourite"</label>
                <div id="favourite"></div>
            </form>
            <pre class="event-log">{move || log.get().join("\n")}</pre>
        </main>
    }
}
