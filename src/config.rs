//! Field Configuration
//!
//! `FieldOptions` is plain data a host can pass as a JS object.
//! `TokenFieldConfig` adds the function-valued fields (renderers, URI builder).

use std::rc::Rc;

use leptos::prelude::*;
use serde::Deserialize;

use crate::models::{SelectMode, Suggestion, SuggestionSeed, Token, TokenSeed};
use crate::remote::build_query_uri;
use crate::state::{FieldSettings, SuggestionSource};

/// Placeholder shown in the empty editable span.
pub const DEFAULT_PLACEHOLDER: &str = "enter some text";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldOptions {
    /// Form name of the hidden select.
    pub name: String,
    /// CSS selector of the container element. Required.
    pub selector: String,
    pub no_matches_text: Option<String>,
    pub placeholder_text: Option<String>,
    pub initial_tokens: Option<Vec<TokenSeed>>,
    pub initial_suggestions: Option<Vec<SuggestionSeed>>,
    /// Enables remote suggestions; `query=<input>` is appended.
    pub suggestions_uri: Option<String>,
    pub select_mode: SelectMode,
    pub min_characters_for_suggestion: usize,
    /// Debounce for remote suggestion requests, 0 = immediate.
    pub suggestion_delay_ms: u32,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            selector: String::new(),
            no_matches_text: None,
            placeholder_text: None,
            initial_tokens: None,
            initial_suggestions: None,
            suggestions_uri: None,
            select_mode: SelectMode::default(),
            min_characters_for_suggestion: 1,
            suggestion_delay_ms: 0,
        }
    }
}

impl FieldOptions {
    pub fn placeholder(&self) -> String {
        self.placeholder_text
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string())
    }

    pub fn initial_tokens(&self) -> Vec<Token> {
        self.initial_tokens
            .iter()
            .flatten()
            .cloned()
            .map(Token::from)
            .collect()
    }

    pub fn initial_suggestions(&self) -> Vec<Suggestion> {
        self.initial_suggestions
            .iter()
            .flatten()
            .cloned()
            .map(Suggestion::from)
            .collect()
    }
}

pub type TokenRenderer = Rc<dyn Fn(&Token) -> AnyView>;
pub type SuggestionRenderer = Rc<dyn Fn(&Suggestion) -> AnyView>;
pub type UriBuilder = Rc<dyn Fn(&str) -> String>;

/// Chip body: the token label.
pub fn default_token_renderer(token: &Token) -> AnyView {
    view! { <span class="token-autocomplete-token-label">{token.text.clone()}</span> }.into_any()
}

/// Dropdown row body: label plus optional description.
pub fn default_suggestion_renderer(suggestion: &Suggestion) -> AnyView {
    let description = suggestion.description.clone();
    view! {
        <span class="token-autocomplete-suggestion-text">{suggestion.text.clone()}</span>
        {description.map(|d| view! { <span class="token-autocomplete-suggestion-description">{d}</span> })}
    }
    .into_any()
}

#[derive(Clone)]
pub struct TokenFieldConfig {
    pub options: FieldOptions,
    pub token_renderer: TokenRenderer,
    pub suggestion_renderer: SuggestionRenderer,
    pub suggestions_uri_builder: Option<UriBuilder>,
}

impl TokenFieldConfig {
    pub fn new(options: FieldOptions) -> Self {
        Self {
            options,
            token_renderer: Rc::new(default_token_renderer),
            suggestion_renderer: Rc::new(default_suggestion_renderer),
            suggestions_uri_builder: None,
        }
    }

    pub fn with_token_renderer(mut self, renderer: impl Fn(&Token) -> AnyView + 'static) -> Self {
        self.token_renderer = Rc::new(renderer);
        self
    }

    pub fn with_suggestion_renderer(mut self, renderer: impl Fn(&Suggestion) -> AnyView + 'static) -> Self {
        self.suggestion_renderer = Rc::new(renderer);
        self
    }

    pub fn with_uri_builder(mut self, builder: impl Fn(&str) -> String + 'static) -> Self {
        self.suggestions_uri_builder = Some(Rc::new(builder));
        self
    }

    pub fn is_remote(&self) -> bool {
        self.options.suggestions_uri.is_some() || self.suggestions_uri_builder.is_some()
    }

    /// Request URI for a query; `None` when neither a builder nor a base URI is set.
    pub fn request_uri(&self, query: &str) -> Option<String> {
        let uri = match (&self.suggestions_uri_builder, &self.options.suggestions_uri) {
            (Some(builder), _) => builder(query),
            (None, Some(base)) => build_query_uri(base, query),
            (None, None) => return None,
        };
        Some(uri).filter(|u| !u.is_empty())
    }

    pub fn settings(&self) -> FieldSettings {
        let source = if self.is_remote() {
            SuggestionSource::Remote
        } else {
            SuggestionSource::Static(self.options.initial_suggestions())
        };
        FieldSettings {
            mode: self.options.select_mode,
            min_characters: self.options.min_characters_for_suggestion,
            no_matches_text: self.options.no_matches_text.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options: FieldOptions = serde_json::from_str(r##"{"selector": "#tags"}"##).unwrap();
        assert_eq!(options.selector, "#tags");
        assert_eq!(options.min_characters_for_suggestion, 1);
        assert_eq!(options.select_mode, SelectMode::Multi);
        assert_eq!(options.placeholder(), DEFAULT_PLACEHOLDER);
        assert!(options.initial_tokens().is_empty());
    }

    #[test]
    fn test_options_camel_case() {
        let options: FieldOptions = serde_json::from_str(
            r##"{
                "selector": "#f",
                "selectMode": "SEARCH",
                "minCharactersForSuggestion": 3,
                "noMatchesText": "nothing",
                "initialTokens": ["a", {"value": "2", "text": "B"}],
                "initialSuggestions": ["Apple"],
                "suggestionsUri": "/api/tags"
            }"##,
        )
        .unwrap();
        assert_eq!(options.select_mode, SelectMode::Search);
        assert_eq!(options.min_characters_for_suggestion, 3);
        assert_eq!(options.initial_tokens(), vec![Token::from_text("a"), Token::new("2", "B")]);
        assert_eq!(options.initial_suggestions()[0].text, "Apple");
    }

    #[test]
    fn test_request_uri() {
        let mut options = FieldOptions::default();
        let config = TokenFieldConfig::new(options.clone());
        assert!(!config.is_remote());
        assert!(config.request_uri("x").is_none());

        options.suggestions_uri = Some("/api/tags".to_string());
        let config = TokenFieldConfig::new(options);
        assert!(config.is_remote());
        assert_eq!(config.request_uri("a b").as_deref(), Some("/api/tags?query=a%20b"));

        let config = config.with_uri_builder(|q| format!("/search/{}", q));
        assert_eq!(config.request_uri("ap").as_deref(), Some("/search/ap"));
    }

    #[test]
    fn test_settings_source() {
        let mut options = FieldOptions::default();
        options.initial_suggestions = Some(vec![SuggestionSeed::Text("Apple".to_string())]);
        let settings = TokenFieldConfig::new(options.clone()).settings();
        assert!(matches!(settings.source, SuggestionSource::Static(ref s) if s.len() == 1));

        let settings = TokenFieldConfig::new(options).with_uri_builder(|q| q.to_string()).settings();
        assert_eq!(settings.source, SuggestionSource::Remote);
    }
}
