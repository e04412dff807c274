//! Field State
//!
//! Reactive store for one field plus every state transition. Transitions are
//! plain `&mut self` methods returning the events to dispatch.

use reactive_stores::Store;

use crate::input::{classify_keydown, classify_keyup, KeyDownIntent, KeyUpIntent};
use crate::models::{FieldEvent, InputAsValue, QueryChanged, SelectMode, Suggestion, Token};
use crate::remote::{RequestTicket, RequestTracker};
use crate::store::TokenStore;
use crate::suggest::{filter_static, Dropdown};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SuggestionSource {
    Static(Vec<Suggestion>),
    #[default]
    Remote,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSettings {
    pub mode: SelectMode,
    pub min_characters: usize,
    pub no_matches_text: Option<String>,
    pub source: SuggestionSource,
}

/// Follow-up work a transition asks the DOM layer to do.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Requery {
    #[default]
    None,
    Fetch { ticket: RequestTicket, query: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyDownOutcome {
    pub prevent_default: bool,
    pub events: Vec<FieldEvent>,
}

#[derive(Clone, Debug, Default, Store)]
pub struct FieldState {
    pub settings: FieldSettings,
    pub tokens: TokenStore,
    /// Current uncommitted text of the editable span.
    pub input: String,
    pub dropdown: Dropdown,
    pub requests: RequestTracker,
    pub placeholder: String,
}

impl FieldState {
    pub fn new(settings: FieldSettings, placeholder: String) -> Self {
        Self {
            settings,
            placeholder,
            ..Default::default()
        }
    }

    // ========================
    // Token Store
    // ========================

    pub fn add_token(&mut self, token: Token, silent: bool) -> Vec<FieldEvent> {
        if !token.is_valid() {
            return Vec::new();
        }
        let mut events = Vec::new();
        if self.settings.mode == SelectMode::Single {
            events.extend(self.tokens.clear(silent));
        }
        events.extend(self.tokens.add_token(token, silent));
        self.dropdown.refresh_active(&self.tokens);
        events
    }

    pub fn remove_token_at(&mut self, index: usize, silent: bool) -> Vec<FieldEvent> {
        let event = self.tokens.remove_token_at(index, silent);
        self.dropdown.refresh_active(&self.tokens);
        event.into_iter().collect()
    }

    pub fn remove_token_with_value(&mut self, value: &str, silent: bool) -> Vec<FieldEvent> {
        let event = self.tokens.remove_token_with_value(value, silent);
        self.dropdown.refresh_active(&self.tokens);
        event.into_iter().collect()
    }

    pub fn remove_token_with_text(&mut self, text: &str, silent: bool) -> Vec<FieldEvent> {
        let event = self.tokens.remove_token_with_text(text, silent);
        self.dropdown.refresh_active(&self.tokens);
        event.into_iter().collect()
    }

    pub fn remove_last_token(&mut self, silent: bool) -> Vec<FieldEvent> {
        let event = self.tokens.remove_last_token(silent);
        self.dropdown.refresh_active(&self.tokens);
        event.into_iter().collect()
    }

    pub fn clear(&mut self, silent: bool) -> Vec<FieldEvent> {
        let events = self.tokens.clear(silent);
        self.dropdown.refresh_active(&self.tokens);
        events
    }

    /// Replace all tokens.
    pub fn val(&mut self, tokens: Vec<Token>, silent: bool) -> Vec<FieldEvent> {
        let mut events = self.clear(silent);
        for token in tokens {
            events.extend(self.add_token(token, silent));
        }
        events
    }

    // ========================
    // Input Surface
    // ========================

    /// Returns whether the text actually changed.
    pub fn sync_input(&mut self, text: String) -> bool {
        if self.input == text {
            return false;
        }
        self.input = text;
        true
    }

    pub fn set_input(&mut self, text: String, silent: bool) -> Requery {
        self.input = text;
        if silent {
            return Requery::None;
        }
        self.refresh_suggestions()
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.close_dropdown();
    }

    pub fn keydown(&mut self, key: &str) -> KeyDownOutcome {
        match classify_keydown(key, self.input.is_empty(), self.dropdown.is_open()) {
            KeyDownIntent::Commit => self.commit(key),
            KeyDownIntent::DeleteLast => KeyDownOutcome {
                prevent_default: true,
                events: self.remove_last_token(false),
            },
            KeyDownIntent::Navigate(direction) => {
                self.dropdown.navigate(direction);
                KeyDownOutcome {
                    prevent_default: true,
                    events: Vec::new(),
                }
            }
            KeyDownIntent::Ignore => KeyDownOutcome::default(),
        }
    }

    fn commit(&mut self, key: &str) -> KeyDownOutcome {
        if let Some(index) = self.dropdown.highlighted_index() {
            return KeyDownOutcome {
                prevent_default: true,
                events: self.select_suggestion(index),
            };
        }

        match self.settings.mode.handle_input_as_value(&self.input) {
            InputAsValue::Token(token) => {
                let events = self.add_token(token, false);
                self.clear_input();
                KeyDownOutcome {
                    prevent_default: true,
                    events,
                }
            }
            InputAsValue::Query(query) => {
                self.close_dropdown();
                KeyDownOutcome {
                    prevent_default: true,
                    events: vec![FieldEvent::QueryChanged(QueryChanged { query })],
                }
            }
            // Nothing to commit: Tab keeps moving focus.
            InputAsValue::Nothing => KeyDownOutcome {
                prevent_default: key == "Enter",
                events: Vec::new(),
            },
        }
    }

    pub fn keyup(&mut self, key: &str) -> Requery {
        match classify_keyup(key) {
            KeyUpIntent::Close => {
                self.close_dropdown();
                Requery::None
            }
            KeyUpIntent::Requery => self.refresh_suggestions(),
            KeyUpIntent::Navigate | KeyUpIntent::Ignore => Requery::None,
        }
    }

    // ========================
    // Suggestion Engine
    // ========================

    pub fn close_dropdown(&mut self) {
        self.dropdown.clear();
        self.requests.cancel();
    }

    /// Rebuild suggestions for the current input. Static sources are filtered
    /// in place; remote sources hand back a ticket for the DOM layer to fetch.
    pub fn refresh_suggestions(&mut self) -> Requery {
        if self.input.chars().count() < self.settings.min_characters {
            self.close_dropdown();
            return Requery::None;
        }
        match &self.settings.source {
            SuggestionSource::Static(candidates) => {
                let hits = filter_static(candidates, &self.input);
                self.dropdown
                    .show(hits, &self.tokens, self.settings.no_matches_text.as_deref());
                Requery::None
            }
            SuggestionSource::Remote => {
                // Rows from the previous query must not be committed while the new one is pending.
                self.dropdown.clear();
                Requery::Fetch {
                    ticket: self.requests.begin(),
                    query: self.input.clone(),
                }
            }
        }
    }

    /// Apply a remote response. Stale tickets change nothing.
    pub fn apply_remote(&mut self, ticket: RequestTicket, suggestions: Vec<Suggestion>) -> bool {
        if !self.requests.finish(ticket) {
            return false;
        }
        self.dropdown
            .show(suggestions, &self.tokens, self.settings.no_matches_text.as_deref());
        true
    }

    pub fn remote_failed(&mut self, ticket: RequestTicket) {
        self.requests.finish(ticket);
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.requests.is_current(ticket)
    }

    pub fn highlight(&mut self, index: usize) {
        self.dropdown.highlight(index);
    }

    /// Choose a dropdown row: toggles the token, then clears input and dropdown.
    pub fn select_suggestion(&mut self, index: usize) -> Vec<FieldEvent> {
        let Some(entry) = self.dropdown.entry(index).cloned() else {
            return Vec::new();
        };
        if entry.is_placeholder() {
            return Vec::new();
        }

        let value = entry.suggestion.effective_value().to_string();
        let events = if self.tokens.contains_value(&value) {
            self.remove_token_with_value(&value, false)
        } else {
            self.add_token(entry.suggestion.to_token(), false)
        };
        self.clear_input();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokensChanged;

    fn fruits() -> Vec<Suggestion> {
        vec![
            Suggestion::new("1", "Apple"),
            Suggestion::new("2", "Apricot"),
            Suggestion::new("3", "Banana"),
        ]
    }

    fn static_field(mode: SelectMode) -> FieldState {
        FieldState::new(
            FieldSettings {
                mode,
                min_characters: 1,
                no_matches_text: Some("No matches".to_string()),
                source: SuggestionSource::Static(fruits()),
            },
            String::new(),
        )
    }

    fn remote_field() -> FieldState {
        FieldState::new(
            FieldSettings {
                mode: SelectMode::Multi,
                min_characters: 2,
                no_matches_text: None,
                source: SuggestionSource::Remote,
            },
            String::new(),
        )
    }

    fn type_text(state: &mut FieldState, text: &str) -> Requery {
        state.sync_input(text.to_string());
        let key = text.chars().last().map(|c| c.to_string()).unwrap_or_default();
        state.keyup(&key)
    }

    fn highlighted_text(state: &FieldState) -> Option<String> {
        state.dropdown.highlighted().map(|e| e.suggestion.text.clone())
    }

    #[test]
    fn test_apricot_scenario() {
        let mut state = static_field(SelectMode::Multi);
        type_text(&mut state, "Ap");
        let texts: Vec<_> = state.dropdown.entries().iter().map(|e| e.suggestion.text.clone()).collect();
        assert_eq!(texts, vec!["Apple", "Apricot"]);
        assert_eq!(highlighted_text(&state).as_deref(), Some("Apple"));

        let down = state.keydown("ArrowDown");
        assert!(down.prevent_default);
        state.keyup("ArrowDown");
        assert_eq!(highlighted_text(&state).as_deref(), Some("Apricot"));

        let enter = state.keydown("Enter");
        assert!(enter.prevent_default);
        assert_eq!(state.tokens.tokens(), &[Token::new("2", "Apricot")]);
        assert!(state.input.is_empty());
        assert!(!state.dropdown.is_open());
        assert_eq!(
            enter.events,
            vec![FieldEvent::TokensChanged(TokensChanged {
                tokens: vec!["2".to_string()],
                added: Some(Token::new("2", "Apricot")),
                removed: None,
            })]
        );
    }

    #[test]
    fn test_below_minimum_never_opens() {
        let mut state = static_field(SelectMode::Multi);
        state.settings.min_characters = 3;
        type_text(&mut state, "Ap");
        assert!(!state.dropdown.is_open());
        type_text(&mut state, "Apr");
        assert!(state.dropdown.is_open());
        assert_eq!(highlighted_text(&state).as_deref(), Some("Apricot"));
    }

    #[test]
    fn test_no_matches_placeholder_is_inert() {
        let mut state = static_field(SelectMode::Multi);
        type_text(&mut state, "zz");
        assert_eq!(state.dropdown.entries().len(), 1);
        assert!(state.select_suggestion(0).is_empty());
        assert!(state.tokens.is_empty());

        // Enter commits the free text instead.
        state.keydown("Enter");
        assert_eq!(state.tokens.current_tokens(), vec!["zz"]);
    }

    #[test]
    fn test_selecting_active_suggestion_toggles_off() {
        let mut state = static_field(SelectMode::Multi);
        state.add_token(Token::new("1", "Apple"), true);
        type_text(&mut state, "App");
        assert!(state.dropdown.entries()[0].active);

        let events = state.select_suggestion(0);
        assert!(state.tokens.is_empty());
        assert!(matches!(
            &events[..],
            [FieldEvent::TokensChanged(TokensChanged { removed: Some(_), .. })]
        ));
    }

    #[test]
    fn test_backspace_on_empty_input() {
        let mut state = static_field(SelectMode::Multi);
        let outcome = state.keydown("Backspace");
        assert!(outcome.events.is_empty());

        state.val(vec![Token::from_text("a"), Token::from_text("b")], true);
        let outcome = state.keydown("Backspace");
        assert!(outcome.prevent_default);
        assert_eq!(state.tokens.current_tokens(), vec!["a"]);

        state.sync_input("x".to_string());
        state.keydown("Backspace");
        assert_eq!(state.tokens.len(), 1);
    }

    #[test]
    fn test_val_replaces() {
        let mut state = static_field(SelectMode::Multi);
        state.val(vec![Token::from_text("a"), Token::from_text("b")], false);
        let events = state.val(vec![Token::from_text("c")], false);
        assert_eq!(state.tokens.current_tokens(), vec!["c"]);
        // two removals, one addition
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_free_text_commit() {
        let mut state = static_field(SelectMode::Multi);
        state.sync_input("Cherry".to_string());
        state.keydown("Tab");
        assert_eq!(state.tokens.tokens(), &[Token::from_text("Cherry")]);
        assert!(state.input.is_empty());

        let outcome = state.keydown("Tab");
        assert!(!outcome.prevent_default);
        assert_eq!(state.keydown("Enter").prevent_default, true);
    }

    #[test]
    fn test_search_mode_emits_query() {
        let mut state = static_field(SelectMode::Search);
        state.sync_input("Cherry".to_string());
        let outcome = state.keydown("Enter");
        assert_eq!(
            outcome.events,
            vec![FieldEvent::QueryChanged(QueryChanged {
                query: "Cherry".to_string()
            })]
        );
        assert_eq!(state.input, "Cherry");
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_single_mode_replaces_token() {
        let mut state = static_field(SelectMode::Single);
        state.add_token(Token::from_text("a"), false);
        let events = state.add_token(Token::from_text("b"), false);
        assert_eq!(state.tokens.current_tokens(), vec!["b"]);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_escape_closes_dropdown() {
        let mut state = static_field(SelectMode::Multi);
        type_text(&mut state, "A");
        assert!(state.dropdown.is_open());
        state.keyup("Escape");
        assert!(!state.dropdown.is_open());
        assert_eq!(state.input, "A");
        assert!(state.tokens.is_empty());
    }

    #[test]
    fn test_left_right_do_not_requery() {
        let mut state = static_field(SelectMode::Multi);
        type_text(&mut state, "A");
        state.keydown("ArrowDown");
        state.keyup("ArrowLeft");
        assert_eq!(highlighted_text(&state).as_deref(), Some("Apricot"));
    }

    #[test]
    fn test_remote_second_request_wins() {
        let mut state = remote_field();
        assert_eq!(type_text(&mut state, "a"), Requery::None);

        let Requery::Fetch { ticket: first, query } = type_text(&mut state, "ap") else {
            panic!("expected a fetch");
        };
        assert_eq!(query, "ap");
        let Requery::Fetch { ticket: second, .. } = type_text(&mut state, "apr") else {
            panic!("expected a fetch");
        };

        assert!(state.apply_remote(second, vec![Suggestion::new("2", "Apricot")]));
        assert!(!state.apply_remote(first, vec![Suggestion::new("1", "Apple")]));
        let texts: Vec<_> = state.dropdown.entries().iter().map(|e| e.suggestion.text.clone()).collect();
        assert_eq!(texts, vec!["Apricot"]);
    }

    #[test]
    fn test_remote_response_after_close_is_discarded() {
        let mut state = remote_field();
        let Requery::Fetch { ticket, .. } = type_text(&mut state, "ap") else {
            panic!("expected a fetch");
        };
        state.keyup("Escape");
        assert!(!state.apply_remote(ticket, vec![Suggestion::new("1", "Apple")]));
        assert!(!state.dropdown.is_open());
    }

    #[test]
    fn test_close_leaves_no_pending_request() {
        let mut state = remote_field();
        assert!(matches!(type_text(&mut state, "ap"), Requery::Fetch { .. }));
        assert_eq!(state.keyup("ArrowDown"), Requery::None);
        assert!(state.requests.in_flight());

        assert_eq!(state.keyup("Escape"), Requery::None);
        assert!(!state.requests.in_flight());

        assert!(matches!(type_text(&mut state, "ap"), Requery::Fetch { .. }));
        assert_eq!(type_text(&mut state, "a"), Requery::None);
        assert!(!state.requests.in_flight());

        assert!(matches!(type_text(&mut state, "ap"), Requery::Fetch { .. }));
        state.clear_input();
        assert!(!state.requests.in_flight());
    }

    #[test]
    fn test_enter_while_pending_commits_typed_text() {
        let mut state = remote_field();
        let Requery::Fetch { ticket, .. } = type_text(&mut state, "ap") else {
            panic!("expected a fetch");
        };
        assert!(state.apply_remote(ticket, vec![Suggestion::new("1", "Apple")]));
        assert_eq!(highlighted_text(&state).as_deref(), Some("Apple"));

        let Requery::Fetch { ticket: pending, .. } = type_text(&mut state, "apx") else {
            panic!("expected a fetch");
        };
        assert!(!state.dropdown.is_open());
        assert!(state.is_current(pending));

        let outcome = state.keydown("Enter");
        assert!(outcome.prevent_default);
        assert_eq!(state.tokens.current_tokens(), vec!["apx"]);
    }

    #[test]
    fn test_set_input_silent() {
        let mut state = static_field(SelectMode::Multi);
        assert_eq!(state.set_input("Ap".to_string(), true), Requery::None);
        assert!(!state.dropdown.is_open());
        state.set_input("Ap".to_string(), false);
        assert!(state.dropdown.is_open());
        state.clear_input();
        assert!(state.input.is_empty());
        assert!(!state.dropdown.is_open());
    }
}
