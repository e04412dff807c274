//! Token Store
//!
//! Ordered list of committed tokens. Chips and hidden `<option>`s are both
//! rendered from this one list, so they cannot drift apart.

use crate::models::{FieldEvent, Token, TokensChanged};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenStore {
    tokens: Vec<Token>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Values in insertion order, as submitted with the form.
    pub fn current_tokens(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.value.clone()).collect()
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.tokens.iter().any(|t| t.value == value)
    }

    /// Append a token. Duplicates are not rejected here; callers decide.
    pub fn add_token(&mut self, token: Token, silent: bool) -> Option<FieldEvent> {
        if !token.is_valid() {
            return None;
        }
        self.tokens.push(token.clone());
        self.changed(silent, Some(token), None)
    }

    pub fn remove_token_at(&mut self, index: usize, silent: bool) -> Option<FieldEvent> {
        if index >= self.tokens.len() {
            return None;
        }
        let removed = self.tokens.remove(index);
        self.changed(silent, None, Some(removed))
    }

    pub fn remove_token_with_value(&mut self, value: &str, silent: bool) -> Option<FieldEvent> {
        let index = self.tokens.iter().position(|t| t.value == value)?;
        self.remove_token_at(index, silent)
    }

    pub fn remove_token_with_text(&mut self, text: &str, silent: bool) -> Option<FieldEvent> {
        let index = self.tokens.iter().position(|t| t.text == text)?;
        self.remove_token_at(index, silent)
    }

    pub fn remove_last_token(&mut self, silent: bool) -> Option<FieldEvent> {
        let last = self.tokens.len().checked_sub(1)?;
        self.remove_token_at(last, silent)
    }

    /// Remove tokens one at a time, newest first; each removal emits its own event.
    pub fn clear(&mut self, silent: bool) -> Vec<FieldEvent> {
        let mut events = Vec::new();
        while !self.tokens.is_empty() {
            events.extend(self.remove_last_token(silent));
        }
        events
    }

    fn changed(&self, silent: bool, added: Option<Token>, removed: Option<Token>) -> Option<FieldEvent> {
        if silent {
            return None;
        }
        Some(FieldEvent::TokensChanged(TokensChanged {
            tokens: self.current_tokens(),
            added,
            removed,
        }))
    }
}
