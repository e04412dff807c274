//! Field Models
//!
//! Tokens, suggestions and the events a field emits.

use serde::{Deserialize, Serialize};

/// Reserved value carried by the "no matches" placeholder entry.
pub const NO_MATCH_VALUE: &str = "_no_match_";

/// A committed token (chip). `value` is the identity, `text` is display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Token {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: Option<String>) -> Self {
        self.kind = kind;
        self
    }

    /// Free text entered by the user: value and label are the same string.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Tokens with an empty value or label are never stored.
    pub fn is_valid(&self) -> bool {
        !self.value.is_empty() && !self.text.is_empty()
    }
}

/// Tokens may be seeded as plain strings or as full objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TokenSeed {
    Text(String),
    Token(Token),
}

impl From<TokenSeed> for Token {
    fn from(seed: TokenSeed) -> Self {
        match seed {
            TokenSeed::Text(text) => Token::from_text(text),
            TokenSeed::Token(token) => token,
        }
    }
}

/// A completion candidate shown in the dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Suggestion {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: None,
            value: value.into(),
            text: text.into(),
            kind: None,
            description: None,
        }
    }

    /// Identifier sent back when chosen: `id`, then `value`, then `text`.
    pub fn effective_value(&self) -> &str {
        match &self.id {
            Some(id) if !id.is_empty() => id,
            _ if !self.value.is_empty() => &self.value,
            _ => &self.text,
        }
    }

    pub fn to_token(&self) -> Token {
        Token::new(self.effective_value(), self.text.clone()).with_kind(self.kind.clone())
    }

    pub fn no_match(text: impl Into<String>) -> Self {
        Self::new(NO_MATCH_VALUE, text)
    }

    pub fn is_no_match(&self) -> bool {
        self.effective_value() == NO_MATCH_VALUE
    }
}

/// Suggestions may arrive as plain strings (value = text) or as objects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SuggestionSeed {
    Text(String),
    Suggestion(Suggestion),
}

impl From<SuggestionSeed> for Suggestion {
    fn from(seed: SuggestionSeed) -> Self {
        match seed {
            SuggestionSeed::Text(text) => Suggestion::new(text.clone(), text),
            SuggestionSeed::Suggestion(suggestion) => suggestion,
        }
    }
}

/// How committed input is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SelectMode {
    /// At most one token.
    Single,
    #[default]
    Multi,
    /// Input is a live query; free text is never committed as a token.
    Search,
}

/// What a free-text commit turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum InputAsValue {
    Token(Token),
    Query(String),
    Nothing,
}

impl SelectMode {
    pub fn handle_input_as_value(self, input: &str) -> InputAsValue {
        match self {
            SelectMode::Search => InputAsValue::Query(input.to_string()),
            SelectMode::Single | SelectMode::Multi if input.is_empty() => InputAsValue::Nothing,
            SelectMode::Single | SelectMode::Multi => InputAsValue::Token(Token::from_text(input)),
        }
    }

    pub fn clears_input_on_free_text(self) -> bool {
        !matches!(self, SelectMode::Search)
    }
}

/// Payload of the `tokens-changed` DOM event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokensChanged {
    pub tokens: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<Token>,
}

/// Payload of the `query-changed` DOM event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryChanged {
    pub query: String,
}

/// Events emitted by state transitions, dispatched on the container.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    TokensChanged(TokensChanged),
    QueryChanged(QueryChanged),
}

impl FieldEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FieldEvent::TokensChanged(_) => "tokens-changed",
            FieldEvent::QueryChanged(_) => "query-changed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_value_prefers_id() {
        let mut s = Suggestion::new("v", "Text");
        assert_eq!(s.effective_value(), "v");
        s.id = Some("42".to_string());
        assert_eq!(s.effective_value(), "42");
        s.id = None;
        s.value.clear();
        assert_eq!(s.effective_value(), "Text");
    }

    #[test]
    fn test_seeds_accept_strings_and_objects() {
        let seeds: Vec<SuggestionSeed> =
            serde_json::from_str(r#"["Apple", {"value": "2", "text": "Apricot", "type": "fruit"}]"#).unwrap();
        let suggestions: Vec<Suggestion> = seeds.into_iter().map(Into::into).collect();
        assert_eq!(suggestions[0], Suggestion::new("Apple", "Apple"));
        assert_eq!(suggestions[1].kind.as_deref(), Some("fruit"));

        let token: Token = serde_json::from_str::<TokenSeed>(r#""x""#).unwrap().into();
        assert_eq!(token, Token::from_text("x"));
    }

    #[test]
    fn test_handle_input_as_value() {
        assert_eq!(
            SelectMode::Multi.handle_input_as_value("abc"),
            InputAsValue::Token(Token::from_text("abc"))
        );
        assert_eq!(SelectMode::Single.handle_input_as_value(""), InputAsValue::Nothing);
        assert_eq!(
            SelectMode::Search.handle_input_as_value("abc"),
            InputAsValue::Query("abc".to_string())
        );
    }

    #[test]
    fn test_tokens_changed_detail_shape() {
        let event = TokensChanged {
            tokens: vec!["1".to_string()],
            added: Some(Token::new("1", "One")),
            removed: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tokens"][0], "1");
        assert_eq!(json["added"]["text"], "One");
        assert!(json.get("removed").is_none());
        assert!(json["added"].get("type").is_none());
    }
}
