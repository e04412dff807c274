//! Suggestion Engine
//!
//! Static filtering, the dropdown's rendered entries and keyboard highlight.

use crate::input::Direction;
use crate::models::Suggestion;
use crate::store::TokenStore;

/// Case-insensitive prefix match against the suggestion label.
pub fn matches_prefix(query: &str, text: &str) -> bool {
    let query = query.to_lowercase();
    text.to_lowercase().starts_with(&query)
}

pub fn filter_static(candidates: &[Suggestion], query: &str) -> Vec<Suggestion> {
    candidates
        .iter()
        .filter(|s| matches_prefix(query, &s.text))
        .cloned()
        .collect()
}

/// One rendered dropdown row.
#[derive(Clone, Debug, PartialEq)]
pub struct SuggestionEntry {
    pub suggestion: Suggestion,
    /// A token with the same value already exists; choosing this removes it.
    pub active: bool,
}

impl SuggestionEntry {
    pub fn is_placeholder(&self) -> bool {
        self.suggestion.is_no_match()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dropdown {
    entries: Vec<SuggestionEntry>,
    highlighted: Option<usize>,
}

impl Dropdown {
    pub fn entries(&self) -> &[SuggestionEntry] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted(&self) -> Option<&SuggestionEntry> {
        self.highlighted.and_then(|i| self.entries.get(i))
    }

    pub fn entry(&self, index: usize) -> Option<&SuggestionEntry> {
        self.entries.get(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.highlighted = None;
    }

    /// Replace the entries, falling back to a single placeholder row when
    /// nothing matched and `no_matches_text` is set. The first real entry is
    /// highlighted.
    pub fn show(&mut self, suggestions: Vec<Suggestion>, tokens: &TokenStore, no_matches_text: Option<&str>) {
        self.entries = suggestions
            .into_iter()
            .map(|suggestion| SuggestionEntry {
                active: !suggestion.is_no_match() && tokens.contains_value(suggestion.effective_value()),
                suggestion,
            })
            .collect();

        if self.entries.is_empty() {
            if let Some(text) = no_matches_text.filter(|t| !t.is_empty()) {
                self.entries.push(SuggestionEntry {
                    suggestion: Suggestion::no_match(text),
                    active: false,
                });
            }
        }

        self.highlighted = self.entries.first().filter(|e| !e.is_placeholder()).map(|_| 0);
    }

    /// Re-derive `active` flags after the token list changed.
    pub fn refresh_active(&mut self, tokens: &TokenStore) {
        for entry in &mut self.entries {
            entry.active = !entry.is_placeholder() && tokens.contains_value(entry.suggestion.effective_value());
        }
    }

    /// Move the highlight one row. Past either end it is cleared, not wrapped.
    pub fn navigate(&mut self, direction: Direction) {
        let len = self.entries.len();
        if len == 0 {
            self.highlighted = None;
            return;
        }
        let next = match (self.highlighted, direction) {
            (None, Direction::Down) => Some(0),
            (None, Direction::Up) => Some(len - 1),
            (Some(i), Direction::Down) if i + 1 < len => Some(i + 1),
            (Some(i), Direction::Up) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        self.highlighted = next.filter(|i| !self.entries[*i].is_placeholder());
    }

    pub fn highlight(&mut self, index: usize) {
        if self.entries.get(index).is_some_and(|e| !e.is_placeholder()) {
            self.highlighted = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Token, NO_MATCH_VALUE};

    fn fruits() -> Vec<Suggestion> {
        vec![
            Suggestion::new("1", "Apple"),
            Suggestion::new("2", "Apricot"),
            Suggestion::new("3", "Banana"),
        ]
    }

    #[test]
    fn test_filter_static_is_case_insensitive_prefix() {
        let hits = filter_static(&fruits(), "ap");
        let texts: Vec<_> = hits.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["Apple", "Apricot"]);
        assert!(filter_static(&fruits(), "nana").is_empty());
    }

    #[test]
    fn test_show_highlights_first() {
        let mut dropdown = Dropdown::default();
        dropdown.show(filter_static(&fruits(), "Ap"), &TokenStore::new(), None);
        assert!(dropdown.is_open());
        assert_eq!(dropdown.highlighted().map(|e| e.suggestion.text.as_str()), Some("Apple"));
    }

    #[test]
    fn test_show_placeholder_on_no_match() {
        let mut dropdown = Dropdown::default();
        dropdown.show(Vec::new(), &TokenStore::new(), Some("No matches"));
        assert_eq!(dropdown.entries().len(), 1);
        assert!(dropdown.entries()[0].is_placeholder());
        assert!(dropdown.highlighted().is_none());

        dropdown.show(Vec::new(), &TokenStore::new(), None);
        assert!(!dropdown.is_open());
    }

    #[test]
    fn test_active_marks_existing_tokens() {
        let mut tokens = TokenStore::new();
        tokens.add_token(Token::new("2", "Apricot"), true);
        let mut dropdown = Dropdown::default();
        dropdown.show(fruits(), &tokens, None);
        let active: Vec<bool> = dropdown.entries().iter().map(|e| e.active).collect();
        assert_eq!(active, vec![false, true, false]);

        tokens.clear(true);
        dropdown.refresh_active(&tokens);
        assert!(dropdown.entries().iter().all(|e| !e.active));
    }

    #[test]
    fn test_navigation_clears_at_boundaries() {
        let mut dropdown = Dropdown::default();
        dropdown.show(filter_static(&fruits(), "ap"), &TokenStore::new(), None);
        dropdown.navigate(Direction::Down);
        assert_eq!(dropdown.highlighted_index(), Some(1));
        dropdown.navigate(Direction::Down);
        assert_eq!(dropdown.highlighted_index(), None);
        dropdown.navigate(Direction::Up);
        assert_eq!(dropdown.highlighted_index(), Some(1));
        dropdown.navigate(Direction::Up);
        dropdown.navigate(Direction::Up);
        assert_eq!(dropdown.highlighted_index(), None);
    }

    #[test]
    fn test_placeholder_never_highlighted() {
        let mut dropdown = Dropdown::default();
        dropdown.show(Vec::new(), &TokenStore::new(), Some("nothing"));
        dropdown.navigate(Direction::Down);
        assert!(dropdown.highlighted().is_none());
        dropdown.highlight(0);
        assert!(dropdown.highlighted().is_none());
    }

    #[test]
    fn test_server_no_match_row_is_inert() {
        let mut tokens = TokenStore::new();
        tokens.add_token(Token::new(NO_MATCH_VALUE, "stray"), true);
        let mut dropdown = Dropdown::default();
        dropdown.show(
            vec![Suggestion::no_match("Nothing found"), Suggestion::new("1", "Apple")],
            &tokens,
            None,
        );

        assert!(dropdown.entries()[0].is_placeholder());
        assert!(!dropdown.entries()[0].active);
        assert!(dropdown.highlighted().is_none());
        dropdown.navigate(Direction::Down);
        assert_eq!(dropdown.highlighted().map(|e| e.suggestion.text.as_str()), Some("Apple"));
    }
}
