//! UI Components
//!
//! Leptos components rendering one token field.

mod token_field;
mod token_chip;
mod suggestion_dropdown;

pub use token_field::TokenFieldView;
pub use token_chip::TokenChip;
pub use suggestion_dropdown::SuggestionDropdown;
