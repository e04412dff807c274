//! Token Field
//!
//! Text input that turns typed or chosen text into tokens (chips), offers
//! autocomplete suggestions from a static list or a remote endpoint, and
//! mirrors the tokens into a hidden multi-select for form submission.

pub mod models;
pub mod error;
pub mod config;
pub mod store;
pub mod input;
pub mod suggest;
pub mod remote;
pub mod state;
pub mod logger;
pub mod registry;
pub mod context;
pub mod components;
pub mod field;
pub mod bindings;

pub use config::{FieldOptions, TokenFieldConfig};
pub use error::FieldError;
pub use field::{attach, find, TokenFieldHandle};
pub use models::{FieldEvent, SelectMode, Suggestion, Token};
