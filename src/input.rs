//! Input Surface
//!
//! Maps raw key events on the editable span to field intents.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// What a key-down means for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDownIntent {
    /// Enter / Tab: commit highlighted suggestion or free text.
    Commit,
    /// Backspace on empty input.
    DeleteLast,
    /// Arrow keys while the dropdown has entries.
    Navigate(Direction),
    Ignore,
}

/// What a key-up means for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUpIntent {
    /// Escape.
    Close,
    /// Already handled on key-down.
    Navigate,
    /// Text may have changed; rebuild suggestions.
    Requery,
    Ignore,
}

/// Keys that never change the input text.
const NON_TEXT_KEYS: &[&str] = &[
    "ArrowLeft",
    "ArrowRight",
    "Enter",
    "Tab",
    "Shift",
    "Control",
    "Alt",
    "AltGraph",
    "Meta",
    "CapsLock",
    "Home",
    "End",
    "PageUp",
    "PageDown",
];

pub fn classify_keydown(key: &str, input_empty: bool, dropdown_open: bool) -> KeyDownIntent {
    match key {
        "Enter" | "Tab" => KeyDownIntent::Commit,
        "Backspace" if input_empty => KeyDownIntent::DeleteLast,
        "ArrowUp" if dropdown_open => KeyDownIntent::Navigate(Direction::Up),
        "ArrowDown" if dropdown_open => KeyDownIntent::Navigate(Direction::Down),
        _ => KeyDownIntent::Ignore,
    }
}

pub fn classify_keyup(key: &str) -> KeyUpIntent {
    match key {
        "Escape" | "Esc" => KeyUpIntent::Close,
        "ArrowUp" | "ArrowDown" => KeyUpIntent::Navigate,
        k if NON_TEXT_KEYS.contains(&k) => KeyUpIntent::Ignore,
        _ => KeyUpIntent::Requery,
    }
}

/// Plain text to insert for a paste: line breaks collapse to single spaces.
pub fn sanitize_paste(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text content of the editable span, without the stray line break
/// browsers leave in an emptied contenteditable.
pub fn normalize_input(raw: &str) -> String {
    raw.trim_end_matches(['\r', '\n']).to_string()
}
