//! Debug Logger
//!
//! Per-field diagnostic output to the browser console. Off by default.

#[derive(Clone, Debug)]
pub struct FieldLogger {
    prefix: String,
    enabled: bool,
}

impl FieldLogger {
    pub fn new(field_id: &str) -> Self {
        Self {
            prefix: format!("[TokenField#{}]", field_id),
            enabled: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn format(&self, message: &str) -> String {
        format!("{} {}", self.prefix, message)
    }

    pub fn log(&self, message: impl AsRef<str>) {
        if self.enabled {
            web_sys::console::log_1(&self.format(message.as_ref()).into());
        }
    }
}
