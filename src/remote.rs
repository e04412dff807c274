//! Remote Suggestions
//!
//! One logical request per field; a newer request makes older responses stale.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, Request, RequestInit, Response};

use crate::error::{FieldError, Result};
use crate::models::{Suggestion, SuggestionSeed};

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Default URI builder: `base?query=<encoded>` (or `&query=` if `base` has a query string).
pub fn build_query_uri(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}query={}", base, separator, utf8_percent_encode(query, QUERY_VALUE))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestTicket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestTracker {
    issued: u64,
    current: Option<u64>,
}

impl RequestTracker {
    /// Start a request; any previous ticket becomes stale.
    pub fn begin(&mut self) -> RequestTicket {
        self.issued += 1;
        self.current = Some(self.issued);
        RequestTicket(self.issued)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        self.current == Some(ticket.0)
    }

    /// Complete a request. Returns false (and changes nothing) for stale tickets.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.current = None;
        true
    }

    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn in_flight(&self) -> bool {
        self.current.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CompletionsBody {
    Wrapped { completions: Vec<SuggestionSeed> },
    Bare(Vec<SuggestionSeed>),
}

/// Accepts `{"completions": [...]}` or a bare array; entries may be strings.
pub fn parse_completions(body: &str) -> Result<Vec<Suggestion>> {
    let seeds = match serde_json::from_str::<CompletionsBody>(body)? {
        CompletionsBody::Wrapped { completions } => completions,
        CompletionsBody::Bare(list) => list,
    };
    Ok(seeds.into_iter().map(Suggestion::from).collect())
}

/// GET `uri` and parse the completions. Aborting `signal` rejects the future.
pub async fn fetch_completions(uri: &str, signal: &AbortSignal) -> Result<Vec<Suggestion>> {
    let window = web_sys::window().ok_or_else(|| FieldError::Js("no window".to_string()))?;

    let init = RequestInit::new();
    init.set_method("GET");
    init.set_signal(Some(signal));
    let request = Request::new_with_str_and_init(uri, &init)?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(FieldError::Js(format!("HTTP {} from {}", response.status(), uri)));
    }

    let body = JsFuture::from(response.text()?).await?;
    parse_completions(&body.as_string().unwrap_or_default())
}
