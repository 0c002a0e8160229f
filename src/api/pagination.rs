//! Cursor/limit pagination codec.
//!
//! Externally the API speaks `limit` + opaque `cursor`; internally the
//! procedure layer takes offset/limit. Cursors are URL-safe base64 over a
//! decimal offset. Decoding is lenient: anything unreadable means
//! "first page" rather than an error.

use std::collections::HashMap;

use base64::Engine as _;
use serde::Serialize;

use crate::config::ApiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u32,
    pub offset: u64,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T: Serialize> {
    pub items: Vec<T>,
    pub limit: u32,
    pub next_cursor: Option<String>,
    pub total: Option<u64>,
}

/// Decode `limit` and `cursor` query parameters into a page window.
/// A missing or non-positive limit falls back to the configured default;
/// anything above the maximum is clamped down to it.
pub fn decode(params: &HashMap<String, String>, api: &ApiConfig) -> PageWindow {
    let limit = match params.get("limit").map(|s| s.parse::<i64>()) {
        Some(Ok(l)) if l >= 1 => (l as u64).min(api.max_page_size as u64) as u32,
        _ => api.default_page_size,
    };

    let offset = params
        .get("cursor")
        .and_then(|c| decode_cursor(c))
        .unwrap_or(0);

    PageWindow { limit, offset }
}

/// Wrap one page of items with pagination metadata. `next_cursor` is
/// present iff items remain past this window.
pub fn paginate<T: Serialize>(items: Vec<T>, window: PageWindow, total: u64) -> Paginated<T> {
    let consumed = window.offset + items.len() as u64;
    let next_cursor = (consumed < total).then(|| encode_cursor(consumed));

    Paginated {
        items,
        limit: window.limit,
        next_cursor,
        total: Some(total),
    }
}

pub fn encode_cursor(offset: u64) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(offset.to_string())
}

fn decode_cursor(cursor: &str) -> Option<u64> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(cursor)
        .ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}
