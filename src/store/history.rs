//! Recently generated quotes, most recent first.
//!
//! The history feeds the quote prompt so new generations avoid repeating
//! recent ones. Loading and saving never fail: a missing or corrupt blob
//! yields an empty history and write errors are only logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KeyValueStore;

pub const HISTORY_KEY: &str = "quote1-openai-history";
pub const HISTORY_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteHistory {
    entries: Vec<HistoryEntry>,
}

impl QuoteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `store`, keeping only entries with non-blank text.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = match store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Self::new(),
            Err(e) => {
                log::warn!("Could not load quote history: {}", e);
                return Self::new();
            }
        };

        let items: Vec<Value> = match serde_json::from_str(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => return Self::new(),
            Err(e) => {
                log::warn!("Could not load quote history: {}", e);
                return Self::new();
            }
        };

        let entries = items
            .iter()
            .filter_map(|item| {
                let text = item.get("text")?.as_str()?;
                if text.trim().is_empty() {
                    return None;
                }
                Some(HistoryEntry {
                    text: text.to_string(),
                    ts: item.get("ts").and_then(Value::as_i64).unwrap_or(0),
                })
            })
            .take(HISTORY_LIMIT)
            .collect();

        Self { entries }
    }

    /// Persist to `store`; failures are logged and swallowed.
    pub fn save(&self, store: &dyn KeyValueStore) {
        let result = serde_json::to_string(&self.entries)
            .map_err(crate::error::QuoteCardError::from)
            .and_then(|json| store.set(HISTORY_KEY, &json));
        if let Err(e) = result {
            log::warn!("Could not persist quote history: {}", e);
        }
    }

    /// Record a new quote at the front, dropping the oldest past the limit.
    pub fn push(&mut self, text: impl Into<String>) {
        self.push_at(text, chrono::Utc::now().timestamp_millis());
    }

    pub fn push_at(&mut self, text: impl Into<String>, ts: i64) {
        self.entries.insert(0, HistoryEntry {
            text: text.into(),
            ts,
        });
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Quote texts, most recent first.
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
