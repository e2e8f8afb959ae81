//! Named editor snapshots.
//!
//! Templates are kept as one JSON array under [`TEMPLATES_KEY`], in
//! insertion order. Each record is `{name, settings, createdAt}` where
//! `settings` is a flat object of camelCase fields: every style field,
//! the offsets, the image transform, the texts, the background image data
//! URL and the preview background.
//!
//! Names are unique. Saving under an existing name replaces the record
//! in place only if the caller confirms.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KeyValueStore;
use crate::editor::PreviewBackground;
use crate::error::QuoteCardError;
use crate::render::ImageTransform;
use crate::style::{ManualOffsets, StyleParameters};

pub const TEMPLATES_KEY: &str = "quoteTemplates";

/// Texts stored with a template; absent fields leave the editor's text alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateContent {
    #[serde(rename = "quote1Text", skip_serializing_if = "Option::is_none")]
    pub quote1: Option<String>,
    #[serde(rename = "quote2Text", skip_serializing_if = "Option::is_none")]
    pub quote2: Option<String>,
    #[serde(rename = "authorText", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// Everything needed to restore the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSettings {
    #[serde(flatten)]
    pub style: StyleParameters,
    #[serde(flatten)]
    pub offsets: ManualOffsets,
    #[serde(flatten)]
    pub image: ImageTransform,
    #[serde(flatten)]
    pub content: TemplateContent,
    #[serde(default)]
    pub background_image_data: Option<String>,
    #[serde(default)]
    pub preview_bg: PreviewBackground,
    /// Older records store the quote-2 switch under this name.
    #[serde(default)]
    pub enable_quote2_toggle: Option<bool>,
}

impl TemplateSettings {
    /// Style with the legacy quote-2 switch applied.
    pub fn effective_style(&self) -> StyleParameters {
        let mut style = self.style.clone();
        if let Some(enabled) = self.enable_quote2_toggle {
            style.enable_quote2 = enabled;
        }
        style
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub name: String,
    pub settings: TemplateSettings,
    /// ISO-8601 timestamp.
    #[serde(default)]
    pub created_at: String,
}

/// Listing entry; available even when a record's settings are unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub index: usize,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(String),
    Overwritten(String),
    /// The name existed and the caller declined to overwrite.
    Declined(String),
}

/// Template operations over a key-value store.
pub struct TemplateStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> TemplateStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Raw records; a missing or unreadable blob counts as empty.
    fn records(&self) -> Vec<Value> {
        let raw = match self.store.get(TEMPLATES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read templates: {}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) | Err(_) => {
                log::warn!("Stored templates are corrupt; treating as empty");
                Vec::new()
            }
        }
    }

    fn write(&self, records: &[Value]) -> Result<(), QuoteCardError> {
        let json = serde_json::to_string(records)?;
        self.store.set(TEMPLATES_KEY, &json)
    }

    fn record_name(record: &Value) -> Option<&str> {
        record.get("name").and_then(Value::as_str)
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.records()
            .iter()
            .enumerate()
            .map(|(index, record)| TemplateSummary {
                index,
                name: Self::record_name(record).unwrap_or_default().to_string(),
                created_at: record
                    .get("createdAt")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    /// Template at `index`; `Ok(None)` when out of range.
    pub fn get(&self, index: usize) -> Result<Option<Template>, QuoteCardError> {
        let Some(record) = self.records().into_iter().nth(index) else {
            return Ok(None);
        };
        serde_json::from_value(record)
            .map(Some)
            .map_err(|e| QuoteCardError::Store(format!("Template #{} is unreadable: {}", index, e)))
    }

    /// First template named exactly `name`.
    pub fn find(&self, name: &str) -> Result<Option<Template>, QuoteCardError> {
        let index = self
            .records()
            .iter()
            .position(|record| Self::record_name(record) == Some(name));
        match index {
            Some(index) => self.get(index),
            None => Ok(None),
        }
    }

    /// Save `settings` under `name` (blank names become `Template N`).
    ///
    /// When the name exists, `confirm_overwrite` decides whether the old
    /// record is replaced in place; declining leaves the store untouched.
    pub fn save<F>(
        &self,
        name: &str,
        settings: TemplateSettings,
        confirm_overwrite: F,
    ) -> Result<SaveOutcome, QuoteCardError>
    where
        F: FnOnce(&str) -> bool,
    {
        let mut records = self.records();
        let name = match name.trim() {
            "" => format!("Template {}", records.len() + 1),
            trimmed => trimmed.to_string(),
        };

        let template = Template {
            name: name.clone(),
            settings,
            created_at: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let record = serde_json::to_value(&template)?;

        let outcome = match records
            .iter()
            .position(|r| Self::record_name(r) == Some(name.as_str()))
        {
            Some(index) => {
                if !confirm_overwrite(&name) {
                    return Ok(SaveOutcome::Declined(name));
                }
                records[index] = record;
                SaveOutcome::Overwritten(name)
            }
            None => {
                records.push(record);
                SaveOutcome::Created(name)
            }
        };

        self.write(&records)?;
        log::info!("Saved template {:?}", outcome);
        Ok(outcome)
    }

    /// Delete the record at `index` after confirmation; returns the deleted name.
    pub fn delete<F>(&self, index: usize, confirm: F) -> Result<Option<String>, QuoteCardError>
    where
        F: FnOnce(&str) -> bool,
    {
        let mut records = self.records();
        if index >= records.len() {
            return Ok(None);
        }
        let name = Self::record_name(&records[index])
            .unwrap_or_default()
            .to_string();
        if !confirm(&name) {
            return Ok(None);
        }
        records.remove(index);
        self.write(&records)?;
        log::info!("Deleted template '{}'", name);
        Ok(Some(name))
    }

    /// Delete the first record named `name`.
    pub fn delete_by_name<F>(&self, name: &str, confirm: F) -> Result<Option<String>, QuoteCardError>
    where
        F: FnOnce(&str) -> bool,
    {
        match self
            .records()
            .iter()
            .position(|r| Self::record_name(r) == Some(name))
        {
            Some(index) => self.delete(index, confirm),
            None => Ok(None),
        }
    }
}
