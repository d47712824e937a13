use std::path::Path;

use serde_json::Value;
use tracing::warn;

use super::metadata::Metadata;
use super::record::{RawRecord, RecordError};

/// Category given to records that carry none and have no caller default.
pub const DEFAULT_CATEGORY: &str = "general";

const TEXT_KEYS: [&str; 5] = ["text", "fact", "content", "description", "title"];
const CATEGORY_KEYS: [&str; 2] = ["category", "topic"];
const LIST_KEYS: [&str; 3] = ["facts", "data", "results"];
const SOURCE_URL_KEYS: [&str; 3] = ["source_url", "url", "source"];

/// Where a document came from and what to fill in for records that omit a category.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions<'a> {
    /// Recorded as `source_file` metadata on every parsed record. Its file stem
    /// is the category fallback when `default_category` is unset.
    pub source_file: Option<&'a str>,
    pub default_category: Option<&'a str>,
}

impl<'a> ParseOptions<'a> {
    pub fn from_file(source_file: &'a str) -> Self {
        ParseOptions {
            source_file: Some(source_file),
            default_category: None,
        }
    }

    pub fn with_default_category(mut self, category: Option<&'a str>) -> Self {
        self.default_category = category;
        self
    }

    /// `default_category`, else the source file stem, else [`DEFAULT_CATEGORY`].
    pub fn fallback_category(&self) -> &'a str {
        self.default_category
            .or_else(|| {
                self.source_file
                    .and_then(|file| Path::new(file).file_stem())
                    .and_then(|stem| stem.to_str())
                    .filter(|stem| !stem.is_empty())
            })
            .unwrap_or(DEFAULT_CATEGORY)
    }
}

/// Records recovered from a document, plus the items that had to be skipped.
#[derive(Debug, Default)]
pub struct ParsedRecords {
    pub records: Vec<RawRecord>,
    /// One `MalformedRecord` per skipped item, indexed by position in the document's list.
    pub rejected: Vec<RecordError>,
}

/// Extract raw records from a loosely structured JSON document.
///
/// Accepted shapes:
/// - a list of items
/// - an object holding the list under `facts`, `data` or `results`
/// - a single object item
///
/// An item is a bare string or an object. Text is the first non-empty string
/// among `text`, `fact`, `content`, `description`, `title`. Other scalar fields
/// land in metadata; the first of `source_url`, `url`, `source` is also
/// recorded as `source_url`.
///
/// Items without usable text are skipped and listed in `rejected`; the rest of
/// the document still parses. Only a document of the wrong shape is an error.
pub fn parse_records(
    document: &Value,
    options: ParseOptions<'_>,
) -> Result<ParsedRecords, RecordError> {
    let fallback = options.fallback_category();

    let items: Vec<&Value> = match document {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match LIST_KEYS.iter().find_map(|k| map.get(*k)) {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![document],
        },
        _ => {
            return Err(RecordError::MalformedRecord {
                index: 0,
                reason: "document is neither a list nor an object".into(),
            })
        }
    };

    let mut parsed = ParsedRecords::default();
    for (index, item) in items.into_iter().enumerate() {
        match parse_item(index, item, fallback) {
            Ok(mut raw) => {
                if let Some(file) = options.source_file {
                    if raw.metadata.get("source_file").is_none() {
                        raw.metadata.insert("source_file", file);
                    }
                }
                parsed.records.push(raw);
            }
            Err(err) => parsed.rejected.push(err),
        }
    }

    if !parsed.rejected.is_empty() {
        warn!(
            skipped = parsed.rejected.len(),
            kept = parsed.records.len(),
            source = options.source_file.unwrap_or("<document>"),
            "skipped items without usable text"
        );
    }

    Ok(parsed)
}

fn parse_item(index: usize, item: &Value, fallback: &str) -> Result<RawRecord, RecordError> {
    let map = match item {
        Value::String(text) if !text.trim().is_empty() => {
            return Ok(RawRecord::new(text.clone(), fallback))
        }
        Value::String(_) => {
            return Err(RecordError::MalformedRecord {
                index,
                reason: "blank text".into(),
            })
        }
        Value::Object(map) => map,
        _ => {
            return Err(RecordError::MalformedRecord {
                index,
                reason: "item is neither a string nor an object".into(),
            })
        }
    };

    let (text_key, text) = TEXT_KEYS
        .iter()
        .find_map(|k| match map.get(*k) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some((*k, s.clone())),
            _ => None,
        })
        .ok_or_else(|| RecordError::MalformedRecord {
            index,
            reason: "no non-empty text field".into(),
        })?;

    let (category_key, category) = CATEGORY_KEYS
        .iter()
        .find_map(|k| match map.get(*k) {
            Some(Value::String(s)) if !s.is_empty() => Some((Some(*k), s.clone())),
            _ => None,
        })
        .unwrap_or((None, fallback.to_string()));

    let mut metadata = Metadata::new();
    for (key, value) in map {
        if key == text_key || Some(key.as_str()) == category_key {
            continue;
        }
        if let Some(scalar) = scalar_to_string(value) {
            metadata.insert(key.clone(), scalar);
        }
    }
    if metadata.get("source_url").is_none() {
        if let Some(url) = SOURCE_URL_KEYS
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str))
        {
            metadata.insert("source_url", url);
        }
    }

    Ok(RawRecord {
        text,
        category,
        metadata,
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
