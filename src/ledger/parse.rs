use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::RecordError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub area: String,
    #[serde(default, alias = "org")]
    pub account: String,
    #[serde(default)]
    pub voucher_type: String,
    #[serde(default)]
    pub revenue_sign: String,
}

impl RawRecord {
    fn from_json_object(object: &Map<String, Value>) -> Self {
        Self {
            id: json_text(object, &["id"]),
            amount: json_text(object, &["amount"]),
            date: json_text(object, &["date"]),
            category: json_text(object, &["category"]),
            description: Some(json_text(object, &["description"])).filter(|text| !text.is_empty()),
            area: json_text(object, &["area"]),
            account: json_text(object, &["account", "org"]),
            voucher_type: json_text(object, &["voucher_type"]),
            revenue_sign: json_text(object, &["revenue_sign"]),
        }
    }
}

fn json_text(object: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| object.get(*key))
        .map(|value| match value {
            Value::String(text) => text.trim().to_owned(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

/// Reads a headed CSV document. Rows that do not fit the header are returned
/// as errors next to the rows that did.
pub fn parse_csv(source_name: &str, text: &str) -> Result<(Vec<RawRecord>, Vec<RecordError>)> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    reader
        .headers()
        .with_context(|| format!("failed to read CSV header from {source_name}"))?;

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        match row {
            Ok(record) => records.push(record),
            Err(error) => errors.push(RecordError::Malformed {
                source_name: source_name.to_owned(),
                line: error.position().map(|position| position.line()).unwrap_or(0),
                message: error.to_string(),
            }),
        }
    }

    Ok((records, errors))
}

pub fn parse_json(source_name: &str, text: &str) -> Result<(Vec<RawRecord>, Vec<RecordError>)> {
    let parsed: Value = serde_json::from_str(text)
        .with_context(|| format!("invalid JSON in {source_name}"))?;
    let rows = parsed
        .as_array()
        .ok_or_else(|| anyhow!("expected a JSON array of rows in {source_name}"))?;

    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        match row.as_object() {
            Some(object) => records.push(RawRecord::from_json_object(object)),
            None => errors.push(RecordError::Malformed {
                source_name: source_name.to_owned(),
                line: index as u64 + 1,
                message: format!("expected an object, found {row}"),
            }),
        }
    }

    Ok((records, errors))
}
