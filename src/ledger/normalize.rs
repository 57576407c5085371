use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use eframe::egui::vec2;
use tracing::{debug, warn};

use crate::chart::{RadiusScale, VisualNode};
use crate::config::ChartConfig;
use crate::util::stable_pair;

use super::error::{RecordError, RecordResult};
use super::parse::{RawRecord, TIMESTAMP_FORMAT};

const UNASSIGNED: &str = "Unassigned";

/// A row whose fields passed coercion. `signed_amount` keeps the input sign.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedRecord {
    pub id: String,
    pub signed_amount: f64,
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub description: String,
    pub area: String,
    pub account: String,
    pub voucher_type: String,
    pub revenue_sign: Option<f64>,
}

pub fn parse_record(raw: &RawRecord) -> RecordResult<ParsedRecord> {
    let id = raw.id.trim();
    if id.is_empty() {
        return Err(RecordError::MissingField {
            id: "(no id)".to_owned(),
            field: "id",
        });
    }

    let signed_amount = parse_number(id, "amount", &raw.amount)?.ok_or_else(|| {
        RecordError::MissingField {
            id: id.to_owned(),
            field: "amount",
        }
    })?;

    let timestamp = NaiveDateTime::parse_from_str(raw.date.trim(), TIMESTAMP_FORMAT).map_err(
        |_| RecordError::InvalidTimestamp {
            id: id.to_owned(),
            raw: raw.date.clone(),
        },
    )?;

    let revenue_sign = parse_number(id, "revenue_sign", &raw.revenue_sign)?;
    let category = or_unassigned(&raw.category);
    let description = raw
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| category.clone());

    Ok(ParsedRecord {
        id: id.to_owned(),
        signed_amount,
        timestamp,
        category,
        description,
        area: or_unassigned(&raw.area),
        account: or_unassigned(&raw.account),
        voucher_type: raw.voucher_type.trim().to_owned(),
        revenue_sign,
    })
}

fn parse_number(id: &str, field: &'static str, raw: &str) -> RecordResult<Option<f64>> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }

    let digits = text.strip_prefix('+').unwrap_or(text);
    match digits.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(RecordError::InvalidNumber {
            id: id.to_owned(),
            field,
            raw: raw.to_owned(),
        }),
    }
}

fn or_unassigned(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNASSIGNED.to_owned()
    } else {
        value.to_owned()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoadFilter {
    /// Inclusive lower bound on the row date.
    pub cutoff: Option<NaiveDate>,
    pub voucher_type: Option<String>,
    pub require_positive_sign: bool,
}

impl Default for LoadFilter {
    fn default() -> Self {
        Self {
            cutoff: NaiveDate::from_ymd_opt(2016, 1, 1),
            voucher_type: Some("AP".to_owned()),
            require_positive_sign: true,
        }
    }
}

impl LoadFilter {
    pub fn permissive() -> Self {
        Self {
            cutoff: None,
            voucher_type: None,
            require_positive_sign: false,
        }
    }

    pub fn accepts(&self, record: &ParsedRecord) -> bool {
        if let Some(cutoff) = self.cutoff
            && record.timestamp.date() < cutoff
        {
            return false;
        }

        if let Some(voucher_type) = &self.voucher_type
            && !record.voucher_type.eq_ignore_ascii_case(voucher_type)
        {
            return false;
        }

        !self.require_positive_sign || record.revenue_sign.is_some_and(|sign| sign > 0.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub records: Vec<ParsedRecord>,
    pub rejected: Vec<RecordError>,
    pub filtered_out: usize,
}

impl LoadReport {
    pub fn total_seen(&self) -> usize {
        self.records.len() + self.rejected.len() + self.filtered_out
    }
}

#[derive(Default)]
struct UniqueIds {
    emitted: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl UniqueIds {
    /// Returns `id` unchanged the first time, then the lowest free `id#n`.
    fn claim(&mut self, id: String) -> String {
        if !self.emitted.contains(&id) {
            self.emitted.insert(id.clone());
            return id;
        }

        let suffix = self.next_suffix.entry(id.clone()).or_insert(2);
        let mut candidate = format!("{id}#{suffix}");
        while self.emitted.contains(&candidate) {
            *suffix += 1;
            candidate = format!("{id}#{suffix}");
        }
        *suffix += 1;
        self.emitted.insert(candidate.clone());
        candidate
    }
}

/// Coerces, validates and filters raw rows. Ids repeated across merged
/// sources get a `#n` suffix so every node keeps a distinct key.
pub fn normalize_records(raws: &[RawRecord], filter: &LoadFilter) -> LoadReport {
    let mut report = LoadReport::default();
    let mut ids = UniqueIds::default();

    for raw in raws {
        let mut record = match parse_record(raw) {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "rejected ledger row");
                report.rejected.push(error);
                continue;
            }
        };

        if !filter.accepts(&record) {
            report.filtered_out += 1;
            continue;
        }

        record.id = ids.claim(record.id);
        report.records.push(record);
    }

    debug!(
        accepted = report.records.len(),
        rejected = report.rejected.len(),
        filtered_out = report.filtered_out,
        "normalized ledger rows"
    );
    report
}

pub fn build_nodes(records: &[ParsedRecord], config: &ChartConfig) -> Vec<VisualNode> {
    let max_amount = records
        .iter()
        .map(|record| record.signed_amount.abs())
        .fold(0.0_f64, f64::max);
    let scale = RadiusScale::new(max_amount, config.radius_range, config.radius_exponent);
    let canvas = config.canvas;

    let mut nodes = records
        .iter()
        .map(|record| {
            let (jx, jy) = stable_pair(&record.id);
            let position = vec2(
                (jx + 1.0) * 0.5 * canvas.width,
                (jy + 1.0) * 0.5 * canvas.height,
            );
            VisualNode::from_record(record, scale.radius(record.signed_amount.abs()), position)
        })
        .collect::<Vec<_>>();

    nodes.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    nodes
}
