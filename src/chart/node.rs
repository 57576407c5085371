use chrono::{Datelike, NaiveDateTime};
use eframe::egui::Vec2;

use crate::ledger::ParsedRecord;
use crate::util::month_label;

/// One bubble. Position and velocity belong to the layout engine; everything
/// else is fixed when the node is built.
#[derive(Clone, Debug)]
pub struct VisualNode {
    pub id: String,
    pub amount: f64,
    pub radius: f32,
    pub category: String,
    pub description: String,
    pub area: String,
    pub account: String,
    pub month0: u32,
    pub year: i32,
    pub is_credit: bool,
    pub timestamp: NaiveDateTime,
    position: Vec2,
    velocity: Vec2,
}

impl VisualNode {
    pub fn from_record(record: &ParsedRecord, radius: f32, position: Vec2) -> Self {
        Self {
            id: record.id.clone(),
            amount: record.signed_amount.abs(),
            radius,
            category: record.category.clone(),
            description: record.description.clone(),
            area: record.area.clone(),
            account: record.account.clone(),
            month0: record.timestamp.month0(),
            year: record.timestamp.year(),
            is_credit: record.signed_amount < 0.0,
            timestamp: record.timestamp,
            position,
            velocity: Vec2::ZERO,
        }
    }

    pub fn month_label(&self) -> &'static str {
        month_label(self.month0)
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub(super) fn integrate(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        self.position += velocity;
    }
}
