use eframe::egui::{self, RichText, Ui};
use ledger_bubbles::util::format_currency;

use super::super::ViewModel;

const ROW_HEIGHT: f32 = 20.0;

impl ViewModel {
    pub(in crate::app) fn draw_records(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("Records").strong());
            ui.small(format!(
                "{} of {} rows accepted",
                self.report.records.len(),
                self.report.total_seen()
            ));
        });

        if !self.report.rejected.is_empty() {
            ui.collapsing(
                format!("Rejected rows ({})", self.report.rejected.len()),
                |ui| {
                    egui::ScrollArea::vertical()
                        .id_salt("rejected_rows_scroll")
                        .max_height(120.0)
                        .show(ui, |ui| {
                            for error in &self.report.rejected {
                                ui.label(error.to_string());
                            }
                        });
                },
            );
        }

        let prefix = self.chart.config().currency_prefix.as_str();
        let records = &self.report.records;
        let row_count = records.len().min(self.record_rows_visible);
        let mut should_load_more = false;

        egui::ScrollArea::vertical()
            .id_salt("records_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, ROW_HEIGHT, row_count, |ui, row_range| {
                if row_range.end + Self::RECORD_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                egui::Grid::new("records_grid")
                    .striped(true)
                    .num_columns(7)
                    .show(ui, |ui| {
                        for index in row_range {
                            let Some(record) = records.get(index) else {
                                continue;
                            };
                            ui.label(record.id.as_str());
                            ui.label(record.timestamp.format("%Y-%m-%d").to_string());
                            ui.label(record.category.as_str());
                            ui.label(record.description.as_str());
                            ui.label(record.area.as_str());
                            ui.label(record.account.as_str());
                            ui.label(format_currency(prefix, record.signed_amount));
                            ui.end_row();
                        }
                    });
            });

        if should_load_more && row_count < records.len() {
            self.record_rows_visible = (row_count + Self::RECORD_PAGE_ROWS).min(records.len());
        }
    }
}
