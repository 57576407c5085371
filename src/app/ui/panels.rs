use eframe::egui::{self, Align, Context, Layout};
use ledger_bubbles::util::format_currency;
use ledger_bubbles::{BubbleChart, ChartConfig, LoadReport};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_RECORD_ROWS: usize = 40;
    pub(in crate::app) const RECORD_PAGE_ROWS: usize = 40;
    pub(in crate::app) const RECORD_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(
        report: LoadReport,
        config: ChartConfig,
        initial_mode: &str,
    ) -> Self {
        let mut chart = BubbleChart::from_records(&report.records, config);
        chart.set_view_mode_token(initial_mode);

        Self {
            chart,
            report,
            search: String::new(),
            search_match_cache: None,
            live_physics: true,
            show_quadtree_overlay: false,
            show_records: false,
            quadtree_cells: Vec::new(),
            record_rows_visible: Self::INITIAL_RECORD_ROWS,
        }
    }

    fn summary_text(&self) -> String {
        let prefix = self.chart.config().currency_prefix.as_str();
        format!(
            "{} records  |  total {}  |  {} rejected  |  {} filtered out",
            self.chart.nodes().len(),
            format_currency(prefix, self.chart.total_amount()),
            self.report.rejected.len(),
            self.report.filtered_out
        )
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("ledger-bubbles");
                    ui.separator();
                    ui.label(self.summary_text());
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload sources"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("view: {}", self.chart.mode().label()));
                        if is_loading {
                            ui.spinner();
                        }
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("controls_scroll")
                    .show(ui, |ui| self.draw_controls(ui));
            });

        if self.show_records {
            egui::TopBottomPanel::bottom("records")
                .resizable(true)
                .default_height(260.0)
                .show(ctx, |ui| self.draw_records(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.chart.nodes().is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("No records passed the load filters.");
                });
            } else {
                self.draw_canvas(ui);
            }
        });
    }
}
