use eframe::egui::{self, RichText, Ui};
use ledger_bubbles::ViewMode;
use ledger_bubbles::util::format_currency;

use super::super::ViewModel;

fn mode_hover_text(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::All => "Pull every bubble toward the canvas center.",
        ViewMode::ByMonth => "Split bubbles into one column per posting month.",
        ViewMode::ByArea => "Split bubbles into one column per area.",
        ViewMode::ByAccount => "Split bubbles into one column per account.",
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Grouping");
        ui.add_space(4.0);

        let current = self.chart.mode();
        let mut requested = None;
        ui.horizontal_wrapped(|ui| {
            for mode in ViewMode::ALL {
                if ui
                    .selectable_label(current == mode, mode.label())
                    .on_hover_text(mode_hover_text(mode))
                    .clicked()
                {
                    requested = Some(mode);
                }
            }
        });
        if let Some(mode) = requested {
            self.chart.set_view_mode(mode);
        }

        ui.separator();

        ui.label("Search");
        let search_response = ui
            .add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("description, category or account"),
            )
            .on_hover_text("Highlight bubbles whose text fuzzy-matches the query.");
        if search_response.changed() {
            self.search_match_cache = None;
        }

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Advance the layout every frame until it settles.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the Barnes-Hut partitions over the chart canvas.");
        ui.checkbox(&mut self.show_records, "Show records table")
            .on_hover_text("List accepted and rejected rows below the chart.");

        ui.horizontal(|ui| {
            if ui
                .button("Re-run layout")
                .on_hover_text("Reheat the simulation without changing the grouping.")
                .clicked()
            {
                self.chart.restart();
            }
            if ui
                .add_enabled(!self.chart.is_settled(), egui::Button::new("Stop"))
                .on_hover_text("Freeze bubbles where they are.")
                .clicked()
            {
                self.chart.stop();
            }
        });

        let engine = self.chart.engine();
        ui.small(if engine.is_running() {
            format!(
                "alpha {:.3} after {} ticks",
                engine.alpha(),
                engine.ticks_since_restart()
            )
        } else {
            format!("settled after {} ticks", engine.ticks_since_restart())
        });

        ui.separator();
        self.draw_legend(ui);

        if self.chart.titles().is_empty() {
            return;
        }

        ui.separator();
        ui.label(RichText::new("Group totals").strong());
        let prefix = self.chart.config().currency_prefix.as_str();
        egui::Grid::new("group_totals_grid")
            .striped(true)
            .num_columns(2)
            .show(ui, |ui| {
                for title in self.chart.titles() {
                    ui.label(title.key.as_str());
                    ui.label(format_currency(prefix, title.total));
                    ui.end_row();
                }
            });
    }
}
