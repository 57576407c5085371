use eframe::egui::{Color32, RichText, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{dim_color, rgb};

fn swatch(ui: &mut Ui, color: Color32) {
    let (rect, _) = ui.allocate_exact_size(vec2(14.0, 14.0), Sense::hover());
    ui.painter().circle_filled(rect.center(), 6.0, color);
    ui.painter()
        .circle_stroke(rect.center(), 6.0, Stroke::new(1.0, dim_color(color, 0.55)));
}

impl ViewModel {
    pub(in crate::app) fn draw_legend(&self, ui: &mut Ui) {
        ui.label(RichText::new("Categories").strong());

        let palette = self.chart.palette();
        if palette.is_empty() {
            ui.label("No categories loaded.");
            return;
        }

        for (category, color) in palette.entries() {
            ui.horizontal(|ui| {
                swatch(ui, rgb(color));
                ui.label(category);
            });
        }
        ui.horizontal(|ui| {
            swatch(ui, Color32::WHITE);
            ui.label("Credit (negative amount)");
        });
    }
}
