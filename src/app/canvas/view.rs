use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Stroke, Ui, vec2};
use ledger_bubbles::util::{format_currency, format_period};

use super::super::ViewModel;
use super::super::render_utils::{
    CanvasFrame, blend_color, dim_color, draw_background, draw_square, fill_color,
};

const TITLE_LINE_GAP: f32 = 16.0;

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (screen, response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let painter = ui.painter_at(screen);
        let frame = CanvasFrame::fit(screen, self.chart.config().canvas);

        draw_background(&painter, screen, frame);

        if self.live_physics {
            let elapsed = ui.ctx().input(|input| input.stable_dt).clamp(0.0, 0.25);
            if self.chart.update(elapsed) {
                ui.ctx().request_repaint();
            }
        }

        if self.show_quadtree_overlay {
            self.chart.quadtree_cells(&mut self.quadtree_cells);
            for cell in &self.quadtree_cells {
                let alpha = if cell.is_leaf { 110 } else { 55 };
                let line_width: f32 = (1.4_f32 - (cell.depth as f32 * 0.09_f32)).clamp(0.45, 1.4);
                let stroke = Stroke::new(
                    line_width,
                    Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
                );
                draw_square(&painter, frame, cell.center, cell.half_extent, stroke);
            }
        }

        let search_matches = self.cached_search_matches();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());
        let hovered = self.hovered_marker(ui, frame);

        for (index, marker) in self.chart.markers().iter().enumerate() {
            let position = frame.to_screen(marker.position());
            let radius = frame.length(marker.radius).max(1.0);
            let is_hovered = hovered == Some(index);
            let is_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&index));

            let base_color = fill_color(marker.fill);
            let color = if is_hovered {
                blend_color(base_color, Color32::from_rgb(255, 164, 101), 0.55)
            } else if is_match {
                blend_color(base_color, Color32::from_rgb(103, 196, 255), 0.35)
            } else if search_active {
                dim_color(base_color, 0.38)
            } else {
                base_color
            };

            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_match { 1.55 } else { 1.0 },
                    dim_color(base_color, 0.55),
                ),
            );
        }

        let currency_prefix = self.chart.config().currency_prefix.as_str();
        for title in self.chart.titles() {
            let anchor = frame.to_screen(title.position);
            let [heading, total] = title.lines(currency_prefix);
            painter.text(
                anchor,
                Align2::CENTER_BOTTOM,
                heading,
                FontId::proportional(15.0),
                Color32::from_gray(238),
            );
            painter.text(
                anchor + vec2(0.0, TITLE_LINE_GAP),
                Align2::CENTER_BOTTOM,
                total,
                FontId::proportional(13.0),
                Color32::from_gray(190),
            );
        }

        let Some(index) = hovered else {
            return;
        };
        let Some(node) = self.node_for_marker(index) else {
            return;
        };

        ui.output_mut(|output| {
            output.cursor_icon = egui::CursorIcon::PointingHand;
        });
        response.on_hover_ui_at_pointer(|ui| {
            ui.label(RichText::new(node.account.as_str()).strong());
            ui.label(node.description.as_str());
            ui.label(format!(
                "Amount: {}{}",
                format_currency(currency_prefix, node.amount),
                if node.is_credit { " (credit)" } else { "" }
            ));
            ui.label(format!("Period: {}", format_period(&node.timestamp)));
            ui.small(format!("{} \u{b7} {}", node.category, node.area));
        });
    }
}
