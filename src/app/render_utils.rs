use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};
use ledger_bubbles::CanvasSize;
use ledger_bubbles::chart::{CATEGORY_COLORS, Fill, Rgb};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);

#[derive(Clone, Copy, Debug)]
pub(super) struct CanvasFrame {
    pub rect: Rect,
    pub scale: f32,
}

impl CanvasFrame {
    pub(super) fn fit(available: Rect, canvas: CanvasSize) -> Self {
        let scale = (available.width() / canvas.width)
            .min(available.height() / canvas.height)
            .max(f32::EPSILON);
        let size = vec2(canvas.width * scale, canvas.height * scale);

        Self {
            rect: Rect::from_center_size(available.center(), size),
            scale,
        }
    }

    pub(super) fn to_screen(self, point: Vec2) -> Pos2 {
        self.rect.min + point * self.scale
    }

    pub(super) fn to_canvas(self, screen: Pos2) -> Vec2 {
        (screen - self.rect.min) / self.scale
    }

    pub(super) fn length(self, canvas_length: f32) -> f32 {
        canvas_length * self.scale
    }
}

pub(super) fn rgb(color: Rgb) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

pub(super) fn fill_color(fill: Fill) -> Color32 {
    match fill {
        Fill::Category(index) => rgb(CATEGORY_COLORS[index % CATEGORY_COLORS.len()]),
        Fill::Credit => Color32::WHITE,
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, screen: Rect, frame: CanvasFrame) {
    painter.rect_filled(screen, 0.0, BACKGROUND);
    painter.rect_filled(frame.rect, 0.0, Color32::from_rgb(24, 29, 36));

    let border = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 140));
    let corners = [
        frame.rect.left_top(),
        frame.rect.right_top(),
        frame.rect.right_bottom(),
        frame.rect.left_bottom(),
    ];
    for index in 0..corners.len() {
        painter.line_segment([corners[index], corners[(index + 1) % corners.len()]], border);
    }
}

pub(super) fn draw_square(
    painter: &Painter,
    frame: CanvasFrame,
    center: Vec2,
    half: f32,
    stroke: Stroke,
) {
    let top_left = frame.to_screen(center + vec2(-half, -half));
    let top_right = frame.to_screen(center + vec2(half, -half));
    let bottom_right = frame.to_screen(center + vec2(half, half));
    let bottom_left = frame.to_screen(center + vec2(-half, half));

    painter.line_segment([top_left, top_right], stroke);
    painter.line_segment([top_right, bottom_right], stroke);
    painter.line_segment([bottom_right, bottom_left], stroke);
    painter.line_segment([bottom_left, top_left], stroke);
}
