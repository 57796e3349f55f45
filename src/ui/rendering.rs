//! Drawing the mock page and the overlay panel.

use super::page::PageElement;
use super::state::PreviewApp;
use crate::hud::{legend_lines, readout_lines, HUD_HEADER_HINT, HUD_TITLE};
use eframe::egui;
use eframe::epaint::StrokeKind;

const HUD_WIDTH: f32 = 230.0;
const HUD_PADDING: f32 = 12.0;
const HUD_HEADER_HEIGHT: f32 = 28.0;
const HUD_LINE_HEIGHT: f32 = 18.0;
const HUD_LEGEND_LINE_HEIGHT: f32 = 14.0;

impl PreviewApp {
    /// Allocates the canvas, processes its input and draws the page and panel.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        self.canvas_origin = canvas_rect.min;

        self.handle_pointer(ui);
        self.handle_wheel(ui);

        let background = if self.dark_mode {
            egui::Color32::from_gray(24)
        } else {
            egui::Color32::from_gray(235)
        };
        painter.rect_filled(canvas_rect, 0.0, background);

        for element in self.page.paint_order() {
            self.draw_element(&painter, element);
        }

        if self.tool.is_active() {
            self.draw_hud(&painter, canvas_rect);
        } else {
            self.hud.last_rect = None;
            self.hud.last_header_rect = None;
        }

        if let Some(rect) = self.target_screen_rect() {
            let cursor = if self.tool.is_dragging() {
                egui::CursorIcon::Grabbing
            } else {
                egui::CursorIcon::Grab
            };
            if response.hover_pos().is_some_and(|p| rect.contains(p)) {
                ui.ctx().set_cursor_icon(cursor);
            }
        }
    }

    fn draw_element(&self, painter: &egui::Painter, element: &PageElement) {
        let rect = element
            .rendered_rect()
            .translate(self.canvas_origin.to_vec2());
        painter.rect_filled(rect, 4.0, element.color);

        let is_target = self
            .tool
            .session()
            .is_some_and(|s| s.target().same_as(&element.style));
        let stroke = if is_target {
            egui::Stroke::new(2.0, egui::Color32::from_rgb(0, 255, 0))
        } else {
            egui::Stroke::new(1.0, egui::Color32::from_gray(90))
        };
        painter.rect_stroke(rect, 4.0, stroke, StrokeKind::Inside);

        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &element.label,
            egui::FontId::proportional(14.0 * rect.height() / element.natural.height()),
            egui::Color32::WHITE,
        );
        painter.text(
            rect.left_top() + egui::vec2(4.0, 2.0),
            egui::Align2::LEFT_TOP,
            format!("#{}", element.id),
            egui::FontId::monospace(10.0),
            egui::Color32::from_white_alpha(160),
        );
    }

    /// Panel rect for this frame: wherever it was dragged, or docked top-right.
    fn hud_rect(&self, canvas_rect: egui::Rect) -> egui::Rect {
        let height = HUD_PADDING * 2.0
            + HUD_HEADER_HEIGHT
            + HUD_LINE_HEIGHT * 3.0
            + 8.0
            + HUD_LEGEND_LINE_HEIGHT * 6.0;
        let size = egui::vec2(HUD_WIDTH, height);
        match self.hud.origin {
            Some(origin) => egui::Rect::from_min_size(self.page_to_screen(origin), size),
            None => {
                let inset = self.tool.config().panel_inset as f32;
                egui::Rect::from_min_size(
                    egui::pos2(canvas_rect.right() - inset - HUD_WIDTH, canvas_rect.top() + inset),
                    size,
                )
            }
        }
    }

    fn draw_hud(&mut self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let Some(report) = self.tool.position() else {
            return;
        };
        let rect = self.hud_rect(canvas_rect);
        let header = egui::Rect::from_min_size(
            rect.min,
            egui::vec2(rect.width(), HUD_PADDING + HUD_HEADER_HEIGHT),
        );
        self.hud.last_rect = Some(rect);
        self.hud.last_header_rect = Some(header);

        painter.rect_filled(rect, 8.0, egui::Color32::from_black_alpha(230));

        let left = rect.left() + HUD_PADDING;
        let mut y = rect.top() + HUD_PADDING;
        painter.text(
            egui::pos2(left, y),
            egui::Align2::LEFT_TOP,
            HUD_TITLE,
            egui::FontId::monospace(13.0),
            egui::Color32::WHITE,
        );
        painter.text(
            egui::pos2(rect.right() - HUD_PADDING, y + 2.0),
            egui::Align2::RIGHT_TOP,
            HUD_HEADER_HINT,
            egui::FontId::proportional(9.0),
            egui::Color32::from_gray(110),
        );
        y += HUD_HEADER_HEIGHT;
        painter.line_segment(
            [egui::pos2(left, y - 6.0), egui::pos2(rect.right() - HUD_PADDING, y - 6.0)],
            egui::Stroke::new(1.0, egui::Color32::from_gray(60)),
        );

        for line in readout_lines(&report) {
            painter.text(
                egui::pos2(left, y),
                egui::Align2::LEFT_TOP,
                line,
                egui::FontId::monospace(13.0),
                egui::Color32::from_rgb(0, 255, 0),
            );
            y += HUD_LINE_HEIGHT;
        }
        y += 8.0;
        for line in legend_lines(self.tool.config()) {
            painter.text(
                egui::pos2(left, y),
                egui::Align2::LEFT_TOP,
                line,
                egui::FontId::proportional(10.0),
                egui::Color32::from_gray(140),
            );
            y += HUD_LEGEND_LINE_HEIGHT;
        }
    }
}
