//! Canvas input: pointer, keyboard and wheel mapped onto the positioning tool.
//!
//! Pointer positions are converted to page coordinates (relative to the
//! canvas origin) before reaching the tool, the same space the mock page's
//! boxes live in. The overlay panel is dragged in screen space.

use super::state::PreviewApp;
use crate::hud::PanelDrag;
use crate::tool::KeyResult;
use crate::types::{Direction, KeyCommand, Modifiers, Point};
use eframe::egui;

/// Maps an egui key to a tool command.
pub fn key_command(key: egui::Key) -> Option<KeyCommand> {
    match key {
        egui::Key::ArrowLeft => Some(KeyCommand::Nudge(Direction::Left)),
        egui::Key::ArrowRight => Some(KeyCommand::Nudge(Direction::Right)),
        egui::Key::ArrowUp => Some(KeyCommand::Nudge(Direction::Up)),
        egui::Key::ArrowDown => Some(KeyCommand::Nudge(Direction::Down)),
        egui::Key::Plus | egui::Key::Equals => Some(KeyCommand::ScaleUp),
        egui::Key::Minus => Some(KeyCommand::ScaleDown),
        egui::Key::Escape => Some(KeyCommand::Cancel),
        _ => None,
    }
}

fn to_point(pos: egui::Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}

fn to_pos(point: Point) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

impl PreviewApp {
    /// Converts a screen position to page coordinates.
    pub fn screen_to_page(&self, screen: egui::Pos2) -> egui::Pos2 {
        (screen - self.canvas_origin).to_pos2()
    }

    /// Converts page coordinates to a screen position.
    pub fn page_to_screen(&self, page: egui::Pos2) -> egui::Pos2 {
        page + self.canvas_origin.to_vec2()
    }

    /// Rendered rect of the session's target, in screen coordinates.
    pub fn target_screen_rect(&self) -> Option<egui::Rect> {
        let session = self.tool.session()?;
        let element = self.page.element_for(session.target())?;
        Some(element.rendered_rect().translate(self.canvas_origin.to_vec2()))
    }

    /// Handles pointer presses, moves and releases for both the target and the panel.
    pub fn handle_pointer(&mut self, ui: &egui::Ui) {
        let (pressed, released, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
                i.pointer.latest_pos(),
            )
        });
        let Some(pos) = pos else {
            return;
        };

        if pressed {
            let on_header = self
                .hud
                .last_header_rect
                .is_some_and(|r| r.contains(pos));
            // The panel sits above the page, so presses on its body never reach the target.
            let on_panel = self.hud.last_rect.is_some_and(|r| r.contains(pos));
            if on_header {
                let origin = self.hud.last_rect.map_or(pos, |r| r.min);
                self.hud.drag = Some(PanelDrag::begin(to_point(pos), to_point(origin)));
            } else if !on_panel && self.target_screen_rect().is_some_and(|r| r.contains(pos)) {
                self.tool.begin_drag(to_point(self.screen_to_page(pos)));
            }
        }

        if down || released {
            if let Some(drag) = self.hud.drag {
                let origin = to_pos(drag.origin_for(to_point(pos)));
                self.hud.origin = Some(self.screen_to_page(origin));
            } else {
                self.tool.drag_to(to_point(self.screen_to_page(pos)));
            }
        }

        if released {
            self.hud.drag = None;
            self.tool.end_drag();
        }
    }

    /// Routes key presses to the tool unless a text field has keyboard focus.
    pub fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let presses: Vec<(egui::Key, egui::Modifiers)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        modifiers,
                        ..
                    } => Some((*key, *modifiers)),
                    _ => None,
                })
                .collect()
        });

        for (key, modifiers) in presses {
            let Some(command) = key_command(key) else {
                continue;
            };
            let modifiers = Modifiers {
                shift: modifiers.shift,
            };
            if let KeyResult::Disabled(report) = self.tool.key_down(command, modifiers) {
                self.session_ended(Some(report));
            }
        }
    }

    /// Scales the target when the wheel turns over it or over the panel.
    pub fn handle_wheel(&mut self, ui: &egui::Ui) {
        let (delta, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
        if delta == 0.0 {
            return;
        }
        let Some(hover) = hover else {
            return;
        };
        let over_target = self.target_screen_rect().is_some_and(|r| r.contains(hover));
        let over_panel = self.hud.last_rect.is_some_and(|r| r.contains(hover));
        if over_target || over_panel {
            // egui reports wheel-up as positive; the tool expects DOM sign.
            self.tool.wheel(-f64::from(delta));
        }
    }
}
