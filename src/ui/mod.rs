//! Native preview of the positioning tool.
//!
//! Renders a mock page whose element styles live in memory and drives the
//! same [`PositioningTool`](crate::tool::PositioningTool) the browser build
//! uses, so the tool can be tried without a browser.
//!
//! # Module Organization
//!
//! - `page` - The mock page and its selector lookup
//! - `state` - Application state structures and the main PreviewApp
//! - `canvas` - Pointer, keyboard and wheel handling
//! - `rendering` - Drawing the page and the overlay panel

mod canvas;
mod page;
mod rendering;
mod state;

#[cfg(test)]
mod tests;

pub use page::MockPage;
pub use state::PreviewApp;

use eframe::egui;

/// Storage key for the persisted settings.
pub const STORAGE_KEY: &str = "app_state";

impl eframe::App for PreviewApp {
    /// Persist UI settings between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string(STORAGE_KEY, json),
            Err(err) => log::error!("Failed to serialize app state: {err}"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.draw_frame(ctx);
    }
}

impl PreviewApp {
    /// Draws one frame: toolbar, status line and canvas.
    pub fn draw_frame(&mut self, ctx: &egui::Context) {
        self.handle_keys(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            match &self.status {
                Some(status) => ui.monospace(status),
                None => ui.label("Pick an element with #id or .class and press Enable."),
            };
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Selector:");
            let edit = ui.text_edit_singleline(&mut self.selector_input);
            let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            if ui.button("Enable").clicked() || submitted {
                let selector = self.selector_input.clone();
                if let Err(err) = self.enable_selector(&selector) {
                    log::debug!("Toolbar enable for {selector} failed: {err}");
                }
            }
            if ui
                .add_enabled(self.tool.is_active(), egui::Button::new("Disable"))
                .clicked()
            {
                self.disable();
            }

            ui.separator();
            match self.tool.position() {
                Some(report) => ui.monospace(report.to_string()),
                None => ui.weak("inactive"),
            };

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.checkbox(&mut self.dark_mode, "Dark mode");
            });
        });
    }
}
