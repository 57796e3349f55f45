//! Preview application state.

use super::page::MockPage;
use crate::config::PositioningConfig;
use crate::error::PositioningError;
use crate::hud::PanelDrag;
use crate::style::SharedStyle;
use crate::tool::PositioningTool;
use crate::types::PositionReport;
use eframe::egui;
use serde::{Deserialize, Serialize};

/// Overlay panel state on the preview canvas.
#[derive(Default)]
pub struct HudState {
    /// Top-left corner in canvas coordinates once the panel has been dragged;
    /// `None` keeps it docked to the top-right corner.
    pub origin: Option<egui::Pos2>,
    /// Panel drag in progress
    pub drag: Option<PanelDrag>,
    /// Panel rect drawn last frame, in screen coordinates
    pub last_rect: Option<egui::Rect>,
    /// Header rect drawn last frame, in screen coordinates
    pub last_header_rect: Option<egui::Rect>,
}

impl HudState {
    /// Docks the panel again and forgets any drag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The preview application.
///
/// Only the UI settings are persisted; the page and any live session start
/// fresh on every launch.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewApp {
    /// Mock page being edited
    #[serde(skip)]
    pub page: MockPage,
    /// The positioning tool, driven by canvas input
    #[serde(skip)]
    pub tool: PositioningTool<SharedStyle>,
    /// Options applied to the next session
    pub config: PositioningConfig,
    /// Selector typed into the toolbar
    pub selector_input: String,
    /// Whether dark mode visuals are enabled
    pub dark_mode: bool,
    /// Overlay panel state
    #[serde(skip)]
    pub hud: HudState,
    /// Last message for the status line (final values or a lookup error)
    #[serde(skip)]
    pub status: Option<String>,
    /// Screen position of the page origin, updated every frame
    #[serde(skip)]
    pub canvas_origin: egui::Pos2,
}

impl Default for PreviewApp {
    fn default() -> Self {
        Self {
            page: MockPage::default(),
            tool: PositioningTool::default(),
            config: PositioningConfig::default(),
            selector_input: "#hero-logo".to_string(),
            dark_mode: true,
            hud: HudState::default(),
            status: None,
            canvas_origin: egui::Pos2::ZERO,
        }
    }
}

impl PreviewApp {
    /// Serializes the persisted settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Restores persisted settings from JSON.
    ///
    /// Stored options that no longer validate are replaced by the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut app: Self = serde_json::from_str(json)?;
        if let Err(err) = app.config.validate() {
            log::warn!("Discarding stored options: {err}");
            app.config = PositioningConfig::default();
        }
        Ok(app)
    }

    /// Starts a session on `selector`, reporting failures on the status line.
    pub fn enable_selector(&mut self, selector: &str) -> Result<PositionReport, PositioningError> {
        let started = self
            .tool
            .set_config(self.config.clone())
            .and_then(|()| self.tool.enable(&self.page, selector));
        match started {
            Ok(report) => {
                self.hud.reset();
                self.status = None;
                Ok(report)
            }
            Err(err) => {
                log::error!("Positioning Mode: {err}");
                self.status = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Ends the session and shows the final values on the status line.
    pub fn disable(&mut self) -> Option<PositionReport> {
        let report = self.tool.disable();
        self.session_ended(report);
        report
    }

    /// Bookkeeping after a session ends, by button or by Escape.
    pub(super) fn session_ended(&mut self, report: Option<PositionReport>) {
        self.hud.reset();
        if let Some(report) = report {
            self.status = Some(format!("Final - {report}  |  {}", report.css()));
        }
    }
}
