//! Heads-up display shared by both front ends: readout text and the panel's own drag state.

use crate::config::PositioningConfig;
use crate::types::{Point, PositionReport};

/// Title shown in the panel header.
pub const HUD_TITLE: &str = "POSITIONING MODE";

/// Hint shown next to the title.
pub const HUD_HEADER_HINT: &str = "drag to move panel";

/// Key legend shown under the readout, with the step sizes the session uses.
pub fn legend_lines(config: &PositioningConfig) -> [String; 6] {
    [
        "Drag to move".to_string(),
        format!("Arrow keys: {}px nudge", config.nudge_step),
        format!("Shift+Arrow: {}px nudge", config.nudge_step_large),
        "Scroll wheel: scale".to_string(),
        format!("+/- keys: scale {}%", config.key_scale_step * 100.0),
        "ESC: finish".to_string(),
    ]
}

/// Readout lines for the panel body.
pub fn readout_lines(report: &PositionReport) -> [String; 3] {
    [
        format!("X: {}px", report.x),
        format!("Y: {}px", report.y),
        format!("Scale: {}%", report.scale),
    ]
}

/// Drag of the overlay panel by its header, in viewport coordinates.
///
/// Independent of the target's drag: the panel is fixed-positioned, so its
/// new place is simply where it was plus the pointer travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelDrag {
    pointer_start: Point,
    panel_start: Point,
}

impl PanelDrag {
    /// Starts a drag with the pointer at `pointer` and the panel's top-left corner at `panel_origin`.
    pub fn begin(pointer: Point, panel_origin: Point) -> Self {
        Self {
            pointer_start: pointer,
            panel_start: panel_origin,
        }
    }

    /// Top-left corner the panel should move to for the current pointer position.
    pub fn origin_for(&self, pointer: Point) -> Point {
        self.panel_start + (pointer - self.pointer_start)
    }
}
