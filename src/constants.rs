//! Shared application-wide constants.
//! Centralizes the default tool values and the element ids used by the overlay panel.

// Offset nudging
/// Pixels moved per arrow key press.
pub const NUDGE_STEP: f64 = 1.0;
/// Pixels moved per arrow key press while Shift is held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

// Scaling
/// Scale change per `+`/`-` key press.
pub const KEY_SCALE_STEP: f64 = 0.01;
/// Scale change per wheel notch over the target or the panel.
pub const WHEEL_SCALE_STEP: f64 = 0.02;
/// Smallest scale factor the tool will apply.
pub const MIN_SCALE: f64 = 0.1;
/// Largest scale factor the tool will apply.
pub const MAX_SCALE: f64 = 3.0;

// Target styling while a session is live
/// Stacking order forced onto the target element.
pub const TARGET_Z_INDEX: i32 = 9999;
/// Cursor shown over the target while idle.
pub const CURSOR_GRAB: &str = "grab";
/// Cursor shown over the target while dragging.
pub const CURSOR_GRABBING: &str = "grabbing";
/// Transform origin forced onto the target so scaling keeps the top-left corner fixed.
pub const TRANSFORM_ORIGIN: &str = "top left";

// Overlay panel
/// Distance of the panel from the top and right viewport edges when mounted.
pub const PANEL_INSET: f64 = 20.0;
/// Stacking order of the overlay panel; above the target.
pub const PANEL_Z_INDEX: i32 = 99999;
/// Element id of the overlay panel root.
pub const PANEL_ID: &str = "positioning-coords";
/// Element id of the draggable panel header.
pub const PANEL_HEADER_ID: &str = "positioning-header";
/// Element id of the X readout.
pub const PANEL_X_ID: &str = "pos-x";
/// Element id of the Y readout.
pub const PANEL_Y_ID: &str = "pos-y";
/// Element id of the scale readout.
pub const PANEL_SCALE_ID: &str = "pos-scale";
