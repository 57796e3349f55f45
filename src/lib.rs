//! # Positioning Mode
//!
//! A developer aid for placing page elements by hand. Point it at an element
//! with a CSS selector and the element can be dragged, nudged with the arrow
//! keys and scaled with `+`/`-` or the mouse wheel, while a floating panel
//! shows the live `left`/`top`/scale values to copy into a stylesheet.
//! Pressing Escape (or disabling the tool) restores the element's original
//! inline styles and logs the final values.
//!
//! ## Layout
//! - [`session`] and [`tool`] hold the positioning logic, independent of any DOM
//! - [`style`] abstracts inline style access so the logic runs against the
//!   browser or an in-memory page
//! - `web` (wasm32 only) exposes the `PositioningMode` class to page scripts
//! - the native build ships a preview app driving the same tool on a mock page

#![warn(missing_docs)]
#![cfg_attr(not(target_arch = "wasm32"), deny(unsafe_code))]

pub mod config;
pub mod constants;
pub mod error;
pub mod hud;
pub mod session;
pub mod style;
pub mod tool;
pub mod types;

#[cfg(not(target_arch = "wasm32"))]
mod ui;

#[cfg(target_arch = "wasm32")]
pub mod web;

// Re-export public types
pub use config::PositioningConfig;
pub use error::PositioningError;
pub use hud::PanelDrag;
pub use session::{KeyOutcome, Session};
pub use style::{ComputedStyle, SharedStyle, StyleSnapshot, StyleTarget};
pub use tool::{ElementSource, KeyResult, PositioningTool};
pub use types::*;

#[cfg(not(target_arch = "wasm32"))]
pub use ui::{MockPage, PreviewApp};

#[cfg(target_arch = "wasm32")]
pub use web::PositioningMode;

/// Runs the native preview application.
///
/// Settings saved by a previous run are restored when present.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     positioning_mode::run_app()
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Positioning Preview",
        options,
        Box::new(|cc| {
            let app = cc
                .storage
                .and_then(|storage| storage.get_string(ui::STORAGE_KEY))
                .and_then(|json| match PreviewApp::from_json(&json) {
                    Ok(app) => Some(app),
                    Err(err) => {
                        log::warn!("Ignoring stored app state: {err}");
                        None
                    }
                })
                .unwrap_or_default();
            Ok(Box::new(app))
        }),
    )
}
