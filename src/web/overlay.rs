//! The floating readout panel mounted while a session is live.

use super::element::dom_error;
use crate::config::PositioningConfig;
use crate::constants::*;
use crate::error::PositioningError;
use crate::hud::{legend_lines, readout_lines, HUD_HEADER_HINT, HUD_TITLE};
use crate::types::{Point, PositionReport};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Node};

fn panel_css(config: &PositioningConfig) -> String {
    format!(
        "position: fixed; top: {inset}px; right: {inset}px; \
         background: rgba(0, 0, 0, 0.9); color: #00ff00; \
         font-family: 'Monaco', 'Menlo', monospace; font-size: 14px; \
         padding: 15px 20px; border-radius: 8px; z-index: {PANEL_Z_INDEX}; \
         min-width: 200px; box-shadow: 0 4px 20px rgba(0,0,0,0.3);",
        inset = config.panel_inset
    )
}

const HEADER_CSS: &str = "margin-bottom: 10px; color: #fff; font-weight: bold; \
     border-bottom: 1px solid #333; padding-bottom: 8px; cursor: grab;";
const HINT_CSS: &str = "font-size: 10px; color: #666; font-weight: normal; margin-left: 6px;";
const LINE_CSS: &str = "margin-bottom: 5px;";
const LEGEND_CSS: &str = "font-size: 11px; color: #888; margin-top: 10px;";

/// Mounted overlay panel and handles to its live parts.
pub struct Overlay {
    root: HtmlElement,
    header: HtmlElement,
    x: HtmlElement,
    y: HtmlElement,
    scale: HtmlElement,
}

fn create(document: &Document, tag: &str) -> Result<HtmlElement, PositioningError> {
    document
        .create_element(tag)
        .map_err(|e| dom_error(&format!("createElement({tag})"), e))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PositioningError::Dom(format!("<{tag}> is not an HTML element")))
}

fn append(parent: &Node, child: &Node) -> Result<(), PositioningError> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|e| dom_error("appendChild", e))
}

fn readout(document: &Document, root: &Node, id: &str) -> Result<HtmlElement, PositioningError> {
    let line = create(document, "div")?;
    line.set_id(id);
    line.style().set_css_text(LINE_CSS);
    append(root, &line)?;
    Ok(line)
}

impl Overlay {
    /// Builds the panel and appends it to `<body>`.
    pub fn mount(document: &Document, config: &PositioningConfig) -> Result<Self, PositioningError> {
        let body = document
            .body()
            .ok_or_else(|| PositioningError::Dom("document has no body".into()))?;

        let root = create(document, "div")?;
        root.set_id(PANEL_ID);
        root.style().set_css_text(&panel_css(config));

        let header = create(document, "div")?;
        header.set_id(PANEL_HEADER_ID);
        header.style().set_css_text(HEADER_CSS);
        header.set_text_content(Some(HUD_TITLE));
        let hint = create(document, "span")?;
        hint.style().set_css_text(HINT_CSS);
        hint.set_text_content(Some(HUD_HEADER_HINT));
        append(&header, &hint)?;
        append(&root, &header)?;

        let x = readout(document, &root, PANEL_X_ID)?;
        let y = readout(document, &root, PANEL_Y_ID)?;
        let scale = readout(document, &root, PANEL_SCALE_ID)?;

        let legend = create(document, "div")?;
        legend.style().set_css_text(LEGEND_CSS);
        for text in legend_lines(config) {
            let line = create(document, "div")?;
            line.set_text_content(Some(&text));
            append(&legend, &line)?;
        }
        append(&root, &legend)?;

        append(&body, &root)?;

        Ok(Self {
            root,
            header,
            x,
            y,
            scale,
        })
    }

    /// Shows the given values.
    pub fn show(&self, report: &PositionReport) {
        let [x, y, scale] = readout_lines(report);
        self.x.set_text_content(Some(&x));
        self.y.set_text_content(Some(&y));
        self.scale.set_text_content(Some(&scale));
    }

    /// The header the panel is dragged by.
    pub fn header(&self) -> &HtmlElement {
        &self.header
    }

    /// Whether `node` is the panel or inside it.
    pub fn contains(&self, node: &Node) -> bool {
        self.root.contains(Some(node))
    }

    /// Top-left corner of the panel in viewport coordinates.
    pub fn origin(&self) -> Point {
        let rect = self.root.get_bounding_client_rect();
        Point::new(rect.left(), rect.top())
    }

    /// Places the panel's top-left corner at `origin` in viewport coordinates.
    pub fn move_to(&self, origin: Point) {
        let style = self.root.style();
        let writes = [
            ("left", format!("{}px", origin.x)),
            ("top", format!("{}px", origin.y)),
            ("right", "auto".to_string()),
        ];
        for (name, value) in writes {
            if let Err(err) = style.set_property(name, &value) {
                log::warn!("{}", dom_error("move panel", err));
            }
        }
    }

    /// Sets the header cursor (`grab` or `grabbing`).
    pub fn set_header_cursor(&self, cursor: &str) {
        if let Err(err) = self.header.style().set_property("cursor", cursor) {
            log::warn!("{}", dom_error("panel cursor", err));
        }
    }

    /// Removes the panel from the page.
    pub fn unmount(&self) {
        self.root.remove();
    }
}
