//! Browser elements as style targets, and the live document as an element source.

use crate::error::PositioningError;
use crate::style::{ComputedStyle, StyleTarget};
use crate::tool::ElementSource;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement};

/// Converts a thrown JavaScript value into a DOM error with some context.
pub(crate) fn dom_error(context: &str, err: JsValue) -> PositioningError {
    let detail = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{err:?}"));
    PositioningError::Dom(format!("{context}: {detail}"))
}

/// The inline style declaration of an HTML or SVG element.
///
/// Other element kinds are rejected.
pub(crate) fn inline_style(element: &Element) -> Result<CssStyleDeclaration, PositioningError> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        return Ok(html.style());
    }
    if let Some(svg) = element.dyn_ref::<SvgElement>() {
        return Ok(svg.style());
    }
    Err(PositioningError::Dom(format!(
        "<{}> has no inline style",
        element.tag_name().to_ascii_lowercase()
    )))
}

impl StyleTarget for Element {
    fn property(&self, name: &str) -> String {
        inline_style(self)
            .ok()
            .and_then(|style| style.get_property_value(name).ok())
            .unwrap_or_default()
    }

    fn priority(&self, name: &str) -> String {
        inline_style(self)
            .map(|style| style.get_property_priority(name))
            .unwrap_or_default()
    }

    fn set_property(&self, name: &str, value: &str, priority: &str) -> Result<(), PositioningError> {
        inline_style(self)?
            .set_property_with_priority(name, value, priority)
            .map_err(|e| dom_error(&format!("set {name}"), e))
    }

    fn remove_property(&self, name: &str) -> Result<(), PositioningError> {
        inline_style(self)?
            .remove_property(name)
            .map(|_| ())
            .map_err(|e| dom_error(&format!("remove {name}"), e))
    }

    fn computed_style(&self) -> Result<ComputedStyle, PositioningError> {
        let window = web_sys::window().ok_or_else(|| PositioningError::Dom("no window".into()))?;
        let computed = window
            .get_computed_style(self)
            .map_err(|e| dom_error("getComputedStyle", e))?
            .ok_or_else(|| PositioningError::Dom("no computed style for element".into()))?;
        let read = |name: &str| computed.get_property_value(name).unwrap_or_default();
        Ok(ComputedStyle {
            position: read("position"),
            left: read("left"),
            top: read("top"),
            transform: read("transform"),
        })
    }
}

/// The page's document, queried with `querySelector`.
#[derive(Debug, Clone)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    /// Wraps a document.
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window.
    pub fn current() -> Result<Self, PositioningError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PositioningError::Dom("no document available".into()))?;
        Ok(Self::new(document))
    }

    /// The wrapped document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl ElementSource for WebDocument {
    type Element = Element;

    /// Returns the first match if it is an HTML or SVG element.
    fn query(&self, selector: &str) -> Result<Element, PositioningError> {
        let found = self.document.query_selector(selector).map_err(|e| {
            match dom_error("querySelector", e) {
                PositioningError::Dom(reason) => PositioningError::InvalidSelector {
                    selector: selector.to_string(),
                    reason,
                },
                other => other,
            }
        })?;
        let element = found.ok_or_else(|| PositioningError::SelectorNotFound {
            selector: selector.to_string(),
        })?;
        inline_style(&element)?;
        Ok(element)
    }
}
