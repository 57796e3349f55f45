//! The mock page the preview positions elements on.
//!
//! Each element has a natural box (where normal flow would put it) and an
//! in-memory inline style. What gets drawn is the natural box moved by the
//! style's `left`/`top` and scaled by its `transform`, so restoring a style
//! visibly puts the element back.

use crate::error::PositioningError;
use crate::style::{parse_px, parse_transform_scale, SharedStyle, StyleTarget};
use crate::tool::ElementSource;
use eframe::egui;

/// One box on the mock page.
#[derive(Debug, Clone)]
pub struct PageElement {
    /// Element id, matched by `#id`
    pub id: String,
    /// Class names, matched by `.class`
    pub classes: Vec<String>,
    /// Text drawn inside the box
    pub label: String,
    /// Box in page coordinates before any inline offset or scale
    pub natural: egui::Rect,
    /// Fill color
    pub color: egui::Color32,
    /// Inline style declaration
    pub style: SharedStyle,
}

impl PageElement {
    fn new(id: &str, classes: &[&str], label: &str, natural: egui::Rect, color: egui::Color32) -> Self {
        Self {
            id: id.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            label: label.to_string(),
            natural,
            color,
            style: SharedStyle::new(),
        }
    }

    fn with_style(mut self, pairs: &[(&str, &str)]) -> Self {
        self.style = SharedStyle::with(pairs);
        self
    }

    /// Whether a simple `#id` or `.class` selector matches this element.
    pub fn matches(&self, selector: &SimpleSelector) -> bool {
        match selector {
            SimpleSelector::Id(id) => self.id == *id,
            SimpleSelector::Class(class) => self.classes.iter().any(|c| c == class),
        }
    }

    /// Box as currently styled, in page coordinates.
    pub fn rendered_rect(&self) -> egui::Rect {
        let position = self.style.property("position");
        let positioned = !(position.is_empty() || position == "static");
        let offset = if positioned {
            egui::vec2(
                parse_px(&self.style.property("left")).unwrap_or(0.0) as f32,
                parse_px(&self.style.property("top")).unwrap_or(0.0) as f32,
            )
        } else {
            egui::Vec2::ZERO
        };
        let scale = parse_transform_scale(&self.style.property("transform"))
            .filter(|s| *s > 0.0)
            .unwrap_or(1.0) as f32;
        let size = self.natural.size() * scale;

        if self.style.property("transform-origin") == "top left" {
            egui::Rect::from_min_size(self.natural.min + offset, size)
        } else {
            egui::Rect::from_center_size(self.natural.center() + offset, size)
        }
    }

    /// Whether the element currently carries a stacking order.
    pub fn is_raised(&self) -> bool {
        !self.style.property("z-index").is_empty()
    }
}

/// The selector forms the mock page understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `#id`
    Id(String),
    /// `.class`
    Class(String),
}

impl SimpleSelector {
    /// Parses `#id` or `.class`.
    pub fn parse(selector: &str) -> Result<Self, PositioningError> {
        let trimmed = selector.trim();
        let invalid = |reason: &str| PositioningError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };
        let (kind, name) = trimmed.split_at(trimmed.chars().next().map_or(0, char::len_utf8));
        if name.is_empty() {
            return Err(invalid("expected #id or .class"));
        }
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(invalid("only single #id or .class selectors are supported here"));
        }
        match kind {
            "#" => Ok(Self::Id(name.to_string())),
            "." => Ok(Self::Class(name.to_string())),
            _ => Err(invalid("expected #id or .class")),
        }
    }
}

/// The mock page: a handful of boxes in document order.
#[derive(Debug, Clone)]
pub struct MockPage {
    /// Elements in document order
    pub elements: Vec<PageElement>,
}

impl Default for MockPage {
    fn default() -> Self {
        let rect = |x: f32, y: f32, w: f32, h: f32| {
            egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
        };
        Self {
            elements: vec![
                PageElement::new(
                    "hero-logo",
                    &["logo"],
                    "LOGO",
                    rect(40.0, 40.0, 200.0, 80.0),
                    egui::Color32::from_rgb(200, 160, 60),
                ),
                PageElement::new(
                    "tagline",
                    &["tagline", "headline"],
                    "Built to last",
                    rect(40.0, 140.0, 360.0, 40.0),
                    egui::Color32::from_rgb(90, 90, 110),
                ),
                PageElement::new(
                    "hero-video",
                    &["media"],
                    "VIDEO",
                    rect(40.0, 200.0, 480.0, 240.0),
                    egui::Color32::from_rgb(40, 70, 110),
                ),
                PageElement::new(
                    "cta-button",
                    &["button"],
                    "Get a quote",
                    rect(40.0, 460.0, 160.0, 48.0),
                    egui::Color32::from_rgb(180, 60, 50),
                ),
                PageElement::new(
                    "badge",
                    &["badge"],
                    "Since 1998",
                    rect(560.0, 40.0, 120.0, 40.0),
                    egui::Color32::from_rgb(60, 130, 80),
                )
                .with_style(&[
                    ("position", "absolute"),
                    ("left", "12px"),
                    ("top", "8px"),
                    ("transform", "scale(1.2)"),
                ]),
            ],
        }
    }
}

impl MockPage {
    /// Element whose style handle is `style`.
    pub fn element_for(&self, style: &SharedStyle) -> Option<&PageElement> {
        self.elements.iter().find(|e| e.style.same_as(style))
    }

    /// Elements in paint order: document order, raised elements last.
    pub fn paint_order(&self) -> Vec<&PageElement> {
        let mut ordered: Vec<&PageElement> = self.elements.iter().collect();
        ordered.sort_by_key(|e| e.is_raised());
        ordered
    }
}

impl ElementSource for MockPage {
    type Element = SharedStyle;

    fn query(&self, selector: &str) -> Result<SharedStyle, PositioningError> {
        let parsed = SimpleSelector::parse(selector)?;
        self.elements
            .iter()
            .find(|e| e.matches(&parsed))
            .map(|e| e.style.clone())
            .ok_or_else(|| PositioningError::SelectorNotFound {
                selector: selector.to_string(),
            })
    }
}
