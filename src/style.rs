//! Inline-style access, snapshot/restore, and the CSS value parsing the tool needs.
//!
//! The session never talks to the DOM directly. It reads and writes styles
//! through [`StyleTarget`], which is implemented for browser elements in
//! `web::element` and for the in-memory [`SharedStyle`] used by the preview
//! and the tests.

use crate::error::PositioningError;
use cssparser::{ParseError as CssParseError, Parser, ParserInput, Token};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Inline style properties a session touches, in the order they are restored.
pub const TRACKED_PROPERTIES: [&str; 7] = [
    "position",
    "left",
    "top",
    "cursor",
    "z-index",
    "transform",
    "transform-origin",
];

/// Resolved style values read once when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Resolved `position`, e.g. `static`
    pub position: String,
    /// Resolved `left`, e.g. `12px` or `auto`
    pub left: String,
    /// Resolved `top`
    pub top: String,
    /// Resolved `transform`, e.g. `none` or `matrix(1, 0, 0, 1, 0, 0)`
    pub transform: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            position: "static".into(),
            left: "auto".into(),
            top: "auto".into(),
            transform: "none".into(),
        }
    }
}

/// Something with an inline style declaration the tool can read and write.
///
/// Methods take `&self` because style declarations are shared, interior-mutable
/// objects on both sides: a live DOM node, or a [`SharedStyle`] handle.
pub trait StyleTarget {
    /// Inline value of `name`, or an empty string when not set.
    fn property(&self, name: &str) -> String;

    /// Inline priority of `name` (`"important"` or empty).
    fn priority(&self, name: &str) -> String;

    /// Writes an inline declaration.
    fn set_property(&self, name: &str, value: &str, priority: &str) -> Result<(), PositioningError>;

    /// Removes an inline declaration entirely.
    fn remove_property(&self, name: &str) -> Result<(), PositioningError>;

    /// Resolved style of the element.
    fn computed_style(&self) -> Result<ComputedStyle, PositioningError>;
}

/// A single inline declaration: value plus priority.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleValue {
    /// Declared value; empty means the property was not set.
    pub value: String,
    /// Declared priority; empty or `important`.
    pub priority: String,
}

/// The inline declarations of [`TRACKED_PROPERTIES`] as they were before a session began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSnapshot {
    entries: Vec<(&'static str, StyleValue)>,
}

impl StyleSnapshot {
    /// Records the current inline value and priority of every tracked property.
    pub fn capture(target: &impl StyleTarget) -> Self {
        let entries = TRACKED_PROPERTIES
            .iter()
            .map(|&name| {
                (
                    name,
                    StyleValue {
                        value: target.property(name),
                        priority: target.priority(name),
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Inline value of `name` at capture time.
    pub fn value(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.value.as_str())
            .unwrap_or("")
    }

    /// Writes every recorded declaration back, removing those that were absent.
    ///
    /// All properties are attempted even if one fails; the first failure is returned.
    pub fn restore(&self, target: &impl StyleTarget) -> Result<(), PositioningError> {
        let mut first_error = None;
        for (name, saved) in &self.entries {
            let result = if saved.value.is_empty() {
                target.remove_property(name)
            } else {
                target.set_property(name, &saved.value, &saved.priority)
            };
            if let Err(err) = result {
                log::warn!("Failed to restore {name}: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// In-memory inline style declaration.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Shared handle to an in-memory style declaration, standing in for a DOM element.
#[derive(Debug, Clone, Default)]
pub struct SharedStyle(Rc<RefCell<StyleMap>>);

impl SharedStyle {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a declaration from `name: value` pairs.
    pub fn with(pairs: &[(&str, &str)]) -> Self {
        let style = Self::new();
        for (name, value) in pairs {
            style.0.borrow_mut().insert(
                (*name).to_string(),
                StyleValue {
                    value: (*value).to_string(),
                    priority: String::new(),
                },
            );
        }
        style
    }

    /// Copy of the current declarations.
    pub fn declarations(&self) -> StyleMap {
        self.0.borrow().clone()
    }

    /// Whether two handles point at the same declaration.
    pub fn same_as(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Serializes the declaration the way `element.style.cssText` does.
    pub fn css_text(&self) -> String {
        self.0
            .borrow()
            .iter()
            .map(|(name, v)| {
                if v.priority.is_empty() {
                    format!("{name}: {};", v.value)
                } else {
                    format!("{name}: {} !{};", v.value, v.priority)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl StyleTarget for SharedStyle {
    fn property(&self, name: &str) -> String {
        self.0
            .borrow()
            .get(name)
            .map(|v| v.value.clone())
            .unwrap_or_default()
    }

    fn priority(&self, name: &str) -> String {
        self.0
            .borrow()
            .get(name)
            .map(|v| v.priority.clone())
            .unwrap_or_default()
    }

    fn set_property(&self, name: &str, value: &str, priority: &str) -> Result<(), PositioningError> {
        let mut map = self.0.borrow_mut();
        if value.is_empty() {
            map.remove(name);
        } else {
            map.insert(
                name.to_string(),
                StyleValue {
                    value: value.to_string(),
                    priority: priority.to_string(),
                },
            );
        }
        Ok(())
    }

    fn remove_property(&self, name: &str) -> Result<(), PositioningError> {
        self.0.borrow_mut().remove(name);
        Ok(())
    }

    /// Inline declarations are the only style source for in-memory elements.
    fn computed_style(&self) -> Result<ComputedStyle, PositioningError> {
        let defaults = ComputedStyle::default();
        let pick = |name: &str, fallback: String| {
            let value = self.property(name);
            if value.is_empty() {
                fallback
            } else {
                value
            }
        };
        Ok(ComputedStyle {
            position: pick("position", defaults.position),
            left: pick("left", defaults.left),
            top: pick("top", defaults.top),
            transform: pick("transform", defaults.transform),
        })
    }
}

/// Reads the number at the start of a CSS length, ignoring the unit, the way
/// `parseFloat` does.
///
/// `"12.5px"` gives `12.5` and `"50%"` gives `50`; `"auto"` and `""` give `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    match parser.next().ok()? {
        Token::Dimension { value, .. } | Token::Number { value, .. } => Some(widen(*value)),
        Token::Percentage { unit_value, .. } => Some(widen(*unit_value * 100.0)),
        _ => None,
    }
}

/// Extracts the horizontal scale (the `a` entry of the composed matrix) from a
/// CSS transform list.
///
/// Handles the resolved `matrix()`/`matrix3d()` forms browsers report and the
/// 2D functions an inline style may carry, composed left to right, so
/// `translate(10px) scale(2)` gives `2`. Returns `None` for `none`, empty,
/// unknown or malformed values.
pub fn parse_transform_scale(transform: &str) -> Option<f64> {
    let mut input = ParserInput::new(transform);
    let mut parser = Parser::new(&mut input);
    if parser
        .try_parse(|p| p.expect_ident_matching("none"))
        .is_ok()
    {
        return None;
    }

    let mut composed: Option<Linear> = None;
    while !parser.is_exhausted() {
        let name = match parser.next().ok()? {
            Token::Function(name) => name.to_ascii_lowercase(),
            _ => return None,
        };
        let args: Result<Option<Vec<Arg>>, CssParseError<'_, ()>> =
            parser.parse_nested_block(|nested| Ok(function_args(nested)));
        let step = transform_function(&name, &args.ok()??)?;
        composed = Some(composed.map_or(step, |m| m.then(step)));
    }
    composed.map(|m| m.a).filter(|a| a.is_finite())
}

/// Widens through the shortest decimal form so `1.2` stays `1.2`.
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

/// One argument of a transform function.
#[derive(Debug, Clone, PartialEq)]
enum Arg {
    /// Plain number, or a percentage as a fraction
    Number(f64),
    /// Number with a lower-cased unit
    Dimension(f64, String),
}

impl Arg {
    fn number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Dimension(..) => None,
        }
    }

    fn radians(&self) -> Option<f64> {
        match self {
            Self::Number(value) if *value == 0.0 => Some(0.0),
            Self::Dimension(value, unit) => match unit.as_str() {
                "deg" => Some(value.to_radians()),
                "rad" => Some(*value),
                "grad" => Some(value * std::f64::consts::PI / 200.0),
                "turn" => Some(value * std::f64::consts::TAU),
                _ => None,
            },
            Self::Number(_) => None,
        }
    }
}

fn function_args(parser: &mut Parser<'_, '_>) -> Option<Vec<Arg>> {
    let mut args = Vec::new();
    while !parser.is_exhausted() {
        match parser.next().ok()? {
            Token::Comma => {}
            Token::Number { value, .. } => args.push(Arg::Number(widen(*value))),
            Token::Percentage { unit_value, .. } => args.push(Arg::Number(widen(*unit_value))),
            Token::Dimension { value, unit, .. } => {
                args.push(Arg::Dimension(widen(*value), unit.to_ascii_lowercase()));
            }
            _ => return None,
        }
    }
    Some(args)
}

/// Linear part of a 2D transform matrix; translation never affects the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Linear {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Linear {
    const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
    };

    fn scale(sx: f64, sy: f64) -> Self {
        Self {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        }
    }

    fn skew(ax: f64, ay: f64) -> Self {
        Self {
            b: ay.tan(),
            c: ax.tan(),
            ..Self::IDENTITY
        }
    }

    /// `self` followed by `next`, as in a transform list.
    fn then(self, next: Self) -> Self {
        Self {
            a: self.a * next.a + self.c * next.b,
            b: self.b * next.a + self.d * next.b,
            c: self.a * next.c + self.c * next.d,
            d: self.b * next.c + self.d * next.d,
        }
    }
}

fn transform_function(name: &str, args: &[Arg]) -> Option<Linear> {
    let numbers = || args.iter().map(Arg::number).collect::<Option<Vec<f64>>>();
    match (name, args.len()) {
        ("matrix", 6) => {
            let m = numbers()?;
            Some(Linear {
                a: m[0],
                b: m[1],
                c: m[2],
                d: m[3],
            })
        }
        ("matrix3d", 16) => {
            let m = numbers()?;
            Some(Linear {
                a: m[0],
                b: m[1],
                c: m[4],
                d: m[5],
            })
        }
        ("scale", 1) => numbers().map(|s| Linear::scale(s[0], s[0])),
        ("scale", 2) | ("scale3d", 3) => numbers().map(|s| Linear::scale(s[0], s[1])),
        ("scalex", 1) => numbers().map(|s| Linear::scale(s[0], 1.0)),
        ("scaley", 1) => numbers().map(|s| Linear::scale(1.0, s[0])),
        ("rotate" | "rotatez", 1) => {
            let (sin, cos) = args[0].radians()?.sin_cos();
            Some(Linear {
                a: cos,
                b: sin,
                c: -sin,
                d: cos,
            })
        }
        ("skew", 1) => Some(Linear::skew(args[0].radians()?, 0.0)),
        ("skew", 2) => Some(Linear::skew(args[0].radians()?, args[1].radians()?)),
        ("skewx", 1) => Some(Linear::skew(args[0].radians()?, 0.0)),
        ("skewy", 1) => Some(Linear::skew(0.0, args[0].radians()?)),
        ("translate", 1 | 2) | ("translatex" | "translatey" | "translatez", 1) | ("translate3d", 3) => {
            Some(Linear::IDENTITY)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_px_reads_leading_number() {
        assert_eq!(parse_px("12px"), Some(12.0));
        assert_eq!(parse_px("  -7.5px"), Some(-7.5));
        assert_eq!(parse_px("-.5px"), Some(-0.5));
        assert_eq!(parse_px("1e2px"), Some(100.0));
        assert_eq!(parse_px("3em"), Some(3.0));
        assert_eq!(parse_px("4."), Some(4.0));
        assert_eq!(parse_px("50%"), Some(50.0));
    }

    #[test]
    fn parse_px_rejects_keywords() {
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_px(""), None);
        assert_eq!(parse_px("-"), None);
        assert_eq!(parse_px(".px"), None);
    }

    #[test]
    fn transform_matrix_yields_horizontal_scale() {
        assert_eq!(parse_transform_scale("matrix(1.5, 0, 0, 1.5, 0, 0)"), Some(1.5));
        assert_eq!(
            parse_transform_scale("matrix3d(2, 0, 0, 0, 0, 2, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1)"),
            Some(2.0)
        );
    }

    #[test]
    fn transform_shorthands_are_understood() {
        assert_eq!(parse_transform_scale("scale(0.8)"), Some(0.8));
        assert_eq!(parse_transform_scale("scale(0.8, 2)"), Some(0.8));
        assert_eq!(parse_transform_scale("scaleX(120%)"), Some(1.2));
        assert_eq!(parse_transform_scale("scale3d(0.5, 1, 1)"), Some(0.5));
        assert_eq!(parse_transform_scale("scaleY(3)"), Some(1.0));
    }

    #[test]
    fn transform_lists_compose() {
        assert_eq!(parse_transform_scale("translate(10px) scale(2)"), Some(2.0));
        assert_eq!(parse_transform_scale("scale(1.5) rotate(0deg)"), Some(1.5));
        assert_eq!(
            parse_transform_scale("translateX(-50%) scale(1.2) translateY(4px)"),
            Some(1.2)
        );
        let rotated = parse_transform_scale("rotate(0.25turn) scale(2)").unwrap();
        assert!(rotated.abs() < 1e-9);
        let half = parse_transform_scale("rotate(60deg)").unwrap();
        assert!((half - 0.5).abs() < 1e-9);
    }

    #[test]
    fn transform_none_or_garbage_is_absent() {
        assert_eq!(parse_transform_scale("none"), None);
        assert_eq!(parse_transform_scale(""), None);
        assert_eq!(parse_transform_scale("matrix(1, 0, 0)"), None);
        assert_eq!(parse_transform_scale("rotate(45)"), None);
        assert_eq!(parse_transform_scale("perspective(100px)"), None);
        assert_eq!(parse_transform_scale("matrix(a, b, c, d, e, f)"), None);
        assert_eq!(parse_transform_scale("scale(2) bogus"), None);
    }

    #[test]
    fn snapshot_restores_present_and_absent_properties() {
        let style = SharedStyle::with(&[("position", "absolute"), ("color", "red")]);
        style.set_property("z-index", "3", "important").unwrap();
        let before = style.declarations();

        let snapshot = StyleSnapshot::capture(&style);
        assert_eq!(snapshot.value("position"), "absolute");
        assert_eq!(snapshot.value("left"), "");

        style.set_property("position", "relative", "").unwrap();
        style.set_property("left", "40px", "").unwrap();
        style.set_property("z-index", "9999", "").unwrap();
        style.set_property("transform", "scale(2)", "").unwrap();

        snapshot.restore(&style).unwrap();
        assert_eq!(style.declarations(), before);
    }

    #[test]
    fn shared_style_computed_defaults() {
        let style = SharedStyle::with(&[("left", "5px")]);
        let computed = style.computed_style().unwrap();
        assert_eq!(computed.position, "static");
        assert_eq!(computed.left, "5px");
        assert_eq!(computed.top, "auto");
        assert_eq!(computed.transform, "none");
    }

    #[test]
    fn css_text_lists_declarations() {
        let style = SharedStyle::with(&[("top", "1px"), ("left", "2px")]);
        style.set_property("cursor", "grab", "important").unwrap();
        assert_eq!(style.css_text(), "cursor: grab !important; left: 2px; top: 1px;");
    }
}
