//! Core value types passed between the front ends and the session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A position or displacement in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal component (positive = right).
    pub x: f64,
    /// Vertical component (positive = down).
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Creates a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// An axis-aligned rectangle in viewport pixels, as returned by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub left: f64,
    /// Top edge
    pub top: f64,
    /// Right edge
    pub right: f64,
    /// Bottom edge
    pub bottom: f64,
}

impl Rect {
    /// Whether the point lies inside the rectangle, edges included.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// The values a developer reads off the tool: rounded offset and scale percentage.
///
/// Serializes to `{ "x": .., "y": .., "scale": .. }`, the shape `getPosition()` returns to JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionReport {
    /// Horizontal offset in whole pixels.
    pub x: i64,
    /// Vertical offset in whole pixels.
    pub y: i64,
    /// Scale as a whole percentage.
    pub scale: i64,
}

impl PositionReport {
    /// Rounds a fractional offset and scale factor into a report.
    pub fn from_raw(offset: Point, scale: f64) -> Self {
        Self {
            x: offset.x.round() as i64,
            y: offset.y.round() as i64,
            scale: (scale * 100.0).round() as i64,
        }
    }

    /// CSS declarations that lock the element at the reported place.
    pub fn css(&self) -> String {
        let scale = self.scale as f64 / 100.0;
        format!(
            "position: relative; left: {}px; top: {}px; transform: scale({scale}); transform-origin: top left;",
            self.x, self.y
        )
    }
}

impl fmt::Display for PositionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} Y: {} Scale: {}%", self.x, self.y, self.scale)
    }
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held; selects the large nudge step.
    pub shift: bool,
}

/// Arrow key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// ArrowLeft
    Left,
    /// ArrowRight
    Right,
    /// ArrowUp
    Up,
    /// ArrowDown
    Down,
}

impl Direction {
    /// Unit displacement for this direction in screen coordinates.
    pub fn unit(self) -> Point {
        match self {
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
            Self::Up => Point::new(0.0, -1.0),
            Self::Down => Point::new(0.0, 1.0),
        }
    }
}

/// A key press the tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Move the target by one nudge step.
    Nudge(Direction),
    /// Grow the target by one key scale step.
    ScaleUp,
    /// Shrink the target by one key scale step.
    ScaleDown,
    /// End the session, same as `disable()`.
    Cancel,
}

impl KeyCommand {
    /// Maps a DOM `KeyboardEvent.key` value to a command.
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Nudge(Direction::Left)),
            "ArrowRight" => Some(Self::Nudge(Direction::Right)),
            "ArrowUp" => Some(Self::Nudge(Direction::Up)),
            "ArrowDown" => Some(Self::Nudge(Direction::Down)),
            "+" | "=" => Some(Self::ScaleUp),
            "-" | "_" => Some(Self::ScaleDown),
            "Escape" | "Esc" => Some(Self::Cancel),
            _ => None,
        }
    }
}
