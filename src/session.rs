//! A single positioning session over one element.
//!
//! The session owns its target, the snapshot of the target's original inline
//! style, and the live offset/scale. Offset and scale arithmetic is kept in
//! free functions and [`Drag`] so it can be checked without any element at all;
//! the methods on [`Session`] combine that arithmetic with the style writes.

use crate::config::PositioningConfig;
use crate::constants::{CURSOR_GRAB, CURSOR_GRABBING, TRANSFORM_ORIGIN};
use crate::error::PositioningError;
use crate::style::{parse_px, parse_transform_scale, ComputedStyle, StyleSnapshot, StyleTarget};
use crate::types::{KeyCommand, Modifiers, Point, PositionReport};

/// Offset a session starts from.
///
/// An element that is already positioned and carries explicit inline `left`
/// and `top` keeps its resolved offset; anything else starts at its natural
/// place.
pub fn starting_offset(computed: &ComputedStyle, inline_left: &str, inline_top: &str) -> Point {
    let positioned = computed.position != "static";
    if positioned && !inline_left.is_empty() && !inline_top.is_empty() {
        Point::new(
            parse_px(&computed.left).unwrap_or(0.0),
            parse_px(&computed.top).unwrap_or(0.0),
        )
    } else {
        Point::ZERO
    }
}

/// Scale a session starts from: the horizontal scale of the resolved transform, clamped.
pub fn starting_scale(computed: &ComputedStyle, config: &PositioningConfig) -> f64 {
    match parse_transform_scale(&computed.transform) {
        Some(scale) if scale > 0.0 => config.clamp_scale(scale),
        Some(scale) => {
            log::debug!("Ignoring non-positive transform scale {scale}");
            1.0
        }
        None => 1.0,
    }
}

/// Pointer drag in progress: where it started and where the target was at that moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    /// Pointer position at pointer-down
    pub pointer_start: Point,
    /// Target offset at pointer-down
    pub offset_start: Point,
}

impl Drag {
    /// Offset for the current pointer position: start offset plus total pointer travel.
    pub fn offset_for(&self, pointer: Point) -> Point {
        self.offset_start + (pointer - self.pointer_start)
    }
}

/// What a key press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key is not handled; the page keeps its default behavior.
    Ignored,
    /// Offset changed.
    Moved,
    /// Scale changed (or was already at its bound).
    Scaled,
    /// The session should end.
    Cancel,
}

impl KeyOutcome {
    /// Whether the page's default action for the key should be suppressed.
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Live state of one element being positioned.
#[derive(Debug)]
pub struct Session<E: StyleTarget> {
    selector: String,
    target: E,
    snapshot: StyleSnapshot,
    config: PositioningConfig,
    offset: Point,
    scale: f64,
    drag: Option<Drag>,
}

impl<E: StyleTarget> Session<E> {
    /// Snapshots `target`, works out its starting offset and scale, and puts it
    /// into positioning mode.
    ///
    /// Options that fail validation are refused before the target is touched.
    /// If any style write fails the snapshot is restored before the error is returned.
    pub fn begin(
        selector: &str,
        target: E,
        config: PositioningConfig,
    ) -> Result<Self, PositioningError> {
        config.validate()?;
        let snapshot = StyleSnapshot::capture(&target);
        let computed = target.computed_style()?;
        let offset = starting_offset(&computed, snapshot.value("left"), snapshot.value("top"));
        let scale = starting_scale(&computed, &config);

        let session = Self {
            selector: selector.to_string(),
            target,
            snapshot,
            config,
            offset,
            scale,
            drag: None,
        };

        if let Err(err) = session.apply_mode_styles() {
            if let Err(restore_err) = session.snapshot.restore(&session.target) {
                log::warn!("Could not undo partial setup: {restore_err}");
            }
            return Err(err);
        }
        Ok(session)
    }

    fn apply_mode_styles(&self) -> Result<(), PositioningError> {
        self.target.set_property("position", "relative", "")?;
        self.write_offset()?;
        self.target.set_property("cursor", CURSOR_GRAB, "")?;
        self.target
            .set_property("z-index", &self.config.z_index.to_string(), "")?;
        self.target.set_property("transform-origin", TRANSFORM_ORIGIN, "")
    }

    fn write_offset(&self) -> Result<(), PositioningError> {
        self.target.set_property("left", &px(self.offset.x), "")?;
        self.target.set_property("top", &px(self.offset.y), "")
    }

    fn write_scale(&self) -> Result<(), PositioningError> {
        self.target
            .set_property("transform", &format!("scale({})", self.scale), "")
    }

    /// Selector the session was started with.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The element being positioned.
    pub fn target(&self) -> &E {
        &self.target
    }

    /// Current offset, fractional.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Current scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Rounded values for display.
    pub fn report(&self) -> PositionReport {
        PositionReport::from_raw(self.offset, self.scale)
    }

    /// Starts a drag at `pointer`. The caller has already checked the pointer is over the target.
    pub fn begin_drag(&mut self, pointer: Point) -> Result<(), PositioningError> {
        self.drag = Some(Drag {
            pointer_start: pointer,
            offset_start: self.offset,
        });
        self.target.set_property("cursor", CURSOR_GRABBING, "")
    }

    /// Follows the pointer while dragging. Returns `false` when no drag is in progress.
    pub fn drag_to(&mut self, pointer: Point) -> Result<bool, PositioningError> {
        let Some(drag) = self.drag else {
            return Ok(false);
        };
        self.offset = drag.offset_for(pointer);
        self.write_offset()?;
        Ok(true)
    }

    /// Ends a drag. Returns `false` when no drag was in progress.
    pub fn end_drag(&mut self) -> Result<bool, PositioningError> {
        if self.drag.take().is_none() {
            return Ok(false);
        }
        self.target.set_property("cursor", CURSOR_GRAB, "")?;
        Ok(true)
    }

    /// Applies a key press. Arrow keys are ignored while a drag is in progress.
    pub fn key(
        &mut self,
        command: KeyCommand,
        modifiers: Modifiers,
    ) -> Result<KeyOutcome, PositioningError> {
        match command {
            KeyCommand::Nudge(direction) => {
                if self.is_dragging() {
                    return Ok(KeyOutcome::Ignored);
                }
                let step = if modifiers.shift {
                    self.config.nudge_step_large
                } else {
                    self.config.nudge_step
                };
                let unit = direction.unit();
                self.offset = self.offset + Point::new(unit.x * step, unit.y * step);
                self.write_offset()?;
                Ok(KeyOutcome::Moved)
            }
            KeyCommand::ScaleUp => {
                self.set_scale(self.scale + self.config.key_scale_step)?;
                Ok(KeyOutcome::Scaled)
            }
            KeyCommand::ScaleDown => {
                self.set_scale(self.scale - self.config.key_scale_step)?;
                Ok(KeyOutcome::Scaled)
            }
            KeyCommand::Cancel => Ok(KeyOutcome::Cancel),
        }
    }

    /// Applies a wheel notch; `delta_y` uses DOM sign (positive = wheel down = shrink).
    ///
    /// A zero or NaN vertical delta (horizontal-only scrolling) returns `false`
    /// and leaves the scale alone, where a bare sign test would grow it.
    pub fn wheel(&mut self, delta_y: f64) -> Result<bool, PositioningError> {
        if delta_y == 0.0 || delta_y.is_nan() {
            return Ok(false);
        }
        let step = if delta_y > 0.0 {
            -self.config.wheel_scale_step
        } else {
            self.config.wheel_scale_step
        };
        self.set_scale(self.scale + step)?;
        Ok(true)
    }

    /// Sets the scale, clamped to the configured bounds, and writes the transform.
    pub fn set_scale(&mut self, scale: f64) -> Result<(), PositioningError> {
        self.scale = self.config.clamp_scale(scale);
        self.write_scale()
    }

    /// Ends the session: restores the original inline style and returns the final values.
    ///
    /// The target is handed back alongside the result so the caller can keep using it.
    pub fn finish(self) -> (PositionReport, Result<(), PositioningError>, E) {
        let report = self.report();
        let restored = self.snapshot.restore(&self.target);
        (report, restored, self.target)
    }
}

/// Formats a pixel length, never emitting `-0px`.
fn px(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::SharedStyle;
    use crate::types::Direction;

    fn begin(style: &SharedStyle) -> Session<SharedStyle> {
        Session::begin("#box", style.clone(), PositioningConfig::default()).unwrap()
    }

    #[test]
    fn unpositioned_element_starts_at_origin() {
        let style = SharedStyle::with(&[("left", "30px"), ("top", "12px")]);
        let session = begin(&style);
        assert_eq!(session.offset(), Point::ZERO);
        assert_eq!(session.scale(), 1.0);
        assert_eq!(style.property("position"), "relative");
        assert_eq!(style.property("left"), "0px");
        assert_eq!(style.property("top"), "0px");
        assert_eq!(style.property("z-index"), "9999");
        assert_eq!(style.property("cursor"), "grab");
        assert_eq!(style.property("transform-origin"), "top left");
        assert_eq!(style.property("transform"), "");
    }

    #[test]
    fn positioned_element_keeps_its_offset() {
        let style = SharedStyle::with(&[("position", "absolute"), ("left", "30px"), ("top", "-12.5px")]);
        let session = begin(&style);
        assert_eq!(session.offset(), Point::new(30.0, -12.5));
        assert_eq!(style.property("left"), "30px");
        assert_eq!(style.property("top"), "-12.5px");
    }

    #[test]
    fn positioned_element_without_both_insets_starts_at_origin() {
        let computed = ComputedStyle {
            position: "relative".into(),
            left: "8px".into(),
            top: "4px".into(),
            transform: "none".into(),
        };
        assert_eq!(starting_offset(&computed, "8px", ""), Point::ZERO);
        assert_eq!(starting_offset(&computed, "8px", "4px"), Point::new(8.0, 4.0));
    }

    #[test]
    fn starting_scale_comes_from_transform_and_is_clamped() {
        let config = PositioningConfig::default();
        let mut computed = ComputedStyle::default();
        computed.transform = "matrix(1.25, 0, 0, 1.25, 0, 0)".into();
        assert_eq!(starting_scale(&computed, &config), 1.25);
        computed.transform = "matrix(8, 0, 0, 8, 0, 0)".into();
        assert_eq!(starting_scale(&computed, &config), 3.0);
        computed.transform = "matrix(-1, 0, 0, 1, 0, 0)".into();
        assert_eq!(starting_scale(&computed, &config), 1.0);
        computed.transform = "garbage".into();
        assert_eq!(starting_scale(&computed, &config), 1.0);
    }

    #[test]
    fn drag_uses_total_travel_not_per_event_deltas() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        session.begin_drag(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(style.property("cursor"), "grabbing");
        for (x, y) in [(180.0, 20.0), (90.0, 300.0), (141.0, 124.0)] {
            session.drag_to(Point::new(x, y)).unwrap();
        }
        session.drag_to(Point::new(140.0, 125.0)).unwrap();
        assert_eq!(session.offset(), Point::new(40.0, 25.0));
        assert!(session.end_drag().unwrap());
        assert_eq!(style.property("cursor"), "grab");
        assert_eq!(style.property("left"), "40px");
        assert_eq!(style.property("top"), "25px");
    }

    #[test]
    fn move_without_drag_is_ignored() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        assert!(!session.drag_to(Point::new(50.0, 50.0)).unwrap());
        assert!(!session.end_drag().unwrap());
        assert_eq!(session.offset(), Point::ZERO);
    }

    #[test]
    fn second_drag_starts_from_previous_result() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        session.begin_drag(Point::new(0.0, 0.0)).unwrap();
        session.drag_to(Point::new(10.0, 5.0)).unwrap();
        session.end_drag().unwrap();
        session.begin_drag(Point::new(200.0, 200.0)).unwrap();
        session.drag_to(Point::new(190.0, 215.0)).unwrap();
        assert_eq!(session.offset(), Point::new(0.0, 20.0));
    }

    #[test]
    fn arrow_nudges_sum_exactly() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        let shift = Modifiers { shift: true };
        let plain = Modifiers::default();
        let presses = [
            (Direction::Right, plain),
            (Direction::Right, shift),
            (Direction::Down, shift),
            (Direction::Down, shift),
            (Direction::Up, plain),
            (Direction::Left, plain),
            (Direction::Left, plain),
        ];
        for (direction, modifiers) in presses {
            let outcome = session.key(KeyCommand::Nudge(direction), modifiers).unwrap();
            assert_eq!(outcome, KeyOutcome::Moved);
        }
        assert_eq!(session.offset(), Point::new(9.0, 19.0));
        assert_eq!(style.property("left"), "9px");
        assert_eq!(style.property("top"), "19px");
    }

    #[test]
    fn arrows_are_ignored_while_dragging() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        session.begin_drag(Point::new(0.0, 0.0)).unwrap();
        let outcome = session
            .key(KeyCommand::Nudge(Direction::Left), Modifiers::default())
            .unwrap();
        assert_eq!(outcome, KeyOutcome::Ignored);
        assert!(!outcome.is_handled());
        assert_eq!(session.offset(), Point::ZERO);
    }

    #[test]
    fn scale_keys_step_by_one_percent() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        for _ in 0..3 {
            session.key(KeyCommand::ScaleUp, Modifiers::default()).unwrap();
        }
        assert_eq!(session.report().scale, 103);
        assert!(style.property("transform").starts_with("scale(1.03"));
        session.key(KeyCommand::ScaleDown, Modifiers::default()).unwrap();
        assert_eq!(session.report().scale, 102);
    }

    #[test]
    fn scale_never_leaves_bounds() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        for _ in 0..500 {
            session.key(KeyCommand::ScaleUp, Modifiers::default()).unwrap();
            assert!(session.scale() <= 3.0);
        }
        assert_eq!(session.scale(), 3.0);
        assert_eq!(style.property("transform"), "scale(3)");
        for _ in 0..500 {
            session.wheel(120.0).unwrap();
            assert!(session.scale() >= 0.1);
        }
        assert_eq!(session.scale(), 0.1);
        assert_eq!(session.report().scale, 10);
    }

    #[test]
    fn wheel_direction_and_zero_delta() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        assert!(session.wheel(-53.0).unwrap());
        assert_eq!(session.report().scale, 102);
        assert!(session.wheel(53.0).unwrap());
        assert!(session.wheel(53.0).unwrap());
        assert_eq!(session.report().scale, 98);
        assert!(!session.wheel(0.0).unwrap());
        assert_eq!(session.report().scale, 98);
    }

    #[test]
    fn escape_requests_cancel_without_touching_state() {
        let style = SharedStyle::new();
        let mut session = begin(&style);
        let outcome = session.key(KeyCommand::Cancel, Modifiers::default()).unwrap();
        assert_eq!(outcome, KeyOutcome::Cancel);
        assert!(outcome.is_handled());
    }

    #[test]
    fn finish_restores_original_style_exactly() {
        let style = SharedStyle::with(&[
            ("position", "absolute"),
            ("left", "3px"),
            ("top", "4px"),
            ("color", "blue"),
        ]);
        style.set_property("cursor", "pointer", "important").unwrap();
        let before = style.declarations();

        let mut session = begin(&style);
        session.begin_drag(Point::new(1.0, 1.0)).unwrap();
        session.drag_to(Point::new(50.0, 70.0)).unwrap();
        session.wheel(-1.0).unwrap();

        let (report, restored, target) = session.finish();
        restored.unwrap();
        assert!(target.same_as(&style));
        assert_eq!(report, PositionReport { x: 52, y: 73, scale: 102 });
        assert_eq!(style.declarations(), before);
    }

    #[test]
    fn px_never_prints_negative_zero() {
        assert_eq!(px(-0.0), "0px");
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(px(-3.0), "-3px");
    }

    #[test]
    fn invalid_options_leave_target_untouched() {
        let style = SharedStyle::with(&[("color", "red")]);
        let before = style.declarations();
        let config = PositioningConfig {
            min_scale: 2.0,
            max_scale: 1.0,
            ..Default::default()
        };
        let err = Session::begin("#box", style.clone(), config).unwrap_err();
        assert!(matches!(err, PositioningError::InvalidConfig(_)));
        assert_eq!(style.declarations(), before);
    }

    #[test]
    fn composite_transforms_give_their_horizontal_scale() {
        let style = SharedStyle::with(&[("transform", "translate(10px) scale(2)")]);
        assert_eq!(begin(&style).scale(), 2.0);

        let style = SharedStyle::with(&[("transform", "scale(1.5) rotate(0deg)")]);
        assert_eq!(begin(&style).scale(), 1.5);
    }
}
