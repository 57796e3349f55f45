//! The positioning tool: at most one live [`Session`] plus the enable/disable lifecycle.
//!
//! Front ends translate their input into the calls here and decide hit
//! testing themselves; the tool never looks at raw events.

use crate::config::PositioningConfig;
use crate::error::PositioningError;
use crate::session::{KeyOutcome, Session};
use crate::style::StyleTarget;
use crate::types::{KeyCommand, Modifiers, Point, PositionReport};

/// Resolves selectors to elements.
pub trait ElementSource {
    /// Element handle the source hands out.
    type Element: StyleTarget;

    /// Returns the first element matching `selector`.
    ///
    /// Fails with [`PositioningError::SelectorNotFound`] when nothing matches.
    fn query(&self, selector: &str) -> Result<Self::Element, PositioningError>;
}

/// Result of a key press routed through the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// No session, or the key means nothing to the tool.
    Ignored,
    /// The session consumed the key.
    Handled,
    /// The key ended the session; carries the final values.
    Disabled(PositionReport),
}

impl KeyResult {
    /// Whether the page's default action for the key should be suppressed.
    pub fn is_handled(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Interactive positioning over one element at a time.
#[derive(Debug)]
pub struct PositioningTool<E: StyleTarget> {
    config: PositioningConfig,
    session: Option<Session<E>>,
}

impl<E: StyleTarget> Default for PositioningTool<E> {
    fn default() -> Self {
        Self::new(PositioningConfig::default())
    }
}

impl<E: StyleTarget> PositioningTool<E> {
    /// Creates an inactive tool.
    ///
    /// The options are checked when a session starts; see [`enable`](Self::enable).
    pub fn new(config: PositioningConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Options new sessions are started with.
    pub fn config(&self) -> &PositioningConfig {
        &self.config
    }

    /// Replaces the options. A live session keeps the options it was started with.
    ///
    /// Options that fail validation are rejected and the current ones kept.
    pub fn set_config(&mut self, config: PositioningConfig) -> Result<(), PositioningError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Whether a session is live.
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The live session, if any.
    pub fn session(&self) -> Option<&Session<E>> {
        self.session.as_ref()
    }

    /// Starts positioning the element `selector` resolves to.
    ///
    /// The selector is resolved before anything else happens, so a failed
    /// lookup leaves any current session untouched. A successful lookup while
    /// a session is live ends that session first (restoring its element) and
    /// then starts a new one. Invalid options fail with
    /// [`PositioningError::InvalidConfig`] before the lookup.
    pub fn enable<S>(&mut self, source: &S, selector: &str) -> Result<PositionReport, PositioningError>
    where
        S: ElementSource<Element = E>,
    {
        self.config.validate()?;
        let element = source.query(selector)?;

        if let Some(previous) = self.session.as_ref() {
            log::info!(
                "Positioning mode switching from {} to {selector}",
                previous.selector()
            );
            self.disable();
        }

        let session = Session::begin(selector, element, self.config.clone())?;
        let report = session.report();
        self.session = Some(session);

        log::info!("Positioning mode ENABLED for: {selector}");
        log::info!("Starting - {report}");
        log::info!("Drag or use arrow keys to move, scroll wheel or +/- to scale, Esc to finish.");
        Ok(report)
    }

    /// Ends the live session, restoring the element's original inline style.
    ///
    /// Returns the final values, or `None` when no session was live.
    pub fn disable(&mut self) -> Option<PositionReport> {
        let session = self.session.take()?;
        let (report, restored, _target) = session.finish();

        log::info!("Final - {report}");
        log::info!("To lock it in place use: {}", report.css());
        if let Err(err) = restored {
            log::error!("Original styles were not fully restored: {err}");
        }
        log::info!("Positioning mode DISABLED");
        Some(report)
    }

    /// Rounded offset and scale of the live session.
    pub fn position(&self) -> Option<PositionReport> {
        self.session.as_ref().map(Session::report)
    }

    /// Whether a pointer drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_dragging)
    }

    /// Starts a drag. The caller has checked that `pointer` is over the target.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        log::trace!("Drag start at ({}, {})", pointer.x, pointer.y);
        report_failure("start drag", session.begin_drag(pointer));
        true
    }

    /// Moves the target with the pointer. Returns `false` unless a drag is in progress.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.drag_to(pointer) {
            Ok(moved) => moved,
            Err(err) => {
                log::warn!("Could not move target: {err}");
                true
            }
        }
    }

    /// Ends a drag. Returns `false` unless a drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.end_drag() {
            Ok(ended) => ended,
            Err(err) => {
                log::warn!("Could not end drag: {err}");
                true
            }
        }
    }

    /// Routes a key press. Escape ends the session.
    pub fn key_down(&mut self, command: KeyCommand, modifiers: Modifiers) -> KeyResult {
        let Some(session) = self.session.as_mut() else {
            return KeyResult::Ignored;
        };
        let outcome = match session.key(command, modifiers) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::warn!("Could not apply {command:?}: {err}");
                return KeyResult::Handled;
            }
        };
        match outcome {
            KeyOutcome::Ignored => KeyResult::Ignored,
            KeyOutcome::Moved | KeyOutcome::Scaled => {
                log::trace!("{command:?} -> {}", session.report());
                KeyResult::Handled
            }
            KeyOutcome::Cancel => match self.disable() {
                Some(report) => KeyResult::Disabled(report),
                None => KeyResult::Ignored,
            },
        }
    }

    /// Applies a wheel notch over the target or the panel. Returns `true` if the scroll was consumed.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.wheel(delta_y) {
            Ok(scaled) => scaled,
            Err(err) => {
                log::warn!("Could not scale target: {err}");
                true
            }
        }
    }
}

fn report_failure(action: &str, result: Result<(), PositioningError>) {
    if let Err(err) = result {
        log::warn!("Could not {action}: {err}");
    }
}
