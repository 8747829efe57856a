//! The rendering engine seam and its default `indicatif` implementation.
//!
//! The trackers never draw anything themselves; they drive an engine through
//! two small traits:
//!
//! * [`EngineBar`]: one on-screen bar (position, total, active flag, display
//!   payload).
//! * [`RenderEngine`]: the shared container that creates, detaches, and
//!   finally tears down bars.
//!
//! Every engine call is fallible. The default engine rarely fails in
//! practice (its drawing is buffered), but cursor control and the final
//! container teardown touch the terminal directly, and alternative engines
//! may fail anywhere. The seam therefore carries [`EngineError`] throughout
//! and the trackers wrap it with the operation name.
//!
//! [`IndicatifEngine`] is the default implementation, backed by
//! [`indicatif::MultiProgress`]. A single-bar tracker simply runs a
//! one-element container. [`IndicatifEngine::hidden`] swaps in a no-op draw
//! target, which is how the test suites run without touching a terminal.

use std::fmt;
use std::io;

use console::Term;
use indicatif::style::TemplateError;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use thiserror::Error;

use crate::config::{BarMetadata, TrackerConfig};
use crate::style;

/// A failure reported by the rendering engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Terminal I/O failed (cursor control, redraw, teardown).
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    /// The display template did not compile.
    #[error("invalid display template: {0}")]
    Template(#[from] TemplateError),
}

/// One bar owned by the rendering engine.
///
/// Handles expose raw engine state; the saturation policy lives in the
/// trackers, not here.
pub trait EngineBar {
    /// Moves the bar to an absolute position, refreshing the display payload.
    fn update(&self, value: u64, meta: &BarMetadata) -> Result<(), EngineError>;

    /// Advances the bar by `delta`, refreshing the display payload.
    fn inc(&self, delta: u64, meta: &BarMetadata) -> Result<(), EngineError>;

    /// Marks the bar finished, leaving its last frame on screen.
    ///
    /// Finishing an already finished bar is a no-op.
    fn finish(&self) -> Result<(), EngineError>;

    /// Current position.
    fn position(&self) -> u64;

    /// Declared total.
    fn total(&self) -> u64;

    /// `true` until the bar is finished.
    fn is_active(&self) -> bool;
}

/// The shared bar container behind a tracker.
pub trait RenderEngine {
    /// The bar handle type this engine produces.
    type Handle: EngineBar;

    /// Creates a bar at `initial`/`total`, labelled with `label` and carrying
    /// an initial display payload.
    fn add_bar(
        &self,
        total: u64,
        initial: u64,
        label: &str,
        meta: &BarMetadata,
    ) -> Result<Self::Handle, EngineError>;

    /// Detaches a bar from the container without finishing it.
    fn remove_bar(&self, handle: &Self::Handle) -> Result<(), EngineError>;

    /// Tears the container down: clears residual output and restores the
    /// cursor if the engine hid it.
    fn shutdown(&self) -> Result<(), EngineError>;
}

/// The default rendering engine, drawing through [`indicatif`].
#[derive(Clone)]
pub struct IndicatifEngine {
    container: MultiProgress,
    term: Term,
    bar_style: ProgressStyle,
    hide_cursor: bool,
}

impl fmt::Debug for IndicatifEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndicatifEngine")
            .field("hide_cursor", &self.hide_cursor)
            .finish_non_exhaustive()
    }
}

impl IndicatifEngine {
    /// Creates an engine drawing to stderr.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] when `config` carries a custom
    /// template that fails to compile.
    pub fn new(config: &TrackerConfig) -> Result<Self, EngineError> {
        Self::with_draw_target(config, ProgressDrawTarget::stderr())
    }

    /// Creates an engine with no visible output.
    ///
    /// Bars behave identically (positions, totals, finish state) but draw
    /// nothing; cursor control is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] when `config` carries a custom
    /// template that fails to compile.
    pub fn hidden(config: &TrackerConfig) -> Result<Self, EngineError> {
        let mut engine = Self::with_draw_target(config, ProgressDrawTarget::hidden())?;
        engine.hide_cursor = false;
        Ok(engine)
    }

    fn with_draw_target(
        config: &TrackerConfig,
        target: ProgressDrawTarget,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            container: MultiProgress::with_draw_target(target),
            term: Term::stderr(),
            bar_style: style::bar_style(config)?,
            hide_cursor: config.hide_cursor,
        })
    }
}

impl RenderEngine for IndicatifEngine {
    type Handle = IndicatifBar;

    fn add_bar(
        &self,
        total: u64,
        initial: u64,
        label: &str,
        meta: &BarMetadata,
    ) -> Result<Self::Handle, EngineError> {
        if self.hide_cursor {
            self.term.hide_cursor()?;
        }

        let bar = self
            .container
            .add(ProgressBar::new(total).with_style(self.bar_style.clone()));
        bar.set_prefix(label.to_string());
        bar.set_position(initial);
        if !meta.is_empty() {
            bar.set_message(meta.render());
        }

        Ok(IndicatifBar { bar })
    }

    fn remove_bar(&self, handle: &Self::Handle) -> Result<(), EngineError> {
        self.container.remove(&handle.bar);
        Ok(())
    }

    fn shutdown(&self) -> Result<(), EngineError> {
        self.container.clear()?;
        if self.hide_cursor {
            self.term.show_cursor()?;
        }
        Ok(())
    }
}

/// Bar handle produced by [`IndicatifEngine`].
#[derive(Clone, Debug)]
pub struct IndicatifBar {
    bar: ProgressBar,
}

impl IndicatifBar {
    fn apply_meta(&self, meta: &BarMetadata) {
        if !meta.is_empty() {
            self.bar.set_message(meta.render());
        }
    }
}

impl EngineBar for IndicatifBar {
    fn update(&self, value: u64, meta: &BarMetadata) -> Result<(), EngineError> {
        self.bar.set_position(value);
        self.apply_meta(meta);
        Ok(())
    }

    fn inc(&self, delta: u64, meta: &BarMetadata) -> Result<(), EngineError> {
        self.bar.inc(delta);
        self.apply_meta(meta);
        Ok(())
    }

    fn finish(&self) -> Result<(), EngineError> {
        // abandon() freezes the bar at its current position instead of
        // snapping it to the total; the trackers clamp explicitly first.
        self.bar.abandon();
        Ok(())
    }

    fn position(&self) -> u64 {
        self.bar.position()
    }

    fn total(&self) -> u64 {
        self.bar.length().unwrap_or(0)
    }

    fn is_active(&self) -> bool {
        !self.bar.is_finished()
    }
}


#[cfg(test)]
mod tests {
    use crate::config::{BarMetadata, TrackerConfig};

    use super::{EngineBar as _, IndicatifEngine, RenderEngine as _};

    /// Hidden Engine Lifecycle
    /// Bars created through the hidden engine track state without drawing.
    #[test]
    fn test_hidden_engine_bar_state() {
        let engine = IndicatifEngine::hidden(&TrackerConfig::new()).unwrap();
        let meta = BarMetadata::new();

        let bar = engine.add_bar(20, 0, "1", &meta).unwrap();
        assert_eq!(bar.total(), 20);
        assert_eq!(bar.position(), 0);
        assert!(bar.is_active());

        bar.inc(5, &meta).unwrap();
        bar.update(12, &meta).unwrap();
        assert_eq!(bar.position(), 12);

        bar.finish().unwrap();
        assert!(!bar.is_active());

        engine.remove_bar(&bar).unwrap();
        engine.shutdown().unwrap();
    }

    /// Template Failure
    /// A broken custom template must fail engine construction.
    #[test]
    fn test_bad_template_rejected() {
        let config = TrackerConfig::new().with_template("{bar:x}");
        assert!(IndicatifEngine::hidden(&config).is_err());
    }
}
