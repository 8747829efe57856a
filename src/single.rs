//! A tracker for one progress bar.
//!
//! [`SingleTracker`] owns a single engine bar and applies the boundary rules
//! on every call: totals must be positive, and any value that reaches the
//! total is clamped to it and finishes the bar (the bar's terminal state)
//! instead of being passed through raw. Once finished, further `update` and
//! `increment` calls are silent no-ops.
//!
//! # Example
//!
//! ```no_run
//! use bartrack::SingleTracker;
//!
//! # fn main() -> Result<(), bartrack::TrackerError> {
//! let mut tracker = SingleTracker::new()?;
//! tracker.start(10, "download")?;
//! for _ in 0..10 {
//!     tracker.increment(1)?;
//! }
//! tracker.stop()?;
//! # Ok(())
//! # }
//! ```

use compact_str::CompactString;

use crate::config::{BarMetadata, TrackerConfig};
use crate::engine::{EngineBar, IndicatifEngine, RenderEngine};
use crate::error::TrackerError;

/// A façade over one rendering-engine bar.
///
/// The bar lives from [`start`](Self::start) until it reaches its total or
/// [`stop`](Self::stop) is called; `finished` is terminal and nothing
/// reactivates a bar (a new `start` replaces it with a fresh one).
pub struct SingleTracker<E: RenderEngine = IndicatifEngine> {
    engine: E,
    bar: Option<E::Handle>,
}

impl SingleTracker {
    /// Creates a tracker with the default configuration, drawing to stderr.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] when the rendering engine fails to
    /// initialize.
    pub fn new() -> Result<Self, TrackerError> {
        Self::with_config(&TrackerConfig::default())
    }

    /// Creates a tracker with a custom appearance configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] when the rendering engine fails to
    /// initialize (e.g. the custom template does not compile).
    pub fn with_config(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let engine =
            IndicatifEngine::new(config).map_err(|e| TrackerError::engine("initialize", e))?;
        Ok(Self::with_engine(engine))
    }

    /// Creates a tracker that renders nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] when the custom template in `config`
    /// does not compile.
    pub fn hidden(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let engine =
            IndicatifEngine::hidden(config).map_err(|e| TrackerError::engine("initialize", e))?;
        Ok(Self::with_engine(engine))
    }
}

impl<E: RenderEngine> SingleTracker<E> {
    /// Creates a tracker driving a caller-supplied rendering engine.
    pub fn with_engine(engine: E) -> Self {
        Self { engine, bar: None }
    }

    /// Starts the bar at `0/total`, tagged with `label` for display.
    ///
    /// Starting again replaces the previous bar.
    ///
    /// # Errors
    ///
    /// * [`TrackerError::InvalidTotal`] if `total` is zero.
    /// * [`TrackerError::Engine`] if the engine fails to create the bar.
    pub fn start(
        &mut self,
        total: u64,
        label: impl Into<CompactString>,
    ) -> Result<(), TrackerError> {
        if total == 0 {
            return Err(TrackerError::InvalidTotal { given: total });
        }

        let bar = self
            .engine
            .add_bar(total, 0, &label.into(), &BarMetadata::new())
            .map_err(|e| TrackerError::engine("start", e))?;
        self.bar = Some(bar);
        Ok(())
    }

    /// Advances the bar to an absolute `value`.
    ///
    /// A no-op when no bar has been started or the bar is already finished.
    /// When `value >= total` the bar is forced to `total` and finished
    /// (clamp-and-finish), never set past its total.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] if the engine call fails.
    pub fn update(&mut self, value: u64) -> Result<(), TrackerError> {
        let Some(bar) = &self.bar else {
            return Ok(());
        };
        if !bar.is_active() {
            return Ok(());
        }

        let meta = BarMetadata::new();
        let wrap = |e| TrackerError::engine("update", e);

        if value >= bar.total() {
            bar.update(bar.total(), &meta).map_err(wrap)?;
            bar.finish().map_err(wrap)?;
            return Ok(());
        }

        bar.update(value, &meta).map_err(wrap)
    }

    /// Advances the bar by `delta`.
    ///
    /// Equivalent to [`update`](Self::update)`(position + delta)` under the
    /// same clamp rule: reaching the total clamps and finishes the bar.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] if the engine call fails.
    pub fn increment(&mut self, delta: u64) -> Result<(), TrackerError> {
        let Some(bar) = &self.bar else {
            return Ok(());
        };
        if !bar.is_active() {
            return Ok(());
        }

        let meta = BarMetadata::new();
        let wrap = |e| TrackerError::engine("increment", e);

        if bar.position().saturating_add(delta) >= bar.total() {
            bar.update(bar.total(), &meta).map_err(wrap)?;
            bar.finish().map_err(wrap)?;
            return Ok(());
        }

        bar.inc(delta, &meta).map_err(wrap)
    }

    /// Finishes the bar at its current position. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] if the engine call fails.
    pub fn stop(&mut self) -> Result<(), TrackerError> {
        if let Some(bar) = &self.bar {
            bar.finish().map_err(|e| TrackerError::engine("stop", e))?;
        }
        Ok(())
    }

    /// Current position, if a bar has been started.
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(EngineBar::position)
    }

    /// Declared total, if a bar has been started.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.bar.as_ref().map(EngineBar::total)
    }

    /// `true` while a started bar has not yet finished.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.bar.as_ref().is_some_and(EngineBar::is_active)
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TrackerConfig;
    use crate::engine::test_support::{FailAt, FailingEngine};
    use crate::error::TrackerError;

    use super::SingleTracker;

    fn hidden_tracker() -> SingleTracker {
        SingleTracker::hidden(&TrackerConfig::new()).unwrap()
    }

    /// Basic Lifecycle
    /// start -> update -> clamp at total -> terminal.
    #[test]
    fn test_clamp_and_finish() {
        let mut tracker = hidden_tracker();
        tracker.start(10, "1").unwrap();

        tracker.update(4).unwrap();
        assert_eq!(tracker.position(), Some(4));
        assert!(tracker.is_active());

        // Overshooting clamps to the total and finishes the bar.
        tracker.update(99).unwrap();
        assert_eq!(tracker.position(), Some(10));
        assert!(!tracker.is_active());
    }

    /// Increment Equivalence
    /// increment(d) behaves as update(position + d) under the clamp rule.
    #[test]
    fn test_increment_clamps() {
        let mut tracker = hidden_tracker();
        tracker.start(5, "job").unwrap();

        tracker.increment(2).unwrap();
        tracker.increment(2).unwrap();
        assert_eq!(tracker.position(), Some(4));
        assert!(tracker.is_active());

        tracker.increment(3).unwrap();
        assert_eq!(tracker.position(), Some(5), "clamped at total");
        assert!(!tracker.is_active());
    }

    /// Terminal State
    /// After the bar finishes, update/increment are no-ops.
    #[test]
    fn test_noop_after_finish() {
        let mut tracker = hidden_tracker();
        tracker.start(3, "1").unwrap();

        tracker.update(3).unwrap();
        assert!(!tracker.is_active());

        tracker.update(1).unwrap();
        tracker.increment(1).unwrap();
        assert_eq!(tracker.position(), Some(3), "finished bar must not move");
    }

    /// Pre-start Calls
    /// update/increment/stop before start are harmless no-ops.
    #[test]
    fn test_noop_before_start() {
        let mut tracker = hidden_tracker();

        tracker.update(5).unwrap();
        tracker.increment(1).unwrap();
        tracker.stop().unwrap();

        assert_eq!(tracker.position(), None);
        assert!(!tracker.is_active());
    }

    /// Validation
    /// A zero total is rejected before the engine is touched.
    #[test]
    fn test_zero_total_rejected() {
        let mut tracker = hidden_tracker();
        assert!(matches!(
            tracker.start(0, "1"),
            Err(TrackerError::InvalidTotal { given: 0 })
        ));
    }

    /// Stop Idempotence
    #[test]
    fn test_stop_idempotent() {
        let mut tracker = hidden_tracker();
        tracker.start(10, "1").unwrap();
        tracker.update(6).unwrap();

        tracker.stop().unwrap();
        assert!(!tracker.is_active());
        assert_eq!(tracker.position(), Some(6), "stop freezes, not clamps");

        tracker.stop().unwrap();
        assert_eq!(tracker.position(), Some(6));
    }

    /// Engine Error Wrapping
    /// Failures surface as TrackerError::Engine naming the operation.
    #[test]
    fn test_engine_errors_wrapped() {
        let mut tracker = SingleTracker::with_engine(FailingEngine { fail_at: FailAt::Add });
        let err = tracker.start(10, "1").unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "start", .. }));

        let mut tracker = SingleTracker::with_engine(FailingEngine {
            fail_at: FailAt::Mutate,
        });
        tracker.start(10, "1").unwrap();
        let err = tracker.update(3).unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "update", .. }));
        let err = tracker.increment(1).unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "increment", .. }));
        let err = tracker.stop().unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "stop", .. }));
    }
}
