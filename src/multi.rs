//! A tracker for multiple concurrent progress bars.
//!
//! [`MultiTracker`] keeps a registry of engine bars keyed by [`BarId`] and
//! drives them through one shared rendering container. The registry sits
//! behind a [`RwLock`](parking_lot::RwLock) so the tracker can be called
//! through shared references from several caller-owned timers; per-bar
//! mutations go through the engine handles and never hold the lock longer
//! than one call.
//!
//! # Identifier assignment
//!
//! Caller-supplied identifiers are used verbatim; creating a bar under an
//! id that already exists silently replaces the registry entry, so callers
//! handing out their own ids must keep them unique. Auto-generated ids are
//! `registry length + 1` at creation time. That sequence can revisit an id
//! after [`remove_bar`](MultiTracker::remove_bar) shrinks the registry;
//! treat auto ids as unique only among bars alive at the same time.
//!
//! # Teardown protocol
//!
//! [`stop`](MultiTracker::stop) is all-or-nothing: while any bar is still
//! active it does nothing and returns `Ok(false)`. Only once every bar has
//! finished does it tear the shared container down, clear the registry, and
//! return `Ok(true)`. Callers driving bars from independent timers retry
//! `stop` as each of their bars completes; whichever call observes the last
//! finish wins.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::{BarMetadata, TrackerConfig};
use crate::engine::{EngineBar, IndicatifEngine, RenderEngine};
use crate::error::TrackerError;

/// Identifier of one bar within a [`MultiTracker`] registry.
pub type BarId = u64;

/// A registry entry: the engine handle plus the accumulated display payload.
struct ManagedBar<H> {
    handle: H,
    meta: BarMetadata,
}

/// A façade over a shared rendering container holding many bars.
pub struct MultiTracker<E: RenderEngine = IndicatifEngine> {
    engine: E,
    bars: RwLock<HashMap<BarId, ManagedBar<E::Handle>>>,
}

impl MultiTracker {
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

impl<E: RenderEngine> MultiTracker<E> {
    /// Creates a tracker driving a caller-supplied rendering engine.
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            bars: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a bar at `0/total` and registers it.
    ///
    /// `id` may be a caller-chosen identifier (`Some`/a bare integer) or
    /// `None` to auto-assign `registry length + 1`; see the module docs for
    /// the uniqueness caveats. `meta` is the bar's initial display payload.
    /// Returns the id the bar was registered under.
    ///
    /// # Errors
    ///
    /// * [`TrackerError::InvalidTotal`] if `total` is zero.
    /// * [`TrackerError::Engine`] if the engine fails to create the bar.
    pub fn create_bar(
        &self,
        total: u64,
        id: impl Into<Option<BarId>>,
        meta: BarMetadata,
    ) -> Result<BarId, TrackerError> {
        if total == 0 {
            return Err(TrackerError::InvalidTotal { given: total });
        }

        let mut bars = self.bars.write();
        let id = id.into().unwrap_or(bars.len() as BarId + 1);

        let handle = self
            .engine
            .add_bar(total, 0, &id.to_string(), &meta)
            .map_err(|e| TrackerError::engine("create", e))?;
        bars.insert(id, ManagedBar { handle, meta });

        Ok(id)
    }

    /// Advances a bar to an absolute `value`, merging `payload` into its
    /// display metadata.
    ///
    /// A no-op (beyond the metadata merge) when the bar has already
    /// finished. When `value >= total` the bar is forced to `total` and
    /// finished, never set past its total.
    ///
    /// # Errors
    ///
    /// * [`TrackerError::BarNotFound`] if `id` is not registered.
    /// * [`TrackerError::Engine`] if the engine call fails.
    pub fn update_bar(
        &self,
        id: BarId,
        value: u64,
        payload: BarMetadata,
    ) -> Result<(), TrackerError> {
        let mut bars = self.bars.write();
        let entry = bars.get_mut(&id).ok_or(TrackerError::BarNotFound { id })?;
        entry.meta.merge(&payload);

        let bar = &entry.handle;
        if !bar.is_active() {
            return Ok(());
        }

        let wrap = |e| TrackerError::engine("update", e);
        if value >= bar.total() {
            bar.update(bar.total(), &entry.meta).map_err(wrap)?;
            bar.finish().map_err(wrap)?;
            return Ok(());
        }

        bar.update(value, &entry.meta).map_err(wrap)
    }

    /// Advances a bar by `delta`, merging `payload` into its display
    /// metadata.
    ///
    /// Equivalent to [`update_bar`](Self::update_bar)`(id, position + delta)`
    /// under the same clamp rule.
    ///
    /// # Errors
    ///
    /// * [`TrackerError::BarNotFound`] if `id` is not registered.
    /// * [`TrackerError::Engine`] if the engine call fails.
    pub fn increment_bar(
        &self,
        id: BarId,
        delta: u64,
        payload: BarMetadata,
    ) -> Result<(), TrackerError> {
        let mut bars = self.bars.write();
        let entry = bars.get_mut(&id).ok_or(TrackerError::BarNotFound { id })?;
        entry.meta.merge(&payload);

        let bar = &entry.handle;
        if !bar.is_active() {
            return Ok(());
        }

        let wrap = |e| TrackerError::engine("increment", e);
        if bar.position().saturating_add(delta) >= bar.total() {
            bar.update(bar.total(), &entry.meta).map_err(wrap)?;
            bar.finish().map_err(wrap)?;
            return Ok(());
        }

        bar.inc(delta, &entry.meta).map_err(wrap)
    }

    /// Detaches a bar from the rendering container and drops its registry
    /// entry.
    ///
    /// # Errors
    ///
    /// * [`TrackerError::BarNotFound`] if `id` is not registered.
    /// * [`TrackerError::Engine`] if the engine fails to detach the bar.
    pub fn remove_bar(&self, id: BarId) -> Result<(), TrackerError> {
        let mut bars = self.bars.write();
        let entry = bars.remove(&id).ok_or(TrackerError::BarNotFound { id })?;
        self.engine
            .remove_bar(&entry.handle)
            .map_err(|e| TrackerError::engine("remove", e))
    }

    /// Attempts to tear down the shared rendering container.
    ///
    /// Returns `Ok(false)` without touching anything while any registered
    /// bar is still active; returns `Ok(true)` after stopping the container
    /// and clearing the registry once every bar has finished. See the module
    /// docs for the retry protocol.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Engine`] if the container teardown fails.
    pub fn stop(&self) -> Result<bool, TrackerError> {
        let mut bars = self.bars.write();
        if bars.values().any(|entry| entry.handle.is_active()) {
            return Ok(false);
        }

        self.engine
            .shutdown()
            .map_err(|e| TrackerError::engine("stop", e))?;
        bars.clear();
        Ok(true)
    }

    /// Number of registered bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.read().len()
    }

    /// `true` if no bars are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.read().is_empty()
    }

    /// `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: BarId) -> bool {
        self.bars.read().contains_key(&id)
    }

    /// The identifiers of all registered bars, in no particular order.
    #[must_use]
    pub fn bar_ids(&self) -> Vec<BarId> {
        self.bars.read().keys().copied().collect()
    }

    /// `true` if the registry is empty or every bar has finished.
    #[must_use]
    pub fn is_all_finished(&self) -> bool {
        self.bars
            .read()
            .values()
            .all(|entry| !entry.handle.is_active())
    }

    /// A bar's `(position, total)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BarNotFound`] if `id` is not registered.
    pub fn progress(&self, id: BarId) -> Result<(u64, u64), TrackerError> {
        let bars = self.bars.read();
        let entry = bars.get(&id).ok_or(TrackerError::BarNotFound { id })?;
        Ok((entry.handle.position(), entry.handle.total()))
    }

    /// Whether a bar is still active.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BarNotFound`] if `id` is not registered.
    pub fn is_bar_active(&self, id: BarId) -> Result<bool, TrackerError> {
        let bars = self.bars.read();
        let entry = bars.get(&id).ok_or(TrackerError::BarNotFound { id })?;
        Ok(entry.handle.is_active())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{BarMetadata, TrackerConfig};
    use crate::engine::test_support::{FailAt, FailingEngine};
    use crate::error::TrackerError;

    use super::MultiTracker;

    fn hidden_tracker() -> MultiTracker {
        MultiTracker::hidden(&TrackerConfig::new()).unwrap()
    }

    fn meta() -> BarMetadata {
        BarMetadata::new()
    }

    /// Auto Identifiers
    /// Bars created without explicit ids get 1, 2, ... in creation order.
    #[test]
    fn test_auto_id_sequence() {
        let tracker = hidden_tracker();

        let first = tracker.create_bar(10, None, meta()).unwrap();
        let second = tracker.create_bar(15, None, meta()).unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(tracker.len(), 2);
    }

    /// Explicit Identifiers
    /// Caller-supplied ids are used verbatim and are looked up exactly.
    #[test]
    fn test_explicit_ids() {
        let tracker = hidden_tracker();

        let id = tracker.create_bar(5, 9, meta()).unwrap();
        assert_eq!(id, 9);
        assert!(tracker.contains(9));
        assert!(!tracker.contains(1));
    }

    /// Full Scenario
    /// create(5, id=9) -> update(3) mid-progress -> update(5) clamps and
    /// finishes -> stop succeeds.
    #[test]
    fn test_lifecycle_scenario() {
        let tracker = hidden_tracker();
        tracker.create_bar(5, 9, meta()).unwrap();

        tracker.update_bar(9, 3, meta()).unwrap();
        assert_eq!(tracker.progress(9).unwrap(), (3, 5));
        assert!(tracker.is_bar_active(9).unwrap());

        tracker.update_bar(9, 5, meta()).unwrap();
        assert_eq!(tracker.progress(9).unwrap(), (5, 5));
        assert!(!tracker.is_bar_active(9).unwrap());

        assert!(tracker.stop().unwrap());
        assert!(tracker.is_empty());
    }

    /// Clamp Policy
    /// Values past the total saturate; increments behave identically.
    #[test]
    fn test_clamp_policy() {
        let tracker = hidden_tracker();
        tracker.create_bar(10, None, meta()).unwrap();

        tracker.update_bar(1, 25, meta()).unwrap();
        assert_eq!(tracker.progress(1).unwrap(), (10, 10));
        assert!(!tracker.is_bar_active(1).unwrap());

        tracker.create_bar(10, 2, meta()).unwrap();
        tracker.increment_bar(2, 7, meta()).unwrap();
        tracker.increment_bar(2, 7, meta()).unwrap();
        assert_eq!(tracker.progress(2).unwrap(), (10, 10));
        assert!(!tracker.is_bar_active(2).unwrap());
    }

    /// Stop Gate
    /// stop() refuses while any bar is active, succeeds once all finish.
    #[test]
    fn test_stop_all_or_nothing() {
        let tracker = hidden_tracker();
        tracker.create_bar(10, None, meta()).unwrap();
        tracker.create_bar(4, None, meta()).unwrap();

        tracker.update_bar(1, 10, meta()).unwrap();
        assert!(!tracker.stop().unwrap(), "bar 2 still active");
        assert_eq!(tracker.len(), 2, "failed stop must not clear the registry");

        tracker.update_bar(2, 4, meta()).unwrap();
        assert!(tracker.is_all_finished());
        assert!(tracker.stop().unwrap());
        assert!(tracker.is_empty());
    }

    /// Unknown Identifiers
    /// Every id-taking operation reports BarNotFound for absent ids.
    #[test]
    fn test_unknown_id_errors() {
        let tracker = hidden_tracker();

        assert!(matches!(
            tracker.update_bar(42, 1, meta()),
            Err(TrackerError::BarNotFound { id: 42 })
        ));
        assert!(matches!(
            tracker.increment_bar(42, 1, meta()),
            Err(TrackerError::BarNotFound { id: 42 })
        ));
        assert!(matches!(
            tracker.remove_bar(42),
            Err(TrackerError::BarNotFound { id: 42 })
        ));
        assert!(matches!(
            tracker.progress(42),
            Err(TrackerError::BarNotFound { id: 42 })
        ));
    }

    /// Validation
    #[test]
    fn test_zero_total_rejected() {
        let tracker = hidden_tracker();
        assert!(matches!(
            tracker.create_bar(0, None, meta()),
            Err(TrackerError::InvalidTotal { given: 0 })
        ));
        assert!(tracker.is_empty(), "rejected bar must not be registered");
    }

    /// Removal
    /// remove_bar drops the entry; the auto-id sequence then reuses ids.
    #[test]
    fn test_remove_and_id_reuse() {
        let tracker = hidden_tracker();
        tracker.create_bar(10, None, meta()).unwrap();
        tracker.create_bar(10, None, meta()).unwrap();

        tracker.remove_bar(2).unwrap();
        assert_eq!(tracker.len(), 1);

        // len + 1 collides with the surviving bar's id: documented caveat.
        let reused = tracker.create_bar(10, None, meta()).unwrap();
        assert_eq!(reused, 2);
    }

    /// Metadata Accumulation
    /// Payloads merge across calls instead of replacing each other.
    #[test]
    fn test_payload_merges() {
        let tracker = hidden_tracker();
        tracker
            .create_bar(10, None, BarMetadata::new().with("file", "a.txt"))
            .unwrap();

        tracker
            .update_bar(1, 2, BarMetadata::new().with("rate", "3MB/s"))
            .unwrap();
        tracker
            .increment_bar(1, 1, BarMetadata::new().with("rate", "5MB/s"))
            .unwrap();

        // Registry-held metadata reflects the accumulated payload.
        let bars = tracker.bars.read();
        let entry = bars.get(&1).unwrap();
        assert_eq!(entry.meta.get("file"), Some("a.txt"));
        assert_eq!(entry.meta.get("rate"), Some("5MB/s"));
    }

    /// Engine Error Wrapping
    #[test]
    fn test_engine_errors_wrapped() {
        let tracker = MultiTracker::with_engine(FailingEngine { fail_at: FailAt::Add });
        let err = tracker.create_bar(10, None, meta()).unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "create", .. }));

        let tracker = MultiTracker::with_engine(FailingEngine {
            fail_at: FailAt::Shutdown,
        });
        let err = tracker.stop().unwrap_err();
        assert!(matches!(err, TrackerError::Engine { op: "stop", .. }));
    }
}
