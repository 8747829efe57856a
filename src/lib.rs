//! # `bartrack`
//!
//! High-level single and multi progress bar trackers for the terminal.
//!
//! `bartrack` is a thin façade over a rendering engine ([`indicatif`] by
//! default): it translates `start` / `update` / `increment` / `stop` calls
//! into engine mutations, validating inputs at the boundary and applying a
//! *clamp-and-finish* policy: a value at or past the declared total is
//! capped at the total and the bar transitions to a terminal inactive state,
//! instead of the raw value passing through.
//!
//! ## Modules
//!
//! * [`config`]: colors, glyphs, and the per-tracker appearance record.
//! * [`style`]: builds the display template from a configuration.
//! * [`engine`]: the rendering engine seam and its `indicatif` default.
//! * [`error`]: the [`TrackerError`] taxonomy.
//! * [`single`]: [`SingleTracker`], one bar.
//! * [`multi`]: [`MultiTracker`], many bars keyed by [`BarId`].
//!
//! ## Example
//!
//! ```no_run
//! use bartrack::{BarMetadata, MultiTracker};
//!
//! # fn main() -> Result<(), bartrack::TrackerError> {
//! let tracker = MultiTracker::new()?;
//! let download = tracker.create_bar(100, None, BarMetadata::new())?;
//! let verify = tracker.create_bar(10, None, BarMetadata::new())?;
//!
//! tracker.increment_bar(download, 40, BarMetadata::new().with("rate", "3MB/s"))?;
//! tracker.update_bar(verify, 10, BarMetadata::new())?;
//!
//! // stop() succeeds only once every bar has finished.
//! tracker.update_bar(download, 100, BarMetadata::new())?;
//! assert!(tracker.stop()?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod multi;
pub mod single;
pub mod style;

pub use config::{BarColor, BarMetadata, COMPLETE_GLYPH, INCOMPLETE_GLYPH, TrackerConfig};
pub use engine::{EngineBar, EngineError, IndicatifEngine, RenderEngine};
pub use error::TrackerError;
pub use multi::{BarId, MultiTracker};
pub use single::SingleTracker;
