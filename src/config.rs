//! Static configuration for progress bar appearance.
//!
//! This module holds the plain-data inputs the trackers are built from:
//!
//! * [`BarColor`]: the palette used to tint the bar glyphs.
//! * [`COMPLETE_GLYPH`] / [`INCOMPLETE_GLYPH`]: the default block characters.
//! * [`TrackerConfig`]: the immutable per-tracker appearance record.
//! * [`BarMetadata`]: the key/value display payload attached to a bar.
//!
//! A [`TrackerConfig`] is consumed once, when a tracker (and its rendering
//! engine) is constructed; appearance is constant for the tracker's lifetime.

use compact_str::CompactString;

/// Character drawn for the completed portion of a bar (`█`, U+2588).
pub const COMPLETE_GLYPH: char = '\u{2588}';

/// Character drawn for the remaining portion of a bar (`░`, U+2591).
pub const INCOMPLETE_GLYPH: char = '\u{2591}';

/// The palette available for tinting the bar glyphs.
///
/// Each variant maps to a fixed terminal color: trackers report state through
/// color, not through free-form styling.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarColor {
    /// Neutral in-progress color (cyan).
    #[default]
    Default,
    /// Completed-successfully color (green).
    Success,
    /// Degraded-but-running color (yellow).
    Warning,
    /// Failure color (red).
    Error,
}

impl BarColor {
    /// Returns the terminal color name this variant maps to.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "cyan",
            Self::Success => "green",
            Self::Warning => "yellow",
            Self::Error => "red",
        }
    }
}

/// Immutable appearance configuration for a tracker.
///
/// The default renders as a cyan `█`/`░` bar with the cursor hidden while
/// bars are on screen:
///
/// ```text
/// 1 | ████████░░░░░░░░ |  50% | 5/10
/// ```
///
/// Setting [`template`](Self::with_template) replaces the entire built-in
/// layout: the string is handed to the rendering engine verbatim, so it may
/// use any placeholder the engine understands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackerConfig {
    /// Tint applied to the bar glyphs.
    pub color: BarColor,
    /// Full template override; `None` uses the built-in layout.
    pub template: Option<CompactString>,
    /// Glyph for the completed portion.
    pub complete_glyph: char,
    /// Glyph for the remaining portion.
    pub incomplete_glyph: char,
    /// Hide the terminal cursor while bars are active.
    pub hide_cursor: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            color: BarColor::Default,
            template: None,
            complete_glyph: COMPLETE_GLYPH,
            incomplete_glyph: INCOMPLETE_GLYPH,
            hide_cursor: true,
        }
    }
}

impl TrackerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bar color.
    #[must_use]
    pub const fn with_color(mut self, color: BarColor) -> Self {
        self.color = color;
        self
    }

    /// Replaces the built-in layout with a verbatim engine template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<CompactString>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Sets the glyph pair used to draw the bar.
    #[must_use]
    pub const fn with_glyphs(mut self, complete: char, incomplete: char) -> Self {
        self.complete_glyph = complete;
        self.incomplete_glyph = incomplete;
        self
    }

    /// Controls whether the cursor is hidden while bars are active.
    #[must_use]
    pub const fn with_hide_cursor(mut self, hide: bool) -> Self {
        self.hide_cursor = hide;
        self
    }
}

/// Ordered key/value display payload attached to a bar.
///
/// Metadata rides along with `update`/`increment` calls and is rendered into
/// the bar's trailing message area. Merging is an upsert: a later value for
/// an existing key replaces the earlier one, new keys append in call order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BarMetadata {
    entries: Vec<(CompactString, CompactString)>,
}

impl BarMetadata {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value for `key`.
    pub fn insert(&mut self, key: impl Into<CompactString>, value: impl Into<CompactString>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<CompactString>, value: impl Into<CompactString>) -> Self {
        self.insert(key, value);
        self
    }

    /// Upserts every entry of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Looks up the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the payload holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the payload as a single `key=value` message line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.entries {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for BarMetadata
where
    K: Into<CompactString>,
    V: Into<CompactString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut meta = Self::new();
        for (key, value) in iter {
            meta.insert(key, value);
        }
        meta
    }
}
