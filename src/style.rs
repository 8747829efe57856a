//! Builds the display template from a [`TrackerConfig`].
//!
//! The layout mirrors the classic three-part format: a label prefix, the
//! colorized bar itself, and a numeric suffix.
//!
//! ```text
//! {prefix} | {bar} | {percent}% | {pos}/{total} {msg}
//! ```
//!
//! [`bar_style`] compiles that template (or a caller-supplied override) plus
//! the configured glyph pair into an [`indicatif::ProgressStyle`] the engine
//! can hand to each bar.

use indicatif::ProgressStyle;
use indicatif::style::TemplateError;

use crate::config::TrackerConfig;

const BAR_WIDTH: u32 = 40;

/// Assembles the template string for `config`.
///
/// The bar segment carries the configured color as an inline style
/// (`{bar:40.cyan}`); a custom template in `config` is returned verbatim.
#[must_use]
pub fn display_template(config: &TrackerConfig) -> String {
    if let Some(template) = &config.template {
        return template.to_string();
    }

    format!(
        "{{prefix}} | {{bar:{BAR_WIDTH}.{color}}} | {{percent:>3}}% | {{pos}}/{{len}} {{msg}}",
        color = config.color.as_str(),
    )
}

/// Compiles `config` into a ready-to-use engine style.
///
/// # Errors
///
/// Returns a [`TemplateError`] when a custom template fails to parse.
pub fn bar_style(config: &TrackerConfig) -> Result<ProgressStyle, TemplateError> {
    let glyphs: String = [config.complete_glyph, config.incomplete_glyph]
        .iter()
        .collect();

    Ok(ProgressStyle::with_template(&display_template(config))?.progress_chars(&glyphs))
}
