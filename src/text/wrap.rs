//! # Line Breaking
//!
//! Two greedy single-column wrappers, selected by script:
//!
//! - [`word_wrap`] for space-delimited scripts. Breaks only between tokens;
//!   a token wider than the line still gets a line of its own.
//! - [`char_wrap`] for scripts without word delimiters (CJK). Breaks after
//!   any code point and keeps explicit line feeds as line boundaries.
//!
//! Both are pure functions of `(text, metrics, max_width)`.
//!
//! ## Example
//!
//! ```
//! use placard::text::{FixedFace, wrap};
//!
//! let face = FixedFace::new(10);
//! let lines = wrap::word_wrap("Fear can hold you prisoner.", &face, 150);
//! assert_eq!(lines, vec!["Fear can hold ", "you prisoner. "]);
//! ```

use serde::{Deserialize, Serialize};

use super::FontMetrics;

/// Which wrapping algorithm a piece of text needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptKind {
    /// Space-delimited text, wrapped per word.
    Latin,
    /// Text without word delimiters, wrapped per code point.
    Cjk,
}

/// A caption and the script it is written in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    pub script: ScriptKind,
}

impl Caption {
    pub fn latin(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            script: ScriptKind::Latin,
        }
    }

    pub fn cjk(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            script: ScriptKind::Cjk,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// When [`char_wrap`] closes a line.
///
/// After adding character `c`, the running width `w` is compared against
/// `max_width - width(c)`, i.e. room for one more character like `c`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakThreshold {
    /// Break once `w >= max_width - width(c)`. Lines stay strictly short of a
    /// full line when widths divide `max_width` evenly.
    #[default]
    ReserveNext,
    /// Break once `w > max_width - width(c)`. Lines may fill `max_width`
    /// exactly.
    ExactFit,
}

impl BreakThreshold {
    #[inline]
    fn reached(self, line_width: u32, max_width: u32, char_width: u32) -> bool {
        let limit = max_width.saturating_sub(char_width);
        match self {
            BreakThreshold::ReserveNext => line_width >= limit,
            BreakThreshold::ExactFit => line_width > limit,
        }
    }
}

/// Wrap a caption with the algorithm its script needs.
pub fn wrap<M: FontMetrics + ?Sized>(
    caption: &Caption,
    metrics: &M,
    max_width: u32,
    threshold: BreakThreshold,
) -> Vec<String> {
    match caption.script {
        ScriptKind::Latin => word_wrap(&caption.text, metrics, max_width),
        ScriptKind::Cjk => char_wrap(&caption.text, metrics, max_width, threshold),
    }
}

/// Greedy word wrap for space-delimited text.
///
/// Splits on single spaces. Every emitted token is followed by one space, so
/// each line keeps its trailing space. Runs of spaces produce empty tokens,
/// which are kept except at the very end of the text.
pub fn word_wrap<M: FontMetrics + ?Sized>(text: &str, metrics: &M, max_width: u32) -> Vec<String> {
    let mut tokens: Vec<&str> = text.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let space_width = metrics.char_width(' ');
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width: u32 = 0;

    for token in tokens {
        let token_width = metrics.string_width(token);

        if line_width + token_width > max_width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        line.push_str(token);
        line.push(' ');
        line_width += token_width + space_width;
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Greedy per-code-point wrap for text without word delimiters.
///
/// Concatenating the returned lines gives back `text` exactly: an explicit
/// `\n` stays at the end of the line it closes, and inserted breaks add
/// nothing. No trailing empty line is produced.
pub fn char_wrap<M: FontMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    max_width: u32,
    threshold: BreakThreshold,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width: u32 = 0;

    for c in text.chars() {
        line.push(c);

        if c == '\n' {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
            continue;
        }

        let char_width = metrics.char_width(c);
        line_width += char_width;

        if threshold.reached(line_width, max_width, char_width) {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
