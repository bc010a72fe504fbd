//! Result line layout.
//!
//! A result line is laid out as
//!
//! ```text
//!   ✓ Install nginx .............................120ms DONE
//! └─┬─┘└─────┬─────┘└──────────────┬───────────┘└───┬──────────┘
//!  prefix   label                 fill            suffix
//! ```
//!
//! The suffix (timing + fixed-width status word) is right-aligned to the
//! target width by the dot fill. Labels too long for the line are wrapped at
//! a word boundary onto a continuation line, or truncated with `...` when no
//! acceptable boundary exists.
//!
//! All width arithmetic is done on uncolored text.

use super::color::{visible_width, ColorKey, ColorRenderer};
use super::terminal::MIN_WIDTH;
use super::types::{StatusClassification, STATUS_WIDTH};

/// Columns reserved for the indent, symbol and the spaces around them.
pub const PREFIX_SPACE: usize = 6;
/// Columns reserved for the timing text (`1234ms` plus padding).
pub const TIMING_SPACE: usize = 8;
/// Columns reserved for the status word and its leading space.
pub const STATUS_SPACE: usize = STATUS_WIDTH + 1;
/// Fewest dots ever drawn, even if the line overflows the width.
pub const MIN_DOTS: usize = 3;

const BREAK_CHARS: [char; 4] = [' ', '_', '-', ':'];
/// A wrapped first line never ends before this column of the label.
const MIN_BREAK_POS: usize = 25;
/// Shortest token allowed right before a break.
const MIN_TOKEN_LEN: usize = 4;
const INDENT: &str = "  ";
const CONTINUATION_INDENT: &str = "    ";
const ELLIPSIS: &str = "...";

// ============================================================================
// Input / Output
// ============================================================================

/// Everything needed to lay out one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec<'a> {
    /// Task label (uncolored)
    pub label: &'a str,
    /// Classification; selects symbol, color and status word
    pub status: StatusClassification,
    /// Timing text such as `120ms`
    pub timing: Option<&'a str>,
    /// Target width; raised to [`MIN_WIDTH`] when smaller
    pub width: usize,
    /// Error message shown under failed results
    pub error: Option<&'a str>,
}

impl<'a> LineSpec<'a> {
    /// A spec without timing or error text.
    pub fn new(label: &'a str, status: StatusClassification, width: usize) -> Self {
        Self {
            label,
            status,
            timing: None,
            width,
            error: None,
        }
    }

    /// Set the timing text.
    pub fn with_timing(mut self, timing: &'a str) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Set the error message.
    pub fn with_error(mut self, error: &'a str) -> Self {
        self.error = Some(error);
        self
    }
}

/// The lines produced for one result, ready to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLines {
    lines: Vec<String>,
    wrapped: bool,
}

impl RenderedLines {
    /// The rendered lines, in output order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if no lines were produced.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the label was wrapped onto a continuation line.
    pub fn is_wrapped(&self) -> bool {
        self.wrapped
    }
}

impl IntoIterator for RenderedLines {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

// ============================================================================
// Layout Engine
// ============================================================================

/// Lays out result lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineLayout {
    colors: ColorRenderer,
}

impl LineLayout {
    /// Create a layout engine drawing with `colors`.
    pub fn new(colors: ColorRenderer) -> Self {
        Self { colors }
    }

    /// Longest label that fits on a single line at `width`.
    ///
    /// The timing column is always reserved so that lines with and without
    /// timing wrap at the same point.
    pub fn max_label_width(width: usize) -> usize {
        width
            .max(MIN_WIDTH)
            .saturating_sub(PREFIX_SPACE + TIMING_SPACE + STATUS_SPACE)
    }

    /// Lay out one result.
    pub fn render(&self, spec: &LineSpec<'_>) -> RenderedLines {
        let width = spec.width.max(MIN_WIDTH);
        let max_label = Self::max_label_width(width);
        let chars: Vec<char> = spec.label.chars().collect();

        let mut lines = Vec::with_capacity(3);
        let mut wrapped = false;

        if visible_width(spec.label) <= max_label {
            lines.push(self.single_line(spec, spec.label, width));
        } else if let Some(at) = find_break(&chars, chars_within(&chars, max_label)) {
            let first: String = chars[..at].iter().collect();
            let second: String = chars[at..].iter().collect();
            lines.push(self.first_line(spec.status, first.trim_end()));
            lines.push(self.continuation_line(spec, second.trim_start(), width));
            wrapped = true;
        } else {
            let keep = chars_within(&chars, max_label.saturating_sub(ELLIPSIS.len()));
            let truncated: String = chars[..keep].iter().collect::<String>() + ELLIPSIS;
            lines.push(self.single_line(spec, &truncated, width));
        }

        if spec.status == StatusClassification::Failed {
            if let Some(msg) = spec.error {
                lines.push(
                    self.colors
                        .colorize(&format!("{CONTINUATION_INDENT}Error: {msg}"), ColorKey::Failed),
                );
            }
        }

        RenderedLines { lines, wrapped }
    }

    fn single_line(&self, spec: &LineSpec<'_>, label: &str, width: usize) -> String {
        let symbol = spec.status.symbol();
        let plain_prefix = format!("{INDENT}{symbol} {label} ");
        let (suffix, suffix_width) = self.suffix(spec);
        let dots = self.dots(width, visible_width(&plain_prefix) + suffix_width);

        format!(
            "{INDENT}{} {} {}{}",
            self.colors.colorize(symbol, spec.status.color_key()),
            self.colors.colorize(label, ColorKey::TaskName),
            dots,
            suffix
        )
    }

    /// First half of a wrapped label: no fill and no suffix.
    fn first_line(&self, status: StatusClassification, first: &str) -> String {
        format!(
            "{INDENT}{} {}",
            self.colors.colorize(status.symbol(), status.color_key()),
            self.colors.colorize(first, ColorKey::TaskName)
        )
    }

    fn continuation_line(&self, spec: &LineSpec<'_>, second: &str, width: usize) -> String {
        let plain_prefix = format!("{CONTINUATION_INDENT}{second} ");
        let (suffix, suffix_width) = self.suffix(spec);
        let dots = self.dots(width, visible_width(&plain_prefix) + suffix_width);

        format!(
            "{CONTINUATION_INDENT}{} {}{}",
            self.colors.colorize(second, ColorKey::TaskName),
            dots,
            suffix
        )
    }

    /// Timing and status word, with the suffix's uncolored width.
    fn suffix(&self, spec: &LineSpec<'_>) -> (String, usize) {
        let timing = spec.timing.unwrap_or("");
        let status = spec.status.padded_label();
        let width = visible_width(timing) + 1 + visible_width(&status);

        let mut suffix = String::new();
        if !timing.is_empty() {
            suffix.push_str(&self.colors.colorize(timing, ColorKey::Timing));
        }
        suffix.push(' ');
        suffix.push_str(&self.colors.colorize(&status, spec.status.color_key()));
        (suffix, width)
    }

    fn dots(&self, width: usize, used: usize) -> String {
        let count = width.saturating_sub(used).max(MIN_DOTS);
        self.colors.colorize(&".".repeat(count), ColorKey::Dots)
    }
}

/// Find where to split an overlong label.
///
/// Scans backwards from just under `max_label` towards the middle of the line
/// for a break character that does not directly follow a short token.
fn find_break(chars: &[char], max_label: usize) -> Option<usize> {
    let start = max_label.saturating_sub(3).min(chars.len().saturating_sub(1));
    let end = MIN_BREAK_POS.max(max_label / 2);

    (end + 1..=start)
        .rev()
        .find(|&i| BREAK_CHARS.contains(&chars[i]) && token_len_before(chars, i) >= MIN_TOKEN_LEN)
}

/// Number of leading chars that fit in `columns` display columns.
fn chars_within(chars: &[char], columns: usize) -> usize {
    let mut buf = [0u8; 4];
    let mut used = 0;
    chars
        .iter()
        .take_while(|c| {
            used += visible_width(c.encode_utf8(&mut buf));
            used <= columns
        })
        .count()
}

fn token_len_before(chars: &[char], at: usize) -> usize {
    chars[..at]
        .iter()
        .rev()
        .take_while(|c| !BREAK_CHARS.contains(c))
        .count()
}
