//! Named colors for terminal output.
//!
//! Output code asks for colors by role (`success`, `dots`, ...) rather than by
//! escape sequence. [`ColorRenderer`] resolves a key through a fixed palette
//! to a `colored` color and wraps the text in its escape code and a reset.
//! Unknown names degrade to plain text.

use std::str::FromStr;

use colored::Color;

/// SGR reset.
const RESET: &str = "\x1b[0m";

/// A named entry of the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorKey {
    // Plain colors
    Green,
    Red,
    Yellow,
    Cyan,
    BrightRed,
    Blue,
    Purple,
    Gray,
    White,
    Normal,
    // Semantic roles
    Success,
    Failed,
    Changed,
    Skipped,
    Unreachable,
    Info,
    Header,
    TaskName,
    Dots,
    Timing,
}

impl ColorKey {
    /// Map a semantic role onto the plain color it is drawn with.
    fn base(self) -> ColorKey {
        match self {
            ColorKey::Success => ColorKey::Green,
            ColorKey::Failed => ColorKey::Red,
            ColorKey::Changed => ColorKey::Yellow,
            ColorKey::Skipped => ColorKey::Cyan,
            ColorKey::Unreachable => ColorKey::BrightRed,
            ColorKey::Info => ColorKey::Blue,
            ColorKey::Header => ColorKey::Purple,
            ColorKey::TaskName => ColorKey::Normal,
            ColorKey::Dots | ColorKey::Timing => ColorKey::Gray,
            plain => plain,
        }
    }

    /// Terminal color and boldness, or `None` for the terminal default.
    fn style(self) -> Option<(Color, bool)> {
        match self.base() {
            ColorKey::Green => Some((Color::Green, false)),
            ColorKey::Red => Some((Color::Red, false)),
            ColorKey::Yellow => Some((Color::Yellow, false)),
            ColorKey::Cyan => Some((Color::Cyan, false)),
            ColorKey::BrightRed => Some((Color::Red, true)),
            ColorKey::Blue => Some((Color::Blue, false)),
            ColorKey::Purple => Some((Color::Magenta, true)),
            ColorKey::Gray => Some((Color::BrightBlack, false)),
            ColorKey::White => Some((Color::White, false)),
            _ => None,
        }
    }
}

impl FromStr for ColorKey {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name {
            "green" => ColorKey::Green,
            "red" => ColorKey::Red,
            "yellow" => ColorKey::Yellow,
            "cyan" => ColorKey::Cyan,
            "bright_red" => ColorKey::BrightRed,
            "blue" => ColorKey::Blue,
            "purple" => ColorKey::Purple,
            "gray" => ColorKey::Gray,
            "white" => ColorKey::White,
            "normal" => ColorKey::Normal,
            "success" => ColorKey::Success,
            "failed" => ColorKey::Failed,
            "changed" => ColorKey::Changed,
            "skipped" => ColorKey::Skipped,
            "unreachable" => ColorKey::Unreachable,
            "info" => ColorKey::Info,
            "header" => ColorKey::Header,
            "task_name" => ColorKey::TaskName,
            "dots" => ColorKey::Dots,
            "timing" => ColorKey::Timing,
            _ => return Err(()),
        };
        Ok(key)
    }
}

/// Wraps text in terminal colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorRenderer {
    enabled: bool,
}

impl ColorRenderer {
    /// Create a renderer; a disabled renderer returns text untouched.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Color `text` with the palette entry `key`.
    pub fn colorize(&self, text: &str, key: ColorKey) -> String {
        if !self.enabled {
            return text.to_string();
        }
        match key.style() {
            Some((color, bold)) => paint(text, color, bold),
            None => text.to_string(),
        }
    }

    /// Color `text` by palette name. Unknown names leave it unstyled.
    pub fn colorize_named(&self, text: &str, name: &str) -> String {
        match name.parse::<ColorKey>() {
            Ok(key) => self.colorize(text, key),
            Err(()) => text.to_string(),
        }
    }
}

impl Default for ColorRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Wrap `text` in an SGR sequence and a reset.
///
/// Escape codes are written whether or not stdout is a terminal; only the
/// renderer's own switch turns them off.
fn paint(text: &str, color: Color, bold: bool) -> String {
    let weight = if bold { "1;" } else { "" };
    format!("\x1b[{weight}{}m{text}{RESET}", color.to_fg_str())
}

/// Display width of `text`, ignoring escape sequences.
pub fn visible_width(text: &str) -> usize {
    console::measure_text_width(text)
}
