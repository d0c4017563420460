//! Syntax highlighting and terminal colors for xsearch.
//!
//! TOML and JSON output goes through syntect; RSQL expressions are coloured from their own
//! tokens. The remaining helpers style headers and status messages.

#![warn(missing_docs)]

mod rsql;

pub use rsql::rsql;
use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::{SyntaxReference, SyntaxSet},
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions (two-face extras include TOML).
    syntax_set: SyntaxSet,
    /// Embedded colour themes.
    theme_set: EmbeddedLazyThemeSet,
    /// The theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights a configuration file.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights a JSON document such as a serialized search tree.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights content with the syntax matching `syntax_name` (extension or name).
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self.syntax(syntax_name);
        let mut lines = HighlightLines::new(syntax, self.theme_set.get(self.theme));

        let mut output = String::with_capacity(content.len() * 4);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(colors::RESET);
        output
    }

    /// Looks up a syntax by extension, then by name.
    fn syntax(&self, syntax_name: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text.
    pub const CYAN: &str = "\x1b[36m";
    /// Green text.
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text.
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps `text` in `codes` and a reset.
fn paint(codes: &str, text: &str) -> String {
    format!("{codes}{text}{}", colors::RESET)
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    paint(&format!("{}{}", colors::BOLD, colors::CYAN), text)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    paint(colors::BOLD, text)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    paint(colors::DIM, text)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    paint(colors::GREEN, text)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    paint(colors::YELLOW, text)
}

/// Formats text as an error (red).
pub fn error(text: &str) -> String {
    paint(colors::RED, text)
}
