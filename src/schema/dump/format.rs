//! Formatting utilities for schema dumps.
//!
//! Provides string quoting and an indentation-aware line writer.

/// Escape a string for a double-quoted literal in builder syntax.
#[must_use]
pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            c => result.push(c),
        }
    }
    result
}

/// Quote a string literal with double quotes.
#[must_use]
pub fn quote_string(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// A writer that manages indentation, two spaces per level.
#[derive(Debug)]
pub struct IndentWriter {
    buffer: String,
    current_indent: usize,
    at_line_start: bool,
}

impl IndentWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            current_indent: 0,
            at_line_start: true,
        }
    }

    pub fn indent(&mut self) {
        self.current_indent += 1;
    }

    pub fn dedent(&mut self) {
        self.current_indent = self.current_indent.saturating_sub(1);
    }

    fn write_indent_if_needed(&mut self) {
        if self.at_line_start && self.current_indent > 0 {
            for _ in 0..self.current_indent {
                self.buffer.push_str("  ");
            }
        }
        self.at_line_start = false;
    }

    /// Write a complete line (with newline at end).
    pub fn write_line(&mut self, s: &str) {
        self.write_indent_if_needed();
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    pub fn blank_line(&mut self) {
        self.buffer.push('\n');
        self.at_line_start = true;
    }

    /// Start a new block, separated from the previous one by a blank line.
    pub fn begin_block(&mut self) {
        if !self.buffer.is_empty() {
            self.blank_line();
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Default for IndentWriter {
    fn default() -> Self {
        Self::new()
    }
}
