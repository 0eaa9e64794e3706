//! Line/column reporting for lex and syntax errors.

use std::fmt::{Display, Formatter};

/// The line and column at a byte offset into the original input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Locate `offset` within `text`, counting lines from 1.
    pub fn locate(text: &str, offset: usize) -> Self {
        let mut line = 1usize;
        let mut last_newline = None;
        for (i, b) in text.as_bytes().iter().enumerate().take(offset) {
            if *b == b'\n' {
                line += 1;
                last_newline = Some(i);
            }
        }
        let column = match last_newline {
            Some(i) => offset - i,
            None => offset + 1,
        };
        Position::new(line, column)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Render `text` with a caret under `offset`, the way the reference
/// implementation's lexer/parser errors do.
pub fn caret(text: &str, offset: usize) -> String {
    format!("{}\n{}^", text, " ".repeat(offset))
}
