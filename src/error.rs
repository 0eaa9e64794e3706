//! Error kinds for each of the distinct failure families named in §7 of
//! the specification. Kept as plain hand-rolled `Display` impls, in the
//! style of the teacher library's `ParseError`/`ImplementationError`
//! (`error.rs`), rather than pulled in through a derive-macro error crate.

use crate::lexer::TokenKind;
use crate::position::{caret, Position};
use std::fmt::{self, Display, Formatter};

/// No pattern matched at a given position during tokenization.
#[derive(Debug, Clone)]
pub struct LexError {
    input: String,
    pub position: usize,
}

impl LexError {
    pub fn new(input: String, position: usize) -> Self {
        Self { input, position }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lexer error at {}:", Position::locate(&self.input, self.position))?;
        write!(f, "{}", caret(&self.input, self.position))
    }
}

impl std::error::Error for LexError {}

/// The action table had no entry for the state/lookahead pair (§4.6).
#[derive(Debug, Clone)]
pub struct SyntaxError {
    input: String,
    pub position: usize,
    pub found: Option<TokenKind>,
}

impl SyntaxError {
    pub fn new(input: String, position: usize, found: Option<TokenKind>) -> Self {
        Self { input, position, found }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Syntax error at {}:", Position::locate(&self.input, self.position))?;
        write!(f, "{}", caret(&self.input, self.position))
    }
}

impl std::error::Error for SyntaxError {}

/// Failures in dimensional arithmetic and unit resolution (§7).
#[derive(Debug, Clone)]
pub enum UnitError {
    DimensionMismatch(String),
    UnknownUnit(String),
    AmbiguousUnit {
        name: String,
        candidates: Vec<Vec<String>>,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
    ConfigConflict {
        key: String,
        existing: String,
        new: String,
    },
}

impl Display for UnitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            UnitError::DimensionMismatch(msg) => write!(f, "{}", msg),
            UnitError::UnknownUnit(name) => write!(f, "Unknown unit: {}", name),
            UnitError::AmbiguousUnit { name, candidates } => {
                let rendered: Vec<String> = candidates.iter().map(|c| c.join(" ")).collect();
                write!(f, "Ambiguous unit: {}: ({})", name, rendered.join(") or ("))
            }
            UnitError::ArityMismatch { name, expected, found } => write!(
                f,
                "Wrong number of arguments for function {}: expected {}, found {}",
                name, expected, found
            ),
            UnitError::ConfigConflict { key, existing, new } => write!(
                f,
                "Conflict between units: '{}' is used by both {} and {}",
                key, existing, new
            ),
        }
    }
}

impl std::error::Error for UnitError {}

/// Errors raised while reading and resolving the JSON configuration.
#[derive(Debug, Clone)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Top-level error returned by [`crate::Expression`].
#[derive(Debug, Clone)]
pub enum ExprError {
    Lex(LexError),
    Syntax(SyntaxError),
    Unit(UnitError),
    Config(ConfigError),
}

impl Display for ExprError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprError::Lex(e) => write!(f, "{}", e),
            ExprError::Syntax(e) => write!(f, "{}", e),
            ExprError::Unit(e) => write!(f, "{}", e),
            ExprError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ExprError {}

impl From<LexError> for ExprError {
    fn from(e: LexError) -> Self {
        ExprError::Lex(e)
    }
}

impl From<SyntaxError> for ExprError {
    fn from(e: SyntaxError) -> Self {
        ExprError::Syntax(e)
    }
}

impl From<UnitError> for ExprError {
    fn from(e: UnitError) -> Self {
        ExprError::Unit(e)
    }
}

impl From<ConfigError> for ExprError {
    fn from(e: ConfigError) -> Self {
        ExprError::Config(e)
    }
}
