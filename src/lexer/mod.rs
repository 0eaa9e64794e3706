//! Longest-match tokenizer over a fixed, ordered set of compiled patterns.
//!
//! Mirrors the lexeme utilities of the teacher library's tokenizer
//! ([`crate`]'s heritage is `lang_pt`'s `Pattern`/`Tokenizer` pair): each
//! token type owns a compiled [`regex::Regex`] anchored implicitly by
//! requiring the match to start at the probed offset, and the tokenizer
//! tries every pattern at each position and keeps the longest match,
//! with later-declared patterns winning ties.

mod token;

pub use token::{Token, TokenKind, TokenValue};

use crate::error::LexError;
use regex::Regex;

/// A value-extractor applied to the matched text of a token.
type Extractor = fn(&str) -> TokenValue;

/// A single terminal pattern: a token kind, its regular expression (absent
/// only for the synthetic `eof` token, which the lexer never matches
/// directly), a value extractor, and whether matches are discarded.
pub struct TokenSpec {
    pub kind: TokenKind,
    pattern: Option<Regex>,
    extractor: Extractor,
    pub ignore: bool,
}

impl TokenSpec {
    pub fn new(kind: TokenKind, pattern: &str, extractor: Extractor) -> Result<Self, String> {
        let regex = Regex::new(pattern)
            .map_err(|e| format!("pattern for token {:?} is not a valid regex: {}", kind, e))?;
        Ok(Self {
            kind,
            pattern: Some(regex),
            extractor,
            ignore: false,
        })
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

fn no_value(_: &str) -> TokenValue {
    TokenValue::None
}

fn number_value(s: &str) -> TokenValue {
    TokenValue::Number(s.parse().expect("num pattern only matches valid floats"))
}

fn ident_value(s: &str) -> TokenValue {
    TokenValue::Ident(s.to_string())
}

fn add_flag(s: &str) -> TokenValue {
    TokenValue::Flag(s == "+")
}

fn mul_flag(s: &str) -> TokenValue {
    TokenValue::Flag(s == "*")
}

/// The lexer for the unit-expression grammar (§6 of the specification):
/// `num`, `id`, `open`, `close`, `add`, `mul`, `pow`, `comma`, `func`
/// (rewritten whenever the function registry changes), and whitespace.
pub struct Lexer {
    specs: Vec<TokenSpec>,
    func_index: usize,
}

impl Lexer {
    pub fn new() -> Self {
        let specs = vec![
            TokenSpec::new(
                TokenKind::Num,
                r"^(?:[1-9][0-9]*|0)(?:\.[0-9]*)?(?:[eE][+-]?[1-9][0-9]*)?|^\.[0-9]+(?:[eE][+-]?[1-9][0-9]*)?",
                number_value,
            )
            .unwrap(),
            TokenSpec::new(TokenKind::Id, r"^[a-zA-Z][a-zA-Z0-9]*", ident_value).unwrap(),
            TokenSpec::new(TokenKind::Open, r"^\(", no_value).unwrap(),
            TokenSpec::new(TokenKind::Close, r"^\)", no_value).unwrap(),
            TokenSpec::new(TokenKind::Add, r"^\+|^-", add_flag).unwrap(),
            TokenSpec::new(TokenKind::Mul, r"^\*|^/", mul_flag).unwrap(),
            TokenSpec::new(TokenKind::Pow, r"^\*\*|^\^", no_value).unwrap(),
            TokenSpec::new(TokenKind::Comma, r"^,", no_value).unwrap(),
            // `func` has no real pattern until a function is registered; a
            // pattern that can never match holds its slot so ordering (and
            // hence the longest-match tie rule) is stable.
            TokenSpec::new(TokenKind::Func, r"^(?!)", ident_value).unwrap(),
            TokenSpec::new(TokenKind::Space, r"^[ \t]+", no_value).unwrap().ignored(),
        ];
        let func_index = specs
            .iter()
            .position(|s| s.kind == TokenKind::Func)
            .expect("func token must be declared");
        Self { specs, func_index }
    }

    /// Rewrite the `func` pattern in place so the slot (and therefore the
    /// longest-match tie order) is preserved. Names are alternated
    /// longest-first so a longer function name wins over a shorter prefix.
    pub fn set_function_names(&mut self, names: &[String]) {
        let mut sorted: Vec<&String> = names.iter().collect();
        sorted.sort_by_key(|n| std::cmp::Reverse(n.len()));
        let pattern = if sorted.is_empty() {
            r"^(?!)".to_string()
        } else {
            let alternation = sorted
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|");
            format!("^(?:{})", alternation)
        };
        self.specs[self.func_index].pattern =
            Some(Regex::new(&pattern).expect("function name alternation is always valid regex"));
    }

    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut pos = 0usize;
        let len = input.len();

        while pos < len {
            let mut best: Option<(usize, &TokenSpec)> = None;
            for spec in &self.specs {
                let Some(pattern) = &spec.pattern else {
                    continue;
                };
                if let Some(m) = pattern.find(&input[pos..]) {
                    if m.start() == 0 && m.end() > 0 {
                        let length = m.end();
                        if best.map_or(true, |(best_len, _)| length >= best_len) {
                            best = Some((length, spec));
                        }
                    }
                }
            }

            match best {
                Some((length, spec)) => {
                    let end = pos + length;
                    if !spec.ignore {
                        let text = &input[pos..end];
                        tokens.push(Token {
                            kind: spec.kind,
                            start: pos,
                            end,
                            value: (spec.extractor)(text),
                        });
                    }
                    pos = end;
                }
                None => return Err(LexError::new(input.to_string(), pos)),
            }
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            start: len,
            end: len,
            value: TokenValue::None,
        });
        Ok(tokens)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_simple_expression() {
        let lexer = Lexer::new();
        let tokens = lexer.tokenize("2 * 3 m").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Num,
                TokenKind::Mul,
                TokenKind::Num,
                TokenKind::Id,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn whitespace_is_ignored() {
        let lexer = Lexer::new();
        let tokens = lexer.tokenize("  5  ").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Num);
    }

    #[test]
    fn unmatched_input_is_a_lex_error() {
        let lexer = Lexer::new();
        assert!(lexer.tokenize("5 @ 3").is_err());
    }

    #[test]
    fn longest_match_wins_and_later_pattern_breaks_ties() {
        let mut lexer = Lexer::new();
        lexer.set_function_names(&["s".to_string(), "sqrt".to_string(), "sq".to_string()]);
        let tokens = lexer.tokenize("sqrt(4)").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Func);
        assert_eq!(tokens[0].end - tokens[0].start, 4);
    }

    #[test]
    fn double_pow_operator_is_a_syntax_level_concern_not_lexical() {
        let lexer = Lexer::new();
        let tokens = lexer.tokenize("2^^3").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Num,
                TokenKind::Pow,
                TokenKind::Pow,
                TokenKind::Num,
                TokenKind::Eof,
            ]
        );
    }
}
