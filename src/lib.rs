//! A parser generator and dimensional-analysis evaluator for arithmetic
//! expressions over physical quantities.
//!
//! At construction, an [`Expression`] builds an SLR(1) shift/reduce parsing
//! automaton from a fixed grammar (nullable/FIRST/FOLLOW fixpoints, an
//! LR(0) item NFA, a subset-construction DFA, and a conflict-resolved
//! action table) and a unit catalog from a JSON configuration document.
//! Thereafter, `parse` and `in_units_of` are pure functions of that frozen
//! state.
//!
//! ```ignore
//! use unit_expr::Expression;
//!
//! let expr = Expression::new_default();
//! let reference = expr.parse("nm")?.add(&expr.parse("5 Angstrom")?)?;
//! let sample = expr.parse("200 sqrt(nN/EPa)")?;
//! let ratio = expr.in_units_of(&sample, &reference)?;
//! # Ok::<(), unit_expr::ExprError>(())
//! ```
//!
//! A caller who wants a single process-wide instance can put one behind
//! `once_cell::sync::OnceCell` or similar; nothing in this crate requires
//! or assumes a singleton.

mod driver;
mod error;
mod grammar;
mod lexer;
mod position;
mod rational;
mod units;

mod expression;

pub use error::{ConfigError, ExprError, LexError, SyntaxError, UnitError};
pub use expression::Expression;
pub use lexer::TokenKind;
pub use rational::Rational;
pub use units::catalog::{BaseUnit, Prefix, UnitCatalog};
pub use units::functions::FunctionEntry;
pub use units::value::DimensionedValue;
