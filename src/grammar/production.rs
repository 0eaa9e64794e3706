//! Productions and the semantic-action payload they build (§3, §9).

use super::symbol::{Nonterminal, Sym};
use crate::error::UnitError;
use crate::units::catalog::UnitCatalog;
use crate::units::value::DimensionedValue;

/// The value carried on the parser's stack for both shifted tokens and
/// reduced nonterminals.
///
/// `None` is the payload of punctuation and other non-semantic terminals
/// (`(`, `)`, `,`) — the driver strips these before calling a production's
/// reduction function, so a rule's callable arity equals the number of
/// *payload-bearing* symbols in its expansion, not the expansion length
/// (§9 "Semantic action inputs").
#[derive(Debug, Clone)]
pub enum Payload {
    None,
    Flag(bool),
    Number(f64),
    Ident(String),
    Value(DimensionedValue),
    Args(Vec<DimensionedValue>),
}

impl Payload {
    pub fn is_none(&self) -> bool {
        matches!(self, Payload::None)
    }
}

/// Read-only context a reduction function needs to resolve unit names and
/// apply registered functions.
pub struct EvalContext<'a> {
    pub catalog: &'a UnitCatalog,
}

pub type ReduceFn = fn(&EvalContext, Vec<Payload>) -> Result<Payload, UnitError>;

/// A single grammar rule: `target -> expansion`, its reduction function,
/// and a conflict-resolution priority (defaulting to -1, meaning "not
/// priority-annotated" — see §4.5).
pub struct Production {
    pub id: usize,
    pub target: Nonterminal,
    pub expansion: Vec<Sym>,
    pub reduce: ReduceFn,
    pub priority: i32,
}

impl Production {
    pub fn new(id: usize, target: Nonterminal, expansion: Vec<Sym>, reduce: ReduceFn) -> Self {
        Self {
            id,
            target,
            expansion,
            reduce,
            priority: -1,
        }
    }
}
