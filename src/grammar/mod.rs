//! The parser generator: grammar analysis, the LR(0) item NFA, the
//! subset-construction DFA, and the resulting SLR(1) action table
//! (§2 components C-F).

pub mod analysis;
pub mod dfa;
pub mod nfa;
pub mod production;
pub mod rules;
pub mod symbol;
pub mod table;

pub use analysis::GrammarAnalysis;
pub use dfa::Dfa;
pub use nfa::Nfa;
pub use production::{EvalContext, Payload, Production, ReduceFn};
pub use symbol::{Nonterminal, Sym};
pub use table::{Action, ActionTable};

/// The frozen output of the parser-generator pipeline: productions plus the
/// action table built from them (§4.2-§4.5, wired together at
/// construction).
pub struct ParserTables {
    pub productions: Vec<Production>,
    pub table: ActionTable,
}

impl ParserTables {
    pub fn build(productions: Vec<Production>) -> Self {
        let analysis = GrammarAnalysis::compute(&productions);
        let nfa = Nfa::build(&productions);
        let dfa = Dfa::build(&nfa);
        let table = ActionTable::build(&nfa, &dfa, &productions, &analysis.follow);
        Self { productions, table }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::rules::unit_expression_grammar;

    #[test]
    fn tables_build_without_panicking() {
        let tables = ParserTables::build(unit_expression_grammar());
        assert!(!tables.table.rows.is_empty());
    }
}
