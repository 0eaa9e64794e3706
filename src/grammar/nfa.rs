//! LR(0) item NFA construction (§4.3).

use super::production::Production;
use super::symbol::{Nonterminal, Sym};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct NfaState {
    pub id: usize,
    /// The single non-epsilon transition out of this state, if any (item
    /// states have at most one "next symbol").
    pub transition: Option<(Sym, usize)>,
    pub epsilon: Vec<usize>,
    /// `Some(production_id)` iff this state is the accepting state of that
    /// production (the item `A -> alpha .`).
    pub accepting: Option<usize>,
}

pub struct Nfa {
    pub states: Vec<NfaState>,
    pub start_state: usize,
}

impl Nfa {
    /// Builds the item NFA for `productions` (already ordered by id, with
    /// production 0 being `Start -> Exp`).
    pub fn build(productions: &[Production]) -> Self {
        let mut states = Vec::new();
        let mut first_states: HashMap<Nonterminal, Vec<usize>> = HashMap::new();
        let mut production_first_state = Vec::with_capacity(productions.len());

        for production in productions {
            let base = states.len();
            production_first_state.push(base);
            first_states.entry(production.target).or_default().push(base);

            let k = production.expansion.len();
            for i in 0..k {
                states.push(NfaState {
                    id: base + i,
                    transition: Some((production.expansion[i], base + i + 1)),
                    epsilon: Vec::new(),
                    accepting: None,
                });
            }
            states.push(NfaState {
                id: base + k,
                transition: None,
                epsilon: Vec::new(),
                accepting: Some(production.id),
            });
        }

        for state in &mut states {
            if let Some((Sym::N(target), _)) = state.transition {
                if let Some(targets) = first_states.get(&target) {
                    state.epsilon.extend(targets.iter().copied());
                }
            }
        }

        let start_state = production_first_state[0];
        Self { states, start_state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::rules::unit_expression_grammar;

    #[test]
    fn start_state_has_no_accepting_states_reachable_without_input() {
        let productions = unit_expression_grammar();
        let nfa = Nfa::build(&productions);
        assert_eq!(nfa.states[nfa.start_state].accepting, None);
    }

    #[test]
    fn every_production_has_exactly_one_accepting_state() {
        let productions = unit_expression_grammar();
        let nfa = Nfa::build(&productions);
        for production in &productions {
            let count = nfa
                .states
                .iter()
                .filter(|s| s.accepting == Some(production.id))
                .count();
            assert_eq!(count, 1);
        }
    }
}
