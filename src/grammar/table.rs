//! The SLR(1) action table and its conflict-resolution policy (§4.5).

use super::dfa::Dfa;
use super::nfa::Nfa;
use super::production::Production;
use super::symbol::{Nonterminal, Sym};
use crate::lexer::TokenKind;
use log::warn;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Goto(usize),
    Reduce(usize),
    Accept,
}

pub struct ActionTable {
    pub rows: Vec<HashMap<Sym, Action>>,
}

impl ActionTable {
    pub fn build(
        nfa: &Nfa,
        dfa: &Dfa,
        productions: &[Production],
        follow: &HashMap<Nonterminal, std::collections::HashSet<TokenKind>>,
    ) -> Self {
        let mut rows: Vec<HashMap<Sym, Action>> = Vec::with_capacity(dfa.states.len());

        for state in &dfa.states {
            let mut row = HashMap::new();
            for (&sym, &target) in &state.transitions {
                let action = match sym {
                    Sym::T(_) => Action::Shift(target),
                    Sym::N(_) => Action::Goto(target),
                };
                row.insert(sym, action);
            }
            rows.push(row);
        }

        for state in &dfa.states {
            for &production_id in &state.accepting {
                let production = &productions[production_id];
                let action = if production_id == 0 {
                    Action::Accept
                } else {
                    Action::Reduce(production_id)
                };
                let Some(follow_set) = follow.get(&production.target) else {
                    continue;
                };
                for &terminal in follow_set {
                    let cell = Sym::T(terminal);
                    let row = &mut rows[state.id];
                    match row.get(&cell).copied() {
                        None => {
                            row.insert(cell, action);
                        }
                        Some(existing) => {
                            let priority_new = production.priority;
                            let priority_existing = existing_priority(nfa, state, terminal, existing, productions);
                            if priority_new == -1 || priority_existing == -1 {
                                warn!(
                                    "shift/reduce or reduce/reduce conflict at state {} on {:?}: existing {:?} (priority {}) vs new {:?} (priority {})",
                                    state.id, terminal, existing, priority_existing, action, priority_new
                                );
                            }
                            if priority_new >= priority_existing {
                                row.insert(cell, action);
                            }
                        }
                    }
                }
            }
        }

        Self { rows }
    }
}

/// Recovers the priority of the production(s) reachable from `state` by
/// shifting `terminal`, by walking each matching NFA item's single-successor
/// chain to the accepting state it leads to (§4.5).
fn existing_priority(
    nfa: &Nfa,
    state: &super::dfa::DfaState,
    terminal: TokenKind,
    existing: Action,
    productions: &[Production],
) -> i32 {
    match existing {
        Action::Reduce(p) => productions[p].priority,
        Action::Accept => productions[0].priority,
        Action::Shift(_) => {
            let mut best: i32 = -1;
            let mut found_any = false;
            for &nfa_id in &state.nfa_states {
                if let Some((Sym::T(t), target)) = nfa.states[nfa_id].transition {
                    if t == terminal {
                        if let Some(prod_id) = follow_chain_to_accept(nfa, target) {
                            found_any = true;
                            best = best.max(productions[prod_id].priority);
                        }
                    }
                }
            }
            if found_any {
                best
            } else {
                -1
            }
        }
        Action::Goto(_) => -1,
    }
}

fn follow_chain_to_accept(nfa: &Nfa, mut state_id: usize) -> Option<usize> {
    loop {
        let state = &nfa.states[state_id];
        if let Some(production_id) = state.accepting {
            return Some(production_id);
        }
        match state.transition {
            Some((_, next)) => state_id = next,
            None => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::analysis::GrammarAnalysis;
    use crate::grammar::rules::unit_expression_grammar;

    #[test]
    fn table_has_an_accept_action_reachable_from_start() {
        let productions = unit_expression_grammar();
        let analysis = GrammarAnalysis::compute(&productions);
        let nfa = Nfa::build(&productions);
        let dfa = Dfa::build(&nfa);
        let table = ActionTable::build(&nfa, &dfa, &productions, &analysis.follow);
        let has_accept = table.rows.iter().any(|row| row.values().any(|a| matches!(a, Action::Accept)));
        assert!(has_accept);
    }
}
