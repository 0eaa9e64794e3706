//! Subset construction over the item NFA (§4.4).

use super::nfa::Nfa;
use super::symbol::Sym;
use std::collections::{BTreeSet, HashMap, VecDeque};

pub type ItemSet = BTreeSet<usize>;

#[derive(Debug)]
pub struct DfaState {
    pub id: usize,
    pub nfa_states: ItemSet,
    pub transitions: HashMap<Sym, usize>,
    pub accepting: BTreeSet<usize>,
}

pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start_state: usize,
}

impl Dfa {
    pub fn build(nfa: &Nfa) -> Self {
        let start_set = closure(nfa, &ItemSet::from([nfa.start_state]));

        let mut states: Vec<DfaState> = Vec::new();
        let mut index: HashMap<ItemSet, usize> = HashMap::new();
        let mut queue: VecDeque<ItemSet> = VecDeque::new();

        let start_id = 0;
        index.insert(start_set.clone(), start_id);
        states.push(DfaState {
            id: start_id,
            nfa_states: start_set.clone(),
            transitions: HashMap::new(),
            accepting: accepting_of(nfa, &start_set),
        });
        queue.push_back(start_set);

        // Maps each DFA state's pending (item-set-valued) transitions until
        // the inverse lookup pass below rewrites them to state ids.
        let mut pending_transitions: HashMap<usize, HashMap<Sym, ItemSet>> = HashMap::new();

        while let Some(current) = queue.pop_front() {
            let current_id = *index.get(&current).expect("enqueued set is indexed");
            let mut grouped: HashMap<Sym, ItemSet> = HashMap::new();
            for &nfa_id in &current {
                if let Some((sym, target)) = nfa.states[nfa_id].transition {
                    grouped.entry(sym).or_default().insert(target);
                }
            }

            let mut resolved: HashMap<Sym, ItemSet> = HashMap::new();
            for (sym, targets) in grouped {
                let target_set = closure(nfa, &targets);
                if !index.contains_key(&target_set) {
                    let new_id = states.len();
                    index.insert(target_set.clone(), new_id);
                    states.push(DfaState {
                        id: new_id,
                        nfa_states: target_set.clone(),
                        transitions: HashMap::new(),
                        accepting: accepting_of(nfa, &target_set),
                    });
                    queue.push_back(target_set.clone());
                }
                resolved.insert(sym, target_set);
            }
            pending_transitions.insert(current_id, resolved);
        }

        for (state_id, transitions) in pending_transitions {
            let mut rewritten = HashMap::new();
            for (sym, target_set) in transitions {
                let target_id = *index.get(&target_set).expect("target set was indexed");
                rewritten.insert(sym, target_id);
            }
            states[state_id].transitions = rewritten;
        }

        Self { states, start_state: start_id }
    }
}

fn closure(nfa: &Nfa, seed: &ItemSet) -> ItemSet {
    let mut set: ItemSet = seed.clone();
    let mut stack: Vec<usize> = seed.iter().copied().collect();
    while let Some(state_id) = stack.pop() {
        for &target in &nfa.states[state_id].epsilon {
            if set.insert(target) {
                stack.push(target);
            }
        }
    }
    set
}

fn accepting_of(nfa: &Nfa, item_set: &ItemSet) -> BTreeSet<usize> {
    item_set
        .iter()
        .filter_map(|&id| nfa.states[id].accepting)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::rules::unit_expression_grammar;

    #[test]
    fn start_state_is_deterministic_across_builds() {
        let productions = unit_expression_grammar();
        let nfa = Nfa::build(&productions);
        let dfa = Dfa::build(&nfa);
        assert!(!dfa.states.is_empty());
        assert_eq!(dfa.start_state, 0);
    }

    #[test]
    fn every_transition_points_at_a_real_state() {
        let productions = unit_expression_grammar();
        let nfa = Nfa::build(&productions);
        let dfa = Dfa::build(&nfa);
        for state in &dfa.states {
            for &target in state.transitions.values() {
                assert!(target < dfa.states.len());
            }
        }
    }
}
