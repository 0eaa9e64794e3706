//! Nullable/FIRST/FOLLOW fixpoint computation over the grammar (§4.2).

use super::production::{EvalContext, Payload, Production};
use super::symbol::{Nonterminal, Sym};
use crate::error::UnitError;
use crate::lexer::TokenKind;
use std::collections::{HashMap, HashSet};

pub struct GrammarAnalysis {
    pub nullable: HashMap<Nonterminal, bool>,
    pub first: HashMap<Nonterminal, HashSet<TokenKind>>,
    pub follow: HashMap<Nonterminal, HashSet<TokenKind>>,
}

fn never_called(_ctx: &EvalContext, _stack: Vec<Payload>) -> Result<Payload, UnitError> {
    unreachable!("the augmented start production is only used for FOLLOW analysis")
}

impl GrammarAnalysis {
    /// `productions` must not include the augmented `START' -> START eof`
    /// rule; this function adds it internally for the FOLLOW pass only
    /// (§4.2, §3 "Invariants").
    pub fn compute(productions: &[Production]) -> Self {
        let mut nullable: HashMap<Nonterminal, bool> =
            Nonterminal::ALL.iter().map(|&n| (n, false)).collect();
        loop {
            let mut changed = false;
            for p in productions {
                if nullable[&p.target] {
                    continue;
                }
                let all_nullable = p.expansion.iter().all(|s| match s {
                    Sym::N(n) => nullable[n],
                    Sym::T(_) => false,
                });
                if all_nullable {
                    nullable.insert(p.target, true);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let mut first: HashMap<Nonterminal, HashSet<TokenKind>> =
            Nonterminal::ALL.iter().map(|&n| (n, HashSet::new())).collect();
        loop {
            let mut changed = false;
            for p in productions {
                let seq_first = first_of_sequence(&p.expansion, &nullable, &first);
                let entry = first.get_mut(&p.target).expect("all nonterminals seeded");
                let before = entry.len();
                entry.extend(seq_first);
                if entry.len() != before {
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let augmented = Production::new(
            productions.len(),
            Nonterminal::StartPrime,
            vec![Sym::N(Nonterminal::Start), Sym::T(TokenKind::Eof)],
            never_called,
        );
        let mut extended: Vec<&Production> = productions.iter().collect();
        extended.push(&augmented);

        let mut follow: HashMap<Nonterminal, HashSet<TokenKind>> =
            Nonterminal::ALL.iter().map(|&n| (n, HashSet::new())).collect();
        loop {
            let mut changed = false;
            for p in &extended {
                for i in 0..p.expansion.len() {
                    let Sym::N(x) = p.expansion[i] else { continue };
                    let beta = &p.expansion[i + 1..];
                    let mut additions = first_of_sequence(beta, &nullable, &first);
                    let beta_nullable = beta.iter().all(|s| match s {
                        Sym::N(n) => nullable[n],
                        Sym::T(_) => false,
                    });
                    if beta_nullable && p.target != x {
                        if let Some(set) = follow.get(&p.target) {
                            additions.extend(set.iter().copied());
                        }
                    }
                    let entry = follow.get_mut(&x).expect("all nonterminals seeded");
                    let before = entry.len();
                    entry.extend(additions);
                    if entry.len() != before {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        Self { nullable, first, follow }
    }
}

/// FIRST of a symbol sequence: union of FIRST of each member up to (and
/// including) the first non-nullable member (§4.2 rule 2).
fn first_of_sequence(
    seq: &[Sym],
    nullable: &HashMap<Nonterminal, bool>,
    first: &HashMap<Nonterminal, HashSet<TokenKind>>,
) -> HashSet<TokenKind> {
    let mut result = HashSet::new();
    for sym in seq {
        match sym {
            Sym::T(t) => {
                result.insert(*t);
                return result;
            }
            Sym::N(n) => {
                result.extend(first[n].iter().copied());
                if !nullable[n] {
                    return result;
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::rules::unit_expression_grammar;

    #[test]
    fn follow_of_start_includes_eof() {
        let productions = unit_expression_grammar();
        let analysis = GrammarAnalysis::compute(&productions);
        assert!(analysis.follow[&Nonterminal::Start].contains(&TokenKind::Eof));
    }

    #[test]
    fn no_nonterminal_in_this_grammar_is_nullable() {
        let productions = unit_expression_grammar();
        let analysis = GrammarAnalysis::compute(&productions);
        assert!(analysis.nullable.values().all(|&n| !n));
    }

    #[test]
    fn first_of_exp4_includes_num_and_id_and_open_and_func() {
        let productions = unit_expression_grammar();
        let analysis = GrammarAnalysis::compute(&productions);
        let first_exp4 = &analysis.first[&Nonterminal::Exp4];
        assert!(first_exp4.contains(&TokenKind::Num));
        assert!(first_exp4.contains(&TokenKind::Id));
        assert!(first_exp4.contains(&TokenKind::Open));
        assert!(first_exp4.contains(&TokenKind::Func));
    }
}
