//! The shift/reduce stack machine that drives a built parser over a token
//! stream (§4.6).

use crate::error::{ExprError, SyntaxError};
use crate::grammar::{Action, ActionTable, EvalContext, Payload, Production, Sym};
use crate::lexer::{Token, TokenValue};

pub struct Parser {
    pub productions: Vec<Production>,
    pub table: ActionTable,
}

impl Parser {
    pub fn new(productions: Vec<Production>, table: ActionTable) -> Self {
        Self { productions, table }
    }

    /// Drives `tokens` (as produced by [`crate::lexer::Lexer::tokenize`])
    /// through the action table, applying each production's semantic
    /// action on reduce. `input` is kept only to annotate a syntax error
    /// with a caret.
    pub fn parse(
        &self,
        input: &str,
        tokens: &[Token],
        ctx: &EvalContext,
    ) -> Result<Payload, ExprError> {
        let mut stack: Vec<(Payload, usize)> = vec![(Payload::None, 0)];
        let mut lookahead = 0usize;

        loop {
            let current_state = stack.last().expect("stack is never empty").1;
            let token = &tokens[lookahead];
            let action = self.table.rows[current_state].get(&Sym::T(token.kind)).copied();

            match action {
                Some(Action::Shift(target)) => {
                    stack.push((payload_of(token), target));
                    lookahead += 1;
                }
                Some(Action::Reduce(production_id)) => {
                    let production = &self.productions[production_id];
                    let k = production.expansion.len();
                    let mut popped = Vec::with_capacity(k);
                    for _ in 0..k {
                        popped.push(stack.pop().expect("reduce pops fewer frames than pushed").0);
                    }
                    popped.reverse();
                    let args: Vec<Payload> = popped.into_iter().filter(|p| !p.is_none()).collect();

                    let new_payload = (production.reduce)(ctx, args)?;

                    let resume_state = stack.last().expect("sentinel frame always remains").1;
                    let goto = self.table.rows[resume_state]
                        .get(&Sym::N(production.target))
                        .copied();
                    match goto {
                        Some(Action::Goto(target)) => stack.push((new_payload, target)),
                        _ => unreachable!("a reduced production always has a goto from its origin state"),
                    }
                }
                Some(Action::Accept) => {
                    return Ok(stack.into_iter().nth(1).expect("accept implies one reduced frame").0);
                }
                Some(Action::Goto(_)) | None => {
                    return Err(SyntaxError::new(input.to_string(), token.start, Some(token.kind)).into());
                }
            }
        }
    }
}

fn payload_of(token: &Token) -> Payload {
    match &token.value {
        TokenValue::Number(n) => Payload::Number(*n),
        TokenValue::Ident(s) => Payload::Ident(s.clone()),
        TokenValue::Flag(b) => Payload::Flag(*b),
        TokenValue::None => Payload::None,
    }
}
