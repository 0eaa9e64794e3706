//! The sixteen productions of the unit-expression grammar (§6) and their
//! semantic actions.

use super::production::{EvalContext, Payload, Production};
use super::symbol::{Nonterminal, Sym};
use crate::error::UnitError;
use crate::lexer::TokenKind;
use crate::units::value::DimensionedValue;

fn value(payload: Payload) -> DimensionedValue {
    match payload {
        Payload::Value(v) => v,
        other => panic!("grammar invariant violated: expected Value payload, found {:?}", other),
    }
}

fn flag(payload: &Payload) -> bool {
    match payload {
        Payload::Flag(b) => *b,
        other => panic!("grammar invariant violated: expected Flag payload, found {:?}", other),
    }
}

fn args(payload: Payload) -> Vec<DimensionedValue> {
    match payload {
        Payload::Args(v) => v,
        other => panic!("grammar invariant violated: expected Args payload, found {:?}", other),
    }
}

fn pass_through(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    Ok(stack.remove(0))
}

fn reduce_add(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let rhs = value(stack.pop().unwrap());
    let is_add = flag(&stack.pop().unwrap());
    let lhs = value(stack.pop().unwrap());
    let result = if is_add { lhs.add(&rhs)? } else { lhs.sub(&rhs)? };
    Ok(Payload::Value(result))
}

fn reduce_mul(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let rhs = value(stack.pop().unwrap());
    let is_mul = flag(&stack.pop().unwrap());
    let lhs = value(stack.pop().unwrap());
    let result = if is_mul { lhs.mul(&rhs)? } else { lhs.div(&rhs)? };
    Ok(Payload::Value(result))
}

fn reduce_juxtaposition(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let rhs = value(stack.pop().unwrap());
    let lhs = value(stack.pop().unwrap());
    Ok(Payload::Value(lhs.mul(&rhs)?))
}

fn reduce_unary(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let operand = value(stack.pop().unwrap());
    let is_plus = flag(&stack.pop().unwrap());
    let result = if is_plus { operand } else { operand.neg() };
    Ok(Payload::Value(result))
}

fn reduce_pow(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let exponent = value(stack.pop().unwrap());
    let base = value(stack.pop().unwrap());
    Ok(Payload::Value(base.pow(&exponent)?))
}

fn reduce_num(ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let n = match stack.pop().unwrap() {
        Payload::Number(n) => n,
        other => panic!("grammar invariant violated: expected Number payload, found {:?}", other),
    };
    Ok(Payload::Value(DimensionedValue::from_num(n, ctx.catalog.base_units.clone())))
}

fn reduce_id(ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let name = match stack.pop().unwrap() {
        Payload::Ident(s) => s,
        other => panic!("grammar invariant violated: expected Ident payload, found {:?}", other),
    };
    Ok(Payload::Value(ctx.catalog.resolve_unit(&name)?))
}

fn reduce_call(ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let call_args = args(stack.pop().unwrap());
    let name = match stack.remove(0) {
        Payload::Ident(s) => s,
        other => panic!("grammar invariant violated: expected Ident payload, found {:?}", other),
    };
    Ok(Payload::Value(ctx.catalog.apply_function(&name, call_args)?))
}

fn reduce_args_single(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let v = value(stack.pop().unwrap());
    Ok(Payload::Args(vec![v]))
}

fn reduce_args_append(_ctx: &EvalContext, mut stack: Vec<Payload>) -> Result<Payload, UnitError> {
    let v = value(stack.pop().unwrap());
    let mut list = args(stack.pop().unwrap());
    list.push(v);
    Ok(Payload::Args(list))
}

/// Builds the fixed, ordered production list for the unit-expression
/// grammar (§6). Production 0 is always `Start -> Exp`, matching the
/// accepting-rule convention used in §4.5 and §4.6.
pub fn unit_expression_grammar() -> Vec<Production> {
    use Nonterminal::*;
    use Sym::{N, T};
    use TokenKind as Tok;

    vec![
        Production::new(0, Start, vec![N(Exp)], pass_through),
        Production::new(1, Exp, vec![N(Exp1)], pass_through),
        Production::new(2, Exp, vec![N(Exp), T(Tok::Add), N(Exp1)], reduce_add),
        Production::new(3, Exp1, vec![N(Exp2)], pass_through),
        Production::new(4, Exp1, vec![N(Exp1), T(Tok::Mul), N(Exp2)], reduce_mul),
        Production::new(5, Exp1, vec![N(Exp1), N(Exp3)], reduce_juxtaposition),
        Production::new(6, Exp2, vec![N(Exp3)], pass_through),
        Production::new(7, Exp2, vec![T(Tok::Add), N(Exp3)], reduce_unary),
        Production::new(8, Exp3, vec![N(Exp4)], pass_through),
        Production::new(9, Exp3, vec![N(Exp4), T(Tok::Pow), N(Exp2)], reduce_pow),
        Production::new(10, Exp4, vec![T(Tok::Num)], reduce_num),
        Production::new(11, Exp4, vec![T(Tok::Id)], reduce_id),
        Production::new(12, Exp4, vec![T(Tok::Open), N(Exp), T(Tok::Close)], pass_through),
        Production::new(
            13,
            Exp4,
            vec![T(Tok::Func), T(Tok::Open), N(Args), T(Tok::Close)],
            reduce_call,
        ),
        Production::new(14, Args, vec![N(Exp)], reduce_args_single),
        Production::new(15, Args, vec![N(Args), T(Tok::Comma), N(Exp)], reduce_args_append),
    ]
}
