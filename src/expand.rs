//! Rewrites function groups, constants and `Ans` into plain numeric text
//! the parser understands.
//!
//! Function arguments are evaluated innermost first. `sqr`, `1/` and `pct`
//! are rewritten algebraically instead so the surrounding precedence is
//! untouched. Each rewrite embeds its operand once, so nesting grows the
//! text linearly.

use rug::Float;
use tracing::debug;

use crate::context::EvaluationContext;
use crate::equation::{extract_group, split_arguments};
use crate::error::{CalcError, Result};
use crate::eval::{check_finite, evaluate_expression, power};
use crate::number::Number;
use crate::token::{FunctionKind, Token};

/// Largest `n` accepted by `n!`.
const MAX_FACTORIAL: i64 = 10_000;

/// Trig results this many bits below their argument are rounding noise.
const NOISE_GUARD_BITS: u32 = 32;

/// Flattens `tokens` into parser input.
pub fn expand(tokens: &[Token], context: &EvaluationContext) -> Result<String> {
    let precision = context.precision();
    let mut out = String::new();
    let mut index = 0;

    while index < tokens.len() {
        match tokens[index] {
            Token::Digit(d) => out.push(d),
            Token::DecimalPoint => out.push('.'),
            Token::Exponent { negative } => out.push_str(if negative { "e-" } else { "e" }),
            Token::Operator(op) => out.push_str(op.flat()),
            Token::ParenOpen => out.push('('),
            Token::ParenClose => out.push(')'),
            Token::Comma => out.push(','),
            Token::Constant(c) => push_value(&mut out, &c.value(precision)),
            Token::AnswerRef => push_value(&mut out, &context.answer),
            Token::FunctionOpen(kind) => {
                let (group, next) = extract_group(tokens, index + 1)?;
                out.push_str(&expand_function(kind, group, context)?);
                index = next;
                continue;
            }
        }
        index += 1;
    }

    Ok(out)
}

/// Expands and evaluates a token run to a single value.
pub fn evaluate_tokens(tokens: &[Token], context: &EvaluationContext) -> Result<Number> {
    let flat = expand(tokens, context)?;
    evaluate_expression(&flat, context.precision())
}

/// Negative values are parenthesised so a following `^` or a preceding
/// operator cannot rebind the sign.
fn push_value(out: &mut String, value: &Number) {
    if value.is_negative() {
        out.push('(');
        out.push_str(&value.to_exact_string());
        out.push(')');
    } else {
        out.push_str(&value.to_exact_string());
    }
}

fn expand_function(
    kind: FunctionKind,
    group: &[Token],
    context: &EvaluationContext,
) -> Result<String> {
    match kind {
        FunctionKind::Square => Ok(format!("(({})^2)", expand(group, context)?)),
        FunctionKind::Reciprocal => Ok(format!("(1/({}))", expand(group, context)?)),
        FunctionKind::Percent => Ok(format!("(({})/100)", expand(group, context)?)),
        FunctionKind::XRoot => {
            let value = x_root(group, context)?;
            Ok(rendered(&value))
        }
        _ => {
            let argument = evaluate_tokens(group, context)?;
            let value = check_finite(apply(kind, &argument, context)?)?;
            debug!(function = kind.key(), result = %value.to_f64(), "applied");
            Ok(rendered(&value))
        }
    }
}

fn rendered(value: &Number) -> String {
    let mut out = String::new();
    push_value(&mut out, value);
    out
}

fn x_root(group: &[Token], context: &EvaluationContext) -> Result<Number> {
    let arguments = split_arguments(group);
    let [index, radicand] = arguments[..] else {
        return Err(CalcError::malformed("xroot takes an index and a radicand"));
    };
    let index = evaluate_tokens(index, context)?;
    let radicand = evaluate_tokens(radicand, context)?;
    if index.is_zero() {
        return Err(CalcError::domain("the 0th root is undefined"));
    }

    let whole = index.near_integer();
    if let Some(k) = whole.and_then(|n| u32::try_from(n.unsigned_abs()).ok()) {
        if radicand.is_negative() && k % 2 == 0 {
            return Err(CalcError::domain("even roots of negative numbers are undefined"));
        }
        let root = radicand.root(k);
        return match whole {
            Some(n) if n < 0 => power(&root, &Number::from_i32(root.prec(), -1))
                .ok_or(CalcError::DivisionByZero),
            _ => Ok(root),
        };
    }
    if radicand.is_negative() {
        return Err(CalcError::domain("roots of negative numbers need an odd whole index"));
    }
    let exponent = &Number::from_i32(index.prec(), 1) / &index;
    power(&radicand, &exponent).ok_or(CalcError::DivisionByZero)
}

fn apply(kind: FunctionKind, x: &Number, context: &EvaluationContext) -> Result<Number> {
    let unit = context.angle_unit;
    let precision = context.precision();
    let one = Number::from_i32(precision, 1);
    let minus_one = Number::from_i32(precision, -1);

    let value = match kind {
        FunctionKind::Sin => circular(x, context, Float::sin),
        FunctionKind::Cos => circular(x, context, Float::cos),
        FunctionKind::Tan => {
            let radians = unit.to_radians(x);
            if radians
                .map(Float::cos)
                .is_negligible_against(&radians, precision / 2)
            {
                return Err(CalcError::domain("tan is undefined at odd multiples of 90°"));
            }
            circular(x, context, Float::tan)
        }
        FunctionKind::Asin | FunctionKind::Acos => {
            if *x < minus_one || *x > one {
                return Err(CalcError::domain(format!(
                    "{} requires -1 ≤ x ≤ 1",
                    kind.key()
                )));
            }
            let f = if kind == FunctionKind::Asin { Float::asin } else { Float::acos };
            unit.from_radians(&x.map(f))
        }
        FunctionKind::Atan => unit.from_radians(&x.map(Float::atan)),
        FunctionKind::Sinh => x.map(Float::sinh),
        FunctionKind::Cosh => x.map(Float::cosh),
        FunctionKind::Tanh => x.map(Float::tanh),
        FunctionKind::Asinh => x.map(Float::asinh),
        FunctionKind::Acosh => {
            if *x < one {
                return Err(CalcError::domain("acosh requires x ≥ 1"));
            }
            x.map(Float::acosh)
        }
        FunctionKind::Atanh => {
            if *x <= minus_one || *x >= one {
                return Err(CalcError::domain("atanh requires -1 < x < 1"));
            }
            x.map(Float::atanh)
        }
        FunctionKind::Ln | FunctionKind::Log => {
            if x.is_negative() || x.is_zero() {
                return Err(CalcError::domain(format!("{} requires x > 0", kind.key())));
            }
            let f = if kind == FunctionKind::Ln { Float::ln } else { Float::log10 };
            x.map(f)
        }
        FunctionKind::Sqrt => {
            if x.is_negative() {
                return Err(CalcError::domain("sqrt requires x ≥ 0"));
            }
            x.map(Float::sqrt)
        }
        FunctionKind::Abs => x.abs(),
        FunctionKind::Exp => x.map(Float::exp),
        FunctionKind::Exp10 => x.map(Float::exp10),
        FunctionKind::Factorial => match x.near_integer() {
            Some(n) if (0..=MAX_FACTORIAL).contains(&n) => {
                let n = u32::try_from(n).map_err(|_| CalcError::Overflow)?;
                Number::factorial(precision, n)
            }
            _ => {
                return Err(CalcError::domain(format!(
                    "n! requires a whole number from 0 to {MAX_FACTORIAL}"
                )))
            }
        },
        FunctionKind::Square
        | FunctionKind::Reciprocal
        | FunctionKind::Percent
        | FunctionKind::XRoot => {
            return Err(CalcError::malformed(format!(
                "{} has no direct evaluation",
                kind.key()
            )))
        }
    };
    Ok(value)
}

/// Native trig call on the argument converted to radians, with results
/// that are pure rounding noise snapped to zero.
fn circular(x: &Number, context: &EvaluationContext, f: fn(Float) -> Float) -> Number {
    let radians = context.angle_unit.to_radians(x);
    let value = radians.map(f);
    let noise_bits = context.precision().saturating_sub(NOISE_GUARD_BITS);
    if !radians.is_zero() && value.is_negligible_against(&radians, noise_bits) {
        Number::zero(context.precision())
    } else {
        value
    }
}
