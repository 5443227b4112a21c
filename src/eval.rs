//! Stack evaluation of postfix sequences.

use tracing::{debug, trace};

use crate::error::{CalcError, Result};
use crate::number::{reduced_precision, Number};
use crate::parser::{to_postfix, tokenize, Postfix};
use crate::token::Operator;

#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub value: Number,
    /// A `/` or `mod` met a zero divisor somewhere; `value` is not trustworthy.
    pub division_by_zero: bool,
}

pub fn evaluate(postfix: &[Postfix]) -> Result<Evaluation> {
    let mut stack: Vec<Number> = Vec::new();
    let mut division_by_zero = false;

    for item in postfix {
        match item {
            Postfix::Value(value) => stack.push(value.clone()),
            Postfix::Operator(Operator::UnaryMinus) => {
                let operand = stack
                    .pop()
                    .ok_or_else(|| CalcError::malformed("missing operand for negation"))?;
                stack.push(-&operand);
            }
            Postfix::Operator(op) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(CalcError::malformed(format!(
                        "missing operand for '{}'",
                        op.flat().trim()
                    )));
                };
                let result = apply_binary(*op, &a, &b, &mut division_by_zero)?;
                trace!(%a, %b, ?op, %result, "applied");
                stack.push(result);
            }
        }
    }

    let value = stack
        .pop()
        .ok_or_else(|| CalcError::malformed("empty expression"))?;
    if !stack.is_empty() {
        return Err(CalcError::malformed("missing operator"));
    }
    Ok(Evaluation {
        value,
        division_by_zero,
    })
}

fn apply_binary(
    op: Operator,
    a: &Number,
    b: &Number,
    division_by_zero: &mut bool,
) -> Result<Number> {
    let value = match op {
        Operator::Add => a + b,
        Operator::Sub => a - b,
        Operator::Mul => a * b,
        Operator::Div | Operator::Mod if b.is_zero() => {
            *division_by_zero = true;
            Number::zero(a.prec())
        }
        Operator::Div => a / b,
        Operator::Mod => a.rem(b),
        Operator::Pow => power(a, b).unwrap_or_else(|| {
            *division_by_zero = true;
            Number::zero(a.prec())
        }),
        Operator::UnaryMinus => {
            return Err(CalcError::malformed("negation takes a single operand"));
        }
    };
    Ok(value)
}

/// Exponents within tolerance of a whole number go through exact repeated
/// squaring; anything else takes the machine-float path. `None` for zero
/// raised to a negative power.
pub fn power(base: &Number, exponent: &Number) -> Option<Number> {
    match exponent.near_integer() {
        Some(n) => base.powi(n),
        None => Some(reduced_precision::pow(base, exponent)),
    }
}

/// Rejects results that are not finite real numbers.
pub fn check_finite(value: Number) -> Result<Number> {
    if value.is_nan() {
        Err(CalcError::domain("the result is not a real number"))
    } else if !value.is_finite() {
        Err(CalcError::Overflow)
    } else {
        Ok(value)
    }
}

/// Tokenize, convert and evaluate a flattened expression.
pub fn evaluate_expression(expression: &str, precision: u32) -> Result<Number> {
    debug!(expression = %expression.chars().take(120).collect::<String>(), "evaluating");
    let postfix = to_postfix(tokenize(expression, precision)?)?;
    let evaluation = evaluate(&postfix)?;
    if evaluation.division_by_zero {
        return Err(CalcError::DivisionByZero);
    }
    check_finite(evaluation.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: u32 = 256;

    fn eval(input: &str) -> Result<Number> {
        evaluate_expression(input, PREC)
    }

    fn int(value: i32) -> Number {
        Number::from_i32(PREC, value)
    }

    #[test]
    fn basics() {
        let cases = vec![
            ("1+2*3", 7),
            ("(1+2)*3", 9),
            ("(-3)^2", 9),
            ("-3^2", -9),
            ("2^3^2", 64),
            ("10-4-3", 3),
            ("7 mod 3", 1),
            ("-7 mod 3", -1),
            ("2*-3", -6),
            ("--3", 3),
            ("((((5))))", 5),
            ("0.3e1*2", 6),
        ];
        for (input, expected) in cases {
            assert_eq!(eval(input), Ok(int(expected)), "{input}");
        }
    }

    #[test]
    fn negative_integer_powers_are_exact() {
        assert_eq!(eval("2^-2"), Ok(Number::parse(PREC, "0.25").unwrap()));
        let third = &int(1) / &int(3);
        assert_eq!(eval("(1/3)^3"), Ok(third.powi(3).unwrap()));
        assert_eq!(eval("2^10"), Ok(int(1024)));
    }

    #[test]
    fn fractional_powers_take_the_reduced_path() {
        let root = eval("2^0.5").unwrap();
        assert!((root.to_f64() - std::f64::consts::SQRT_2).abs() < 1e-15);
        assert!(matches!(eval("(-8)^0.5"), Err(CalcError::Domain(_))));
    }

    #[test]
    fn zero_divisors_flag_and_continue() {
        let postfix = to_postfix(tokenize("5/0+1", PREC).unwrap()).unwrap();
        let evaluation = evaluate(&postfix).unwrap();
        assert!(evaluation.division_by_zero);
        assert_eq!(evaluation.value, int(1));

        assert_eq!(eval("5/0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval("5 mod 0"), Err(CalcError::DivisionByZero));
        assert_eq!(eval("0^-1"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn underflow_is_malformed() {
        for input in ["", "1+", "*2", "()"] {
            assert!(
                matches!(eval(input), Err(CalcError::MalformedExpression(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn negation_is_not_binary() {
        let mut flag = false;
        let result = apply_binary(Operator::UnaryMinus, &int(1), &int(2), &mut flag);
        assert!(matches!(result, Err(CalcError::MalformedExpression(_))));
        assert!(!flag);
    }

    #[test]
    fn overflow_is_reported() {
        let huge = evaluate(&[
            Postfix::Value(Number::from_f64(PREC, f64::INFINITY)),
            Postfix::Value(int(2)),
            Postfix::Operator(Operator::Mul),
        ])
        .unwrap();
        assert_eq!(check_finite(huge.value), Err(CalcError::Overflow));
    }
}
