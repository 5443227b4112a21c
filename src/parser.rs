//! Flattened expression text to postfix.
//!
//! The text reaching this module only contains numbers, `+ - * / ^ mod`
//! and parentheses; functions, constants and `Ans` have already been
//! expanded into numbers.

use tracing::trace;

use crate::error::{CalcError, Result};
use crate::number::Number;
use crate::token::Operator;

#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    Number(Number),
    Operator(Operator),
    Open,
    Close,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Postfix {
    Value(Number),
    Operator(Operator),
}

/// Binding strength when an operator already on the stack meets a new one.
/// Unary minus sits below `^` so that `-3^2` negates the power, while still
/// binding tighter than every other binary operator.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug)]
enum Precedence {
    Addition,
    Multiplication,
    UnaryNegation,
    Exponentiation,
}

fn precedence(op: Operator) -> Precedence {
    match op {
        Operator::Add | Operator::Sub => Precedence::Addition,
        Operator::Mul | Operator::Div | Operator::Mod => Precedence::Multiplication,
        Operator::UnaryMinus => Precedence::UnaryNegation,
        Operator::Pow => Precedence::Exponentiation,
    }
}

pub fn tokenize(input: &str, precision: u32) -> Result<Vec<Lexeme>> {
    let bytes = input.as_bytes();
    let mut lexemes = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let c = bytes[index];
        if c.is_ascii_whitespace() {
            index += 1;
            continue;
        }
        let lexeme = match c {
            b'(' => Lexeme::Open,
            b')' => Lexeme::Close,
            b'+' => Lexeme::Operator(Operator::Add),
            b'*' => Lexeme::Operator(Operator::Mul),
            b'/' => Lexeme::Operator(Operator::Div),
            b'^' => Lexeme::Operator(Operator::Pow),
            b'-' => {
                let unary = matches!(
                    lexemes.last(),
                    None | Some(Lexeme::Operator(_)) | Some(Lexeme::Open)
                );
                if unary {
                    Lexeme::Operator(Operator::UnaryMinus)
                } else {
                    Lexeme::Operator(Operator::Sub)
                }
            }
            _ if bytes[index..].starts_with(b"mod") => {
                lexemes.push(Lexeme::Operator(Operator::Mod));
                index += 3;
                continue;
            }
            _ if c.is_ascii_digit() || c == b'.' => {
                let end = number_end(bytes, index);
                lexemes.push(Lexeme::Number(Number::parse(precision, &input[index..end])?));
                index = end;
                continue;
            }
            _ => {
                let found = input[index..].chars().next().unwrap_or('?');
                return Err(CalcError::malformed(format!(
                    "unexpected '{found}' at position {index}"
                )));
            }
        };
        lexemes.push(lexeme);
        index += 1;
    }

    trace!(?lexemes, "tokenized");
    Ok(lexemes)
}

/// End of the number starting at `start`: digits and points, then an
/// optional `e±digits` exponent.
fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut probe = end + 1;
        if probe < bytes.len() && (bytes[probe] == b'+' || bytes[probe] == b'-') {
            probe += 1;
        }
        if probe < bytes.len() && bytes[probe].is_ascii_digit() {
            while probe < bytes.len() && bytes[probe].is_ascii_digit() {
                probe += 1;
            }
            end = probe;
        }
    }
    end
}

#[derive(Clone, Copy)]
enum Pending {
    Open,
    Operator(Operator),
}

/// Shunting-yard. Binary operators are left-associative; a unary minus is
/// pushed without popping anything, since it has no left operand.
pub fn to_postfix(lexemes: Vec<Lexeme>) -> Result<Vec<Postfix>> {
    let mut output = Vec::with_capacity(lexemes.len());
    let mut stack: Vec<Pending> = Vec::new();

    for lexeme in lexemes {
        match lexeme {
            Lexeme::Number(value) => output.push(Postfix::Value(value)),
            Lexeme::Open => stack.push(Pending::Open),
            Lexeme::Close => loop {
                match stack.pop() {
                    Some(Pending::Open) => break,
                    Some(Pending::Operator(op)) => output.push(Postfix::Operator(op)),
                    None => return Err(CalcError::malformed("unbalanced ')'")),
                }
            },
            Lexeme::Operator(op) => {
                if op.is_binary() {
                    while let Some(&Pending::Operator(top)) = stack.last() {
                        let pops = precedence(top) > precedence(op)
                            || (precedence(top) == precedence(op) && top.is_binary());
                        if !pops {
                            break;
                        }
                        stack.pop();
                        output.push(Postfix::Operator(top));
                    }
                }
                stack.push(Pending::Operator(op));
            }
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(op) => output.push(Postfix::Operator(op)),
            Pending::Open => return Err(CalcError::malformed("unclosed '('")),
        }
    }

    trace!(?output, "postfix");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: u32 = 128;

    fn ops(input: &str) -> Vec<String> {
        let postfix = to_postfix(tokenize(input, PREC).unwrap()).unwrap();
        postfix
            .into_iter()
            .map(|item| match item {
                Postfix::Value(v) => v.to_f64().to_string(),
                Postfix::Operator(Operator::UnaryMinus) => "neg".to_string(),
                Postfix::Operator(op) => op.flat().trim().to_string(),
            })
            .collect()
    }

    #[test]
    fn classifies_unary_minus() {
        let lexemes = tokenize("-1-(-2)", PREC).unwrap();
        assert_eq!(lexemes[0], Lexeme::Operator(Operator::UnaryMinus));
        assert_eq!(lexemes[2], Lexeme::Operator(Operator::Sub));
        assert_eq!(lexemes[4], Lexeme::Operator(Operator::UnaryMinus));
        let after_op = tokenize("2*-3", PREC).unwrap();
        assert_eq!(after_op[2], Lexeme::Operator(Operator::UnaryMinus));
    }

    #[test]
    fn reads_exponents_and_mod() {
        let lexemes = tokenize("0.15e2 mod 4", PREC).unwrap();
        assert_eq!(lexemes.len(), 3);
        assert_eq!(lexemes[0], Lexeme::Number(Number::from_i32(PREC, 15)));
        assert_eq!(lexemes[1], Lexeme::Operator(Operator::Mod));
        let negative_exp = tokenize("(-0.5e-1)", PREC).unwrap();
        assert_eq!(negative_exp[2], Lexeme::Number(Number::parse(PREC, "0.05").unwrap()));
    }

    #[test]
    fn rejects_stray_characters() {
        assert!(tokenize("1 + x", PREC).is_err());
        assert!(tokenize("2,3", PREC).is_err());
    }

    #[test]
    fn precedence_and_associativity() {
        let cases = vec![
            ("1+2*3", vec!["1", "2", "3", "*", "+"]),
            ("(1+2)*3", vec!["1", "2", "+", "3", "*"]),
            ("8-3-2", vec!["8", "3", "-", "2", "-"]),
            ("2^3^2", vec!["2", "3", "^", "2", "^"]),
            ("-3^2", vec!["3", "2", "^", "neg"]),
            ("-2*3", vec!["2", "neg", "3", "*"]),
            ("2^-3", vec!["2", "3", "neg", "^"]),
            ("--4", vec!["4", "neg", "neg"]),
            ("7 mod 3+1", vec!["7", "3", "mod", "1", "+"]),
        ];
        for (input, expected) in cases {
            assert_eq!(ops(input), expected, "postfix of {input}");
        }
    }

    #[test]
    fn unbalanced_parentheses_are_malformed() {
        assert!(to_postfix(tokenize("(1+2", PREC).unwrap()).is_err());
        assert!(to_postfix(tokenize("1+2)", PREC).unwrap()).is_err());
    }
}
