//! Committed tokens and balanced-group helpers shared by the builder and
//! function expansion.

use crate::error::{CalcError, Result};
use crate::token::{Operator, Token};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EquationBuffer {
    tokens: Vec<Token>,
    open_parens: usize,
}

impl EquationBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of `(` not yet matched by a `)`.
    pub fn open_parens(&self) -> usize {
        self.open_parens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<Token> {
        self.tokens.last().copied()
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.open_parens = 0;
    }

    pub fn push(&mut self, token: Token) {
        match token {
            Token::ParenOpen => self.open_parens += 1,
            Token::ParenClose => self.open_parens = self.open_parens.saturating_sub(1),
            _ => {}
        }
        self.tokens.push(token);
    }

    pub fn extend(&mut self, tokens: impl IntoIterator<Item = Token>) {
        for token in tokens {
            self.push(token);
        }
    }

    pub fn ends_with_value(&self) -> bool {
        self.last().is_some_and(Token::is_value_like)
    }

    /// True after a binary operator, `(` or `,`: a value must come next.
    pub fn ends_awaiting_operand(&self) -> bool {
        matches!(
            self.last(),
            Some(Token::ParenOpen | Token::Comma) | Some(Token::Operator(_))
        )
    }

    pub fn pop_binary_operator(&mut self) -> Option<Operator> {
        match self.last() {
            Some(Token::Operator(op)) if op.is_binary() => {
                self.tokens.pop();
                Some(op)
            }
            _ => None,
        }
    }

    /// Removes and returns the complete operand at the end of the buffer:
    /// a number, a constant, `Ans`, or a parenthesised group together with
    /// the function that opens it.
    pub fn take_trailing_operand(&mut self) -> Option<Vec<Token>> {
        let start = match self.last()? {
            Token::ParenClose => {
                let open = matching_open(&self.tokens, self.tokens.len() - 1)?;
                match open.checked_sub(1).map(|i| self.tokens[i]) {
                    Some(Token::FunctionOpen(_)) => open - 1,
                    _ => open,
                }
            }
            Token::Constant(_) | Token::AnswerRef => self.tokens.len() - 1,
            token if token.is_number_part() => {
                let run = self
                    .tokens
                    .iter()
                    .rev()
                    .take_while(|t| t.is_number_part())
                    .count();
                self.tokens.len() - run
            }
            _ => return None,
        };
        Some(self.tokens.split_off(start))
    }
}

/// Index of the `(` matching the `)` at `close`.
fn matching_open(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for index in (0..=close).rev() {
        match tokens[index] {
            Token::ParenClose => depth += 1,
            Token::ParenOpen => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// The tokens strictly inside the balanced group that opens at `open`, and
/// the index just past its closing parenthesis.
pub fn extract_group(tokens: &[Token], open: usize) -> Result<(&[Token], usize)> {
    if tokens.get(open) != Some(&Token::ParenOpen) {
        return Err(CalcError::malformed("function without an argument group"));
    }
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::ParenOpen => depth += 1,
            Token::ParenClose => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&tokens[open + 1..index], index + 1));
                }
            }
            _ => {}
        }
    }
    Err(CalcError::malformed("unclosed parenthesis"))
}

/// Splits a group's contents at commas that are not nested in parentheses.
pub fn split_arguments(tokens: &[Token]) -> Vec<&[Token]> {
    let mut arguments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::ParenOpen => depth += 1,
            Token::ParenClose => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                arguments.push(&tokens[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    arguments.push(&tokens[start..]);
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{Constant, FunctionKind};

    fn digit(d: char) -> Token {
        Token::Digit(d)
    }

    #[test]
    fn push_tracks_open_parens() {
        let mut buffer = EquationBuffer::new();
        buffer.extend([Token::ParenOpen, Token::ParenOpen, digit('1'), Token::ParenClose]);
        assert_eq!(buffer.open_parens(), 1);
        buffer.push(Token::ParenClose);
        assert_eq!(buffer.open_parens(), 0);
        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn trailing_operator_pops_once() {
        let mut buffer = EquationBuffer::new();
        buffer.extend([digit('3'), Token::Operator(Operator::Add)]);
        assert!(buffer.ends_awaiting_operand());
        assert_eq!(buffer.pop_binary_operator(), Some(Operator::Add));
        assert_eq!(buffer.pop_binary_operator(), None);
        assert!(buffer.ends_with_value());
    }

    #[test]
    fn extracts_nested_groups() {
        let tokens = [
            Token::FunctionOpen(FunctionKind::Sin),
            Token::ParenOpen,
            Token::ParenOpen,
            digit('1'),
            Token::ParenClose,
            Token::ParenClose,
            Token::Operator(Operator::Add),
            digit('2'),
        ];
        let (group, next) = extract_group(&tokens, 1).unwrap();
        assert_eq!(group, &tokens[2..5]);
        assert_eq!(next, 6);
        assert!(extract_group(&tokens, 0).is_err());
        assert!(extract_group(&tokens[..4], 1).is_err());
    }

    #[test]
    fn splits_only_top_level_commas() {
        let tokens = [
            digit('3'),
            Token::Comma,
            Token::FunctionOpen(FunctionKind::XRoot),
            Token::ParenOpen,
            digit('2'),
            Token::Comma,
            digit('4'),
            Token::ParenClose,
        ];
        let parts = split_arguments(&tokens);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], &tokens[..1]);
        assert_eq!(parts[1], &tokens[2..]);
        assert_eq!(split_arguments(&[digit('7')]).len(), 1);
    }

    #[test]
    fn trailing_operand_takes_whole_groups() {
        let mut buffer = EquationBuffer::new();
        buffer.extend([
            digit('2'),
            Token::Operator(Operator::Mul),
            Token::FunctionOpen(FunctionKind::Sqrt),
            Token::ParenOpen,
            digit('9'),
            Token::ParenClose,
        ]);
        let operand = buffer.take_trailing_operand().unwrap();
        assert_eq!(operand.len(), 4);
        assert_eq!(operand[0], Token::FunctionOpen(FunctionKind::Sqrt));
        assert_eq!(buffer.tokens(), &[digit('2'), Token::Operator(Operator::Mul)]);
        assert_eq!(buffer.take_trailing_operand(), None);

        let mut number = EquationBuffer::new();
        number.extend([
            Token::Constant(Constant::Pi),
            Token::Operator(Operator::Add),
            digit('1'),
            Token::DecimalPoint,
            digit('5'),
        ]);
        assert_eq!(number.take_trailing_operand().map(|t| t.len()), Some(3));
    }
}
