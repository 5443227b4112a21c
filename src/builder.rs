//! Key commands that grow the expression: entry keys, operators, functions,
//! constants and parentheses, with implicit multiplication and operator
//! collapsing.

use tracing::debug;

use crate::session::Calculator;
use crate::token::{Constant, FunctionKind, Operator, Token};

impl Calculator {
    pub fn digit(&mut self, digit: char) {
        self.resume_entry();
        self.entry.append_digit(digit);
    }

    pub fn decimal_point(&mut self) {
        self.resume_entry();
        self.entry.append_decimal_point();
    }

    /// The EE key: starts typing a power-of-ten exponent.
    pub fn exponent(&mut self) {
        self.resume_entry();
        self.entry.append_exponent();
    }

    /// Toggles the entry sign. Right after `equals` the answer is loaded
    /// into the entry first, as displayed.
    pub fn negate(&mut self) {
        if self.evaluated {
            let text = self.format.format(&self.context.answer);
            self.start_new_expression();
            self.entry.load(&text);
        }
        self.entry.toggle_sign();
    }

    pub fn backspace(&mut self) {
        if !self.evaluated {
            self.entry.backspace();
        }
    }

    pub fn clear_entry(&mut self) {
        self.entry.clear();
    }

    /// Appends a binary operator. A second operator in a row replaces the
    /// first; an operator with nothing to its left gets a `0`. After
    /// `equals` the new expression starts from `Ans`.
    pub fn operator(&mut self, op: Operator) {
        debug!(?op, "operator key");
        if !op.is_binary() {
            self.negate();
            return;
        }
        if self.evaluated {
            self.start_new_expression();
            self.equation.push(Token::AnswerRef);
        } else {
            self.commit_entry();
        }
        if let Some(replaced) = self.equation.pop_binary_operator() {
            debug!(?replaced, ?op, "operator replaced");
        }
        if self.equation.is_empty() || self.equation.ends_awaiting_operand() {
            self.equation.push(Token::Digit('0'));
        }
        self.equation.push(Token::Operator(op));
    }

    pub fn function(&mut self, kind: FunctionKind) {
        debug!(function = kind.key(), "function key");
        let close = if kind == FunctionKind::XRoot {
            Token::Comma
        } else {
            Token::ParenClose
        };

        if self.evaluated {
            self.start_new_expression();
            self.equation
                .extend([Token::FunctionOpen(kind), Token::ParenOpen, Token::AnswerRef, close]);
            return;
        }

        if !self.entry.is_fresh() {
            let operand = self.entry.tokens();
            self.entry.clear();
            self.push_implicit_multiply();
            self.equation.extend([Token::FunctionOpen(kind), Token::ParenOpen]);
            self.equation.extend(operand);
            self.equation.push(close);
            return;
        }

        if kind.is_postfix() {
            if let Some(operand) = self.equation.take_trailing_operand() {
                self.equation.extend([Token::FunctionOpen(kind), Token::ParenOpen]);
                self.equation.extend(operand);
                self.equation.push(Token::ParenClose);
                return;
            }
        }

        self.push_implicit_multiply();
        self.equation.extend([Token::FunctionOpen(kind), Token::ParenOpen]);
    }

    pub fn constant(&mut self, constant: Constant) {
        debug!(?constant, "constant key");
        self.resume_entry();
        self.commit_entry();
        self.push_implicit_multiply();
        self.equation.push(Token::Constant(constant));
    }

    /// Appends a reference to the last answer, resolved at evaluation.
    pub fn answer_ref(&mut self) {
        self.resume_entry();
        self.commit_entry();
        self.push_implicit_multiply();
        self.equation.push(Token::AnswerRef);
    }

    pub fn paren_open(&mut self) {
        debug!("open paren");
        self.resume_entry();
        self.commit_entry();
        self.push_implicit_multiply();
        self.equation.push(Token::ParenOpen);
    }

    /// Closes the innermost open group. Returns false when none is open.
    pub fn paren_close(&mut self) -> bool {
        if self.evaluated || self.equation.open_parens() == 0 {
            debug!("close paren ignored");
            return false;
        }
        self.commit_entry();
        if self.equation.ends_awaiting_operand() {
            self.equation.push(Token::Digit('0'));
        }
        self.equation.push(Token::ParenClose);
        true
    }

    /// Separates function arguments. Returns false outside a group.
    pub fn comma(&mut self) -> bool {
        if self.evaluated || self.equation.open_parens() == 0 {
            return false;
        }
        self.commit_entry();
        if self.equation.ends_awaiting_operand() {
            self.equation.push(Token::Digit('0'));
        }
        self.equation.push(Token::Comma);
        true
    }

    fn push_implicit_multiply(&mut self) {
        if self.equation.ends_with_value() {
            self.equation.push(Token::Operator(Operator::Mul));
        }
    }

    /// Moves a typed entry into the equation, multiplying implicitly when
    /// it follows a value.
    pub(crate) fn commit_entry(&mut self) {
        if self.entry.is_fresh() {
            return;
        }
        let tokens = self.entry.tokens();
        self.entry.clear();
        self.push_implicit_multiply();
        self.equation.extend(tokens);
    }

    /// Fix-ups before evaluation: an empty or dangling expression gets a
    /// `0`, and open groups are closed.
    pub(crate) fn complete_equation(&mut self) {
        if self.equation.is_empty() || self.equation.ends_awaiting_operand() {
            self.equation.push(Token::Digit('0'));
        }
        for _ in 0..self.equation.open_parens() {
            self.equation.push(Token::ParenClose);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::session::{Calculator, SessionConfig};
    use crate::token::{Constant, FunctionKind, Operator};

    fn calculator() -> Calculator {
        Calculator::new(SessionConfig {
            precision: 256,
            ..SessionConfig::default()
        })
    }

    fn type_number(calc: &mut Calculator, text: &str) {
        for c in text.chars() {
            if c == '.' {
                calc.decimal_point();
            } else {
                calc.digit(c);
            }
        }
    }

    #[test]
    fn operators_collapse_and_default_to_zero() {
        let mut calc = calculator();
        calc.operator(Operator::Mul);
        assert_eq!(calc.equation_display(), "0 ×");
        type_number(&mut calc, "5");
        calc.operator(Operator::Add);
        calc.operator(Operator::Sub);
        assert_eq!(calc.equation_display(), "0 × 5 −");
    }

    #[test]
    fn implicit_multiplication_before_groups_and_constants() {
        let mut calc = calculator();
        type_number(&mut calc, "2");
        calc.paren_open();
        type_number(&mut calc, "3");
        assert!(calc.paren_close());
        calc.constant(Constant::Pi);
        assert_eq!(calc.equation_display(), "2 × (3) × π");
    }

    #[test]
    fn close_without_open_is_ignored() {
        let mut calc = calculator();
        type_number(&mut calc, "4");
        assert!(!calc.paren_close());
        assert!(!calc.comma());
        assert_eq!(calc.equation_display(), "");
        assert_eq!(calc.entry_display(), "4");
    }

    #[test]
    fn empty_group_closes_on_zero() {
        let mut calc = calculator();
        calc.paren_open();
        assert!(calc.paren_close());
        assert_eq!(calc.equation_display(), "(0)");
    }

    #[test]
    fn function_wraps_a_typed_entry() {
        let mut calc = calculator();
        type_number(&mut calc, "9");
        calc.function(FunctionKind::Sqrt);
        assert_eq!(calc.equation_display(), "√(9)");
        assert_eq!(calc.entry_display(), "0");
    }

    #[test]
    fn postfix_keys_wrap_the_trailing_operand() {
        let mut calc = calculator();
        type_number(&mut calc, "2");
        calc.operator(Operator::Add);
        calc.paren_open();
        type_number(&mut calc, "1");
        calc.operator(Operator::Add);
        type_number(&mut calc, "2");
        calc.paren_close();
        calc.function(FunctionKind::Square);
        assert_eq!(calc.equation_display(), "2 + sqr((1 + 2))");
        assert_eq!(calc.equals().as_deref(), Ok("11"));
    }

    #[test]
    fn prefix_function_opens_a_group() {
        let mut calc = calculator();
        calc.function(FunctionKind::Ln);
        assert_eq!(calc.open_parens(), 1);
        calc.constant(Constant::E);
        assert_eq!(calc.equals().as_deref(), Ok("1"));
        assert_eq!(calc.last_equation(), Some("ln(e) ="));
    }

    #[test]
    fn xroot_leaves_the_group_open_for_the_radicand() {
        let mut calc = calculator();
        type_number(&mut calc, "3");
        calc.function(FunctionKind::XRoot);
        assert_eq!(calc.open_parens(), 1);
        type_number(&mut calc, "27");
        assert_eq!(calc.equals().as_deref(), Ok("3"));
        assert_eq!(calc.last_equation(), Some("root(3, 27) ="));
    }

    #[test]
    fn keys_after_equals() {
        let mut calc = calculator();
        type_number(&mut calc, "16");
        calc.equals().unwrap();
        calc.function(FunctionKind::Sqrt);
        assert_eq!(calc.equation_display(), "√(Ans)");
        assert_eq!(calc.equals().as_deref(), Ok("4"));

        calc.negate();
        assert_eq!(calc.entry_display(), "-4");
        assert_eq!(calc.equation_display(), "");

        calc.equals().unwrap();
        calc.backspace();
        assert_eq!(calc.result_display().as_deref(), Some("-4"));
        calc.digit('7');
        assert_eq!(calc.entry_display(), "7");
        assert_eq!(calc.result_display(), None);
    }
}
