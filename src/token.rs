//! The key-press token model and its on-screen rendering.

use std::str::FromStr;

use thiserror::Error;

use crate::number::Number;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    UnaryMinus,
}

impl Operator {
    pub fn is_binary(self) -> bool {
        self != Operator::UnaryMinus
    }

    /// Spelling understood by the parser.
    pub fn flat(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub | Operator::UnaryMinus => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "^",
            Operator::Mod => " mod ",
        }
    }

    /// Typographic spelling for the equation display.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => " + ",
            Operator::Sub => " − ",
            Operator::Mul => " × ",
            Operator::Div => " ÷ ",
            Operator::Pow => "^",
            Operator::Mod => " mod ",
            Operator::UnaryMinus => "−",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(self, precision: u32) -> Number {
        match self {
            Constant::Pi => Number::pi(precision),
            Constant::E => Number::e(precision),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Constant::Pi => "π",
            Constant::E => "e",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Ln,
    Log,
    Sqrt,
    Abs,
    Exp,
    Exp10,
    Factorial,
    Square,
    Reciprocal,
    Percent,
    XRoot,
}

impl FunctionKind {
    pub const ALL: [FunctionKind; 23] = [
        FunctionKind::Sin,
        FunctionKind::Cos,
        FunctionKind::Tan,
        FunctionKind::Asin,
        FunctionKind::Acos,
        FunctionKind::Atan,
        FunctionKind::Sinh,
        FunctionKind::Cosh,
        FunctionKind::Tanh,
        FunctionKind::Asinh,
        FunctionKind::Acosh,
        FunctionKind::Atanh,
        FunctionKind::Ln,
        FunctionKind::Log,
        FunctionKind::Sqrt,
        FunctionKind::Abs,
        FunctionKind::Exp,
        FunctionKind::Exp10,
        FunctionKind::Factorial,
        FunctionKind::Square,
        FunctionKind::Reciprocal,
        FunctionKind::Percent,
        FunctionKind::XRoot,
    ];

    /// Alphabetic key name, also accepted by `FromStr`.
    pub fn key(self) -> &'static str {
        match self {
            FunctionKind::Sin => "sin",
            FunctionKind::Cos => "cos",
            FunctionKind::Tan => "tan",
            FunctionKind::Asin => "asin",
            FunctionKind::Acos => "acos",
            FunctionKind::Atan => "atan",
            FunctionKind::Sinh => "sinh",
            FunctionKind::Cosh => "cosh",
            FunctionKind::Tanh => "tanh",
            FunctionKind::Asinh => "asinh",
            FunctionKind::Acosh => "acosh",
            FunctionKind::Atanh => "atanh",
            FunctionKind::Ln => "ln",
            FunctionKind::Log => "log",
            FunctionKind::Sqrt => "sqrt",
            FunctionKind::Abs => "abs",
            FunctionKind::Exp => "exp",
            FunctionKind::Exp10 => "alog",
            FunctionKind::Factorial => "fact",
            FunctionKind::Square => "sqr",
            FunctionKind::Reciprocal => "inv",
            FunctionKind::Percent => "pct",
            FunctionKind::XRoot => "xroot",
        }
    }

    /// Prefix drawn in front of the argument group.
    pub fn label(self) -> &'static str {
        match self {
            FunctionKind::Sqrt => "√",
            FunctionKind::Exp10 => "10^",
            FunctionKind::Reciprocal => "1/",
            FunctionKind::XRoot => "root",
            other => other.key(),
        }
    }

    /// Keys pressed after their operand rather than before it.
    pub fn is_postfix(self) -> bool {
        matches!(
            self,
            FunctionKind::Square
                | FunctionKind::Reciprocal
                | FunctionKind::Percent
                | FunctionKind::Factorial
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown function '{0}'")]
pub struct UnknownFunction(pub String);

impl FromStr for FunctionKind {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.to_ascii_lowercase();
        FunctionKind::ALL
            .into_iter()
            .find(|kind| kind.key() == name)
            .ok_or(UnknownFunction(name))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    Digit(char),
    DecimalPoint,
    /// Start of the exponent in `1.5e-3` style entry.
    Exponent { negative: bool },
    Operator(Operator),
    ParenOpen,
    ParenClose,
    Comma,
    /// Always followed by `ParenOpen` in a built equation.
    FunctionOpen(FunctionKind),
    Constant(Constant),
    AnswerRef,
}

impl Token {
    /// Something an implicit multiplication can follow.
    pub fn is_value_like(self) -> bool {
        matches!(
            self,
            Token::Digit(_)
                | Token::DecimalPoint
                | Token::ParenClose
                | Token::Constant(_)
                | Token::AnswerRef
        )
    }

    pub fn is_number_part(self) -> bool {
        matches!(
            self,
            Token::Digit(_) | Token::DecimalPoint | Token::Exponent { .. }
        )
    }

    pub fn is_binary_operator(self) -> bool {
        matches!(self, Token::Operator(op) if op.is_binary())
    }

    fn display(self) -> String {
        match self {
            Token::Digit(d) => d.to_string(),
            Token::DecimalPoint => ".".to_string(),
            Token::Exponent { negative: true } => "E−".to_string(),
            Token::Exponent { negative: false } => "E".to_string(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::ParenOpen => "(".to_string(),
            Token::ParenClose => ")".to_string(),
            Token::Comma => ", ".to_string(),
            Token::FunctionOpen(kind) => kind.label().to_string(),
            Token::Constant(c) => c.symbol().to_string(),
            Token::AnswerRef => "Ans".to_string(),
        }
    }
}

/// End index of a `( − digits )` wrapper starting at `start`.
fn negative_literal_end(tokens: &[Token], start: usize) -> Option<usize> {
    if tokens.get(start) != Some(&Token::ParenOpen)
        || tokens.get(start + 1) != Some(&Token::Operator(Operator::UnaryMinus))
    {
        return None;
    }
    let mut end = start + 2;
    while tokens.get(end).is_some_and(|t| t.is_number_part()) {
        end += 1;
    }
    (end > start + 2 && tokens.get(end) == Some(&Token::ParenClose)).then_some(end)
}

/// Beautified equation text: typographic operators, negative literals shown
/// as `−5` and parenthesised only when they are the base of `^`.
pub fn render_equation(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut index = 0;
    while index < tokens.len() {
        if let Some(end) = negative_literal_end(tokens, index) {
            let is_base = tokens.get(end + 1) == Some(&Token::Operator(Operator::Pow));
            if is_base {
                out.push('(');
            }
            out.push('−');
            for token in &tokens[index + 2..end] {
                out.push_str(&token.display());
            }
            if is_base {
                out.push(')');
            }
            index = end + 1;
            continue;
        }
        out.push_str(&tokens[index].display());
        index += 1;
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(text: &str) -> Vec<Token> {
        text.chars()
            .map(|c| if c == '.' { Token::DecimalPoint } else { Token::Digit(c) })
            .collect()
    }

    fn negative(text: &str) -> Vec<Token> {
        let mut tokens = vec![Token::ParenOpen, Token::Operator(Operator::UnaryMinus)];
        tokens.extend(digits(text));
        tokens.push(Token::ParenClose);
        tokens
    }

    #[test]
    fn function_keys_parse_case_insensitively() {
        assert_eq!("SIN".parse::<FunctionKind>(), Ok(FunctionKind::Sin));
        assert_eq!("xroot".parse::<FunctionKind>(), Ok(FunctionKind::XRoot));
        assert!("funky".parse::<FunctionKind>().is_err());
        for kind in FunctionKind::ALL {
            assert_eq!(kind.key().parse::<FunctionKind>(), Ok(kind));
        }
    }

    #[test]
    fn renders_typographic_operators() {
        let mut tokens = digits("12");
        tokens.push(Token::Operator(Operator::Mul));
        tokens.push(Token::Constant(Constant::Pi));
        tokens.push(Token::Operator(Operator::Sub));
        tokens.push(Token::AnswerRef);
        assert_eq!(render_equation(&tokens), "12 × π − Ans");
    }

    #[test]
    fn negative_literals_stay_tight() {
        let mut tokens = digits("3");
        tokens.push(Token::Operator(Operator::Add));
        tokens.extend(negative("2.5"));
        assert_eq!(render_equation(&tokens), "3 + −2.5");
    }

    #[test]
    fn negative_base_of_power_is_parenthesised() {
        let mut tokens = negative("3");
        tokens.push(Token::Operator(Operator::Pow));
        tokens.extend(digits("2"));
        assert_eq!(render_equation(&tokens), "(−3)^2");
    }

    #[test]
    fn functions_render_with_labels() {
        let mut tokens = vec![Token::FunctionOpen(FunctionKind::Sqrt), Token::ParenOpen];
        tokens.extend(digits("9"));
        tokens.push(Token::ParenClose);
        assert_eq!(render_equation(&tokens), "√(9)");
    }
}
