//! The number currently being typed.

use crate::error::Result;
use crate::number::Number;
use crate::token::{Operator, Token};

/// Exponent digits beyond this are ignored; keeps the value inside `i32`.
const MAX_EXPONENT_DIGITS: usize = 9;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct ExponentEntry {
    digits: String,
    negative: bool,
}

/// Keystroke-exact mantissa (`0-9` and at most one `.`), sign and optional
/// exponent of the entry line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryBuffer {
    digits: String,
    negative: bool,
    has_point: bool,
    exponent: Option<ExponentEntry>,
    /// Set by the EE key, cleared when a rendered value is loaded.
    editing_exponent: bool,
    fresh: bool,
    /// Holds a recalled value: it commits like typed digits, but the next
    /// digit, point or EE key starts a new number.
    loaded: bool,
}

impl Default for EntryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryBuffer {
    pub fn new() -> Self {
        EntryBuffer {
            digits: "0".to_string(),
            negative: false,
            has_point: false,
            exponent: None,
            editing_exponent: false,
            fresh: true,
            loaded: false,
        }
    }

    /// The next digit starts a new number instead of extending this one.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn has_decimal_point(&self) -> bool {
        self.has_point
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    fn start(&mut self) {
        if self.fresh || self.loaded {
            *self = Self::new();
            self.fresh = false;
        }
    }

    pub fn append_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        self.start();
        if let Some(exponent) = &mut self.exponent {
            if exponent.digits == "0" {
                exponent.digits.clear();
            }
            if exponent.digits.len() < MAX_EXPONENT_DIGITS {
                exponent.digits.push(digit);
            }
            return;
        }
        if self.digits == "0" {
            self.digits.clear();
        }
        self.digits.push(digit);
    }

    pub fn append_decimal_point(&mut self) {
        if !self.loaded && (self.exponent.is_some() || (self.has_point && !self.fresh)) {
            return;
        }
        self.start();
        if self.digits.is_empty() {
            self.digits.push('0');
        }
        self.digits.push('.');
        self.has_point = true;
    }

    /// Starts the exponent part. A fresh entry becomes `1e`.
    pub fn append_exponent(&mut self) {
        if self.exponent.is_some() && !self.loaded {
            return;
        }
        if self.fresh || self.loaded {
            self.start();
            self.digits = "1".to_string();
        }
        if self.digits.ends_with('.') {
            self.digits.pop();
            self.has_point = false;
        }
        self.exponent = Some(ExponentEntry::default());
        self.editing_exponent = true;
    }

    /// Flips the exponent sign while an exponent is being typed, the
    /// mantissa sign otherwise.
    pub fn toggle_sign(&mut self) {
        if self.editing_exponent {
            if let Some(exponent) = &mut self.exponent {
                exponent.negative = !exponent.negative;
                return;
            }
        }
        self.negative = !self.negative;
        self.fresh = false;
    }

    pub fn backspace(&mut self) {
        if self.fresh || self.loaded {
            return;
        }
        if let Some(exponent) = &mut self.exponent {
            if exponent.digits.pop().is_none() {
                self.exponent = None;
                self.editing_exponent = false;
            }
            return;
        }
        if self.digits.pop() == Some('.') {
            self.has_point = false;
        }
        if self.digits.is_empty() {
            self.clear();
        }
    }

    fn mantissa(&self) -> &str {
        self.digits.strip_suffix('.').unwrap_or(&self.digits)
    }

    fn typed_exponent(&self) -> Option<&ExponentEntry> {
        self.exponent.as_ref().filter(|e| !e.digits.is_empty())
    }

    /// Committed form; negative entries are wrapped as `( - … )`.
    pub fn tokens(&self) -> Vec<Token> {
        let mut body: Vec<Token> = self
            .mantissa()
            .chars()
            .map(|c| if c == '.' { Token::DecimalPoint } else { Token::Digit(c) })
            .collect();
        if let Some(exponent) = self.typed_exponent() {
            body.push(Token::Exponent { negative: exponent.negative });
            body.extend(exponent.digits.chars().map(Token::Digit));
        }
        if !self.negative {
            return body;
        }
        let mut wrapped = Vec::with_capacity(body.len() + 3);
        wrapped.push(Token::ParenOpen);
        wrapped.push(Token::Operator(Operator::UnaryMinus));
        wrapped.extend(body);
        wrapped.push(Token::ParenClose);
        wrapped
    }

    pub fn display(&self) -> String {
        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        out.push_str(&self.digits);
        if let Some(exponent) = &self.exponent {
            out.push('e');
            if exponent.negative {
                out.push('-');
            }
            out.push_str(&exponent.digits);
        }
        out
    }

    pub fn value(&self, precision: u32) -> Result<Number> {
        let mut text = String::new();
        if self.negative {
            text.push('-');
        }
        text.push_str(self.mantissa());
        if let Some(exponent) = self.typed_exponent() {
            text.push('e');
            if exponent.negative {
                text.push('-');
            }
            text.push_str(&exponent.digits);
        }
        Number::parse(precision, &text)
    }

    /// Replaces the entry with a rendered value such as `-1.25e+30`.
    /// Text that is not a plain number leaves a cleared entry.
    pub fn load(&mut self, text: &str) {
        self.clear();
        let (mantissa, exponent) = match text.split_once(['e', 'E']) {
            Some((m, e)) => (m, Some(e)),
            None => (text, None),
        };
        let (negative, mantissa) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa),
        };
        let points = mantissa.chars().filter(|&c| c == '.').count();
        let valid_mantissa = !mantissa.is_empty()
            && points <= 1
            && mantissa.chars().all(|c| c.is_ascii_digit() || c == '.');
        if !valid_mantissa {
            return;
        }
        let exponent = match exponent {
            None => None,
            Some(e) => {
                let (negative, digits) = match e.strip_prefix('-') {
                    Some(rest) => (true, rest),
                    None => (false, e.strip_prefix('+').unwrap_or(e)),
                };
                if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
                    return;
                }
                Some(ExponentEntry {
                    digits: digits.to_string(),
                    negative,
                })
            }
        };
        self.digits = mantissa.to_string();
        self.negative = negative;
        self.has_point = points == 1;
        self.exponent = exponent;
        self.fresh = false;
        self.loaded = true;
    }
}
