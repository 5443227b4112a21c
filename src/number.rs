//! Arbitrary-precision decimal values backed by MPFR.
//!
//! Every value carries the working precision it was created with. A session
//! creates all of its values at one precision, so mixed-precision arithmetic
//! only happens if a caller builds values by hand.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use az::CheckedAs;
use rug::float::Constant;
use rug::rand::RandState;
use rug::{Float, Integer};

use crate::error::{CalcError, Result};

/// 8192 bits, roughly 2460 significant decimal digits.
pub const DEFAULT_PRECISION: u32 = 8192;

/// How far from a whole number a value may sit and still count as one.
const INTEGER_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub struct Number(Float);

impl Number {
    pub fn zero(precision: u32) -> Self {
        Number(Float::with_val(precision, 0))
    }

    pub fn from_i32(precision: u32, value: i32) -> Self {
        Number(Float::with_val(precision, value))
    }

    pub fn from_f64(precision: u32, value: f64) -> Self {
        Number(Float::with_val(precision, value))
    }

    pub fn pi(precision: u32) -> Self {
        Number(Float::with_val(precision, Constant::Pi))
    }

    pub fn e(precision: u32) -> Self {
        Number(Float::with_val(precision, 1).exp())
    }

    /// Uniformly distributed in [0, 1).
    pub fn random(precision: u32, state: &mut RandState<'_>) -> Self {
        Number(Float::with_val(precision, Float::random_cont(state)))
    }

    /// `n!` computed exactly, then rounded to the working precision.
    pub fn factorial(precision: u32, n: u32) -> Self {
        let exact = Integer::from(Integer::factorial(n));
        Number(Float::with_val(precision, &exact))
    }

    /// Parses plain or exponent notation, e.g. `"12.5"`, `"-0.3e-7"`.
    pub fn parse(precision: u32, text: &str) -> Result<Self> {
        let parsed = Float::parse(text.trim())
            .map_err(|err| CalcError::malformed(format!("invalid number '{text}': {err}")))?;
        Ok(Number(Float::with_val(precision, parsed)))
    }

    pub fn prec(&self) -> u32 {
        self.0.prec()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Strictly below zero; `-0` is not negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero() && !self.0.is_nan()
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64()
    }

    pub fn abs(&self) -> Number {
        Number(self.0.clone().abs())
    }

    /// Applies a native MPFR function at full precision.
    pub fn map(&self, f: fn(Float) -> Float) -> Number {
        Number(f(self.0.clone()))
    }

    /// The nearest whole number, if the value lies within tolerance of one
    /// and fits an `i64`.
    pub fn near_integer(&self) -> Option<i64> {
        let x = self.0.to_f64();
        let rounded = x.round();
        if (x - rounded).abs() <= INTEGER_TOLERANCE {
            rounded.checked_as::<i64>()
        } else {
            None
        }
    }

    /// Integer power by repeated squaring. `None` for zero raised to a
    /// negative power.
    pub fn powi(&self, exponent: i64) -> Option<Number> {
        let precision = self.prec();
        let mut result = Float::with_val(precision, 1);
        let mut base = self.0.clone();
        let mut n = exponent.unsigned_abs();
        while n > 0 {
            if n & 1 == 1 {
                result *= &base;
            }
            n >>= 1;
            if n > 0 {
                base = Float::with_val(precision, &base * &base);
            }
        }
        if exponent < 0 {
            if result.is_zero() {
                return None;
            }
            result = result.recip();
        }
        Some(Number(result))
    }

    /// Principal `k`-th root, negative for odd `k` and a negative value.
    pub fn root(&self, k: u32) -> Number {
        Number(self.0.clone().root(k))
    }

    /// Truncated remainder; the result takes the sign of `self`.
    pub fn rem(&self, divisor: &Number) -> Number {
        let precision = self.prec();
        let quotient = Float::with_val(precision, &self.0 / &divisor.0).trunc();
        Number(self.0.clone() - quotient * &divisor.0)
    }

    /// True when `|self|` is more than `bits` binary orders of magnitude
    /// below `|reference|`, or exactly zero.
    pub fn is_negligible_against(&self, reference: &Number, bits: u32) -> bool {
        match (self.0.get_exp(), reference.0.get_exp()) {
            (None, _) => self.0.is_zero(),
            (Some(_), None) => false,
            (Some(own), Some(other)) => i64::from(own) < i64::from(other) - i64::from(bits),
        }
    }

    /// Sign, significant decimal digits and point position, such that the
    /// value is `0.DIGITS × 10^exp`. `None` for zero, infinities and NaN.
    pub fn decimal_digits(&self, num_digits: Option<usize>) -> Option<(bool, String, i32)> {
        if !self.0.is_normal() {
            return None;
        }
        let (negative, digits, exp) = self.0.to_sign_string_exp(10, num_digits);
        exp.map(|exp| (negative, digits, exp))
    }

    /// Text that parses back to this exact value.
    pub fn to_exact_string(&self) -> String {
        match self.decimal_digits(None) {
            None if self.0.is_nan() => "nan".to_string(),
            None if self.0.is_infinite() && self.0.is_sign_negative() => "-inf".to_string(),
            None if self.0.is_infinite() => "inf".to_string(),
            None => "0".to_string(),
            Some((negative, digits, exp)) => {
                let digits = digits.trim_end_matches('0');
                let sign = if negative { "-" } else { "" };
                format!("{sign}0.{digits}e{exp}")
            }
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_exact_string())
    }
}

impl Add for &Number {
    type Output = Number;

    fn add(self, rhs: &Number) -> Number {
        Number(Float::with_val(self.prec(), &self.0 + &rhs.0))
    }
}

impl Sub for &Number {
    type Output = Number;

    fn sub(self, rhs: &Number) -> Number {
        Number(Float::with_val(self.prec(), &self.0 - &rhs.0))
    }
}

impl Mul for &Number {
    type Output = Number;

    fn mul(self, rhs: &Number) -> Number {
        Number(Float::with_val(self.prec(), &self.0 * &rhs.0))
    }
}

impl Div for &Number {
    type Output = Number;

    fn div(self, rhs: &Number) -> Number {
        Number(Float::with_val(self.prec(), &self.0 / &rhs.0))
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(-self.0.clone())
    }
}

/// Machine-float fallbacks. Anything computed here carries at most 53 bits
/// of significance regardless of the working precision.
pub mod reduced_precision {
    use super::Number;

    /// `base ^ exponent` through `f64::powf`.
    pub fn pow(base: &Number, exponent: &Number) -> Number {
        let result = base.to_f64().powf(exponent.to_f64());
        Number::from_f64(base.prec(), result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREC: u32 = 256;

    fn num(text: &str) -> Number {
        Number::parse(PREC, text).unwrap()
    }

    #[test]
    fn parse_accepts_plain_and_exponent_forms() {
        assert_eq!(num("12.5"), Number::from_f64(PREC, 12.5));
        assert_eq!(num("-0.25e1"), Number::from_f64(PREC, -2.5));
        assert!(Number::parse(PREC, "1.2.3").is_err());
        assert!(Number::parse(PREC, "").is_err());
    }

    #[test]
    fn exact_string_round_trips() {
        for text in ["0", "1", "-7", "0.1", "123456789.987654321", "-3e-40"] {
            let value = num(text);
            let back = num(&value.to_exact_string());
            assert_eq!(back, value, "round trip of {text}");
        }
    }

    #[test]
    fn powi_uses_exact_squaring() {
        assert_eq!(num("3").powi(4), Some(num("81")));
        assert_eq!(num("-2").powi(3), Some(num("-8")));
        assert_eq!(num("2").powi(-2), Some(num("0.25")));
        assert_eq!(num("5").powi(0), Some(num("1")));
        assert_eq!(num("0").powi(-1), None);
    }

    #[test]
    fn near_integer_tolerates_rounding_noise() {
        let third = &num("1") / &num("3");
        let almost_one = &third * &num("3");
        assert_eq!(almost_one.near_integer(), Some(1));
        assert_eq!(num("2.5").near_integer(), None);
        assert_eq!(num("1e300").near_integer(), None);
    }

    #[test]
    fn rem_keeps_dividend_sign() {
        assert_eq!(num("7").rem(&num("3")), num("1"));
        assert_eq!(num("-7").rem(&num("3")), num("-1"));
        assert_eq!(num("7.5").rem(&num("2")), num("1.5"));
    }

    #[test]
    fn roots_and_factorials() {
        assert_eq!(num("27").root(3), num("3"));
        assert_eq!(num("-8").root(3), num("-2"));
        assert_eq!(Number::factorial(PREC, 5), num("120"));
        assert_eq!(Number::factorial(PREC, 0), num("1"));
    }

    #[test]
    fn negligible_is_relative() {
        let tiny = num("1e-100");
        assert!(tiny.is_negligible_against(&num("1"), 64));
        assert!(!tiny.is_negligible_against(&num("1e-99"), 64));
        assert!(Number::zero(PREC).is_negligible_against(&num("3"), 64));
    }

    #[test]
    fn reduced_precision_pow_matches_f64() {
        let root = reduced_precision::pow(&num("2"), &num("0.5"));
        assert!((root.to_f64() - std::f64::consts::SQRT_2).abs() < 1e-15);
        assert!(reduced_precision::pow(&num("-8"), &num("0.5")).is_nan());
    }

    #[test]
    fn decimal_digits_locate_the_point() {
        let (negative, digits, exp) = num("-15").decimal_digits(Some(4)).unwrap();
        assert!(negative);
        assert_eq!(digits, "1500");
        assert_eq!(exp, 2);
        assert!(Number::zero(PREC).decimal_digits(None).is_none());
    }
}
