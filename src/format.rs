//! Display rendering of numbers: fixed or scientific notation, bounded to a
//! character budget.

use crate::error::Result;
use crate::number::Number;

/// Extra digits requested beyond the significant ones shown, so binary
/// rounding noise such as `0.999…` for `1e-7` settles before truncation.
const GUARD_DIGITS: usize = 10;

/// Narrowest width that still holds a signed scientific value such as
/// `-1.2e-100`.
pub const MIN_WIDTH: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayFormat {
    /// Most digits shown after the point in fixed notation.
    pub max_decimals: usize,
    /// Significant digits kept in scientific notation.
    pub sig_digits: usize,
    /// Decimal exponents at or above this switch to scientific notation.
    pub positive_exp_threshold: i32,
    /// Decimal exponents at or below this switch to scientific notation.
    pub negative_exp_threshold: i32,
    /// Character budget of the rendered result.
    pub width: usize,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        DisplayFormat {
            max_decimals: 15,
            sig_digits: 15,
            positive_exp_threshold: 16,
            negative_exp_threshold: -7,
            width: 24,
        }
    }
}

impl DisplayFormat {
    pub fn format(&self, value: &Number) -> String {
        if value.is_nan() {
            return "Not a number".to_string();
        }
        if !value.is_finite() {
            let sign = if value.is_negative() { "-" } else { "" };
            return format!("{sign}Infinity");
        }
        let sig_digits = self.sig_digits.max(1);
        let Some((negative, digits, exp)) = value.decimal_digits(Some(sig_digits + GUARD_DIGITS))
        else {
            return "0".to_string();
        };

        let sci_exp = exp - 1;
        let fixed = if sci_exp > self.negative_exp_threshold && sci_exp < self.positive_exp_threshold
        {
            value
                .decimal_digits(None)
                .and_then(|(_, all, exp)| self.fixed(&all, exp))
        } else {
            None
        };
        let body = fixed
            .filter(|body| integer_width(body) + usize::from(negative) <= self.width)
            .unwrap_or_else(|| scientific(&digits, sci_exp, sig_digits));

        let text = if negative && body != "0" {
            format!("-{body}")
        } else {
            body
        };
        shrink_for_display(&text, self.width)
    }

    /// Fixed notation rounded half-up at `max_decimals`. `None` when the
    /// rounding carry pushes the integer part past the threshold.
    fn fixed(&self, digits: &str, exp: i32) -> Option<String> {
        let mut all: Vec<u8>;
        let mut point: usize;
        if exp <= 0 {
            let leading = usize::try_from(-exp).ok()?;
            all = Vec::with_capacity(1 + leading + digits.len());
            all.push(b'0');
            all.extend(std::iter::repeat(b'0').take(leading));
            all.extend_from_slice(digits.as_bytes());
            point = 1;
        } else {
            point = usize::try_from(exp).ok()?;
            all = digits.as_bytes().to_vec();
            if all.len() < point {
                all.resize(point, b'0');
            }
        }

        let keep = point + self.max_decimals;
        if all.len() > keep {
            let round_up = all[keep] >= b'5';
            all.truncate(keep);
            if round_up && carry(&mut all) {
                all.insert(0, b'1');
                point += 1;
            }
        }

        let (int_part, frac_part) = all.split_at(point);
        let int_part = String::from_utf8_lossy(int_part);
        let int_part = match int_part.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        };
        let int_exp = i32::try_from(int_part.len()).ok()? - 1;
        if int_part != "0" && int_exp >= self.positive_exp_threshold {
            return None;
        }
        let frac_part = trim_zeros(String::from_utf8_lossy(frac_part).into_owned());
        if frac_part.is_empty() {
            Some(int_part.to_string())
        } else {
            Some(format!("{int_part}.{frac_part}"))
        }
    }
}

/// Adds one at the last place. True if the carry ran off the front.
fn carry(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return false;
        }
    }
    true
}

/// `d.ddde±N` keeping at most `sig_digits` digits, truncated.
fn scientific(digits: &str, sci_exp: i32, sig_digits: usize) -> String {
    let kept: String = digits.chars().take(sig_digits).collect();
    let kept = trim_zeros(kept);
    let (lead, rest) = kept.split_at(kept.len().min(1));
    let lead = if lead.is_empty() { "0" } else { lead };
    let sign = if sci_exp < 0 { '-' } else { '+' };
    let magnitude = sci_exp.unsigned_abs();
    if rest.is_empty() {
        format!("{lead}e{sign}{magnitude}")
    } else {
        format!("{lead}.{rest}e{sign}{magnitude}")
    }
}

fn integer_width(fixed: &str) -> usize {
    fixed.split('.').next().map_or(0, str::len)
}

fn trim_zeros(mut number: String) -> String {
    let kept = number.trim_end_matches('0').len();
    number.truncate(kept);
    number
}

/// Drops trailing fractional mantissa digits until `text` fits in `width`
/// characters. Text with no fractional part left is cut hard, which only
/// happens to exponents too long for the width.
pub fn shrink_for_display(text: &str, width: usize) -> String {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(at) => text.split_at(at),
        None => (text, ""),
    };
    let mut mantissa = mantissa.to_string();
    while mantissa.chars().count() + exponent.chars().count() > width && mantissa.contains('.') {
        mantissa.pop();
        if mantissa.contains('.') {
            let kept = mantissa.trim_end_matches('0').trim_end_matches('.').len();
            mantissa.truncate(kept);
        }
    }
    let shrunk = format!("{mantissa}{exponent}");
    if shrunk.chars().count() > width {
        shrunk.chars().take(width).collect()
    } else {
        shrunk
    }
}

/// Reads a displayed value back at the given precision.
pub fn parse(text: &str, precision: u32) -> Result<Number> {
    Number::parse(precision, text)
}
