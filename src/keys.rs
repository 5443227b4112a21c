//! Key scripts: one input line is a sequence of calculator key presses.

use scicalc::{AngleUnit, Calculator, Constant, FunctionKind, Operator};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Point,
    Exponent,
    Operator(Operator),
    ParenOpen,
    ParenClose,
    Comma,
    Equals,
    Negate,
    Backspace,
    Function(FunctionKind),
    Constant(Constant),
    Answer,
    Random,
    MemoryAdd,
    MemorySubtract,
    MemoryRecall,
    MemoryClear,
    AllClear,
    ClearEntry,
}

/// Splits a line into keys. Errors carry the byte position to point at.
pub fn parse_keys(line: &str) -> Result<Vec<Key>, (String, usize)> {
    let bytes = line.as_bytes();
    let mut keys = Vec::new();
    let mut index = 0;

    while index < bytes.len() {
        let c = bytes[index];
        let key = match c {
            b' ' | b'\t' => {
                index += 1;
                continue;
            }
            b'0'..=b'9' => Key::Digit(c as char),
            b'.' => Key::Point,
            b'+' => Key::Operator(Operator::Add),
            b'-' => Key::Operator(Operator::Sub),
            b'*' => Key::Operator(Operator::Mul),
            b'/' => Key::Operator(Operator::Div),
            b'^' => Key::Operator(Operator::Pow),
            b'%' => Key::Operator(Operator::Mod),
            b'(' => Key::ParenOpen,
            b')' => Key::ParenClose,
            b',' => Key::Comma,
            b'=' => Key::Equals,
            b'~' => Key::Negate,
            b'<' => Key::Backspace,
            b'#' => {
                let (name, end) = read_name(bytes, index + 1, true);
                keys.push(named_key(name).ok_or(("Unknown key!".to_string(), index))?);
                index = end;
                continue;
            }
            b'@' => {
                let (name, end) = read_name(bytes, index + 1, false);
                let constant = match name.to_ascii_lowercase().as_str() {
                    "pi" => Constant::Pi,
                    "e" => Constant::E,
                    _ => return Err(("Invalid constant!".to_string(), index)),
                };
                keys.push(Key::Constant(constant));
                index = end;
                continue;
            }
            _ => return Err(("Invalid input!".to_string(), index)),
        };
        keys.push(key);
        index += 1;
    }

    Ok(keys)
}

/// Letters after a `#` or `@`. Memory keys may end in `+` or `-`.
fn read_name(bytes: &[u8], start: usize, memory_sign: bool) -> (&str, usize) {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    let is_memory = bytes[start..end].eq_ignore_ascii_case(b"m");
    if memory_sign && is_memory && matches!(bytes.get(end), Some(b'+' | b'-')) {
        end += 1;
    }
    // Only ASCII bytes were consumed, so the slice is valid UTF-8.
    (std::str::from_utf8(&bytes[start..end]).unwrap_or_default(), end)
}

fn named_key(name: &str) -> Option<Key> {
    let name = name.to_ascii_lowercase();
    let key = match name.as_str() {
        "ee" => Key::Exponent,
        "ans" => Key::Answer,
        "rand" => Key::Random,
        "m+" => Key::MemoryAdd,
        "m-" => Key::MemorySubtract,
        "mr" => Key::MemoryRecall,
        "mc" => Key::MemoryClear,
        "ac" => Key::AllClear,
        "ce" => Key::ClearEntry,
        other => Key::Function(other.parse().ok()?),
    };
    Some(key)
}

pub fn press(calc: &mut Calculator, key: Key) -> scicalc::Result<()> {
    match key {
        Key::Digit(d) => calc.digit(d),
        Key::Point => calc.decimal_point(),
        Key::Exponent => calc.exponent(),
        Key::Operator(op) => calc.operator(op),
        Key::ParenOpen => calc.paren_open(),
        Key::ParenClose => {
            calc.paren_close();
        }
        Key::Comma => {
            calc.comma();
        }
        Key::Equals => {
            // Errors land in the outcome shown after the line.
            let _ = calc.equals();
        }
        Key::Negate => calc.negate(),
        Key::Backspace => calc.backspace(),
        Key::Function(kind) => calc.function(kind),
        Key::Constant(c) => calc.constant(c),
        Key::Answer => calc.answer_ref(),
        Key::Random => calc.random(),
        Key::MemoryAdd => calc.memory_add()?,
        Key::MemorySubtract => calc.memory_subtract()?,
        Key::MemoryRecall => calc.memory_recall(),
        Key::MemoryClear => calc.memory_clear(),
        Key::AllClear => calc.all_clear(),
        Key::ClearEntry => calc.clear_entry(),
    }
    Ok(())
}

pub fn angle_command(name: &str) -> Option<AngleUnit> {
    match name.to_ascii_lowercase().as_str() {
        "degrees" => Some(AngleUnit::Degrees),
        "radians" => Some(AngleUnit::Radians),
        "gradians" => Some(AngleUnit::Gradians),
        _ => None,
    }
}

/// What the shell shows after a line: the outcome of `=`, or the
/// expression under construction followed by the entry.
pub fn readout(calc: &Calculator) -> String {
    if let Some(result) = calc.result_display() {
        return result;
    }
    let equation = calc.equation_display();
    if equation.is_empty() {
        calc.entry_display()
    } else {
        format!("{} {}", equation, calc.entry_display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_symbols_and_names() {
        let keys = parse_keys("1.5 #ee ~3 #SIN @pi %").unwrap();
        assert_eq!(
            keys,
            vec![
                Key::Digit('1'),
                Key::Point,
                Key::Digit('5'),
                Key::Exponent,
                Key::Negate,
                Key::Digit('3'),
                Key::Function(FunctionKind::Sin),
                Key::Constant(Constant::Pi),
                Key::Operator(Operator::Mod),
            ]
        );
    }

    #[test]
    fn memory_keys_keep_their_sign() {
        assert_eq!(
            parse_keys("#m+#m-3").unwrap(),
            vec![Key::MemoryAdd, Key::MemorySubtract, Key::Digit('3')]
        );
        assert_eq!(parse_keys("#mr").unwrap(), vec![Key::MemoryRecall]);
    }

    #[test]
    fn errors_point_at_the_offending_key() {
        assert_eq!(parse_keys("1+#funky"), Err(("Unknown key!".to_string(), 2)));
        assert_eq!(parse_keys("@tau"), Err(("Invalid constant!".to_string(), 0)));
        assert_eq!(parse_keys("2 $"), Err(("Invalid input!".to_string(), 2)));
    }

    #[test]
    fn angle_commands_are_case_insensitive() {
        assert_eq!(angle_command("RADians"), Some(AngleUnit::Radians));
        assert_eq!(angle_command("turns"), None);
    }
}
