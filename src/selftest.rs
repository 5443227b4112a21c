use colored::*;
use scicalc::{AngleUnit, Calculator, SessionConfig};

use crate::keys::{angle_command, parse_keys, press, readout};
use crate::Palette;

/// Replays a table of key scripts against one fresh session, in order.
pub fn run_tests(colours: &Palette, config: SessionConfig) -> (usize, usize) {
    let mut calc = Calculator::new(config);
    calc.set_angle_unit(AngleUnit::Degrees);

    let tests = vec![
        ("1+2*3=", "7"),
        ("(1+2)*3=", "9"),
        ("2(3)=", "6"),
        ("3~^2=", "9"),
        ("2^3^2=", "64"),
        ("5/0=", "Divide by 0"),
        ("5%0=", "Divide by 0"),
        ("7%3=", "1"),
        ("30#sin=", "0.5"),
        ("#sin180=", "0"),
        ("90#tan=", "Invalid input: tan is undefined at odd multiples of 90°"),
        (":radians", "Angle units set to radians."),
        ("#sin(@pi/2)=", "1"),
        (":gradians", "Angle units set to gradians."),
        ("100#sin=", "1"),
        (":degrees", "Angle units set to degrees."),
        ("2#asin=", "Invalid input: asin requires -1 ≤ x ≤ 1"),
        ("0#ln=", "Invalid input: ln requires x > 0"),
        ("3+=", "3"),
        ("+4=", "7"),
        ("=", "7"),
        ("2@pi=", "6.283185307179586"),
        ("9#sqrt=", "3"),
        ("5#fact=", "120"),
        ("2.5#fact=", "Invalid input: n! requires a whole number from 0 to 10000"),
        ("3#xroot8=", "2"),
        ("3#xroot8~=", "-2"),
        ("(1+2)#sqr=", "9"),
        ("50#pct=", "0.5"),
        ("4#inv=", "0.25"),
        ("1.5#ee3=", "1500"),
        ("1#ee~7=", "1e-7"),
        ("12<3=", "13"),
        ("1+2*=", "1"),
        ("#ln@e=", "1"),
        ("2^10=", "1024"),
        ("1/3=", "0.333333333333333"),
        ("2/3=", "0.666666666666667"),
        ("2/3*1#ee20=", "6.66666666666666e+19"),
        ("((2+3", "((2 + 3"),
        ("=", "5"),
        ("#sqrt=", "2.23606797749979"),
        ("#ac", "0"),
        ("6#m+#m+#mr=", "12"),
        ("#mc#mr=", "0"),
        ("#funky", "Unknown key!"),
        ("1+$", "Invalid input!"),
    ];

    let mut passed = 0;
    let total = tests.len();

    for (input, expected) in tests {
        println!("> {}", input);

        let result = match input.strip_prefix(':').and_then(angle_command) {
            Some(unit) => {
                calc.set_angle_unit(unit);
                format!("Angle units set to {}.", unit.name())
            }
            None => match parse_keys(input) {
                Ok(keys) => keys
                    .into_iter()
                    .try_for_each(|key| press(&mut calc, key))
                    .map(|()| readout(&calc))
                    .unwrap_or_else(|err| err.to_string()),
                Err((msg, _)) => msg,
            },
        };

        println!(
            "{}",
            result.truecolor(colours.result.0, colours.result.1, colours.result.2)
        );

        if result == expected {
            println!("{}", "Pass!".green());
            passed += 1;
        } else {
            println!("{}", "fail!".red());
            println!("expected: '{}'", expected);
            println!("got     : '{}'", result);
        }

        println!();
    }

    (passed, total)
}
