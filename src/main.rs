mod config;
mod keys;
mod logging;
mod selftest;

use anyhow::Result;
use clap::Parser;
use colored::*;
use rustyline::{error::ReadlineError, Config, DefaultEditor};
use scicalc::{Calculator, SessionConfig};
use tracing::debug;

use crate::logging::LogControl;

fn main() -> Result<()> {
    let args = config::Args::parse();
    let mut logs = LogControl::init(args.debug)?;
    let session = args.session_config();
    debug!(?session, "starting");

    let mut calc = Calculator::new(session);
    let mut rl = DefaultEditor::with_config(Config::builder().build())?;

    let colours = Palette {
        integer: (0xB4, 0xB4, 0xB4),  // Light gray
        fraction: (0x8C, 0x64, 0x8C), // Muted purple
        exponent: (0xDC, 0xF0, 0x32), // Bright yellow
        decimal: (0xFF, 0xFF, 0xFF),  // White
        sign: (0xFF, 0xFF, 0xFF),     // White
        equation: (0x8C, 0x8C, 0xB4), // Muted blue
        result: (0xB4, 0x8C, 0x8C),   // Muted red
        carat: (0xFF, 0x14, 0x00),    // Bright red
        error: (0xDC, 0x64, 0x5A),    // Soft red
        message: (0x78, 0xB4, 0x78),  // Soft green
    };

    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => {
                if line.is_empty() {
                    println!("Goodbye!");
                    break;
                }
                rl.add_history_entry(line.as_str())?;
                debug!(%line, "input");

                if let Some(command) = line.trim().strip_prefix(':') {
                    match run_command(command, &mut calc, &mut logs, &colours, session) {
                        Ok(msg) => println!("{}", paint(&msg, colours.message)),
                        Err(msg) => println!("{}", paint(&msg, colours.error)),
                    }
                    continue;
                }

                match keys::parse_keys(&line) {
                    Ok(pressed) => {
                        for key in pressed {
                            if let Err(err) = keys::press(&mut calc, key) {
                                println!("{}", paint(&err.to_string(), colours.error));
                            }
                        }
                        print_state(&calc, &colours);
                    }
                    Err((msg, pos)) => {
                        println!("  {}{}", " ".repeat(pos), paint("^", colours.carat));
                        println!("{}", paint(&msg, colours.error));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Pressing enter with no input will exit as well.");
                break;
            }
            Err(err) => {
                println!("{:?}", err);
                break;
            }
        }
    }

    Ok(())
}

pub struct Palette {
    integer: (u8, u8, u8),
    fraction: (u8, u8, u8),
    exponent: (u8, u8, u8),
    decimal: (u8, u8, u8),
    sign: (u8, u8, u8),
    equation: (u8, u8, u8),
    result: (u8, u8, u8),
    carat: (u8, u8, u8),
    error: (u8, u8, u8),
    message: (u8, u8, u8),
}

fn paint(text: &str, colour: (u8, u8, u8)) -> ColoredString {
    text.truecolor(colour.0, colour.1, colour.2)
}

fn run_command(
    command: &str,
    calc: &mut Calculator,
    logs: &mut LogControl,
    colours: &Palette,
    session: SessionConfig,
) -> Result<String, String> {
    let name = command.trim();
    if let Some(unit) = keys::angle_command(name) {
        calc.set_angle_unit(unit);
        return Ok(format!("Angle units set to {}.", unit.name()));
    }
    match name.to_ascii_lowercase().as_str() {
        "debug" => match logs.toggle_debug() {
            Ok(true) => Ok("Debug enabled".to_string()),
            Ok(false) => Ok("Debug disabled".to_string()),
            Err(err) => Err(err.to_string()),
        },
        "test" => {
            let (passed, total) = selftest::run_tests(colours, session);
            Ok(format!("{passed}/{total} tests passed."))
        }
        _ => Err("Unknown command!".to_string()),
    }
}

/// Shows the evaluated equation and its result, or the expression still
/// being built followed by the entry.
fn print_state(calc: &Calculator, colours: &Palette) {
    match (calc.outcome(), calc.last_equation()) {
        (Some(outcome), Some(equation)) => {
            println!("  {}", paint(equation, colours.equation));
            match outcome {
                Ok(text) => {
                    print!("  ");
                    for part in number_parts(text, colours) {
                        print!("{}", part);
                    }
                    println!();
                }
                Err(err) => println!("  {}", paint(&err.to_string(), colours.error)),
            }
        }
        _ => {
            let equation = calc.equation_display();
            if !equation.is_empty() {
                print!("  {} ", paint(&equation, colours.equation));
            } else {
                print!("  ");
            }
            println!("{}", paint(&calc.entry_display(), colours.result));
        }
    }
}

/// Splits a displayed number into sign, integer, point, fraction and
/// exponent pieces, each in its own colour.
fn number_parts(text: &str, colours: &Palette) -> Vec<ColoredString> {
    let mut result = Vec::new();
    let unsigned = match text.strip_prefix('-') {
        Some(rest) => {
            result.push(paint("-", colours.sign));
            rest
        }
        None => text,
    };
    if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
        result.push(paint(unsigned, colours.result));
        return result;
    }
    let (mantissa, exponent) = match unsigned.find('e') {
        Some(at) => unsigned.split_at(at),
        None => (unsigned, ""),
    };
    match mantissa.split_once('.') {
        Some((integer, fraction)) => {
            result.push(paint(integer, colours.integer));
            result.push(paint(".", colours.decimal));
            result.push(paint(fraction, colours.fraction));
        }
        None => result.push(paint(mantissa, colours.integer)),
    }
    if !exponent.is_empty() {
        result.push(paint(exponent, colours.exponent));
    }
    result
}
