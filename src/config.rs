use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use scicalc::format::MIN_WIDTH;
use scicalc::{AngleUnit, DisplayFormat, SessionConfig, DEFAULT_PRECISION};

#[derive(Parser, Debug)]
#[command(author, version, about = "Arbitrary-precision keypad calculator", long_about = None)]
pub struct Args {
    /// Working precision in bits
    #[arg(long, default_value_t = DEFAULT_PRECISION, value_parser = clap::value_parser!(u32).range(64..))]
    pub precision: u32,

    /// Most digits shown after the point in fixed notation
    #[arg(long, default_value_t = 15)]
    pub decimals: usize,

    /// Significant digits shown in scientific notation
    #[arg(long, default_value_t = 15)]
    pub sig_digits: usize,

    /// Character budget of a displayed result
    #[arg(
        long,
        default_value_t = 24,
        value_parser = RangedU64ValueParser::<usize>::new().range((MIN_WIDTH as u64)..)
    )]
    pub width: usize,

    /// Unit for trigonometric arguments and results
    #[arg(long, value_enum, default_value_t = AngleArg::Degrees)]
    pub angle: AngleArg,

    /// Start with debug logging enabled
    #[arg(long)]
    pub debug: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AngleArg {
    Degrees,
    Radians,
    Gradians,
}

impl From<AngleArg> for AngleUnit {
    fn from(arg: AngleArg) -> Self {
        match arg {
            AngleArg::Degrees => AngleUnit::Degrees,
            AngleArg::Radians => AngleUnit::Radians,
            AngleArg::Gradians => AngleUnit::Gradians,
        }
    }
}

impl Args {
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            precision: self.precision,
            format: DisplayFormat {
                max_decimals: self.decimals,
                sig_digits: self.sig_digits.max(1),
                width: self.width,
                ..DisplayFormat::default()
            },
            angle_unit: self.angle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_library() {
        let args = Args::parse_from(["scicalc"]);
        assert_eq!(args.session_config(), SessionConfig::default());
    }

    #[test]
    fn flags_reach_the_session() {
        let args = Args::parse_from([
            "scicalc",
            "--precision",
            "256",
            "--width",
            "12",
            "--angle",
            "gradians",
        ]);
        let config = args.session_config();
        assert_eq!(config.precision, 256);
        assert_eq!(config.format.width, 12);
        assert_eq!(config.angle_unit, AngleUnit::Gradians);
        assert!(Args::try_parse_from(["scicalc", "--precision", "8"]).is_err());
    }

    #[test]
    fn width_has_a_floor() {
        assert!(Args::try_parse_from(["scicalc", "--width", "4"]).is_err());
        let args = Args::parse_from(["scicalc", "--width", "10"]);
        assert_eq!(args.session_config().format.width, MIN_WIDTH);
    }
}
