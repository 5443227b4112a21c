//! Arbitrary-precision keypad calculator engine.
//!
//! A [`Calculator`] is driven one key at a time. Digits collect in an entry
//! buffer; operators, functions, constants and parentheses commit tokens to
//! an equation buffer. `equals` expands function groups innermost first,
//! runs the flattened text through a shunting-yard parser and evaluates the
//! postfix form with MPFR floats.
//!
//! ```no_run
//! use scicalc::{Calculator, Operator, SessionConfig};
//!
//! let mut calc = Calculator::new(SessionConfig::default());
//! calc.digit('1');
//! calc.operator(Operator::Add);
//! calc.digit('2');
//! assert_eq!(calc.equals().as_deref(), Ok("3"));
//! ```

mod builder;
pub mod context;
pub mod entry;
pub mod equation;
pub mod error;
pub mod eval;
pub mod expand;
pub mod format;
pub mod number;
pub mod parser;
pub mod session;
pub mod token;

pub use context::{AngleUnit, EvaluationContext};
pub use error::{CalcError, Result};
pub use format::DisplayFormat;
pub use number::{Number, DEFAULT_PRECISION};
pub use session::{Calculator, SessionConfig};
pub use token::{Constant, FunctionKind, Operator, Token};
