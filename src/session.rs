//! One calculator session: the buffers, the evaluation context and the
//! last result, driven command by command.

use std::time::{SystemTime, UNIX_EPOCH};

use rug::rand::RandState;
use rug::Integer;
use tracing::debug;

use crate::context::{AngleUnit, EvaluationContext};
use crate::entry::EntryBuffer;
use crate::equation::EquationBuffer;
use crate::error::Result;
use crate::expand::evaluate_tokens;
use crate::format::DisplayFormat;
use crate::number::{Number, DEFAULT_PRECISION};
use crate::token::render_equation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Mantissa bits of every value the session creates.
    pub precision: u32,
    pub format: DisplayFormat,
    pub angle_unit: AngleUnit,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            precision: DEFAULT_PRECISION,
            format: DisplayFormat::default(),
            angle_unit: AngleUnit::default(),
        }
    }
}

pub struct Calculator {
    pub(crate) entry: EntryBuffer,
    pub(crate) equation: EquationBuffer,
    pub(crate) context: EvaluationContext,
    pub(crate) format: DisplayFormat,
    rand: RandState<'static>,
    /// The last command was `equals`; the next key starts a new expression.
    pub(crate) evaluated: bool,
    history: Option<String>,
    outcome: Option<Result<String>>,
}

impl Calculator {
    pub fn new(config: SessionConfig) -> Self {
        let mut rand = RandState::new();
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        rand.seed(&Integer::from(seed));

        Calculator {
            entry: EntryBuffer::new(),
            equation: EquationBuffer::new(),
            context: EvaluationContext::new(config.precision, config.angle_unit),
            format: config.format,
            rand,
            evaluated: false,
            history: None,
            outcome: None,
        }
    }

    pub fn precision(&self) -> u32 {
        self.context.precision()
    }

    pub fn entry_display(&self) -> String {
        self.entry.display()
    }

    /// The expression built so far, typographically rendered.
    pub fn equation_display(&self) -> String {
        render_equation(self.equation.tokens())
    }

    /// The last evaluated equation followed by `=`.
    pub fn last_equation(&self) -> Option<&str> {
        self.history.as_deref()
    }

    /// Result of the last `equals`, until new input starts an expression.
    pub fn outcome(&self) -> Option<&Result<String>> {
        self.outcome.as_ref()
    }

    /// The last outcome as display text, error messages included.
    pub fn result_display(&self) -> Option<String> {
        self.outcome.as_ref().map(|outcome| match outcome {
            Ok(text) => text.clone(),
            Err(err) => err.to_string(),
        })
    }

    pub fn answer(&self) -> &Number {
        &self.context.answer
    }

    pub fn memory(&self) -> &Number {
        &self.context.memory
    }

    pub fn angle_unit(&self) -> AngleUnit {
        self.context.angle_unit
    }

    pub fn set_angle_unit(&mut self, unit: AngleUnit) {
        debug!(unit = unit.name(), "angle unit");
        self.context.angle_unit = unit;
    }

    pub fn open_parens(&self) -> usize {
        self.equation.open_parens()
    }

    /// Commits the entry, completes the expression and evaluates it. The
    /// answer becomes the result, or zero on error. Pressing `=` again
    /// without new input returns the same outcome.
    pub fn equals(&mut self) -> Result<String> {
        if self.evaluated {
            if let Some(outcome) = &self.outcome {
                return outcome.clone();
            }
        }

        self.commit_entry();
        self.complete_equation();
        let tokens = self.equation.tokens().to_vec();
        self.history = Some(format!("{} =", render_equation(&tokens)));

        let outcome = match evaluate_tokens(&tokens, &self.context) {
            Ok(value) => {
                let text = self.format.format(&value);
                self.context.answer = value;
                Ok(text)
            }
            Err(err) => {
                self.context.answer = Number::zero(self.precision());
                Err(err)
            }
        };
        debug!(?outcome, "equals");

        self.equation.clear();
        self.entry.clear();
        self.evaluated = true;
        self.outcome = Some(outcome.clone());
        outcome
    }

    /// Resets both buffers. Memory, the answer and the angle unit survive.
    pub fn all_clear(&mut self) {
        self.entry.clear();
        self.equation.clear();
        self.evaluated = false;
        self.history = None;
        self.outcome = None;
    }

    /// The value memory keys act on: the answer right after `equals`,
    /// otherwise the entry.
    fn current_value(&self) -> Result<Number> {
        if self.evaluated {
            Ok(self.context.answer.clone())
        } else {
            self.entry.value(self.precision())
        }
    }

    pub fn memory_add(&mut self) -> Result<()> {
        let value = self.current_value()?;
        self.context.memory = &self.context.memory + &value;
        Ok(())
    }

    pub fn memory_subtract(&mut self) -> Result<()> {
        let value = self.current_value()?;
        self.context.memory = &self.context.memory - &value;
        Ok(())
    }

    /// Loads the memory into the entry as it would be displayed.
    pub fn memory_recall(&mut self) {
        let text = self.format.format(&self.context.memory);
        self.resume_entry();
        self.entry.load(&text);
    }

    pub fn memory_clear(&mut self) {
        self.context.memory = Number::zero(self.precision());
    }

    /// Loads a uniform value in [0, 1) into the entry.
    pub fn random(&mut self) {
        let value = Number::random(self.precision(), &mut self.rand);
        let text = self.format.format(&value);
        self.resume_entry();
        self.entry.load(&text);
    }

    /// Leaves the evaluated state without touching the stored answer.
    pub(crate) fn start_new_expression(&mut self) {
        self.equation.clear();
        self.entry.clear();
        self.evaluated = false;
        self.outcome = None;
    }

    /// Entry keys pressed after `equals` start over.
    pub(crate) fn resume_entry(&mut self) {
        if self.evaluated {
            self.start_new_expression();
        }
    }
}
