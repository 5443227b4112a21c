use crate::number::Number;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
    Gradians,
}

impl AngleUnit {
    pub fn name(self) -> &'static str {
        match self {
            AngleUnit::Degrees => "degrees",
            AngleUnit::Radians => "radians",
            AngleUnit::Gradians => "gradians",
        }
    }

    /// Size of half a turn in this unit, `None` for radians.
    fn half_turn(self) -> Option<i32> {
        match self {
            AngleUnit::Degrees => Some(180),
            AngleUnit::Radians => None,
            AngleUnit::Gradians => Some(200),
        }
    }

    pub fn to_radians(self, angle: &Number) -> Number {
        match self.half_turn() {
            None => angle.clone(),
            Some(half) => {
                let precision = angle.prec();
                &(angle * &Number::pi(precision)) / &Number::from_i32(precision, half)
            }
        }
    }

    pub fn from_radians(self, radians: &Number) -> Number {
        match self.half_turn() {
            None => radians.clone(),
            Some(half) => {
                let precision = radians.prec();
                &(radians * &Number::from_i32(precision, half)) / &Number::pi(precision)
            }
        }
    }
}

/// Everything evaluation reads besides the tokens themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationContext {
    pub angle_unit: AngleUnit,
    pub answer: Number,
    pub memory: Number,
    precision: u32,
}

impl EvaluationContext {
    pub fn new(precision: u32, angle_unit: AngleUnit) -> Self {
        EvaluationContext {
            angle_unit,
            answer: Number::zero(precision),
            memory: Number::zero(precision),
            precision,
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_and_gradians_convert_through_pi() {
        let precision = 128;
        let right = Number::from_i32(precision, 90);
        let half_pi = &Number::pi(precision) / &Number::from_i32(precision, 2);
        let converted = AngleUnit::Degrees.to_radians(&right);
        assert!((&converted - &half_pi).is_negligible_against(&half_pi, 120));

        let grads = AngleUnit::Gradians.from_radians(&half_pi);
        assert!((grads.to_f64() - 100.0).abs() < 1e-30);

        assert_eq!(AngleUnit::Radians.to_radians(&right), right);
    }

    #[test]
    fn fresh_context_is_zeroed() {
        let context = EvaluationContext::new(64, AngleUnit::Radians);
        assert!(context.answer.is_zero());
        assert!(context.memory.is_zero());
        assert_eq!(context.precision(), 64);
    }
}
