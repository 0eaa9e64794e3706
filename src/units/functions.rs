//! The function registry: default math functions plus the mechanism for
//! registering caller-supplied ones (§4.7, §6).

use crate::error::UnitError;
use crate::units::value::DimensionedValue;
use std::rc::Rc;

/// A registered callable, either unitless (operates on raw magnitudes and
/// rewraps the result as dimensionless) or dimension-preserving (receives
/// and returns full [`DimensionedValue`]s) — §4.7.
#[derive(Clone)]
pub enum Callable {
    Unitless(Rc<dyn Fn(&[f64]) -> f64>),
    Dimensioned(Rc<dyn Fn(&[DimensionedValue]) -> Result<DimensionedValue, UnitError>>),
}

impl Callable {
    pub fn apply(&self, name: &str, args: Vec<DimensionedValue>) -> Result<DimensionedValue, UnitError> {
        match self {
            Callable::Unitless(f) => {
                let mut magnitudes = Vec::with_capacity(args.len());
                for arg in &args {
                    if !arg.is_unitless() {
                        return Err(UnitError::DimensionMismatch(format!(
                            "function '{}' requires dimensionless arguments",
                            name
                        )));
                    }
                    magnitudes.push(arg.num);
                }
                let result = f(&magnitudes);
                let base_units = args
                    .first()
                    .map(|a| a.base_units.clone())
                    .unwrap_or_else(|| Rc::new(Vec::new()));
                Ok(DimensionedValue::from_num(result, base_units))
            }
            Callable::Dimensioned(f) => f(&args),
        }
    }
}

#[derive(Clone)]
pub struct FunctionEntry {
    pub arity: usize,
    pub callable: Callable,
}

impl FunctionEntry {
    pub fn unitless(arity: usize, f: impl Fn(&[f64]) -> f64 + 'static) -> Self {
        Self {
            arity,
            callable: Callable::Unitless(Rc::new(f)),
        }
    }

    pub fn dimensioned(
        arity: usize,
        f: impl Fn(&[DimensionedValue]) -> Result<DimensionedValue, UnitError> + 'static,
    ) -> Self {
        Self {
            arity,
            callable: Callable::Dimensioned(Rc::new(f)),
        }
    }
}

macro_rules! unary_unitless {
    ($name:expr, $f:expr) => {
        ($name.to_string(), FunctionEntry::unitless(1, |args| $f(args[0])))
    };
}

/// The default math-function set installed by `Expression::new` (§6).
///
/// `log`'s arity-2 signature but single-argument implementation is a
/// deliberate discrepancy, not a bug — see the crate-level documentation.
pub fn default_functions() -> Vec<(String, FunctionEntry)> {
    let mut fns = vec![
        unary_unitless!("sin", f64::sin),
        unary_unitless!("cos", f64::cos),
        unary_unitless!("tan", f64::tan),
        unary_unitless!("asin", f64::asin),
        unary_unitless!("acos", f64::acos),
        unary_unitless!("atan", f64::atan),
        unary_unitless!("sinh", f64::sinh),
        unary_unitless!("cosh", f64::cosh),
        unary_unitless!("tanh", f64::tanh),
        unary_unitless!("asinh", f64::asinh),
        unary_unitless!("acosh", f64::acosh),
        unary_unitless!("atanh", f64::atanh),
        unary_unitless!("exp", f64::exp),
        unary_unitless!("ln", f64::ln),
        unary_unitless!("log2", f64::log2),
        unary_unitless!("log10", f64::log10),
    ];
    fns.push((
        "log".to_string(),
        FunctionEntry::unitless(2, |args| args[0].ln()),
    ));
    fns.push((
        "sqrt".to_string(),
        FunctionEntry::dimensioned(1, |args| Ok(args[0].sqrt())),
    ));
    fns.push((
        "pow".to_string(),
        FunctionEntry::dimensioned(2, |args| args[0].pow(&args[1])),
    ));
    fns
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc as StdRc;

    fn units() -> StdRc<Vec<crate::units::catalog::BaseUnit>> {
        StdRc::new(Vec::new())
    }

    #[test]
    fn unitless_function_rejects_dimensioned_argument() {
        let entry = default_functions()
            .into_iter()
            .find(|(name, _)| name == "sin")
            .unwrap()
            .1;
        let mut v = DimensionedValue::from_num(
            1.0,
            StdRc::new(vec![crate::units::catalog::BaseUnit {
                name: "meter".into(),
                symbol: "m".into(),
            }]),
        );
        v.exponents[0] = crate::rational::Rational::from_integer(1);
        assert!(entry.callable.apply("sin", vec![v]).is_err());
    }

    #[test]
    fn log_ignores_its_second_argument() {
        let entry = default_functions()
            .into_iter()
            .find(|(name, _)| name == "log")
            .unwrap()
            .1;
        let a = DimensionedValue::from_num(std::f64::consts::E, units());
        let b = DimensionedValue::from_num(999.0, units());
        let result = entry.callable.apply("log", vec![a, b]).unwrap();
        assert!((result.num - 1.0).abs() < 1e-9);
    }

    #[test]
    fn sqrt_halves_exponents() {
        let entry = default_functions()
            .into_iter()
            .find(|(name, _)| name == "sqrt")
            .unwrap()
            .1;
        let base = StdRc::new(vec![crate::units::catalog::BaseUnit {
            name: "meter".into(),
            symbol: "m".into(),
        }]);
        let mut v = DimensionedValue::from_num(4.0, base);
        v.exponents[0] = crate::rational::Rational::from_integer(2);
        let result = entry.callable.apply("sqrt", vec![v]).unwrap();
        assert_eq!(result.exponents[0], crate::rational::Rational::from_integer(1));
    }
}
