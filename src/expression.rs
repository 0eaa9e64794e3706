//! The public entry point: wires the lexer, parser tables, unit catalog and
//! function registry together (§4.9).

use crate::driver::Parser;
use crate::error::{ConfigError, ExprError, UnitError};
use crate::grammar::{EvalContext, Payload, ParserTables};
use crate::lexer::Lexer;
use crate::units::catalog::{BaseUnit, UnitRef};
use crate::units::config::{RawConfig, DEFAULT_CONFIG};
use crate::units::functions::default_functions;
use crate::units::value::DimensionedValue;
use crate::units::UnitCatalog;

/// A parser and dimensional-analysis evaluator built from a configuration
/// (§4.9). Construction is the expensive step; `parse` and `in_units_of`
/// are pure functions of the frozen tables and catalog built at that time.
pub struct Expression {
    lexer: Lexer,
    parser: Parser,
    catalog: UnitCatalog,
}

impl Expression {
    /// Builds an `Expression` from a JSON configuration document (§3
    /// "Configuration model", §6 "Configuration file").
    pub fn new(config_json: &str) -> Result<Self, ExprError> {
        let config = RawConfig::from_json(config_json)?;

        let base_units: Vec<BaseUnit> = config
            .base_units
            .iter()
            .map(|(name, symbol)| BaseUnit { name: name.clone(), symbol: symbol.clone() })
            .collect();
        let mut catalog = UnitCatalog::new(base_units);
        for (name, symbol, multiplier) in &config.prefixes {
            catalog.add_prefix(name.clone(), symbol.clone(), *multiplier);
        }
        for (index, (_, symbol)) in config.base_units.iter().enumerate() {
            catalog.register_unit(symbol, UnitRef::Base(index))?;
        }

        let tables = ParserTables::build(crate::grammar::rules::unit_expression_grammar());
        let mut lexer = Lexer::new();
        let parser = Parser::new(tables.productions, tables.table);

        for (name, entry) in default_functions() {
            catalog.add_function(name, entry);
        }
        lexer.set_function_names(&catalog.function_names());

        let mut expression = Self { lexer, parser, catalog };

        for (name, symbol, source) in &config.derived_units {
            let value = expression.parse(source)?;
            expression
                .catalog
                .register_unit(symbol, UnitRef::Derived(Box::new(value)))
                .map_err(|e| promote_registration_error(e, name))?;
        }
        for (name, symbol, source) in &config.constants {
            let value = expression.parse(source)?;
            expression
                .catalog
                .register_constant(symbol, value)
                .map_err(|e| promote_registration_error(e, name))?;
        }
        for (new_key, existing_key) in &config.synonyms {
            expression.catalog.apply_synonym(new_key, existing_key)?;
        }
        for key in &config.remove {
            expression.catalog.remove_key(key);
        }

        Ok(expression)
    }

    /// Builds an `Expression` from the bundled default SI-like
    /// configuration; infallible because the bundled configuration is
    /// known-good at compile time.
    pub fn new_default() -> Self {
        Self::new(DEFAULT_CONFIG).expect("bundled default configuration is always valid")
    }

    pub fn parse(&self, text: &str) -> Result<DimensionedValue, ExprError> {
        let tokens = self.lexer.tokenize(text)?;
        let ctx = EvalContext { catalog: &self.catalog };
        match self.parser.parse(text, &tokens, &ctx)? {
            Payload::Value(v) => Ok(v),
            other => unreachable!("the start production always yields a Value payload, found {:?}", other),
        }
    }

    /// Expresses `value` in units of `reference`; fails unless their ratio
    /// is dimensionless (§4.9).
    pub fn in_units_of(&self, value: &DimensionedValue, reference: &DimensionedValue) -> Result<f64, ExprError> {
        let ratio = value.div(reference)?;
        if !ratio.is_unitless() {
            return Err(UnitError::DimensionMismatch(format!(
                "cannot express {} in units of {}: dimensions differ",
                value, reference
            ))
            .into());
        }
        Ok(ratio.num)
    }

    /// Registers a new callable function and updates the lexer's `func`
    /// pattern so subsequent parses recognize it. Parses already performed
    /// are unaffected (§9 "Function registry pattern mutation").
    pub fn add_function(&mut self, name: &str, entry: crate::units::functions::FunctionEntry) {
        self.catalog.add_function(name.to_string(), entry);
        self.lexer.set_function_names(&self.catalog.function_names());
    }
}

impl Default for Expression {
    fn default() -> Self {
        Self::new_default()
    }
}

fn promote_registration_error(error: UnitError, item_name: &str) -> ExprError {
    match error {
        UnitError::ConfigConflict { key, existing, new } => ConfigError(format!(
            "could not register '{}': key '{}' conflicts ({} vs {})",
            item_name, key, existing, new
        ))
        .into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::functions::FunctionEntry;

    #[test]
    fn default_configuration_builds_successfully() {
        let _ = Expression::new_default();
    }

    #[test]
    fn addition_of_commensurable_lengths() {
        let expr = Expression::new_default();
        let nm = expr.parse("nm").unwrap();
        let angstrom5 = expr.parse("5 Angstrom").unwrap();
        let sum = nm.add(&angstrom5).unwrap();
        assert!((sum.num - 1.5e-9).abs() < 1e-20);
    }

    #[test]
    fn in_units_of_recovers_a_dimensionless_ratio() {
        let expr = Expression::new_default();
        let reference = expr.parse("nm").unwrap().add(&expr.parse("5 Angstrom").unwrap()).unwrap();
        let sample = expr.parse("200 sqrt(nN/EPa)").unwrap();
        let ratio = expr.in_units_of(&sample, &reference).unwrap();
        assert!((ratio - 0.0042163702).abs() < 1e-7);
    }

    #[test]
    fn juxtaposition_means_multiplication() {
        let expr = Expression::new_default();
        let v = expr.parse("2 * 3 m").unwrap();
        assert_eq!(v.num, 6.0);
        let meter_index = 0;
        assert_eq!(v.exponents[meter_index], crate::rational::Rational::from_integer(1));
    }

    #[test]
    fn repeated_unit_division_cancels_the_exponent() {
        let expr = Expression::new_default();
        let v = expr.parse("m s^-1 * s").unwrap();
        assert_eq!(v.num, 1.0);
        // base units are ordered m, kg, s, A, K, mol, cd in the bundled config.
        assert_eq!(v.exponents[0], crate::rational::Rational::from_integer(1));
        assert_eq!(v.exponents[2], crate::rational::Rational::from_integer(0));
    }

    #[test]
    fn mismatched_dimensions_on_addition_fail() {
        let expr = Expression::new_default();
        assert!(expr.parse("m + s").is_err());
    }

    #[test]
    fn unitless_function_rejects_dimensioned_argument() {
        let expr = Expression::new_default();
        assert!(expr.parse("sin(m)").is_err());
    }

    #[test]
    fn double_pow_operator_is_a_syntax_error() {
        let expr = Expression::new_default();
        let err = expr.parse("2^^3").unwrap_err();
        match err {
            ExprError::Syntax(e) => assert_eq!(e.position, 2),
            other => panic!("expected a syntax error, found {:?}", other),
        }
    }

    #[test]
    fn add_function_makes_it_parseable_immediately() {
        let mut expr = Expression::new_default();
        assert!(expr.parse("cube(2)").is_err());
        expr.add_function(
            "cube",
            FunctionEntry::unitless(1, |args| args[0] * args[0] * args[0]),
        );
        let v = expr.parse("cube(2)").unwrap();
        assert_eq!(v.num, 8.0);
    }
}
