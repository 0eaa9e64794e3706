//! Dimensioned values: a magnitude paired with a rational exponent vector
//! (§3, §4.8).

use crate::error::UnitError;
use crate::rational::{rational_from_f64, Rational};
use crate::units::catalog::BaseUnit;
use num_traits::Zero;
use std::fmt::{self, Display, Formatter};
use std::rc::Rc;

/// A magnitude with an exponent vector over a shared base-unit list.
///
/// Two values are combinable only if `Rc::ptr_eq` holds between their
/// `base_units` handles (§9 "Base-unit identity") — structural equality of
/// the base unit lists is deliberately never consulted, matching the
/// reference implementation's `id(self.base_units) != id(other.base_units)`
/// check.
#[derive(Debug, Clone)]
pub struct DimensionedValue {
    pub num: f64,
    pub exponents: Vec<Rational>,
    pub base_units: Rc<Vec<BaseUnit>>,
}

impl DimensionedValue {
    pub fn from_num(num: f64, base_units: Rc<Vec<BaseUnit>>) -> Self {
        let exponents = vec![Rational::zero(); base_units.len()];
        Self { num, exponents, base_units }
    }

    pub fn base_unit(index: usize, num: f64, base_units: Rc<Vec<BaseUnit>>) -> Self {
        let mut exponents = vec![Rational::zero(); base_units.len()];
        exponents[index] = Rational::from_integer(1);
        Self { num, exponents, base_units }
    }

    pub fn is_unitless(&self) -> bool {
        self.exponents.iter().all(|e| e.is_zero())
    }

    fn combinable_with(&self, other: &Self) -> Result<(), UnitError> {
        if Rc::ptr_eq(&self.base_units, &other.base_units) {
            Ok(())
        } else {
            Err(UnitError::DimensionMismatch(
                "cannot combine numbers with different base units".to_string(),
            ))
        }
    }

    pub fn add(&self, other: &Self) -> Result<Self, UnitError> {
        self.combinable_with(other)?;
        if self.exponents != other.exponents {
            return Err(UnitError::DimensionMismatch(format!(
                "cannot add units: {} + {}",
                self, other
            )));
        }
        Ok(Self {
            num: self.num + other.num,
            exponents: self.exponents.clone(),
            base_units: self.base_units.clone(),
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self, UnitError> {
        self.combinable_with(other)?;
        if self.exponents != other.exponents {
            return Err(UnitError::DimensionMismatch(format!(
                "cannot subtract units: {} - {}",
                self, other
            )));
        }
        Ok(Self {
            num: self.num - other.num,
            exponents: self.exponents.clone(),
            base_units: self.base_units.clone(),
        })
    }

    pub fn mul(&self, other: &Self) -> Result<Self, UnitError> {
        self.combinable_with(other)?;
        let exponents = self
            .exponents
            .iter()
            .zip(other.exponents.iter())
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            num: self.num * other.num,
            exponents,
            base_units: self.base_units.clone(),
        })
    }

    pub fn div(&self, other: &Self) -> Result<Self, UnitError> {
        self.combinable_with(other)?;
        let exponents = self
            .exponents
            .iter()
            .zip(other.exponents.iter())
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            num: self.num / other.num,
            exponents,
            base_units: self.base_units.clone(),
        })
    }

    pub fn mul_scalar(&self, k: f64) -> Self {
        Self {
            num: self.num * k,
            exponents: self.exponents.clone(),
            base_units: self.base_units.clone(),
        }
    }

    pub fn neg(&self) -> Self {
        Self {
            num: -self.num,
            exponents: self.exponents.clone(),
            base_units: self.base_units.clone(),
        }
    }

    /// `self ** power`, where `power` must be dimensionless (§4.8).
    pub fn pow(&self, power: &Self) -> Result<Self, UnitError> {
        self.combinable_with(power)?;
        if !power.is_unitless() {
            return Err(UnitError::DimensionMismatch(format!(
                "cannot use unit in exponent: {}",
                power
            )));
        }
        let exponent = rational_from_f64(power.num);
        let exponents = self.exponents.iter().map(|e| e * exponent).collect();
        Ok(Self {
            num: self.num.powf(power.num),
            exponents,
            base_units: self.base_units.clone(),
        })
    }

    /// `sqrt(self)`: dimension-preserving, halves every exponent exactly.
    pub fn sqrt(&self) -> Self {
        let half = Rational::new(1, 2);
        Self {
            num: self.num.sqrt(),
            exponents: self.exponents.iter().map(|e| e * half).collect(),
            base_units: self.base_units.clone(),
        }
    }
}

impl PartialEq for DimensionedValue {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.base_units, &other.base_units)
            && self.exponents == other.exponents
            && self.num == other.num
    }
}

impl Display for DimensionedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.12}", Precision12(self.num))?;
        for (exponent, unit) in self.exponents.iter().zip(self.base_units.iter()) {
            if !exponent.is_zero() {
                if *exponent == Rational::from_integer(1) {
                    write!(f, " {}", unit.symbol)?;
                } else {
                    write!(f, " {}^{}", unit.symbol, exponent)?;
                }
            }
        }
        Ok(())
    }
}

/// Formats a float to 12 significant digits (`%.12g` in the reference
/// implementation), trimming trailing zeros the way `%g` does.
struct Precision12(f64);

impl Display for Precision12 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let x = self.0;
        if x == 0.0 {
            return write!(f, "0");
        }
        let magnitude = x.abs().log10().floor() as i32;
        if !(-4..12).contains(&magnitude) {
            let precision = 11usize;
            let s = format!("{:.*e}", precision, x);
            write!(f, "{}", trim_float(&s))
        } else {
            let decimals = (11 - magnitude).max(0) as usize;
            let s = format!("{:.*}", decimals, x);
            write!(f, "{}", trim_float(&s))
        }
    }
}

fn trim_float(s: &str) -> String {
    if let Some(e_pos) = s.find(['e', 'E']) {
        let (mantissa, exp) = s.split_at(e_pos);
        format!("{}e{}", trim_float(mantissa), normalize_exponent(&exp[1..]))
    } else if s.contains('.') {
        let trimmed = s.trim_end_matches('0');
        trimmed.trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

fn normalize_exponent(exp: &str) -> String {
    let (sign, digits) = if let Some(rest) = exp.strip_prefix('-') {
        ("-", rest)
    } else if let Some(rest) = exp.strip_prefix('+') {
        ("+", rest)
    } else {
        ("+", exp)
    };
    let digits = if digits.len() < 2 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    format!("{}{}", sign, digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: usize) -> Rc<Vec<BaseUnit>> {
        Rc::new(
            (0..n)
                .map(|i| BaseUnit {
                    name: format!("unit{}", i),
                    symbol: format!("u{}", i),
                })
                .collect(),
        )
    }

    #[test]
    fn add_then_subtract_round_trips() {
        let base = units(1);
        let a = DimensionedValue::base_unit(0, 3.0, base.clone());
        let b = DimensionedValue::base_unit(0, 2.0, base);
        let added = a.add(&b).unwrap();
        let back = added.sub(&b).unwrap();
        assert!((back.num - a.num).abs() < 1e-9);
        assert_eq!(back.exponents, a.exponents);
    }

    #[test]
    fn mismatched_base_units_are_rejected() {
        let a = DimensionedValue::from_num(1.0, units(1));
        let b = DimensionedValue::from_num(1.0, units(1));
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn pow_scales_exponents() {
        let base = units(2);
        let mut v = DimensionedValue::from_num(4.0, base.clone());
        v.exponents[0] = Rational::from_integer(1);
        v.exponents[1] = Rational::from_integer(-2);
        let two = DimensionedValue::from_num(2.0, base);
        let squared = v.pow(&two).unwrap();
        assert_eq!(squared.exponents[0], Rational::from_integer(2));
        assert_eq!(squared.exponents[1], Rational::from_integer(-4));
    }

    #[test]
    fn display_formats_single_exponent() {
        let base = units(1);
        let v = DimensionedValue::base_unit(0, 1.5e-9, base);
        assert_eq!(v.to_string(), "1.5e-09 u0");
    }
}
