//! The unit catalog: prefix × symbol resolution, ambiguous-decomposition
//! detection, and the function registry (§3, §4.7).

use crate::error::UnitError;
use crate::units::functions::FunctionEntry;
use crate::units::value::DimensionedValue;
use indexmap::IndexMap;
use log::warn;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct BaseUnit {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone)]
pub struct Prefix {
    pub name: String,
    pub symbol: String,
    pub multiplier: f64,
}

/// What a catalog key resolves to, independent of the prefix applied to it.
#[derive(Debug, Clone)]
pub enum UnitRef {
    Base(usize),
    Derived(Box<DimensionedValue>),
    Constant(Box<DimensionedValue>),
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub prefix_value: f64,
    pub unit: UnitRef,
}

/// Prefix × symbol resolution table plus the function registry, built once
/// at `Expression` construction and frozen thereafter (§4.9).
pub struct UnitCatalog {
    pub base_units: Rc<Vec<BaseUnit>>,
    pub prefixes: Vec<Prefix>,
    pub units: IndexMap<String, CatalogEntry>,
    pub functions: std::collections::HashMap<String, FunctionEntry>,
}

impl UnitCatalog {
    pub fn new(base_units: Vec<BaseUnit>) -> Self {
        let mut prefixes = Vec::new();
        // Sentinel empty-symbol prefix so unprefixed units are handled
        // uniformly (§3 "Unit catalog").
        prefixes.push(Prefix {
            name: String::new(),
            symbol: String::new(),
            multiplier: 1.0,
        });
        Self {
            base_units: Rc::new(base_units),
            prefixes,
            units: IndexMap::new(),
            functions: std::collections::HashMap::new(),
        }
    }

    pub fn add_prefix(&mut self, name: String, symbol: String, multiplier: f64) {
        self.prefixes.push(Prefix { name, symbol, multiplier });
    }

    /// Registers `prefix.symbol + unit_symbol` for every known prefix,
    /// rejecting any key collision (§4.9 step 2 and step 6's cross-product
    /// registration for derived units).
    pub fn register_unit(&mut self, unit_symbol: &str, unit: UnitRef) -> Result<(), UnitError> {
        for prefix in self.prefixes.clone() {
            let key = format!("{}{}", prefix.symbol, unit_symbol);
            self.insert_key(key, prefix.multiplier, unit.clone())?;
        }
        Ok(())
    }

    /// Registers a constant under its bare symbol only; constants ignore
    /// prefixes by construction (§4.7).
    pub fn register_constant(&mut self, symbol: &str, value: DimensionedValue) -> Result<(), UnitError> {
        self.insert_key(symbol.to_string(), 1.0, UnitRef::Constant(Box::new(value)))
    }

    fn insert_key(&mut self, key: String, prefix_value: f64, unit: UnitRef) -> Result<(), UnitError> {
        if let Some(existing) = self.units.get(&key) {
            return Err(UnitError::ConfigConflict {
                key: key.clone(),
                existing: describe(&existing.unit),
                new: describe(&unit),
            });
        }
        self.units.insert(key, CatalogEntry { prefix_value, unit });
        Ok(())
    }

    pub fn apply_synonym(&mut self, new_key: &str, existing_key: &str) -> Result<(), UnitError> {
        let entry = self
            .units
            .get(existing_key)
            .ok_or_else(|| UnitError::UnknownUnit(existing_key.to_string()))?
            .clone();
        self.insert_key(new_key.to_string(), entry.prefix_value, entry.unit)
    }

    pub fn remove_key(&mut self, key: &str) {
        self.units.shift_remove(key);
    }

    /// Resolves a unit name to a dimensioned value, trying a direct catalog
    /// hit first, then a decomposition search (§4.7).
    pub fn resolve_unit(&self, name: &str) -> Result<DimensionedValue, UnitError> {
        if let Some(entry) = self.units.get(name) {
            return Ok(self.value_of(entry));
        }
        let decompositions = self.find_decomposition(name);
        match decompositions.len() {
            0 => Err(UnitError::UnknownUnit(name.to_string())),
            1 => {
                let mut pieces = decompositions.into_iter().next().unwrap().into_iter();
                let first = pieces.next().expect("decomposition is non-empty");
                let mut acc = self.value_of(self.units.get(&first).expect("decomposition key exists"));
                for piece in pieces {
                    let entry = self.units.get(&piece).expect("decomposition key exists");
                    acc = acc.mul(&self.value_of(entry))?;
                }
                Ok(acc)
            }
            _ => Err(UnitError::AmbiguousUnit {
                name: name.to_string(),
                candidates: decompositions,
            }),
        }
    }

    fn value_of(&self, entry: &CatalogEntry) -> DimensionedValue {
        match &entry.unit {
            UnitRef::Base(index) => {
                DimensionedValue::base_unit(*index, entry.prefix_value, self.base_units.clone())
            }
            UnitRef::Derived(value) => value.mul_scalar(entry.prefix_value),
            UnitRef::Constant(value) => (**value).clone(),
        }
    }

    /// All ways to split `name` into a sequence of catalog keys, each
    /// rendered as the list of key strings in order (§4.7).
    pub fn find_decomposition(&self, name: &str) -> Vec<Vec<String>> {
        if name.is_empty() {
            return Vec::new();
        }
        let mut results = Vec::new();
        for end in 1..=name.len() {
            if !name.is_char_boundary(end) {
                continue;
            }
            let head = &name[..end];
            if !self.units.contains_key(head) {
                continue;
            }
            let rest = &name[end..];
            if rest.is_empty() {
                results.push(vec![head.to_string()]);
                continue;
            }
            for mut tail in self.find_decomposition(rest) {
                let mut piece = vec![head.to_string()];
                piece.append(&mut tail);
                results.push(piece);
            }
        }
        results
    }

    pub fn add_function(&mut self, name: String, entry: FunctionEntry) {
        if self.functions.contains_key(&name) {
            warn!("function '{}' is being redefined", name);
        }
        self.functions.insert(name, entry);
    }

    pub fn function_names(&self) -> Vec<String> {
        self.functions.keys().cloned().collect()
    }

    pub fn apply_function(
        &self,
        name: &str,
        args: Vec<DimensionedValue>,
    ) -> Result<DimensionedValue, UnitError> {
        let entry = self
            .functions
            .get(name)
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))?;
        if args.len() != entry.arity {
            return Err(UnitError::ArityMismatch {
                name: name.to_string(),
                expected: entry.arity,
                found: args.len(),
            });
        }
        entry.callable.apply(name, args)
    }
}

fn describe(unit: &UnitRef) -> String {
    match unit {
        UnitRef::Base(_) => "a base unit".to_string(),
        UnitRef::Derived(_) => "a derived unit".to_string(),
        UnitRef::Constant(_) => "a constant".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_catalog() -> UnitCatalog {
        let mut catalog = UnitCatalog::new(vec![
            BaseUnit { name: "meter".into(), symbol: "m".into() },
            BaseUnit { name: "second".into(), symbol: "s".into() },
        ]);
        catalog.add_prefix("nano".into(), "n".into(), 1e-9);
        catalog.register_unit("m", UnitRef::Base(0)).unwrap();
        catalog.register_unit("s", UnitRef::Base(1)).unwrap();
        catalog
    }

    #[test]
    fn direct_hit_resolves() {
        let catalog = simple_catalog();
        let v = catalog.resolve_unit("nm").unwrap();
        assert_eq!(v.num, 1e-9);
    }

    #[test]
    fn duplicate_key_is_a_conflict() {
        let mut catalog = simple_catalog();
        assert!(catalog.register_unit("m", UnitRef::Base(1)).is_err());
    }

    #[test]
    fn unknown_unit_with_no_decomposition_fails() {
        let catalog = simple_catalog();
        assert!(matches!(
            catalog.resolve_unit("xyz"),
            Err(UnitError::UnknownUnit(_))
        ));
    }

    #[test]
    fn single_decomposition_multiplies_pieces() {
        let catalog = simple_catalog();
        let v = catalog.resolve_unit("ms").unwrap();
        assert_eq!(v.num, 1.0);
        assert_eq!(v.exponents.len(), 2);
    }
}
