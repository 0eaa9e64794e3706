//! The dimensional-analysis half of the crate: the unit catalog, dimensioned
//! values, the function registry, and configuration loading (§3, §4.7, §4.8).

pub mod catalog;
pub mod config;
pub mod functions;
pub mod value;

pub use catalog::{BaseUnit, Prefix, UnitCatalog, UnitRef};
pub use value::DimensionedValue;
