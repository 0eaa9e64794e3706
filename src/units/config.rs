//! JSON configuration model (§3 "Configuration model (expansion)", §6).

use serde::Deserialize;
use std::collections::HashMap;

/// The bundled default configuration (§3), embedded so `Expression::new_default`
/// needs no filesystem access, mirroring the reference implementation's
/// package-relative `config.json`.
pub const DEFAULT_CONFIG: &str = include_str!("../default_config.json");

#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(rename = "base units")]
    pub base_units: Vec<(String, String)>,
    pub prefixes: Vec<(String, String, f64)>,
    #[serde(rename = "derived units")]
    pub derived_units: Vec<(String, String, String)>,
    pub constants: Vec<(String, String, String)>,
    #[serde(default)]
    pub synonyms: HashMap<String, String>,
    #[serde(default)]
    pub remove: Vec<String>,
}

impl RawConfig {
    pub fn from_json(text: &str) -> Result<Self, crate::error::ConfigError> {
        serde_json::from_str(text)
            .map_err(|e| crate::error::ConfigError(format!("invalid configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_default_config_parses() {
        let config = RawConfig::from_json(DEFAULT_CONFIG).unwrap();
        assert!(config.base_units.iter().any(|(_, symbol)| symbol == "m"));
        assert!(config.prefixes.iter().any(|(_, symbol, _)| symbol == "n"));
        assert!(config.derived_units.iter().any(|(_, symbol, _)| symbol == "N"));
        assert!(config.constants.iter().any(|(_, symbol, _)| symbol == "c"));
    }
}
