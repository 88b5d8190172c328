//! Generator configuration.
//!
//! Loaded from JSON or RON (picked by file extension). Every loader validates
//! before returning, so a `GeneratorConfig` in hand is always usable.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_NOISE_CACHE_CAPACITY;
use crate::error::{GenError, Result};
use crate::generation::{ContradictionPolicy, DungeonParams};
use crate::logging::TracingConfig;
use crate::terrain::TerrainSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub terrain: TerrainSettings,
    pub dungeon: DungeonParams,
    pub noise_cache_capacity: usize,
    pub contradiction: ContradictionPolicy,
    pub tracing: TracingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            terrain: TerrainSettings::default(),
            dungeon: DungeonParams::default(),
            noise_cache_capacity: DEFAULT_NOISE_CACHE_CAPACITY,
            contradiction: ContradictionPolicy::default(),
            tracing: TracingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GenError::ConfigParse(format!("JSON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)
            .map_err(|e| GenError::ConfigParse(format!("RON parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.json` or `.ron` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("ron") => Self::from_ron(&content),
            other => Err(GenError::ConfigParse(format!(
                "unsupported config extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<()> {
        self.terrain.validate()?;
        self.tracing.validate()?;
        if self.dungeon.min_rooms > self.dungeon.max_rooms {
            return Err(GenError::InvalidConfig(format!(
                "min_rooms {} exceeds max_rooms {}",
                self.dungeon.min_rooms, self.dungeon.max_rooms
            )));
        }
        if self.noise_cache_capacity == 0 {
            return Err(GenError::InvalidConfig(
                "noise_cache_capacity must be at least 1".into(),
            ));
        }
        if let ContradictionPolicy::Restart { max_attempts: 0 } = self.contradiction {
            return Err(GenError::InvalidConfig(
                "restart policy needs at least one attempt".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::DungeonStyle;

    #[test]
    fn test_default_is_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, 42);
        assert_eq!(config.dungeon.style, DungeonStyle::Ruins);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = GeneratorConfig::default();
        config.seed = 7;
        config.contradiction = ContradictionPolicy::Restart { max_attempts: 4 };
        let parsed = GeneratorConfig::from_json(&config.to_json()).unwrap();
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.contradiction, config.contradiction);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GeneratorConfig::from_json(r#"{"seed": 9, "dungeon": {"style": "crypt"}}"#)
            .unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.dungeon.style, DungeonStyle::Crypt);
        assert_eq!(config.dungeon.max_rooms, 20);
        assert_eq!(config.terrain.sea_level, 0.35);
    }

    #[test]
    fn test_ron_config() {
        let config = GeneratorConfig::from_ron(
            "(seed: 5, noise_cache_capacity: 8, contradiction: restart(max_attempts: 2))",
        )
        .unwrap();
        assert_eq!(config.seed, 5);
        assert_eq!(config.noise_cache_capacity, 8);
        assert_eq!(config.contradiction, ContradictionPolicy::Restart { max_attempts: 2 });
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_rooms = r#"{"dungeon": {"min_rooms": 9, "max_rooms": 3}}"#;
        assert!(matches!(
            GeneratorConfig::from_json(bad_rooms),
            Err(GenError::InvalidConfig(_))
        ));

        let bad_sea = r#"{"terrain": {"sea_level": 1.5}}"#;
        assert!(matches!(
            GeneratorConfig::from_json(bad_sea),
            Err(GenError::InvalidConfig(_))
        ));

        let bad_cache = r#"{"noise_cache_capacity": 0}"#;
        assert!(GeneratorConfig::from_json(bad_cache).is_err());

        let bad_restart = r#"{"contradiction": {"restart": {"max_attempts": 0}}}"#;
        assert!(GeneratorConfig::from_json(bad_restart).is_err());
    }

    #[test]
    fn test_malformed_input() {
        assert!(matches!(
            GeneratorConfig::from_json("{not json"),
            Err(GenError::ConfigParse(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_ron("(seed: )"),
            Err(GenError::ConfigParse(_))
        ));
    }
}
