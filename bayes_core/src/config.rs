//! Engine configuration management via TOML files.
//!
//! The shading alphabet, smoothing constant, and evaluation fan-out all come
//! from configuration rather than compiled-in tables, so alternate alphabets
//! need no recompilation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::image::SymbolTable;
use crate::learner::evaluate::TASKS_PER_GROUP;
use crate::learner::model::DEFAULT_SMOOTHING;

/// Engine configuration loaded from a TOML file.
///
/// ```toml
/// [parser.symbols]
/// " " = 0
/// "+" = 1
/// "#" = 1
///
/// [model]
/// smoothing = 1.0
///
/// [evaluation]
/// tasks_per_group = 4
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Character → shading code table handed to the corpus parser.
    pub symbols: SymbolTable,
    /// Additive smoothing constant for training.
    pub smoothing: f32,
    /// Batches per label group in concurrent evaluation.
    pub tasks_per_group: usize,
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawEngineConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;

        let mut mappings = Vec::with_capacity(raw.parser.symbols.len());
        for (key, code) in &raw.parser.symbols {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => mappings.push((symbol, *code)),
                _ => {
                    return Err(ConfigError::Parse(format!(
                        "symbol key '{}' must be a single character",
                        key
                    )))
                }
            }
        }
        let symbols =
            SymbolTable::new(&mappings).map_err(|err| ConfigError::Parse(err.to_string()))?;

        if !raw.model.smoothing.is_finite() || raw.model.smoothing <= 0.0 {
            return Err(ConfigError::Parse(
                "model.smoothing must be positive".into(),
            ));
        }
        if raw.evaluation.tasks_per_group == 0 {
            return Err(ConfigError::Parse(
                "evaluation.tasks_per_group must be ≥ 1".into(),
            ));
        }

        Ok(Self {
            symbols,
            smoothing: raw.model.smoothing,
            tasks_per_group: raw.evaluation.tasks_per_group,
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolTable::binary(),
            smoothing: DEFAULT_SMOOTHING,
            tasks_per_group: TASKS_PER_GROUP,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEngineConfig {
    #[serde(default)]
    parser: RawParserConfig,
    #[serde(default)]
    model: RawModelConfig,
    #[serde(default)]
    evaluation: RawEvaluationConfig,
}

#[derive(Debug, Deserialize)]
struct RawParserConfig {
    #[serde(default = "default_symbols")]
    symbols: BTreeMap<String, u8>,
}

impl Default for RawParserConfig {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawModelConfig {
    #[serde(default = "default_smoothing")]
    smoothing: f32,
}

impl Default for RawModelConfig {
    fn default() -> Self {
        Self {
            smoothing: default_smoothing(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawEvaluationConfig {
    #[serde(default = "default_tasks_per_group")]
    tasks_per_group: usize,
}

impl Default for RawEvaluationConfig {
    fn default() -> Self {
        Self {
            tasks_per_group: default_tasks_per_group(),
        }
    }
}

fn default_symbols() -> BTreeMap<String, u8> {
    [(" ", 0), ("+", 1), ("#", 1)]
        .into_iter()
        .map(|(key, code)| (key.to_string(), code))
        .collect()
}

fn default_smoothing() -> f32 {
    DEFAULT_SMOOTHING
}

fn default_tasks_per_group() -> usize {
    TASKS_PER_GROUP
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config.symbols, SymbolTable::binary());
        assert_eq!(config.smoothing, DEFAULT_SMOOTHING);
        assert_eq!(config.tasks_per_group, TASKS_PER_GROUP);
    }

    #[test]
    fn test_parses_custom_values() {
        let toml = r##"
[parser.symbols]
" " = 0
"+" = 1
"#" = 2

[model]
smoothing = 0.5

[evaluation]
tasks_per_group = 8
"##;
        let config = EngineConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.symbols.shading_count(), 3);
        assert!((config.smoothing - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.tasks_per_group, 8);
    }

    #[test]
    fn test_rejects_non_positive_smoothing() {
        let result = EngineConfig::from_toml_str("[model]\nsmoothing = 0.0");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_zero_tasks_per_group() {
        let result = EngineConfig::from_toml_str("[evaluation]\ntasks_per_group = 0");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_multi_character_symbol() {
        let result = EngineConfig::from_toml_str("[parser.symbols]\n\"##\" = 1");
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_sparse_shading_codes() {
        let result = EngineConfig::from_toml_str("[parser.symbols]\n\" \" = 0\n\"#\" = 3");
        assert!(result.is_err());
    }
}
