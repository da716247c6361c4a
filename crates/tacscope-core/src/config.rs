use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::types::OpCategory;

/// File name searched for by [`Config::load_or_default`].
pub const CONFIG_FILE_NAME: &str = ".tacscope.toml";

/// Top-level configuration from `.tacscope.toml`.
///
/// Only comparison thresholds are read from disk. The tagger's word tables
/// and the cost weights are fixed; a `[tagger]` or `[costs]` section is
/// rejected as an unknown field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
}

/// Word tables used by the lexical tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    pub keywords: Vec<String>,
    pub directives: Vec<String>,
}

pub const DEFAULT_KEYWORDS: [&str; 29] = [
    "int", "float", "char", "double", "return", "if", "else", "for", "while", "void", "break",
    "continue", "struct", "class", "const", "unsigned", "signed", "long", "short", "sizeof",
    "typedef", "enum", "union", "static", "extern", "auto", "register", "volatile", "inline",
];

pub const DEFAULT_DIRECTIVES: [&str; 10] = [
    "include", "define", "ifdef", "ifndef", "endif", "pragma", "if", "else", "elif", "undef",
];

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            directives: DEFAULT_DIRECTIVES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Cost weight per operation category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostTable {
    pub multiplication: u32,
    pub division: u32,
    pub modulo: u32,
    pub addition: u32,
    pub subtraction: u32,
    pub comparison: u32,
    pub assignment: u32,
    pub return_: u32,
    pub control_flow: u32,
    pub other: u32,
}

impl Default for CostTable {
    fn default() -> Self {
        Self {
            multiplication: 10,
            division: 10,
            modulo: 9,
            addition: 5,
            subtraction: 5,
            comparison: 4,
            assignment: 3,
            return_: 2,
            control_flow: 2,
            other: 1,
        }
    }
}

impl CostTable {
    /// Weight for a category. Pure lookup.
    pub fn cost_of(&self, category: OpCategory) -> u32 {
        match category {
            OpCategory::Multiplication => self.multiplication,
            OpCategory::Division => self.division,
            OpCategory::Modulo => self.modulo,
            OpCategory::Addition => self.addition,
            OpCategory::Subtraction => self.subtraction,
            OpCategory::Assignment => self.assignment,
            OpCategory::Return => self.return_,
            OpCategory::Comparison => self.comparison,
            OpCategory::ControlFlow => self.control_flow,
            OpCategory::Other => self.other,
        }
    }
}

/// Thresholds for `tacscope compare`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RulesConfig {
    /// Minimum cost reduction percentage for a comparison to pass.
    #[serde(default)]
    pub min_cost_reduction: Option<f64>,
}

impl Config {
    /// Load configuration from a `.tacscope.toml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "failed to parse '{}'. Run `tacscope init` to create a valid config file",
                path.display()
            )
        })?;
        config
            .validate()
            .with_context(|| format!("invalid configuration in '{}'", path.display()))?;
        Ok(config)
    }

    /// Load from `.tacscope.toml` in the given directory or any ancestor, or return defaults.
    pub fn load_or_default(dir: &Path) -> Self {
        let start = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        let mut current = start.as_path();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!("loaded config from {}", config_path.display());
                        config
                    }
                    Err(e) => {
                        tracing::warn!(
                            "failed to load config from '{}': {e:#}. Using defaults.",
                            config_path.display()
                        );
                        Self::default()
                    }
                };
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(min) = self.rules.min_cost_reduction {
            if !min.is_finite() || min < 0.0 {
                return Err(ConfigError::InvalidThreshold(min));
            }
        }
        Ok(())
    }

    /// Generate default TOML content for `tacscope init`.
    pub fn default_toml() -> String {
        r#"# tacscope configuration

[rules]
# Fail `tacscope compare` when the cost reduction is below this percentage
# min_cost_reduction = 20.0
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rules.min_cost_reduction.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_tagger_tables() {
        let tables = TaggerConfig::default();
        assert_eq!(tables.keywords.len(), 29);
        assert!(tables.keywords.contains(&"volatile".to_string()));
        assert!(tables.directives.contains(&"include".to_string()));
    }

    #[test]
    fn test_default_cost_table_matches_weights() {
        let table = CostTable::default();
        let expected = [
            (OpCategory::Multiplication, 10),
            (OpCategory::Division, 10),
            (OpCategory::Modulo, 9),
            (OpCategory::Addition, 5),
            (OpCategory::Subtraction, 5),
            (OpCategory::Comparison, 4),
            (OpCategory::Assignment, 3),
            (OpCategory::Return, 2),
            (OpCategory::ControlFlow, 2),
            (OpCategory::Other, 1),
        ];
        for (category, cost) in expected {
            assert_eq!(table.cost_of(category), cost, "{category}");
        }
    }

    #[test]
    fn test_default_toml_is_valid() {
        let toml_str = Config::default_toml();
        let config: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_deserialize_rules() {
        let toml_str = r#"
[rules]
min_cost_reduction = 25.5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rules.min_cost_reduction, Some(25.5));
    }

    #[test]
    fn test_cost_and_tagger_sections_are_rejected() {
        for toml_str in ["[costs]\nmultiplication = 1\n", "[tagger]\nkeywords = [\"main\"]\n"] {
            let err = toml::from_str::<Config>(toml_str).unwrap_err();
            assert!(err.to_string().contains("unknown field"), "{err}");
        }
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let config = Config {
            rules: RulesConfig {
                min_cost_reduction: Some(-1.0),
            },
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold(-1.0)));
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[rules\nmin_cost_reduction = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains(".tacscope.toml"), "{err:#}");
    }

    #[test]
    fn test_load_or_default_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[rules]\nmin_cost_reduction = 15.0\n",
        )
        .unwrap();
        let nested = dir.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Config::load_or_default(&nested);
        assert_eq!(config.rules.min_cost_reduction, Some(15.0));
    }

    #[test]
    fn test_load_or_default_ignores_cost_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[costs]\nother = 7\n").unwrap();
        let config = Config::load_or_default(dir.path());
        assert_eq!(config, Config::default());
    }
}
