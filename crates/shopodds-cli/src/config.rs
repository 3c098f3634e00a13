use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use shopodds_core::{CatalogError, GameData, Level as PlayerLevel};

const DEFAULT_LEVEL: PlayerLevel = 7;
const DEFAULT_ROLLS: u32 = 10;
const DEFAULT_DESIRED: u32 = 1;

/// Root configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ShopConfig {
    /// Replaces the built-in roster, pool sizes and rate table.
    #[serde(default)]
    pub game: Option<GameData>,
    #[serde(default)]
    pub defaults: QueryDefaults,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShopConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: ShopConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if let Some(game) = self.game.as_ref() {
            game.validate()?;
        }
        self.logging.normalize();
        let game = self.game_data();
        self.defaults.validate(&game)?;
        Ok(())
    }

    /// Game data to evaluate against, falling back to the built-in set.
    pub fn game_data(&self) -> GameData {
        self.game.clone().unwrap_or_else(GameData::builtin)
    }
}

/// Values used when the command line leaves them out.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QueryDefaults {
    #[serde(default = "default_level")]
    pub level: PlayerLevel,
    #[serde(default = "default_rolls")]
    pub rolls: u32,
    #[serde(default = "default_desired")]
    pub desired: u32,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            rolls: DEFAULT_ROLLS,
            desired: DEFAULT_DESIRED,
        }
    }
}

impl QueryDefaults {
    fn validate(&self, game: &GameData) -> Result<(), ValidationError> {
        if !game.level_rates.contains_level(self.level) {
            return Err(ValidationError::InvalidField {
                field: "defaults.level".to_string(),
                message: format!("level {} is missing from the rate table", self.level),
            });
        }
        Ok(())
    }
}

fn default_level() -> PlayerLevel {
    DEFAULT_LEVEL
}

fn default_rolls() -> u32 {
    DEFAULT_ROLLS
}

fn default_desired() -> u32 {
    DEFAULT_DESIRED
}

/// Logging goes to stderr unless `json_file` is set.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub json_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tracing_level: default_tracing_level(),
            json_file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "warn".to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
    #[error("game: {0}")]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOM_YAML: &str = r#"
game:
  copies_per_item:
    1: 30
    2: 25
  level_rates:
    1:
      1: 1.0
    2:
      1: 0.7
      2: 0.3
  items:
    - name: "Scout"
      tier: 1
    - name: "Knight"
      tier: 2
defaults:
  level: 2
  rolls: 25
logging:
  tracing_level: "debug"
"#;

    #[test]
    fn empty_document_uses_builtin_data() {
        let mut cfg: ShopConfig = serde_yaml::from_str("{}").expect("parse yaml");
        cfg.validate().expect("validate");
        assert_eq!(cfg.defaults, QueryDefaults::default());
        assert_eq!(cfg.game_data(), GameData::builtin());
        assert_eq!(cfg.logging.level(), Some(Level::WARN));
    }

    #[test]
    fn loads_custom_game_data() {
        let mut cfg: ShopConfig = serde_yaml::from_str(CUSTOM_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        let game = cfg.game_data();
        assert_eq!(game.items_in_tier(2), 1);
        assert_eq!(game.level_rates.rate(2, 2), 0.3);
        assert_eq!(cfg.defaults.rolls, 25);
        assert_eq!(cfg.defaults.desired, DEFAULT_DESIRED);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
    }

    #[test]
    fn rate_rows_must_sum_to_one() {
        let yaml = CUSTOM_YAML.replace("2: 0.3", "2: 0.5");
        let err = serde_yaml::from_str::<ShopConfig>(&yaml).expect_err("row sums to 1.2");
        assert!(err.to_string().contains("level 2"), "{err}");
    }

    #[test]
    fn rejects_default_level_outside_the_table() {
        let yaml = CUSTOM_YAML.replace("level: 2", "level: 9");
        let mut cfg: ShopConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("level 9 has no rates");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "defaults.level"
        ));
    }

    #[test]
    fn rejects_items_in_unknown_tiers() {
        let yaml = CUSTOM_YAML.replace("tier: 2", "tier: 4");
        let mut cfg: ShopConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("tier 4 has no pool size");
        assert!(matches!(
            err,
            ValidationError::Catalog(CatalogError::MissingTier { tier: 4, .. })
        ));
    }

    #[test]
    fn blank_tracing_level_falls_back() {
        let mut cfg: ShopConfig =
            serde_yaml::from_str("logging:\n  tracing_level: \"  \"\n").expect("parse");
        cfg.validate().expect("validate");
        assert_eq!(cfg.logging.tracing_level, "warn");
    }
}
