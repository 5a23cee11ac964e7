use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing_subscriber::filter::LevelFilter;

use crate::ai::{Algorithm, DecisionTreeIngestor, DEFAULT_DEPTH, MAX_DEPTH, MIN_DEPTH};
use crate::ai::tree::DEFAULT_MAX_NODES;
use crate::error::ConfigError;
use crate::session::AiSettings;

/// Where the AI decision service lives.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    /// Caller-side bound on one AI request, in seconds. 0 disables it.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 0,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub algorithm: Algorithm,
    pub depth: u8,
    /// Ask the service to score the finished board and log any disagreement.
    pub cross_check_score: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            algorithm: Algorithm::default(),
            depth: DEFAULT_DEPTH,
            cross_check_score: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub max_nodes: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// The terminal UI owns stdout, so logs go here.
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: PathBuf::from("connect_four_arena.log"),
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub tree: TreeConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::read(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without validating it, so command-line overrides
    /// can still be applied before [`AppConfig::validate`].
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Like [`AppConfig::read`], falling back to defaults if the file does not
    /// exist. The caller validates.
    pub fn read_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.server.base_url.trim();
        let Some(rest) = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
        else {
            return Err(ConfigError::Validation(format!(
                "server.base_url must be an http(s) URL, got '{}'",
                self.server.base_url
            )));
        };
        if rest.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(
                "server.base_url is missing a host".into(),
            ));
        }
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&self.game.depth) {
            return Err(ConfigError::Validation(format!(
                "game.depth must be in [{MIN_DEPTH}, {MAX_DEPTH}]"
            )));
        }
        if self.tree.max_nodes == 0 {
            return Err(ConfigError::Validation(
                "tree.max_nodes must be > 0".into(),
            ));
        }
        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::Validation(format!(
                "logging.level '{}' is not a log level",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Settings for the match's AI turns.
    pub fn ai_settings(&self) -> AiSettings {
        AiSettings {
            algorithm: self.game.algorithm,
            depth: self.game.depth,
            timeout: self.server.request_timeout(),
        }
    }

    pub fn ingestor(&self) -> DecisionTreeIngestor {
        DecisionTreeIngestor::new(self.tree.max_nodes)
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
        assert_eq!(config.game.depth, 4);
        assert_eq!(config.game.algorithm, Algorithm::MinimaxAlphaBeta);
        assert_eq!(config.server.request_timeout(), None);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[game]
algorithm = "expectiminimax"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.game.algorithm, Algorithm::Expectiminimax);
        // Other fields should be defaults
        assert_eq!(config.game.depth, DEFAULT_DEPTH);
        assert_eq!(config.server.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_unknown_algorithm_fails_to_parse() {
        let result = toml::from_str::<AppConfig>("[game]\nalgorithm = \"alphabeta\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_depth_out_of_range() {
        for depth in [0, 1, 9, 20] {
            let mut config = AppConfig::default();
            config.game.depth = depth;
            assert!(config.validate().is_err(), "depth {depth} accepted");
        }
        for depth in [2, 8] {
            let mut config = AppConfig::default();
            config.game.depth = depth;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        for url in ["", "localhost:5000", "ftp://host", "http://"] {
            let mut config = AppConfig::default();
            config.server.base_url = url.to_string();
            assert!(config.validate().is_err(), "url '{url}' accepted");
        }
    }

    #[test]
    fn test_validation_rejects_zero_max_nodes() {
        let mut config = AppConfig::default();
        config.tree.max_nodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "chatty".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_and_settings() {
        let mut config = AppConfig::default();
        config.server.request_timeout_secs = 15;
        config.game.depth = 6;
        let settings = config.ai_settings();
        assert_eq!(settings.timeout, Some(Duration::from_secs(15)));
        assert_eq!(settings.depth, 6);
        assert_eq!(settings.algorithm, Algorithm::MinimaxAlphaBeta);
    }

    #[test]
    fn test_read_or_default_missing_file() {
        let config = AppConfig::read_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_override_rescues_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.toml");
        std::fs::write(&path, "[game]\ndepth = 12\n").unwrap();

        let mut config = AppConfig::read_or_default(&path).unwrap();
        assert_eq!(config.game.depth, 12);
        assert!(config.validate().is_err());

        config.game.depth = 4;
        config.validate().expect("override brings depth back in range");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[server]
base_url = "http://10.0.0.5:8080"

[game]
depth = 6
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.game.depth, 6);
        // Others are defaults
        assert_eq!(config.tree.max_nodes, DEFAULT_MAX_NODES);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[game]\ndepth = 12\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));

        std::fs::write(&path, "[game\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml().unwrap();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config, AppConfig::default());
    }
}
