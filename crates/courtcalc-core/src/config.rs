// Configuration loading and parsing (courtcalc.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::engine::{DenominatorFloors, EvaluationConfig};

pub const CONFIG_FILE: &str = "courtcalc.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub evaluation: EvaluationConfig,
}

impl Config {
    /// `host:port` for the HTTP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ---------------------------------------------------------------------------
// courtcalc.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    server: ServerConfig,
    database: DatabaseConfig,
    #[serde(default)]
    evaluation: EvaluationSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

/// `[evaluation]` as written on disk; flattened names for the floors.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct EvaluationSection {
    max_results: usize,
    min_field_goal_attempts: f64,
    min_minutes_per_game: f64,
    min_games_played: f64,
}

impl Default for EvaluationSection {
    fn default() -> Self {
        let defaults = EvaluationConfig::default();
        EvaluationSection {
            max_results: defaults.max_results,
            min_field_goal_attempts: defaults.floors.field_goal_attempts,
            min_minutes_per_game: defaults.floors.minutes_per_game,
            min_games_played: defaults.floors.games_played,
        }
    }
}

impl From<EvaluationSection> for EvaluationConfig {
    fn from(section: EvaluationSection) -> Self {
        EvaluationConfig {
            max_results: section.max_results,
            floors: DenominatorFloors {
                field_goal_attempts: section.min_field_goal_attempts,
                minutes_per_game: section.min_minutes_per_game,
                games_played: section.min_games_played,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load `config/courtcalc.toml` relative to `base_dir`.
///
/// Does not copy defaults; `load_config()` handles that.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        server: file.server,
        database: file.database,
        evaluation: file.evaluation.into(),
    };

    validate(&config)?;

    Ok(config)
}

/// Copy any file in `defaults/` that is missing from `config/`.
/// Returns the files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let source = entry.path();
        if !source.is_file() {
            continue;
        }
        let Some(file_name) = source.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }

        let target = config_dir.join(file_name);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content =
                    std::fs::read(&source).map_err(|e| ConfigError::DefaultsCopyError {
                        message: format!("failed to read {}: {e}", source.display()),
                    })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            // Never overwrite a user's edited config.
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, seeding
/// `config/` from `defaults/` first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError {
            field: "server.port".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.database.path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    if config.evaluation.max_results == 0 {
        return Err(ConfigError::ValidationError {
            field: "evaluation.max_results".into(),
            message: "must be greater than 0".into(),
        });
    }

    let floors = &config.evaluation.floors;
    let floor_fields: &[(&str, f64)] = &[
        ("evaluation.min_field_goal_attempts", floors.field_goal_attempts),
        ("evaluation.min_minutes_per_game", floors.minutes_per_game),
        ("evaluation.min_games_played", floors.games_played),
    ];
    for (name, val) in floor_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite value >= 0, got {val}"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Workspace root, whether tests run from the crate dir or the repo root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn write_config(name: &str, body: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), body).unwrap();
        tmp
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = std::env::temp_dir().join("courtcalc_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("config").join(CONFIG_FILE),
        )
        .unwrap();

        let config = load_config_from(&tmp).expect("defaults should load");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.database.path, "courtcalc.db");
        assert_eq!(config.evaluation, EvaluationConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:5000");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn evaluation_section_is_optional() {
        let tmp = write_config(
            "courtcalc_config_no_eval",
            "[server]\nport = 8080\n\n[database]\npath = \"x.db\"\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.evaluation.max_results, 100);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn evaluation_overrides_apply() {
        let tmp = write_config(
            "courtcalc_config_eval",
            "[server]\nport = 8080\n\n[database]\npath = \"x.db\"\n\n\
             [evaluation]\nmax_results = 25\nmin_games_played = 0.0\n",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.evaluation.max_results, 25);
        assert_eq!(config.evaluation.floors.games_played, 0.0);
        assert_eq!(config.evaluation.floors.field_goal_attempts, 0.1);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_results() {
        let tmp = write_config(
            "courtcalc_config_zero_max",
            "[server]\nport = 8080\n\n[database]\npath = \"x.db\"\n\n\
             [evaluation]\nmax_results = 0\n",
        );
        let err = load_config_from(&tmp).unwrap_err();
        match err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "evaluation.max_results");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_floor() {
        let tmp = write_config(
            "courtcalc_config_neg_floor",
            "[server]\nport = 8080\n\n[database]\npath = \"x.db\"\n\n\
             [evaluation]\nmin_minutes_per_game = -1.0\n",
        );
        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ValidationError { ref field, .. } if field == "evaluation.min_minutes_per_game"
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_port() {
        let tmp = write_config(
            "courtcalc_config_zero_port",
            "[server]\nport = 0\n\n[database]\npath = \"x.db\"\n",
        );
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ValidationError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_when_missing() {
        let tmp = std::env::temp_dir().join("courtcalc_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::FileNotFound { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config("courtcalc_config_bad_toml", "[server\nport = ");
        assert!(matches!(
            load_config_from(&tmp),
            Err(ConfigError::ParseError { .. })
        ));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_skips_existing() {
        let tmp = std::env::temp_dir().join("courtcalc_config_ensure");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            defaults_dir.join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(defaults_dir.join("extra.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE).exists());
        assert!(!tmp.join("config/extra.toml.example").exists());

        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();
        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("courtcalc_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
