//! Loading `paf_match.toml`.
//!
//! Every key has a default, so a missing file or an empty table yields
//! [`MatchConfig::default`].

use std::path::{Path, PathBuf};

use paf_match_address_models::MatchConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "PAF_MATCH_CONFIG";

/// Config file name looked up in the project root.
pub const DEFAULT_CONFIG_FILE: &str = "paf_match.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`MatchConfig`].
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        /// Path of the config file.
        path: String,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Picks the config file: `explicit` if given, then `$PAF_MATCH_CONFIG`,
/// then `paf_match.toml` under `root`.
#[must_use]
pub fn config_path(explicit: Option<&Path>, root: &Path) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE))
}

/// Parses configuration from TOML text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the text is not valid.
pub fn parse(toml_str: &str, origin: &str) -> Result<MatchConfig, ConfigError> {
    toml::de::from_str(toml_str).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        source: e,
    })
}

/// Loads configuration from `path`, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or
/// parsed.
pub fn load(path: &Path) -> Result<MatchConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No config at {}, using defaults", path.display());
        return Ok(MatchConfig::default());
    }

    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = parse(&text, &path.display().to_string())?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_gives_defaults() {
        let config = parse("", "inline").unwrap();
        assert_eq!(config.database.path, "data/paf.duckdb");
        assert_eq!(config.matching.phonetic_prefix_tokens, 4);
        assert_eq!(config.store.query_timeout_ms, 5_000);
        assert_eq!(config.store.max_retries, 3);
        assert_eq!(config.store.base_backoff_ms, 200);
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = parse(
            r#"
            [database]
            path = "/var/lib/paf.duckdb"

            [store]
            max_retries = 0
            "#,
            "inline",
        )
        .unwrap();
        assert_eq!(config.database.path, "/var/lib/paf.duckdb");
        assert_eq!(config.store.max_retries, 0);
        assert_eq!(config.store.query_timeout_ms, 5_000);
        assert_eq!(config.matching.phonetic_prefix_tokens, 4);
    }

    #[test]
    fn rejects_wrong_types() {
        let err = parse("[matching]\nphonetic_prefix_tokens = \"four\"", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref path, .. } if path == "inline"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("paf_match_missing_config_for_test.toml");
        let config = load(&path).unwrap();
        assert_eq!(config.matching.phonetic_prefix_tokens, 4);
    }

    #[test]
    fn loads_file_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "paf_match_config_test_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[matching]\nphonetic_prefix_tokens = 3\n").unwrap();
        let config = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.matching.phonetic_prefix_tokens, 3);
    }

    #[test]
    fn explicit_path_wins() {
        let root = Path::new("/srv/paf");
        let explicit = Path::new("/etc/paf_match.toml");
        assert_eq!(config_path(Some(explicit), root), explicit);

        if std::env::var_os(CONFIG_ENV).is_none() {
            assert_eq!(config_path(None, root), root.join(DEFAULT_CONFIG_FILE));
        }
    }
}
