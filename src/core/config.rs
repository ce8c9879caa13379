// src/core/config.rs

use crate::core::common::CrashDbError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default bucket count for the hash table, mirroring
/// `OpenAddressTable`'s own default.
const DEFAULT_INITIAL_BUCKETS: usize = 101;

/// Configuration for the dataset location and index sizing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path to the accident CSV dataset.
    pub data_path: PathBuf,
    /// Initial bucket count for the open-addressing table.
    pub initial_buckets: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/accidents.csv"),
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
        }
    }
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `CrashDbError::Configuration` when `initial_buckets` is zero;
    /// the table's modulo reduction requires a positive slot count.
    pub fn validate(&self) -> Result<(), CrashDbError> {
        if self.initial_buckets == 0 {
            return Err(CrashDbError::Configuration(
                "initial_buckets must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads configuration from a TOML file. A missing file yields the
    /// defaults; a file that exists but does not parse is an error.
    ///
    /// # Errors
    ///
    /// Returns `CrashDbError::Configuration` if parsing or validation
    /// fails, `CrashDbError::Io` on any other read failure.
    pub fn load_from_file(path: &Path) -> Result<Self, CrashDbError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Self = toml::from_str(&contents).map_err(|e| {
                    CrashDbError::Configuration(format!(
                        "Failed to parse config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(CrashDbError::Io(e)),
        }
    }

    /// Loads configuration from an optional TOML file path; `None` yields
    /// the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `CrashDbError::Configuration` if the file exists but cannot
    /// be parsed.
    pub fn load_or_default(optional_path: Option<&Path>) -> Result<Self, CrashDbError> {
        match optional_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data_path, PathBuf::from("data/accidents.csv"));
        assert_eq!(config.initial_buckets, 101);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_buckets() {
        let config = Config { initial_buckets: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_existing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let config_content = r#"
            data_path = "/tmp/accidents.csv"
            initial_buckets = 211
        "#;
        writeln!(temp_file, "{}", config_content).unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/accidents.csv"));
        assert_eq!(config.initial_buckets, 211);
    }

    #[test]
    fn test_load_from_file_uses_defaults_for_missing_fields() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "data_path = \"/tmp/other.csv\"").unwrap();

        let config = Config::load_from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/other.csv"));
        assert_eq!(config.initial_buckets, 101);
    }

    #[test]
    fn test_load_from_non_existent_file_returns_default() {
        let non_existent_path = Path::new("/this/file/does/not/exist.toml");
        let config = Config::load_from_file(non_existent_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_malformed_file_returns_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml content").unwrap();

        let result = Config::load_from_file(temp_file.path());
        assert!(result.is_err());
        if let Err(CrashDbError::Configuration(msg)) = result {
            assert!(msg.contains("Failed to parse config file"));
        } else {
            panic!("Expected CrashDbError::Configuration, got {:?}", result);
        }
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "initial_buckets = 0").unwrap();

        assert!(Config::load_from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_with_none() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_with_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "initial_buckets = 53").unwrap();

        let config = Config::load_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(config.initial_buckets, 53);
    }
}
