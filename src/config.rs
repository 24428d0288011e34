use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::generators::{DrawRequest, Strategy, UniqueDrawGenerator};
use crate::source::Mapping;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
    Slots,
}

/// Draw defaults, read from a JSON file. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min: i32,
    pub max: i32,
    pub count: usize,
    pub mapping: Mapping,
    pub strategy: Strategy,
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        let request = DrawRequest::default();
        Self {
            min: request.min,
            max: request.max,
            count: request.count,
            mapping: Mapping::default(),
            strategy: Strategy::default(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    const FILE_NAME: &'static str = "config.json";

    /// `<config dir>/luckydip/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(Self::FILE_NAME))
    }

    /// Loads `path` when given, otherwise the default file if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) => match Self::from_file(&path) {
                    Err(ConfigError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                        tracing::debug!(path = %path.display(), "no config file, using defaults");
                        Ok(Self::default())
                    }
                    other => other,
                },
                None => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.request().validate()?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn request(&self) -> DrawRequest {
        DrawRequest::new(self.min, self.max, self.count)
    }

    pub fn generator(&self) -> UniqueDrawGenerator {
        UniqueDrawGenerator::new(self.mapping, self.strategy)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::errors::DrawError;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let file = write_config(r#"{ "max": 49, "mapping": "scaled" }"#);
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(
            config,
            Config {
                max: 49,
                mapping: Mapping::Scaled,
                ..Config::default()
            }
        );
        assert_eq!(config.request(), DrawRequest::new(1, 49, 6));
    }

    #[test]
    fn impossible_request_is_rejected() {
        let file = write_config(r#"{ "min": 1, "max": 3, "count": 5 }"#);
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(DrawError::CountExceedsRange { count: 5, available: 3 })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ max: }");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
