//! Configuration loaded from `config.toml`.
//!
//! ```toml
//! [render]
//! dialect = "oracle"
//!
//! [codec]
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ast::Query;
use crate::error::{WeaveError, WeaveResult};
use crate::render::{self, Profile, Rendered, dialect};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub codec: CodecConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default = "default_dialect")]
    pub dialect: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
        }
    }
}

fn default_dialect() -> String {
    "ansi".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    pub fn from_toml(text: &str) -> WeaveResult<Self> {
        toml::from_str(text).map_err(|e| WeaveError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> WeaveResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), dialect = %config.render.dialect, "config loaded");
        Ok(config)
    }

    /// Default location: `<config dir>/sqlweave/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sqlweave").join("config.toml"))
    }

    /// Load from the default location, or defaults when there is no file.
    pub fn discover() -> WeaveResult<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn profile(&self) -> WeaveResult<&'static Profile> {
        dialect::by_name(&self.render.dialect).ok_or_else(|| {
            WeaveError::Config(format!("unknown dialect '{}'", self.render.dialect))
        })
    }

    /// Render with the configured dialect.
    pub fn render(&self, query: &Query) -> WeaveResult<Rendered> {
        render::render(query, self.profile()?)
    }

    /// JSON document with the configured formatting.
    pub fn to_json(&self, query: &Query) -> WeaveResult<String> {
        crate::codec::to_json(query, self.codec.pretty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.dialect, "ansi");
        assert!(!config.codec.pretty);
        assert_eq!(config.profile().unwrap().name, "ansi");
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::from_toml(
            r#"
[render]
dialect = "oracle"

[codec]
pretty = true
"#,
        )
        .unwrap();
        assert_eq!(config.profile().unwrap().name, "oracle");
        assert!(config.codec.pretty);
    }

    #[test]
    fn test_aliases_resolve() {
        let config = Config::from_toml("[render]\ndialect = \"pg\"\n").unwrap();
        assert_eq!(config.profile().unwrap().name, "postgres");
    }

    #[test]
    fn test_unknown_dialect() {
        let config = Config::from_toml("[render]\ndialect = \"db2\"\n").unwrap();
        let err = config.profile().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: unknown dialect 'db2'");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::from_toml("[render\n"),
            Err(WeaveError::Config(_))
        ));
        assert!(Config::from_toml("[render]\ncolour = 1\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("sqlweave-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[render]\ndialect = \"sqlserver\"\n").unwrap();
        let config = Config::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.profile().unwrap().name, "sqlserver");

        assert!(matches!(Config::load(&path), Err(WeaveError::Io(_))));
    }
}
