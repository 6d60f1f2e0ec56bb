//! Guard configuration loaded from TOML.
//!
//! ```toml
//! allowed_joins = ["author", "author.profile", "posts"]
//!
//! # Optional. Replaces the standard vocabulary; `#` stands for an index.
//! keywords = ["equals", "in", "notIn", "AND.#", "AND"]
//! ```

use crate::{JoinSet, KeywordSet};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Settings for a [`CrudGuard`](crate::CrudGuard).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct GuardConfig {
    /// Relation paths callers may traverse.
    #[serde(default)]
    pub allowed_joins: Vec<String>,
    /// Operator keywords to strip from `where` paths. `None` keeps the
    /// standard vocabulary.
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

impl GuardConfig {
    /// Parse a configuration document.
    ///
    /// ```
    /// use crud_guard::GuardConfig;
    ///
    /// let config = GuardConfig::from_toml_str(r#"allowed_joins = ["author"]"#).unwrap();
    /// assert_eq!(config.allowed_joins, vec!["author"]);
    /// assert!(config.keywords.is_none());
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        config.keyword_set()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&source).map_err(|e| e.with_path(path))
    }

    /// The allow-list described by this configuration.
    #[must_use]
    pub fn join_set(&self) -> JoinSet {
        self.allowed_joins.iter().map(String::as_str).collect()
    }

    /// The keyword vocabulary described by this configuration.
    pub fn keyword_set(&self) -> Result<KeywordSet, ConfigError> {
        match &self.keywords {
            None => Ok(KeywordSet::standard()),
            Some(specs) => KeywordSet::parse(specs).map_err(ConfigError::InvalidKeyword),
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The file could not be read.
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },
    /// The document is not valid TOML or has unexpected keys.
    Parse {
        /// File the document came from, if any.
        path: Option<PathBuf>,
        /// Parser error message.
        message: String,
    },
    /// A keyword string is empty or has an empty segment.
    InvalidKeyword(String),
}

impl ConfigError {
    fn with_path(self, file: &Path) -> Self {
        match self {
            Self::Parse { path: None, message } => Self::Parse {
                path: Some(file.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "failed to read config {}: {message}", path.display())
            },
            Self::Parse {
                path: Some(path),
                message,
            } => write!(f, "invalid config {}: {message}", path.display()),
            Self::Parse {
                path: None,
                message,
            } => write!(f, "invalid config: {message}"),
            Self::InvalidKeyword(keyword) => {
                write!(f, "invalid operator keyword '{keyword}'")
            },
        }
    }
}

impl std::error::Error for ConfigError {}
