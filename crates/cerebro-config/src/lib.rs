//! Template library configuration for cerebro.
//!
//! The template directory is resolved from, highest precedence first:
//! an explicit override (the `--templates` flag), the `CEREBRO_TEMPLATE_PATH`
//! environment variable, a `.cerebro.toml` file in the working directory, and
//! finally `<working dir>/templates`.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = ".cerebro.toml";
pub const TEMPLATE_PATH_ENV: &str = "CEREBRO_TEMPLATE_PATH";
pub const DEFAULT_TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_DOCUMENT: &str = "AGENT.md";

/// Resolved settings handed to the template store and commands.
#[derive(Clone, Debug)]
pub struct Config {
    pub template_dir: PathBuf,
    pub default_document: PathBuf,
    pub source: ConfigSource,
}

/// Where the template directory setting came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigSource {
    pub kind: ConfigSourceKind,
    pub path: Option<PathBuf>,
}

impl ConfigSource {
    fn new(kind: ConfigSourceKind, path: Option<PathBuf>) -> Self {
        ConfigSource { kind, path }
    }

    pub fn describe(&self) -> String {
        match (&self.kind, &self.path) {
            (ConfigSourceKind::Default, _) => "built-in defaults".to_owned(),
            (kind, Some(path)) => format!("{} at {}", kind, path.display()),
            (kind, None) => kind.to_string(),
        }
    }
}

/// Kinds of configuration sources, ordered from lowest to highest precedence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigSourceKind {
    Default,
    File,
    Environment,
    Override,
}

impl fmt::Display for ConfigSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfigSourceKind::Default => "defaults",
            ConfigSourceKind::File => "config file",
            ConfigSourceKind::Environment => TEMPLATE_PATH_ENV,
            ConfigSourceKind::Override => "override",
        };
        f.write_str(label)
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub working_dir: Option<PathBuf>,
    pub override_path: Option<PathBuf>,
    pub env_override: Option<String>,
}

impl LoadOptions {
    /// Options carrying the template path from the process environment.
    pub fn from_env() -> Self {
        LoadOptions {
            env_override: env::var(TEMPLATE_PATH_ENV).ok(),
            ..LoadOptions::default()
        }
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }

    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_env_override(mut self, value: impl Into<String>) -> Self {
        self.env_override = Some(value.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {}: {source}", .attempted.display())]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("failed to read config {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    templates: RawTemplates,
    #[serde(default)]
    document: RawDocument,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTemplates {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    default: Option<PathBuf>,
}

impl Config {
    /// Resolves the template directory and default document.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let config_path = working_dir.join(CONFIG_FILE_NAME);
        let file = if config_path.is_file() {
            Some(load_file(&config_path)?)
        } else {
            None
        };

        let default_document = file
            .as_ref()
            .and_then(|raw| raw.document.default.as_deref())
            .map(|path| make_absolute(path, &working_dir))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT));

        let env_override = options
            .env_override
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let file_templates = file.and_then(|raw| raw.templates.path);

        let (template_dir, source) = if let Some(path) = options.override_path {
            (
                make_absolute(&path, &working_dir),
                ConfigSource::new(ConfigSourceKind::Override, None),
            )
        } else if let Some(path) = env_override {
            (
                make_absolute(&path, &working_dir),
                ConfigSource::new(ConfigSourceKind::Environment, None),
            )
        } else if let Some(path) = file_templates {
            (
                make_absolute(&path, &working_dir),
                ConfigSource::new(ConfigSourceKind::File, Some(config_path)),
            )
        } else {
            (
                working_dir.join(DEFAULT_TEMPLATE_DIR),
                ConfigSource::new(ConfigSourceKind::Default, None),
            )
        };

        debug!(
            template_dir = %template_dir.display(),
            source = %source.describe(),
            "resolved template library"
        );

        Ok(Config {
            template_dir,
            default_document,
            source,
        })
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })
}
