//! Configuration system for ecmatree.
//!
//! Loads config from:
//! 1. Global: ~/.config/ecmatree/config.toml
//! 2. Per-project: .ecmatree/config.toml (overrides global)
//!
//! An explicit `--config` file replaces both. Command-line flags override
//! whatever the files say.
//!
//! Example config.toml:
//! ```toml
//! [detect]
//! strategy = "fallback"
//! dialect = "auto"
//!
//! [output]
//! plain_tree = "normalized"
//! offsets = "utf8"
//! pretty = true
//! ```

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use ecmatree_syntax::{Dialect, OffsetUnit, Options, Strategy, TreeShape};
use serde::Deserialize;

/// Which dialect to parse as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialectSetting {
    /// Let the classifier decide.
    Auto,
    Typescript,
    Javascript,
}

impl DialectSetting {
    pub fn forced(self) -> Option<Dialect> {
        match self {
            DialectSetting::Auto => None,
            DialectSetting::Typescript => Some(Dialect::Typed),
            DialectSetting::Javascript => Some(Dialect::Plain),
        }
    }
}

/// Detection configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DetectConfig {
    pub strategy: Option<Strategy>,
    pub dialect: Option<DialectSetting>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Tree emitted when the source is plain JavaScript.
    pub plain_tree: Option<TreeShape>,
    pub offsets: Option<OffsetUnit>,
    pub pretty: Option<bool>,
}

/// Root configuration structure.
///
/// Every value is optional so layers merge field by field: a project file
/// that only sets `output.pretty` keeps the global `detect` section.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EcmatreeConfig {
    pub detect: DetectConfig,
    pub output: OutputConfig,
}

impl EcmatreeConfig {
    /// Load configuration for a project rooted at `root`.
    pub fn load(root: &Path) -> Self {
        Self::load_layers(Self::global_config_path().as_deref(), root)
    }

    /// Load only `path`, ignoring the global and project files.
    pub fn load_explicit(path: &Path) -> Self {
        Self::load_file(path).unwrap_or_default()
    }

    fn load_layers(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".ecmatree").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("ecmatree").join("config.toml"))
    }

    /// Load config from a file path. Missing files are silently skipped;
    /// unreadable or malformed ones are logged and skipped.
    fn load_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "cannot read config");
                return None;
            }
        };
        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Some(config)
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            detect: DetectConfig {
                strategy: other.detect.strategy.or(self.detect.strategy),
                dialect: other.detect.dialect.or(self.detect.dialect),
            },
            output: OutputConfig {
                plain_tree: other.output.plain_tree.or(self.output.plain_tree),
                offsets: other.output.offsets.or(self.output.offsets),
                pretty: other.output.pretty.or(self.output.pretty),
            },
        }
    }

    /// Pipeline options, with defaults for anything unset.
    pub fn options(&self) -> Options {
        Options {
            strategy: self.detect.strategy.unwrap_or_default(),
            dialect: self.detect.dialect.and_then(DialectSetting::forced),
            plain_tree: self.output.plain_tree.unwrap_or_default(),
            offsets: self.output.offsets.unwrap_or_default(),
        }
    }

    pub fn pretty(&self) -> bool {
        self.output.pretty.unwrap_or(false)
    }
}
