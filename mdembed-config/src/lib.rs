//! Shared configuration loader for the mdembed toolchain.
//!
//! `defaults/mdembed.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdembedConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use mdembed::EmbedOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mdembed.default.toml");

/// Top-level configuration consumed by mdembed applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdembedConfig {
    pub embed: EmbedConfig,
}

/// Image embedding knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedConfig {
    pub enabled: bool,
    pub convert_svgs: bool,
    #[serde(default)]
    pub root_path: Option<String>,
}

impl EmbedConfig {
    /// Embedding options, resolving images against `root_path` or else `fallback_root`.
    pub fn options(&self, fallback_root: impl Into<PathBuf>) -> EmbedOptions {
        let root_path = match &self.root_path {
            Some(root) => PathBuf::from(root),
            None => fallback_root.into(),
        };
        EmbedOptions {
            root_path,
            convert_svgs: self.convert_svgs,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdembedConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdembedConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.embed.enabled);
        assert!(config.embed.convert_svgs);
        assert_eq!(config.embed.root_path, None);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("embed.convert_svgs", false)
            .expect("override to apply")
            .set_override("embed.root_path", "figures")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.embed.convert_svgs);
        assert_eq!(config.embed.root_path.as_deref(), Some("figures"));
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("mdembed.toml");
        fs::write(&path, "[embed]\nenabled = false\n").expect("write config");

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert!(!config.embed.enabled);
        assert!(config.embed.convert_svgs);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = Loader::new()
            .with_file(dir.path().join("absent.toml"))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("config to build");
        assert!(config.embed.enabled);
    }

    #[test]
    fn embed_config_converts_to_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let options = config.embed.options("notebooks");
        assert_eq!(options.root_path, PathBuf::from("notebooks"));
        assert!(options.convert_svgs);

        let configured = EmbedConfig {
            enabled: true,
            convert_svgs: false,
            root_path: Some("assets".to_string()),
        };
        let options = configured.options("notebooks");
        assert_eq!(options.root_path, PathBuf::from("assets"));
        assert!(!options.convert_svgs);
    }
}
