//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use piyo_core::{BuiltinLocale, Locale, LocaleError, ParseOptions, TrailingBlock};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Built-in dialect of the exports.
    #[serde(default)]
    pub locale: BuiltinLocale,

    /// Custom dialect file, layered over the built-in `locale`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale_file: Option<PathBuf>,

    /// What to do with a day block still open at the end of a file.
    #[serde(default)]
    pub trailing_block: TrailingBlock,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("piyo.db"),
            locale: BuiltinLocale::default(),
            locale_file: None,
            trailing_block: TrailingBlock::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PIYO_*)
        figment = figment.merge(Env::prefixed("PIYO_"));

        figment.extract()
    }

    /// Resolves the export dialect. `builtin` overrides the configured locale;
    /// a configured `locale_file` is layered over whichever built-in applies.
    pub fn resolve_locale(&self, builtin: Option<BuiltinLocale>) -> Result<Locale, LocaleError> {
        let base = builtin.unwrap_or(self.locale).locale();
        match &self.locale_file {
            Some(path) => Locale::load(path, &base),
            None => Ok(base),
        }
    }

    pub const fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            trailing_block: self.trailing_block,
        }
    }
}

/// Returns the platform-specific config directory for piyo.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("piyo"))
}

/// Returns the platform-specific data directory for piyo.
///
/// On Linux: `~/.local/share/piyo`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("piyo"))
}
