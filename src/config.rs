use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::currency::{CurrencyFormat, DEFAULT_LOCALE};

const APP_NAME: &str = "home-price-estimator";
const CONFIG_FILE: &str = "config.json";
const DEFAULT_MODEL_FILE: &str = "HomePriceRegressor.json";

/// Environment variable overriding the model artifact path.
pub const MODEL_ENV: &str = "HOME_PRICE_MODEL";

/// Locale variables consulted when no locale is configured, highest
/// priority first.
const LOCALE_ENV: [&str; 3] = ["LC_ALL", "LC_MONETARY", "LANG"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the model artifact. Falls back to the data directory.
    pub model_path: Option<PathBuf>,
    /// Locale used to render the displayed price, e.g. `en-US`. When unset
    /// the user's environment locale is used.
    pub locale: Option<String>,
    /// Print a notice in the form when an estimate fails. Off by default:
    /// failures only reach the log and the price is left as it was.
    pub report_prediction_errors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: None,
            locale: None,
            report_prediction_errors: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the user's config directory.
    /// Returns default config if file doesn't exist or fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let result = match path {
            Some(path) => Self::try_load_from(path),
            None => get_config_path().and_then(|path| Self::try_load_from(&path)),
        };
        match result {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Resolve the model artifact path.
    ///
    /// Precedence: explicit path, `HOME_PRICE_MODEL`, `model_path`, then
    /// `HomePriceRegressor.json` in the data directory.
    pub fn model_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        let from_env = std::env::var_os(MODEL_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_model_path(explicit, from_env)
    }

    fn resolve_model_path(
        &self,
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
    ) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = from_env {
            return Ok(path);
        }
        if let Some(path) = &self.model_path {
            return Ok(path.clone());
        }
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Ok(dirs.data_dir().join(DEFAULT_MODEL_FILE))
    }

    /// Currency format for `locale`, else the configured locale, else the
    /// environment locale. Unknown locales fall back to `en-US`.
    pub fn currency_format(&self, locale: Option<&str>) -> CurrencyFormat {
        let tag = locale
            .map(str::to_string)
            .or_else(|| self.locale.clone())
            .or_else(|| locale_from_env(|key| std::env::var(key).ok()));

        let Some(tag) = tag else {
            return CurrencyFormat::default();
        };
        CurrencyFormat::for_locale(&tag).unwrap_or_else(|| {
            tracing::warn!("Unknown locale '{}', using {}", tag, DEFAULT_LOCALE);
            CurrencyFormat::default()
        })
    }
}

/// First locale set in `LC_ALL`, `LC_MONETARY` or `LANG`, with the
/// encoding and modifier stripped (`de_DE.UTF-8@euro` becomes `de_DE`).
/// `C` and `POSIX` name no locale.
fn locale_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    LOCALE_ENV.iter().find_map(|key| {
        let value = lookup(key)?;
        let tag = value.split(['.', '@']).next().unwrap_or_default().trim();
        match tag {
            "" | "C" | "POSIX" => None,
            _ => Some(tag.to_string()),
        }
    })
}

pub fn get_config_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_NAME);
    path.push(CONFIG_FILE);
    Ok(path)
}
