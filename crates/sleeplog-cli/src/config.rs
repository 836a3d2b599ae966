//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use sleeplog_core::SegmentConfig;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the exported sleep log.
    pub log_path: PathBuf,

    /// 1-based sheet row of the first data row (row 1 is the header).
    pub first_data_row: u32,

    /// Segmentation thresholds.
    #[serde(default)]
    pub segment: SegmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            log_path: data_dir.join("sleep-log.json"),
            first_data_row: 2,
            segment: SegmentConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Segmentation thresholds are validated before the config is returned.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // SLEEPLOG_LOG_PATH, SLEEPLOG_SEGMENT__ACTIVE_CAP_MINUTES, ...
        figment = figment.merge(Env::prefixed("SLEEPLOG_").split("__"));

        let config: Self = figment.extract()?;
        config
            .segment
            .validate()
            .map_err(|err| figment::Error::from(format!("invalid [segment] config: {err}")))?;
        Ok(config)
    }
}

/// Returns the platform-specific config directory for sleeplog.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("sleeplog"))
}

/// Returns the platform-specific data directory for sleeplog.
///
/// On Linux: `~/.local/share/sleeplog`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("sleeplog"))
}
