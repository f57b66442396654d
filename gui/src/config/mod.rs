// GUI configuration module
pub mod theme;

use anyhow::Context;
use engine::config::settings::LoaderSettings;
use serde::Deserialize;
use shared::models::{Granularity, Theme};
use std::path::Path;

/// Environment variable naming a JSON file that replaces the embedded defaults.
pub const CONFIG_ENV_VAR: &str = "CANDLE_VIEWER_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

// Mirrors the structure of assets/config/default.json
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub version: String,
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub window: WindowSettings,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub loader: LoaderSettings,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppSettings {
    pub theme: Theme,
    pub granularity: Granularity,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { title: "Candlestick Chart Viewer".to_string(), width: 1280.0, height: 760.0 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChartConfig {
    /// Chart container height in pixels; the width follows the window.
    pub height: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { height: 500.0 }
    }
}

impl AppConfig {
    /// Loads the file named by `CANDLE_VIEWER_CONFIG` when set, the embedded
    /// defaults otherwise.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => Self::load_default(),
        }
    }

    pub fn load_default() -> anyhow::Result<Self> {
        Self::from_json_str(DEFAULT_CONFIG).context("embedded default configuration is invalid")
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("invalid configuration in {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> anyhow::Result<Self> {
        let config: AppConfig = serde_json::from_str(text)?;
        config.loader.validate()?;
        if !(config.chart.height > 0.0) {
            anyhow::bail!("chart height must be positive, got {}", config.chart.height);
        }
        Ok(config)
    }
}
