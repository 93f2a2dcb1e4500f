use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

/// Daily availability window used when no calendar service is configured.
/// Development mode only; production rounds resolve real opening hours.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackWindowConfig {
    #[serde(default = "default_fallback_start_hour")]
    pub start_hour: u32,
    #[serde(default = "default_fallback_end_hour")]
    pub end_hour: u32,
}

const fn default_fallback_start_hour() -> u32 {
    10
}

const fn default_fallback_end_hour() -> u32 {
    22
}

impl Default for FallbackWindowConfig {
    fn default() -> Self {
        Self { start_hour: default_fallback_start_hour(), end_hour: default_fallback_end_hour() }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Width of one grid step in minutes.
    #[serde(default = "default_precision_minutes")]
    pub precision_minutes: u32,
}

const fn default_precision_minutes() -> u32 {
    15
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { precision_minutes: default_precision_minutes() }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Config {
    /// Base URL of the opening-hours calendar service. `None` switches the
    /// data builder to the fallback window.
    #[serde(default)]
    pub opening_hours_url: Option<String>,
    #[serde(default)]
    pub fallback_window: FallbackWindowConfig,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Extract(#[from] figment::Error),
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(Figment::new().merge(Toml::file("ssa.toml")).merge(Env::prefixed("SSA_")).extract()?)
}

#[cfg(test)]
mod tests {
    use super::{Config, FallbackWindowConfig};

    #[test]
    fn defaults_select_fallback_mode() {
        let config = Config::default();
        assert!(config.opening_hours_url.is_none());
        assert_eq!(config.fallback_window, FallbackWindowConfig { start_hour: 10, end_hour: 22 });
        assert_eq!(config.solver.precision_minutes, 15);
    }
}
