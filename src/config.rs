use std::collections::BTreeMap;
use std::fs;
use chrono::NaiveDateTime;
use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use crate::models::MeteorologicalVariable;
use crate::tmy::selection::ISO_CANDIDATES;
use crate::tmy::weighting::WeightingScheme;
use crate::tmy::FailurePolicy;

/// A custom weight, either one for all months or one per month
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum CustomWeight {
    Constant(f64),
    Monthly([f64; 12]),
}

#[derive(Deserialize)]
pub struct Files {
    pub input_dir: String,
    pub output_dir: String,
}

/// File name patterns per quantity, relative to the input directory, and an optional period
#[derive(Deserialize, Default)]
pub struct SeriesParameters {
    pub temperature: Option<String>,
    pub dew_point_temperature: Option<String>,
    pub relative_humidity: Option<String>,
    pub wind_speed: Option<String>,
    pub global_horizontal_irradiance: Option<String>,
    pub direct_normal_irradiance: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct TmyParameters {
    pub variables: Vec<MeteorologicalVariable>,
    #[serde(default)]
    pub weighting_scheme: WeightingScheme,
    #[serde(default = "default_candidates")]
    pub candidates: usize,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    pub custom_weights: BTreeMap<MeteorologicalVariable, CustomWeight>,
}

#[derive(Deserialize)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
    #[serde(default = "default_threads")]
    pub threads: usize,
}

#[derive(Deserialize)]
pub struct Config {
    pub general: General,
    pub files: Files,
    #[serde(default)]
    pub series: SeriesParameters,
    pub tmy: TmyParameters,
}

fn default_candidates() -> usize {
    ISO_CANDIDATES
}

fn default_threads() -> usize {
    2
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, LoadConfigurationError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| LoadConfigurationError::ReadError(format!("{}: {}", config_path, e)))?;

    parse_config(&toml)
}

/// Parses and validates configuration text
///
/// # Arguments
///
/// * 'toml' - configuration in toml format
fn parse_config(toml: &str) -> Result<Config, LoadConfigurationError> {
    let mut config: Config = toml::from_str(toml)
        .map_err(|e| LoadConfigurationError::ParseError(e.to_string()))?;

    if config.tmy.variables.is_empty() {
        return Err(LoadConfigurationError::InvalidValue("tmy.variables must not be empty".into()));
    }
    if config.tmy.candidates == 0 {
        return Err(LoadConfigurationError::InvalidValue("tmy.candidates must be at least 1".into()));
    }
    if config.general.threads == 0 {
        return Err(LoadConfigurationError::InvalidValue("general.threads must be at least 1".into()));
    }
    if let (Some(start), Some(end)) = (config.series.start, config.series.end) {
        if start >= end {
            return Err(LoadConfigurationError::InvalidValue(format!("series.start {} is not before series.end {}", start, end)));
        }
    }

    if !config.files.input_dir.ends_with('/') {
        config.files.input_dir.push('/');
    }
    if !config.files.output_dir.ends_with('/') {
        config.files.output_dir.push('/');
    }

    Ok(config)
}

/// Error depicting errors that occur while loading the configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("ReadError: {0}")]
    ReadError(String),
    #[error("ParseError: {0}")]
    ParseError(String),
    #[error("InvalidValue: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeteorologicalVariable::*;
    use crate::tmy::weighting::{monthly_weights, resolve};

    const CONFIG: &str = r#"
[general]
log_path = "/tmp/tmy_builder.log"
log_level = "debug"
log_to_stdout = true
threads = 4

[files]
input_dir = "/data/series"
output_dir = "/data/tmy/"

[series]
temperature = "temperature_*.json"
wind_speed = "wind_speed_*.json"
start = "2005-01-01T00:00:00"

[tmy]
variables = ["mean_dry_bulb_temperature", "max_dry_bulb_temperature"]
weighting_scheme = "custom"
failure_policy = "skip"
parallel = true

[tmy.custom_weights]
mean_dry_bulb_temperature = 0.5
max_dry_bulb_temperature = [1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]
"#;

    #[test]
    fn parses_full_configuration() {
        let config = parse_config(CONFIG).unwrap();

        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert_eq!(config.general.threads, 4);
        assert_eq!(config.files.input_dir, "/data/series/");
        assert_eq!(config.files.output_dir, "/data/tmy/");
        assert_eq!(config.series.temperature.as_deref(), Some("temperature_*.json"));
        assert_eq!(config.series.relative_humidity, None);
        assert!(config.series.start.is_some() && config.series.end.is_none());
        assert_eq!(config.tmy.variables, vec![MeanDryBulbTemperature, MaxDryBulbTemperature]);
        assert_eq!(config.tmy.weighting_scheme, WeightingScheme::Custom);
        assert_eq!(config.tmy.candidates, ISO_CANDIDATES);
        assert_eq!(config.tmy.failure_policy, FailurePolicy::Skip);
        assert!(config.tmy.parallel);
        assert_eq!(config.tmy.custom_weights[&MeanDryBulbTemperature], CustomWeight::Constant(0.5));
        assert!(matches!(config.tmy.custom_weights[&MaxDryBulbTemperature], CustomWeight::Monthly(w) if w[5] == 0.0));
    }

    #[test]
    fn defaults_apply() {
        let toml = r#"
[general]
log_path = "tmy.log"
log_level = "info"
log_to_stdout = false

[files]
input_dir = "in/"
output_dir = "out/"

[tmy]
variables = ["mean_dry_bulb_temperature"]
"#;
        let config = parse_config(toml).unwrap();

        assert_eq!(config.general.threads, 2);
        assert_eq!(config.tmy.weighting_scheme, WeightingScheme::Iso15927_4);
        assert_eq!(config.tmy.failure_policy, FailurePolicy::Abort);
        assert!(!config.tmy.parallel);
        assert!(config.tmy.custom_weights.is_empty());
        assert!(config.series.wind_speed.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        let no_variables = CONFIG.replace(
            r#"variables = ["mean_dry_bulb_temperature", "max_dry_bulb_temperature"]"#, "variables = []");
        assert!(matches!(parse_config(&no_variables), Err(LoadConfigurationError::InvalidValue(_))));

        let unknown_scheme = CONFIG.replace(r#"weighting_scheme = "custom""#, r#"weighting_scheme = "tmy3""#);
        assert!(matches!(parse_config(&unknown_scheme), Err(LoadConfigurationError::ParseError(_))));

        assert!(matches!(load_config("/nonexistent/tmy_builder.toml"), Err(LoadConfigurationError::ReadError(_))));
    }

    #[test]
    fn sample_configuration_ranks_on_weighted_variables() {
        let config = parse_config(include_str!("../config.example.toml")).unwrap();
        let weighting = resolve(config.tmy.weighting_scheme, &config.tmy.custom_weights).unwrap();

        for variable in config.tmy.variables {
            let weights = monthly_weights(weighting.as_ref(), variable).unwrap();
            assert!(weights.values().all(|w| *w > 0.0), "{} has zero weight", variable);
        }
    }
}
