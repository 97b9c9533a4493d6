use std::env;
use log::{debug, info};
use thiserror::Error;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_series::SeriesManager;
use crate::tmy::errors::TmyError;
use crate::tmy::weighting::{describe_scheme, resolve};
use crate::tmy::TmyRequest;

pub struct Mgr {
    pub series: SeriesManager,
    pub request: TmyRequest,
}

/// Initializes and returns configuration and a Mgr struct holding the series manager and the
/// calculation request
///
pub fn init() -> Result<(Config, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = args.iter()
        .find_map(|p| p.strip_prefix("--config="))
        .ok_or(InitializationError::ArgumentError("usage: tmy_builder --config=<path>".into()))?;


    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(&config.general.log_path, config.general.log_level, config.general.log_to_stdout)?;


    // Print version
    info!("starting tmy builder version: {}", env!("CARGO_PKG_VERSION"));


    // Resolve weighting and instantiate structs
    let weighting = resolve(config.tmy.weighting_scheme, &config.tmy.custom_weights)?;
    debug!("weighting scheme {}", describe_scheme(weighting.as_ref()));

    let series = SeriesManager::new(&config.series, &config.files.input_dir);
    let request = TmyRequest {
        variables: config.tmy.variables.clone(),
        weighting,
        candidates: config.tmy.candidates,
        failure_policy: config.tmy.failure_policy,
        parallel: config.tmy.parallel,
    };

    let mgr = Mgr {
        series,
        request,
    };

    Ok((config, mgr))
}

/// Error depicting errors that occur while initializing the builder
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ArgumentError: {0}")]
    ArgumentError(String),
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("WeightingError: {0}")]
    WeightingError(#[from] TmyError),
}
