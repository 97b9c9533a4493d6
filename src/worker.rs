use std::collections::BTreeMap;
use std::fs;
use log::{debug, info, warn};
use serde::Serialize;
use thiserror::Error;
use crate::config::Files;
use crate::initialization::Mgr;
use crate::models::{MeteorologicalVariable, Quantity};
use crate::tmy::result::TmyResult;
use crate::tmy::{calculate_tmy, TmyOutput};

/// Overview of a run, saved next to the per-variable results
#[derive(Serialize)]
struct Summary<'a> {
    typical_month_years: BTreeMap<MeteorologicalVariable, BTreeMap<u32, i32>>,
    reference_years: BTreeMap<MeteorologicalVariable, i32>,
    failures: &'a BTreeMap<MeteorologicalVariable, String>,
}

/// Runs a typical meteorological year build
///
/// # Arguments
///
/// * 'mgr' - struct with the series manager and the calculation request
/// * 'files' - files config
pub fn run(mgr: &Mgr, files: &Files) -> Result<(), WorkerError> {
    let mut quantities = mgr.request.variables
        .iter()
        .map(|v| v.quantity())
        .collect::<Vec<Quantity>>();
    quantities.push(Quantity::WindSpeed);
    quantities.sort();
    quantities.dedup();

    let series = mgr.series.load_all(&quantities)
        .map_err(|e| WorkerError::LoadSeriesError(e.to_string()))?;

    let output = calculate_tmy(&series, &mgr.request)
        .map_err(|e| WorkerError::CalculationError(e.to_string()))?;

    for (variable, result) in output.results.iter() {
        info!("{} ({}): {}", variable, result.weighting_scheme(), format_typical_years(result));
        log_months(result);
        save_result(&files.output_dir, result)?;
    }
    for (variable, failure) in output.failures.iter() {
        warn!("{} not built: {}", variable, failure);
    }

    save_summary(&files.output_dir, &output)?;

    Ok(())
}

/// Formats the selected year per month on one line
///
/// # Arguments
///
/// * 'result' - the result to format
fn format_typical_years(result: &TmyResult) -> String {
    result.typical_month_years()
        .iter()
        .map(|(m, y)| format!("{:02}:{}", m, y))
        .collect::<Vec<String>>()
        .join(" ")
}

/// Logs selection details per month at debug level
///
/// # Arguments
///
/// * 'result' - the result to log
fn log_months(result: &TmyResult) {
    let grouped = result.group_by_month();
    for (month, typical) in result.typical_months() {
        let fs = result.finkelstein_schafer().get(month).and_then(|y| y.get(&typical.year));
        let weighted = result.weighted().get(month).and_then(|y| y.get(&typical.year));
        let rank = result.ranked().get(month).and_then(|y| y.get(&typical.year));
        debug!("{}: month {:>2}, year {}, rank {:?}, fs {:?}, weighted {:?}, weight {:?}, samples {}",
            result.variable(), month, typical.year, rank, fs, weighted, result.weights().get(month),
            grouped.get(month).map_or(0, |s| s.len()));
    }
}

/// Saves the result of one variable
///
/// # Arguments
///
/// * 'path' - path to the output dir
/// * 'result' - the result to save
fn save_result(path: &str, result: &TmyResult) -> Result<(), WorkerError> {
    let filename = format!("{}{}_tmy.json", path, result.variable().slug());

    let json = serde_json::to_string_pretty(result)
        .map_err(|e| WorkerError::SaveResultError(format!("error serializing result: {}", e)))?;

    fs::write(&filename, json)
        .map_err(|e| WorkerError::SaveResultError(format!("error writing result to file: {}", e)))?;

    info!("Result saved to {}", filename);

    Ok(())
}

/// Saves a summary of the typical months and failures of all variables
///
/// # Arguments
///
/// * 'path' - path to the output dir
/// * 'output' - the output of a calculation
fn save_summary(path: &str, output: &TmyOutput) -> Result<(), WorkerError> {
    let filename = format!("{}tmy_summary.json", path);

    let summary = Summary {
        typical_month_years: output.results.iter().map(|(v, r)| (*v, r.typical_month_years())).collect(),
        reference_years: output.results.iter().map(|(v, r)| (*v, r.reference_year())).collect(),
        failures: &output.failures,
    };

    let json = serde_json::to_string_pretty(&summary)
        .map_err(|e| WorkerError::SaveResultError(format!("error serializing summary: {}", e)))?;

    fs::write(&filename, json)
        .map_err(|e| WorkerError::SaveResultError(format!("error writing summary to file: {}", e)))?;

    info!("Summary saved to {}", filename);

    Ok(())
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("error while loading series: {0:?}")]
    LoadSeriesError(String),
    #[error("error while calculating typical year: {0:?}")]
    CalculationError(String),
    #[error("error while saving result: {0:?}")]
    SaveResultError(String),
}
