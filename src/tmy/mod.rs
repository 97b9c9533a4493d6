pub mod assembly;
pub mod daily;
pub mod ecdf;
pub mod errors;
pub mod finkelstein_schafer;
pub mod ranking;
pub mod result;
pub mod selection;
pub mod weighting;

use std::collections::{BTreeMap, BTreeSet};
use log::{error, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use crate::models::{MeteoSeries, MeteorologicalVariable, Quantity};
use crate::tmy::assembly::assemble;
use crate::tmy::daily::{complete_months, daily_statistics};
use crate::tmy::ecdf::{long_term_monthly_ecdfs, yearly_monthly_ecdfs};
use crate::tmy::errors::TmyError;
use crate::tmy::finkelstein_schafer::finkelstein_schafer;
use crate::tmy::ranking::{rank, weighted};
use crate::tmy::result::TmyResult;
use crate::tmy::selection::select_typical_months;
use crate::tmy::weighting::{monthly_weights, MonthWeighting};

/// Values keyed by calendar month (1-12) and then by source year
pub type MonthlyTable<T> = BTreeMap<u32, BTreeMap<i32, T>>;

/// What to do when the pipeline of one variable fails
#[derive(Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failing variable fails the whole request
    #[default]
    Abort,
    /// Failing variables are reported, the others are kept
    Skip,
}

/// A typical meteorological year calculation request
pub struct TmyRequest {
    pub variables: Vec<MeteorologicalVariable>,
    pub weighting: Box<dyn MonthWeighting>,
    pub candidates: usize,
    pub failure_policy: FailurePolicy,
    pub parallel: bool,
}

/// Results per variable, and the error message of every variable that failed under
/// `FailurePolicy::Skip`
#[derive(Serialize, Default, Debug)]
pub struct TmyOutput {
    pub results: BTreeMap<MeteorologicalVariable, TmyResult>,
    pub failures: BTreeMap<MeteorologicalVariable, String>,
}

/// Calculates the typical meteorological year of every requested variable
///
/// Variables are processed independently, in parallel when requested. Whatever the execution
/// order, results and failures are reported in variable order.
///
/// # Arguments
///
/// * 'series' - source series per quantity, wind speed always required
/// * 'request' - variables and calculation parameters
pub fn calculate_tmy(series: &MeteoSeries, request: &TmyRequest) -> Result<TmyOutput, TmyError> {
    let variables = request.variables
        .iter()
        .copied()
        .collect::<BTreeSet<MeteorologicalVariable>>()
        .into_iter()
        .collect::<Vec<MeteorologicalVariable>>();
    if variables.is_empty() {
        return Err(TmyError::Configuration("no variables requested".into()));
    }

    let run = |variable: MeteorologicalVariable| {
        (variable, calculate_variable(series, variable, request.weighting.as_ref(), request.candidates))
    };

    let outcomes = if request.parallel {
        variables.par_iter().map(|v| run(*v)).collect::<Vec<(MeteorologicalVariable, Result<TmyResult, TmyError>)>>()
    } else {
        variables.iter().map(|v| run(*v)).collect::<Vec<(MeteorologicalVariable, Result<TmyResult, TmyError>)>>()
    };

    let mut output = TmyOutput::default();
    for (variable, outcome) in outcomes {
        match outcome {
            Ok(result) => {
                output.results.insert(variable, result);
            },
            Err(e) if request.failure_policy == FailurePolicy::Skip => {
                error!("{} skipped: {}", variable, e);
                output.failures.insert(variable, e.to_string());
            },
            Err(e) => return Err(e),
        }
    }

    Ok(output)
}

/// Runs the full ISO 15927-4 pipeline for one variable
///
/// # Arguments
///
/// * 'series' - source series per quantity
/// * 'variable' - the variable to build a typical year for
/// * 'weighting' - weighting strategy
/// * 'candidates' - number of top ranked years compared on wind speed
fn calculate_variable(
    series: &MeteoSeries,
    variable: MeteorologicalVariable,
    weighting: &dyn MonthWeighting,
    candidates: usize,
) -> Result<TmyResult, TmyError> {
    let source = series.get(variable.quantity())
        .ok_or(TmyError::MissingSeries(variable.quantity()))?;
    let wind_speed = series.get(Quantity::WindSpeed)
        .ok_or(TmyError::MissingSeries(Quantity::WindSpeed))?;

    let weights = monthly_weights(weighting, variable)?;

    // Only months covering every calendar day compete, so the assembled year has no gaps
    let daily = complete_months(daily_statistics(source));
    let yearly_monthly_ecdfs = yearly_monthly_ecdfs(&daily, variable.statistic());
    let long_term_ecdfs = long_term_monthly_ecdfs(&daily, variable.statistic());

    let finkelstein_schafer = finkelstein_schafer(&yearly_monthly_ecdfs, &long_term_ecdfs);
    let weighted = weighted(&finkelstein_schafer, &weights);
    let ranked = rank(&weighted);

    let typical_months = select_typical_months(variable, &ranked, wind_speed, candidates)?;
    let typical_years = typical_months.iter().map(|(m, t)| (*m, t.year)).collect::<BTreeMap<u32, i32>>();

    let (reference_year, assembled) = assemble(source, &typical_years)?;

    info!("{}: typical years {:?} assembled onto {}, {} samples",
        variable, typical_years.values().collect::<Vec<&i32>>(), reference_year, assembled.len());

    Ok(TmyResult {
        variable,
        weighting_scheme: weighting.scheme(),
        weights,
        reference_year,
        typical_months,
        finkelstein_schafer,
        weighted,
        ranked,
        long_term_ecdfs,
        yearly_monthly_ecdfs,
        series: assembled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use crate::models::{TimeSeries, TimeValue};
    use crate::tmy::weighting::{resolve, WeightingScheme};
    use crate::models::MeteorologicalVariable::*;

    /// Hourly series over whole years, the value given per (year, month, day, hour)
    fn hourly(quantity: Quantity, years: &[i32], value: impl Fn(i32, u32, u32, u32) -> Option<f64>) -> TimeSeries {
        let mut data = Vec::new();
        for year in years {
            let mut day = NaiveDate::from_ymd_opt(*year, 1, 1).unwrap();
            while day.year() == *year {
                for h in 0..24 {
                    data.push(TimeValue {
                        valid_time: day.and_hms_opt(h, 0, 0).unwrap(),
                        data: value(*year, day.month(), day.day(), h),
                    });
                }
                day = day.succ_opt().unwrap();
            }
        }
        TimeSeries::new(quantity, data).unwrap()
    }

    fn request(variables: Vec<MeteorologicalVariable>, failure_policy: FailurePolicy, parallel: bool) -> TmyRequest {
        TmyRequest {
            variables,
            weighting: resolve(WeightingScheme::Iso15927_4, &BTreeMap::new()).unwrap(),
            candidates: selection::ISO_CANDIDATES,
            failure_policy,
            parallel,
        }
    }

    /// Three years where 2011 is the textbook year: its daily means follow the same ramp as the
    /// long-term mix, while 2010 runs cold and 2012 runs warm.
    fn three_years() -> MeteoSeries {
        let years = [2010, 2011, 2012];
        let offset = |y: i32| match y { 2010 => -3.0, 2011 => 0.0, _ => 3.0 };
        let mut series = MeteoSeries::new();
        series.insert(hourly(Quantity::Temperature, &years, |y, m, d, _| Some(m as f64 + d as f64 * 0.1 + offset(y))));
        series.insert(hourly(Quantity::WindSpeed, &years, |_, _, _, h| Some(2.0 + (h % 3) as f64)));
        series
    }

    #[test]
    fn typical_year_is_selected_and_assembled() {
        let series = three_years();

        let output = calculate_tmy(&series, &request(vec![MeanDryBulbTemperature], FailurePolicy::Abort, false)).unwrap();
        let result = &output.results[&MeanDryBulbTemperature];

        assert!(output.failures.is_empty());
        assert_eq!(result.variable(), MeanDryBulbTemperature);
        assert_eq!(result.weighting_scheme(), WeightingScheme::Iso15927_4);
        assert!(result.weights().values().all(|w| *w == 1.0));
        assert_eq!(result.typical_month_years(), (1..=12u32).map(|m| (m, 2011)).collect::<BTreeMap<u32, i32>>());
        assert_eq!(result.ranked()[&1][&2011], 1);
        assert!(result.finkelstein_schafer()[&1][&2011] < result.finkelstein_schafer()[&1][&2010]);
        assert_eq!(result.weighted()[&1][&2011], result.finkelstein_schafer()[&1][&2011]);
        assert_eq!(result.long_term_ecdfs().len(), 12);
        assert_eq!(result.yearly_monthly_ecdfs()[&1].len(), 3);

        assert_eq!(result.reference_year(), 2010);
        assert_eq!(result.series().len(), 365 * 24);
        assert!(result.series().iter().all(|s| s.valid_time.year() == 2010 && s.source_year == 2011));
        assert!(result.series().windows(2).all(|w| w[0].valid_time < w[1].valid_time));

        let grouped = result.group_by_month();
        assert_eq!(grouped.len(), 12);
        assert_eq!(grouped[&2].len(), 28 * 24);
    }

    #[test]
    fn partial_source_month_never_becomes_typical() {
        // a single December 2009 hour ahead of two full years
        let first = NaiveDate::from_ymd_opt(2009, 12, 31).unwrap().and_hms_opt(23, 0, 0).unwrap();
        let years = [2010, 2011];
        let with_first_hour = |series: TimeSeries, value: f64| {
            let mut data = vec![TimeValue { valid_time: first, data: Some(value) }];
            data.extend_from_slice(series.data());
            TimeSeries::new(series.quantity, data).unwrap()
        };
        let mut series = MeteoSeries::new();
        series.insert(with_first_hour(hourly(Quantity::Temperature, &years, |y, m, _, _| Some(m as f64 + (y - 2010) as f64)), 12.0));
        series.insert(with_first_hour(hourly(Quantity::WindSpeed, &years, |y, _, _, _| Some(if y == 2010 { 2.0 } else { 4.0 })), 3.0));

        let output = calculate_tmy(&series, &request(vec![MeanDryBulbTemperature], FailurePolicy::Abort, false)).unwrap();
        let result = &output.results[&MeanDryBulbTemperature];

        assert!(result.yearly_monthly_ecdfs()[&12].keys().all(|y| *y != 2009));
        assert_ne!(result.typical_month_years()[&12], 2009);
        assert_eq!(result.series().len(), 365 * 24);
        assert_eq!(result.group_by_month()[&12].len(), 31 * 24);
        assert!(result.series().windows(2).all(|w| w[0].valid_time < w[1].valid_time));
    }

    #[test]
    fn month_without_complete_year_is_insufficient() {
        let mut series = MeteoSeries::new();
        series.insert(hourly(Quantity::Temperature, &[2010, 2011], |_, m, d, _| if m == 12 && d > 15 { None } else { Some(m as f64) }));
        series.insert(hourly(Quantity::WindSpeed, &[2010, 2011], |_, _, _, _| Some(3.0)));

        let err = calculate_tmy(&series, &request(vec![MeanDryBulbTemperature], FailurePolicy::Abort, false)).unwrap_err();

        assert!(matches!(err, TmyError::InsufficientData { variable: MeanDryBulbTemperature, month: 12 }));
    }

    #[test]
    fn month_without_data_names_the_month() {
        let years = [2010, 2011, 2012];
        let mut series = MeteoSeries::new();
        series.insert(hourly(Quantity::Temperature, &years, |_, m, _, _| if m == 6 { None } else { Some(m as f64) }));
        series.insert(hourly(Quantity::WindSpeed, &years, |_, _, _, _| Some(3.0)));

        let err = calculate_tmy(&series, &request(vec![MeanDryBulbTemperature], FailurePolicy::Abort, false)).unwrap_err();

        assert!(matches!(err, TmyError::InsufficientData { variable: MeanDryBulbTemperature, month: 6 }));
    }

    #[test]
    fn missing_series_aborts_by_default() {
        let series = three_years();

        let err = calculate_tmy(&series, &request(vec![MeanDryBulbTemperature, MeanRelativeHumidity], FailurePolicy::Abort, false)).unwrap_err();

        assert!(matches!(err, TmyError::MissingSeries(Quantity::RelativeHumidity)));
    }

    #[test]
    fn skip_policy_keeps_healthy_variables() {
        let series = three_years();

        let output = calculate_tmy(&series, &request(vec![MeanRelativeHumidity, MeanDryBulbTemperature], FailurePolicy::Skip, true)).unwrap();

        assert_eq!(output.results.len(), 1);
        assert!(output.results.contains_key(&MeanDryBulbTemperature));
        assert!(output.failures[&MeanRelativeHumidity].contains("relative humidity"));
    }

    #[test]
    fn parallel_and_sequential_runs_agree() {
        let series = three_years();
        let variables = vec![MeanDryBulbTemperature, MaxDryBulbTemperature, MeanWindSpeed];

        let sequential = calculate_tmy(&series, &request(variables.clone(), FailurePolicy::Abort, false)).unwrap();
        let parallel = calculate_tmy(&series, &request(variables, FailurePolicy::Abort, true)).unwrap();

        assert_eq!(sequential.results.len(), 3);
        for (variable, result) in &sequential.results {
            assert_eq!(result.typical_months(), parallel.results[variable].typical_months());
        }
    }

    #[test]
    fn empty_request_is_a_configuration_error() {
        let series = three_years();

        let err = calculate_tmy(&series, &request(Vec::new(), FailurePolicy::Abort, false)).unwrap_err();

        assert!(matches!(err, TmyError::Configuration(_)));
    }
}
