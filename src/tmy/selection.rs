use std::collections::BTreeMap;
use chrono::Datelike;
use log::debug;
use serde::Serialize;
use crate::models::{MeteorologicalVariable, TimeSeries, TimeValue};
use crate::tmy::errors::TmyError;
use crate::tmy::ranking::years_by_rank;
use crate::tmy::MonthlyTable;

/// Number of top ranked candidate years ISO 15927-4 compares wind speed for
pub const ISO_CANDIDATES: usize = 3;

/// A candidate year for a calendar month
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Candidate {
    pub year: i32,
    pub rank: usize,
    pub wind_speed_mean: Option<f64>,
    // None when the candidate has no wind speed samples
    pub wind_speed_deviation: Option<f64>,
}

/// The selected year of a calendar month together with the candidates it was picked from
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TypicalMonth {
    pub month: u32,
    pub year: i32,
    pub long_term_wind_speed_mean: f64,
    pub candidates: Vec<Candidate>,
}

/// Selects one typical year per calendar month (ISO 15927-4 step 7)
///
/// For each month the `candidates` best ranked years are compared on the deviation of their
/// monthly mean wind speed from the multi-year mean of that month, and the year with the lowest
/// deviation wins. Equal deviations go to the better ranked year. Fewer ranked years than
/// `candidates` just means fewer candidates, none at all is an error.
///
/// # Arguments
///
/// * 'variable' - the variable the ranking belongs to, used in error reporting
/// * 'ranked' - rank per (month, year)
/// * 'wind_speed' - hourly wind speed series covering the same years
/// * 'candidates' - number of top ranked years to consider
pub fn select_typical_months(
    variable: MeteorologicalVariable,
    ranked: &MonthlyTable<usize>,
    wind_speed: &TimeSeries,
    candidates: usize,
) -> Result<BTreeMap<u32, TypicalMonth>, TmyError> {
    let mut typical_months = BTreeMap::new();

    for month in 1..=12u32 {
        let candidate_years = years_by_rank(ranked, month)
            .into_iter()
            .take(candidates.max(1))
            .collect::<Vec<(i32, usize)>>();
        if candidate_years.is_empty() {
            return Err(TmyError::InsufficientData { variable, month });
        }

        let long_term_wind_speed_mean = mean(wind_speed.data().iter().filter(|v| v.valid_time.month() == month))
            .ok_or(TmyError::MissingWindSpeed { variable, month })?;

        let candidates = candidate_years
            .into_iter()
            .map(|(year, rank)| {
                let wind_speed_mean = mean(wind_speed.month_slice(year, month).iter());
                Candidate {
                    year,
                    rank,
                    wind_speed_mean,
                    wind_speed_deviation: wind_speed_mean.map(|m| (m - long_term_wind_speed_mean).abs()),
                }
            })
            .collect::<Vec<Candidate>>();

        // Stable argmin, a later candidate must be strictly better to win
        let mut selected = &candidates[0];
        for c in candidates.iter().skip(1) {
            if deviation(c) < deviation(selected) {
                selected = c;
            }
        }

        debug!("{}: month {:>2}, year {}, deviation {:?}, candidates {:?}",
            variable, month, selected.year, selected.wind_speed_deviation,
            candidates.iter().map(|c| c.year).collect::<Vec<i32>>());

        typical_months.insert(month, TypicalMonth {
            month,
            year: selected.year,
            long_term_wind_speed_mean,
            candidates: candidates.clone(),
        });
    }

    Ok(typical_months)
}

fn deviation(candidate: &Candidate) -> f64 {
    candidate.wind_speed_deviation.unwrap_or(f64::INFINITY)
}

/// Mean of the valid samples, None if there are none
fn mean<'a>(values: impl Iterator<Item = &'a TimeValue>) -> Option<f64> {
    let (sum, count) = values
        .filter_map(|v| v.value())
        .fold((0.0, 0usize), |acc, v| (acc.0 + v, acc.1 + 1));

    if count == 0 { None } else { Some(sum / count as f64) }
}
