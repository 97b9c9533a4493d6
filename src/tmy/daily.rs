use std::collections::BTreeMap;
use chrono::{Datelike, NaiveDate};
use log::debug;
use crate::models::{days_in_month, DailyValue, TimeSeries};

/// Aggregates a sub-daily series into daily minimum, mean and maximum
///
/// Missing samples are skipped. Days without a single valid sample produce no daily value,
/// so they never enter a distribution as zeros.
///
/// # Arguments
///
/// * 'series' - the (hourly) series to aggregate
pub fn daily_statistics(series: &TimeSeries) -> Vec<DailyValue> {
    // date -> (sum, count, min, max)
    let mut map: BTreeMap<NaiveDate, (f64, usize, f64, f64)> = BTreeMap::new();

    for (date, v) in series.data().iter().filter_map(|t| t.value().map(|v| (t.valid_time.date(), v))) {
        map.entry(date)
            .and_modify(|d| { d.0 += v; d.1 += 1; d.2 = d.2.min(v); d.3 = d.3.max(v); })
            .or_insert((v, 1, v, v));
    }

    map.into_iter()
        .map(|(date, (sum, count, min, max))| DailyValue { date, min, mean: sum / count as f64, max })
        .collect()
}

/// Keeps only the daily values of months that have a value for every calendar day
///
/// Months cut by the start or end of a series, or with whole days missing, would otherwise
/// compete as candidates and leave gaps in the assembled year.
///
/// # Arguments
///
/// * 'daily' - daily values ordered by date
pub fn complete_months(daily: Vec<DailyValue>) -> Vec<DailyValue> {
    let mut days: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for d in daily.iter() {
        *days.entry((d.date.year(), d.date.month())).or_insert(0) += 1;
    }

    let complete = days
        .into_iter()
        .filter(|((year, month), count)| {
            let full = days_in_month(*year, *month) == Some(*count);
            if !full {
                debug!("{}-{:02} left out, {} days with data", year, month, count);
            }
            full
        })
        .map(|(key, _)| key)
        .collect::<Vec<(i32, u32)>>();

    daily.into_iter()
        .filter(|d| complete.binary_search(&(d.date.year(), d.date.month())).is_ok())
        .collect()
}
