use std::collections::BTreeMap;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;
use serde::Serialize;
use crate::models::{days_in_month, TimeSeries};
use crate::tmy::errors::TmyError;

/// One sample of the assembled year
///
/// `valid_time` is remapped onto the reference year, `source_year` is the year the sample was
/// taken from.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct TmySample {
    #[serde(rename = "time")]
    pub valid_time: NaiveDateTime,
    #[serde(rename = "value")]
    pub data: Option<f64>,
    pub month: u32,
    pub year: i32,
    pub source_year: i32,
}

/// Returns the reference year for a source series, i.e. its first year
///
/// # Arguments
///
/// * 'series' - the source series
pub fn reference_year(series: &TimeSeries) -> Option<i32> {
    series.years().first().copied()
}

/// Stitches the typical months into one synthetic year
///
/// Months are taken in calendar order from their selected source year and remapped onto the
/// reference year, keeping day of month and time of day. When the reference year is not a leap
/// year, February 29 samples from a leap source year are dropped. Every selected month must have
/// samples on each of its days.
///
/// # Arguments
///
/// * 'series' - the source series of the variable
/// * 'typical_years' - selected source year per calendar month, all twelve months required
pub fn assemble(series: &TimeSeries, typical_years: &BTreeMap<u32, i32>) -> Result<(i32, Vec<TmySample>), TmyError> {
    let reference_year = reference_year(series)
        .ok_or(TmyError::Assembly(format!("empty {} series", series.quantity)))?;

    let mut assembled: Vec<TmySample> = Vec::new();
    let mut dropped = 0usize;

    for month in 1..=12u32 {
        let source_year = *typical_years
            .get(&month)
            .ok_or(TmyError::Assembly(format!("no typical year for month {}", month)))?;

        let slice = series.month_slice(source_year, month);
        let mut days = slice.iter().map(|v| v.valid_time.day()).collect::<Vec<u32>>();
        days.dedup();
        if Some(days.len() as u32) != days_in_month(source_year, month) {
            return Err(TmyError::Assembly(
                format!("{} samples for {}-{:02} cover {} days, not the whole month", series.quantity, source_year, month, days.len())));
        }

        for v in slice {
            let Some(date) = NaiveDate::from_ymd_opt(reference_year, month, v.valid_time.day()) else {
                dropped += 1;
                continue;
            };
            assembled.push(TmySample {
                valid_time: date.and_time(v.valid_time.time()),
                data: v.data,
                month,
                year: reference_year,
                source_year,
            });
        }
    }

    if dropped > 0 {
        debug!("dropped {} leap day samples remapping onto {}", dropped, reference_year);
    }

    if let Some(w) = assembled.windows(2).find(|w| w[1].valid_time <= w[0].valid_time) {
        return Err(TmyError::Assembly(format!("timestamps not increasing at {}", w[1].valid_time)));
    }

    Ok((reference_year, assembled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use chrono::NaiveDate;
    use crate::models::{Quantity, TimeValue};

    /// Samples every six hours from the first day of `from` to the last day of `to`
    fn series(from: i32, to: i32) -> TimeSeries {
        let mut data = Vec::new();
        let mut day = NaiveDate::from_ymd_opt(from, 1, 1).unwrap();
        while day.year() <= to {
            for h in [0, 6, 12, 18] {
                data.push(TimeValue { valid_time: day.and_hms_opt(h, 0, 0).unwrap(), data: Some(day.year() as f64) });
            }
            day = day.succ_opt().unwrap();
        }
        TimeSeries::new(Quantity::Temperature, data).unwrap()
    }

    #[test]
    fn months_from_many_years_land_on_reference_year() {
        let source = series(2005, 2021);
        let typical_years = (1..=12u32).map(|m| (m, 2009 + m as i32)).collect::<BTreeMap<u32, i32>>();

        let (reference_year, tmy) = assemble(&source, &typical_years).unwrap();

        assert_eq!(reference_year, 2005);
        assert!(tmy.iter().all(|s| s.year == 2005 && s.valid_time.year() == 2005));
        assert!(tmy.windows(2).all(|w| w[0].valid_time < w[1].valid_time));

        // month coordinate cycles through 1..12 once, in order
        let mut months = tmy.iter().map(|s| s.month).collect::<Vec<u32>>();
        months.dedup();
        assert_eq!(months, (1..=12).collect::<Vec<u32>>());

        // provenance and values come from the source year
        assert!(tmy.iter().all(|s| s.source_year == 2009 + s.month as i32));
        assert!(tmy.iter().all(|s| s.data == Some(s.source_year as f64)));

        // full calendar coverage of 2005 without duplicate days
        let days = tmy.iter().map(|s| s.valid_time.date()).collect::<BTreeSet<NaiveDate>>();
        assert_eq!(days.len(), 365);
        assert_eq!(tmy.len(), 365 * 4);
    }

    #[test]
    fn leap_day_is_dropped_on_common_reference_year() {
        let source = series(2010, 2012);
        let mut typical_years = (1..=12u32).map(|m| (m, 2010)).collect::<BTreeMap<u32, i32>>();
        typical_years.insert(2, 2012);

        let (reference_year, tmy) = assemble(&source, &typical_years).unwrap();

        assert_eq!(reference_year, 2010);
        let feb = tmy.iter().filter(|s| s.month == 2).collect::<Vec<&TmySample>>();
        assert_eq!(feb.len(), 28 * 4);
        assert!(feb.iter().all(|s| s.source_year == 2012));
    }

    #[test]
    fn common_february_on_leap_reference_year() {
        let source = series(2012, 2013);
        let mut typical_years = (1..=12u32).map(|m| (m, 2012)).collect::<BTreeMap<u32, i32>>();
        typical_years.insert(2, 2013);

        let (reference_year, tmy) = assemble(&source, &typical_years).unwrap();

        assert_eq!(reference_year, 2012);
        let feb = tmy.iter().filter(|s| s.month == 2).collect::<Vec<&TmySample>>();
        assert_eq!(feb.len(), 28 * 4);
        assert!(feb.iter().all(|s| s.source_year == 2013 && s.valid_time.year() == 2012));
        assert!(tmy.windows(2).all(|w| w[0].valid_time < w[1].valid_time));
        let days = tmy.iter().map(|s| s.valid_time.date()).collect::<BTreeSet<NaiveDate>>();
        assert_eq!(days.len(), 365);
    }

    #[test]
    fn partially_covered_month_is_rejected() {
        let full = series(2010, 2010);
        let gap = full.data()
            .iter()
            .filter(|v| !(v.valid_time.month() == 3 && v.valid_time.day() == 10))
            .copied()
            .collect::<Vec<TimeValue>>();
        let source = TimeSeries::new(Quantity::Temperature, gap).unwrap();
        let typical_years = (1..=12u32).map(|m| (m, 2010)).collect::<BTreeMap<u32, i32>>();

        let err = assemble(&source, &typical_years).unwrap_err();

        assert!(matches!(err, TmyError::Assembly(m) if m.contains("2010-03")));
    }

    #[test]
    fn missing_month_is_an_error() {
        let source = series(2010, 2010);
        let typical_years = (1..=11u32).map(|m| (m, 2010)).collect::<BTreeMap<u32, i32>>();

        assert!(matches!(assemble(&source, &typical_years), Err(TmyError::Assembly(_))));
    }
}
