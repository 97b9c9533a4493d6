use std::collections::BTreeMap;
use chrono::Datelike;
use serde::Serialize;
use crate::models::{DailyStatistic, DailyValue};
use crate::tmy::MonthlyTable;

/// Empirical cumulative distribution function as a step function
///
/// `values` holds the distinct sorted samples and `probabilities` the fraction of samples
/// less than or equal to each of them. Tied samples share one step.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct Ecdf {
    values: Vec<f64>,
    probabilities: Vec<f64>,
    samples: usize,
}

impl Ecdf {
    /// Builds an ECDF from samples, returns None if there are no samples
    ///
    /// # Arguments
    ///
    /// * 'samples' - finite sample values in any order
    pub fn new(samples: &[f64]) -> Option<Ecdf> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let n = sorted.len();
        let mut values = Vec::new();
        let mut probabilities = Vec::new();
        for i in 0..n {
            // Only the last of a run of equal values gets a step
            if i + 1 == n || sorted[i + 1] != sorted[i] {
                values.push(sorted[i]);
                probabilities.push((i + 1) as f64 / n as f64);
            }
        }

        Some(Ecdf { values, probabilities, samples: n })
    }

    /// Returns the fraction of samples less than or equal to x
    ///
    /// # Arguments
    ///
    /// * 'x' - point to evaluate the step function at
    pub fn evaluate(&self, x: f64) -> f64 {
        match self.values.partition_point(|v| *v <= x) {
            0 => 0.0,
            i => self.probabilities[i - 1],
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Number of samples the function was built from
    pub fn samples(&self) -> usize {
        self.samples
    }
}

/// Builds one ECDF per (month, year) from daily values
///
/// Pairs without any daily value are left out of the table.
///
/// # Arguments
///
/// * 'daily' - daily statistics of the variable's quantity
/// * 'statistic' - which daily statistic forms the samples
pub fn yearly_monthly_ecdfs(daily: &[DailyValue], statistic: DailyStatistic) -> MonthlyTable<Ecdf> {
    let mut samples: BTreeMap<u32, BTreeMap<i32, Vec<f64>>> = BTreeMap::new();
    for d in daily {
        samples
            .entry(d.date.month())
            .or_default()
            .entry(d.date.year())
            .or_default()
            .push(d.statistic(statistic));
    }

    samples
        .into_iter()
        .map(|(month, years)| {
            let ecdfs = years
                .into_iter()
                .filter_map(|(year, s)| Ecdf::new(&s).map(|e| (year, e)))
                .collect::<BTreeMap<i32, Ecdf>>();
            (month, ecdfs)
        })
        .collect()
}

/// Builds one long-term ECDF per calendar month, pooling all years
///
/// # Arguments
///
/// * 'daily' - daily statistics of the variable's quantity
/// * 'statistic' - which daily statistic forms the samples
pub fn long_term_monthly_ecdfs(daily: &[DailyValue], statistic: DailyStatistic) -> BTreeMap<u32, Ecdf> {
    let mut samples: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for d in daily {
        samples.entry(d.date.month()).or_default().push(d.statistic(statistic));
    }

    samples
        .into_iter()
        .filter_map(|(month, s)| Ecdf::new(&s).map(|e| (month, e)))
        .collect()
}
