use std::collections::BTreeMap;
use serde::Serialize;
use crate::models::MeteorologicalVariable;
use crate::tmy::assembly::TmySample;
use crate::tmy::ecdf::Ecdf;
use crate::tmy::selection::TypicalMonth;
use crate::tmy::weighting::WeightingScheme;
use crate::tmy::MonthlyTable;

/// Typical meteorological year of one variable, with the intermediate results it was built from
///
/// Built once by the pipeline and read only afterward.
#[derive(Serialize, Clone, Debug)]
pub struct TmyResult {
    pub(super) variable: MeteorologicalVariable,
    pub(super) weighting_scheme: WeightingScheme,
    pub(super) weights: BTreeMap<u32, f64>,
    pub(super) reference_year: i32,
    pub(super) typical_months: BTreeMap<u32, TypicalMonth>,
    pub(super) finkelstein_schafer: MonthlyTable<f64>,
    pub(super) weighted: MonthlyTable<f64>,
    pub(super) ranked: MonthlyTable<usize>,
    pub(super) long_term_ecdfs: BTreeMap<u32, Ecdf>,
    pub(super) yearly_monthly_ecdfs: MonthlyTable<Ecdf>,
    pub(super) series: Vec<TmySample>,
}

impl TmyResult {
    pub fn variable(&self) -> MeteorologicalVariable {
        self.variable
    }

    pub fn weighting_scheme(&self) -> WeightingScheme {
        self.weighting_scheme
    }

    /// Weight applied to the FS statistic per calendar month
    pub fn weights(&self) -> &BTreeMap<u32, f64> {
        &self.weights
    }

    /// Year all assembled samples are stamped with
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }

    /// The assembled year, ordered by time
    pub fn series(&self) -> &[TmySample] {
        &self.series
    }

    pub fn typical_months(&self) -> &BTreeMap<u32, TypicalMonth> {
        &self.typical_months
    }

    /// Selected source year per calendar month
    pub fn typical_month_years(&self) -> BTreeMap<u32, i32> {
        self.typical_months.iter().map(|(m, t)| (*m, t.year)).collect()
    }

    pub fn finkelstein_schafer(&self) -> &MonthlyTable<f64> {
        &self.finkelstein_schafer
    }

    pub fn weighted(&self) -> &MonthlyTable<f64> {
        &self.weighted
    }

    pub fn ranked(&self) -> &MonthlyTable<usize> {
        &self.ranked
    }

    pub fn long_term_ecdfs(&self) -> &BTreeMap<u32, Ecdf> {
        &self.long_term_ecdfs
    }

    pub fn yearly_monthly_ecdfs(&self) -> &MonthlyTable<Ecdf> {
        &self.yearly_monthly_ecdfs
    }

    /// Returns the assembled series split by month coordinate
    pub fn group_by_month(&self) -> BTreeMap<u32, &[TmySample]> {
        self.series
            .chunk_by(|a, b| a.month == b.month)
            .map(|chunk| (chunk[0].month, chunk))
            .collect()
    }
}
