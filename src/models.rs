use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fmt::Formatter;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use crate::errors::TimeValuesError;

/// Physical quantities a meteorological series can carry
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Temperature,
    DewPointTemperature,
    RelativeHumidity,
    WindSpeed,
    GlobalHorizontalIrradiance,
    DirectNormalIrradiance,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Quantity::Temperature                => write!(f, "temperature"),
            Quantity::DewPointTemperature        => write!(f, "dew point temperature"),
            Quantity::RelativeHumidity           => write!(f, "relative humidity"),
            Quantity::WindSpeed                  => write!(f, "wind speed"),
            Quantity::GlobalHorizontalIrradiance => write!(f, "global horizontal irradiance"),
            Quantity::DirectNormalIrradiance     => write!(f, "direct normal irradiance"),
        }
    }
}

/// Daily aggregate used as the sample of a variable's distribution
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum DailyStatistic {
    Minimum,
    Mean,
    Maximum,
}

/// Meteorological variables known to the weighting schemes
///
/// Each variable is one daily statistic of one physical quantity.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum MeteorologicalVariable {
    MaxDryBulbTemperature,
    MinDryBulbTemperature,
    MeanDryBulbTemperature,
    MaxDewPointTemperature,
    MinDewPointTemperature,
    MeanDewPointTemperature,
    MaxWindSpeed,
    MeanWindSpeed,
    MeanRelativeHumidity,
    GlobalHorizontalIrradiance,
    DirectNormalIrradiance,
}

impl MeteorologicalVariable {
    pub const ALL: [MeteorologicalVariable; 11] = [
        MeteorologicalVariable::MaxDryBulbTemperature,
        MeteorologicalVariable::MinDryBulbTemperature,
        MeteorologicalVariable::MeanDryBulbTemperature,
        MeteorologicalVariable::MaxDewPointTemperature,
        MeteorologicalVariable::MinDewPointTemperature,
        MeteorologicalVariable::MeanDewPointTemperature,
        MeteorologicalVariable::MaxWindSpeed,
        MeteorologicalVariable::MeanWindSpeed,
        MeteorologicalVariable::MeanRelativeHumidity,
        MeteorologicalVariable::GlobalHorizontalIrradiance,
        MeteorologicalVariable::DirectNormalIrradiance,
    ];

    /// Returns the series quantity the variable is computed from
    pub fn quantity(&self) -> Quantity {
        match self {
            MeteorologicalVariable::MaxDryBulbTemperature
            | MeteorologicalVariable::MinDryBulbTemperature
            | MeteorologicalVariable::MeanDryBulbTemperature => Quantity::Temperature,
            MeteorologicalVariable::MaxDewPointTemperature
            | MeteorologicalVariable::MinDewPointTemperature
            | MeteorologicalVariable::MeanDewPointTemperature => Quantity::DewPointTemperature,
            MeteorologicalVariable::MaxWindSpeed
            | MeteorologicalVariable::MeanWindSpeed => Quantity::WindSpeed,
            MeteorologicalVariable::MeanRelativeHumidity => Quantity::RelativeHumidity,
            MeteorologicalVariable::GlobalHorizontalIrradiance => Quantity::GlobalHorizontalIrradiance,
            MeteorologicalVariable::DirectNormalIrradiance => Quantity::DirectNormalIrradiance,
        }
    }

    /// Returns the daily statistic the variable's distribution is built from
    pub fn statistic(&self) -> DailyStatistic {
        match self {
            MeteorologicalVariable::MaxDryBulbTemperature
            | MeteorologicalVariable::MaxDewPointTemperature
            | MeteorologicalVariable::MaxWindSpeed => DailyStatistic::Maximum,
            MeteorologicalVariable::MinDryBulbTemperature
            | MeteorologicalVariable::MinDewPointTemperature => DailyStatistic::Minimum,
            _ => DailyStatistic::Mean,
        }
    }

    /// Short name used for output file names
    pub fn slug(&self) -> &'static str {
        match self {
            MeteorologicalVariable::MaxDryBulbTemperature      => "max_dry_bulb_temperature",
            MeteorologicalVariable::MinDryBulbTemperature      => "min_dry_bulb_temperature",
            MeteorologicalVariable::MeanDryBulbTemperature     => "mean_dry_bulb_temperature",
            MeteorologicalVariable::MaxDewPointTemperature     => "max_dew_point_temperature",
            MeteorologicalVariable::MinDewPointTemperature     => "min_dew_point_temperature",
            MeteorologicalVariable::MeanDewPointTemperature    => "mean_dew_point_temperature",
            MeteorologicalVariable::MaxWindSpeed               => "max_wind_speed",
            MeteorologicalVariable::MeanWindSpeed              => "mean_wind_speed",
            MeteorologicalVariable::MeanRelativeHumidity       => "mean_relative_humidity",
            MeteorologicalVariable::GlobalHorizontalIrradiance => "global_horizontal_irradiance",
            MeteorologicalVariable::DirectNormalIrradiance     => "direct_normal_irradiance",
        }
    }
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for MeteorologicalVariable {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            MeteorologicalVariable::MaxDryBulbTemperature      => "Maximum Dry Bulb Temperature",
            MeteorologicalVariable::MinDryBulbTemperature      => "Minimum Dry Bulb Temperature",
            MeteorologicalVariable::MeanDryBulbTemperature     => "Mean Dry Bulb Temperature",
            MeteorologicalVariable::MaxDewPointTemperature     => "Maximum Dew Point Temperature",
            MeteorologicalVariable::MinDewPointTemperature     => "Minimum Dew Point Temperature",
            MeteorologicalVariable::MeanDewPointTemperature    => "Mean Dew Point Temperature",
            MeteorologicalVariable::MaxWindSpeed               => "Maximum Wind Velocity",
            MeteorologicalVariable::MeanWindSpeed              => "Mean Wind Velocity",
            MeteorologicalVariable::MeanRelativeHumidity       => "Mean Relative Humidity",
            MeteorologicalVariable::GlobalHorizontalIrradiance => "Global Horizontal Irradiance",
            MeteorologicalVariable::DirectNormalIrradiance     => "Direct Normal Irradiance",
        };
        write!(f, "{}", name)
    }
}

/// One sample of a series. `None` marks a missing value.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct TimeValue {
    #[serde(rename = "time")]
    pub valid_time: NaiveDateTime,
    #[serde(rename = "value")]
    pub data: Option<f64>,
}

impl TimeValue {
    /// Returns the value if present and finite
    pub fn value(&self) -> Option<f64> {
        self.data.filter(|v| v.is_finite())
    }
}

/// An ordered series of samples for one quantity
#[derive(Clone, Debug)]
pub struct TimeSeries {
    pub quantity: Quantity,
    data: Vec<TimeValue>,
}

impl TimeSeries {
    /// Creates a new TimeSeries
    ///
    /// # Arguments
    ///
    /// * 'quantity' - the quantity the samples represent
    /// * 'data' - samples, must be strictly increasing in time
    pub fn new(quantity: Quantity, data: Vec<TimeValue>) -> Result<TimeSeries, TimeValuesError> {
        if let Some(w) = data.windows(2).find(|w| w[1].valid_time <= w[0].valid_time) {
            return Err(TimeValuesError::NotIncreasing(w[1].valid_time));
        }

        Ok(TimeSeries { quantity, data })
    }

    pub fn data(&self) -> &[TimeValue] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns all years that have at least one sample
    pub fn years(&self) -> BTreeSet<i32> {
        self.data.iter().map(|v| v.valid_time.year()).collect()
    }

    /// Returns the samples belonging to one calendar month of one year
    ///
    /// # Arguments
    ///
    /// * 'year' - the year to slice
    /// * 'month' - the calendar month to slice (1-12)
    pub fn month_slice(&self, year: i32, month: u32) -> &[TimeValue] {
        let start = self.data.partition_point(|v| (v.valid_time.year(), v.valid_time.month()) < (year, month));
        let end = self.data.partition_point(|v| (v.valid_time.year(), v.valid_time.month()) <= (year, month));

        &self.data[start..end]
    }

    /// Returns a copy restricted to the given period (both bounds inclusive)
    ///
    /// # Arguments
    ///
    /// * 'start' - first timestamp to keep, unbounded if None
    /// * 'end' - last timestamp to keep, unbounded if None
    pub fn period(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> TimeSeries {
        let data = self.data
            .iter()
            .filter(|v| start.is_none_or(|s| v.valid_time >= s) && end.is_none_or(|e| v.valid_time <= e))
            .copied()
            .collect();

        TimeSeries { quantity: self.quantity, data }
    }
}

/// All series available for one location, keyed by quantity
#[derive(Default, Debug)]
pub struct MeteoSeries {
    series: BTreeMap<Quantity, TimeSeries>,
}

impl MeteoSeries {
    pub fn new() -> MeteoSeries {
        MeteoSeries::default()
    }

    pub fn insert(&mut self, series: TimeSeries) {
        self.series.insert(series.quantity, series);
    }

    pub fn get(&self, quantity: Quantity) -> Option<&TimeSeries> {
        self.series.get(&quantity)
    }
}

/// Daily aggregates of one calendar day
#[derive(Clone, Copy, Serialize, Debug, PartialEq)]
pub struct DailyValue {
    pub date: NaiveDate,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl DailyValue {
    /// Picks out the requested statistic
    pub fn statistic(&self, statistic: DailyStatistic) -> f64 {
        match statistic {
            DailyStatistic::Minimum => self.min,
            DailyStatistic::Mean    => self.mean,
            DailyStatistic::Maximum => self.max,
        }
    }
}

/// Number of days in a calendar month, None for an invalid year/month
///
/// # Arguments
///
/// * 'year' - the year
/// * 'month' - calendar month (1-12)
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((next - first).num_days() as u32)
}
