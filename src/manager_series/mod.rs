pub mod errors;

use std::collections::BTreeMap;
use std::fs;
use chrono::NaiveDateTime;
use glob::glob;
use log::{debug, info, warn};
use crate::config::SeriesParameters;
use crate::manager_series::errors::SeriesError;
use crate::models::{MeteoSeries, Quantity, TimeSeries, TimeValue};

/// Loads meteorological series from JSON files
///
/// Every quantity is read from the files matching its pattern in the input directory. Each file
/// holds an array of `{"time": "YYYY-MM-DDTHH:MM:SS", "value": number|null}` objects, files are
/// concatenated and ordered by time.
pub struct SeriesManager {
    input_dir: String,
    patterns: BTreeMap<Quantity, String>,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
}

impl SeriesManager {
    /// Returns a new instance of SeriesManager
    ///
    /// Quantities without a configured pattern are looked for as `<quantity>*.json`.
    ///
    /// # Arguments
    ///
    /// * 'params' - series parameters from config
    /// * 'input_dir' - directory holding the series files, with trailing slash
    pub fn new(params: &SeriesParameters, input_dir: &str) -> SeriesManager {
        let configured = [
            (Quantity::Temperature, &params.temperature),
            (Quantity::DewPointTemperature, &params.dew_point_temperature),
            (Quantity::RelativeHumidity, &params.relative_humidity),
            (Quantity::WindSpeed, &params.wind_speed),
            (Quantity::GlobalHorizontalIrradiance, &params.global_horizontal_irradiance),
            (Quantity::DirectNormalIrradiance, &params.direct_normal_irradiance),
        ];

        let patterns = configured
            .into_iter()
            .map(|(q, p)| (q, p.clone().unwrap_or_else(|| default_pattern(q))))
            .collect();

        SeriesManager {
            input_dir: input_dir.to_string(),
            patterns,
            start: params.start,
            end: params.end,
        }
    }

    /// Loads the series of one quantity
    ///
    /// # Arguments
    ///
    /// * 'quantity' - the quantity to load
    pub fn load(&self, quantity: Quantity) -> Result<TimeSeries, SeriesError> {
        let pattern = format!("{}{}", self.input_dir, self.patterns.get(&quantity).cloned().unwrap_or_else(|| default_pattern(quantity)));

        let mut data: Vec<TimeValue> = Vec::new();
        let mut files = 0usize;
        for entry in glob(&pattern).map_err(|e| SeriesError::PatternError(format!("{}: {}", pattern, e)))? {
            let path = entry.map_err(|e| SeriesError::ReadError(e.to_string()))?;

            let json = fs::read_to_string(&path)
                .map_err(|e| SeriesError::ReadError(format!("{}: {}", path.display(), e)))?;
            let values: Vec<TimeValue> = serde_json::from_str(&json)
                .map_err(|e| SeriesError::ParseError(format!("{}: {}", path.display(), e)))?;

            debug!("{} samples of {} read from {}", values.len(), quantity, path.display());
            data.extend(values);
            files += 1;
        }

        if files == 0 {
            return Err(SeriesError::NoFiles(pattern));
        }

        data.sort_by_key(|v| v.valid_time);
        let series = TimeSeries::new(quantity, data)?.period(self.start, self.end);

        if series.is_empty() {
            warn!("{} series has no samples in the configured period", quantity);
        }
        info!("{} series loaded from {} file(s), {} samples, years {:?}",
            quantity, files, series.data().len(), series.years());

        Ok(series)
    }

    /// Loads the series of several quantities
    ///
    /// # Arguments
    ///
    /// * 'quantities' - the quantities to load
    pub fn load_all(&self, quantities: &[Quantity]) -> Result<MeteoSeries, SeriesError> {
        let mut series = MeteoSeries::new();
        for quantity in quantities {
            if series.get(*quantity).is_none() {
                series.insert(self.load(*quantity)?);
            }
        }

        Ok(series)
    }
}

fn default_pattern(quantity: Quantity) -> String {
    let stem = match quantity {
        Quantity::Temperature                => "temperature",
        Quantity::DewPointTemperature        => "dew_point_temperature",
        Quantity::RelativeHumidity           => "relative_humidity",
        Quantity::WindSpeed                  => "wind_speed",
        Quantity::GlobalHorizontalIrradiance => "global_horizontal_irradiance",
        Quantity::DirectNormalIrradiance     => "direct_normal_irradiance",
    };

    format!("{}*.json", stem)
}
