use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Formatter;
use serde::{Deserialize, Serialize};
use crate::config::CustomWeight;
use crate::models::MeteorologicalVariable;
use crate::models::MeteorologicalVariable::*;
use crate::tmy::errors::TmyError;

/// Named weighting schemes for the Finkelstein-Schafer statistics
///
/// The `Ref*` schemes are taken from the TMY literature review the weights were compiled from,
/// the number is the reference index in that review.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum WeightingScheme {
    #[default]
    #[serde(rename = "iso_15927_4")]
    Iso15927_4,
    #[serde(rename = "sandia")]
    Sandia,
    #[serde(rename = "nsrdb")]
    Nsrdb,
    #[serde(rename = "ref_24_32")]
    Ref24_32,
    #[serde(rename = "ref_18")]
    Ref18,
    #[serde(rename = "ref_33")]
    Ref33,
    #[serde(rename = "ref_16_17")]
    Ref16_17,
    #[serde(rename = "ref_34")]
    Ref34,
    #[serde(rename = "ref_35")]
    Ref35,
    #[serde(rename = "ref_36")]
    Ref36,
    #[serde(rename = "ref_37e39")]
    Ref37e39,
    #[serde(rename = "ref_40")]
    Ref40,
    #[serde(rename = "ref_41")]
    Ref41,
    #[serde(rename = "ref_42")]
    Ref42,
    #[serde(rename = "ref_43")]
    Ref43,
    #[serde(rename = "ref_44_45")]
    Ref44_45,
    #[serde(rename = "ref_46")]
    Ref46,
    #[serde(rename = "ref_47")]
    Ref47,
    #[serde(rename = "ref_48")]
    Ref48,
    #[serde(rename = "ref_49")]
    Ref49,
    #[serde(rename = "ref_50")]
    Ref50,
    #[serde(rename = "custom")]
    Custom,
}

/// Implementation of the Display Trait for pretty print
impl fmt::Display for WeightingScheme {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self {
            WeightingScheme::Iso15927_4 => "ISO-15927-4",
            WeightingScheme::Sandia     => "Sandia",
            WeightingScheme::Nsrdb      => "NSRDB",
            WeightingScheme::Ref24_32   => "[24,32]",
            WeightingScheme::Ref18      => "[18]",
            WeightingScheme::Ref33      => "[33]",
            WeightingScheme::Ref16_17   => "[16,17]",
            WeightingScheme::Ref34      => "[34]",
            WeightingScheme::Ref35      => "[35]",
            WeightingScheme::Ref36      => "[36]",
            WeightingScheme::Ref37e39   => "[37e39]",
            WeightingScheme::Ref40      => "[40]",
            WeightingScheme::Ref41      => "[41]",
            WeightingScheme::Ref42      => "[42]",
            WeightingScheme::Ref43      => "[43]",
            WeightingScheme::Ref44_45   => "[44,45]",
            WeightingScheme::Ref46      => "[46]",
            WeightingScheme::Ref47      => "[47]",
            WeightingScheme::Ref48      => "[48]",
            WeightingScheme::Ref49      => "[49]",
            WeightingScheme::Ref50      => "[50]",
            WeightingScheme::Custom     => "Custom",
        };
        write!(f, "{}", name)
    }
}

type Table = &'static [(MeteorologicalVariable, Option<f64>)];

impl WeightingScheme {
    /// Returns the static weight table of a named scheme, None for the custom scheme
    ///
    /// A `None` weight marks a variable the scheme lists without defining a weight for.
    fn table(&self) -> Option<Table> {
        let table: Table = match self {
            WeightingScheme::Iso15927_4 => &[
                (MaxDryBulbTemperature, Some(0.0)),
                (MinDryBulbTemperature, Some(0.0)),
                (MeanDryBulbTemperature, Some(1.0)),
                (MaxDewPointTemperature, Some(0.0)),
                (MinDewPointTemperature, Some(0.0)),
                (MeanDewPointTemperature, Some(0.0)),
                (MaxWindSpeed, Some(0.0)),
                (MeanWindSpeed, Some(0.0)),
                (MeanRelativeHumidity, Some(1.0)),
                (GlobalHorizontalIrradiance, Some(1.0)),
                (DirectNormalIrradiance, Some(0.0)),
            ],
            WeightingScheme::Sandia => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(2.0 / 24.0)),
                (MaxDewPointTemperature, Some(1.0 / 24.0)),
                (MinDewPointTemperature, Some(1.0 / 24.0)),
                (MeanDewPointTemperature, Some(2.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (MeanRelativeHumidity, Some(0.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
                (DirectNormalIrradiance, Some(0.0)),
            ],
            WeightingScheme::Nsrdb => &[
                (MaxDryBulbTemperature, Some(1.0 / 20.0)),
                (MinDryBulbTemperature, Some(1.0 / 20.0)),
                (MeanDryBulbTemperature, Some(2.0 / 20.0)),
                (MaxDewPointTemperature, Some(1.0 / 20.0)),
                (MinDewPointTemperature, Some(1.0 / 20.0)),
                (MeanDewPointTemperature, Some(2.0 / 20.0)),
                (MaxWindSpeed, Some(1.0 / 20.0)),
                (MeanWindSpeed, Some(1.0 / 20.0)),
                (MeanRelativeHumidity, Some(0.0)),
                (GlobalHorizontalIrradiance, Some(5.0 / 20.0)),
                (DirectNormalIrradiance, Some(5.0 / 20.0)),
            ],
            WeightingScheme::Ref24_32 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(2.0 / 24.0)),
                (MaxDewPointTemperature, Some(1.0 / 24.0)),
                (MinDewPointTemperature, Some(1.0 / 24.0)),
                (MeanDewPointTemperature, Some(2.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
            ],
            WeightingScheme::Ref18 => &[
                (MaxDryBulbTemperature, Some(5.0 / 100.0)),
                (MinDryBulbTemperature, Some(5.0 / 100.0)),
                (MeanDryBulbTemperature, Some(30.0 / 100.0)),
                (MaxDewPointTemperature, Some(2.5 / 100.0)),
                (MinDewPointTemperature, Some(2.5 / 100.0)),
                (MeanDewPointTemperature, Some(5.0 / 100.0)),
                (MaxWindSpeed, Some(5.0 / 100.0)),
                (MeanWindSpeed, Some(5.0 / 100.0)),
                (GlobalHorizontalIrradiance, Some(40.0 / 100.0)),
            ],
            WeightingScheme::Ref33 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(1.0 / 24.0)),
                (MaxDewPointTemperature, Some(1.0 / 24.0)),
                (MinDewPointTemperature, Some(1.0 / 24.0)),
                (MeanDewPointTemperature, Some(1.0 / 24.0)),
                (MaxWindSpeed, Some(1.0 / 24.0)),
                (MeanWindSpeed, Some(1.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
                (DirectNormalIrradiance, Some(5.0 / 20.0)),
            ],
            WeightingScheme::Ref16_17 => &[
                (MaxDryBulbTemperature, Some(1.0 / 20.0)),
                (MinDryBulbTemperature, Some(1.0 / 20.0)),
                (MeanDryBulbTemperature, Some(2.0 / 20.0)),
                (MaxDewPointTemperature, Some(1.0 / 20.0)),
                (MinDewPointTemperature, Some(1.0 / 20.0)),
                (MeanDewPointTemperature, Some(2.0 / 20.0)),
                (MaxWindSpeed, Some(1.0 / 20.0)),
                (MeanWindSpeed, Some(1.0 / 20.0)),
                (GlobalHorizontalIrradiance, Some(5.0 / 20.0)),
                (DirectNormalIrradiance, Some(8.0 / 32.0)),
            ],
            WeightingScheme::Ref34 => &[
                (MaxDryBulbTemperature, Some(1.0 / 10.0)),
                (MinDryBulbTemperature, Some(1.0 / 10.0)),
                (MeanDryBulbTemperature, Some(2.0 / 10.0)),
                (MaxDewPointTemperature, Some(1.0 / 10.0)),
                (MinDewPointTemperature, Some(1.0 / 10.0)),
                (MeanDewPointTemperature, Some(2.0 / 10.0)),
                (GlobalHorizontalIrradiance, None),
                (DirectNormalIrradiance, Some(8.0 / 32.0)),
            ],
            WeightingScheme::Ref35 => &[
                (MaxDryBulbTemperature, Some(1.0 / 32.0)),
                (MinDryBulbTemperature, Some(1.0 / 32.0)),
                (MeanDryBulbTemperature, Some(2.0 / 32.0)),
                (MaxDewPointTemperature, Some(1.0 / 32.0)),
                (MinDewPointTemperature, Some(1.0 / 32.0)),
                (MeanDewPointTemperature, Some(2.0 / 32.0)),
                (MaxWindSpeed, Some(1.0 / 32.0)),
                (MeanWindSpeed, Some(2.0 / 32.0)),
                (GlobalHorizontalIrradiance, Some(8.0 / 32.0)),
                (DirectNormalIrradiance, Some(8.0 / 32.0)),
            ],
            WeightingScheme::Ref36 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(3.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
            ],
            WeightingScheme::Ref37e39 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(2.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (GlobalHorizontalIrradiance, None),
            ],
            WeightingScheme::Ref40 => &[
                (MaxDryBulbTemperature, Some(1.0 / 22.0)),
                (MinDryBulbTemperature, Some(1.0 / 22.0)),
                (MeanDryBulbTemperature, Some(1.0 / 22.0)),
                (MaxWindSpeed, Some(1.0 / 22.0)),
                (MeanWindSpeed, Some(1.0 / 22.0)),
                (GlobalHorizontalIrradiance, Some(11.0 / 22.0)),
                (DirectNormalIrradiance, Some(12.0 / 24.0)),
            ],
            WeightingScheme::Ref41 => &[
                (MaxDryBulbTemperature, Some(1.0 / 20.0)),
                (MinDryBulbTemperature, Some(1.0 / 20.0)),
                (MeanDryBulbTemperature, Some(3.0 / 20.0)),
                (MeanRelativeHumidity, Some(2.0 / 20.0)),
                (GlobalHorizontalIrradiance, Some(5.0 / 20.0)),
                (DirectNormalIrradiance, Some(5.0 / 20.0)),
            ],
            WeightingScheme::Ref42 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanRelativeHumidity, Some(1.0 / 24.0)),
                (MaxWindSpeed, Some(11.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(11.0 / 24.0)),
            ],
            WeightingScheme::Ref43 => &[
                (MaxDryBulbTemperature, Some(1.0 / 20.0)),
                (MinDryBulbTemperature, Some(1.0 / 20.0)),
                (MeanDryBulbTemperature, Some(6.0 / 20.0)),
                (MeanDewPointTemperature, Some(4.0 / 24.0)),
                (MeanRelativeHumidity, Some(1.0 / 20.0)),
                (GlobalHorizontalIrradiance, Some(8.0 / 20.0)),
            ],
            WeightingScheme::Ref44_45 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(2.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
            ],
            WeightingScheme::Ref46 => &[
                (MaxDryBulbTemperature, Some(1.0 / 100.0)),
                (MinDryBulbTemperature, Some(2.0 / 100.0)),
                (MeanDryBulbTemperature, Some(1.0 / 100.0)),
                (MaxDewPointTemperature, Some(2.0 / 100.0)),
                (MaxWindSpeed, Some(4.0 / 100.0)),
                (MeanWindSpeed, Some(2.0 / 100.0)),
                (DirectNormalIrradiance, Some(85.0 / 100.0)),
            ],
            WeightingScheme::Ref47 => &[
                (MaxDryBulbTemperature, Some(1.0 / 24.0)),
                (MinDryBulbTemperature, Some(1.0 / 24.0)),
                (MeanDryBulbTemperature, Some(3.0 / 24.0)),
                (MeanRelativeHumidity, Some(2.0 / 24.0)),
                (MaxWindSpeed, Some(2.0 / 24.0)),
                (MeanWindSpeed, Some(2.0 / 24.0)),
                (GlobalHorizontalIrradiance, Some(12.0 / 24.0)),
                (DirectNormalIrradiance, Some(8.0 / 32.0)),
            ],
            WeightingScheme::Ref48 => &[
                (MaxDryBulbTemperature, Some(2.0 / 16.0)),
                (MinDryBulbTemperature, Some(1.0 / 16.0)),
                (MeanDryBulbTemperature, Some(1.0 / 16.0)),
                (MeanRelativeHumidity, None),
                (MeanWindSpeed, Some(1.0 / 16.0)),
                (GlobalHorizontalIrradiance, Some(8.0 / 16.0)),
            ],
            WeightingScheme::Ref49 => &[
                (MaxDryBulbTemperature, Some(1.0 / 32.0)),
                (MinDryBulbTemperature, Some(1.0 / 32.0)),
                (MeanDryBulbTemperature, Some(2.0 / 32.0)),
                (MaxWindSpeed, Some(1.0 / 32.0)),
                (MeanWindSpeed, Some(2.0 / 32.0)),
                (GlobalHorizontalIrradiance, Some(8.0 / 32.0)),
                (DirectNormalIrradiance, Some(8.0 / 32.0)),
            ],
            WeightingScheme::Ref50 => &[
                (MaxDryBulbTemperature, Some(5.0 / 100.0)),
                (MinDryBulbTemperature, Some(5.0 / 100.0)),
                (MeanDryBulbTemperature, Some(30.0 / 100.0)),
                (MeanRelativeHumidity, Some(10.0 / 100.0)),
                (MaxWindSpeed, Some(5.0 / 100.0)),
                (MeanWindSpeed, Some(5.0 / 100.0)),
                (GlobalHorizontalIrradiance, Some(40.0 / 100.0)),
            ],
            WeightingScheme::Custom => return None,
        };

        Some(table)
    }
}

/// Strategy giving the weight of a variable's FS statistic in a calendar month
pub trait MonthWeighting: Send + Sync {
    /// Name of the scheme, for reporting
    fn scheme(&self) -> WeightingScheme;

    /// Returns the weight, or a configuration error if the scheme has none for the pair
    ///
    /// # Arguments
    ///
    /// * 'variable' - the meteorological variable
    /// * 'month' - calendar month (1-12)
    fn weight(&self, variable: MeteorologicalVariable, month: u32) -> Result<f64, TmyError>;
}

/// Weights from one of the published schemes, identical for all months
pub struct SchemeWeighting {
    scheme: WeightingScheme,
    table: Table,
}

impl MonthWeighting for SchemeWeighting {
    fn scheme(&self) -> WeightingScheme {
        self.scheme
    }

    fn weight(&self, variable: MeteorologicalVariable, _month: u32) -> Result<f64, TmyError> {
        self.table
            .iter()
            .find(|(v, _)| *v == variable)
            .and_then(|(_, w)| *w)
            .ok_or_else(|| TmyError::Configuration(format!("no weight defined for {} in scheme {}", variable, self.scheme)))
    }
}

/// Weights given in the configuration, either one per variable or one per variable and month
pub struct CustomWeighting {
    weights: BTreeMap<MeteorologicalVariable, CustomWeight>,
}

impl CustomWeighting {
    /// Returns a new CustomWeighting
    ///
    /// # Arguments
    ///
    /// * 'weights' - configured weights per variable
    pub fn new(weights: &BTreeMap<MeteorologicalVariable, CustomWeight>) -> CustomWeighting {
        CustomWeighting { weights: weights.clone() }
    }
}

impl MonthWeighting for CustomWeighting {
    fn scheme(&self) -> WeightingScheme {
        WeightingScheme::Custom
    }

    fn weight(&self, variable: MeteorologicalVariable, month: u32) -> Result<f64, TmyError> {
        let weight = self.weights
            .get(&variable)
            .ok_or_else(|| TmyError::Configuration(format!("no custom weight defined for {}", variable)))?;

        match weight {
            CustomWeight::Constant(w) => Ok(*w),
            CustomWeight::Monthly(w) => w
                .get((month as usize).wrapping_sub(1))
                .copied()
                .ok_or_else(|| TmyError::Configuration(format!("no custom weight for {} in month {}", variable, month))),
        }
    }
}

/// Resolves a scheme name into its weighting strategy
///
/// # Arguments
///
/// * 'scheme' - the named scheme
/// * 'custom' - weights from the configuration, used by the custom scheme only
pub fn resolve(scheme: WeightingScheme, custom: &BTreeMap<MeteorologicalVariable, CustomWeight>) -> Result<Box<dyn MonthWeighting>, TmyError> {
    match scheme.table() {
        Some(table) => Ok(Box::new(SchemeWeighting { scheme, table })),
        None if custom.is_empty() => Err(TmyError::Configuration("custom weighting scheme selected but no custom weights given".into())),
        None => Ok(Box::new(CustomWeighting::new(custom))),
    }
}

/// Resolves the weight of a variable for all twelve months
///
/// Fails fast on a missing entry, and on weights that are not finite and non-negative.
///
/// # Arguments
///
/// * 'weighting' - weighting strategy
/// * 'variable' - the meteorological variable
pub fn monthly_weights(weighting: &dyn MonthWeighting, variable: MeteorologicalVariable) -> Result<BTreeMap<u32, f64>, TmyError> {
    let mut weights = BTreeMap::new();
    for month in 1..=12u32 {
        let w = weighting.weight(variable, month)?;
        if !w.is_finite() || w < 0.0 {
            return Err(TmyError::Configuration(
                format!("weight {} for {} in month {} of scheme {} is not a finite non-negative number", w, variable, month, weighting.scheme())));
        }
        weights.insert(month, w);
    }

    Ok(weights)
}

/// Lists the weights of a scheme, one line per variable
///
/// # Arguments
///
/// * 'weighting' - weighting strategy
pub fn describe_scheme(weighting: &dyn MonthWeighting) -> String {
    let mut lines = vec![format!("{} :", weighting.scheme())];
    for variable in MeteorologicalVariable::ALL {
        match monthly_weights(weighting, variable) {
            Ok(w) if w.values().all(|v| *v == w[&1]) => lines.push(format!("  {}: {:.4}", variable, w[&1])),
            Ok(w) => lines.push(format!("  {}: {:?}", variable, w.values().collect::<Vec<&f64>>())),
            Err(_) => lines.push(format!("  {}: no weight", variable)),
        }
    }

    lines.join("\n")
}
