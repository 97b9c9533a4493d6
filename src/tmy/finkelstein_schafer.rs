use std::collections::BTreeMap;
use crate::tmy::ecdf::Ecdf;
use crate::tmy::MonthlyTable;

/// Calculates the Finkelstein-Schafer statistic for every (month, year)
///
/// FS(m, y) = Σ |F(m, y)(x) - Φ(m)(x)|, summed over the union of the sample points of both
/// step functions. Entries without a yearly ECDF or without a long-term ECDF for the month are
/// omitted.
///
/// # Arguments
///
/// * 'yearly' - ECDF per (month, year)
/// * 'long_term' - long-term ECDF per calendar month
pub fn finkelstein_schafer(yearly: &MonthlyTable<Ecdf>, long_term: &BTreeMap<u32, Ecdf>) -> MonthlyTable<f64> {
    let mut result: MonthlyTable<f64> = BTreeMap::new();

    for (month, years) in yearly {
        let Some(phi) = long_term.get(month) else {
            continue;
        };

        let scores = years
            .iter()
            .map(|(year, f)| (*year, statistic(f, phi)))
            .collect::<BTreeMap<i32, f64>>();

        if !scores.is_empty() {
            result.insert(*month, scores);
        }
    }

    result
}

/// Sum of absolute differences between two ECDFs over the union of their sample points
///
/// # Arguments
///
/// * 'candidate' - ECDF of one candidate month
/// * 'reference' - long-term ECDF of the same calendar month
pub fn statistic(candidate: &Ecdf, reference: &Ecdf) -> f64 {
    let mut points = candidate.values()
        .iter()
        .chain(reference.values().iter())
        .copied()
        .collect::<Vec<f64>>();
    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup();

    points
        .into_iter()
        .map(|x| (candidate.evaluate(x) - reference.evaluate(x)).abs())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_distributions_score_zero() {
        let a = Ecdf::new(&[1.0, 2.0, 3.0]).unwrap();
        let b = Ecdf::new(&[3.0, 2.0, 1.0]).unwrap();
        assert_eq!(statistic(&a, &b), 0.0);
    }

    #[test]
    fn score_is_positive_for_different_distributions() {
        let candidate = Ecdf::new(&[1.0, 1.0]).unwrap();
        let reference = Ecdf::new(&[1.0, 1.0, 3.0, 3.0]).unwrap();

        // At x=1: |1.0 - 0.5| and at x=3: |1.0 - 1.0|
        assert_eq!(statistic(&candidate, &reference), 0.5);
    }

    #[test]
    fn months_without_long_term_distribution_are_omitted() {
        let mut yearly: MonthlyTable<Ecdf> = BTreeMap::new();
        yearly.entry(1).or_default().insert(2010, Ecdf::new(&[1.0, 2.0]).unwrap());
        yearly.entry(1).or_default().insert(2011, Ecdf::new(&[3.0, 4.0]).unwrap());
        yearly.entry(2).or_default().insert(2010, Ecdf::new(&[1.0]).unwrap());

        let mut long_term = BTreeMap::new();
        long_term.insert(1, Ecdf::new(&[1.0, 2.0, 3.0, 4.0]).unwrap());

        let fs = finkelstein_schafer(&yearly, &long_term);

        assert_eq!(fs.len(), 1);
        assert_eq!(fs[&1].len(), 2);
        assert!(fs[&1].values().all(|v| *v >= 0.0));
        // 2010: |0.5-0.25| + |1-0.5| + |1-0.75| + 0 = 1.0
        assert!((fs[&1][&2010] - 1.0).abs() < 1e-12);
        // 2011: |0-0.25| + |0-0.5| + |0.5-0.75| + 0 = 1.0
        assert!((fs[&1][&2011] - 1.0).abs() < 1e-12);
    }
}
