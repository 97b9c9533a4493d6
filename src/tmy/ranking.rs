use std::collections::BTreeMap;
use crate::tmy::MonthlyTable;

/// Applies the monthly weights to the FS statistics
///
/// Months without a weight are left out, which the caller prevents by resolving all twelve
/// months up front.
///
/// # Arguments
///
/// * 'fs' - FS statistic per (month, year)
/// * 'weights' - weight per calendar month
pub fn weighted(fs: &MonthlyTable<f64>, weights: &BTreeMap<u32, f64>) -> MonthlyTable<f64> {
    fs.iter()
        .filter_map(|(month, years)| {
            let w = weights.get(month)?;
            Some((*month, years.iter().map(|(year, v)| (*year, v * w)).collect()))
        })
        .collect()
}

/// Ranks the years within each calendar month by ascending weighted FS statistic
///
/// Rank 1 is the most typical year. Ranks are unique and gap-free; equal scores are ranked by
/// source year, lower year first.
///
/// # Arguments
///
/// * 'weighted' - weighted FS statistic per (month, year)
pub fn rank(weighted: &MonthlyTable<f64>) -> MonthlyTable<usize> {
    weighted
        .iter()
        .map(|(month, years)| {
            // BTreeMap iteration yields years ascending, the stable sort keeps that order on ties
            let mut ordered = years.iter().collect::<Vec<(&i32, &f64)>>();
            ordered.sort_by(|a, b| a.1.total_cmp(b.1));

            let ranks = ordered
                .into_iter()
                .enumerate()
                .map(|(i, (year, _))| (*year, i + 1))
                .collect::<BTreeMap<i32, usize>>();

            (*month, ranks)
        })
        .collect()
}

/// Returns the years of a month ordered by rank, best first
///
/// # Arguments
///
/// * 'ranked' - rank per (month, year)
/// * 'month' - calendar month (1-12)
pub fn years_by_rank(ranked: &MonthlyTable<usize>, month: u32) -> Vec<(i32, usize)> {
    let mut years = ranked
        .get(&month)
        .map(|y| y.iter().map(|(year, rank)| (*year, *rank)).collect::<Vec<(i32, usize)>>())
        .unwrap_or_default();
    years.sort_by_key(|(_, rank)| *rank);

    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(month: u32, scores: &[(i32, f64)]) -> MonthlyTable<f64> {
        let mut t: MonthlyTable<f64> = BTreeMap::new();
        t.insert(month, scores.iter().copied().collect());
        t
    }

    #[test]
    fn applies_monthly_weight() {
        let fs = table(3, &[(2010, 2.0), (2011, 4.0)]);
        let weights: BTreeMap<u32, f64> = (1..=12u32).map(|m| (m, if m == 3 { 0.5 } else { 1.0 })).collect();

        let w = weighted(&fs, &weights);

        assert_eq!(w[&3][&2010], 1.0);
        assert_eq!(w[&3][&2011], 2.0);
    }

    #[test]
    fn ranks_are_complete_and_unique() {
        let ws = table(1, &[(2010, 0.3), (2011, 0.1), (2012, 0.2), (2013, 0.4)]);

        let ranked = rank(&ws);

        assert_eq!(ranked[&1][&2011], 1);
        assert_eq!(ranked[&1][&2012], 2);
        assert_eq!(ranked[&1][&2010], 3);
        assert_eq!(ranked[&1][&2013], 4);
        let mut ranks = ranked[&1].values().copied().collect::<Vec<usize>>();
        ranks.sort();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn ties_go_to_the_lower_year() {
        let ws = table(5, &[(2014, 0.0), (2012, 0.0), (2013, 0.0)]);

        let ranked = rank(&ws);

        assert_eq!(years_by_rank(&ranked, 5), vec![(2012, 1), (2013, 2), (2014, 3)]);
        assert!(years_by_rank(&ranked, 6).is_empty());
    }
}
